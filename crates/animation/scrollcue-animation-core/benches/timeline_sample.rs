use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use scrollcue_animation_core::{
    AnimationDefaults, AnimationDescriptor, Easing, Position, TargetSource, Timeline,
    TimelineDefaults,
};

struct Grid(usize);

impl TargetSource for Grid {
    fn select(&self, selector: &str) -> Vec<String> {
        let prefix = selector.trim_start_matches('.');
        (0..self.0).map(|i| format!("{prefix}#{i}")).collect()
    }
}

fn hero_like(steps: usize) -> Timeline {
    let mut tl = Timeline::with_defaults(TimelineDefaults {
        ease: Easing::parse("power3.out").ok(),
        duration: None,
    });
    for i in 0..steps {
        let d = AnimationDescriptor::builder(format!(".row{i}"))
            .from_to("y", 50.0, 0.0)
            .from_to("opacity", 0.0, 1.0)
            .duration(0.8)
            .stagger(0.1)
            .build()
            .expect("valid descriptor");
        let pos = if i == 0 {
            Position::Sequential
        } else {
            Position::Offset(-0.3)
        };
        tl.push(d, pos);
    }
    tl
}

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("timeline_sample");
    for &targets in &[4usize, 32, 128] {
        let source = Grid(targets);
        let run = hero_like(6).resolve(&source, &AnimationDefaults::default());
        let duration = run.duration();
        group.bench_with_input(BenchmarkId::from_parameter(targets), &run, |b, run| {
            let mut t = 0.0f32;
            b.iter(|| {
                t = (t + 0.016) % duration;
                black_box(run.sample(black_box(t)))
            })
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let tl = hero_like(6);
    let source = Grid(32);
    c.bench_function("timeline_resolve_32", |b| {
        b.iter(|| black_box(tl.resolve(&source, &AnimationDefaults::default())))
    });
}

criterion_group!(benches, bench_sample, bench_resolve);
criterion_main!(benches);
