use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scrollcue_orchestrator::Orchestrator;
use scrollcue_test_fixtures::{documents, sections, FakeDocument};

fn landing_page() -> (Orchestrator, FakeDocument) {
    let doc = documents::load("landing").expect("landing document");
    let mut orch =
        Orchestrator::default().with_viewport(doc.viewport.width, doc.viewport.height);
    for name in ["navigation", "hero", "about", "contact"] {
        sections::load(name)
            .and_then(|s| s.mount(&mut orch, &doc))
            .expect("mount section");
    }
    (orch, doc)
}

fn bench_scroll_and_tick(c: &mut Criterion) {
    let (mut orch, doc) = landing_page();
    let mut scroll = 0.0_f32;
    c.bench_function("scroll_and_tick_landing", |b| {
        b.iter(|| {
            scroll = (scroll + 37.0) % 3300.0;
            orch.on_scroll(&doc, scroll);
            black_box(orch.tick(1.0 / 60.0));
        })
    });
}

fn bench_mount_unmount(c: &mut Criterion) {
    let doc = documents::load("landing").expect("landing document");
    let about = sections::load("about").expect("about section");
    let mut orch = Orchestrator::default().with_viewport(1280.0, 900.0);
    c.bench_function("mount_unmount_about", |b| {
        b.iter(|| {
            let (scope, _) = about.mount(&mut orch, &doc).expect("mount");
            black_box(orch.unmount(scope));
            orch.tick(0.0);
        })
    });
}

criterion_group!(benches, bench_scroll_and_tick, bench_mount_unmount);
criterion_main!(benches);
