//! Per-event trigger evaluation and the per-tick frame pass.
//!
//! Every evaluation pass reads one scroll snapshot for all live
//! registrations, in scope order then registration order.

use scrollcue_api_core::{PropPath, Value, WriteBatch, WriteOp};

use crate::events::Frame;
use crate::host::ElementHost;

/// Re-resolve targets for idle registrations (after the host's DOM changed).
pub(crate) fn resolve_all(orchestrator: &mut crate::Orchestrator, host: &dyn ElementHost) {
    let defaults = orchestrator.config.animation;
    for scope in orchestrator.scopes.scopes_mut() {
        let (root, regs) = scope.parts_mut();
        for reg in regs {
            reg.resolve(host, root, &defaults);
        }
    }
}

/// Evaluate every live trigger against the current snapshot.
pub(crate) fn evaluate_triggers(orchestrator: &mut crate::Orchestrator, host: &dyn ElementHost) {
    let snapshot = orchestrator.snapshot;
    for scope in orchestrator.scopes.scopes_mut() {
        let (_, regs) = scope.parts_mut();
        for reg in regs {
            reg.refresh_range(host, &mut orchestrator.geometry, snapshot.viewport_height);
            reg.evaluate(snapshot.scroll_y, &mut orchestrator.pending);
        }
    }
}

/// Advance registrations and tilts by `dt`, then drain queued events.
pub(crate) fn run_frame(orchestrator: &mut crate::Orchestrator, dt: f32) -> Frame {
    orchestrator.epoch = orchestrator.epoch.wrapping_add(1);
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    let mut writes = WriteBatch::new();
    for scope in orchestrator.scopes.scopes_mut() {
        let (_, regs) = scope.parts_mut();
        for reg in regs {
            reg.advance(dt, &mut writes, &mut orchestrator.pending);
        }
    }

    // Tilt writes come last so pointer interaction wins over scroll-driven
    // rotation on the same element.
    for (handle, tilt) in orchestrator.tilts.iter_mut() {
        if let Some(t) = tilt.advance(dt) {
            writes.push(WriteOp::new(
                PropPath::new(handle.clone(), "rotateX"),
                Value::Float(t.rotate_x),
            ));
            writes.push(WriteOp::new(
                PropPath::new(handle.clone(), "rotateY"),
                Value::Float(t.rotate_y),
            ));
        }
    }
    orchestrator.tilts.retain(|_, tilt| !tilt.is_done());

    writes.dedup_last_wins();

    let mut events = std::mem::take(&mut orchestrator.pending);
    let cap = orchestrator.config.max_events_per_frame;
    if events.len() > cap {
        log::warn!(
            "frame {}: dropping {} events over the per-frame limit of {cap}",
            orchestrator.epoch,
            events.len() - cap
        );
        events.truncate(cap);
    }

    Frame {
        epoch: orchestrator.epoch,
        dt,
        writes,
        events,
    }
}
