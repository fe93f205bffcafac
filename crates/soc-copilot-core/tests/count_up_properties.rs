//! Integration tests for scheduler-driven count-up counters.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use soc_copilot_core::{
    AnimatedCounter, CountUpConfig, Easing, FrameScheduler, ManualFrameScheduler,
};

fn setup() -> Arc<ManualFrameScheduler> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("soc_copilot_core=debug")
        .with_test_writer()
        .try_init();
    Arc::new(ManualFrameScheduler::new())
}

/// Record every value the counter reports.
fn record(counter: &AnimatedCounter) -> Arc<Mutex<Vec<f64>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    counter.value_changed().connect(move |v| seen_clone.lock().push(*v));
    seen
}

#[test]
fn test_converges_to_end_after_duration() {
    let scheduler = setup();
    let cases = [
        (0.0, 100.0, 1000.0, 0),
        (0.35, 0.62, 1000.0, 2),
        (18.0, 4.5, 1000.0, 1),
        (-40.0, 12.345, 250.0, 3),
        (1_000_000.0, 0.0, 1500.0, 0),
    ];

    for (start, end, duration, decimals) in cases {
        let counter = AnimatedCounter::new(
            scheduler.clone(),
            CountUpConfig::new(start, end)
                .with_duration_ms(duration)
                .with_decimals(decimals),
        );
        scheduler.run_until_idle(16.0, 1000);
        assert_eq!(
            counter.value(),
            soc_copilot_core::round_to(end, decimals as u32),
            "{start} -> {end}"
        );
        assert!(!counter.is_animating());
        assert!(!counter.has_pending_frame());
    }
}

#[test]
fn test_shows_start_immediately() {
    let scheduler = setup();
    let counter = AnimatedCounter::new(
        scheduler.clone(),
        CountUpConfig::new(7.25, 99.0).with_decimals(1),
    );
    assert_eq!(counter.value(), 7.3);

    scheduler.run_frame(0.0);
    assert_eq!(counter.value(), 7.3);
}

#[test]
fn test_monotonic_in_direction_of_travel() {
    let scheduler = setup();
    let up = AnimatedCounter::new(scheduler.clone(), CountUpConfig::new(0.0, 500.0));
    let down = AnimatedCounter::new(scheduler.clone(), CountUpConfig::new(500.0, 0.0));
    let flat = AnimatedCounter::new(
        scheduler.clone(),
        CountUpConfig::new(18.0, 18.0).with_decimals(1),
    );
    let up_seen = record(&up);
    let down_seen = record(&down);
    let flat_seen = record(&flat);

    scheduler.run_until_idle(7.0, 1000);

    let up_seen = up_seen.lock();
    assert!(up_seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(up_seen.last(), Some(&500.0));

    let down_seen = down_seen.lock();
    assert!(down_seen.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(down_seen.last(), Some(&0.0));

    assert!(flat_seen.lock().iter().all(|v| *v == 18.0));
}

#[test]
fn test_ease_out_front_loads_progress() {
    let scheduler = setup();
    let counter = AnimatedCounter::new(
        scheduler.clone(),
        CountUpConfig::new(0.0, 1000.0).with_duration_ms(1000.0),
    );

    scheduler.run_frame(0.0);
    scheduler.run_frame(500.0);
    let first_half = counter.raw_value();
    scheduler.run_frame(1000.0);
    let second_half = counter.raw_value() - first_half;

    assert_eq!(first_half, 875.0);
    assert!(first_half > second_half);
}

#[test]
fn test_reference_midpoint_rounds_to_88() {
    let scheduler = setup();
    let counter = AnimatedCounter::new(
        scheduler.clone(),
        CountUpConfig::new(0.0, 100.0).with_duration_ms(1000.0),
    );

    scheduler.run_frame(0.0);
    assert_eq!(counter.value(), 0.0);
    scheduler.run_frame(500.0);
    assert_eq!(counter.value(), 88.0);
    scheduler.run_frame(1000.0);
    assert_eq!(counter.value(), 100.0);
}

#[test]
fn test_disabled_renders_end_with_no_frames() {
    let scheduler = setup();
    let counter = AnimatedCounter::new(
        scheduler.clone(),
        CountUpConfig::new(5.0, 200.0).with_enabled(false),
    );

    assert_eq!(counter.value(), 200.0);
    assert_eq!(scheduler.pending_count(), 0);
    assert_eq!(scheduler.run_until_idle(16.0, 100), 0);
}

#[test]
fn test_retarget_leaves_exactly_one_animation() {
    let scheduler = setup();
    let counter = AnimatedCounter::new(
        scheduler.clone(),
        CountUpConfig::new(0.0, 100.0).with_duration_ms(1000.0),
    );

    scheduler.run_frame(0.0);
    scheduler.run_frame(300.0);
    assert_eq!(scheduler.pending_count(), 1);

    // New pair mid-flight
    assert!(counter.set_range(100.0, 40.0));
    assert_eq!(counter.value(), 100.0);
    assert_eq!(scheduler.pending_count(), 1);

    let seen = record(&counter);
    scheduler.run_until_idle(16.0, 1000);

    // Never flickers back onto the old 0 -> 100 trajectory
    let seen = seen.lock();
    assert!(seen.iter().all(|v| (40.0..=100.0).contains(v)));
    assert!(seen.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(counter.value(), 40.0);
}

#[test]
fn test_rapid_retargets_never_stack_frames() {
    let scheduler = setup();
    let counter = AnimatedCounter::new(scheduler.clone(), CountUpConfig::new(0.0, 10.0));

    for i in 0..50 {
        counter.set_range(i as f64, i as f64 + 10.0);
        assert!(scheduler.pending_count() <= 1);
    }
    scheduler.run_until_idle(16.0, 1000);
    assert_eq!(counter.value(), 59.0);
}

#[test]
fn test_superseded_frame_already_in_batch_does_not_write() {
    let scheduler = setup();
    let counter = Arc::new(AnimatedCounter::new(
        scheduler.clone(),
        CountUpConfig::new(0.0, 100.0).with_duration_ms(1000.0),
    ));
    scheduler.run_frame(0.0);

    // A callback queued ahead of the counter's frame retargets the counter
    // during the same frame.
    let counter_clone = counter.clone();
    scheduler.request_frame(Box::new(move |_| {
        counter_clone.set_range(500.0, 600.0);
    }));
    // Restarting moves the counter's own frame behind it.
    assert!(counter.set_range(0.0, 101.0));

    scheduler.run_frame(500.0);
    assert_eq!(counter.value(), 500.0);
    assert_eq!(counter.config().end, 600.0);
}

#[test]
fn test_teardown_cancels_pending_frame() {
    let scheduler = setup();
    let counter = AnimatedCounter::new(scheduler.clone(), CountUpConfig::new(0.0, 100.0));
    assert_eq!(scheduler.pending_count(), 1);

    counter.teardown();
    assert_eq!(scheduler.pending_count(), 0);
    assert!(!counter.is_animating());

    drop(counter);
    assert_eq!(scheduler.pending_count(), 0);
}

#[test]
fn test_dropped_counter_cancels_its_frame() {
    let scheduler = setup();
    let counter = AnimatedCounter::new(scheduler.clone(), CountUpConfig::new(0.0, 100.0));
    scheduler.run_frame(0.0);
    assert_eq!(scheduler.pending_count(), 1);

    drop(counter);
    assert_eq!(scheduler.pending_count(), 0);
    assert_eq!(scheduler.tick(16.0), 0);
}

#[test]
fn test_finish_jumps_to_end_once() {
    let scheduler = setup();
    let counter = AnimatedCounter::new(scheduler.clone(), CountUpConfig::new(0.0, 100.0));
    let finished = Arc::new(AtomicUsize::new(0));
    let finished_clone = finished.clone();
    counter.finished().connect(move |_| {
        finished_clone.fetch_add(1, Ordering::SeqCst);
    });

    scheduler.run_frame(0.0);
    counter.finish();
    counter.finish();

    assert_eq!(counter.value(), 100.0);
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.pending_count(), 0);
}

#[test]
fn test_finished_fires_on_natural_completion() {
    let scheduler = setup();
    let counter = AnimatedCounter::new(
        scheduler.clone(),
        CountUpConfig::new(0.0, 3.0)
            .with_duration_ms(100.0)
            .with_easing(Easing::Linear),
    );
    let finished = Arc::new(Mutex::new(None));
    let finished_clone = finished.clone();
    counter.finished().connect(move |v| *finished_clone.lock() = Some(*v));

    scheduler.run_until_idle(16.0, 100);
    assert_eq!(*finished.lock(), Some(3.0));
}

#[test]
fn test_slot_can_read_counter_during_emit() {
    let scheduler = setup();
    let counter = Arc::new(AnimatedCounter::new(
        scheduler.clone(),
        CountUpConfig::new(0.0, 10.0).with_duration_ms(64.0),
    ));

    let weak = Arc::downgrade(&counter);
    let reads = Arc::new(AtomicUsize::new(0));
    let reads_clone = reads.clone();
    counter.value_changed().connect(move |v| {
        if let Some(counter) = weak.upgrade() {
            assert_eq!(counter.value(), *v);
            reads_clone.fetch_add(1, Ordering::SeqCst);
        }
    });

    scheduler.run_until_idle(16.0, 100);
    assert!(reads.load(Ordering::SeqCst) >= 4);
}

#[test]
fn test_large_magnitude_end_is_shown_exactly() {
    let scheduler = setup();
    for (end, decimals) in [(4_503_599_627_370_497.0, 0), (1e300, 15), (-9.0e18, 2)] {
        let counter = AnimatedCounter::new(
            scheduler.clone(),
            CountUpConfig::new(0.0, end)
                .with_duration_ms(500.0)
                .with_decimals(decimals),
        );
        scheduler.run_until_idle(16.0, 1000);
        assert_eq!(counter.value(), end, "end {end} at {decimals} dp");
        assert!(counter.value().is_finite());
    }
}
