//! Integration tests for the background components
//!
//! These tests verify:
//! - Particle invariants (bounded positions, lifetimes, damping)
//! - Proximity pass cost
//! - Surface resize idempotence
//! - Mount/unmount lifecycle and teardown completeness
//! - Bloom loading, cancellation and reduced motion

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use documind_background::testing::{
    DrawCommand, MockGpuDevice, MockGpuFactory, RecordingCanvas, OBJECTS_PER_DEVICE,
};
use documind_background::{
    load_device, BloomOptions, BloomPhase, BounceTuning, CelestialBloom, Constellation, FlowField,
    FlowParticle, FlowTuning, GpuFactory, LoadError, NeuralBackground, NeuralProps, OverlayProps, ParticleOverlay,
    SimulationConfig, Size, SurfaceSize, Vec2,
};
use documind_hal::{CancelToken, EventKind, HostEvent};
use documind_hal_mock::{MockHal, MockHost};
use fastrand::Rng;
use futures::channel::oneshot;
use futures::executor::{block_on, LocalPool};
use futures::task::LocalSpawnExt;

fn neural_props(count: usize) -> NeuralProps {
    NeuralProps {
        particle_count: count,
        ..Default::default()
    }
}

// =============================================================================
// Particle Invariants
// =============================================================================

#[test]
fn test_flow_positions_stay_in_bounds() {
    let mut rng = Rng::with_seed(2024);
    for case in 0..20 {
        let width = 1.0 + rng.f32() * 1500.0;
        let height = 1.0 + rng.f32() * 900.0;
        let mut config = SimulationConfig::new(Size::new(width, height), 0.2 + rng.f32() * 3.0);
        let mut field = FlowField::new(40, config, case);

        for frame in 0..300 {
            if frame % 7 == 0 {
                config.pointer = Some(Vec2::new(rng.f32() * width, rng.f32() * height));
                field.set_pointer(config.pointer);
            }
            if frame % 50 == 0 {
                field.set_pointer(None);
            }
            field.step();

            for p in field.particles() {
                assert!(p.position.is_finite());
                assert!(
                    p.position.x >= 0.0 && p.position.x < width,
                    "x={} width={}",
                    p.position.x,
                    width
                );
                assert!(p.position.y >= 0.0 && p.position.y < height);
            }
        }
    }
}

#[test]
fn test_constellation_positions_stay_in_bounds() {
    let mut rng = Rng::with_seed(77);
    let mut canvas = RecordingCanvas::new();
    for case in 0..10 {
        let tuning = BounceTuning {
            max_speed: 40.0 + rng.f32() * 200.0,
            ..Default::default()
        };
        let mut bounds = Size::new(1.0 + rng.f32() * 1200.0, 1.0 + rng.f32() * 800.0);
        let mut sky = Constellation::new(30, bounds, tuning, case);

        for frame in 0..200 {
            if frame == 100 {
                bounds = Size::new(bounds.width * rng.f32(), bounds.height * rng.f32());
                sky.resize(bounds);
            }
            sky.frame(&mut canvas);
            canvas.take_commands();

            for p in sky.particles() {
                assert!(p.position.is_finite());
                assert!(
                    p.position.x >= 0.0 && p.position.x <= bounds.width,
                    "frame {} x={} width={}",
                    frame,
                    p.position.x,
                    bounds.width
                );
                assert!(p.position.y >= 0.0 && p.position.y <= bounds.height);
            }
        }
    }
}

#[test]
fn test_flow_age_never_exceeds_life() {
    let config = SimulationConfig::new(Size::new(500.0, 400.0), 1.0);
    let mut field = FlowField::new(60, config, 77);
    let mut respawns = 0;

    for _ in 0..1000 {
        let before: Vec<u32> = field.particles().iter().map(|p| p.age).collect();
        field.step();
        for (p, age_before) in field.particles().iter().zip(before) {
            assert!(p.age <= p.life);
            if p.age < age_before {
                assert_eq!(p.age, 0);
                respawns += 1;
            }
        }
    }
    assert!(respawns > 0, "particles should respawn within 1000 frames");
}

#[test]
fn test_flow_speed_non_increasing_without_forces() {
    let tuning = FlowTuning {
        flow_gain: 0.0,
        ..Default::default()
    };
    let config = SimulationConfig::new(Size::new(800.0, 600.0), 1.0).with_tuning(tuning);
    let mut rng = Rng::with_seed(5);

    let mut p = FlowParticle {
        position: Vec2::new(400.0, 300.0),
        velocity: Vec2::new(3.0, -4.0),
        age: 0,
        life: 250,
    };
    let mut speed = p.velocity.length();
    for _ in 0..200 {
        p = p.step(&config, &mut rng);
        let next = p.velocity.length();
        assert!(next <= speed + 1e-6);
        speed = next;
    }
}

#[test]
fn test_overlay_considers_every_pair_once() {
    let host = MockHost::new(1280.0, 720.0);
    let overlay =
        ParticleOverlay::mount(host.host(), RecordingCanvas::new(), OverlayProps::default()).unwrap();

    host.scheduler.run_frames(1);
    let stats = overlay.last_stats();
    assert_eq!(stats.pairs_considered, 55 * 54 / 2);
    assert!(stats.links <= stats.pairs_considered);
}

#[test]
fn test_overlay_link_alpha_bounded() {
    let host = MockHost::new(200.0, 200.0);
    let canvas = RecordingCanvas::new();
    let _overlay = ParticleOverlay::mount(
        host.host(),
        canvas.clone(),
        OverlayProps {
            particle_count: 40,
            ..Default::default()
        },
    )
    .unwrap();

    host.scheduler.run_frames(3);
    assert!(canvas.line_count() > 0, "dense overlay should draw links");
    for command in canvas.commands() {
        if let DrawCommand::Line { start, end, .. } = command {
            assert!(start.alpha() > 0.0 && start.alpha() <= 0.35);
            assert!(end.alpha() <= start.alpha());
        }
    }
}

// =============================================================================
// Surface Sizing
// =============================================================================

#[test]
fn test_resize_is_idempotent() {
    let host = MockHost::with_hal(MockHal::with_pixel_ratio(2.0), 640.0, 480.0);
    let canvas = RecordingCanvas::new();
    let bg = NeuralBackground::mount(host.host(), canvas.clone(), neural_props(10)).unwrap();
    assert_eq!(canvas.configure_count(), 1);
    assert_eq!(canvas.last_size().unwrap().physical_width, 1280);

    host.events.dispatch(HostEvent::Resize);
    assert_eq!(canvas.configure_count(), 1, "same layout must not reconfigure");

    host.layout.set_size(800.0, 600.0);
    host.events.dispatch(HostEvent::Resize);
    host.events.dispatch(HostEvent::Resize);
    assert_eq!(canvas.configure_count(), 2);

    let size = bg.surface_size().unwrap();
    assert_eq!(size.logical, Size::new(800.0, 600.0));
    assert_eq!(bg.config().bounds, Size::new(800.0, 600.0));
}

#[test]
fn test_bloom_pixel_ratio_capped() {
    let host = MockHost::with_hal(MockHal::with_pixel_ratio(3.0), 800.0, 600.0);
    let bloom: CelestialBloom<MockGpuDevice> = CelestialBloom::new(host.host(), BloomOptions::default());
    let size = bloom.surface_size().unwrap();
    assert_eq!(size.pixel_ratio, 1.5);
    assert_eq!(size.physical_width, 1200);
    assert_eq!(size.physical_height, 900);
}

// =============================================================================
// Flow-Field Component
// =============================================================================

#[test]
fn test_neural_end_to_end_ten_particles() {
    let host = MockHost::new(1024.0, 768.0);
    let bg = NeuralBackground::mount(host.host(), RecordingCanvas::new(), neural_props(10)).unwrap();

    let mut previous: Vec<Vec2> = bg.particles().iter().map(|p| p.position).collect();
    let mut travelled = vec![0.0f32; 10];

    for _ in 0..5 {
        assert_eq!(host.scheduler.run_frames(1), 1);
        let particles = bg.particles();
        assert_eq!(particles.len(), 10);
        for (i, p) in particles.iter().enumerate() {
            assert!(!p.position.x.is_nan() && !p.position.y.is_nan());
            travelled[i] += p.position.distance(previous[i]);
            previous[i] = p.position;
        }
    }

    assert!(travelled.iter().all(|d| *d > 0.0), "travelled: {:?}", travelled);
    assert_eq!(bg.frames_drawn(), 5);
}

#[test]
fn test_neural_frame_draw_order() {
    let host = MockHost::new(300.0, 300.0);
    let canvas = RecordingCanvas::new();
    let _bg = NeuralBackground::mount(host.host(), canvas.clone(), neural_props(4)).unwrap();
    canvas.take_commands();

    host.scheduler.run_frames(1);
    let commands = canvas.take_commands();
    assert_eq!(commands.len(), 5);
    match commands[0] {
        DrawCommand::FillAll(color) => {
            assert!((color.alpha() - 0.10).abs() < 1e-6)
        }
        other => panic!("expected trail fade first, got {:?}", other),
    }
}

#[test]
fn test_neural_pointer_tracking() {
    let host = MockHost::new(400.0, 400.0);
    let bg = NeuralBackground::mount(host.host(), RecordingCanvas::new(), neural_props(5)).unwrap();
    assert!(bg.config().pointer.is_none());

    host.events.dispatch(HostEvent::PointerMove { x: 120.0, y: 80.0 });
    assert_eq!(bg.config().pointer, Some(Vec2::new(120.0, 80.0)));

    host.events.dispatch(HostEvent::PointerLeave);
    assert!(bg.config().pointer.is_none());
}

#[test]
fn test_neural_teardown_completeness() {
    let host = MockHost::new(640.0, 480.0);
    let mut bg = NeuralBackground::mount(host.host(), RecordingCanvas::new(), neural_props(20)).unwrap();
    assert_eq!(host.events.listener_count(), 3);
    assert_eq!(host.events.listener_count_for(EventKind::Resize), 1);
    assert!(host.scheduler.has_callback());

    host.scheduler.run_frames(3);
    bg.unmount();

    assert_eq!(host.events.listener_count(), 0);
    assert!(!host.scheduler.has_callback());
    assert_eq!(host.scheduler.run_frames(10), 0);
    assert_eq!(bg.frames_drawn(), 3);
    assert!(!bg.is_mounted());

    // Idempotent
    bg.unmount();
    assert!(host.hal.has_log_containing("[neural] unmounted after 3 frames"));
    assert_eq!(
        host.hal
            .get_debug_log()
            .iter()
            .filter(|l| l.contains("unmounted"))
            .count(),
        1
    );
}

#[test]
fn test_drop_unmounts() {
    let host = MockHost::new(640.0, 480.0);
    let overlay =
        ParticleOverlay::mount(host.host(), RecordingCanvas::new(), OverlayProps::default()).unwrap();
    assert_eq!(host.events.listener_count(), 1);

    drop(overlay);
    assert_eq!(host.events.listener_count(), 0);
    assert!(!host.scheduler.has_callback());
}

#[test]
fn test_mount_failure_releases_everything() {
    let host = MockHost::new(640.0, 480.0);
    host.events.fail_listen(true);

    let result = NeuralBackground::mount(host.host(), RecordingCanvas::new(), neural_props(10));
    assert!(result.is_err());
    assert_eq!(host.events.listener_count(), 0);
    assert!(!host.scheduler.has_callback());
    assert_eq!(host.scheduler.run_frames(5), 0);
}

// =============================================================================
// Bloom Lifecycle
// =============================================================================

fn load_now(bloom: &mut CelestialBloom<MockGpuDevice>, factory: &MockGpuFactory) {
    let (token, size) = bloom.begin_load().expect("load should start");
    let result = block_on(load_device(factory, size, &token));
    bloom.finish_load(result);
}

#[test]
fn test_bloom_runs_frame_loop() {
    let host = MockHost::new(800.0, 600.0);
    let factory = MockGpuFactory::new();
    let mut bloom = CelestialBloom::new(host.host(), BloomOptions::default());
    assert_eq!(bloom.phase(), BloomPhase::Unloaded);

    load_now(&mut bloom, &factory);
    assert_eq!(bloom.phase(), BloomPhase::Running);
    assert_eq!(factory.live_objects(), OBJECTS_PER_DEVICE);

    host.scheduler.run_frames(6);
    let ledger = factory.ledger();
    assert_eq!(ledger.renders.len(), 6);
    assert_eq!(ledger.renders[0].time, 0.0);
    assert!(ledger.renders[5].time > ledger.renders[1].time);
    assert_eq!(ledger.renders[0].resolution, [800.0, 600.0]);
    assert_eq!(bloom.frames_rendered(), 6);
}

#[test]
fn test_bloom_begin_load_only_once() {
    let host = MockHost::new(100.0, 100.0);
    let mut bloom: CelestialBloom<MockGpuDevice> = CelestialBloom::new(host.host(), BloomOptions::default());
    assert!(bloom.begin_load().is_some());
    assert!(bloom.begin_load().is_none());
    assert_eq!(bloom.phase(), BloomPhase::Loading);
}

#[test]
fn test_bloom_reduced_motion_renders_once() {
    let host = MockHost::with_hal(MockHal::with_reduced_motion(), 800.0, 600.0);
    let factory = MockGpuFactory::new();
    let mut bloom = CelestialBloom::new(host.host(), BloomOptions::default());

    load_now(&mut bloom, &factory);
    assert_eq!(bloom.phase(), BloomPhase::StaticFrame);

    assert_eq!(host.scheduler.advance(1000.0), 0);
    assert_eq!(factory.render_count(), 1);
    assert_eq!(factory.ledger().renders[0].time, 1.0);
    assert_eq!(host.scheduler.start_calls(), 0);
    assert!(!host.scheduler.has_callback());
    assert!(!bloom.is_running());
}

#[test]
fn test_bloom_static_rerender_failure_is_logged() {
    let host = MockHost::with_hal(MockHal::with_reduced_motion(), 800.0, 600.0);
    let factory = MockGpuFactory::new();
    let mut bloom = CelestialBloom::new(host.host(), BloomOptions::default());
    load_now(&mut bloom, &factory);
    assert_eq!(factory.render_count(), 1);

    factory.fail_renders(true);
    host.layout.set_size(1024.0, 768.0);
    host.events.dispatch(HostEvent::Resize);

    assert_eq!(factory.ledger().resizes.len(), 1);
    assert_eq!(factory.render_count(), 1);
    assert!(host.hal.has_log_containing("[bloom] static frame failed"));
    assert_eq!(bloom.phase(), BloomPhase::StaticFrame);

    factory.fail_renders(false);
    host.layout.set_size(640.0, 480.0);
    host.events.dispatch(HostEvent::Resize);
    assert_eq!(factory.render_count(), 2);
}

#[test]
fn test_bloom_teardown_releases_gpu() {
    let host = MockHost::new(800.0, 600.0);
    let factory = MockGpuFactory::new();
    let mut bloom = CelestialBloom::new(host.host(), BloomOptions::default());
    load_now(&mut bloom, &factory);
    host.scheduler.run_frames(3);
    assert_eq!(host.events.listener_count(), 1);

    bloom.unmount();
    assert_eq!(bloom.phase(), BloomPhase::Disposed);
    assert_eq!(factory.live_objects(), 0);
    assert_eq!(factory.ledger().devices_released, 1);
    assert_eq!(host.events.listener_count(), 0);
    assert_eq!(host.scheduler.run_frames(10), 0);
    assert_eq!(factory.render_count(), 3);

    bloom.unmount();
    assert_eq!(factory.ledger().devices_released, 1);
}

#[test]
fn test_bloom_resize_reconfigures_device() {
    let host = MockHost::new(800.0, 600.0);
    let factory = MockGpuFactory::new();
    let mut bloom = CelestialBloom::new(host.host(), BloomOptions::default());
    load_now(&mut bloom, &factory);

    host.layout.set_size(1024.0, 768.0);
    host.events.dispatch(HostEvent::Resize);
    host.events.dispatch(HostEvent::Resize);

    let resizes = factory.ledger().resizes;
    assert_eq!(resizes.len(), 1);
    assert_eq!(resizes[0].physical_width, 1024);

    host.scheduler.run_frames(1);
    assert_eq!(factory.ledger().renders[0].resolution, [1024.0, 768.0]);
}

#[test]
fn test_bloom_unmount_before_load_acquires_nothing() {
    let host = MockHost::new(800.0, 600.0);
    let factory = MockGpuFactory::new();
    let mut bloom = CelestialBloom::new(host.host(), BloomOptions::default());

    let (token, size) = bloom.begin_load().unwrap();
    bloom.unmount();

    let result = block_on(load_device(&factory, size, &token));
    assert_eq!(result.as_ref().err(), Some(&LoadError::Cancelled));
    bloom.finish_load(result);

    let ledger = factory.ledger();
    assert_eq!(ledger.create_calls, 0);
    assert_eq!(ledger.live_objects, 0);
    assert_eq!(bloom.phase(), BloomPhase::Disposed);
    assert_eq!(host.events.listener_count(), 0);
}

/// Factory whose device only materializes once the test opens the gate
struct GatedFactory {
    inner: MockGpuFactory,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl GpuFactory for GatedFactory {
    type Device = MockGpuDevice;

    fn create_device(
        &self,
        _size: SurfaceSize,
        _token: &CancelToken,
    ) -> impl Future<Output = Result<MockGpuDevice, LoadError>> {
        let gate = self.gate.borrow_mut().take();
        let inner = self.inner.clone();
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(inner.create_now())
        }
    }
}

#[test]
fn test_bloom_unmount_during_load_discards_device() {
    let host = MockHost::new(800.0, 600.0);
    let (open, gate) = oneshot::channel();
    let factory = Rc::new(GatedFactory {
        inner: MockGpuFactory::new(),
        gate: RefCell::new(Some(gate)),
    });
    let mut bloom = CelestialBloom::new(host.host(), BloomOptions::default());

    let (token, size) = bloom.begin_load().unwrap();
    let slot = Rc::new(RefCell::new(None));

    let mut pool = LocalPool::new();
    {
        let factory = factory.clone();
        let slot = slot.clone();
        pool.spawner()
            .spawn_local(async move {
                let result = load_device(&*factory, size, &token).await;
                *slot.borrow_mut() = Some(result);
            })
            .unwrap();
    }

    pool.run_until_stalled();
    assert!(slot.borrow().is_none(), "load should be pending on the gate");

    bloom.unmount();
    open.send(()).unwrap();
    pool.run_until_stalled();

    let result = slot.borrow_mut().take().unwrap();
    assert_eq!(result.as_ref().err(), Some(&LoadError::Cancelled));
    bloom.finish_load(result);

    let ledger = factory.inner.ledger();
    assert_eq!(ledger.devices_created, 1);
    assert_eq!(ledger.devices_released, 1);
    assert_eq!(ledger.live_objects, 0);
    assert!(ledger.renders.is_empty());
    assert_eq!(bloom.phase(), BloomPhase::Disposed);
    assert_eq!(host.scheduler.start_calls(), 0);
}

#[test]
fn test_bloom_stale_device_released_on_finish() {
    let host = MockHost::new(800.0, 600.0);
    let factory = MockGpuFactory::new();
    let mut bloom = CelestialBloom::new(host.host(), BloomOptions::default());
    bloom.begin_load().unwrap();
    bloom.unmount();

    // A loader that ignored the token still cannot leak
    bloom.finish_load(Ok(factory.create_now()));
    assert_eq!(factory.live_objects(), 0);
    assert_eq!(factory.render_count(), 0);
}

#[test]
fn test_bloom_load_failure_disposes() {
    let host = MockHost::new(800.0, 600.0);
    let factory = MockGpuFactory::new();
    factory.fail_with(LoadError::AdapterUnavailable);
    let mut bloom = CelestialBloom::new(host.host(), BloomOptions::default());

    load_now(&mut bloom, &factory);
    assert_eq!(bloom.phase(), BloomPhase::Disposed);
    assert!(host
        .hal
        .has_log_containing("[bloom] GPU setup failed: Failed to find suitable GPU adapter"));
    assert_eq!(host.scheduler.start_calls(), 0);
    assert_eq!(factory.live_objects(), 0);
}
