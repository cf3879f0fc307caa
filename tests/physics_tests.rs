use approx::assert_relative_eq;
use graviton_engine::{
    core::{CollisionEvent, EventQueue, Peer, Preset, SimulationConfig, StepOutcome},
    forces::{Attractor, GravityModel},
    math::Vector3,
    Body, Obstacle,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const FRAME: f32 = 1.0 / 60.0;

fn body_at(x: f32, y: f32, z: f32) -> Body {
    Body::new_unit(Vector3::new(x, y, z)).unwrap()
}

/// A configuration with every pull switched off
fn weightless() -> SimulationConfig {
    SimulationConfig {
        gravity_scale: 0.0,
        ..SimulationConfig::default()
    }
}

#[test]
fn test_body_creation() {
    let body = Body::new(Vector3::new(0.0, 10.0, 0.0), 2.5).unwrap();

    assert_eq!(body.get_position(), Vector3::new(0.0, 10.0, 0.0));
    assert!(body.get_velocity().is_zero());
    assert_eq!(body.get_radius(), 2.5);
    assert_eq!(body.get_gravity_weight(), 1.0);
    assert!(!body.is_static());
    assert!(!body.is_attractor());
    assert!(!body.has_sink());

    // Every body gets its own identity
    let other = body_at(0.0, 0.0, 0.0);
    assert_ne!(body.id(), other.id());
    assert_eq!(other.get_radius(), Body::DEFAULT_RADIUS);
}

#[test]
fn test_body_creation_rejects_bad_input() {
    assert!(Body::new(Vector3::zero(), 0.0).is_err());
    assert!(Body::new(Vector3::zero(), -1.0).is_err());
    assert!(Body::new(Vector3::zero(), f32::NAN).is_err());
    assert!(Body::new(Vector3::new(f32::INFINITY, 0.0, 0.0), 1.0).is_err());
    assert!(Obstacle::with_radius(Vector3::zero(), 0.0).is_err());
}

#[test]
fn test_overlap_resolution_separates_bodies() {
    let mut a = body_at(0.0, 0.0, 0.0);
    let mut b = body_at(1.0, 0.0, 0.0);
    let before = a.get_position().distance(&b.get_position());

    let contact = a.resolve(&mut b, Vector3::unit_y()).unwrap();

    let after = a.get_position().distance(&b.get_position());
    assert!(after > before);
    assert_relative_eq!(a.get_position(), Vector3::new(-0.5, 0.0, 0.0));
    assert_relative_eq!(b.get_position(), Vector3::new(1.5, 0.0, 0.0));

    assert_eq!(contact.other, Some(b.id()));
    assert_relative_eq!(contact.normal, Vector3::new(-1.0, 0.0, 0.0));
    assert_relative_eq!(contact.penetration, 1.0);
}

#[test]
fn test_no_collision_is_a_no_op() {
    let mut a = body_at(0.0, 0.0, 0.0);
    let mut b = body_at(3.0, 0.0, 0.0);
    a.set_velocity(Vector3::new(1.0, 0.0, 0.0));
    b.set_velocity(Vector3::new(-1.0, 0.0, 0.0));
    let (state_a, state_b) = (a.state(), b.state());

    assert!(a.resolve(&mut b, Vector3::unit_y()).is_none());

    assert_eq!(a.state(), state_a);
    assert_eq!(b.state(), state_b);

    // Touching exactly is not an overlap either
    let mut c = body_at(2.0, 0.0, 0.0);
    let state_c = c.state();
    assert!(a.resolve(&mut c, Vector3::unit_y()).is_none());
    assert_eq!(c.state(), state_c);
}

#[test]
fn test_head_on_velocities_are_exchanged() {
    let mut a = body_at(0.0, 0.0, 0.0);
    let mut b = body_at(1.5, 0.0, 0.0);
    a.set_velocity(Vector3::new(1.0, 0.0, 0.0));
    b.set_velocity(Vector3::new(-1.0, 0.0, 0.0));

    a.resolve(&mut b, Vector3::unit_y()).unwrap();

    assert_relative_eq!(a.get_velocity(), Vector3::new(-1.0, 0.0, 0.0));
    assert_relative_eq!(b.get_velocity(), Vector3::new(1.0, 0.0, 0.0));
}

#[test]
fn test_tangential_velocity_is_ignored() {
    let mut a = body_at(0.0, 0.0, 0.0);
    let mut b = body_at(1.5, 0.0, 0.0);
    a.set_velocity(Vector3::new(0.0, 3.0, 0.0));

    a.resolve(&mut b, Vector3::unit_y()).unwrap();

    assert_relative_eq!(a.get_velocity(), Vector3::new(0.0, 3.0, 0.0));
    assert!(b.get_velocity().is_zero());
}

#[test]
fn test_coincident_bodies_separate_without_nan() {
    let mut a = body_at(0.0, 0.0, 0.0);
    let mut b = body_at(0.0, 0.0, 0.0);

    let contact = a.resolve(&mut b, Vector3::unit_y()).unwrap();

    assert!(a.is_finite());
    assert!(b.is_finite());
    assert_relative_eq!(contact.normal, Vector3::unit_y());
    assert_relative_eq!(a.get_position(), Vector3::new(0.0, 1.0, 0.0));
    assert_relative_eq!(b.get_position(), Vector3::new(0.0, -1.0, 0.0));
}

#[test]
fn test_static_body_is_not_pushed() {
    let mut movable = body_at(0.0, 0.0, 0.0);
    let mut anchor = Body::new_static(Vector3::new(1.0, 0.0, 0.0), 1.0).unwrap();

    movable.resolve(&mut anchor, Vector3::unit_y()).unwrap();
    assert_eq!(anchor.get_position(), Vector3::new(1.0, 0.0, 0.0));
    assert_relative_eq!(movable.get_position(), Vector3::new(-0.5, 0.0, 0.0));

    // Resolving from the static side only moves the other body
    let mut other = body_at(1.5, 0.0, 0.0);
    anchor.resolve(&mut other, Vector3::unit_y()).unwrap();
    assert_eq!(anchor.get_position(), Vector3::new(1.0, 0.0, 0.0));
    assert!(other.get_position().x > 1.5);
}

#[test]
fn test_obstacle_collision() {
    let obstacle = Obstacle::new(Vector3::zero()).unwrap();
    let mut body = body_at(0.0, 0.5, 0.0);
    body.set_velocity(Vector3::new(0.0, -2.0, 0.0));

    let contact = body.resolve_obstacle(&obstacle, Vector3::unit_y()).unwrap();

    assert_eq!(contact.other, None);
    assert_relative_eq!(body.get_position(), Vector3::new(0.0, 0.875, 0.0));
    assert_relative_eq!(body.get_velocity(), Vector3::zero());
    assert_eq!(obstacle.get_position(), Vector3::zero());
    assert_eq!(obstacle.get_radius(), Obstacle::DEFAULT_RADIUS);
}

#[test]
fn test_collision_notifies_the_body_that_was_hit() {
    let queue = EventQueue::new();
    let mut hit = body_at(1.0, 0.0, 0.0).with_sink(queue.clone());
    let mut collider = body_at(0.0, 0.0, 0.0);
    collider.set_velocity(Vector3::new(5.0, 0.0, 0.0));

    collider.resolve(&mut hit, Vector3::unit_y()).unwrap();

    let events = queue.drain();
    assert_eq!(events.len(), 1);
    let event = events[0];
    assert_eq!(event.target, hit.id());
    assert_eq!(event.collider, collider.id());
    assert_eq!(event.collider_velocity, collider.get_velocity());
    assert_relative_eq!(event.penetration, 1.0);

    // The collider has no sink and the hit body's own resolve is not driven here
    assert!(queue.is_empty());
}

#[test]
fn test_collision_sink_ignores_non_overlapping_pairs() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let mut far = body_at(10.0, 0.0, 0.0).with_sink(move |_event: &CollisionEvent| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let mut near = body_at(0.0, 0.0, 0.0);

    assert!(near.resolve(&mut far, Vector3::unit_y()).is_none());
    assert_eq!(count.load(Ordering::SeqCst), 0);

    far.set_position(Vector3::new(1.0, 0.0, 0.0));
    assert!(near.resolve(&mut far, Vector3::unit_y()).is_some());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_collision_event_intensity() {
    let body = body_at(0.0, 0.0, 0.0);
    let mut event = CollisionEvent {
        target: body.id(),
        collider: body.id(),
        collider_velocity: Vector3::new(250.0, 0.0, 0.0),
        normal: Vector3::unit_x(),
        penetration: 0.1,
    };
    assert_relative_eq!(event.intensity(), 0.5);

    event.collider_velocity = Vector3::new(0.0, -1000.0, 0.0);
    assert_relative_eq!(event.intensity(), 1.0);
}

#[test]
fn test_boundary_reflection() {
    let mut body = body_at(5.0 + 1.0 + 0.01, 0.0, 0.0);
    body.set_velocity(Vector3::new(3.0, 0.0, 0.0));

    let hits = body.confine(Vector3::splat(5.0), 0.9);

    assert_eq!(hits, 1);
    assert_relative_eq!(body.get_position().x, 4.0);
    assert_relative_eq!(body.get_velocity().x, -2.7, epsilon = 1e-5);

    // A second call on the in-range body changes nothing
    let state = body.state();
    assert_eq!(body.confine(Vector3::splat(5.0), 0.9), 0);
    assert_eq!(body.state(), state);
}

#[test]
fn test_boundary_corner_hit() {
    let mut body = body_at(6.0, -6.0, 0.0);
    body.set_velocity(Vector3::new(1.0, -2.0, 4.0));

    let hits = body.confine(Vector3::splat(5.0), 0.9);

    assert_eq!(hits, 2);
    assert_relative_eq!(body.get_position(), Vector3::new(4.0, -4.0, 0.0));
    assert_relative_eq!(body.get_velocity(), Vector3::new(-0.9, 1.8, 4.0), epsilon = 1e-5);
}

#[test]
fn test_boundary_leaves_static_bodies_alone() {
    let mut body = Body::new_static(Vector3::new(50.0, 0.0, 0.0), 1.0).unwrap();
    body.set_velocity(Vector3::new(3.0, 0.0, 0.0));
    let state = body.state();

    assert_eq!(body.confine(Vector3::splat(5.0), 0.9), 0);
    assert_eq!(body.state(), state);
}

#[test]
fn test_boundary_thinner_than_body_pins_to_centre() {
    let mut body = body_at(0.5, 2.0, 0.0);
    body.set_velocity(Vector3::new(2.0, 1.0, 0.0));

    let hits = body.confine(Vector3::new(0.5, 5.0, 5.0), 0.9);

    assert_eq!(hits, 1);
    assert_eq!(body.get_position(), Vector3::new(0.0, 2.0, 0.0));
    assert_relative_eq!(body.get_velocity(), Vector3::new(-1.8, 1.0, 0.0), epsilon = 1e-6);

    // Already on the centre line, so nothing is reflected again
    assert_eq!(body.confine(Vector3::new(0.5, 5.0, 5.0), 0.9), 0);
    assert_relative_eq!(body.get_velocity(), Vector3::new(-1.8, 1.0, 0.0), epsilon = 1e-6);
}

#[test]
fn test_gravity_pull_is_bounded() {
    let model = GravityModel {
        max_distance: Vector3::splat(200.0),
        pull_clamp: Some(50.0),
    };

    let pull = model.pull(Vector3::zero(), Vector3::new(10.0, 0.0, 0.0));
    assert_relative_eq!(pull, Vector3::new(50.0, 0.0, 0.0), epsilon = 1e-4);

    let unclamped = GravityModel {
        pull_clamp: None,
        ..model
    };
    let pull = unclamped.pull(Vector3::zero(), Vector3::new(10.0, 0.0, 0.0));
    assert_relative_eq!(pull, Vector3::new(190.0, 0.0, 0.0));

    // A source on top of the body exerts nothing
    assert!(model.pull(Vector3::zero(), Vector3::zero()).is_zero());
}

#[test]
fn test_attract_skips_self() {
    let mut body = body_at(0.0, 0.0, 0.0);
    let own = Attractor::from(&body);

    assert!(!body.attract(&own, FRAME, &GravityModel::default()));
    assert!(body.get_velocity().is_zero());

    let fixed = Attractor::fixed(Vector3::new(0.0, 0.0, 10.0));
    assert!(body.attract(&fixed, FRAME, &GravityModel::default()));
    assert!(body.get_velocity().z > 0.0);
}

#[test]
fn test_gravity_converges_without_diverging() {
    let config = SimulationConfig::preset(Preset::Weighted);
    let attractors = [Attractor::fixed(Vector3::new(10.0, 0.0, 0.0))];
    let mut body = body_at(0.0, 0.0, 0.0);

    body.update(std::iter::empty(), &attractors, &config, FRAME);
    assert_relative_eq!(body.get_velocity().x, 50.0 * FRAME, epsilon = 1e-5);

    for _ in 0..1000 {
        body.update(std::iter::empty(), &attractors, &config, FRAME);

        assert!(body.is_finite());
        assert!(body.get_velocity().length() < 1000.0);
        assert!((body.get_position().x - 10.0).abs() < 20.0);
        assert_eq!(body.get_position().y, 0.0);
    }
}

#[test]
fn test_frame_skip_leaves_state_untouched() {
    let config = SimulationConfig::preset(Preset::Boxed);
    let mut body = body_at(100.0, 0.0, 0.0);
    let mut peer = body_at(0.5, 0.0, 0.0);
    body.set_velocity(Vector3::new(1.0, 2.0, 3.0));
    let (state, peer_state) = (body.state(), peer.state());
    let attractors = [Attractor::fixed(Vector3::zero())];

    let outcome = body.update([Peer::Body(&mut peer)], &attractors, &config, 1.5);

    assert_eq!(outcome, StepOutcome::Skipped);
    assert_eq!(body.state(), state);
    assert_eq!(peer.state(), peer_state);
}

#[test]
fn test_delta_at_skip_threshold_still_steps() {
    let config = SimulationConfig::default();
    let mut body = body_at(0.0, 0.0, 0.0);

    let outcome = body.update(std::iter::empty(), &[], &config, config.frame_skip_threshold);

    assert_eq!(outcome, StepOutcome::Stepped { contacts: 0 });
    assert_relative_eq!(body.get_velocity(), Vector3::new(0.0, -9.8, 0.0), epsilon = 1e-5);
    assert_relative_eq!(body.get_position(), Vector3::new(0.0, -9.8, 0.0), epsilon = 1e-5);

    // Just past the threshold the whole step is dropped
    let state = body.state();
    let outcome = body.update(std::iter::empty(), &[], &config, config.frame_skip_threshold + 0.01);
    assert_eq!(outcome, StepOutcome::Skipped);
    assert_eq!(body.state(), state);
}

#[test]
fn test_static_body_never_moves() {
    let config = SimulationConfig {
        domain: Some(Vector3::splat(4.0)),
        ..SimulationConfig::preset(Preset::Weighted)
    };
    let mut anchor = Body::new_static(Vector3::new(10.0, 0.0, 0.0), 1.0).unwrap();
    let mut peer = body_at(10.5, 0.0, 0.0);
    let obstacle = Obstacle::new(Vector3::new(9.5, 0.0, 0.0)).unwrap();
    let attractors = [Attractor::fixed(Vector3::new(-40.0, 0.0, 0.0))];

    for _ in 0..100 {
        anchor.update(
            [Peer::Body(&mut peer), Peer::Obstacle(&obstacle)],
            &attractors,
            &config,
            FRAME,
        );
        assert_eq!(anchor.get_position(), Vector3::new(10.0, 0.0, 0.0));
    }
}

#[test]
fn test_fallback_gravity_without_attractors() {
    let config = SimulationConfig::default();
    let mut body = body_at(0.0, 0.0, 0.0);

    body.update(std::iter::empty(), &[], &config, 0.1);

    assert_relative_eq!(body.get_velocity(), Vector3::new(0.0, -0.98, 0.0), epsilon = 1e-6);
    assert_relative_eq!(body.get_position(), Vector3::new(0.0, -0.098, 0.0), epsilon = 1e-6);
}

#[test]
fn test_speed_limit_clamps_velocity_length() {
    let config = SimulationConfig {
        speed_limit: Some(5.0),
        ..weightless()
    };
    let mut body = body_at(0.0, 0.0, 0.0);
    body.set_velocity(Vector3::new(30.0, 40.0, 0.0));

    body.update(std::iter::empty(), &[], &config, 0.5);

    assert_relative_eq!(body.get_velocity().length(), 5.0, epsilon = 1e-5);
    assert_relative_eq!(body.get_velocity(), Vector3::new(3.0, 4.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(body.get_position(), Vector3::new(1.5, 2.0, 0.0), epsilon = 1e-5);
}

#[test]
fn test_collisions_use_pre_gravity_velocity() {
    let config = SimulationConfig::default();
    let mut body = body_at(0.0, 0.0, 0.0);
    let mut peer = body_at(0.0, -1.5, 0.0);

    let outcome = body.update([Peer::Body(&mut peer)], &[], &config, 0.1);

    assert_eq!(outcome, StepOutcome::Stepped { contacts: 1 });
    // Both started at rest, so the exchange passed nothing to the peer
    assert!(peer.get_velocity().is_zero());
    assert_relative_eq!(body.get_velocity(), Vector3::new(0.0, -0.98, 0.0), epsilon = 1e-6);
}

#[test]
fn test_integration_scale() {
    let floating = weightless();
    let weighted = SimulationConfig {
        gravity_scale: 0.0,
        ..SimulationConfig::preset(Preset::Weighted)
    };

    let mut fast = body_at(0.0, 0.0, 0.0);
    let mut slow = body_at(0.0, 0.0, 0.0);
    fast.set_velocity(Vector3::new(6.0, 0.0, 0.0));
    slow.set_velocity(Vector3::new(6.0, 0.0, 0.0));

    fast.update(std::iter::empty(), &[], &floating, 0.5);
    slow.update(std::iter::empty(), &[], &weighted, 0.5);

    assert_relative_eq!(fast.get_position().x, 3.0, epsilon = 1e-6);
    assert_relative_eq!(slow.get_position().x, 0.3, epsilon = 1e-6);
}
