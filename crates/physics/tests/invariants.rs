//! Groove and pin invariants under pushes, idle ticks and resets.

use approx::assert_relative_eq;
use physics::{CartPendulum, CartPendulumConfig};

fn dt() -> f32 {
    CartPendulumConfig::dt()
}

#[test]
fn groove_and_pin_hold_every_tick() {
    let mut sim = CartPendulum::new(CartPendulumConfig::default());
    let initial_y = sim.cart().pos.y;

    // Alternate left, idle, right so the cart and bob both move around.
    for tick in 0..600 {
        match (tick / 30) % 3 {
            0 => sim.apply_horizontal_force(-6500.0),
            2 => sim.apply_horizontal_force(6500.0),
            _ => {}
        }
        sim.step(dt()).unwrap();

        assert_relative_eq!(sim.cart().pos.y, initial_y, epsilon = 1e-4);
        let rod = (sim.bob().pos - sim.cart().pos).length();
        assert_relative_eq!(rod, 150.0, epsilon = 1e-3);
    }
}

#[test]
fn cart_never_leaves_the_groove() {
    let mut sim = CartPendulum::new(CartPendulumConfig::default());
    for _ in 0..300 {
        sim.apply_horizontal_force(6500.0);
        sim.step(dt()).unwrap();
        assert!(sim.cart_position() <= 300.0 + 1e-3);
    }
    assert_relative_eq!(sim.cart_position(), 300.0, epsilon = 1e-3);
}

#[test]
fn reset_restores_construction_state() {
    let fresh = CartPendulum::new(CartPendulumConfig::default());
    let mut sim = fresh.clone();
    for _ in 0..120 {
        sim.apply_horizontal_force(6500.0);
        sim.step(dt()).unwrap();
    }
    assert!(sim.cart_position() > 1.0);

    sim.reset();

    assert_eq!(sim.cart(), fresh.cart());
    assert_eq!(sim.bob(), fresh.bob());
    assert_eq!(sim.observe().unwrap(), fresh.observe().unwrap());
}

#[test]
fn reset_discards_pending_force() {
    let mut sim = CartPendulum::new(CartPendulumConfig::default());
    sim.apply_horizontal_force(6500.0);
    sim.reset();
    sim.step(dt()).unwrap();
    assert!(sim.cart_velocity().abs() < 1.0);
}

fn assert_on_manifold(sim: &CartPendulum, initial_y: f32) {
    assert_relative_eq!(sim.cart().pos.y, initial_y, epsilon = 1e-4);
    let rod = (sim.bob().pos - sim.cart().pos).length();
    assert_relative_eq!(rod, sim.rod_length(), epsilon = 1e-3);
}

#[test]
fn drift_beyond_tolerance_is_counted_and_removed() {
    let config = CartPendulumConfig {
        drift_tolerance: 1e-6,
        ..CartPendulumConfig::default()
    };
    let mut sim = CartPendulum::new(config);
    let initial_y = sim.cart().pos.y;

    for tick in 0..240 {
        if (tick / 20) % 2 == 0 {
            sim.apply_horizontal_force(6500.0);
        } else {
            sim.apply_horizontal_force(-6500.0);
        }
        sim.step(dt()).unwrap();
        assert_on_manifold(&sim, initial_y);
    }
    assert!(sim.drift_corrections() > 0);
    assert!(sim.observe().unwrap().angular_velocity.is_finite());
}

#[test]
fn coarse_timestep_is_renormalized() {
    let mut sim = CartPendulum::new(CartPendulumConfig::default());
    let initial_y = sim.cart().pos.y;

    for _ in 0..20 {
        sim.step(0.2).unwrap();
        assert_on_manifold(&sim, initial_y);
    }
    assert!(sim.drift_corrections() > 0);
}

#[test]
fn reset_keeps_the_drift_count() {
    let config = CartPendulumConfig {
        drift_tolerance: 1e-6,
        ..CartPendulumConfig::default()
    };
    let mut sim = CartPendulum::new(config);
    for _ in 0..30 {
        sim.step(dt()).unwrap();
    }
    let count = sim.drift_corrections();
    assert!(count > 0);
    sim.reset();
    assert_eq!(sim.drift_corrections(), count);
}
