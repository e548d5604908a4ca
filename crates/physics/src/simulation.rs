//! # Cart-Pendulum Simulation Core
//!
//! [`CartPendulum`] owns the cart and bob bodies together with the groove
//! and pin constraints that bind them. Each call to [`CartPendulum::step`]
//! integrates forces, solves both constraints at the velocity level,
//! advances positions and finally removes any positional drift so the two
//! invariants hold after every tick:
//!
//! - the cart stays at the groove height, inside the groove;
//! - the cart-to-bob distance equals the rod length.

use crate::config::CartPendulumConfig;
use crate::constraints::{rod_direction, GrooveConstraint, PinConstraint};
use crate::error::PhysicsError;
use crate::integrator::{apply_force, apply_gravity, damp_horizontal, integrate_position};
use crate::types::{DrawState, RigidBody, Shape, Vec2};

/// Cart on a horizontal groove with a bob pinned to it by a rigid rod.
#[derive(Clone, Debug)]
pub struct CartPendulum {
    cart: RigidBody,
    bob: RigidBody,
    groove: GrooveConstraint,
    pin: PinConstraint,
    config: CartPendulumConfig,
    /// Horizontal force accumulated for the next step only.
    pending_force: f32,
    force_applied: bool,
    drift_corrections: u64,
}

impl CartPendulum {
    /// Builds the scenario described by `config` with both bodies at rest.
    #[must_use]
    pub fn new(config: CartPendulumConfig) -> Self {
        let groove = GrooveConstraint::centered(config.groove_y, config.groove_half_width);
        let pin = PinConstraint {
            length: config.rod_length,
        };
        let (cart, bob) = initial_bodies(&config);
        Self {
            cart,
            bob,
            groove,
            pin,
            config,
            pending_force: 0.0,
            force_applied: false,
            drift_corrections: 0,
        }
    }

    /// Applies a horizontal force to the cart for the next [`step`](Self::step) only.
    ///
    /// Calls within the same tick accumulate, so opposite pushes cancel.
    pub fn apply_horizontal_force(&mut self, magnitude: f32) {
        self.pending_force += magnitude;
        self.force_applied = true;
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidTimestep`] if `dt` is not a positive
    /// finite number, and [`PhysicsError::DegenerateGeometry`] if the cart
    /// and bob coincide. The pending force is consumed in both cases; the
    /// bodies are left exactly as they were.
    pub fn step(&mut self, dt: f32) -> Result<(), PhysicsError> {
        let force = std::mem::take(&mut self.pending_force);
        let force_applied = std::mem::take(&mut self.force_applied);
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(PhysicsError::InvalidTimestep(dt));
        }
        rod_direction(self.cart.pos, self.bob.pos)?;
        let saved = (self.cart, self.bob);

        // 1. Forces
        let gravity = Vec2::new(0.0, -self.config.gravity);
        apply_gravity(&mut self.bob, gravity, dt);
        if force_applied {
            apply_force(&mut self.cart, Vec2::new(force, 0.0), dt);
        } else {
            damp_horizontal(&mut self.cart, self.config.cart_damping);
        }

        // 2. Velocity constraints
        self.groove.solve_velocity(&mut self.cart);
        self.pin.solve_velocity(&mut self.cart, &mut self.bob)?;

        // 3. Positions
        integrate_position(&mut self.cart, dt);
        integrate_position(&mut self.bob, dt);

        // 4. Drift recovery
        let groove_drift = self.groove.correct_position(&mut self.cart);
        let rod_drift = match self.pin.correct_position(&self.cart, &mut self.bob) {
            Ok(drift) => drift,
            Err(err) => {
                (self.cart, self.bob) = saved;
                return Err(err);
            }
        };
        let drift = groove_drift.max(rod_drift);
        if drift > self.config.drift_tolerance {
            self.drift_corrections += 1;
            tracing::warn!(
                groove_drift,
                rod_drift,
                "constraint drift beyond tolerance, bodies renormalized"
            );
        }
        Ok(())
    }

    /// Restores both bodies to their construction state.
    pub fn reset(&mut self) {
        let (cart, bob) = initial_bodies(&self.config);
        self.cart = cart;
        self.bob = bob;
        self.pending_force = 0.0;
        self.force_applied = false;
    }

    #[must_use]
    pub fn cart(&self) -> &RigidBody {
        &self.cart
    }

    #[must_use]
    pub fn bob(&self) -> &RigidBody {
        &self.bob
    }

    #[must_use]
    pub fn config(&self) -> &CartPendulumConfig {
        &self.config
    }

    #[must_use]
    pub fn groove(&self) -> &GrooveConstraint {
        &self.groove
    }

    #[must_use]
    pub fn rod_length(&self) -> f32 {
        self.pin.length
    }

    /// Number of steps whose drift exceeded the configured tolerance.
    #[must_use]
    pub fn drift_corrections(&self) -> u64 {
        self.drift_corrections
    }

    /// Snapshot for the renderer.
    #[must_use]
    pub fn draw_state(&self) -> DrawState {
        DrawState {
            cart_pos: self.cart.pos.to_array(),
            bob_pos: self.bob.pos.to_array(),
            angle: self.bob_angular_position(),
            bob_radius: self.config.bob_radius,
            cart_size: self.config.cart_size,
        }
    }
}

fn initial_bodies(config: &CartPendulumConfig) -> (RigidBody, RigidBody) {
    let [width, height] = config.cart_size;
    let cart_pos = Vec2::new(0.0, config.groove_y);
    let cart = RigidBody::new(cart_pos, config.cart_mass, Shape::Box { width, height });

    // Angle is measured from vertical-down, counter-clockwise positive.
    let (sin, cos) = config.initial_angle.sin_cos();
    let bob_pos = cart_pos + Vec2::new(sin, -cos) * config.rod_length;
    let bob = RigidBody::new(
        bob_pos,
        config.bob_mass,
        Shape::Circle {
            radius: config.bob_radius,
        },
    );
    (cart, bob)
}
