//! Derived observables of a [`CartPendulum`].
//!
//! Nothing here is cached: every query is computed from the current body
//! state.

use std::f32::consts::PI;

use crate::constraints::DEGENERATE_LENGTH_SQ;
use crate::error::PhysicsError;
use crate::simulation::CartPendulum;

/// Angular position, angular velocity, cart position and cart velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Observation {
    /// Rod angle from vertical-down in (-pi, pi]; upright is +-pi.
    pub angle: f32,
    pub angular_velocity: f32,
    /// Horizontal offset of the cart from the track center.
    pub cart_position: f32,
    pub cart_velocity: f32,
}

impl Observation {
    #[must_use]
    pub fn to_array(&self) -> [f32; 4] {
        [
            self.angle,
            self.angular_velocity,
            self.cart_position,
            self.cart_velocity,
        ]
    }

    /// Scaled copy suitable as network input, with every component roughly
    /// in [-1, 1] over the useful range of the scenario.
    #[must_use]
    pub fn features(&self, groove_half_width: f32) -> [f32; 4] {
        let width = groove_half_width.max(f32::EPSILON);
        [
            self.angle / PI,
            self.angular_velocity / (2.0 * PI),
            self.cart_position / width,
            self.cart_velocity / width,
        ]
    }
}

impl CartPendulum {
    /// Signed rod angle in (-pi, pi], measured from vertical-down,
    /// counter-clockwise positive.
    #[must_use]
    pub fn bob_angular_position(&self) -> f32 {
        let r = self.bob().pos - self.cart().pos;
        let angle = r.x.atan2(-r.y);
        if angle <= -PI {
            PI
        } else {
            angle
        }
    }

    /// Angular velocity of the bob about the cart, `(rx*vy - ry*vx) / |r|^2`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::DegenerateGeometry`] if the cart and bob coincide.
    pub fn bob_angular_velocity(&self) -> Result<f32, PhysicsError> {
        let r = self.bob().pos - self.cart().pos;
        let v = self.bob().vel - self.cart().vel;
        let len_sq = r.length_squared();
        if len_sq < DEGENERATE_LENGTH_SQ {
            return Err(PhysicsError::DegenerateGeometry);
        }
        Ok(r.perp_dot(v) / len_sq)
    }

    #[must_use]
    pub fn cart_position(&self) -> f32 {
        let groove = self.groove();
        self.cart().pos.x - 0.5 * (groove.min_x + groove.max_x)
    }

    #[must_use]
    pub fn cart_velocity(&self) -> f32 {
        self.cart().vel.x
    }

    /// Full observation of the current state.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::DegenerateGeometry`] if the cart and bob coincide.
    pub fn observe(&self) -> Result<Observation, PhysicsError> {
        Ok(Observation {
            angle: self.bob_angular_position(),
            angular_velocity: self.bob_angular_velocity()?,
            cart_position: self.cart_position(),
            cart_velocity: self.cart_velocity(),
        })
    }

    /// `(angle, angular velocity)` for phase-portrait consumers.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::DegenerateGeometry`] if the cart and bob coincide.
    pub fn phase_point(&self) -> Result<(f32, f32), PhysicsError> {
        Ok((self.bob_angular_position(), self.bob_angular_velocity()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CartPendulumConfig;
    use approx::assert_relative_eq;

    fn sim_at(angle: f32) -> CartPendulum {
        CartPendulum::new(CartPendulumConfig::default().with_initial_angle(angle))
    }

    #[test]
    fn hanging_is_zero_and_upright_is_pi() {
        assert_relative_eq!(sim_at(0.0).bob_angular_position(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(sim_at(PI).bob_angular_position().abs(), PI, epsilon = 1e-5);
        assert_relative_eq!(sim_at(-PI).bob_angular_position().abs(), PI, epsilon = 1e-5);
    }

    #[test]
    fn angle_sign_follows_initial_angle() {
        assert_relative_eq!(sim_at(0.5).bob_angular_position(), 0.5, epsilon = 1e-5);
        assert_relative_eq!(sim_at(-2.0).bob_angular_position(), -2.0, epsilon = 1e-5);
    }

    #[test]
    fn default_start_is_at_threshold() {
        let angle = sim_at(-0.9 * PI).bob_angular_position();
        assert_relative_eq!(angle.abs(), 0.9 * PI, epsilon = 1e-5);
    }

    #[test]
    fn features_are_scaled() {
        let obs = Observation {
            angle: PI,
            angular_velocity: PI,
            cart_position: -150.0,
            cart_velocity: 300.0,
        };
        let f = obs.features(300.0);
        assert_relative_eq!(f[0], 1.0);
        assert_relative_eq!(f[1], 0.5);
        assert_relative_eq!(f[2], -0.5);
        assert_relative_eq!(f[3], 1.0);
    }

    #[test]
    fn zero_rod_is_degenerate() {
        let config = CartPendulumConfig {
            rod_length: 0.0,
            ..CartPendulumConfig::default()
        };
        let sim = CartPendulum::new(config);
        assert_eq!(sim.bob_angular_velocity(), Err(PhysicsError::DegenerateGeometry));
        assert!(sim.observe().is_err());
    }
}
