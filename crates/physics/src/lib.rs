#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Cart-Pendulum Physics
//!
//! A small constrained rigid-body simulation of a cart sliding on a
//! horizontal groove with a bob attached to it by a rigid rod.
//!
//! ## Key Components
//!
//! -   **Rigid Bodies:** [`RigidBody`] holds position, velocity, mass and the
//!     moment of inertia derived from its [`Shape`].
//! -   **Constraints:** [`GrooveConstraint`] keeps the cart on its segment and
//!     [`PinConstraint`] keeps the bob at a fixed distance from the cart.
//! -   **Simulation:** [`CartPendulum`] owns both bodies and both constraints,
//!     steps them at a fixed rate and answers observable queries through
//!     [`Observation`].
//!
//! ## Usage
//!
//! ```rust
//! use physics::{CartPendulum, CartPendulumConfig};
//!
//! let mut sim = CartPendulum::new(CartPendulumConfig::default());
//! sim.apply_horizontal_force(6500.0);
//! sim.step(CartPendulumConfig::dt())?;
//! let obs = sim.observe()?;
//! assert!(obs.cart_velocity > 0.0);
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod config;
pub mod constraints;
pub mod error;
pub mod integrator;
pub mod observation;
pub mod simulation;
pub mod types;

pub use config::{CartPendulumConfig, SIMULATION_RATE};
pub use constraints::{GrooveConstraint, PinConstraint};
pub use error::PhysicsError;
pub use observation::Observation;
pub use simulation::CartPendulum;
pub use types::{DrawState, RigidBody, Shape, Vec2};
