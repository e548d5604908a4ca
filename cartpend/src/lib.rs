#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # cartpend
//!
//! A cart sliding on a horizontal groove with a pendulum pinned to it, and a
//! small policy that learns to swing the pendulum up and keep it there.
//!
//! ## Project Architecture
//!
//! -   **[`physics`]:** the constrained two-body simulation. The cart is held
//!     on its groove, the bob is held at the rod length, and the simulator
//!     reports angle, angular velocity, cart position and cart velocity.
//! -   **[`ml`]:** tensors, layers and Adam, the two-action stochastic policy
//!     and the episode trainer that turns a group of rollouts into a
//!     group-relative policy-gradient update.
//! -   **`cartpend`:** this crate. [`app::Driver`] ties the two together and
//!     steps them frame by frame in manual, training or demo mode;
//!     [`config::AppConfig`] loads the JSON configuration; the binary exposes
//!     all of it on the command line.
//!
//! ## Getting Started
//!
//! ```text
//! cartpend train --iterations 50 --seed 1
//! cartpend demo --ticks 600 --seed 1
//! cartpend manual --script "RRRRRR------LLLLLL"
//! ```

pub mod app;
pub mod config;

pub use ml;
pub use physics;
