#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Policy learning for the cart-pendulum
//!
//! Everything needed to train a stochastic push policy against
//! [`physics::CartPendulum`] with a group-relative policy gradient.
//!
//! ## Key Components
//!
//! -   **Tensors and layers:** [`Tensor`] is a flat `f32` buffer with a
//!     shape; [`nn`] provides [`Dense`] and [`Relu`] layers with
//!     hand-written backward passes, chained by [`Sequential`].
//! -   **Policy:** [`PolicyAgent`] maps an observation to two independent
//!     Bernoulli probabilities (push left, push right), samples from them and
//!     differentiates their log-probabilities.
//! -   **Trainer:** [`EpisodeTrainer`] shapes rewards with a one-way
//!     threshold hysteresis, runs rollouts and turns a group of them into a
//!     [`GroupUpdate`].
//! -   **Optimizers:** [`Adam`] and [`Sgd`] apply the update to the policy
//!     parameters.
//!
//! ## Usage
//!
//! ```rust
//! use ml::{Adam, EpisodeTrainer, PolicyAgent, TrainerConfig};
//! use physics::{CartPendulum, CartPendulumConfig};
//!
//! let config = CartPendulumConfig::default();
//! let sim = CartPendulum::new(config.clone());
//! let mut rng = fastrand::Rng::with_seed(7);
//! let mut agent = PolicyAgent::new(8, config.groove_half_width, &mut rng);
//! let mut trainer = EpisodeTrainer::new(TrainerConfig {
//!     group_size: 2,
//!     steps_per_episode: 5,
//!     ..TrainerConfig::default()
//! });
//! let mut adam = Adam::new(1e-2);
//!
//! let update = trainer.collect_group(&sim, &agent, &mut rng)?;
//! let mut pairs: Vec<_> = agent.params_mut().into_iter().zip(&update.gradients).collect();
//! adam.step(&mut pairs);
//! assert_eq!(update.returns.len(), 2);
//! # Ok::<(), ml::TrainError>(())
//! ```

pub mod error;
pub mod nn;
pub mod optim;
pub mod policy;
pub mod tensor;
pub mod trainer;

pub use error::TrainError;
pub use nn::{sigmoid, Dense, Layer, Relu, Sequential};
pub use optim::{Adam, Sgd};
pub use policy::{
    bernoulli_log_prob, compute_group_advantages, sample_from_probabilities, ActionPair,
    PolicyAgent, SampledAction,
};
pub use tensor::Tensor;
pub use trainer::{
    apply_action, build_update, Episode, EpisodeStep, EpisodeSummary, EpisodeTrainer,
    GroupUpdate, RewardPhase, SamplingMode, TrainerConfig,
};
