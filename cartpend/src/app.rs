//! # Cart-Pendulum Driver
//!
//! Owns the simulator, the policy, the trainer and the optimizer, and
//! advances them one frame at a time.
//!
//! The driver has three modes, cycled by the `toggle_mode` input:
//!
//! -   **Manual:** the held push buttons move the cart; the live reward is
//!     scored every tick.
//! -   **Training:** every frame runs one group of rollouts and applies the
//!     resulting update; the live simulator is left untouched.
//! -   **Demo:** the current policy drives the live simulator, drawing a new
//!     action every `frames_per_step` ticks.
//!
//! Inputs are consumed at frame boundaries only. A harness that wants a
//! window or a terminal view feeds [`InputFrame`]s and draws the returned
//! [`FrameOutput`].

use anyhow::{bail, Result};
use ml::{
    apply_action, ActionPair, Adam, EpisodeTrainer, GroupUpdate, PolicyAgent, TrainError,
};
use physics::{CartPendulum, CartPendulumConfig, DrawState};

use crate::config::AppConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Manual,
    Training,
    Demo,
}

impl Mode {
    /// Manual -> Training -> Demo -> Manual.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Mode::Manual => Mode::Training,
            Mode::Training => Mode::Demo,
            Mode::Demo => Mode::Manual,
        }
    }
}

/// Input sampled by the harness for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub reset: bool,
    pub toggle_mode: bool,
}

impl InputFrame {
    /// One script character: `L`, `R`, `B` (both), `-` (none), `r` (reset)
    /// or `t` (toggle mode).
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        let frame = match c {
            'L' => Self {
                left: true,
                ..Self::default()
            },
            'R' => Self {
                right: true,
                ..Self::default()
            },
            'B' => Self {
                left: true,
                right: true,
                ..Self::default()
            },
            '-' => Self::default(),
            'r' => Self {
                reset: true,
                ..Self::default()
            },
            't' => Self {
                toggle_mode: true,
                ..Self::default()
            },
            _ => return None,
        };
        Some(frame)
    }

    #[must_use]
    pub fn actions(&self) -> ActionPair {
        ActionPair::new(self.left, self.right)
    }
}

/// Parses a manual-play script, one frame per character. Whitespace is
/// ignored.
///
/// # Errors
///
/// Returns an error naming the first unknown character.
pub fn parse_script(script: &str) -> Result<Vec<InputFrame>> {
    let mut frames = Vec::with_capacity(script.len());
    for (i, c) in script.chars().enumerate() {
        if c.is_whitespace() {
            continue;
        }
        match InputFrame::from_char(c) {
            Some(frame) => frames.push(frame),
            None => bail!("unknown script character {c:?} at position {i}"),
        }
    }
    Ok(frames)
}

/// Everything a harness needs to present one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutput {
    pub draw: DrawState,
    pub cumulative_reward: f32,
    /// `(angle, angular velocity)` of the bob.
    pub phase_point: (f32, f32),
    pub mode: Mode,
}

pub struct Driver {
    sim: CartPendulum,
    /// Pristine simulator cloned for every training rollout.
    template: CartPendulum,
    agent: PolicyAgent,
    trainer: EpisodeTrainer,
    /// Scores the live simulator; separate from the rollout trainer.
    scorer: EpisodeTrainer,
    optimizer: Adam,
    rng: fastrand::Rng,
    mode: Mode,
    demo_action: ActionPair,
    demo_ticks: usize,
    frames: u64,
    iterations: u64,
}

impl Driver {
    #[must_use]
    pub fn new(config: AppConfig, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let agent = PolicyAgent::new(
            config.trainer.hidden_units,
            config.physics.groove_half_width,
            &mut rng,
        );
        let sim = CartPendulum::new(config.physics);
        Self {
            template: sim.clone(),
            sim,
            agent,
            trainer: EpisodeTrainer::new(config.trainer.clone()),
            scorer: EpisodeTrainer::new(config.trainer),
            optimizer: Adam::new(config.learning_rate),
            rng,
            mode: Mode::Manual,
            demo_action: ActionPair::NONE,
            demo_ticks: 0,
            frames: 0,
            iterations: 0,
        }
    }

    /// Advances one frame.
    ///
    /// `reset` is applied before `toggle_mode`; both before the mode's own
    /// work for this frame.
    ///
    /// # Errors
    ///
    /// Propagates simulator and trainer failures.
    pub fn tick(&mut self, input: InputFrame) -> Result<FrameOutput, TrainError> {
        if input.reset {
            self.reset();
        }
        if input.toggle_mode {
            self.set_mode(self.mode.next());
        }

        match self.mode {
            Mode::Manual => self.advance_live(input.actions())?,
            Mode::Training => {
                self.train_iteration()?;
            }
            Mode::Demo => {
                if self.demo_ticks % self.scorer.config().frames_per_step.max(1) == 0 {
                    let observation = self.sim.observe()?;
                    self.demo_action = self.agent.sample_action(&observation, &mut self.rng).actions;
                }
                self.demo_ticks += 1;
                self.advance_live(self.demo_action)?;
            }
        }

        self.frames += 1;
        self.current_frame()
    }

    /// Switches mode directly. The live simulator keeps its state.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.demo_ticks = 0;
        self.demo_action = ActionPair::NONE;
        tracing::info!(mode = ?self.mode, "mode changed");
    }

    /// Resets the live simulator and its reward.
    pub fn reset(&mut self) {
        self.sim.reset();
        self.scorer.reset_reward();
        self.demo_ticks = 0;
        self.demo_action = ActionPair::NONE;
        tracing::debug!(frame = self.frames, "live simulation reset");
    }

    /// Collects one group of rollouts and applies its gradient.
    ///
    /// # Errors
    ///
    /// Propagates simulator and trainer failures.
    pub fn train_iteration(&mut self) -> Result<GroupUpdate, TrainError> {
        let update = self
            .trainer
            .collect_group(&self.template, &self.agent, &mut self.rng)?;
        let mut pairs: Vec<_> = self
            .agent
            .params_mut()
            .into_iter()
            .zip(&update.gradients)
            .collect();
        self.optimizer.step(&mut pairs);
        self.iterations += 1;
        tracing::info!(
            iteration = self.iterations,
            mean_return = update.mean_return(),
            balanced = update.balanced,
            "policy updated"
        );
        Ok(update)
    }

    fn advance_live(&mut self, actions: ActionPair) -> Result<(), TrainError> {
        let push = self.sim.config().push_force;
        apply_action(&mut self.sim, actions, push);
        self.sim.step(CartPendulumConfig::dt())?;
        self.scorer.reward_for(&self.sim);
        Ok(())
    }

    /// The current frame, without advancing anything.
    ///
    /// # Errors
    ///
    /// Fails only on degenerate rod geometry.
    pub fn current_frame(&self) -> Result<FrameOutput, TrainError> {
        Ok(FrameOutput {
            draw: self.sim.draw_state(),
            cumulative_reward: self.scorer.episode().cumulative_reward(),
            phase_point: self.sim.phase_point()?,
            mode: self.mode,
        })
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn simulation(&self) -> &CartPendulum {
        &self.sim
    }

    #[must_use]
    pub fn agent(&self) -> &PolicyAgent {
        &self.agent
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

/// Runs `iterations` training updates and returns the mean return of each.
///
/// # Errors
///
/// Propagates simulator and trainer failures.
pub fn train(driver: &mut Driver, iterations: u64) -> Result<Vec<f32>> {
    tracing::info!(iterations, "Starting training...");
    let mut history = Vec::new();
    for _ in 0..iterations {
        let update = driver.train_iteration()?;
        history.push(update.mean_return());
    }
    if let (Some(first), Some(last)) = (history.first(), history.last()) {
        tracing::info!(first = *first, last = *last, "Training finished");
    }
    Ok(history)
}

/// Lets the current policy drive the live simulator for `ticks` frames,
/// starting from a reset.
///
/// # Errors
///
/// Propagates simulator failures.
pub fn demo(driver: &mut Driver, ticks: u64) -> Result<FrameOutput> {
    driver.set_mode(Mode::Demo);
    driver.reset();
    replay(driver, (0..ticks).map(|_| InputFrame::default()))
}

/// Feeds every frame to the driver and returns the last output.
///
/// # Errors
///
/// Propagates simulator failures.
pub fn replay<I>(driver: &mut Driver, frames: I) -> Result<FrameOutput>
where
    I: IntoIterator<Item = InputFrame>,
{
    let mut last = driver.current_frame()?;
    for frame in frames {
        last = driver.tick(frame)?;
        if driver.frames() % 60 == 0 {
            tracing::info!(
                frame = driver.frames(),
                angle = last.phase_point.0,
                reward = last.cumulative_reward,
                "Simulation progress"
            );
        }
    }
    Ok(last)
}
