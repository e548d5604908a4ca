mod common;

use approx::assert_relative_eq;
use ml::{build_update, ActionPair, EpisodeTrainer, PolicyAgent, TrainerConfig};
use physics::Observation;

const EPS: f32 = 1e-3;

fn numeric_grad<F: Fn(&PolicyAgent) -> f32>(agent: &mut PolicyAgent, p: usize, i: usize, f: F) -> f32 {
    agent.params_mut()[p].data[i] += EPS;
    let plus = f(agent);
    agent.params_mut()[p].data[i] -= 2.0 * EPS;
    let minus = f(agent);
    agent.params_mut()[p].data[i] += EPS;
    (plus - minus) / (2.0 * EPS)
}

#[test]
fn log_prob_gradient_matches_finite_difference() {
    let mut agent = common::seeded_agent(17);
    let obs = Observation {
        angle: 2.5,
        angular_velocity: -3.0,
        cart_position: 40.0,
        cart_velocity: -120.0,
    };
    for actions in [
        ActionPair::new(true, false),
        ActionPair::new(false, true),
        ActionPair::new(true, true),
        ActionPair::NONE,
    ] {
        let mut grads = agent.zero_grads();
        agent.accumulate_log_prob_grad(&obs, actions, 1.0, &mut grads);
        for (p, grad) in grads.iter().enumerate() {
            for i in 0..grad.len() {
                let numeric = numeric_grad(&mut agent, p, i, |a| a.log_prob(&obs, actions));
                assert_relative_eq!(grad.data[i], numeric, epsilon = 1e-2, max_relative = 2e-2);
            }
        }
    }
}

#[test]
fn output_bias_gradient_is_action_minus_probability() {
    let agent = common::constant_agent(0.0, 2.0);
    let obs = Observation::default();
    let probs = agent.forward(&obs);
    let mut grads = agent.zero_grads();
    agent.accumulate_log_prob_grad(&obs, ActionPair::new(true, false), 0.5, &mut grads);
    // output bias is the last parameter
    let bias = &grads[3];
    assert_relative_eq!(bias.data[0], 0.5 * (1.0 - probs[0]), epsilon = 1e-6);
    assert_relative_eq!(bias.data[1], 0.5 * (0.0 - probs[1]), epsilon = 1e-6);
}

#[test]
fn group_objective_gradient_matches_finite_difference() {
    let mut agent = common::seeded_agent(3);
    let sim = common::default_sim();
    let mut trainer = EpisodeTrainer::new(TrainerConfig {
        steps_per_episode: 4,
        ..TrainerConfig::default()
    });
    let mut rng = fastrand::Rng::with_seed(8);
    let episodes: Vec<_> = (0..3)
        .map(|_| trainer.run_episode(&mut sim.clone(), &agent, &mut rng).unwrap())
        .collect();
    let update = build_update(&episodes, &agent);

    // the recorded log-probs reproduce the objective exactly
    let recomputed = |a: &PolicyAgent| -> f32 {
        episodes
            .iter()
            .zip(&update.advantages)
            .map(|(ep, adv)| {
                -adv * ep
                    .steps()
                    .iter()
                    .map(|s| a.log_prob(&s.observation, s.actions))
                    .sum::<f32>()
            })
            .sum()
    };
    assert_relative_eq!(update.objective, recomputed(&agent), epsilon = 1e-4, max_relative = 1e-4);

    for (p, grad) in update.gradients.iter().enumerate() {
        for i in 0..grad.len() {
            let numeric = numeric_grad(&mut agent, p, i, recomputed);
            assert_relative_eq!(grad.data[i], numeric, epsilon = 5e-2, max_relative = 5e-2);
        }
    }
}
