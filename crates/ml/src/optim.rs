use crate::tensor::Tensor;

/// Adam optimizer over `(parameter, gradient)` pairs.
///
/// Moment buffers are created on the first step, so the same parameter list
/// must be passed in the same order on every call.
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: i32,
    m: Vec<Vec<f32>>,
    v: Vec<Vec<f32>>,
}

impl Adam {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            t: 0,
            m: Vec::new(),
            v: Vec::new(),
        }
    }

    #[must_use]
    pub fn learning_rate(&self) -> f32 {
        self.lr
    }

    /// Number of steps taken so far.
    #[must_use]
    pub fn steps(&self) -> i32 {
        self.t
    }

    /// Moves every parameter against its gradient.
    pub fn step(&mut self, params: &mut [(&mut Tensor, &Tensor)]) {
        if self.m.is_empty() {
            self.m = params.iter().map(|(p, _)| vec![0.0; p.len()]).collect();
            self.v = params.iter().map(|(p, _)| vec![0.0; p.len()]).collect();
        }
        self.t += 1;
        let bias1 = 1.0 - self.beta1.powi(self.t);
        let bias2 = 1.0 - self.beta2.powi(self.t);
        for ((p, g), (m_vec, v_vec)) in params
            .iter_mut()
            .zip(self.m.iter_mut().zip(self.v.iter_mut()))
        {
            for (i, pv) in p.data.iter_mut().enumerate() {
                let gv = g.data[i];
                m_vec[i] = self.beta1 * m_vec[i] + (1.0 - self.beta1) * gv;
                v_vec[i] = self.beta2 * v_vec[i] + (1.0 - self.beta2) * gv * gv;
                let m_hat = m_vec[i] / bias1;
                let v_hat = v_vec[i] / bias2;
                *pv -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
            }
        }
    }
}

/// Plain gradient descent, `p -= lr * g`.
pub struct Sgd {
    lr: f32,
}

impl Sgd {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self { lr }
    }

    #[must_use]
    pub fn learning_rate(&self) -> f32 {
        self.lr
    }

    pub fn step(&mut self, params: &mut [(&mut Tensor, &Tensor)]) {
        for (p, g) in params.iter_mut() {
            p.add_scaled(*g, -self.lr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_adam_step_moves_by_learning_rate() {
        let mut param = Tensor::from_vec(vec![2], vec![1.0, -1.0]);
        let grad = Tensor::from_vec(vec![2], vec![0.1, -3.0]);
        let mut opt = Adam::new(0.1);
        opt.step(&mut [(&mut param, &grad)]);
        // bias-corrected moments make the first step exactly lr * sign(g)
        assert!((param.data[0] - 0.9).abs() < 1e-5);
        assert!((param.data[1] + 0.9).abs() < 1e-5);
        assert_eq!(opt.steps(), 1);
    }

    #[test]
    fn adam_minimizes_a_quadratic() {
        let mut param = Tensor::from_vec(vec![1], vec![5.0]);
        let mut opt = Adam::new(0.1);
        for _ in 0..500 {
            let grad = Tensor::from_vec(vec![1], vec![2.0 * (param.data[0] - 2.0)]);
            opt.step(&mut [(&mut param, &grad)]);
        }
        assert!((param.data[0] - 2.0).abs() < 0.05);
    }

    #[test]
    fn sgd_step_is_scaled_gradient() {
        let mut param = Tensor::from_vec(vec![2], vec![1.0, -1.0]);
        let grad = Tensor::from_vec(vec![2], vec![0.5, -2.0]);
        Sgd::new(0.1).step(&mut [(&mut param, &grad)]);
        assert!((param.data[0] - 0.95).abs() < 1e-6);
        assert!((param.data[1] + 0.8).abs() < 1e-6);
    }

    #[test]
    fn sgd_minimizes_a_quadratic() {
        let mut param = Tensor::from_vec(vec![1], vec![5.0]);
        let mut opt = Sgd::new(0.1);
        for _ in 0..200 {
            let grad = Tensor::from_vec(vec![1], vec![2.0 * (param.data[0] - 2.0)]);
            opt.step(&mut [(&mut param, &grad)]);
        }
        assert!((param.data[0] - 2.0).abs() < 1e-3);
        assert_eq!(opt.learning_rate(), 0.1);
    }
}
