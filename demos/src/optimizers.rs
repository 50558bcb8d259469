//! Gradient-based optimizers for variational loops.

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Final parameter values.
    pub optimal_params: Vec<f64>,
    /// Objective value at the final parameters.
    pub optimal_value: f64,
    /// Number of optimizer steps taken.
    pub num_iterations: usize,
    /// Objective value before each step, then the final value.
    pub history: Vec<f64>,
}

/// One update rule.
pub trait Optimizer {
    /// New parameters from the current ones and the gradient there.
    fn step(&mut self, params: &[f64], grad: &[f64]) -> Vec<f64>;
}

/// Plain gradient descent: `x ← x - η·∇f`.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    pub stepsize: f64,
}

impl GradientDescent {
    pub fn new(stepsize: f64) -> Self {
        Self { stepsize }
    }
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl Optimizer for GradientDescent {
    fn step(&mut self, params: &[f64], grad: &[f64]) -> Vec<f64> {
        params
            .iter()
            .zip(grad)
            .map(|(x, g)| x - self.stepsize * g)
            .collect()
    }
}

/// Adagrad: per-parameter step sizes shrinking with the accumulated squared
/// gradient.
#[derive(Debug, Clone)]
pub struct Adagrad {
    pub stepsize: f64,
    pub eps: f64,
    accumulation: Vec<f64>,
}

impl Adagrad {
    pub fn new(stepsize: f64) -> Self {
        Self {
            stepsize,
            eps: 1e-8,
            accumulation: Vec::new(),
        }
    }

    /// Forget the accumulated gradients.
    pub fn reset(&mut self) {
        self.accumulation.clear();
    }
}

impl Optimizer for Adagrad {
    fn step(&mut self, params: &[f64], grad: &[f64]) -> Vec<f64> {
        if self.accumulation.len() != grad.len() {
            self.accumulation = vec![0.0; grad.len()];
        }
        params
            .iter()
            .zip(grad)
            .zip(&mut self.accumulation)
            .map(|((x, g), acc)| {
                *acc += g * g;
                x - self.stepsize * g / (*acc + self.eps).sqrt()
            })
            .collect()
    }
}

/// Run `maxiter` steps of `optimizer` from `initial`.
///
/// `value_and_grad` returns the objective and its gradient at a point.
pub fn minimize<O, F, E>(
    optimizer: &mut O,
    mut value_and_grad: F,
    initial: Vec<f64>,
    maxiter: usize,
) -> Result<OptimizationResult, E>
where
    O: Optimizer,
    F: FnMut(&[f64]) -> Result<(f64, Vec<f64>), E>,
{
    let mut params = initial;
    let mut history = Vec::with_capacity(maxiter + 1);

    for _ in 0..maxiter {
        let (value, grad) = value_and_grad(&params)?;
        history.push(value);
        params = optimizer.step(&params, &grad);
    }

    let (optimal_value, _) = value_and_grad(&params)?;
    history.push(optimal_value);

    Ok(OptimizationResult {
        optimal_params: params,
        optimal_value,
        num_iterations: maxiter,
        history,
    })
}
