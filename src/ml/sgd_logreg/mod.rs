//! Online binary logistic regression trained one example at a time.
//!
//! Each ensemble member owns one [`SgdLogReg`]. A call to [`SgdLogReg::fit`]
//! performs a single stochastic gradient step over the features present in
//! the example, with an L1-style decay applied only to those features.

use thiserror::Error;

use crate::ml::fsum::fsum;
use crate::ml::sparse::SparseVector;

pub mod train;
pub use train::{DEFAULT_N_FEATURE, PartitionTrainer, TrainError, TrainOptions, TrainStats};

/// Errors raised by the learner and its input vectors.
#[derive(Debug, Error)]
pub enum LearnerError {
    /// A feature index is not below the model dimensionality.
    #[error("Feature index {index} out of range for {n_feature} features")]
    FeatureOutOfRange { index: usize, n_feature: usize },
    /// The same feature index appears twice in one vector.
    #[error("Duplicate feature index {index}")]
    DuplicateFeature { index: usize },
    /// A hyperparameter failed validation.
    #[error("Invalid hyperparameter {param} = {value}")]
    InvalidHyperparameter { param: &'static str, value: f64 },
    /// A sparse text token is not `index:value`.
    #[error("Invalid feature token {token:?} (expected index:value)")]
    ParseFeature { token: String },
}

/// Stochastic-gradient logistic regression over sparse features.
#[derive(Debug, Clone)]
pub struct SgdLogReg {
    eta: f64,
    mu: f64,
    weights: Vec<f64>,
    n_updates: u64,
}

impl SgdLogReg {
    /// Create a model with zeroed weights. Hyperparameters are not checked.
    pub fn new(eta: f64, mu: f64, n_feature: usize) -> Self {
        Self {
            eta,
            mu,
            weights: vec![0.0; n_feature],
            n_updates: 0,
        }
    }

    /// Resume from existing weights; `n_feature` is `weights.len()`.
    pub fn with_weights(eta: f64, mu: f64, weights: Vec<f64>) -> Self {
        Self {
            eta,
            mu,
            weights,
            n_updates: 0,
        }
    }

    /// Create a model after checking `eta > 0` and `mu >= 0`, both finite.
    pub fn try_new(eta: f64, mu: f64, n_feature: usize) -> Result<Self, LearnerError> {
        check_hyperparameters(eta, mu)?;
        Ok(Self::new(eta, mu, n_feature))
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn n_feature(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of non-empty examples applied through [`Self::fit`].
    pub fn n_updates(&self) -> u64 {
        self.n_updates
    }

    /// Probability of the positive class for `x`.
    pub fn predict_probability(&self, x: &SparseVector) -> Result<f64, LearnerError> {
        self.check_range(x)?;
        Ok(sigmoid(self.score(x)))
    }

    /// Class label: `1` when the probability is strictly above 0.5, else `0`.
    pub fn predict(&self, x: &SparseVector) -> Result<u8, LearnerError> {
        let p = self.predict_probability(x)?;
        Ok(if p > 0.5 { 1 } else { 0 })
    }

    /// Apply one gradient step for the example `(x, y)`.
    ///
    /// Only weights at indices present in `x` change. Each one moves by
    /// `eta * (y - p) * value` plus a shrink toward zero of
    /// `mu / x.len() * |w|`, where `w` is the weight before this step. The
    /// shrink takes the sign of `w`, so it pulls negative weights up as well.
    /// An empty `x` leaves the model untouched. On error no weight is modified.
    pub fn fit(&mut self, x: &SparseVector, y: f64) -> Result<(), LearnerError> {
        let p = self.predict_probability(x)?;
        if x.is_empty() {
            return Ok(());
        }
        let error = y - p;
        let decay = self.mu / x.len() as f64;
        for (index, value) in x.iter() {
            let w = self.weights[index];
            self.weights[index] = w + self.eta * error * value - shrink(w, decay);
        }
        self.n_updates += 1;
        Ok(())
    }

    /// Non-zero weights as a sparse vector in index order.
    pub fn nonzero_weights(&self) -> SparseVector {
        let entries = self
            .weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0.0)
            .map(|(index, &w)| (index, w))
            .collect();
        SparseVector::from_unique(entries)
    }

    fn score(&self, x: &SparseVector) -> f64 {
        fsum(x.iter().map(|(index, value)| self.weights[index] * value))
    }

    fn check_range(&self, x: &SparseVector) -> Result<(), LearnerError> {
        let n_feature = self.weights.len();
        match x.iter().find(|&(index, _)| index >= n_feature) {
            Some((index, _)) => Err(LearnerError::FeatureOutOfRange { index, n_feature }),
            None => Ok(()),
        }
    }
}

/// Require a finite `eta > 0` and a finite `mu >= 0`.
pub fn check_hyperparameters(eta: f64, mu: f64) -> Result<(), LearnerError> {
    if !eta.is_finite() || eta <= 0.0 {
        return Err(LearnerError::InvalidHyperparameter {
            param: "eta",
            value: eta,
        });
    }
    if !mu.is_finite() || mu < 0.0 {
        return Err(LearnerError::InvalidHyperparameter {
            param: "mu",
            value: mu,
        });
    }
    Ok(())
}

/// Decay term for weight `w`: `decay * |w|` carrying the sign of `w`.
fn shrink(w: f64, decay: f64) -> f64 {
    (decay * w.abs()).copysign(w)
}

/// Logistic function, evaluated without overflowing `exp` for large `|s|`.
pub fn sigmoid(s: f64) -> f64 {
    if s >= 0.0 {
        1.0 / (1.0 + (-s).exp())
    } else {
        let e = s.exp();
        e / (1.0 + e)
    }
}
