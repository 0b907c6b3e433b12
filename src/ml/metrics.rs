//! Evaluation metrics for binary classifiers.

use serde::{Deserialize, Serialize};

use crate::bagging::record::LabeledRecord;
use crate::ml::sgd_logreg::{LearnerError, SgdLogReg};

/// Probabilities are clamped this far from 0 and 1 before taking logs.
const LOG_LOSS_EPS: f64 = 1e-15;

/// Confusion counts for a two-class problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryConfusion {
    pub true_pos: u64,
    pub false_pos: u64,
    pub true_neg: u64,
    pub false_neg: u64,
}

impl BinaryConfusion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one prediction. Any non-zero class counts as positive.
    pub fn add(&mut self, truth: u8, predicted: u8) {
        match (truth != 0, predicted != 0) {
            (true, true) => self.true_pos = self.true_pos.saturating_add(1),
            (false, true) => self.false_pos = self.false_pos.saturating_add(1),
            (false, false) => self.true_neg = self.true_neg.saturating_add(1),
            (true, false) => self.false_neg = self.false_neg.saturating_add(1),
        }
    }

    pub fn total(&self) -> u64 {
        self.true_pos + self.false_pos + self.true_neg + self.false_neg
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_pos + self.true_neg, self.total())
    }

    /// `TP / (TP + FP)`.
    pub fn precision(&self) -> f64 {
        ratio(self.true_pos, self.true_pos + self.false_pos)
    }

    /// `TP / (TP + FN)`.
    pub fn recall(&self) -> f64 {
        ratio(self.true_pos, self.true_pos + self.false_neg)
    }

    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Serialized metrics snapshot for one ensemble member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMetrics {
    pub model: usize,
    pub support: u64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub log_loss: f64,
    pub nonzero_weights: usize,
}

/// Score `learner` on labelled records. Labels above 0.5 count as positive.
pub fn evaluate(
    model: usize,
    learner: &SgdLogReg,
    records: &[LabeledRecord],
) -> Result<ModelMetrics, LearnerError> {
    let mut cm = BinaryConfusion::new();
    let mut loss_sum = 0.0f64;
    for record in records {
        let p = learner.predict_probability(&record.features)?;
        let predicted = if p > 0.5 { 1 } else { 0 };
        let truth = if record.label > 0.5 { 1 } else { 0 };
        cm.add(truth, predicted);
        let p = p.clamp(LOG_LOSS_EPS, 1.0 - LOG_LOSS_EPS);
        loss_sum -= record.label * p.ln() + (1.0 - record.label) * (1.0 - p).ln();
    }
    let support = cm.total();
    Ok(ModelMetrics {
        model,
        support,
        accuracy: cm.accuracy(),
        precision: cm.precision(),
        recall: cm.recall(),
        f1: cm.f1(),
        log_loss: if support == 0 { 0.0 } else { loss_sum / support as f64 },
        nonzero_weights: learner.nonzero_weights().len(),
    })
}
