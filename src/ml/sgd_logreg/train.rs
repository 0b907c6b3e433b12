use std::collections::BTreeMap;
use std::io::BufRead;

use thiserror::Error;

use super::{LearnerError, SgdLogReg, check_hyperparameters};
use crate::bagging::record::{RecordError, parse_assignment_line};

/// Feature dimensionality used when none is configured.
pub const DEFAULT_N_FEATURE: usize = 1 << 20;

/// Hyperparameters shared by every ensemble member.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub eta: f64,
    pub mu: f64,
    pub n_feature: usize,
    /// Fail on the first bad line instead of skipping it.
    pub strict: bool,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            eta: 0.1,
            mu: 0.0,
            n_feature: DEFAULT_N_FEATURE,
            strict: false,
        }
    }
}

/// Errors returned by the partition trainer.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("Invalid training options: {0}")]
    Options(LearnerError),
    #[error("Line {line}: {source}")]
    Record { line: u64, source: RecordError },
    #[error("Line {line}: {source}")]
    Fit { line: u64, source: LearnerError },
    #[error("Failed to read line {line}: {source}")]
    Read {
        line: u64,
        source: std::io::Error,
    },
}

/// Counters collected while training.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainStats {
    /// Examples applied to a model.
    pub records: u64,
    /// Lines skipped because they could not be decoded or fitted.
    pub skipped: u64,
}

/// Trains one learner per model index from a stream of sampled lines.
#[derive(Debug)]
pub struct PartitionTrainer {
    options: TrainOptions,
    models: BTreeMap<usize, SgdLogReg>,
    stats: TrainStats,
    line: u64,
}

impl PartitionTrainer {
    pub fn new(options: TrainOptions) -> Result<Self, TrainError> {
        check_hyperparameters(options.eta, options.mu).map_err(TrainError::Options)?;
        Ok(Self {
            options,
            models: BTreeMap::new(),
            stats: TrainStats::default(),
            line: 0,
        })
    }

    pub fn stats(&self) -> &TrainStats {
        &self.stats
    }

    pub fn models(&self) -> &BTreeMap<usize, SgdLogReg> {
        &self.models
    }

    pub fn into_models(self) -> BTreeMap<usize, SgdLogReg> {
        self.models
    }

    /// Decode one `<model>\t<label> <index:value> ...` line and fit it.
    pub fn train_line(&mut self, line: &str) -> Result<(), TrainError> {
        self.line += 1;
        let line_no = self.line;
        if line.trim().is_empty() {
            return Ok(());
        }
        let (model, record) = match parse_assignment_line(line) {
            Ok(parsed) => parsed,
            Err(source) => {
                return self.skip_or_fail(TrainError::Record {
                    line: line_no,
                    source,
                });
            }
        };
        let options = &self.options;
        let learner = self
            .models
            .entry(model)
            .or_insert_with(|| SgdLogReg::new(options.eta, options.mu, options.n_feature));
        match learner.fit(&record.features, record.label) {
            Ok(()) => {
                self.stats.records += 1;
                Ok(())
            }
            Err(source) => self.skip_or_fail(TrainError::Fit {
                line: line_no,
                source,
            }),
        }
    }

    /// Train from every line of `reader`.
    pub fn train_stream<R: BufRead>(&mut self, reader: R) -> Result<(), TrainError> {
        for line in reader.lines() {
            let line = line.map_err(|source| TrainError::Read {
                line: self.line + 1,
                source,
            })?;
            self.train_line(&line)?;
        }
        for (model, learner) in &self.models {
            tracing::debug!("Model {model}: {} updates", learner.n_updates());
        }
        tracing::info!(
            "Trained {} models on {} records ({} skipped)",
            self.models.len(),
            self.stats.records,
            self.stats.skipped
        );
        Ok(())
    }

    fn skip_or_fail(&mut self, err: TrainError) -> Result<(), TrainError> {
        if self.options.strict {
            return Err(err);
        }
        tracing::warn!("Skipping record: {err}");
        self.stats.skipped += 1;
        Ok(())
    }
}
