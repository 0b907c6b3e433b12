//! Seeded resampling of a record stream into per-model training partitions.
//!
//! For every input record and every ensemble member a key is drawn uniformly
//! from `0..n_model`; the record joins that member's partition when the key is
//! below `n_model * ratio`. Keys are integers, so each member keeps about
//! `ceil(n_model * ratio) / n_model` of the stream. The draw sequence depends
//! only on the seed and the number of records, so a fixed seed reproduces the
//! partitions exactly.

use std::io::{BufRead, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::record::Assignment;

/// Seed used when none is configured.
pub const DEFAULT_SAMPLER_SEED: u64 = 6505;

/// Errors raised while sampling a stream.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("Invalid sampler parameter {param} = {value}")]
    InvalidParameter { param: &'static str, value: String },
    #[error("Failed to read input line {line}: {source}")]
    Read {
        line: u64,
        source: std::io::Error,
    },
    #[error("Failed to write sampled output: {0}")]
    Write(std::io::Error),
}

/// Counters reported after sampling a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleStats {
    /// Input records read.
    pub records: u64,
    /// `(model, record)` pairs emitted.
    pub emitted: u64,
    /// Emitted pairs per model index.
    pub per_model: Vec<u64>,
}

/// Deterministic bagging sampler.
#[derive(Debug, Clone)]
pub struct StreamSampler {
    n_model: usize,
    ratio: f64,
    cutoff: f64,
    rng: StdRng,
}

impl StreamSampler {
    pub fn new(n_model: usize, ratio: f64, seed: u64) -> Result<Self, SamplerError> {
        if n_model == 0 {
            return Err(SamplerError::InvalidParameter {
                param: "n_model",
                value: n_model.to_string(),
            });
        }
        if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
            return Err(SamplerError::InvalidParameter {
                param: "ratio",
                value: ratio.to_string(),
            });
        }
        Ok(Self {
            n_model,
            ratio,
            cutoff: n_model as f64 * ratio,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn n_model(&self) -> usize {
        self.n_model
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Route one record, advancing the generator by `n_model` draws.
    pub fn sample_line(&mut self, line: &str) -> Vec<Assignment> {
        let record = line.trim();
        let mut out = Vec::new();
        for model in 0..self.n_model {
            let key = self.rng.random_range(0..self.n_model);
            if (key as f64) < self.cutoff {
                out.push(Assignment {
                    model,
                    record: record.to_string(),
                });
            }
        }
        out
    }

    /// Sample every line of `reader`, writing `<model>\t<record>` lines.
    pub fn sample_stream<R, W>(&mut self, reader: R, mut writer: W) -> Result<SampleStats, SamplerError>
    where
        R: BufRead,
        W: Write,
    {
        let mut stats = SampleStats {
            per_model: vec![0; self.n_model],
            ..SampleStats::default()
        };
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| SamplerError::Read {
                line: idx as u64 + 1,
                source,
            })?;
            stats.records += 1;
            for assignment in self.sample_line(&line) {
                writeln!(writer, "{assignment}").map_err(SamplerError::Write)?;
                stats.per_model[assignment.model] += 1;
                stats.emitted += 1;
            }
        }
        writer.flush().map_err(SamplerError::Write)?;
        tracing::debug!(
            "Sampled {} records into {} assignments across {} models",
            stats.records,
            stats.emitted,
            self.n_model
        );
        Ok(stats)
    }
}
