//! Stream plumbing around the learners of a bagging ensemble.
//!
//! - [`sampler`]: seeded routing of input records to ensemble members.
//! - [`record`]: text encoding of labelled examples and sampled lines.
//! - [`format`]: sparse text formatting of feature bags.

pub mod format;
pub mod record;
pub mod sampler;

pub use format::{reverse_indexed, to_sparse_text};
pub use record::{Assignment, LabeledRecord, RecordError, parse_assignment, parse_assignment_line};
pub use sampler::{DEFAULT_SAMPLER_SEED, SampleStats, SamplerError, StreamSampler};
