//! Machine learning core: the online learner and its numeric helpers.
//!
//! [`sgd_logreg`] holds the learner; the other modules supply its input type,
//! exact summation and evaluation.

pub mod fsum;
pub mod metrics;
pub mod sgd_logreg;
pub mod sparse;

pub use sgd_logreg::{LearnerError, SgdLogReg};
pub use sparse::SparseVector;
