//! Online logistic regression for bagging ensembles.
//!
//! Each ensemble member is an [`ml::SgdLogReg`] trained one example at a
//! time. The [`bagging`] module routes a record stream to members and formats
//! sparse features; the binaries `lrsgd-sample` and `lrsgd-train` wire the two
//! together over stdin/stdout.

/// Directory resolution for config and log files.
pub mod app_dirs;
/// Stream sampling and sparse text formats.
pub mod bagging;
/// TOML configuration for the tools.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;
/// Learner, exact summation and metrics.
pub mod ml;
