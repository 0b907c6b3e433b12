//! Train one online logistic regression model per sampled partition.
//!
//! Reads `<model>\t<label> <index:value> ...` lines from stdin and writes each
//! model's non-zero weights as `<model>\t<index:weight> ...` to stdout.

use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use lrsgd::bagging::LabeledRecord;
use lrsgd::config::{self, LrsgdConfig};
use lrsgd::logging;
use lrsgd::ml::SgdLogReg;
use lrsgd::ml::metrics::{ModelMetrics, evaluate};
use lrsgd::ml::sgd_logreg::PartitionTrainer;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init("lrsgd-train") {
        eprintln!("Logging disabled: {err}");
    }

    let mut config = load_config(options.config_path.as_ref())?;
    if let Some(eta) = options.eta {
        config.learner.eta = eta;
    }
    if let Some(mu) = options.mu {
        config.learner.mu = mu;
    }
    if let Some(n_feature) = options.n_feature {
        config.learner.n_feature = n_feature;
    }
    config.validate().map_err(|err| err.to_string())?;
    tracing::info!(
        "Training with eta={} mu={} n_feature={}",
        config.learner.eta,
        config.learner.mu,
        config.learner.n_feature
    );

    let mut trainer =
        PartitionTrainer::new(config.train_options(options.strict)).map_err(|err| err.to_string())?;
    trainer
        .train_stream(io::stdin().lock())
        .map_err(|err| err.to_string())?;
    let models = trainer.into_models();
    write_weights(&models, BufWriter::new(io::stdout().lock())).map_err(|err| err.to_string())?;

    if let Some(holdout) = &options.eval_path {
        let records = load_holdout(holdout)?;
        let mut all_metrics = Vec::with_capacity(models.len());
        for (&model, learner) in &models {
            let metrics = evaluate(model, learner, &records).map_err(|err| err.to_string())?;
            tracing::info!(
                "model {:>3}  accuracy={:.4}  precision={:.3}  recall={:.3}  f1={:.3}  log_loss={:.4}  nonzero={}",
                metrics.model,
                metrics.accuracy,
                metrics.precision,
                metrics.recall,
                metrics.f1,
                metrics.log_loss,
                metrics.nonzero_weights
            );
            all_metrics.push(metrics);
        }
        if let Some(path) = &options.metrics_out {
            save_metrics(path, &all_metrics)?;
        }
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<LrsgdConfig, String> {
    let loaded = match path {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    };
    loaded.map_err(|err| err.to_string())
}

fn write_weights<W: Write>(models: &BTreeMap<usize, SgdLogReg>, mut out: W) -> io::Result<()> {
    for (model, learner) in models {
        writeln!(out, "{model}\t{}", learner.nonzero_weights())?;
    }
    out.flush()
}

fn load_holdout(path: &Path) -> Result<Vec<LabeledRecord>, String> {
    let file = std::fs::File::open(path)
        .map_err(|err| format!("Failed to open holdout {}: {err}", path.display()))?;
    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|err| format!("{}:{}: {err}", path.display(), idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = line
            .parse::<LabeledRecord>()
            .map_err(|err| format!("{}:{}: {err}", path.display(), idx + 1))?;
        records.push(record);
    }
    if records.is_empty() {
        return Err(format!("Holdout file {} has no records", path.display()));
    }
    Ok(records)
}

fn save_metrics(path: &Path, metrics: &[ModelMetrics]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    let bytes = serde_json::to_vec_pretty(metrics).map_err(|err| err.to_string())?;
    std::fs::write(path, bytes).map_err(|err| err.to_string())
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    config_path: Option<PathBuf>,
    eta: Option<f64>,
    mu: Option<f64>,
    n_feature: Option<usize>,
    strict: bool,
    eval_path: Option<PathBuf>,
    metrics_out: Option<PathBuf>,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--eta" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--eta requires a value".to_string())?;
                options.eta = Some(
                    value
                        .parse::<f64>()
                        .map_err(|_| format!("Invalid --eta value: {value}"))?,
                );
            }
            "--mu" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--mu requires a value".to_string())?;
                options.mu = Some(
                    value
                        .parse::<f64>()
                        .map_err(|_| format!("Invalid --mu value: {value}"))?,
                );
            }
            "--n-feature" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--n-feature requires a value".to_string())?;
                options.n_feature = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid --n-feature value: {value}"))?,
                );
            }
            "--strict" => {
                options.strict = true;
            }
            "--eval" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--eval requires a value".to_string())?;
                options.eval_path = Some(PathBuf::from(value));
            }
            "--metrics-out" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--metrics-out requires a value".to_string())?;
                options.metrics_out = Some(PathBuf::from(value));
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    if options.metrics_out.is_some() && options.eval_path.is_none() {
        return Err("--metrics-out requires --eval".to_string());
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "lrsgd-train",
        "",
        "Trains one SGD logistic regression model per model index on stdin.",
        "Writes <model>\\t<index:weight> ... lines (non-zero weights) to stdout.",
        "",
        "Usage:",
        "  lrsgd-sample -n 4 -r 0.5 < train.txt | lrsgd-train --n-feature <n> [options]",
        "",
        "Options:",
        "  --config <file>       TOML config (default: ~/.lrsgd/lrsgd.toml if present).",
        "  --eta <f64>           Learning rate (default: 0.1).",
        "  --mu <f64>            Decay strength (default: 0.0).",
        "  --n-feature <n>       Feature dimensionality (default: 1048576).",
        "  --strict              Fail on the first malformed line instead of skipping it.",
        "  --eval <file>         Score every model on a labelled holdout file.",
        "  --metrics-out <file>  Write holdout metrics as JSON (requires --eval).",
    ]
    .join("\n")
}
