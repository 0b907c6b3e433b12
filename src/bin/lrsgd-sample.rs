//! Resample stdin records into per-model training partitions on stdout.

use std::io::{self, BufWriter};
use std::path::PathBuf;

use lrsgd::config::{self, LrsgdConfig};
use lrsgd::logging;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    if let Err(err) = logging::init("lrsgd-sample") {
        eprintln!("Logging disabled: {err}");
    }

    let mut config = load_config(options.config_path.as_ref())?;
    if let Some(n_model) = options.n_model {
        config.sampling.n_model = n_model;
    }
    if let Some(ratio) = options.ratio {
        config.sampling.ratio = ratio;
    }
    if let Some(seed) = options.seed {
        config.sampling.seed = seed;
    }

    let mut sampler = config.sampler().map_err(|err| err.to_string())?;
    tracing::info!(
        "Sampling with n_model={} ratio={} seed={}",
        config.sampling.n_model,
        config.sampling.ratio,
        config.sampling.seed
    );
    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());
    let stats = sampler
        .sample_stream(stdin, stdout)
        .map_err(|err| err.to_string())?;
    tracing::info!(
        "Read {} records, emitted {} assignments",
        stats.records,
        stats.emitted
    );
    for (model, count) in stats.per_model.iter().enumerate() {
        tracing::debug!("Model {model}: {count} records");
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

#[derive(Debug, Clone, Default)]
struct CliOptions {
    config_path: Option<PathBuf>,
    n_model: Option<usize>,
    ratio: Option<f64>,
    seed: Option<u64>,
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
            "-n" | "--model-num" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--model-num requires a value".to_string())?;
                options.n_model = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid --model-num value: {value}"))?,
                );
            }
            "-r" | "--sample-ratio" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--sample-ratio requires a value".to_string())?;
                options.ratio = Some(
                    value
                        .parse::<f64>()
                        .map_err(|_| format!("Invalid --sample-ratio value: {value}"))?,
                );
            }
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                options.seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn help_text() -> String {
    [
        "lrsgd-sample",
        "",
        "Routes each stdin record to a random subset of ensemble members.",
        "Writes <model>\\t<record> lines to stdout.",
        "",
        "Usage:",
        "  lrsgd-sample -n <models> -r <ratio> [options] < records.txt",
        "",
        "Options:",
        "  --config <file>          TOML config (default: ~/.lrsgd/lrsgd.toml if present).",
        "  -n, --model-num <n>      Number of ensemble members (default: 10).",
        "  -r, --sample-ratio <f64> Fraction of draws kept per member (default: 0.5).",
        "  --seed <u64>             RNG seed (default: 6505).",
    ]
    .join("\n")
}
