use std::fs::File;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use dragnet::{
    CancelToken, ContentMatchExp, Expressions, FileMatchExp, MatchResult, ScanConfig, Scanner,
    TracingLogger,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Concurrent regex scanner over file paths and file contents.
#[derive(Parser)]
#[command(name = "dragnet", author, version, about, long_about = None)]
struct Cli {
    /// Root directory to scan
    #[arg(short = 'p', long = "path")]
    path: Option<PathBuf>,

    /// Regex matched against file paths; gates --content when both are given
    #[arg(short = 'f', long = "file")]
    file: Option<String>,

    /// Regex matched line by line against file contents
    #[arg(short = 'c', long = "content")]
    content: Option<String>,

    /// Write results to this file as JSON instead of streaming them
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Number of scan workers
    #[arg(short = 'w', long = "workers", default_value = "2")]
    workers: NonZeroUsize,

    /// Configuration file carrying expression batches
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level")]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    init_logging(&config.log_level);

    if config.roots.is_empty() {
        bail!("no root to scan; pass --path or set roots in the config file");
    }
    if config.expressions.is_empty() {
        bail!("nothing to match; pass --file and/or --content, or configure expressions");
    }

    run(config)
}

/// Folds the CLI flags into whatever the config files provided. The single
/// rule the flags can express is appended to the configured batch.
fn build_config(cli: &Cli) -> anyhow::Result<ScanConfig> {
    let file_config = ScanConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;

    let mut expressions = Expressions::default();
    match (&cli.content, &cli.file) {
        (Some(content), file) => expressions.content_exps.push(ContentMatchExp {
            id: "cli".to_string(),
            file_filter_enabled: file.is_some(),
            file_filter: file.clone().unwrap_or_default(),
            pattern: content.clone(),
        }),
        (None, Some(file)) => expressions.file_exps.push(FileMatchExp {
            id: "cli".to_string(),
            pattern: file.clone(),
        }),
        (None, None) => {}
    }

    let cli_config = ScanConfig {
        roots: cli.path.iter().cloned().collect(),
        expressions,
        workers: cli.workers,
        log_level: cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
        out: cli.out.clone(),
    };

    Ok(file_config.merge_with_cli(cli_config))
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn run(config: ScanConfig) -> anyhow::Result<()> {
    let mut scanner = match Scanner::new(&config.expressions) {
        Ok(s) => s,
        Err(errs) => {
            for e in &errs {
                error!("{}", e);
            }
            bail!("{} expression(s) failed to compile", errs.len());
        }
    };
    scanner.set_logger(Arc::new(TracingLogger));

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || {
            info!("received interrupt, stopping");
            cancel.cancel();
        })
        .context("failed to install interrupt handler")?;
    }

    let to_file = config.out.is_some();
    let mut file_matches = Vec::new();
    let mut content_matches = Vec::new();
    let mut fm_count = 0usize;
    let mut cm_count = 0usize;
    let mut error_count = 0usize;

    let start = Instant::now();
    scanner.scan_with_callback(
        &cancel,
        &config.roots,
        config.workers.get(),
        |r| {
            fm_count += 1;
            if to_file {
                file_matches.push(r);
            } else {
                info!("file match - id: {}, path: {}", r.exp_id, r.file_path.display());
            }
        },
        |r| {
            cm_count += 1;
            if to_file {
                content_matches.push(r);
            } else {
                info!(
                    "content match - id: {}, path: {}, line: {}, match: {}",
                    r.exp_id,
                    r.file_path.display(),
                    r.line_number,
                    r.match_string
                );
            }
        },
        |e| {
            error_count += 1;
            error!("{}", e);
        },
    );
    let elapsed = start.elapsed();

    info!("time taken: {:.2?}", elapsed);
    info!("total results: {}", fm_count + cm_count);
    info!("total errors: {}", error_count);

    if let Some(out_path) = &config.out {
        let result = MatchResult {
            file_matches,
            content_matches,
        };
        let out = File::create(out_path)
            .with_context(|| format!("cannot create {}", out_path.display()))?;
        serde_json::to_writer_pretty(out, &result)?;
        info!("results written to {}", out_path.display());
    }

    Ok(())
}
