use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use teller_ingest::region::{balance_region, transaction_region};
use teller_ingest::{
    DocumentLayout, FailurePolicy, LayoutDocument, LayoutPage, StatementProcessor, run_batch,
};

mod config;
mod discover;
mod logging;
mod output;

use config::{Config, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "teller", version, about = "Statement extraction and reconciliation")]
struct Cli {
    /// Config file (defaults to ./teller.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract and reconcile every statement below DATA_DIR
    Extract {
        /// Root holding one directory per account (visa/, chequing/, savings/)
        data_dir: PathBuf,

        /// Table template directory (overrides config)
        #[arg(long)]
        templates: Option<PathBuf>,

        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Write here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Keep going after a statement fails to reconcile
        #[arg(long)]
        keep_going: bool,
    },

    /// Show the detected transaction and balance regions of a layout dump
    Regions {
        layout: PathBuf,
    },

    /// Write a default config file
    InitConfig {
        #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::InitConfig { path } = &cli.command {
        return config::init_config(path);
    }

    let cfg = config::load_config(cli.config.as_deref())?;
    logging::init_logging(&cfg.log_level, cli.log_json);

    match cli.command {
        Command::Extract {
            data_dir,
            templates,
            format,
            output,
            keep_going,
        } => extract(&cfg, &data_dir, templates, format, output.as_deref(), keep_going)?,
        Command::Regions { layout } => regions(&cfg, &layout)?,
        Command::InitConfig { .. } => {}
    }

    Ok(())
}

fn extract(
    cfg: &Config,
    data_dir: &Path,
    templates: Option<PathBuf>,
    format: Option<OutputFormat>,
    output: Option<&Path>,
    keep_going: bool,
) -> Result<()> {
    if !data_dir.is_dir() {
        bail!("data directory not found: {}", data_dir.display());
    }

    let statements = discover::find_statements(data_dir)?;
    tracing::info!(count = statements.len(), root = %data_dir.display(), "statements found");

    let mut options = cfg.processor_options();
    if let Some(dir) = templates {
        options.templates_dir = dir;
    }
    let processor = StatementProcessor::new(options);

    let policy = if keep_going || cfg.run.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };

    let report = run_batch(&statements, &discover::SidecarLoader, &processor, policy)?;

    let format = format.unwrap_or(cfg.run.format);
    output::write_transactions(output, format, &report.transactions)?;

    for accepted in &report.accepted {
        eprintln!(
            "ok   {} [{}] {} transactions, opening {:.2} closing {:.2}",
            accepted.path.display(),
            accepted.account_type,
            accepted.transactions,
            accepted.summary.opening,
            accepted.summary.closing
        );
    }
    for failed in &report.failures {
        eprintln!("FAIL {}: {}", failed.path.display(), failed.error);
    }
    eprintln!(
        "\n{} statements accepted, {} rejected, {} transactions",
        report.accepted.len(),
        report.failures.len(),
        report.transactions.len()
    );

    if !report.failures.is_empty() {
        bail!("{} statement(s) failed to reconcile", report.failures.len());
    }
    Ok(())
}

fn regions(cfg: &Config, layout: &Path) -> Result<()> {
    let doc = DocumentLayout::load(layout)?;
    let x_tolerance = cfg.extraction.x_tolerance;

    let first = doc.pages().first().context("layout has no pages")?;
    let balance = balance_region(first);
    println!("page 1 of {}", doc.page_count());
    println!("  balance region: {balance:?}");
    println!("{}\n", first.crop_text(balance, x_tolerance));

    for (i, page) in doc.pages().iter().enumerate() {
        println!("page {} transaction region: {:?}", i + 1, transaction_region(page));
    }
    Ok(())
}
