mod config;
mod sheet;

use anyhow::{bail, Context};
use clap::Parser;
use libdns_sweep::{assemble, Prober};
use std::{
    path::PathBuf,
    process::ExitCode,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "dscan=info,libdns_sweep=info";

#[derive(Parser, Debug)]
#[command(name = "dscan")]
#[command(about = "Scan domains using dig and save results to a spreadsheet", long_about = None)]
struct Args {
    /// Spreadsheet (.xlsx, .ods, .csv) whose first column lists the domains to scan
    #[arg(long)]
    input: PathBuf,

    /// Spreadsheet to write the results to (.xlsx, or .csv)
    #[arg(long)]
    output: PathBuf,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = config::load_config()?;
    let domains = sheet::read_domains(&args.input)?;

    let probe_config = config.probe_config();
    let profile = probe_config.profile;
    info!(
        domains = domains.len(),
        %profile,
        timeout_secs = probe_config.timeout.as_secs(),
        "starting scan"
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let cancel = Arc::new(AtomicBool::new(false));
    let results = rt.block_on(async {
        let flag = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, discarding the current domain");
                flag.store(true, Ordering::Relaxed);
            }
        });

        Prober::with_config(probe_config)
            .scan_all(&domains, &cancel)
            .await
    });

    if results.is_empty() && cancel.load(Ordering::Relaxed) {
        bail!("scan interrupted before any domain completed; nothing written");
    }

    let scanned = &domains[..results.len()];
    let table = assemble(scanned, &results, profile)?;
    sheet::write_table(&args.output, &table)?;
    info!(rows = table.rows.len(), output = %args.output.display(), "results written");

    if results.len() < domains.len() {
        bail!(
            "scan interrupted after {} of {} domains; partial results written to {}",
            results.len(),
            domains.len(),
            args.output.display()
        );
    }

    Ok(())
}
