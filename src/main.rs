//! # rol_anexos
//!
//! A pipeline that downloads the PDF annexes published on the ANS
//! procedure-list update page, extracts the tabular data embedded in the
//! first annex, expands domain abbreviations in the extracted cells, and
//! archives the result as compressed CSV.
//!
//! ## Usage
//!
//! ```sh
//! rol_anexos --work-dir ./out --archive-tag equipe3
//! ```
//!
//! ## Architecture
//!
//! The application follows a sequential pipeline:
//! 1. **Discover**: scan the publication page for PDF links
//! 2. **Select**: take the first two links, reversed, as `Anexo_1`/`Anexo_2`
//! 3. **Fetch**: download each annex to the working directory
//! 4. **Extract & normalize**: parse the first annex's tables, drop each
//!    table's header row, expand abbreviations
//! 5. **Persist**: write `dados_rol.csv`, compress it into `Teste_<tag>.gz`,
//!    delete the intermediate

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod discover;
mod error;
mod extract;
mod fetch;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod utils;

use cli::Cli;
use error::Error;
use pipeline::{run, RunConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("rol_anexos starting up");

    let args = Cli::parse();
    let config = RunConfig {
        page_url: args.page_url,
        work_dir: args.work_dir.into(),
        archive_tag: args.archive_tag,
    };

    match run(&config).await {
        Ok(summary) => {
            let elapsed = start_time.elapsed();
            info!(
                rows = summary.rows,
                fetched = summary.fetched.len(),
                archive = %summary.archive_path.display(),
                ?elapsed,
                "Execution complete"
            );
            ExitCode::SUCCESS
        }
        // The page not (yet) carrying the annex pair is an expected
        // condition, not a fault.
        Err(e @ Error::InsufficientLinks { .. }) => {
            warn!(error = %e, "Not enough annex links published; nothing to do");
            ExitCode::from(e.exit_code())
        }
        Err(e) => {
            error!(error = %e, "Pipeline run failed");
            ExitCode::from(e.exit_code())
        }
    }
}
