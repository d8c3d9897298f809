/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Interactive TUI for the CRUSH map and cluster health of a
//! management REST API.
//!
//! The left pane shows the CRUSH hierarchy rebuilt from
//! `/api/health/full` (one tree per root bucket, children sorted by
//! id). Pressing Enter on a row shows that node's raw metadata on the
//! right; Esc clears it. The header doubles as the navigation bar:
//! cluster health from `/api/health/minimal`, the block-storage
//! indicator colored from `/api/summary`, and the count of active
//! notifications.
//!
//! Invariants:
//! - **Freshest wins**: every snapshot carries the sequence number of
//!   the fetch that produced it, and a result older than what is
//!   already applied is dropped.
//! - **Failures keep the picture**: a failed fetch or an invalid
//!   snapshot is reported in the header; the last good forest stays.
//! - **User state survives refresh**: collapsed nodes (by source id),
//!   the cursor row and the selection are carried into each new
//!   forest.
//!
//! ```bash
//! crushmap_tui --addr https://mgr.example:8443 --tls-ca ca.pem \
//!     --token "$TOKEN" --log-file /tmp/crushmap.log
//! ```

mod app;
mod format;
mod model;
mod render;
mod theme;
mod tree;

use std::fs::OpenOptions;
use std::io;
use std::io::IsTerminal;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::ExecutableCommand;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crushmap::client::build_client;
use crushmap::config::ClientArgs;
use crushmap::config::PollArgs;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::app::run_app;
use crate::theme::ThemeName;

/// Command-line arguments for the TUI.
#[derive(Debug, Parser)]
#[command(name = "crushmap_tui", about = "TUI viewer for the CRUSH map and cluster health")]
pub(crate) struct Args {
    #[command(flatten)]
    pub(crate) client: ClientArgs,

    #[command(flatten)]
    pub(crate) poll: PollArgs,

    /// Color theme
    #[arg(long, default_value_t = ThemeName::Nord, value_enum)]
    pub(crate) theme: ThemeName,

    /// Write logs to this file (filtered by RUST_LOG, default info)
    #[arg(long, env = "CRUSHMAP_LOG_FILE")]
    pub(crate) log_file: Option<PathBuf>,
}

/// Install a file-backed tracing subscriber.
///
/// The terminal belongs to the UI, so without a log file no
/// subscriber is installed and events are dropped.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    if !io::stdout().is_terminal() {
        eprintln!("This TUI requires a real terminal.");
        return Ok(());
    }

    let client = build_client(&args.client);
    let mut app = App::new(client.base_url(), args.theme);
    tracing::info!(base_url = client.base_url(), "starting crushmap_tui");

    // The spinner runs before the alternate screen so it shows as a
    // normal terminal line.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("crushmap: connecting to {} ...", client.base_url()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    // Initial load is sequence 0; the pollers start at 1.
    let (full, minimal, summary) = tokio::join!(
        client.full_health(),
        client.minimal_health(),
        client.summary()
    );
    app.apply_topology(0, full);
    app.apply_health(0, minimal);
    app.apply_summary(0, summary);

    spinner.finish_and_clear();

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &client, &args.poll, app).await;
    restore_terminal(&mut terminal)?;
    Ok(result?)
}

#[cfg(test)]
mod tests;
