pub mod app;
pub mod cli;
pub mod event;
pub mod ui;

use std::ffi::OsString;
use std::io;
use std::sync::mpsc;

use anyhow::Context;
use clap::Parser;
use crossterm::ExecutableCommand;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use daybook_core::config::Config;
use daybook_core::datetime;

use crate::app::App;

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);
    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        "starting daybook TUI"
    );

    let mut cfg =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(tick_ms) = cli.tick_ms {
        cfg.tick_ms = tick_ms;
    }

    datetime::init_project_timezone(cfg.timezone.as_deref());

    let (outcome_tx, outcome_rx) = mpsc::channel();
    let mut app = App::new(&cfg, cli.no_splash, outcome_tx)
        .context("failed to build session")?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.hide_cursor().ok();

    let result = event::run_loop(&mut terminal, &mut app, &outcome_rx, cfg.tick());

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    info!("done");
    result
}
