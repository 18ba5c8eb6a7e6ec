use std::io;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use daybook_core::extract::ExtractionOutcome;

use crate::app::App;
use crate::ui;

/// Single-threaded loop multiplexing terminal input, the UI tick, and
/// extraction worker completions. State changes only happen here, in
/// the order their events are observed.
pub fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    outcomes: &Receiver<ExtractionOutcome>,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    let mut last_tick = Instant::now();
    app.redraw.set(true);

    while !app.should_quit {
        if app.redraw.replace(false) {
            terminal
                .draw(|frame| ui::draw(frame, app))
                .context("drawing UI frame")?;
        }

        while let Ok(outcome) = outcomes.try_recv() {
            app.on_extraction_outcome(outcome);
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout).context("poll events")? {
            match event::read().context("read event")? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    app.on_key(key);
                    app.redraw.set(true);
                }
                CEvent::Paste(text) => {
                    app.on_paste(&text);
                    app.redraw.set(true);
                }
                CEvent::Resize(_, _) => app.redraw.set(true),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            app.on_tick(last_tick);
        }
    }

    Ok(())
}
