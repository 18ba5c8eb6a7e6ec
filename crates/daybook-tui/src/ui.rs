use chrono::Datelike;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use daybook_core::datetime;
use daybook_core::entry::Task;
use daybook_core::view::View;

use crate::app::App;

const ACCENT: Color = Color::Magenta;
const MUTED: Color = Color::DarkGray;

const LOGO: &str = "╺┳┓┏━┓╻ ╻┏┓ ┏━┓┏━┓╻┏
 ┃┃┣━┫┗┳┛┣┻┓┃ ┃┃ ┃┣┻┓
╺┻┛╹ ╹ ╹ ┗━┛┗━┛┗━┛╹ ╹";

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(frame: &mut Frame, app: &App) {
    if app.splash_active() {
        draw_splash(frame);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);

    match app.selector.current() {
        View::Journal => draw_journal(frame, chunks[1], app),
        View::Calendar => draw_calendar(frame, chunks[1], app),
        View::Tasks => draw_tasks(frame, chunks[1], app),
    }

    draw_nav(frame, chunks[2], app);

    if app.dialog_open {
        draw_dialog(frame, app);
    }
}

fn draw_splash(frame: &mut Frame) {
    let area = frame.area();
    let height = 5u16.min(area.height);
    let top = area.height.saturating_sub(height) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let mut lines: Vec<Line> = LOGO
        .lines()
        .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(ACCENT))))
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "thoughts in, tasks out",
        Style::default().fg(MUTED),
    )));

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        chunks[1],
    );
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            app.selector.current().title(),
            Style::default()
                .fg(ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    frame.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn draw_nav(frame: &mut Frame, area: Rect, app: &App) {
    let current = app.selector.current();
    let entry = |label: &str, key: &str, active: bool| -> Vec<Span<'static>> {
        let style = if active {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED)
        };
        vec![
            Span::styled(format!("[{key}] "), style),
            Span::styled(label.to_string(), style),
            Span::raw("    "),
        ]
    };

    let mut spans = Vec::new();
    spans.extend(entry("Calendar", "c", current == View::Calendar));
    spans.extend(vec![
        Span::styled("[a] ", Style::default().fg(ACCENT)),
        Span::styled("＋ Add", Style::default().fg(ACCENT)),
        Span::raw("    "),
    ]);
    spans.extend(entry("Journal", "j", current == View::Journal));
    spans.extend(entry("Tasks", "t", current == View::Tasks));
    spans.push(Span::styled("[q] Quit", Style::default().fg(MUTED)));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP)),
        area,
    );
}

fn draw_journal(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let window = app.selector.journal();
    let today = window.anchor_day();
    let selected = window.selected_day();
    let label = datetime::format_day(selected, today);

    // Left walks back in time, so it dims at the oldest day.
    let older_style = if window.at_oldest() {
        Style::default().fg(MUTED)
    } else {
        Style::default().fg(ACCENT)
    };
    let newer_style = if window.at_newest() {
        Style::default().fg(MUTED)
    } else {
        Style::default().fg(ACCENT)
    };

    let navigator = vec![
        Line::from(vec![
            Span::styled("◀  ", older_style),
            Span::styled(
                label.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("  ▶", newer_style),
        ]),
        Line::from(Span::styled(
            datetime::weekday_name(selected),
            Style::default().fg(MUTED),
        )),
    ];
    frame.render_widget(
        Paragraph::new(navigator).alignment(Alignment::Center),
        chunks[0],
    );

    let thoughts = app.visible_thoughts();
    if thoughts.is_empty() {
        let empty = vec![
            Line::default(),
            Line::from(Span::styled(
                format!("No thoughts for {label}"),
                Style::default().fg(MUTED),
            )),
            Line::default(),
            Line::from(Span::styled(
                "[a] add a thought · [s] sample data",
                Style::default().fg(MUTED),
            )),
        ];
        frame.render_widget(
            Paragraph::new(empty).alignment(Alignment::Center),
            chunks[1],
        );
        return;
    }

    let cursor = app.journal_cursor.min(thoughts.len() - 1);
    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        format!(
            " {} thought{} · [e] edit · [C] clear day",
            thoughts.len(),
            if thoughts.len() == 1 { "" } else { "s" }
        ),
        Style::default().fg(MUTED),
    )));
    lines.push(Line::default());

    for (idx, thought) in thoughts.iter().enumerate() {
        let selected_row = idx == cursor;
        let marker = if selected_row { "▌ " } else { "  " };
        let content_style = if selected_row {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(ACCENT)),
            Span::styled(thought.content.clone(), content_style),
        ]));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                datetime::format_clock(thought.timestamp),
                Style::default().fg(MUTED),
            ),
        ]));
        lines.push(Line::default());
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[1]);
}

fn draw_calendar(frame: &mut Frame, area: Rect, app: &App) {
    let cursor = app.selector.calendar();
    let grid = cursor.grid();
    let today = datetime::today();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Line::from(vec![
        Span::styled("◀  ", Style::default().fg(ACCENT)),
        Span::styled(
            format!("{} {}", cursor.name(), cursor.year),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ▶", Style::default().fg(ACCENT)),
    ]);
    frame.render_widget(
        Paragraph::new(header).alignment(Alignment::Center),
        chunks[0],
    );

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        "Sun Mon Tue Wed Thu Fri Sat",
        Style::default().fg(MUTED),
    )));
    lines.push(Line::default());

    let mut row: Vec<Span> = Vec::new();
    let mut column = 0;
    for cell in grid.cells() {
        match cell {
            None => row.push(Span::raw("    ")),
            Some(day_num) => {
                let is_today = cursor.contains(today) && today.day() == day_num;
                let style = if is_today {
                    Style::default()
                        .fg(Color::Black)
                        .bg(ACCENT)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                row.push(Span::styled(format!("{day_num:>3}"), style));
                row.push(Span::raw(" "));
            }
        }

        column += 1;
        if column == 7 {
            lines.push(Line::from(std::mem::take(&mut row)));
            column = 0;
        }
    }
    if !row.is_empty() {
        lines.push(Line::from(row));
    }

    let grid_height = (lines.len() as u16).min(chunks[1].height);
    let grid_area = centered(chunks[1], 28, grid_height);
    frame.render_widget(Paragraph::new(lines), grid_area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "[←/→] month · [Home] today",
            Style::default().fg(MUTED),
        )))
        .alignment(Alignment::Center),
        chunks[2],
    );
}

fn draw_tasks(frame: &mut Frame, area: Rect, app: &App) {
    let (active, done) = app.store.partition_tasks();
    let total = active.len() + done.len();

    if total == 0 {
        let empty = vec![
            Line::default(),
            Line::from(Span::styled("No tasks yet", Style::default().fg(MUTED))),
            Line::default(),
            Line::from(Span::styled(
                "[a] add a thought and extraction will fill this in",
                Style::default().fg(MUTED),
            )),
        ];
        frame.render_widget(
            Paragraph::new(empty).alignment(Alignment::Center),
            area,
        );
        return;
    }

    let cursor = app.task_cursor.min(total - 1);
    let width = area.width.saturating_sub(8) as usize;
    let mut lines = Vec::new();
    let mut row_idx = 0;

    if !active.is_empty() {
        lines.push(section_header("Active Tasks", active.len()));
        for &task in &active {
            push_task_card(&mut lines, task, row_idx == cursor, width);
            row_idx += 1;
        }
        lines.push(Line::default());
    }

    if !done.is_empty() {
        lines.push(section_header("Completed Tasks", done.len()));
        for &task in &done {
            push_task_card(&mut lines, task, row_idx == cursor, width);
            row_idx += 1;
        }
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn section_header(label: &str, count: usize) -> Line<'static> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            label.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {count} task{}", if count == 1 { "" } else { "s" }),
            Style::default().fg(MUTED),
        ),
    ])
}

fn push_task_card(lines: &mut Vec<Line<'static>>, task: &Task, selected: bool, width: usize) {
    let marker = if task.is_completed { "●" } else { "○" };
    let pointer = if selected { "▌" } else { " " };

    let mut title_style = if selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    if task.is_completed {
        title_style = title_style.fg(MUTED).add_modifier(Modifier::CROSSED_OUT);
    }

    lines.push(Line::from(vec![
        Span::styled(pointer.to_string(), Style::default().fg(ACCENT)),
        Span::styled(
            format!("{marker} "),
            if task.is_completed {
                Style::default().fg(ACCENT)
            } else {
                Style::default().fg(MUTED)
            },
        ),
        Span::styled(truncate_to_width(&task.title, width), title_style),
    ]));

    if let Some(description) = &task.description {
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled(
                truncate_to_width(description, width),
                Style::default().fg(MUTED),
            ),
        ]));
    }

    let stamp = match task.due_date {
        Some(due) => format!("Due: {}", datetime::format_short_date(due)),
        None => format!("Created: {}", datetime::format_short_date(task.created_at)),
    };
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled(stamp, Style::default().fg(MUTED)),
    ]));
}

fn draw_dialog(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let rect = centered(area, area.width.min(60), 12.min(area.height));
    frame.render_widget(Clear, rect);

    let title = if app.intake.editing().is_some() {
        " Edit Thought "
    } else {
        " Add a Thought "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(title);
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let body = if app.intake.buffer().is_empty() && !app.intake.is_submitting() {
        Paragraph::new(Line::from(vec![
            Span::styled("▏", Style::default().fg(ACCENT)),
            Span::styled("What's on your mind?", Style::default().fg(MUTED)),
        ]))
    } else if app.intake.is_submitting() {
        Paragraph::new(app.intake.buffer().to_string()).style(Style::default().fg(MUTED))
    } else {
        Paragraph::new(format!("{}▏", app.intake.buffer()))
    };
    frame.render_widget(body.wrap(Wrap { trim: false }), chunks[0]);

    let hint = if app.intake.is_submitting() {
        Line::from(vec![
            Span::styled(
                spinner_frame(app.tick_count),
                Style::default().fg(ACCENT),
            ),
            Span::styled(" Processing...", Style::default().fg(MUTED)),
        ])
    } else {
        Line::from(vec![
            Span::styled("✦ ", Style::default().fg(ACCENT)),
            Span::styled(
                "AI will extract tasks automatically",
                Style::default().fg(MUTED),
            ),
        ])
    };
    frame.render_widget(Paragraph::new(hint), chunks[1]);

    let save_style = if app.intake.can_submit() {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    };
    let buttons = Line::from(vec![
        Span::styled("[Enter] Save Thought", save_style),
        Span::raw("   "),
        Span::styled("[Esc] Cancel", Style::default().fg(MUTED)),
    ]);
    frame.render_widget(Paragraph::new(buttons), chunks[2]);
}

fn spinner_frame(tick: u64) -> &'static str {
    SPINNER[(tick as usize / 2) % SPINNER.len()]
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::truncate_to_width;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("buy stamps", 20), "buy stamps");
    }

    #[test]
    fn long_text_gets_an_ellipsis_and_stays_in_width() {
        let long = "a very long task title that will not fit on one card line";
        let cut = truncate_to_width(long, 20);
        assert!(cut.ends_with('…'));
        assert!(unicode_width::UnicodeWidthStr::width(cut.as_str()) <= 20);
    }
}
