use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use polytype::keyboard::{self, KeyDef, KeyPressSet, ROWS};
use polytype::session::{Phase, Session};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        match self.session.phase {
            Phase::Loading => {
                let message = Paragraph::new(Span::styled(
                    "Generating text...",
                    Style::default()
                        .fg(Color::Yellow)
                        .patch(bold_style)
                        .patch(italic_style),
                ))
                .alignment(Alignment::Center);
                message.render(center_line(area), buf);
            }
            Phase::Finished => {
                render_results(self, area, buf);
            }
            Phase::Idle | Phase::Playing => {
                let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
                let prompt_lines = (self.session.target_text.width() as f64
                    / max_chars_per_line as f64)
                    .ceil()
                    .max(1.0) as u16
                    + 1;

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(1)
                    .constraints(
                        [
                            Constraint::Length(1), // header
                            Constraint::Length(1), // stats
                            Constraint::Min(1),    // padding
                            Constraint::Length(prompt_lines),
                            Constraint::Min(1),            // padding
                            Constraint::Length(5),         // keyboard
                            Constraint::Length(1),         // hints
                        ]
                        .as_ref(),
                    )
                    .split(area);

                render_header(self, chunks[0], buf);
                render_stats_line(&self.session, chunks[1], buf);
                render_prompt(&self.session, chunks[3], buf);
                render_keyboard(&self.session, &self.pressed, chunks[5], buf);

                let hints = Paragraph::new(Span::styled(
                    "tab: new text   enter: finish early   esc: quit",
                    dim_style,
                ))
                .alignment(Alignment::Center);
                hints.render(chunks[6], buf);
            }
        }
    }
}

fn center_line(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(area);
    chunks[1]
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let status = if app.session.phase == Phase::Playing {
        Span::styled(
            "LIVE",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            "READY",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
    };
    let header = Line::from(vec![
        Span::styled(
            format!("{} · {}", app.language, app.difficulty),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        status,
    ]);
    Paragraph::new(header)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_stats_line(session: &Session, area: Rect, buf: &mut Buffer) {
    let stats = session.stats();
    let line = Paragraph::new(Span::styled(
        format!(
            "{} wpm   {}% acc   {} err   {:.1}% done   {}s",
            stats.wpm, stats.accuracy, stats.errors, stats.progress, stats.time_elapsed
        ),
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    line.render(area, buf);
}

/// Per-char prompt coloring: green for correct, red for incorrect
/// (mistyped spaces shown as ·), underlined cursor char, dim remainder.
fn render_prompt(session: &Session, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);

    let target: Vec<char> = session.target_text.chars().collect();
    let typed: Vec<char> = session.accepted_input.chars().collect();

    let mut spans = typed
        .iter()
        .enumerate()
        .map(|(idx, &c)| {
            if Some(&c) == target.get(idx) {
                Span::styled(c.to_string(), green_bold_style)
            } else {
                let shown = match c {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                };
                Span::styled(shown, red_bold_style)
            }
        })
        .collect::<Vec<Span>>();

    if typed.len() < target.len() {
        spans.push(Span::styled(
            target[typed.len()].to_string(),
            underlined_dim_bold_style,
        ));
        let rest: String = target[typed.len() + 1..].iter().collect();
        spans.push(Span::styled(rest, dim_bold_style));
    }

    let single_line = session.target_text.width() <= area.width as usize;
    Paragraph::new(Line::from(spans))
        .alignment(if single_line {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_keyboard(session: &Session, pressed: &KeyPressSet, area: Rect, buf: &mut Buffer) {
    let hint = match session.phase {
        Phase::Idle | Phase::Playing => session.next_expected_char().and_then(keyboard::hint_for),
        _ => None,
    };

    let lines: Vec<Line> = ROWS
        .iter()
        .map(|row| keyboard_line(row, pressed, hint))
        .collect();

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn keyboard_line(row: &[KeyDef], pressed: &KeyPressSet, hint: Option<&str>) -> Line<'static> {
    let hint_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let held_style = Style::default().add_modifier(Modifier::REVERSED);
    let idle_style = Style::default().fg(Color::DarkGray);

    let mut spans = Vec::with_capacity(row.len() * 2);
    for key in row {
        let inner = key.width.saturating_sub(2) as usize;
        let cap = format!("[{:^inner$}]", key.label);
        let style = if pressed.is_held(key.code) {
            held_style
        } else if hint == Some(key.code) {
            hint_style
        } else {
            idle_style
        };
        spans.push(Span::styled(cap, style));
        spans.push(Span::raw(" "));
    }
    spans.pop();
    Line::from(spans)
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let stats = app.session.stats();
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let title = if app.session.is_complete() {
        "Passage complete"
    } else {
        "Finished early"
    };

    let lines = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(Color::Green).patch(bold_style),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!(
                "{} wpm   {}% acc   {} err   {:.1}% done   {}s",
                stats.wpm, stats.accuracy, stats.errors, stats.progress, stats.time_elapsed
            ),
            bold_style,
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("{} · {}", app.language, app.difficulty),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::default(),
        Line::from(Span::styled(
            "(enter/r) retry same text   (tab/n) new text   (esc) quit",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(height),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
}
