pub mod charting;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::analyzer::{rhythm_latencies, Rhythm};
use crate::replay::{Playback, ReplayEngine};
use crate::session::SessionResult;
use crate::typing_policy::{Outcome, SpacePolicy, TypedState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

/// Wraps styled spans into rows of at most `width` columns, splitting a word
/// only when it is wider than a whole row.
struct RowBuilder {
    width: usize,
    rows: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    current_width: usize,
}

impl RowBuilder {
    fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            rows: Vec::new(),
            current: Vec::new(),
            current_width: 0,
        }
    }

    fn row(&self) -> usize {
        self.rows.len()
    }

    fn break_row(&mut self) {
        self.rows.push(Line::from(std::mem::take(&mut self.current)));
        self.current_width = 0;
    }

    /// Start a new row unless a word of `word_width` fits on this one
    fn fit(&mut self, word_width: usize) {
        if self.current_width > 0 && self.current_width + word_width > self.width {
            self.break_row();
        }
    }

    fn push(&mut self, span: Span<'static>) {
        let w = span.content.width();
        if self.current_width > 0 && self.current_width + w > self.width {
            self.break_row();
        }
        self.current_width += w;
        self.current.push(span);
    }

    /// Separators never open a row of their own
    fn push_trailing(&mut self, span: Span<'static>) {
        self.current_width += span.content.width();
        self.current.push(span);
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if !self.current.is_empty() || self.rows.is_empty() {
            self.break_row();
        }
        self.rows
    }
}

/// Style every target character by its outcome and wrap to `width` columns.
/// Word-separated text flows with single spaces; line-oriented text starts
/// each word on its own row. Also returns the row holding the cursor.
pub fn wrapped_rows(
    words: &[String],
    state: &TypedState,
    policy: SpacePolicy,
    width: u16,
) -> (Vec<Line<'static>>, usize) {
    let green = bold().fg(Color::Green);
    let red = bold().fg(Color::Red);
    let cursor_style = dim_bold().add_modifier(Modifier::UNDERLINED);
    let cursor = state.cursor;

    let mut rows = RowBuilder::new(width as usize);
    let mut cursor_row = 0;

    for (wi, word) in words.iter().enumerate() {
        rows.fit(word.width());
        if wi == cursor.word_index {
            cursor_row = rows.row();
        }

        let mut len = 0;
        for (ci, c) in word.chars().enumerate() {
            len += 1;
            let at_cursor = (wi, ci) == (cursor.word_index, cursor.char_index);
            let style = match state.outcome_at(wi, ci) {
                Some(Outcome::Correct) => green,
                Some(Outcome::Incorrect) => red,
                None if at_cursor => cursor_style,
                None => dim_bold(),
            };
            rows.push(Span::styled(c.to_string(), style));
            if at_cursor {
                cursor_row = rows.row();
            }
        }

        let cursor_at_end = (wi, len) == (cursor.word_index, cursor.char_index);
        if cursor_at_end {
            cursor_row = rows.row();
        }
        let is_last = wi + 1 == words.len();
        match policy {
            SpacePolicy::WordSeparated if !is_last => {
                let style = if cursor_at_end { cursor_style } else { dim_bold() };
                rows.push_trailing(Span::styled(" ", style));
            }
            SpacePolicy::LineOriented => {
                if cursor_at_end && !is_last {
                    rows.push_trailing(Span::styled("⏎", cursor_style));
                }
                rows.break_row();
            }
            SpacePolicy::WordSeparated => {}
        }
    }

    (rows.finish(), cursor_row)
}

/// Unwrapped styled text: one row for word-separated text, one per word otherwise
pub fn styled_text(
    words: &[String],
    state: &TypedState,
    policy: SpacePolicy,
) -> Vec<Line<'static>> {
    wrapped_rows(words, state, policy, u16::MAX).0
}

/// First row to show so the cursor row stays visible, one row of context above it
pub fn scroll_offset(cursor_row: usize, total_rows: usize, visible: usize) -> usize {
    let context = usize::from(visible > 1);
    let max_scroll = total_rows.saturating_sub(visible);
    cursor_row.saturating_sub(context).min(max_scroll)
}

/// A prompt with its typed state, shared by the live and replay screens
pub struct TextView<'a> {
    pub words: &'a [String],
    pub state: &'a TypedState,
    pub policy: SpacePolicy,
    /// Line above the text (timer or playback status)
    pub header: Option<String>,
    /// Line below the text (attribution)
    pub footer: Option<String>,
    pub legend: &'a str,
}

impl Widget for TextView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let max_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2);
        let (rows, cursor_row) = wrapped_rows(self.words, self.state, self.policy, max_width);
        let total_rows = rows.len();
        let text_lines = (total_rows as u16).min(area.height.saturating_sub(4).max(1));
        let padding = area.height.saturating_sub(text_lines + 4) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(2),
                Constraint::Length(text_lines),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        if let Some(header) = self.header {
            Paragraph::new(Span::styled(header, dim_bold()))
                .alignment(Alignment::Center)
                .render(chunks[1], buf);
        }

        let single_line = self.policy == SpacePolicy::WordSeparated && total_rows == 1;
        let scroll = scroll_offset(cursor_row, total_rows, text_lines as usize);
        Paragraph::new(rows)
            // a prompt that fits on one line reads better centered
            .alignment(if single_line {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .scroll((scroll as u16, 0))
            .render(chunks[2], buf);

        if let Some(footer) = self.footer {
            Paragraph::new(Span::styled(
                format!("- {footer}"),
                Style::default().add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Right)
            .render(chunks[3], buf);
        }

        Paragraph::new(Span::styled(
            self.legend,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .render(chunks[5], buf);
    }
}

pub fn replay_view(replay: &ReplayEngine) -> TextView<'_> {
    let status = match replay.playback() {
        Playback::Playing => "playing",
        Playback::Paused => "paused",
        Playback::Stopped if replay.is_finished() => "finished",
        Playback::Stopped => "stopped",
    };

    TextView {
        words: replay.words(),
        state: replay.typed_state(),
        policy: replay.space_policy(),
        header: Some(format!(
            "replay {}   {}/{}",
            status,
            replay.index(),
            replay.len()
        )),
        footer: replay.author().map(str::to_string),
        legend: "(space) play/pause / (x) reset / (e)nd / (b)ack / (esc)ape",
    }
}

fn rhythm_color(rhythm: Rhythm) -> Color {
    match rhythm {
        Rhythm::Metronome => Color::Green,
        Rhythm::VariableFlow => Color::Yellow,
        Rhythm::Burst => Color::Red,
        Rhythm::Unknown => Color::Gray,
    }
}

/// Post-session report: headline numbers, coaching, and the latency chart
pub struct ResultsView<'a> {
    pub result: &'a SessionResult,
    pub can_share: bool,
}

impl Widget for ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let analysis = &self.result.analysis;
        let details = analysis.patterns.len() + usize::from(!analysis.slow_keys.is_empty());
        let coach_lines = analysis.coach_messages.len().saturating_sub(1);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(1),                      // chart
                Constraint::Length(1),                   // stats
                Constraint::Length(1),                   // rhythm
                Constraint::Length(1),                   // summary
                Constraint::Length(coach_lines as u16),  // coach
                Constraint::Length(details as u16),      // patterns, slow keys
                Constraint::Length(1),                   // padding
                Constraint::Length(1),                   // legend
            ])
            .split(area);

        let latencies: Vec<(f64, f64)> = rhythm_latencies(&analysis.keystrokes)
            .into_iter()
            .enumerate()
            .map(|(i, l)| ((i + 1) as f64, l))
            .collect();
        let (x_max, y_max) = charting::compute_chart_params(&latencies);

        let datasets = vec![Dataset::default()
            .marker(ratatui::symbols::Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Line)
            .data(&latencies)];

        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("keystroke")
                    .bounds([1.0, x_max])
                    .labels(vec![
                        Span::styled("1", bold()),
                        Span::styled(charting::format_label(x_max), bold()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("ms")
                    .bounds([0.0, y_max])
                    .labels(vec![
                        Span::styled("0", bold()),
                        Span::styled(charting::format_label(y_max), bold()),
                    ]),
            )
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            format!(
                "{} wpm   {}% acc   {}% consistency",
                self.result.wpm, self.result.accuracy, analysis.consistency
            ),
            bold(),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            analysis.rhythm.to_string(),
            bold().fg(rhythm_color(analysis.rhythm)),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        Paragraph::new(Span::styled(
            analysis.summary.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        let coach: Vec<Line> = analysis
            .coach_messages
            .iter()
            .skip(1)
            .map(|m| Line::from(m.as_str()))
            .collect();
        Paragraph::new(coach)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[4], buf);

        let mut detail_lines: Vec<Line> = analysis
            .patterns
            .iter()
            .map(|p| Line::from(Span::styled(p.message(), Style::default().fg(Color::Red))))
            .collect();
        if !analysis.slow_keys.is_empty() {
            let keys = analysis
                .slow_keys
                .iter()
                .map(|k| format!("'{}' {}ms", k.key, k.avg_latency_ms.round()))
                .collect::<Vec<_>>()
                .join("  ");
            detail_lines.push(Line::from(Span::styled(
                format!("slow keys: {keys}"),
                Style::default().fg(Color::Yellow),
            )));
        }
        Paragraph::new(detail_lines)
            .alignment(Alignment::Center)
            .render(chunks[5], buf);

        let legend = if self.can_share {
            "(r)etry / (n)ew / (p)lay back / (m)ode / (t)weet / (esc)ape"
        } else {
            "(r)etry / (n)ew / (p)lay back / (m)ode / (esc)ape"
        };
        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .render(chunks[7], buf);
    }
}
