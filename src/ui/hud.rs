use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;
use crate::game::Snapshot;

const SEPARATOR: &str = " │ ";
const KEY_HINTS: &str = "[Space] pause  [T] theme  [Q] quit";

/// Draws the one-line status bar: length, speed, score and high score on the
/// left, key hints on the right when there is room.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot<'_>, theme: &Theme) {
    let stats = stats_line(snapshot, usize::from(area.width), theme);
    let stats_width = u16::try_from(stats.width()).unwrap_or(u16::MAX);
    let [stats_area, hints_area] =
        Layout::horizontal([Constraint::Length(stats_width), Constraint::Min(0)]).areas(area);

    frame.render_widget(
        Paragraph::new(stats).style(Style::new().fg(theme.hud_text).bg(theme.play_bg)),
        stats_area,
    );

    if usize::from(hints_area.width) > KEY_HINTS.width() {
        frame.render_widget(
            Paragraph::new(KEY_HINTS)
                .alignment(Alignment::Right)
                .style(Style::new().fg(theme.menu_footer).bg(theme.play_bg)),
            hints_area,
        );
    }
}

fn stats_line(snapshot: &Snapshot<'_>, available_width: usize, theme: &Theme) -> Line<'static> {
    let compact = stats_width(snapshot, false) > available_width;
    let label = |full: &'static str, short: &'static str| if compact { short } else { full };

    let value_style = Style::new().fg(theme.hud_text);
    let is_record = snapshot.score > 0 && snapshot.score == snapshot.high_score;
    let score_style = if is_record {
        Style::new().fg(theme.hud_accent).add_modifier(Modifier::BOLD)
    } else {
        value_style
    };

    Line::from(vec![
        Span::raw(format!("{}: ", label("Length", "L"))),
        Span::styled(snapshot.snake.len().to_string(), value_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{}: ", label("Speed", "V"))),
        Span::styled(snapshot.speed_level.to_string(), value_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{}: ", label("Score", "S"))),
        Span::styled(snapshot.score.to_string(), score_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{}: ", label("Hi", "H"))),
        Span::styled(
            snapshot.high_score.to_string(),
            Style::new().fg(theme.hud_accent),
        ),
    ])
}

fn stats_width(snapshot: &Snapshot<'_>, compact: bool) -> usize {
    let labels: [&str; 4] = if compact {
        ["L", "V", "S", "H"]
    } else {
        ["Length", "Speed", "Score", "Hi"]
    };
    let values = [
        snapshot.snake.len().to_string(),
        snapshot.speed_level.to_string(),
        snapshot.score.to_string(),
        snapshot.high_score.to_string(),
    ];

    let fields: usize = labels
        .iter()
        .zip(values.iter())
        .map(|(label, value)| label.width() + 2 + value.width())
        .sum();
    fields + SEPARATOR.width() * (labels.len() - 1)
}
