use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;
use crate::game::{GameOverReason, Snapshot};

const POPUP_PADDING_X: u16 = 3;

/// Draws the start screen over the board.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, high_score: u32, theme: &Theme) {
    let lines = vec![
        title_line("SNAKE", theme),
        Line::from(""),
        Line::from(format!("High score: {high_score}")),
        Line::from(""),
        Line::from("[Enter] Start"),
        Line::from("[Q] Quit"),
        Line::from(""),
        footer_line("Arrows/WASD to move", theme),
    ];

    render_popup(frame, area, " start ", lines, theme);
}

/// Draws the pause overlay.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let lines = vec![
        title_line("PAUSED", theme),
        Line::from(""),
        Line::from("Press SPACE to resume"),
        footer_line("[Q] Quit", theme),
    ];

    render_popup(frame, area, " pause ", lines, theme);
}

/// Draws the game-over modal with the final score.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot<'_>,
    theme: &Theme,
) {
    let mut lines = vec![
        title_line("GAME OVER", theme),
        Line::from(""),
        Line::from(format!("Final score: {}", snapshot.score)),
        Line::from(format!("High score: {}", snapshot.high_score)),
    ];

    if let Some(reason) = snapshot.over_reason {
        lines.push(Line::from(format!("Cause: {}", reason_text(reason))));
    }
    if snapshot.new_high_score {
        lines.push(
            Line::from("New high score!")
                .style(Style::new().fg(theme.hud_accent).add_modifier(Modifier::BOLD)),
        );
    }

    lines.push(Line::from(""));
    lines.push(Line::from("[Enter]/[R] Play Again"));
    lines.push(footer_line("[Q] Quit", theme));

    render_popup(frame, area, " game over ", lines, theme);
}

fn reason_text(reason: GameOverReason) -> &'static str {
    match reason {
        GameOverReason::WallCollision => "hit wall",
        GameOverReason::SelfCollision => "hit yourself",
        GameOverReason::BoardFilled => "board filled",
    }
}

fn title_line(text: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(text).style(
        Style::new()
            .fg(theme.menu_title)
            .add_modifier(Modifier::BOLD),
    )
}

fn footer_line(text: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(text).style(Style::new().fg(theme.menu_footer))
}

fn render_popup(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &'static str,
    lines: Vec<Line<'static>>,
    theme: &Theme,
) {
    let popup = content_popup(area, &lines);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::new().fg(theme.overlay_text).bg(theme.play_bg))
            .block(
                Block::bordered()
                    .title(title)
                    .border_style(Style::new().fg(theme.border_fg)),
            ),
        popup,
    );
}

/// Centres a box sized to `lines` inside `area`, shrinking to fit.
fn content_popup(area: Rect, lines: &[Line<'_>]) -> Rect {
    let content_width = lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.width())
                .sum::<usize>()
        })
        .max()
        .unwrap_or(0);
    let content_width = u16::try_from(content_width).unwrap_or(u16::MAX);
    let content_height = u16::try_from(lines.len()).unwrap_or(u16::MAX);

    let width = content_width
        .saturating_add(2 * POPUP_PADDING_X + 2)
        .min(area.width);
    let height = content_height.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
