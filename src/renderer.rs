use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::config::{GLYPH_FOOD, GLYPH_GRID_DOT, Theme};
use crate::game::{RunState, Snapshot};
use crate::grid::{Cell, Grid};
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Terminal columns per scale step; two columns per row keeps cells square-ish.
const COLUMNS_PER_ROW: u16 = 2;

/// Share of the body colour lost by the last segment.
const TAIL_FADE: f32 = 0.6;

/// Where the board lands on screen and how big each logical cell is.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BoardLayout {
    /// Bordered board area.
    pub outer: Rect,
    /// Area covered by cells.
    pub inner: Rect,
    pub cell_width: u16,
    pub cell_height: u16,
}

impl BoardLayout {
    /// Fits the largest integer-scaled board inside `area`, centred.
    ///
    /// Returns `None` when not even one row per cell fits.
    #[must_use]
    pub fn fit(area: Rect, grid: Grid) -> Option<Self> {
        let size = grid.size();
        if size == 0 {
            return None;
        }

        let usable_width = area.width.saturating_sub(2);
        let usable_height = area.height.saturating_sub(2);
        let scale = (usable_width / size.saturating_mul(COLUMNS_PER_ROW)).min(usable_height / size);
        if scale == 0 {
            return None;
        }

        let cell_width = scale * COLUMNS_PER_ROW;
        let cell_height = scale;
        let inner_width = cell_width * size;
        let inner_height = cell_height * size;

        let outer = Rect {
            x: area.x + (area.width - (inner_width + 2)) / 2,
            y: area.y + (area.height - (inner_height + 2)) / 2,
            width: inner_width + 2,
            height: inner_height + 2,
        };
        let inner = Rect {
            x: outer.x + 1,
            y: outer.y + 1,
            width: inner_width,
            height: inner_height,
        };

        Some(Self {
            outer,
            inner,
            cell_width,
            cell_height,
        })
    }

    /// Screen rectangle of one logical cell.
    #[must_use]
    pub fn cell_rect(&self, grid: Grid, cell: Cell) -> Option<Rect> {
        if !grid.contains(cell) {
            return None;
        }

        let column = u16::try_from(cell.x).ok()?;
        let row = u16::try_from(cell.y).ok()?;
        Some(Rect {
            x: self.inner.x + column * self.cell_width,
            y: self.inner.y + row * self.cell_height,
            width: self.cell_width,
            height: self.cell_height,
        })
    }
}

/// Renders the full frame from a read-only snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot<'_>, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Block::new().style(Style::new().bg(theme.play_bg)), area);

    let [hud_area, play_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
    render_hud(frame, hud_area, snapshot, theme);

    let Some(layout) = BoardLayout::fit(play_area, snapshot.grid) else {
        render_too_small(frame, play_area, theme);
        return;
    };

    frame.render_widget(
        Block::bordered().border_style(Style::new().fg(theme.border_fg).bg(theme.play_bg)),
        layout.outer,
    );
    render_grid(frame, &layout, snapshot.grid, theme);
    render_food(frame, &layout, snapshot, theme);
    render_snake(frame, &layout, snapshot, theme);

    match snapshot.run_state {
        RunState::NotStarted => render_start_menu(frame, layout.outer, snapshot.high_score, theme),
        RunState::Paused => render_pause_menu(frame, layout.outer, theme),
        RunState::Over => render_game_over_menu(frame, layout.outer, snapshot, theme),
        RunState::Running => {}
    }
}

fn render_too_small(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    frame.render_widget(
        Paragraph::new("Terminal too small, please enlarge the window")
            .style(Style::new().fg(theme.overlay_text).bg(theme.play_bg)),
        area,
    );
}

fn render_grid(frame: &mut Frame<'_>, layout: &BoardLayout, grid: Grid, theme: &Theme) {
    let style = Style::new().fg(theme.grid_dot).bg(theme.play_bg);
    let buffer = frame.buffer_mut();
    for cell in grid.cells() {
        if let Some(rect) = layout.cell_rect(grid, cell) {
            let (x, y) = rect_center(rect);
            buffer.set_string(x, y, GLYPH_GRID_DOT, style);
        }
    }
}

fn render_food(frame: &mut Frame<'_>, layout: &BoardLayout, snapshot: &Snapshot<'_>, theme: &Theme) {
    let Some(rect) = snapshot
        .food
        .and_then(|food| layout.cell_rect(snapshot.grid, food))
    else {
        return;
    };

    let (x, y) = rect_center(rect);
    frame.buffer_mut().set_string(
        x,
        y,
        GLYPH_FOOD,
        Style::new()
            .fg(theme.food)
            .bg(theme.play_bg)
            .add_modifier(Modifier::BOLD),
    );
}

fn render_snake(
    frame: &mut Frame<'_>,
    layout: &BoardLayout,
    snapshot: &Snapshot<'_>,
    theme: &Theme,
) {
    let length = snapshot.snake.len();
    let buffer = frame.buffer_mut();

    for (index, segment) in snapshot.snake.segments().enumerate() {
        let Some(rect) = layout.cell_rect(snapshot.grid, *segment) else {
            continue;
        };

        let color = if index == 0 {
            theme.snake_head
        } else {
            segment_color(theme, index, length)
        };
        let fill = " ".repeat(usize::from(rect.width));
        for y in rect.top()..rect.bottom() {
            buffer.set_string(rect.x, y, &fill, Style::new().bg(color));
        }
    }
}

/// Body colour faded toward the background by position along the body.
#[must_use]
pub fn segment_color(theme: &Theme, index: usize, length: usize) -> Color {
    let alpha = 1.0 - (index as f32 / length.max(1) as f32) * TAIL_FADE;
    blend(theme.snake_body, theme.play_bg, alpha)
}

/// Mixes two RGB colours; non-RGB colours pass `fg` through unchanged.
#[must_use]
pub fn blend(fg: Color, bg: Color, alpha: f32) -> Color {
    let (Color::Rgb(fr, fg_g, fb), Color::Rgb(br, bg_g, bb)) = (fg, bg) else {
        return fg;
    };

    let alpha = alpha.clamp(0.0, 1.0);
    let mix = |front: u8, back: u8| -> u8 {
        (f32::from(front) * alpha + f32::from(back) * (1.0 - alpha)).round() as u8
    };
    Color::Rgb(mix(fr, br), mix(fg_g, bg_g), mix(fb, bb))
}

fn rect_center(rect: Rect) -> (u16, u16) {
    (
        rect.x + rect.width.saturating_sub(1) / 2,
        rect.y + rect.height.saturating_sub(1) / 2,
    )
}
