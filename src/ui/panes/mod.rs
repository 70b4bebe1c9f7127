//! TUI pane rendering
//!
//! - [`program`]: instruction list, required instructions highlighted
//! - [`variables`]: required variables with pending / done state
//! - [`output`]: print results revealed so far
//! - [`status`]: status bar with keybindings and replay position

pub mod output;
pub mod program;
pub mod status;
pub mod variables;

pub use output::render_output_pane;
pub use program::render_program_pane;
pub use status::render_status_bar;
pub use variables::render_variables_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `scroll_offset` for `total_items` rows in `area` and return the
/// visible index range.
fn visible_range(
    area: Rect,
    total_items: usize,
    scroll_offset: &mut usize,
) -> std::ops::Range<usize> {
    // Account for borders, min 1
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    *scroll_offset..(*scroll_offset + visible_height).min(total_items)
}
