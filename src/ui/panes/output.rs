//! Output pane rendering

use super::{pane_block, visible_range};
use crate::engine::instruction::PrintResult;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the printed values revealed so far
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    output: &[PrintResult],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Output ", is_focused);

    if output.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let range = visible_range(area, output.len(), scroll_offset);
    let var_style = Style::default().fg(DEFAULT_THEME.variable);
    let value_style = Style::default().fg(DEFAULT_THEME.number);

    let items: Vec<ListItem> = output[range]
        .iter()
        .map(|result| {
            ListItem::new(Line::from(vec![
                Span::styled(result.var.as_str(), var_style),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.fg)),
                Span::styled(result.value.to_string(), value_style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
