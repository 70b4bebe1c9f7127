//! Variables pane: required variables in evaluation order

use super::{pane_block, visible_range};
use crate::engine::errors::ExecError;
use crate::engine::plan::ExecutionPlan;
use crate::trace::ExecutionTrace;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render_variables_pane(
    frame: &mut Frame,
    area: Rect,
    plan: Result<&ExecutionPlan, &ExecError>,
    trace: &ExecutionTrace,
    step: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Variables ", is_focused);

    let plan = match plan {
        Ok(plan) if !plan.is_empty() => plan,
        Ok(_) => {
            let paragraph = Paragraph::new("(nothing to compute)")
                .block(block)
                .style(Style::default().fg(DEFAULT_THEME.comment));
            frame.render_widget(paragraph, area);
            return;
        }
        Err(err) => {
            let paragraph = Paragraph::new(err.to_string())
                .block(block)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(DEFAULT_THEME.error));
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let order: Vec<&str> = plan.evaluation_order().collect();
    let range = visible_range(area, order.len(), scroll_offset);
    let comment_style = Style::default().fg(DEFAULT_THEME.comment);

    let items: Vec<ListItem> = order[range]
        .iter()
        .map(|var| {
            let line = match trace.computed_at(var, step) {
                Some(event) => Line::from(vec![
                    Span::styled(
                        format!("{:<12}", var),
                        Style::default()
                            .fg(DEFAULT_THEME.variable)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("{:>20}", event.value),
                        Style::default().fg(DEFAULT_THEME.number),
                    ),
                    Span::styled(
                        format!(
                            "  {:>6}ms  {}",
                            event.elapsed.as_millis(),
                            event.worker.as_deref().unwrap_or("-")
                        ),
                        comment_style,
                    ),
                ]),
                None => Line::from(vec![
                    Span::styled(
                        format!("{:<12}", var),
                        Style::default().fg(DEFAULT_THEME.pending),
                    ),
                    Span::styled(format!("{:>20}", "pending"), comment_style),
                ]),
            };
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
