//! Program pane: the instruction list as submitted

use super::{pane_block, visible_range};
use crate::engine::instruction::Instruction;
use crate::engine::plan::ExecutionPlan;
use crate::trace::ExecutionTrace;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

fn instruction_line<'a>(
    index: usize,
    instruction: &'a Instruction,
    plan: Option<&ExecutionPlan>,
    trace: &ExecutionTrace,
    step: usize,
) -> Line<'a> {
    let number = Span::styled(
        format!("{:>3}  ", index + 1),
        Style::default().fg(DEFAULT_THEME.comment),
    );
    let var_style = Style::default().fg(DEFAULT_THEME.variable);
    let number_style = Style::default().fg(DEFAULT_THEME.number);

    match instruction {
        Instruction::Print(print) => {
            let done = trace.computed_at(&print.var, step).is_some();
            let mut spans = vec![
                number,
                Span::styled("print ", Style::default().fg(DEFAULT_THEME.keyword)),
                Span::styled(print.var.as_str(), var_style),
            ];
            if done {
                spans.push(Span::styled("  ✓", Style::default().fg(DEFAULT_THEME.success)));
            }
            Line::from(spans)
        }
        Instruction::Calc(calc) => {
            let required = plan.is_some_and(|plan| plan.is_required(&calc.var));
            if !required {
                return Line::from(vec![
                    number,
                    Span::styled(
                        format!("{}  (unused)", calc),
                        Style::default()
                            .fg(DEFAULT_THEME.comment)
                            .add_modifier(Modifier::ITALIC),
                    ),
                ]);
            }

            let target_style = if trace.computed_at(&calc.var, step).is_some() {
                Style::default()
                    .fg(DEFAULT_THEME.success)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.pending)
            };

            Line::from(vec![
                number,
                Span::styled(calc.var.as_str(), target_style),
                Span::raw(" = "),
                Span::styled(calc.left.to_string(), number_style),
                Span::raw(format!(" {} ", calc.op)),
                Span::styled(calc.right.to_string(), number_style),
            ])
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn render_program_pane(
    frame: &mut Frame,
    area: Rect,
    instructions: &[Instruction],
    plan: Option<&ExecutionPlan>,
    trace: &ExecutionTrace,
    step: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Program ", is_focused);
    let range = visible_range(area, instructions.len(), scroll_offset);

    let items: Vec<ListItem> = instructions[range.clone()]
        .iter()
        .enumerate()
        .map(|(i, instruction)| {
            let line = instruction_line(range.start + i, instruction, plan, trace, step);
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
