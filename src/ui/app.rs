//! Replay application state and key handling

use crate::engine::errors::ExecError;
use crate::engine::instruction::{Instruction, PrintResult};
use crate::engine::plan::{classify, ExecutionPlan};
use crate::trace::ExecutionTrace;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Program,
    Variables,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (program -> output -> variables)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Program,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Variables,
            FocusedPane::Output => FocusedPane::Program,
            FocusedPane::Variables => FocusedPane::Output,
        }
    }
}

/// The main application state
pub struct App {
    pub instructions: Vec<Instruction>,

    /// Plan of the program, or the error that prevented building one
    pub plan: Result<ExecutionPlan, ExecError>,

    /// Final outcome of the execution
    pub outcome: Result<Vec<PrintResult>, ExecError>,

    pub trace: ExecutionTrace,

    /// Replay position: number of completions shown, `0..=trace.len()`
    pub position: usize,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub program_scroll: usize,
    pub variables_scroll: usize,
    pub output_scroll: usize,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(
        instructions: Vec<Instruction>,
        outcome: Result<Vec<PrintResult>, ExecError>,
        trace: ExecutionTrace,
    ) -> Self {
        let plan = classify(&instructions);
        let plan = plan.and_then(|program| ExecutionPlan::build(&program));
        let status_message = match &outcome {
            Ok(results) => format!(
                "Ready! {} print(s), {} computation(s) in {}ms",
                results.len(),
                trace.len(),
                trace.span().as_millis()
            ),
            Err(err) => format!("Execution failed: {}", err),
        };

        App {
            instructions,
            plan,
            outcome,
            trace,
            position: 0,
            focused_pane: FocusedPane::Program,
            program_scroll: 0,
            variables_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if self.position < self.trace.len() {
                    self.position += 1;
                    self.status_message = "Playing...".to_string();
                    self.output_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Print results visible at the current position.
    pub fn visible_output(&self) -> &[PrintResult] {
        match &self.outcome {
            Ok(results) => self.trace.visible_output(results, self.position),
            Err(_) => &[],
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Program (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        super::panes::render_program_pane(
            frame,
            left_rows[0],
            &self.instructions,
            self.plan.as_ref().ok(),
            &self.trace,
            self.position,
            self.focused_pane == FocusedPane::Program,
            &mut self.program_scroll,
        );

        let mut output_scroll = self.output_scroll;
        super::panes::render_output_pane(
            frame,
            left_rows[1],
            self.visible_output(),
            self.focused_pane == FocusedPane::Output,
            &mut output_scroll,
        );
        self.output_scroll = output_scroll;

        super::panes::render_variables_pane(
            frame,
            columns[1],
            self.plan.as_ref(),
            &self.trace,
            self.position,
            self.focused_pane == FocusedPane::Variables,
            &mut self.variables_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.position,
            self.trace.len(),
            self.outcome.is_err(),
            self.is_playing,
        );
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (200ms debounce against key repeat)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        if self.position >= self.trace.len() {
                            self.position = 0;
                        }
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.position = self.trace.len();
                self.status_message = "Jumped to end".to_string();
                self.output_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.position = 0;
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Program => &mut self.program_scroll,
            FocusedPane::Variables => &mut self.variables_scroll,
            FocusedPane::Output => &mut self.output_scroll,
        }
    }

    fn step_forward(&mut self) {
        if self.position < self.trace.len() {
            self.position += 1;
            self.status_message = match self.trace.events().get(self.position - 1) {
                Some(event) => format!("Computed {} = {}", event.var, event.value),
                None => "Stepped forward".to_string(),
            };
            self.output_scroll = usize::MAX;
        } else {
            self.status_message = "Cannot step forward: already at the end".to_string();
        }
    }

    fn step_backward(&mut self) {
        if self.position > 0 {
            self.position -= 1;
            self.status_message = "Stepped backward".to_string();
        } else {
            self.status_message = "Cannot step backward: already at the start".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::instruction::{ArithmeticOp, Operand, Operand::Literal};
    use crate::trace::TraceEvent;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn event(var: &str, value: i64) -> TraceEvent {
        TraceEvent {
            var: var.to_string(),
            value,
            elapsed: Duration::ZERO,
            worker: None,
        }
    }

    fn sample_app() -> App {
        let instructions = vec![
            Instruction::calc("x", ArithmeticOp::Add, Literal(10), Literal(2)),
            Instruction::print("x"),
            Instruction::calc("y", ArithmeticOp::Multiply, Operand::var("x"), Literal(5)),
            Instruction::print("y"),
        ];
        let outcome = Ok(vec![PrintResult::new("x", 12), PrintResult::new("y", 60)]);
        let trace = ExecutionTrace::new(vec![event("x", 12), event("y", 60)]);
        App::new(instructions, outcome, trace)
    }

    #[test]
    fn test_stepping_is_clamped() {
        let mut app = sample_app();
        press(&mut app, KeyCode::Left);
        assert_eq!(app.position, 0);
        assert!(app.visible_output().is_empty());

        press(&mut app, KeyCode::Right);
        assert_eq!(app.position, 1);
        assert_eq!(app.visible_output().len(), 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.position, 2);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.position, 2);

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.position, 0);
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = sample_app();
        for _ in 0..3 {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.focused_pane, FocusedPane::Program);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Variables);
    }

    #[test]
    fn test_failed_program_keeps_error() {
        let instructions = vec![Instruction::print("missing")];
        let err = ExecError::UndefinedVariable("missing".to_string());
        let mut app = App::new(instructions, Err(err.clone()), ExecutionTrace::default());
        assert_eq!(app.plan.as_ref().err(), Some(&err));
        assert!(app.status_message.contains("missing"));
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
