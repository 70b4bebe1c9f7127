//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! Replays an [`ExecutionTrace`] one completed computation at a time.
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus
//! - **[`panes`]**: stateless render functions for each visible pane (program,
//!   variables, output, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! [`ExecutionTrace`]: crate::trace::ExecutionTrace

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
