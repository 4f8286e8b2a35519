//! Terminal User Interface for shippr
//!
//! One screen per route, drawn with ratatui and driven by crossterm input.

mod app;
pub mod components;
mod event;
pub mod screens;
pub(crate) mod theme;
pub(crate) mod ui;

pub use app::App;
pub use event::{Event, EventHandler};
pub use screens::{Command, Screen};
