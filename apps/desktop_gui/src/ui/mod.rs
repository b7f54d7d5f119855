//! UI layer for desktop GUI: app shell, widgets, and theme.

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::GameApp;
