//! Process terminal integrations.

pub mod console;
#[cfg(unix)]
pub mod hooks;

pub use console::{color_console, console, ConsoleDevice};
#[cfg(unix)]
pub use hooks::{flush_on_signal, FlushGuard};
