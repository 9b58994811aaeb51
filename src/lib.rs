//! Serialized multi-destination text I/O for interactive command-line
//! programs.
//!
//! Invariant: a single floor. All device I/O on a [`Channel`] flows through
//! one FIFO-admitted caller at a time, and every message the device receives
//! is mirrored to every delegate [`Log`].
//!
//! # Public API Overview
//! - Build [`Msg`] values from typed parts and print them through a
//!   [`Channel`].
//! - Mirror everything the user saw and typed into [`Log`] delegates
//!   (in-memory, file-backed, plain or HTML).
//! - Implement [`Device`] to back a channel with any terminal-like endpoint;
//!   [`ConsoleDevice`] covers the process's stdin/stdout.
//! - Take the floor for a whole scope with [`Channel::exclusive_io`] when a
//!   sequence of I/O calls must not be interleaved.

pub mod channel;
pub mod config;
pub mod core;
pub mod log;
pub mod platform;

/// Message model.
pub use crate::core::message::{Msg, Part, PartKind};

/// Part renderers and color capability detection.
pub use crate::core::style::{ansi_style, color_support, escape_html, html_style, StyleFn};

/// Device primitives implemented by concrete terminals.
pub use crate::core::device::Device;

/// The serialized channel and its option/error types.
pub use crate::channel::{
    Channel, ChannelError, PromptOptions, RawIo, DEFAULT_BAD_CHOICE_MSG, DEFAULT_EMPTY_CHOICE_MSG,
};

/// Passive transcript sinks.
pub use crate::log::{FileLog, Log, MemoryLog, NullLog};

/// Process terminal integration.
pub use crate::platform::console::{color_console, console, ConsoleDevice};
#[cfg(unix)]
pub use crate::platform::hooks::{flush_on_signal, FlushGuard};

/// Width helpers shared with layout code.
pub use crate::core::text::{visible_width, wrap_line};
