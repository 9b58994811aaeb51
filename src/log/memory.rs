//! In-memory transcript logs.

use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use super::{Lifecycle, Log};
use crate::core::message::Msg;
use crate::core::style::{html_style, StyleFn};

const PRE_OPEN: &str = "<pre>\n";
const PRE_CLOSE: &str = "</pre>\n";

struct MemoryState {
    life: Lifecycle,
    buffer: String,
}

/// Log that accumulates rendered messages in memory.
pub struct MemoryLog {
    style: Option<Box<StyleFn>>,
    html_markers: bool,
    state: Mutex<MemoryState>,
}

impl MemoryLog {
    /// Plain-text log with no part styling.
    pub fn plain() -> Self {
        Self::build(None, false)
    }

    /// HTML log. Parts are escaped and styled; [`MemoryLog::contents`] wraps
    /// the accumulated text in a `<pre>` block.
    pub fn html() -> Self {
        Self::build(Some(Box::new(html_style)), true)
    }

    /// Log with a caller-supplied part renderer.
    pub fn with_style(style: Box<StyleFn>) -> Self {
        Self::build(Some(style), false)
    }

    fn build(style: Option<Box<StyleFn>>, html_markers: bool) -> Self {
        Self {
            style,
            html_markers,
            state: Mutex::new(MemoryState {
                life: Lifecycle::open(),
                buffer: String::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory log lock poisoned")
    }

    /// The full accumulated text.
    pub fn contents(&self) -> String {
        let state = self.state();
        if self.html_markers {
            format!("{PRE_OPEN}{}{PRE_CLOSE}", state.buffer)
        } else {
            state.buffer.clone()
        }
    }

    /// Start a fresh log, discarding previous contents. No-op once closed.
    pub fn reset(&self) {
        let mut state = self.state();
        if !state.life.closed() {
            state.buffer.clear();
        }
    }

    pub fn opened_at(&self) -> SystemTime {
        self.state().life.opened_at()
    }

    pub fn closed_at(&self) -> Option<SystemTime> {
        self.state().life.closed_at()
    }
}

impl Log for MemoryLog {
    fn output(&self, msg: &Msg) {
        let rendered = msg.render(self.style.as_deref());
        let mut state = self.state();
        if state.life.writable() {
            state.buffer.push_str(&rendered);
        }
    }

    fn pause(&self) {
        self.state().life.set_enabled(false);
    }

    fn resume(&self) {
        self.state().life.set_enabled(true);
    }

    fn flush(&self) {}

    fn close(&self) {
        self.state().life.close();
    }
}
