//! Part renderers: ANSI color, HTML, and color capability detection.
//!
//! A renderer is a pure function from `(kind, text)` to styled text; channels
//! and logs call whichever renderer they were configured with and never branch
//! on the output flavor themselves.

use once_cell::sync::OnceCell;

use crate::config::EnvConfig;
use crate::core::message::PartKind;

/// Renderer signature shared by channels and logs. Absence means pass-through.
pub type StyleFn = dyn Fn(PartKind, &str) -> String + Send + Sync;

const SGR_BRIGHT: &str = "\x1b[1m";
const SGR_NO_BRIGHT: &str = "\x1b[22m";
const SGR_FG_RESET: &str = "\x1b[39m";
const SGR_BG_RESET: &str = "\x1b[49m";

fn sgr_bright(text: &str) -> String {
    format!("{SGR_BRIGHT}{text}{SGR_NO_BRIGHT}")
}

fn sgr_fg(color: u8, text: &str) -> String {
    format!("\x1b[{color}m{}{SGR_FG_RESET}", sgr_bright(text))
}

fn sgr_bg(color: u8, text: &str) -> String {
    format!("\x1b[{color}m{}{SGR_BG_RESET}", sgr_fg(37, text))
}

/// Render a part with ANSI SGR color sequences.
pub fn ansi_style(kind: PartKind, text: &str) -> String {
    match kind {
        PartKind::Question => sgr_fg(36, text),
        PartKind::Answer | PartKind::Plain => text.to_string(),
        PartKind::Status => sgr_fg(32, text),
        PartKind::Error => sgr_fg(31, text),
        PartKind::Accent => sgr_fg(34, text),
        PartKind::Bright => sgr_bright(text),
        PartKind::BgHappy => sgr_bg(42, text),
        PartKind::BgSad => sgr_bg(41, text),
        PartKind::BgNeutral => sgr_bg(44, text),
    }
}

fn html_fg(color: &str, text: &str) -> String {
    format!("<span style=\"color: {color}; font-weight: bold;\">{text}</span>")
}

fn html_bg(color: &str, text: &str) -> String {
    format!("<span style=\"background-color: {color}; font-weight: bold;\">{text}</span>")
}

/// Escape text for inclusion in HTML output.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render a part as HTML, escaped and styled per kind. The output is meant to
/// sit inside a `<pre>` block.
pub fn html_style(kind: PartKind, text: &str) -> String {
    let escaped = escape_html(text);
    match kind {
        PartKind::Question => html_fg("#34E2E2", &escaped),
        PartKind::Answer => format!("<i>{escaped}</i>"),
        PartKind::Plain => escaped,
        PartKind::Status => html_fg("#8AE234", &escaped),
        PartKind::Error => html_fg("#EF2929", &escaped),
        PartKind::Accent => html_fg("#729FCF", &escaped),
        PartKind::Bright => format!("<b>{escaped}</b>"),
        PartKind::BgHappy => html_bg("green", &escaped),
        PartKind::BgSad => html_bg("red", &escaped),
        PartKind::BgNeutral => html_bg("blue", &escaped),
    }
}

static COLOR_SUPPORT: OnceCell<bool> = OnceCell::new();

/// Whether stdout can take ANSI color output.
///
/// Computed once per process, on first call: stdout must be a TTY, `TERM`
/// must be set to something other than `dumb`, and neither `NO_COLOR` nor
/// `LINEGATE_NO_COLOR` may be set.
pub fn color_support() -> bool {
    *COLOR_SUPPORT.get_or_init(|| {
        let config = EnvConfig::from_env();
        let term = std::env::var("TERM").ok();
        detect_color_support(config.no_color, term.as_deref(), stdout_is_tty())
    })
}

fn detect_color_support(no_color: bool, term: Option<&str>, stdout_is_tty: bool) -> bool {
    if no_color || !stdout_is_tty {
        return false;
    }
    matches!(term, Some(term) if term != "dumb")
}

#[cfg(unix)]
fn stdout_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDOUT_FILENO) == 1 }
}

#[cfg(not(unix))]
fn stdout_is_tty() -> bool {
    false
}
