//! Message parts and the fluent message builder.

use crate::core::style::StyleFn;
use crate::core::text::visible_width;

/// Semantic tag for one part of a message.
///
/// Kinds carry no styling of their own; a renderer maps them to color or
/// markup at output time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// A prompt shown to the user.
    Question,
    /// Echo of what the user typed back at a prompt.
    Answer,
    /// Ordinary text.
    Plain,
    /// Progress or success text.
    Status,
    /// Error text.
    Error,
    /// Highlighted auxiliary text.
    Accent,
    /// Emphasized text.
    Bright,
    /// Block-highlighted happy outcome.
    BgHappy,
    /// Block-highlighted sad outcome.
    BgSad,
    /// Block-highlighted neutral outcome.
    BgNeutral,
}

/// One typed, pre-render piece of a [`Msg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub kind: PartKind,
    pub text: String,
}

/// An ordered sequence of typed parts with a separator and terminator.
///
/// Built fluently; the builder owns its parts until the message is rendered:
///
/// ```
/// use linegate::Msg;
///
/// let msg = Msg::new().status("copied").accent("3 files");
/// assert_eq!(msg.render(None), "copied 3 files\n");
/// ```
#[derive(Debug, Clone)]
pub struct Msg {
    parts: Vec<Part>,
    sep: String,
    end: String,
}

impl Default for Msg {
    fn default() -> Self {
        Self::new()
    }
}

impl Msg {
    /// A message with the default `" "` separator and `"\n"` terminator.
    pub fn new() -> Self {
        Self {
            parts: Vec::new(),
            sep: " ".to_string(),
            end: "\n".to_string(),
        }
    }

    /// Replace the string joining adjacent parts.
    pub fn separator(mut self, sep: impl Into<String>) -> Self {
        self.sep = sep.into();
        self
    }

    /// Replace the string appended once after the last part.
    pub fn terminator(mut self, end: impl Into<String>) -> Self {
        self.end = end.into();
        self
    }

    /// Append a part and return the message for chaining.
    pub fn add(mut self, kind: PartKind, text: impl Into<String>) -> Self {
        self.parts.push(Part {
            kind,
            text: text.into(),
        });
        self
    }

    pub fn plain(self, text: impl Into<String>) -> Self {
        self.add(PartKind::Plain, text)
    }

    pub fn status(self, text: impl Into<String>) -> Self {
        self.add(PartKind::Status, text)
    }

    pub fn error(self, text: impl Into<String>) -> Self {
        self.add(PartKind::Error, text)
    }

    pub fn accent(self, text: impl Into<String>) -> Self {
        self.add(PartKind::Accent, text)
    }

    pub fn bright(self, text: impl Into<String>) -> Self {
        self.add(PartKind::Bright, text)
    }

    pub fn bg_happy(self, text: impl Into<String>) -> Self {
        self.add(PartKind::BgHappy, text)
    }

    pub fn bg_sad(self, text: impl Into<String>) -> Self {
        self.add(PartKind::BgSad, text)
    }

    pub fn bg_neutral(self, text: impl Into<String>) -> Self {
        self.add(PartKind::BgNeutral, text)
    }

    pub fn question(self, text: impl Into<String>) -> Self {
        self.add(PartKind::Question, text)
    }

    pub fn answer(self, text: impl Into<String>) -> Self {
        self.add(PartKind::Answer, text)
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Render to a string: apply `style` (identity when `None`) to each part,
    /// join with the separator, append the terminator.
    pub fn render(&self, style: Option<&StyleFn>) -> String {
        let mut out = String::new();
        for (idx, part) in self.parts.iter().enumerate() {
            if idx > 0 {
                out.push_str(&self.sep);
            }
            match style {
                Some(style) => out.push_str(&style(part.kind, &part.text)),
                None => out.push_str(&part.text),
            }
        }
        out.push_str(&self.end);
        out
    }

    /// Character length of the unstyled rendering, terminator included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.render(None).chars().count()
    }

    /// Display-column width of the unstyled rendering. Layout code sizes
    /// columns with this, not with [`Msg::len`].
    pub fn width(&self) -> usize {
        visible_width(&self.render(None))
    }

    /// Whether any part or the separator would break a printed line.
    /// The terminator does not count.
    pub(crate) fn has_embedded_newline(&self) -> bool {
        if self.parts.len() > 1 && self.sep.contains('\n') {
            return true;
        }
        self.parts.iter().any(|part| part.text.contains('\n'))
    }
}
