//! Device primitives behind a channel.

/// Minimal terminal-like endpoint a [`Channel`](crate::Channel) serializes
/// access to. Implementations are driven only by the current floor holder.
pub trait Device: Send {
    /// Write already-styled text to the device.
    fn write_text(&mut self, text: &str);

    /// Read one line, displaying `prompt` first when given.
    ///
    /// Returns the line without its trailing newline, or `None` on
    /// end-of-input. End-of-input is a result, not an error.
    fn read_line(&mut self, prompt: Option<&str>) -> Option<String>;

    /// Device dimensions as `(columns, rows)`; `None` when unknown.
    fn size(&self) -> (Option<u16>, Option<u16>);

    /// Register autocomplete candidates for the next read, or clear them.
    fn set_autocomplete(&mut self, _candidates: Option<&[String]>) {}

    /// Device-specific teardown, run once when the owning channel closes.
    fn close(&mut self) {}
}
