//! File-backed transcript logs.

use std::io::Write;
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use super::{Lifecycle, Log};
use crate::core::message::Msg;
use crate::core::style::{html_style, StyleFn};

const HTML_HEADER: &str = "<!DOCTYPE html>\n<html>\n<body>\n<pre>\n";
const HTML_FOOTER: &str = "</pre>\n</body>\n</html>\n";

struct FileState {
    life: Lifecycle,
    sink: Option<Box<dyn Write + Send>>,
    failed: bool,
}

impl FileState {
    fn write(&mut self, text: &str) {
        if self.failed {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            if sink.write_all(text.as_bytes()).is_err() {
                self.failed = true;
            }
        }
    }

    fn flush(&mut self) {
        if self.failed {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            if sink.flush().is_err() {
                self.failed = true;
            }
        }
    }
}

/// Log that exclusively owns an already-open writable sink.
///
/// The HTML flavor brackets the session: a fixed header goes out at
/// construction and a fixed footer at close, so the file only parses as HTML
/// once the log is closed.
pub struct FileLog {
    style: Option<Box<StyleFn>>,
    footer: Option<&'static str>,
    state: Mutex<FileState>,
}

impl FileLog {
    /// Plain-text log over `sink`.
    pub fn plain(sink: Box<dyn Write + Send>) -> Self {
        Self::build(sink, None, None, None)
    }

    /// HTML log over `sink`; writes the document header immediately.
    pub fn html(sink: Box<dyn Write + Send>) -> Self {
        Self::build(
            sink,
            Some(Box::new(html_style)),
            Some(HTML_HEADER),
            Some(HTML_FOOTER),
        )
    }

    /// Plain log with a caller-supplied part renderer.
    pub fn with_style(sink: Box<dyn Write + Send>, style: Box<StyleFn>) -> Self {
        Self::build(sink, Some(style), None, None)
    }

    fn build(
        sink: Box<dyn Write + Send>,
        style: Option<Box<StyleFn>>,
        header: Option<&'static str>,
        footer: Option<&'static str>,
    ) -> Self {
        let mut state = FileState {
            life: Lifecycle::open(),
            sink: Some(sink),
            failed: false,
        };
        if let Some(header) = header {
            state.write(header);
        }
        Self {
            style,
            footer,
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, FileState> {
        self.state.lock().expect("file log lock poisoned")
    }

    /// Whether a sink write has failed; once set, output stops permanently.
    pub fn sink_failed(&self) -> bool {
        self.state().failed
    }

    pub fn opened_at(&self) -> SystemTime {
        self.state().life.opened_at()
    }

    pub fn closed_at(&self) -> Option<SystemTime> {
        self.state().life.closed_at()
    }
}

impl Log for FileLog {
    fn output(&self, msg: &Msg) {
        let rendered = msg.render(self.style.as_deref());
        let mut state = self.state();
        if state.life.writable() {
            state.write(&rendered);
        }
    }

    fn pause(&self) {
        self.state().life.set_enabled(false);
    }

    fn resume(&self) {
        self.state().life.set_enabled(true);
    }

    fn flush(&self) {
        let mut state = self.state();
        if !state.life.closed() {
            state.flush();
        }
    }

    fn close(&self) {
        let mut state = self.state();
        if state.life.close() {
            if let Some(footer) = self.footer {
                state.write(footer);
            }
            state.flush();
            state.sink = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use super::FileLog;
    use crate::log::Log;
    use crate::Msg;

    #[derive(Clone, Default)]
    struct SharedSink {
        data: Arc<Mutex<Vec<u8>>>,
    }

    impl SharedSink {
        fn contents(&self) -> String {
            String::from_utf8(self.data.lock().expect("sink lock poisoned").clone())
                .expect("sink not utf-8")
        }
    }

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.data
                .lock()
                .expect("sink lock poisoned")
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("sink broke"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn plain_log_writes_rendered_text() {
        let sink = SharedSink::default();
        let log = FileLog::plain(Box::new(sink.clone()));
        log.output(&Msg::new().plain("hello"));
        assert_eq!(sink.contents(), "hello\n");
    }

    #[test]
    fn html_log_brackets_the_session() {
        let sink = SharedSink::default();
        let log = FileLog::html(Box::new(sink.clone()));
        log.output(&Msg::new().plain("hello"));
        log.close();

        let contents = sink.contents();
        assert!(contents.starts_with("<!DOCTYPE html>\n<html>\n<body>\n<pre>\n"));
        assert!(contents.ends_with("</pre>\n</body>\n</html>\n"));
        assert!(contents.contains("hello"));
    }

    #[test]
    fn close_releases_the_sink_once() {
        let sink = SharedSink::default();
        let log = FileLog::html(Box::new(sink.clone()));
        log.close();
        log.close();

        let contents = sink.contents();
        assert_eq!(contents.matches("</html>").count(), 1);
    }

    #[test]
    fn output_after_close_is_dropped() {
        let sink = SharedSink::default();
        let log = FileLog::plain(Box::new(sink.clone()));
        log.close();
        log.output(&Msg::new().plain("late"));
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn first_write_failure_latches() {
        let log = FileLog::plain(Box::new(FailingSink));
        log.output(&Msg::new().plain("x"));
        assert!(log.sink_failed());
        log.output(&Msg::new().plain("y"));
        assert!(log.sink_failed());
    }
}
