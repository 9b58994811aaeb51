//! Stdout/stdin device and console channel constructors.

use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::channel::Channel;
use crate::config::EnvConfig;
use crate::core::device::Device;
use crate::core::style::{ansi_style, color_support};
use crate::log::Log;

#[cfg(unix)]
fn read_winsize(fd: libc::c_int) -> Option<(u16, u16)> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        Some((size.ws_col, size.ws_row))
    } else {
        None
    }
}

type CompleterHook = Box<dyn FnMut(Option<&[String]>) + Send>;

/// Device over the process's stdin/stdout.
///
/// When `LINEGATE_WRITE_LOG` names a file, every raw write is mirrored there
/// for debugging; the first mirror failure disables mirroring for the rest of
/// the session.
pub struct ConsoleDevice {
    write_log_path: Option<PathBuf>,
    write_log_failed: bool,
    completer: Option<CompleterHook>,
}

impl ConsoleDevice {
    pub fn new() -> Self {
        let config = EnvConfig::from_env();
        Self {
            write_log_path: config.write_log.map(PathBuf::from),
            write_log_failed: false,
            completer: None,
        }
    }

    /// Install a hook that receives autocomplete candidates around each read.
    /// The hook is called with `Some(candidates)` before a read that supplies
    /// them and with `None` right after every read.
    pub fn completer(mut self, hook: CompleterHook) -> Self {
        self.completer = Some(hook);
        self
    }
}

impl Default for ConsoleDevice {
    fn default() -> Self {
        Self::new()
    }
}

fn mirror_write(path: &Option<PathBuf>, failed: &mut bool, data: &str) {
    if *failed {
        return;
    }
    let Some(path) = path else {
        return;
    };
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| file.write_all(data.as_bytes()));
    if result.is_err() {
        *failed = true;
    }
}

impl Device for ConsoleDevice {
    fn write_text(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(err) = stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
        {
            panic!("failed to write to console: {err}");
        }
        drop(stdout);
        mirror_write(&self.write_log_path, &mut self.write_log_failed, text);
    }

    fn read_line(&mut self, prompt: Option<&str>) -> Option<String> {
        if let Some(prompt) = prompt {
            self.write_text(prompt);
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
        }
    }

    fn size(&self) -> (Option<u16>, Option<u16>) {
        #[cfg(unix)]
        {
            match read_winsize(libc::STDOUT_FILENO) {
                Some((cols, rows)) => (Some(cols), Some(rows)),
                None => (None, None),
            }
        }
        #[cfg(not(unix))]
        {
            (None, None)
        }
    }

    fn set_autocomplete(&mut self, candidates: Option<&[String]>) {
        if let Some(hook) = self.completer.as_mut() {
            hook(candidates);
        }
    }
}

/// Console channel without color.
pub fn console(delegates: Vec<Arc<dyn Log>>) -> Channel<ConsoleDevice> {
    let mut channel = Channel::new(ConsoleDevice::new());
    for delegate in delegates {
        channel = channel.delegate(delegate);
    }
    channel
}

/// Console channel with ANSI color when the terminal supports it.
///
/// Without color support the channel falls back to pass-through rendering and
/// announces the downgrade once, through its own output path, naming
/// `application_name` when given.
pub fn color_console(
    application_name: Option<&str>,
    delegates: Vec<Arc<dyn Log>>,
) -> Channel<ConsoleDevice> {
    let channel = console(delegates);
    if color_support() {
        return channel.style(Box::new(ansi_style));
    }

    let _ = channel.print("");
    let _ = channel.error("==> ANSI color support not detected!");
    let _ = channel.error(format!(
        "==> {} will be in plain black-and-white",
        application_name.unwrap_or("Output")
    ));
    let _ = channel.print("");
    channel
}
