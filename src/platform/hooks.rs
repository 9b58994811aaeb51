//! Signal-triggered transcript flushing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use signal_hook::iterator::Signals;

use crate::log::Log;

/// Flush the given logs once when SIGINT or SIGTERM arrives, so transcripts
/// survive an interrupted session. The returned guard unregisters the handler
/// thread when dropped.
pub fn flush_on_signal(logs: Vec<Arc<dyn Log>>) -> FlushGuard {
    let ran = Arc::new(AtomicBool::new(false));
    let mut signals = Signals::new([libc::SIGINT, libc::SIGTERM])
        .expect("failed to register signal handlers");
    let handle = signals.handle();

    let thread = thread::spawn(move || {
        for _ in signals.forever() {
            if !ran.swap(true, Ordering::SeqCst) {
                for log in &logs {
                    log.flush();
                }
            }
        }
    });

    FlushGuard {
        handle,
        thread: Some(thread),
    }
}

/// Guard for a [`flush_on_signal`] registration.
pub struct FlushGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

impl Drop for FlushGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use super::flush_on_signal;
    use crate::core::message::Msg;
    use crate::log::Log;

    #[derive(Default)]
    struct FlushProbe {
        flushes: AtomicUsize,
    }

    impl Log for FlushProbe {
        fn output(&self, _msg: &Msg) {}
        fn pause(&self) {}
        fn resume(&self) {}
        fn flush(&self) {
            self.flushes.fetch_add(1, Ordering::SeqCst);
        }
        fn close(&self) {}
    }

    #[test]
    fn sigint_flushes_registered_logs_once() {
        let probe = Arc::new(FlushProbe::default());
        let guard = flush_on_signal(vec![Arc::clone(&probe) as Arc<dyn Log>]);

        unsafe {
            libc::raise(libc::SIGINT);
        }

        for _ in 0..500 {
            if probe.flushes.load(Ordering::SeqCst) > 0 {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(probe.flushes.load(Ordering::SeqCst), 1);

        unsafe {
            libc::raise(libc::SIGINT);
        }
        thread::sleep(Duration::from_millis(20));
        assert_eq!(probe.flushes.load(Ordering::SeqCst), 1);

        drop(guard);
    }
}
