//! Environment configuration.

use std::env;

#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Mirror every raw device write to this file (debugging aid).
    pub write_log: Option<String>,
    /// Disable ANSI color even when the terminal supports it.
    pub no_color: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            write_log: env_string_opt("LINEGATE_WRITE_LOG"),
            no_color: env_flag("LINEGATE_NO_COLOR") || env_string_opt("NO_COLOR").is_some(),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::EnvConfig;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                env::set_var(self.key, value);
            } else {
                env::remove_var(self.key);
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
            .lock()
            .expect("env lock poisoned")
    }

    fn set_env_guard(key: &'static str, value: Option<&str>) -> EnvGuard {
        let previous = env::var(key).ok();
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
        EnvGuard { key, previous }
    }

    #[test]
    fn defaults_are_unset() {
        let _lock = env_lock();
        let _g1 = set_env_guard("LINEGATE_WRITE_LOG", None);
        let _g2 = set_env_guard("LINEGATE_NO_COLOR", None);
        let _g3 = set_env_guard("NO_COLOR", None);

        let config = EnvConfig::from_env();
        assert!(config.write_log.is_none());
        assert!(!config.no_color);
    }

    #[test]
    fn no_color_honors_both_variables() {
        let _lock = env_lock();
        let _g1 = set_env_guard("LINEGATE_NO_COLOR", Some("1"));
        let _g2 = set_env_guard("NO_COLOR", None);
        assert!(EnvConfig::from_env().no_color);

        let _g3 = set_env_guard("LINEGATE_NO_COLOR", None);
        let _g4 = set_env_guard("NO_COLOR", Some("anything"));
        assert!(EnvConfig::from_env().no_color);
    }

    #[test]
    fn empty_write_log_is_ignored() {
        let _lock = env_lock();
        let _g1 = set_env_guard("LINEGATE_WRITE_LOG", Some(""));
        assert!(EnvConfig::from_env().write_log.is_none());
    }
}
