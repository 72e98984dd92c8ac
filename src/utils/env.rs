//! Process environment helpers

use std::env;

/// Process environment helpers
pub struct EnvUtils;

impl EnvUtils {
    /// Set a variable in this process's environment, inherited by every child
    /// spawned afterwards.
    pub fn set_var<K, V>(key: K, value: V)
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        // SAFETY: std serializes its own environment reads (`Command::spawn`,
        // host lookup) against this write. The only caller runs on the main
        // thread before any SFTP session exists, so no foreign code reads the
        // environment concurrently. Unit tests that reach this are `#[serial]`.
        unsafe { env::set_var(key.as_ref(), value.as_ref()) }
    }

    /// Value of a variable, when set and valid UTF-8
    pub fn get_var(key: &str) -> Option<String> {
        env::var(key).ok()
    }
}
