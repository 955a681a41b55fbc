// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub(crate) struct LoggerInner {
    pub(crate) lines: Vec<String>,
    pub(crate) warn: bool,
}

/// Thread-safe string logger.  Lines are kept for the caller and also
/// emitted as `tracing` events.
#[derive(Clone, Debug, Default)]
pub struct StringLogger {
    pub(crate) inner: Arc<Mutex<LoggerInner>>,
}

impl StringLogger {
    /// Whether the log contains any warnings.
    pub fn contains_warnings(&self) -> bool {
        self.inner
            .lock()
            .ok()
            .map(|inner| inner.warn)
            .unwrap_or(false)
    }

    /// Add all lines from the specified logger to this logger.
    pub fn extend(&self, string_logger: &StringLogger) {
        if Arc::ptr_eq(&self.inner, &string_logger.inner) {
            return;
        }
        if let (Ok(mut to_inner), Ok(from_inner)) = (self.inner.lock(), string_logger.inner.lock())
        {
            if from_inner.warn {
                to_inner.warn = true;
            }
            to_inner.lines.extend(from_inner.lines.iter().cloned());
        }
    }

    /// Whether nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.lines.is_empty())
            .unwrap_or(true)
    }

    /// Returns a copy of the logged lines.
    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.lines.clone())
            .unwrap_or_default()
    }

    /// Create a new string logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a trace line to this logger.
    pub fn trace(&self, line: String) {
        if !line.is_empty() {
            tracing::debug!("{line}");
            if let Ok(mut inner) = self.inner.lock() {
                inner.lines.push(line);
            }
        }
    }

    /// Add a warning or error line to this logger.
    pub fn warn(&self, line: String) {
        if !line.is_empty() {
            tracing::warn!("{line}");
            if let Ok(mut inner) = self.inner.lock() {
                inner.lines.push(line);
                inner.warn = true;
            }
        }
    }
}

impl Display for StringLogger {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        if let Ok(inner) = self.inner.lock() {
            f.write_str(&inner.lines.join("\n"))
        } else {
            Ok(())
        }
    }
}
