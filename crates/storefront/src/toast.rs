//! Transient user-facing notifications.
//!
//! Toasts are rendered as out-of-band HTMX fragments appended to the page's
//! toast container; a small client script dismisses them after their
//! display duration.

use askama::Template;
use askama_web::WebTemplate;

/// Display duration for quick confirmations (ms).
pub const DURATION_SHORT: u32 = 2000;
/// Default display duration (ms).
pub const DURATION_NORMAL: u32 = 5000;
/// Display duration for messages the customer must not miss (ms).
pub const DURATION_LONG: u32 = 8000;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    /// CSS class suffix (`toast-info`, `toast-error`, ...).
    #[must_use]
    pub const fn class_name(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Leading icon.
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Info => "🔔",
            Self::Success => "✅",
            Self::Warning => "⚠️",
            Self::Error => "❌",
        }
    }
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub duration_ms: u32,
}

impl Toast {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, message)
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, message)
    }

    fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            duration_ms: DURATION_NORMAL,
        }
    }

    /// Override the display duration.
    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Standalone toast fragment (out-of-band append to `#toast-container`).
#[derive(Template, WebTemplate)]
#[template(path = "partials/toast.html")]
pub struct ToastTemplate {
    pub toast: Toast,
}
