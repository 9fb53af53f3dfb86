//! Localized string lookup
//!
//! Dialog captions and the default title come from an injected [`Localizer`].
//! Missing keys fall back to the English literals in [`fallback`].

use std::collections::HashMap;

/// Well-known resource keys
pub mod keys {
    pub const CONFIRM: &str = "ConfirmString";
    pub const BUTTON_OK: &str = "ButtonOk";
    pub const BUTTON_CANCEL: &str = "ButtonCancel";
    pub const BUTTON_YES: &str = "ButtonYes";
    pub const BUTTON_NO: &str = "ButtonNo";
}

/// English literals used when a key is absent
pub mod fallback {
    pub const CONFIRM: &str = "Confirm";
    pub const BUTTON_OK: &str = "OK";
    pub const BUTTON_CANCEL: &str = "Cancel";
    pub const BUTTON_YES: &str = "Yes";
    pub const BUTTON_NO: &str = "No";
}

/// Maps a resource key to a localized string
pub trait Localizer: Send + Sync {
    fn lookup(&self, key: &str) -> Option<String>;

    /// Look up `key`, falling back to `default` when absent or blank
    fn text_or(&self, key: &str, default: &str) -> String {
        self.lookup(key)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

/// Localizer with no entries; every lookup falls back to English
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalizer;

impl Localizer for NoLocalizer {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

impl Localizer for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
