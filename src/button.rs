//! Dialog buttons and button-set construction

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{DialogError, Result};
use crate::localization::{fallback, keys, Localizer};

/// Click handler attached to a button. Errors are logged by the controller, never re-raised.
pub type ClickHandler = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Visual style of a button (contextual colour token)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BtnRenderStyle {
    #[default]
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    Info,
    Light,
    Dark,
    Link,
}

impl BtnRenderStyle {
    /// Lowercase style token, e.g. `"primary"`
    pub fn name(&self) -> &'static str {
        match self {
            BtnRenderStyle::Primary => "primary",
            BtnRenderStyle::Secondary => "secondary",
            BtnRenderStyle::Success => "success",
            BtnRenderStyle::Danger => "danger",
            BtnRenderStyle::Warning => "warning",
            BtnRenderStyle::Info => "info",
            BtnRenderStyle::Light => "light",
            BtnRenderStyle::Dark => "dark",
            BtnRenderStyle::Link => "link",
        }
    }
}

/// The answer a button stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogButtonResult {
    Ok,
    Cancel,
    Yes,
    No,
}

impl fmt::Display for DialogButtonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DialogButtonResult::Ok => "ok",
            DialogButtonResult::Cancel => "cancel",
            DialogButtonResult::Yes => "yes",
            DialogButtonResult::No => "no",
        };
        f.write_str(s)
    }
}

/// One action button shown in a dialog
#[derive(Clone)]
pub struct ButtonItem {
    caption: String,
    style: BtnRenderStyle,
    result: Option<DialogButtonResult>,
    click: Option<ClickHandler>,
    icon_class: Option<String>,
    css_class: Option<String>,
    disabled: bool,
}

impl fmt::Debug for ButtonItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonItem")
            .field("caption", &self.caption)
            .field("style", &self.style)
            .field("result", &self.result)
            .field("click", &self.click.as_ref().map(|_| "<handler>"))
            .field("icon_class", &self.icon_class)
            .field("css_class", &self.css_class)
            .field("disabled", &self.disabled)
            .finish()
    }
}

impl ButtonItem {
    /// Create a button. Fails when the caption is empty or whitespace.
    pub fn new(caption: impl Into<String>, style: BtnRenderStyle) -> Result<Self> {
        let caption = caption.into();
        if caption.trim().is_empty() {
            return Err(DialogError::InvalidArgument(
                "Button caption cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            caption,
            style,
            result: None,
            click: None,
            icon_class: None,
            css_class: None,
            disabled: false,
        })
    }

    pub fn with_result(mut self, result: DialogButtonResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.click = Some(Arc::new(handler));
        self
    }

    pub fn with_icon(mut self, icon_class: impl Into<String>) -> Self {
        self.icon_class = Some(icon_class.into());
        self
    }

    pub fn with_css_class(mut self, css_class: impl Into<String>) -> Self {
        self.css_class = Some(css_class.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn style(&self) -> BtnRenderStyle {
        self.style
    }

    pub fn result(&self) -> Option<DialogButtonResult> {
        self.result
    }

    pub fn click_handler(&self) -> Option<&ClickHandler> {
        self.click.as_ref()
    }

    pub fn icon_class(&self) -> Option<&str> {
        self.icon_class.as_deref()
    }

    pub fn css_class(&self) -> Option<&str> {
        self.css_class.as_deref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Predefined button combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogButtons {
    Ok,
    #[default]
    OkCancel,
    YesNo,
    YesNoCancel,
}

impl DialogButtons {
    /// Build the ordered button list for this combination.
    ///
    /// Affirmative buttons use [`BtnRenderStyle::Primary`], Cancel uses
    /// [`BtnRenderStyle::Secondary`]. In `YesNo` the No button is secondary;
    /// in `YesNoCancel` both Yes and No are primary.
    pub fn build(self, localizer: &dyn Localizer) -> Result<Vec<ButtonItem>> {
        let ok = || labelled(localizer, keys::BUTTON_OK, fallback::BUTTON_OK);
        let cancel = || labelled(localizer, keys::BUTTON_CANCEL, fallback::BUTTON_CANCEL);
        let yes = || labelled(localizer, keys::BUTTON_YES, fallback::BUTTON_YES);
        let no = || labelled(localizer, keys::BUTTON_NO, fallback::BUTTON_NO);

        use BtnRenderStyle::{Primary, Secondary};
        use DialogButtonResult as R;

        let buttons = match self {
            DialogButtons::Ok => vec![ButtonItem::new(ok(), Primary)?.with_result(R::Ok)],
            DialogButtons::OkCancel => vec![
                ButtonItem::new(ok(), Primary)?.with_result(R::Ok),
                ButtonItem::new(cancel(), Secondary)?.with_result(R::Cancel),
            ],
            DialogButtons::YesNo => vec![
                ButtonItem::new(yes(), Primary)?.with_result(R::Yes),
                ButtonItem::new(no(), Secondary)?.with_result(R::No),
            ],
            DialogButtons::YesNoCancel => vec![
                ButtonItem::new(yes(), Primary)?.with_result(R::Yes),
                ButtonItem::new(no(), Primary)?.with_result(R::No),
                ButtonItem::new(cancel(), Secondary)?.with_result(R::Cancel),
            ],
        };

        Ok(buttons)
    }
}

fn labelled(localizer: &dyn Localizer, key: &str, default: &str) -> String {
    localizer.text_or(key, default)
}

impl FromStr for DialogButtons {
    type Err = DialogError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "ok" => Ok(DialogButtons::Ok),
            "ok-cancel" | "okcancel" => Ok(DialogButtons::OkCancel),
            "yes-no" | "yesno" => Ok(DialogButtons::YesNo),
            "yes-no-cancel" | "yesnocancel" => Ok(DialogButtons::YesNoCancel),
            _ => Err(DialogError::Unsupported(s.to_string())),
        }
    }
}

impl TryFrom<u8> for DialogButtons {
    type Error = DialogError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(DialogButtons::Ok),
            1 => Ok(DialogButtons::OkCancel),
            2 => Ok(DialogButtons::YesNo),
            3 => Ok(DialogButtons::YesNoCancel),
            other => Err(DialogError::Unsupported(other.to_string())),
        }
    }
}
