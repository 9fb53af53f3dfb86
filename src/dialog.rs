//! Confirm dialog state and controller
//!
//! The controller owns the [`DialogState`] and runs the Hidden/Visible state
//! machine. Presentation code reads a [`DialogSnapshot`], subscribes to the
//! change revision, and forwards user input through `on_button_activated`,
//! `on_key_escape` and `on_backdrop_activated`.

use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

use crate::button::{BtnRenderStyle, ButtonItem, DialogButtonResult};
use crate::error::{DialogError, Result};
use crate::localization::{fallback, keys, Localizer, NoLocalizer};

/// Message shown when the dialog is rendered without one
pub const DEFAULT_MESSAGE: &str = "Are you sure?";

/// Zero-argument notification callback (on-show / on-hide)
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// One-shot callback receiving the answer the dialog closed with
pub type ResultCallback = Box<dyn FnOnce(DialogButtonResult) + Send + Sync>;

/// Controller shared between the service and the presentation layer
pub type SharedDialog = Arc<RwLock<ConfirmDialogController>>;

/// Dialog width hint for the presentation layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DialogSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
    FullScreen,
}

/// Colour scheme hint for the presentation layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DarkMode {
    #[default]
    Light,
    Dark,
}

/// Dismissal policy and presentation hints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DialogOptions {
    /// Escape key hides the dialog
    pub close_on_escape: bool,
    /// Clicking outside the dialog hides it
    pub close_on_backdrop_click: bool,
    /// Width hint
    pub size: DialogSize,
    /// Colour scheme hint
    pub dark_mode: DarkMode,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            close_on_escape: true,
            close_on_backdrop_click: false,
            size: DialogSize::Medium,
            dark_mode: DarkMode::Light,
        }
    }
}

/// Content and visibility of a dialog
#[derive(Debug, Clone, Default)]
pub struct DialogState {
    /// Question text; empty only while hidden
    pub message: String,
    /// Explicit title, `None` falls back to the localized "Confirm"
    pub title: Option<String>,
    /// Buttons in display order
    pub buttons: Vec<ButtonItem>,
    pub visible: bool,
}

/// Display-only view of a button
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonView {
    pub caption: String,
    pub style: BtnRenderStyle,
    /// Icon class rendered before the caption
    pub icon_class: Option<String>,
    /// Extra CSS class for the button element
    pub css_class: Option<String>,
    /// Rendered but not activatable
    pub disabled: bool,
}

/// Display-only view of the dialog (for rendering without holding the lock)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogSnapshot {
    pub visible: bool,
    /// Title after localization fallback
    pub title: String,
    /// Raw message, see [`DialogSnapshot::display_message`]
    pub message: String,
    /// Buttons in display order; indices match `on_button_activated`
    pub buttons: Vec<ButtonView>,
    /// Width hint from the dialog options
    pub size: DialogSize,
    /// Colour scheme hint from the dialog options
    pub dark_mode: DarkMode,
}

impl DialogSnapshot {
    /// Message to render, with the generic prompt when empty
    pub fn display_message(&self) -> &str {
        if self.message.is_empty() {
            DEFAULT_MESSAGE
        } else {
            &self.message
        }
    }
}

/// Modal confirm dialog controller
pub struct ConfirmDialogController {
    state: DialogState,
    options: DialogOptions,
    localizer: Arc<dyn Localizer>,
    on_show: Option<Callback>,
    on_hide: Option<Callback>,
    /// Armed by `show_with_result`, consumed by the next hide
    result_callback: Option<ResultCallback>,
    /// Answer recorded by a button activation for the pending hide
    closing_result: Option<DialogButtonResult>,
    revision: watch::Sender<u64>,
}

impl Default for ConfirmDialogController {
    fn default() -> Self {
        Self::new(DialogOptions::default(), Arc::new(NoLocalizer))
    }
}

impl ConfirmDialogController {
    pub fn new(options: DialogOptions, localizer: Arc<dyn Localizer>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: DialogState::default(),
            options,
            localizer,
            on_show: None,
            on_hide: None,
            result_callback: None,
            closing_result: None,
            revision,
        }
    }

    /// Wrap in the shared lock used by the service and presentation layer
    pub fn into_shared(self) -> SharedDialog {
        Arc::new(RwLock::new(self))
    }

    pub fn set_on_show<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_show = Some(Arc::new(callback));
    }

    pub fn set_on_hide<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_hide = Some(Arc::new(callback));
    }

    pub fn options(&self) -> &DialogOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DialogOptions {
        &mut self.options
    }

    pub fn localizer(&self) -> &Arc<dyn Localizer> {
        &self.localizer
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    /// Receiver whose value is bumped after every state change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Title to display: explicit title, else the localized "Confirm" label
    pub fn display_title(&self) -> String {
        match &self.state.title {
            Some(title) => title.clone(),
            None => self.localizer.text_or(keys::CONFIRM, fallback::CONFIRM),
        }
    }

    pub fn snapshot(&self) -> DialogSnapshot {
        DialogSnapshot {
            visible: self.state.visible,
            title: self.display_title(),
            message: self.state.message.clone(),
            buttons: self
                .state
                .buttons
                .iter()
                .map(|b| ButtonView {
                    caption: b.caption().to_string(),
                    style: b.style(),
                    icon_class: b.icon_class().map(str::to_string),
                    css_class: b.css_class().map(str::to_string),
                    disabled: b.is_disabled(),
                })
                .collect(),
            size: self.options.size,
            dark_mode: self.options.dark_mode,
        }
    }

    /// Show the dialog. No-op while already visible.
    pub fn show(
        &mut self,
        message: impl Into<String>,
        title: Option<String>,
        buttons: Vec<ButtonItem>,
    ) -> Result<()> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(DialogError::InvalidArgument(
                "Dialog message cannot be empty".to_string(),
            ));
        }

        if self.state.visible {
            debug!("Dialog already visible, ignoring show");
            return Ok(());
        }

        self.state.message = message;
        self.state.title = title;
        self.state.buttons = buttons;
        self.state.visible = true;
        self.closing_result = None;
        debug!("Dialog shown with {} button(s)", self.state.buttons.len());

        if let Some(on_show) = &self.on_show {
            on_show();
        }
        self.notify_changed();
        Ok(())
    }

    /// Show the dialog and arm `on_result` for the next hide.
    ///
    /// Returns the callback unused when the dialog was already visible, so the
    /// caller can resolve it itself.
    pub fn show_with_result(
        &mut self,
        message: impl Into<String>,
        title: Option<String>,
        buttons: Vec<ButtonItem>,
        on_result: ResultCallback,
    ) -> Result<Option<ResultCallback>> {
        if self.state.visible {
            return Ok(Some(on_result));
        }

        self.show(message, title, buttons)?;
        self.result_callback = Some(on_result);
        Ok(None)
    }

    /// Hide the dialog. No-op while already hidden.
    pub fn hide(&mut self) {
        if !self.state.visible {
            return;
        }

        self.state.visible = false;
        debug!("Dialog hidden");

        if let Some(on_hide) = &self.on_hide {
            on_hide();
        }

        if let Some(callback) = self.result_callback.take() {
            let result = self
                .closing_result
                .take()
                .unwrap_or(DialogButtonResult::Cancel);
            callback(result);
        }
        self.closing_result = None;

        self.notify_changed();
    }

    /// User activated the button at `index`: hide, then run its click handler
    pub fn on_button_activated(&mut self, index: usize) {
        if !self.state.visible {
            debug!("Button {} activated while hidden, ignoring", index);
            return;
        }

        let Some(button) = self.state.buttons.get(index).cloned() else {
            debug!("No button at index {}", index);
            return;
        };

        if button.is_disabled() {
            debug!("Button '{}' is disabled", button.caption());
            return;
        }

        self.closing_result = Some(button.result().unwrap_or(DialogButtonResult::Cancel));
        self.hide();

        if let Some(handler) = button.click_handler() {
            match catch_unwind(AssertUnwindSafe(|| handler())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Click handler for '{}' failed: {:#}", button.caption(), e),
                Err(_) => warn!("Click handler for '{}' panicked", button.caption()),
            }
        }
    }

    pub fn on_key_escape(&mut self) {
        if self.options.close_on_escape && self.state.visible {
            self.hide();
        }
    }

    pub fn on_backdrop_activated(&mut self) {
        if self.options.close_on_backdrop_click && self.state.visible {
            self.hide();
        }
    }

    /// Signal the presentation layer to redraw
    pub fn notify_changed(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::DialogButtons;
    use std::sync::Mutex;

    type EventLog = Arc<Mutex<Vec<&'static str>>>;

    fn controller_with_log() -> (ConfirmDialogController, EventLog) {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let mut controller = ConfirmDialogController::default();

        let show_log = log.clone();
        controller.set_on_show(move || show_log.lock().unwrap().push("show"));
        let hide_log = log.clone();
        controller.set_on_hide(move || hide_log.lock().unwrap().push("hide"));

        (controller, log)
    }

    fn ok_cancel() -> Vec<ButtonItem> {
        DialogButtons::OkCancel.build(&NoLocalizer).unwrap()
    }

    #[test]
    fn test_starts_hidden() {
        let controller = ConfirmDialogController::default();
        assert!(!controller.is_visible());
        assert!(controller.state().buttons.is_empty());
    }

    #[test]
    fn test_show_then_hide_fires_each_once_in_order() {
        let (mut controller, log) = controller_with_log();

        controller.show("Save changes?", Some("Editor".into()), ok_cancel()).unwrap();
        assert!(controller.is_visible());
        controller.hide();

        assert!(!controller.is_visible());
        assert_eq!(*log.lock().unwrap(), vec!["show", "hide"]);
    }

    #[test]
    fn test_empty_message_rejected() {
        let (mut controller, log) = controller_with_log();

        let err = controller.show("   ", None, ok_cancel()).unwrap_err();
        assert!(matches!(err, DialogError::InvalidArgument(_)));
        assert!(!controller.is_visible());
        assert!(log.lock().unwrap().is_empty());

        // Also leaves a visible dialog untouched
        controller.show("First", None, ok_cancel()).unwrap();
        assert!(controller.show("", None, ok_cancel()).is_err());
        assert!(controller.is_visible());
        assert_eq!(controller.state().message, "First");
    }

    #[test]
    fn test_show_is_idempotent() {
        let (mut controller, log) = controller_with_log();

        controller.show("First", None, ok_cancel()).unwrap();
        controller.show("Second", None, ok_cancel()).unwrap();

        assert_eq!(controller.state().message, "First");
        assert_eq!(*log.lock().unwrap(), vec!["show"]);
    }

    #[test]
    fn test_hide_when_hidden_is_silent() {
        let (mut controller, log) = controller_with_log();
        let rx = controller.subscribe();

        controller.hide();

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(*rx.borrow(), 0);
    }

    #[test]
    fn test_state_kept_after_hide() {
        let mut controller = ConfirmDialogController::default();
        controller.show("Keep me", Some("Title".into()), ok_cancel()).unwrap();
        controller.hide();

        assert_eq!(controller.state().message, "Keep me");
        assert_eq!(controller.state().title.as_deref(), Some("Title"));
        assert_eq!(controller.state().buttons.len(), 2);
    }

    #[test]
    fn test_button_hides_before_handler() {
        let mut controller = ConfirmDialogController::default();
        let shared = Arc::new(Mutex::new(Vec::new()));

        let seen = shared.clone();
        controller.set_on_hide(move || seen.lock().unwrap().push("hide"));

        let seen = shared.clone();
        let button = ButtonItem::new("Go", BtnRenderStyle::Primary)
            .unwrap()
            .on_click(move || {
                seen.lock().unwrap().push("click");
                Ok(())
            });

        controller.show("Proceed?", None, vec![button]).unwrap();
        controller.on_button_activated(0);

        assert!(!controller.is_visible());
        assert_eq!(*shared.lock().unwrap(), vec!["hide", "click"]);
    }

    #[test]
    fn test_failing_handler_is_swallowed() {
        let mut controller = ConfirmDialogController::default();
        let failing = ButtonItem::new("Fail", BtnRenderStyle::Danger)
            .unwrap()
            .on_click(|| anyhow::bail!("caller logic failed"));

        controller.show("Try it", None, vec![failing.clone()]).unwrap();
        controller.on_button_activated(0);
        assert!(!controller.is_visible());

        // Still usable afterwards
        controller.show("Again", None, vec![failing]).unwrap();
        assert!(controller.is_visible());
    }

    #[test]
    fn test_panicking_handler_is_swallowed() {
        let mut controller = ConfirmDialogController::default();
        let panicking = ButtonItem::new("Panic", BtnRenderStyle::Danger)
            .unwrap()
            .on_click(|| panic!("caller logic panicked"));

        controller.show("Try it", None, vec![panicking]).unwrap();
        controller.on_button_activated(0);
        assert!(!controller.is_visible());

        controller.show("Again", None, ok_cancel()).unwrap();
        assert!(controller.is_visible());
    }

    #[test]
    fn test_disabled_and_out_of_range_buttons_ignored() {
        let mut controller = ConfirmDialogController::default();
        let disabled = ButtonItem::new("Nope", BtnRenderStyle::Secondary)
            .unwrap()
            .disabled(true);

        controller.show("Pick", None, vec![disabled]).unwrap();
        controller.on_button_activated(0);
        assert!(controller.is_visible());
        controller.on_button_activated(5);
        assert!(controller.is_visible());
    }

    #[test]
    fn test_escape_policy() {
        let mut controller = ConfirmDialogController::default();
        controller.show("Esc?", None, ok_cancel()).unwrap();
        controller.on_key_escape();
        assert!(!controller.is_visible());

        controller.options_mut().close_on_escape = false;
        controller.show("Esc?", None, ok_cancel()).unwrap();
        controller.on_key_escape();
        assert!(controller.is_visible());
    }

    #[test]
    fn test_backdrop_policy() {
        let mut controller = ConfirmDialogController::default();
        controller.show("Backdrop?", None, ok_cancel()).unwrap();
        controller.on_backdrop_activated();
        assert!(controller.is_visible(), "backdrop dismissal is off by default");

        controller.options_mut().close_on_backdrop_click = true;
        controller.on_backdrop_activated();
        assert!(!controller.is_visible());
    }

    #[test]
    fn test_result_callback_receives_button_result() {
        let mut controller = ConfirmDialogController::default();
        let got = Arc::new(Mutex::new(None));

        let slot = got.clone();
        let unused = controller
            .show_with_result(
                "Delete?",
                None,
                ok_cancel(),
                Box::new(move |r: DialogButtonResult| *slot.lock().unwrap() = Some(r)),
            )
            .unwrap();
        assert!(unused.is_none());

        controller.on_button_activated(1);
        assert_eq!(*got.lock().unwrap(), Some(DialogButtonResult::Cancel));
    }

    #[test]
    fn test_result_callback_cancel_on_dismiss() {
        let mut controller = ConfirmDialogController::default();
        let got = Arc::new(Mutex::new(None));

        let slot = got.clone();
        controller
            .show_with_result(
                "Delete?",
                None,
                DialogButtons::YesNo.build(&NoLocalizer).unwrap(),
                Box::new(move |r: DialogButtonResult| *slot.lock().unwrap() = Some(r)),
            )
            .unwrap();

        controller.on_key_escape();
        assert_eq!(*got.lock().unwrap(), Some(DialogButtonResult::Cancel));
    }

    #[test]
    fn test_show_with_result_while_visible_returns_callback() {
        let mut controller = ConfirmDialogController::default();
        controller.show("Busy", None, ok_cancel()).unwrap();

        let unused = controller
            .show_with_result("Other", None, ok_cancel(), Box::new(|_: DialogButtonResult| {}))
            .unwrap();
        assert!(unused.is_some());
        assert_eq!(controller.state().message, "Busy");
    }

    #[test]
    fn test_snapshot_and_title_fallback() {
        let mut strings = std::collections::HashMap::new();
        strings.insert("ConfirmString".to_string(), "Bestätigen".to_string());
        let mut controller = ConfirmDialogController::new(DialogOptions::default(), Arc::new(strings));

        controller.show("Weiter?", None, ok_cancel()).unwrap();
        let snapshot = controller.snapshot();

        assert!(snapshot.visible);
        assert_eq!(snapshot.title, "Bestätigen");
        assert_eq!(snapshot.display_message(), "Weiter?");
        assert_eq!(snapshot.buttons.len(), 2);
        assert_eq!(snapshot.buttons[1].style, BtnRenderStyle::Secondary);

        let empty = DialogSnapshot {
            message: String::new(),
            ..snapshot
        };
        assert_eq!(empty.display_message(), DEFAULT_MESSAGE);
    }

    #[test]
    fn test_revision_bumps_on_changes() {
        let mut controller = ConfirmDialogController::default();
        let rx = controller.subscribe();

        controller.show("One", None, ok_cancel()).unwrap();
        assert_eq!(*rx.borrow(), 1);
        controller.hide();
        assert_eq!(*rx.borrow(), 2);
    }
}
