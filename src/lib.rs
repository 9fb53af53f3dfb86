//! Modal Plus Library
//!
//! Modal confirmation dialogs: a Hidden/Visible dialog controller plus a
//! service that turns one button click into an awaited answer.

pub mod button;
pub mod config;
pub mod dialog;
pub mod error;
pub mod localization;
pub mod service;

pub use button::{BtnRenderStyle, ButtonItem, DialogButtonResult, DialogButtons};
pub use config::{register, ModalPlus, ModalPlusConfig};
pub use dialog::{ConfirmDialogController, DialogOptions, DialogSnapshot, SharedDialog};
pub use error::{DialogError, Result};
pub use localization::{Localizer, NoLocalizer};
pub use service::ModalDialogService;
