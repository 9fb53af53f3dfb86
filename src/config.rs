//! Setup configuration and service registration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::dialog::{ConfirmDialogController, DialogOptions, SharedDialog};
use crate::error::{DialogError, Result};
use crate::localization::Localizer;
use crate::service::ModalDialogService;

/// Registration settings, loadable from JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModalPlusConfig {
    /// Locale tags the dialog captions are offered in; must not be empty
    pub supported_cultures: Vec<String>,
    /// Locale used when the host does not pick one (default "en-US")
    pub default_culture: String,
    /// Whether to create the programmatic dialog service
    pub register_service: bool,
    /// Options applied to dialogs created through [`ModalPlus::new_dialog`]
    pub dialog: DialogOptions,
}

impl Default for ModalPlusConfig {
    fn default() -> Self {
        Self {
            supported_cultures: vec!["en-US".to_string()],
            default_culture: "en-US".to_string(),
            register_service: true,
            dialog: DialogOptions::default(),
        }
    }
}

impl ModalPlusConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ModalPlusConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.supported_cultures.is_empty() {
            return Err(DialogError::InvalidArgument(
                "Supported cultures cannot be empty".to_string(),
            ));
        }

        if self.supported_cultures.iter().any(|c| c.trim().is_empty()) {
            return Err(DialogError::InvalidArgument(
                "Supported cultures cannot contain a blank tag".to_string(),
            ));
        }

        if self.default_culture.trim().is_empty() {
            return Err(DialogError::InvalidArgument(
                "Default culture cannot be empty".to_string(),
            ));
        }

        if !self.supported_cultures.contains(&self.default_culture) {
            warn!(
                "Default culture {} is not among the supported cultures {:?}",
                self.default_culture, self.supported_cultures
            );
        }

        Ok(())
    }
}

/// Validated setup: shared localizer, dialog options and the optional service
pub struct ModalPlus {
    config: ModalPlusConfig,
    localizer: Arc<dyn Localizer>,
    service: Option<Arc<ModalDialogService>>,
}

impl ModalPlus {
    pub fn config(&self) -> &ModalPlusConfig {
        &self.config
    }

    pub fn localizer(&self) -> Arc<dyn Localizer> {
        self.localizer.clone()
    }

    /// The dialog service, when `register_service` was set
    pub fn service(&self) -> Option<Arc<ModalDialogService>> {
        self.service.clone()
    }

    /// Create a controller using the configured options and localizer
    pub fn new_dialog(&self) -> SharedDialog {
        ConfirmDialogController::new(self.config.dialog.clone(), self.localizer.clone())
            .into_shared()
    }
}

/// Validate `config` and build the dialog setup
pub fn register(config: ModalPlusConfig, localizer: Arc<dyn Localizer>) -> Result<ModalPlus> {
    config.validate()?;

    let service = config
        .register_service
        .then(|| Arc::new(ModalDialogService::new(localizer.clone())));

    info!(
        "modal-plus registered: cultures={:?} default={} service={}",
        config.supported_cultures,
        config.default_culture,
        service.is_some()
    );

    Ok(ModalPlus {
        config,
        localizer,
        service,
    })
}
