//! Store-wide settings with an explicit draft/published lifecycle.
//!
//! Consumers hold an `Arc<SiteSettings>` taken from the published copy; edits
//! go to a draft until they are published.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{BackOfficeConfig, ConfigError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub store_name: String,
    pub currency: String,
    pub contact_email: Option<String>,
    pub low_stock_threshold: u32,
    pub preview_limit: usize,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            store_name: "Storefront".to_string(),
            currency: "BRL".to_string(),
            contact_email: None,
            low_stock_threshold: 5,
            preview_limit: 10,
        }
    }
}

impl SiteSettings {
    /// Defaults adjusted by the process configuration.
    pub fn from_config(config: &BackOfficeConfig) -> Self {
        Self {
            low_stock_threshold: config.low_stock_threshold,
            preview_limit: config.preview_limit,
            ..Self::default()
        }
    }

    /// Parses a stored settings row; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::InvalidSettings(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|e| ConfigError::InvalidSettings(e.to_string()))
    }
}

/// Published settings plus the operator's pending edits.
#[derive(Debug, Clone)]
pub struct SettingsDocument {
    published: Arc<SiteSettings>,
    draft: Option<SiteSettings>,
}

impl SettingsDocument {
    pub fn new(published: SiteSettings) -> Self {
        Self { published: Arc::new(published), draft: None }
    }

    pub fn published(&self) -> Arc<SiteSettings> {
        Arc::clone(&self.published)
    }

    /// The draft if one exists, otherwise the published settings.
    pub fn current(&self) -> &SiteSettings {
        self.draft.as_ref().unwrap_or(self.published.as_ref())
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.draft.as_ref().is_some_and(|draft| draft != self.published.as_ref())
    }

    /// Applies `change` to the draft, starting one from the published copy.
    pub fn edit(&mut self, change: impl FnOnce(&mut SiteSettings)) {
        let draft = self.draft.get_or_insert_with(|| self.published.as_ref().clone());
        change(draft);
    }

    /// Promotes the draft. Returns `false` when there was nothing to publish.
    pub fn publish(&mut self) -> bool {
        match self.draft.take() {
            Some(draft) if draft != *self.published => {
                info!(store_name = %draft.store_name, "Publishing site settings");
                self.published = Arc::new(draft);
                true
            }
            _ => false,
        }
    }

    pub fn discard(&mut self) {
        self.draft = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_lifecycle() {
        let mut document = SettingsDocument::new(SiteSettings::default());
        let before = document.published();
        assert!(!document.is_dirty());

        document.edit(|settings| settings.store_name = "Loja Azul".to_string());
        assert!(document.is_dirty());
        assert_eq!(document.current().store_name, "Loja Azul");
        assert_eq!(document.published().store_name, "Storefront");

        assert!(document.publish());
        assert!(!document.is_dirty());
        assert_eq!(document.published().store_name, "Loja Azul");
        assert_eq!(before.store_name, "Storefront");
        assert!(!document.publish());
    }

    #[test]
    fn test_discard_and_noop_edit() {
        let mut document = SettingsDocument::new(SiteSettings::default());
        document.edit(|settings| settings.preview_limit = 3);
        document.discard();
        assert_eq!(document.current().preview_limit, 10);

        document.edit(|_| {});
        assert!(!document.is_dirty());
    }

    #[test]
    fn test_json_keeps_defaults_for_missing_fields() {
        let settings = SiteSettings::from_json(r#"{"store_name":"Loja","low_stock_threshold":2}"#).unwrap();
        assert_eq!(settings.store_name, "Loja");
        assert_eq!(settings.low_stock_threshold, 2);
        assert_eq!(settings.currency, "BRL");
        assert!(SiteSettings::from_json("not json").is_err());
        assert_eq!(SiteSettings::from_json(&settings.to_json().unwrap()).unwrap(), settings);
    }
}
