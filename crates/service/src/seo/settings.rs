use std::sync::Arc;

use chrono::Utc;
use configs::SiteConfig;
use models::seo_settings::{SEO_SETTINGS_COLLECTION, SEO_SETTINGS_DOCUMENT};
use models::{SeoSettings, SeoSettingsPatch};
use tracing::{info, instrument, warn};

use super::SiteProfile;
use crate::errors::ServiceError;
use crate::observability::ADMIN_WRITES_TOTAL;
use crate::storage::{Document, DocumentStore, StoreError};

/// Site-wide SEO settings kept in `seoSettings/global`.
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn DocumentStore>,
    site: SiteConfig,
}

impl SettingsService {
    pub fn new(store: Arc<dyn DocumentStore>, site: SiteConfig) -> Self {
        Self { store, site }
    }

    pub fn defaults(&self) -> SeoSettings {
        SeoSettings::defaults_for(&self.site)
    }

    /// Stored settings over the site defaults. Never fails: a missing
    /// document or a read error yields the defaults.
    pub async fn get(&self) -> SeoSettings {
        match self.load().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "seo settings read failed; using site defaults");
                self.defaults()
            }
        }
    }

    /// Effective site template for page rendering.
    pub async fn profile(&self) -> SiteProfile {
        SiteProfile::with_settings(&self.site, &self.get().await)
    }

    /// Merge `patch` into the current settings, validate, stamp `updatedAt`
    /// and persist. Read and write errors are returned to the caller so a
    /// transient read failure cannot overwrite stored settings with defaults.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, patch: SeoSettingsPatch) -> Result<SeoSettings, ServiceError> {
        let mut settings = self.load().await?;
        settings.apply(patch);
        settings.normalize();
        settings.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
        settings.updated_at = Some(Utc::now());

        let doc = Document::from_value(SEO_SETTINGS_DOCUMENT, &settings)?;
        self.store.set(SEO_SETTINGS_COLLECTION, doc, true).await?;
        ADMIN_WRITES_TOTAL.inc();
        info!(event = "seo_settings_updated", "seo settings saved");
        Ok(settings)
    }

    async fn load(&self) -> Result<SeoSettings, StoreError> {
        let stored = self.store.get(SEO_SETTINGS_COLLECTION, SEO_SETTINGS_DOCUMENT).await?;
        let Some(doc) = stored else {
            return Ok(self.defaults());
        };
        let mut merged = Document::from_value(SEO_SETTINGS_DOCUMENT, &self.defaults())?;
        for (key, value) in doc.fields {
            if !value.is_null() {
                merged.fields.insert(key, value);
            }
        }
        merged.decode_as()
    }
}
