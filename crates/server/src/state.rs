use std::sync::Arc;

use configs::AppConfig;
use service::admin::CatalogAdmin;
use service::auth::AdminAuthService;
use service::content::ContentService;
use service::seo::SettingsService;
use service::storage::DocumentStore;

/// Shared handler state; every service holds the same store handle.
#[derive(Clone)]
pub struct AppState {
    pub content: ContentService,
    pub settings: SettingsService,
    pub catalog: CatalogAdmin,
    pub auth: Arc<AdminAuthService>,
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, cfg: &AppConfig) -> Self {
        Self {
            content: ContentService::new(store.clone()),
            settings: SettingsService::new(store.clone(), cfg.site.clone()),
            catalog: CatalogAdmin::new(store),
            auth: Arc::new(AdminAuthService::new(&cfg.admin)),
            base_url: Arc::from(cfg.site.base_url.as_str()),
        }
    }
}
