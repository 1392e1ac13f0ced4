use anyhow::anyhow;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub worker_threads: Option<usize>,
    /// Directory served under `/static` (images, stylesheets).
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            worker_threads: Some(4),
            static_dir: "public".into(),
        }
    }
}

/// Site-wide SEO template: the defaults every page falls back to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub short_name: String,
    pub base_url: String,
    pub default_title: String,
    pub default_description: String,
    pub default_keywords: Vec<String>,
    /// BCP 47 tag, e.g. `en-CA`.
    pub language: String,
    /// ISO 3166-2 region served, e.g. `CA-ON`.
    pub region: String,
    pub default_image: Option<String>,
    /// ISO 4217 currency used for service offers.
    pub currency: String,
    pub location: PostalAddress,
    pub contact: ContactInfo,
    pub social: SocialLinks,
    pub organization: OrganizationInfo,
    pub business_hours: BusinessHours,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PostalAddress {
    pub street_address: String,
    pub address_locality: String,
    pub address_region: String,
    /// Spelled-out region for keywords, e.g. `Ontario`.
    pub region_name: String,
    pub postal_code: String,
    pub address_country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SocialLinks {
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
}

impl SocialLinks {
    /// Non-empty profile URLs, in a stable order.
    pub fn urls(&self) -> Vec<String> {
        [&self.facebook, &self.twitter, &self.instagram, &self.linkedin]
            .into_iter()
            .flatten()
            .filter(|u| !u.trim().is_empty())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OrganizationInfo {
    pub name: String,
    pub legal_name: String,
    pub url: String,
    pub logo: String,
    pub founding_date: String,
    /// schema.org type, e.g. `MedicalBusiness`.
    pub schema_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct BusinessHours {
    pub day_of_week: Vec<String>,
    pub opens: String,
    pub closes: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let base_url = "https://www.gardenias-healthcare.net".to_string();
        Self {
            name: "Gardenias Healthcare".into(),
            short_name: "Gardenias".into(),
            default_title: "Gardenias Healthcare - Professional Medical Services".into(),
            default_description: "Professional healthcare services with modern medical facilities. Expert doctors, advanced treatments, and compassionate care for all your medical needs.".into(),
            default_keywords: [
                "healthcare",
                "medical",
                "doctor",
                "hospital",
                "clinic",
                "medical treatment",
                "healthcare provider",
                "medical consultation",
                "Milton",
                "Ontario",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            language: "en-CA".into(),
            region: "CA-ON".into(),
            default_image: Some(format!("{base_url}/images/logoo.png")),
            currency: "CAD".into(),
            location: PostalAddress {
                street_address: "348 Bronte St South Unit #12".into(),
                address_locality: "Milton".into(),
                address_region: "ON".into(),
                region_name: "Ontario".into(),
                postal_code: "L9T 5B6".into(),
                address_country: "CA".into(),
            },
            contact: ContactInfo {
                phone: "+1(647) 328-65-63".into(),
                email: "Info@gardenias-healthcare.net".into(),
            },
            social: SocialLinks::default(),
            organization: OrganizationInfo {
                name: "Gardenias Healthcare Clinic Inc.".into(),
                legal_name: "Gardenias Healthcare Clinic Inc.".into(),
                url: base_url.clone(),
                logo: format!("{base_url}/images/logoo.png"),
                founding_date: "2022".into(),
                schema_type: "MedicalBusiness".into(),
            },
            business_hours: BusinessHours {
                day_of_week: ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                opens: "09:00".into(),
                closes: "18:00".into(),
            },
            base_url,
        }
    }
}

impl SiteConfig {
    /// Default share image, or the logo path under the base URL.
    pub fn default_image_url(&self) -> String {
        match &self.default_image {
            Some(img) if !img.trim().is_empty() => img.clone(),
            _ => format!("{}/images/logoo.png", self.base_url),
        }
    }

    /// Absolute URL for a site path such as `/services/massage`.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn normalize(&mut self) -> Result<()> {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(anyhow!("site.base_url 必须以 http:// 或 https:// 开头"));
        }
        if self.name.trim().is_empty() {
            return Err(anyhow!("site.name 不能为空"));
        }
        if self.default_title.trim().is_empty() {
            self.default_title = self.name.clone();
        }
        if self.organization.url.trim().is_empty() {
            self.organization.url = self.base_url.clone();
        }
        if self.organization.schema_type.trim().is_empty() {
            self.organization.schema_type = "MedicalBusiness".into();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON files under `store.data_dir`, one per collection.
    #[default]
    File,
    /// Managed document database over its REST API.
    Firestore,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub data_dir: String,
    /// Declared composite indexes, `collection:fieldA,fieldB`.
    pub indexes: Vec<String>,
    pub firestore: FirestoreConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            data_dir: "data".into(),
            indexes: Vec::new(),
            firestore: FirestoreConfig::default(),
        }
    }
}

/// A parsed `collection:fieldA,fieldB` index declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub collection: String,
    pub fields: Vec<String>,
}

impl StoreConfig {
    pub fn parse_indexes(&self) -> Result<Vec<IndexSpec>> {
        self.indexes.iter().map(|raw| parse_index(raw)).collect()
    }

    fn normalize_from_env(&mut self) {
        let fs = &mut self.firestore;
        if fs.project_id.trim().is_empty() {
            if let Ok(v) = std::env::var("FIRESTORE_PROJECT_ID") {
                fs.project_id = v;
            }
        }
        if fs.api_key.is_none() {
            fs.api_key = std::env::var("FIRESTORE_API_KEY").ok();
        }
        if fs.access_token.is_none() {
            fs.access_token = std::env::var("FIRESTORE_ACCESS_TOKEN").ok();
        }
    }

    fn validate(&self) -> Result<()> {
        self.parse_indexes()?;
        if self.backend == StoreBackend::Firestore {
            if self.firestore.project_id.trim().is_empty() {
                return Err(anyhow!("store.firestore.project_id 为空；请在 config.toml 或环境变量 FIRESTORE_PROJECT_ID 中提供"));
            }
            if self.firestore.timeout_secs == 0 {
                return Err(anyhow!("store.firestore.timeout_secs 必须为正整数秒"));
            }
        } else if self.data_dir.trim().is_empty() {
            return Err(anyhow!("store.data_dir 不能为空"));
        }
        Ok(())
    }
}

fn parse_index(raw: &str) -> Result<IndexSpec> {
    let (collection, fields) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("invalid index `{raw}`: expected collection:field,field"))?;
    let fields: Vec<String> = fields
        .split(',')
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();
    if collection.trim().is_empty() || fields.is_empty() {
        return Err(anyhow!("invalid index `{raw}`: empty collection or field list"));
    }
    Ok(IndexSpec { collection: collection.trim().to_string(), fields })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    /// REST root, overridable for the emulator.
    pub endpoint: String,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database: "(default)".into(),
            api_key: None,
            access_token: None,
            timeout_secs: 10,
            endpoint: "https://firestore.googleapis.com/v1".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: u32,
    pub accounts: Vec<AdminAccount>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), token_ttl_hours: 12, accounts: Vec::new() }
    }
}

/// Dashboard login; `password_hash` is an argon2 PHC string.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AdminAccount {
    pub email: String,
    pub password_hash: String,
}

impl AdminConfig {
    fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("ADMIN_JWT_SECRET") {
                self.jwt_secret = secret;
            }
        }
    }

    fn validate(&mut self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            // 已配置账号时禁止使用公开的开发密钥，否则任何人都能伪造 token
            if !self.accounts.is_empty() {
                return Err(anyhow!("admin.jwt_secret (or ADMIN_JWT_SECRET) is required when admin accounts are configured"));
            }
            warn!("admin.jwt_secret not configured; using development secret");
            self.jwt_secret = DEV_JWT_SECRET.to_string();
        }
        if self.token_ttl_hours == 0 || self.token_ttl_hours > 168 {
            return Err(anyhow!("admin.token_ttl_hours 必须在 1..=168 范围内"));
        }
        for acc in &self.accounts {
            if !acc.email.contains('@') {
                return Err(anyhow!("admin account `{}` is not an email address", acc.email));
            }
            if !acc.password_hash.starts_with("$argon2") {
                return Err(anyhow!("admin account `{}` password_hash must be an argon2 PHC string", acc.email));
            }
        }
        if self.accounts.is_empty() {
            warn!("no admin accounts configured; dashboard login is disabled");
        }
        Ok(())
    }
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `CONFIG_PATH` (or defaults when the file does not exist), apply
    /// environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => {
                info!("config file not found, using defaults and environment");
                AppConfig::default()
            }
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.apply_env_overrides();
        self.validate()
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        self.store.normalize_from_env();
        self.admin.normalize_from_env();
    }

    pub fn validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        self.site.normalize()?;
        self.store.validate()?;
        self.admin.validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.static_dir.trim().is_empty() {
            self.static_dir = "public".into();
        }
        Ok(())
    }
}
