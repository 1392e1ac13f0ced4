//! SEO generation: page metadata, JSON-LD, sitemap, robots and the
//! dashboard-editable site settings that feed them.

pub mod keywords;
pub mod metadata;
pub mod pages;
pub mod robots;
pub mod schema;
pub mod settings;
pub mod sitemap;

use configs::{BusinessHours, SiteConfig};
use models::SeoSettings;
use serde::Serialize;

pub use metadata::{generate_metadata, PageMetadata, PageType, SeoData};
pub use settings::SettingsService;

/// Search-console ownership codes rendered as `<meta>` tags.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Verification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yandex: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub google_analytics_id: Option<String>,
    pub google_tag_manager_id: Option<String>,
    pub facebook_pixel_id: Option<String>,
}

/// The effective site template: static configuration overlaid with the
/// settings saved from the dashboard.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteProfile {
    pub site: SiteConfig,
    pub verification: Verification,
    pub analytics: Analytics,
}

impl SiteProfile {
    pub fn from_config(site: SiteConfig) -> Self {
        Self { site, verification: Verification::default(), analytics: Analytics::default() }
    }

    pub fn with_settings(site: &SiteConfig, settings: &SeoSettings) -> Self {
        let mut site = site.clone();
        if !settings.site_name.trim().is_empty() {
            site.name = settings.site_name.clone();
        }
        if !settings.site_description.trim().is_empty() {
            site.default_description = settings.site_description.clone();
        }
        if !settings.site_keywords.is_empty() {
            site.default_keywords = settings.site_keywords.clone();
        }
        if !settings.default_og_image.trim().is_empty() {
            site.default_image = Some(settings.default_og_image.clone());
        }
        let social = &mut site.social;
        for (slot, value) in [
            (&mut social.facebook, &settings.facebook_url),
            (&mut social.twitter, &settings.twitter_url),
            (&mut social.instagram, &settings.instagram_url),
            (&mut social.linkedin, &settings.linkedin_url),
        ] {
            if value.is_some() {
                *slot = value.clone();
            }
        }
        if let Some(hours) = &settings.business_hours {
            site.business_hours = BusinessHours {
                day_of_week: hours.day_of_week.clone(),
                opens: hours.opens.clone(),
                closes: hours.closes.clone(),
            };
        }
        Self {
            site,
            verification: Verification {
                google: settings.google_verification.clone(),
                bing: settings.bing_verification.clone(),
                yandex: settings.yandex_verification.clone(),
            },
            analytics: Analytics {
                google_analytics_id: settings.google_analytics_id.clone(),
                google_tag_manager_id: settings.google_tag_manager_id.clone(),
                facebook_pixel_id: settings.facebook_pixel_id.clone(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.site.name
    }

    pub fn url_for(&self, path: &str) -> String {
        self.site.url_for(path)
    }
}
