use chrono::{DateTime, Utc};
use configs::SiteConfig;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::validate::{check_image, check_link, check_tag_id, clean_list, require_text, trim_opt};

pub const SEO_SETTINGS_COLLECTION: &str = "seoSettings";
pub const SEO_SETTINGS_DOCUMENT: &str = "global";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessHours {
    pub day_of_week: Vec<String>,
    pub opens: String,
    pub closes: String,
}

/// Site-wide metadata defaults edited from the dashboard.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoSettings {
    pub site_name: String,
    pub site_description: String,
    pub site_keywords: Vec<String>,
    pub default_og_image: String,

    pub facebook_url: Option<String>,
    pub twitter_url: Option<String>,
    pub instagram_url: Option<String>,
    pub linkedin_url: Option<String>,

    pub google_verification: Option<String>,
    pub bing_verification: Option<String>,
    pub yandex_verification: Option<String>,

    pub business_hours: Option<BusinessHours>,

    pub google_analytics_id: Option<String>,
    pub google_tag_manager_id: Option<String>,
    pub facebook_pixel_id: Option<String>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl SeoSettings {
    /// Settings equivalent to the static site configuration.
    pub fn defaults_for(site: &SiteConfig) -> Self {
        Self {
            site_name: site.name.clone(),
            site_description: site.default_description.clone(),
            site_keywords: site.default_keywords.clone(),
            default_og_image: site.default_image_url(),
            ..Default::default()
        }
    }

    /// Overlay the fields present in `patch`.
    pub fn apply(&mut self, patch: SeoSettingsPatch) {
        macro_rules! set {
            ($($field:ident),* $(,)?) => {
                $( if let Some(v) = patch.$field { self.$field = v; } )*
            };
        }
        macro_rules! set_opt {
            ($($field:ident),* $(,)?) => {
                $( if let Some(v) = patch.$field { self.$field = Some(v).filter(|s: &String| !s.trim().is_empty()); } )*
            };
        }
        set!(site_name, site_description, site_keywords, default_og_image);
        set_opt!(
            facebook_url,
            twitter_url,
            instagram_url,
            linkedin_url,
            google_verification,
            bing_verification,
            yandex_verification,
            google_analytics_id,
            google_tag_manager_id,
            facebook_pixel_id,
        );
        if let Some(hours) = patch.business_hours {
            self.business_hours = Some(hours);
        }
    }

    pub fn normalize(&mut self) {
        self.site_name = self.site_name.trim().to_string();
        self.site_description = self.site_description.trim().to_string();
        self.default_og_image = self.default_og_image.trim().to_string();
        clean_list(&mut self.site_keywords);
        for opt in [
            &mut self.facebook_url,
            &mut self.twitter_url,
            &mut self.instagram_url,
            &mut self.linkedin_url,
            &mut self.google_verification,
            &mut self.bing_verification,
            &mut self.yandex_verification,
            &mut self.google_analytics_id,
            &mut self.google_tag_manager_id,
            &mut self.facebook_pixel_id,
        ] {
            trim_opt(opt);
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        require_text("siteName", &self.site_name)?;
        require_text("siteDescription", &self.site_description)?;
        if !self.default_og_image.is_empty() {
            check_image("defaultOgImage", Some(&self.default_og_image))?;
        }
        check_link("facebookUrl", self.facebook_url.as_deref())?;
        check_link("twitterUrl", self.twitter_url.as_deref())?;
        check_link("instagramUrl", self.instagram_url.as_deref())?;
        check_link("linkedinUrl", self.linkedin_url.as_deref())?;
        check_tag_id("googleAnalyticsId", self.google_analytics_id.as_deref())?;
        check_tag_id("googleTagManagerId", self.google_tag_manager_id.as_deref())?;
        check_tag_id("facebookPixelId", self.facebook_pixel_id.as_deref())?;
        if let Some(hours) = &self.business_hours {
            if !is_clock(&hours.opens) || !is_clock(&hours.closes) {
                return Err(ModelError::invalid("businessHours", "opens/closes must be HH:MM"));
            }
        }
        Ok(())
    }
}

fn is_clock(value: &str) -> bool {
    match value.split_once(':') {
        Some((h, m)) if h.len() == 2 && m.len() == 2 => {
            matches!((h.parse::<u8>(), m.parse::<u8>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
        }
        _ => false,
    }
}

/// Partial update sent by the dashboard form. Absent fields are untouched;
/// an empty string clears an optional field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoSettingsPatch {
    pub site_name: Option<String>,
    pub site_description: Option<String>,
    pub site_keywords: Option<Vec<String>>,
    pub default_og_image: Option<String>,
    pub facebook_url: Option<String>,
    pub twitter_url: Option<String>,
    pub instagram_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub google_verification: Option<String>,
    pub bing_verification: Option<String>,
    pub yandex_verification: Option<String>,
    pub business_hours: Option<BusinessHours>,
    pub google_analytics_id: Option<String>,
    pub google_tag_manager_id: Option<String>,
    pub facebook_pixel_id: Option<String>,
}
