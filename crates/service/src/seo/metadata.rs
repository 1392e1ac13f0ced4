use serde::Serialize;

use super::{SiteProfile, Verification};

const OG_IMAGE_WIDTH: u32 = 1200;
const OG_IMAGE_HEIGHT: u32 = 630;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    #[default]
    Website,
    Article,
}

impl PageType {
    pub fn as_str(self) -> &'static str {
        match self {
            PageType::Website => "website",
            PageType::Article => "article",
        }
    }
}

/// Page-specific SEO input; every field is optional and falls back to the
/// site template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeoData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub image: Option<String>,
    pub url: Option<String>,
    pub page_type: PageType,
    pub published_time: Option<String>,
    pub modified_time: Option<String>,
    pub author: Option<String>,
    pub noindex: bool,
    pub nofollow: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleBotDirectives {
    pub index: bool,
    pub follow: bool,
    #[serde(rename = "max-video-preview")]
    pub max_video_preview: i32,
    #[serde(rename = "max-image-preview")]
    pub max_image_preview: &'static str,
    #[serde(rename = "max-snippet")]
    pub max_snippet: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotsDirectives {
    pub index: bool,
    pub follow: bool,
    pub google_bot: GoogleBotDirectives,
}

impl RobotsDirectives {
    fn new(noindex: bool, nofollow: bool) -> Self {
        Self {
            index: !noindex,
            follow: !nofollow,
            google_bot: GoogleBotDirectives {
                index: !noindex,
                follow: !nofollow,
                max_video_preview: -1,
                max_image_preview: "large",
                max_snippet: -1,
            },
        }
    }

    /// `content` of `<meta name="robots">`.
    pub fn content(&self) -> String {
        format!(
            "{}, {}",
            if self.index { "index" } else { "noindex" },
            if self.follow { "follow" } else { "nofollow" }
        )
    }

    /// `content` of `<meta name="googlebot">`.
    pub fn google_bot_content(&self) -> String {
        let g = &self.google_bot;
        format!(
            "{}, {}, max-video-preview:{}, max-image-preview:{}, max-snippet:{}",
            if g.index { "index" } else { "noindex" },
            if g.follow { "follow" } else { "nofollow" },
            g.max_video_preview,
            g.max_image_preview,
            g.max_snippet
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    #[serde(rename = "type")]
    pub og_type: PageType,
    pub locale: String,
    pub url: String,
    pub site_name: String,
    pub title: String,
    pub description: String,
    pub images: Vec<OgImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
}

/// Fully resolved `<head>` metadata for one page.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub authors: Vec<String>,
    pub creator: String,
    pub publisher: String,
    pub robots: RobotsDirectives,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub canonical: String,
    pub verification: Verification,
}

/// `@handle` from a profile URL such as `https://x.com/handle`.
fn twitter_handle(url: &str) -> Option<String> {
    let handle = url.trim().trim_end_matches('/').rsplit('/').next()?.trim_start_matches('@');
    if handle.is_empty() || handle.contains('.') {
        return None;
    }
    Some(format!("@{handle}"))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolve page metadata, falling back to the site template for every field
/// the page leaves empty.
pub fn generate_metadata(profile: &SiteProfile, data: SeoData) -> PageMetadata {
    let site = &profile.site;
    let title = present(data.title);
    let suffix = format!("| {}", site.name);
    let full_title = match &title {
        Some(t) if t.trim_end().ends_with(&suffix) => t.trim_end().to_string(),
        Some(t) => format!("{t} | {}", site.name),
        None => site.default_title.clone(),
    };
    let description = present(data.description).unwrap_or_else(|| site.default_description.clone());
    let keywords = match data.keywords.filter(|k| !k.is_empty()) {
        Some(k) => k.join(", "),
        None => site.default_keywords.join(", "),
    };
    let image = present(data.image).unwrap_or_else(|| site.default_image_url());
    let canonical = present(data.url).unwrap_or_else(|| site.base_url.clone());
    let twitter = site.social.twitter.as_deref().and_then(twitter_handle);
    let robots = RobotsDirectives::new(data.noindex, data.nofollow);

    PageMetadata {
        authors: data.author.into_iter().filter(|a| !a.trim().is_empty()).collect(),
        creator: site.name.clone(),
        publisher: site.name.clone(),
        robots,
        open_graph: OpenGraph {
            og_type: data.page_type,
            locale: site.language.clone(),
            url: canonical.clone(),
            site_name: site.name.clone(),
            title: full_title.clone(),
            description: description.clone(),
            images: vec![OgImage {
                url: image.clone(),
                width: OG_IMAGE_WIDTH,
                height: OG_IMAGE_HEIGHT,
                alt: title.unwrap_or_else(|| site.default_title.clone()),
            }],
            published_time: data.published_time,
            modified_time: data.modified_time,
        },
        twitter: TwitterCard {
            card: "summary_large_image",
            title: full_title.clone(),
            description: description.clone(),
            images: vec![image],
            creator: twitter.clone(),
            site: twitter,
        },
        canonical,
        verification: profile.verification.clone(),
        title: full_title,
        description,
        keywords,
    }
}
