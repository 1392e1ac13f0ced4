//! askama page templates and the view models they render.
//!
//! Templates live under `crates/server/templates/`; every page extends
//! `base.html`, which reads the shared `head` and `site` fields.

use askama::Template;
use chrono::{Datelike, Utc};
use models::validate::is_tag_id;
use models::{Category, Record, Service, StaffMember};
use serde_json::Value;
use service::seo::pages::{absolute_image, category_path, service_path, staff_path};
use service::seo::schema::to_script_json;
use service::seo::{PageMetadata, SiteProfile};

/// One `<meta name|property=... content=...>` pair.
pub struct MetaTag {
    pub key: String,
    pub content: String,
}

fn tag(key: &str, content: &str) -> MetaTag {
    MetaTag { key: key.to_string(), content: content.to_string() }
}

/// Everything `base.html` puts in `<head>`.
pub struct Head {
    pub language: String,
    pub title: String,
    pub canonical: String,
    pub names: Vec<MetaTag>,
    pub properties: Vec<MetaTag>,
    pub json_ld: Vec<String>,
    pub ga_id: String,
    pub gtm_id: String,
    pub pixel_id: String,
}

impl Head {
    pub fn new(profile: &SiteProfile, meta: PageMetadata, schemas: Vec<Value>) -> Self {
        let mut names = vec![tag("description", &meta.description), tag("keywords", &meta.keywords)];
        for author in &meta.authors {
            names.push(tag("author", author));
        }
        names.push(tag("creator", &meta.creator));
        names.push(tag("publisher", &meta.publisher));
        names.push(tag("robots", &meta.robots.content()));
        names.push(tag("googlebot", &meta.robots.google_bot_content()));

        let v = &meta.verification;
        for (key, code) in [
            ("google-site-verification", &v.google),
            ("msvalidate.01", &v.bing),
            ("yandex-verification", &v.yandex),
        ] {
            if let Some(code) = code.as_deref().filter(|c| !c.is_empty()) {
                names.push(tag(key, code));
            }
        }

        let tw = &meta.twitter;
        names.push(tag("twitter:card", tw.card));
        names.push(tag("twitter:title", &tw.title));
        names.push(tag("twitter:description", &tw.description));
        for image in &tw.images {
            names.push(tag("twitter:image", image));
        }
        if let Some(site) = &tw.site {
            names.push(tag("twitter:site", site));
        }
        if let Some(creator) = &tw.creator {
            names.push(tag("twitter:creator", creator));
        }

        let og = &meta.open_graph;
        let mut properties = vec![
            tag("og:type", og.og_type.as_str()),
            tag("og:locale", &og.locale.replace('-', "_")),
            tag("og:url", &og.url),
            tag("og:site_name", &og.site_name),
            tag("og:title", &og.title),
            tag("og:description", &og.description),
        ];
        for image in &og.images {
            properties.push(tag("og:image", &image.url));
            properties.push(tag("og:image:width", &image.width.to_string()));
            properties.push(tag("og:image:height", &image.height.to_string()));
            properties.push(tag("og:image:alt", &image.alt));
        }
        if let Some(t) = &og.published_time {
            properties.push(tag("article:published_time", t));
        }
        if let Some(t) = &og.modified_time {
            properties.push(tag("article:modified_time", t));
        }

        let a = &profile.analytics;
        Self {
            language: profile.site.language.clone(),
            title: meta.title,
            canonical: meta.canonical,
            names,
            properties,
            json_ld: schemas.iter().map(to_script_json).collect(),
            ga_id: tag_id(&a.google_analytics_id),
            gtm_id: tag_id(&a.google_tag_manager_id),
            pixel_id: tag_id(&a.facebook_pixel_id),
        }
    }
}

// 直接写入存储、未经校验的 id 不输出到脚本中
fn tag_id(value: &Option<String>) -> String {
    value.as_deref().filter(|v| is_tag_id(v)).unwrap_or_default().to_string()
}

/// Header/footer data shared by every page.
pub struct SiteChrome {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub hours: String,
    pub social: Vec<String>,
    pub year: i32,
}

impl SiteChrome {
    pub fn new(profile: &SiteProfile) -> Self {
        let site = &profile.site;
        let loc = &site.location;
        let h = &site.business_hours;
        let hours = match (h.day_of_week.first(), h.day_of_week.last()) {
            (Some(first), Some(last)) if first != last => format!("{first} - {last}: {} - {}", h.opens, h.closes),
            (Some(day), _) => format!("{day}: {} - {}", h.opens, h.closes),
            _ => String::new(),
        };
        Self {
            name: site.name.clone(),
            phone: site.contact.phone.clone(),
            email: site.contact.email.clone(),
            address: format!(
                "{}, {}, {} {}",
                loc.street_address, loc.address_locality, loc.address_region, loc.postal_code
            ),
            hours,
            social: site.social.urls(),
            year: Utc::now().year(),
        }
    }
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${price:.0}")
    } else {
        format!("${price:.2}")
    }
}

fn sessions(service: &Service) -> Vec<String> {
    service
        .session_durations
        .iter()
        .map(|d| format!("{} min - {}", d.duration, format_price(d.price)))
        .collect()
}

pub struct CategoryCard {
    pub name: String,
    pub description: String,
    pub accent: String,
    pub url: String,
    pub selected: bool,
}

impl CategoryCard {
    pub fn new(category: &Category, selected: bool) -> Self {
        Self {
            name: category.name.clone(),
            description: category.short_description.clone(),
            accent: category.accent_color.clone(),
            url: category_path(category),
            selected,
        }
    }
}

pub struct ServiceCard {
    pub name: String,
    pub summary: String,
    pub url: String,
    pub image: String,
    pub category: String,
    pub sessions: Vec<String>,
}

impl ServiceCard {
    pub fn new(service: &Service, category: Option<&Category>) -> Self {
        Self {
            name: service.name.clone(),
            summary: service.short_description.clone(),
            url: service_path(service),
            image: service.feature_image().unwrap_or_default().to_string(),
            category: category.map(|c| c.name.clone()).unwrap_or_default(),
            sessions: sessions(service),
        }
    }
}

pub struct StaffCard {
    pub name: String,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub image: String,
}

impl StaffCard {
    pub fn new(member: &StaffMember) -> Self {
        Self {
            name: member.name.clone(),
            title: member.title.clone(),
            summary: member.summary().unwrap_or_default().to_string(),
            url: staff_path(member),
            image: member.portrait().unwrap_or_default().to_string(),
        }
    }
}

/// A category heading on the services page with the services under it.
pub struct ServiceSection {
    pub category: CategoryCard,
    pub services: Vec<ServiceCard>,
}

pub struct ServiceDetail {
    pub name: String,
    pub category: String,
    pub category_url: String,
    pub description: String,
    pub image: String,
    pub gallery: Vec<String>,
    pub booking_link: String,
    pub sessions: Vec<String>,
    pub who_its_for: Vec<String>,
    pub common_conditions: Vec<String>,
    pub expected_benefits: Vec<String>,
    pub contraindications: Vec<String>,
    pub when_to_see_doctor: String,
    pub first_visit: String,
    pub what_to_wear: Vec<String>,
    pub aftercare: Vec<String>,
    pub pre_booking_note: String,
}

impl ServiceDetail {
    pub fn new(profile: &SiteProfile, service: &Service, category: Option<&Category>) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: service.name.clone(),
            category: category.map(|c| c.name.clone()).unwrap_or_default(),
            category_url: category.map(category_path).unwrap_or_else(|| "/services".to_string()),
            description: service.description().to_string(),
            image: absolute_image(profile, service.hero_image.as_deref()).unwrap_or_default(),
            gallery: service.gallery_images.clone(),
            booking_link: text(&service.booking_link),
            sessions: sessions(service),
            who_its_for: service.who_its_for.clone(),
            common_conditions: service.common_conditions.clone(),
            expected_benefits: service.expected_benefits.clone(),
            contraindications: service.contraindications.clone(),
            when_to_see_doctor: text(&service.when_to_see_doctor),
            first_visit: text(&service.first_visit_overview),
            what_to_wear: service.what_to_wear.clone(),
            aftercare: service.aftercare_advice.clone(),
            pre_booking_note: text(&service.pre_booking_note),
        }
    }
}

pub struct StaffDetail {
    pub name: String,
    pub first_name: String,
    pub title: String,
    pub image: String,
    pub biography: String,
    pub credentials: String,
    pub experience: String,
    pub specializations: Vec<String>,
    pub languages: Vec<String>,
    pub education: Vec<String>,
    pub associations: String,
    pub booking_link: String,
}

impl StaffDetail {
    pub fn new(member: &StaffMember) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: member.name.clone(),
            first_name: member.first_name().to_string(),
            title: member.title.clone(),
            image: member.portrait().unwrap_or_default().to_string(),
            biography: member.biography().unwrap_or_default().to_string(),
            credentials: text(&member.credentials),
            experience: text(&member.years_of_experience),
            specializations: member.areas_of_specialization.clone(),
            languages: member.spoken_languages.clone(),
            education: member
                .education
                .iter()
                .map(|e| {
                    [e.program.as_str(), e.institution.as_str(), e.year.as_str()]
                        .into_iter()
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .collect(),
            associations: text(&member.associations),
            booking_link: text(&member.booking_link),
        }
    }
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomePage {
    pub head: Head,
    pub site: SiteChrome,
    pub categories: Vec<CategoryCard>,
    pub services: Vec<ServiceCard>,
    pub staff: Vec<StaffCard>,
}

#[derive(Template)]
#[template(path = "pages/about.html")]
pub struct AboutPage {
    pub head: Head,
    pub site: SiteChrome,
    pub staff: Vec<StaffCard>,
}

#[derive(Template)]
#[template(path = "pages/contact.html")]
pub struct ContactPage {
    pub head: Head,
    pub site: SiteChrome,
}

#[derive(Template)]
#[template(path = "pages/services.html")]
pub struct ServicesPage {
    pub head: Head,
    pub site: SiteChrome,
    pub heading: String,
    pub filters: Vec<CategoryCard>,
    pub sections: Vec<ServiceSection>,
}

#[derive(Template)]
#[template(path = "pages/service_detail.html")]
pub struct ServiceDetailPage {
    pub head: Head,
    pub site: SiteChrome,
    pub service: ServiceDetail,
    pub practitioners: Vec<StaffCard>,
}

#[derive(Template)]
#[template(path = "pages/staff.html")]
pub struct StaffPage {
    pub head: Head,
    pub site: SiteChrome,
    pub staff: Vec<StaffCard>,
}

#[derive(Template)]
#[template(path = "pages/staff_detail.html")]
pub struct StaffDetailPage {
    pub head: Head,
    pub site: SiteChrome,
    pub member: StaffDetail,
    pub services: Vec<ServiceCard>,
}

#[derive(Template)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundPage {
    pub head: Head,
    pub site: SiteChrome,
}

/// First record with the given document id.
pub fn find_by_id<'a, T: Record>(records: &'a [T], id: &str) -> Option<&'a T> {
    records.iter().find(|r| r.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use configs::SiteConfig;
    use models::SessionDuration;
    use service::seo::{generate_metadata, SeoData};

    fn profile() -> SiteProfile {
        SiteProfile::from_config(SiteConfig::default())
    }

    #[test]
    fn head_lists_verification_only_when_set() {
        let mut p = profile();
        let meta = generate_metadata(&p, SeoData::default());
        let head = Head::new(&p, meta, vec![]);
        assert!(!head.names.iter().any(|t| t.key == "google-site-verification"));
        assert!(head.properties.iter().any(|t| t.key == "og:locale" && t.content == "en_CA"));

        p.verification.google = Some("abc".into());
        p.analytics.google_analytics_id = Some("G-1".into());
        let meta = generate_metadata(&p, SeoData::default());
        let head = Head::new(&p, meta, vec![serde_json::json!({"@type": "Thing"})]);
        assert!(head.names.iter().any(|t| t.key == "google-site-verification" && t.content == "abc"));
        assert_eq!(head.ga_id, "G-1");

        p.analytics.google_tag_manager_id = Some("GTM-1');alert(1);//".into());
        let head = Head::new(&p, generate_metadata(&p, SeoData::default()), vec![]);
        assert_eq!(head.gtm_id, "");
        assert_eq!(head.json_ld, vec![r#"{"@type":"Thing"}"#.to_string()]);
    }

    #[test]
    fn service_card_formats_sessions() {
        let svc = Service {
            id: "s".into(),
            name: "Massage".into(),
            session_durations: vec![
                SessionDuration { duration: 60, price: 110.0 },
                SessionDuration { duration: 90, price: 150.5 },
            ],
            ..Default::default()
        };
        let card = ServiceCard::new(&svc, None);
        assert_eq!(card.sessions, vec!["60 min - $110", "90 min - $150.50"]);
        assert_eq!(card.url, "/services/massage");
    }

    #[test]
    fn chrome_hours_span_week() {
        let chrome = SiteChrome::new(&profile());
        assert_eq!(chrome.hours, "Monday - Saturday: 09:00 - 18:00");
        assert!(chrome.address.starts_with("348 Bronte St South"));
    }
}
