use configs::SiteConfig;
use models::{Category, Record, Service, StaffMember};
use serde::Serialize;

use super::pages::{category_path, service_keywords, service_path, staff_keywords, staff_path, static_pages};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageKeywords {
    pub id: String,
    pub name: String,
    pub path: String,
    pub keywords: Vec<String>,
    /// The record carries its own keyword list rather than derived ones.
    pub custom: bool,
    pub is_active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryKeywords {
    pub id: String,
    pub name: String,
    pub path: String,
    pub has_seo_fields: bool,
    pub is_active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPageKeywords {
    pub path: String,
    pub title: String,
    pub keywords: Vec<String>,
    pub uses_defaults: bool,
}

/// What every public page is optimised for, for the dashboard overview.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordOverview {
    pub services: Vec<PageKeywords>,
    pub categories: Vec<CategoryKeywords>,
    pub staff: Vec<PageKeywords>,
    pub static_pages: Vec<StaticPageKeywords>,
}

/// Built from the full catalog, inactive records included.
pub fn keyword_overview(
    site: &SiteConfig,
    categories: &[Category],
    services: &[Service],
    staff: &[StaffMember],
) -> KeywordOverview {
    let services = services
        .iter()
        .map(|s| {
            let category = categories.iter().find(|c| c.id == s.category_id);
            PageKeywords {
                id: s.id.clone(),
                name: s.name.clone(),
                path: service_path(s),
                keywords: service_keywords(site, s, category),
                custom: !s.keywords.is_empty(),
                is_active: s.is_active,
            }
        })
        .collect();
    let category_rows = categories
        .iter()
        .map(|c| CategoryKeywords {
            id: c.id.clone(),
            name: c.name.clone(),
            path: category_path(c),
            has_seo_fields: c.has_seo_fields(),
            is_active: c.is_active(),
        })
        .collect();
    let staff = staff
        .iter()
        .map(|m| PageKeywords {
            id: m.id.clone(),
            name: m.name.clone(),
            path: staff_path(m),
            keywords: staff_keywords(site, m),
            custom: false,
            is_active: m.is_active,
        })
        .collect();
    let static_pages = static_pages(site)
        .into_iter()
        .map(|p| StaticPageKeywords {
            path: p.path.to_string(),
            title: p.title,
            uses_defaults: p.keywords.is_none(),
            keywords: p.keywords.unwrap_or_else(|| site.default_keywords.clone()),
        })
        .collect();
    KeywordOverview { services, categories: category_rows, staff, static_pages }
}
