use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{Record, Validate};
use crate::validate::{check_hex_color, check_order, check_slug, normalize_slug, require_text, trim_opt};

pub const DEFAULT_ACCENT_COLOR: &str = "#008d80";

/// Grouping of services shown as a section/filter on the services page.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub short_description: String,
    pub icon: Option<String>,
    pub accent_color: String,
    #[serde(deserialize_with = "crate::record::deserialize_order")]
    pub display_order: i64,
    pub is_active: bool,
    pub slug: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

impl Default for Category {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            short_description: String::new(),
            icon: None,
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            display_order: 0,
            is_active: false,
            slug: None,
            seo_title: None,
            seo_description: None,
        }
    }
}

impl Record for Category {
    const COLLECTION: &'static str = "categories";
    const ORDER_FIELD: &'static str = "displayOrder";

    fn id(&self) -> &str { &self.id }
    fn set_id(&mut self, id: String) { self.id = id; }
    fn name(&self) -> &str { &self.name }
    fn is_active(&self) -> bool { self.is_active }
    fn set_active(&mut self, active: bool) { self.is_active = active; }
    fn sort_order(&self) -> i64 { self.display_order }
    fn stored_slug(&self) -> Option<&str> { self.slug.as_deref() }
    fn set_slug(&mut self, slug: Option<String>) { self.slug = slug; }
}

impl Category {
    /// Whether the dashboard has page-specific SEO copy for this category.
    pub fn has_seo_fields(&self) -> bool {
        self.seo_title.as_deref().is_some_and(|s| !s.is_empty())
            || self.seo_description.as_deref().is_some_and(|s| !s.is_empty())
    }
}

impl Validate for Category {
    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.short_description = self.short_description.trim().to_string();
        self.accent_color = self.accent_color.trim().to_ascii_lowercase();
        if self.accent_color.is_empty() {
            self.accent_color = DEFAULT_ACCENT_COLOR.to_string();
        }
        trim_opt(&mut self.icon);
        trim_opt(&mut self.seo_title);
        trim_opt(&mut self.seo_description);
        normalize_slug(&mut self.slug, &self.name);
    }

    fn validate(&self) -> Result<(), ModelError> {
        require_text("name", &self.name)?;
        check_hex_color("accentColor", &self.accent_color)?;
        check_order("displayOrder", self.display_order)?;
        check_slug(self.slug.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let c: Category = serde_json::from_value(serde_json::json!({"name": "Massage"})).expect("decode");
        assert_eq!(c.accent_color, DEFAULT_ACCENT_COLOR);
        assert_eq!(c.display_order, 0);
        assert!(!c.is_active);
        assert_eq!(c.public_slug(), "massage");
    }

    #[test]
    fn normalize_then_validate() {
        let mut c = Category {
            name: "  Manual Therapies ".into(),
            accent_color: "#00AA11".into(),
            display_order: 2,
            ..Default::default()
        };
        c.normalize();
        c.validate().expect("valid");
        assert_eq!(c.slug.as_deref(), Some("manual-therapies"));
        assert_eq!(c.accent_color, "#00aa11");

        c.display_order = -1;
        assert!(matches!(c.validate(), Err(ModelError::Validation(_))));
    }
}
