use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{Record, Validate};
use crate::validate::{
    check_image, check_link, check_order, check_slug, clean_list, normalize_slug, require_text, trim_opt,
};

/// One bookable session length with its price.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionDuration {
    /// Minutes.
    pub duration: u32,
    pub price: f64,
}

/// A bookable clinic offering.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub short_description: String,
    pub full_description: String,
    pub category_id: String,
    pub session_durations: Vec<SessionDuration>,
    #[serde(deserialize_with = "crate::record::deserialize_order")]
    pub display_order: i64,
    pub is_active: bool,
    pub hero_image: Option<String>,
    pub gallery_images: Vec<String>,
    pub booking_link: Option<String>,
    pub slug: Option<String>,
    /// Staff ids of the practitioners offering this service.
    pub practitioners: Vec<String>,
    pub who_its_for: Vec<String>,
    pub common_conditions: Vec<String>,
    pub expected_benefits: Vec<String>,
    pub contraindications: Vec<String>,
    pub when_to_see_doctor: Option<String>,
    pub first_visit_overview: Option<String>,
    pub what_to_wear: Vec<String>,
    pub aftercare_advice: Vec<String>,
    pub pre_booking_note: Option<String>,
    pub post_booking_instructions: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub keywords: Vec<String>,
}

impl Record for Service {
    const COLLECTION: &'static str = "services";
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

impl Service {
    /// Long description, or the short one when no long copy exists.
    pub fn description(&self) -> &str {
        if self.full_description.trim().is_empty() {
            &self.short_description
        } else {
            &self.full_description
        }
    }

    /// Image for the session-experience block: first gallery image, else hero.
    pub fn feature_image(&self) -> Option<&str> {
        self.gallery_images
            .first()
            .map(String::as_str)
            .or(self.hero_image.as_deref())
    }

    pub fn offered_by(&self, staff_id: &str) -> bool {
        self.practitioners.iter().any(|p| p == staff_id)
    }
}

impl Validate for Service {
    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.short_description = self.short_description.trim().to_string();
        self.full_description = self.full_description.trim().to_string();
        self.category_id = self.category_id.trim().to_string();
        for opt in [
            &mut self.hero_image,
            &mut self.booking_link,
            &mut self.when_to_see_doctor,
            &mut self.first_visit_overview,
            &mut self.pre_booking_note,
            &mut self.post_booking_instructions,
            &mut self.seo_title,
            &mut self.seo_description,
        ] {
            trim_opt(opt);
        }
        for list in [
            &mut self.gallery_images,
            &mut self.practitioners,
            &mut self.who_its_for,
            &mut self.common_conditions,
            &mut self.expected_benefits,
            &mut self.contraindications,
            &mut self.what_to_wear,
            &mut self.aftercare_advice,
            &mut self.keywords,
        ] {
            clean_list(list);
        }
        normalize_slug(&mut self.slug, &self.name);
    }

    fn validate(&self) -> Result<(), ModelError> {
        require_text("name", &self.name)?;
        require_text("categoryId", &self.category_id)?;
        check_order("displayOrder", self.display_order)?;
        for session in &self.session_durations {
            if session.duration == 0 {
                return Err(ModelError::invalid("sessionDurations", "duration must be positive"));
            }
            if !session.price.is_finite() || session.price < 0.0 {
                return Err(ModelError::invalid("sessionDurations", "price must be >= 0"));
            }
        }
        check_link("bookingLink", self.booking_link.as_deref())?;
        check_image("heroImage", self.hero_image.as_deref())?;
        for img in &self.gallery_images {
            check_image("galleryImages", Some(img))?;
        }
        check_slug(self.slug.as_deref())
    }

    fn references(&self) -> Vec<(&'static str, String)> {
        let mut refs = vec![(crate::category::Category::COLLECTION, self.category_id.clone())];
        refs.extend(
            self.practitioners
                .iter()
                .map(|id| (crate::staff::StaffMember::COLLECTION, id.clone())),
        );
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Service {
        Service {
            name: "Massage Therapy".into(),
            category_id: "manual".into(),
            session_durations: vec![SessionDuration { duration: 60, price: 110.0 }],
            ..Default::default()
        }
    }

    #[test]
    fn decodes_sparse_document() {
        let s: Service = serde_json::from_value(serde_json::json!({
            "name": "Reflexology",
            "categoryId": "c1",
            "sessionDurations": [{"duration": 45, "price": 80}],
            "isActive": true
        }))
        .expect("decode");
        assert!(s.is_active);
        assert_eq!(s.session_durations[0].price, 80.0);
        assert!(s.keywords.is_empty());
        assert_eq!(s.description(), "");
    }

    #[test]
    fn validation_rules() {
        let mut s = sample();
        s.normalize();
        s.validate().expect("valid");
        assert_eq!(s.slug.as_deref(), Some("massage-therapy"));

        let mut bad = sample();
        bad.session_durations[0].duration = 0;
        assert!(bad.validate().is_err());

        let mut bad = sample();
        bad.category_id = " ".into();
        bad.normalize();
        assert!(bad.validate().is_err());

        let mut bad = sample();
        bad.booking_link = Some("book.example.com".into());
        bad.normalize();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn feature_image_prefers_gallery() {
        let mut s = sample();
        s.hero_image = Some("/images/hero.png".into());
        assert_eq!(s.feature_image(), Some("/images/hero.png"));
        s.gallery_images = vec!["/images/g1.png".into()];
        assert_eq!(s.feature_image(), Some("/images/g1.png"));
    }
}
