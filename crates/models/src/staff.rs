use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{Record, Validate};
use crate::validate::{
    check_email, check_image, check_link, check_order, check_slug, clean_list, normalize_slug, require_text,
    trim_opt,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub institution: String,
    pub program: String,
    pub year: String,
}

/// A practitioner profile.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub title: String,
    pub slug: Option<String>,
    pub picture: Option<String>,
    pub hero_image: Option<String>,
    pub short_description: String,
    pub short_bio: Option<String>,
    pub full_biography: Option<String>,
    pub credentials: Option<String>,
    pub areas_of_specialization: Vec<String>,
    pub years_of_experience: Option<String>,
    pub spoken_languages: Vec<String>,
    pub education: Vec<Education>,
    pub associations: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub booking_link: Option<String>,
    #[serde(deserialize_with = "crate::record::deserialize_order")]
    pub order: i64,
    pub is_active: bool,
}

impl Record for StaffMember {
    const COLLECTION: &'static str = "staff";
    const ORDER_FIELD: &'static str = "order";

    fn id(&self) -> &str { &self.id }
    fn set_id(&mut self, id: String) { self.id = id; }
    fn name(&self) -> &str { &self.name }
    fn is_active(&self) -> bool { self.is_active }
    fn set_active(&mut self, active: bool) { self.is_active = active; }
    fn sort_order(&self) -> i64 { self.order }
    fn stored_slug(&self) -> Option<&str> { self.slug.as_deref() }
    fn set_slug(&mut self, slug: Option<String>) { self.slug = slug; }
}

impl StaffMember {
    /// First name, used in section headings ("About Jane").
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// Portrait for cards and share images: picture, else hero image.
    pub fn portrait(&self) -> Option<&str> {
        self.picture.as_deref().or(self.hero_image.as_deref())
    }

    /// Short summary: short bio, else the short description.
    pub fn summary(&self) -> Option<&str> {
        self.short_bio
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.short_description.as_str()).filter(|s| !s.is_empty()))
    }

    /// Longest available biography text.
    pub fn biography(&self) -> Option<&str> {
        self.full_biography
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.summary())
    }
}

impl Validate for StaffMember {
    fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.title = self.title.trim().to_string();
        self.short_description = self.short_description.trim().to_string();
        for opt in [
            &mut self.picture,
            &mut self.hero_image,
            &mut self.short_bio,
            &mut self.full_biography,
            &mut self.credentials,
            &mut self.years_of_experience,
            &mut self.associations,
            &mut self.email,
            &mut self.phone,
            &mut self.booking_link,
        ] {
            trim_opt(opt);
        }
        clean_list(&mut self.areas_of_specialization);
        clean_list(&mut self.spoken_languages);
        self.education.retain(|e| !e.institution.trim().is_empty() || !e.program.trim().is_empty());
        normalize_slug(&mut self.slug, &self.name);
    }

    fn validate(&self) -> Result<(), ModelError> {
        require_text("name", &self.name)?;
        require_text("title", &self.title)?;
        check_order("order", self.order)?;
        check_email("email", self.email.as_deref())?;
        check_link("bookingLink", self.booking_link.as_deref())?;
        check_image("picture", self.picture.as_deref())?;
        check_image("heroImage", self.hero_image.as_deref())?;
        check_slug(self.slug.as_deref())
    }
}
