//! schema.org JSON-LD documents embedded in page heads.

use serde_json::{json, Map, Value};

use super::SiteProfile;

const CONTEXT: &str = "https://schema.org";

/// A priced session offer; `duration_minutes` feeds the offer description.
#[derive(Clone, Debug, PartialEq)]
pub struct Offer {
    pub price: f64,
    pub currency: String,
    pub duration_minutes: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServiceSchemaInput {
    pub name: String,
    pub description: String,
    pub url: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub offers: Vec<Offer>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersonSchemaInput {
    pub name: String,
    pub job_title: String,
    pub description: Option<String>,
    pub url: String,
    pub image: Option<String>,
    pub credentials: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArticleSchemaInput {
    pub headline: String,
    pub description: String,
    pub url: String,
    pub image: Option<String>,
    pub published_time: String,
    pub modified_time: Option<String>,
    pub author: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BreadcrumbItem {
    pub name: String,
    pub url: String,
}

impl BreadcrumbItem {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { name: name.into(), url: url.into() }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn insert_opt(obj: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(v) = non_empty(value) {
        obj.insert(key.to_string(), json!(v));
    }
}

fn provider(profile: &SiteProfile) -> Value {
    let org = &profile.site.organization;
    json!({ "@type": org.schema_type, "name": org.name, "url": org.url })
}

fn area_served(profile: &SiteProfile) -> Value {
    json!({ "@type": "City", "name": profile.site.location.address_locality })
}

pub fn organization_schema(profile: &SiteProfile) -> Value {
    let site = &profile.site;
    let org = &site.organization;
    let loc = &site.location;
    let hours = &site.business_hours;
    json!({
        "@context": CONTEXT,
        "@type": org.schema_type,
        "name": org.name,
        "legalName": org.legal_name,
        "url": org.url,
        "logo": org.logo,
        "image": org.logo,
        "description": site.default_description,
        "foundingDate": org.founding_date,
        "address": {
            "@type": "PostalAddress",
            "streetAddress": loc.street_address,
            "addressLocality": loc.address_locality,
            "addressRegion": loc.address_region,
            "postalCode": loc.postal_code,
            "addressCountry": loc.address_country,
        },
        "contactPoint": {
            "@type": "ContactPoint",
            "telephone": site.contact.phone,
            "contactType": "customer service",
            "email": site.contact.email,
            "areaServed": site.region,
            "availableLanguage": site.language,
        },
        "areaServed": area_served(profile),
        "openingHoursSpecification": {
            "@type": "OpeningHoursSpecification",
            "dayOfWeek": hours.day_of_week,
            "opens": hours.opens,
            "closes": hours.closes,
        },
        "sameAs": site.social.urls(),
    })
}

pub fn service_schema(profile: &SiteProfile, input: &ServiceSchemaInput) -> Value {
    let image = non_empty(&input.image)
        .map(str::to_string)
        .unwrap_or_else(|| profile.site.default_image_url());
    let mut obj = Map::new();
    obj.insert("@context".into(), json!(CONTEXT));
    obj.insert("@type".into(), json!("Service"));
    obj.insert("name".into(), json!(input.name));
    obj.insert("description".into(), json!(input.description));
    obj.insert("provider".into(), provider(profile));
    obj.insert("url".into(), json!(input.url));
    obj.insert("image".into(), json!(image));
    if let Some(category) = non_empty(&input.category) {
        obj.insert("category".into(), json!({ "@type": "Thing", "name": category }));
    }
    if !input.offers.is_empty() {
        let offers: Vec<Value> = input
            .offers
            .iter()
            .map(|o| {
                json!({
                    "@type": "Offer",
                    "price": o.price.to_string(),
                    "priceCurrency": o.currency,
                    "availability": "https://schema.org/InStock",
                    "description": format!("{} minutes", o.duration_minutes),
                })
            })
            .collect();
        obj.insert("offers".into(), Value::Array(offers));
    }
    obj.insert("areaServed".into(), area_served(profile));
    Value::Object(obj)
}

pub fn person_schema(profile: &SiteProfile, input: &PersonSchemaInput) -> Value {
    let mut obj = Map::new();
    obj.insert("@context".into(), json!(CONTEXT));
    obj.insert("@type".into(), json!("Person"));
    obj.insert("name".into(), json!(input.name));
    obj.insert("jobTitle".into(), json!(input.job_title));
    insert_opt(&mut obj, "description", &input.description);
    obj.insert("url".into(), json!(input.url));
    insert_opt(&mut obj, "image", &input.image);
    obj.insert("worksFor".into(), provider(profile));
    if let Some(credentials) = non_empty(&input.credentials) {
        obj.insert(
            "hasCredential".into(),
            json!({ "@type": "EducationalOccupationalCredential", "credentialCategory": credentials }),
        );
    }
    insert_opt(&mut obj, "email", &input.email);
    insert_opt(&mut obj, "telephone", &input.telephone);
    Value::Object(obj)
}

pub fn breadcrumb_schema(items: &[BreadcrumbItem]) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            json!({ "@type": "ListItem", "position": i + 1, "name": item.name, "item": item.url })
        })
        .collect();
    json!({ "@context": CONTEXT, "@type": "BreadcrumbList", "itemListElement": elements })
}

pub fn article_schema(profile: &SiteProfile, input: &ArticleSchemaInput) -> Value {
    let org = &profile.site.organization;
    let image = non_empty(&input.image)
        .map(str::to_string)
        .unwrap_or_else(|| profile.site.default_image_url());
    let author = match non_empty(&input.author) {
        Some(name) => json!({ "@type": "Person", "name": name }),
        None => json!({ "@type": "Organization", "name": org.name }),
    };
    let mut obj = Map::new();
    obj.insert("@context".into(), json!(CONTEXT));
    obj.insert("@type".into(), json!("Article"));
    obj.insert("headline".into(), json!(input.headline));
    obj.insert("description".into(), json!(input.description));
    obj.insert("url".into(), json!(input.url));
    obj.insert("image".into(), json!(image));
    obj.insert("datePublished".into(), json!(input.published_time));
    insert_opt(&mut obj, "dateModified", &input.modified_time);
    obj.insert("author".into(), author);
    obj.insert(
        "publisher".into(),
        json!({
            "@type": "Organization",
            "name": org.name,
            "logo": { "@type": "ImageObject", "url": org.logo },
        }),
    );
    Value::Object(obj)
}

/// Serialize for a `<script type="application/ld+json">` body; `</` is
/// escaped so content cannot close the script element.
pub fn to_script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use configs::SiteConfig;

    fn profile() -> SiteProfile {
        SiteProfile::from_config(SiteConfig::default())
    }

    #[test]
    fn organization_carries_address_hours_and_social() {
        let mut site = SiteConfig::default();
        site.social.facebook = Some("https://facebook.com/g".into());
        site.social.twitter = Some(String::new());
        let v = organization_schema(&SiteProfile::from_config(site));
        assert_eq!(v["@type"], "MedicalBusiness");
        assert_eq!(v["address"]["addressLocality"], "Milton");
        assert_eq!(v["contactPoint"]["areaServed"], "CA-ON");
        assert_eq!(v["openingHoursSpecification"]["opens"], "09:00");
        assert_eq!(v["sameAs"], json!(["https://facebook.com/g"]));
    }

    #[test]
    fn service_offers_and_fallback_image() {
        let input = ServiceSchemaInput {
            name: "Massage".into(),
            description: "d".into(),
            url: "https://example.com/services/massage".into(),
            category: Some("Body Work".into()),
            offers: vec![
                Offer { price: 110.0, currency: "CAD".into(), duration_minutes: 60 },
                Offer { price: 99.5, currency: "CAD".into(), duration_minutes: 45 },
            ],
            ..Default::default()
        };
        let v = service_schema(&profile(), &input);
        assert_eq!(v["image"], "https://www.gardenias-healthcare.net/images/logoo.png");
        assert_eq!(v["category"]["name"], "Body Work");
        assert_eq!(v["offers"][0]["price"], "110");
        assert_eq!(v["offers"][1]["price"], "99.5");
        assert_eq!(v["offers"][0]["description"], "60 minutes");
        assert_eq!(v["provider"]["name"], "Gardenias Healthcare Clinic Inc.");
    }

    #[test]
    fn service_without_offers_or_category_omits_them() {
        let v = service_schema(&profile(), &ServiceSchemaInput { name: "X".into(), ..Default::default() });
        assert!(v.get("offers").is_none());
        assert!(v.get("category").is_none());
    }

    #[test]
    fn person_optional_fields() {
        let input = PersonSchemaInput {
            name: "Jane".into(),
            job_title: "RMT".into(),
            url: "u".into(),
            credentials: Some("RMT".into()),
            email: Some(String::new()),
            ..Default::default()
        };
        let v = person_schema(&profile(), &input);
        assert_eq!(v["hasCredential"]["credentialCategory"], "RMT");
        assert!(v.get("email").is_none());
        assert!(v.get("description").is_none());
        assert!(v.get("image").is_none());
    }

    #[test]
    fn breadcrumb_positions_are_one_based() {
        let v = breadcrumb_schema(&[BreadcrumbItem::new("Home", "/"), BreadcrumbItem::new("Staff", "/staff")]);
        assert_eq!(v["itemListElement"][0]["position"], 1);
        assert_eq!(v["itemListElement"][1]["position"], 2);
        assert_eq!(v["itemListElement"][1]["item"], "/staff");
    }

    #[test]
    fn article_author_defaults_to_organization() {
        let v = article_schema(
            &profile(),
            &ArticleSchemaInput { headline: "h".into(), published_time: "2024-01-01".into(), ..Default::default() },
        );
        assert_eq!(v["author"]["@type"], "Organization");
        assert!(v.get("dateModified").is_none());
    }

    #[test]
    fn script_json_cannot_close_tag() {
        let s = to_script_json(&json!({ "name": "</script><b>" }));
        assert!(!s.contains("</script>"));
    }
}
