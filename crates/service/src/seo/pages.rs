//! Per-page SEO input: presets for the fixed pages and builders for the
//! service and staff detail pages.

use configs::SiteConfig;
use models::{Category, Record, Service, StaffMember};

use super::metadata::SeoData;
use super::schema::{BreadcrumbItem, Offer, PersonSchemaInput, ServiceSchemaInput};
use super::SiteProfile;

/// Title, description and keywords of a fixed page. `keywords: None` means
/// the page uses the site-wide defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct PagePreset {
    pub path: &'static str,
    pub title: String,
    pub description: String,
    pub keywords: Option<Vec<String>>,
}

impl PagePreset {
    pub fn seo_data(&self, profile: &SiteProfile) -> SeoData {
        SeoData {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            keywords: self.keywords.clone(),
            url: Some(page_url(profile, self.path)),
            ..Default::default()
        }
    }
}

fn page_url(profile: &SiteProfile, path: &str) -> String {
    if path == "/" {
        format!("{}/", profile.site.base_url)
    } else {
        profile.url_for(path)
    }
}

pub fn home(site: &SiteConfig) -> PagePreset {
    let loc = &site.location.address_locality;
    let region = &site.location.region_name;
    PagePreset {
        path: "/",
        title: format!("Home - Professional Healthcare Services in {loc}, {}", site.location.address_region),
        description: format!(
            "{} offers professional medical services including massage therapy, reflexology, naturopathic medicine, and more. Expert practitioners in {loc}, {region}.",
            site.name
        ),
        keywords: Some(vec![
            format!("healthcare {loc}"),
            format!("massage therapy {loc}"),
            format!("reflexology {loc}"),
            "naturopathic medicine".to_string(),
            format!("healthcare clinic {loc} {region}"),
        ]),
    }
}

pub fn about(site: &SiteConfig) -> PagePreset {
    let loc = &site.location.address_locality;
    let region = &site.location.region_name;
    PagePreset {
        path: "/about",
        title: format!("About Us - {} Clinic", site.name),
        description: format!(
            "Learn about {} Clinic in {loc}, {region}. Our mission is to help you achieve lasting wellness through personalized care, evidence-based therapies, and genuine human connection.",
            site.name
        ),
        keywords: Some(vec![
            format!("about {}", site.name),
            format!("healthcare clinic {loc}"),
            format!("{loc} healthcare"),
            format!("medical clinic {loc} {region}"),
        ]),
    }
}

pub fn contact(site: &SiteConfig) -> PagePreset {
    let loc = &site.location.address_locality;
    let region = &site.location.region_name;
    PagePreset {
        path: "/contact",
        title: "Contact Us".to_string(),
        description: format!(
            "Contact {} in {loc}, {region}. Call {} or email {} to book an appointment.",
            site.name, site.contact.phone, site.contact.email
        ),
        keywords: Some(vec![
            format!("contact {}", site.name),
            format!("{loc} healthcare contact"),
            format!("book appointment {loc}"),
            format!("healthcare clinic {loc}"),
        ]),
    }
}

pub fn services_index(site: &SiteConfig) -> PagePreset {
    PagePreset {
        path: "/services",
        title: "Our Services".to_string(),
        description: format!(
            "Explore the treatments offered at {} in {}, {}.",
            site.name, site.location.address_locality, site.location.region_name
        ),
        keywords: None,
    }
}

pub fn staff_index(site: &SiteConfig) -> PagePreset {
    PagePreset {
        path: "/staff",
        title: "Our Team".to_string(),
        description: format!("Meet the practitioners of {}.", site.name),
        keywords: None,
    }
}

pub fn static_pages(site: &SiteConfig) -> Vec<PagePreset> {
    vec![home(site), about(site), contact(site), services_index(site), staff_index(site)]
}

/// Site-relative image paths become absolute so crawlers can fetch them.
pub fn absolute_image(profile: &SiteProfile, image: Option<&str>) -> Option<String> {
    let image = image.map(str::trim).filter(|i| !i.is_empty())?;
    if image.starts_with('/') {
        Some(profile.url_for(image))
    } else {
        Some(image.to_string())
    }
}

/// Path segment of a service detail page.
pub fn service_path(service: &Service) -> String {
    let slug = service.public_slug();
    if slug.is_empty() {
        format!("/services/{}", service.id)
    } else {
        format!("/services/{slug}")
    }
}

pub fn staff_path(member: &StaffMember) -> String {
    format!("/staff/{}", member.public_slug())
}

pub fn category_path(category: &Category) -> String {
    format!("/services?category={}", category.public_slug())
}

pub fn service_keywords(site: &SiteConfig, service: &Service, category: Option<&Category>) -> Vec<String> {
    if !service.keywords.is_empty() {
        return service.keywords.clone();
    }
    [
        service.name.clone(),
        category.map(|c| c.name.clone()).unwrap_or_default(),
        site.location.address_locality.clone(),
        site.location.region_name.clone(),
    ]
    .into_iter()
    .filter(|k| !k.is_empty())
    .collect()
}

/// Keywords derived for a practitioner page.
pub fn staff_keywords(site: &SiteConfig, member: &StaffMember) -> Vec<String> {
    let mut keywords = vec![
        member.name.clone(),
        member.title.clone(),
        site.name.clone(),
        site.location.address_locality.clone(),
        site.location.region_name.clone(),
    ];
    keywords.extend(member.areas_of_specialization.iter().cloned());
    keywords.retain(|k| !k.trim().is_empty());
    keywords
}

pub fn service_seo(profile: &SiteProfile, service: &Service, category: Option<&Category>) -> SeoData {
    let site = &profile.site;
    let title = service
        .seo_title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| {
            let group = category.map(|c| c.name.as_str()).unwrap_or("Service");
            format!("{} | {group} | {}", service.name, site.name)
        });
    let description = service
        .seo_description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .or_else(|| Some(service.short_description.clone()));
    SeoData {
        title: Some(title),
        description,
        keywords: Some(service_keywords(site, service, category)),
        url: Some(profile.url_for(&service_path(service))),
        image: absolute_image(profile, service.hero_image.as_deref()),
        ..Default::default()
    }
}

pub fn service_schema_input(profile: &SiteProfile, service: &Service, category: Option<&Category>) -> ServiceSchemaInput {
    ServiceSchemaInput {
        name: service.name.clone(),
        description: service.description().to_string(),
        url: profile.url_for(&service_path(service)),
        image: absolute_image(profile, service.hero_image.as_deref()),
        category: category.map(|c| c.name.clone()),
        offers: service
            .session_durations
            .iter()
            .map(|d| Offer {
                price: d.price,
                currency: profile.site.currency.clone(),
                duration_minutes: d.duration,
            })
            .collect(),
    }
}

pub fn service_breadcrumbs(profile: &SiteProfile, service: &Service, category: Option<&Category>) -> Vec<BreadcrumbItem> {
    let services_url = profile.url_for("/services");
    let (group_name, group_url) = match category {
        Some(c) if !c.public_slug().is_empty() => (c.name.clone(), profile.url_for(&category_path(c))),
        Some(c) => (c.name.clone(), services_url.clone()),
        None => ("Services".to_string(), services_url.clone()),
    };
    vec![
        BreadcrumbItem::new("Home", page_url(profile, "/")),
        BreadcrumbItem::new("Services", services_url),
        BreadcrumbItem::new(group_name, group_url),
        BreadcrumbItem::new(service.name.clone(), profile.url_for(&service_path(service))),
    ]
}

pub fn staff_seo(profile: &SiteProfile, member: &StaffMember) -> SeoData {
    let site = &profile.site;
    let description = member.summary().map(str::to_string).unwrap_or_else(|| {
        format!(
            "{} at {} in {}, {}.",
            member.title, site.name, site.location.address_locality, site.location.region_name
        )
    });
    let title = if member.title.trim().is_empty() {
        member.name.clone()
    } else {
        format!("{} - {}", member.name, member.title)
    };
    SeoData {
        title: Some(title),
        description: Some(description),
        keywords: Some(staff_keywords(site, member)),
        url: Some(profile.url_for(&staff_path(member))),
        image: absolute_image(profile, member.portrait()),
        author: Some(member.name.clone()),
        ..Default::default()
    }
}

pub fn person_schema_input(profile: &SiteProfile, member: &StaffMember) -> PersonSchemaInput {
    PersonSchemaInput {
        name: member.name.clone(),
        job_title: member.title.clone(),
        description: member.biography().map(str::to_string),
        url: profile.url_for(&staff_path(member)),
        image: absolute_image(profile, member.portrait()),
        credentials: member.credentials.clone(),
        email: member.email.clone(),
        telephone: member.phone.clone(),
    }
}

pub fn staff_breadcrumbs(profile: &SiteProfile, member: &StaffMember) -> Vec<BreadcrumbItem> {
    vec![
        BreadcrumbItem::new("Home", page_url(profile, "/")),
        BreadcrumbItem::new("Staff", profile.url_for("/staff")),
        BreadcrumbItem::new(member.name.clone(), profile.url_for(&staff_path(member))),
    ]
}

/// Breadcrumbs of a fixed page: Home, then the page itself.
pub fn page_breadcrumbs(profile: &SiteProfile, name: &str, path: &str) -> Vec<BreadcrumbItem> {
    let mut items = vec![BreadcrumbItem::new("Home", page_url(profile, "/"))];
    if path != "/" {
        items.push(BreadcrumbItem::new(name, page_url(profile, path)));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seo::metadata::generate_metadata;
    use models::SessionDuration;

    fn profile() -> SiteProfile {
        SiteProfile::from_config(SiteConfig::default())
    }

    fn massage() -> Service {
        Service {
            id: "svc-1".into(),
            name: "Massage Therapy".into(),
            short_description: "Relaxing".into(),
            hero_image: Some("/images/massage.jpg".into()),
            session_durations: vec![SessionDuration { duration: 60, price: 110.0 }],
            ..Default::default()
        }
    }

    #[test]
    fn home_preset_matches_clinic_copy() {
        let p = home(&SiteConfig::default());
        assert_eq!(p.title, "Home - Professional Healthcare Services in Milton, ON");
        assert_eq!(p.keywords.as_ref().map(|k| k[4].as_str()), Some("healthcare clinic Milton Ontario"));
        let meta = generate_metadata(&profile(), p.seo_data(&profile()));
        assert_eq!(meta.canonical, "https://www.gardenias-healthcare.net/");
        assert_eq!(meta.title, "Home - Professional Healthcare Services in Milton, ON | Gardenias Healthcare");
    }

    #[test]
    fn index_pages_fall_back_to_default_keywords() {
        let site = SiteConfig::default();
        let meta = generate_metadata(&profile(), services_index(&site).seo_data(&profile()));
        assert_eq!(meta.keywords, site.default_keywords.join(", "));
    }

    #[test]
    fn service_page_seo_without_overrides() {
        let category = Category { id: "c".into(), name: "Body Work".into(), ..Default::default() };
        let p = profile();
        let meta = generate_metadata(&p, service_seo(&p, &massage(), Some(&category)));
        assert_eq!(meta.title, "Massage Therapy | Body Work | Gardenias Healthcare");
        assert_eq!(meta.description, "Relaxing");
        assert_eq!(meta.keywords, "Massage Therapy, Body Work, Milton, Ontario");
        assert_eq!(meta.canonical, "https://www.gardenias-healthcare.net/services/massage-therapy");
        assert_eq!(meta.open_graph.images[0].url, "https://www.gardenias-healthcare.net/images/massage.jpg");
    }

    #[test]
    fn service_page_seo_prefers_stored_fields() {
        let mut svc = massage();
        svc.seo_title = Some("Best Massage in Town".into());
        svc.seo_description = Some("Book now".into());
        svc.keywords = vec!["rmt".into()];
        let p = profile();
        let meta = generate_metadata(&p, service_seo(&p, &svc, None));
        assert_eq!(meta.title, "Best Massage in Town | Gardenias Healthcare");
        assert_eq!(meta.description, "Book now");
        assert_eq!(meta.keywords, "rmt");
    }

    #[test]
    fn service_breadcrumbs_link_category_filter() {
        let category = Category { id: "c".into(), name: "Body Work".into(), ..Default::default() };
        let crumbs = service_breadcrumbs(&profile(), &massage(), Some(&category));
        assert_eq!(crumbs[2].url, "https://www.gardenias-healthcare.net/services?category=body-work");
        let crumbs = service_breadcrumbs(&profile(), &massage(), None);
        assert_eq!(crumbs[2].name, "Services");
        assert_eq!(crumbs.len(), 4);
    }

    #[test]
    fn staff_page_seo_and_keywords() {
        let member = StaffMember {
            id: "m".into(),
            name: "Jane Doe".into(),
            title: "RMT".into(),
            areas_of_specialization: vec!["Sports".into()],
            ..Default::default()
        };
        let p = profile();
        let meta = generate_metadata(&p, staff_seo(&p, &member));
        assert_eq!(meta.title, "Jane Doe - RMT | Gardenias Healthcare");
        assert_eq!(meta.description, "RMT at Gardenias Healthcare in Milton, Ontario.");
        assert_eq!(meta.keywords, "Jane Doe, RMT, Gardenias Healthcare, Milton, Ontario, Sports");
        assert_eq!(meta.authors, vec!["Jane Doe".to_string()]);
        assert_eq!(meta.canonical, "https://www.gardenias-healthcare.net/staff/jane-doe");
    }

    #[test]
    fn offers_use_site_currency() {
        let input = service_schema_input(&profile(), &massage(), None);
        assert_eq!(input.offers, vec![Offer { price: 110.0, currency: "CAD".into(), duration_minutes: 60 }]);
    }
}
