//! Public HTML pages.
//!
//! Each handler fetches the site profile and its content concurrently; the
//! content reads never fail (they degrade to empty listings), so a page
//! always renders.

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use models::{Category, Record, Service};
use serde::Deserialize;
use serde_json::Value;
use service::seo::pages::{self as presets, PagePreset};
use service::seo::schema::{breadcrumb_schema, organization_schema, person_schema, service_schema};
use service::seo::{generate_metadata, SeoData, SiteProfile};
use tracing::{error, info};

use crate::state::AppState;
use crate::views::{
    find_by_id, AboutPage, CategoryCard, ContactPage, Head, HomePage, NotFoundPage, ServiceCard, ServiceDetail,
    ServiceDetailPage, ServiceSection, ServicesPage, SiteChrome, StaffCard, StaffDetail, StaffDetailPage, StaffPage,
};

const FEATURED_SERVICES: usize = 6;

fn render<T: Template>(status: StatusCode, page: &T) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(event = "template_render_failed", error = %e, "page template failed to render");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Template error: {}", e))).into_response()
        }
    }
}

/// Head for a fixed page: preset metadata, the organization and a breadcrumb trail.
fn preset_head(profile: &SiteProfile, preset: &PagePreset, crumb: &str) -> Head {
    let meta = generate_metadata(profile, preset.seo_data(profile));
    let schemas = vec![
        organization_schema(profile),
        breadcrumb_schema(&presets::page_breadcrumbs(profile, crumb, preset.path)),
    ];
    Head::new(profile, meta, schemas)
}

pub async fn home(State(state): State<AppState>) -> Response {
    let (profile, data) = tokio::join!(state.settings.profile(), state.content.site_data());
    let head = preset_head(&profile, &presets::home(&profile.site), "Home");
    let page = HomePage {
        head,
        site: SiteChrome::new(&profile),
        categories: data.categories.iter().map(|c| CategoryCard::new(c, false)).collect(),
        services: data
            .services
            .iter()
            .take(FEATURED_SERVICES)
            .map(|s| ServiceCard::new(s, data.category(&s.category_id)))
            .collect(),
        staff: data.staff.iter().map(StaffCard::new).collect(),
    };
    render(StatusCode::OK, &page)
}

pub async fn about(State(state): State<AppState>) -> Response {
    let (profile, staff) = tokio::join!(state.settings.profile(), state.content.public_staff());
    let head = preset_head(&profile, &presets::about(&profile.site), "About");
    let page = AboutPage { head, site: SiteChrome::new(&profile), staff: staff.iter().map(StaffCard::new).collect() };
    render(StatusCode::OK, &page)
}

pub async fn contact(State(state): State<AppState>) -> Response {
    let profile = state.settings.profile().await;
    let head = preset_head(&profile, &presets::contact(&profile.site), "Contact");
    render(StatusCode::OK, &ContactPage { head, site: SiteChrome::new(&profile) })
}

#[derive(Debug, Default, Deserialize)]
pub struct ServicesFilter {
    pub category: Option<String>,
}

/// Category-specific copy when the visitor filtered by a category.
fn category_seo(profile: &SiteProfile, category: &Category) -> SeoData {
    let title = category
        .seo_title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| format!("{} Services", category.name));
    let description = category
        .seo_description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .or_else(|| Some(category.short_description.clone()));
    SeoData {
        title: Some(title),
        description,
        url: Some(profile.url_for(&presets::category_path(category))),
        ..Default::default()
    }
}

pub async fn services(State(state): State<AppState>, Query(filter): Query<ServicesFilter>) -> Response {
    let (profile, data) = tokio::join!(state.settings.profile(), state.content.site_data());
    let selected = filter
        .category
        .as_deref()
        .and_then(|slug| data.categories.iter().find(|c| c.public_slug() == slug));

    let preset = presets::services_index(&profile.site);
    let (seo, heading) = match selected {
        Some(c) => (category_seo(&profile, c), c.name.clone()),
        None => (preset.seo_data(&profile), preset.title.clone()),
    };
    let schemas = vec![
        organization_schema(&profile),
        breadcrumb_schema(&presets::page_breadcrumbs(&profile, "Services", preset.path)),
    ];
    let head = Head::new(&profile, generate_metadata(&profile, seo), schemas);

    let sections = data
        .categories
        .iter()
        .filter(|c| selected.map_or(true, |s| s.id == c.id))
        .filter_map(|c| {
            let services: Vec<ServiceCard> = data
                .services
                .iter()
                .filter(|s| s.category_id == c.id)
                .map(|s| ServiceCard::new(s, Some(c)))
                .collect();
            (!services.is_empty()).then(|| ServiceSection { category: CategoryCard::new(c, false), services })
        })
        .collect();

    let page = ServicesPage {
        head,
        site: SiteChrome::new(&profile),
        heading,
        filters: data
            .categories
            .iter()
            .map(|c| CategoryCard::new(c, selected.is_some_and(|s| s.id == c.id)))
            .collect(),
        sections,
    };
    render(StatusCode::OK, &page)
}

pub async fn service_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let (profile, found, categories, staff) = tokio::join!(
        state.settings.profile(),
        state.content.service_by_slug(&slug),
        state.content.public_categories(),
        state.content.public_staff(),
    );
    let Some(service) = found else {
        info!(event = "page_not_found", kind = "service", %slug);
        return not_found_for(&profile);
    };
    let category = find_by_id(&categories, &service.category_id);

    let meta = generate_metadata(&profile, presets::service_seo(&profile, &service, category));
    let schemas: Vec<Value> = vec![
        service_schema(&profile, &presets::service_schema_input(&profile, &service, category)),
        breadcrumb_schema(&presets::service_breadcrumbs(&profile, &service, category)),
    ];
    let practitioners = service
        .practitioners
        .iter()
        .filter_map(|id| find_by_id(&staff, id))
        .map(StaffCard::new)
        .collect();

    let page = ServiceDetailPage {
        head: Head::new(&profile, meta, schemas),
        site: SiteChrome::new(&profile),
        service: ServiceDetail::new(&profile, &service, category),
        practitioners,
    };
    render(StatusCode::OK, &page)
}

pub async fn staff(State(state): State<AppState>) -> Response {
    let (profile, staff) = tokio::join!(state.settings.profile(), state.content.public_staff());
    let head = preset_head(&profile, &presets::staff_index(&profile.site), "Staff");
    let page = StaffPage { head, site: SiteChrome::new(&profile), staff: staff.iter().map(StaffCard::new).collect() };
    render(StatusCode::OK, &page)
}

pub async fn staff_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let (profile, found) = tokio::join!(state.settings.profile(), state.content.staff_by_slug(&slug));
    let Some(member) = found else {
        info!(event = "page_not_found", kind = "staff", %slug);
        return not_found_for(&profile);
    };
    let (services, categories) =
        tokio::join!(state.content.services_by_staff(&member.id), state.content.public_categories());

    let meta = generate_metadata(&profile, presets::staff_seo(&profile, &member));
    let schemas = vec![
        person_schema(&profile, &presets::person_schema_input(&profile, &member)),
        breadcrumb_schema(&presets::staff_breadcrumbs(&profile, &member)),
    ];
    let cards = services
        .iter()
        .map(|s: &Service| ServiceCard::new(s, find_by_id(&categories, &s.category_id)))
        .collect();

    let page = StaffDetailPage {
        head: Head::new(&profile, meta, schemas),
        site: SiteChrome::new(&profile),
        member: StaffDetail::new(&member),
        services: cards,
    };
    render(StatusCode::OK, &page)
}

fn not_found_for(profile: &SiteProfile) -> Response {
    // 站点默认元数据，仅禁止收录
    let seo = SeoData { noindex: true, ..Default::default() };
    let head = Head::new(profile, generate_metadata(profile, seo), Vec::new());
    render(StatusCode::NOT_FOUND, &NotFoundPage { head, site: SiteChrome::new(profile) })
}

/// Router fallback: any unknown path.
pub async fn not_found(State(state): State<AppState>) -> Response {
    not_found_for(&state.settings.profile().await)
}
