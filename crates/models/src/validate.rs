//! Field checks shared by the entity validators.

use crate::errors::ModelError;
use crate::slug::generate_slug;

pub fn require_text(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::invalid(field, "required"));
    }
    Ok(())
}

/// Absolute http(s) URL.
pub fn check_link(field: &str, value: Option<&str>) -> Result<(), ModelError> {
    match value {
        Some(v) if !(v.starts_with("http://") || v.starts_with("https://")) => {
            Err(ModelError::invalid(field, "must start with http:// or https://"))
        }
        _ => Ok(()),
    }
}

/// Absolute http(s) URL or a site-relative path such as `/images/a.png`.
pub fn check_image(field: &str, value: Option<&str>) -> Result<(), ModelError> {
    match value {
        Some(v) if v.starts_with('/') => Ok(()),
        other => check_link(field, other),
    }
}

pub fn check_email(field: &str, value: Option<&str>) -> Result<(), ModelError> {
    if let Some(v) = value {
        let valid = v
            .split_once('@')
            .map(|(user, domain)| !user.is_empty() && domain.contains('.') && !domain.starts_with('.'))
            .unwrap_or(false);
        if !valid || v.contains(char::is_whitespace) {
            return Err(ModelError::invalid(field, "invalid email"));
        }
    }
    Ok(())
}

pub fn check_hex_color(field: &str, value: &str) -> Result<(), ModelError> {
    let ok = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !ok {
        return Err(ModelError::invalid(field, "expected #rrggbb"));
    }
    Ok(())
}

/// Tracking ids (GA4, GTM, pixel) are spliced into inline scripts.
pub fn is_tag_id(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

pub fn check_tag_id(field: &str, value: Option<&str>) -> Result<(), ModelError> {
    match value {
        Some(v) if !is_tag_id(v) => Err(ModelError::invalid(field, "only letters, digits and '-' are allowed")),
        _ => Ok(()),
    }
}

pub fn check_order(field: &str, value: i64) -> Result<(), ModelError> {
    if value < 0 {
        return Err(ModelError::invalid(field, "must be >= 0"));
    }
    Ok(())
}

pub fn check_slug(slug: Option<&str>) -> Result<(), ModelError> {
    match slug {
        Some(s) if !s.is_empty() && generate_slug(s) == s => Ok(()),
        _ => Err(ModelError::invalid("slug", "cannot derive a slug from the name")),
    }
}

pub fn trim_opt(value: &mut Option<String>) {
    if let Some(v) = value {
        let t = v.trim();
        if t.is_empty() {
            *value = None;
        } else if t.len() != v.len() {
            *value = Some(t.to_string());
        }
    }
}

/// Trim entries, drop blanks and exact duplicates, keep first-seen order.
pub fn clean_list(values: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    values.retain_mut(|v| {
        *v = v.trim().to_string();
        !v.is_empty() && seen.insert(v.clone())
    });
}

/// Normalize a stored slug, deriving it from `name` when empty.
pub fn normalize_slug(slug: &mut Option<String>, name: &str) {
    let source = match slug.as_deref() {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => name.to_string(),
    };
    let generated = generate_slug(&source);
    *slug = if generated.is_empty() { None } else { Some(generated) };
}
