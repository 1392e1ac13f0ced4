//! URL slug generation for public record pages.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_\s-]").expect("valid slug charset regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static HYPHENS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("valid hyphen regex"));

/// Derive a URL slug from a display name.
///
/// Lowercases, drops everything except ASCII letters, digits, `_`, `-` and
/// whitespace, turns whitespace runs into `-` and collapses repeated hyphens.
/// Edge hyphens are kept (`"Dr. Smith -"` gives `"dr-smith-"`) so slugs match
/// the URLs already published for existing records. The output is a fixed point:
/// `generate_slug(&generate_slug(x)) == generate_slug(x)`.
///
/// ```
/// assert_eq!(models::slug::generate_slug("Dr. Jane  Doe, ND"), "dr-jane-doe-nd");
/// ```
pub fn generate_slug(name: &str) -> String {
    let lower = name.to_lowercase();
    let kept = DISALLOWED_RE.replace_all(lower.trim(), "");
    let hyphenated = WHITESPACE_RE.replace_all(&kept, "-");
    let collapsed = HYPHENS_RE.replace_all(&hyphenated, "-");
    collapsed.into_owned()
}
