//! Service layer of the clinic site.
//! - Document store abstraction with file and hosted backends.
//! - Public content reads that degrade instead of failing.
//! - SEO generation (metadata, JSON-LD, sitemap, robots) and settings.
//! - Dashboard writes and admin authentication.

pub mod errors;
pub mod auth;
pub mod runtime;
pub mod storage;
pub mod content;
pub mod seo;
pub mod admin;
pub mod observability;
#[cfg(test)]
pub mod test_support;
