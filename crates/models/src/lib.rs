//! Document-mapped entities of the clinic site.
//!
//! Field names follow the camelCase schema of the stored documents; every
//! field is optional in storage and decodes to a default.

pub mod errors;
pub mod slug;
pub mod record;
pub mod validate;
pub mod category;
pub mod service;
pub mod staff;
pub mod seo_settings;

pub use category::Category;
pub use record::{sort_records, Record, Validate};
pub use seo_settings::{SeoSettings, SeoSettingsPatch};
pub use service::{Service, SessionDuration};
pub use staff::{Education, StaffMember};
