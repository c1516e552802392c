//! Data access for the portal. Handlers call these functions instead of
//! building queries themselves; everything is re-exported under
//! `crate::db::services::`.

pub mod identity_service;
pub mod news_service;
pub mod program_service;
pub mod upload_service;
pub mod visit_service;

pub use identity_service::*;
pub use news_service::*;
pub use program_service::*;
pub use upload_service::*;
pub use visit_service::*;
