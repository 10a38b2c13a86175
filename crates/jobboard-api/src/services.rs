//! Business logic behind the HTTP handlers.

pub mod applications;
pub mod auth;
pub mod authorize;
pub mod jobs;
pub mod profiles;

pub use applications::ApplicationService;
pub use auth::AuthService;
pub use authorize::ensure_owner_or_admin;
pub use jobs::JobService;
pub use profiles::ProfileService;
