//! Request handlers.

pub mod applications;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod profiles;
pub mod users;

pub use applications::*;
pub use auth::*;
pub use health::*;
pub use jobs::*;
pub use profiles::*;
pub use users::*;
