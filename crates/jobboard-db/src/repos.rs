//! Typed repositories, one per record type.

pub mod applications;
pub mod jobs;
pub mod profiles;
pub mod users;

pub use applications::{ApplicationRepository, NewApplication, StatusChange};
pub use jobs::{JobChanges, JobRepository, NewJob};
pub use profiles::{ProfileChanges, ProfileRepository, UpsertedProfile};
pub use users::{NewUser, UserCredentials, UserRepository};
