//! SQL persistence for the job board.
//!
//! This crate provides:
//! - An explicitly constructed [`Database`] handle with embedded migrations
//! - Typed repositories for users, jobs, applications and profiles
//! - Read-side join queries returning composed view records
//! - Sample data seeding

pub mod database;
pub mod error;
pub mod repos;
pub mod seed;

pub use database::{Database, DatabaseConfig};
pub use error::{DbError, DbResult};
pub use repos::{
    ApplicationRepository, JobChanges, JobRepository, NewApplication, NewJob, NewUser,
    ProfileChanges, ProfileRepository, StatusChange, UpsertedProfile, UserCredentials,
    UserRepository,
};
pub use seed::seed_sample_jobs;
