//! Application state.

use jobboard_db::Database;

use crate::auth::TokenService;
use crate::config::ApiConfig;
use crate::middleware::IpRateLimiter;
use crate::services::{ApplicationService, AuthService, JobService, ProfileService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub db: Database,
    pub auth: AuthService,
    pub jobs: JobService,
    pub applications: ApplicationService,
    pub profiles: ProfileService,
    pub rate_limiter: IpRateLimiter,
}

impl AppState {
    /// Wire services over an opened database.
    pub fn new(config: ApiConfig, db: Database) -> Self {
        let tokens = TokenService::new(&config.jwt);

        Self {
            auth: AuthService::new(db.users(), tokens),
            jobs: JobService::new(db.jobs()),
            applications: ApplicationService::new(db.jobs(), db.applications()),
            profiles: ProfileService::new(db.profiles()),
            rate_limiter: IpRateLimiter::new(config.rate_limit_rps),
            config,
            db,
        }
    }
}
