//! Job board HTTP client.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use jobboard_models::{
    AccountResponse, Application, ApplicationId, ApplicationMutationResponse,
    ApplicationWithApplicant, ApplicationWithJob, ApplyRequest, AuthResponse,
    ChangePasswordRequest, CreateJobRequest, Job, JobFilter, JobId, JobMutationResponse, JobPage,
    JobWithPoster, LoginRequest, MessageResponse, Profile, ProfileMutationResponse,
    ProfileResponse, ProfileWithUser, RegisterRequest, UpdateAccountRequest, UpdateJobRequest,
    UpdateStatusRequest, UpsertProfileRequest, User, UserId, UserResponse,
};

use crate::error::{ClientError, ClientResult};

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, without the `/api` prefix
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("JOBBOARD_API_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("JOBBOARD_API_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Client for the job board API. Requests are sent once, without retries.
#[derive(Clone)]
pub struct JobBoardClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl JobBoardClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Send `token` as a bearer credential on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    // Auth

    pub async fn register(&self, req: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.send(self.request(Method::POST, "/auth/register").json(req))
            .await
    }

    pub async fn login(&self, req: &LoginRequest) -> ClientResult<AuthResponse> {
        self.send(self.request(Method::POST, "/auth/login").json(req))
            .await
    }

    pub async fn me(&self) -> ClientResult<User> {
        let response: UserResponse = self.send(self.request(Method::GET, "/auth/me")).await?;
        Ok(response.user)
    }

    pub async fn update_account(&self, req: &UpdateAccountRequest) -> ClientResult<User> {
        let response: AccountResponse = self
            .send(self.request(Method::PUT, "/auth/profile").json(req))
            .await?;
        Ok(response.user)
    }

    pub async fn change_password(&self, req: &ChangePasswordRequest) -> ClientResult<()> {
        let _: MessageResponse = self
            .send(self.request(Method::PUT, "/auth/change-password").json(req))
            .await?;
        Ok(())
    }

    // Jobs

    pub async fn list_jobs(&self, filter: &JobFilter) -> ClientResult<JobPage> {
        self.send(self.request(Method::GET, "/jobs").query(filter))
            .await
    }

    pub async fn get_job(&self, id: JobId) -> ClientResult<JobWithPoster> {
        self.send(self.request(Method::GET, &format!("/jobs/{id}")))
            .await
    }

    pub async fn create_job(&self, req: &CreateJobRequest) -> ClientResult<Job> {
        let response: JobMutationResponse = self
            .send(self.request(Method::POST, "/jobs").json(req))
            .await?;
        Ok(response.job)
    }

    pub async fn update_job(&self, id: JobId, req: &UpdateJobRequest) -> ClientResult<Job> {
        let response: JobMutationResponse = self
            .send(self.request(Method::PUT, &format!("/jobs/{id}")).json(req))
            .await?;
        Ok(response.job)
    }

    pub async fn delete_job(&self, id: JobId) -> ClientResult<()> {
        let _: MessageResponse = self
            .send(self.request(Method::DELETE, &format!("/jobs/{id}")))
            .await?;
        Ok(())
    }

    pub async fn my_jobs(&self) -> ClientResult<Vec<Job>> {
        self.send(self.request(Method::GET, "/jobs/my/jobs")).await
    }

    // Applications

    pub async fn apply(&self, job_id: JobId, req: &ApplyRequest) -> ClientResult<Application> {
        let response: ApplicationMutationResponse = self
            .send(
                self.request(Method::POST, &format!("/applications/jobs/{job_id}/apply"))
                    .json(req),
            )
            .await?;
        Ok(response.application)
    }

    pub async fn my_applications(&self) -> ClientResult<Vec<ApplicationWithJob>> {
        self.send(self.request(Method::GET, "/applications/my"))
            .await
    }

    pub async fn job_applications(&self, job_id: JobId) -> ClientResult<Vec<ApplicationWithApplicant>> {
        self.send(self.request(Method::GET, &format!("/applications/jobs/{job_id}")))
            .await
    }

    pub async fn update_application_status(
        &self,
        id: ApplicationId,
        req: &UpdateStatusRequest,
    ) -> ClientResult<Application> {
        let response: ApplicationMutationResponse = self
            .send(
                self.request(Method::PUT, &format!("/applications/{id}/status"))
                    .json(req),
            )
            .await?;
        Ok(response.application)
    }

    // Profiles

    pub async fn my_profile(&self) -> ClientResult<ProfileWithUser> {
        let response: ProfileResponse = self.send(self.request(Method::GET, "/profiles/me")).await?;
        Ok(response.profile)
    }

    pub async fn upsert_profile(&self, req: &UpsertProfileRequest) -> ClientResult<Profile> {
        let response: ProfileMutationResponse = self
            .send(self.request(Method::PUT, "/profiles").json(req))
            .await?;
        Ok(response.profile)
    }

    pub async fn public_profile(&self, user_id: UserId) -> ClientResult<ProfileWithUser> {
        let response: ProfileResponse = self
            .send(self.request(Method::GET, &format!("/profiles/{user_id}")))
            .await?;
        Ok(response.profile)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        debug!(%method, %url, "Sending API request");

        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and decode a JSON body; non-2xx becomes [`ClientError::Api`].
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<MessageResponse>(&body)
                .map(|m| m.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = JobBoardClient::new(ClientConfig {
            base_url: "http://api.example.com/".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.base_url, "http://api.example.com");
        assert!(client.token().is_none());
        assert_eq!(client.with_token("abc").token(), Some("abc"));
    }
}
