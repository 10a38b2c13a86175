//! Client tests against a mock server.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jobboard_client::{ClientConfig, ClientError, JobBoardClient};
use jobboard_models::{
    ApplicationStatus, ApplyRequest, JobFilter, JobId, JobType, LoginRequest, UpdateStatusRequest,
    UserId,
};

const NOW: &str = "2030-01-15T10:00:00Z";

fn client(server: &MockServer) -> JobBoardClient {
    JobBoardClient::new(ClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn user_json(id: i64, role: &str) -> Value {
    json!({
        "id": id,
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "role": role,
        "is_active": true,
        "email_verified": false,
        "created_at": NOW,
        "updated_at": NOW
    })
}

fn job_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": "Rust Engineer",
        "description": "Build APIs",
        "requirements": "Rust",
        "location": "Berlin",
        "company": "Acme",
        "salary": "$100k",
        "job_type": "contract",
        "experience_level": "mid",
        "is_remote": false,
        "is_active": true,
        "posted_by": 1,
        "application_deadline": null,
        "benefits": null,
        "skills": ["Rust", "SQL"],
        "created_at": NOW,
        "updated_at": NOW,
        "poster": {"id": 1, "name": "Erin Employer"}
    })
}

fn application_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "job_id": 3,
        "user_id": 2,
        "status": status,
        "cover_letter": "Hello",
        "resume": null,
        "applied_at": NOW,
        "reviewed_at": null,
        "reviewed_by": null,
        "notes": null,
        "interview_date": null,
        "interview_location": null,
        "updated_at": NOW
    })
}

#[tokio::test]
async fn test_login_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "ada@example.com", "password": "secret1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful",
            "user": user_json(1, "jobseeker"),
            "token": "signed-token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .login(&LoginRequest {
            email: "ada@example.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.token, "signed-token");
    assert_eq!(response.user.id, UserId(1));
}

#[tokio::test]
async fn test_bearer_token_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer signed-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": user_json(1, "employer")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client(&server).with_token("signed-token").me().await.unwrap();
    assert_eq!(user.name, "Ada Lovelace");
}

#[tokio::test]
async fn test_list_jobs_sends_filters_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .and(query_param("jobType", "contract"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [job_json(3)],
            "total": 11,
            "current_page": 2,
            "total_pages": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = JobFilter {
        page: Some(2),
        job_type: Some(JobType::Contract),
        ..Default::default()
    };
    let page = client(&server).list_jobs(&filter).await.unwrap();

    assert_eq!(page.total, 11);
    assert_eq!(page.jobs[0].job.id, JobId(3));
    assert_eq!(page.jobs[0].poster.name, "Erin Employer");
    assert!(page.jobs[0].poster.email.is_none());
}

#[tokio::test]
async fn test_error_body_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/applications/jobs/3/apply"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"message": "You have already applied for this job"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .with_token("t")
        .apply(JobId(3), &ApplyRequest::default())
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "You have already applied for this job");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_keeps_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/9"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client(&server).get_job(JobId(9)).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert!(err.to_string().contains("bad gateway"));
}

#[tokio::test]
async fn test_update_status_unwraps_application() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/applications/5/status"))
        .and(body_json(json!({
            "status": "accepted",
            "notes": null,
            "interviewDate": null,
            "interviewLocation": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Application status updated successfully",
            "application": application_json(5, "accepted")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let application = client(&server)
        .with_token("t")
        .update_application_status(
            5.into(),
            &UpdateStatusRequest {
                status: ApplicationStatus::Accepted,
                notes: None,
                interview_date: None,
                interview_location: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(application.status, ApplicationStatus::Accepted);
}

#[tokio::test]
async fn test_delete_job_and_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/jobs/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Job deleted successfully"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/profiles/8"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"message": "Profile not found or not public"})),
        )
        .mount(&server)
        .await;

    let client = client(&server).with_token("t");
    client.delete_job(JobId(3)).await.unwrap();

    let err = client.public_profile(UserId(8)).await.unwrap_err();
    assert!(err.is_not_found());
}
