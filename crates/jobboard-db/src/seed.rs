//! Sample job postings for local development.

use tracing::info;

use jobboard_models::{ExperienceLevel, JobType, UserId};

use crate::database::Database;
use crate::error::{DbError, DbResult};
use crate::repos::NewJob;

struct SampleJob {
    title: &'static str,
    description: &'static str,
    requirements: &'static str,
    location: &'static str,
    company: &'static str,
    salary: &'static str,
    job_type: JobType,
    experience_level: ExperienceLevel,
    is_remote: bool,
    benefits: &'static str,
    skills: &'static [&'static str],
}

const SAMPLE_JOBS: &[SampleJob] = &[
    SampleJob {
        title: "Frontend Developer",
        description: "Build accessible, responsive web interfaces for our customer dashboard.",
        requirements: "3+ years with React and TypeScript. Comfortable with modern CSS.",
        location: "New York, NY",
        company: "TechCorp Inc.",
        salary: "$80,000 - $120,000",
        job_type: JobType::FullTime,
        experience_level: ExperienceLevel::Mid,
        is_remote: false,
        benefits: "Health insurance, 401k, flexible PTO",
        skills: &["React", "TypeScript", "HTML", "CSS"],
    },
    SampleJob {
        title: "Backend Engineer",
        description: "Design and operate the APIs and services behind our marketplace.",
        requirements: "2+ years building HTTP services backed by a relational database.",
        location: "San Francisco, CA",
        company: "StartupXYZ",
        salary: "$90,000 - $130,000",
        job_type: JobType::FullTime,
        experience_level: ExperienceLevel::Mid,
        is_remote: true,
        benefits: "Equity, health benefits, unlimited PTO",
        skills: &["Rust", "PostgreSQL", "REST APIs", "Docker"],
    },
    SampleJob {
        title: "UX/UI Designer",
        description: "Shape intuitive product experiences together with engineering and product.",
        requirements: "Portfolio of user-centered work. Fluent in Figma or a similar tool.",
        location: "Austin, TX",
        company: "Design Studio Pro",
        salary: "$70,000 - $100,000",
        job_type: JobType::Contract,
        experience_level: ExperienceLevel::Mid,
        is_remote: true,
        benefits: "Learning budget, flexible hours",
        skills: &["Figma", "User Research", "Prototyping"],
    },
    SampleJob {
        title: "Data Scientist",
        description: "Turn product and sales data into models that drive business decisions.",
        requirements: "Graduate degree in a quantitative field. Python, SQL and ML libraries.",
        location: "Seattle, WA",
        company: "DataTech Solutions",
        salary: "$100,000 - $150,000",
        job_type: JobType::FullTime,
        experience_level: ExperienceLevel::Senior,
        is_remote: false,
        benefits: "Stock options, health benefits, conference budget",
        skills: &["Python", "SQL", "Machine Learning", "Statistics"],
    },
    SampleJob {
        title: "Support Engineering Intern",
        description: "Help customers succeed while learning how our platform works end to end.",
        requirements: "Currently studying computer science or a related field.",
        location: "Chicago, IL",
        company: "HelpDesk Hub",
        salary: "$25/hour",
        job_type: JobType::Internship,
        experience_level: ExperienceLevel::Entry,
        is_remote: false,
        benefits: "Mentorship, transit stipend",
        skills: &["Communication", "Linux", "SQL"],
    },
];

impl SampleJob {
    fn to_new_job(&self, posted_by: UserId) -> NewJob {
        NewJob {
            title: self.title.to_string(),
            description: self.description.to_string(),
            requirements: self.requirements.to_string(),
            location: self.location.to_string(),
            company: self.company.to_string(),
            salary: self.salary.to_string(),
            job_type: self.job_type,
            experience_level: self.experience_level,
            is_remote: self.is_remote,
            application_deadline: None,
            benefits: Some(self.benefits.to_string()),
            skills: self.skills.iter().map(|s| s.to_string()).collect(),
            posted_by,
        }
    }
}

/// Insert the sample postings as the oldest employer or admin account.
///
/// Fails with [`DbError::NotFound`] when no such account exists.
pub async fn seed_sample_jobs(db: &Database) -> DbResult<usize> {
    let poster = db
        .users()
        .first_poster()
        .await?
        .ok_or_else(|| DbError::not_found("employer or admin account to post sample jobs"))?;

    let jobs = db.jobs();
    for sample in SAMPLE_JOBS {
        jobs.create(&sample.to_new_job(poster.id)).await?;
    }

    info!(count = SAMPLE_JOBS.len(), poster = %poster.email, "Seeded sample jobs");
    Ok(SAMPLE_JOBS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::NewUser;
    use jobboard_models::{JobFilter, Role};

    #[tokio::test]
    async fn test_seed_requires_poster() {
        let db = Database::in_memory().await.unwrap();
        let err = seed_sample_jobs(&db).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_seed_inserts_active_jobs() {
        let db = Database::in_memory().await.unwrap();
        db.users()
            .create(&NewUser {
                name: "Admin".into(),
                email: "admin@example.com".into(),
                password_hash: "hash".into(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        let inserted = seed_sample_jobs(&db).await.unwrap();
        let (_, total) = db.jobs().list_active(&JobFilter::default()).await.unwrap();
        assert_eq!(total, inserted as u64);
    }
}
