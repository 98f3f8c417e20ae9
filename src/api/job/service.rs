use actix_web::{HttpResponse, ResponseError};
use sqlx::{Pool, Sqlite};
use std::fmt;
use tracing::{error, info, warn};

use crate::api::validation::ErrorResponse;
use crate::db::job_repository::JobRepository;
use crate::db::models::{parse_post_date, post_date_or_now, JobFilter, JobRow, NewJobRow};
use super::models::{JobPatch, NewJob};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Malformed date, missing field or empty update
    InvalidInput(String),

    /// No job matches the identifier
    NotFound(String),

    /// Another job already owns the job URL
    Conflict(String),

    /// Database operation failed
    DatabaseError(sqlx::Error),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ServiceError::NotFound(identifier) => write!(f, "Job not found: {}", identifier),
            ServiceError::Conflict(job_url) => write!(f, "Duplicate job URL: {}", job_url),
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::DatabaseError(err)
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InvalidInput(msg) => {
                warn!("Invalid input: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse::new(msg.clone()))
            }
            ServiceError::NotFound(identifier) => {
                warn!("Job not found: {}", identifier);
                HttpResponse::NotFound().json(ErrorResponse::new("Job not found"))
            }
            ServiceError::Conflict(job_url) => {
                warn!("Duplicate job URL: {}", job_url);
                HttpResponse::Conflict().json(ErrorResponse::new("Job with this URL already exists."))
            }
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse::new("Database error occurred"))
            }
        }
    }
}

/// How a path identifier addresses a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// All digits: numeric id, falling back to the same text as a job URL
    Numeric(i64, String),
    /// Anything else is a job URL
    Url(String),
}

impl Identifier {
    /// `raw` is the already percent-decoded path segment
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = raw.parse() {
                return Identifier::Numeric(id, raw.to_string());
            }
        }
        Identifier::Url(raw.to_string())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(_, raw) | Identifier::Url(raw) => f.write_str(raw),
        }
    }
}

/// Job service containing business logic
pub struct JobService {
    pool: Pool<Sqlite>,
}

impl JobService {
    /// Create a new JobService instance
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRow>, ServiceError> {
        Ok(JobRepository::list(&self.pool, filter).await?)
    }

    /// Resolve an identifier to a stored job
    ///
    /// Numeric identifiers are tried as ids first; a miss falls through to a
    /// job URL lookup with the same text.
    pub async fn get_job(&self, identifier: &Identifier) -> Result<JobRow, ServiceError> {
        let found = match identifier {
            Identifier::Numeric(id, raw) => match JobRepository::find_by_id(&self.pool, *id).await? {
                Some(job) => Some(job),
                None => JobRepository::find_by_url(&self.pool, raw).await?,
            },
            Identifier::Url(job_url) => JobRepository::find_by_url(&self.pool, job_url).await?,
        };

        found.ok_or_else(|| ServiceError::NotFound(identifier.to_string()))
    }

    /// Create a single job
    ///
    /// # Business Logic
    /// - Rejects a job URL that is already stored
    /// - Falls back to the current time for an absent or unparseable date
    pub async fn create_job(&self, job: NewJob) -> Result<JobRow, ServiceError> {
        info!("Service: Creating job with job_url={}", job.job_url);

        if JobRepository::find_by_url(&self.pool, &job.job_url).await?.is_some() {
            return Err(ServiceError::Conflict(job.job_url));
        }

        let row = NewJobRow {
            post_date: post_date_or_now(job.post_date.as_deref()),
            title: job.title,
            company_url: job.company_url,
            job_url: job.job_url,
        };

        let created = JobRepository::create(&self.pool, &row)
            .await
            .map_err(|e| conflict_or_database(e, &row.job_url))?;

        info!("Service: Job created successfully with id={}", created.id);
        Ok(created)
    }

    /// Apply the fields present in `patch` to an existing job
    ///
    /// Unlike creation, an unparseable date is rejected.
    pub async fn update_job(&self, identifier: &Identifier, patch: JobPatch) -> Result<JobRow, ServiceError> {
        let job = self.get_job(identifier).await?;
        self.apply_patch(job, patch).await
    }

    /// Apply `patch` to a job already resolved with [`JobService::get_job`]
    pub async fn apply_patch(&self, mut job: JobRow, patch: JobPatch) -> Result<JobRow, ServiceError> {
        if patch.is_empty() {
            return Err(ServiceError::InvalidInput("No data provided for update".to_string()));
        }

        if let Some(title) = patch.title {
            job.title = title;
        }
        if let Some(company_url) = patch.company_url {
            job.company_url = company_url;
        }
        if let Some(job_url) = patch.job_url {
            if let Some(existing) = JobRepository::find_by_url(&self.pool, &job_url).await? {
                if existing.id != job.id {
                    return Err(ServiceError::Conflict(job_url));
                }
            }
            job.job_url = job_url;
        }
        if let Some(raw) = patch.post_date {
            job.post_date = parse_post_date(&raw).ok_or_else(|| {
                ServiceError::InvalidInput(
                    "Invalid date format for Job Posting Date. Use YYYY-MM-DD HH:MM:SS.".to_string(),
                )
            })?;
        }

        let updated = JobRepository::update(&self.pool, &job)
            .await
            .map_err(|e| conflict_or_database(e, &job.job_url))?
            .ok_or_else(|| ServiceError::NotFound(job.id.to_string()))?;

        info!("Service: Job id={} updated", updated.id);
        Ok(updated)
    }

    pub async fn delete_job(&self, identifier: &Identifier) -> Result<(), ServiceError> {
        let job = self.get_job(identifier).await?;

        if !JobRepository::delete(&self.pool, job.id).await? {
            return Err(ServiceError::NotFound(identifier.to_string()));
        }

        info!("Service: Job id={} deleted", job.id);
        Ok(())
    }
}

/// A unique violation here means a concurrent writer claimed the URL first
fn conflict_or_database(err: sqlx::Error, job_url: &str) -> ServiceError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ServiceError::Conflict(job_url.to_string())
        }
        other => ServiceError::DatabaseError(other),
    }
}
