use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use tracing::{info, warn};
use validator::Validate;

use crate::db::job_repository::JobRepository;
use crate::db::models::{post_date_or_now, NewJobRow};

/// One element of the seed document
#[derive(Debug, Deserialize, Validate)]
pub struct SeedJob {
    #[serde(rename = "Job Title")]
    #[validate(length(min = 1, message = "Job Title must not be empty"))]
    pub title: String,
    #[serde(rename = "Company URL", default)]
    pub company_url: Option<String>,
    #[serde(rename = "Job URL")]
    #[validate(length(min = 1, message = "Job URL must not be empty"))]
    pub job_url: String,
    #[serde(rename = "Job Posting Date", default)]
    pub post_date: Option<String>,
}

/// Outcome of a bulk load
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub inserted: usize,
    /// Items whose job URL was already stored or appeared earlier in the input
    pub duplicates: usize,
    /// Position and reason for each element that could not be decoded or is missing a title or URL
    pub invalid: Vec<(usize, String)>,
}

#[derive(Debug)]
pub enum LoadError {
    /// Seed file could not be read
    Io(std::io::Error),

    /// Seed document is not a JSON array
    Parse(serde_json::Error),

    /// Database operation failed
    Database(sqlx::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "Failed to read seed file: {}", e),
            LoadError::Parse(e) => write!(f, "Seed file is not a JSON array: {}", e),
            LoadError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<sqlx::Error> for LoadError {
    fn from(err: sqlx::Error) -> Self {
        LoadError::Database(err)
    }
}

/// Read a JSON array of jobs from `path` and store the ones not yet known
pub async fn load_jobs_from_file(pool: &Pool<Sqlite>, path: &Path) -> Result<LoadSummary, LoadError> {
    info!("Loading jobs from {}", path.display());

    let contents = tokio::fs::read_to_string(path).await.map_err(LoadError::Io)?;
    let items: Vec<serde_json::Value> = serde_json::from_str(&contents).map_err(LoadError::Parse)?;

    load_jobs(pool, items).await
}

/// Insert decoded seed items in one transaction, skipping known job URLs
pub async fn load_jobs(pool: &Pool<Sqlite>, items: Vec<serde_json::Value>) -> Result<LoadSummary, LoadError> {
    let mut summary = LoadSummary::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut tx = pool.begin().await?;

    for (index, item) in items.into_iter().enumerate() {
        let decoded = serde_json::from_value::<SeedJob>(item)
            .map_err(|e| e.to_string())
            .and_then(|job| job.validate().map(|_| job).map_err(|e| e.to_string()));
        let job = match decoded {
            Ok(job) => job,
            Err(reason) => {
                warn!("Skipping invalid seed item #{}: {}", index, reason);
                summary.invalid.push((index, reason));
                continue;
            }
        };

        if seen.contains(&job.job_url) || JobRepository::find_by_url(&mut *tx, &job.job_url).await?.is_some() {
            info!("Skipping duplicate job: {} ({})", job.title, job.job_url);
            summary.duplicates += 1;
            continue;
        }

        let row = NewJobRow {
            post_date: post_date_or_now(job.post_date.as_deref()),
            title: job.title,
            company_url: job.company_url,
            job_url: job.job_url,
        };
        JobRepository::create(&mut *tx, &row).await?;

        seen.insert(row.job_url);
        summary.inserted += 1;
    }

    tx.commit().await?;

    info!(
        "Bulk load completed: {} inserted, {} duplicates, {} invalid",
        summary.inserted,
        summary.duplicates,
        summary.invalid.len()
    );
    Ok(summary)
}

/// Seed an empty store from `path`
///
/// Returns `None` when the store already holds jobs or the file is absent.
pub async fn seed_if_empty(pool: &Pool<Sqlite>, path: &Path) -> Result<Option<LoadSummary>, LoadError> {
    let existing = JobRepository::count(pool).await?;
    if existing > 0 {
        info!("Store already holds {} jobs, skipping seed", existing);
        return Ok(None);
    }

    if !tokio::fs::try_exists(path).await.map_err(LoadError::Io)? {
        warn!("Seed file {} not found. Database will be empty.", path.display());
        return Ok(None);
    }

    load_jobs_from_file(pool, path).await.map(Some)
}
