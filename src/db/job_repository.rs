use sqlx::{Executor, Pool, QueryBuilder, Sqlite};
use tracing::debug;

use crate::db::models::{JobFilter, JobRow, NewJobRow};

const JOB_COLUMNS: &str = "id, title, company_url, job_url, post_date";

/// Repository for Job database operations
pub struct JobRepository;

impl JobRepository {
    /// List jobs matching the filter in insertion order
    pub async fn list(pool: &Pool<Sqlite>, filter: &JobFilter) -> Result<Vec<JobRow>, sqlx::Error> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM jobs WHERE 1 = 1", JOB_COLUMNS));

        if let Some(keyword) = &filter.keyword {
            let pattern = format!("%{}%", escape_like(keyword));
            query
                .push(" AND (LOWER(title) LIKE LOWER(")
                .push_bind(pattern.clone())
                .push(") ESCAPE '\\' OR LOWER(company_url) LIKE LOWER(")
                .push_bind(pattern)
                .push(") ESCAPE '\\')");
        }

        if let Some(day) = filter.posted_after {
            query
                .push(" AND post_date >= ")
                .push_bind(day.and_time(chrono::NaiveTime::MIN));
        }

        query.push(" ORDER BY id");

        debug!("Listing jobs: keyword={:?}, posted_after={:?}", filter.keyword, filter.posted_after);
        let rows = query.build_query_as::<JobRow>().fetch_all(pool).await?;
        debug!("Listed {} jobs", rows.len());
        Ok(rows)
    }

    pub async fn find_by_id(pool: &Pool<Sqlite>, id: i64) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(&format!("SELECT {} FROM jobs WHERE id = ?", JOB_COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_url<'e, E>(executor: E, job_url: &str) -> Result<Option<JobRow>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, JobRow>(&format!("SELECT {} FROM jobs WHERE job_url = ?", JOB_COLUMNS))
            .bind(job_url)
            .fetch_optional(executor)
            .await
    }

    /// Insert a job and return the full stored record
    pub async fn create<'e, E>(executor: E, job: &NewJobRow) -> Result<JobRow, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        debug!("Creating job: title={}, job_url={}", job.title, job.job_url);

        let row = sqlx::query_as::<_, JobRow>(&format!(
            r#"
            INSERT INTO jobs (title, company_url, job_url, post_date)
            VALUES (?, ?, ?, ?)
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(&job.title)
        .bind(&job.company_url)
        .bind(&job.job_url)
        .bind(job.post_date)
        .fetch_one(executor)
        .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    /// Overwrite every mutable column of an existing job
    pub async fn update(pool: &Pool<Sqlite>, job: &JobRow) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Updating job id={}", job.id);

        sqlx::query_as::<_, JobRow>(&format!(
            r#"
            UPDATE jobs
            SET title = ?, company_url = ?, job_url = ?, post_date = ?
            WHERE id = ?
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(&job.title)
        .bind(&job.company_url)
        .bind(&job.job_url)
        .bind(job.post_date)
        .bind(job.id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a job by id, returning whether a row was removed
    pub async fn delete(pool: &Pool<Sqlite>, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        debug!("Deleted job id={}: {} rows affected", id, result.rows_affected());
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &Pool<Sqlite>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
            .fetch_one(pool)
            .await
    }
}

/// Escape LIKE wildcards so the keyword matches literally
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::memory_pool;
    use crate::db::models::{now, parse_filter_date, parse_post_date};

    fn new_job(title: &str, company_url: Option<&str>, job_url: &str, post_date: &str) -> NewJobRow {
        NewJobRow {
            title: title.to_string(),
            company_url: company_url.map(str::to_string),
            job_url: job_url.to_string(),
            post_date: parse_post_date(post_date).unwrap(),
        }
    }

    #[actix_web::test]
    async fn create_and_find_round_trip() {
        let pool = memory_pool().await;
        let created = JobRepository::create(
            &pool,
            &new_job("Engineer", Some("http://acme.io"), "http://x/1", "2024-02-01 10:00:00"),
        )
        .await
        .unwrap();

        let by_id = JobRepository::find_by_id(&pool, created.id).await.unwrap();
        let by_url = JobRepository::find_by_url(&pool, "http://x/1").await.unwrap();
        assert_eq!(by_id.as_ref(), Some(&created));
        assert_eq!(by_url, by_id);
        assert_eq!(JobRepository::count(&pool).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn unique_job_url_is_enforced() {
        let pool = memory_pool().await;
        let job = new_job("Engineer", None, "http://x/1", "2024-02-01 10:00:00");
        JobRepository::create(&pool, &job).await.unwrap();

        let err = JobRepository::create(&pool, &job).await.unwrap_err();
        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_unique_violation()),
            other => panic!("expected unique violation, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn list_filters_by_keyword_and_date() {
        let pool = memory_pool().await;
        for job in [
            new_job("Rust Engineer", Some("http://acme.io"), "http://x/1", "2023-12-31 23:59:59"),
            new_job("Designer", Some("http://RUSTy.dev"), "http://x/2", "2024-01-01 00:00:00"),
            new_job("Accountant", None, "http://x/3", "2024-06-01 08:00:00"),
        ] {
            JobRepository::create(&pool, &job).await.unwrap();
        }

        let by_keyword = JobRepository::list(
            &pool,
            &JobFilter {
                keyword: Some("rust".into()),
                posted_after: None,
            },
        )
        .await
        .unwrap();
        let urls: Vec<_> = by_keyword.iter().map(|j| j.job_url.as_str()).collect();
        assert_eq!(urls, vec!["http://x/1", "http://x/2"]);

        let by_date = JobRepository::list(
            &pool,
            &JobFilter {
                keyword: None,
                posted_after: parse_filter_date("2024-01-01"),
            },
        )
        .await
        .unwrap();
        let urls: Vec<_> = by_date.iter().map(|j| j.job_url.as_str()).collect();
        assert_eq!(urls, vec!["http://x/2", "http://x/3"]);

        let all = JobRepository::list(&pool, &JobFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[actix_web::test]
    async fn keyword_wildcards_match_literally() {
        let pool = memory_pool().await;
        JobRepository::create(&pool, &new_job("100% remote", None, "http://x/1", "2024-01-01 00:00:00"))
            .await
            .unwrap();
        JobRepository::create(&pool, &new_job("Onsite", None, "http://x/2", "2024-01-01 00:00:00"))
            .await
            .unwrap();

        let filter = |kw: &str| JobFilter {
            keyword: Some(kw.to_string()),
            posted_after: None,
        };
        assert_eq!(JobRepository::list(&pool, &filter("0% r")).await.unwrap().len(), 1);
        assert!(JobRepository::list(&pool, &filter("_")).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn keyword_matches_non_ascii_titles() {
        let pool = memory_pool().await;
        JobRepository::create(&pool, &new_job("Ärztin Berlin", None, "http://x/1", "2024-01-01 00:00:00"))
            .await
            .unwrap();
        JobRepository::create(&pool, &new_job("Pfleger", Some("http://KLINIK-Ärzte.de"), "http://x/2", "2024-01-01 00:00:00"))
            .await
            .unwrap();

        let filter = |kw: &str| JobFilter {
            keyword: Some(kw.to_string()),
            posted_after: None,
        };
        let exact = JobRepository::list(&pool, &filter("Ärztin")).await.unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].job_url, "http://x/1");

        let mixed = JobRepository::list(&pool, &filter("ÄRZTIN BERLIN")).await.unwrap();
        assert_eq!(mixed.len(), 1);

        let company = JobRepository::list(&pool, &filter("klinik-Ärzte")).await.unwrap();
        assert_eq!(company.len(), 1);
        assert_eq!(company[0].job_url, "http://x/2");
    }

    #[actix_web::test]
    async fn update_and_delete() {
        let pool = memory_pool().await;
        let mut job = JobRepository::create(&pool, &new_job("Engineer", None, "http://x/1", "2024-01-01 00:00:00"))
            .await
            .unwrap();

        job.company_url = Some("http://acme.io".into());
        job.post_date = now();
        let updated = JobRepository::update(&pool, &job).await.unwrap().unwrap();
        assert_eq!(updated, job);

        assert!(JobRepository::delete(&pool, job.id).await.unwrap());
        assert!(!JobRepository::delete(&pool, job.id).await.unwrap());
        assert!(JobRepository::find_by_id(&pool, job.id).await.unwrap().is_none());
    }
}
