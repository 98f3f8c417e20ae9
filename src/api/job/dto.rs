use serde::Serialize;

use crate::db::models::{JobRow, POST_DATE_FORMAT};

/// External representation of a job; field names differ from the columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDto {
    pub id: i64,
    #[serde(rename = "Job Title")]
    pub title: String,
    #[serde(rename = "Company URL")]
    pub company_url: Option<String>,
    #[serde(rename = "Job URL")]
    pub job_url: String,
    #[serde(rename = "Job Posting Date")]
    pub post_date: String,
}

impl From<JobRow> for JobDto {
    fn from(row: JobRow) -> Self {
        JobDto {
            id: row.id,
            title: row.title,
            company_url: row.company_url,
            job_url: row.job_url,
            post_date: row.post_date.format(POST_DATE_FORMAT).to_string(),
        }
    }
}

/// Response for operations that only report an outcome
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::parse_post_date;

    #[test]
    fn serializes_with_external_names() {
        let dto = JobDto::from(JobRow {
            id: 7,
            title: "Engineer".into(),
            company_url: None,
            job_url: "http://x/1".into(),
            post_date: parse_post_date("2024-01-02 03:04:05").unwrap(),
        });

        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            serde_json::json!({
                "id": 7,
                "Job Title": "Engineer",
                "Company URL": null,
                "Job URL": "http://x/1",
                "Job Posting Date": "2024-01-02 03:04:05"
            })
        );
    }
}
