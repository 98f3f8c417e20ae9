use serde::{Deserialize, Deserializer};
use validator::Validate;

/// Body of `POST /api/jobs`
#[derive(Deserialize, Debug, Validate)]
pub struct NewJob {
    #[serde(rename = "Job Title")]
    #[validate(length(min = 1, message = "Job Title must not be empty"))]
    pub title: String,

    #[serde(rename = "Company URL", default)]
    pub company_url: Option<String>,

    #[serde(rename = "Job URL")]
    #[validate(length(min = 1, message = "Job URL must not be empty"))]
    pub job_url: String,

    /// Parsed leniently; anything unparseable means "now"
    #[serde(rename = "Job Posting Date", default)]
    pub post_date: Option<String>,
}

/// Body of `PUT /api/jobs/{identifier}`; only present fields are applied
#[derive(Deserialize, Debug, Default, Validate)]
pub struct JobPatch {
    #[serde(rename = "Job Title", default)]
    #[validate(length(min = 1, message = "Job Title must not be empty"))]
    pub title: Option<String>,

    /// `Some(None)` clears the company URL, `None` leaves it untouched
    #[serde(rename = "Company URL", default, deserialize_with = "present")]
    pub company_url: Option<Option<String>>,

    #[serde(rename = "Job URL", default)]
    #[validate(length(min = 1, message = "Job URL must not be empty"))]
    pub job_url: Option<String>,

    #[serde(rename = "Job Posting Date", default)]
    pub post_date: Option<String>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.company_url.is_none()
            && self.job_url.is_none()
            && self.post_date.is_none()
    }
}

/// Distinguishes an explicit `null` from an absent key
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_uses_external_field_names() {
        let job: NewJob = serde_json::from_str(
            r#"{"Job Title": "Engineer", "Job URL": "http://x/1", "Job Posting Date": "2024-01-01 10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(job.title, "Engineer");
        assert_eq!(job.job_url, "http://x/1");
        assert_eq!(job.company_url, None);
        assert_eq!(job.post_date.as_deref(), Some("2024-01-01 10:00:00"));

        assert!(serde_json::from_str::<NewJob>(r#"{"Job Title": "Engineer"}"#).is_err());
    }

    #[test]
    fn empty_title_fails_validation() {
        let job: NewJob = serde_json::from_str(r#"{"Job Title": "", "Job URL": "http://x/1"}"#).unwrap();
        assert!(job.validate().is_err());
    }

    #[test]
    fn patch_tracks_explicit_null_company_url() {
        let cleared: JobPatch = serde_json::from_str(r#"{"Company URL": null}"#).unwrap();
        assert_eq!(cleared.company_url, Some(None));
        assert!(!cleared.is_empty());

        let untouched: JobPatch = serde_json::from_str(r#"{"Job Title": "Lead"}"#).unwrap();
        assert_eq!(untouched.company_url, None);
        assert_eq!(untouched.title.as_deref(), Some("Lead"));

        let empty: JobPatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
