use chrono::{NaiveDate, NaiveDateTime, SubsecRound, Utc};
use sqlx::FromRow;

/// Textual form of stored and returned posting timestamps
pub const POST_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Textual form of the `posted_after` list filter
pub const FILTER_DATE_FORMAT: &str = "%Y-%m-%d";

/// Database representation of a job with all fields
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub company_url: Option<String>,
    pub job_url: String,
    pub post_date: NaiveDateTime,
}

/// Column values for a row that has not been inserted yet
#[derive(Debug, Clone)]
pub struct NewJobRow {
    pub title: String,
    pub company_url: Option<String>,
    pub job_url: String,
    pub post_date: NaiveDateTime,
}

/// Criteria for listing jobs; empty criteria match everything
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Case-insensitive substring of title or company URL
    pub keyword: Option<String>,
    /// Only jobs posted on or after midnight of this day
    pub posted_after: Option<NaiveDate>,
}

/// Current UTC time at whole-second precision
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

pub fn parse_post_date(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, POST_DATE_FORMAT).ok()
}

/// Lenient variant used on creation: absent or unparseable dates become "now".
pub fn post_date_or_now(raw: Option<&str>) -> NaiveDateTime {
    raw.and_then(parse_post_date).unwrap_or_else(now)
}

pub fn parse_filter_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, FILTER_DATE_FORMAT).ok()
}
