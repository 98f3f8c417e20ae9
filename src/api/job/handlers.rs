use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Path, Query, ServiceConfig, scope},
    HttpResponse,
};
use actix_web_validator::Json;
use serde::Deserialize;
use validator::Validate;

use crate::db::models::{parse_filter_date, JobFilter};
use super::dto::{JobDto, MessageResponse};
use super::models::{JobPatch, NewJob};
use super::service::{Identifier, JobService, ServiceError};

/// Query string of `GET /api/jobs`
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    keyword: Option<String>,
    posted_after: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> Result<JobFilter, ServiceError> {
        let keyword = self.keyword.filter(|k| !k.is_empty());
        let posted_after = match self.posted_after.filter(|d| !d.is_empty()) {
            Some(raw) => Some(parse_filter_date(&raw).ok_or_else(|| {
                ServiceError::InvalidInput("Invalid date format. Use YYYY-MM-DD.".to_string())
            })?),
            None => None,
        };
        Ok(JobFilter { keyword, posted_after })
    }
}

#[get("")]
async fn list_jobs(service: Data<JobService>, query: Query<ListQuery>) -> Result<HttpResponse, ServiceError> {
    let filter = query.into_inner().into_filter()?;
    let jobs: Vec<JobDto> = service
        .list_jobs(&filter)
        .await?
        .into_iter()
        .map(JobDto::from)
        .collect();
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/{identifier:.*}")]
async fn get_job(service: Data<JobService>, identifier: Path<String>) -> Result<HttpResponse, ServiceError> {
    let job = service.get_job(&Identifier::parse(&identifier)).await?;
    Ok(HttpResponse::Ok().json(JobDto::from(job)))
}

#[post("")]
async fn create_job(service: Data<JobService>, job: Json<NewJob>) -> Result<HttpResponse, ServiceError> {
    let job = service.create_job(job.into_inner()).await?;
    Ok(HttpResponse::Created().json(JobDto::from(job)))
}

/// Decode an update body after the target job has been resolved
fn decode_patch(body: &[u8]) -> Result<JobPatch, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ServiceError::InvalidInput("No data provided for update".to_string()));
    }

    let patch: JobPatch = serde_json::from_slice(body)
        .map_err(|e| ServiceError::InvalidInput(format!("Invalid JSON payload: {}", e)))?;

    patch.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Validation failed".to_string());
        ServiceError::InvalidInput(message)
    })?;

    Ok(patch)
}

#[put("/{identifier:.*}")]
async fn update_job(
    service: Data<JobService>,
    identifier: Path<String>,
    body: Bytes,
) -> Result<HttpResponse, ServiceError> {
    // Unknown identifiers are 404 whatever the body holds
    let job = service.get_job(&Identifier::parse(&identifier)).await?;
    let patch = decode_patch(&body)?;
    let job = service.apply_patch(job, patch).await?;
    Ok(HttpResponse::Ok().json(JobDto::from(job)))
}

#[delete("/{identifier:.*}")]
async fn delete_job(service: Data<JobService>, identifier: Path<String>) -> Result<HttpResponse, ServiceError> {
    service.delete_job(&Identifier::parse(&identifier)).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Job deleted successfully".to_string(),
    }))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api/jobs")
            .service(list_jobs)
            .service(create_job)
            .service(get_job)
            .service(update_job)
            .service(delete_job),
    );
}
