use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sqlx::{Pool, Postgres};
use std::fmt;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::db::job_repository::JobRepository;
use crate::db::models::JobRow;
use super::dto::{JobFilter, MessageResponse, ValidationErrorResponse};
use super::models::{field_messages, JobPayload};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    Database(sqlx::Error),

    /// Candidate record violated the job schema
    Validation(ValidationErrors),

    /// No job posting exists for the requested id
    NotFound,

    /// The id path segment is not a valid UUID
    InvalidId(uuid::Error),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Database(e) => write!(f, "{e}"),
            ServiceError::Validation(_) => write!(f, "Validation error"),
            ServiceError::NotFound => write!(f, "Job not found"),
            ServiceError::InvalidId(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Database(_) | ServiceError::InvalidId(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::Validation(errors) => {
                warn!("Validation failed: {:?}", errors);
                HttpResponse::BadRequest().json(ValidationErrorResponse {
                    message: "Validation error".to_owned(),
                    errors: field_messages(errors),
                })
            }
            ServiceError::NotFound => {
                warn!("Job not found");
                HttpResponse::NotFound().json(MessageResponse {
                    message: "Job not found".to_owned(),
                })
            }
            ServiceError::Database(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(MessageResponse {
                    message: e.to_string(),
                })
            }
            ServiceError::InvalidId(e) => {
                error!("Malformed job id: {}", e);
                HttpResponse::InternalServerError().json(MessageResponse {
                    message: e.to_string(),
                })
            }
        }
    }
}

/// Job resource service: the six operations against the job posting store.
///
/// Holds the explicitly constructed store client; handlers stay thin and every
/// request is handled statelessly on top of it.
pub struct JobService {
    pool: Pool<Postgres>,
}

impl JobService {
    /// Create a new JobService instance over a connection pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All job postings, newest first
    pub async fn list(&self) -> Result<Vec<JobRow>, ServiceError> {
        let jobs = JobRepository::find_all(&self.pool)
            .await
            .map_err(ServiceError::Database)?;
        debug!("Listed {} jobs", jobs.len());
        Ok(jobs)
    }

    /// A single job posting by id
    pub async fn get(&self, id: &str) -> Result<JobRow, ServiceError> {
        let id = parse_id(id)?;
        JobRepository::find_by_id(&self.pool, id)
            .await
            .map_err(ServiceError::Database)?
            .ok_or(ServiceError::NotFound)
    }

    /// Validate a candidate record and persist it
    pub async fn create(&self, payload: JobPayload) -> Result<JobRow, ServiceError> {
        let record = payload.into_record().map_err(ServiceError::Validation)?;

        let job = JobRepository::insert(&self.pool, &record)
            .await
            .map_err(ServiceError::Database)?;

        info!("Created job id={} title={}", job.id, job.title);
        Ok(job)
    }

    /// Apply a patch to an existing posting.
    ///
    /// Only the fields present in the patch change; the merged full record is
    /// re-validated against the schema before it is persisted.
    pub async fn update(&self, id: &str, patch: JobPayload) -> Result<JobRow, ServiceError> {
        let id = parse_id(id)?;

        let existing = JobRepository::find_by_id(&self.pool, id)
            .await
            .map_err(ServiceError::Database)?
            .ok_or(ServiceError::NotFound)?;

        let record = patch
            .apply_to(&existing)
            .into_record()
            .map_err(ServiceError::Validation)?;

        let job = JobRepository::update(&self.pool, id, &record)
            .await
            .map_err(ServiceError::Database)?
            .ok_or(ServiceError::NotFound)?;

        info!("Updated job id={}", job.id);
        Ok(job)
    }

    /// Remove a job posting by id
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = parse_id(id)?;

        let deleted = JobRepository::delete(&self.pool, id)
            .await
            .map_err(ServiceError::Database)?;
        if deleted == 0 {
            return Err(ServiceError::NotFound);
        }

        info!("Deleted job id={}", id);
        Ok(())
    }

    /// Job postings matching the supplied criteria, newest first
    pub async fn filter(&self, filter: &JobFilter) -> Result<Vec<JobRow>, ServiceError> {
        if filter.min_salary.is_some() || filter.max_salary.is_some() {
            // accepted but not applied while salary stays free-form text
            debug!(
                "Ignoring salary bounds min={:?} max={:?}",
                filter.min_salary, filter.max_salary
            );
        }

        JobRepository::filter(&self.pool, filter)
            .await
            .map_err(ServiceError::Database)
    }
}

fn parse_id(id: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(id).map_err(ServiceError::InvalidId)
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;

    async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(response.into_body()).await.expect("body bytes");
        serde_json::from_slice(&bytes).expect("JSON body")
    }

    #[actix_web::test]
    async fn validation_error_maps_to_400_with_field_messages() {
        let errors = JobPayload::default()
            .into_record()
            .expect_err("empty payload must fail");
        let error = ServiceError::Validation(errors);

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        let body = body_json(error.error_response()).await;
        assert_eq!(body["message"], "Validation error");
        assert_eq!(body["errors"]["title"], "Job title is required");
        assert_eq!(body["errors"]["jobType"], "Job type is required");
    }

    #[actix_web::test]
    async fn not_found_maps_to_404_with_message() {
        let error = ServiceError::NotFound;

        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        let body = body_json(error.error_response()).await;
        assert_eq!(body["message"], "Job not found");
    }

    #[actix_web::test]
    async fn malformed_id_maps_to_500_with_parse_message() {
        let parse_error = Uuid::parse_str("not-a-uuid").expect_err("must not parse");
        let error = ServiceError::InvalidId(parse_error);

        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(error.error_response()).await;
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn database_error_maps_to_500_exposing_the_failure() {
        let error = ServiceError::Database(sqlx::Error::PoolClosed);

        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(error.error_response()).await;
        assert_eq!(
            body["message"],
            sqlx::Error::PoolClosed.to_string().as_str()
        );
    }
}
