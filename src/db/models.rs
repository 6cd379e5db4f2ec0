use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Database representation of a job posting with all fields
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: String,
    pub salary: String,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub application_deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
