use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::db::models::JobRow;

/// Employment type enum with the four permitted wire values
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
    ];

    /// Canonical wire/storage string for this job type
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }

    /// Parse the exact canonical string; case variants are rejected
    pub fn from_str(value: &str) -> Option<JobType> {
        JobType::ALL.iter().copied().find(|t| t.as_str() == value)
    }
}

/// Candidate job record as submitted by a client.
///
/// Every field is optional so the same shape serves both creation (all
/// required fields must be present) and update (a patch applying only the
/// fields supplied). `validate()` enforces the field rules and reports one
/// message per violated field.
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    #[validate(
        required(message = "Job title is required"),
        custom(function = "not_blank", message = "Job title is required")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "Company name is required"),
        custom(function = "not_blank", message = "Company name is required")
    )]
    pub company_name: Option<String>,

    #[validate(
        required(message = "Location is required"),
        custom(function = "not_blank", message = "Location is required")
    )]
    pub location: Option<String>,

    #[validate(
        required(message = "Job type is required"),
        custom(function = "valid_job_type")
    )]
    pub job_type: Option<String>,

    #[validate(
        required(message = "Salary range is required"),
        custom(function = "not_blank", message = "Salary range is required")
    )]
    pub salary: Option<String>,

    #[validate(
        required(message = "Job description is required"),
        custom(function = "not_empty", message = "Job description is required")
    )]
    pub description: Option<String>,

    #[validate(
        required(message = "Requirements are required"),
        custom(function = "not_empty", message = "Requirements are required")
    )]
    pub requirements: Option<String>,

    #[validate(
        required(message = "Responsibilities are required"),
        custom(function = "not_empty", message = "Responsibilities are required")
    )]
    pub responsibilities: Option<String>,

    #[validate(required(message = "Application deadline is required"))]
    pub application_deadline: Option<DateTime<Utc>>,
}

/// Fully validated job record, ready to persist.
///
/// Trimmed fields carry their trimmed value; `job_type` holds the canonical
/// enum string. The store assigns `id` and `created_at` on insert.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub job_type: String,
    pub salary: String,
    pub description: String,
    pub requirements: String,
    pub responsibilities: String,
    pub application_deadline: DateTime<Utc>,
}

impl JobPayload {
    /// Overlay this patch on an existing record: fields present in the patch
    /// win, absent fields keep the stored value. The result is a full
    /// candidate record suitable for re-validation.
    pub fn apply_to(self, existing: &JobRow) -> JobPayload {
        JobPayload {
            title: self.title.or_else(|| Some(existing.title.clone())),
            company_name: self
                .company_name
                .or_else(|| Some(existing.company_name.clone())),
            location: self.location.or_else(|| Some(existing.location.clone())),
            job_type: self.job_type.or_else(|| Some(existing.job_type.clone())),
            salary: self.salary.or_else(|| Some(existing.salary.clone())),
            description: self
                .description
                .or_else(|| Some(existing.description.clone())),
            requirements: self
                .requirements
                .or_else(|| Some(existing.requirements.clone())),
            responsibilities: self
                .responsibilities
                .or_else(|| Some(existing.responsibilities.clone())),
            application_deadline: self
                .application_deadline
                .or(Some(existing.application_deadline)),
        }
    }

    /// Validate the candidate record and convert it into a persistable
    /// `JobRecord`, trimming the trim-marked fields.
    pub fn into_record(self) -> Result<JobRecord, ValidationErrors> {
        self.validate()?;

        let JobPayload {
            title,
            company_name,
            location,
            job_type,
            salary,
            description,
            requirements,
            responsibilities,
            application_deadline,
        } = self;

        let (
            Some(title),
            Some(company_name),
            Some(location),
            Some(job_type),
            Some(salary),
            Some(description),
            Some(requirements),
            Some(responsibilities),
            Some(application_deadline),
        ) = (
            title,
            company_name,
            location,
            job_type,
            salary,
            description,
            requirements,
            responsibilities,
            application_deadline,
        )
        else {
            // validate() enforces `required` on every field
            let mut errors = ValidationErrors::new();
            errors.add("payload", ValidationError::new("required"));
            return Err(errors);
        };

        Ok(JobRecord {
            title: title.trim().to_owned(),
            company_name: company_name.trim().to_owned(),
            location: location.trim().to_owned(),
            job_type,
            salary: salary.trim().to_owned(),
            description,
            requirements,
            responsibilities,
            application_deadline,
        })
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn not_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn valid_job_type(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("Job type is required".into());
        return Err(error);
    }
    if JobType::from_str(value).is_none() {
        let mut error = ValidationError::new("enum");
        error.message = Some(format!("`{value}` is not a valid job type").into());
        return Err(error);
    }
    Ok(())
}

/// Wire (camelCase) name for a schema field, used to key validation error maps
fn wire_name(field: &str) -> &str {
    match field {
        "company_name" => "companyName",
        "job_type" => "jobType",
        "application_deadline" => "applicationDeadline",
        other => other,
    }
}

/// Flatten validator output into one message per violated field, keyed by the
/// wire field name
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    let mut messages = BTreeMap::new();
    for (field, field_errors) in errors.field_errors() {
        let message = field_errors
            .iter()
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| format!("{field} is invalid"));
        messages.insert(wire_name(field).to_owned(), message);
    }
    messages
}
