use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Filter criteria for the job search endpoint.
///
/// All criteria are optional and AND-combined. `min_salary`/`max_salary` are
/// accepted in the body but never applied: salary is stored as free-form text,
/// so a numeric range comparison is not possible until salary is split into
/// numeric min/max columns.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub min_salary: Option<serde_json::Value>,
    pub max_salary: Option<serde_json::Value>,
}

/// Plain message body, used for delete confirmations and simple errors
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Validation failure body with one message per violated field
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub message: String,
    pub errors: BTreeMap<String, String>,
}

/// Catch-all failure body for unhandled errors
#[derive(Debug, Serialize)]
pub struct ServerErrorResponse {
    pub message: String,
    pub error: String,
}
