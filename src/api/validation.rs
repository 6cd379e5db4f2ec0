use actix_web::{web, HttpResponse};

use crate::api::job::dto::ServerErrorResponse;

/// Global JsonConfig for the project.
///
/// A body that cannot be parsed into the target type never reaches a handler;
/// it surfaces through the catch-all error shape
/// `{"message": "Server error", "error": <detail>}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::InternalServerError().json(ServerErrorResponse {
                message: "Server error".to_owned(),
                error: detail,
            }),
        )
        .into()
    })
}
