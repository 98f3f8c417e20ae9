use actix_web::HttpResponse;
use serde::Serialize;

/// Uniform error body: `{"error": message}` plus per-field details for validation failures
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            fields: None,
        }
    }
}

fn bad_request(response: ErrorResponse) -> actix_web::Error {
    actix_web::error::InternalError::from_response("", HttpResponse::BadRequest().json(response)).into()
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| match err {
        actix_web_validator::Error::Validate(validation_errors) => {
            let mut fields = serde_json::Map::new();
            let mut first_message = None;

            for (field, errors) in validation_errors.field_errors() {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Validation error in field: {}", field))
                    })
                    .collect();
                if first_message.is_none() {
                    first_message = messages.first().cloned();
                }
                fields.insert(field.to_string(), serde_json::json!({ "errors": messages }));
            }

            bad_request(ErrorResponse {
                error: first_message.unwrap_or_else(|| "Validation failed".to_string()),
                fields: Some(serde_json::Value::Object(fields)),
            })
        }
        other => {
            let err_string = other.to_string();

            let message = if err_string.contains("EOF while parsing") {
                "No data provided. Expected JSON payload"
            } else if err_string.contains("missing field") {
                "Missing required fields (Job Title, Job URL)"
            } else if err_string.contains("invalid type") {
                "Invalid field type in JSON payload"
            } else if err_string.to_lowercase().contains("content type") {
                "Expected JSON payload (Content-Type: application/json)"
            } else {
                "Invalid JSON format"
            };

            bad_request(ErrorResponse::new(message))
        }
    })
}
