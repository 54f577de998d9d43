use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::DbErr;
use services::services::{
    school::{FieldError, SchoolError, ValidationErrors},
    school_image::ImageError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error, ts_rs::TS)]
#[ts(type = "string")]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<SchoolError> for ApiError {
    fn from(err: SchoolError) -> Self {
        match err {
            SchoolError::Validation(errors) => ApiError::Validation(errors),
            SchoolError::NotFound => ApiError::NotFound("School not found".to_string()),
            SchoolError::Image(img_err) => ApiError::Image(img_err),
            SchoolError::Database(db_err) => ApiError::Database(db_err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
            ApiError::Image(img_err) => match img_err {
                ImageError::InvalidFormat => (StatusCode::BAD_REQUEST, "InvalidImageFormat"),
                ImageError::Empty => (StatusCode::BAD_REQUEST, "EmptyImage"),
                ImageError::TooLarge(_, _) => (StatusCode::PAYLOAD_TOO_LARGE, "ImageTooLarge"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "ImageError"),
            },
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            // Body limit violations surface here as 413.
            ApiError::Multipart(err) => (err.status(), "MultipartError"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
        };

        let error_message = match &self {
            ApiError::Validation(errors) => format!("Validation failed: {}", errors),
            ApiError::Image(img_err) => match img_err {
                ImageError::InvalidFormat => {
                    "This file type is not supported. Please upload an image file.".to_string()
                }
                ImageError::Empty => "The uploaded image is empty.".to_string(),
                ImageError::TooLarge(size, max) => format!(
                    "This image is too large ({:.1} MB). Maximum file size is {:.1} MB.",
                    *size as f64 / 1_048_576.0,
                    *max as f64 / 1_048_576.0
                ),
                _ => "Failed to process image. Please try again.".to_string(),
            },
            ApiError::Multipart(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                "The upload is too large.".to_string()
            }
            ApiError::Multipart(_) => {
                "Failed to read the form. Please ensure the upload is valid and try again."
                    .to_string()
            }
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::BadRequest(msg) => msg.clone(),
            _ => format!("{}: {}", error_type, self),
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }

        match self {
            ApiError::Validation(errors) => {
                let response = ApiResponse::<Vec<FieldError>>::error_with_data(errors.0, &error_message);
                (status_code, Json(response)).into_response()
            }
            _ => {
                let response = ApiResponse::<()>::error(&error_message);
                (status_code, Json(response)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use services::services::school::{SchoolForm, validation::validate_school_form};

    use super::*;

    #[test]
    fn api_error_maps_to_expected_http_statuses() {
        assert_eq!(
            ApiError::BadRequest("bad".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("missing".to_string())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DbErr::RecordNotFound("schools".to_string()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn school_errors_map_to_expected_http_statuses() {
        assert_eq!(
            ApiError::from(SchoolError::NotFound)
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(SchoolError::Image(ImageError::TooLarge(10, 5)))
                .into_response()
                .status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::from(SchoolError::Image(ImageError::InvalidFormat))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(SchoolError::Database(DbErr::Custom("disk full".to_string())))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn validation_error_lists_failing_fields() {
        let form = SchoolForm {
            contact: Some("12345".to_string()),
            ..SchoolForm::default()
        };
        let errors = validate_school_form(&form).unwrap_err();

        let response = ApiError::from(SchoolError::Validation(errors)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        let message = json["message"].as_str().unwrap();
        assert!(message.contains("School name is required"));
        assert!(message.contains("Contact must be a 10-digit number"));
        let fields: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|error| error["field"].as_str())
            .collect();
        assert!(fields.contains(&"contact"));
        assert!(fields.contains(&"email_id"));
    }

    #[tokio::test]
    async fn database_errors_carry_their_message() {
        let response =
            ApiError::from(DbErr::Custom("disk full".to_string())).into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["message"].as_str().unwrap().contains("disk full"));
    }
}
