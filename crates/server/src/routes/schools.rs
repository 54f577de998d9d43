use axum::{
    Router,
    extract::{Multipart, Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::school::School;
use deployment::Deployment;
use serde::{Deserialize, Serialize};
use services::services::school::{ImageUpload, SchoolForm};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize, TS)]
pub struct CreatedSchool {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SchoolIdQuery {
    pub id: Option<String>,
}

fn parse_school_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid school id: {raw}")))
}

fn text_slot<'a>(form: &'a mut SchoolForm, field: &str) -> Option<&'a mut Option<String>> {
    match field {
        "name" => Some(&mut form.name),
        "address" => Some(&mut form.address),
        "city" => Some(&mut form.city),
        "state" => Some(&mut form.state),
        "contact" => Some(&mut form.contact),
        "email_id" => Some(&mut form.email_id),
        _ => None,
    }
}

/// Collects the school fields and the optional `image` file part.
async fn read_school_form(
    mut multipart: Multipart,
) -> Result<(SchoolForm, Option<ImageUpload>), ApiError> {
    let mut form = SchoolForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMAGE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            image = Some(ImageUpload {
                file_name,
                data: data.to_vec(),
            });
        } else if let Some(slot) = text_slot(&mut form, &name) {
            *slot = Some(field.text().await?);
        } else {
            tracing::debug!(field = %name, "Ignoring unknown form field");
        }
    }

    Ok((form, image))
}

pub async fn get_schools(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<Vec<School>>>, ApiError> {
    let schools = deployment.school().list(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(schools)))
}

pub async fn get_school(
    State(deployment): State<DeploymentImpl>,
    Path(school_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<School>>, ApiError> {
    let school_id = parse_school_id(&school_id)?;
    let school = deployment
        .school()
        .get(&deployment.db().pool, school_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(school)))
}

pub async fn create_school(
    State(deployment): State<DeploymentImpl>,
    multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<CreatedSchool>>, ApiError> {
    let (form, image) = read_school_form(multipart).await?;
    let id = deployment
        .school()
        .create(&deployment.db().pool, &form, image)
        .await?;

    tracing::info!(school_id = id, "School created");
    Ok(ResponseJson(ApiResponse::success_with_message(
        CreatedSchool { id },
        "School added successfully",
    )))
}

pub async fn update_school(
    State(deployment): State<DeploymentImpl>,
    Path(school_id): Path<String>,
    multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let school_id = parse_school_id(&school_id)?;
    let (form, image) = read_school_form(multipart).await?;
    deployment
        .school()
        .update(&deployment.db().pool, school_id, &form, image)
        .await?;

    tracing::info!(school_id, "School updated");
    Ok(ResponseJson(ApiResponse::success_with_message(
        (),
        "School updated successfully",
    )))
}

async fn delete_by_id(
    deployment: &DeploymentImpl,
    school_id: i64,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    deployment
        .school()
        .delete(&deployment.db().pool, school_id)
        .await?;

    tracing::info!(school_id, "School deleted");
    Ok(ResponseJson(ApiResponse::success_with_message(
        (),
        "School deleted successfully",
    )))
}

pub async fn delete_school(
    State(deployment): State<DeploymentImpl>,
    Path(school_id): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let school_id = parse_school_id(&school_id)?;
    delete_by_id(&deployment, school_id).await
}

/// `DELETE /api/schools?id=N`, kept for older clients.
pub async fn delete_school_by_query(
    State(deployment): State<DeploymentImpl>,
    Query(query): Query<SchoolIdQuery>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let raw_id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("School ID is required".to_string()))?;
    let school_id = parse_school_id(&raw_id)?;
    delete_by_id(&deployment, school_id).await
}

pub fn router() -> Router<DeploymentImpl> {
    let inner = Router::new()
        .route(
            "/",
            get(get_schools)
                .post(create_school)
                .delete(delete_school_by_query),
        )
        .route(
            "/{school_id}",
            get(get_school).put(update_school).delete(delete_school),
        );

    Router::new().nest("/schools", inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn school_id_must_be_an_integer() {
        assert_eq!(parse_school_id("42").unwrap(), 42);
        assert_eq!(parse_school_id(" 7 ").unwrap(), 7);
        assert!(matches!(
            parse_school_id("abc"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            parse_school_id("1.5"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn only_known_fields_have_slots() {
        let mut form = SchoolForm::default();
        for field in ["name", "address", "city", "state", "contact", "email_id"] {
            *text_slot(&mut form, field).unwrap() = Some(field.to_string());
        }
        assert!(text_slot(&mut form, "image").is_none());
        assert!(text_slot(&mut form, "id").is_none());
        assert_eq!(form.email_id.as_deref(), Some("email_id"));
    }
}
