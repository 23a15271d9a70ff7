use crate::api::error::AppError;
use crate::models::Material;
use crate::services::registry::MaterialFilter;
use crate::services::storage::LocalStorage;
use crate::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
pub struct ListQuery {
    pub semester: Option<String>,
    pub subject: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/materials",
    params(ListQuery),
    responses(
        (status = 200, description = "Materials matching every provided filter", body = [Material]),
        (status = 400, description = "Unknown material type filter")
    ),
    tag = "materials"
)]
pub async fn list_materials(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Material>>, AppError> {
    let kind = query
        .kind
        .map(|t| t.parse().map_err(AppError::Validation))
        .transpose()?;

    let filter = MaterialFilter {
        semester: query.semester,
        subject: query.subject,
        kind,
    };

    Ok(Json(state.registry.list(&filter).await))
}

#[utoipa::path(
    get,
    path = "/api/materials/{id}",
    params(("id" = u64, Path, description = "Material id")),
    responses(
        (status = 200, description = "The material", body = Material),
        (status = 404, description = "Unknown id")
    ),
    tag = "materials"
)]
pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Material>, AppError> {
    let material = state
        .registry
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound("Material not found".to_string()))?;

    Ok(Json(material))
}

#[utoipa::path(
    delete,
    path = "/api/materials/{id}",
    params(("id" = u64, Path, description = "Material id")),
    responses(
        (status = 200, description = "Material and file removed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown id")
    ),
    security(("bearer" = [])),
    tag = "materials"
)]
pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, AppError> {
    let material = state
        .registry
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound("Material not found".to_string()))?;

    // File first, registry second: a failure here keeps the entry so the
    // material never becomes an unreachable orphan.
    let removed = state
        .storage
        .delete(&material.filename)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !removed {
        tracing::warn!(id, filename = %material.filename, "file already missing on delete");
    }

    state
        .registry
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound("Material not found".to_string()))?;

    tracing::info!(id, "material deleted");
    Ok(Json(json!({ "message": "Material deleted successfully" })))
}

#[utoipa::path(
    get,
    path = "/api/download/{filename}",
    params(("filename" = String, Path, description = "On-disk file name")),
    responses(
        (status = 200, description = "Raw file bytes as attachment"),
        (status = 404, description = "No such file")
    ),
    tag = "materials"
)]
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    if !LocalStorage::is_safe_name(&filename) {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    let bytes = state
        .storage
        .read(&filename)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    // Serve with the original name and type when the registry knows the file
    let (content_type, download_name) = match state.registry.get_by_filename(&filename).await {
        Some(m) => (m.mimetype, m.originalname),
        None => ("application/octet-stream".to_string(), filename),
    };

    let headers = [
        (header::CONTENT_TYPE, content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download_name),
        ),
    ];

    Ok((headers, Body::from(bytes)).into_response())
}
