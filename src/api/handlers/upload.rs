use crate::api::error::AppError;
use crate::models::{Material, MaterialType};
use crate::services::registry::NewMaterial;
use crate::utils::validation::{sanitize_filename, validate_file_size, validate_mime_type};
use crate::AppState;
use axum::body::Bytes;
use axum::{extract::Multipart, extract::State, Json};
use uuid::Uuid;

/// Upper bound on files accepted by the multiple-upload route.
pub const MAX_FILES_PER_REQUEST: usize = 12;

struct PendingFile {
    originalname: String,
    safe_name: String,
    mimetype: String,
    bytes: Bytes,
}

#[derive(Default)]
struct UploadMeta {
    title: Option<String>,
    subject: Option<String>,
    semester: Option<String>,
    kind: Option<MaterialType>,
}

/// Drains the multipart form, validating every file before anything is
/// persisted. A single invalid file fails the whole request, so a rejected
/// upload never leaves bytes on disk or a registry entry behind.
async fn collect_form(
    mut multipart: Multipart,
    file_field: &str,
    max_files: usize,
    max_file_size: usize,
) -> Result<(Vec<PendingFile>, UploadMeta), AppError> {
    let mut files = Vec::new();
    let mut meta = UploadMeta::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == file_field {
            if files.len() == max_files {
                return Err(AppError::Validation(format!(
                    "Too many files. Maximum is {} per request.",
                    max_files
                )));
            }

            let originalname = field.file_name().unwrap_or("unnamed").to_string();
            let mimetype = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();

            // Type check happens before the body is read at all
            validate_mime_type(&mimetype).map_err(|e| AppError::Validation(e.to_string()))?;
            let safe_name =
                sanitize_filename(&originalname).map_err(|e| AppError::Validation(e.to_string()))?;

            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;

            validate_file_size(bytes.len(), max_file_size)
                .map_err(|e| AppError::PayloadTooLarge(e.to_string()))?;

            files.push(PendingFile {
                originalname,
                safe_name,
                mimetype,
                bytes,
            });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(e.to_string()))?;

            match name.as_str() {
                "title" => meta.title = Some(text),
                "subject" => meta.subject = Some(text),
                "semester" => meta.semester = Some(text),
                "type" => {
                    meta.kind = Some(text.parse().map_err(AppError::Validation)?);
                }
                // Unknown fields are ignored, matching lenient form handling
                _ => {}
            }
        }
    }

    Ok((files, meta))
}

/// Writes one accepted file to storage and appends its registry entry.
async fn persist_file(
    state: &AppState,
    file: PendingFile,
    meta: &UploadMeta,
) -> Result<Material, AppError> {
    // Collision-free, traversal-safe disk name; the client name survives
    // only as display metadata.
    let disk_name = format!("{}_{}", Uuid::new_v4(), file.safe_name);

    state
        .storage
        .store(&disk_name, &file.bytes)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let material = state
        .registry
        .create(NewMaterial {
            title: meta.title.clone().unwrap_or_else(|| file.originalname.clone()),
            subject: meta.subject.clone().unwrap_or_else(|| "General".to_string()),
            semester: meta.semester.clone().unwrap_or_else(|| "1".to_string()),
            kind: meta.kind.unwrap_or(MaterialType::Notes),
            filename: disk_name,
            originalname: file.originalname,
            mimetype: file.mimetype,
            size: file.bytes.len() as u64,
        })
        .await;

    tracing::info!(
        id = material.id,
        filename = %material.filename,
        size = material.size,
        "material uploaded"
    );

    Ok(material)
}

#[utoipa::path(
    post,
    path = "/api/upload/single",
    request_body(content = Multipart, description = "File in field `file` plus optional title/subject/semester/type fields"),
    responses(
        (status = 200, description = "Created material", body = Material),
        (status = 400, description = "No file or unsupported type"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "File too large")
    ),
    security(("bearer" = [])),
    tag = "upload"
)]
pub async fn upload_single(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Material>, AppError> {
    let (mut files, meta) = collect_form(multipart, "file", 1, state.config.max_file_size).await?;

    let file = files
        .pop()
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let material = persist_file(&state, file, &meta).await?;
    Ok(Json(material))
}

#[utoipa::path(
    post,
    path = "/api/upload/multiple",
    request_body(content = Multipart, description = "Up to 12 files in field `files` plus optional title/subject/semester/type fields"),
    responses(
        (status = 200, description = "Created materials in request order", body = [Material]),
        (status = 400, description = "No files, too many files, or unsupported type"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "A file exceeds the size limit")
    ),
    security(("bearer" = [])),
    tag = "upload"
)]
pub async fn upload_multiple(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Vec<Material>>, AppError> {
    let (files, meta) = collect_form(
        multipart,
        "files",
        MAX_FILES_PER_REQUEST,
        state.config.max_file_size,
    )
    .await?;

    if files.is_empty() {
        return Err(AppError::Validation("No files uploaded".to_string()));
    }

    let mut materials = Vec::with_capacity(files.len());
    for file in files {
        materials.push(persist_file(&state, file, &meta).await?);
    }

    Ok(Json(materials))
}
