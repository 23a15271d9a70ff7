use crate::models::{Material, MaterialType};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Fields the upload gateway provides for a new registry entry.
pub struct NewMaterial {
    pub title: String,
    pub subject: String,
    pub semester: String,
    pub kind: MaterialType,
    pub filename: String,
    pub originalname: String,
    pub mimetype: String,
    pub size: u64,
}

/// Exact-match filters for listing; `None` fields are wildcards.
#[derive(Debug, Default, Clone)]
pub struct MaterialFilter {
    pub semester: Option<String>,
    pub subject: Option<String>,
    pub kind: Option<MaterialType>,
}

/// Ordered in-memory list of uploaded-file metadata. Ids are assigned from a
/// monotonically increasing counter and never reused.
pub struct MaterialRegistry {
    materials: RwLock<Vec<Material>>,
    next_id: AtomicU64,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self {
            materials: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Appends a new record and returns it with its assigned id.
    pub async fn create(&self, new: NewMaterial) -> Material {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let material = Material {
            id,
            title: new.title,
            subject: new.subject,
            semester: new.semester,
            kind: new.kind,
            path: format!("/uploads/{}", new.filename),
            filename: new.filename,
            originalname: new.originalname,
            mimetype: new.mimetype,
            size: new.size,
            uploaded_at: Utc::now(),
        };

        self.materials.write().await.push(material.clone());
        material
    }

    /// Returns matching records in insertion order. Provided filters must all
    /// match exactly; omitted filters match everything.
    pub async fn list(&self, filter: &MaterialFilter) -> Vec<Material> {
        self.materials
            .read()
            .await
            .iter()
            .filter(|m| {
                filter
                    .semester
                    .as_ref()
                    .map_or(true, |s| &m.semester == s)
                    && filter.subject.as_ref().map_or(true, |s| &m.subject == s)
                    && filter.kind.map_or(true, |k| m.kind == k)
            })
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: u64) -> Option<Material> {
        self.materials
            .read()
            .await
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    /// Looks a record up by its on-disk filename.
    pub async fn get_by_filename(&self, filename: &str) -> Option<Material> {
        self.materials
            .read()
            .await
            .iter()
            .find(|m| m.filename == filename)
            .cloned()
    }

    /// Removes and returns the record with this id, if any.
    pub async fn remove(&self, id: u64) -> Option<Material> {
        let mut materials = self.materials.write().await;
        let index = materials.iter().position(|m| m.id == id)?;
        Some(materials.remove(index))
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}
