//! Picture lifecycle: stored file plus database record.

use tracing::{info, warn};

use crate::db::DbPool;
use crate::entity::picture;
use crate::error::{AppError, AppResult};
use crate::models::PictureView;
use crate::services::storage::{PICTURE_EXTENSIONS, Storage};

/// An uploaded file, fully read and not yet stored.
#[derive(Debug, Clone)]
pub struct PictureUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

fn unsupported(original_name: &str) -> AppError {
    AppError::field(
        "pictures",
        format!(
            "Unsupported file type for {}. Allowed: {}.",
            original_name,
            PICTURE_EXTENSIONS.join(", ")
        ),
    )
}

/// Store an uploaded image and record it for the property.
pub async fn attach(
    pool: &DbPool,
    storage: &Storage,
    property_id: i32,
    original_name: &str,
    data: &[u8],
) -> AppResult<picture::Model> {
    let ext = Storage::picture_extension(original_name).ok_or_else(|| unsupported(original_name))?;

    let key = Storage::picture_key(&ext);
    storage.put(&key, data).await?;

    match pool.insert_picture(property_id, &key).await {
        Ok(model) => {
            info!(property_id, picture_id = model.id, key = %key, "Picture stored");
            Ok(model)
        }
        Err(e) => {
            if let Err(cleanup) = storage.delete(&key).await {
                warn!(key = %key, error = %cleanup, "Failed to remove orphaned picture file");
            }
            Err(e)
        }
    }
}

/// Attach a whole upload, or nothing.
///
/// Every file type is checked before anything is stored, and pictures
/// already stored are removed again if a later one fails.
pub async fn attach_all(
    pool: &DbPool,
    storage: &Storage,
    property_id: i32,
    uploads: &[PictureUpload],
) -> AppResult<Vec<picture::Model>> {
    if let Some(rejected) = uploads
        .iter()
        .find(|u| Storage::picture_extension(&u.filename).is_none())
    {
        return Err(unsupported(&rejected.filename));
    }

    let mut stored = Vec::with_capacity(uploads.len());
    for upload in uploads {
        match attach(pool, storage, property_id, &upload.filename, &upload.data).await {
            Ok(picture) => stored.push(picture),
            Err(e) => {
                if let Err(cleanup) = destroy(pool, storage, &stored).await {
                    warn!(property_id, error = %cleanup, "Failed to roll back partial upload");
                }
                return Err(e);
            }
        }
    }

    Ok(stored)
}

/// Delete picture records, then their files.
///
/// A file that cannot be removed is logged and left behind; the record is gone either way.
pub async fn destroy(
    pool: &DbPool,
    storage: &Storage,
    pictures: &[picture::Model],
) -> AppResult<u64> {
    let ids: Vec<i32> = pictures.iter().map(|p| p.id).collect();
    let deleted = pool.delete_pictures(&ids).await?;

    for picture in pictures {
        match storage.delete(&picture.filename).await {
            Ok(true) => {}
            Ok(false) => warn!(key = %picture.filename, "Picture file was already missing"),
            Err(e) => warn!(key = %picture.filename, error = %e, "Failed to delete picture file"),
        }
    }

    Ok(deleted)
}

/// Delete one picture by ID.
pub async fn destroy_one(pool: &DbPool, storage: &Storage, id: i32) -> AppResult<()> {
    let picture = pool
        .get_picture(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Picture {}", id)))?;

    destroy(pool, storage, std::slice::from_ref(&picture)).await?;
    Ok(())
}

/// Delete a property's pictures, then soft-delete the property.
pub async fn delete_property(pool: &DbPool, storage: &Storage, id: i32) -> AppResult<u64> {
    pool.get_property(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Property {}", id)))?;

    let pictures = pool.pictures_for_property(id).await?;
    let removed = destroy(pool, storage, &pictures).await?;
    pool.soft_delete_property(id).await?;

    info!(property_id = id, pictures = removed, "Property deleted");
    Ok(removed)
}

/// Views with public URLs.
pub fn views(storage: &Storage, pictures: &[picture::Model]) -> Vec<PictureView> {
    pictures
        .iter()
        .map(|p| PictureView::new(p, storage.url(&p.filename)))
        .collect()
}
