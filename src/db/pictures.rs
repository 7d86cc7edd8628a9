//! Database queries for property pictures.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::picture::{self, ActiveModel, Entity as Picture};
use crate::error::{AppError, AppResult};

use super::DbPool;

impl DbPool {
    /// Record a stored picture for a property.
    pub async fn insert_picture(&self, property_id: i32, filename: &str) -> AppResult<picture::Model> {
        let model = ActiveModel {
            property_id: Set(property_id),
            filename: Set(filename.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert picture: {}", e)))
    }

    pub async fn get_picture(&self, id: i32) -> AppResult<Option<picture::Model>> {
        Picture::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get picture: {}", e)))
    }

    /// Pictures of the given properties, oldest first.
    pub async fn pictures_for_properties(
        &self,
        property_ids: &[i32],
    ) -> AppResult<Vec<picture::Model>> {
        if property_ids.is_empty() {
            return Ok(Vec::new());
        }

        Picture::find()
            .filter(picture::Column::PropertyId.is_in(property_ids.to_vec()))
            .order_by_asc(picture::Column::CreatedAt)
            .order_by_asc(picture::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list pictures: {}", e)))
    }

    pub async fn pictures_for_property(&self, property_id: i32) -> AppResult<Vec<picture::Model>> {
        self.pictures_for_properties(&[property_id]).await
    }

    /// Delete picture records by ID.
    pub async fn delete_pictures(&self, ids: &[i32]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = Picture::delete_many()
            .filter(picture::Column::Id.is_in(ids.to_vec()))
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete pictures: {}", e)))?;

        Ok(result.rows_affected)
    }
}
