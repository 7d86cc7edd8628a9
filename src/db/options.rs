//! Database queries for options (amenities).

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::entity::option::{self as amenity, ActiveModel, Entity as AmenityOption};
use crate::entity::option_property::{self as link, Entity as OptionLink};
use crate::error::{AppError, AppResult};
use crate::models::Pagination;

use super::DbPool;

impl DbPool {
    /// Page of options ordered by name.
    pub async fn list_options(
        &self,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<amenity::Model>, u64)> {
        let total = AmenityOption::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count options: {}", e)))?;

        let options = AmenityOption::find()
            .order_by_asc(amenity::Column::Name)
            .order_by_asc(amenity::Column::Id)
            .offset(Pagination::offset(page, per_page))
            .limit(u64::from(per_page))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list options: {}", e)))?;

        Ok((options, total))
    }

    /// Every option, for property form choices.
    pub async fn all_options(&self) -> AppResult<Vec<amenity::Model>> {
        AmenityOption::find()
            .order_by_asc(amenity::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list options: {}", e)))
    }

    pub async fn get_option(&self, id: i32) -> AppResult<Option<amenity::Model>> {
        AmenityOption::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get option: {}", e)))
    }

    pub async fn insert_option(&self, name: &str) -> AppResult<amenity::Model> {
        let now = Utc::now();
        let model = ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert option: {}", e)))
    }

    pub async fn update_option(&self, id: i32, name: &str) -> AppResult<amenity::Model> {
        let existing = self
            .get_option(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Option {}", id)))?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(Utc::now());

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update option: {}", e)))
    }

    /// Detach an option from every property, then delete it.
    ///
    /// Returns the number of properties it was detached from.
    pub async fn delete_option(&self, id: i32) -> AppResult<u64> {
        self.get_option(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Option {}", id)))?;

        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let detached = OptionLink::delete_many()
            .filter(link::Column::OptionId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to detach option: {}", e)))?
            .rows_affected;

        AmenityOption::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete option: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit option deletion: {}", e)))?;

        Ok(detached)
    }
}
