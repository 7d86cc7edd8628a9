//! Database queries for properties and their option links.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entity::option::{self as amenity, Entity as AmenityOption};
use crate::entity::option_property::{self as link, Entity as OptionLink};
use crate::entity::property::{self, ActiveModel, Entity as Property};
use crate::error::{AppError, AppResult};
use crate::models::{Constraint, Pagination, PropertyForm, SearchCriteria};
use crate::services::slug;

use super::DbPool;

impl Constraint {
    /// Add this constraint's predicate to a condition.
    fn apply(self, condition: Condition) -> Condition {
        match self {
            Constraint::MaxPrice(price) => condition.add(property::Column::Price.lte(price)),
            Constraint::MinSurface(surface) => {
                condition.add(property::Column::Surface.gte(surface))
            }
            Constraint::MinRooms(rooms) => condition.add(property::Column::Rooms.gte(rooms)),
            Constraint::TitleContains(needle) => condition.add(
                property::Column::SearchTitle
                    .like(LikeExpr::new(contains_pattern(&needle)).escape('\\')),
            ),
        }
    }
}

/// `LIKE` pattern matching the folded needle anywhere, wildcards escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::from("%");
    for c in slug::search_key(needle).chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Public visibility: not soft-deleted, plus the requested constraints.
fn search_condition(criteria: &SearchCriteria) -> Condition {
    criteria
        .constraints()
        .into_iter()
        .fold(
            Condition::all().add(property::Column::DeletedAt.is_null()),
            |condition, constraint| constraint.apply(condition),
        )
}

/// Check that every option id exists, then replace the property's links.
async fn sync_options<C: ConnectionTrait>(
    db: &C,
    property_id: i32,
    option_ids: &[i32],
) -> AppResult<()> {
    if !option_ids.is_empty() {
        let found = AmenityOption::find()
            .filter(amenity::Column::Id.is_in(option_ids.to_vec()))
            .count(db)
            .await
            .map_err(|e| AppError::Database(format!("Failed to check options: {}", e)))?;

        if found != option_ids.len() as u64 {
            return Err(AppError::field(
                "options",
                "One or more selected options do not exist.",
            ));
        }
    }

    OptionLink::delete_many()
        .filter(link::Column::PropertyId.eq(property_id))
        .exec(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to detach options: {}", e)))?;

    if option_ids.is_empty() {
        return Ok(());
    }

    let links = option_ids.iter().map(|&option_id| link::ActiveModel {
        option_id: Set(option_id),
        property_id: Set(property_id),
    });

    OptionLink::insert_many(links)
        .exec_without_returning(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to attach options: {}", e)))?;

    Ok(())
}

fn apply_form(active: &mut ActiveModel, form: &PropertyForm) {
    active.title = Set(form.title.clone());
    active.search_title = Set(slug::search_key(&form.title));
    active.price = Set(form.price);
    active.surface = Set(form.surface);
    active.rooms = Set(form.rooms);
    active.bedrooms = Set(form.bedrooms);
    active.floor = Set(form.floor);
    active.city = Set(form.city.clone());
    active.postal_code = Set(form.postal_code.clone());
    active.sold = Set(form.sold);
}

impl DbPool {
    /// Filtered, newest-first page of visible properties with the total match count.
    pub async fn search_properties(
        &self,
        criteria: &SearchCriteria,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<property::Model>, u64)> {
        let select = Property::find().filter(search_condition(criteria));

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count properties: {}", e)))?;

        let properties = select
            .order_by_desc(property::Column::CreatedAt)
            .order_by_desc(property::Column::Id)
            .offset(Pagination::offset(page, per_page))
            .limit(u64::from(per_page))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to search properties: {}", e)))?;

        Ok((properties, total))
    }

    /// Most recent properties that are still for sale.
    pub async fn latest_available_properties(&self, limit: u64) -> AppResult<Vec<property::Model>> {
        Property::find()
            .filter(property::Column::DeletedAt.is_null())
            .filter(property::Column::Sold.eq(false))
            .order_by_desc(property::Column::CreatedAt)
            .order_by_desc(property::Column::Id)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list latest properties: {}", e)))
    }

    /// Get a visible (not soft-deleted) property by ID.
    pub async fn get_property(&self, id: i32) -> AppResult<Option<property::Model>> {
        Property::find_by_id(id)
            .filter(property::Column::DeletedAt.is_null())
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get property: {}", e)))
    }

    /// Back-office listing; soft-deleted properties are included.
    pub async fn list_properties_for_admin(
        &self,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<property::Model>, u64)> {
        let total = Property::find()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count properties: {}", e)))?;

        let properties = Property::find()
            .order_by_desc(property::Column::CreatedAt)
            .order_by_desc(property::Column::Id)
            .offset(Pagination::offset(page, per_page))
            .limit(u64::from(per_page))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list properties: {}", e)))?;

        Ok((properties, total))
    }

    /// Create a property and attach its options in one transaction.
    pub async fn insert_property(&self, form: &PropertyForm) -> AppResult<property::Model> {
        let now = Utc::now();
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let mut model = ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        apply_form(&mut model, form);

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert property: {}", e)))?;

        sync_options(&txn, created.id, &form.options).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit property: {}", e)))?;

        Ok(created)
    }

    /// Update a property's fields and re-sync its options atomically.
    pub async fn update_property(&self, id: i32, form: &PropertyForm) -> AppResult<property::Model> {
        let existing = self
            .get_property(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Property {}", id)))?;

        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let mut active: ActiveModel = existing.into();
        apply_form(&mut active, form);
        active.updated_at = Set(Utc::now());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to update property: {}", e)))?;

        sync_options(&txn, id, &form.options).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit property: {}", e)))?;

        Ok(updated)
    }

    /// Mark a property as deleted.
    pub async fn soft_delete_property(&self, id: i32) -> AppResult<property::Model> {
        let existing = self
            .get_property(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Property {}", id)))?;

        let now = Utc::now();
        let mut active: ActiveModel = existing.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete property: {}", e)))
    }

    /// Options attached to each of the given properties, sorted by name.
    pub async fn options_for_properties(
        &self,
        property_ids: &[i32],
    ) -> AppResult<HashMap<i32, Vec<amenity::Model>>> {
        let mut by_property: HashMap<i32, Vec<amenity::Model>> = HashMap::new();
        if property_ids.is_empty() {
            return Ok(by_property);
        }

        let rows = OptionLink::find()
            .filter(link::Column::PropertyId.is_in(property_ids.to_vec()))
            .find_also_related(AmenityOption)
            .order_by_asc(amenity::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load property options: {}", e)))?;

        for (link, option) in rows {
            if let Some(option) = option {
                by_property.entry(link.property_id).or_default().push(option);
            }
        }

        Ok(by_property)
    }

    /// Options attached to a single property.
    pub async fn options_for_property(&self, property_id: i32) -> AppResult<Vec<amenity::Model>> {
        let mut by_property = self.options_for_properties(&[property_id]).await?;
        Ok(by_property.remove(&property_id).unwrap_or_default())
    }
}
