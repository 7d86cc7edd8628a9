//! Property DTOs for the public catalog, the JSON resource and the back-office.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::flash::Flash;
use super::option::PropertyOption;
use crate::config::{ApiSettings, PropertyField};
use crate::entity::{picture, property};
use crate::services::slug;

/// A stored picture with its public URL.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PictureView {
    pub id: i32,
    pub filename: String,
    pub url: String,
}

impl PictureView {
    pub fn new(model: &picture::Model, url: String) -> Self {
        PictureView {
            id: model.id,
            filename: model.filename.clone(),
            url,
        }
    }
}

/// Listing card.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PropertySummary {
    pub id: i32,
    pub title: String,
    pub slug: String,
    /// Canonical detail path
    pub path: String,
    pub price: Decimal,
    pub surface: Decimal,
    pub rooms: i32,
    pub city: String,
    pub postal_code: String,
    pub sold: bool,
    /// URL of the first picture, if any
    pub cover: Option<String>,
}

impl PropertySummary {
    pub fn new(model: &property::Model, cover: Option<String>) -> Self {
        let slug = slug::slug_for(&model.title);
        PropertySummary {
            id: model.id,
            path: slug::detail_path(&slug, model.id),
            slug,
            title: model.title.clone(),
            price: model.price,
            surface: model.surface,
            rooms: model.rooms,
            city: model.city.clone(),
            postal_code: model.postal_code.clone(),
            sold: model.sold,
            cover,
        }
    }
}

/// Full detail page payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PropertyDetail {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub path: String,
    pub price: Decimal,
    pub surface: Decimal,
    pub rooms: i32,
    pub bedrooms: i32,
    pub floor: i32,
    pub city: String,
    pub postal_code: String,
    pub sold: bool,
    pub created_at: DateTime<Utc>,
    pub options: Vec<PropertyOption>,
    pub pictures: Vec<PictureView>,
    /// Result of the last contact submission, shown once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

impl PropertyDetail {
    pub fn new(
        model: &property::Model,
        options: Vec<PropertyOption>,
        pictures: Vec<PictureView>,
        flash: Option<Flash>,
    ) -> Self {
        let slug = slug::slug_for(&model.title);
        PropertyDetail {
            id: model.id,
            path: slug::detail_path(&slug, model.id),
            slug,
            title: model.title.clone(),
            price: model.price,
            surface: model.surface,
            rooms: model.rooms,
            bedrooms: model.bedrooms,
            floor: model.floor,
            city: model.city.clone(),
            postal_code: model.postal_code.clone(),
            sold: model.sold,
            created_at: model.created_at,
            options,
            pictures,
            flash,
        }
    }
}

/// JSON resource item; only the configured fields are present.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct PropertyResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<PropertyOption>>,
}

impl PropertyResource {
    /// Project a property onto the exposed field set.
    ///
    /// `options` is only consulted when the field set includes it.
    pub fn project(
        model: &property::Model,
        options: Option<Vec<PropertyOption>>,
        api: &ApiSettings,
    ) -> Self {
        let pick = |field: PropertyField| api.exposes(field);
        PropertyResource {
            id: pick(PropertyField::Id).then_some(model.id),
            title: pick(PropertyField::Title).then(|| model.title.clone()),
            price: pick(PropertyField::Price).then_some(model.price),
            surface: pick(PropertyField::Surface).then_some(model.surface),
            rooms: pick(PropertyField::Rooms).then_some(model.rooms),
            city: pick(PropertyField::City).then(|| model.city.clone()),
            options: if pick(PropertyField::Options) {
                Some(options.unwrap_or_default())
            } else {
                None
            },
        }
    }
}

/// Back-office listing row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminPropertyItem {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
    pub surface: Decimal,
    pub city: String,
    pub sold: bool,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<property::Model> for AdminPropertyItem {
    fn from(model: property::Model) -> Self {
        AdminPropertyItem {
            id: model.id,
            title: model.title,
            price: model.price,
            surface: model.surface,
            city: model.city,
            sold: model.sold,
            created_at: model.created_at,
            deleted_at: model.deleted_at,
        }
    }
}

/// Back-office create/update body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct PropertyForm {
    #[validate(length(min = 8, max = 255, message = "The title must be between 8 and 255 characters."))]
    pub title: String,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(custom(function = "validate_surface"))]
    pub surface: Decimal,
    #[validate(range(min = 0, message = "The number of rooms must be at least 0."))]
    pub rooms: i32,
    #[validate(range(min = 0, message = "The number of bedrooms must be at least 0."))]
    pub bedrooms: i32,
    pub floor: i32,
    #[validate(length(min = 2, message = "The city must be at least 2 characters."))]
    pub city: String,
    #[validate(length(min = 3, message = "The postal code must be at least 3 characters."))]
    pub postal_code: String,
    pub sold: bool,
    /// Identifiers of the attached options
    pub options: Vec<i32>,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price >= Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("range").with_message("The price must be at least 0.".into()))
    }
}

fn validate_surface(surface: &Decimal) -> Result<(), ValidationError> {
    if *surface > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("range")
            .with_message("The surface must be greater than 0.".into()))
    }
}

impl Default for PropertyForm {
    fn default() -> Self {
        PropertyForm {
            title: String::new(),
            price: Decimal::ZERO,
            surface: Decimal::from(40),
            rooms: 3,
            bedrooms: 1,
            floor: 0,
            city: "Quimper".to_string(),
            postal_code: "29000".to_string(),
            sold: false,
            options: Vec::new(),
        }
    }
}

impl PropertyForm {
    /// Pre-fill the form from a stored property.
    pub fn from_model(model: &property::Model, options: Vec<i32>) -> Self {
        PropertyForm {
            title: model.title.clone(),
            price: model.price,
            surface: model.surface,
            rooms: model.rooms,
            bedrooms: model.bedrooms,
            floor: model.floor,
            city: model.city.clone(),
            postal_code: model.postal_code.clone(),
            sold: model.sold,
            options,
        }
    }

    /// Trim text fields and deduplicate option ids.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.city = self.city.trim().to_string();
        self.postal_code = self.postal_code.trim().to_string();
        self.options.sort_unstable();
        self.options.dedup();
        self
    }
}

/// Form payload for the admin create/edit screens.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PropertyEditor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub form: PropertyForm,
    pub option_choices: Vec<PropertyOption>,
    pub pictures: Vec<PictureView>,
}
