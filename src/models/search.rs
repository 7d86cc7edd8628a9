//! Catalog search parameters.
//!
//! Raw query strings are parsed into an explicit set of optional constraints;
//! malformed values are rejected with field errors instead of being ignored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult, FieldErrors};

/// Raw listing query string. Empty values count as absent.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SearchForm {
    /// Maximum price
    pub price: Option<String>,
    /// Minimum surface
    pub surface: Option<String>,
    /// Minimum number of rooms
    pub rooms: Option<String>,
    /// Case-insensitive title fragment
    pub title: Option<String>,
    pub page: Option<String>,
}

/// Validated search constraints; `None` imposes no predicate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct SearchCriteria {
    #[serde(rename = "price", skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
    #[serde(rename = "surface", skip_serializing_if = "Option::is_none")]
    pub min_surface: Option<Decimal>,
    #[serde(rename = "rooms", skip_serializing_if = "Option::is_none")]
    pub min_rooms: Option<i32>,
    #[serde(rename = "title", skip_serializing_if = "Option::is_none")]
    pub title_contains: Option<String>,
}

/// A single listing predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    MaxPrice(Decimal),
    MinSurface(Decimal),
    MinRooms(i32),
    TitleContains(String),
}

impl SearchCriteria {
    /// Present constraints, in a stable order.
    pub fn constraints(&self) -> Vec<Constraint> {
        let mut constraints = Vec::new();
        if let Some(price) = self.max_price {
            constraints.push(Constraint::MaxPrice(price));
        }
        if let Some(surface) = self.min_surface {
            constraints.push(Constraint::MinSurface(surface));
        }
        if let Some(rooms) = self.min_rooms {
            constraints.push(Constraint::MinRooms(rooms));
        }
        if let Some(ref title) = self.title_contains {
            constraints.push(Constraint::TitleContains(title.clone()));
        }
        constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints().is_empty()
    }
}

/// Validated listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub criteria: SearchCriteria,
    pub page: u32,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_amount(field: &str, label: &str, raw: &str, errors: &mut FieldErrors) -> Option<Decimal> {
    match raw.parse::<Decimal>() {
        Ok(value) if value >= Decimal::ZERO => Some(value),
        Ok(_) => {
            errors.insert(field.to_string(), vec![format!("The {} must be at least 0.", label)]);
            None
        }
        _ => {
            errors.insert(field.to_string(), vec![format!("The {} must be a number.", label)]);
            None
        }
    }
}

impl SearchForm {
    /// Validate the raw query into typed constraints.
    pub fn validate(&self) -> AppResult<SearchRequest> {
        let mut errors = FieldErrors::new();

        let max_price = present(&self.price)
            .and_then(|raw| parse_amount("price", "price", raw, &mut errors));
        let min_surface = present(&self.surface)
            .and_then(|raw| parse_amount("surface", "surface", raw, &mut errors));

        let min_rooms = present(&self.rooms).and_then(|raw| match raw.parse::<i32>() {
            Ok(rooms) if rooms >= 0 => Some(rooms),
            Ok(_) => {
                errors.insert(
                    "rooms".to_string(),
                    vec!["The number of rooms must be at least 0.".to_string()],
                );
                None
            }
            Err(_) => {
                errors.insert(
                    "rooms".to_string(),
                    vec!["The number of rooms must be an integer.".to_string()],
                );
                None
            }
        });

        let title_contains = present(&self.title).map(str::to_string);

        let page = match present(&self.page) {
            None => 1,
            Some(raw) => match raw.parse::<u32>() {
                Ok(page) if page >= 1 => page,
                _ => {
                    errors.insert(
                        "page".to_string(),
                        vec!["The page must be a positive integer.".to_string()],
                    );
                    1
                }
            },
        };

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        Ok(SearchRequest {
            criteria: SearchCriteria {
                max_price,
                min_surface,
                min_rooms,
                title_contains,
            },
            page,
        })
    }
}
