//! JSON property resource.
//!
//! The exposed fields come from configuration; options are only loaded
//! when the field set asks for them.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{Config, PropertyField};
use crate::db::DbPool;
use crate::entity::{option, property};
use crate::error::{AppError, AppResult};
use crate::models::{
    Pagination, PaginationParams, PropertyOption, PropertyResource, SearchCriteria,
};

/// Items per resource page.
pub const RESOURCE_PAGE_SIZE: u32 = 5;

/// Paginated resource collection.
#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyCollection {
    pub data: Vec<PropertyResource>,
    pub pagination: Pagination,
}

/// Single resource item.
#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyItem {
    pub property: PropertyResource,
}

async fn project_all(
    pool: &DbPool,
    config: &Config,
    properties: &[property::Model],
) -> AppResult<Vec<PropertyResource>> {
    let mut options: HashMap<i32, Vec<option::Model>> = if config.api.exposes(PropertyField::Options) {
        let ids: Vec<i32> = properties.iter().map(|p| p.id).collect();
        pool.options_for_properties(&ids).await?
    } else {
        HashMap::new()
    };

    Ok(properties
        .iter()
        .map(|p| {
            let attached = options
                .remove(&p.id)
                .map(|list| list.into_iter().map(PropertyOption::from).collect());
            PropertyResource::project(p, attached, &config.api)
        })
        .collect())
}

/// List properties.
#[utoipa::path(
    get,
    path = "/api/properties",
    tag = "Resources",
    params(
        ("page" = Option<u32>, Query, description = "Page number (5 per page)")
    ),
    responses(
        (status = 200, description = "Page of properties", body = PropertyCollection),
    )
)]
pub async fn list_properties(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    query: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let page = query.page();
    let (properties, total) = pool
        .search_properties(&SearchCriteria::default(), page, RESOURCE_PAGE_SIZE)
        .await?;

    let data = project_all(&pool, &config, &properties).await?;

    Ok(HttpResponse::Ok().json(PropertyCollection {
        data,
        pagination: Pagination::new(page, RESOURCE_PAGE_SIZE, total),
    }))
}

/// Get one property.
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    tag = "Resources",
    params(
        ("id" = i32, Path, description = "Property identifier")
    ),
    responses(
        (status = 200, description = "Property", body = PropertyItem),
        (status = 404, description = "Property not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_property(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let property = pool
        .get_property(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Property {}", id)))?;

    let property = project_all(&pool, &config, std::slice::from_ref(&property))
        .await?
        .pop()
        .ok_or_else(|| AppError::NotFound(format!("Property {}", id)))?;

    Ok(HttpResponse::Ok().json(PropertyItem { property }))
}

/// Configure resource routes (mounted under `/api`).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/properties").route(web::get().to(list_properties)))
        .service(web::resource("/properties/{id}").route(web::get().to(get_property)));
}
