//! Back-office option (amenity) management.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AdminAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{OptionDeleted, OptionForm, Pagination, PaginationParams, PropertyOption};

use super::admin_properties::ADMIN_PAGE_SIZE;

/// Back-office option listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct OptionList {
    pub options: Vec<PropertyOption>,
    pub pagination: Pagination,
}

/// List options by name.
#[utoipa::path(
    get,
    path = "/admin/options",
    tag = "Admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number (25 per page)")
    ),
    responses(
        (status = 200, description = "Page of options", body = OptionList),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn list_options(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    query: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let page = query.page();
    let (options, total) = pool.list_options(page, ADMIN_PAGE_SIZE).await?;

    Ok(HttpResponse::Ok().json(OptionList {
        options: options.into_iter().map(PropertyOption::from).collect(),
        pagination: Pagination::new(page, ADMIN_PAGE_SIZE, total),
    }))
}

/// Create an option.
#[utoipa::path(
    post,
    path = "/admin/options",
    tag = "Admin",
    request_body = OptionForm,
    responses(
        (status = 201, description = "Option created", body = PropertyOption),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid name", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn create_option(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    body: web::Json<OptionForm>,
) -> AppResult<HttpResponse> {
    let form = OptionForm {
        name: body.normalized_name(),
    };
    form.validate()?;

    let created = pool.insert_option(&form.name).await?;
    info!(option_id = created.id, name = %created.name, "Option created");

    Ok(HttpResponse::Created().json(PropertyOption::from(created)))
}

/// Rename an option.
#[utoipa::path(
    put,
    path = "/admin/options/{id}",
    tag = "Admin",
    params(
        ("id" = i32, Path, description = "Option identifier")
    ),
    request_body = OptionForm,
    responses(
        (status = 200, description = "Option updated", body = PropertyOption),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Option not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid name", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn update_option(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<OptionForm>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let form = OptionForm {
        name: body.normalized_name(),
    };
    form.validate()?;

    let updated = pool.update_option(id, &form.name).await?;
    Ok(HttpResponse::Ok().json(PropertyOption::from(updated)))
}

/// Delete an option, detaching it from every property.
#[utoipa::path(
    delete,
    path = "/admin/options/{id}",
    tag = "Admin",
    params(
        ("id" = i32, Path, description = "Option identifier")
    ),
    responses(
        (status = 200, description = "Option deleted", body = OptionDeleted),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Option not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn delete_option(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let detached = pool.delete_option(id).await?;
    info!(option_id = id, detached, "Option deleted");

    Ok(HttpResponse::Ok().json(OptionDeleted { id, detached }))
}

/// Configure back-office option routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/admin/options")
            .route(web::get().to(list_options))
            .route(web::post().to(create_option)),
    )
    .service(
        web::resource("/admin/options/{id}")
            .route(web::put().to(update_option))
            .route(web::delete().to(delete_option)),
    );
}
