//! Back-office property management.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AdminAuth;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    AdminPropertyItem, Pagination, PaginationParams, PictureView, PropertyEditor, PropertyForm,
    PropertyOption,
};
use crate::services::pictures::{self, PictureUpload};
use crate::services::Storage;

/// Properties per back-office page.
pub const ADMIN_PAGE_SIZE: u32 = 25;

/// Back-office listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminPropertyList {
    pub properties: Vec<AdminPropertyItem>,
    pub pagination: Pagination,
}

/// Result of a property deletion.
#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyDeleted {
    pub id: i32,
    pub pictures_deleted: u64,
}

/// Pictures added by an upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct PicturesUploaded {
    pub pictures: Vec<PictureView>,
}

async fn editor(
    pool: &DbPool,
    storage: &Storage,
    id: Option<i32>,
    form: PropertyForm,
) -> AppResult<PropertyEditor> {
    let option_choices = pool
        .all_options()
        .await?
        .into_iter()
        .map(PropertyOption::from)
        .collect();

    let pictures = match id {
        Some(id) => pictures::views(storage, &pool.pictures_for_property(id).await?),
        None => Vec::new(),
    };

    Ok(PropertyEditor {
        id,
        form,
        option_choices,
        pictures,
    })
}

/// List all properties, soft-deleted ones included.
#[utoipa::path(
    get,
    path = "/admin/properties",
    tag = "Admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number (25 per page)")
    ),
    responses(
        (status = 200, description = "Page of properties", body = AdminPropertyList),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn list_properties(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    query: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let page = query.page();
    let (properties, total) = pool.list_properties_for_admin(page, ADMIN_PAGE_SIZE).await?;

    Ok(HttpResponse::Ok().json(AdminPropertyList {
        properties: properties.into_iter().map(AdminPropertyItem::from).collect(),
        pagination: Pagination::new(page, ADMIN_PAGE_SIZE, total),
    }))
}

/// Blank form with default values and the option choices.
#[utoipa::path(
    get,
    path = "/admin/properties/create",
    tag = "Admin",
    responses(
        (status = 200, description = "Creation form", body = PropertyEditor),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn new_property(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
) -> AppResult<HttpResponse> {
    let editor = editor(&pool, &storage, None, PropertyForm::default()).await?;
    Ok(HttpResponse::Ok().json(editor))
}

/// Create a property.
#[utoipa::path(
    post,
    path = "/admin/properties",
    tag = "Admin",
    request_body = PropertyForm,
    responses(
        (status = 201, description = "Property created", body = PropertyEditor),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn create_property(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    body: web::Json<PropertyForm>,
) -> AppResult<HttpResponse> {
    let form = body.into_inner().normalized();
    form.validate()?;

    let created = pool.insert_property(&form).await?;
    info!(property_id = created.id, title = %created.title, "Property created");

    let editor = editor(&pool, &storage, Some(created.id), form).await?;
    Ok(HttpResponse::Created().json(editor))
}

/// Edit form of an existing property.
#[utoipa::path(
    get,
    path = "/admin/properties/{id}",
    tag = "Admin",
    params(
        ("id" = i32, Path, description = "Property identifier")
    ),
    responses(
        (status = 200, description = "Edit form", body = PropertyEditor),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Property not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn edit_property(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let property = pool
        .get_property(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Property {}", id)))?;

    let option_ids = pool
        .options_for_property(id)
        .await?
        .into_iter()
        .map(|o| o.id)
        .collect();

    let editor = editor(&pool, &storage, Some(id), PropertyForm::from_model(&property, option_ids)).await?;
    Ok(HttpResponse::Ok().json(editor))
}

/// Update a property and re-sync its options.
#[utoipa::path(
    put,
    path = "/admin/properties/{id}",
    tag = "Admin",
    params(
        ("id" = i32, Path, description = "Property identifier")
    ),
    request_body = PropertyForm,
    responses(
        (status = 200, description = "Property updated", body = PropertyEditor),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Property not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid form", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn update_property(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<i32>,
    body: web::Json<PropertyForm>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let form = body.into_inner().normalized();
    form.validate()?;

    pool.update_property(id, &form).await?;
    info!(property_id = id, "Property updated");

    let editor = editor(&pool, &storage, Some(id), form).await?;
    Ok(HttpResponse::Ok().json(editor))
}

/// Delete a property's pictures and soft-delete the property.
#[utoipa::path(
    delete,
    path = "/admin/properties/{id}",
    tag = "Admin",
    params(
        ("id" = i32, Path, description = "Property identifier")
    ),
    responses(
        (status = 200, description = "Property deleted", body = PropertyDeleted),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Property not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn delete_property(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let pictures_deleted = pictures::delete_property(&pool, &storage, id).await?;

    Ok(HttpResponse::Ok().json(PropertyDeleted {
        id,
        pictures_deleted,
    }))
}

/// Upload pictures for a property.
///
/// Accepts multipart form data; every file part must be a jpg, jpeg, png, gif or webp image.
#[utoipa::path(
    post,
    path = "/admin/properties/{id}/pictures",
    tag = "Admin",
    params(
        ("id" = i32, Path, description = "Property identifier")
    ),
    responses(
        (status = 201, description = "Pictures stored", body = PicturesUploaded),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Property not found", body = crate::error::ErrorResponse),
        (status = 413, description = "Upload too large", body = crate::error::ErrorResponse),
        (status = 422, description = "Unsupported file type", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn upload_pictures(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    config: web::Data<Config>,
    path: web::Path<i32>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pool.get_property(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Property {}", id)))?;

    let max_size = config.storage.max_upload_size;
    let mut received = 0usize;
    let mut uploads = Vec::new();

    // Read and check the whole request before storing anything
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        // Plain form fields carry no filename
        let Some(filename) = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
        else {
            continue;
        };

        if Storage::picture_extension(&filename).is_none() {
            return Err(AppError::field(
                "pictures",
                format!("{} is not a jpg, jpeg, png, gif or webp image.", filename),
            ));
        }

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            received += chunk.len();
            if received > max_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "Upload exceeds {} bytes",
                    max_size
                )));
            }
            data.extend_from_slice(&chunk);
        }

        uploads.push(PictureUpload { filename, data });
    }

    if uploads.is_empty() {
        return Err(AppError::field("pictures", "Select at least one picture."));
    }

    let stored = pictures::attach_all(&pool, &storage, id, &uploads).await?;

    info!(property_id = id, count = stored.len(), "Pictures uploaded");

    Ok(HttpResponse::Created().json(PicturesUploaded {
        pictures: pictures::views(&storage, &stored),
    }))
}

/// Delete one picture.
#[utoipa::path(
    delete,
    path = "/admin/pictures/{id}",
    tag = "Admin",
    params(
        ("id" = i32, Path, description = "Picture identifier")
    ),
    responses(
        (status = 204, description = "Picture deleted"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Picture not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("admin_key" = [])
    )
)]
pub async fn delete_picture(
    _auth: AdminAuth,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    pictures::destroy_one(&pool, &storage, id).await?;
    info!(picture_id = id, "Picture deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Configure back-office property routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/admin/properties")
            .route(web::get().to(list_properties))
            .route(web::post().to(create_property)),
    )
    .service(web::resource("/admin/properties/create").route(web::get().to(new_property)))
    .service(
        web::resource("/admin/properties/{id}")
            .route(web::get().to(edit_property))
            .route(web::put().to(update_property))
            .route(web::delete().to(delete_property)),
    )
    .service(
        web::resource("/admin/properties/{id}/pictures").route(web::post().to(upload_pictures)),
    )
    .service(web::resource("/admin/pictures/{id}").route(web::delete().to(delete_picture)));
}
