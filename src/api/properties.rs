//! Public catalog handlers: home page, filtered listing, detail and contact.

use std::collections::HashMap;

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::entity::{picture, property};
use crate::error::{AppError, AppResult};
use crate::models::flash::FLASH_COOKIE;
use crate::models::{
    ContactForm, Flash, Pagination, PropertyDetail, PropertyOption, PropertySummary,
    SearchCriteria, SearchForm,
};
use crate::services::notification::Notifier;
use crate::services::slug::{self, DetailReference, SlugResolution};
use crate::services::{Storage, contact, pictures};

/// Properties per listing page.
pub const LISTING_PAGE_SIZE: u32 = 16;

/// Properties shown on the home page.
pub const HOME_LATEST_COUNT: u64 = 4;

/// Home page payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct HomeResponse {
    pub properties: Vec<PropertySummary>,
}

/// Listing page payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingResponse {
    pub properties: Vec<PropertySummary>,
    pub pagination: Pagination,
    /// The constraints that were applied
    pub input: SearchCriteria,
}

/// Build listing cards, using each property's first picture as cover.
async fn summaries(
    pool: &DbPool,
    storage: &Storage,
    properties: &[property::Model],
) -> AppResult<Vec<PropertySummary>> {
    let ids: Vec<i32> = properties.iter().map(|p| p.id).collect();
    let mut covers: HashMap<i32, picture::Model> = HashMap::new();
    for picture in pool.pictures_for_properties(&ids).await? {
        covers.entry(picture.property_id).or_insert(picture);
    }

    Ok(properties
        .iter()
        .map(|p| {
            let cover = covers.get(&p.id).map(|c| storage.url(&c.filename));
            PropertySummary::new(p, cover)
        })
        .collect())
}

/// Latest properties still for sale.
#[utoipa::path(
    get,
    path = "/",
    tag = "Catalog",
    responses(
        (status = 200, description = "Latest available properties", body = HomeResponse),
    )
)]
pub async fn home(pool: web::Data<DbPool>, storage: web::Data<Storage>) -> AppResult<HttpResponse> {
    let latest = pool.latest_available_properties(HOME_LATEST_COUNT).await?;
    let properties = summaries(&pool, &storage, &latest).await?;

    Ok(HttpResponse::Ok().json(HomeResponse { properties }))
}

/// Filtered, paginated listing.
#[utoipa::path(
    get,
    path = "/biens",
    tag = "Catalog",
    params(
        ("price" = Option<f64>, Query, description = "Maximum price"),
        ("surface" = Option<f64>, Query, description = "Minimum surface"),
        ("rooms" = Option<i32>, Query, description = "Minimum number of rooms"),
        ("title" = Option<String>, Query, description = "Case-insensitive title fragment"),
        ("page" = Option<u32>, Query, description = "Page number (16 per page)")
    ),
    responses(
        (status = 200, description = "Matching properties", body = ListingResponse),
        (status = 422, description = "Malformed search parameter", body = crate::error::ErrorResponse),
    )
)]
pub async fn index(
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    query: web::Query<SearchForm>,
) -> AppResult<HttpResponse> {
    let request = query.validate()?;

    let (found, total) = pool
        .search_properties(&request.criteria, request.page, LISTING_PAGE_SIZE)
        .await?;
    let properties = summaries(&pool, &storage, &found).await?;

    Ok(HttpResponse::Ok().json(ListingResponse {
        properties,
        pagination: Pagination::new(request.page, LISTING_PAGE_SIZE, total),
        input: request.criteria,
    }))
}

/// Property detail, addressed by `{slug}-{id}`.
///
/// A stale or wrong slug is answered with a redirect to the canonical path.
#[utoipa::path(
    get,
    path = "/biens/{reference}",
    tag = "Catalog",
    params(
        ("reference" = String, Path, description = "Slug and identifier, e.g. `maison-de-ville-12`")
    ),
    responses(
        (status = 200, description = "Property detail", body = PropertyDetail),
        (status = 302, description = "Redirect to the canonical path"),
        (status = 404, description = "Property not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn show(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    storage: web::Data<Storage>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let segment = path.into_inner();
    let reference = DetailReference::parse(&segment)
        .ok_or_else(|| AppError::NotFound(format!("Property {}", segment)))?;

    let property = pool
        .get_property(reference.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Property {}", reference.id)))?;

    if let SlugResolution::RedirectTo(location) = slug::resolve(&reference.slug, &property) {
        return Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .finish());
    }

    let options = pool
        .options_for_property(property.id)
        .await?
        .into_iter()
        .map(PropertyOption::from)
        .collect();
    let stored = pool.pictures_for_property(property.id).await?;
    let flash_cookie = req.cookie(FLASH_COOKIE);
    let flash = flash_cookie
        .as_ref()
        .and_then(|c| Flash::from_cookie_value(c.value()));

    let detail = PropertyDetail::new(&property, options, pictures::views(&storage, &stored), flash);

    // The flash is shown once
    let mut response = HttpResponse::Ok();
    if flash_cookie.is_some() {
        response.cookie(Flash::removal_cookie());
    }
    Ok(response.json(detail))
}

/// Path of a same-origin `Referer`, if any.
fn same_origin_referer(req: &HttpRequest) -> Option<String> {
    let referer = req.headers().get(header::REFERER)?.to_str().ok()?;
    let rest = referer
        .strip_prefix("https://")
        .or_else(|| referer.strip_prefix("http://"))?;
    let (authority, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, "/"),
    };

    let conn = req.connection_info();
    (authority.eq_ignore_ascii_case(conn.host()) && !path.starts_with("//"))
        .then(|| path.to_string())
}

/// Contact the agency about a property.
///
/// Always answers with a redirect back; the outcome travels in the flash cookie.
#[utoipa::path(
    post,
    path = "/biens/{id}/contact",
    tag = "Catalog",
    params(
        ("id" = i32, Path, description = "Property identifier")
    ),
    request_body(content = ContactForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Redirect back with a flash message"),
        (status = 404, description = "Property not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn contact(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    notifier: web::Data<Notifier>,
    path: web::Path<i32>,
    form: web::Form<ContactForm>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let property = pool
        .get_property(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Property {}", id)))?;

    let flash = match contact::notify(&notifier, &property, &form).await {
        Ok(_) => Flash::success("Your request has been sent, the agency will get back to you shortly."),
        Err(AppError::Validation(errors)) => Flash::errors(errors, form.trimmed().old_input()),
        Err(e) => return Err(e),
    };

    let location = same_origin_referer(&req).unwrap_or_else(|| slug::canonical_path(&property));

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(flash.to_cookie())
        .finish())
}

/// Configure public catalog routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource(slug::CATALOG_PATH).route(web::get().to(index)))
        .service(web::resource("/biens/{reference}").route(web::get().to(show)))
        .service(web::resource("/biens/{id}/contact").route(web::post().to(contact)));
}
