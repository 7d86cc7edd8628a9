//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::config::ADMIN_KEY_HEADER;
use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Agency Catalog Server",
        version = "0.1.0",
        description = "Real-estate catalog: property search and detail, contact requests, a JSON property resource and the back-office"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Public catalog
        api::properties::home,
        api::properties::index,
        api::properties::show,
        api::properties::contact,
        // JSON resource
        api::resources::list_properties,
        api::resources::get_property,
        // Back-office
        api::admin_properties::list_properties,
        api::admin_properties::new_property,
        api::admin_properties::create_property,
        api::admin_properties::edit_property,
        api::admin_properties::update_property,
        api::admin_properties::delete_property,
        api::admin_properties::upload_pictures,
        api::admin_properties::delete_picture,
        api::admin_options::list_options,
        api::admin_options::create_option,
        api::admin_options::update_option,
        api::admin_options::delete_option,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::Pagination,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Catalog
            models::PropertySummary,
            models::PropertyDetail,
            models::PictureView,
            models::PropertyOption,
            models::SearchCriteria,
            models::ContactForm,
            models::Flash,
            api::properties::HomeResponse,
            api::properties::ListingResponse,
            // Resources
            models::PropertyResource,
            api::resources::PropertyCollection,
            api::resources::PropertyItem,
            // Back-office
            models::AdminPropertyItem,
            models::PropertyForm,
            models::PropertyEditor,
            models::OptionForm,
            models::OptionDeleted,
            api::admin_properties::AdminPropertyList,
            api::admin_properties::PropertyDeleted,
            api::admin_properties::PicturesUploaded,
            api::admin_options::OptionList,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Catalog", description = "Public property search, detail and contact"),
        (name = "Resources", description = "JSON property resource"),
        (name = "Admin", description = "Back-office management of properties, pictures and options")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add the admin key security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new(ADMIN_KEY_HEADER),
                    ),
                ),
            );
        }
    }
}
