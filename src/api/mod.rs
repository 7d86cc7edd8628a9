//! API endpoint modules.

pub mod admin_options;
pub mod admin_properties;
pub mod health;
pub mod openapi;
pub mod properties;
pub mod resources;

pub use admin_options::configure_routes as configure_admin_option_routes;
pub use admin_properties::configure_routes as configure_admin_property_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use properties::configure_routes as configure_catalog_routes;
pub use resources::configure_routes as configure_resource_routes;

use actix_web::web;

/// Register every application route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(configure_health_routes)
            .configure(configure_resource_routes),
    )
    .configure(configure_admin_property_routes)
    .configure(configure_admin_option_routes)
    .configure(configure_catalog_routes);
}
