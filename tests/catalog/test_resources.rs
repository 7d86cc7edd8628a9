//! JSON property resource and health endpoints.

use actix_web::http::StatusCode;
use actix_web::test;
use agency_catalog_lib::config::{ApiSettings, PropertyField};
use serde_json::Value;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_collection_exposes_default_fields() {
    let ctx = TestContext::new().await;
    let garage = seed_option(&ctx, "Garage").await;
    let with_garage = seed_property_with_options(&ctx, "Maison avec garage", vec![garage.id]).await;
    for i in 0..5 {
        seed_property(&ctx, &format!("Appartement {}", i), 90000.0, 40.0, 2).await;
    }
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get().uri("/api/properties").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(body["pagination"]["limit"], 5);
    assert_eq!(body["pagination"]["total"], 6);
    assert_eq!(body["pagination"]["total_pages"], 2);

    let newest = &data[0];
    assert_eq!(newest["title"], "Appartement 4");
    assert!(newest["id"].is_number());
    assert_eq!(newest["options"], serde_json::json!([]));
    assert!(newest.get("price").is_none());
    assert!(newest.get("city").is_none());

    let req = test::TestRequest::get().uri("/api/properties?page=2").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], with_garage.id);
    assert_eq!(data[0]["options"][0]["name"], "Garage");
}

#[actix_rt::test]
async fn test_configured_fields_replace_defaults() {
    let ctx = TestContext::with_api(ApiSettings {
        property_fields: vec![PropertyField::Id, PropertyField::Price],
    })
    .await;
    let garage = seed_option(&ctx, "Garage").await;
    seed_property_with_options(&ctx, "Maison avec garage", vec![garage.id]).await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get().uri("/api/properties").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let item = &body["data"][0];
    assert!(item["price"].is_number());
    assert!(item.get("title").is_none());
    assert!(item.get("options").is_none());
}

#[actix_rt::test]
async fn test_single_property_resource() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "Studio en centre-ville", 75000.0, 22.0, 1).await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/properties/{}", property.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["property"]["id"], property.id);
    assert_eq!(body["property"]["title"], "Studio en centre-ville");

    let req = test::TestRequest::get().uri("/api/properties/9999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    ctx.pool.soft_delete_property(property.id).await.unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/properties/{}", property.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");

    let req = test::TestRequest::get().uri("/api/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["database"], "connected");
    assert_eq!(body["backend"], "sqlite");
}
