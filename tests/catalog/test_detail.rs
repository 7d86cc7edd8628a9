//! Detail pages addressed by slug and identifier.

use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::Value;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_canonical_slug_serves_detail() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "Belle maison de campagne", 230000.0, 120.0, 5).await;
    let option = seed_option(&ctx, "Jardin").await;
    ctx.pool
        .update_property(
            property.id,
            &agency_catalog_lib::models::PropertyForm {
                title: property.title.clone(),
                price: property.price,
                surface: property.surface,
                rooms: property.rooms,
                options: vec![option.id],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri(&format!("/biens/belle-maison-de-campagne-{}", property.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], property.id);
    assert_eq!(body["slug"], "belle-maison-de-campagne");
    assert_eq!(body["rooms"], 5);
    assert_eq!(body["options"][0]["name"], "Jardin");
    assert!(body["pictures"].as_array().unwrap().is_empty());
    assert!(body.get("flash").is_none());
}

#[actix_rt::test]
async fn test_wrong_slug_redirects_to_canonical_path() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "Belle maison de campagne", 230000.0, 120.0, 5).await;
    let app = create_test_app(&ctx).await;

    for stale in ["old-title", "belle-maison", "BELLE-MAISON-DE-CAMPAGNE"] {
        let req = test::TestRequest::get()
            .uri(&format!("/biens/{}-{}", stale, property.id))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND, "slug {stale}");
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            format!("/biens/belle-maison-de-campagne-{}", property.id)
        );
    }
}

#[actix_rt::test]
async fn test_unknown_property_is_not_found_whatever_the_slug() {
    let ctx = TestContext::new().await;
    seed_property(&ctx, "Belle maison de campagne", 230000.0, 120.0, 5).await;
    let app = create_test_app(&ctx).await;

    for uri in [
        "/biens/belle-maison-de-campagne-9999",
        "/biens/anything-9999",
        "/biens/no-identifier",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "NOT_FOUND");
    }
}

#[actix_rt::test]
async fn test_title_without_letters_uses_empty_slug() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "!!! ??? ...", 90000.0, 30.0, 1).await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri(&format!("/biens/-{}", property.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/biens/something-{}", property.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
        format!("/biens/-{}", property.id)
    );
}

#[actix_rt::test]
async fn test_soft_deleted_property_is_hidden() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "Appartement vendu", 90000.0, 30.0, 1).await;
    ctx.pool.soft_delete_property(property.id).await.unwrap();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri(&format!("/biens/appartement-vendu-{}", property.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_home_lists_latest_available() {
    let ctx = TestContext::new().await;
    for i in 0..5 {
        seed_property(&ctx, &format!("Maison numéro {}", i), 100000.0, 50.0, 3).await;
    }
    let sold = seed_property(&ctx, "Maison déjà vendue", 100000.0, 50.0, 3).await;
    ctx.pool
        .update_property(
            sold.id,
            &agency_catalog_lib::models::PropertyForm {
                title: sold.title.clone(),
                price: sold.price,
                sold: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let titles: Vec<&str> = body["properties"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec!["Maison numéro 4", "Maison numéro 3", "Maison numéro 2", "Maison numéro 1"]
    );
}
