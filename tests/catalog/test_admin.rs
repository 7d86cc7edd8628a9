//! Back-office management of properties, pictures and options.

use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::{Value, json};

use super::test_helpers::*;

fn admin_get(uri: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
}

/// Number of picture files on disk.
fn stored_files(ctx: &TestContext) -> usize {
    std::fs::read_dir(ctx.storage.root().join("pictures"))
        .map(|entries| entries.count())
        .unwrap_or(0)
}

fn property_json(title: &str, options: &[i32]) -> Value {
    json!({
        "title": title,
        "price": 180000.0,
        "surface": 72.0,
        "rooms": 4,
        "bedrooms": 2,
        "floor": 1,
        "city": "Brest",
        "postal_code": "29200",
        "sold": false,
        "options": options,
    })
}

#[actix_rt::test]
async fn test_admin_routes_require_key() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::get().uri("/admin/properties").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/admin/options")
        .insert_header(("X-Admin-Key", "wrong-key"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[actix_rt::test]
async fn test_create_form_defaults() {
    let ctx = TestContext::new().await;
    seed_option(&ctx, "Piscine").await;
    let app = create_test_app(&ctx).await;

    let resp = test::call_service(&app, admin_get("/admin/properties/create").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["form"]["surface"], 40.0);
    assert_eq!(body["form"]["rooms"], 3);
    assert_eq!(body["form"]["bedrooms"], 1);
    assert_eq!(body["form"]["floor"], 0);
    assert_eq!(body["form"]["city"], "Quimper");
    assert_eq!(body["form"]["postal_code"], "29000");
    assert_eq!(body["form"]["sold"], false);
    assert_eq!(body["option_choices"][0]["name"], "Piscine");
}

#[actix_rt::test]
async fn test_create_and_update_sync_options() {
    let ctx = TestContext::new().await;
    let balcon = seed_option(&ctx, "Balcon").await;
    let garage = seed_option(&ctx, "Garage").await;
    let cave = seed_option(&ctx, "Cave").await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/admin/properties")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(property_json("Appartement avec balcon", &[balcon.id, garage.id]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let id = body["id"].as_i64().unwrap() as i32;

    let names = |options: Vec<agency_catalog_lib::entity::option::Model>| {
        options.into_iter().map(|o| o.name).collect::<Vec<_>>()
    };
    assert_eq!(
        names(ctx.pool.options_for_property(id).await.unwrap()),
        vec!["Balcon", "Garage"]
    );

    let req = test::TestRequest::put()
        .uri(&format!("/admin/properties/{}", id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(property_json("Appartement avec cave", &[garage.id, cave.id]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(
        names(ctx.pool.options_for_property(id).await.unwrap()),
        vec!["Cave", "Garage"]
    );
    let stored = ctx.pool.get_property(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Appartement avec cave");

    let resp = test::call_service(&app, admin_get(&format!("/admin/properties/{}", id)).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let mut selected: Vec<i64> = body["form"]["options"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();
    selected.sort();
    let mut expected = vec![garage.id as i64, cave.id as i64];
    expected.sort();
    assert_eq!(selected, expected);
}

#[actix_rt::test]
async fn test_invalid_property_form_is_rejected() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let mut body = property_json("Short", &[]);
    body["surface"] = json!(0.0);
    let req = test::TestRequest::post()
        .uri("/admin/properties")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["title"].is_array());
    assert!(body["fields"]["surface"].is_array());
}

#[actix_rt::test]
async fn test_unknown_option_rolls_back_creation() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/admin/properties")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(property_json("Maison sans option", &[999]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["fields"]["options"].is_array());

    let (_, total) = ctx.pool.list_properties_for_admin(1, 25).await.unwrap();
    assert_eq!(total, 0);
}

#[actix_rt::test]
async fn test_picture_upload_and_delete() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "Maison avec photos", 200000.0, 80.0, 4).await;
    let app = create_test_app(&ctx).await;

    let (content_type, payload) = multipart_body(&[("salon.jpg", b"jpeg-bytes"), ("plan.PNG", b"png-bytes")]);
    let req = test::TestRequest::post()
        .uri(&format!("/admin/properties/{}/pictures", property.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let pictures = body["pictures"].as_array().unwrap();
    assert_eq!(pictures.len(), 2);
    assert!(pictures[0]["url"].as_str().unwrap().starts_with("/storage/pictures/"));

    let stored = ctx.pool.pictures_for_property(property.id).await.unwrap();
    assert_eq!(stored.len(), 2);
    for picture in &stored {
        assert!(ctx.storage.exists(&picture.filename).await.unwrap());
    }

    // Detail page lists them with their URLs
    let req = test::TestRequest::get()
        .uri(&format!("/biens/maison-avec-photos-{}", property.id))
        .to_request();
    let detail: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(detail["pictures"].as_array().unwrap().len(), 2);

    // Single picture deletion removes record and file
    let req = test::TestRequest::delete()
        .uri(&format!("/admin/pictures/{}", stored[0].id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(!ctx.storage.exists(&stored[0].filename).await.unwrap());
    assert_eq!(ctx.pool.pictures_for_property(property.id).await.unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_upload_rejects_other_file_types() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "Maison avec photos", 200000.0, 80.0, 4).await;
    let app = create_test_app(&ctx).await;

    let (content_type, payload) = multipart_body(&[("bail.pdf", b"%PDF")]);
    let req = test::TestRequest::post()
        .uri(&format!("/admin/properties/{}/pictures", property.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(ctx.pool.pictures_for_property(property.id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_rejected_upload_attaches_nothing() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "Maison avec photos", 200000.0, 80.0, 4).await;
    let app = create_test_app(&ctx).await;

    // A valid picture followed by a file of another type
    let (content_type, payload) = multipart_body(&[("salon.jpg", b"jpeg-bytes"), ("bail.pdf", b"%PDF")]);
    let req = test::TestRequest::post()
        .uri(&format!("/admin/properties/{}/pictures", property.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(ctx.pool.pictures_for_property(property.id).await.unwrap().is_empty());
    assert_eq!(stored_files(&ctx), 0);

    // A valid picture followed by one that goes over the size limit
    let oversized = vec![0u8; ctx.config.storage.max_upload_size];
    let (content_type, payload) =
        multipart_body(&[("salon.jpg", b"jpeg-bytes"), ("facade.png", oversized.as_slice())]);
    let req = test::TestRequest::post()
        .uri(&format!("/admin/properties/{}/pictures", property.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(ctx.pool.pictures_for_property(property.id).await.unwrap().is_empty());
    assert_eq!(stored_files(&ctx), 0);
}

#[actix_rt::test]
async fn test_delete_property_removes_pictures_and_hides_it() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "Maison à démolir", 50000.0, 60.0, 3).await;
    let app = create_test_app(&ctx).await;

    let (content_type, payload) = multipart_body(&[("facade.webp", b"webp-bytes")]);
    let req = test::TestRequest::post()
        .uri(&format!("/admin/properties/{}/pictures", property.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    let pictures = ctx.pool.pictures_for_property(property.id).await.unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/properties/{}", property.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["pictures_deleted"], 1);

    assert!(ctx.pool.pictures_for_property(property.id).await.unwrap().is_empty());
    assert!(!ctx.storage.exists(&pictures[0].filename).await.unwrap());

    let req = test::TestRequest::get()
        .uri(&format!("/biens/maison-a-demolir-{}", property.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // Still listed in the back-office, marked as deleted
    let resp = test::call_service(&app, admin_get("/admin/properties").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["properties"][0]["id"], property.id);
    assert!(body["properties"][0]["deleted_at"].is_string());
}

#[actix_rt::test]
async fn test_deleting_option_detaches_it_from_every_property() {
    let ctx = TestContext::new().await;
    let parking = seed_option(&ctx, "Parking").await;
    let terrasse = seed_option(&ctx, "Terrasse").await;
    let first = seed_property_with_options(&ctx, "Maison avec parking", vec![parking.id]).await;
    let second =
        seed_property_with_options(&ctx, "Loft avec terrasse", vec![parking.id, terrasse.id]).await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/options/{}", parking.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detached"], 2);

    assert!(ctx.pool.get_property(first.id).await.unwrap().is_some());
    assert!(ctx.pool.get_property(second.id).await.unwrap().is_some());
    assert!(ctx.pool.options_for_property(first.id).await.unwrap().is_empty());
    assert_eq!(ctx.pool.options_for_property(second.id).await.unwrap(), vec![terrasse]);
    assert!(ctx.pool.get_option(parking.id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_option_crud() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/admin/options")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({"name": "  Ascenseur "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["name"], "Ascenseur");

    let req = test::TestRequest::put()
        .uri(&format!("/admin/options/{}", created["id"]))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({"name": "Ascenseur privatif"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/admin/options")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({"name": "A"}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let resp = test::call_service(&app, admin_get("/admin/options").to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["options"].as_array().unwrap().len(), 1);
    assert_eq!(body["options"][0]["name"], "Ascenseur privatif");
    assert_eq!(body["pagination"]["total"], 1);

    let req = test::TestRequest::delete()
        .uri("/admin/options/4242")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
