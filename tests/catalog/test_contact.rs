//! Contact requests from detail pages.

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::test;
use agency_catalog_lib::models::Flash;
use agency_catalog_lib::models::flash::FLASH_COOKIE;
use serde_json::Value;

use super::test_helpers::*;

fn contact_form(email: &str) -> Vec<(&'static str, String)> {
    vec![
        ("firstname", "John".to_string()),
        ("lastname", "Doe".to_string()),
        ("phone", "".to_string()),
        ("email", email.to_string()),
        ("message", "Is the garden south-facing?".to_string()),
    ]
}

fn flash_cookie(resp: &ServiceResponse) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == FLASH_COOKIE)
        .map(|c| c.into_owned())
        .expect("flash cookie not set")
}

fn location(resp: &ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .expect("missing Location")
        .to_str()
        .unwrap()
        .to_string()
}

#[actix_rt::test]
async fn test_invalid_email_redirects_back_with_errors() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "Maison avec jardin", 250000.0, 90.0, 4).await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri(&format!("/biens/{}/contact", property.id))
        .set_form(contact_form("doe"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        location(&resp),
        format!("/biens/maison-avec-jardin-{}", property.id)
    );

    let cookie = flash_cookie(&resp);
    let flash = Flash::from_cookie_value(cookie.value()).unwrap();
    assert!(flash.success.is_none());
    assert!(flash.errors.contains_key("email"));
    assert_eq!(flash.errors.len(), 1);
    assert_eq!(flash.old.get("email").map(String::as_str), Some("doe"));
    assert_eq!(flash.old.get("firstname").map(String::as_str), Some("John"));

    assert!(ctx.queued().is_empty(), "nothing must be dispatched");

    // The next detail request shows the errors once, then clears them
    let req = test::TestRequest::get()
        .uri(&location(&resp))
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = flash_cookie(&resp);
    assert_eq!(cleared.value(), "");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["flash"]["old"]["email"], "doe");
    assert!(body["flash"]["errors"]["email"].is_array());
}

#[actix_rt::test]
async fn test_valid_request_is_queued_once_for_recipient() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "Maison avec jardin", 250000.0, 90.0, 4).await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri(&format!("/biens/{}/contact", property.id))
        .set_form(contact_form("doe@demo.fr"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let flash = Flash::from_cookie_value(flash_cookie(&resp).value()).unwrap();
    assert!(flash.success.is_some());
    assert!(flash.errors.is_empty());

    let queued = ctx.queued();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].to, TEST_RECIPIENT);
    assert_eq!(queued[0].reply_to.as_deref(), Some("doe@demo.fr"));
    assert!(queued[0].subject.contains("Maison avec jardin"));
    assert!(queued[0].body.contains("John Doe"));
}

#[actix_rt::test]
async fn test_redirects_to_same_origin_referer() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "Maison avec jardin", 250000.0, 90.0, 4).await;
    let app = create_test_app(&ctx).await;

    let referer = format!("http://agence.local/biens/old-slug-{}", property.id);
    let req = test::TestRequest::post()
        .uri(&format!("/biens/{}/contact", property.id))
        .insert_header((header::HOST, "agence.local"))
        .insert_header((header::REFERER, referer))
        .set_form(contact_form("doe@demo.fr"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), format!("/biens/old-slug-{}", property.id));

    let req = test::TestRequest::post()
        .uri(&format!("/biens/{}/contact", property.id))
        .insert_header((header::HOST, "agence.local"))
        .insert_header((header::REFERER, "https://elsewhere.example/"))
        .set_form(contact_form("doe@demo.fr"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        location(&resp),
        format!("/biens/maison-avec-jardin-{}", property.id)
    );

    assert_eq!(ctx.queued().len(), 2);
}

#[actix_rt::test]
async fn test_contact_for_unknown_property_is_not_found() {
    let ctx = TestContext::new().await;
    let app = create_test_app(&ctx).await;

    let req = test::TestRequest::post()
        .uri("/biens/4242/contact")
        .set_form(contact_form("doe@demo.fr"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(ctx.queued().is_empty());
}

#[actix_rt::test]
async fn test_long_message_keeps_flash_within_cookie_limit() {
    let ctx = TestContext::new().await;
    let property = seed_property(&ctx, "Maison avec jardin", 250000.0, 90.0, 4).await;
    let app = create_test_app(&ctx).await;

    let mut form = contact_form("doe");
    form[4].1 = "Bonjour, la maison est-elle disponible ? ".repeat(120);
    let req = test::TestRequest::post()
        .uri(&format!("/biens/{}/contact", property.id))
        .set_form(form)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let set_cookie = resp
        .headers()
        .get_all(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string())
        .find(|v| v.starts_with(&format!("{}=", FLASH_COOKIE)))
        .expect("flash cookie not set");
    assert!(set_cookie.len() < 4096, "cookie is {} bytes", set_cookie.len());

    let flash = Flash::from_cookie_value(flash_cookie(&resp).value()).unwrap();
    assert!(flash.errors.contains_key("email"));
    assert!(flash.errors.contains_key("message"));
    assert_eq!(flash.old.get("email").map(String::as_str), Some("doe"));
    assert!(ctx.queued().is_empty());
}
