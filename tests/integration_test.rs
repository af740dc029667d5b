// End-to-end post/redirect/get flows through the demo handlers
use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use chrono::Duration;
use std::sync::Arc;

use flashform::handlers::{configure_services, FormsPage, CONTACT_FORM, NEWSLETTER_FORM};
use flashform::models::{Field, NO_ACTION};
use flashform::session::SessionManager;
use flashform::testing::{set_cookie_values, ManualClock, RequestBuilder, TestFixtures};

fn manager(clock: Arc<ManualClock>) -> web::Data<SessionManager<Field>> {
    web::Data::new(TestFixtures::manager_with_clock(clock))
}

fn form_post(uri: &str, body: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(body.to_string())
}

fn page_request(token: Option<&str>) -> test::TestRequest {
    let builder = RequestBuilder::new().uri("/contact");
    match token {
        Some(token) => builder.cookie("s", token).to_test_request(),
        None => builder.to_test_request(),
    }
}

fn raw_set_cookies<B>(resp: &ServiceResponse<B>) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .filter_map(|value| value.to_str().ok())
        .map(ToString::to_string)
        .collect()
}

fn session_token<B>(resp: &ServiceResponse<B>) -> String {
    let values = set_cookie_values(resp.headers(), "s");
    assert_eq!(values.len(), 1, "expected one session cookie");
    values[0].clone()
}

fn assert_cookie_cleared<B>(resp: &ServiceResponse<B>) {
    let raw = raw_set_cookies(resp);
    assert!(
        raw.iter()
            .any(|c| c.starts_with("s=;") && c.contains("HttpOnly") && c.contains("Max-Age=-1")),
        "no clearing cookie in {raw:?}"
    );
}

#[actix_web::test]
async fn test_rejected_submission_is_shown_once() {
    let sessions = manager(Arc::new(ManualClock::default()));
    let app = test::init_service(
        App::new()
            .app_data(sessions.clone())
            .configure(configure_services),
    )
    .await;

    let resp = test::call_service(
        &app,
        form_post("/contact", "name=Ada&email=ada&message=").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/contact");
    let token = session_token(&resp);
    assert_eq!(token.len(), 24);
    let set_cookie = &raw_set_cookies(&resp)[0];
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=120"));

    let resp = test::call_service(&app, page_request(Some(&token)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_cookie_cleared(&resp);
    let page: FormsPage = test::read_body_json(resp).await;

    assert_eq!(page.action, CONTACT_FORM);
    assert_eq!(page.notice, None);
    let contact = &page.forms[&CONTACT_FORM];
    assert_eq!(contact.fields[0].value, "Ada");
    assert_eq!(
        contact.fields[1].error.as_deref(),
        Some("Enter a valid email address")
    );
    assert_eq!(page.forms[&NEWSLETTER_FORM].fields[0].value, "");
    assert!(sessions.cache().is_empty());

    // Replaying the spent token behaves like having none
    let resp = test::call_service(&app, page_request(Some(&token)).to_request()).await;
    assert_cookie_cleared(&resp);
    let replay: FormsPage = test::read_body_json(resp).await;
    assert_eq!(replay.action, NO_ACTION);
    assert!(replay.forms[&CONTACT_FORM]
        .fields
        .iter()
        .all(|field| field.value.is_empty() && field.error.is_none()));
}

#[actix_web::test]
async fn test_accepted_submission_shows_blank_form_and_notice() {
    let app = test::init_service(
        App::new()
            .app_data(manager(Arc::new(ManualClock::default())))
            .configure(configure_services),
    )
    .await;

    let resp = test::call_service(
        &app,
        form_post("/contact", "name=Ada&email=ada%40example.com&message=Hello").to_request(),
    )
    .await;
    let token = session_token(&resp);

    let resp = test::call_service(&app, page_request(Some(&token)).to_request()).await;
    let page: FormsPage = test::read_body_json(resp).await;
    assert_eq!(page.action, CONTACT_FORM);
    assert_eq!(page.notice.as_deref(), Some("Thanks, your message was sent"));
    assert_eq!(page.forms[&CONTACT_FORM].fields.len(), 3);
    assert!(page.forms[&CONTACT_FORM]
        .fields
        .iter()
        .all(|field| field.value.is_empty()));
}

#[actix_web::test]
async fn test_page_without_cookie_uses_defaults() {
    let app = test::init_service(
        App::new()
            .app_data(manager(Arc::new(ManualClock::default())))
            .configure(configure_services),
    )
    .await;

    for token in [None, Some(""), Some("never-issued")] {
        let resp = test::call_service(&app, page_request(token).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cookie_cleared(&resp);
        let page: FormsPage = test::read_body_json(resp).await;
        assert_eq!(page.action, NO_ACTION);
        assert_eq!(page.notice, None);
        assert_eq!(page.forms.len(), 2);
    }
}

#[actix_web::test]
async fn test_expired_submission_is_swept() {
    let clock = Arc::new(ManualClock::default());
    let sessions = manager(clock.clone());
    let app = test::init_service(
        App::new()
            .app_data(sessions.clone())
            .configure(configure_services),
    )
    .await;

    let resp = test::call_service(&app, form_post("/newsletter", "email=").to_request()).await;
    let token = session_token(&resp);
    assert!(sessions.cache().contains(&token));

    clock.advance(Duration::seconds(120));
    assert_eq!(sessions.cache().sweep(), 1);
    assert!(!sessions.cache().contains(&token));

    let resp = test::call_service(&app, page_request(Some(&token)).to_request()).await;
    let page: FormsPage = test::read_body_json(resp).await;
    assert_eq!(page.action, NO_ACTION);
    assert_eq!(page.forms[&NEWSLETTER_FORM].fields[0].error, None);
}

#[actix_web::test]
async fn test_only_matching_form_is_restored() {
    let app = test::init_service(
        App::new()
            .app_data(manager(Arc::new(ManualClock::default())))
            .configure(configure_services),
    )
    .await;

    let resp = test::call_service(
        &app,
        form_post("/newsletter", "email=not-an-email").to_request(),
    )
    .await;
    let token = session_token(&resp);

    let resp = test::call_service(&app, page_request(Some(&token)).to_request()).await;
    let page: FormsPage = test::read_body_json(resp).await;
    assert_eq!(page.action, NEWSLETTER_FORM);
    assert_eq!(page.forms[&NEWSLETTER_FORM].fields[0].value, "not-an-email");
    assert!(page.forms[&CONTACT_FORM]
        .fields
        .iter()
        .all(|field| field.error.is_none()));
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = test::init_service(
        App::new()
            .app_data(manager(Arc::new(ManualClock::default())))
            .configure(configure_services),
    )
    .await;

    let req = RequestBuilder::new().uri("/ping").to_test_request().to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
