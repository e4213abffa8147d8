//! Account, catalogue and subscription scenarios against the in-memory
//! application.

mod support;

use actix_web::http::{Method, StatusCode};
use actix_web::test;
use gameconnect::test_support::TestBackend;
use rstest::rstest;
use serde_json::json;

use support::{call, create_game, login, register};

#[actix_web::test]
async fn wrong_password_is_unauthorised() {
    let backend = TestBackend::new();
    let app = test::init_service(backend.app()).await;
    register(&app, "u1").await;

    let reply = call(
        &app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({ "username": "u1", "password": "not-the-password" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn taken_username_is_reported_on_the_field() {
    let backend = TestBackend::new();
    let app = test::init_service(backend.app()).await;
    register(&app, "u1").await;

    let reply = call(
        &app,
        Method::POST,
        "/api/v1/register",
        None,
        Some(json!({
            "username": "u1",
            "email": "other@example.com",
            "password": "hunter22x",
            "passwordConfirmation": "hunter22x",
        })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"]["code"], json!("username_taken"));
}

#[actix_web::test]
async fn password_change_takes_effect_at_next_login() {
    let backend = TestBackend::new();
    let app = test::init_service(backend.app()).await;
    let (_, cookie) = register(&app, "u1").await;

    let changed = call(
        &app,
        Method::POST,
        "/api/v1/users/me/password",
        Some(&cookie),
        Some(json!({
            "oldPassword": "hunter22x",
            "newPassword": "new-secret-1",
            "newPasswordConfirmation": "new-secret-1",
        })),
    )
    .await;
    assert_eq!(changed.status, StatusCode::NO_CONTENT);
    login(&app, "u1", "new-secret-1").await;
    let stale = call(
        &app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(json!({ "username": "u1", "password": "hunter22x" })),
    )
    .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn only_staff_manage_the_catalogue() {
    let backend = TestBackend::new();
    backend.create_staff("editor", "correct-horse").await;
    let app = test::init_service(backend.app()).await;
    let staff = login(&app, "editor", "correct-horse").await;
    let (_, member) = register(&app, "u1").await;

    let forbidden = call(
        &app,
        Method::POST,
        "/api/v1/games",
        Some(&member),
        Some(json!({ "name": "Game 1" })),
    )
    .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    let anonymous = call(
        &app,
        Method::POST,
        "/api/v1/games",
        None,
        Some(json!({ "name": "Game 1" })),
    )
    .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    create_game(&app, &staff, "Game 1").await;
    let duplicate = call(
        &app,
        Method::POST,
        "/api/v1/games",
        Some(&staff),
        Some(json!({ "name": "Game 1" })),
    )
    .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let games = call(&app, Method::GET, "/api/v1/games", None, None).await;
    assert_eq!(games.body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn articles_get_unique_slugs_and_require_login_to_read() {
    let backend = TestBackend::new();
    backend.create_staff("editor", "correct-horse").await;
    let app = test::init_service(backend.app()).await;
    let staff = login(&app, "editor", "correct-horse").await;
    let game_id = create_game(&app, &staff, "Game 1").await;

    let mut slugs = Vec::new();
    for _ in 0..2 {
        let reply = call(
            &app,
            Method::POST,
            "/api/v1/articles",
            Some(&staff),
            Some(json!({ "gameId": game_id, "title": "Test Game", "content": "Review" })),
        )
        .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        slugs.push(reply.body["slug"].as_str().expect("slug").to_owned());
    }
    assert_eq!(slugs, ["test-game", "test-game-1"]);

    let anonymous = call(&app, Method::GET, "/api/v1/articles/test-game", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["details"]["loginUrl"], json!("/api/v1/login"));

    let (_, reader) = register(&app, "u1").await;
    let article = call(
        &app,
        Method::GET,
        "/api/v1/articles/test-game-1",
        Some(&reader),
        None,
    )
    .await;
    assert_eq!(article.status, StatusCode::OK);
    assert_eq!(article.body["title"], json!("Test Game"));
    let missing = call(&app, Method::GET, "/api/v1/articles/nope", Some(&reader), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn front_page_shows_latest_content() {
    let backend = TestBackend::new();
    backend.create_staff("editor", "correct-horse").await;
    let app = test::init_service(backend.app()).await;

    let empty = call(&app, Method::GET, "/api/v1/front-page", None, None).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["latestGame"], json!(null));

    let staff = login(&app, "editor", "correct-horse").await;
    let game_id = create_game(&app, &staff, "Game 1").await;
    let (_, owner) = register(&app, "u1").await;
    call(
        &app,
        Method::POST,
        "/api/v1/market/offers",
        Some(&owner),
        Some(json!({ "offerType": "exchange", "gameId": game_id, "description": "swap" })),
    )
    .await;

    let page = call(&app, Method::GET, "/api/v1/front-page", None, None).await;
    assert_eq!(page.body["latestGame"]["name"], json!("Game 1"));
    assert_eq!(page.body["latestArticle"], json!(null));
    assert_eq!(page.body["latestListing"]["gameName"], json!("Game 1"));
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let backend = TestBackend::new();
    let app = test::init_service(backend.app()).await;
    let (id, cookie) = register(&app, "u1").await;

    let before = call(&app, Method::GET, &format!("/api/v1/users/{id}"), Some(&cookie), None).await;
    assert_eq!(before.status, StatusCode::OK);

    let request = test::TestRequest::post()
        .uri("/api/v1/logout")
        .cookie(cookie)
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared = response
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .map(|c| c.into_owned())
        .expect("removal cookie");

    let after = call(&app, Method::GET, &format!("/api/v1/users/{id}"), Some(&cleared), None).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn subscription_joins_list_and_sends_welcome() {
    let backend = TestBackend::new();
    let app = test::init_service(backend.app()).await;

    let reply = call(
        &app,
        Method::POST,
        "/api/v1/subscribe",
        None,
        Some(json!({ "email": "fan@example.com" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert_eq!(backend.mailing_list.members(), ["fan@example.com"]);
    let welcome = backend.mail.sent_to("fan@example.com");
    assert_eq!(welcome.len(), 1);
    assert_eq!(welcome[0].subject, "Welcome to Our Mailing List");
}

#[rstest]
#[case("")]
#[case("not-an-email")]
#[actix_web::test]
async fn subscription_rejects_malformed_addresses(#[case] email: &str) {
    let backend = TestBackend::new();
    let app = test::init_service(backend.app()).await;

    let reply = call(
        &app,
        Method::POST,
        "/api/v1/subscribe",
        None,
        Some(json!({ "email": email })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(backend.mailing_list.members().is_empty());
}

#[actix_web::test]
async fn subscription_survives_mail_outage() {
    let backend = TestBackend::with_failing_mail();
    let app = test::init_service(backend.app()).await;

    let reply = call(
        &app,
        Method::POST,
        "/api/v1/subscribe",
        None,
        Some(json!({ "email": "fan@example.com" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert_eq!(backend.mailing_list.members(), ["fan@example.com"]);
}
