//! End-to-end marketplace scenarios against the in-memory application.
//!
//! A staff member publishes "Game 1", `u1` lists a copy for sale, `u2`
//! counters, and `u1` accepts. The suites check ledger state, notification
//! fan-out and the visibility rules along the way.

mod support;

use actix_web::http::{Method, StatusCode};
use actix_web::test;
use gameconnect::test_support::TestBackend;
use rstest::rstest;
use serde_json::{Value, json};

use support::{call, create_game, login, register};

fn listing_ids(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("listing array")
        .iter()
        .map(|l| l["id"].as_str().expect("listing id").to_owned())
        .collect()
}

#[actix_web::test]
async fn sale_is_countered_accepted_and_closed() {
    let backend = TestBackend::new();
    backend.create_staff("editor", "correct-horse").await;
    let app = test::init_service(backend.app()).await;

    let staff = login(&app, "editor", "correct-horse").await;
    let game_id = create_game(&app, &staff, "Game 1").await;
    let (u1, u1_cookie) = register(&app, "u1").await;
    let (u2, u2_cookie) = register(&app, "u2").await;

    let created = call(
        &app,
        Method::POST,
        "/api/v1/market/offers",
        Some(&u1_cookie),
        Some(json!({
            "offerType": "sell",
            "gameId": game_id,
            "price": "10.00",
            "description": "boxed, like new",
        })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["isOpen"], json!(true));
    let listing_id = created.body["id"].as_str().expect("listing id").to_owned();

    let market = call(&app, Method::GET, "/api/v1/market?game=Game%201", None, None).await;
    assert_eq!(market.status, StatusCode::OK);
    assert_eq!(listing_ids(&market.body), [listing_id.clone()]);
    assert_eq!(market.body[0]["price"], json!("10.00"));
    assert_eq!(market.body[0]["ownerUsername"], json!("u1"));

    let countered = call(
        &app,
        Method::POST,
        &format!("/api/v1/market/offers/{listing_id}/counter-offers"),
        Some(&u2_cookie),
        Some(json!({ "gameId": game_id, "price": 8, "description": "would you take 8?" })),
    )
    .await;
    assert_eq!(countered.status, StatusCode::CREATED);
    assert_eq!(countered.body["status"], json!("pending"));
    let offer_id = countered.body["id"].as_str().expect("offer id").to_owned();
    assert_eq!(backend.mail.sent_to("u1@example.com").len(), 1);

    let details = call(
        &app,
        Method::GET,
        &format!("/api/v1/market/offers/{listing_id}"),
        Some(&u1_cookie),
        None,
    )
    .await;
    assert_eq!(details.status, StatusCode::OK);
    assert_eq!(details.body["counterOffers"][0]["price"], json!("8.00"));

    let accepted = call(
        &app,
        Method::POST,
        &format!("/api/v1/market/offers/{listing_id}/accept"),
        Some(&u1_cookie),
        Some(json!({ "counterOfferId": offer_id })),
    )
    .await;
    assert_eq!(accepted.status, StatusCode::OK);
    assert_eq!(accepted.body["outcome"], json!("closed"));
    assert_eq!(accepted.body["acceptedOfferId"], json!(offer_id));

    let inbox = call(
        &app,
        Method::GET,
        &format!("/api/v1/users/{u2}/notifications"),
        Some(&u2_cookie),
        None,
    )
    .await;
    assert_eq!(inbox.status, StatusCode::OK);
    let notes = inbox.body.as_array().expect("notifications");
    assert_eq!(notes.len(), 1);
    let text = notes[0]["description"].as_str().expect("description");
    assert!(text.contains("User u1 has accepted your offer for Sell-Game 1"));
    assert_eq!(backend.mail.sent_to("u2@example.com").len(), 1);

    let market = call(&app, Method::GET, "/api/v1/market", None, None).await;
    assert!(listing_ids(&market.body).is_empty());

    let page = call(
        &app,
        Method::GET,
        &format!("/api/v1/users/{u1}"),
        Some(&u1_cookie),
        None,
    )
    .await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["activeOffers"], json!([]));
    assert_eq!(listing_ids(&page.body["inactiveOffers"]), [listing_id]);
}

#[actix_web::test]
async fn second_acceptance_changes_nothing() {
    let backend = TestBackend::new();
    backend.create_staff("editor", "correct-horse").await;
    let app = test::init_service(backend.app()).await;
    let staff = login(&app, "editor", "correct-horse").await;
    let game_id = create_game(&app, &staff, "Game 1").await;
    let (_, owner) = register(&app, "u1").await;
    let (u2, first) = register(&app, "u2").await;
    let (_, second) = register(&app, "u3").await;

    let listing = call(
        &app,
        Method::POST,
        "/api/v1/market/offers",
        Some(&owner),
        Some(json!({ "offerType": "exchange", "gameId": game_id, "description": "swap" })),
    )
    .await;
    let listing_id = listing.body["id"].as_str().expect("listing id").to_owned();
    let mut offers = Vec::new();
    for cookie in [&first, &second] {
        let reply = call(
            &app,
            Method::POST,
            &format!("/api/v1/market/offers/{listing_id}/counter-offers"),
            Some(cookie),
            Some(json!({ "gameId": game_id, "description": "mine" })),
        )
        .await;
        offers.push(reply.body["id"].as_str().expect("offer id").to_owned());
    }

    let accept_path = format!("/api/v1/market/offers/{listing_id}/accept");
    let closed = call(
        &app,
        Method::POST,
        &accept_path,
        Some(&owner),
        Some(json!({ "counterOfferId": offers[0] })),
    )
    .await;
    assert_eq!(closed.body["outcome"], json!("closed"));
    assert_eq!(closed.body["rejected"], json!(1));
    let again = call(
        &app,
        Method::POST,
        &accept_path,
        Some(&owner),
        Some(json!({ "counterOfferId": offers[1] })),
    )
    .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["outcome"], json!("already_closed"));

    let details = call(
        &app,
        Method::GET,
        &format!("/api/v1/market/offers/{listing_id}"),
        Some(&owner),
        None,
    )
    .await;
    let statuses: Vec<&str> = details.body["counterOffers"]
        .as_array()
        .expect("offers")
        .iter()
        .map(|o| o["status"].as_str().expect("status"))
        .collect();
    assert_eq!(statuses, ["accepted", "rejected"]);

    let inbox = call(
        &app,
        Method::GET,
        &format!("/api/v1/users/{u2}/notifications"),
        Some(&first),
        None,
    )
    .await;
    assert_eq!(inbox.body.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn closed_listing_refuses_counter_offers() {
    let backend = TestBackend::new();
    backend.create_staff("editor", "correct-horse").await;
    let app = test::init_service(backend.app()).await;
    let staff = login(&app, "editor", "correct-horse").await;
    let game_id = create_game(&app, &staff, "Game 1").await;
    let (_, owner) = register(&app, "u1").await;
    let (_, customer) = register(&app, "u2").await;

    let listing = call(
        &app,
        Method::POST,
        "/api/v1/market/offers",
        Some(&owner),
        Some(json!({
            "offerType": "buy",
            "gameId": game_id,
            "price": "5",
            "description": "wanted",
        })),
    )
    .await;
    let listing_id = listing.body["id"].as_str().expect("listing id").to_owned();
    let closed = call(
        &app,
        Method::POST,
        &format!("/api/v1/market/offers/{listing_id}/accept"),
        Some(&owner),
        Some(json!({ "counterOfferId": "00000000-0000-4000-8000-000000000000" })),
    )
    .await;
    assert_eq!(closed.body["outcome"], json!("closed"));

    let late = call(
        &app,
        Method::POST,
        &format!("/api/v1/market/offers/{listing_id}/counter-offers"),
        Some(&customer),
        Some(json!({ "gameId": game_id, "description": "too late?" })),
    )
    .await;
    assert_eq!(late.status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn other_users_pages_and_listings_are_hidden() {
    let backend = TestBackend::new();
    backend.create_staff("editor", "correct-horse").await;
    let app = test::init_service(backend.app()).await;
    let staff = login(&app, "editor", "correct-horse").await;
    let game_id = create_game(&app, &staff, "Game 1").await;
    let (u1, owner) = register(&app, "u1").await;
    let (_, other) = register(&app, "u2").await;

    let listing = call(
        &app,
        Method::POST,
        "/api/v1/market/offers",
        Some(&owner),
        Some(json!({ "offerType": "exchange", "gameId": game_id, "description": "swap" })),
    )
    .await;
    let listing_id = listing.body["id"].as_str().expect("listing id").to_owned();

    for path in [
        format!("/api/v1/users/{u1}"),
        format!("/api/v1/users/{u1}/notifications"),
        format!("/api/v1/market/offers/{listing_id}"),
    ] {
        let reply = call(&app, Method::GET, &path, Some(&other), None).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{path}");
    }
    let stolen = call(
        &app,
        Method::POST,
        &format!("/api/v1/market/offers/{listing_id}/accept"),
        Some(&other),
        Some(json!({ "counterOfferId": "00000000-0000-4000-8000-000000000000" })),
    )
    .await;
    assert_eq!(stolen.status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case(json!({ "offerType": "sell", "description": "no price" }), "price_required")]
#[case(json!({ "offerType": "sell", "price": "-1", "description": "negative" }), "negative_price")]
#[case(
    json!({ "offerType": "sell", "price": "1.234", "description": "precise" }),
    "price_too_precise"
)]
#[case(json!({ "offerType": "rent", "description": "unknown" }), "unknown_offer_type")]
#[actix_web::test]
async fn invalid_listings_are_rejected(#[case] mut body: Value, #[case] code: &str) {
    let backend = TestBackend::new();
    backend.create_staff("editor", "correct-horse").await;
    let app = test::init_service(backend.app()).await;
    let staff = login(&app, "editor", "correct-horse").await;
    let game_id = create_game(&app, &staff, "Game 1").await;
    let (_, owner) = register(&app, "u1").await;
    body["gameId"] = json!(game_id);

    let reply = call(&app, Method::POST, "/api/v1/market/offers", Some(&owner), Some(body)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"]["code"], json!(code));
}

#[actix_web::test]
async fn market_filters_by_game_newest_first() {
    let backend = TestBackend::new();
    backend.create_staff("editor", "correct-horse").await;
    let app = test::init_service(backend.app()).await;
    let staff = login(&app, "editor", "correct-horse").await;
    let game_1 = create_game(&app, &staff, "Game 1").await;
    let game_2 = create_game(&app, &staff, "Game 2").await;
    let (_, owner) = register(&app, "u1").await;

    let mut created = Vec::new();
    for game in [&game_1, &game_2, &game_1] {
        let reply = call(
            &app,
            Method::POST,
            "/api/v1/market/offers",
            Some(&owner),
            Some(json!({ "offerType": "exchange", "gameId": game, "description": "swap" })),
        )
        .await;
        created.push(reply.body["id"].as_str().expect("id").to_owned());
    }

    let filtered = call(&app, Method::GET, "/api/v1/market?game=Game%201", None, None).await;
    assert_eq!(listing_ids(&filtered.body), [created[2].clone(), created[0].clone()]);
    let all = call(&app, Method::GET, "/api/v1/market", None, None).await;
    assert_eq!(listing_ids(&all.body).len(), 3);
    let unknown = call(&app, Method::GET, "/api/v1/market?game=Nope", None, None).await;
    assert_eq!(unknown.status, StatusCode::OK);
    assert!(listing_ids(&unknown.body).is_empty());
}

#[actix_web::test]
async fn mail_outage_does_not_block_acceptance() {
    let backend = TestBackend::with_failing_mail();
    backend.create_staff("editor", "correct-horse").await;
    let app = test::init_service(backend.app()).await;
    let staff = login(&app, "editor", "correct-horse").await;
    let game_id = create_game(&app, &staff, "Game 1").await;
    let (_, owner) = register(&app, "u1").await;
    let (u2, customer) = register(&app, "u2").await;

    let listing = call(
        &app,
        Method::POST,
        "/api/v1/market/offers",
        Some(&owner),
        Some(json!({ "offerType": "exchange", "gameId": game_id, "description": "swap" })),
    )
    .await;
    let listing_id = listing.body["id"].as_str().expect("listing id").to_owned();
    let offer = call(
        &app,
        Method::POST,
        &format!("/api/v1/market/offers/{listing_id}/counter-offers"),
        Some(&customer),
        Some(json!({ "gameId": game_id, "description": "mine" })),
    )
    .await;
    assert_eq!(offer.status, StatusCode::CREATED);
    let offer_id = offer.body["id"].as_str().expect("offer id").to_owned();

    let accepted = call(
        &app,
        Method::POST,
        &format!("/api/v1/market/offers/{listing_id}/accept"),
        Some(&owner),
        Some(json!({ "counterOfferId": offer_id })),
    )
    .await;
    assert_eq!(accepted.status, StatusCode::OK);
    assert_eq!(accepted.body["outcome"], json!("closed"));

    let inbox = call(
        &app,
        Method::GET,
        &format!("/api/v1/users/{u2}/notifications"),
        Some(&customer),
        None,
    )
    .await;
    assert_eq!(inbox.body.as_array().map(Vec::len), Some(1));
}
