//! Shared helpers for the HTTP integration suites.

use actix_http::Request;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode};
use actix_web::test;
use serde_json::{Value, json};

/// Status and decoded JSON body (`Value::Null` for empty bodies).
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

pub async fn call<S>(
    app: &S,
    method: Method,
    path: &str,
    cookie: Option<&Cookie<'static>>,
    payload: Option<Value>,
) -> Reply
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = test::TestRequest::default().method(method).uri(path);
    if let Some(cookie) = cookie {
        request = request.cookie(cookie.clone());
    }
    if let Some(payload) = payload {
        request = request.set_json(payload);
    }
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response body")
    };
    Reply { status, body }
}

fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Register `username` and return its id and session cookie.
pub async fn register<S>(app: &S, username: &str) -> (String, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/register")
        .set_json(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "hunter22x",
            "passwordConfirmation": "hunter22x",
        }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED, "register {username}");
    let cookie = session_cookie(&response);
    let body: Value = test::read_body_json(response).await;
    let id = body["id"].as_str().expect("user id").to_owned();
    (id, cookie)
}

/// Log in and return the session cookie.
pub async fn login<S>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK, "login {username}");
    session_cookie(&response)
}

/// Create a game as `staff` and return its id.
pub async fn create_game<S>(app: &S, staff: &Cookie<'static>, name: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let reply = call(
        app,
        Method::POST,
        "/api/v1/games",
        Some(staff),
        Some(json!({ "name": name, "description": "" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "create game {name}");
    reply.body["id"].as_str().expect("game id").to_owned()
}
