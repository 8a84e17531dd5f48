mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

use common::TestServer;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_a_new_user() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "name": "Test", "email": "test@test.com" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = res.headers()[header::SET_COOKIE].to_str()?.to_string();
    assert!(cookie.starts_with("sessionId="), "unexpected cookie: {}", cookie);
    assert!(cookie.contains("Max-Age=604800"));
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register("Test", "test@test.com").await?;

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "name": "Other", "email": "test@test.com" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "User already exists");
    Ok(())
}

#[tokio::test]
async fn invalid_registration_reports_fields() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "name": "Test", "email": "not-an-email" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["email"], "Invalid email");
    Ok(())
}

#[tokio::test]
async fn each_registration_gets_its_own_session() -> Result<()> {
    let server = TestServer::spawn().await?;
    let first = server.register("First", "first@test.com").await?;

    // Registering while already holding a cookie still issues a new token
    let res = server
        .client
        .post(server.url("/users"))
        .header(header::COOKIE, &first)
        .json(&json!({ "name": "Second", "email": "second@test.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let second = res.headers()[header::SET_COOKIE].to_str()?;
    let second = second.split(';').next().unwrap_or_default().trim().to_string();
    assert_ne!(first, second);
    Ok(())
}
