mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

use common::{delete, expect_envelope, get, json_request, TestApp};
use portfolio_api::auth::TokenService;

fn article_body(slug: &str) -> serde_json::Value {
    json!({ "title": "Gate", "slug": slug, "content": "Body", "published": true })
}

/// Every way a session can be missing or broken.
fn bad_cookies(app: &TestApp) -> Result<Vec<(&'static str, Option<String>)>> {
    let expired = app.cookie_for_token_at(Utc::now() - Duration::minutes(1441))?;

    let valid = app.cookie_for_token_at(Utc::now())?;
    // Flip the first character of the signature
    let sig_start = valid.rfind('.').map(|i| i + 1).unwrap_or(0);
    let first = valid[sig_start..].chars().next().unwrap_or('A');
    let tampered = format!(
        "{}{}{}",
        &valid[..sig_start],
        if first == 'A' { 'B' } else { 'A' },
        &valid[sig_start + 1..]
    );

    let mut foreign_config = common::test_config().jwt;
    foreign_config.secret_key = "a-completely-different-signing-key-456789".to_string();
    let foreign = TokenService::new(&foreign_config).issue(common::ADMIN_EMAIL)?;

    let mut other_issuer = common::test_config().jwt;
    other_issuer.issuer = "someone-else".to_string();
    let wrong_iss = TokenService::new(&other_issuer).issue(common::ADMIN_EMAIL)?;

    Ok(vec![
        ("missing", None),
        ("empty", Some("auth_token=".to_string())),
        ("garbage", Some("auth_token=not-a-jwt".to_string())),
        ("expired", Some(expired)),
        ("tampered", Some(tampered)),
        ("foreign key", Some(format!("auth_token={}", foreign.token))),
        ("wrong issuer", Some(format!("auth_token={}", wrong_iss.token))),
        ("other cookie name", Some(valid.replace("auth_token=", "session="))),
    ])
}

#[tokio::test]
async fn protected_reads_reject_bad_sessions_with_401() -> Result<()> {
    let app = TestApp::new().await?;

    for (case, cookie) in bad_cookies(&app)? {
        let res = app.send(get("/api/articles/all", cookie.as_deref())).await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "case: {}", case);
        let body = expect_envelope(res, 401, "UNAUTHORIZED").await?;
        assert_eq!(body["title"], "Authentication required.", "case: {}", case);
    }
    Ok(())
}

#[tokio::test]
async fn protected_writes_are_rejected_before_the_handler_runs() -> Result<()> {
    let app = TestApp::new().await?;

    for (case, cookie) in bad_cookies(&app)? {
        let res = app
            .send(json_request(Method::POST, "/api/articles", &article_body(case), cookie.as_deref()))
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "case: {}", case);

        let res = app.send(delete("/api/projects/1", cookie.as_deref())).await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "case: {}", case);
    }

    assert!(app.state.store.list_all_articles().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn gate_runs_before_body_parsing() -> Result<()> {
    let app = TestApp::new().await?;

    // Malformed body without a session is a 401, not a 400
    let res = app
        .send(common::raw_request(
            Method::POST,
            "/api/articles",
            Some("application/json"),
            "{not json",
            None,
        ))
        .await?;
    expect_envelope(res, 401, "UNAUTHORIZED").await?;
    Ok(())
}

#[tokio::test]
async fn token_expiring_right_now_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;
    // exp == now
    let cookie = app.cookie_for_token_at(Utc::now() - Duration::minutes(1440))?;

    let res = app.send(get("/auth/me", Some(&cookie))).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn valid_session_passes_the_gate() -> Result<()> {
    let app = TestApp::new().await?;
    let cookie = app.cookie_for_token_at(Utc::now() - Duration::minutes(5))?;

    let res = app
        .send(json_request(Method::POST, "/api/articles", &article_body("gate-ok"), Some(&cookie)))
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app.send(get("/api/articles/all", Some(&cookie))).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn public_reads_need_no_session() -> Result<()> {
    let app = TestApp::new().await?;

    for uri in ["/api/articles", "/api/projects", "/api/jobhistory", "/", "/health"] {
        let res = app.send(get(uri, None)).await?;
        assert_eq!(res.status(), StatusCode::OK, "uri: {}", uri);
    }
    Ok(())
}
