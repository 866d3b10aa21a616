mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn signup_returns_tokens_and_public_projection() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("signup");

    let body = common::signup(&client, &server.base_url, "Ana", &email, "pw123").await?;

    assert!(body["access_token"].as_str().is_some());
    assert!(body["refresh_token"].as_str().is_some());
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["tasks"], json!([]));
    // The hash never leaves the server
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
    Ok(())
}

#[tokio::test]
async fn signup_rejects_missing_fields() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/signup", server.base_url))
        .json(&json!({ "name": "", "email": common::unique_email("blank"), "password": "pw" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert!(body["error"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn duplicate_signup_conflicts_and_keeps_first_account() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("dup");

    common::signup(&client, &server.base_url, "First", &email, "pw123").await?;

    let res = client
        .post(format!("{}/signup", server.base_url))
        .json(&json!({ "name": "Second", "email": email, "password": "other" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // First credentials still work
    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({ "email": email, "password": "pw123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["user"]["name"], "First");
    Ok(())
}

#[tokio::test]
async fn login_distinguishes_unknown_email_from_bad_password() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("login");

    common::signup(&client, &server.base_url, "Ana", &email, "pw123").await?;

    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({ "email": email, "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({ "email": common::unique_email("ghost"), "password": "pw123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn refresh_issues_new_access_token_until_logout() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("refresh");

    let body = common::signup(&client, &server.base_url, "Ana", &email, "pw123").await?;
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    // Refresh succeeds while the session is live
    let res = client
        .post(format!("{}/refresh", server.base_url))
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let refreshed = res.json::<Value>().await?;
    assert!(refreshed["access_token"].as_str().is_some());

    // Logout invalidates the session
    let res = client
        .delete(format!("{}/logout", server.base_url))
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Refresh with the same token now fails
    let res = client
        .post(format!("{}/refresh", server.base_url))
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // A second logout is a no-op, not an error
    let res = client
        .delete(format!("{}/logout", server.base_url))
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn login_supersedes_previous_refresh_token() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("supersede");

    let first = common::signup(&client, &server.base_url, "Ana", &email, "pw123").await?;
    let old_refresh = first["refresh_token"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/login", server.base_url))
        .json(&json!({ "email": email, "password": "pw123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // The signup-era refresh token no longer matches the stored identifier
    let res = client
        .post(format!("{}/refresh", server.base_url))
        .json(&json!({ "refresh_token": old_refresh }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn validate_token_reports_identity() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("validate");

    let body = common::signup(&client, &server.base_url, "Ana", &email, "pw123").await?;
    let token = common::access_token(&body);

    let res = client
        .get(format!("{}/validate-token", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let identity = res.json::<Value>().await?;
    assert_eq!(identity["email"], email);
    assert_eq!(identity["userId"], body["user"]["id"]);

    let res = client
        .get(format!("{}/validate-token", server.base_url))
        .bearer_auth("not-a-token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    for path in ["/tasks", "/notes", "/goals", "/habits", "/users"] {
        let res = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;
        assert_eq!(
            res.status(),
            StatusCode::UNAUTHORIZED,
            "expected 401 for {}",
            path
        );
    }
    Ok(())
}

#[tokio::test]
async fn root_greets_authenticated_callers_by_name() -> Result<()> {
    let Some(server) = common::ensure_server().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();
    let email = common::unique_email("root");

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert!(body["message"].as_str().unwrap().contains("Welcome"));
    assert!(body.get("userId").is_none());

    let signup = common::signup(&client, &server.base_url, "Ana", &email, "pw123").await?;
    let res = client
        .get(format!("{}/", server.base_url))
        .bearer_auth(common::access_token(&signup))
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Welcome, Ana!");
    assert_eq!(body["userId"], signup["user"]["id"]);
    Ok(())
}
