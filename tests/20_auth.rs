mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

/// Every write endpoint and the assigned-projects listing reject anonymous
/// callers before touching any state. These checks need no database: the
/// missing Authorization header is rejected up front.
#[tokio::test]
async fn anonymous_writes_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let attempts = [
        client.post(format!("{}/clients/", base)).json(&json!({"client_name": "Acme"})),
        client.put(format!("{}/clients/1/", base)).json(&json!({"client_name": "Acme"})),
        client.patch(format!("{}/clients/1/", base)).json(&json!({"client_name": "Acme"})),
        client.delete(format!("{}/clients/1/", base)),
        client
            .post(format!("{}/clients/1/projects/", base))
            .json(&json!({"project_name": "Website", "users": []})),
        client.get(format!("{}/projects/", base)),
    ];

    for attempt in attempts {
        let res = attempt.send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
    Ok(())
}

#[tokio::test]
async fn token_issuance_is_stable_per_user() -> Result<()> {
    let Some(server) = common::ensure_server_with_db().await? else {
        return Ok(());
    };

    let user = common::create_user("stable")?;
    let first = common::obtain_token(server, &user).await?;
    let second = common::obtain_token(server, &user).await?;

    assert_eq!(first.len(), 40);
    assert_eq!(first, second, "token must not rotate between logins");
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_rejected() -> Result<()> {
    let Some(server) = common::ensure_server_with_db().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let user = common::create_user("badcreds")?;

    // Wrong password
    let res = client
        .post(format!("{}/api-token-auth/", server.base_url))
        .json(&json!({"username": user.username, "password": "not-the-password"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Unknown username
    let res = client
        .post(format!("{}/api-token-auth/", server.base_url))
        .json(&json!({"username": "no-such-user-ever", "password": "whatever"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Missing fields get per-field messages
    let res = client
        .post(format!("{}/api-token-auth/", server.base_url))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["field_errors"]["username"].is_string());
    assert!(body["field_errors"]["password"].is_string());
    Ok(())
}

#[tokio::test]
async fn unknown_token_is_unauthorized() -> Result<()> {
    let Some(server) = common::ensure_server_with_db().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/clients/", server.base_url))
        .bearer_auth("0000000000000000000000000000000000000000")
        .json(&json!({"client_name": "Acme"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_scheme_header_is_accepted() -> Result<()> {
    let Some(server) = common::ensure_server_with_db().await? else {
        return Ok(());
    };
    let client = reqwest::Client::new();

    let user = common::create_user("scheme")?;
    let token = common::obtain_token(server, &user).await?;

    // DRF-style "Token <key>" works the same as "Bearer <key>"
    let res = client
        .get(format!("{}/projects/", server.base_url))
        .header("Authorization", format!("Token {}", token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
