use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use waitlist::client::{FormState, SubmissionForm, SubmitOutcome};

use crate::helpers::TestApp;

#[tokio::test]
async fn waitlist_valid_email_is_stored_lowercased() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_waitlist(&json!({ "email": "Alice@Example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "ok": true }));
    assert_eq!(app.stored_emails().await?, vec!["alice@example.com"]);

    Ok(())
}

#[tokio::test]
async fn waitlist_repeated_email_is_stored_once() -> Result<()> {
    let app = TestApp::spawn().await?;

    // second and third submissions differ only in case
    for email in ["alice@example.com", "alice@example.com", "ALICE@EXAMPLE.COM"] {
        let res = app.post_waitlist(&json!({ "email": email })).await?;

        assert_eq!(res.status(), StatusCode::OK, "email: {email}");
        assert_eq!(res.json::<Value>().await?, json!({ "ok": true }));
    }

    assert_eq!(app.stored_emails().await?, vec!["alice@example.com"]);

    Ok(())
}

#[tokio::test]
async fn waitlist_concurrent_signups_of_one_email_store_one_row() -> Result<()> {
    let app = TestApp::spawn().await?;

    let mut set = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let http_client = app.http_client.clone();
        let url = format!("{}/api/waitlist", app.base_url());
        set.spawn(async move {
            http_client
                .post(url)
                .json(&json!({ "email": "rush@example.com" }))
                .send()
                .await
        });
    }

    while let Some(res) = set.join_next().await {
        assert_eq!(res??.status(), StatusCode::OK);
    }
    assert_eq!(app.stored_emails().await?, vec!["rush@example.com"]);

    Ok(())
}

#[tokio::test]
async fn waitlist_returns_400_for_invalid_emails() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        (json!({ "email": "not-an-email" }), "no @"),
        (json!({ "email": "alice@localhost" }), "no dot after @"),
        (json!({ "email": "@example.com" }), "nothing before @"),
        (json!({ "email": "" }), "empty email"),
        (json!({ "email": "ali ce@example.com" }), "whitespace"),
        (json!({ "email": 42 }), "number"),
        (json!({ "email": null }), "null"),
        (json!({}), "missing email"),
    ];

    for (body, description) in cases {
        let res = app.post_waitlist(&body).await?;

        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "The API did not return a 400 BAD REQUEST, the payload was: {description}."
        );
        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(
            res.json::<Value>().await?,
            json!({ "error": "Invalid email" }),
            "payload: {description}"
        );
    }

    assert!(app.stored_emails().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn waitlist_returns_400_for_json_that_is_not_an_object() -> Result<()> {
    let app = TestApp::spawn().await?;

    for body in [r#"["Array@Example.com"]"#, "[]", "42", r#""a@b.c""#, "true"] {
        let res = app.post_waitlist_raw(body).await?;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body:?}");
        assert_eq!(
            res.json::<Value>().await?,
            json!({ "error": "Invalid email" })
        );
    }

    assert!(app.stored_emails().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn waitlist_returns_500_for_malformed_body() -> Result<()> {
    let app = TestApp::spawn().await?;

    for body in [r#"{"email": "#, "email=alice@example.com", "", "null"] {
        let res = app.post_waitlist_raw(body).await?;

        assert_eq!(
            res.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "body: {body:?}"
        );
        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(
            res.json::<Value>().await?,
            json!({ "error": "Server error" })
        );
    }

    Ok(())
}

#[tokio::test]
async fn waitlist_parses_json_without_content_type() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .post_waitlist_raw(r#"{"email": "Plain@Example.com"}"#)
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(app.stored_emails().await?, vec!["plain@example.com"]);

    Ok(())
}

#[tokio::test]
async fn waitlist_returns_500_when_storage_fails() -> Result<()> {
    let app = TestApp::spawn().await?;

    // Sabotage the database
    sqlx::query("ALTER TABLE waitlist DROP COLUMN email;")
        .execute(app.dm.db())
        .await?;

    let res = app
        .post_waitlist(&json!({ "email": "alice@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(
        res.json::<Value>().await?,
        json!({ "error": "Server error" })
    );

    Ok(())
}

#[tokio::test]
async fn submission_form_signs_up_against_the_app() -> Result<()> {
    let app = TestApp::spawn().await?;
    let mut form = SubmissionForm::new(app.base_url())?;

    // empty input never reaches the server
    assert_eq!(form.submit().await, SubmitOutcome::Blocked);

    form.set_email("Bob@Example.com");
    assert_eq!(form.submit().await, SubmitOutcome::Submitted);
    assert_eq!(form.state(), FormState::Submitted);

    assert_eq!(app.stored_emails().await?, vec!["bob@example.com"]);

    Ok(())
}

#[tokio::test]
async fn submission_form_alerts_and_stays_idle_on_errors() -> Result<()> {
    let app = TestApp::spawn().await?;
    let mut form = SubmissionForm::new(app.base_url())?;

    form.set_email("not-an-email");
    assert_eq!(
        form.submit().await,
        SubmitOutcome::Alert("Invalid email".to_string())
    );
    assert_eq!(form.state(), FormState::Idle);

    sqlx::query("ALTER TABLE waitlist DROP COLUMN email;")
        .execute(app.dm.db())
        .await?;

    form.set_email("carol@example.com");
    assert_eq!(
        form.submit().await,
        SubmitOutcome::Alert("Server error".to_string())
    );
    assert_eq!(form.state(), FormState::Idle);
    assert_eq!(form.email(), "carol@example.com");

    Ok(())
}
