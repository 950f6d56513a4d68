use anyhow::Result;
use reqwest::{header::CONTENT_TYPE, StatusCode};
use waitlist::config::get_or_init_config;

use crate::helpers::TestApp;

#[tokio::test]
async fn home_renders_landing_page() -> Result<()> {
    let app = TestApp::spawn().await?;
    let page = &get_or_init_config().page_config;

    let res = app.http_client.get(app.base_url()).send().await?;

    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "got: {content_type}");

    let body = res.text().await?;
    assert!(body.contains(&format!("{} coming soon", page.product_name)));
    assert!(body.contains(r#"id="waitlist-form""#));
    assert!(body.contains(r#"type="email""#));
    assert!(body.contains(r#"id="waitlist-done" hidden"#));

    Ok(())
}

#[tokio::test]
async fn waitlist_route_only_accepts_post() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .get(format!("{}/api/waitlist", app.base_url()))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}
