use anyhow::Context;
use axum::{extract::State, response::Html};

use crate::{web::WebResult, AppState};

/// Renders the landing page with the product copy from `page_config`.
#[tracing::instrument(name = "Rendering the landing page", skip(app_state))]
pub async fn home(State(app_state): State<AppState>) -> WebResult<Html<String>> {
    let page = &app_state.page;

    let mut ctx = tera::Context::new();
    ctx.insert("product_name", &page.product_name);
    ctx.insert("tagline", &page.tagline);
    ctx.insert("year", &page.year);

    let body = app_state
        .templ_mgr
        .render_html_to_string(&ctx, "home.html")
        .context("tera failed to render 'html/home.html' template")?;

    Ok(Html(body))
}
