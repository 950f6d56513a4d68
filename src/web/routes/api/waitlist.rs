use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    web::{
        types::{DataParsingError, WaitlistAck, WaitlistEntry},
        WebResult,
    },
    AppState,
};

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum WaitlistError {
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] DataParsingError),
    #[error("request body is not valid JSON: {0}")]
    BodyParse(#[from] serde_json::Error),
    #[error("request body is JSON null")]
    NullBody,
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

// ###################################
// ->   API
// ###################################
/// Adds an email to the waitlist.
///
/// The body is parsed as JSON whatever the `Content-Type` says. Unparseable bodies and a bare
/// `null` are server errors, any other JSON without a string `email` field is an invalid email.
///
/// The response is the same whether the email was just added or was already on the list, so
/// the endpoint can't be used to find out who signed up.
#[tracing::instrument(name = "Adding email to the waitlist", skip_all)]
pub async fn waitlist(
    State(app_state): State<AppState>,
    body: Bytes,
) -> WebResult<Json<WaitlistAck>> {
    let body: Value = serde_json::from_slice(&body).map_err(WaitlistError::BodyParse)?;
    if body.is_null() {
        return Err(WaitlistError::NullBody.into());
    }
    let entry = WaitlistEntry::try_from(body).map_err(WaitlistError::InvalidEmail)?;

    let was_added = insert_waitlist_entry(app_state.database_mgr.db(), &entry)
        .await
        .map_err(WaitlistError::Sqlx)?;

    if was_added {
        info!("New email added to the waitlist.");
    } else {
        debug!("Email was already on the waitlist.");
    }

    Ok(Json(WaitlistAck::ok()))
}

// ###################################
// ->   HELPERS
// ###################################
/// Inserts the entry unless its email is already stored, returns whether a row was written.
/// Conflicts on the unique `email` column are resolved by the database, so concurrent
/// signups of one email still end up as a single row.
async fn insert_waitlist_entry(db: &PgPool, entry: &WaitlistEntry) -> sqlx::Result<bool> {
    let query_result = sqlx::query(
        r#"
        INSERT INTO waitlist (id, email, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING
    "#,
    )
    .bind(Uuid::new_v4())
    .bind(entry.email.as_ref())
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(query_result.rows_affected() == 1)
}
