//! A typed client for the waitlist endpoint that behaves like the signup form on the landing
//! page: `idle` → `submitting` → `submitted` or back to `idle` with an alert.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use strum_macros::AsRefStr;
use tracing::{info, warn};

use crate::web::types::ErrorBody;

/// Shown when the server didn't tell us what went wrong.
pub const FALLBACK_ALERT: &str = "Could not add your email. Try again?";

const WAITLIST_PATH: &str = "/api/waitlist";

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum FormState {
    Idle,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The endpoint accepted the email. Terminal.
    Submitted,
    /// Nothing was sent: the email is empty or the form was already submitted.
    Blocked,
    /// The request failed, the message is meant to be shown to the user.
    Alert(String),
}

#[derive(Debug)]
pub struct SubmissionForm {
    http_client: Client,
    url: reqwest::Url,
    email: String,
    state: FormState,
}

impl SubmissionForm {
    /// `base_url` is the origin serving the landing page, e.g. `http://localhost:8080`.
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client<S: AsRef<str>>(base_url: S, http_client: Client) -> Result<Self> {
        let url = reqwest::Url::parse(base_url.as_ref())
            .and_then(|base| base.join(WAITLIST_PATH))
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        Ok(SubmissionForm {
            http_client,
            url,
            email: String::new(),
            state: FormState::Idle,
        })
    }

    /// Updates the input. Ignored once the form was submitted.
    pub fn set_email<S: Into<String>>(&mut self, email: S) {
        if self.state == FormState::Idle {
            self.email = email.into();
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn can_submit(&self) -> bool {
        self.state == FormState::Idle && !self.email.is_empty()
    }

    /// Sends the current email to the endpoint.
    ///
    /// Takes `&mut self`, so a form can only ever have one request in flight.
    #[tracing::instrument(name = "Submitting the waitlist form", skip(self), fields(url = %self.url))]
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.can_submit() {
            return SubmitOutcome::Blocked;
        }

        let loading = Loading::start(&mut self.state);
        let result = send_signup(&self.http_client, &self.url, &self.email).await;

        match result {
            Ok(()) => {
                loading.finish(FormState::Submitted);
                self.email.clear();
                info!("email added to the waitlist");
                SubmitOutcome::Submitted
            }
            Err(er) => {
                loading.finish(FormState::Idle);
                warn!(error = %er, "waitlist signup failed");
                SubmitOutcome::Alert(er.alert_message())
            }
        }
    }
}

/// Holds the form in `Submitting` and puts it back to `Idle` if the request never finishes.
struct Loading<'a>(&'a mut FormState);

impl<'a> Loading<'a> {
    fn start(state: &'a mut FormState) -> Self {
        *state = FormState::Submitting;
        Loading(state)
    }

    fn finish(self, state: FormState) {
        *self.0 = state;
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        if *self.0 == FormState::Submitting {
            *self.0 = FormState::Idle;
        }
    }
}

#[derive(Serialize)]
struct Signup<'a> {
    email: &'a str,
}

async fn send_signup(http_client: &Client, url: &reqwest::Url, email: &str) -> Result<()> {
    let resp = http_client
        .post(url.clone())
        .json(&Signup { email })
        .send()
        .await?;

    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }

    let message = resp.json::<ErrorBody>().await.ok().map(|body| body.error);
    Err(Error::Rejected { status, message })
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse the url: {0}")]
    UrlParsing(String),
    #[error("endpoint responded with {status}: {message:?}")]
    Rejected {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    /// The server's `error` message if there was one, the generic fallback otherwise.
    pub fn alert_message(&self) -> String {
        match self {
            Error::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            _ => FALLBACK_ALERT.to_string(),
        }
    }
}
