//! Request and response bodies of the `web` module, the validated types built from them and
//! their parsing implementations.

use lazy_regex::regex_is_match;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ###################################
// ->   STRUCTS
// ###################################
/// Validated waitlist signup, the email is already lowercased.
#[derive(Debug, Clone)]
pub struct WaitlistEntry {
    pub email: ValidEmail,
}

/// Built from the parsed request body. Only a JSON object has an `email` field, every other
/// shape (array, number, string, bool) is treated as a body without one.
/// A `null` body is rejected by the handler before it gets here.
impl TryFrom<Value> for WaitlistEntry {
    type Error = DataParsingError;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let mut fields = match body {
            Value::Object(fields) => fields,
            other => return Err(DataParsingError::BodyNotAnObject(json_type_name(&other))),
        };

        match fields.remove("email") {
            Some(Value::String(email)) => Ok(WaitlistEntry {
                email: ValidEmail::parse(email)?,
            }),
            Some(other) => Err(DataParsingError::EmailNotAString(json_type_name(&other))),
            None => Err(DataParsingError::EmailMissing),
        }
    }
}

/// An email that passed the shape check `^\S+@\S+\.\S+$`, stored lowercased.
/// No trimming, no unicode normalization and no deliverability checks are done.
/// `\S` follows the Unicode `White_Space` property, so U+FEFF counts as a visible character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if regex_is_match!(r"^\S+@\S+\.\S+$", value) {
            Ok(ValidEmail(value.to_lowercase()))
        } else {
            Err(DataParsingError::EmailInvalid)
        }
    }
}

/// Body of a successful waitlist signup: `{"ok": true}`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaitlistAck {
    pub ok: bool,
}

impl WaitlistAck {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Body of every failed request: `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email doesn't look like an email address")]
    EmailInvalid,
    #[error("email must be a string, got: {0}")]
    EmailNotAString(&'static str),
    #[error("body has no email field")]
    EmailMissing,
    #[error("body must be a JSON object, got: {0}")]
    BodyNotAnObject(&'static str),
}
