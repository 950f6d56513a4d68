use std::sync::Arc;

use axum::{
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::web::{log, types::ErrorBody, Error, REQUEST_ID_HEADER};

/// Turns a `web::Error` stashed in the response extensions into the `{"error": ...}` body the
/// client gets, and logs every request.
pub async fn response_mapper(
    req_method: Method,
    uri: Uri,
    headers: HeaderMap,
    resp: Response,
) -> Response {
    let req_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|id| id.to_str().ok())
        .map(ToString::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    if let (Some(er), Some((status, _))) = (web_error, client_status_and_error) {
        if status.is_server_error() {
            tracing::error!(req_id = %req_id, error = %er, "SERVER ERROR");
        } else {
            tracing::debug!(req_id = %req_id, error = %er, "CLIENT ERROR");
        }
    }

    let err_resp = client_status_and_error.map(|(status, cl_err)| {
        let body = ErrorBody {
            error: cl_err.to_string(),
        };
        (status, Json(body)).into_response()
    });

    log::log_request(
        &req_id,
        &req_method,
        &uri,
        resp.status(),
        web_error,
        client_status_and_error,
    );

    err_resp.unwrap_or(resp)
}
