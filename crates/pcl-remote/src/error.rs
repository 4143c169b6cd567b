//! Mapping of HTTP failures onto `PclError`.

use pcl_core::{PclError, Service};

/// Connection, timeout or decode failure talking to `service`.
pub(crate) fn transport(service: Service) -> impl Fn(reqwest::Error) -> PclError {
    move |err| PclError::Transport {
        service,
        message: err.to_string(),
    }
}

/// Turn a non-success response into `PclError::Status`.
///
/// The body is trimmed; an empty body is replaced by the status line so the
/// error never ends in a bare colon.
pub(crate) async fn status_error(service: Service, response: reqwest::Response) -> PclError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    PclError::Status {
        service,
        status: status.as_u16(),
        body: if body.is_empty() {
            status.to_string()
        } else {
            body.to_string()
        },
    }
}

/// Join `base` and an absolute `path`, tolerating a trailing slash on `base`.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
