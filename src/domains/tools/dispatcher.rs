//! Dispatcher - sends outbound requests and normalizes the outcome.

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use super::encoder::{OutboundBody, OutboundRequest};
use super::error::{ArgumentError, CallResult, ToolError};
use super::routing::FileUpload;

/// Sends requests over one shared HTTP client.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    client: Client,
}

impl Dispatcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Send a request and return the raw response text.
    ///
    /// Any 2xx status is a success. Other statuses become
    /// [`ToolError::Api`] with the body as the remote sent it.
    pub async fn send(&self, request: OutboundRequest) -> CallResult {
        let method = request.method;
        let url = request.url;

        let mut builder = self
            .client
            .request(method.to_reqwest(), &url)
            .headers(request.headers)
            .timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.body {
            OutboundBody::None => builder,
            OutboundBody::Json(body) => builder.body(body.to_string()),
            OutboundBody::Multipart(upload) => builder.multipart(multipart_form(upload).await?),
        };

        debug!("{} {}", method, url);

        let response = builder.send().await.map_err(|e| transport_error(&url, e))?;
        let status = response.status();
        let raw = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let body = body_text(&raw);

        if status.is_success() {
            debug!("{} {} -> {}", method, url, status.as_u16());
            Ok(body)
        } else {
            warn!("{} {} -> {}", method, url, status.as_u16());
            Err(ToolError::api(status.as_u16(), body))
        }
    }
}

async fn multipart_form(upload: FileUpload) -> Result<Form, ToolError> {
    let bytes = tokio::fs::read(&upload.local_path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ToolError::from(ArgumentError::FileNotFound {
                path: upload.local_path.display().to_string(),
            })
        } else {
            ToolError::transport(format!(
                "Cannot read '{}': {}",
                upload.local_path.display(),
                e
            ))
        }
    })?;

    let mut form = Form::new();
    for (key, value) in upload.metadata {
        form = form.text(key, value);
    }

    Ok(form.part(upload.field_name, Part::bytes(bytes).file_name(upload.file_name)))
}

/// Response body as text, ignoring any declared charset.
///
/// Valid UTF-8 is returned byte for byte. Anything else is converted
/// lossily, since the result has to travel as a JSON string.
fn body_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn transport_error(url: &str, err: reqwest::Error) -> ToolError {
    warn!("Request to {} failed: {}", url, err);
    if err.is_timeout() {
        ToolError::transport(format!("Request to {} timed out", url))
    } else {
        ToolError::transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::catalog::HttpMethod;
    use crate::domains::tools::encoder::REQUEST_TIMEOUT;
    use reqwest::header::HeaderMap;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let request = OutboundRequest {
            method: HttpMethod::Get,
            url: format!("http://{}/agents", addr),
            headers: HeaderMap::new(),
            query: vec![],
            body: OutboundBody::None,
            timeout: REQUEST_TIMEOUT,
        };

        let err = Dispatcher::default().send(request).await.unwrap_err();
        assert!(matches!(err, ToolError::Transport(_)));
        assert!(err.envelope_text().starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_body_bytes_ignore_declared_charset() {
        use axum::{Router, http::header, routing::get};

        let app = Router::new().route(
            "/agents",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "application/json; charset=iso-8859-1")],
                    "{\"name\":\"Zoë\"}",
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let request = OutboundRequest {
            method: HttpMethod::Get,
            url: format!("http://{}/agents", addr),
            headers: HeaderMap::new(),
            query: vec![],
            body: OutboundBody::None,
            timeout: REQUEST_TIMEOUT,
        };

        let body = Dispatcher::default().send(request).await.unwrap();
        assert_eq!(body, "{\"name\":\"Zoë\"}");
    }

    #[test]
    fn test_invalid_utf8_body_is_lossy() {
        assert_eq!(body_text(b"ok \xff"), "ok \u{fffd}");
    }

    #[tokio::test]
    async fn test_vanished_upload_file() {
        let upload = FileUpload {
            field_name: "file".to_string(),
            local_path: PathBuf::from("/definitely/not/here.png"),
            file_name: "here.png".to_string(),
            metadata: vec![],
        };

        let err = multipart_form(upload).await.unwrap_err();
        assert_eq!(err.envelope_text(), "File not found: /definitely/not/here.png");
    }
}
