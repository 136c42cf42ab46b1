//! HTTP transport seam.
//!
//! The engine builds [`HttpRequest`] values and hands them to a [`Transport`].
//! Status handling and body parsing stay in the engine, so a transport only
//! has to move bytes. [`ReqwestTransport`] is the blocking implementation used
//! by the CLI (requires the `native-http` feature).

use crate::error::RemoteError;

/// HTTP methods the Table API is driven with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Patch,
}

/// A fully-formed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn patch(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Patch,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    /// Add a header (builder pattern).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First value of a header, compared case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one HTTP exchange, blocking until it completes.
///
/// Implementations report connection-level failures as
/// [`RemoteError::Transport`]; non-2xx statuses are returned as responses.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RemoteError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RemoteError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RemoteError> {
        (**self).send(request)
    }
}

#[cfg(feature = "native-http")]
pub use native::ReqwestTransport;

#[cfg(feature = "native-http")]
mod native {
    use super::{HttpRequest, HttpResponse, Method, Transport};
    use crate::error::RemoteError;

    /// Blocking reqwest client.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::blocking::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Transport for ReqwestTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RemoteError> {
            let mut builder = match request.method {
                Method::Get => self.client.get(&request.url),
                Method::Patch => self.client.patch(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let response = builder
                .send()
                .map_err(|e| RemoteError::Transport(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .map_err(|e| RemoteError::Transport(e.to_string()))?;
            log::debug!("{:?} {} -> {}", request.method, request.url, status);
            Ok(HttpResponse { status, body })
        }
    }
}
