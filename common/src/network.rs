use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

pub struct HttpRequest<'a> {
    pub method: Method,
    pub url: String,
    pub query: &'a [(&'a str, &'a str)],
    pub body: Option<String>,
}

pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// JSON-over-HTTP connection to the betting backend.
pub struct Connection {
    base_url: String,
    #[cfg(not(target_arch = "wasm32"))]
    transport: not_wasm::ReqwestTransport,
    #[cfg(target_arch = "wasm32")]
    transport: wasm::FetchTransport,
}

impl Connection {
    /// `base_url` may be empty in the browser, where paths resolve against the page origin.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            #[cfg(not(target_arch = "wasm32"))]
            transport: not_wasm::ReqwestTransport::new(),
            #[cfg(target_arch = "wasm32")]
            transport: wasm::FetchTransport,
        }
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        self.send(HttpRequest {
            method: Method::Get,
            url: self.url(path),
            query,
            body: None,
        })
        .await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.send(HttpRequest {
            method: Method::Post,
            url: self.url(path),
            query: &[],
            body: Some(serde_json::to_string(body)?),
        })
        .await
    }

    async fn send<T: DeserializeOwned>(&self, request: HttpRequest<'_>) -> Result<T> {
        debug!("{:?} {}", request.method, request.url);
        let response = self.transport.send(request).await?;
        decode(response)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn decode<T: DeserializeOwned>(response: RawResponse) -> Result<T> {
    if !(200..300).contains(&response.status) {
        return Err(ClientError::Status(response.status));
    }
    Ok(serde_json::from_slice(&response.body)?)
}

trait HttpTransport {
    async fn send<'a>(&'a self, request: HttpRequest<'a>) -> Result<RawResponse>;
}

#[cfg(not(target_arch = "wasm32"))]
mod not_wasm {
    use reqwest::header::CONTENT_TYPE;

    use crate::error::{ClientError, Result};
    use crate::network::{HttpRequest, HttpTransport, Method, RawResponse};

    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self {
                client: reqwest::Client::new(),
            }
        }
    }

    fn transport_err(error: reqwest::Error) -> ClientError {
        ClientError::Transport(error.to_string())
    }

    impl HttpTransport for ReqwestTransport {
        async fn send<'a>(&'a self, request: HttpRequest<'a>) -> Result<RawResponse> {
            let mut builder = match request.method {
                Method::Get => self.client.get(&request.url),
                Method::Post => self.client.post(&request.url),
            };
            if !request.query.is_empty() {
                builder = builder.query(request.query);
            }
            if let Some(body) = request.body {
                builder = builder.header(CONTENT_TYPE, "application/json").body(body);
            }

            let response = builder.send().await.map_err(transport_err)?;
            let status = response.status().as_u16();
            let body = response.bytes().await.map_err(transport_err)?;
            Ok(RawResponse {
                status,
                body: body.to_vec(),
            })
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use gloo::net::http::Request;

    use crate::error::{ClientError, Result};
    use crate::network::{HttpRequest, HttpTransport, Method, RawResponse};

    pub struct FetchTransport;

    fn transport_err(error: gloo::net::Error) -> ClientError {
        ClientError::Transport(error.to_string())
    }

    impl HttpTransport for FetchTransport {
        async fn send<'a>(&'a self, request: HttpRequest<'a>) -> Result<RawResponse> {
            let builder = match request.method {
                Method::Get => Request::get(&request.url),
                Method::Post => Request::post(&request.url),
            };
            let builder = if request.query.is_empty() {
                builder
            } else {
                builder.query(request.query.iter().copied())
            };

            let response = match request.body {
                Some(body) => {
                    builder
                        .header("Content-Type", "application/json")
                        .body(body)
                        .map_err(transport_err)?
                        .send()
                        .await
                }
                None => builder.send().await,
            }
            .map_err(transport_err)?;

            let status = response.status();
            let body = response.binary().await.map_err(transport_err)?;
            Ok(RawResponse { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageResponse;

    #[test]
    fn joins_base_and_path() {
        assert_eq!(join_url("", "/api/hello"), "/api/hello");
        assert_eq!(join_url("http://127.0.0.1:8000/", "/api/hello"), "http://127.0.0.1:8000/api/hello");
        assert_eq!(join_url("http://host", "api/get_users"), "http://host/api/get_users");
    }

    #[test]
    fn non_success_status_is_an_error() {
        let response = RawResponse {
            status: 500,
            body: br#"{"detail":"Database error"}"#.to_vec(),
        };
        let err = decode::<MessageResponse>(response).unwrap_err();
        assert_eq!(err, ClientError::Status(500));
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn success_body_is_decoded() {
        let response = RawResponse {
            status: 200,
            body: br#"{"message":"ok"}"#.to_vec(),
        };
        let decoded: MessageResponse = decode(response).unwrap();
        assert_eq!(decoded.message.as_deref(), Some("ok"));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let response = RawResponse {
            status: 200,
            body: b"<html>".to_vec(),
        };
        assert!(matches!(decode::<MessageResponse>(response), Err(ClientError::Malformed(_))));
    }
}
