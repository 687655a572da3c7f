//! A programmable mock HTTP server for testing HTTP clients. Vaguely inspired
//! by Go's [httptest](https://pkg.go.dev/net/http/httptest#Server) package.
//!
//! A [MockServer] is created from an ordered list of [Expectation]s. Every
//! request is answered by the first expectation whose method, path, and
//! optional body, header, and query predicates all match, and whose match
//! budget is not exhausted. Requests matching nothing are answered with 404.
//!
//! Currently only supports HTTP/1.1 and does not support TLS. Only supports the
//! Tokio async runtime.
//!
//! ## Example
//!
//! ```
//! use mock_http_server::{Expectation, MockServer, Response};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let server = MockServer::new(vec![
//!     Expectation::new("GET", "/health")
//!         .max_match_count(1)
//!         .response(Response::new().status(503)),
//!     Expectation::new("GET", "/health").response(Response::new().body("ok")),
//! ])
//! .await
//! .expect("create server");
//!
//! let client = reqwest::Client::new();
//!
//! let res = client
//!     .get(format!("{}/health", server.base_url()))
//!     .send()
//!     .await
//!     .expect("send request");
//! assert_eq!(res.status(), 503);
//!
//! let res = client
//!     .get(format!("{}/health", server.base_url()))
//!     .send()
//!     .await
//!     .expect("send request");
//! assert_eq!(res.status(), 200);
//! assert_eq!(res.text().await.expect("read response"), "ok");
//!
//! assert_eq!(server.requests()[0].invoke_count(), 1);
//! assert_eq!(server.requests()[1].invoke_count(), 1);
//! # });
//! ```
//!
//! There are also more examples as tests.

mod body;
mod dispatch;
mod error;
mod expectation;
mod handler;
mod listener;
mod pattern;
mod request;
mod rule_set;
mod server;

pub use body::Body;
pub use error::Error;
pub use expectation::{Expectation, Response};
pub use listener::ServerOptions;
pub use server::MockServer;

pub use hyper;
