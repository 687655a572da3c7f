use std::{io, time::Duration};

use thiserror::Error as ThisError;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("bind TCP listener: {0}")]
    BindTcpListener(io::Error),
    #[error("get TCP listener socket address: {0}")]
    GetTcpListenerAddress(io::Error),
    #[error("req_count did not reach {target_count} within {timeout:?} (current count: {current_count})")]
    AwaitReqCountTimeout {
        current_count: u64,
        target_count: u64,
        timeout: Duration,
    },
    #[error("read request body: {0}")]
    ReadBody(#[source] BoxError),
    #[error("serialize body as JSON: {0}")]
    SerializeBody(#[from] serde_json::Error),
    #[error("invalid pattern {pattern:?} for {name:?}: {source}")]
    InvalidPattern {
        name: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid response status code {0}")]
    InvalidStatusCode(u16),
    #[error("invalid response header {name:?}")]
    InvalidResponseHeader { name: String },
}
