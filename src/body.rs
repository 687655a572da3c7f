use hyper::body::Bytes;
use serde::Serialize;

use crate::Error;

/// A request or response body as configured on an
/// [Expectation](crate::Expectation) or [Response](crate::Response).
///
/// Every variant has a single byte encoding, produced by
/// [to_bytes](Body::to_bytes). Expected request bodies are compared against
/// the incoming bytes using that encoding, and response bodies are written
/// with it.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Written as its UTF-8 bytes.
    Text(String),
    /// Written unchanged.
    Bytes(Bytes),
    /// Written as compact JSON.
    Json(serde_json::Value),
}

impl Body {
    /// Converts any serializable value into a [Body::Json].
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        Ok(Body::Json(serde_json::to_value(value)?))
    }

    /// Returns the bytes this body is compared against and written as.
    pub fn to_bytes(&self) -> Result<Bytes, Error> {
        match self {
            Body::Text(text) => Ok(Bytes::copy_from_slice(text.as_bytes())),
            Body::Bytes(bytes) => Ok(bytes.clone()),
            Body::Json(value) => Ok(Bytes::from(serde_json::to_vec(value)?)),
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_owned())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&'static [u8]> for Body {
    fn from(bytes: &'static [u8]) -> Self {
        Body::Bytes(Bytes::from_static(bytes))
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(bytes))
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Body::Json(value)
    }
}
