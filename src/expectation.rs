use std::{collections::HashMap, sync::Mutex};

use crate::{pattern::Pattern, Body};

/// A single request the server expects to receive, and what it should answer
/// with.
///
/// Expectations are evaluated in the order they were passed to
/// [MockServer::new](crate::MockServer::new). The first one whose method,
/// path, and optional predicates all match the request, and whose match budget
/// is not exhausted, answers it.
///
/// ```
/// use mock_http_server::{Expectation, Response};
///
/// let expectation = Expectation::new("GET", "/users")
///     .header("Authorization", "Bearer .*")
///     .query_parameter("page", "[0-9]+")
///     .max_match_count(1)
///     .response(Response::new().status(200).body("[]"));
///
/// assert_eq!(expectation.invoke_count(), 0);
/// ```
#[derive(Debug)]
pub struct Expectation {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) body: Option<Body>,
    pub(crate) headers: HashMap<String, Pattern>,
    pub(crate) query_parameters: HashMap<String, Pattern>,
    pub(crate) max_match_count: u64,
    pub(crate) response: Option<Response>,
    pub(crate) invoke_count: Mutex<u64>,
}

impl Expectation {
    /// Creates an expectation matching any request with exactly this method
    /// and path. Both comparisons are case-sensitive.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body: None,
            headers: HashMap::new(),
            query_parameters: HashMap::new(),
            max_match_count: 0,
            response: None,
            invoke_count: Mutex::new(0),
        }
    }

    /// Only match requests whose body equals this one byte for byte.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Only match requests where the named header fully matches `pattern`.
    /// A missing header is matched as the empty string.
    pub fn header(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.headers.insert(name.into(), Pattern::new(pattern.into()));
        self
    }

    /// Only match requests where the named query or form parameter fully
    /// matches `pattern`. A missing parameter is matched as the empty string.
    pub fn query_parameter(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.query_parameters.insert(name.into(), Pattern::new(pattern.into()));
        self
    }

    /// Stop matching after this many requests. Zero means unlimited.
    pub fn max_match_count(mut self, count: u64) -> Self {
        self.max_match_count = count;
        self
    }

    /// Answer matched requests with this response instead of an empty 200.
    pub fn response(mut self, response: Response) -> Self {
        self.response = Some(response);
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the number of requests this expectation has answered.
    pub fn invoke_count(&self) -> u64 {
        *self.invoke_count.lock().expect("lock poisoned")
    }

    /// Atomically consumes one unit of the match budget. Returns false,
    /// leaving the count untouched, if the budget is exhausted.
    pub(crate) fn try_claim(&self) -> bool {
        let mut count = self.invoke_count.lock().expect("lock poisoned");
        if self.max_match_count > 0 && *count >= self.max_match_count {
            return false;
        }
        *count += 1;
        true
    }
}

/// The response sent for a matched [Expectation].
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub(crate) status: Option<u16>,
    pub(crate) body: Option<Body>,
    pub(crate) headers: Vec<(String, String)>,
}

impl Response {
    /// An empty 200 response.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Appends a header to the response. Existing headers with the same name
    /// are kept.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
