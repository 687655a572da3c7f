use std::{net::SocketAddr, sync::Arc, time::Duration};

use hyper::Uri;

use crate::{
    dispatch::Dispatcher, listener::Listener, rule_set::RuleSet, Error, Expectation,
    ServerOptions,
};

/// A mock HTTP server answering requests from an ordered list of
/// [Expectation]s.
///
/// See the crate documentation for an example.
#[derive(Debug, Clone)]
pub struct MockServer {
    listener: Listener,
    rules: Arc<RuleSet>,
}

impl MockServer {
    /// Starts a server on a random local port answering requests with the
    /// given expectations, in order.
    ///
    /// The server can be safely cloned and used from multiple threads. When
    /// the final reference to the server is dropped, the server will be shut
    /// down and all pending requests will be aborted.
    pub async fn new(expectations: Vec<Expectation>) -> Result<Self, Error> {
        Self::with_options(expectations, ServerOptions::default()).await
    }

    /// Like [new](MockServer::new), with explicit listener options.
    pub async fn with_options(
        expectations: Vec<Expectation>,
        options: ServerOptions,
    ) -> Result<Self, Error> {
        let rules = Arc::new(RuleSet::new(expectations));
        let listener = Listener::bind(Dispatcher::new(rules.clone()), &options).await?;

        tracing::debug!(
            addr = %listener.addr(),
            expectations = rules.expectations().len(),
            paths = ?rules.registered_paths(),
            "mock server started"
        );

        Ok(Self { listener, rules })
    }

    /// Returns the socket address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.listener.addr()
    }

    /// Returns `http://<host>:<port>`, to which request paths can be appended.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr())
    }

    /// Returns a valid request URL for the given path and query string.
    pub fn url(&self, path_and_query: &str) -> Uri {
        Uri::builder()
            .scheme("http")
            .authority(self.addr().to_string().as_str())
            .path_and_query(path_and_query)
            .build()
            .expect("should be a valid URL")
    }

    /// Returns the expectations the server was created with, in order, so
    /// their [invoke_count](Expectation::invoke_count) can be asserted.
    pub fn requests(&self) -> &[Expectation] {
        self.rules.expectations()
    }

    /// Returns the distinct expectation paths, in registration order. Requests
    /// to any other path are answered 404.
    pub fn registered_paths(&self) -> &[String] {
        self.rules.registered_paths()
    }

    /// Returns the number of requests answered by the server, whether they
    /// matched an expectation or not. This value is incremented after the
    /// response has been built, but before it has been sent.
    pub fn req_count(&self) -> u64 {
        self.listener.req_count()
    }

    /// Await req_count reaching a certain number. This polls every 10ms and
    /// times out after the given duration.
    pub async fn await_req_count(&self, target_count: u64, timeout: Duration) -> Result<(), Error> {
        self.listener.await_req_count(target_count, timeout).await
    }

    /// close kills the server and aborts all pending requests. This does not
    /// block for all requests to finish.
    pub fn close(&self) {
        self.listener.close();
    }
}
