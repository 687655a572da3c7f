use std::sync::Arc;

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::{
    body::{Body, Bytes, Incoming as IncomingBody},
    header::{HeaderName, HeaderValue},
    Request, Response, StatusCode,
};

use crate::{
    error::BoxError,
    handler::Handler,
    request::{decode_path, InboundRequest},
    rule_set::RuleSet,
    Error, Expectation,
};

/// Answers every request with the first matching expectation of a
/// [RuleSet], or 404.
#[derive(Debug, Clone)]
pub(crate) struct Dispatcher {
    rules: Arc<RuleSet>,
}

impl Dispatcher {
    pub(crate) fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    pub(crate) async fn dispatch<B>(
        &self,
        mut req: Request<B>,
    ) -> Result<Response<Full<Bytes>>, Error>
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        if !self.rules.is_registered(&decode_path(req.uri().path())) {
            tracing::debug!(
                method = %req.method(),
                path = req.uri().path(),
                "no expectation registered for path"
            );
            return Ok(not_found());
        }

        let method = req.method().clone();
        let uri = req.uri().clone();
        let headers = std::mem::take(req.headers_mut());
        let body = req.body_bytes().await?;
        let inbound = InboundRequest::new(method, &uri, headers, body);

        match self.rules.select(&inbound)? {
            Some(index) => {
                tracing::debug!(
                    method = %inbound.method,
                    path = %inbound.path,
                    index,
                    "request matched expectation"
                );
                render(&self.rules.expectations()[index])
            }
            None => {
                tracing::debug!(
                    method = %inbound.method,
                    path = %inbound.path,
                    "request matched no expectation"
                );
                Ok(not_found())
            }
        }
    }
}

#[async_trait]
impl Handler for Dispatcher {
    type Error = Error;

    async fn handle(self, req: Request<IncomingBody>) -> Result<Response<Full<Bytes>>, Error> {
        self.dispatch(req).await
    }
}

fn render(expectation: &Expectation) -> Result<Response<Full<Bytes>>, Error> {
    let Some(response) = &expectation.response else {
        return Ok(Response::new(Full::new(Bytes::new())));
    };

    let body = match &response.body {
        Some(body) => body.to_bytes()?,
        None => Bytes::new(),
    };

    let mut resp = Response::new(Full::new(body));

    for (name, value) in &response.headers {
        let invalid = || Error::InvalidResponseHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        resp.headers_mut().append(header_name, header_value);
    }

    // Zero keeps the default, as if no status was configured.
    if let Some(status) = response.status.filter(|status| *status != 0) {
        *resp.status_mut() =
            StatusCode::from_u16(status).map_err(|_| Error::InvalidStatusCode(status))?;
    }

    Ok(resp)
}

fn not_found() -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = StatusCode::NOT_FOUND;
    resp
}

/// A handy extension to [hyper::Request](hyper::Request) that allows for easily
/// reading the request body as a single `Bytes` object.
#[async_trait]
pub(crate) trait GetRequestBody {
    async fn body_bytes(self) -> Result<Bytes, Error>;
}

#[async_trait]
impl<B> GetRequestBody for Request<B>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    async fn body_bytes(self) -> Result<Bytes, Error> {
        self.into_body()
            .collect()
            .await
            .map(|full| full.to_bytes())
            .map_err(|err| Error::ReadBody(err.into()))
    }
}
