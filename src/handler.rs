use std::{convert::Infallible, fmt::Display};

use async_trait::async_trait;
use http_body_util::Full;
use hyper::{
    body::{Bytes, Incoming as IncomingBody},
    Request, Response, StatusCode,
};

/// Answers requests accepted by a [Listener](crate::listener::Listener). If
/// the handler returns an error, the error is logged and a 500 response is
/// returned to the client.
#[async_trait]
pub(crate) trait Handler {
    type Error: Display;
    async fn handle(self, req: Request<IncomingBody>)
        -> Result<Response<Full<Bytes>>, Self::Error>;
}

pub(crate) async fn run_handler<H: Handler>(
    handler: H,
    req: Request<IncomingBody>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    match handler.handle(req).await {
        Ok(resp) => Ok(resp),
        Err(err) => {
            tracing::error!(error = %err, "error while handling request");
            let mut resp = Response::new(Full::from(Bytes::from_static(b"Internal Server Error")));
            *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            Ok(resp)
        }
    }
}
