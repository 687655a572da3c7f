use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use hyper::{body, server::conn::http1, service::service_fn, Request};
use hyper_util::rt::TokioIo;
use tokio::{net::TcpListener, select, sync::watch, time::Instant};

use crate::{
    handler::{run_handler, Handler},
    Error,
};

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Address to bind to. Use port 0 to let the OS pick a free port.
    pub bind_addr: SocketAddr,
    /// Whether to keep HTTP/1.1 connections open between requests.
    pub keep_alive: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            bind_addr: ([127, 0, 0, 1], 0).into(),
            keep_alive: true,
        }
    }
}

/// Accepts TCP connections in the background and serves HTTP/1.1 on each of
/// them with a [Handler].
///
/// Clones share the same socket. When the final clone is dropped, the listener
/// is closed and all pending requests are aborted.
#[derive(Debug, Clone)]
pub(crate) struct Listener {
    close_tx: Arc<watch::Sender<bool>>,
    addr: SocketAddr,
    req_count: Arc<Mutex<u64>>,
}

impl Listener {
    pub(crate) async fn bind<H: Handler + Clone + Send + Sync + 'static>(
        handler: H,
        options: &ServerOptions,
    ) -> Result<Self, Error> {
        let tcp_listener = TcpListener::bind(options.bind_addr)
            .await
            .map_err(Error::BindTcpListener)?;
        let addr = tcp_listener
            .local_addr()
            .map_err(Error::GetTcpListenerAddress)?;

        // Flipped to true once, by close(). Every task holds a receiver.
        let (close_tx, close_rx) = watch::channel(false);
        let req_count = Arc::new(Mutex::new(0));
        let keep_alive = options.keep_alive;

        {
            let req_count = req_count.clone();

            tokio::spawn(async move {
                let mut close_rx = close_rx.clone();

                loop {
                    let (tcp_stream, peer) = select! {
                        _ = close_rx.changed() => {
                            tracing::debug!(%addr, "listener closed");
                            return;
                        }
                        res = tcp_listener.accept() => {
                            match res {
                                Ok(res) => res,
                                Err(err) => {
                                    tracing::warn!(error = %err, "error while accepting TCP connection");
                                    return;
                                }
                            }
                        }
                    };

                    let handler = handler.clone();
                    let mut close_rx = close_rx.clone();
                    let req_count = req_count.clone();
                    tokio::spawn(async move {
                        let handler = &handler;
                        let req_count = &req_count;

                        let service = service_fn(|req: Request<body::Incoming>| async move {
                            let res = run_handler(handler.clone(), req).await;
                            *req_count.lock().expect("lock poisoned") += 1;
                            res
                        });

                        let mut builder = http1::Builder::new();
                        builder.keep_alive(keep_alive);

                        let res = select! {
                            _ = close_rx.changed() => {
                                return;
                            }
                            res = builder.serve_connection(TokioIo::new(tcp_stream), service) => res,
                        };

                        if let Err(http_err) = res {
                            tracing::warn!(%peer, error = %http_err, "error while serving HTTP connection");
                        }
                    });
                }
            });
        }

        tracing::debug!(%addr, "listening");

        Ok(Self {
            close_tx: Arc::new(close_tx),
            addr,
            req_count,
        })
    }

    pub(crate) fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Number of requests answered so far, whatever the response.
    pub(crate) fn req_count(&self) -> u64 {
        *self.req_count.lock().expect("lock poisoned")
    }

    /// Polls req_count every 10ms until it equals `target_count` or
    /// `timeout` elapses.
    pub(crate) async fn await_req_count(
        &self,
        target_count: u64,
        timeout: Duration,
    ) -> Result<(), Error> {
        let start = Instant::now();
        loop {
            let current_count = self.req_count();
            if current_count == target_count {
                return Ok(());
            }

            if start.elapsed() > timeout {
                return Err(Error::AwaitReqCountTimeout {
                    current_count,
                    target_count,
                    timeout,
                });
            }

            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    pub(crate) fn close(&self) {
        self.close_tx.send_replace(true);
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if Arc::strong_count(&self.close_tx) == 1 {
            self.close();
        }
    }
}
