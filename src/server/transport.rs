//! Transport adapter between hyper and the dispatcher.
//!
//! Each accepted connection is served on its own task. The adapter folds the
//! request into a `RequestContext`, runs the dispatcher, and ships whatever
//! response the winning handler wrote. A fall-through (no handler claimed the
//! target) gets a terminal 404 here; the dispatcher itself never writes one.

use crate::context::RequestContext;
use crate::dispatch::Dispatcher;
use bytes::Bytes;
use http::{Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, warn};
use uuid::Uuid;

pub(crate) async fn accept_loop(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    mut shutdown_rx: broadcast::Receiver<()>,
    request_log: bool,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                debug!("accept loop shutting down");
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        let dispatcher = dispatcher.clone();
                        tokio::spawn(async move {
                            let io = TokioIo::new(stream);
                            let service = service_fn(move |req| {
                                handle_request(req, dispatcher.clone(), request_log)
                            });
                            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                                debug!(%peer, "connection error: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("failed to accept connection: {}", e);
                    }
                }
            }
        }
    }
}

async fn handle_request(
    req: Request<Incoming>,
    dispatcher: Arc<Dispatcher>,
    request_log: bool,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let target = parts.uri.path().to_string();
    let request_id = Uuid::new_v4();

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(%request_id, path = target, "failed to read request body: {}", e);
            return Ok(plain_response(
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "unreadable request body" }).to_string(),
            ));
        }
    };

    if request_log {
        debug!(%request_id, method = %parts.method, path = target, "dispatching request");
    }

    let mut ctx = RequestContext::new(parts.method, target.clone(), parts.headers, body);
    if dispatcher.dispatch(&target, &mut ctx).await {
        Ok(ctx.into_response())
    } else {
        error!(%request_id, path = target, "no middleware handled the request");
        Ok(plain_response(
            StatusCode::NOT_FOUND,
            serde_json::json!({ "error": "not found", "target": target }).to_string(),
        ))
    }
}

fn plain_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}
