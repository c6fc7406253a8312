//! Chain semantics exercised through the public API, with handler doubles
//! shaped like the real chain: a static asset server ahead of a capability
//! router owning geo and wallet plugins.

use async_trait::async_trait;
use capbridge::context::RequestContext;
use capbridge::dispatch::Dispatcher;
use capbridge::middleware::{CapabilityRouter, Middleware, Plugin};
use http::{Method, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct StaticAssets {
    hits: AtomicUsize,
}

#[async_trait]
impl Middleware for StaticAssets {
    fn name(&self) -> &'static str {
        "StaticAssets"
    }

    async fn handle(&self, target: &str, ctx: &mut RequestContext) -> bool {
        self.hits.fetch_add(1, Ordering::SeqCst);
        if !target.ends_with(".html") {
            return false;
        }
        ctx.set_status(StatusCode::OK);
        ctx.write_body("<html></html>");
        true
    }
}

struct PrefixPlugin {
    name: &'static str,
    prefix: &'static str,
}

#[async_trait]
impl Plugin for PrefixPlugin {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn handle(&self, target: &str, ctx: &mut RequestContext) -> bool {
        if !target.starts_with(self.prefix) {
            return false;
        }
        ctx.set_status(StatusCode::OK);
        ctx.write_body(self.name);
        true
    }
}

fn wallet_chain() -> (Dispatcher, Arc<StaticAssets>) {
    let statics = Arc::new(StaticAssets {
        hits: AtomicUsize::new(0),
    });

    let mut router = CapabilityRouter::new();
    router.append_plugin(Arc::new(PrefixPlugin {
        name: "geo",
        prefix: "/geo",
    }));
    router.append_plugin(Arc::new(PrefixPlugin {
        name: "wallet",
        prefix: "/wallet",
    }));

    let mut dispatcher = Dispatcher::new(None);
    dispatcher.append_middleware(statics.clone());
    dispatcher.append_middleware(Arc::new(router));
    (dispatcher, statics)
}

#[tokio::test]
async fn test_wallet_sign_reaches_wallet_plugin_through_router() {
    let (dispatcher, statics) = wallet_chain();

    let mut ctx = RequestContext::for_request(Method::POST, "/wallet/sign");
    assert!(dispatcher.dispatch("/wallet/sign", &mut ctx).await);
    assert_eq!(ctx.response_body().as_ref(), b"wallet");
    // The static handler was consulted first and declined.
    assert_eq!(statics.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_static_target_never_reaches_router() {
    let (dispatcher, _) = wallet_chain();

    let mut ctx = RequestContext::for_request(Method::GET, "/index.html");
    assert!(dispatcher.dispatch("/index.html", &mut ctx).await);
    assert_eq!(ctx.response_body().as_ref(), b"<html></html>");
}

#[tokio::test]
async fn test_unknown_target_falls_through_whole_chain() {
    let (dispatcher, _) = wallet_chain();

    let mut ctx = RequestContext::for_request(Method::GET, "/camera/shot");
    assert!(!dispatcher.dispatch("/camera/shot", &mut ctx).await);
    assert!(!ctx.is_committed());
}

#[tokio::test]
async fn test_concurrent_dispatch_outcomes_depend_only_on_target() {
    let (dispatcher, _) = wallet_chain();
    let dispatcher = Arc::new(dispatcher);

    let mut handles = Vec::new();
    for i in 0..64 {
        let dispatcher = dispatcher.clone();
        handles.push(tokio::spawn(async move {
            let target = match i % 3 {
                0 => "/wallet/sign",
                1 => "/geo/here",
                _ => "/nope",
            };
            let mut ctx = RequestContext::for_request(Method::GET, target);
            let handled = dispatcher.dispatch(target, &mut ctx).await;
            (target, handled, ctx.response_body().clone())
        }));
    }

    for handle in handles {
        let (target, handled, body) = handle.await.unwrap();
        match target {
            "/wallet/sign" => {
                assert!(handled);
                assert_eq!(body.as_ref(), b"wallet");
            }
            "/geo/here" => {
                assert!(handled);
                assert_eq!(body.as_ref(), b"geo");
            }
            _ => {
                assert!(!handled);
                assert!(body.is_empty());
            }
        }
    }
}
