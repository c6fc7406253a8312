//! Sub-router fanning capability requests out to ordered plugins.

use super::{Middleware, Plugin};
use crate::context::RequestContext;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// A middleware that owns an ordered list of capability plugins and applies
/// the same first-success-wins scan the dispatcher applies to middlewares.
///
/// Keeping the plugins behind one chain entry lets the capability set be
/// registered as a unit, and keeps capability path conventions out of the
/// dispatcher.
pub struct CapabilityRouter {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl CapabilityRouter {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Register a plugin. Setup-time only: the `&mut self` receiver means no
    /// plugin can be appended once the router is shared with the dispatcher.
    /// Registration order is dispatch order.
    pub fn append_plugin(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }
}

impl Default for CapabilityRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Middleware for CapabilityRouter {
    fn name(&self) -> &'static str {
        "CapabilityRouter"
    }

    async fn handle(&self, target: &str, ctx: &mut RequestContext) -> bool {
        for plugin in &self.plugins {
            if plugin.handle(target, ctx).await {
                debug!(plugin = plugin.name(), path = target, "capability plugin claimed request");
                return true;
            }
        }
        false
    }
}
