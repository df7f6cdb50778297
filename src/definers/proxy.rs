//! Proxy-mediated collection injection.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::definers::{Candidate, InjectionDefiner};
use crate::error::WireResult;
use crate::proxies::{DirectProxy, ListProxy, ProxyInjector, RegistryProxy};
use crate::schema::Schema;
use crate::value::Value;

/// Explodes a collection-like value through a named proxy so each element is
/// validated individually, then re-collapses the validated elements into a
/// fresh collection.
///
/// Proxies are registered under string keys at composition time; the definer
/// configuration names the proxy to use, and the configuration schema only
/// accepts registered keys.
pub struct ProxyDefiner {
    proxies: IndexMap<String, Arc<dyn ProxyInjector>>,
}

impl ProxyDefiner {
    /// An empty definer with no registered proxies.
    pub fn new() -> Self {
        ProxyDefiner {
            proxies: IndexMap::new(),
        }
    }

    /// A definer with the standard proxies: `direct`, `list`, `registry`.
    pub fn standard() -> Self {
        let mut definer = ProxyDefiner::new();
        definer.set_proxy("direct", Arc::new(DirectProxy));
        definer.set_proxy("list", Arc::new(ListProxy));
        definer.set_proxy("registry", Arc::new(RegistryProxy));
        definer
    }

    /// Register a proxy under a key, replacing any previous registration.
    pub fn set_proxy(&mut self, key: impl Into<String>, proxy: Arc<dyn ProxyInjector>) {
        self.proxies.insert(key.into(), proxy);
    }

    fn proxy(&self, config: &Value) -> Option<&Arc<dyn ProxyInjector>> {
        config.as_str().and_then(|key| self.proxies.get(key))
    }
}

impl Default for ProxyDefiner {
    fn default() -> Self {
        ProxyDefiner::standard()
    }
}

impl InjectionDefiner for ProxyDefiner {
    fn schema(&self) -> Schema {
        Schema::string_enum(
            "a proxy injector key",
            self.proxies.keys().cloned().collect(),
        )
    }

    fn source(&self, candidates: Vec<Candidate>, config: &Value) -> WireResult<Vec<Candidate>> {
        let Some(proxy) = self.proxy(config) else {
            return Ok(candidates);
        };
        let mut exploded = Vec::new();
        for candidate in &candidates {
            exploded.extend(proxy.explode(&candidate.value)?);
        }
        Ok(exploded)
    }

    fn recompose(
        &self,
        current: Value,
        validated: &[Candidate],
        config: &Value,
    ) -> WireResult<Value> {
        match self.proxy(config) {
            Some(proxy) => proxy.rebuild(&current, validated),
            None => Ok(current),
        }
    }
}
