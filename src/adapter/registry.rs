use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;

use crate::value::ObjectRef;

static NEXT_PROXY_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a proxy, assigned when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyHandle(u64);

impl ProxyHandle {
    fn next() -> Self {
        ProxyHandle(NEXT_PROXY_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw handle value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProxyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proxy#{}", self.0)
    }
}

/// Session-wide map from proxy identity to the instance the proxy wraps.
///
/// Every proxy a session hands out has exactly one entry. Entries are dropped all at once when
/// the session is released, or singly when a wrap loses the race against the release.
#[derive(Debug, Default)]
pub struct WrapRegistry {
    entries: DashMap<ProxyHandle, ObjectRef>,
}

impl WrapRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `raw` under a fresh handle.
    pub fn register(&self, raw: ObjectRef) -> ProxyHandle {
        let handle = ProxyHandle::next();
        self.entries.insert(handle, raw);
        handle
    }

    /// The instance wrapped by `handle`, if this registry issued it.
    #[must_use]
    pub fn get(&self, handle: ProxyHandle) -> Option<ObjectRef> {
        self.entries.get(&handle).map(|entry| entry.value().clone())
    }

    /// True if this registry issued `handle`
    #[must_use]
    pub fn contains(&self, handle: ProxyHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no proxy is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops the entry of `handle`, returning the instance it wrapped.
    pub fn remove(&self, handle: ProxyHandle) -> Option<ObjectRef> {
        self.entries.remove(&handle).map(|(_, raw)| raw)
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
