//! Factory orchestrating the identity cache, recycle queue and strategy.
//!
//! One `NotesFactory` exists per session. Every wrapper method calls
//! `preprocess` before touching its native handle, which drains the recycle
//! queue and, once the identity cache has grown past the configured
//! threshold, prunes dead cache entries and drains again. Teardown runs
//! through `dispose`: the weak path reclaims only what the application has
//! already dropped, within a bounded retry loop; the forced path detaches
//! every live wrapper regardless of outstanding references.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use core_types::NativeHandle;

use crate::api::NativeApi;
use crate::cache::IdentityCache;
use crate::proxy::ProxyObject;
use crate::queue::{PendingRecycle, RecycleQueue};
use crate::strategy::{select_strategy, RecycleStrategy, Released};

/// Tunables supplied at factory construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Cache size above which `preprocess` prunes proactively
    pub cache_threshold: usize,
    /// Maximum drain/sleep rounds in a weak disposal
    pub dispose_retries: u32,
    /// Sleep between weak-disposal rounds, in milliseconds
    pub dispose_interval_ms: u64,
    /// Run a forced disposal when the factory itself is dropped
    pub dispose_on_drop: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        FactoryConfig {
            cache_threshold: 2048,
            dispose_retries: 10,
            dispose_interval_ms: 50,
            dispose_on_drop: true,
        }
    }
}

impl FactoryConfig {
    fn dispose_interval(&self) -> Duration {
        Duration::from_millis(self.dispose_interval_ms)
    }
}

/// Counters describing the engine's behavior, for diagnostics and tests.
#[derive(Debug, Default)]
pub struct RecycleStats {
    preprocess_calls: AtomicU64,
    proactive_prunes: AtomicU64,
    released: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl RecycleStats {
    /// Number of `preprocess` invocations.
    pub fn preprocess_calls(&self) -> u64 {
        self.preprocess_calls.load(Ordering::Relaxed)
    }

    /// Number of over-threshold prune-and-drain passes.
    pub fn proactive_prunes(&self) -> u64 {
        self.proactive_prunes.load(Ordering::Relaxed)
    }

    /// Handles released through the native call.
    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    /// Entries skipped per the exception tables or no-op strategy.
    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Release calls that failed (logged, never fatal).
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Outcome summary of a `dispose` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisposeReport {
    /// Wrappers still alive when disposal returned
    pub undisposed: usize,
    /// Queue entries processed during disposal
    pub processed: usize,
}

/// Owner of the per-session lifecycle machinery.
pub struct NotesFactory {
    api: Arc<dyn NativeApi>,
    cache: IdentityCache,
    queue: RecycleQueue,
    /// Selected once from the runtime version, fixed for the factory's life
    strategy: Box<dyn RecycleStrategy>,
    config: FactoryConfig,
    stats: RecycleStats,
}

impl NotesFactory {
    /// Creates a factory over `api` with the given tunables.
    pub fn new(api: Arc<dyn NativeApi>, config: FactoryConfig) -> Arc<Self> {
        let strategy = select_strategy(&api);
        Arc::new(NotesFactory {
            api,
            cache: IdentityCache::new(),
            queue: RecycleQueue::new(),
            strategy,
            config,
            stats: RecycleStats::default(),
        })
    }

    /// Returns the native API this factory releases through.
    pub fn api(&self) -> &Arc<dyn NativeApi> {
        &self.api
    }

    /// Returns the tunables this factory was built with.
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Returns the diagnostic counters.
    pub fn stats(&self) -> &RecycleStats {
        &self.stats
    }

    /// Returns the identity cache.
    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    /// Returns the recycle queue.
    pub fn queue(&self) -> &RecycleQueue {
        &self.queue
    }

    /// Looks up or constructs the wrapper for `handle`.
    ///
    /// While a strong reference to a previously returned wrapper is held,
    /// the same wrapper comes back; a fresh one is built only on a miss.
    /// Check-then-insert is not atomic: all wrapper construction for one
    /// factory happens on a single logical thread of control, mirroring the
    /// native threading model.
    pub fn instance(
        self: &Arc<Self>,
        parent: Option<Arc<ProxyObject>>,
        handle: NativeHandle,
    ) -> Arc<ProxyObject> {
        if let Some(existing) = self.cache.get(handle) {
            return existing;
        }
        let wrapper = Arc::new(ProxyObject::new(Arc::clone(self), parent, handle));
        self.cache.put(handle, &wrapper);
        wrapper
    }

    /// Pre-call hook run before every native access.
    ///
    /// Drains the queue; when the cache has grown past the threshold, prunes
    /// dead entries and drains again so outstanding native handles stay
    /// bounded. Never fails: this runs on every single native call and must
    /// not turn an unrelated operation into an error.
    pub fn preprocess(&self) {
        self.stats.preprocess_calls.fetch_add(1, Ordering::Relaxed);
        self.drain();
        if self.cache.len() > self.config.cache_threshold {
            let pruned = self.cache.prune();
            self.stats.proactive_prunes.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                "cache grew past threshold ({} > {}), pruned {} dead entries",
                self.cache.len() + pruned,
                self.config.cache_threshold,
                pruned
            );
            self.drain();
        }
    }

    /// Releases one queued entry immediately.
    ///
    /// Failures are logged and swallowed.
    pub fn recycle(&self, entry: PendingRecycle) {
        self.process(entry);
    }

    /// Releases a wrapper's handle immediately.
    ///
    /// The wrapper is detached and its cache entry removed; later method
    /// calls on it fail with `Recycled`. A second call is a no-op.
    pub fn recycle_object(&self, wrapper: &ProxyObject) {
        if let Some(handle) = wrapper.detach() {
            self.cache.remove(handle);
            self.process(PendingRecycle::new(handle, wrapper.session_link()));
        }
    }

    /// Queues an entry for deferred release.
    pub fn recycle_later(&self, entry: PendingRecycle) {
        self.queue.enqueue(entry);
    }

    /// Drains the queue completely, releasing every entry.
    ///
    /// A failed release is logged and never aborts the rest of the drain.
    /// Draining an empty queue is a no-op.
    ///
    /// # Returns
    ///
    /// The number of entries processed.
    pub fn drain(&self) -> usize {
        let mut processed = 0;
        while let Some(entry) = self.queue.dequeue() {
            self.process(entry);
            processed += 1;
        }
        processed
    }

    /// Session-teardown entry point.
    ///
    /// With `force` false, only wrappers the application has already dropped
    /// are reclaimed: up to `dispose_retries` rounds of drain-and-prune,
    /// sleeping `dispose_interval_ms` between rounds to let drops on other
    /// threads land, stopping early once the cache is empty. With `force`
    /// true, every live wrapper is detached and its handle queued regardless
    /// of outstanding references; afterwards the cache and queue are empty,
    /// and application code still holding a wrapper gets `Recycled` errors
    /// on use.
    ///
    /// Never fails; whatever remains is logged per object plus a summary.
    pub fn dispose(&self, force: bool) -> DisposeReport {
        let mut processed = self.drain();

        if force {
            for wrapper in self.cache.live() {
                if let Some(handle) = wrapper.detach() {
                    self.queue
                        .enqueue(PendingRecycle::new(handle, wrapper.session_link()));
                }
            }
            processed += self.drain();
            self.cache.clear();
        } else {
            for round in 0..self.config.dispose_retries {
                processed += self.drain();
                self.cache.prune();
                if self.cache.is_empty() {
                    break;
                }
                if round + 1 < self.config.dispose_retries {
                    std::thread::sleep(self.config.dispose_interval());
                }
            }
        }

        let remaining = self.cache.live();
        for wrapper in &remaining {
            tracing::warn!("undisposed object: {}", wrapper);
        }
        if !remaining.is_empty() {
            tracing::warn!("{} objects remain undisposed", remaining.len());
        }
        DisposeReport {
            undisposed: remaining.len(),
            processed,
        }
    }

    fn process(&self, entry: PendingRecycle) {
        match self.strategy.recycle(&entry) {
            Ok(Released::Released) => {
                self.stats.released.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("released {}", entry.handle);
            }
            Ok(Released::Skipped) => {
                self.stats.skipped.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("failed to release {}: {}", entry.handle, err);
            }
        }
    }
}

impl Drop for NotesFactory {
    /// Shutdown hook: by the time the factory drops, every wrapper is gone
    /// (each holds a strong factory reference), so this drains whatever the
    /// last drops queued.
    fn drop(&mut self) {
        if self.config.dispose_on_drop {
            let report = self.dispose(true);
            tracing::debug!(
                "factory dropped: {} entries processed, {} undisposed",
                report.processed,
                report.undisposed
            );
        }
    }
}

impl std::fmt::Debug for NotesFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotesFactory")
            .field("cache", &self.cache)
            .field("queue", &self.queue)
            .finish()
    }
}
