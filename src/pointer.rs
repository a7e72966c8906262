//! Process-wide pointer-down dispatch for outside-press detection.
//!
//! Widgets that need to close when the user presses outside their bounds
//! subscribe a listener on mount and hold the returned [`PointerGuard`];
//! dropping the guard (unmount) removes the registration unconditionally,
//! so repeated mounts never accumulate stale listeners.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, Weak};
use tracing::debug;

/// Identifies one widget's bounding region in pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(u64);

impl RegionId {
    /// Allocate a fresh process-unique region id.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        RegionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

type PointerListener = Box<dyn Fn(Option<RegionId>) + Send + Sync>;

/// Registry of pointer-down listeners.
///
/// The UI layer reports every pointer press through [`pointer_down`],
/// tagged with the region the press landed in (or `None` for free space);
/// every live listener observes every press.
///
/// [`pointer_down`]: PointerRouter::pointer_down
#[derive(Default)]
pub struct PointerRouter {
    listeners: Mutex<HashMap<u64, PointerListener>>,
    next_id: AtomicU64,
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-global router, created on first use.
    pub fn global() -> &'static Arc<PointerRouter> {
        static GLOBAL: OnceLock<Arc<PointerRouter>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(PointerRouter::new()))
    }

    fn lock_listeners(&self) -> MutexGuard<'_, HashMap<u64, PointerListener>> {
        match self.listeners.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register a listener for every subsequent pointer press.
    ///
    /// The registration lives exactly as long as the returned guard.
    pub fn subscribe(
        self: &Arc<Self>,
        listener: impl Fn(Option<RegionId>) + Send + Sync + 'static,
    ) -> PointerGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock_listeners().insert(id, Box::new(listener));
        debug!(listener_id = id, "pointer listener registered");
        PointerGuard {
            router: Arc::downgrade(self),
            id,
        }
    }

    /// Report a pointer press to every registered listener.
    pub fn pointer_down(&self, target: Option<RegionId>) {
        let listeners = self.lock_listeners();
        for listener in listeners.values() {
            listener(target);
        }
    }

    /// Number of live registrations; leak checks in tests rely on this.
    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }
}

impl std::fmt::Debug for PointerRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerRouter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Removes its listener registration when dropped.
#[derive(Debug)]
pub struct PointerGuard {
    router: Weak<PointerRouter>,
    id: u64,
}

impl Drop for PointerGuard {
    fn drop(&mut self) {
        if let Some(router) = self.router.upgrade() {
            router.lock_listeners().remove(&self.id);
            debug!(listener_id = self.id, "pointer listener removed");
        }
    }
}
