//! Audio patch handle allocation and tracking.
//!
//! Patches on the proxy are bookkeeping only: no audio is rerouted. The
//! registry hands out handles, remembers which ones are open, and refuses to
//! release or replace handles it does not know.

use std::collections::BTreeSet;
use std::fmt;

use parking_lot::Mutex;

use crate::error::{DeviceError, DeviceResult};
use crate::types::AudioPortConfig;

/// Opaque identifier of an open audio patch.
///
/// Handles are positive and never reused by the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatchHandle(i32);

impl PatchHandle {
    /// Wraps a raw handle received from the framework.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw value sent to the framework.
    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PatchHandle> for i32 {
    fn from(handle: PatchHandle) -> Self {
        handle.0
    }
}

const FIRST_HANDLE: i32 = 1;

struct PatchState {
    /// `None` once `i32::MAX` has been issued.
    next: Option<i32>,
    open: BTreeSet<PatchHandle>,
}

impl PatchState {
    /// Takes the next handle. Mutates nothing on failure.
    fn allocate(&mut self) -> DeviceResult<PatchHandle> {
        let raw = self.next.ok_or(DeviceError::PatchHandlesExhausted)?;
        self.next = raw.checked_add(1);
        Ok(PatchHandle(raw))
    }
}

/// Registry of open audio patches.
///
/// All operations run under one lock, so concurrent callers never observe a
/// half-finished [`update`](PatchRegistry::update).
///
/// # Example
///
/// ```
/// use audio_proxy::PatchRegistry;
///
/// let registry = PatchRegistry::new();
/// let first = registry.create(&[], &[]).unwrap();
/// let second = registry.update(first, &[], &[]).unwrap();
///
/// assert!(!registry.is_open(first));
/// assert!(registry.is_open(second));
/// ```
pub struct PatchRegistry {
    state: Mutex<PatchState>,
}

impl PatchRegistry {
    /// Creates an empty registry whose first handle is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(FIRST_HANDLE)
    }

    fn starting_at(next: i32) -> Self {
        Self {
            state: Mutex::new(PatchState {
                next: Some(next),
                open: BTreeSet::new(),
            }),
        }
    }

    /// The proxy always accepts patches.
    #[must_use]
    pub fn supports_patches(&self) -> bool {
        true
    }

    /// Opens a patch between `sources` and `sinks` and returns its handle.
    ///
    /// Port configurations are not inspected.
    pub fn create(
        &self,
        sources: &[AudioPortConfig],
        sinks: &[AudioPortConfig],
    ) -> DeviceResult<PatchHandle> {
        let mut state = self.state.lock();
        let handle = state.allocate()?;
        state.open.insert(handle);

        tracing::debug!(
            %handle,
            sources = sources.len(),
            sinks = sinks.len(),
            "audio patch created"
        );
        Ok(handle)
    }

    /// Releases an open patch.
    pub fn release(&self, handle: PatchHandle) -> DeviceResult<()> {
        if !self.state.lock().open.remove(&handle) {
            tracing::warn!(%handle, "release of unknown audio patch");
            return Err(DeviceError::InvalidArgument { handle });
        }

        tracing::debug!(%handle, "audio patch released");
        Ok(())
    }

    /// Replaces `previous` with a new patch in one step.
    ///
    /// If `previous` is not open nothing changes and no handle is consumed.
    pub fn update(
        &self,
        previous: PatchHandle,
        sources: &[AudioPortConfig],
        sinks: &[AudioPortConfig],
    ) -> DeviceResult<PatchHandle> {
        let mut state = self.state.lock();
        if !state.open.contains(&previous) {
            tracing::warn!(handle = %previous, "update of unknown audio patch");
            return Err(DeviceError::InvalidArgument { handle: previous });
        }

        let handle = state.allocate()?;
        state.open.remove(&previous);
        state.open.insert(handle);

        tracing::debug!(
            %previous,
            %handle,
            sources = sources.len(),
            sinks = sinks.len(),
            "audio patch updated"
        );
        Ok(handle)
    }

    /// Returns `true` if `handle` is currently open.
    #[must_use]
    pub fn is_open(&self, handle: PatchHandle) -> bool {
        self.state.lock().open.contains(&handle)
    }

    /// Snapshot of the open handles in ascending order.
    #[must_use]
    pub fn open_handles(&self) -> Vec<PatchHandle> {
        self.state.lock().open.iter().copied().collect()
    }

    /// Number of open patches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().open.len()
    }

    /// Returns `true` if no patch is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().open.is_empty()
    }
}

impl Default for PatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PatchRegistry")
            .field("next", &state.next)
            .field("open", &state.open)
            .finish()
    }
}
