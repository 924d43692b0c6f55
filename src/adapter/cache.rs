//! Build-once cache of compiled adapters
//!
//! Entries are only ever added. Each descriptor gets a slot; the first
//! caller to reach an empty slot runs discovery while holding that
//! slot's build lock, so concurrent first calls for one descriptor
//! discover once and every caller sees the same adapter. Published
//! adapters are read without locking the slot.

use super::compiled::CompiledAdapter;
use super::descriptor::OperationDescriptor;
use super::surface::Surface;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{info, warn};

struct Slot<S: Surface> {
    adapter: OnceLock<Arc<CompiledAdapter<S>>>,
    build: Mutex<()>,
}

impl<S: Surface> Default for Slot<S> {
    fn default() -> Self {
        Self {
            adapter: OnceLock::new(),
            build: Mutex::new(()),
        }
    }
}

/// Compiled adapters for one [`Surface`], keyed by descriptor.
pub struct AdapterCache<S: Surface> {
    surface: Arc<S>,
    slots: Mutex<HashMap<OperationDescriptor, Arc<Slot<S>>>>,
    discoveries: AtomicUsize,
}

impl<S: Surface> AdapterCache<S> {
    #[must_use]
    pub fn new(surface: Arc<S>) -> Self {
        Self {
            surface,
            slots: Mutex::new(HashMap::new()),
            discoveries: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub const fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    /// Return the adapter for `descriptor`, discovering it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContractMismatch`](crate::Error::ContractMismatch)
    /// if the surface lacks a member the descriptor names. Nothing is
    /// cached in that case.
    pub fn get_or_build(
        &self,
        descriptor: &OperationDescriptor,
    ) -> Result<Arc<CompiledAdapter<S>>> {
        let slot = self.slot(descriptor);
        if let Some(adapter) = slot.adapter.get() {
            return Ok(Arc::clone(adapter));
        }

        let _guard = slot.build.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(adapter) = slot.adapter.get() {
            return Ok(Arc::clone(adapter));
        }

        self.discoveries.fetch_add(1, Ordering::Relaxed);
        let adapter = match CompiledAdapter::discover(self.surface.as_ref(), descriptor) {
            Ok(adapter) => Arc::new(adapter),
            Err(e) => {
                warn!("Discovery failed for {}: {}", descriptor, e);
                return Err(e);
            }
        };

        let published = Arc::clone(slot.adapter.get_or_init(|| adapter));
        info!("Compiled adapter for {}", descriptor);
        Ok(published)
    }

    /// Number of discovery runs so far, failed ones included.
    #[must_use]
    pub fn discoveries(&self) -> usize {
        self.discoveries.load(Ordering::Relaxed)
    }

    /// Number of published adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_slots()
            .values()
            .filter(|slot| slot.adapter.get().is_some())
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, descriptor: &OperationDescriptor) -> Arc<Slot<S>> {
        let mut slots = self.lock_slots();
        if let Some(slot) = slots.get(descriptor) {
            return Arc::clone(slot);
        }
        let slot = Arc::new(Slot::default());
        slots.insert(descriptor.clone(), Arc::clone(&slot));
        slot
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, HashMap<OperationDescriptor, Arc<Slot<S>>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: Surface> std::fmt::Debug for AdapterCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterCache")
            .field("adapters", &self.len())
            .field("discoveries", &self.discoveries())
            .finish_non_exhaustive()
    }
}
