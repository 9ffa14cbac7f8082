//! Bound-address registry.
//!
//! Tracks which handle owns each bound address so a second bind on the
//! same address fails the way `EADDRINUSE` would.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use zsock_core::engine::HandleId;

#[derive(Debug, Default)]
pub(crate) struct BindRegistry {
    bound: DashMap<String, HandleId>,
}

impl BindRegistry {
    /// Claim `address` for `handle`.
    ///
    /// Returns the current owner if the address is already taken.
    pub(crate) fn claim(&self, address: &str, handle: HandleId) -> Result<(), HandleId> {
        match self.bound.entry(address.to_string()) {
            Entry::Occupied(owner) => Err(*owner.get()),
            Entry::Vacant(slot) => {
                slot.insert(handle);
                Ok(())
            }
        }
    }

    /// Drop `address` if `handle` still owns it.
    pub(crate) fn release(&self, address: &str, handle: HandleId) {
        self.bound.remove_if(address, |_, owner| *owner == handle);
    }

    pub(crate) fn is_bound(&self, address: &str) -> bool {
        self.bound.contains_key(address)
    }

    /// All currently bound addresses, primarily for debugging and tests.
    pub(crate) fn addresses(&self) -> Vec<String> {
        self.bound.iter().map(|entry| entry.key().clone()).collect()
    }
}
