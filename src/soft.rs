//! Weakly-retained value slots.
//!
//! The cache never keeps a stored value alive: each entry holds a
//! [`SoftValue`], a non-owning handle whose payload the host environment may
//! reclaim at any time by dropping its last strong [`Arc`]. The cache
//! observes the live → reclaimed transition only at the next lookup of the
//! key, which the façade reports as a *near-hit*.

use std::fmt;
use std::sync::{Arc, Weak};

/// Non-owning handle to a cached value.
///
/// Built from a borrowed [`Arc`]; upgrading yields the payload only while
/// someone outside the cache still holds a strong reference.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use softcache::soft::SoftValue;
///
/// let payload = Arc::new(42);
/// let slot = SoftValue::new(&payload);
/// assert!(slot.is_live());
/// assert_eq!(slot.get().as_deref(), Some(&42));
///
/// drop(payload);
/// assert!(!slot.is_live());
/// assert!(slot.get().is_none());
/// ```
pub struct SoftValue<V> {
    inner: Weak<V>,
}

impl<V> SoftValue<V> {
    /// Creates a slot tracking `value` without retaining it.
    pub fn new(value: &Arc<V>) -> Self {
        Self {
            inner: Arc::downgrade(value),
        }
    }

    /// Returns the payload if it is still live.
    pub fn get(&self) -> Option<Arc<V>> {
        self.inner.upgrade()
    }

    /// Returns `true` if the payload has not been reclaimed.
    pub fn is_live(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl<V> Clone for SoftValue<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V> fmt::Debug for SoftValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftValue")
            .field("live", &self.is_live())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_while_strong_reference_exists() {
        let payload = Arc::new("data".to_string());
        let slot = SoftValue::new(&payload);
        assert!(slot.is_live());
        assert_eq!(slot.get().as_deref(), Some(&"data".to_string()));
    }

    #[test]
    fn reclaimed_after_last_strong_drop() {
        let payload = Arc::new(vec![1u8, 2, 3]);
        let slot = SoftValue::new(&payload);
        drop(payload);
        assert!(!slot.is_live());
        assert!(slot.get().is_none());
    }

    #[test]
    fn clone_tracks_same_payload() {
        let payload = Arc::new(5);
        let slot = SoftValue::new(&payload);
        let other = slot.clone();
        drop(payload);
        assert!(!slot.is_live());
        assert!(!other.is_live());
    }

    #[test]
    fn slot_does_not_keep_payload_alive() {
        let payload = Arc::new(0u64);
        let _slot = SoftValue::new(&payload);
        assert_eq!(Arc::strong_count(&payload), 1);
    }
}
