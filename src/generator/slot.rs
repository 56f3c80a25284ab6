use std::sync::Arc;

use crossbeam_utils::atomic::AtomicCell;

/// A value handed from the body's task to the controller.
pub(crate) struct Slot<T>(Arc<AtomicCell<Option<T>>>);

impl<T> Slot<T> {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicCell::new(None)))
    }

    pub(crate) fn put(&self, value: T) {
        self.0.store(Some(value));
    }

    pub(crate) fn take(&self) -> Option<T> {
        self.0.take()
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
