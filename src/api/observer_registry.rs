use crate::error::{HistogramError, HistogramResult};
use crate::events::{SelectionEvent, SelectionObserver};
use crate::render::Renderer;

use super::SelectionEngine;

impl<R: Renderer> SelectionEngine<R> {
    /// Registers an observer under a unique id.
    ///
    /// Observers are notified synchronously, in registration order.
    pub fn register_observer(
        &mut self,
        id: impl Into<String>,
        observer: Box<dyn SelectionObserver>,
    ) -> HistogramResult<()> {
        let id = id.into();
        if id.is_empty() {
            return Err(HistogramError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.observers.contains_key(&id) {
            return Err(HistogramError::InvalidData(format!(
                "observer id '{id}' is already registered"
            )));
        }

        tracing::debug!(observer_id = %id, "registering selection observer");
        self.observers.insert(id, observer);
        Ok(())
    }

    /// Removes an observer; returns whether it was registered.
    pub fn unregister_observer(&mut self, id: &str) -> bool {
        self.observers.shift_remove(id).is_some()
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, id: &str) -> bool {
        self.observers.contains_key(id)
    }

    pub(super) fn emit(&mut self, event: SelectionEvent) {
        for observer in self.observers.values_mut() {
            observer.on_event(&event);
        }
    }
}
