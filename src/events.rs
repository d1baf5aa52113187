use std::sync::{Arc, Mutex};

use crate::error::SqlUnitworkError;

type ErrorCallback = Box<dyn Fn(&SqlUnitworkError) + Send + Sync>;

/// Subscribable notification point for errors the operator helpers swallow.
///
/// Helpers report caught errors here instead of propagating them; the
/// boolean/empty-collection return values stay simple and detailed failure
/// information is opt-in. A hub starts with no subscribers, accepts any
/// number of them, and never clears them. Cloning shares the subscriber
/// list, so one hub can back several operators.
#[derive(Clone, Default)]
pub struct ErrorHub {
    subscribers: Arc<Mutex<Vec<ErrorCallback>>>,
}

impl ErrorHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a callback invoked with every reported error.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&SqlUnitworkError) + Send + Sync + 'static,
    {
        self.lock().push(Box::new(callback));
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Report an error to every subscriber. Always logged, so failures stay
    /// observable even with no subscribers attached.
    pub(crate) fn notify(&self, err: &SqlUnitworkError) {
        tracing::error!(error = %err, "database operation failed");
        for callback in self.lock().iter() {
            callback(err);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ErrorCallback>> {
        match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for ErrorHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
