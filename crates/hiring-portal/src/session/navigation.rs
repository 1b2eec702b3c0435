use std::sync::{Mutex, PoisonError};

use crate::access::Route;

/// Receives redirect requests raised by session lifecycle operations and the route guard.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: Route);
}

/// Navigator that only remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<Route> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: Route) {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
