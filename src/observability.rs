use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("palaver.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("palaver.client.request_errors");
pub(crate) static CLIENT_REQUEST_CANCELLATIONS: Counter =
    Counter::new("palaver.client.request_cancellations");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("palaver.client.request_duration_seconds");

pub(crate) static TURNS_STARTED: Counter = Counter::new("palaver.controller.turns_started");
pub(crate) static TURNS_COMPLETED: Counter = Counter::new("palaver.controller.turns_completed");
pub(crate) static TURNS_FAILED: Counter = Counter::new("palaver.controller.turns_failed");
pub(crate) static TURNS_CANCELLED: Counter = Counter::new("palaver.controller.turns_cancelled");
pub(crate) static SESSIONS_CREATED: Counter = Counter::new("palaver.controller.sessions_created");

pub(crate) static STORE_LOADS: Counter = Counter::new("palaver.store.loads");
pub(crate) static STORE_LOAD_ERRORS: Counter = Counter::new("palaver.store.load_errors");
pub(crate) static STORE_SAVES: Counter = Counter::new("palaver.store.saves");
pub(crate) static STORE_SAVE_ERRORS: Counter = Counter::new("palaver.store.save_errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_REQUEST_CANCELLATIONS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&TURNS_STARTED);
    collector.register_counter(&TURNS_COMPLETED);
    collector.register_counter(&TURNS_FAILED);
    collector.register_counter(&TURNS_CANCELLED);
    collector.register_counter(&SESSIONS_CREATED);

    collector.register_counter(&STORE_LOADS);
    collector.register_counter(&STORE_LOAD_ERRORS);
    collector.register_counter(&STORE_SAVES);
    collector.register_counter(&STORE_SAVE_ERRORS);
}
