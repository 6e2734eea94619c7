use lazy_static::lazy_static;
use prometheus::{IntCounter, IntGauge, Registry};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref ACTIVE_SESSIONS: IntGauge =
        IntGauge::new("headsup_active_sessions", "Active ongoing sessions").expect("metric cannot be created");
    pub static ref CONNECTED_SCREENS: IntGauge =
        IntGauge::new("headsup_connected_screens", "Amount of screens connected")
            .expect("metric cannot be created");
    pub static ref ROUNDS_STARTED: IntCounter =
        IntCounter::new("headsup_rounds_started", "Rounds that entered the active stage")
            .expect("metric cannot be created");
    pub static ref ROUNDS_ENDED: IntCounter =
        IntCounter::new("headsup_rounds_ended", "Rounds that reached the end stage")
            .expect("metric cannot be created");
    pub static ref STALE_EVENTS_DROPPED: IntCounter =
        IntCounter::new("headsup_stale_events_dropped", "Timer, window and input events dropped as stale")
            .expect("metric cannot be created");
}

pub fn register_metrics() {
    REGISTRY
        .register(Box::new(ACTIVE_SESSIONS.clone()))
        .expect("collector cannot be registered");

    REGISTRY
        .register(Box::new(CONNECTED_SCREENS.clone()))
        .expect("collector cannot be registered");

    REGISTRY
        .register(Box::new(ROUNDS_STARTED.clone()))
        .expect("collector cannot be registered");

    REGISTRY
        .register(Box::new(ROUNDS_ENDED.clone()))
        .expect("collector cannot be registered");

    REGISTRY
        .register(Box::new(STALE_EVENTS_DROPPED.clone()))
        .expect("collector cannot be registered");
}
