use lazy_static::lazy_static;
use prometheus::{register_counter, register_counter_vec, register_gauge, Counter, CounterVec, Gauge};

lazy_static! {
    pub static ref BANNER_UPDATES_COUNTER: CounterVec = register_counter_vec!(
        "banner_updates_total",
        "Banner update requests by banner and outcome",
        &["banner", "status"]
    ).unwrap();

    pub static ref BANNER_EXPIRIES_COUNTER: CounterVec = register_counter_vec!(
        "banner_expiries_total",
        "Banners cleared by their expiry timer",
        &["banner"]
    ).unwrap();

    pub static ref EVENTS_PUBLISHED_COUNTER: Counter = register_counter!(
        "banner_events_published_total",
        "Banner change events published to the topic"
    ).unwrap();

    pub static ref WS_SUBSCRIBERS_GAUGE: Gauge = register_gauge!(
        "banner_ws_subscribers",
        "Connected websocket subscribers"
    ).unwrap();
}
