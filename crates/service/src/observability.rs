use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static CONTENT_READS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "clinic_content_reads_total",
        "Public content listings served, by collection",
        &["collection"]
    )
    .expect("register content_reads_total")
});

pub static CONTENT_FALLBACKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "clinic_content_fallbacks_total",
        "Filtered queries that failed and were retried unfiltered",
        &["collection"]
    )
    .expect("register content_fallbacks_total")
});

pub static CONTENT_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "clinic_content_failures_total",
        "Listings that degraded to an empty result",
        &["collection"]
    )
    .expect("register content_failures_total")
});

pub static ADMIN_WRITES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "clinic_admin_writes_total",
        "Dashboard writes accepted (create, update, delete, settings)"
    )
    .expect("register admin_writes_total")
});

pub static ADMIN_LOGIN_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "clinic_admin_login_failures_total",
        "Rejected dashboard logins"
    )
    .expect("register admin_login_failures_total")
});

/// Text exposition of the default registry.
pub fn encode_metrics() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("metrics encode error: {e}"))?;
    String::from_utf8(buffer).map_err(|e| format!("metrics encode error: {e}"))
}
