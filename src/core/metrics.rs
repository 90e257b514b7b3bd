use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

pub(crate) fn record_rating(outcome: &'static str) {
    metrics::counter!("course_ratings_total", "outcome" => outcome).increment(1);
}

pub(crate) fn record_upload(bytes: usize) {
    metrics::counter!("course_uploads_total").increment(1);
    metrics::histogram!("course_upload_bytes").record(bytes as f64);
}

pub(crate) fn record_booking(payment_status: &'static str) {
    metrics::counter!("bookings_created_total", "payment_status" => payment_status).increment(1);
}
