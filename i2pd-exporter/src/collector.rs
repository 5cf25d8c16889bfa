//! Turns a console snapshot into a Prometheus exposition document.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::exposition::{ExpositionWriter, Label};
use crate::extract::StatusPage;
use crate::mapping::{bool_value, sanitize_label_value};
use crate::scrape::ConsoleClient;

const UP: &str = "i2pd_up";
const UP_HELP: &str = "Whether the i2pd console is reachable";
const SCRAPE_DURATION: &str = "i2pd_scrape_duration_seconds";
const SCRAPE_DURATION_HELP: &str = "Time spent scraping i2pd console";

/// Render every known field found in `html`.
///
/// `i2pd_up 1` and the scrape duration are always present; other metrics
/// appear only when their field is on the page. Output order is fixed, so
/// the same input always yields the same bytes.
pub fn collect(html: &str, scrape_duration: Duration) -> String {
    let page = StatusPage::new(html);
    let mut w = ExpositionWriter::new();

    w.gauge(UP, UP_HELP, 1.0);
    w.gauge(
        SCRAPE_DURATION,
        SCRAPE_DURATION_HELP,
        scrape_duration.as_secs_f64(),
    );

    if let Some(seconds) = page.uptime_seconds() {
        w.gauge("i2pd_uptime_seconds", "Router uptime in seconds", seconds);
    }

    // Both protocols share one metric; the v6 sample relies on the v4 header.
    if let Some(status) = page.network_status_v4() {
        w.gauge_with_label(
            "i2pd_network_status",
            "Network status (1=OK, 0=other)",
            Label::new("protocol", "v4"),
            bool_value(status.is_ok()),
        );
    }
    if let Some(status) = page.network_status_v6() {
        w.gauge_with_label(
            "i2pd_network_status",
            "",
            Label::new("protocol", "v6"),
            bool_value(status.is_ok()),
        );
    }

    if let Some(rate) = page.tunnel_success_rate() {
        w.gauge(
            "i2pd_tunnel_creation_success_rate_percent",
            "Tunnel creation success rate",
            rate,
        );
    }

    for traffic in page.traffic() {
        let label = Label::new("direction", &traffic.direction);
        w.counter_with_label(
            "i2pd_traffic_bytes_total",
            "Total traffic in bytes",
            label,
            traffic.total_bytes,
        );
        w.gauge_with_label(
            "i2pd_traffic_bytes_per_second",
            "Traffic rate in bytes per second",
            label,
            traffic.bytes_per_second,
        );
    }

    // Network database
    if let Some(v) = page.routers() {
        w.gauge("i2pd_routers", "Number of known routers", v);
    }
    if let Some(v) = page.floodfills() {
        w.gauge("i2pd_floodfills", "Number of known floodfills", v);
    }
    if let Some(v) = page.leasesets() {
        w.gauge("i2pd_leasesets", "Number of known lease sets", v);
    }

    // Tunnels
    if let Some(v) = page.client_tunnels() {
        w.gauge("i2pd_client_tunnels", "Number of client tunnels", v);
    }
    if let Some(v) = page.transit_tunnels() {
        w.gauge("i2pd_transit_tunnels", "Number of transit tunnels", v);
    }

    // Info metrics carry their value in a label.
    if let Some(version) = page.version() {
        w.gauge_with_label(
            "i2pd_version_info",
            "i2pd version",
            Label::new("version", version),
            1.0,
        );
    }
    if let Some(caps) = page.router_caps() {
        w.gauge_with_label(
            "i2pd_router_caps_info",
            "Router capability flags",
            Label::new("caps", caps),
            1.0,
        );
    }

    for service in page.services() {
        let name = sanitize_label_value(&service.name);
        w.gauge_with_label(
            "i2pd_service_enabled",
            "Whether a service is enabled (1=yes, 0=no)",
            Label::new("service", &name),
            bool_value(service.enabled),
        );
    }

    w.finish()
}

/// Render the document served when the console could not be scraped.
pub fn render_down(scrape_duration: Duration) -> String {
    let mut w = ExpositionWriter::new();
    w.gauge(UP, UP_HELP, 0.0);
    w.gauge(
        SCRAPE_DURATION,
        SCRAPE_DURATION_HELP,
        scrape_duration.as_secs_f64(),
    );
    w.finish()
}

/// Scrapes the console on demand and renders the result.
///
/// Holds no per-scrape state; concurrent renders are independent.
pub struct StatusCollector {
    client: ConsoleClient,
}

impl StatusCollector {
    /// Create a new collector for the given console client.
    pub fn new(client: ConsoleClient) -> Self {
        Self { client }
    }

    /// Fetch the console page and render it, or the failure document.
    pub async fn render(&self) -> String {
        let start = Instant::now();

        match self.client.fetch().await {
            Ok(body) => {
                let elapsed = start.elapsed();
                debug!(
                    url = %self.client.url(),
                    duration_ms = elapsed.as_millis() as u64,
                    bytes = body.len(),
                    "Scraped console"
                );
                collect(&body, elapsed)
            }
            Err(e) => {
                let elapsed = start.elapsed();
                warn!(url = %self.client.url(), error = %e, "Scrape failed");
                render_down(elapsed)
            }
        }
    }
}

/// Create a shareable collector handle.
pub type SharedCollector = Arc<StatusCollector>;
