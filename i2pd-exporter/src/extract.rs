//! Field extraction from the i2pd web console status page.
//!
//! The console renders its status as loosely structured HTML
//! (`<b>Routers:</b> 10100&nbsp;...`). Each field is located with its own
//! pattern over the raw text, so missing, reordered or malformed markup
//! around a field does not affect the others. A field that cannot be found
//! is reported as absent, never as zero.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::mapping::unit_multiplier;

// Character classes are spelled out as ASCII: `\d`, `\w` and `\s` would also
// match non-ASCII digits, letters and spaces.
static UPTIME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<b>Uptime:</b>[\t\n\f\r ]*(.+?)<br").unwrap());

static UPTIME_PART_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+)[\t\n\f\r ]+(day|hour|minute|second)").unwrap());

static NET_STATUS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<b>Network status:</b>[\t\n\f\r ]*([A-Za-z0-9_]+)").unwrap()
});

static NET_STATUS_V6_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<b>Network status v6:</b>[\t\n\f\r ]*([A-Za-z0-9_]+)").unwrap()
});

static TUNNEL_RATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<b>Tunnel creation success rate:</b>[\t\n\f\r ]*([0-9.]+)[\t\n\f\r ]*%")
        .unwrap()
});

// <b>Received:</b> 100.1 GiB (3301.31 KiB/s)
static TRAFFIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)<b>(Received|Sent|Transit):</b>[\t\n\f\r ]*",
        r"([0-9.]+)[\t\n\f\r ]*([A-Za-z0-9_]+)[\t\n\f\r ]*",
        r"\(([0-9.]+)[\t\n\f\r ]*([A-Za-z0-9_]+/s)\)",
    ))
    .unwrap()
});

static ROUTERS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<b>Routers:</b>[\t\n\f\r ]*([0-9]+)").unwrap());

static FLOODFILLS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<b>Floodfills:</b>[\t\n\f\r ]*([0-9]+)").unwrap());

static LEASESETS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<b>LeaseSets:</b>[\t\n\f\r ]*([0-9]+)").unwrap());

static CLIENT_TUNNELS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<b>Client Tunnels:</b>[\t\n\f\r ]*([0-9]+)").unwrap());

static TRANSIT_TUNNELS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<b>Transit Tunnels:</b>[\t\n\f\r ]*([0-9]+)").unwrap());

static VERSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<b>Version:</b>[\t\n\f\r ]*([0-9.]+)").unwrap());

static CAPS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<b>Router Caps:</b>[\t\n\f\r ]*([A-Za-z0-9_]+)").unwrap()
});

// Services table rows are matched case-sensitively, as the console emits them.
static SERVICE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<tr><td>([^<]+)</td><td[\t\n\f\r ]+class='(enabled|disabled)'").unwrap()
});

/// Traffic counters for one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Traffic {
    /// Lowercased direction: `received`, `sent` or `transit`.
    pub direction: String,
    /// Total bytes since router start.
    pub total_bytes: f64,
    /// Current rate in bytes per second.
    pub bytes_per_second: f64,
}

/// One row of the services table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceState {
    /// Display name as shown by the console, e.g. `HTTP Proxy`.
    pub name: String,
    pub enabled: bool,
}

/// Router network reachability as reported by the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkStatus {
    /// The raw status word, e.g. `OK`, `Firewalled`, `Testing`.
    pub status: String,
}

impl NetworkStatus {
    /// Only an exact `OK` counts as healthy.
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// A borrowed view over one console snapshot.
#[derive(Debug, Clone, Copy)]
pub struct StatusPage<'a> {
    html: &'a str,
}

impl<'a> StatusPage<'a> {
    pub fn new(html: &'a str) -> Self {
        Self { html }
    }

    /// Router uptime in seconds.
    ///
    /// Every `<n> day|hour|minute|second` occurrence in the uptime text is
    /// summed, so repeated units accumulate.
    pub fn uptime_seconds(&self) -> Option<f64> {
        let text = capture(&UPTIME_REGEX, self.html)?;

        let seconds: f64 = UPTIME_PART_REGEX
            .captures_iter(text)
            .map(|caps| {
                let n = parse_number(&caps[1]);
                let unit = caps[2].to_ascii_lowercase();
                let factor = if unit.starts_with("day") {
                    86_400.0
                } else if unit.starts_with("hour") {
                    3_600.0
                } else if unit.starts_with("minute") {
                    60.0
                } else {
                    1.0
                };
                n * factor
            })
            .sum();

        Some(seconds)
    }

    /// IPv4 network status.
    pub fn network_status_v4(&self) -> Option<NetworkStatus> {
        capture(&NET_STATUS_REGEX, self.html).map(|status| NetworkStatus {
            status: status.to_string(),
        })
    }

    /// IPv6 network status.
    pub fn network_status_v6(&self) -> Option<NetworkStatus> {
        capture(&NET_STATUS_V6_REGEX, self.html).map(|status| NetworkStatus {
            status: status.to_string(),
        })
    }

    /// Tunnel creation success rate in percent.
    pub fn tunnel_success_rate(&self) -> Option<f64> {
        capture_number(&TUNNEL_RATE_REGEX, self.html)
    }

    /// Traffic totals and rates, in page order.
    pub fn traffic(&self) -> Vec<Traffic> {
        TRAFFIC_REGEX
            .captures_iter(self.html)
            .map(|caps| Traffic {
                direction: caps[1].to_lowercase(),
                total_bytes: parse_number(&caps[2]) * unit_multiplier(&caps[3]),
                bytes_per_second: parse_number(&caps[4]) * unit_multiplier(&caps[5]),
            })
            .collect()
    }

    /// Number of routers in the local netdb.
    pub fn routers(&self) -> Option<f64> {
        capture_number(&ROUTERS_REGEX, self.html)
    }

    /// Number of floodfill routers in the local netdb.
    pub fn floodfills(&self) -> Option<f64> {
        capture_number(&FLOODFILLS_REGEX, self.html)
    }

    /// Number of lease sets in the local netdb.
    pub fn leasesets(&self) -> Option<f64> {
        capture_number(&LEASESETS_REGEX, self.html)
    }

    pub fn client_tunnels(&self) -> Option<f64> {
        capture_number(&CLIENT_TUNNELS_REGEX, self.html)
    }

    pub fn transit_tunnels(&self) -> Option<f64> {
        capture_number(&TRANSIT_TUNNELS_REGEX, self.html)
    }

    /// The i2pd version string, e.g. `2.59.0`.
    pub fn version(&self) -> Option<&'a str> {
        capture(&VERSION_REGEX, self.html)
    }

    /// Router capability flags, e.g. `PR`.
    pub fn router_caps(&self) -> Option<&'a str> {
        capture(&CAPS_REGEX, self.html)
    }

    /// Every row of the services table, in page order and without dedup.
    pub fn services(&self) -> Vec<ServiceState> {
        SERVICE_REGEX
            .captures_iter(self.html)
            .map(|caps| ServiceState {
                name: caps[1].to_string(),
                enabled: &caps[2] == "enabled",
            })
            .collect()
    }
}

/// First capture group of the first match.
fn capture<'h>(regex: &Regex, html: &'h str) -> Option<&'h str> {
    regex
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn capture_number(regex: &Regex, html: &str) -> Option<f64> {
    capture(regex, html).map(parse_number)
}

/// Parse a captured digit run. Malformed numbers (`1.2.3`) count as zero.
fn parse_number(text: &str) -> f64 {
    text.parse().unwrap_or(0.0)
}
