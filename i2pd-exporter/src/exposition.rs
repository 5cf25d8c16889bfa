//! Prometheus text exposition writer.
//!
//! Samples are written in the order they are recorded. The `# HELP` and
//! `# TYPE` header for a metric name is written just before its first sample
//! and never again, so headers always precede the samples they describe.

use std::collections::HashSet;
use std::fmt::Write;

use crate::mapping::{MetricKind, escape_label_value, format_value};

/// A single `key="value"` label pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> Label<'a> {
    pub fn new(key: &'a str, value: &'a str) -> Self {
        Self { key, value }
    }
}

/// Accumulates samples for one collection pass.
///
/// Each pass owns a fresh writer; nothing is shared between scrapes.
#[derive(Debug, Default)]
pub struct ExpositionWriter {
    output: String,
    declared: HashSet<String>,
}

impl ExpositionWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an unlabeled gauge sample.
    pub fn gauge(&mut self, name: &str, help: &str, value: f64) {
        self.sample(name, MetricKind::Gauge, help, None, value);
    }

    /// Record a gauge sample carrying one label.
    pub fn gauge_with_label(&mut self, name: &str, help: &str, label: Label<'_>, value: f64) {
        self.sample(name, MetricKind::Gauge, help, Some(label), value);
    }

    /// Record a counter sample carrying one label.
    pub fn counter_with_label(&mut self, name: &str, help: &str, label: Label<'_>, value: f64) {
        self.sample(name, MetricKind::Counter, help, Some(label), value);
    }

    /// Record a sample, declaring the metric first if this is its first use.
    ///
    /// When a name is already declared, `kind` and `help` are ignored.
    pub fn sample(
        &mut self,
        name: &str,
        kind: MetricKind,
        help: &str,
        label: Option<Label<'_>>,
        value: f64,
    ) {
        if !self.declared.contains(name) {
            if !help.is_empty() {
                writeln!(self.output, "# HELP {} {}", name, help).ok();
            }
            writeln!(self.output, "# TYPE {} {}", name, kind.as_str()).ok();
            self.declared.insert(name.to_string());
        }

        match label {
            Some(label) => writeln!(
                self.output,
                "{}{{{}=\"{}\"}} {}",
                name,
                label.key,
                escape_label_value(label.value),
                format_value(value)
            )
            .ok(),
            None => writeln!(self.output, "{} {}", name, format_value(value)).ok(),
        };
    }

    /// Consume the writer and return the exposition document.
    pub fn finish(self) -> String {
        self.output
    }
}
