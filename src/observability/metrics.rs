use prometheus::{Encoder, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::models::CollectionKind;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub store_operations_total: IntCounterVec,
    pub records: IntGaugeVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let store_operations_total = IntCounterVec::new(
            Opts::new(
                "store_operations_total",
                "Record store operations by collection, operation and outcome",
            ),
            &["kind", "operation", "outcome"],
        )
        .expect("valid store_operations_total metric");

        let records = IntGaugeVec::new(
            Opts::new("records", "Records currently held per collection"),
            &["kind"],
        )
        .expect("valid records metric");

        registry
            .register(Box::new(store_operations_total.clone()))
            .expect("register store_operations_total");
        registry
            .register(Box::new(records.clone()))
            .expect("register records");

        Self {
            registry,
            store_operations_total,
            records,
        }
    }

    pub fn record_operation(&self, kind: CollectionKind, operation: &str, outcome: &str) {
        self.store_operations_total
            .with_label_values(&[kind.as_str(), operation, outcome])
            .inc();
    }

    pub fn set_records(&self, kind: CollectionKind, count: usize) {
        self.records
            .with_label_values(&[kind.as_str()])
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
