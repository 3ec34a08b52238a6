//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `boleto_nosso_numero_generated_total` - Nosso Números generated
//! - `boleto_campo_livre_encoded_total` - Free fields encoded
//! - `boleto_campo_livre_parse_failures_total` - Free fields rejected by the parser
//! - `boleto_remote_imports_total` - Slips imported from the settlement API
//! - `boleto_remote_unknown_status_total` - Imported statuses with no mapping

use crate::Result;
use prometheus::{IntCounter, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone, Debug)]
pub struct Metrics {
    /// Nosso Números generated
    pub nosso_numero_generated: IntCounter,

    /// Free fields encoded
    pub campo_livre_encoded: IntCounter,

    /// Free fields rejected by the parser
    pub campo_livre_parse_failures: IntCounter,

    /// Slips imported from the settlement API
    pub remote_imports: IntCounter,

    /// Imported statuses with no mapping
    pub remote_unknown_status: IntCounter,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter> {
    let counter = IntCounter::new(name, help)?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

impl Metrics {
    /// Create a collector with its own registry
    pub fn new() -> Result<Self> {
        Self::with_registry(Arc::new(Registry::new()))
    }

    /// Create a collector registered on `registry`
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        Ok(Self {
            nosso_numero_generated: counter(
                &registry,
                "boleto_nosso_numero_generated_total",
                "Total number of nosso numeros generated",
            )?,
            campo_livre_encoded: counter(
                &registry,
                "boleto_campo_livre_encoded_total",
                "Total number of free fields encoded",
            )?,
            campo_livre_parse_failures: counter(
                &registry,
                "boleto_campo_livre_parse_failures_total",
                "Total number of free fields rejected by the parser",
            )?,
            remote_imports: counter(
                &registry,
                "boleto_remote_imports_total",
                "Total number of slips imported from the settlement API",
            )?,
            remote_unknown_status: counter(
                &registry,
                "boleto_remote_unknown_status_total",
                "Total number of imported statuses with no mapping",
            )?,
            registry,
        })
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
