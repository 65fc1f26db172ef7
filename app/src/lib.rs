pub mod cli;
pub mod live;

use std::future::Future;

use anyhow::Context;
use livepdf_core::style::parse_assignment;
use livepdf_core::{StyleSettings, StyleStore};

/// Initialize tracing/logging with the given directives
pub fn init_logging(directives: &[&str]) {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in directives {
        match directive.parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("Ignoring invalid log directive '{}': {}", directive, e),
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Run `future` to completion on a fresh Tokio runtime.
pub fn block_on<F, T>(future: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(future)
}

/// Build style settings from `field=value` assignments.
///
/// Unknown fields and malformed assignments are errors; values outside a
/// field's domain are reported and the default kept.
pub fn style_from_assignments(assignments: &[String]) -> anyhow::Result<StyleSettings> {
    let mut store = StyleStore::default();
    for assignment in assignments {
        let (field, value) = parse_assignment(assignment)?;
        if !store.try_update(field, &value) {
            tracing::warn!(field = %field, value = %value, "Style value out of range, keeping default");
        }
    }
    Ok(store.current().clone())
}
