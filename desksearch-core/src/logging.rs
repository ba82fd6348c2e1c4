//! Structured logging with tracing
//!
//! Logs go to stderr so search output on stdout stays clean. Queries are
//! timed and slow ones are reported under the `slow_query` target.

use crate::config::LoggingSettings;
use crate::query::Query;
use crate::record::RecordType;
use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Initialize the logging system. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_logging(settings: &LoggingSettings) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("Invalid log level '{}'", settings.level))?,
    };

    let subscriber = Registry::default().with(env_filter);

    if settings.json {
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true);

        subscriber
            .with(json_layer)
            .try_init()
            .context("Failed to install log subscriber")?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact();

        subscriber
            .with(fmt_layer)
            .try_init()
            .context("Failed to install log subscriber")?;
    }

    tracing::debug!(level = %settings.level, json = settings.json, "Logging initialized");
    Ok(())
}

/// Measures one query from load to match
#[derive(Debug)]
pub struct QueryTimer {
    start_time: Instant,
    record_type: RecordType,
    field: String,
    threshold: Duration,
}

impl QueryTimer {
    /// Start timing a query. A zero threshold disables slow-query warnings.
    pub fn start(query: &Query, threshold: Duration) -> Self {
        Self {
            start_time: Instant::now(),
            record_type: query.record_type,
            field: query.field.clone(),
            threshold,
        }
    }

    /// Stop timing and log the outcome
    pub fn finish(self, matched: usize) -> Duration {
        let duration = self.start_time.elapsed();
        let duration_ms = duration.as_millis() as u64;

        tracing::debug!(
            collection = %self.record_type,
            field = %self.field,
            matched,
            duration_ms,
            "Query complete"
        );

        if self.is_slow(duration) {
            tracing::warn!(
                target: "slow_query",
                collection = %self.record_type,
                field = %self.field,
                duration_ms,
                threshold_ms = self.threshold.as_millis() as u64,
                "Slow query detected"
            );
        }

        duration
    }

    fn is_slow(&self, duration: Duration) -> bool {
        !self.threshold.is_zero() && duration >= self.threshold
    }
}
