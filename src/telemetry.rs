use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::market_data::adapters::FetchError;
use crate::market_data::normaliser::RecordIssue;

// Where log lines go. The TUI owns the terminal, so it logs to a file or nowhere.
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    Discard,
}

pub fn init_tracing(default_filter: &str, target: LogTarget<'_>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).compact();

    // try_init so a second call (tests, embedding) is not fatal
    let _ = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        LogTarget::Discard => builder.with_writer(std::io::sink).try_init(),
    };
    Ok(())
}

#[cfg(feature = "metrics-exporter")]
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()?;

    tracing::info!(port, "Prometheus exporter listening on /metrics");
    metrics::gauge!("coinboard_up").set(1.0);
    Ok(())
}

#[cfg(not(feature = "metrics-exporter"))]
pub fn init_metrics(_port: u16) -> anyhow::Result<()> {
    Ok(())
}

pub fn record_fetch_success(count: usize) {
    metrics::counter!("coinboard_fetch_total", "outcome" => "ok").increment(1);
    metrics::gauge!("coinboard_records").set(count as f64);
}

pub fn record_dropped_entry(issue: &RecordIssue) {
    let reason = match issue {
        RecordIssue::Shape => "shape",
        RecordIssue::MissingField(_) => "missing_field",
        RecordIssue::Negative { .. } => "negative",
        RecordIssue::DuplicateId(_) => "duplicate_id",
    };
    metrics::counter!("coinboard_records_dropped_total", "reason" => reason).increment(1);
}

/// Observability collaborator told about every failed fetch, exactly once.
pub trait FailureObserver: Send + Sync {
    fn fetch_failed(&self, err: &FetchError);
}

// Default observer: structured error log plus a metrics counter
pub struct TracingObserver;

impl FailureObserver for TracingObserver {
    fn fetch_failed(&self, err: &FetchError) {
        error!(kind = err.kind(), error = %err, "Error fetching market data");
        metrics::counter!("coinboard_fetch_total", "outcome" => err.kind()).increment(1);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use tracing::Subscriber;
    use tracing_subscriber::fmt::MakeWriter;

    // In-memory log sink; every level is kept so tests can count events
    #[derive(Clone, Default)]
    pub struct LogCapture {
        buf: Arc<Mutex<Vec<u8>>>,
    }

    impl LogCapture {
        pub fn subscriber(&self) -> impl Subscriber + Send + Sync {
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::TRACE)
                .with_ansi(false)
                .with_writer(self.clone())
                .finish()
        }

        pub fn lines(&self) -> Vec<String> {
            let buf = self.buf.lock().unwrap();
            String::from_utf8_lossy(&buf).lines().map(str::to_string).collect()
        }
    }

    impl Write for LogCapture {
        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            self.buf.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    // Collects failure messages so tests can count them
    #[derive(Default)]
    pub struct RecordingObserver {
        pub failures: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        pub fn count(&self) -> usize {
            self.failures.lock().unwrap().len()
        }
    }

    impl FailureObserver for RecordingObserver {
        fn fetch_failed(&self, err: &FetchError) {
            self.failures.lock().unwrap().push(err.to_string());
        }
    }
}
