use crate::window::SlidingWindow;
use chrono::{DateTime, Local};
use meter_protocol::Telemetry;
use std::path::Path;
use tracing::warn;

/// Flush the CSV writer every this many records, as a crash hedge.
const CSV_FLUSH_EVERY: u64 = 10;

/// A consumer of decoded samples.
///
/// Sinks are handed every record exactly once, in acquisition order. They
/// must not assume anything about their position relative to other sinks.
pub trait RecordSink: Send {
    /// Accepts one decoded sample.
    fn record(&mut self, sample: &Telemetry) -> anyhow::Result<()>;

    /// Forces buffered output out.
    fn flush(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Flushes and releases the sink. Called once, at shutdown.
    fn close(&mut self) -> anyhow::Result<()> {
        self.flush()
    }
}

/// Prints one line per sample to stdout.
pub struct ConsoleSink;

impl RecordSink for ConsoleSink {
    fn record(&mut self, sample: &Telemetry) -> anyhow::Result<()> {
        println!(
            "{}: {:.3}V {:.3}A {:.3}W",
            sample.timestamp, sample.voltage_v, sample.current_a, sample.power_w
        );
        Ok(())
    }
}

/// Writes `time,Volts,Amps,Watts` rows, with time as the elapsed duration
/// since the first recorded sample.
pub struct CsvSink {
    writer: csv::Writer<std::fs::File>,
    first: Option<DateTime<Local>>,
    written: u64,
}

impl CsvSink {
    /// Creates the output file, overwriting any existing file at `path`.
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            warn!(path = %path.display(), "output file already exists, overwriting");
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["time", "Volts", "Amps", "Watts"])?;

        Ok(Self { writer, first: None, written: 0 })
    }
}

impl RecordSink for CsvSink {
    fn record(&mut self, sample: &Telemetry) -> anyhow::Result<()> {
        let first = *self.first.get_or_insert(sample.timestamp);
        let elapsed_s = (sample.timestamp - first).num_milliseconds() as f64 / 1000.0;

        self.writer.serialize((
            format!("{elapsed_s:.3}"),
            sample.voltage_v,
            sample.current_a,
            sample.power_w,
        ))?;

        self.written += 1;
        if self.written % CSV_FLUSH_EVERY == 0 {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Stand-in for a chart pane: keeps its own window of recent samples and
/// prints a rolling min/mean/max summary per record.
pub struct LiveViewSink {
    window: SlidingWindow,
}

impl LiveViewSink {
    pub fn new(capacity: usize) -> Self {
        Self { window: SlidingWindow::new(capacity) }
    }
}

impl RecordSink for LiveViewSink {
    fn record(&mut self, sample: &Telemetry) -> anyhow::Result<()> {
        self.window.push(sample.clone());

        let snapshot = self.window.snapshot();
        let volts = summarize(snapshot.iter().map(|s| s.voltage_v));
        let amps = summarize(snapshot.iter().map(|s| s.current_a));
        let watts = summarize(snapshot.iter().map(|s| s.power_w));

        println!(
            "  last {}: V {} | A {} | W {}",
            snapshot.len(),
            volts,
            amps,
            watts
        );
        Ok(())
    }
}

fn summarize(values: impl Iterator<Item = f64>) -> String {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut count = 0usize;

    for value in values {
        min = min.min(value);
        max = max.max(value);
        sum += value;
        count += 1;
    }

    if count == 0 {
        return "-".to_string();
    }
    format!("{:.3}/{:.3}/{:.3}", min, sum / count as f64, max)
}
