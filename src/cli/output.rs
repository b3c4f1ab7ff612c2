//! Output formatting for CLI

use crate::Summary;
use serde_json::json;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Line writer shared by workers streaming matches.
///
/// After the first failed write (typically a closed pipe) every later line is
/// dropped without touching the writer again.
pub struct LineStream<W> {
    writer: Mutex<W>,
    closed: AtomicBool,
}

impl<W: Write> LineStream<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            closed: AtomicBool::new(false),
        }
    }

    /// Write one line; returns `false` once the stream has failed.
    pub fn write_line(&self, line: &str) -> bool {
        if self.closed.load(Ordering::Relaxed) {
            return false;
        }

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        match writeln!(writer, "{line}") {
            Ok(()) => true,
            Err(err) => {
                if !self.closed.swap(true, Ordering::Relaxed) {
                    log::warn!("Stopped streaming matches: {err}");
                }
                false
            }
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

/// Matched paths, one per line.
#[must_use]
pub fn format_text(summary: &Summary) -> String {
    let mut out = String::new();
    for path in &summary.matches {
        out.push_str(path);
        out.push('\n');
    }
    out
}

/// Machine-readable rendering of a whole search.
#[must_use]
pub fn format_json(summary: &Summary) -> String {
    let value = json!({
        "roots": summary.roots,
        "matches": summary.matches,
        "errors": summary.errors,
        "stats": summary.stats,
        "enumerator": summary.enumerator.as_str(),
        "elapsed_ms": elapsed_ms(summary),
        "exhaustive": summary.is_exhaustive(),
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

/// One-line human summary for stderr.
#[must_use]
pub fn format_stats_line(summary: &Summary) -> String {
    let stats = &summary.stats;
    #[allow(clippy::cast_precision_loss)]
    let secs = elapsed_ms(summary) as f64 / 1000.0;
    let mut line = format!(
        "Found {} match(es) in {} directories ({} entries) in {secs:.2}s using {} worker(s)",
        stats.matches_found, stats.directories_scanned, stats.entries_seen, stats.workers
    );
    if stats.directories_failed > 0 {
        line.push_str(&format!(
            "; {} directories could not be read",
            stats.directories_failed
        ));
    }
    line
}

fn elapsed_ms(summary: &Summary) -> u64 {
    summary
        .finished_at
        .duration_since(summary.started_at)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}
