//! Incremental download progress for large bodies.

use log::debug;
use std::io::Write;

/// Minimum number of new bytes between two progress lines.
const REPORT_STEP_BYTES: u64 = 1024 * 1024;

/// Tracks received bytes and writes a progress line once the body is large enough.
///
/// Reporting starts immediately when the announced total reaches the
/// threshold, or as soon as the received byte count crosses it when the
/// server sent no length.
pub struct Progress<W: Write> {
    label: String,
    total: Option<u64>,
    threshold: u64,
    received: u64,
    last_reported: u64,
    active: bool,
    out: W,
}

impl<W: Write> Progress<W> {
    pub fn new(label: impl Into<String>, total: Option<u64>, threshold: u64, out: W) -> Self {
        Self {
            label: label.into(),
            total,
            threshold,
            received: 0,
            last_reported: 0,
            active: total.is_some_and(|t| t >= threshold),
            out,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    /// Records `bytes` more received bytes.
    pub fn advance(&mut self, bytes: u64) {
        self.received += bytes;

        if !self.active && self.received >= self.threshold {
            self.active = true;
        }

        if self.active
            && (self.last_reported == 0
                || self.received - self.last_reported >= REPORT_STEP_BYTES
                || Some(self.received) == self.total)
        {
            self.last_reported = self.received;
            self.emit(false);
        }
    }

    /// Writes the final line if reporting was active.
    pub fn finish(&mut self) {
        if self.active {
            self.emit(true);
        }
    }

    pub fn render(&self) -> String {
        match self.total {
            Some(total) if total > 0 => format!(
                "{}: {} / {} ({}%)",
                self.label,
                human_bytes(self.received),
                human_bytes(total),
                self.received.min(total) * 100 / total
            ),
            _ => format!("{}: {}", self.label, human_bytes(self.received)),
        }
    }

    fn emit(&mut self, last: bool) {
        let line = self.render();
        let result = if last {
            writeln!(self.out, "\r{}", line)
        } else {
            write!(self.out, "\r{}", line)
        }
        .and_then(|_| self.out.flush());

        if let Err(e) = result {
            debug!("Failed to write progress: {}", e);
        }
    }
}

fn human_bytes(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes >= 1024 * 1024 {
        format!("{:.2} MiB", bytes as f64 / MIB)
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
