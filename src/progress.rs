//! Completion tracking for a generation run.
//!
//! Workers never touch the display or a shared counter. Each finished job
//! sends one [`ProgressEvent`] down an `mpsc` channel, and a single
//! [`ProgressTracker`] on its own thread drains it: bump the count, draw the
//! bar. Because only the tracker increments and only the tracker writes, the
//! count cannot lose updates and the bar cannot move backwards or interleave
//! with another writer.
//!
//! ```text
//! \r[=========================                         ]  50%
//! \r[==================================================] 100%\n
//! ```
//!
//! The bar redraws in place with `\r`; the final draw (`completed == total`)
//! ends the line. A failed entry prints its own error line above the bar.

use crate::output;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

/// Outcome of one entry's generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Generated {
        headword: String,
    },
    Failed {
        headword: String,
        path: PathBuf,
        error: String,
    },
}

/// Counts accumulated by the tracker over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSummary {
    /// Jobs finished, successful or not.
    pub completed: usize,
    pub generated: usize,
    /// Headwords whose document could not be written.
    pub failed: Vec<String>,
}

pub struct ProgressTracker<W: Write> {
    total: usize,
    width: usize,
    show_bar: bool,
    /// A bar has been drawn without a trailing newline.
    mid_line: bool,
    sink: W,
    summary: ProgressSummary,
}

impl<W: Write> ProgressTracker<W> {
    pub fn new(total: usize, width: usize, sink: W) -> Self {
        Self {
            total,
            width,
            show_bar: true,
            mid_line: false,
            sink,
            summary: ProgressSummary::default(),
        }
    }

    /// Keep counting but draw nothing except failure lines.
    pub fn without_bar(mut self) -> Self {
        self.show_bar = false;
        self
    }

    pub fn summary(&self) -> &ProgressSummary {
        &self.summary
    }

    /// Account for one finished job and redraw.
    pub fn record(&mut self, event: &ProgressEvent) -> io::Result<()> {
        self.summary.completed += 1;
        match event {
            ProgressEvent::Generated { .. } => self.summary.generated += 1,
            ProgressEvent::Failed {
                headword,
                path,
                error,
            } => {
                self.summary.failed.push(headword.clone());
                if self.mid_line {
                    writeln!(self.sink)?;
                    self.mid_line = false;
                }
                writeln!(self.sink, "{}", output::format_entry_failure(path, error))?;
            }
        }

        if self.show_bar {
            let bar = output::format_progress_bar(self.summary.completed, self.total, self.width);
            write!(self.sink, "\r{bar}")?;
            if self.summary.completed >= self.total {
                writeln!(self.sink)?;
                self.mid_line = false;
            } else {
                self.mid_line = true;
            }
        }
        self.sink.flush()
    }

    /// Drain `events` until every sender is gone, then return the totals.
    ///
    /// Display errors (a closed stdout, say) are logged and do not stop the
    /// counting.
    pub fn run(mut self, events: Receiver<ProgressEvent>) -> ProgressSummary {
        for event in events {
            if let Err(err) = self.record(&event) {
                tracing::warn!(%err, "failed to draw progress");
            }
        }
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    fn generated(headword: &str) -> ProgressEvent {
        ProgressEvent::Generated {
            headword: headword.to_string(),
        }
    }

    fn drawn(tracker: &ProgressTracker<Vec<u8>>) -> String {
        String::from_utf8(tracker.sink.clone()).unwrap()
    }

    #[test]
    fn draws_once_per_completion() {
        let mut tracker = ProgressTracker::new(4, 8, Vec::new());
        for i in 0..4 {
            tracker.record(&generated(&i.to_string())).unwrap();
        }
        let out = drawn(&tracker);
        assert_eq!(out.matches('\r').count(), 4);
        assert!(out.contains("\r[==      ]  25%"));
        assert!(out.contains("\r[====    ]  50%"));
        assert!(out.ends_with("\r[========] 100%\n"));
    }

    #[test]
    fn only_final_draw_ends_line() {
        let mut tracker = ProgressTracker::new(3, 10, Vec::new());
        tracker.record(&generated("a")).unwrap();
        tracker.record(&generated("b")).unwrap();
        assert!(!drawn(&tracker).contains('\n'));
        tracker.record(&generated("c")).unwrap();
        assert_eq!(drawn(&tracker).matches('\n').count(), 1);
    }

    #[test]
    fn failure_counts_toward_completion() {
        let mut tracker = ProgressTracker::new(2, 10, Vec::new());
        tracker.record(&generated("好")).unwrap();
        tracker
            .record(&ProgressEvent::Failed {
                headword: "坏".into(),
                path: PathBuf::from("docs/坏.html"),
                error: "permission denied".into(),
            })
            .unwrap();

        let summary = tracker.summary();
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.generated, 1);
        assert_eq!(summary.failed, vec!["坏".to_string()]);

        let out = drawn(&tracker);
        // Error line starts on a fresh line after the 50% bar.
        assert!(out.contains("50%\nError creating file docs/坏.html: permission denied\n"));
        assert!(out.ends_with("100%\n"));
    }

    #[test]
    fn hidden_bar_still_counts() {
        let mut tracker = ProgressTracker::new(2, 10, Vec::new()).without_bar();
        tracker.record(&generated("a")).unwrap();
        tracker.record(&generated("b")).unwrap();
        assert!(drawn(&tracker).is_empty());
        assert_eq!(tracker.summary().completed, 2);
    }

    #[test]
    fn concurrent_senders_lose_no_updates() {
        const SENDERS: usize = 64;
        const PER_SENDER: usize = 100;
        let total = SENDERS * PER_SENDER;

        let (tx, rx) = mpsc::channel();
        let tracker = ProgressTracker::new(total, 50, io::sink());
        let handle = thread::spawn(move || tracker.run(rx));

        thread::scope(|s| {
            for sender in 0..SENDERS {
                let tx = tx.clone();
                s.spawn(move || {
                    for i in 0..PER_SENDER {
                        tx.send(generated(&format!("{sender}-{i}"))).unwrap();
                    }
                });
            }
        });
        drop(tx);

        let summary = handle.join().unwrap();
        assert_eq!(summary.completed, total);
        assert_eq!(summary.generated, total);
        assert!(summary.failed.is_empty());
    }
}
