//! Timed boot sequence played once before the prompt appears.
//!
//! The sequencer walks a fixed schedule of phases (blank screen, BIOS POST, memory test,
//! kernel log lines) and publishes each phase as it is entered. The only suspension
//! points are the delays between phases; there is no error path and no way to skip or
//! restart a sequence, since [`BootSequencer::run`] consumes the sequencer.

mod lines;

pub use lines::{BOOT_LINES, MEMORY_TEST_SIZE, POST_BANNER};

use std::time::Duration;

use tokio::sync::mpsc;

#[cfg(test)]
#[path = "boot_test.rs"]
mod tests;

/// One kernel-log style line. `delay_ms` is the pause before the line is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootLine {
    pub text: &'static str,
    pub delay_ms: u64,
}

/// Cursor over the boot screens. Variant order is the order they are entered, so the
/// derived `Ord` doubles as the monotonicity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BootPhase {
    PrePost,
    Post,
    MemoryTest,
    /// Lines `0..=n` are on screen.
    BootLine(usize),
    Done,
}

impl BootPhase {
    pub fn is_done(&self) -> bool {
        matches!(self, BootPhase::Done)
    }

    /// Lines visible in this phase; empty before the first line and after completion.
    pub fn revealed<'a>(&self, lines: &'a [BootLine]) -> &'a [BootLine] {
        match self {
            BootPhase::BootLine(n) => &lines[..(*n + 1).min(lines.len())],
            _ => &[],
        }
    }
}

/// Fixed waits around the per-line delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootTimings {
    pub pre_post: Duration,
    pub post_screen: Duration,
    pub memory_test: Duration,
    pub settle: Duration,
    /// Divides every wait, including per-line delays. 1 keeps the original pacing.
    pub speedup: u32,
}

impl Default for BootTimings {
    fn default() -> Self {
        Self {
            pre_post: Duration::from_millis(1000),
            post_screen: Duration::from_millis(2000),
            memory_test: Duration::from_millis(1500),
            settle: Duration::from_millis(500),
            speedup: 1,
        }
    }
}

impl BootTimings {
    pub fn with_speedup(mut self, speedup: u32) -> Self {
        self.speedup = speedup.max(1);
        self
    }

    fn scale(&self, wait: Duration) -> Duration {
        wait / self.speedup.max(1)
    }
}

pub struct BootSequencer {
    lines: Vec<BootLine>,
    timings: BootTimings,
    phase: BootPhase,
}

impl Default for BootSequencer {
    fn default() -> Self {
        Self::new(BOOT_LINES.to_vec(), BootTimings::default())
    }
}

impl BootSequencer {
    pub fn new(lines: Vec<BootLine>, timings: BootTimings) -> Self {
        Self {
            lines,
            timings,
            phase: BootPhase::PrePost,
        }
    }

    pub fn lines(&self) -> &[BootLine] {
        &self.lines
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    /// Every transition as `(wait before entering, phase entered)`, in order.
    pub fn schedule(&self) -> Vec<(Duration, BootPhase)> {
        let mut plan = Vec::with_capacity(self.lines.len() + 3);
        plan.push((self.timings.scale(self.timings.pre_post), BootPhase::Post));
        plan.push((self.timings.scale(self.timings.post_screen), BootPhase::MemoryTest));

        // The memory test screen stays up through the first line's own delay.
        let mut pending = self.timings.memory_test;
        for (i, line) in self.lines.iter().enumerate() {
            pending += Duration::from_millis(line.delay_ms);
            plan.push((self.timings.scale(pending), BootPhase::BootLine(i)));
            pending = Duration::ZERO;
        }

        plan.push((self.timings.scale(pending + self.timings.settle), BootPhase::Done));
        plan
    }

    /// Wall-clock length of the whole sequence.
    pub fn total_duration(&self) -> Duration {
        self.schedule().iter().map(|(wait, _)| *wait).sum()
    }

    fn advance(&mut self, next: BootPhase) {
        debug_assert!(next > self.phase, "boot phase moved backwards");
        self.phase = next;
    }

    /// Plays the sequence, invoking `on_phase` on entry to every phase including the
    /// initial blank screen. Returns the final phase, always [`BootPhase::Done`].
    pub async fn run<F>(mut self, mut on_phase: F) -> BootPhase
    where
        F: FnMut(BootPhase, &[BootLine]),
    {
        log::debug!(
            "Boot sequence starting: {} lines, {:?} total",
            self.lines.len(),
            self.total_duration()
        );
        on_phase(self.phase, &[]);

        for (wait, next) in self.schedule() {
            tokio::time::sleep(wait).await;
            self.advance(next);
            on_phase(self.phase, self.phase.revealed(&self.lines));
        }

        log::debug!("Boot sequence complete");
        self.phase
    }

    /// Same as [`BootSequencer::run`] but publishes phases on a channel. A dropped
    /// receiver does not stop the sequence.
    pub async fn run_into(self, tx: mpsc::UnboundedSender<BootPhase>) -> BootPhase {
        self.run(|phase, _| {
            let _ = tx.send(phase);
        })
        .await
    }
}
