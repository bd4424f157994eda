/*!
 * Progress reporting for folder scans.
 *
 * The scanner only consumes the [`ProgressReporter`] trait; the caller owns
 * the concrete sink. Callbacks are invoked synchronously from the scanning
 * thread.
 */

use indicatif::{ProgressBar, ProgressStyle};

/// Abstract progress sink driven by a folder scan.
///
/// Canonical determinate life-cycle: `set_range(0, 100)`, zero or more
/// `update(0..=100)`, then exactly one `finish()`. A negative `update` value
/// is the sentinel for indeterminate/busy state, as is an empty range.
pub trait ProgressReporter {
    /// Declare the numeric span of subsequent updates
    fn set_range(&mut self, min: i64, max: i64);

    /// Report progress; a negative value means indeterminate/busy
    fn update(&mut self, value: i64);

    /// Terminal signal, invoked exactly once per scan
    fn finish(&mut self);
}

/// Reporter that discards every callback
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn set_range(&mut self, _min: i64, _max: i64) {}

    fn update(&mut self, _value: i64) {}

    fn finish(&mut self) {}
}

/// Console reporter rendering an indicatif progress bar
pub struct ConsoleProgress {
    bar: ProgressBar,
    min: i64,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(Self::bar_style());
        Self { bar, min: 0 }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .or_else(|_| {
                ProgressStyle::default_bar()
                    .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
            })
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn go_indeterminate(&mut self) {
        self.bar.set_style(ProgressStyle::default_spinner());
        self.bar.enable_steady_tick(std::time::Duration::from_millis(100));
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn set_range(&mut self, min: i64, max: i64) {
        if max > min {
            self.min = min;
            self.bar.disable_steady_tick();
            self.bar.set_style(Self::bar_style());
            self.bar.set_length((max - min) as u64);
            self.bar.set_position(0);
        } else {
            self.go_indeterminate();
        }
    }

    fn update(&mut self, value: i64) {
        if value < 0 {
            self.go_indeterminate();
        } else {
            self.bar.set_position(value.saturating_sub(self.min).max(0) as u64);
        }
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}
