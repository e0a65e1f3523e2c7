//! Terminal output: `[module]` prefixed log lines and an in-place progress line.
//!
//! ```ignore
//! log!("links"; "checking {} documents", count);
//! debug!("urls"; "{}: {}", path, err); // only with --verbose
//!
//! let progress = ProgressLine::new("urls", total, &["checked", "missing"]);
//! progress.inc("checked");
//! progress.finish();
//! ```

use std::io::{StdoutLock, Write, stdout};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set while a progress line owns the current terminal line.
static PROGRESS_ACTIVE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Print a line under a colored `[module]` prefix.
///
/// ```ignore
/// log!("warning"; "unknown fields in {}", name);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like `log!`, but silent unless `--verbose` was given.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

pub fn log(module: &str, message: &str) {
    let mut out = stdout().lock();
    // A pending progress line would otherwise be glued to the message.
    if PROGRESS_ACTIVE.load(Ordering::Acquire) {
        clear_line(&mut out);
    }
    writeln!(out, "{} {message}", prefix(module)).ok();
    out.flush().ok();
}

fn prefix(module: &str) -> String {
    let tag = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "links" => tag.bright_blue().bold().to_string(),
        "urls" => tag.bright_green().bold().to_string(),
        "error" => tag.bright_red().bold().to_string(),
        "warning" => tag.bright_magenta().bold().to_string(),
        _ => tag.bright_yellow().bold().to_string(),
    }
}

fn clear_line(out: &mut StdoutLock<'_>) {
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
}

/// Progress over a fixed number of items, redrawn in place.
///
/// The first counter is shown against the total, e.g.
/// `[urls] checked(42/69) missing(5)`. Redraws use `try_lock`, so workers
/// never wait on the terminal; a skipped redraw is caught up by the next one.
pub struct ProgressLine {
    module: &'static str,
    total: usize,
    counters: Vec<(&'static str, AtomicUsize)>,
    redraw: Mutex<()>,
    finished: bool,
}

impl ProgressLine {
    pub fn new(module: &'static str, total: usize, counters: &[&'static str]) -> Self {
        PROGRESS_ACTIVE.store(true, Ordering::Release);
        let progress = Self {
            module,
            total,
            counters: counters
                .iter()
                .map(|name| (*name, AtomicUsize::new(0)))
                .collect(),
            redraw: Mutex::new(()),
            finished: false,
        };
        progress.draw(false);
        progress
    }

    /// Bump a counter by one. Unknown names are ignored.
    pub fn inc(&self, name: &str) {
        let Some((_, count)) = self.counters.iter().find(|(n, _)| *n == name) else {
            return;
        };
        count.fetch_add(1, Ordering::Relaxed);
        if let Some(_guard) = self.redraw.try_lock() {
            self.draw(false);
        }
    }

    fn render(&self) -> String {
        let mut line = prefix(self.module);
        for (i, (name, count)) in self.counters.iter().enumerate() {
            let count = count.load(Ordering::Relaxed);
            if i == 0 {
                line.push_str(&format!(" {name}({count}/{})", self.total));
            } else {
                line.push_str(&format!(" {name}({count})"));
            }
        }
        line
    }

    fn draw(&self, newline: bool) {
        let line = self.render();
        let mut out = stdout().lock();
        clear_line(&mut out);
        if newline {
            writeln!(out, "{line}").ok();
        } else {
            write!(out, "{line}").ok();
        }
        out.flush().ok();
    }

    /// Leave the final counts on screen and release the line.
    pub fn finish(mut self) {
        self.complete();
    }

    fn complete(&mut self) {
        {
            let _guard = self.redraw.lock();
            self.draw(true);
        }
        self.finished = true;
        PROGRESS_ACTIVE.store(false, Ordering::Release);
    }
}

impl Drop for ProgressLine {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // Abandoned before completion: wipe the partial line.
        PROGRESS_ACTIVE.store(false, Ordering::Release);
        let mut out = stdout().lock();
        clear_line(&mut out);
        out.flush().ok();
    }
}
