//! Terminal logging with colored prefixes and progress bars.
//!
//! - `log!` writes one line per message, prefixed with a colored `[module]`
//! - `ProgressBars` shows one bar per build stage while files are processed
//!
//! # Example
//!
//! ```ignore
//! log!("build"; "{} pages", count);
//!
//! let progress = ProgressBars::new(&[("pages", 12), ("assets", 3)]);
//! progress.inc("pages");
//! progress.finish();
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType, size},
};
use std::{
    io::{IsTerminal, Write, stdout},
    sync::{
        Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Rows currently reserved by progress bars
static BAR_ROWS: AtomicUsize = AtomicUsize::new(0);

// Progress bar format: "[module] [████░░░░] 42/100"
//                       ^------^ ^-------^ ^----^
//                       prefix   bar       count

/// "[" and "]" around the module name
const BRACKET_LEN: usize = 2;
/// Space between prefix and message
const SPACE_AFTER_PREFIX: usize = 1;
/// " []" around the bar itself
const BAR_WRAPPER_LEN: usize = 3;
/// Space between bar and counter
const SPACE_BEFORE_COUNT: usize = 1;
const MIN_BAR_WIDTH: usize = 10;
const MAX_BAR_WIDTH: usize = 40;

#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Terminal width, falling back to 120 columns when it can't be detected.
fn terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

/// Log a message with a colored module prefix.
///
/// ```ignore
/// log!("css"; "compiled {}", path.display());
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

// ============================================================================
// Progress Bars
// ============================================================================

/// One bar per named stage, redrawn in place.
///
/// Bars are only drawn when stdout is a terminal; otherwise every call is a
/// no-op apart from counting.
pub struct ProgressBars {
    bars: Vec<ProgressBar>,
    interactive: bool,
    lock: Mutex<()>,
}

struct ProgressBar {
    name: &'static str,
    prefix: ColoredString,
    prefix_len: usize,
    total: usize,
    current: AtomicUsize,
    row: usize,
}

impl ProgressBars {
    /// Reserve one terminal row per `(name, total)` stage.
    pub fn new(stages: &[(&'static str, usize)]) -> Self {
        let interactive = stdout().is_terminal();

        if interactive {
            let mut out = stdout().lock();
            for _ in stages {
                writeln!(out).ok();
            }
            out.flush().ok();
            BAR_ROWS.store(stages.len(), Ordering::SeqCst);
        }

        let bars = stages
            .iter()
            .enumerate()
            .map(|(row, (name, total))| ProgressBar {
                name,
                prefix: colorize_prefix(name),
                prefix_len: calc_prefix_len(name.len()),
                total: *total,
                current: AtomicUsize::new(0),
                row,
            })
            .collect();

        Self {
            bars,
            interactive,
            lock: Mutex::new(()),
        }
    }

    /// Advance the bar registered under `name`. Unknown names are ignored.
    pub fn inc(&self, name: &str) {
        let Some(bar) = self.bars.iter().find(|bar| bar.name == name) else {
            return;
        };
        let current = bar.current.fetch_add(1, Ordering::Relaxed) + 1;
        if self.interactive {
            self.draw(bar, current);
        }
    }

    /// Number of increments recorded for `name`.
    pub fn count(&self, name: &str) -> usize {
        self.bars
            .iter()
            .find(|bar| bar.name == name)
            .map_or(0, |bar| bar.current.load(Ordering::Relaxed))
    }

    fn draw(&self, bar: &ProgressBar, current: usize) {
        let _guard = self.lock.lock().ok();

        let width = terminal_width() as usize;
        let counter = format!("{}/{}", current, bar.total);
        let overhead = bar.prefix_len + BAR_WRAPPER_LEN + SPACE_BEFORE_COUNT + counter.len();
        let bar_width = width
            .saturating_sub(overhead)
            .clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH);

        let filled = if bar.total > 0 {
            (current.min(bar.total) * bar_width) / bar.total
        } else {
            0
        };
        let drawn = "█".repeat(filled) + &"░".repeat(bar_width - filled);

        let mut out = stdout().lock();
        #[allow(clippy::cast_possible_truncation)] // a handful of rows
        let lines_up = (self.bars.len() - bar.row) as u16;
        execute!(out, cursor::MoveUp(lines_up), Clear(ClearType::CurrentLine)).ok();
        write!(out, "{} [{}] {}", bar.prefix, drawn, counter).ok();
        execute!(out, cursor::MoveDown(lines_up)).ok();
        write!(out, "\r").ok();
        out.flush().ok();
    }

    /// Erase the bars and hand the rows back to `log`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn finish(&self) {
        if !self.interactive || BAR_ROWS.swap(0, Ordering::SeqCst) == 0 {
            return;
        }
        let _guard = self.lock.lock().ok();

        let mut out = stdout().lock();
        let rows = self.bars.len() as u16;
        execute!(out, cursor::MoveUp(rows), Clear(ClearType::FromCursorDown)).ok();
        out.flush().ok();
    }
}

impl Drop for ProgressBars {
    fn drop(&mut self) {
        self.finish();
    }
}

// ============================================================================
// Plain Logging
// ============================================================================

/// Print `[module] message`, truncated to the terminal width.
///
/// While progress bars are active the message is printed above them.
#[allow(clippy::cast_possible_truncation)]
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut out = stdout().lock();

    let rows = BAR_ROWS.load(Ordering::SeqCst);
    if rows > 0 {
        execute!(out, cursor::MoveUp(rows as u16), Clear(ClearType::FromCursorDown)).ok();
    }

    // Multiline messages (error chains) are never truncated
    let message = if message.contains('\n') {
        message
    } else {
        let max_len = (terminal_width() as usize).saturating_sub(calc_prefix_len(module.len()));
        truncate_str(message, max_len)
    };
    writeln!(out, "{prefix} {message}").ok();

    for _ in 0..rows {
        writeln!(out).ok();
    }
    out.flush().ok();
}

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        "build" | "done" => prefix.bright_green().bold(),
        "css" | "js" | "assets" => prefix.bright_blue().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Cut `s` to at most `max_len` bytes on a character boundary.
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
