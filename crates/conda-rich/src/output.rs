use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use console::Term;
use indicatif::ProgressDrawTarget;

/// Width used when neither `COLUMNS` nor the terminal reports one.
pub const DEFAULT_WIDTH: usize = 80;

/// Destination for everything the renderer prints.
///
/// Clones share the same destination. A capture sink collects output in
/// memory and hides live displays, since there is no terminal to animate.
#[derive(Clone)]
pub struct Sink {
    target: Arc<Mutex<Target>>,
}

enum Target {
    Stdout,
    Capture(Vec<u8>),
}

impl Sink {
    pub fn stdout() -> Self {
        Self::with_target(Target::Stdout)
    }

    pub fn capture() -> Self {
        Self::with_target(Target::Capture(Vec::new()))
    }

    fn with_target(target: Target) -> Self {
        Self {
            target: Arc::new(Mutex::new(target)),
        }
    }

    pub fn is_capture(&self) -> bool {
        matches!(*self.lock(), Target::Capture(_))
    }

    /// Captured text so far. Always empty for stdout.
    pub fn contents(&self) -> String {
        match &*self.lock() {
            Target::Stdout => String::new(),
            Target::Capture(buf) => String::from_utf8_lossy(buf).into_owned(),
        }
    }

    /// Captured text so far, clearing the buffer.
    pub fn take(&self) -> String {
        match &mut *self.lock() {
            Target::Stdout => String::new(),
            Target::Capture(buf) => String::from_utf8_lossy(&std::mem::take(buf)).into_owned(),
        }
    }

    /// Draw target for live displays writing to this sink.
    pub fn draw_target(&self) -> ProgressDrawTarget {
        if self.is_capture() {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stdout()
        }
    }

    pub fn write_text(&self, text: &str) -> io::Result<()> {
        match &mut *self.lock() {
            Target::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())?;
                out.flush()
            }
            Target::Capture(buf) => {
                buf.extend_from_slice(text.as_bytes());
                Ok(())
            }
        }
    }

    /// Write `text` and flush, logging instead of failing.
    pub fn emit(&self, text: &str) {
        if let Err(e) = self.write_text(text) {
            tracing::warn!(error = %e, "failed to write console output");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Target> {
        self.target.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_capture() { "capture" } else { "stdout" };
        f.debug_tuple("Sink").field(&kind).finish()
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *self.lock() {
            Target::Stdout => io::stdout().write(buf),
            Target::Capture(captured) => {
                captured.extend_from_slice(buf);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &*self.lock() {
            Target::Stdout => io::stdout().flush(),
            Target::Capture(_) => Ok(()),
        }
    }
}

/// Console width: `COLUMNS`, then the terminal, then [`DEFAULT_WIDTH`].
pub fn console_width() -> usize {
    let columns = std::env::var("COLUMNS")
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|&width| width > 0);
    columns
        .or_else(|| {
            Term::stdout()
                .size_checked()
                .map(|(_, cols)| usize::from(cols))
        })
        .unwrap_or(DEFAULT_WIDTH)
}

/// Quote a string the way a Python-style `repr` does.
pub fn repr_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => {
                let code = u32::from(c);
                let _ = match code {
                    0..=0xff => write!(out, "\\x{code:02x}"),
                    0x100..=0xffff => write!(out, "\\u{code:04x}"),
                    _ => write!(out, "\\U{code:08x}"),
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Whether `c` is shown as-is inside a quoted string.
///
/// Control, format, separator (other than the ASCII space), private-use and
/// noncharacter code points are escaped instead.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    let code = u32::from(c);
    !matches!(
        code,
        0x00a0
            | 0x00ad
            | 0x061c
            | 0x06dd
            | 0x070f
            | 0x1680
            | 0x180e
            | 0x2000..=0x200f
            | 0x2028..=0x202f
            | 0x205f..=0x2064
            | 0x2066..=0x206f
            | 0x3000
            | 0xe000..=0xf8ff
            | 0xfdd0..=0xfdef
            | 0xfeff
            | 0xfff9..=0xfffb
            | 0xf0000..=0x10ffff
    ) && code & 0xfffe != 0xfffe
}

/// Pretty-print a list of strings within `width` columns.
///
/// Lists that fit stay on one line; longer ones get one item per line.
pub fn pretty_list(items: &[&str], width: usize) -> String {
    let reprs: Vec<String> = items.iter().map(|item| repr_str(item)).collect();
    let flat = format!("[{}]", reprs.join(", "));
    if reprs.is_empty() || console::measure_text_width(&flat) <= width {
        return flat;
    }

    let body: Vec<String> = reprs.iter().map(|r| format!("    {r}")).collect();
    format!("[\n{}\n]", body.join(",\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_collects_output() {
        let sink = Sink::capture();
        sink.emit("one ");
        let mut clone = sink.clone();
        write!(clone, "two").unwrap();
        assert_eq!(sink.contents(), "one two");
        assert_eq!(sink.take(), "one two");
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn stdout_sink_has_no_contents() {
        let sink = Sink::stdout();
        assert!(!sink.is_capture());
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn capture_hides_live_displays() {
        assert!(Sink::capture().draw_target().is_hidden());
    }

    #[test]
    fn repr_plain() {
        assert_eq!(repr_str("base"), "'base'");
    }

    #[test]
    fn repr_switches_quotes() {
        assert_eq!(repr_str("it's"), "\"it's\"");
        assert_eq!(repr_str("it's \"x\""), "'it\\'s \"x\"'");
    }

    #[test]
    fn repr_escapes() {
        assert_eq!(repr_str("a\\b\n"), "'a\\\\b\\n'");
        assert_eq!(repr_str("\u{1}"), "'\\x01'");
    }

    #[test]
    fn repr_escapes_invisible_unicode() {
        assert_eq!(repr_str("a\u{200b}b"), "'a\\u200bb'");
        assert_eq!(repr_str("\u{a0}"), "'\\xa0'");
        assert_eq!(repr_str("\u{feff}env"), "'\\ufeffenv'");
        assert_eq!(repr_str("\u{f0000}"), "'\\U000f0000'");
        assert_eq!(repr_str("café 東京"), "'café 東京'");
    }

    #[test]
    fn pretty_list_single_line() {
        assert_eq!(
            pretty_list(&["one", "two", "three"], DEFAULT_WIDTH),
            "['one', 'two', 'three']"
        );
        assert_eq!(pretty_list(&[], 1), "[]");
    }

    #[test]
    fn pretty_list_expands_when_too_wide() {
        let out = pretty_list(&["base", "data-science", "web"], 20);
        insta::assert_snapshot!(out, @r"
        [
            'base',
            'data-science',
            'web'
        ]
        ");
    }
}
