//! Colored terminal output for publish runs
//!
//! Status lines go to stderr. Stdout carries only the published asset URL,
//! so CI scripts can capture it with `$(publish ...)`.

use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
    quiet: bool,
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(quiet: bool) -> Self {
        Self {
            bufwtr: BufferWriter::stderr(ColorChoice::Auto),
            quiet,
        }
    }

    fn status(&self, symbol: &str, color: &ColorSpec, message: &str) {
        if self.quiet {
            return;
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(color);
        let _ = write!(&mut buffer, "{}", symbol);
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {}", message);
        let _ = self.bufwtr.print(&buffer);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        self.status("ℹ", ColorSpec::new().set_fg(Some(Color::Cyan)), message);
    }

    /// Print a progress message
    pub fn progress(&self, message: &str) {
        self.status("⋯", ColorSpec::new().set_fg(Some(Color::Magenta)), message);
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        self.status(
            "✓",
            ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true),
            message,
        );
    }

    /// Print an error message (always shown)
    pub fn error(&self, message: &str) {
        let mut buffer = self.bufwtr.buffer();

        if buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true)).is_err()
            || write!(&mut buffer, "✗").is_err()
            || buffer.reset().is_err()
            || buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red))).is_err()
            || writeln!(&mut buffer, " {}", message).is_err()
            || buffer.reset().is_err()
            || self.bufwtr.print(&buffer).is_err()
        {
            eprintln!("✗ {}", message);
        }
    }

    /// Print indented text (for sub-items, always shown)
    pub fn indent(&self, message: &str) {
        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer, "    {}", message);
        if self.bufwtr.print(&buffer).is_err() {
            eprintln!("    {}", message);
        }
    }

    /// Print the run's result line to stdout.
    ///
    /// Fails instead of panicking when stdout is closed.
    pub fn result(&self, line: &str) -> std::io::Result<()> {
        write_line(&mut std::io::stdout().lock(), line)
    }
}

fn write_line(out: &mut impl Write, line: &str) -> std::io::Result<()> {
    writeln!(out, "{}", line)?;
    out.flush()
}
