//! Terminal output for the command line front end.

use std::io::{self, Write};

/// Writes user-facing progress to stdout and problems to stderr.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    fn out(&self, line: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stdout().lock(), "{line}")
    }

    pub fn println(&self, message: &str) -> io::Result<()> {
        self.out(message)
    }

    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.is_verbose() {
            self.out(message)?;
        }
        Ok(())
    }

    pub fn progress(&self, message: &str) -> io::Result<()> {
        self.out(&format!("→ {message}"))
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        self.out(&format!("✓ {message}"))
    }

    pub fn section(&self, title: &str) -> io::Result<()> {
        self.out("")?;
        self.out(title)?;
        self.out(&"─".repeat(title.chars().count()))
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        for line in message.lines() {
            self.out(&format!("  {line}"))?;
        }
        Ok(())
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stderr().lock(), "warning: {message}")
    }

    /// Printed even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        writeln!(io::stderr().lock(), "error: {message}")
    }
}
