//! Text backend that redraws frames in place on an ANSI terminal.

use std::{io::Write, thread, time::Duration};

use anyhow::{Context, Result};
use terrain_route_rendering::RenderingBackend;

/// Presents frames by moving the cursor back over the previous frame.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W: Write> {
    out: W,
    previous_lines: usize,
}

impl<W: Write> TerminalBackend<W> {
    /// Wraps the provided writer.
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            previous_lines: 0,
        }
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present(&mut self, frame: &str) -> Result<()> {
        if self.previous_lines > 0 {
            write!(self.out, "\x1b[{}A", self.previous_lines)
                .context("failed to rewind terminal cursor")?;
        }
        writeln!(self.out, "{frame}").context("failed to write frame")?;
        self.out.flush().context("failed to flush frame")?;
        self.previous_lines = frame.lines().count();
        Ok(())
    }

    fn wait(&mut self, delay: Duration) -> Result<()> {
        thread::sleep(delay);
        Ok(())
    }
}
