//! Render Surface
//!
//! The single serialized sink wrapping the physical output stream. Exactly
//! one logical write (one frame, or one plain line) reaches the terminal at
//! a time, so concurrent animations and one-shot prints never interleave
//! mid-line.
//!
//! Each animation owns a [`FrameSlot`] that remembers how many lines its
//! previous frame occupied. On redraw the surface moves the cursor up over
//! the old frame, clears each line, and writes the new one, wiping stale
//! trailing lines when a frame shrinks.
//!
//! A write error latches the surface broken: all subsequent writes become
//! silent no-ops. A dead terminal must never crash a background render
//! task.

use std::io::{self, Write};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::warn;

use crate::term;

/// Error writing to the render surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The surface was latched broken by an earlier write failure.
    #[error("output stream is broken")]
    Broken,
    /// The underlying stream failed.
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// Tracks the height of the previously written frame for one animation.
///
/// Owned by that animation's render task; the surface uses it to decide how
/// far to reposition the cursor before redrawing.
#[derive(Debug, Default)]
pub struct FrameSlot {
    height: usize,
}

impl FrameSlot {
    /// Create a slot with no frame written yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Height in lines of the last frame written through this slot.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }
}

struct SurfaceInner {
    writer: Box<dyn Write + Send>,
    broken: bool,
}

/// The serialized terminal output sink.
///
/// All frame and line writes system-wide go through one of these; the
/// internal lock is the interleaving guarantee.
pub struct RenderSurface {
    inner: Mutex<SurfaceInner>,
    ansi: bool,
}

impl RenderSurface {
    /// Create a surface over an arbitrary writer.
    ///
    /// `ansi` controls whether frames are redrawn in place with cursor
    /// movement; when false the surface degrades to appending lines.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, ansi: bool) -> Self {
        Self {
            inner: Mutex::new(SurfaceInner {
                writer,
                broken: false,
            }),
            ansi,
        }
    }

    /// Create a surface over stdout, probing ANSI support.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()), term::is_ansi_supported())
    }

    /// Whether this surface repositions the cursor (ANSI mode).
    #[must_use]
    pub fn is_ansi(&self) -> bool {
        self.ansi
    }

    /// Whether the surface has been latched broken.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.inner.lock().broken
    }

    /// Write one frame through `slot`, replacing the previous frame.
    ///
    /// Errors are absorbed: on failure the surface latches broken and the
    /// call becomes a no-op, because this runs inside render tasks.
    pub fn write_frame(&self, slot: &mut FrameSlot, lines: &[String]) {
        let mut inner = self.inner.lock();
        if inner.broken {
            return;
        }

        let result = if self.ansi {
            Self::write_frame_ansi(&mut inner.writer, slot.height, lines)
        } else {
            Self::write_frame_append(&mut inner.writer, lines)
        };

        match result {
            Ok(()) => slot.height = lines.len(),
            Err(e) => {
                inner.broken = true;
                warn!(error = %e, "render surface broken; suppressing further output");
            }
        }
    }

    /// Write a one-shot line, outside any animation frame.
    ///
    /// Takes the same lock as [`write_frame`](Self::write_frame), so plain
    /// prints never land in the middle of a frame write.
    pub fn write_line(&self, line: &str) -> Result<(), SurfaceError> {
        let mut inner = self.inner.lock();
        if inner.broken {
            return Err(SurfaceError::Broken);
        }

        let result: io::Result<()> = (|| {
            writeln!(inner.writer, "{line}")?;
            inner.writer.flush()
        })();

        if let Err(e) = result {
            inner.broken = true;
            warn!(error = %e, "render surface broken; suppressing further output");
            return Err(SurfaceError::Io(e));
        }
        Ok(())
    }

    fn write_frame_ansi(
        writer: &mut Box<dyn Write + Send>,
        previous_height: usize,
        lines: &[String],
    ) -> io::Result<()> {
        let mut buf = String::new();

        if previous_height > 0 {
            buf.push_str(&format!("\u{1b}[{previous_height}A"));
        }
        for line in lines {
            buf.push_str("\r\u{1b}[2K");
            buf.push_str(line);
            buf.push('\n');
        }
        // A shrinking frame must not leave stale trailing lines behind.
        if previous_height > lines.len() {
            let extra = previous_height - lines.len();
            for _ in 0..extra {
                buf.push_str("\r\u{1b}[2K\n");
            }
            buf.push_str(&format!("\u{1b}[{extra}A"));
        }

        writer.write_all(buf.as_bytes())?;
        writer.flush()
    }

    fn write_frame_append(
        writer: &mut Box<dyn Write + Send>,
        lines: &[String],
    ) -> io::Result<()> {
        for line in lines {
            writeln!(writer, "{line}")?;
        }
        writer.flush()
    }
}
