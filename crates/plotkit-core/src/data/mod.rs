//! Data models for frames and motion commands
//!
//! This module provides:
//! - Binary raster frames (rows of active/inactive pixels)
//! - Motion commands in the device's extended-point layout (X, Y, Z, B, A, feed)
//! - The ordered command queue handed from the compiler to the dispatcher

use serde::{Deserialize, Serialize};
use std::fmt;

/// One binary raster image to be traced by the tool.
///
/// Rows are expected to share a width but nothing enforces it: ragged and
/// empty rows are valid input to the compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    rows: Vec<Vec<bool>>,
}

impl Frame {
    /// Create a frame from rows of active (`true`) / inactive (`false`) pixels
    pub fn new(rows: Vec<Vec<bool>>) -> Self {
        Self { rows }
    }

    /// Create a frame from rows of 0/1 values; any non-zero value is active
    pub fn from_bits(rows: Vec<Vec<u8>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|p| p != 0).collect())
                .collect(),
        }
    }

    /// Ordered rows of the frame
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// True if the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of active pixels across all rows
    pub fn active_pixels(&self) -> usize {
        self.rows.iter().flatten().filter(|p| **p).count()
    }

    /// Render one row as a `0`/`1` string, used for trace output
    pub fn render_row(row: &[bool]) -> String {
        row.iter().map(|p| if *p { '1' } else { '0' }).collect()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{}", Frame::render_row(row))?;
        }
        Ok(())
    }
}

/// A single positioning command for the device.
///
/// Field order follows the device's extended-point layout: the secondary
/// rotation `b` precedes the primary rotation `a`. All values are in the
/// device's native units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionCommand {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis (tool height) position
    pub z: f64,
    /// Secondary rotation (B axis)
    pub b: f64,
    /// Primary rotation (A axis)
    pub a: f64,
    /// Feed rate for the move
    pub feed_rate: f64,
}

impl MotionCommand {
    /// Create a command from its six components in device order
    pub fn new(x: f64, y: f64, z: f64, b: f64, a: f64, feed_rate: f64) -> Self {
        Self {
            x,
            y,
            z,
            b,
            a,
            feed_rate,
        }
    }

    /// Coordinates without the feed rate, in device order
    pub fn coords(&self) -> [f64; 5] {
        [self.x, self.y, self.z, self.b, self.a]
    }

    /// Format the command as a linear G-code move
    pub fn to_gcode(&self) -> String {
        format!(
            "G1 X{:.3} Y{:.3} Z{:.3} A{:.3} B{:.3} F{:.0}",
            self.x, self.y, self.z, self.a, self.b, self.feed_rate
        )
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {}) @ {}",
            self.x, self.y, self.z, self.b, self.a, self.feed_rate
        )
    }
}

/// The full ordered command sequence, consumed front to back.
pub type CommandQueue = Vec<MotionCommand>;
