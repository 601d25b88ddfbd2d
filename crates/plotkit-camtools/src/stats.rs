//! Toolpath statistics
//!
//! Summarizes a compiled job for reporting before it is sent. Run and pixel
//! counts come from the frames; bounds come from the compiled commands.

use plotkit_core::{Frame, MotionCommand};

/// Summary of a compiled job
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolpathStats {
    /// Total number of commands
    pub commands: usize,
    /// Active pixels across all frames
    pub active_pixels: usize,
    /// Plunges, one per run of consecutive active pixels in a row
    pub plunges: usize,
    /// Minimum (x, y, z)
    pub min: [f64; 3],
    /// Maximum (x, y, z)
    pub max: [f64; 3],
}

impl ToolpathStats {
    /// Compute statistics for frames and the commands compiled from them
    pub fn from_job(frames: &[Frame], commands: &[MotionCommand]) -> Self {
        let mut stats = Self {
            commands: commands.len(),
            active_pixels: frames.iter().map(Frame::active_pixels).sum(),
            plunges: frames
                .iter()
                .flat_map(|frame| frame.rows())
                .map(|row| count_runs(row))
                .sum(),
            ..Default::default()
        };

        let Some(first) = commands.first() else {
            return stats;
        };
        stats.min = [first.x, first.y, first.z];
        stats.max = [first.x, first.y, first.z];

        for cmd in commands {
            for (axis, value) in [cmd.x, cmd.y, cmd.z].into_iter().enumerate() {
                stats.min[axis] = stats.min[axis].min(value);
                stats.max[axis] = stats.max[axis].max(value);
            }
        }

        stats
    }
}

fn count_runs(row: &[bool]) -> usize {
    let mut last = false;
    row.iter()
        .filter(|&&active| {
            let starts = active && !last;
            last = active;
            starts
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster_compiler::{RasterParameters, ToolpathCompiler};

    #[test]
    fn test_empty_queue() {
        let stats = ToolpathStats::from_job(&[], &[]);
        assert_eq!(stats, ToolpathStats::default());
    }

    #[test]
    fn test_counts_plunges_and_bounds() {
        let compiler = ToolpathCompiler::new(RasterParameters::default());
        let frames = [Frame::from_bits(vec![vec![0, 1, 1, 0, 1], vec![1]])];
        let (commands, _) = compiler.compile_frames(&frames, compiler.initial_state());

        let stats = ToolpathStats::from_job(&frames, &commands);
        assert_eq!(stats.commands, commands.len());
        assert_eq!(stats.plunges, 3);
        assert_eq!(stats.active_pixels, 4);
        assert_eq!(stats.min, [1000.0, 1000.0, 30.0]);
        assert_eq!(stats.max, [1040.0, 1010.0, 5000.0]);
    }

    #[test]
    fn test_counts_do_not_depend_on_feed_rates() {
        let params = RasterParameters {
            fast_feed_rate: 1000.0,
            slow_feed_rate: 1000.0,
            ..Default::default()
        };
        let compiler = ToolpathCompiler::new(params);
        let frames = [
            Frame::from_bits(vec![vec![1, 0, 1, 1]]),
            Frame::from_bits(vec![vec![1, 1, 1], vec![0, 0]]),
        ];
        let (commands, _) = compiler.compile_frames(&frames, compiler.initial_state());

        let stats = ToolpathStats::from_job(&frames, &commands);
        assert_eq!(stats.plunges, 3);
        assert_eq!(stats.active_pixels, 6);
    }
}
