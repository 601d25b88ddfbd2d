//! Raster Toolpath Compiler
//!
//! Converts binary raster frames into motion commands for a five-axis
//! positioning device. Each row is scanned left to right; the tool only
//! plunges and lifts at run boundaries, and the primary rotation axis
//! advances once for every active pixel traversed.
//!
//! Frames are layered: every compiled frame moves the contact height one
//! step further than the previous frame. That offset, together with the
//! accumulated rotation, is carried between frames in [`CompilerState`].

use plotkit_core::{CommandQueue, Frame, MotionCommand};
use serde::{Deserialize, Serialize};

/// Raster compilation parameters
///
/// All values are in the device's native units. Nothing is clamped or
/// converted; callers supply in-range offsets and increments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterParameters {
    /// X position of column 0
    pub base_x: f64,
    /// Y position of row 0
    pub base_y: f64,
    /// Initial contact height offset, before the first frame advances it
    pub base_z: f64,
    /// X travel per pixel column
    pub increment_x: f64,
    /// Y travel per row
    pub increment_y: f64,
    /// Contact height advance per compiled frame
    pub height_step: f64,
    /// Primary rotation advance per active pixel
    pub increment_a: f64,
    /// Constant secondary rotation carried into every command
    pub rotation_secondary: f64,
    /// Feed rate for lead-in, plunge, and inactive travel
    pub fast_feed_rate: f64,
    /// Feed rate inside an active run
    pub slow_feed_rate: f64,
    /// Retracted height used for the row lead-in
    pub safe_z: f64,
    /// Fully clear height used over inactive pixels
    pub clear_z: f64,
}

impl Default for RasterParameters {
    fn default() -> Self {
        Self {
            base_x: 1000.0,
            base_y: 1000.0,
            base_z: 0.0,
            increment_x: 10.0,
            increment_y: 10.0,
            height_step: 30.0,
            increment_a: -200.0,
            rotation_secondary: 0.0,
            fast_feed_rate: 400.0,
            slow_feed_rate: 2500.0,
            safe_z: 500.0,
            clear_z: 5000.0,
        }
    }
}

/// Position and rotation carried from one frame to the next
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompilerState {
    /// Contact height of the most recently compiled frame
    pub height_offset: f64,
    /// Accumulated primary rotation (A axis)
    pub rotation_primary: f64,
    /// Secondary rotation (B axis); never changed by compilation
    pub rotation_secondary: f64,
}

impl CompilerState {
    /// State at the start of a job
    pub fn initial(params: &RasterParameters) -> Self {
        Self {
            height_offset: params.base_z,
            rotation_primary: 0.0,
            rotation_secondary: params.rotation_secondary,
        }
    }
}

/// Compiles frames into motion commands
#[derive(Debug, Clone)]
pub struct ToolpathCompiler {
    params: RasterParameters,
}

impl ToolpathCompiler {
    /// Create a compiler with fixed parameters
    pub fn new(params: RasterParameters) -> Self {
        Self { params }
    }

    /// Parameters this compiler was built with
    pub fn params(&self) -> &RasterParameters {
        &self.params
    }

    /// State to start a job from
    pub fn initial_state(&self) -> CompilerState {
        CompilerState::initial(&self.params)
    }

    /// Compile one frame.
    ///
    /// Returns the frame's commands in execution order together with the
    /// state the next frame should start from. The input state is taken by
    /// value, so calling this twice with the same inputs yields the same
    /// output.
    pub fn compile_frame(
        &self,
        frame: &Frame,
        state: CompilerState,
    ) -> (CommandQueue, CompilerState) {
        let mut state = state;
        state.height_offset += self.params.height_step;

        let mut commands = CommandQueue::new();
        for (y, row) in frame.rows().iter().enumerate() {
            tracing::debug!(row = y, "{}", Frame::render_row(row));
            self.compile_row(y, row, &mut state, &mut commands);
        }

        tracing::info!(
            rows = frame.height(),
            contact_z = state.height_offset,
            commands = commands.len(),
            "Compiled frame"
        );

        (commands, state)
    }

    /// Compile a sequence of frames into one queue
    pub fn compile_frames<'a, I>(
        &self,
        frames: I,
        state: CompilerState,
    ) -> (CommandQueue, CompilerState)
    where
        I: IntoIterator<Item = &'a Frame>,
    {
        self.compile_frames_with_progress(frames, state, |_| {})
    }

    /// Compile a sequence of frames, reporting the number of frames done
    pub fn compile_frames_with_progress<'a, I, F>(
        &self,
        frames: I,
        state: CompilerState,
        mut progress_callback: F,
    ) -> (CommandQueue, CompilerState)
    where
        I: IntoIterator<Item = &'a Frame>,
        F: FnMut(usize),
    {
        let mut queue = CommandQueue::new();
        let mut state = state;

        for (index, frame) in frames.into_iter().enumerate() {
            let (commands, next) = self.compile_frame(frame, state);
            queue.extend(commands);
            state = next;
            progress_callback(index + 1);
        }

        (queue, state)
    }

    fn compile_row(
        &self,
        y: usize,
        row: &[bool],
        state: &mut CompilerState,
        commands: &mut CommandQueue,
    ) {
        let p = &self.params;
        let contact_z = state.height_offset;
        let b = state.rotation_secondary;

        let pos_y = p.base_y + p.increment_y * y as f64;
        let mut pos_x = p.base_x;
        let mut pos_z = p.safe_z;
        let mut feed_rate = p.fast_feed_rate;

        // Lead-in above the surface before any pixel is evaluated
        commands.push(MotionCommand::new(
            pos_x,
            pos_y,
            pos_z,
            b,
            state.rotation_primary,
            feed_rate,
        ));

        let mut last_active = false;
        for &active in row {
            match (active, last_active) {
                (true, false) => {
                    // Reach contact height in place before moving laterally
                    pos_z = contact_z;
                    commands.push(MotionCommand::new(
                        pos_x,
                        pos_y,
                        pos_z,
                        b,
                        state.rotation_primary,
                        p.fast_feed_rate,
                    ));
                    feed_rate = p.slow_feed_rate;
                    state.rotation_primary += p.increment_a;
                }
                (true, true) => {
                    state.rotation_primary += p.increment_a;
                }
                (false, _) => {
                    feed_rate = p.fast_feed_rate;
                    pos_z = p.clear_z;
                }
            }

            commands.push(MotionCommand::new(
                pos_x,
                pos_y,
                pos_z,
                b,
                state.rotation_primary,
                feed_rate,
            ));
            pos_x += p.increment_x;
            last_active = active;
        }
    }
}

/// A multi-frame job that owns its compiler state
///
/// Convenience wrapper for callers that receive frames one at a time and
/// do not want to thread [`CompilerState`] themselves.
#[derive(Debug, Clone)]
pub struct RasterJob {
    compiler: ToolpathCompiler,
    state: CompilerState,
    frames_compiled: usize,
    commands: CommandQueue,
}

impl RasterJob {
    /// Start a job with fresh state
    pub fn new(params: RasterParameters) -> Self {
        let compiler = ToolpathCompiler::new(params);
        let state = compiler.initial_state();
        Self {
            compiler,
            state,
            frames_compiled: 0,
            commands: CommandQueue::new(),
        }
    }

    /// Compile the next frame and append its commands; returns how many were added
    pub fn push_frame(&mut self, frame: &Frame) -> usize {
        let (commands, state) = self.compiler.compile_frame(frame, self.state);
        let added = commands.len();
        self.commands.extend(commands);
        self.state = state;
        self.frames_compiled += 1;
        added
    }

    /// State the next frame will start from
    pub fn state(&self) -> CompilerState {
        self.state
    }

    /// Number of frames compiled so far
    pub fn frames_compiled(&self) -> usize {
        self.frames_compiled
    }

    /// Commands compiled so far
    pub fn commands(&self) -> &[MotionCommand] {
        &self.commands
    }

    /// Consume the job and return the full command queue
    pub fn finish(self) -> CommandQueue {
        self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_row(bits: &[u8]) -> (CommandQueue, CompilerState) {
        let compiler = ToolpathCompiler::new(RasterParameters::default());
        let frame = Frame::from_bits(vec![bits.to_vec()]);
        compiler.compile_frame(&frame, compiler.initial_state())
    }

    #[test]
    fn test_lead_in_only_for_empty_row() {
        let (commands, state) = compile_row(&[]);
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0],
            MotionCommand::new(1000.0, 1000.0, 500.0, 0.0, 0.0, 400.0)
        );
        assert_eq!(state.height_offset, 30.0);
        assert_eq!(state.rotation_primary, 0.0);
    }

    #[test]
    fn test_all_inactive_row_stays_clear() {
        let (commands, _) = compile_row(&[0, 0, 0]);
        assert_eq!(commands.len(), 4);
        for (i, cmd) in commands[1..].iter().enumerate() {
            assert_eq!(cmd.x, 1000.0 + 10.0 * i as f64);
            assert_eq!(cmd.z, 5000.0);
            assert_eq!(cmd.feed_rate, 400.0);
            assert_eq!(cmd.a, 0.0);
        }
    }

    #[test]
    fn test_second_run_plunges_again() {
        let (commands, state) = compile_row(&[1, 0, 1]);
        // lead-in, plunge, px0, px1, plunge, px2
        assert_eq!(commands.len(), 6);
        assert_eq!(commands[4].x, 1020.0);
        assert_eq!(commands[4].z, 30.0);
        assert_eq!(commands[4].feed_rate, 400.0);
        assert_eq!(commands[4].a, -200.0);
        assert_eq!(commands[5].a, -400.0);
        assert_eq!(commands[5].feed_rate, 2500.0);
        assert_eq!(state.rotation_primary, -400.0);
    }

    #[test]
    fn test_rows_advance_in_y() {
        let compiler = ToolpathCompiler::new(RasterParameters::default());
        let frame = Frame::from_bits(vec![vec![0], vec![0], vec![0]]);
        let (commands, _) = compiler.compile_frame(&frame, compiler.initial_state());
        let lead_ins: Vec<f64> = commands
            .iter()
            .filter(|c| c.z == 500.0)
            .map(|c| c.y)
            .collect();
        assert_eq!(lead_ins, vec![1000.0, 1010.0, 1020.0]);
    }

    #[test]
    fn test_secondary_rotation_is_constant() {
        let params = RasterParameters {
            rotation_secondary: 45.0,
            ..Default::default()
        };
        let compiler = ToolpathCompiler::new(params);
        let frame = Frame::from_bits(vec![vec![1, 1, 0, 1], vec![0, 1]]);
        let (commands, state) = compiler.compile_frame(&frame, compiler.initial_state());
        assert!(commands.iter().all(|c| c.b == 45.0));
        assert_eq!(state.rotation_secondary, 45.0);
    }

    #[test]
    fn test_raster_job_threads_state() {
        let mut job = RasterJob::new(RasterParameters::default());
        let frame = Frame::from_bits(vec![vec![1, 1]]);
        assert_eq!(job.push_frame(&frame), 4);
        assert_eq!(job.push_frame(&frame), 4);
        assert_eq!(job.frames_compiled(), 2);
        assert_eq!(job.state().height_offset, 60.0);
        assert_eq!(job.state().rotation_primary, -800.0);

        let commands = job.finish();
        assert_eq!(commands.len(), 8);
        assert_eq!(commands[5].z, 60.0);
    }

    #[test]
    fn test_progress_callback_counts_frames() {
        let compiler = ToolpathCompiler::new(RasterParameters::default());
        let frames = vec![Frame::default(), Frame::default(), Frame::default()];
        let mut seen = Vec::new();
        let (queue, state) = compiler.compile_frames_with_progress(
            &frames,
            compiler.initial_state(),
            |done| seen.push(done),
        );
        assert!(queue.is_empty());
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(state.height_offset, 90.0);
    }
}
