//! Frame Sources
//!
//! Loads the frames fed to the raster compiler. Two formats are supported:
//! - Text frame files: one row per line, frames separated by blank lines
//! - Bitmap images: one image per frame, thresholded to active/inactive pixels

use crate::error::{CamToolError, CamToolResult};
use image::GrayImage;
use plotkit_core::Frame;
use std::path::{Path, PathBuf};

/// Anything that can produce the full, ordered set of frames for a job
pub trait FrameSource {
    /// Produce every frame, in job order
    fn frames(&mut self) -> CamToolResult<Vec<Frame>>;
}

impl FrameSource for Vec<Frame> {
    fn frames(&mut self) -> CamToolResult<Vec<Frame>> {
        Ok(std::mem::take(self))
    }
}

/// Reads frames from a text file
///
/// `1` and `#` mark active pixels; `0`, `.` and spaces mark inactive ones.
/// Lines starting with `;` are comments. Only a line with no characters at
/// all ends a frame, so a row of spaces is a row of inactive pixels.
#[derive(Debug, Clone)]
pub struct TextFrameSource {
    path: PathBuf,
}

impl TextFrameSource {
    /// Create a source for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse frames from text
    pub fn parse(text: &str) -> CamToolResult<Vec<Frame>> {
        let mut frames = Vec::new();
        let mut rows: Vec<Vec<bool>> = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim_start().starts_with(';') {
                continue;
            }
            if line.is_empty() {
                if !rows.is_empty() {
                    frames.push(Frame::new(std::mem::take(&mut rows)));
                }
                continue;
            }

            let row = line
                .chars()
                .map(|c| match c {
                    '1' | '#' => Ok(true),
                    '0' | '.' | ' ' => Ok(false),
                    other => Err(CamToolError::InvalidFrame {
                        line: idx + 1,
                        found: other,
                    }),
                })
                .collect::<CamToolResult<Vec<bool>>>()?;
            rows.push(row);
        }

        if !rows.is_empty() {
            frames.push(Frame::new(rows));
        }

        Ok(frames)
    }
}

impl FrameSource for TextFrameSource {
    fn frames(&mut self) -> CamToolResult<Vec<Frame>> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            CamToolError::LoadError(format!("{}: {}", self.path.display(), e))
        })?;
        let frames = Self::parse(&text)?;
        tracing::info!(path = %self.path.display(), frames = frames.len(), "Loaded text frames");
        Ok(frames)
    }
}

/// Reads one frame per image file
///
/// Images are converted to grayscale; pixels darker than the threshold are
/// active unless `invert` is set.
#[derive(Debug, Clone)]
pub struct ImageFrameSource {
    paths: Vec<PathBuf>,
    threshold: u8,
    invert: bool,
}

impl ImageFrameSource {
    /// Create a source over the given image files, in order
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            threshold: 128,
            invert: false,
        }
    }

    /// Set the grayscale threshold (0-255)
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Treat light pixels as active instead of dark ones
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Load a single image file as a frame
    pub fn load_frame(&self, path: &Path) -> CamToolResult<Frame> {
        let img = image::open(path)?;
        Ok(self.threshold_image(&img.to_luma8()))
    }

    /// Threshold a grayscale image into a frame
    pub fn threshold_image(&self, gray: &GrayImage) -> Frame {
        let rows = (0..gray.height())
            .map(|y| {
                (0..gray.width())
                    .map(|x| {
                        let dark = gray.get_pixel(x, y).0[0] < self.threshold;
                        dark != self.invert
                    })
                    .collect()
            })
            .collect();
        Frame::new(rows)
    }
}

impl FrameSource for ImageFrameSource {
    fn frames(&mut self) -> CamToolResult<Vec<Frame>> {
        let mut frames = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            let frame = self.load_frame(path)?;
            tracing::debug!(
                path = %path.display(),
                width = frame.width(),
                height = frame.height(),
                "Loaded image frame"
            );
            frames.push(frame);
        }
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_frames() {
        let text = "; layer one\n0110\n1001\n\n\n##..\n";
        let frames = TextFrameSource::parse(text).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].height(), 2);
        assert_eq!(frames[0].rows()[0], vec![false, true, true, false]);
        assert_eq!(frames[1].rows()[0], vec![true, true, false, false]);
    }

    #[test]
    fn test_parse_keeps_trailing_spaces_as_pixels() {
        let frames = TextFrameSource::parse("1   \n0110\n").unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].rows()[0], vec![true, false, false, false]);
        assert_eq!(frames[0].width(), 4);
    }

    #[test]
    fn test_parse_space_only_row_does_not_split_frame() {
        let frames = TextFrameSource::parse("11\n  \n11\n").unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].height(), 3);
        assert_eq!(frames[0].rows()[1], vec![false, false]);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let frames = TextFrameSource::parse("10\r\n\r\n01\r\n").unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].rows()[0], vec![false, true]);
    }

    #[test]
    fn test_parse_rejects_unknown_characters() {
        let err = TextFrameSource::parse("01\n0x\n").unwrap_err();
        assert!(matches!(err, CamToolError::InvalidFrame { line: 2, found: 'x' }));
    }

    #[test]
    fn test_threshold_image() {
        let mut gray = GrayImage::new(3, 1);
        gray.put_pixel(0, 0, image::Luma([0]));
        gray.put_pixel(1, 0, image::Luma([200]));
        gray.put_pixel(2, 0, image::Luma([127]));

        let source = ImageFrameSource::new(Vec::new());
        let frame = source.threshold_image(&gray);
        assert_eq!(frame.rows()[0], vec![true, false, true]);

        let inverted = source.with_invert(true).threshold_image(&gray);
        assert_eq!(inverted.rows()[0], vec![false, true, false]);
    }
}
