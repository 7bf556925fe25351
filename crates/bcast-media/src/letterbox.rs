//! Image letterboxing onto a canonical frame.
//!
//! Every cover image is scaled to fit and centred on a black background of
//! a fixed size, so every output video has identical resolution regardless
//! of the source image aspect.

use image::imageops::FilterType;
use image::{imageops, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::MediaResult;

/// Canonical output frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFrame {
    /// Landscape 1920x1080 (standard upload)
    #[default]
    Wide,
    /// Portrait 1080x1920 (vertical/shorts upload)
    Tall,
}

impl OutputFrame {
    /// Frame dimensions as (width, height).
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            OutputFrame::Wide => (1920, 1080),
            OutputFrame::Tall => (1080, 1920),
        }
    }
}

/// Letterbox `input` onto a black canvas of the frame size and save it to
/// `output`.
///
/// Blocking; callers on the async path should wrap this in
/// `spawn_blocking` (see [`crate::assembler::FfmpegAssembler`]).
pub fn letterbox_image(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    frame: OutputFrame,
) -> MediaResult<()> {
    let (frame_w, frame_h) = frame.dimensions();

    let img = image::open(input.as_ref())?;

    // Uniform scale-to-fit, aspect preserved.
    let resized = img.resize(frame_w, frame_h, FilterType::Lanczos3).to_rgb8();

    let mut canvas = RgbImage::from_pixel(frame_w, frame_h, Rgb([0, 0, 0]));
    let paste_x = (frame_w - resized.width()) / 2;
    let paste_y = (frame_h - resized.height()) / 2;
    imageops::overlay(&mut canvas, &resized, paste_x as i64, paste_y as i64);

    canvas.save(output.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_test_image(path: &Path, w: u32, h: u32) {
        RgbImage::from_pixel(w, h, Rgb([200, 10, 10])).save(path).unwrap();
    }

    #[test]
    fn test_frame_dimensions() {
        assert_eq!(OutputFrame::Wide.dimensions(), (1920, 1080));
        assert_eq!(OutputFrame::Tall.dimensions(), (1080, 1920));
        assert_eq!(OutputFrame::default(), OutputFrame::Wide);
    }

    #[test]
    fn test_letterbox_square_image_to_wide() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("cover.png");
        let output = dir.path().join("normalized.png");
        write_test_image(&input, 500, 500);

        letterbox_image(&input, &output, OutputFrame::Wide).unwrap();

        let result = image::open(&output).unwrap().to_rgb8();
        assert_eq!(result.dimensions(), (1920, 1080));

        // Centre pixel is image content, left edge is black padding.
        let centre = result.get_pixel(960, 540);
        assert_eq!(centre.0, [200, 10, 10]);
        let edge = result.get_pixel(0, 540);
        assert_eq!(edge.0, [0, 0, 0]);
    }

    #[test]
    fn test_letterbox_wide_image_to_tall() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("cover.png");
        let output = dir.path().join("normalized.png");
        write_test_image(&input, 800, 200);

        letterbox_image(&input, &output, OutputFrame::Tall).unwrap();

        let result = image::open(&output).unwrap().to_rgb8();
        assert_eq!(result.dimensions(), (1080, 1920));

        // Top edge is black padding for a wide source on a tall frame.
        let top = result.get_pixel(540, 0);
        assert_eq!(top.0, [0, 0, 0]);
    }

    #[test]
    fn test_letterbox_missing_input_fails() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("normalized.png");
        let err = letterbox_image(dir.path().join("missing.png"), &output, OutputFrame::Wide);
        assert!(err.is_err());
    }
}
