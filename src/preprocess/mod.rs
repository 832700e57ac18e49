// Frame preprocessing — resize and JPEG-encode captured frames for storage.

use fast_image_resize as fr;
use fr::images::Image;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb};
use thiserror::Error;

use crate::capture::frame::{Frame, PixelFormat};

/// Preprocessing errors.
///
/// `UnsupportedFormat` is recoverable — the capture loop drops the frame and
/// keeps going. The remaining variants indicate a broken frame or encoder.
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("pixel format {0} cannot be stored as JPEG")]
    UnsupportedFormat(PixelFormat),

    #[error("frame buffer does not match its declared {0}x{1} dimensions")]
    BadDimensions(u32, u32),

    #[error("resize failed: {0}")]
    Resize(String),

    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, PreprocessError>;

/// Normalises raw frames into storage-ready JPEG bytes.
///
/// Every accepted frame is resized to one fixed target resolution with a
/// Lanczos3 filter and encoded at one fixed quality, so the reconstruction
/// toolchain sees a uniform image set.
pub struct FramePreprocessor {
    target_width: u32,
    target_height: u32,
    quality: u8,
}

impl FramePreprocessor {
    /// Create a preprocessor with a fixed target resolution and JPEG quality
    /// (1-100).
    pub fn new(target_width: u32, target_height: u32, quality: u8) -> Self {
        Self {
            target_width,
            target_height,
            quality,
        }
    }

    /// Resize and encode one frame.
    ///
    /// Frames with an alpha channel are rejected — JPEG cannot represent
    /// them losslessly, so they are dropped rather than flattened.
    pub fn process(&self, frame: &Frame) -> Result<Vec<u8>> {
        if frame.format != PixelFormat::Rgb8 {
            return Err(PreprocessError::UnsupportedFormat(frame.format));
        }
        if !frame.is_well_formed() {
            return Err(PreprocessError::BadDimensions(frame.width, frame.height));
        }

        let src = Image::from_vec_u8(
            frame.width,
            frame.height,
            frame.data.clone(),
            fr::PixelType::U8x3,
        )
        .map_err(|e| PreprocessError::Resize(e.to_string()))?;
        let mut dst = Image::new(self.target_width, self.target_height, fr::PixelType::U8x3);

        let options =
            fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3));
        fr::Resizer::new()
            .resize(&src, &mut dst, Some(&options))
            .map_err(|e| PreprocessError::Resize(e.to_string()))?;

        self.encode(dst.into_vec())
    }

    /// Encode resized RGB pixels as JPEG.
    fn encode(&self, pixels: Vec<u8>) -> Result<Vec<u8>> {
        let img: ImageBuffer<Rgb<u8>, _> =
            ImageBuffer::from_raw(self.target_width, self.target_height, pixels)
                .ok_or(PreprocessError::BadDimensions(
                    self.target_width,
                    self.target_height,
                ))?;

        let mut buf = Vec::new();
        img.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, self.quality))?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a synthetic RGB test frame (gradient pattern).
    fn make_rgb_frame(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x % 256) as u8); // R
                data.push((y % 256) as u8); // G
                data.push(128); // B
            }
        }
        Frame {
            data,
            width,
            height,
            format: PixelFormat::Rgb8,
            timestamp_us: 0,
        }
    }

    #[test]
    fn process_produces_valid_jpeg_bytes() {
        let pre = FramePreprocessor::new(64, 48, 85);
        let jpeg = pre.process(&make_rgb_frame(640, 480)).unwrap();
        // JPEG files start with FF D8
        assert_eq!(jpeg[0], 0xFF);
        assert_eq!(jpeg[1], 0xD8);
    }

    #[test]
    fn process_resizes_to_target_resolution() {
        let pre = FramePreprocessor::new(100, 80, 85);
        let jpeg = pre.process(&make_rgb_frame(640, 480)).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 100);
        assert_eq!(decoded.height(), 80);
    }

    #[test]
    fn process_rejects_alpha_frames() {
        let pre = FramePreprocessor::new(64, 48, 85);
        let frame = Frame {
            data: vec![0; 8 * 8 * 4],
            width: 8,
            height: 8,
            format: PixelFormat::Rgba8,
            timestamp_us: 0,
        };
        let err = pre.process(&frame).unwrap_err();
        assert!(matches!(err, PreprocessError::UnsupportedFormat(_)));
    }

    #[test]
    fn process_rejects_truncated_frames() {
        let pre = FramePreprocessor::new(64, 48, 85);
        let frame = Frame {
            data: vec![0; 10],
            width: 8,
            height: 8,
            format: PixelFormat::Rgb8,
            timestamp_us: 0,
        };
        let err = pre.process(&frame).unwrap_err();
        assert!(matches!(err, PreprocessError::BadDimensions(8, 8)));
    }

    #[test]
    fn lower_quality_produces_smaller_output() {
        let frame = make_rgb_frame(640, 480);
        let high = FramePreprocessor::new(320, 240, 90).process(&frame).unwrap();
        let low = FramePreprocessor::new(320, 240, 40).process(&frame).unwrap();
        assert!(
            low.len() < high.len(),
            "quality 40 ({}) should be smaller than quality 90 ({})",
            low.len(),
            high.len()
        );
    }
}
