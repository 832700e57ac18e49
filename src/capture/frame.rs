use std::fmt;

/// Pixel layout of a raw captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGB, 3 bytes per pixel.
    Rgb8,
    /// 8-bit RGBA, 4 bytes per pixel. Cannot be stored as JPEG.
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel for this format.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Rgb8 => write!(f, "rgb8"),
            PixelFormat::Rgba8 => write!(f, "rgba8"),
        }
    }
}

/// A single captured frame from the camera.
#[derive(Debug)]
pub struct Frame {
    /// Raw pixel data in `format` layout, row-major.
    pub data: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel layout of `data`.
    pub format: PixelFormat,
    /// Capture timestamp in microseconds since the stream opened.
    pub timestamp_us: u64,
}

impl Frame {
    /// Expected length of `data` for the frame's dimensions and format.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    /// Whether `data` matches the declared dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.expected_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_frame_expected_len_uses_three_bytes_per_pixel() {
        let frame = Frame {
            data: vec![0; 10 * 10 * 3],
            width: 10,
            height: 10,
            format: PixelFormat::Rgb8,
            timestamp_us: 0,
        };
        assert_eq!(frame.expected_len(), 300);
        assert!(frame.is_well_formed());
    }

    #[test]
    fn truncated_frame_is_not_well_formed() {
        let frame = Frame {
            data: vec![0; 100],
            width: 10,
            height: 10,
            format: PixelFormat::Rgba8,
            timestamp_us: 0,
        };
        assert!(!frame.is_well_formed());
    }
}
