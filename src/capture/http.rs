use std::io::Read;
use std::ops::Range;
use std::time::Instant;

use tracing::warn;

use crate::capture::error::{CaptureError, Result};
use crate::capture::frame::{Frame, PixelFormat};
use crate::capture::source::CaptureSource;

/// JPEG start-of-image marker.
const SOI: [u8; 2] = [0xFF, 0xD8];
/// JPEG end-of-image marker.
const EOI: [u8; 2] = [0xFF, 0xD9];

const READ_CHUNK: usize = 16 * 1024;

/// Upper bound on buffered bytes while hunting for frame markers. A stream
/// that exceeds this without producing a complete JPEG is not MJPEG.
const MAX_BUFFER: usize = 32 * 1024 * 1024;

/// MJPEG-over-HTTP camera client (DroidCam-style `videofeed` endpoints).
///
/// Reads the response body as a byte stream and slices complete JPEG images
/// out of it by their SOI/EOI markers, ignoring the multipart boundary lines
/// in between. Each image is decoded to an RGB frame.
pub struct MjpegStream {
    response: reqwest::blocking::Response,
    buffer: Vec<u8>,
    opened_at: Instant,
}

impl MjpegStream {
    /// Connect to the feed URL. Fails fast when the camera is unreachable
    /// or answers with a non-success status.
    pub fn open(url: &str) -> Result<Self> {
        let response =
            reqwest::blocking::get(url).map_err(|e| CaptureError::Open(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CaptureError::Open(format!(
                "camera at {url} answered {}",
                response.status()
            )));
        }
        Ok(Self {
            response,
            buffer: Vec::new(),
            opened_at: Instant::now(),
        })
    }

    /// Pull one chunk from the socket into the scan buffer.
    ///
    /// Returns the number of bytes read; 0 means the stream has closed.
    fn fill_buffer(&mut self) -> Result<usize> {
        let mut chunk = [0u8; READ_CHUNK];
        let n = self
            .response
            .read(&mut chunk)
            .map_err(|e| CaptureError::Read(e.to_string()))?;
        self.buffer.extend_from_slice(&chunk[..n]);
        Ok(n)
    }
}

impl CaptureSource for MjpegStream {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if let Some(range) = find_jpeg(&self.buffer) {
                let jpeg = self.buffer[range.clone()].to_vec();
                self.buffer.drain(..range.end);

                match decode_jpeg(&jpeg, self.opened_at.elapsed().as_micros() as u64) {
                    Ok(frame) => return Ok(Some(frame)),
                    Err(e) => {
                        // A single corrupt image does not end the stream.
                        warn!("skipping undecodable frame: {e}");
                        continue;
                    }
                }
            }

            if self.buffer.len() > MAX_BUFFER {
                return Err(CaptureError::MalformedFrame(
                    "no complete JPEG within buffer limit".to_string(),
                ));
            }
            if self.fill_buffer()? == 0 {
                return Ok(None);
            }
        }
    }
}

/// Locate the first complete JPEG (SOI through EOI, inclusive) in `buf`.
fn find_jpeg(buf: &[u8]) -> Option<Range<usize>> {
    let start = find_marker(buf, &SOI, 0)?;
    let end = find_marker(buf, &EOI, start + 2)?;
    Some(start..end + 2)
}

fn find_marker(buf: &[u8], marker: &[u8; 2], from: usize) -> Option<usize> {
    if buf.len() < from + 2 {
        return None;
    }
    buf[from..]
        .windows(2)
        .position(|w| w == marker)
        .map(|p| p + from)
}

/// Decode one JPEG image to an RGB frame.
fn decode_jpeg(jpeg: &[u8], timestamp_us: u64) -> Result<Frame> {
    let decoded = image::load_from_memory(jpeg)
        .map_err(|e| CaptureError::MalformedFrame(e.to_string()))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Frame {
        data: rgb.into_raw(),
        width,
        height,
        format: PixelFormat::Rgb8,
        timestamp_us,
    })
}
