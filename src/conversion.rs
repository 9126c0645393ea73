//! Pixel layout helpers.
//!
//! The software scaler writes packed RGB24, laid out as (row, column,
//! channel) with a possibly padded row stride. Callers receive planar
//! frames laid out as (channel, row, column). The helpers here view the
//! packed buffer in place and transpose it into the caller's array.

use std::path::Path;

use ffmpeg_next::frame::Video as VideoFrame;
use image::RgbImage;
use ndarray::{ArrayView3, ArrayViewMut3, ShapeBuilder};

use crate::error::VideoReaderError;

/// Number of colour channels in every decoded frame.
pub const CHANNELS: usize = 3;

/// View packed RGB24 bytes as a `(height, width, 3)` array without copying.
///
/// `stride` is the distance in bytes between the starts of two rows and
/// must be at least `width * 3`.
pub fn packed_rgb_view(
    data: &[u8],
    stride: usize,
    width: usize,
    height: usize,
) -> Result<ArrayView3<'_, u8>, VideoReaderError> {
    ArrayView3::from_shape((height, width, CHANNELS).strides((stride, CHANNELS, 1)), data)
        .map_err(|error| {
            VideoReaderError::VideoDecodeError(format!(
                "RGB buffer of {} bytes does not fit {width}x{height} with stride {stride}: {error}",
                data.len()
            ))
        })
}

/// Copy the scaler's packed output into a planar `(3, height, width)` view.
pub(crate) fn write_planar(
    rgb_frame: &VideoFrame,
    output: &mut ArrayViewMut3<'_, u8>,
) -> Result<(), VideoReaderError> {
    let (_, height, width) = output.dim();
    let packed = packed_rgb_view(rgb_frame.data(0), rgb_frame.stride(0), width, height)?;
    transpose_into(packed, output);
    Ok(())
}

/// Assign a `(height, width, 3)` array to a `(3, height, width)` array.
pub fn transpose_into(packed: ArrayView3<'_, u8>, output: &mut ArrayViewMut3<'_, u8>) {
    output.assign(&packed.permuted_axes([2, 0, 1]));
}

/// Convert a planar `(3, height, width)` frame into an [`RgbImage`].
///
/// Returns `None` when the first axis is not 3 channels.
pub fn planar_to_image(frame: ArrayView3<'_, u8>) -> Option<RgbImage> {
    let (channels, height, width) = frame.dim();
    if channels != CHANNELS {
        return None;
    }
    let interleaved: Vec<u8> = frame.permuted_axes([1, 2, 0]).iter().copied().collect();
    RgbImage::from_raw(width as u32, height as u32, interleaved)
}

/// Save a planar `(3, height, width)` frame as an image file.
///
/// The format is picked from the file extension.
pub fn save_frame<P: AsRef<Path>>(frame: ArrayView3<'_, u8>, path: P) -> Result<(), VideoReaderError> {
    let dim = frame.dim();
    let image = planar_to_image(frame).ok_or_else(|| {
        VideoReaderError::VideoDecodeError(format!("frame of shape {dim:?} is not planar RGB"))
    })?;
    image.save(path)?;
    Ok(())
}
