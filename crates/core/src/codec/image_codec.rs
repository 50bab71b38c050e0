use std::io::Cursor;

use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

use crate::shared::error::DukeError;
use crate::shared::frame::Frame;

/// A decoded frame together with the container format it came from.
#[derive(Debug)]
pub struct DecodedImage {
    pub frame: Frame,
    pub format: ImageFormat,
}

/// Decodes raw image bytes into an RGB or RGBA frame.
///
/// Images with an alpha channel keep it (4 channels); everything else is
/// converted to 8-bit RGB.
pub fn decode(raw: &[u8]) -> Result<DecodedImage, DukeError> {
    let format = image::guess_format(raw).map_err(DukeError::Decode)?;
    let img = image::load_from_memory_with_format(raw, format).map_err(DukeError::Decode)?;

    let frame = if img.color().has_alpha() {
        let rgba = img.into_rgba8();
        let (w, h) = rgba.dimensions();
        Frame::new(rgba.into_raw(), w, h, 4)
    } else {
        let rgb = img.into_rgb8();
        let (w, h) = rgb.dimensions();
        Frame::new(rgb.into_raw(), w, h, 3)
    };
    frame.ensure_not_empty()?;

    Ok(DecodedImage { frame, format })
}

/// Encodes a frame into `format`.
///
/// JPEG has no alpha channel, so RGBA frames are flattened to RGB first.
pub fn encode(frame: Frame, format: ImageFormat) -> Result<Vec<u8>, DukeError> {
    let img = into_dynamic(frame)?;
    let img = if format == ImageFormat::Jpeg && img.color().has_alpha() {
        DynamicImage::ImageRgb8(img.into_rgb8())
    } else {
        img
    };

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).map_err(DukeError::Encode)?;
    Ok(out.into_inner())
}

fn into_dynamic(frame: Frame) -> Result<DynamicImage, DukeError> {
    let (w, h) = (frame.width(), frame.height());
    let img = if frame.has_alpha() {
        RgbaImage::from_raw(w, h, frame.into_data()).map(DynamicImage::ImageRgba8)
    } else {
        RgbImage::from_raw(w, h, frame.into_data()).map(DynamicImage::ImageRgb8)
    };
    img.ok_or_else(|| {
        DukeError::Encode(image::ImageError::Parameter(ParameterError::from_kind(
            ParameterErrorKind::DimensionMismatch,
        )))
    })
}
