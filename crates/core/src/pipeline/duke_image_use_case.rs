use std::sync::Arc;
use std::time::Instant;

use image::ImageFormat;

use crate::codec::image_codec;
use crate::detection::domain::face_detector::FaceDetector;
use crate::masking::duke_mask::apply_mask;
use crate::shared::error::DukeError;

/// Encoding used for processed images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Re-encode in whatever format the input was.
    #[default]
    SameAsInput,
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "same" => Some(Self::SameAsInput),
            "png" => Some(Self::Png),
            "jpeg" | "jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    fn resolve(self, input: ImageFormat) -> ImageFormat {
        match self {
            Self::SameAsInput => input,
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Single-image pipeline: decode → detect → mask each face → encode.
///
/// Holds no per-call state, so one instance can serve many threads.
pub struct DukeImageUseCase {
    detector: Arc<dyn FaceDetector>,
    output_format: OutputFormat,
}

impl DukeImageUseCase {
    pub fn new(detector: Arc<dyn FaceDetector>, output_format: OutputFormat) -> Self {
        Self {
            detector,
            output_format,
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Masks every detected face in `raw` and returns the re-encoded image.
    ///
    /// Masks are drawn in detection order, so overlapping faces show the
    /// later mask on top. Nothing is returned on failure.
    pub fn process(&self, raw: &[u8]) -> Result<Vec<u8>, DukeError> {
        let started = Instant::now();
        let decoded = image_codec::decode(raw)?;
        let mut frame = decoded.frame;
        let decoded_at = Instant::now();

        let regions = self.detector.detect(&frame)?;
        let detected_at = Instant::now();

        for region in &regions {
            apply_mask(&mut frame, region);
        }
        let masked_at = Instant::now();

        let bytes = image_codec::encode(frame, self.output_format.resolve(decoded.format))?;

        log::debug!(
            "decode {:.1}ms, detect {:.1}ms, mask {:.1}ms ({} faces), encode {:.1}ms",
            ms(decoded_at - started),
            ms(detected_at - decoded_at),
            ms(masked_at - detected_at),
            regions.len(),
            ms(masked_at.elapsed()),
        );
        Ok(bytes)
    }

    /// Runs [`process`](Self::process) and drops the result.
    ///
    /// Failures are logged rather than returned. Returns whether the image
    /// was processed successfully.
    pub fn process_and_discard(&self, raw: &[u8]) -> bool {
        match self.process(raw) {
            Ok(_) => true,
            Err(e) => {
                log::error!("Discarding image ({}): {e}", e.kind());
                false
            }
        }
    }
}

fn ms(d: std::time::Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
