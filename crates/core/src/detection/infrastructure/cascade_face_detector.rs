use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Luma, Rgb, Rgba};

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::{
    DEFAULT_MIN_FACE_SIZE, DEFAULT_PYRAMID_SCALE_FACTOR, DEFAULT_SCORE_THRESH,
    DEFAULT_SLIDE_WINDOW_STEP, MIN_FACE_SIZE_LIMIT,
};
use crate::shared::error::DukeError;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Tuning knobs handed to the cascade on every detection.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorSettings {
    pub min_face_size: u32,
    pub score_thresh: f64,
    pub pyramid_scale_factor: f32,
    pub slide_window_step: u32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            min_face_size: DEFAULT_MIN_FACE_SIZE,
            score_thresh: DEFAULT_SCORE_THRESH,
            pyramid_scale_factor: DEFAULT_PYRAMID_SCALE_FACTOR,
            slide_window_step: DEFAULT_SLIDE_WINDOW_STEP,
        }
    }
}

impl DetectorSettings {
    /// Rejects values the cascade library refuses (it panics on them).
    pub fn validate(&self) -> Result<(), DukeError> {
        if self.min_face_size < MIN_FACE_SIZE_LIMIT {
            return Err(DukeError::InvalidInput(format!(
                "min face size must be at least {MIN_FACE_SIZE_LIMIT}, got {}",
                self.min_face_size
            )));
        }
        if self.score_thresh.is_nan() || self.score_thresh <= 0.0 {
            return Err(DukeError::InvalidInput(format!(
                "score threshold must be positive, got {}",
                self.score_thresh
            )));
        }
        if !(0.01..=0.99).contains(&self.pyramid_scale_factor) {
            return Err(DukeError::InvalidInput(format!(
                "pyramid scale factor must be between 0.01 and 0.99, got {}",
                self.pyramid_scale_factor
            )));
        }
        if self.slide_window_step == 0 {
            return Err(DukeError::InvalidInput(
                "slide window step must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Face detector backed by the `rustface` cascade (SeetaFace engine).
///
/// The model is read once at startup and shared read-only; each call
/// builds its own library detector from a clone of it, so concurrent
/// `detect` calls never contend.
pub struct CascadeFaceDetector {
    model: rustface::Model,
    settings: DetectorSettings,
    model_path: PathBuf,
}

impl CascadeFaceDetector {
    /// Loads the classifier model at `model_path`.
    ///
    /// Any failure to read or parse the file is reported as
    /// [`DukeError::DetectorUnavailable`].
    pub fn load(model_path: &Path, settings: DetectorSettings) -> Result<Self, DukeError> {
        settings.validate()?;
        log::info!("load {}", model_path.display());

        let bytes = std::fs::read(model_path).map_err(|e| {
            DukeError::DetectorUnavailable(format!("{}: {e}", model_path.display()))
        })?;
        let model = rustface::read_model(Cursor::new(bytes)).map_err(|e| {
            DukeError::DetectorUnavailable(format!("{}: {e}", model_path.display()))
        })?;

        Ok(Self {
            model,
            settings,
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&self, frame: &Frame) -> Result<Vec<Region>, DukeError> {
        if !fits_window(frame, self.settings.min_face_size)? {
            log::info!("0 faces are detected!");
            return Ok(Vec::new());
        }

        let gray = to_luma(frame)?;

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.settings.min_face_size);
        detector.set_score_thresh(self.settings.score_thresh);
        detector.set_pyramid_scale_factor(self.settings.pyramid_scale_factor);
        detector.set_slide_window_step(
            self.settings.slide_window_step,
            self.settings.slide_window_step,
        );

        let faces = detector.detect(&rustface::ImageData::new(
            gray.as_raw(),
            frame.width(),
            frame.height(),
        ));

        let regions = faces_to_regions(
            faces.iter().map(|face| {
                let bbox = face.bbox();
                Region::new(
                    bbox.x() as i32,
                    bbox.y() as i32,
                    bbox.width() as i32,
                    bbox.height() as i32,
                )
            }),
            frame.width(),
            frame.height(),
        );
        log::info!("{} faces are detected!", regions.len());
        Ok(regions)
    }
}

/// Whether the cascade can place a `min_face_size` window in `frame`.
/// Zero-size frames are rejected.
fn fits_window(frame: &Frame, min_face_size: u32) -> Result<bool, DukeError> {
    frame.ensure_not_empty()?;
    Ok(frame.width().min(frame.height()) >= min_face_size)
}

/// Clamps raw detector boxes to the frame, keeping native order and
/// dropping boxes that end up with no area.
fn faces_to_regions(
    raw: impl Iterator<Item = Region>,
    frame_width: u32,
    frame_height: u32,
) -> Vec<Region> {
    raw.map(|r| r.clamped(frame_width, frame_height))
        .filter(|r| !r.is_empty())
        .collect()
}

fn to_luma(frame: &Frame) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>, DukeError> {
    let (w, h) = (frame.width(), frame.height());
    let mismatch = || {
        DukeError::InvalidInput(format!(
            "frame data does not match {w}x{h}x{}",
            frame.channels()
        ))
    };
    if frame.has_alpha() {
        let view = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(w, h, frame.data())
            .ok_or_else(mismatch)?;
        Ok(image::imageops::grayscale(&view))
    } else {
        let view =
            ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(w, h, frame.data()).ok_or_else(mismatch)?;
        Ok(image::imageops::grayscale(&view))
    }
}
