pub const SEETA_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const SEETA_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

/// Smallest face the cascade can be configured to find.
pub const MIN_FACE_SIZE_LIMIT: u32 = 20;

pub const DEFAULT_MIN_FACE_SIZE: u32 = 20;
pub const DEFAULT_SCORE_THRESH: f64 = 2.0;
pub const DEFAULT_PYRAMID_SCALE_FACTOR: f32 = 0.8;
pub const DEFAULT_SLIDE_WINDOW_STEP: u32 = 4;

/// Upper bound on listener worker threads.
pub const MAX_LISTENER_CONCURRENCY: usize = 5;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
