//! Face detection and Duke mask overlay.
//!
//! Decodes an image, finds faces with a cascade classifier, paints the
//! black/white/red Duke mask over each one and re-encodes the result.
//! The same pipeline backs a synchronous call and a pool of queue
//! listeners that process images and discard the output.

pub mod codec;
pub mod detection;
pub mod masking;
pub mod messaging;
pub mod pipeline;
pub mod shared;
