//! Memex Processing Library
//!
//! Image work needed by the catalog: turning an original into its JPEG preview.

pub mod image;

pub use crate::image::{PreviewTransformer, TransformError};
