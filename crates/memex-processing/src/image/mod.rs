//! Image processing module
//!
//! - Preview generation (transformer): decode, resize to a fixed width, flatten
//!   to RGB and re-encode as JPEG.

pub mod transformer;

pub use transformer::{PreviewTransformer, TransformError};
