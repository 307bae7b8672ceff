//! Image fixtures, encoded with the `image` crate.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture");
    buffer
}

/// Opaque RGB PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    encode(&DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

/// Semi-transparent RGBA PNG.
pub fn rgba_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([20, 120, 220, 100]));
    encode(&DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([10, 160, 90]));
    encode(&DynamicImage::ImageRgb8(img), ImageFormat::Jpeg)
}

/// Bytes that carry an image content type but do not decode.
pub fn corrupt_image() -> Vec<u8> {
    let mut data = png(32, 32);
    data.truncate(40);
    data
}

pub fn decode(data: &[u8]) -> DynamicImage {
    image::load_from_memory(data).expect("Failed to decode preview")
}
