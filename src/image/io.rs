//! Loading grayscale rasters through the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{ImageView, OwnedImage};
use crate::util::{TexCorrError, TexCorrResult};
use std::path::Path;

/// Borrows a luma buffer as a raster view.
pub fn view_from_gray_image(img: &image::GrayImage) -> TexCorrResult<ImageView<'_, u8>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Converts any decoded image to an owned 8-bit luma raster.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> TexCorrResult<OwnedImage<u8>> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Decodes an image file and converts it to grayscale.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> TexCorrResult<OwnedImage<u8>> {
    let img = image::open(path.as_ref()).map_err(|err| TexCorrError::ImageIo {
        reason: format!("{}: {err}", path.as_ref().display()),
    })?;
    owned_from_dynamic_image(&img)
}
