//! # Logo
//!
//! The company logo is decoded once at startup and shared read-only with
//! every render. Loading never fails hard: a missing or unreadable file
//! yields `None` and the header falls back to text only.
//!
//! Pixels are stored as raw RGB plus an optional 8-bit alpha plane, which
//! becomes the image's soft mask in the PDF.

use std::path::Path;

use image::GenericImageView;
use pdf_writer::{Name, Pdf, Ref};
use tracing::{debug, warn};

use crate::error::AssetError;

/// Side of the square box the header logo is fitted into, in points.
pub const LOGO_BOX: f32 = 80.0;

/// A decoded raster image.
#[derive(Debug, Clone)]
pub struct Logo {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl Logo {
    /// Decodes PNG/JPEG/etc. bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let img =
            image::load_from_memory(bytes).map_err(|e| AssetError::InvalidImage(e.to_string()))?;
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(AssetError::InvalidImage("image has no pixels".to_string()));
        }

        let (rgb, alpha) = if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            let pixels = pixel_count(width, height);
            let mut rgb = Vec::with_capacity(pixels.saturating_mul(3));
            let mut alpha = Vec::with_capacity(pixels);
            for px in rgba.pixels() {
                rgb.extend_from_slice(&px.0[..3]);
                alpha.push(px.0[3]);
            }
            (rgb, Some(alpha))
        } else {
            (img.to_rgb8().into_raw(), None)
        };

        Ok(Logo {
            width,
            height,
            rgb,
            alpha,
        })
    }

    /// Reads and decodes an image file.
    ///
    /// Returns `None` (with a warning) when the file is missing or invalid.
    pub fn load(path: &Path) -> Option<Self> {
        let result = std::fs::read(path)
            .map_err(|e| AssetError::io(path, e))
            .and_then(|bytes| Self::from_bytes(&bytes));

        match result {
            Ok(logo) => {
                debug!(
                    path = %path.display(),
                    width = logo.width,
                    height = logo.height,
                    "Logo loaded"
                );
                Some(logo)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Logo unavailable, header will be text only");
                None
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Size in points when fitted into a `side` × `side` box, aspect kept.
    ///
    /// Small images are scaled up to fill the box.
    pub fn fit(&self, side: f32) -> (f32, f32) {
        let w = self.width as f32;
        let h = self.height as f32;
        let scale = (side / w).min(side / h);
        (w * scale, h * scale)
    }

    /// Writes the image XObject (and its soft mask) under `image_ref`.
    pub fn write(&self, pdf: &mut Pdf, image_ref: Ref, alloc: &mut impl FnMut() -> Ref) {
        let mask_ref = self.alpha.as_ref().map(|alpha| {
            let mask_ref = alloc();
            let mut mask = pdf.image_xobject(mask_ref, alpha);
            mask.width(self.width as i32);
            mask.height(self.height as i32);
            mask.color_space().device_gray();
            mask.bits_per_component(8);
            mask_ref
        });

        let mut image = pdf.image_xobject(image_ref, &self.rgb);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_ref) = mask_ref {
            image.s_mask(mask_ref);
        }
    }
}

/// `width * height` widened before multiplying; `u32` overflows past 65536².
fn pixel_count(width: u32, height: u32) -> usize {
    (width as usize).saturating_mul(height as usize)
}

/// Resource name of the logo XObject on every page.
pub(crate) const LOGO_NAME: Name<'static> = Name(b"Im1");
