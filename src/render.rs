//! Boundary to the collaborator that turns a finished payload into a QR image.

use crate::error::RenderError;

/// Renders a QR data payload into an image of the requested pixel size.
pub trait QrRenderer: Send + Sync {
    type Image: Send + 'static;

    fn render(&self, payload: &str, width: u32, height: u32) -> Result<Self::Image, RenderError>;
}

/// Used when a manager is built without a renderer; every render fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRenderer;

impl QrRenderer for NoRenderer {
    type Image = ();

    fn render(&self, _payload: &str, _width: u32, _height: u32) -> Result<(), RenderError> {
        Err(RenderError::Unavailable)
    }
}

#[cfg(feature = "qrcode")]
mod png {
    use super::QrRenderer;
    use crate::error::RenderError;
    use image::Luma;
    use qrcode::QrCode;

    /// A rendered QR code as PNG bytes.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct QrImage {
        pub width: u32,
        pub height: u32,
        pub png: Vec<u8>,
    }

    /// Renders the payload's UTF-8 bytes as a black-on-white PNG.
    #[derive(Debug, Clone, Copy)]
    pub struct PngRenderer {
        pub quiet_zone: bool,
    }

    impl Default for PngRenderer {
        fn default() -> Self {
            Self { quiet_zone: true }
        }
    }

    impl QrRenderer for PngRenderer {
        type Image = QrImage;

        fn render(&self, payload: &str, width: u32, height: u32) -> Result<QrImage, RenderError> {
            if width == 0 || height == 0 {
                return Err(RenderError::InvalidDimensions { width, height });
            }

            let code = QrCode::new(payload.as_bytes())
                .map_err(|err| RenderError::Encode(err.to_string()))?;
            let image = code
                .render::<Luma<u8>>()
                .quiet_zone(self.quiet_zone)
                .min_dimensions(width, height)
                .build();

            let mut png = Vec::new();
            let encoder = image::codecs::png::PngEncoder::new(&mut png);
            image::ImageEncoder::write_image(
                encoder,
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::L8,
            )
            .map_err(|err| RenderError::Image(err.to_string()))?;

            log::debug!(
                "rendered {}x{} QR image for {} byte payload",
                image.width(),
                image.height(),
                payload.len()
            );
            Ok(QrImage {
                width: image.width(),
                height: image.height(),
                png,
            })
        }
    }

}

#[cfg(feature = "qrcode")]
pub use png::{PngRenderer, QrImage};
