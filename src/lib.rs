//! Encoder, decoder and validator for NBU payment QR payloads.

pub mod batch;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod executor;
pub mod manager;
pub mod models;
pub mod reference;
pub mod render;
pub mod util;
pub mod validation;

pub use decoder::decode_qr_data;
pub use encoder::{encode_payment, encode_qr_data};
pub use error::{BatchError, GenerateError, QrDataError, RenderError};
pub use executor::{CompletionContext, Immediate, MainLoop, MainLoopHandle};
pub use manager::{DecodeResult, EncodeResult, GenerateResult, QrCodeManager, QrCodeManagerBuilder};
pub use models::{PaymentDataToEncode, PaymentDetails, ScanResult};
pub use render::{NoRenderer, QrRenderer};
#[cfg(feature = "qrcode")]
pub use render::{PngRenderer, QrImage};
pub use validation::validate_details;
