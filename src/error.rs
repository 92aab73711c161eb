//! Error types of the public API.

use thiserror::Error;

/// Every rule a QR data payload or its payment details can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum QrDataError {
    #[error("Data can't be null or empty")]
    EmptyData,

    #[error("Data size can't be more than 331 byte")]
    InvalidInputSize,

    #[error("Data payload must contains 13 elements")]
    InvalidElementCount,

    #[error("Current QR version isn't supported")]
    UnsupportedVersion,

    #[error("Data payload must start with mandatory service tag - BCD")]
    InvalidServiceTag,

    #[error("Encoding value isn't valid")]
    InvalidEncoding,

    #[error("Function value isn't valid")]
    InvalidFunction,

    #[error("Bank Identifier Code value isn't valid")]
    InvalidBic,

    #[error("Goal value isn't valid")]
    InvalidGoal,

    #[error("Reference value isn't valid")]
    InvalidReference,

    #[error("Display value isn't valid")]
    InvalidDisplay,

    #[error("Currency value isn't valid")]
    InvalidCurrency,

    #[error("Amount value isn't valid, should be positive and no more than 999999999.99")]
    InvalidAmount,

    #[error("Beneficiary value must not be empty")]
    InvalidBeneficiary,

    #[error("Beneficiary Account value must not be empty")]
    InvalidBeneficiaryAccount,

    #[error("Beneficiary Code value must not be empty")]
    InvalidBeneficiaryCode,

    #[error("Payment Purpose value must not be empty")]
    InvalidPaymentPurpose,
}

/// Failures of the rendering collaborator. These never describe the payload itself.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no QR renderer configured")]
    Unavailable,

    #[error("invalid QR image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("QR encoding failed: {0}")]
    Encode(String),

    #[error("image encoding failed: {0}")]
    Image(String),
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Data(#[from] QrDataError),

    #[error("QR generation failed: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
