use crate::error::QrDataError;
use crate::models::PaymentDetails;
use crate::reference::{
    is_supported_version, max_amount, CURRENT_VERSION, ENCODING_VALUE, FUNCTION_VALUE,
    MANDATORY_SERVICE_TAG, UAH_CURRENCY_CODE,
};
use rust_decimal::Decimal;

/// Checks payment details against the rules of their QR data version.
///
/// Rules are applied in a fixed order and the first violated one is returned, so a payload
/// with several bad elements always reports the same error.
pub fn validate_details(details: &PaymentDetails) -> Result<(), QrDataError> {
    let result = if is_supported_version(&details.version) && details.version == CURRENT_VERSION
    {
        validate_first_version(details)
    } else {
        Err(QrDataError::UnsupportedVersion)
    };
    if let Err(err) = &result {
        log::trace!("payment details rejected: {err:?}");
    }
    result
}

fn validate_first_version(details: &PaymentDetails) -> Result<(), QrDataError> {
    if details.service_tag != MANDATORY_SERVICE_TAG {
        return Err(QrDataError::InvalidServiceTag);
    }
    if details.encoding != ENCODING_VALUE {
        return Err(QrDataError::InvalidEncoding);
    }
    if details.function != FUNCTION_VALUE {
        return Err(QrDataError::InvalidFunction);
    }
    if !details.bic.is_empty() {
        return Err(QrDataError::InvalidBic);
    }
    if !details.goal.is_empty() {
        return Err(QrDataError::InvalidGoal);
    }
    if !details.reference.is_empty() {
        return Err(QrDataError::InvalidReference);
    }
    if !details.display.is_empty() {
        return Err(QrDataError::InvalidDisplay);
    }
    if details.currency != UAH_CURRENCY_CODE {
        return Err(QrDataError::InvalidCurrency);
    }
    if let Some(amount) = details.amount {
        if !is_valid_amount(amount) {
            return Err(QrDataError::InvalidAmount);
        }
    }
    if details.beneficiary.is_empty() {
        return Err(QrDataError::InvalidBeneficiary);
    }
    if details.beneficiary_account.is_empty() {
        return Err(QrDataError::InvalidBeneficiaryAccount);
    }
    if details.beneficiary_code.is_empty() {
        return Err(QrDataError::InvalidBeneficiaryCode);
    }
    if details.payment_purpose.is_empty() {
        return Err(QrDataError::InvalidPaymentPurpose);
    }
    Ok(())
}

fn is_valid_amount(amount: Decimal) -> bool {
    amount >= Decimal::ZERO && amount < max_amount()
}
