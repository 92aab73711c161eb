use crate::error::QrDataError;
use crate::models::{PaymentDataToEncode, PaymentDetails};
use crate::reference::ELEMENT_SEPARATOR;
use crate::util::{format_amount, size_is_not_valid};
use crate::validation::validate_details;
use rust_decimal::Decimal;

/// Builds the QR data payload for the mandatory payment data.
///
/// Free-text inputs are trimmed. The payload size is checked before the details are
/// validated, so an oversized payload reports `InvalidInputSize` even when some element is
/// also invalid.
pub fn encode_qr_data(
    beneficiary: &str,
    beneficiary_account: &str,
    amount: Option<Decimal>,
    beneficiary_code: &str,
    payment_purpose: &str,
) -> Result<String, QrDataError> {
    let details = PaymentDetails::new(
        beneficiary.trim(),
        beneficiary_account.trim(),
        amount,
        beneficiary_code.trim(),
        payment_purpose.trim(),
    );

    let qr_data = serialize(&details);
    if size_is_not_valid(&qr_data) {
        log::debug!(
            "encoded payload is {} bytes, over the QR data limit",
            qr_data.len()
        );
        return Err(QrDataError::InvalidInputSize);
    }

    validate_details(&details)?;
    Ok(qr_data)
}

pub fn encode_payment(payment: &PaymentDataToEncode) -> Result<String, QrDataError> {
    encode_qr_data(
        &payment.beneficiary,
        &payment.beneficiary_account,
        payment.amount,
        &payment.beneficiary_code,
        &payment.payment_purpose,
    )
}

/// Joins the elements in wire order, each one followed by the separator. Performs no
/// validation.
pub fn serialize(details: &PaymentDetails) -> String {
    let currency_amount = format!(
        "{}{}",
        details.currency,
        format_amount(details.amount.as_ref())
    );
    let elements: [&str; 13] = [
        &details.service_tag,
        &details.version,
        &details.encoding,
        &details.function,
        &details.bic,
        &details.beneficiary,
        &details.beneficiary_account,
        &currency_amount,
        &details.beneficiary_code,
        &details.goal,
        &details.reference,
        &details.payment_purpose,
        &details.display,
    ];

    let capacity = elements.iter().map(|element| element.len() + 1).sum();
    let mut out = String::with_capacity(capacity);
    for element in elements {
        out.push_str(element);
        out.push(ELEMENT_SEPARATOR);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BENEFICIARY: &str = "ПрАТ АК «Водопостачання»";
    const ACCOUNT: &str = "UA783226690000026005012107132";
    const CODE: &str = "40723825";
    const PURPOSE: &str = "Сплата за червень 2019";

    fn amount() -> Option<Decimal> {
        Some(Decimal::new(57656, 2))
    }

    #[test]
    fn encodes_reference_payload() {
        let payload = encode_qr_data(BENEFICIARY, ACCOUNT, amount(), CODE, PURPOSE).unwrap();
        let expected = format!(
            "BCD\n001\n1\nUCT\n\n{BENEFICIARY}\n{ACCOUNT}\nUAH576.56\n{CODE}\n\n\n{PURPOSE}\n\n"
        );
        assert_eq!(payload, expected);
    }

    #[test]
    fn trims_free_text() {
        let payload = encode_qr_data(
            &format!("  {BENEFICIARY}\t"),
            &format!(" {ACCOUNT} "),
            amount(),
            &format!("{CODE}\n"),
            &format!(" {PURPOSE}"),
        )
        .unwrap();
        assert_eq!(
            payload,
            encode_qr_data(BENEFICIARY, ACCOUNT, amount(), CODE, PURPOSE).unwrap()
        );
    }

    #[test]
    fn missing_amount_leaves_bare_currency() {
        let payload = encode_qr_data(BENEFICIARY, ACCOUNT, None, CODE, PURPOSE).unwrap();
        assert!(payload.contains("\nUAH\n"));
    }

    #[test]
    fn empty_mandatory_fields_fail_in_order() {
        let zero = Some(Decimal::ZERO);
        assert_eq!(
            encode_qr_data("", "", zero, "", ""),
            Err(QrDataError::InvalidBeneficiary)
        );
        assert_eq!(
            encode_qr_data(BENEFICIARY, "", zero, "", ""),
            Err(QrDataError::InvalidBeneficiaryAccount)
        );
        assert_eq!(
            encode_qr_data(BENEFICIARY, ACCOUNT, zero, "", ""),
            Err(QrDataError::InvalidBeneficiaryCode)
        );
        assert_eq!(
            encode_qr_data(BENEFICIARY, ACCOUNT, zero, CODE, "   "),
            Err(QrDataError::InvalidPaymentPurpose)
        );
    }

    #[test]
    fn amount_is_checked_before_text_fields() {
        assert_eq!(
            encode_qr_data("", ACCOUNT, Some(Decimal::new(99_999_999_999, 2)), CODE, PURPOSE),
            Err(QrDataError::InvalidAmount)
        );
    }

    #[test]
    fn oversized_payload_is_rejected_before_validation() {
        let long_purpose = "ж".repeat(200);
        assert_eq!(
            encode_qr_data("", ACCOUNT, amount(), CODE, &long_purpose),
            Err(QrDataError::InvalidInputSize)
        );
    }
}
