use crate::error::QrDataError;
use crate::models::PaymentDetails;
use crate::reference::{element_index, CURRENCY_CODE_LEN, ELEMENTS_RANGE};
use crate::util::{parse_amount, size_is_not_valid, split_elements};
use crate::validation::validate_details;

/// Parses a raw QR data payload and validates the resulting payment details.
pub fn decode_qr_data(data: &str) -> Result<PaymentDetails, QrDataError> {
    if data.is_empty() {
        return Err(QrDataError::EmptyData);
    }
    if size_is_not_valid(data) {
        return Err(QrDataError::InvalidInputSize);
    }

    let elements = split_elements(data);
    if !ELEMENTS_RANGE.contains(&elements.len()) {
        log::debug!("payload has {} lines", elements.len());
        return Err(QrDataError::InvalidElementCount);
    }

    let details = parse_elements(&elements);
    validate_details(&details)?;
    Ok(details)
}

/// Maps payload lines to payment details by position; a missing display line is empty.
fn parse_elements(elements: &[&str]) -> PaymentDetails {
    let element = |idx: usize| elements.get(idx).copied().unwrap_or_default().to_string();
    let (currency, amount) = split_currency_amount(
        elements
            .get(element_index::CURRENCY_AMOUNT)
            .copied()
            .unwrap_or_default(),
    );

    PaymentDetails {
        service_tag: element(element_index::SERVICE_TAG),
        version: element(element_index::VERSION),
        encoding: element(element_index::ENCODING),
        function: element(element_index::FUNCTION),
        bic: element(element_index::BIC),
        beneficiary: element(element_index::BENEFICIARY),
        beneficiary_account: element(element_index::BENEFICIARY_ACCOUNT),
        currency: currency.to_string(),
        amount: parse_amount(amount),
        beneficiary_code: element(element_index::BENEFICIARY_CODE),
        goal: element(element_index::GOAL),
        reference: element(element_index::REFERENCE),
        payment_purpose: element(element_index::PAYMENT_PURPOSE),
        display: element(element_index::DISPLAY),
    }
}

/// The currency code is the first three characters; whatever follows is the amount.
fn split_currency_amount(element: &str) -> (&str, &str) {
    let split_at = element
        .char_indices()
        .nth(CURRENCY_CODE_LEN)
        .map(|(idx, _)| idx)
        .unwrap_or(element.len());
    element.split_at(split_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const BENEFICIARY: &str = "ПрАТ АК «Водопостачання»";
    const ACCOUNT: &str = "UA783226690000026005012107132";
    const CODE: &str = "40723825";
    const PURPOSE: &str = "Сплата за червень 2019";

    fn valid_elements() -> Vec<String> {
        [
            "BCD", "001", "1", "UCT", "", BENEFICIARY, ACCOUNT, "UAH576.56", CODE, "", "", PURPOSE,
            "",
        ]
        .iter()
        .map(|value| value.to_string())
        .collect()
    }

    fn join(elements: &[String]) -> String {
        let mut out = elements.join("\n");
        out.push('\n');
        out
    }

    fn with_element(idx: usize, value: &str) -> String {
        let mut elements = valid_elements();
        elements[idx] = value.to_string();
        join(&elements)
    }

    #[test]
    fn decodes_reference_payload() {
        let details = decode_qr_data(&join(&valid_elements())).unwrap();
        assert_eq!(
            details,
            PaymentDetails::new(
                BENEFICIARY,
                ACCOUNT,
                Some(Decimal::new(57656, 2)),
                CODE,
                PURPOSE
            )
        );
    }

    #[test]
    fn rejects_empty_data() {
        assert_eq!(decode_qr_data(""), Err(QrDataError::EmptyData));
    }

    #[test]
    fn rejects_oversized_data() {
        assert_eq!(
            decode_qr_data(&"0".repeat(332)),
            Err(QrDataError::InvalidInputSize)
        );
    }

    #[test]
    fn rejects_wrong_line_count() {
        assert_eq!(
            decode_qr_data("Unknown Data"),
            Err(QrDataError::InvalidElementCount)
        );
        assert_eq!(
            decode_qr_data("BCD\n001\n1\nUCT"),
            Err(QrDataError::InvalidElementCount)
        );
        let mut elements = valid_elements();
        elements.push("extra".to_string());
        elements.push("extra".to_string());
        assert_eq!(
            decode_qr_data(&join(&elements)),
            Err(QrDataError::InvalidElementCount)
        );
    }

    #[test]
    fn tolerates_missing_display_and_trailing_separator() {
        let elements = valid_elements();
        // 12 lines: no display, no trailing separator
        let short = elements[..12].join("\n");
        let details = decode_qr_data(&short).unwrap();
        assert_eq!(details.display, "");
        assert_eq!(details.payment_purpose, PURPOSE);

        // 13 lines: display present, no trailing separator
        assert!(decode_qr_data(&elements.join("\n")).is_ok());
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let payload = join(&valid_elements()).replace('\n', "\r\n");
        assert_eq!(
            decode_qr_data(&payload).unwrap().beneficiary_account,
            ACCOUNT
        );
    }

    #[test]
    fn element_errors_surface_from_validation() {
        let cases = [
            (element_index::SERVICE_TAG, "INVALID", QrDataError::InvalidServiceTag),
            (element_index::VERSION, "INVALID", QrDataError::UnsupportedVersion),
            (element_index::ENCODING, "INVALID", QrDataError::InvalidEncoding),
            (element_index::FUNCTION, "INVALID", QrDataError::InvalidFunction),
            (element_index::BIC, "INVALID", QrDataError::InvalidBic),
            (element_index::GOAL, "INVALID", QrDataError::InvalidGoal),
            (element_index::REFERENCE, "INVALID", QrDataError::InvalidReference),
            (element_index::DISPLAY, "INVALID", QrDataError::InvalidDisplay),
            (element_index::CURRENCY_AMOUNT, "INVALID", QrDataError::InvalidCurrency),
            (element_index::CURRENCY_AMOUNT, "UAH-1", QrDataError::InvalidAmount),
            (element_index::CURRENCY_AMOUNT, "UAH1000000000", QrDataError::InvalidAmount),
            (element_index::BENEFICIARY, "", QrDataError::InvalidBeneficiary),
            (element_index::BENEFICIARY_ACCOUNT, "", QrDataError::InvalidBeneficiaryAccount),
            (element_index::BENEFICIARY_CODE, "", QrDataError::InvalidBeneficiaryCode),
            (element_index::PAYMENT_PURPOSE, "", QrDataError::InvalidPaymentPurpose),
        ];
        for (idx, value, expected) in cases {
            assert_eq!(
                decode_qr_data(&with_element(idx, value)),
                Err(expected),
                "element {idx} = {value:?}"
            );
        }
    }

    #[test]
    fn unparseable_amount_becomes_absent() {
        let details = decode_qr_data(&with_element(element_index::CURRENCY_AMOUNT, "UAHabc"))
            .unwrap();
        assert_eq!(details.currency, "UAH");
        assert_eq!(details.amount, None);

        let details =
            decode_qr_data(&with_element(element_index::CURRENCY_AMOUNT, "UAH")).unwrap();
        assert_eq!(details.amount, None);
    }

    #[test]
    fn short_currency_element_is_invalid_currency() {
        assert_eq!(
            decode_qr_data(&with_element(element_index::CURRENCY_AMOUNT, "UA")),
            Err(QrDataError::InvalidCurrency)
        );
    }

    #[test]
    fn oversized_amount_is_invalid_amount() {
        let element = format!("UAH{}", "9".repeat(40));
        assert_eq!(
            decode_qr_data(&with_element(element_index::CURRENCY_AMOUNT, &element)),
            Err(QrDataError::InvalidAmount)
        );
    }

    #[test]
    fn amount_sign_survives_lost_precision() {
        for amount in ["-0.00000000000000000000000000000001", "-1e-30", "-1e-100"] {
            let element = format!("UAH{amount}");
            assert_eq!(
                decode_qr_data(&with_element(element_index::CURRENCY_AMOUNT, &element)),
                Err(QrDataError::InvalidAmount),
                "{amount}"
            );
        }
    }

    #[test]
    fn zero_and_near_max_amounts_are_accepted() {
        for amount in ["0E+50", "0e100", "999999999.98999999999999999999999"] {
            let element = format!("UAH{amount}");
            let details = decode_qr_data(&with_element(element_index::CURRENCY_AMOUNT, &element))
                .unwrap_or_else(|err| panic!("{amount}: {err}"));
            assert!(details.amount.is_some());
        }
    }

    #[test]
    fn splits_currency_on_characters() {
        assert_eq!(split_currency_amount("UAH10.5"), ("UAH", "10.5"));
        assert_eq!(split_currency_amount("ГРН10"), ("ГРН", "10"));
        assert_eq!(split_currency_amount("UA"), ("UA", ""));
    }
}
