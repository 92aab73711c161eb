use crate::reference::{
    CURRENT_VERSION, EMPTY_VALUE, ENCODING_VALUE, FUNCTION_VALUE, MANDATORY_SERVICE_TAG,
    UAH_CURRENCY_CODE,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All QR data elements, in wire order. `beneficiary_code` is a personal tax number, passport
/// series and number, or a legal entity registration code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub service_tag: String,
    pub version: String,
    pub encoding: String,
    pub function: String,
    pub bic: String,
    pub beneficiary: String,
    pub beneficiary_account: String,
    pub currency: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    pub beneficiary_code: String,
    pub goal: String,
    pub reference: String,
    pub payment_purpose: String,
    pub display: String,
}

impl PaymentDetails {
    pub fn new(
        beneficiary: impl Into<String>,
        beneficiary_account: impl Into<String>,
        amount: Option<Decimal>,
        beneficiary_code: impl Into<String>,
        payment_purpose: impl Into<String>,
    ) -> Self {
        Self {
            service_tag: MANDATORY_SERVICE_TAG.to_string(),
            version: CURRENT_VERSION.to_string(),
            encoding: ENCODING_VALUE.to_string(),
            function: FUNCTION_VALUE.to_string(),
            bic: EMPTY_VALUE.to_string(),
            beneficiary: beneficiary.into(),
            beneficiary_account: beneficiary_account.into(),
            currency: UAH_CURRENCY_CODE.to_string(),
            amount,
            beneficiary_code: beneficiary_code.into(),
            goal: EMPTY_VALUE.to_string(),
            reference: EMPTY_VALUE.to_string(),
            payment_purpose: payment_purpose.into(),
            display: EMPTY_VALUE.to_string(),
        }
    }
}

impl std::str::FromStr for PaymentDetails {
    type Err = crate::error::QrDataError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        crate::decoder::decode_qr_data(data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDataToEncode {
    pub beneficiary: String,
    pub beneficiary_account: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    pub beneficiary_code: String,
    pub payment_purpose: String,
}

impl From<&PaymentDetails> for PaymentDataToEncode {
    fn from(details: &PaymentDetails) -> Self {
        Self {
            beneficiary: details.beneficiary.clone(),
            beneficiary_account: details.beneficiary_account.clone(),
            amount: details.amount,
            beneficiary_code: details.beneficiary_code.clone(),
            payment_purpose: details.payment_purpose.clone(),
        }
    }
}

impl From<PaymentDetails> for PaymentDataToEncode {
    fn from(details: PaymentDetails) -> Self {
        Self {
            beneficiary: details.beneficiary,
            beneficiary_account: details.beneficiary_account,
            amount: details.amount,
            beneficiary_code: details.beneficiary_code,
            payment_purpose: details.payment_purpose,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub content: Option<String>,
}

impl ScanResult {
    pub fn new(content: Option<String>) -> Self {
        Self { content }
    }
}
