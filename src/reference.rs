use rust_decimal::Decimal;
use std::ops::RangeInclusive;

pub const MANDATORY_SERVICE_TAG: &str = "BCD";
pub const CURRENT_VERSION: &str = "001";
pub const SUPPORTED_VERSIONS: &[&str] = &[CURRENT_VERSION];

pub const ENCODING_VALUE: &str = "1";

// Ukrainian Credit Transfer
pub const FUNCTION_VALUE: &str = "UCT";
pub const UAH_CURRENCY_CODE: &str = "UAH";
pub const CURRENCY_CODE_LEN: usize = 3;

// exclusive
pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999, 2)
}

pub const EMPTY_VALUE: &str = "";
pub const ELEMENT_SEPARATOR: char = '\n';

pub const MAX_DATA_SIZE: usize = 331;

// 13 fields, plus the empty line after the trailing separator, minus a missing display
pub const ELEMENTS_RANGE: RangeInclusive<usize> = 12..=14;

pub const DEFAULT_QR_SIZE: u32 = 400;

pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_VERSIONS.iter().any(|supported| *supported == version)
}

pub mod element_index {
    pub const SERVICE_TAG: usize = 0;
    pub const VERSION: usize = 1;
    pub const ENCODING: usize = 2;
    pub const FUNCTION: usize = 3;
    pub const BIC: usize = 4;
    pub const BENEFICIARY: usize = 5;
    pub const BENEFICIARY_ACCOUNT: usize = 6;
    pub const CURRENCY_AMOUNT: usize = 7;
    pub const BENEFICIARY_CODE: usize = 8;
    pub const GOAL: usize = 9;
    pub const REFERENCE: usize = 10;
    pub const PAYMENT_PURPOSE: usize = 11;
    pub const DISPLAY: usize = 12;
}
