//! CSV batches: many payments encoded into payloads, or many payloads decoded back.
//!
//! Encode input headers: `beneficiary,beneficiary_account,amount,beneficiary_code,payment_purpose`
//! (an empty amount means none). Decode input needs a `payload` column.

use crate::decoder::decode_qr_data;
use crate::encoder::encode_payment;
use crate::error::{BatchError, QrDataError};
use crate::models::PaymentDataToEncode;
use crate::util::format_amount;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total_records: usize,
    pub succeeded: usize,
    /// Data line number (1-based, header excluded) and the error of every failed row.
    pub failures: Vec<(usize, QrDataError)>,
}

impl BatchSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Failures grouped by error, most frequent first.
    pub fn failure_counts(&self) -> Vec<(QrDataError, usize)> {
        let mut counts: HashMap<QrDataError, usize> = HashMap::new();
        for (_, err) in &self.failures {
            *counts.entry(*err).or_insert(0) += 1;
        }
        let mut items: Vec<(QrDataError, usize)> = counts.into_iter().collect();
        items.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.to_string().cmp(&b.0.to_string()))
        });
        items
    }

    fn record(&mut self, line: usize, result: Result<(), QrDataError>) {
        self.total_records += 1;
        match result {
            Ok(()) => self.succeeded += 1,
            Err(err) => self.failures.push((line, err)),
        }
    }
}

#[derive(serde::Deserialize)]
struct PaymentRow {
    beneficiary: String,
    beneficiary_account: String,
    #[serde(default)]
    amount: Option<String>,
    beneficiary_code: String,
    payment_purpose: String,
}

impl PaymentRow {
    /// Amount text that is not a decimal is a row error here, unlike in a scanned payload.
    fn into_payment(self) -> Result<PaymentDataToEncode, QrDataError> {
        let amount = match self.amount.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(Decimal::from_str(raw).map_err(|_| QrDataError::InvalidAmount)?),
        };
        Ok(PaymentDataToEncode {
            beneficiary: self.beneficiary,
            beneficiary_account: self.beneficiary_account,
            amount,
            beneficiary_code: self.beneficiary_code,
            payment_purpose: self.payment_purpose,
        })
    }
}

#[derive(serde::Serialize)]
struct EncodedRow<'a> {
    line: usize,
    payload: &'a str,
    error: &'a str,
}

#[derive(serde::Deserialize)]
struct PayloadRow {
    payload: String,
}

#[derive(serde::Serialize)]
struct DecodedRow<'a> {
    line: usize,
    beneficiary: &'a str,
    beneficiary_account: &'a str,
    amount: String,
    beneficiary_code: &'a str,
    payment_purpose: &'a str,
    error: &'a str,
}

pub fn encode_csv(input: &Path, output: &Path) -> Result<BatchSummary, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(input)?;
    let mut writer = csv::Writer::from_path(output)?;
    let mut summary = BatchSummary::default();

    for (idx, result) in reader.deserialize::<PaymentRow>().enumerate() {
        let line = idx + 1;
        let row: PaymentRow = result?;
        let encoded = row
            .into_payment()
            .and_then(|payment| encode_payment(&payment));
        let error = encoded.as_ref().err().map(ToString::to_string).unwrap_or_default();
        writer.serialize(EncodedRow {
            line,
            payload: encoded.as_deref().unwrap_or_default(),
            error: &error,
        })?;
        summary.record(line, encoded.map(|_| ()));
    }

    writer.flush()?;
    log::info!(
        "encoded {} of {} payment(s) from {}",
        summary.succeeded,
        summary.total_records,
        input.display()
    );
    Ok(summary)
}

pub fn decode_csv(input: &Path, output: &Path) -> Result<BatchSummary, BatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(input)?;
    let mut writer = csv::Writer::from_path(output)?;
    let mut summary = BatchSummary::default();

    for (idx, result) in reader.deserialize::<PayloadRow>().enumerate() {
        let line = idx + 1;
        let row = result?;
        let row_result = match decode_qr_data(&row.payload) {
            Ok(details) => {
                writer.serialize(DecodedRow {
                    line,
                    beneficiary: &details.beneficiary,
                    beneficiary_account: &details.beneficiary_account,
                    amount: format_amount(details.amount.as_ref()),
                    beneficiary_code: &details.beneficiary_code,
                    payment_purpose: &details.payment_purpose,
                    error: "",
                })?;
                Ok(())
            }
            Err(err) => {
                writer.serialize(DecodedRow {
                    line,
                    beneficiary: "",
                    beneficiary_account: "",
                    amount: String::new(),
                    beneficiary_code: "",
                    payment_purpose: "",
                    error: &err.to_string(),
                })?;
                Err(err)
            }
        };
        summary.record(line, row_result);
    }

    writer.flush()?;
    log::info!(
        "decoded {} of {} payload(s) from {}",
        summary.succeeded,
        summary.total_records,
        input.display()
    );
    Ok(summary)
}
