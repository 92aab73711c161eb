use crate::reference::MAX_DATA_SIZE;
use rust_decimal::Decimal;

/// Whether the UTF-8 encoding of `data` is larger than a QR data payload may be.
pub fn size_is_not_valid(data: &str) -> bool {
    data.len() > MAX_DATA_SIZE
}

/// Splits a payload into its lines. `\n`, `\r\n` and a lone `\r` all terminate a line, and a
/// trailing terminator leaves one empty line at the end.
pub fn split_elements(data: &str) -> Vec<&str> {
    let bytes = data.as_bytes();
    let mut elements = Vec::new();
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\n' => {
                elements.push(&data[start..idx]);
                idx += 1;
                start = idx;
            }
            b'\r' => {
                elements.push(&data[start..idx]);
                idx += if bytes.get(idx + 1) == Some(&b'\n') { 2 } else { 1 };
                start = idx;
            }
            _ => idx += 1,
        }
    }
    elements.push(&data[start..]);
    elements
}

/// Plain decimal notation: no exponent, no grouping, scale kept as is. Zero is never signed.
pub fn format_amount(amount: Option<&Decimal>) -> String {
    amount
        .map(|amount| {
            if amount.is_zero() {
                amount.abs().to_string()
            } else {
                amount.to_string()
            }
        })
        .unwrap_or_default()
}

/// Parses the amount part of the currency+amount element.
///
/// Text that is not a decimal literal gives `None`. Digits beyond what [`Decimal`] holds are
/// truncated toward zero. A literal too large saturates to `Decimal::MAX` or `Decimal::MIN`,
/// and a negative literal never comes back as zero, so range checks still reject it.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    DecimalLiteral::scan(raw).map(|literal| literal.to_decimal())
}

// significant digits and scale a Decimal can carry
const MAX_DIGITS: usize = 28;

#[derive(Debug, Clone, Copy)]
struct DecimalLiteral<'a> {
    negative: bool,
    int_digits: &'a str,
    frac_digits: &'a str,
    exponent: Option<i64>,
}

impl<'a> DecimalLiteral<'a> {
    /// Accepts `[+-]digits[.digits][(e|E)[+-]digits]` with at least one mantissa digit.
    fn scan(raw: &'a str) -> Option<Self> {
        let bytes = raw.as_bytes();
        let digits_from = |mut pos: usize| {
            while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
                pos += 1;
            }
            pos
        };

        let (negative, mut pos) = match bytes.first() {
            Some(b'-') => (true, 1),
            Some(b'+') => (false, 1),
            _ => (false, 0),
        };

        let int_end = digits_from(pos);
        let int_digits = &raw[pos..int_end];
        pos = int_end;

        let mut frac_digits = "";
        if bytes.get(pos) == Some(&b'.') {
            let frac_end = digits_from(pos + 1);
            frac_digits = &raw[pos + 1..frac_end];
            pos = frac_end;
        }
        if int_digits.is_empty() && frac_digits.is_empty() {
            return None;
        }

        let mut exponent = None;
        if let Some(b'e' | b'E') = bytes.get(pos) {
            pos += 1;
            let negative_exponent = match bytes.get(pos) {
                Some(b'-') => {
                    pos += 1;
                    true
                }
                Some(b'+') => {
                    pos += 1;
                    false
                }
                _ => false,
            };
            let exp_end = digits_from(pos);
            if exp_end == pos {
                return None;
            }
            let magnitude = raw[pos..exp_end].bytes().fold(0i64, |acc, digit| {
                acc.saturating_mul(10)
                    .saturating_add(i64::from(digit - b'0'))
            });
            exponent = Some(if negative_exponent {
                -magnitude
            } else {
                magnitude
            });
            pos = exp_end;
        }

        if pos != bytes.len() {
            return None;
        }
        Some(Self {
            negative,
            int_digits,
            frac_digits,
            exponent,
        })
    }

    fn to_decimal(self) -> Decimal {
        let digits = format!("{}{}", self.int_digits, self.frac_digits);
        let significant = digits.trim_start_matches('0');
        if significant.is_empty() {
            let scale = match self.exponent {
                Some(_) => 0,
                None => self.frac_digits.len().min(MAX_DIGITS) as u32,
            };
            return Decimal::new(0, scale);
        }

        // point position counted from the first significant digit
        let leading_zeros = (digits.len() - significant.len()) as i64;
        let point = (self.int_digits.len() as i64)
            .saturating_add(self.exponent.unwrap_or(0))
            .saturating_sub(leading_zeros);
        if point > MAX_DIGITS as i64 {
            return self.saturated();
        }

        let (int_part, frac_part) = if point <= 0 {
            let zeros = usize::try_from(point.unsigned_abs())
                .unwrap_or(usize::MAX)
                .min(MAX_DIGITS);
            (String::from("0"), format!("{}{significant}", "0".repeat(zeros)))
        } else {
            let point = point as usize;
            if point >= significant.len() {
                let padding = "0".repeat(point - significant.len());
                (format!("{significant}{padding}"), String::new())
            } else {
                (
                    significant[..point].to_string(),
                    significant[point..].to_string(),
                )
            }
        };

        let int_len = if int_part == "0" { 0 } else { int_part.len() };
        let frac_len = frac_part.len().min(MAX_DIGITS - int_len);
        let frac_part = &frac_part[..frac_len];

        if int_len == 0 && frac_part.bytes().all(|digit| digit == b'0') {
            // nonzero but below the smallest representable step
            return if self.negative {
                Decimal::MIN
            } else {
                Decimal::ZERO
            };
        }

        let sign = if self.negative { "-" } else { "" };
        let plain = if frac_part.is_empty() {
            format!("{sign}{int_part}")
        } else {
            format!("{sign}{int_part}.{frac_part}")
        };
        match Decimal::from_str_exact(&plain) {
            Ok(value) => value,
            Err(err) => {
                log::trace!("amount {plain:?} is out of decimal range: {err}");
                self.saturated()
            }
        }
    }

    fn saturated(self) -> Decimal {
        if self.negative {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    }
}
