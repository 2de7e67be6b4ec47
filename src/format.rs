//! Display formatting for amounts, dates and labels (`en-IN` conventions).

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

const RUPEE: &str = "₹";

/// Groups an unsigned digit string the Indian way: the last three digits,
/// then pairs (`12345678` -> `1,23,45,678`).
fn format_with_commas(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let head = head.chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in head.iter().enumerate() {
        if i > 0 && i % 2 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    let grouped: String = out.into_iter().rev().collect();
    format!("{},{}", grouped, tail)
}

/// `125450.75` -> `₹1,25,450.75`. Always two decimals.
pub fn format_currency(amount: Decimal) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}{}{}.{}", sign, RUPEE, format_with_commas(int_part), frac_part)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
