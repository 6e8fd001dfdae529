// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conversion between human-readable decimal amounts and smallest units.

use alloy::primitives::U256;

/// Errors produced while parsing a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount must not be negative")]
    Negative,

    #[error("invalid amount format: {0}")]
    Malformed(String),

    #[error("too many decimal places (max {0})")]
    TooPrecise(u8),

    #[error("amount overflows 256 bits")]
    Overflow,

    #[error("amount must be greater than zero")]
    NotPositive,
}

/// Split a decimal string into whole and fraction digits, rejecting
/// anything that is not plain `digits[.digits]`.
fn split_decimal(amount: &str) -> Result<(&str, &str), AmountError> {
    if amount.is_empty() {
        return Err(AmountError::Empty);
    }
    if amount.starts_with('-') {
        return Err(AmountError::Negative);
    }

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(AmountError::Malformed(amount.to_string()));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(AmountError::Malformed(amount.to_string()));
    }
    Ok((whole, fraction))
}

/// Check that `amount` is a well-formed, strictly positive decimal without
/// converting it (used before the asset's decimals are known).
pub fn check_positive_decimal(amount: &str) -> Result<(), AmountError> {
    let (whole, fraction) = split_decimal(amount.trim())?;
    if whole.chars().chain(fraction.chars()).all(|c| c == '0') {
        return Err(AmountError::NotPositive);
    }
    Ok(())
}

/// [`parse_amount`], additionally rejecting zero.
pub fn parse_positive_amount(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let value = parse_amount(amount, decimals)?;
    if value.is_zero() {
        return Err(AmountError::NotPositive);
    }
    Ok(value)
}

/// Parse a human-readable amount to wei (or token units).
///
/// Trailing zeros in the fraction do not count against `decimals`, so
/// `"1.50"` is accepted at one decimal. Signs, exponents and separators are
/// rejected.
///
/// # Arguments
/// * `amount` - Amount as a string (e.g., "1.5")
/// * `decimals` - Number of decimals (18 for the native asset)
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, AmountError> {
    let (whole, fraction) = split_decimal(amount.trim())?;

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > decimals as usize {
        return Err(AmountError::TooPrecise(decimals));
    }

    let whole_units = if whole.is_empty() {
        U256::ZERO
    } else {
        whole.parse::<U256>().map_err(|_| AmountError::Overflow)?
    };

    // Pad with zeros to match decimals
    let fraction_units = if fraction.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", fraction, width = decimals as usize);
        padded.parse::<U256>().map_err(|_| AmountError::Overflow)?
    };

    let multiplier = U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .ok_or(AmountError::Overflow)?;

    whole_units
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(fraction_units))
        .ok_or(AmountError::Overflow)
}

/// Format wei (or token units) to a human-readable amount at full precision.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        format!("{}.{}", whole, trimmed)
    }
}

/// Format a per-gas price in gwei.
pub fn format_gwei(wei: u128) -> String {
    format_amount(U256::from(wei), 9)
}
