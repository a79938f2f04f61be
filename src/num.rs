//! Fixed-point model of the exchange.
//!
//! Prices travel on the wire as basis points (`10000` = 100%), amounts as raw
//! USDC units (6 decimals). Conversions from user-facing decimals go through
//! exact decimal arithmetic with half-up rounding, never through binary
//! floating point, so `0.55` is always `5500` and `0.1` is always `1000`.

use alloy::primitives::{I256, U256};
use fastnum::{
    UD64, UD128, bint,
    decimal::{Context, Decimal, RoundingMode, UnsignedDecimal},
};

/// Number of decimals in a basis-point price.
pub const PRICE_DECIMALS: u8 = 4;

/// Basis points representing a price of 1 (100%).
pub const PRICE_PRECISION: u64 = 10_000;

/// Number of decimals of the collateral token.
pub const USDC_DECIMALS: u8 = 6;

/// Conversion into a protocol integer was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("{0} must be positive")]
    NonPositive(&'static str),

    #[error("price must be between 0 and 1 (exclusive), got {0}")]
    PriceNotBelowOne(String),

    #[error("{what} {value} is below the protocol resolution of {decimals} decimals")]
    BelowResolution {
        what: &'static str,
        value: String,
        decimals: u8,
    },

    #[error("{0} {1} does not fit the protocol integer type")]
    Overflow(&'static str, String),

    #[error("invalid {0}: {1:?}")]
    Malformed(&'static str, String),
}

/// Fixed-point to decimal converter.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter {
    decimals: i32,
}

impl Converter {
    pub const fn new(decimals: u8) -> Self {
        Self {
            decimals: decimals as i32,
        }
    }

    /// Basis-point prices.
    pub const fn price() -> Self {
        Self::new(PRICE_DECIMALS)
    }

    /// Raw USDC amounts.
    pub const fn usdc() -> Self {
        Self::new(USDC_DECIMALS)
    }

    pub fn decimals(&self) -> u8 {
        self.decimals as u8
    }

    pub fn from_unsigned<const N: usize>(&self, value: U256) -> UnsignedDecimal<N> {
        let unscaled = bint::UInt::<N>::from_le_slice(value.as_le_slice())
            .expect("Converter: U256 -> UInt::<N>");
        UnsignedDecimal::<N>::from_parts(
            unscaled,
            -self.decimals,
            Context::default().with_rounding_mode(RoundingMode::Floor),
        )
    }

    pub fn from_signed<const N: usize>(&self, value: I256) -> Decimal<N> {
        let unscaled = bint::UInt::<N>::from_le_slice(value.unsigned_abs().as_le_slice())
            .expect("Converter: abs(I256) -> UInt::<N>");
        Decimal::<N>::from_parts(
            unscaled,
            -self.decimals,
            match value.sign() {
                alloy::primitives::Sign::Negative => fastnum::decimal::Sign::Minus,
                alloy::primitives::Sign::Positive => fastnum::decimal::Sign::Plus,
            },
            Context::default().with_rounding_mode(RoundingMode::Floor),
        )
    }

    /// Rescales `value` to the converter precision and returns the unscaled
    /// integer. Digits beyond the precision are rounded half-up.
    pub fn to_unsigned<const N: usize>(&self, value: UnsignedDecimal<N>) -> U256 {
        let rescaled = value
            .with_rounding_mode(RoundingMode::HalfUp)
            .rescale(self.decimals as i16);
        U256::from_le_slice(rescaled.digits().to_radix_le(256).as_slice())
    }
}

/// Converts a decimal price in `(0, 1)` to basis points.
pub fn price_to_bps(price: UD64) -> Result<u64, RangeError> {
    if price.is_zero() {
        return Err(RangeError::NonPositive("price"));
    }
    if price >= UD64::ONE {
        return Err(RangeError::PriceNotBelowOne(price.to_string()));
    }

    let bps = Converter::price().to_unsigned(price);
    if bps.is_zero() {
        return Err(RangeError::BelowResolution {
            what: "price",
            value: price.to_string(),
            decimals: PRICE_DECIMALS,
        });
    }
    // 0.99995 and above round up to a full 10000 bps
    if bps >= U256::from(PRICE_PRECISION) {
        return Err(RangeError::PriceNotBelowOne(price.to_string()));
    }
    Ok(bps.to::<u64>())
}

/// Converts a positive decimal USDC amount to raw token units.
pub fn amount_to_raw(amount: UD128) -> Result<u128, RangeError> {
    if amount.is_zero() {
        return Err(RangeError::NonPositive("amount"));
    }
    if amount > UD128::from(u64::MAX) {
        return Err(RangeError::Overflow("amount", amount.to_string()));
    }

    let raw = Converter::usdc().to_unsigned(amount);
    if raw.is_zero() {
        return Err(RangeError::BelowResolution {
            what: "amount",
            value: amount.to_string(),
            decimals: USDC_DECIMALS,
        });
    }
    Ok(raw.to::<u128>())
}

/// Basis points back to a decimal price, for display.
pub fn bps_to_price(bps: u64) -> UD64 {
    Converter::price().from_unsigned(U256::from(bps))
}

/// Raw USDC units back to a decimal amount, for display.
///
/// Not an exact inverse of [`amount_to_raw`]: digits past the sixth decimal
/// are lost when converting in the other direction.
pub fn raw_to_amount(raw: u128) -> UD128 {
    Converter::usdc().from_unsigned(U256::from(raw))
}

/// Parses a user supplied price such as `"0.55"`. `NaN` and infinities are
/// malformed.
pub fn parse_price(input: &str) -> Result<UD64, RangeError> {
    UD64::from_str(input.trim(), Context::default())
        .ok()
        .filter(|price| price.is_finite())
        .ok_or_else(|| RangeError::Malformed("price", input.to_string()))
}

/// Parses a user supplied USDC amount such as `"10.5"`.
pub fn parse_amount(input: &str) -> Result<UD128, RangeError> {
    UD128::from_str(input.trim(), Context::default())
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| RangeError::Malformed("amount", input.to_string()))
}
