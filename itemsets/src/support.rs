use crate::error::{MiningError, Result};

/// Rounding slack in units of the product's own precision; absorbs noise such
/// as `0.7 * 10 == 7.000000000000001` without swallowing real fractions.
const ROUNDING_ULPS: f64 = 4.0;

/// Minimum support threshold, either as an absolute transaction count or as
/// a fraction of all transactions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MinSupport {
    Absolute(i64),
    Relative(f64),
}

impl MinSupport {
    /// Normalizes the threshold to an absolute transaction count.
    ///
    /// Fractions round up, so the threshold is never under-counted.
    pub fn to_count(self, num_transactions: usize) -> Result<usize> {
        match self {
            MinSupport::Absolute(count) if count <= 0 => Err(MiningError::NonPositiveSupport),
            MinSupport::Absolute(count) => Ok(count as usize),
            MinSupport::Relative(fraction) if fraction.is_nan() || fraction > 1.0 => {
                Err(MiningError::InvalidFraction(fraction))
            }
            MinSupport::Relative(fraction) if fraction <= 0.0 => Err(MiningError::NonPositiveSupport),
            MinSupport::Relative(fraction) => {
                let scaled = fraction * num_transactions as f64;
                let tolerance = scaled * f64::EPSILON * ROUNDING_ULPS;
                let count = (scaled - tolerance).ceil().max(1.0);
                Ok(count as usize)
            }
        }
    }
}

impl From<f64> for MinSupport {
    fn from(fraction: f64) -> Self {
        MinSupport::Relative(fraction)
    }
}

impl From<f32> for MinSupport {
    fn from(fraction: f32) -> Self {
        MinSupport::Relative(fraction as f64)
    }
}

impl From<i64> for MinSupport {
    fn from(count: i64) -> Self {
        MinSupport::Absolute(count)
    }
}

impl From<i32> for MinSupport {
    fn from(count: i32) -> Self {
        MinSupport::Absolute(count as i64)
    }
}

impl From<u32> for MinSupport {
    fn from(count: u32) -> Self {
        MinSupport::Absolute(count as i64)
    }
}

impl From<usize> for MinSupport {
    fn from(count: usize) -> Self {
        MinSupport::Absolute(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_passes_through() {
        assert_eq!(MinSupport::from(3).to_count(9).unwrap(), 3);
        assert_eq!(MinSupport::from(20usize).to_count(9).unwrap(), 20);
    }

    #[test]
    fn test_relative_rounds_up() {
        assert_eq!(MinSupport::from(0.3).to_count(9).unwrap(), 3);
        assert_eq!(MinSupport::from(0.2).to_count(9).unwrap(), 2);
        assert_eq!(MinSupport::from(0.5).to_count(4).unwrap(), 2);
        assert_eq!(MinSupport::from(1.0).to_count(7).unwrap(), 7);
    }

    #[test]
    fn test_relative_ignores_float_noise() {
        assert_eq!(MinSupport::from(0.7).to_count(10).unwrap(), 7);
        assert_eq!(MinSupport::from(0.1).to_count(30).unwrap(), 3);
        assert_eq!(MinSupport::from(0.07).to_count(100).unwrap(), 7);
    }

    #[test]
    fn test_relative_just_above_integer_rounds_up() {
        assert_eq!(MinSupport::Relative(0.3000000000001).to_count(10).unwrap(), 4);
        assert_eq!(MinSupport::Relative(0.5000000001).to_count(1000).unwrap(), 501);
    }

    #[test]
    fn test_relative_is_at_least_one() {
        assert_eq!(MinSupport::from(0.01).to_count(5).unwrap(), 1);
        assert_eq!(MinSupport::from(0.5).to_count(0).unwrap(), 1);
    }

    #[test]
    fn test_non_positive_is_rejected() {
        assert!(matches!(
            MinSupport::from(0).to_count(10),
            Err(MiningError::NonPositiveSupport)
        ));
        assert!(matches!(
            MinSupport::from(-2).to_count(10),
            Err(MiningError::NonPositiveSupport)
        ));
        assert!(matches!(
            MinSupport::from(0.0).to_count(10),
            Err(MiningError::NonPositiveSupport)
        ));
    }

    #[test]
    fn test_fraction_above_one_is_rejected() {
        assert!(matches!(
            MinSupport::from(1.5).to_count(10),
            Err(MiningError::InvalidFraction(_))
        ));
        assert!(matches!(
            MinSupport::Relative(f64::NAN).to_count(10),
            Err(MiningError::InvalidFraction(_))
        ));
    }
}
