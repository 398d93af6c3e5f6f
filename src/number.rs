use std::fmt::Debug;

use crate::Percentage;

/// Primitive number that can be used as a percentage operand.
///
/// Integers and floats take different paths in [`Percentage::of`]: an integer is scaled by the
/// percentage rounded to the nearest whole percent and then truncated by the division by 100,
/// while a float is scaled exactly in its own width.
///
/// The integer path computes in `i128`, so intermediate products do not overflow as long as the
/// operand and the rounded percentage fit there. [`None`] means the result does not fit `Self`.
pub trait Number: Copy + Debug {
    /// Lossy conversion into `f64`.
    fn to_f64(self) -> f64;

    /// Conversion into `f64` which fails when the value cannot be represented exactly.
    fn to_exact_f64(self) -> Option<f64>;

    /// `self × raw_value ÷ 100`, following the integer or floating-point semantics of `Self`.
    fn scale_by_percentage(self, raw_value: f64) -> Option<Self>;

    /// `self + self × raw_value ÷ 100`, with the same semantics as [`Number::scale_by_percentage`].
    fn grow_by_percentage(self, raw_value: f64) -> Option<Self>;
}

/// `value × round(raw_value) ÷ 100` with truncating division.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn scale_wide(value: i128, raw_value: f64) -> Option<i128> {
    let percent = raw_value.round();
    let bound = -(i128::MIN as f64);
    if !(-bound..bound).contains(&percent) {
        return None;
    }
    value.checked_mul(percent as i128).map(|product| product / 100)
}

macro_rules! integer {
    ($magnitude:ident => $($type_:ty),+ $(,)?) => {
        $(
            impl Number for $type_ {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[allow(clippy::cast_lossless)]
                fn to_exact_f64(self) -> Option<f64> {
                    let magnitude = $magnitude!(self);
                    if magnitude == 0 {
                        return Some(0.0);
                    }
                    let significant_bits =
                        u128::BITS - magnitude.leading_zeros() - magnitude.trailing_zeros();
                    (significant_bits <= f64::MANTISSA_DIGITS).then(|| self.to_f64())
                }

                fn scale_by_percentage(self, raw_value: f64) -> Option<Self> {
                    let value = i128::try_from(self).ok()?;
                    Self::try_from(scale_wide(value, raw_value)?).ok()
                }

                fn grow_by_percentage(self, raw_value: f64) -> Option<Self> {
                    let value = i128::try_from(self).ok()?;
                    Self::try_from(value.checked_add(scale_wide(value, raw_value)?)?).ok()
                }
            }
        )+
    };
}

macro_rules! signed_magnitude {
    ($value:expr) => {
        $value.unsigned_abs() as u128
    };
}

macro_rules! unsigned_magnitude {
    ($value:expr) => {
        $value as u128
    };
}

macro_rules! float {
    ($($type_:ty),+ $(,)?) => {
        $(
            impl Number for $type_ {
                #[allow(clippy::cast_lossless)]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn to_exact_f64(self) -> Option<f64> {
                    (!self.is_nan()).then(|| self.to_f64())
                }

                #[allow(clippy::cast_possible_truncation)]
                fn scale_by_percentage(self, raw_value: f64) -> Option<Self> {
                    Some(self * (raw_value as Self) / 100.0)
                }

                fn grow_by_percentage(self, raw_value: f64) -> Option<Self> {
                    self.scale_by_percentage(raw_value).map(|delta| self + delta)
                }
            }
        )+
    };
}

integer!(signed_magnitude => i8, i16, i32, i64, i128, isize);
integer!(unsigned_magnitude => u8, u16, u32, u64, u128, usize);
float!(f32, f64);

/// Percentage helpers on plain numbers.
pub trait PercentageExt: Number {
    /// `10.percent()` is the same as `Percentage::new(10)`.
    fn percent(self) -> Percentage {
        Percentage::new(self)
    }

    /// Increase the value by the percentage: `100.increased_by(20.percent()) == 120`.
    ///
    /// # Panics
    ///
    /// Panics if the integer result does not fit `Self`, see [`PercentageExt::checked_increased_by`].
    #[must_use]
    fn increased_by(self, percentage: Percentage) -> Self {
        match self.checked_increased_by(percentage) {
            Some(value) => value,
            None => panic!("{self:?} increased by {percentage:?} overflows"),
        }
    }

    /// Decrease the value by the percentage: `100.decreased_by(20.percent()) == 80`.
    ///
    /// # Panics
    ///
    /// Panics if the integer result does not fit `Self`, see [`PercentageExt::checked_decreased_by`].
    #[must_use]
    fn decreased_by(self, percentage: Percentage) -> Self {
        match self.checked_decreased_by(percentage) {
            Some(value) => value,
            None => panic!("{self:?} decreased by {percentage:?} overflows"),
        }
    }

    /// Like [`PercentageExt::increased_by`], but [`None`] on overflow.
    ///
    /// The intermediate `value × percentage` may leave the range of `Self`, so `100_u32` increased
    /// by −20% is 80.
    fn checked_increased_by(self, percentage: Percentage) -> Option<Self> {
        self.grow_by_percentage(percentage.raw_value())
    }

    /// Like [`PercentageExt::decreased_by`], but [`None`] on overflow.
    fn checked_decreased_by(self, percentage: Percentage) -> Option<Self> {
        self.grow_by_percentage(-percentage.raw_value())
    }
}

impl<T: Number> PercentageExt for T {}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_integer_scaling_rounds_percentage_first() {
        assert_eq!(200_i32.scale_by_percentage(50.0), Some(100));
        assert_eq!(201_i32.scale_by_percentage(50.0), Some(100));
        assert_eq!(100_u32.scale_by_percentage(12.5), Some(13));
        assert_eq!(100_u32.scale_by_percentage(12.4), Some(12));
        assert_eq!((-201_i64).scale_by_percentage(50.0), Some(-100));
        assert_eq!(100_u32.scale_by_percentage(-20.0), None);
    }

    #[test]
    fn test_float_scaling_is_exact() {
        assert_eq!(250.5_f64.scale_by_percentage(50.0), Some(125.25));
        assert_eq!(200.0_f32.scale_by_percentage(12.5), Some(25.0));
    }

    #[test]
    fn test_to_exact_f64() {
        assert_eq!(0_i32.to_exact_f64(), Some(0.0));
        assert_eq!(i32::MAX.to_exact_f64(), Some(2_147_483_647.0));
        assert_eq!(i64::MIN.to_exact_f64(), Some(-9_223_372_036_854_775_808.0));
        assert_eq!((1_u64 << 53).to_exact_f64(), Some(9_007_199_254_740_992.0));
        assert_eq!(((1_u64 << 53) + 1).to_exact_f64(), None);
        assert_eq!(i64::MAX.to_exact_f64(), None);
        assert_eq!(u128::MAX.to_exact_f64(), None);
        assert_eq!(i8::MIN.to_exact_f64(), Some(-128.0));
        assert_eq!(1.5_f32.to_exact_f64(), Some(1.5));
        assert_eq!(f64::NAN.to_exact_f64(), None);
        assert_eq!(f64::INFINITY.to_exact_f64(), Some(f64::INFINITY));
    }

    #[test]
    fn test_percent_suffix() {
        assert_eq!(50_i32.percent(), Percentage::new(50));
        assert_eq!(50.5_f64.percent(), Percentage::new(50.5));
        assert_eq!(25_u8.percent().raw_value(), 25.0);
    }

    #[test]
    fn test_increased_by_integer() {
        assert_eq!(100_i32.increased_by(Percentage::new(20)), 120);
        assert_eq!(50_i32.increased_by(Percentage::new(100)), 100);
        assert_eq!(200_i32.increased_by(Percentage::ZERO), 200);
        assert_eq!(100_i32.increased_by(Percentage::new(-20)), 80);
        assert_eq!(100_i32.increased_by(Percentage::new(200)), 300);
        assert_eq!(100_i16.increased_by(Percentage::new(50)), 150);
        assert_eq!(50_u64.increased_by(Percentage::new(20)), 60);
    }

    #[test]
    fn test_decreased_by_integer() {
        assert_eq!(100_i32.decreased_by(Percentage::new(20)), 80);
        assert_eq!(50_i32.decreased_by(Percentage::new(50)), 25);
        assert_eq!(200_i32.decreased_by(Percentage::ZERO), 200);
        assert_eq!(100_i32.decreased_by(Percentage::new(-20)), 120);
        assert_eq!(100_i32.decreased_by(Percentage::HUNDRED), 0);
        assert_eq!(100_i16.decreased_by(Percentage::new(25)), 75);
        assert_eq!(50_u64.decreased_by(Percentage::new(20)), 40);
    }

    #[test]
    fn test_negative_percentage_on_unsigned() {
        assert_eq!(100_u32.increased_by(Percentage::new(-20)), 80);
        assert_eq!(100_u32.decreased_by(Percentage::new(-20)), 120);
        assert_eq!(200_u8.decreased_by(Percentage::new(50)), 100);
        assert_eq!(100_u8.increased_by(Percentage::new(-100)), 0);
        assert_eq!(100_u8.checked_decreased_by(Percentage::new(150)), None);
    }

    #[test]
    fn test_wide_intermediate_product() {
        assert_eq!(200_u8.increased_by(Percentage::new(25)), 250);
        assert_eq!(i64::MAX.decreased_by(Percentage::new(50)), 4_611_686_018_427_387_904);
        assert_eq!(i32::MAX.checked_increased_by(Percentage::new(1)), None);
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn test_increased_by_overflow_panics() {
        let _ = 200_u8.increased_by(Percentage::new(50));
    }

    #[test]
    fn test_nan_percentage_on_integer() {
        assert_eq!(100_i32.checked_increased_by(Percentage::new(f64::NAN)), None);
        assert_eq!(100_i32.checked_increased_by(Percentage::new(f64::INFINITY)), None);
    }

    #[test]
    fn test_increased_decreased_by_float() {
        assert_abs_diff_eq!(100.0_f64.increased_by(Percentage::new(20)), 120.0);
        assert_abs_diff_eq!(100.0_f64.decreased_by(Percentage::new(20)), 80.0);
        assert_abs_diff_eq!(50.5_f64.increased_by(Percentage::HUNDRED), 101.0);
        assert_abs_diff_eq!(50.5_f64.decreased_by(Percentage::new(50)), 25.25);
        assert_abs_diff_eq!(200.0_f32.increased_by(Percentage::new(15)), 230.0, epsilon = 1e-4);
        assert_abs_diff_eq!(200.0_f32.decreased_by(Percentage::new(30)), 140.0, epsilon = 1e-4);
    }
}
