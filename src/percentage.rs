mod ops;

use std::{
    cmp::Ordering,
    fmt::{Alignment, Debug, Display, Formatter, Write as _},
    hash::{Hash, Hasher},
    ops::RangeInclusive,
    str::FromStr,
};

use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    fmt::{Locale, LocaleFormatter, PercentFormatter, format_general},
    number::Number,
};

/// Percentage expressed in percent units: `Percentage::new(10)` is 10%, not 1000%.
///
/// Equality and ordering are those of the raw `f64`, so `NaN` is unordered and unequal to itself.
/// Hashing treats `0%` and `-0%` as the same value since they compare equal.
///
/// Serializes as the bare raw value, so 1% becomes `1.0` and not `0.01`.
#[derive(
    Clone,
    Copy,
    Default,
    Deserialize,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[must_use]
pub struct Percentage(OrderedFloat<f64>);

impl Percentage {
    pub const ZERO: Self = Self(OrderedFloat(0.0));
    pub const HUNDRED: Self = Self(OrderedFloat(100.0));

    /// Create a percentage from its raw value, for example, `Percentage::new(50.5)` for 50.5%.
    ///
    /// There is no range restriction: negative values and values over 100% are fine.
    pub fn new(raw_value: impl Number) -> Self {
        Self(OrderedFloat(raw_value.to_f64()))
    }

    /// Create a percentage from a raw value only if it converts into `f64` without loss.
    pub fn exactly(raw_value: impl Number) -> Option<Self> {
        raw_value.to_exact_f64().map(|raw_value| Self(OrderedFloat(raw_value)))
    }

    /// `Percentage::from_fraction(0.5)` is 50%.
    pub const fn from_fraction(fraction: f64) -> Self {
        Self(OrderedFloat(fraction * 100.0))
    }

    /// The raw percentage number: 10 for 10%.
    #[must_use]
    pub const fn raw_value(self) -> f64 {
        self.0.0
    }

    /// The percentage as a fraction: 0.1 for 10%.
    #[must_use]
    pub const fn fraction(self) -> f64 {
        self.0.0 / 100.0
    }

    /// Absolute raw value.
    #[must_use]
    pub const fn magnitude(self) -> f64 {
        self.0.0.abs()
    }

    /// Percentage of the value: `Percentage::new(50).of(200) == 100`.
    ///
    /// Integer values are multiplied by the percentage rounded to the whole percent, and the product
    /// is then divided by 100 with integer division, so `Percentage::new(50).of(201) == 100`.
    /// Use [`Percentage::of_exact`] to get the unrounded floating-point result instead.
    ///
    /// # Panics
    ///
    /// Panics if the integer result does not fit `T`, see [`Percentage::checked_of`].
    #[must_use]
    pub fn of<T: Number>(self, value: T) -> T {
        match self.checked_of(value) {
            Some(result) => result,
            None => panic!("{self:?} of {value:?} overflows"),
        }
    }

    /// Like [`Percentage::of`], but [`None`] when the integer result does not fit `T`
    /// or the percentage cannot be rounded to an integer.
    #[must_use]
    pub fn checked_of<T: Number>(self, value: T) -> Option<T> {
        value.scale_by_percentage(self.raw_value())
    }

    /// Percentage of the value, computed in `f64` regardless of the value type:
    /// `Percentage::new(50).of_exact(201) == 100.5`.
    #[must_use]
    pub fn of_exact(self, value: impl Number) -> f64 {
        value.to_f64() * self.raw_value() / 100.0
    }

    /// Which percentage the value makes of the total: `Percentage::from_ratio(100, 200)` is 50%.
    ///
    /// A zero total gives 0%.
    pub fn from_ratio(value: impl Number, total: impl Number) -> Self {
        let total = total.to_f64();
        if total == 0.0 {
            return Self::ZERO;
        }
        Self::new(value.to_f64() / total * 100.0)
    }

    /// Relative change from the original value to the new one:
    /// `Percentage::change(100, 150)` is 50%.
    ///
    /// Change from zero is 0% when the new value is zero as well, and positive infinity otherwise.
    pub fn change<T: Number>(original: T, new: T) -> Self {
        let original = original.to_f64();
        let new = new.to_f64();
        if original == 0.0 {
            return if new == 0.0 { Self::ZERO } else { Self::new(f64::INFINITY) };
        }
        Self::new((new - original) / original * 100.0)
    }

    /// Value before it got increased by this percentage.
    ///
    /// For example, 120 after a 40% increase was 85.714…
    #[must_use]
    pub fn original_value_before_increase(self, final_value: impl Number) -> f64 {
        final_value.to_f64() / (1.0 + self.fraction())
    }

    /// Value before it got decreased by this percentage.
    ///
    /// A decrease of 100% or more cannot be reverted, in which case the result is positive infinity.
    #[must_use]
    pub fn original_value_before_decrease(self, final_value: impl Number) -> f64 {
        let fraction = self.fraction();
        if fraction >= 1.0 {
            return f64::INFINITY;
        }
        final_value.to_f64() / (1.0 - fraction)
    }

    /// Answers «the value is this percentage of what?»: `Percentage::new(90).is_percent_of(67)` is 74.444…
    ///
    /// Zero percentage gives positive infinity.
    #[must_use]
    pub fn is_percent_of(self, value: impl Number) -> f64 {
        let fraction = self.fraction();
        if fraction == 0.0 {
            return f64::INFINITY;
        }
        value.to_f64() / fraction
    }

    pub fn clamped_zero_to_hundred(self) -> Self {
        if self.raw_value() > 100.0 {
            Self::HUNDRED
        } else if self.raw_value() < 0.0 {
            Self::ZERO
        } else {
            self
        }
    }

    /// Clamp to the inclusive range.
    ///
    /// Unlike [`f64::clamp`], this does not panic on an inverted range: the lower bound wins.
    /// `NaN` is returned as is.
    pub fn clamped(self, range: RangeInclusive<Self>) -> Self {
        let (lower, upper) = range.into_inner();
        if self < lower {
            lower
        } else if self > upper {
            upper
        } else {
            self
        }
    }

    #[must_use]
    pub fn is_within_standard_range(self) -> bool {
        (0.0..=100.0).contains(&self.raw_value())
    }

    /// Uniformly random percentage within the range, using the thread-local generator.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty or either bound is not finite.
    pub fn random(range: RangeInclusive<Self>) -> Self {
        Self::random_with(range, &mut rand::rng())
    }

    /// Uniformly random percentage within the range, using the given generator.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty or either bound is not finite.
    pub fn random_with<R: Rng>(range: RangeInclusive<Self>, rng: &mut R) -> Self {
        let (lower, upper) = range.into_inner();
        let fraction = rng.random_range(lower.fraction()..=upper.fraction());
        Self::from_fraction(fraction).clamped(lower..=upper)
    }

    /// Format with exactly `decimal_places` fractional digits using the locale conventions:
    /// `Percentage::new(33.333).formatted(1, Locale::EnUs) == "33.3%"`.
    #[must_use]
    pub fn formatted(self, decimal_places: usize, locale: Locale) -> String {
        self.formatted_with(&LocaleFormatter, decimal_places, locale)
    }

    /// Format using the custom formatter, falling back to `%g` when it cannot render the value.
    #[must_use]
    pub fn formatted_with(
        self,
        formatter: &impl PercentFormatter,
        decimal_places: usize,
        locale: Locale,
    ) -> String {
        formatter.format(self.fraction(), decimal_places, locale).unwrap_or_else(|| {
            #[cfg(feature = "tracing")]
            tracing::debug!(raw_value = self.raw_value(), %locale, "falling back to `%g`");
            format!("{}%", format_general(self.raw_value()))
        })
    }
}

impl PartialEq for Percentage {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        self.raw_value() == other.raw_value()
    }
}

impl PartialOrd for Percentage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.raw_value().partial_cmp(&other.raw_value())
    }
}

impl Hash for Percentage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Normalize `-0.0`.
        let raw_value = if self.raw_value() == 0.0 { 0.0 } else { self.raw_value() };
        raw_value.to_bits().hash(state);
    }
}

impl From<f64> for Percentage {
    fn from(raw_value: f64) -> Self {
        Self(OrderedFloat(raw_value))
    }
}

impl FromStr for Percentage {
    type Err = Error;

    /// Parse the raw value with an optional percent sign: `12.5`, `12.5%`, and `12.5 %` are all 12.5%.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
        number.parse::<f64>().map(Self::from).map_err(|source| Error::ParsePercentage {
            input: input.to_owned(),
            source,
        })
    }
}

impl Display for Percentage {
    /// Two decimal places in the default locale, unless the precision is given explicitly.
    ///
    /// The precision means decimal places here, so [`Formatter::pad`] would truncate the output.
    /// Width and fill are applied manually instead, right-aligned by default like numbers.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let decimal_places = f.precision().unwrap_or(2);
        let formatted = self.formatted(decimal_places, Locale::default());
        let padding = f.width().unwrap_or_default().saturating_sub(formatted.chars().count());
        let (before, after) = match f.align() {
            Some(Alignment::Left) => (0, padding),
            Some(Alignment::Center) => (padding / 2, padding - padding / 2),
            Some(Alignment::Right) | None => (padding, 0),
        };
        let fill = f.fill();
        for _ in 0..before {
            f.write_char(fill)?;
        }
        f.write_str(&formatted)?;
        for _ in 0..after {
            f.write_char(fill)?;
        }
        Ok(())
    }
}

impl Debug for Percentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}%", self.0.0)
    }
}
