use std::str::FromStr;

use clap::{Parser, Subcommand};
use percentage::{Locale, Percentage, PercentageExt};

use crate::prelude::*;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub format: FormatArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[must_use]
#[derive(Copy, Clone, Parser)]
pub struct FormatArgs {
    /// Locale of the printed percentages, for example, `en-US` or `fr_FR`.
    #[clap(long, default_value = "en-US", env = "PERCENTAGE_LOCALE", global = true)]
    pub locale: Locale,

    /// Number of fractional digits in the printed percentages.
    #[clap(long, default_value = "2", env = "PERCENTAGE_DECIMAL_PLACES", global = true)]
    pub decimal_places: usize,
}

impl FormatArgs {
    fn format(self, percentage: Percentage) -> String {
        percentage.formatted(self.decimal_places, self.locale)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// How much is the percentage of the value?
    #[clap(name = "of")]
    Of {
        #[clap(allow_hyphen_values = true)]
        percentage: Percentage,

        #[clap(allow_hyphen_values = true)]
        value: Operand,

        /// Do not round the percentage for integer values.
        #[clap(long)]
        exact: bool,
    },

    /// Which percentage is the value of the total?
    #[clap(name = "from")]
    From {
        #[clap(allow_hyphen_values = true)]
        value: Operand,

        #[clap(allow_hyphen_values = true)]
        total: Operand,
    },

    /// Relative change between the two values.
    #[clap(name = "change")]
    Change {
        #[clap(allow_hyphen_values = true)]
        from: Operand,

        #[clap(allow_hyphen_values = true)]
        to: Operand,
    },

    /// Value before it got increased by the percentage.
    #[clap(name = "before-increase")]
    BeforeIncrease {
        #[clap(allow_hyphen_values = true)]
        percentage: Percentage,

        #[clap(allow_hyphen_values = true)]
        final_value: Operand,
    },

    /// Value before it got decreased by the percentage.
    #[clap(name = "before-decrease")]
    BeforeDecrease {
        #[clap(allow_hyphen_values = true)]
        percentage: Percentage,

        #[clap(allow_hyphen_values = true)]
        final_value: Operand,
    },

    /// The value is the percentage of what?
    #[clap(name = "is-percent-of")]
    IsPercentOf {
        #[clap(allow_hyphen_values = true)]
        percentage: Percentage,

        #[clap(allow_hyphen_values = true)]
        value: Operand,
    },

    /// Increase the value by the percentage.
    #[clap(name = "increase")]
    Increase {
        #[clap(allow_hyphen_values = true)]
        value: Operand,

        #[clap(allow_hyphen_values = true)]
        percentage: Percentage,
    },

    /// Decrease the value by the percentage.
    #[clap(name = "decrease")]
    Decrease {
        #[clap(allow_hyphen_values = true)]
        value: Operand,

        #[clap(allow_hyphen_values = true)]
        percentage: Percentage,
    },

    /// Clamp the percentage.
    #[clap(name = "clamp")]
    Clamp {
        #[clap(allow_hyphen_values = true)]
        percentage: Percentage,

        #[clap(long, default_value = "0%", allow_hyphen_values = true)]
        min: Percentage,

        #[clap(long, default_value = "100%", allow_hyphen_values = true)]
        max: Percentage,
    },

    /// Format the percentage.
    #[clap(name = "format")]
    Format {
        #[clap(allow_hyphen_values = true)]
        percentage: Percentage,
    },

    /// Random percentage within the inclusive range.
    #[clap(name = "random")]
    Random {
        #[clap(allow_hyphen_values = true)]
        low: Percentage,

        #[clap(allow_hyphen_values = true)]
        high: Percentage,
    },
}

impl Command {
    /// Execute the command and return the line to print.
    #[instrument(skip_all, fields(locale = %format.locale))]
    pub fn run(self, format: FormatArgs) -> Result<String> {
        let output = match self {
            Self::Of { percentage, value: Operand::Integer(value), exact: false } => percentage
                .checked_of(value)
                .with_context(|| format!("{percentage:?} of {value} does not fit an integer"))?
                .to_string(),
            Self::Of { percentage, value, exact: _ } => {
                percentage.of_exact(value.to_f64()).to_string()
            }
            Self::From { value, total } => {
                format.format(Percentage::from_ratio(value.to_f64(), total.to_f64()))
            }
            Self::Change { from, to } => {
                format.format(Percentage::change(from.to_f64(), to.to_f64()))
            }
            Self::BeforeIncrease { percentage, final_value } => {
                percentage.original_value_before_increase(final_value.to_f64()).to_string()
            }
            Self::BeforeDecrease { percentage, final_value } => {
                percentage.original_value_before_decrease(final_value.to_f64()).to_string()
            }
            Self::IsPercentOf { percentage, value } => {
                percentage.is_percent_of(value.to_f64()).to_string()
            }
            Self::Increase { value, percentage } => match value {
                Operand::Integer(value) => value
                    .checked_increased_by(percentage)
                    .with_context(|| {
                        format!("{value} increased by {percentage:?} does not fit an integer")
                    })?
                    .to_string(),
                Operand::Float(value) => value.increased_by(percentage).to_string(),
            },
            Self::Decrease { value, percentage } => match value {
                Operand::Integer(value) => value
                    .checked_decreased_by(percentage)
                    .with_context(|| {
                        format!("{value} decreased by {percentage:?} does not fit an integer")
                    })?
                    .to_string(),
                Operand::Float(value) => value.decreased_by(percentage).to_string(),
            },
            Self::Clamp { percentage, min, max } => {
                ensure!(min <= max, "the minimum {min:?} exceeds the maximum {max:?}");
                format.format(percentage.clamped(min..=max))
            }
            Self::Format { percentage } => format.format(percentage),
            Self::Random { low, high } => {
                ensure!(
                    low.raw_value().is_finite() && high.raw_value().is_finite(),
                    "the range {low:?}..={high:?} must have finite bounds",
                );
                ensure!(low <= high, "the range {low:?}..={high:?} is empty");
                format.format(Percentage::random(low..=high))
            }
        };
        debug!(%output, "done");
        Ok(output)
    }
}

/// Plain number on the command line, keeping integers apart so that they take the integer paths.
#[derive(Copy, Clone, Debug)]
pub enum Operand {
    Integer(i64),
    Float(f64),
}

impl Operand {
    #[allow(clippy::cast_precision_loss)]
    const fn to_f64(self) -> f64 {
        match self {
            Self::Integer(value) => value as f64,
            Self::Float(value) => value,
        }
    }
}

impl FromStr for Operand {
    type Err = percentage::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if let Ok(value) = trimmed.parse() {
            return Ok(Self::Integer(value));
        }
        trimmed
            .parse()
            .map(Self::Float)
            .map_err(|_| percentage::Error::ParseOperand { input: input.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(arguments: &[&str]) -> Result<String> {
        let args = Args::try_parse_from(["percentage"].iter().chain(arguments).copied())?;
        args.command.run(args.format)
    }

    #[test]
    fn test_parse_operand() {
        assert!(matches!("42".parse::<Operand>(), Ok(Operand::Integer(42))));
        assert!(matches!("-7".parse::<Operand>(), Ok(Operand::Integer(-7))));
        assert!(matches!("42.5".parse::<Operand>(), Ok(Operand::Float(value)) if value == 42.5));
        assert!("forty-two".parse::<Operand>().is_err());
    }

    #[test]
    fn test_of() -> Result {
        assert_eq!(run(&["of", "50%", "201"])?, "100");
        assert_eq!(run(&["of", "50%", "201", "--exact"])?, "100.5");
        assert_eq!(run(&["of", "50", "250.5"])?, "125.25");
        assert_eq!(run(&["of", "50%", "9223372036854775807"])?, "4611686018427387903");
        Ok(())
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        assert!(run(&["of", "300%", "9223372036854775807"]).is_err());
        assert!(run(&["increase", "9223372036854775807", "1%"]).is_err());
        assert!(run(&["increase", "-9223372036854775808", "1%"]).is_err());
        assert!(run(&["of", "nan", "100"]).is_err());
    }

    #[test]
    fn test_from_and_change() -> Result {
        assert_eq!(run(&["from", "100", "200"])?, "50.00%");
        assert_eq!(run(&["from", "42", "0"])?, "0.00%");
        assert_eq!(run(&["change", "100", "150", "--decimal-places", "0"])?, "50%");
        assert_eq!(run(&["change", "150", "100", "--decimal-places", "1"])?, "-33.3%");
        Ok(())
    }

    #[test]
    fn test_inversions() -> Result {
        assert_eq!(run(&["before-increase", "50%", "150"])?, "100");
        assert_eq!(run(&["before-decrease", "100%", "42"])?, "inf");
        assert_eq!(run(&["is-percent-of", "50%", "50"])?, "100");
        Ok(())
    }

    #[test]
    fn test_increase_decrease() -> Result {
        assert_eq!(run(&["increase", "100", "20%"])?, "120");
        assert_eq!(run(&["decrease", "50.5", "50%"])?, "25.25");
        assert_eq!(run(&["increase", "100", "-20%"])?, "80");
        Ok(())
    }

    #[test]
    fn test_clamp_and_format() -> Result {
        assert_eq!(run(&["clamp", "150%"])?, "100.00%");
        assert_eq!(run(&["clamp", "-5", "--min", "-2%", "--max", "2%"])?, "-2.00%");
        assert!(run(&["clamp", "5", "--min", "10%", "--max", "2%"]).is_err());
        assert_eq!(
            run(&["format", "50.5", "--locale", "fr_FR", "--decimal-places", "1"])?,
            "50,5\u{202f}%",
        );
        Ok(())
    }

    #[test]
    fn test_random() -> Result {
        let output = run(&["random", "10%", "20%", "--decimal-places", "0"])?;
        let value: Percentage = output.parse()?;
        assert!((Percentage::new(10)..=Percentage::new(20)).contains(&value));
        assert!(run(&["random", "20%", "10%"]).is_err());
        assert!(run(&["random", "10%", "inf"]).is_err());
        assert!(run(&["random", "nan", "nan"]).is_err());
        Ok(())
    }

    #[test]
    fn test_unknown_locale() {
        assert!(run(&["format", "50", "--locale", "xx"]).is_err());
    }
}
