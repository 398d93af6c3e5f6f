//! Percentage formatting.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use thousands::{Separable, SeparatorPolicy, digits, policies};

use crate::error::Error;

/// Locale-aware percentage formatter.
///
/// Implementations receive the fraction (0.5 for 50%) and return [`None`] when they cannot render it,
/// in which case [`crate::Percentage::formatted_with`] falls back to `%g`.
pub trait PercentFormatter {
    fn format(&self, fraction: f64, decimal_places: usize, locale: Locale) -> Option<String>;
}

/// Built-in formatter backed by the [`Locale`] conventions.
///
/// Rounding is the correctly rounded decimal conversion of the standard library, which resolves
/// exact ties to even. Non-finite values are not supported.
#[derive(Copy, Clone, Debug, Default)]
pub struct LocaleFormatter;

impl PercentFormatter for LocaleFormatter {
    fn format(&self, fraction: f64, decimal_places: usize, locale: Locale) -> Option<String> {
        if !fraction.is_finite() {
            return None;
        }
        let conventions = locale.conventions();
        let percent = fraction * 100.0;
        let digits = format!("{:.*}", decimal_places, percent.abs());
        let (integer, decimals) = digits.split_once('.').unwrap_or((&digits, ""));

        let mut number = group(integer, conventions.grouping, conventions.min_grouping_digits);
        if !decimals.is_empty() {
            number.push(conventions.decimal_separator);
            number.push_str(decimals);
        }

        let is_negative = percent < 0.0 && digits.bytes().any(|byte| matches!(byte, b'1'..=b'9'));
        let sign = if is_negative { "-" } else { "" };
        Some(match conventions.percent_sign {
            PercentSign::Prefix(separator) => format!("{sign}%{separator}{number}"),
            PercentSign::Suffix(separator) => format!("{sign}{number}{separator}%"),
        })
    }
}

/// Group the integer digits unless there are too few of them.
fn group(integer: &str, policy: &SeparatorPolicy<'_>, min_grouping_digits: usize) -> String {
    if integer.len() < 3 + min_grouping_digits {
        return integer.to_owned();
    }
    integer.separate_by_policy(*policy)
}

/// C-like `%g`: six significant digits, trailing zeros removed, scientific notation for exponents
/// below -4 or from 6 on.
#[must_use]
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { "inf" } else { "-inf" }.to_owned();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }

    let scientific = format!("{value:.5e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if (-4..6).contains(&exponent) {
        let decimal_places = usize::try_from(5 - exponent).unwrap_or_default();
        trim_fraction_zeros(&format!("{value:.decimal_places$}")).to_owned()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction_zeros(mantissa), exponent.unsigned_abs())
    }
}

fn trim_fraction_zeros(number: &str) -> &str {
    if number.contains('.') { number.trim_end_matches('0').trim_end_matches('.') } else { number }
}

/// Supported locales.
///
/// Conventions follow the CLDR percent patterns of the corresponding languages and regions.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Locale {
    #[default]
    EnUs,
    EnGb,
    FrFr,
    DeDe,
    DeCh,
    EsEs,
    ItIt,
    NlNl,
    PtBr,
    RuRu,
    JaJp,
    TrTr,
}

#[derive(Copy, Clone)]
enum PercentSign {
    Prefix(&'static str),
    Suffix(&'static str),
}

#[derive(Copy, Clone)]
struct Conventions {
    decimal_separator: char,
    grouping: &'static SeparatorPolicy<'static>,
    /// Minimal number of digits in the leading group before any grouping kicks in.
    min_grouping_digits: usize,
    percent_sign: PercentSign,
}

const fn every_three_digits(separator: &'static str) -> SeparatorPolicy<'static> {
    SeparatorPolicy { separator, groups: &[3], digits: digits::ASCII_DECIMAL }
}

const NO_BREAK_SPACE: SeparatorPolicy<'static> = every_three_digits("\u{a0}");
const NARROW_NO_BREAK_SPACE: SeparatorPolicy<'static> = every_three_digits("\u{202f}");
const APOSTROPHE: SeparatorPolicy<'static> = every_three_digits("’");

impl Locale {
    pub const ALL: [Self; 12] = [
        Self::EnUs,
        Self::EnGb,
        Self::FrFr,
        Self::DeDe,
        Self::DeCh,
        Self::EsEs,
        Self::ItIt,
        Self::NlNl,
        Self::PtBr,
        Self::RuRu,
        Self::JaJp,
        Self::TrTr,
    ];

    /// BCP 47 language tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EnGb => "en-GB",
            Self::FrFr => "fr-FR",
            Self::DeDe => "de-DE",
            Self::DeCh => "de-CH",
            Self::EsEs => "es-ES",
            Self::ItIt => "it-IT",
            Self::NlNl => "nl-NL",
            Self::PtBr => "pt-BR",
            Self::RuRu => "ru-RU",
            Self::JaJp => "ja-JP",
            Self::TrTr => "tr-TR",
        }
    }

    fn conventions(self) -> Conventions {
        const fn conventions(
            decimal_separator: char,
            grouping: &'static SeparatorPolicy<'static>,
            percent_sign: PercentSign,
        ) -> Conventions {
            Conventions { decimal_separator, grouping, min_grouping_digits: 1, percent_sign }
        }

        match self {
            Self::EnUs | Self::EnGb | Self::JaJp => {
                conventions('.', &policies::COMMA_SEPARATOR, PercentSign::Suffix(""))
            }
            Self::FrFr => conventions(',', &NARROW_NO_BREAK_SPACE, PercentSign::Suffix("\u{202f}")),
            Self::DeDe => conventions(',', &policies::DOT_SEPARATOR, PercentSign::Suffix("\u{a0}")),
            Self::DeCh => conventions('.', &APOSTROPHE, PercentSign::Suffix("")),
            Self::EsEs => Conventions {
                min_grouping_digits: 2,
                ..conventions(',', &policies::DOT_SEPARATOR, PercentSign::Suffix("\u{a0}"))
            },
            Self::ItIt | Self::NlNl | Self::PtBr => {
                conventions(',', &policies::DOT_SEPARATOR, PercentSign::Suffix(""))
            }
            Self::RuRu => conventions(',', &NO_BREAK_SPACE, PercentSign::Suffix("\u{a0}")),
            Self::TrTr => conventions(',', &policies::DOT_SEPARATOR, PercentSign::Prefix("")),
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = Error;

    /// Parse `en-US`, `en_US`, or a bare language like `fr`, case-insensitively.
    fn from_str(identifier: &str) -> Result<Self, Self::Err> {
        let normalized = identifier.trim().replace('_', "-");
        if let Some(locale) =
            Self::ALL.into_iter().find(|locale| locale.tag().eq_ignore_ascii_case(&normalized))
        {
            return Ok(locale);
        }
        let language_default = match normalized.to_ascii_lowercase().as_str() {
            "en" => Some(Self::EnUs),
            "fr" => Some(Self::FrFr),
            "de" => Some(Self::DeDe),
            "es" => Some(Self::EsEs),
            "it" => Some(Self::ItIt),
            "nl" => Some(Self::NlNl),
            "pt" => Some(Self::PtBr),
            "ru" => Some(Self::RuRu),
            "ja" => Some(Self::JaJp),
            "tr" => Some(Self::TrTr),
            _ => None,
        };
        language_default.ok_or_else(|| Error::UnknownLocale(identifier.to_owned()))
    }
}
