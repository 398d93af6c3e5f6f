#![doc = include_str!("../README.md")]

pub mod error;
pub mod fmt;
mod number;
mod percentage;

pub use self::{
    error::{Error, Result},
    fmt::{Locale, LocaleFormatter, PercentFormatter},
    number::{Number, PercentageExt},
    percentage::Percentage,
};
