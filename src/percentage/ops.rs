//! Operators.
//!
//! Percent-to-percent multiplication and division work on fractions, so 50% × 50% is 25%.
//! Percent-to-scalar operators work on the raw value, so 10% × 3 is 30%.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use ordered_float::OrderedFloat;

use super::Percentage;
use crate::number::Number;

impl Mul<Self> for Percentage {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::from_fraction(self.fraction() * rhs.fraction())
    }
}

impl MulAssign<Self> for Percentage {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Div<Self> for Percentage {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Self::from_fraction(self.fraction() / rhs.fraction())
    }
}

impl DivAssign<Self> for Percentage {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

macro_rules! scalar {
    ($($type_:ty),+ $(,)?) => {
        $(
            scalar!(@binary $type_, Add, add, AddAssign, add_assign, +);
            scalar!(@binary $type_, Sub, sub, SubAssign, sub_assign, -);
            scalar!(@binary $type_, Mul, mul, MulAssign, mul_assign, *);
            scalar!(@binary $type_, Div, div, DivAssign, div_assign, /);

            impl Mul<Percentage> for $type_ {
                type Output = Percentage;

                fn mul(self, rhs: Percentage) -> Self::Output {
                    Percentage(OrderedFloat(self.to_f64() * rhs.raw_value()))
                }
            }
        )+
    };

    (@binary $type_:ty, $trait_:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait_<$type_> for Percentage {
            type Output = Self;

            fn $method(self, rhs: $type_) -> Self::Output {
                Self(OrderedFloat(self.raw_value() $op rhs.to_f64()))
            }
        }

        impl $assign_trait<$type_> for Percentage {
            fn $assign_method(&mut self, rhs: $type_) {
                *self = *self $op rhs;
            }
        }
    };
}

scalar!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
