//! General functions related to finance.
use crate::units::{Dimensionless, Money, MoneyPerYear, Year};

/// Calculates the factor by which a cash flow `years` years in the future is divided to give its
/// present value, i.e. `(1 + discount_rate)^years`.
pub fn discount_factor(discount_rate: Dimensionless, years: u32) -> Dimensionless {
    (Dimensionless(1.0) + discount_rate).powu(years)
}

/// Calculates the present value of a single cash flow received `years` years from now.
pub fn present_value(amount: Money, discount_rate: Dimensionless, years: u32) -> Money {
    amount / discount_factor(discount_rate, years)
}

/// Calculates the value of `present` after compounding at `growth_rate` for `years` years.
pub fn future_value(present: Money, growth_rate: Dimensionless, years: u32) -> Money {
    present * (Dimensionless(1.0) + growth_rate).powu(years)
}

/// Calculates the present value of a payment received at the end of each year for `years` years.
///
/// The sum is accumulated year by year rather than with the closed-form annuity formula, so a
/// zero discount rate needs no special case and a zero horizon gives zero.
pub fn annuity_present_value(
    payment: MoneyPerYear,
    discount_rate: Dimensionless,
    years: u32,
) -> Money {
    let cash_flow = payment * Year(1.0);
    (1..=years)
        .map(|year| present_value(cash_flow, discount_rate, year))
        .sum()
}
