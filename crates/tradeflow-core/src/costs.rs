use polars::prelude::*;

use crate::coerce::{numeric_column, parse_field};
use crate::columns;

pub const DEFAULT_FX_RATE_USD_INR: f64 = 83.0;

/// Numeric inputs of one shipment after coercion. Value, duty and quantity fall back to
/// zero; the USD unit price stays absent when it does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostInputs {
    pub total_value_inr: f64,
    pub duty_paid_inr: f64,
    pub quantity: f64,
    pub unit_price_usd: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostFeatures {
    pub grand_total_inr: f64,
    pub landed_cost_per_unit_inr: Option<f64>,
    pub duty_pct_of_value: Option<f64>,
    pub unit_price_usd_to_inr: Option<f64>,
}

impl CostInputs {
    pub fn from_text(
        total_value_inr: Option<&str>,
        duty_paid_inr: Option<&str>,
        quantity: Option<&str>,
        unit_price_usd: Option<&str>,
    ) -> Self {
        Self {
            total_value_inr: parse_field(total_value_inr),
            duty_paid_inr: parse_field(duty_paid_inr),
            quantity: parse_field(quantity),
            unit_price_usd: parse_field(unit_price_usd),
        }
    }

    /// Reads the cost inputs of every row. Missing columns coerce like empty cells.
    pub fn from_frame(df: &DataFrame) -> PolarsResult<Vec<Self>> {
        let total: Vec<f64> = numeric_column(df, columns::TOTAL_VALUE_INR)?;
        let duty: Vec<f64> = numeric_column(df, columns::DUTY_PAID_INR)?;
        let quantity: Vec<f64> = numeric_column(df, columns::QUANTITY)?;
        let price: Vec<Option<f64>> = numeric_column(df, columns::UNIT_PRICE_USD)?;

        Ok((0..df.height())
            .map(|idx| Self {
                total_value_inr: total[idx],
                duty_paid_inr: duty[idx],
                quantity: quantity[idx],
                unit_price_usd: price[idx],
            })
            .collect())
    }

    pub fn compute(&self, fx_rate: f64) -> CostFeatures {
        let grand_total_inr = self.total_value_inr + self.duty_paid_inr;

        CostFeatures {
            grand_total_inr,
            landed_cost_per_unit_inr: guarded_ratio(grand_total_inr, self.quantity),
            duty_pct_of_value: guarded_ratio(self.duty_paid_inr, self.total_value_inr),
            unit_price_usd_to_inr: self.unit_price_usd.map(|usd| usd * fx_rate),
        }
    }
}

/// `numerator / divisor` for a strictly positive divisor, otherwise undefined.
fn guarded_ratio(numerator: f64, divisor: f64) -> Option<f64> {
    if divisor > 0.0 {
        Some(numerator / divisor)
    } else {
        None
    }
}
