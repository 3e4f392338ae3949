use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::category::{classify, Category};
use crate::coerce::text_column;
use crate::columns;
use crate::config::FeatureConfig;
use crate::costs::{CostFeatures, CostInputs};
use crate::units::{is_canonical, normalize_unit};

/// The fields of one shipment the feature stage reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipmentRecord<'a> {
    pub costs: CostInputs,
    pub unit_raw: Option<&'a str>,
    pub goods_description: Option<&'a str>,
    pub aux_text: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentFeatures {
    pub costs: CostFeatures,
    pub unit_standardized: Option<String>,
    pub category: Category,
}

impl ShipmentRecord<'_> {
    pub fn derive(&self, config: &FeatureConfig) -> ShipmentFeatures {
        let costs = self.costs.compute(config.fx_rate);
        let unit_standardized = normalize_unit(self.unit_raw);
        let category = classify(self.goods_description, self.aux_text);

        ShipmentFeatures {
            costs,
            unit_standardized,
            category,
        }
    }
}

/// Derives features for each record independently. Output order and length match the input.
pub fn run(records: &[ShipmentRecord<'_>], config: &FeatureConfig) -> Vec<ShipmentFeatures> {
    records.iter().map(|record| record.derive(config)).collect()
}

/// Reads the shipment fields of every row. Absent columns read as absent cells.
pub fn records_from_frame<'a>(
    df: &'a DataFrame,
    config: &FeatureConfig,
) -> PolarsResult<Vec<ShipmentRecord<'a>>> {
    let costs = CostInputs::from_frame(df)?;
    let units = text_column(df, columns::UNIT)?;
    let descriptions = text_column(df, columns::GOODS_DESCRIPTION)?;
    let aux = match config.aux_text_column.as_deref() {
        Some(name) => text_column(df, name)?,
        None => vec![None; df.height()],
    };

    Ok(costs
        .into_iter()
        .zip(units)
        .zip(descriptions)
        .zip(aux)
        .map(
            |(((costs, unit_raw), goods_description), aux_text)| ShipmentRecord {
                costs,
                unit_raw,
                goods_description,
                aux_text,
            },
        )
        .collect())
}

/// Returns a copy of `df` with the six feature columns appended. Input columns are left
/// untouched; feature columns from an earlier run are replaced.
pub fn apply_features(df: &DataFrame, config: &FeatureConfig) -> PolarsResult<DataFrame> {
    derive_features(df, config).map(|(frame, _)| frame)
}

/// Like [`apply_features`], also returning the summary of the derived rows.
pub fn derive_features(
    df: &DataFrame,
    config: &FeatureConfig,
) -> PolarsResult<(DataFrame, FeatureSummary)> {
    let records = records_from_frame(df, config)?;
    let features = run(&records, config);

    let summary = FeatureSummary::from_features(&features);
    info!(
        rows = summary.rows,
        undefined_landed_cost = summary.undefined_landed_cost,
        undefined_duty_pct = summary.undefined_duty_pct,
        unrecognized_units = summary.unrecognized_units,
        "Derived shipment features"
    );

    let mut output = df.clone();
    for column in feature_columns(&features) {
        output.with_column(column)?;
    }
    Ok((output, summary))
}

fn feature_columns(features: &[ShipmentFeatures]) -> Vec<Series> {
    let len = features.len();
    let mut grand_total = Vec::with_capacity(len);
    let mut unit = Vec::with_capacity(len);
    let mut landed = Vec::with_capacity(len);
    let mut category = Vec::with_capacity(len);
    let mut duty_pct = Vec::with_capacity(len);
    let mut price_inr = Vec::with_capacity(len);

    for row in features {
        grand_total.push(row.costs.grand_total_inr);
        unit.push(row.unit_standardized.as_deref());
        landed.push(row.costs.landed_cost_per_unit_inr);
        category.push(row.category.as_str());
        duty_pct.push(row.costs.duty_pct_of_value);
        price_inr.push(row.costs.unit_price_usd_to_inr);
    }

    vec![
        Series::new(columns::GRAND_TOTAL_INR.into(), grand_total),
        Series::new(columns::UNIT_STANDARDIZED.into(), unit),
        Series::new(columns::LANDED_COST_PER_UNIT_INR.into(), landed),
        Series::new(columns::CATEGORY.into(), category),
        Series::new(columns::DUTY_PCT_OF_VALUE.into(), duty_pct),
        Series::new(columns::UNIT_PRICE_USD_TO_INR.into(), price_inr),
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureSummary {
    pub rows: usize,
    pub undefined_landed_cost: usize,
    pub undefined_duty_pct: usize,
    pub missing_units: usize,
    pub unrecognized_units: usize,
    pub categories: BTreeMap<String, usize>,
}

impl FeatureSummary {
    pub fn from_features(features: &[ShipmentFeatures]) -> Self {
        let mut summary = FeatureSummary {
            rows: features.len(),
            ..Default::default()
        };

        for row in features {
            if row.costs.landed_cost_per_unit_inr.is_none() {
                summary.undefined_landed_cost += 1;
            }
            if row.costs.duty_pct_of_value.is_none() {
                summary.undefined_duty_pct += 1;
            }
            match row.unit_standardized.as_deref() {
                None => summary.missing_units += 1,
                Some(unit) if !is_canonical(unit) => summary.unrecognized_units += 1,
                Some(_) => {}
            }
            *summary
                .categories
                .entry(row.category.as_str().to_string())
                .or_default() += 1;
        }

        summary
    }
}
