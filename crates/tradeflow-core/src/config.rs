use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::costs::DEFAULT_FX_RATE_USD_INR;
use crate::error::{PipelineError, Result};

/// Settings for the feature stage. Built once per run and never mutated afterwards.
///
/// ```toml
/// fx_rate = 83.0
/// aux_text_column = "HSN DESCRIPTION"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureConfig {
    /// INR per USD used for `unit_price_usd_to_inr`.
    pub fx_rate: f64,
    /// Column holding auxiliary text (HSN description) for classification.
    /// Classification sees empty aux text when unset or when the column is absent.
    pub aux_text_column: Option<String>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            fx_rate: DEFAULT_FX_RATE_USD_INR,
            aux_text_column: None,
        }
    }
}

impl FeatureConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: FeatureConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fx_rate.is_finite() || self.fx_rate <= 0.0 {
            return Err(PipelineError::Config(format!(
                "fx_rate must be a positive number, got {}",
                self.fx_rate
            )));
        }
        if let Some(column) = &self.aux_text_column {
            if column.trim().is_empty() {
                return Err(PipelineError::Config(
                    "aux_text_column must not be blank".to_string(),
                ));
            }
        }
        Ok(())
    }
}
