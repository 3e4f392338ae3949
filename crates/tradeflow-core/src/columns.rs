//! Dataset headers shared by every stage.

// Raw extract headers.
pub const PORT_CODE: &str = "PORT CODE";
pub const DATE: &str = "DATE";
pub const IEC: &str = "IEC";
pub const HS_CODE: &str = "HS CODE";
pub const GOODS_DESCRIPTION: &str = "GOODS DESCRIPTION";
pub const MASTER_CATEGORY: &str = "Master category";
pub const MODEL_NAME: &str = "Model Name";
pub const MODEL_NUMBER: &str = "Model Number";
pub const CAPACITY: &str = "Capacity";
pub const QTY: &str = "Qty";
pub const UNIT_OF_MEASURE: &str = "Unit of measure";
pub const PRICE: &str = "Price";
pub const UNIT_OF_MEASURE_1: &str = "Unit of measure.1";
pub const QUANTITY: &str = "QUANTITY";
pub const UNIT: &str = "UNIT";
pub const UNIT_PRICE_INR: &str = "UNIT PRICE_INR";
pub const TOTAL_VALUE_INR: &str = "TOTAL VALUE_INR";
pub const UNIT_PRICE_USD: &str = "UNIT PRICE_USD";
pub const TOTAL_VALUE_USD: &str = "TOTAL VALUE_USD";
pub const DUTY_PAID_INR: &str = "DUTY PAID_INR";

// Added by cleaning.
pub const DATE_OF_SHIPMENT: &str = "date_of_shipment";
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";

// Added by the feature stage.
pub const GRAND_TOTAL_INR: &str = "grand_total_inr";
pub const UNIT_STANDARDIZED: &str = "unit_standardized";
pub const LANDED_COST_PER_UNIT_INR: &str = "landed_cost_per_unit_inr";
pub const CATEGORY: &str = "category";
pub const DUTY_PCT_OF_VALUE: &str = "duty_pct_of_value";
pub const UNIT_PRICE_USD_TO_INR: &str = "unit_price_usd_to_inr";

/// Derived columns in the order the feature stage appends them.
pub const FEATURE_COLUMNS: [&str; 6] = [
    GRAND_TOTAL_INR,
    UNIT_STANDARDIZED,
    LANDED_COST_PER_UNIT_INR,
    CATEGORY,
    DUTY_PCT_OF_VALUE,
    UNIT_PRICE_USD_TO_INR,
];
