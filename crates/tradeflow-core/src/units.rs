use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Free-text spellings and the canonical unit code each maps to. Canonical codes map to
/// themselves so normalizing twice is a no-op.
pub const UNIT_ALIASES: &[(&str, &str)] = &[
    ("PCS", "PCS"),
    ("PC", "PCS"),
    ("NOS", "PCS"),
    ("PIECES", "PCS"),
    ("PIECE", "PCS"),
    ("PCS.", "PCS"),
    ("NOS.", "PCS"),
    ("KG", "KG"),
    ("KGS", "KG"),
    ("KILOGRAM", "KG"),
    ("MT", "MT"),
    ("MTS", "MT"),
    ("TON", "MT"),
    ("TONNE", "MT"),
];

static UNIT_LOOKUP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| UNIT_ALIASES.iter().copied().collect());

/// Trims and uppercases a unit string, then maps known aliases to their canonical code.
/// Unknown units pass through uppercased. Absent input stays absent.
pub fn normalize_unit(raw: Option<&str>) -> Option<String> {
    let upper = raw?.trim().to_uppercase();
    match UNIT_LOOKUP.get(upper.as_str()) {
        Some(canonical) => Some((*canonical).to_string()),
        None => Some(upper),
    }
}

pub fn is_canonical(unit: &str) -> bool {
    UNIT_ALIASES.iter().any(|(_, canonical)| *canonical == unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_to_canonical_codes() {
        assert_eq!(normalize_unit(Some("Nos.")).as_deref(), Some("PCS"));
        assert_eq!(normalize_unit(Some(" pieces ")).as_deref(), Some("PCS"));
        assert_eq!(normalize_unit(Some("kgs")).as_deref(), Some("KG"));
        assert_eq!(normalize_unit(Some("Tonne")).as_deref(), Some("MT"));
    }

    #[test]
    fn unknown_units_pass_through_uppercased() {
        assert_eq!(normalize_unit(Some("ltr")).as_deref(), Some("LTR"));
        assert_eq!(normalize_unit(Some("  sq mtr ")).as_deref(), Some("SQ MTR"));
        assert_eq!(normalize_unit(Some("")).as_deref(), Some(""));
    }

    #[test]
    fn absent_stays_absent() {
        assert_eq!(normalize_unit(None), None);
    }

    #[test]
    fn normalizing_twice_is_a_no_op() {
        let samples = [
            "pcs", "PC", "nos.", "Pieces", "kilogram", "KGS", "mts", "ton", "ltr", " box ",
            "Nos", "", "set.",
        ];
        for sample in samples {
            let once = normalize_unit(Some(sample));
            let twice = normalize_unit(once.as_deref());
            assert_eq!(once, twice, "unit {sample:?} is not idempotent");
        }
    }

    #[test]
    fn canonical_codes_are_fixed_points() {
        for (_, canonical) in UNIT_ALIASES {
            assert!(is_canonical(canonical));
            assert_eq!(normalize_unit(Some(canonical)).as_deref(), Some(*canonical));
        }
        assert!(!is_canonical("LTR"));
    }
}
