use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Glass,
    Wooden,
    Steel,
    Plastic,
    Polyhouse,
    Ceramic,
    Others,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Glass,
        Category::Wooden,
        Category::Steel,
        Category::Plastic,
        Category::Polyhouse,
        Category::Ceramic,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Glass => "Glass",
            Category::Wooden => "Wooden",
            Category::Steel => "Steel",
            Category::Plastic => "Plastic",
            Category::Polyhouse => "Polyhouse",
            Category::Ceramic => "Ceramic",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown category '{value}'"))
    }
}

/// Keyword table in priority order. The first category with any keyword contained in the
/// uppercased text wins, so a description mentioning both glass and steel is `Glass`.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Glass, &["GLASS", "BOROSILICATE", "OPAL"]),
    (Category::Wooden, &["WOOD", "WOODEN"]),
    (Category::Steel, &["STEEL", "STAINLESS", "SS"]),
    (Category::Plastic, &["PLASTIC", "PVC"]),
    (Category::Polyhouse, &["POLYHOUSE"]),
    (Category::Ceramic, &["CERAMIC"]),
];

/// Classifies a goods description, optionally with auxiliary text such as an HSN
/// description. Keywords match as plain substrings, so "SS" also hits words like "BRASS".
pub fn classify(description: Option<&str>, aux_text: Option<&str>) -> Category {
    let text = format!(
        "{} {}",
        description.unwrap_or_default(),
        aux_text.unwrap_or_default()
    )
    .to_uppercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Others)
}
