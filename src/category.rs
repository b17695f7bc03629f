//! Keyword-based query categorization.
//!
//! Each category carries a fixed bilingual keyword set; the lowercased
//! question is tested for substring containment in a fixed iteration order
//! and the first match wins. Unmatched questions are `general`.

use crate::model::Category;

/// Keyword table, in priority order.
const KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::PestDisease,
        &["കീടങ്ങൾ", "രോഗം", "കീട", "pest", "disease", "insect", "bug"],
    ),
    (
        Category::Nutrition,
        &["പോഷക", "വളം", "nutrition", "fertilizer", "manure"],
    ),
    (
        Category::Irrigation,
        &["വെള്ളം", "നനയ്ക്കൽ", "water", "irrigation", "watering"],
    ),
    (
        Category::Weather,
        &["കാലാവസ്ഥ", "മഴ", "weather", "rain", "climate"],
    ),
    (Category::Seeds, &["വിത്ത്", "seed", "variety", "സീഡ്"]),
    (
        Category::Harvest,
        &["വിളവെടുപ്പ്", "harvest", "yield", "വിളവ്"],
    ),
];

/// Assign a topical category to `question`.
pub fn categorize(question: &str) -> Category {
    let lowered = question.to_lowercase();

    for (category, keywords) in KEYWORDS {
        if keywords.iter().any(|keyword| lowered.contains(keyword)) {
            return *category;
        }
    }

    Category::General
}
