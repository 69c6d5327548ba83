use regex::Regex;

use crate::entities::Category;

/// Keyword rules, checked in order. Text is lowercased with punctuation
/// replaced by spaces before matching.
const RULES: [(Category, &str); 5] = [
    (
        Category::Casino,
        r"casino|gaming|club royale|slot|table game|poker|blackjack|roulette|craps",
    ),
    (
        Category::Beverage,
        r"beverage|\bbar\b|cafe|starbucks|coconut|drink|wine|cocktail|beer|soda|coffee",
    ),
    (
        Category::Dining,
        r"dining|restaurant|izumi|hooked|chef|room service|food|steakhouse|sushi|specialty",
    ),
    (Category::Spa, r"\bspa\b|salon|vitality|massage|fitness"),
    (
        Category::Retail,
        r"retail|shop|solera|duty|boutique|photo|jewel|effy",
    ),
];

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect()
}

fn classify_text(text: &str) -> Option<Category> {
    let normalized = normalize(text);
    if normalized.trim().is_empty() {
        return None;
    }
    RULES.iter().find_map(|(category, pattern)| {
        Regex::new(pattern)
            .expect("hardcoded regex should be valid")
            .is_match(&normalized)
            .then_some(*category)
    })
}

/// Assigns a category from a line description, falling back to the
/// document's own category label (ex. "GAMING", "SPECIALTY_DINING"), then to
/// `Other`.
pub(crate) fn classify(description: &str, category_hint: Option<&str>) -> Category {
    classify_text(description)
        .or_else(|| category_hint.and_then(classify_text))
        .unwrap_or(Category::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptions_are_classified_by_keyword() {
        assert_eq!(classify("Club Royale Entertainment Games", None), Category::Casino);
        assert_eq!(classify("CASINO-SLOTS", None), Category::Casino);
        assert_eq!(classify("Bolero's Bar", None), Category::Beverage);
        assert_eq!(classify("Izumi Hibachi", None), Category::Dining);
        assert_eq!(classify("Vitality Spa - massage", None), Category::Spa);
        assert_eq!(classify("Effy jewelry", None), Category::Retail);
    }

    #[test]
    fn casino_wins_over_later_rules() {
        assert_eq!(classify("Casino bar tab", None), Category::Casino);
    }

    #[test]
    fn bar_needs_a_word_boundary() {
        assert_eq!(classify("Barbecue night", None), Category::Other);
        assert_eq!(classify("Spanish lesson", None), Category::Other);
    }

    #[test]
    fn category_hint_is_the_fallback() {
        assert_eq!(classify("Item 2231", Some("SPECIALTY_DINING")), Category::Dining);
        assert_eq!(classify("Item 2231", Some("GAMING")), Category::Casino);
        assert_eq!(classify("Starbucks", Some("GAMING")), Category::Beverage);
    }

    #[test]
    fn misses_fall_back_to_other() {
        assert_eq!(classify("Shore excursion", Some("EXCURSIONS")), Category::Other);
        assert_eq!(classify("", None), Category::Other);
    }
}
