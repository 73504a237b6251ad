//! Mapping of free-text product types onto the closed category set.

use common::ProductCategory;

use super::OrderError;

/// Every accepted spelling, lower-case and trimmed, with its category.
const SYNONYMS: &[(&str, ProductCategory)] = &[
    ("tacos", ProductCategory::Tacos),
    ("taco", ProductCategory::Tacos),
    ("panini", ProductCategory::Panini),
    ("paninis", ProductCategory::Panini),
    ("bowl", ProductCategory::Bowl),
    ("bowls", ProductCategory::Bowl),
    ("plate", ProductCategory::Plate),
    ("plates", ProductCategory::Plate),
    ("assiette", ProductCategory::Plate),
    ("assiettes", ProductCategory::Plate),
    ("burger", ProductCategory::Burger),
    ("burgers", ProductCategory::Burger),
    ("texmex", ProductCategory::Texmex),
    ("tex mex", ProductCategory::Texmex),
    ("tex max", ProductCategory::Texmex),
    ("tex-max", ProductCategory::Texmex),
    ("tex-mex", ProductCategory::Texmex),
    ("sandwich", ProductCategory::Sandwich),
    ("sandwiches", ProductCategory::Sandwich),
    ("sandwichs", ProductCategory::Sandwich),
    ("drink", ProductCategory::Drink),
    ("drinks", ProductCategory::Drink),
    ("boisson", ProductCategory::Drink),
    ("boissons", ProductCategory::Drink),
    ("dessert", ProductCategory::Dessert),
    ("desserts", ProductCategory::Dessert),
    ("side", ProductCategory::Side),
    ("sides", ProductCategory::Side),
    ("accompagnement", ProductCategory::Side),
    ("accompagnements", ProductCategory::Side),
    ("kids menu", ProductCategory::KidsMenu),
    ("kids-menu", ProductCategory::KidsMenu),
    ("kids_menu", ProductCategory::KidsMenu),
    ("menu enfant", ProductCategory::KidsMenu),
    ("menu-enfant", ProductCategory::KidsMenu),
    ("menu_enfant", ProductCategory::KidsMenu),
    ("salad", ProductCategory::Salad),
    ("salads", ProductCategory::Salad),
    ("salade", ProductCategory::Salad),
    ("salades", ProductCategory::Salad),
];

/// Resolves a declared product type to its category.
///
/// The input is trimmed and lower-cased before lookup. Anything outside the
/// synonym table is rejected rather than defaulted.
pub fn resolve_category(declared: Option<&str>) -> Result<ProductCategory, OrderError> {
    let declared = declared.ok_or(OrderError::MissingCategory)?;
    let key = declared.trim().to_lowercase();

    SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, category)| *category)
        .ok_or_else(|| OrderError::UnknownCategory {
            value: declared.to_string(),
        })
}

/// Returns the accepted spellings of a category.
pub fn synonyms_of(category: ProductCategory) -> impl Iterator<Item = &'static str> {
    SYNONYMS
        .iter()
        .filter(move |(_, c)| *c == category)
        .map(|(synonym, _)| *synonym)
}
