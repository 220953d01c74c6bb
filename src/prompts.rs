//! Fixed prompt text sent to the image model for each tile category

use crate::asset::AssetCategory;
use crate::error::{AssetError, Result};

static PROMPTS: &[(AssetCategory, &str)] = &[
    (
        AssetCategory::Grassland,
        "16x16 pixel art of a green grassland tile for RPG, top-down view, simple",
    ),
    (
        AssetCategory::Forest,
        "16x16 pixel art of a forest tile with trees for RPG, top-down view, simple",
    ),
    (
        AssetCategory::Mountain,
        "16x16 pixel art of a mountain tile for RPG, top-down view, simple",
    ),
    (
        AssetCategory::TallMountain,
        "16x16 pixel art of a tall snow-capped mountain tile for RPG, top-down view, simple",
    ),
    (
        AssetCategory::River,
        "16x16 pixel art of a river tile for RPG, top-down view, simple blue water",
    ),
    (
        AssetCategory::Ocean,
        "16x16 pixel art of an ocean tile for RPG, top-down view, simple blue water",
    ),
    (
        AssetCategory::Castle,
        "16x16 pixel art of a castle tile for RPG, top-down view, simple grey structure",
    ),
    (
        AssetCategory::Town,
        "16x16 pixel art of a town tile for RPG, top-down view, simple houses",
    ),
];

/// Look up the prompt for a category.
pub fn prompt_for(category: AssetCategory) -> Result<&'static str> {
    lookup(PROMPTS, category)
}

/// Parse a category name and look up its prompt.
pub fn prompt_for_label(label: &str) -> Result<&'static str> {
    prompt_for(label.parse()?)
}

fn lookup(table: &[(AssetCategory, &'static str)], category: AssetCategory) -> Result<&'static str> {
    table
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, prompt)| *prompt)
        .ok_or_else(|| AssetError::UnknownCategory(category.slug().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_a_prompt() {
        for &category in AssetCategory::all() {
            let prompt = prompt_for(category).unwrap();
            assert!(!prompt.trim().is_empty(), "{} has an empty prompt", category);
            assert!(prompt.contains("pixel art"));
        }
    }

    #[test]
    fn test_exactly_one_prompt_per_category() {
        assert_eq!(PROMPTS.len(), AssetCategory::all().len());
        for &category in AssetCategory::all() {
            let count = PROMPTS.iter().filter(|(c, _)| *c == category).count();
            assert_eq!(count, 1, "{} appears {} times", category, count);
        }
    }

    #[test]
    fn test_castle_prompt_text() {
        assert_eq!(
            prompt_for(AssetCategory::Castle).unwrap(),
            "16x16 pixel art of a castle tile for RPG, top-down view, simple grey structure"
        );
    }

    #[test]
    fn test_unknown_label_is_an_error() {
        assert!(matches!(
            prompt_for_label("dungeon"),
            Err(AssetError::UnknownCategory(_))
        ));
        assert!(prompt_for_label("river").is_ok());
    }

    #[test]
    fn test_category_missing_from_table_is_an_error() {
        let partial = &PROMPTS[..2];
        assert!(lookup(partial, AssetCategory::Forest).is_ok());
        assert!(matches!(
            lookup(partial, AssetCategory::Town),
            Err(AssetError::UnknownCategory(ref s)) if s == "town"
        ));
    }
}
