//! Asset categories, tile sizes and the per-trigger request

use std::str::FromStr;

use crate::error::AssetError;

/// Kind of RPG map tile to generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum AssetCategory {
    #[default]
    Grassland,
    Forest,
    Mountain,
    /// Snow-capped peak, taller than `Mountain`
    TallMountain,
    River,
    Ocean,
    Castle,
    Town,
}

impl AssetCategory {
    /// All categories in selector order
    pub fn all() -> &'static [Self] {
        &[
            Self::Grassland,
            Self::Forest,
            Self::Mountain,
            Self::TallMountain,
            Self::River,
            Self::Ocean,
            Self::Castle,
            Self::Town,
        ]
    }

    /// Human readable name shown in the selector
    pub fn label(&self) -> &'static str {
        match self {
            Self::Grassland => "Grassland",
            Self::Forest => "Forest",
            Self::Mountain => "Mountain",
            Self::TallMountain => "Tall Mountain",
            Self::River => "River",
            Self::Ocean => "Ocean",
            Self::Castle => "Castle",
            Self::Town => "Town",
        }
    }

    /// Name used inside download file names
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Grassland => "grassland",
            Self::Forest => "forest",
            Self::Mountain => "mountain",
            Self::TallMountain => "tall-mountain",
            Self::River => "river",
            Self::Ocean => "ocean",
            Self::Castle => "castle",
            Self::Town => "town",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Grassland => "Open green field",
            Self::Forest => "Dense trees",
            Self::Mountain => "Rocky hills",
            Self::TallMountain => "Snow-capped peak",
            Self::River => "Flowing blue water",
            Self::Ocean => "Deep open sea",
            Self::Castle => "Grey stone fortress",
            Self::Town => "Cluster of houses",
        }
    }

    /// Step to the next (or previous) category, wrapping around.
    pub fn cycle(self, forward: bool) -> Self {
        cycle_in(Self::all(), self, forward)
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for AssetCategory {
    type Err = AssetError;

    /// Accepts either the slug or the label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '_'], "-");
        Self::all()
            .iter()
            .copied()
            .find(|c| c.slug() == wanted)
            .ok_or_else(|| AssetError::UnknownCategory(s.to_string()))
    }
}

/// Edge length of the square output tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PixelSize {
    #[default]
    Px16,
    Px32,
    Px64,
}

impl PixelSize {
    pub fn all() -> &'static [Self] {
        &[Self::Px16, Self::Px32, Self::Px64]
    }

    pub fn pixels(&self) -> u32 {
        match self {
            Self::Px16 => 16,
            Self::Px32 => 32,
            Self::Px64 => 64,
        }
    }

    pub fn from_pixels(n: u32) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.pixels() == n)
    }

    pub fn cycle(self, forward: bool) -> Self {
        cycle_in(Self::all(), self, forward)
    }
}

impl std::fmt::Display for PixelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = self.pixels();
        write!(f, "{}x{}", n, n)
    }
}

/// One press of the Generate action: what to draw and how big.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub category: AssetCategory,
    pub size: PixelSize,
}

impl GenerationRequest {
    pub fn new(category: AssetCategory, size: PixelSize) -> Self {
        Self { category, size }
    }
}

fn cycle_in<T: Copy + PartialEq>(items: &[T], current: T, forward: bool) -> T {
    let current_idx = items.iter().position(|&i| i == current).unwrap_or(0);
    let new_idx = if forward {
        (current_idx + 1) % items.len()
    } else {
        (current_idx + items.len() - 1) % items.len()
    };
    items[new_idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_categories_with_unique_slugs() {
        let all = AssetCategory::all();
        assert_eq!(all.len(), 8);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.slug(), b.slug());
            }
        }
    }

    #[test]
    fn test_parse_category_from_slug_and_label() {
        assert_eq!("castle".parse::<AssetCategory>().unwrap(), AssetCategory::Castle);
        assert_eq!("Tall Mountain".parse::<AssetCategory>().unwrap(), AssetCategory::TallMountain);
        assert_eq!("tall_mountain".parse::<AssetCategory>().unwrap(), AssetCategory::TallMountain);
        assert_eq!(" OCEAN ".parse::<AssetCategory>().unwrap(), AssetCategory::Ocean);
    }

    #[test]
    fn test_parse_unknown_category_fails() {
        let err = "volcano".parse::<AssetCategory>().unwrap_err();
        assert!(matches!(err, AssetError::UnknownCategory(ref s) if s == "volcano"));
    }

    #[test]
    fn test_category_cycle_wraps() {
        assert_eq!(AssetCategory::Town.cycle(true), AssetCategory::Grassland);
        assert_eq!(AssetCategory::Grassland.cycle(false), AssetCategory::Town);
        assert_eq!(AssetCategory::Mountain.cycle(true), AssetCategory::TallMountain);
    }

    #[test]
    fn test_pixel_sizes() {
        let sizes: Vec<u32> = PixelSize::all().iter().map(|s| s.pixels()).collect();
        assert_eq!(sizes, vec![16, 32, 64]);
        assert_eq!(PixelSize::from_pixels(32), Some(PixelSize::Px32));
        assert_eq!(PixelSize::from_pixels(48), None);
        assert_eq!(PixelSize::Px64.to_string(), "64x64");
        assert_eq!(PixelSize::Px64.cycle(true), PixelSize::Px16);
    }
}
