//! Static building catalog: footprint sizes, territory rules, caps, labels.

use bevy::prelude::*;

/// Broad grouping of building types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum BuildingCategory {
    /// A member's city.
    Player,
    /// Alliance structures that can be moved around.
    Relocatable,
    /// Fixed map features.
    Obstacle,
}

/// How a building type interacts with alliance territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum TerritoryRule {
    /// Projects a square zone `radius` cells beyond its footprint edge. Must sit
    /// inside existing territory unless no territory exists yet.
    Produces { radius: i32 },
    /// Footprint must lie inside territory.
    Required,
    /// Can be placed anywhere.
    Exempt,
}

/// Kind of free-text label carried by instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum LabelField {
    PlayerName,
    Note,
}

impl LabelField {
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::PlayerName => "Player name",
            Self::Note => "Note",
        }
    }
}

/// A placeable building type.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct BuildingType {
    pub id: String,
    pub name: String,
    /// Footprint edge length in cells.
    pub size: i32,
    pub color: Color,
    /// Short glyph drawn on the footprint.
    pub icon: String,
    pub category: BuildingCategory,
    pub max_count: Option<usize>,
    pub territory: TerritoryRule,
    pub label_field: Option<LabelField>,
}

impl BuildingType {
    #[must_use]
    pub fn new(id: &str, name: &str, size: i32, category: BuildingCategory) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            size: size.max(1),
            color: Color::srgb(0.6, 0.6, 0.6),
            icon: String::new(),
            category,
            max_count: None,
            territory: TerritoryRule::Exempt,
            label_field: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    #[must_use]
    pub const fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    #[must_use]
    pub const fn with_territory(mut self, territory: TerritoryRule) -> Self {
        self.territory = territory;
        self
    }

    #[must_use]
    pub const fn with_label(mut self, label_field: LabelField) -> Self {
        self.label_field = Some(label_field);
        self
    }

    /// Territory radius if this type projects a zone.
    #[must_use]
    pub const fn territory_radius(&self) -> Option<i32> {
        match self.territory {
            TerritoryRule::Produces { radius } => Some(radius),
            TerritoryRule::Required | TerritoryRule::Exempt => None,
        }
    }

    #[must_use]
    pub const fn is_labelable(&self) -> bool {
        self.label_field.is_some()
    }
}

/// Ordered catalog of building types, immutable for a session.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct BuildingCatalog {
    types: Vec<BuildingType>,
}

impl BuildingCatalog {
    /// Builds a catalog. Later duplicates of an id are dropped.
    #[must_use]
    pub fn new(types: impl IntoIterator<Item = BuildingType>) -> Self {
        let mut unique: Vec<BuildingType> = Vec::new();
        for ty in types {
            if unique.iter().any(|existing| existing.id == ty.id) {
                warn!("duplicate building type `{}` ignored", ty.id);
                continue;
            }
            unique.push(ty);
        }
        Self { types: unique }
    }

    /// Alliance base catalog used by the standalone designer.
    #[must_use]
    pub fn alliance_defaults() -> Self {
        use BuildingCategory::{Obstacle, Player, Relocatable};

        Self::new([
            BuildingType::new("hq", "Alliance HQ", 3, Relocatable)
                .with_color(Color::srgb(0.85, 0.65, 0.1))
                .with_icon("HQ")
                .with_max_count(1)
                .with_territory(TerritoryRule::Produces { radius: 12 }),
            BuildingType::new("banner", "Alliance Banner", 1, Relocatable)
                .with_color(Color::srgb(0.25, 0.45, 0.9))
                .with_icon("B")
                .with_max_count(30)
                .with_territory(TerritoryRule::Produces { radius: 6 }),
            BuildingType::new("city", "Player City", 2, Player)
                .with_color(Color::srgb(0.2, 0.7, 0.35))
                .with_icon("C")
                .with_territory(TerritoryRule::Required)
                .with_label(LabelField::PlayerName),
            BuildingType::new("trap", "Bear Trap", 3, Relocatable)
                .with_color(Color::srgb(0.7, 0.25, 0.2))
                .with_icon("T")
                .with_max_count(2)
                .with_territory(TerritoryRule::Required)
                .with_label(LabelField::Note),
            BuildingType::new("rock", "Rock", 2, Obstacle)
                .with_color(Color::srgb(0.4, 0.4, 0.42))
                .with_icon("R"),
        ])
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BuildingType> {
        self.types.iter().find(|ty| ty.id == id)
    }

    /// Type at `index` in catalog order (used for numbered tool hotkeys).
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&BuildingType> {
        self.types.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuildingType> {
        self.types.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
