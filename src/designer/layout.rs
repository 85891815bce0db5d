//! Placement and collision engine: owns the placed buildings and enforces bounds,
//! overlap, per-type caps, and territory containment.

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::GRID_SIZE;
use super::catalog::{BuildingCatalog, BuildingType, TerritoryRule};

/// Stable identifier of a placed building. Survives moves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect,
)]
#[serde(transparent)]
pub struct BuildingId(pub u64);

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A building instance on the grid. `x, y` is the southwest-most cell of the
/// footprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBuilding {
    pub id: BuildingId,
    pub type_id: String,
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PlacedBuilding {
    #[must_use]
    pub const fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }
}

/// Axis-aligned block of cells, `[min, min + size)` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub min: IVec2,
    pub size: i32,
}

impl Footprint {
    #[must_use]
    pub const fn new(min: IVec2, size: i32) -> Self {
        Self { min, size }
    }

    /// Exclusive upper corner.
    #[must_use]
    pub fn max(&self) -> IVec2 {
        self.min.saturating_add(IVec2::splat(self.size))
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x
            && other.min.x < a_max.x
            && self.min.y < b_max.y
            && other.min.y < a_max.y
    }

    #[must_use]
    pub fn contains_cell(&self, cell: IVec2) -> bool {
        let max = self.max();
        cell.x >= self.min.x && cell.x < max.x && cell.y >= self.min.y && cell.y < max.y
    }

    #[must_use]
    pub const fn within_grid(&self) -> bool {
        let last = GRID_SIZE - self.size;
        self.min.x >= 0 && self.min.y >= 0 && self.min.x <= last && self.min.y <= last
    }

    /// The four corner cells (inclusive).
    #[must_use]
    pub fn corner_cells(&self) -> [IVec2; 4] {
        let far = self.size - 1;
        [
            self.min,
            self.min + IVec2::new(far, 0),
            self.min + IVec2::new(far, far),
            self.min + IVec2::new(0, far),
        ]
    }

    /// Footprint center in fractional cell coordinates.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.min.as_vec2() + Vec2::splat(self.size as f32 / 2.0)
    }
}

/// Square region of influence around a territory-producing building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerritoryZone {
    pub source: BuildingId,
    /// Inclusive lower cell.
    pub min: IVec2,
    /// Inclusive upper cell.
    pub max: IVec2,
}

impl TerritoryZone {
    /// Zone centered on the footprint with half-width `radius + (size - 1) / 2`.
    #[must_use]
    pub fn around(source: BuildingId, footprint: Footprint, radius: i32) -> Self {
        Self {
            source,
            min: footprint.min - IVec2::splat(radius),
            max: footprint.max() - IVec2::ONE + IVec2::splat(radius),
        }
    }

    #[must_use]
    pub const fn contains(&self, cell: IVec2) -> bool {
        cell.x >= self.min.x && cell.x <= self.max.x && cell.y >= self.min.y && cell.y <= self.max.y
    }
}

/// Why a placement or move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("unknown building type `{0}`")]
    UnknownType(String),

    #[error("unknown building {0}")]
    UnknownBuilding(BuildingId),

    #[error("footprint leaves the grid")]
    OutOfBounds,

    #[error("footprint overlaps building {0}")]
    Overlap(BuildingId),

    #[error("limit of {limit} `{type_id}` reached")]
    LimitReached { type_id: String, limit: usize },

    #[error("footprint is outside alliance territory")]
    OutsideTerritory,
}

/// Errors reading or writing a persisted layout.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid layout json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read layout: {0}")]
    Io(#[from] std::io::Error),
}

/// The placed-building collection plus the catalog it is validated against.
///
/// All mutation goes through [`place`](Self::place), [`move_building`](Self::move_building),
/// [`remove`](Self::remove) and [`set_label`](Self::set_label); each either applies
/// completely or leaves the layout untouched.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct BaseLayout {
    catalog: BuildingCatalog,
    buildings: Vec<PlacedBuilding>,
    next_id: u64,
}

impl Default for BaseLayout {
    fn default() -> Self {
        Self::new(BuildingCatalog::default())
    }
}

impl BaseLayout {
    #[must_use]
    pub const fn new(catalog: BuildingCatalog) -> Self {
        Self {
            catalog,
            buildings: Vec::new(),
            next_id: 1,
        }
    }

    /// Seeds a layout from persisted records. Each record is re-validated in
    /// order against type, bounds, overlap and cap; records that fail are
    /// skipped. Territory is not re-checked: a saved layout may hold buildings
    /// whose producer was removed or moved away.
    #[must_use]
    pub fn seeded(
        catalog: BuildingCatalog,
        records: impl IntoIterator<Item = PlacedBuilding>,
    ) -> Self {
        let mut layout = Self::new(catalog);
        for record in records {
            if layout.buildings.iter().any(|b| b.id == record.id) {
                warn!("skipping seeded building {}: duplicate id", record.id);
                continue;
            }
            if let Err(err) = layout.check_occupancy(&record.type_id, record.origin(), None) {
                warn!(
                    "skipping seeded building {} ({}): {err}",
                    record.id, record.type_id
                );
                continue;
            }
            layout.next_id = layout.next_id.max(record.id.0 + 1);
            layout.buildings.push(record);
        }
        layout
    }

    /// Parses a JSON array of [`PlacedBuilding`] records into a seeded layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Json`] if the document is not a record list.
    pub fn from_json(catalog: BuildingCatalog, json: &str) -> Result<Self, LayoutError> {
        let records: Vec<PlacedBuilding> = serde_json::from_str(json)?;
        Ok(Self::seeded(catalog, records))
    }

    /// Reads a JSON layout file.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Io`] if the file cannot be read and
    /// [`LayoutError::Json`] if it does not parse.
    pub fn from_path(
        catalog: BuildingCatalog,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, LayoutError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(catalog, &json)
    }

    /// Serializes the building list for external persistence.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(&self.buildings)?)
    }

    #[must_use]
    pub const fn catalog(&self) -> &BuildingCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn buildings(&self) -> &[PlacedBuilding] {
        &self.buildings
    }

    #[must_use]
    pub fn get(&self, id: BuildingId) -> Option<&PlacedBuilding> {
        self.buildings.iter().find(|b| b.id == id)
    }

    /// Catalog entry for a placed building.
    #[must_use]
    pub fn type_of(&self, building: &PlacedBuilding) -> Option<&BuildingType> {
        self.catalog.get(&building.type_id)
    }

    #[must_use]
    pub fn footprint_of(&self, building: &PlacedBuilding) -> Option<Footprint> {
        self.type_of(building)
            .map(|ty| Footprint::new(building.origin(), ty.size))
    }

    /// Building whose footprint covers `cell`.
    #[must_use]
    pub fn building_at(&self, cell: IVec2) -> Option<&PlacedBuilding> {
        self.buildings.iter().rev().find(|b| {
            self.footprint_of(b)
                .is_some_and(|footprint| footprint.contains_cell(cell))
        })
    }

    #[must_use]
    pub fn count_of(&self, type_id: &str) -> usize {
        self.buildings.iter().filter(|b| b.type_id == type_id).count()
    }

    /// Zones of every territory-producing building, optionally ignoring one.
    #[must_use]
    pub fn territory_zones_excluding(&self, exclude: Option<BuildingId>) -> Vec<TerritoryZone> {
        self.buildings
            .iter()
            .filter(|b| Some(b.id) != exclude)
            .filter_map(|b| {
                let ty = self.type_of(b)?;
                let radius = ty.territory_radius()?;
                let footprint = Footprint::new(b.origin(), ty.size);
                Some(TerritoryZone::around(b.id, footprint, radius))
            })
            .collect()
    }

    #[must_use]
    pub fn territory_zones(&self) -> Vec<TerritoryZone> {
        self.territory_zones_excluding(None)
    }

    /// Validates putting `type_id` with its corner at `origin`, ignoring
    /// `exclude` (the building being moved).
    ///
    /// # Errors
    ///
    /// Returns the first failed check, in order: type, bounds, overlap, cap,
    /// territory.
    pub fn check_placement(
        &self,
        type_id: &str,
        origin: IVec2,
        exclude: Option<BuildingId>,
    ) -> Result<(), PlacementError> {
        let ty = self.check_occupancy(type_id, origin, exclude)?;
        let candidate = Footprint::new(origin, ty.size);

        let zones = self.territory_zones_excluding(exclude);
        let needs_territory = match ty.territory {
            TerritoryRule::Exempt => false,
            TerritoryRule::Required => true,
            // Bootstrap: the first producers may go anywhere.
            TerritoryRule::Produces { .. } => !zones.is_empty(),
        };
        if needs_territory
            && !candidate
                .corner_cells()
                .iter()
                .all(|corner| zones.iter().any(|zone| zone.contains(*corner)))
        {
            return Err(PlacementError::OutsideTerritory);
        }

        Ok(())
    }

    /// Type, bounds, overlap and cap checks, without territory.
    fn check_occupancy(
        &self,
        type_id: &str,
        origin: IVec2,
        exclude: Option<BuildingId>,
    ) -> Result<&BuildingType, PlacementError> {
        let ty = self
            .catalog
            .get(type_id)
            .ok_or_else(|| PlacementError::UnknownType(type_id.to_string()))?;
        let candidate = Footprint::new(origin, ty.size);

        if !candidate.within_grid() {
            return Err(PlacementError::OutOfBounds);
        }

        for other in self.buildings.iter().filter(|b| Some(b.id) != exclude) {
            if self
                .footprint_of(other)
                .is_some_and(|footprint| footprint.intersects(&candidate))
            {
                return Err(PlacementError::Overlap(other.id));
            }
        }

        if let Some(limit) = ty.max_count {
            let live = self
                .buildings
                .iter()
                .filter(|b| b.type_id == ty.id && Some(b.id) != exclude)
                .count();
            if live >= limit {
                return Err(PlacementError::LimitReached {
                    type_id: ty.id.clone(),
                    limit,
                });
            }
        }

        Ok(ty)
    }

    /// Boolean form of [`check_placement`](Self::check_placement).
    #[must_use]
    pub fn can_place(&self, type_id: &str, origin: IVec2, exclude: Option<BuildingId>) -> bool {
        match self.check_placement(type_id, origin, exclude) {
            Ok(()) => true,
            Err(err) => {
                debug!("cannot place `{type_id}` at {origin}: {err}");
                false
            }
        }
    }

    /// Places a new building. Returns `None` if any check fails.
    pub fn place(&mut self, type_id: &str, origin: IVec2) -> Option<PlacedBuilding> {
        if !self.can_place(type_id, origin, None) {
            return None;
        }
        let building = PlacedBuilding {
            id: BuildingId(self.next_id),
            type_id: type_id.to_string(),
            x: origin.x,
            y: origin.y,
            label: None,
        };
        self.next_id += 1;
        self.buildings.push(building.clone());
        info!("placed `{type_id}` {} at {origin}", building.id);
        Some(building)
    }

    /// Moves a building to `origin`. Leaves it in place and returns `false` if the
    /// destination is invalid.
    pub fn move_building(&mut self, id: BuildingId, origin: IVec2) -> bool {
        let Some(type_id) = self.get(id).map(|b| b.type_id.clone()) else {
            debug!("cannot move {id}: {}", PlacementError::UnknownBuilding(id));
            return false;
        };
        if !self.can_place(&type_id, origin, Some(id)) {
            return false;
        }
        if let Some(building) = self.buildings.iter_mut().find(|b| b.id == id) {
            building.x = origin.x;
            building.y = origin.y;
            info!("moved {id} to {origin}");
        }
        true
    }

    /// Deletes a building.
    pub fn remove(&mut self, id: BuildingId) -> Option<PlacedBuilding> {
        let index = self.buildings.iter().position(|b| b.id == id)?;
        let removed = self.buildings.remove(index);
        info!("removed {id} (`{}`)", removed.type_id);
        Some(removed)
    }

    /// Sets or clears the label of a labelable building. Blank labels clear.
    pub fn set_label(&mut self, id: BuildingId, label: Option<String>) -> bool {
        let Some(index) = self.buildings.iter().position(|b| b.id == id) else {
            return false;
        };
        let labelable = self
            .type_of(&self.buildings[index])
            .is_some_and(BuildingType::is_labelable);
        if !labelable {
            return false;
        }
        let label = label
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        info!("label of {id} set to {label:?}");
        self.buildings[index].label = label;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designer::catalog::{BuildingCategory, LabelField};
    use pretty_assertions::assert_eq;

    fn layout() -> BaseLayout {
        BaseLayout::new(BuildingCatalog::alliance_defaults())
    }

    /// Every pair of footprints is disjoint and inside the grid.
    fn assert_invariants(layout: &BaseLayout) {
        let footprints: Vec<_> = layout
            .buildings()
            .iter()
            .map(|b| layout.footprint_of(b).unwrap())
            .collect();
        for (i, a) in footprints.iter().enumerate() {
            assert!(a.within_grid(), "{a:?} leaves the grid");
            for b in &footprints[i + 1..] {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
        for ty in layout.catalog().iter() {
            if let Some(limit) = ty.max_count {
                assert!(layout.count_of(&ty.id) <= limit);
            }
        }
    }

    // --- footprint geometry ---

    #[test]
    fn footprints_touching_edges_do_not_intersect() {
        let a = Footprint::new(IVec2::new(0, 0), 2);
        let b = Footprint::new(IVec2::new(2, 0), 2);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Footprint::new(IVec2::new(1, 1), 2)));
    }

    #[test]
    fn territory_zone_extends_radius_beyond_footprint() {
        let zone = TerritoryZone::around(BuildingId(1), Footprint::new(IVec2::new(10, 10), 3), 4);
        assert_eq!(zone.min, IVec2::new(6, 6));
        assert_eq!(zone.max, IVec2::new(16, 16));
        assert!(zone.contains(IVec2::new(16, 6)));
        assert!(!zone.contains(IVec2::new(17, 6)));
    }

    // --- basic placement ---

    #[test]
    fn second_hq_is_rejected_anywhere() {
        let mut layout = layout();
        assert!(layout.place("hq", IVec2::new(10, 10)).is_some());
        assert!(layout.place("hq", IVec2::new(10, 10)).is_none());
        assert_eq!(
            layout.check_placement("hq", IVec2::new(15, 10), None),
            Err(PlacementError::LimitReached {
                type_id: "hq".to_string(),
                limit: 1
            })
        );
        assert_eq!(layout.count_of("hq"), 1);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut layout = layout();
        let a = layout.place("banner", IVec2::new(100, 100)).unwrap();
        let b = layout.place("banner", IVec2::new(102, 100)).unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let layout = layout();
        assert_eq!(
            layout.check_placement("castle", IVec2::new(1, 1), None),
            Err(PlacementError::UnknownType("castle".to_string()))
        );
        assert!(!layout.can_place("castle", IVec2::new(1, 1), None));
    }

    // --- bounds ---

    #[test]
    fn placement_flush_with_far_edge_is_valid() {
        let layout = layout();
        let corner = IVec2::splat(GRID_SIZE - 3);
        assert!(layout.can_place("hq", corner, None));
        assert_eq!(
            layout.check_placement("hq", IVec2::new(GRID_SIZE - 2, 0), None),
            Err(PlacementError::OutOfBounds)
        );
        assert_eq!(
            layout.check_placement("hq", IVec2::new(-1, 0), None),
            Err(PlacementError::OutOfBounds)
        );
    }

    // --- overlap ---

    #[test]
    fn city_overlapping_banner_is_rejected() {
        let mut layout = layout();
        let banner = layout.place("banner", IVec2::new(5, 5)).unwrap();
        assert_eq!(
            layout.check_placement("city", IVec2::new(4, 4), None),
            Err(PlacementError::Overlap(banner.id))
        );
        assert!(layout.can_place("city", IVec2::new(6, 6), None));
    }

    // --- territory ---

    #[test]
    fn city_needs_territory_even_on_empty_grid() {
        let mut layout = layout();
        assert!(layout.place("city", IVec2::new(50, 50)).is_none());
        assert!(layout.place("banner", IVec2::new(50, 50)).is_some());
        assert!(layout.place("city", IVec2::new(51, 51)).is_some());
        assert_eq!(
            layout.check_placement("city", IVec2::new(500, 500), None),
            Err(PlacementError::OutsideTerritory)
        );
    }

    #[test]
    fn first_producer_bootstraps_then_producers_need_territory() {
        let mut layout = layout();
        assert!(layout.place("banner", IVec2::new(300, 300)).is_some());
        assert!(layout.place("banner", IVec2::new(900, 900)).is_none());
        assert!(layout.place("banner", IVec2::new(306, 300)).is_some());
    }

    #[test]
    fn footprint_corners_must_stay_inside_zone_edges() {
        let mut layout = layout();
        // Zone spans cells 94..=106 on both axes.
        layout.place("banner", IVec2::new(100, 100)).unwrap();
        assert!(layout.can_place("trap", IVec2::new(104, 104), None));
        assert!(!layout.can_place("trap", IVec2::new(105, 104), None));

        // A second banner extends the union eastwards.
        layout.place("banner", IVec2::new(106, 100)).unwrap();
        assert!(layout.can_place("trap", IVec2::new(110, 100), None));
        assert!(!layout.can_place("trap", IVec2::new(111, 100), None));
    }

    #[test]
    fn obstacles_ignore_territory() {
        let layout = layout();
        assert!(layout.can_place("rock", IVec2::new(700, 20), None));
    }

    // --- move ---

    #[test]
    fn move_excludes_self_from_overlap_and_cap() {
        let mut layout = layout();
        let hq = layout.place("hq", IVec2::new(10, 10)).unwrap();
        assert!(layout.move_building(hq.id, IVec2::new(11, 11)));
        assert_eq!(layout.get(hq.id).unwrap().origin(), IVec2::new(11, 11));
    }

    #[test]
    fn failed_move_leaves_building_in_place() {
        let mut layout = layout();
        let a = layout.place("banner", IVec2::new(20, 20)).unwrap();
        let b = layout.place("banner", IVec2::new(22, 20)).unwrap();
        assert!(!layout.move_building(b.id, a.origin()));
        assert_eq!(layout.get(b.id).unwrap().origin(), IVec2::new(22, 20));
        assert!(!layout.move_building(BuildingId(999), IVec2::new(1, 1)));
    }

    #[test]
    fn moving_the_only_producer_is_not_bound_by_its_own_zone() {
        let mut layout = layout();
        let banner = layout.place("banner", IVec2::new(20, 20)).unwrap();
        assert!(layout.move_building(banner.id, IVec2::new(800, 800)));
    }

    // --- remove / label ---

    #[test]
    fn remove_frees_cap_and_cells() {
        let mut layout = layout();
        let hq = layout.place("hq", IVec2::new(10, 10)).unwrap();
        assert_eq!(layout.remove(hq.id).map(|b| b.id), Some(hq.id));
        assert!(layout.remove(hq.id).is_none());
        assert!(layout.place("hq", IVec2::new(10, 10)).is_some());
    }

    #[test]
    fn labels_only_apply_to_labelable_types() {
        let mut layout = layout();
        let banner = layout.place("banner", IVec2::new(40, 40)).unwrap();
        let city = layout.place("city", IVec2::new(42, 42)).unwrap();
        assert!(!layout.set_label(banner.id, Some("x".to_string())));
        assert!(layout.set_label(city.id, Some("  Ragnar ".to_string())));
        assert_eq!(layout.get(city.id).unwrap().label.as_deref(), Some("Ragnar"));
        assert!(layout.set_label(city.id, Some("   ".to_string())));
        assert_eq!(layout.get(city.id).unwrap().label, None);
    }

    #[test]
    fn building_at_hits_whole_footprint() {
        let mut layout = layout();
        let hq = layout.place("hq", IVec2::new(10, 10)).unwrap();
        assert_eq!(
            layout.building_at(IVec2::new(12, 12)).map(|b| b.id),
            Some(hq.id)
        );
        assert!(layout.building_at(IVec2::new(13, 12)).is_none());
    }

    // --- persistence ---

    #[test]
    fn json_round_trip_preserves_records_and_id_allocation() {
        let mut layout = layout();
        layout.place("banner", IVec2::new(60, 60)).unwrap();
        let city = layout.place("city", IVec2::new(61, 61)).unwrap();
        layout.set_label(city.id, Some("Astrid".to_string()));
        let json = layout.to_json().unwrap();
        assert!(json.contains("\"typeId\": \"city\""));

        let mut restored =
            BaseLayout::from_json(BuildingCatalog::alliance_defaults(), &json).unwrap();
        assert_eq!(restored.buildings(), layout.buildings());
        let next = restored.place("banner", IVec2::new(64, 60)).unwrap();
        assert!(next.id > city.id);
    }

    #[test]
    fn seeding_skips_invalid_records() {
        let records = vec![
            PlacedBuilding {
                id: BuildingId(7),
                type_id: "banner".to_string(),
                x: 10,
                y: 10,
                label: None,
            },
            PlacedBuilding {
                id: BuildingId(8),
                type_id: "banner".to_string(),
                x: 10,
                y: 10,
                label: None,
            },
            PlacedBuilding {
                id: BuildingId(9),
                type_id: "ghost".to_string(),
                x: 0,
                y: 0,
                label: None,
            },
        ];
        let layout = BaseLayout::seeded(BuildingCatalog::alliance_defaults(), records);
        assert_eq!(layout.buildings().len(), 1);
        assert_eq!(layout.buildings()[0].id, BuildingId(7));
    }

    #[test]
    fn reload_keeps_buildings_left_outside_territory() {
        let mut layout = layout();
        let banner = layout.place("banner", IVec2::new(60, 60)).unwrap();
        let city = layout.place("city", IVec2::new(61, 61)).unwrap();
        layout.remove(banner.id);
        let json = layout.to_json().unwrap();

        let restored =
            BaseLayout::from_json(BuildingCatalog::alliance_defaults(), &json).unwrap();
        assert_eq!(restored.buildings(), layout.buildings());
        assert_eq!(
            restored.get(city.id).map(PlacedBuilding::origin),
            Some(IVec2::new(61, 61))
        );
    }

    #[test]
    fn extreme_coordinates_are_out_of_bounds() {
        let mut layout = layout();
        assert_eq!(
            layout.check_placement("rock", IVec2::new(i32::MAX, 0), None),
            Err(PlacementError::OutOfBounds)
        );
        assert!(layout.place("rock", IVec2::new(0, i32::MAX)).is_none());
        assert!(layout.place("rock", IVec2::new(GRID_SIZE - 1, 0)).is_none());

        let json = format!(r#"[{{"id":1,"typeId":"rock","x":{},"y":0}}]"#, i32::MAX);
        let restored =
            BaseLayout::from_json(BuildingCatalog::alliance_defaults(), &json).unwrap();
        assert!(restored.buildings().is_empty());
    }

    #[test]
    fn default_layout_allocates_ids_from_one() {
        let mut layout = BaseLayout {
            catalog: BuildingCatalog::alliance_defaults(),
            ..default()
        };
        let rock = layout.place("rock", IVec2::new(5, 5)).unwrap();
        assert_eq!(rock.id, BuildingId(1));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let result = BaseLayout::from_json(BuildingCatalog::alliance_defaults(), "{");
        assert!(matches!(result, Err(LayoutError::Json(_))));
    }

    #[test]
    fn missing_layout_file_is_an_io_error() {
        let result = BaseLayout::from_path(
            BuildingCatalog::alliance_defaults(),
            "does/not/exist/layout.json",
        );
        assert!(matches!(result, Err(LayoutError::Io(_))));
    }

    // --- invariants under a scripted sequence ---

    #[test]
    fn invariants_hold_after_mixed_operations() {
        let mut layout = BaseLayout::new(BuildingCatalog::new([
            BuildingType::new("block", "Block", 3, BuildingCategory::Obstacle).with_max_count(6),
            BuildingType::new("note", "Note", 1, BuildingCategory::Player)
                .with_label(LabelField::Note),
        ]));
        let mut ids = Vec::new();
        for step in 0..60_i32 {
            let origin = IVec2::new((step * 7) % 20 + GRID_SIZE - 22, (step * 3) % 11);
            let ty = if step % 3 == 0 { "note" } else { "block" };
            if let Some(b) = layout.place(ty, origin) {
                ids.push(b.id);
            }
            if let Some(id) = ids.get(step as usize % ids.len().max(1)) {
                layout.move_building(*id, origin + IVec2::new(1, 2));
            }
            assert_invariants(&layout);
        }
        assert!(!ids.is_empty());
    }
}
