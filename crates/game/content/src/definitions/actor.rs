//! Actor type definitions (NPC archetypes).

use std::path::Path;

use game_core::{Definition, DefinitionError, JsonDefinition, ModuleId, NumId, Vec3};
use serde::{Deserialize, Serialize};

use super::component::{CustomComponents, DefinitionComponent, merge_component, merge_custom};

/// Half extent used for actor types that do not declare a bounds component.
pub const DEFAULT_HALF_EXTENT: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsComponent {
    pub max_health: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_speed() -> f32 {
    1.0
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundsComponent {
    pub half_extents: [f32; 3],
}

#[derive(Debug, Deserialize)]
struct ActorTypeDocument {
    definition: Option<DefinitionComponent>,
    stats: Option<StatsComponent>,
    bounds: Option<BoundsComponent>,
    faction: Option<String>,
    #[serde(default)]
    custom: CustomComponents,
}

/// Catalog entry describing one kind of non-player actor.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorTypeDefinition {
    pub definition: DefinitionComponent,
    pub stats: Option<StatsComponent>,
    pub bounds: Option<BoundsComponent>,
    pub faction: Option<String>,
    pub custom: CustomComponents,
    num_id: NumId,
    source: Option<ModuleId>,
    overrides: Vec<ModuleId>,
}

impl ActorTypeDefinition {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            definition: DefinitionComponent::new(id, display_name),
            stats: None,
            bounds: None,
            faction: None,
            custom: CustomComponents::new(),
            num_id: NumId::default(),
            source: None,
            overrides: Vec::new(),
        }
    }

    pub fn with_stats(mut self, max_health: f32, speed: f32) -> Self {
        self.stats = Some(StatsComponent { max_health, speed });
        self
    }

    pub fn with_bounds(mut self, half_extents: Vec3) -> Self {
        self.bounds = Some(BoundsComponent {
            half_extents: [half_extents.x, half_extents.y, half_extents.z],
        });
        self
    }

    pub fn with_faction(mut self, faction: impl Into<String>) -> Self {
        self.faction = Some(faction.into());
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self, DefinitionError> {
        let doc: ActorTypeDocument = serde_json::from_str(text)?;
        let definition = doc.definition.ok_or(DefinitionError::MissingComponent {
            component: "definition",
        })?;
        if definition.id.trim().is_empty() {
            return Err(DefinitionError::invalid("<empty>", "actor type id must not be empty"));
        }
        let bad_bounds = doc
            .bounds
            .is_some_and(|bounds| bounds.half_extents.iter().any(|extent| !(*extent >= 0.0)));
        if bad_bounds {
            return Err(DefinitionError::invalid(
                definition.id,
                "bounds half extents must be non-negative",
            ));
        }

        Ok(Self {
            definition,
            stats: doc.stats,
            bounds: doc.bounds,
            faction: doc.faction,
            custom: doc.custom,
            num_id: NumId::default(),
            source: None,
            overrides: Vec::new(),
        })
    }

    pub fn half_extents(&self) -> Vec3 {
        match self.bounds {
            Some(BoundsComponent {
                half_extents: [x, y, z],
            }) => Vec3::new(x, y, z),
            None => Vec3::splat(DEFAULT_HALF_EXTENT),
        }
    }

    pub fn source(&self) -> Option<&ModuleId> {
        self.source.as_ref()
    }

    pub fn overrides(&self) -> &[ModuleId] {
        &self.overrides
    }
}

impl Definition for ActorTypeDefinition {
    fn id(&self) -> &str {
        &self.definition.id
    }

    fn num_id(&self) -> NumId {
        self.num_id
    }

    fn set_num_id(&mut self, num_id: NumId) {
        self.num_id = num_id;
    }

    fn on_register(&mut self, source: &ModuleId) {
        self.source = Some(source.clone());
    }

    fn replace_with(&mut self, source: &ModuleId, other: Self) -> Result<(), Self> {
        self.definition.merge(other.definition);
        merge_component(&mut self.stats, other.stats);
        merge_component(&mut self.bounds, other.bounds);
        merge_component(&mut self.faction, other.faction);
        merge_custom(&mut self.custom, other.custom);
        self.overrides.push(source.clone());
        Ok(())
    }
}

impl JsonDefinition for ActorTypeDefinition {
    fn from_json(_source: &ModuleId, _path: &Path, text: &str) -> Result<Self, DefinitionError> {
        Self::from_json_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_default_when_absent() {
        let goblin = ActorTypeDefinition::from_json_str(
            r#"{ "definition": { "id": "goblin" }, "faction": "greenskins" }"#,
        )
        .unwrap();
        assert_eq!(goblin.half_extents(), Vec3::splat(DEFAULT_HALF_EXTENT));
        assert_eq!(goblin.faction.as_deref(), Some("greenskins"));
    }

    #[test]
    fn negative_bounds_are_invalid() {
        let err = ActorTypeDefinition::from_json_str(
            r#"{ "definition": { "id": "blob" }, "bounds": { "half_extents": [1, -1, 1] } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::Invalid { .. }));
    }

    #[test]
    fn merge_keeps_absent_components() {
        let mut troll = ActorTypeDefinition::new("troll", "Troll")
            .with_stats(120.0, 0.8)
            .with_faction("wild");
        let patch = ActorTypeDefinition::new("troll", "Cave Troll").with_bounds(Vec3::splat(1.5));
        troll.replace_with(&ModuleId::new("caves"), patch).unwrap();

        assert_eq!(troll.definition.display_name, "Cave Troll");
        assert_eq!(troll.stats.unwrap().max_health, 120.0);
        assert_eq!(troll.half_extents(), Vec3::splat(1.5));
        assert_eq!(troll.faction.as_deref(), Some("wild"));
    }

    #[test]
    fn override_without_name_keeps_existing_text() {
        let mut wolf = ActorTypeDefinition::new("wolf", "Wolf").with_stats(30.0, 2.0);
        wolf.definition.description = "Hunts in packs.".to_owned();
        let patch = ActorTypeDefinition::from_json_str(
            r#"{ "definition": { "id": "wolf" }, "faction": "forest" }"#,
        )
        .unwrap();
        wolf.replace_with(&ModuleId::new("forest"), patch).unwrap();

        assert_eq!(wolf.definition.display_name, "Wolf");
        assert_eq!(wolf.definition.description, "Hunts in packs.");
        assert_eq!(wolf.faction.as_deref(), Some("forest"));
    }
}
