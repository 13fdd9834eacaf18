//! Item definitions.

use std::path::Path;

use game_core::{Definition, DefinitionError, JsonDefinition, ModuleId, NumId};
use serde::{Deserialize, Serialize};

use super::component::{CustomComponents, DefinitionComponent, merge_component, merge_custom};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackComponent {
    pub max_stack: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponComponent {
    pub damage: f32,
    pub range: f32,
    #[serde(default)]
    pub cooldown_secs: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsumableComponent {
    #[serde(default)]
    pub heal: f32,
    #[serde(default = "default_uses")]
    pub uses: u32,
}

fn default_uses() -> u32 {
    1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueComponent {
    pub base: u32,
}

/// On-disk shape of an item file. Every component is optional so that an
/// override file only needs to carry what it changes.
#[derive(Debug, Deserialize)]
struct ItemDocument {
    definition: Option<DefinitionComponent>,
    stack: Option<StackComponent>,
    weapon: Option<WeaponComponent>,
    consumable: Option<ConsumableComponent>,
    value: Option<ValueComponent>,
    #[serde(default)]
    custom: CustomComponents,
}

/// Catalog entry for one item type.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemDefinition {
    pub definition: DefinitionComponent,
    pub stack: Option<StackComponent>,
    pub weapon: Option<WeaponComponent>,
    pub consumable: Option<ConsumableComponent>,
    pub value: Option<ValueComponent>,
    pub custom: CustomComponents,
    num_id: NumId,
    source: Option<ModuleId>,
    overrides: Vec<ModuleId>,
}

impl ItemDefinition {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            definition: DefinitionComponent::new(id, display_name),
            stack: None,
            weapon: None,
            consumable: None,
            value: None,
            custom: CustomComponents::new(),
            num_id: NumId::default(),
            source: None,
            overrides: Vec::new(),
        }
    }

    pub fn with_stack(mut self, max_stack: u32) -> Self {
        self.stack = Some(StackComponent { max_stack });
        self
    }

    pub fn with_weapon(mut self, damage: f32, range: f32) -> Self {
        self.weapon = Some(WeaponComponent {
            damage,
            range,
            cooldown_secs: 0.0,
        });
        self
    }

    pub fn with_value(mut self, base: u32) -> Self {
        self.value = Some(ValueComponent { base });
        self
    }

    /// Parses an item document.
    pub fn from_json_str(text: &str) -> Result<Self, DefinitionError> {
        let doc: ItemDocument = serde_json::from_str(text)?;
        let definition = doc.definition.ok_or(DefinitionError::MissingComponent {
            component: "definition",
        })?;
        if definition.id.trim().is_empty() {
            return Err(DefinitionError::invalid("<empty>", "item id must not be empty"));
        }

        Ok(Self {
            definition,
            stack: doc.stack,
            weapon: doc.weapon,
            consumable: doc.consumable,
            value: doc.value,
            custom: doc.custom,
            num_id: NumId::default(),
            source: None,
            overrides: Vec::new(),
        })
    }

    /// Maximum stack size; unstackable items stack to one.
    pub fn max_stack(&self) -> u32 {
        self.stack.map_or(1, |stack| stack.max_stack)
    }

    /// Module that registered the definition currently occupying this slot.
    pub fn source(&self) -> Option<&ModuleId> {
        self.source.as_ref()
    }

    /// Modules that merged changes into this definition, in load order.
    pub fn overrides(&self) -> &[ModuleId] {
        &self.overrides
    }
}

impl Definition for ItemDefinition {
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
        merge_component(&mut self.stack, other.stack);
        merge_component(&mut self.weapon, other.weapon);
        merge_component(&mut self.consumable, other.consumable);
        merge_component(&mut self.value, other.value);
        merge_custom(&mut self.custom, other.custom);
        self.overrides.push(source.clone());
        Ok(())
    }
}

impl JsonDefinition for ItemDefinition {
    fn from_json(_source: &ModuleId, _path: &Path, text: &str) -> Result<Self, DefinitionError> {
        Self::from_json_str(text)
    }
}
