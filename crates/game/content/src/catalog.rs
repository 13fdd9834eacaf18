use game_core::DefinitionRegistry;

use crate::definitions::{ActorTypeDefinition, ItemDefinition};

/// Every definition registry of a session.
#[derive(Debug)]
pub struct ContentCatalog {
    pub items: DefinitionRegistry<ItemDefinition>,
    pub actor_types: DefinitionRegistry<ActorTypeDefinition>,
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self {
            items: DefinitionRegistry::new("items"),
            actor_types: DefinitionRegistry::new("actor_types"),
        }
    }
}

impl Default for ContentCatalog {
    fn default() -> Self {
        Self::new()
    }
}
