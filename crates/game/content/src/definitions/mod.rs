//! Content definitions loaded into [`DefinitionRegistry`](game_core::DefinitionRegistry)s.
mod actor;
mod component;
mod item;

pub use actor::{ActorTypeDefinition, BoundsComponent, DEFAULT_HALF_EXTENT, StatsComponent};
pub use component::{CustomComponents, DefinitionComponent};
pub use item::{
    ConsumableComponent, ItemDefinition, StackComponent, ValueComponent, WeaponComponent,
};
