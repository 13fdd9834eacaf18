//! Binary persistence of owners, nested regions, sessions and players.
//!
//! Every layer reuses the frame format from [`game_core::codec`]: an owner is
//! a `hasData` flag plus its data collection, and containers of owners wrap
//! each child in a `{ id; length; body }` region so unknown children are
//! skipped exactly like unknown data types.

mod owner;
mod player;
mod regions;
mod snapshot;

pub use owner::{read_owner_state, write_owner_state};
pub use player::PlayerRecord;
pub use regions::{RegionSummary, read_regions, write_regions};
pub use snapshot::{SNAPSHOT_MAGIC, SessionSnapshot, SnapshotSummary};
