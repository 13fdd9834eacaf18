use game_core::{DataCollection, ReadSummary, SaveVersion, StateReader, StateWriter, TypeResolver};

use super::owner::{read_owner_state, write_owner_state};
use super::snapshot::{read_header, write_header};
use crate::repository::Result;
use crate::session::ActorOwner;

/// Encoded data of one player, as stored by a
/// [`PlayerRepository`](crate::repository::PlayerRepository).
///
/// ```text
/// [magic "MPLR"][format: u32][game version: string][actor owner state]
/// ```
pub struct PlayerRecord;

impl PlayerRecord {
    pub const MAGIC: [u8; 4] = *b"MPLR";

    pub fn encode(data: &DataCollection<ActorOwner>, version: &SaveVersion) -> Result<Vec<u8>> {
        let mut writer = StateWriter::new();
        write_header(&mut writer, Self::MAGIC, version)?;
        write_owner_state(data, &mut writer);
        Ok(writer.into_bytes())
    }

    pub fn decode_into<R>(
        bytes: &[u8],
        data: &mut DataCollection<ActorOwner>,
        resolver: &R,
    ) -> Result<Option<ReadSummary>>
    where
        R: TypeResolver + ?Sized,
    {
        let mut reader = StateReader::new(bytes);
        let version = read_header(&mut reader, Self::MAGIC)?;
        Ok(read_owner_state(data, resolver, &mut reader, &version)?)
    }
}
