use game_core::{ReadSummary, SaveVersion, StateReader, StateWriter, TypeResolver};
use tracing::debug;

use super::owner::{read_owner_state, write_owner_state};
use super::regions::{RegionSummary, read_regions, write_regions};
use crate::repository::{RepositoryError, Result};
use crate::session::GameSession;

/// Leading bytes of a session save file.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"MSAV";

/// Outcome of [`SessionSnapshot::decode_into`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotSummary {
    /// Versions recorded by the build that wrote the save.
    pub version: SaveVersion,
    pub session: Option<ReadSummary>,
    pub worlds: RegionSummary,
}

/// Whole-session save: session data plus every world's data.
///
/// ```text
/// [magic "MSAV"][format: u32][game version: string]
/// [session owner state]
/// [world count: i32] { world name; length; world owner state }*
/// ```
pub struct SessionSnapshot;

impl SessionSnapshot {
    pub fn encode(session: &GameSession, version: &SaveVersion) -> Result<Vec<u8>> {
        let mut writer = StateWriter::new();
        write_header(&mut writer, SNAPSHOT_MAGIC, version)?;
        write_owner_state(&session.data, &mut writer);

        let worlds = session
            .worlds()
            .filter(|world| world.data.should_save_state())
            .map(|world| (world.name(), world));
        let written = write_regions(&mut writer, worlds, |world, w| {
            write_owner_state(&world.data, w);
            Ok(())
        });

        debug!(
            target: "persistence",
            worlds = written,
            bytes = writer.position(),
            "encoded session snapshot"
        );
        Ok(writer.into_bytes())
    }

    /// Restores `bytes` into `session`, creating worlds named in the save.
    pub fn decode_into<R>(
        bytes: &[u8],
        session: &mut GameSession,
        resolver: &R,
    ) -> Result<SnapshotSummary>
    where
        R: TypeResolver + ?Sized,
    {
        let mut reader = StateReader::new(bytes);
        let version = read_header(&mut reader, SNAPSHOT_MAGIC)?;

        let session_summary = read_owner_state(&mut session.data, resolver, &mut reader, &version)?;
        let worlds = read_regions(&mut reader, |name, payload| {
            let world = session.create_world(name);
            read_owner_state(&mut world.data, resolver, payload, &version)?;
            Ok(true)
        })?;

        if !reader.is_empty() {
            debug!(
                target: "persistence",
                trailing = reader.remaining(),
                "ignoring trailing bytes after snapshot"
            );
        }

        Ok(SnapshotSummary {
            version,
            session: session_summary,
            worlds,
        })
    }
}

pub(crate) fn write_header(
    writer: &mut StateWriter,
    magic: [u8; 4],
    version: &SaveVersion,
) -> Result<()> {
    writer.write_bytes(&magic);
    writer.write_u32(version.format_version);
    writer.write_str(&version.game_version)?;
    Ok(())
}

pub(crate) fn read_header(reader: &mut StateReader<'_>, magic: [u8; 4]) -> Result<SaveVersion> {
    let found = reader.read_bytes(magic.len().min(reader.remaining()))?;
    if found != magic {
        return Err(RepositoryError::BadMagic {
            found: found.to_vec(),
        });
    }

    let format_version = reader.read_u32()?;
    if format_version > SaveVersion::CURRENT_FORMAT {
        return Err(RepositoryError::UnsupportedFormat {
            found: format_version,
            supported: SaveVersion::CURRENT_FORMAT,
        });
    }
    let game_version = reader.read_string()?;
    Ok(SaveVersion::new(game_version, format_version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session_round_trips() {
        let session = GameSession::new();
        let bytes = SessionSnapshot::encode(&session, &SaveVersion::current("1.2.3")).unwrap();
        assert_eq!(&bytes[..4], b"MSAV");

        let mut restored = GameSession::new();
        let summary =
            SessionSnapshot::decode_into(&bytes, &mut restored, &game_core::DataTypeTable::new())
                .unwrap();
        assert_eq!(summary.version.game_version, "1.2.3");
        assert_eq!(summary.session, None);
        assert_eq!(summary.worlds, RegionSummary::default());
    }

    #[test]
    fn rejects_foreign_files_and_future_formats() {
        let mut session = GameSession::new();
        let table = game_core::DataTypeTable::new();

        let err =
            SessionSnapshot::decode_into(b"PK\x03\x04junk", &mut session, &table).unwrap_err();
        assert!(matches!(err, RepositoryError::BadMagic { .. }));

        let err = SessionSnapshot::decode_into(b"MS", &mut session, &table).unwrap_err();
        assert!(matches!(err, RepositoryError::BadMagic { .. }));

        let mut writer = StateWriter::new();
        write_header(&mut writer, SNAPSHOT_MAGIC, &SaveVersion::new("9.0.0", 99)).unwrap();
        let err =
            SessionSnapshot::decode_into(writer.as_bytes(), &mut session, &table).unwrap_err();
        assert!(matches!(err, RepositoryError::UnsupportedFormat { found: 99, .. }));
    }
}
