use game_core::{
    CodecError, DataCollection, DataOwner, ReadSummary, SaveVersion, StateReader, StateWriter,
    TypeResolver,
};

/// Writes `[hasData: bool]` followed, if set, by the collection's frames.
///
/// Owners with nothing worth saving cost a single byte. Returns the number of
/// entry frames written.
pub fn write_owner_state<O: DataOwner>(
    data: &DataCollection<O>,
    writer: &mut StateWriter,
) -> usize {
    if !data.should_save_state() {
        writer.write_bool(false);
        return 0;
    }
    writer.write_bool(true);
    data.write_state(writer)
}

/// Reads what [`write_owner_state`] wrote. Returns `None` if the owner had no data.
pub fn read_owner_state<O, R>(
    data: &mut DataCollection<O>,
    resolver: &R,
    reader: &mut StateReader<'_>,
    version: &SaveVersion,
) -> Result<Option<ReadSummary>, CodecError>
where
    O: DataOwner,
    R: TypeResolver + ?Sized,
{
    if !reader.read_bool()? {
        return Ok(None);
    }
    data.read_state(resolver, reader, version).map(Some)
}
