use game_core::{CodecError, StateReader, StateWriter};
use tracing::debug;

/// Outcome of [`read_regions`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegionSummary {
    pub loaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Writes `[count: i32]` then one `{ id; i32 length; body }` region per child.
///
/// A child whose body fails is rolled back and left out of the count.
pub fn write_regions<'a, T, I, F>(writer: &mut StateWriter, children: I, mut body: F) -> usize
where
    I: IntoIterator<Item = (&'a str, T)>,
    F: FnMut(T, &mut StateWriter) -> Result<(), CodecError>,
{
    let count_slot = writer.reserve_i32();
    let mut written = 0usize;
    for (id, child) in children {
        match writer.write_frame::<CodecError, _>(id, |w| body(child, w)) {
            Ok(()) => written += 1,
            Err(error) => debug!(
                target: "persistence",
                region = id,
                %error,
                "failed to write region, omitting it"
            ),
        }
    }
    writer.patch_i32(count_slot, i32::try_from(written).unwrap_or(i32::MAX));
    written
}

/// Reads regions written by [`write_regions`].
///
/// `body` receives each region's id and a reader bounded to its payload, and
/// returns `Ok(false)` if it does not know the id. Unknown and failing regions
/// are skipped without affecting their siblings.
pub fn read_regions<F>(
    reader: &mut StateReader<'_>,
    mut body: F,
) -> Result<RegionSummary, CodecError>
where
    F: FnMut(&str, &mut StateReader<'_>) -> Result<bool, CodecError>,
{
    let count = reader.read_len()?;
    let mut summary = RegionSummary::default();
    for _ in 0..count {
        let mut frame = reader.read_frame()?;
        match body(&frame.name, &mut frame.payload) {
            Ok(true) => summary.loaded += 1,
            Ok(false) => {
                debug!(
                    target: "persistence",
                    region = %frame.name,
                    skipped_bytes = frame.payload_len(),
                    "unknown region, skipping"
                );
                summary.skipped += 1;
            }
            Err(error) => {
                debug!(
                    target: "persistence",
                    region = %frame.name,
                    %error,
                    "failed to read region, skipping"
                );
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_and_broken_regions_are_isolated() {
        let mut writer = StateWriter::new();
        let children = [("a", 1u32), ("ghost", 2), ("b", 3)];
        let written = write_regions(&mut writer, children, |value, w| {
            w.write_u32(value);
            Ok(())
        });
        assert_eq!(written, 3);
        writer.write_u8(0xEE);
        let bytes = writer.into_bytes();

        let mut seen = Vec::new();
        let mut reader = StateReader::new(&bytes);
        let summary = read_regions(&mut reader, |id, payload| match id {
            "ghost" => Ok(false),
            // Over-reads its region; must not disturb "b".
            "a" => payload.read_u64().map(|_| true),
            _ => {
                seen.push((id.to_owned(), payload.read_u32()?));
                Ok(true)
            }
        })
        .unwrap();

        assert_eq!(
            summary,
            RegionSummary {
                loaded: 1,
                skipped: 1,
                failed: 1
            }
        );
        assert_eq!(seen, vec![("b".to_owned(), 3)]);
        assert_eq!(reader.read_u8().unwrap(), 0xEE);
    }

    #[test]
    fn failing_child_is_rolled_back() {
        let mut writer = StateWriter::new();
        let written = write_regions(&mut writer, [("ok", true), ("bad", false)], |ok, w| {
            w.write_bool(ok);
            if ok { Ok(()) } else { Err(CodecError::malformed("nope")) }
        });
        assert_eq!(written, 1);

        let bytes = writer.into_bytes();
        let summary = read_regions(&mut StateReader::new(&bytes), |_, _| Ok(true)).unwrap();
        assert_eq!(summary.loaded, 1);
    }
}
