//! Per-owner bag of typed instance data.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace, warn};

use super::entry::{DataEntry, DataOwner};
use super::types::TypeResolver;
use crate::codec::{CodecError, Result, SaveVersion, StateReader, StateWriter};

struct Slot<O: DataOwner> {
    type_id: TypeId,
    entry: Box<dyn DataEntry<O>>,
}

/// Outcome of [`DataCollection::read_state`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadSummary {
    /// Frames whose entry reader completed.
    pub loaded: usize,
    /// Entries constructed because they were not live yet.
    pub created: usize,
    /// Frames stepped over because their type is unknown or incompatible.
    pub skipped: usize,
    /// Frames whose entry reader returned an error.
    pub failed: usize,
}

/// Heterogeneous instance data attached to one owner.
///
/// Holds at most one entry per concrete type, kept in stable priority order
/// (lower first, insertion order among equals). Lookups by type are O(1).
///
/// The collection is owned by whatever owns the owner object and is mutated
/// through `&mut self`; it performs no internal synchronization.
pub struct DataCollection<O: DataOwner> {
    owner: O::Key,
    entries: Vec<Slot<O>>,
    index: HashMap<TypeId, usize>,
}

impl<O: DataOwner> DataCollection<O> {
    pub fn new(owner: O::Key) -> Self {
        Self {
            owner,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn owner(&self) -> O::Key {
        self.owner
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains<T: DataEntry<O>>(&self) -> bool {
        self.index.contains_key(&TypeId::of::<T>())
    }

    pub fn get<T: DataEntry<O>>(&self) -> Option<&T> {
        let idx = *self.index.get(&TypeId::of::<T>())?;
        let entry: &dyn DataEntry<O> = self.entries[idx].entry.as_ref();
        entry.as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: DataEntry<O>>(&mut self) -> Option<&mut T> {
        let idx = *self.index.get(&TypeId::of::<T>())?;
        let entry: &mut dyn DataEntry<O> = self.entries[idx].entry.as_mut();
        entry.as_any_mut().downcast_mut::<T>()
    }

    /// Entries in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn DataEntry<O>> + '_ {
        self.entries.iter().map(|slot| slot.entry.as_ref())
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.iter().map(|entry| entry.type_name())
    }

    /// Inserts `data`, replacing any existing entry of the same type.
    ///
    /// A replacement keeps the existing position; a new entry triggers a
    /// re-sort. Either way the entry is initialized against this owner.
    pub fn set<T: DataEntry<O>>(&mut self, data: T) -> &mut T {
        let idx = self.insert_slot(TypeId::of::<T>(), Box::new(data));
        self.downcast_slot_mut(idx)
    }

    /// Type-erased [`Self::set`].
    pub fn set_boxed(&mut self, data: Box<dyn DataEntry<O>>) -> &mut dyn DataEntry<O> {
        let type_id = (*data).as_any().type_id();
        let idx = self.insert_slot(type_id, data);
        self.entries[idx].entry.as_mut()
    }

    /// Returns the live entry of type `T`, inserting `T::default()` if absent.
    pub fn set_default<T: DataEntry<O> + Default>(&mut self) -> &mut T {
        match self.index.get(&TypeId::of::<T>()) {
            Some(&idx) => self.downcast_slot_mut(idx),
            None => self.set(T::default()),
        }
    }

    /// Returns the live entry of type `T`, inserting `data` only if absent.
    ///
    /// `data` is dropped when an entry already exists, so independent modules
    /// can call this in any order without clobbering each other.
    pub fn set_default_with<T: DataEntry<O>>(&mut self, data: T) -> &mut T {
        match self.index.get(&TypeId::of::<T>()) {
            Some(&idx) => self.downcast_slot_mut(idx),
            None => self.set(data),
        }
    }

    /// True iff at least one entry wants to be saved.
    pub fn should_save_state(&self) -> bool {
        self.entries.iter().any(|slot| slot.entry.should_save())
    }

    /// Runs every entry's per-tick hook in priority order.
    pub fn update_all(&mut self) {
        let owner = self.owner;
        for slot in &mut self.entries {
            slot.entry.update(owner);
        }
    }

    /// Writes `[count: i32]` followed by one frame per entry that wants saving.
    ///
    /// An entry whose writer fails is dropped from the output (its partial
    /// frame is rolled back) and logged. Returns the number of frames written.
    pub fn write_state(&self, writer: &mut StateWriter) -> usize {
        let count_slot = writer.reserve_i32();
        let mut written = 0usize;

        for slot in &self.entries {
            let entry = slot.entry.as_ref();
            if !entry.should_save() {
                continue;
            }
            let type_name = entry.type_name();
            match writer.write_frame::<CodecError, _>(type_name, |w| entry.write_state(w)) {
                Ok(()) => written += 1,
                Err(error) => warn!(
                    target: "data",
                    owner = O::KIND,
                    type_name,
                    %error,
                    "failed to write data entry, omitting it"
                ),
            }
        }

        writer.patch_i32(count_slot, i32::try_from(written).unwrap_or(i32::MAX));
        trace!(target: "data", owner = O::KIND, written, "wrote data collection");
        written
    }

    /// Restores entries from a stream written by [`Self::write_state`].
    ///
    /// Each frame is isolated: unknown or incompatible types are skipped, and
    /// an entry that fails, under-reads or tries to over-read its payload
    /// never affects the frames after it. Only an unreadable frame header (the
    /// stream itself being broken) is returned as an error.
    ///
    /// Entries created along the way are placed in priority order even when
    /// the stream breaks part way through.
    pub fn read_state<R>(
        &mut self,
        resolver: &R,
        reader: &mut StateReader<'_>,
        version: &SaveVersion,
    ) -> Result<ReadSummary>
    where
        R: TypeResolver + ?Sized,
    {
        let mut summary = ReadSummary::default();
        let result = self.read_frames(resolver, reader, version, &mut summary);
        if summary.created > 0 {
            self.sort_by_priority();
        }
        result?;

        trace!(target: "data", owner = O::KIND, ?summary, "read data collection");
        Ok(summary)
    }

    fn read_frames<R>(
        &mut self,
        resolver: &R,
        reader: &mut StateReader<'_>,
        version: &SaveVersion,
        summary: &mut ReadSummary,
    ) -> Result<()>
    where
        R: TypeResolver + ?Sized,
    {
        let count = reader.read_len()?;

        for _ in 0..count {
            let frame = reader.read_frame()?;

            let Some(ty) = resolver.resolve(&frame.name) else {
                debug!(
                    target: "data",
                    owner = O::KIND,
                    type_name = %frame.name,
                    skipped_bytes = frame.payload_len(),
                    "unresolved data type, skipping frame"
                );
                summary.skipped += 1;
                continue;
            };
            let Some(factory) = ty.factory::<O>() else {
                debug!(
                    target: "data",
                    owner = O::KIND,
                    type_name = %frame.name,
                    registered_for = ty.owner_kind(),
                    "data type does not attach to this owner, skipping frame"
                );
                summary.skipped += 1;
                continue;
            };

            let idx = match self.index.get(&ty.type_id()) {
                Some(&idx) => idx,
                None => {
                    let mut entry = factory();
                    entry.initialize(self.owner);
                    self.entries.push(Slot {
                        type_id: ty.type_id(),
                        entry,
                    });
                    let idx = self.entries.len() - 1;
                    self.index.insert(ty.type_id(), idx);
                    summary.created += 1;
                    idx
                }
            };

            let mut payload = frame.payload;
            match self.entries[idx].entry.read_state(&mut payload, version) {
                Ok(()) => {
                    if !payload.is_empty() {
                        debug!(
                            target: "data",
                            owner = O::KIND,
                            type_name = %frame.name,
                            unread = payload.remaining(),
                            "data entry left payload bytes unread"
                        );
                    }
                    summary.loaded += 1;
                }
                Err(error) => {
                    debug!(
                        target: "data",
                        owner = O::KIND,
                        type_name = %frame.name,
                        %error,
                        "failed to read data entry, continuing at frame end"
                    );
                    summary.failed += 1;
                }
            }
        }
        Ok(())
    }

    fn insert_slot(&mut self, type_id: TypeId, mut entry: Box<dyn DataEntry<O>>) -> usize {
        entry.initialize(self.owner);
        if let Some(&idx) = self.index.get(&type_id) {
            self.entries[idx].entry = entry;
            return idx;
        }
        self.entries.push(Slot { type_id, entry });
        self.sort_by_priority();
        self.index[&type_id]
    }

    fn downcast_slot_mut<T: DataEntry<O>>(&mut self, idx: usize) -> &mut T {
        let entry: &mut dyn DataEntry<O> = self.entries[idx].entry.as_mut();
        match entry.as_any_mut().downcast_mut::<T>() {
            Some(entry) => entry,
            None => unreachable!("data entry indexed under a foreign TypeId"),
        }
    }

    fn sort_by_priority(&mut self) {
        // `sort_by_key` is stable: equal priorities keep insertion order.
        self.entries.sort_by_key(|slot| slot.entry.priority());
        self.index.clear();
        for (idx, slot) in self.entries.iter().enumerate() {
            self.index.insert(slot.type_id, idx);
        }
    }
}

impl<O: DataOwner> fmt::Debug for DataCollection<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataCollection")
            .field("owner", &self.owner)
            .field("entries", &self.type_names().collect::<Vec<_>>())
            .finish()
    }
}
