use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::chunks::map::{InitialMapChunk, MemoryMapChunk};
use crate::chunks::names::ScriptNamesChunk;
use crate::chunks::{
    CastChunk, CastListChunk, CastMemberChunk, Chunk, ConfigChunk, KeyTableChunk, ScriptChunk,
    ScriptContextChunk,
};
use crate::cursor::{Cursor, Endian};
use crate::error::{Error, Result};
use crate::fourcc::FourCC;
use crate::reader::{ChunkSlot, Container};
use crate::version::MovieVersion;

/// Owner cast id of the single internal cast in movies that predate the
/// movie-level cast list.
const INTERNAL_CAST_ID: i32 = 1024;

/// A parsed movie container and its chunk graph.
///
/// Chunks materialize lazily on first request by slot id and are cached in
/// an owning store; cross-chunk links (cast → members → scripts → context
/// → names) are slot-id handles resolved through this type, so the graph
/// has no cyclic ownership.
pub struct DirectorFile {
    data: Vec<u8>,
    endian: Endian,
    codec: FourCC,
    version: MovieVersion,
    capital_x: bool,
    imap: InitialMapChunk,
    mmap: MemoryMapChunk,
    slots: Vec<ChunkSlot>,
    chunks: HashMap<i32, Chunk>,
    config_slot: Option<i32>,
    key_table_slot: Option<i32>,
    cast_list_slot: Option<i32>,
    casts: Vec<i32>,
}

impl DirectorFile {
    /// Parse the container envelope: wrapper, initial map, memory map. No
    /// other chunk is decoded yet; call [`load`](Self::load) to materialize
    /// the graph.
    pub fn read(data: Vec<u8>) -> Result<Self> {
        let container = Container::parse(&data)?;
        let slots = container.slots();
        debug!(
            codec = %container.codec,
            slots = slots.len(),
            "parsed container envelope"
        );
        Ok(Self {
            data,
            endian: container.endian,
            codec: container.codec,
            version: MovieVersion(0),
            capital_x: false,
            imap: container.imap,
            mmap: container.mmap,
            slots,
            chunks: HashMap::new(),
            config_slot: None,
            key_table_slot: None,
            cast_list_slot: None,
            casts: Vec::new(),
        })
    }

    /// Materialize and link the chunk graph: config (checksum validated),
    /// key table, cast list, casts with their members and script contexts.
    ///
    /// Unresolvable references are logged and dropped; only a missing
    /// config is fatal.
    pub fn load(&mut self) -> Result<()> {
        // config gates everything else through its version field
        let (config_fourcc, config_slot) = self
            .first_slot_of(FourCC::DRCF)
            .map(|id| (FourCC::DRCF, id))
            .or_else(|| self.first_slot_of(FourCC::VWCF).map(|id| (FourCC::VWCF, id)))
            .ok_or(Error::ChunkNotFound {
                fourcc: FourCC::DRCF,
                id: -1,
            })?;
        self.get_chunk(config_fourcc, config_slot)?;
        self.config_slot = Some(config_slot);
        let config = self.chunks[&config_slot]
            .as_config()
            .expect("config slot holds a config chunk");
        self.version = config.version();
        let config_min_member = config.min_member;
        debug!(version = %self.version, "read config");

        if let Some(id) = self.first_slot_of(FourCC::KEY_TABLE) {
            self.get_chunk(FourCC::KEY_TABLE, id)?;
            self.key_table_slot = Some(id);
        }

        self.read_casts(config_min_member)
    }

    fn read_casts(&mut self, config_min_member: u16) -> Result<()> {
        if self.version.has_modern_member_layout() {
            if let Some(cast_list_slot) = self.first_slot_of(FourCC::CAST_LIST) {
                self.get_chunk(FourCC::CAST_LIST, cast_list_slot)?;
                self.cast_list_slot = Some(cast_list_slot);
                let entries = self.chunks[&cast_list_slot]
                    .as_cast_list()
                    .expect("cast list slot holds a cast list chunk")
                    .entries
                    .clone();
                for entry in entries {
                    let cast_slot = self.key_table_lookup(entry.id, FourCC::CAST);
                    let Some(cast_slot) = cast_slot else {
                        warn!(cast = %entry.name, id = entry.id, "cast has no CAS* chunk; dropping");
                        continue;
                    };
                    self.get_chunk(FourCC::CAST, cast_slot)?;
                    self.populate_cast(cast_slot, &entry.name, entry.id, entry.min_member)?;
                    self.casts.push(cast_slot);
                }
                return Ok(());
            }
        }

        // no cast list: a single internal cast addressed by a well-known id
        if let Some(cast_slot) = self.first_slot_of(FourCC::CAST) {
            self.get_chunk(FourCC::CAST, cast_slot)?;
            self.populate_cast(cast_slot, "Internal", INTERNAL_CAST_ID, config_min_member)?;
            self.casts.push(cast_slot);
        }
        Ok(())
    }

    /// First key-table row owned by `cast_id` pointing at an existing slot
    /// with the wanted tag.
    fn key_table_lookup(&self, cast_id: i32, fourcc: FourCC) -> Option<i32> {
        let key_table = self.key_table()?;
        key_table
            .entries
            .iter()
            .find(|e| {
                e.cast_id == cast_id && e.fourcc == fourcc && self.chunk_exists(fourcc, e.section_id)
            })
            .map(|e| e.section_id)
    }

    /// Bind a cast's script context and wire member ↔ script back-links.
    fn populate_cast(
        &mut self,
        cast_slot: i32,
        name: &str,
        cast_id: i32,
        min_member: u16,
    ) -> Result<()> {
        let key_entries = self
            .key_table()
            .map(|kt| kt.entries.clone())
            .unwrap_or_default();

        let mut lctx_slot = None;
        for entry in &key_entries {
            if entry.cast_id == cast_id
                && (entry.fourcc == FourCC::LCTX || entry.fourcc == FourCC::LCTX_CAP)
                && self.chunk_exists(entry.fourcc, entry.section_id)
            {
                // materializing the context also links its name table and
                // scripts
                self.get_chunk(entry.fourcc, entry.section_id)?;
                lctx_slot = Some(entry.section_id);
                break;
            }
        }

        let member_ids = match self.chunks.get(&cast_slot).and_then(Chunk::as_cast) {
            Some(cast) => cast.member_ids.clone(),
            None => return Ok(()),
        };

        let mut members = BTreeMap::new();
        for (i, &section_id) in member_ids.iter().enumerate() {
            if section_id <= 0 {
                continue;
            }
            if !self.chunk_exists(FourCC::CAST_MEMBER, section_id) {
                warn!(
                    slot = section_id,
                    cast = name,
                    "cast references a missing member slot; dropping"
                );
                continue;
            }
            self.get_chunk(FourCC::CAST_MEMBER, section_id)?;
            let member_index = i as u16 + min_member;

            let script_id = self
                .chunks
                .get(&section_id)
                .and_then(Chunk::as_cast_member)
                .map(|m| m.info.script_id);
            let script_slot = lctx_slot.and_then(|ctx_slot| {
                let ctx = self.chunks.get(&ctx_slot).and_then(Chunk::as_script_context)?;
                ctx.scripts.get(&script_id?).copied()
            });

            if let Some(Chunk::CastMember(member)) = self.chunks.get_mut(&section_id) {
                member.id = member_index;
                member.script_slot = script_slot;
            }
            if let Some(script_slot) = script_slot {
                if let Some(Chunk::Script(script)) = self.chunks.get_mut(&script_slot) {
                    script.member_slot = Some(section_id);
                }
            }
            members.insert(member_index, section_id);
        }

        if let Some(Chunk::Cast(cast)) = self.chunks.get_mut(&cast_slot) {
            cast.name = name.to_string();
            cast.lctx_slot = lctx_slot;
            cast.members = members;
        }
        Ok(())
    }

    /// Resolve a freshly materialized script context: its name table, then
    /// every script its section map points at, then each script's
    /// translation handoff.
    fn link_context(&mut self, ctx_slot: i32) -> Result<()> {
        let (lnam_section_id, section_map) =
            match self.chunks.get(&ctx_slot).and_then(Chunk::as_script_context) {
                Some(ctx) => (ctx.lnam_section_id, ctx.section_map.clone()),
                None => return Ok(()),
            };

        let lnam_slot = if self.chunk_exists(FourCC::LNAM, lnam_section_id) {
            self.get_chunk(FourCC::LNAM, lnam_section_id)?;
            Some(lnam_section_id)
        } else {
            warn!(
                slot = lnam_section_id,
                "script context has no name table; names resolve to sentinels"
            );
            None
        };
        // cloned so scripts can be mutated while names are borrowed
        let names = lnam_slot
            .and_then(|id| self.chunks.get(&id))
            .and_then(Chunk::as_script_names)
            .cloned()
            .unwrap_or_else(ScriptNamesChunk::empty);

        let mut scripts = BTreeMap::new();
        for (k, entry) in section_map.iter().enumerate() {
            if entry.section_id > -1 {
                if !self.chunk_exists(FourCC::LSCR, entry.section_id) {
                    warn!(
                        slot = entry.section_id,
                        "section map points at a missing script; dropping"
                    );
                    continue;
                }
                self.get_chunk(FourCC::LSCR, entry.section_id)?;
                scripts.insert(k as u32 + 1, entry.section_id);
            }
        }

        for &script_slot in scripts.values() {
            if let Some(Chunk::Script(script)) = self.chunks.get_mut(&script_slot) {
                script.set_context(ctx_slot, &names);
            }
        }
        for &script_slot in scripts.values() {
            if let Some(Chunk::Script(script)) = self.chunks.get_mut(&script_slot) {
                script.translate(&names);
            }
        }

        if let Some(Chunk::ScriptContext(ctx)) = self.chunks.get_mut(&ctx_slot) {
            ctx.lnam_slot = lnam_slot;
            ctx.scripts = scripts;
        }
        Ok(())
    }

    /// Whether `fourcc` names a dead memory-map slot rather than a chunk.
    fn is_dead_slot(fourcc: FourCC) -> bool {
        fourcc == FourCC::FREE || fourcc == FourCC::JUNK
    }

    /// Whether a slot with this id exists and carries the given tag.
    /// Free and junk slots never count as existing chunks.
    pub fn chunk_exists(&self, fourcc: FourCC, id: i32) -> bool {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.slots.get(i))
            .is_some_and(|slot| slot.fourcc == fourcc && !Self::is_dead_slot(slot.fourcc))
    }

    /// Materialize the chunk at `id`, or return the cached one. The slot's
    /// tag must match `fourcc`, cached or not.
    pub fn get_chunk(&mut self, fourcc: FourCC, id: i32) -> Result<&Chunk> {
        let slot = usize::try_from(id)
            .ok()
            .and_then(|i| self.slots.get(i))
            .copied()
            .ok_or(Error::ChunkNotFound { fourcc, id })?;
        if Self::is_dead_slot(slot.fourcc) {
            return Err(Error::ChunkNotFound { fourcc, id });
        }
        if slot.fourcc != fourcc {
            return Err(Error::TagMismatch {
                id,
                expected: fourcc,
                found: slot.fourcc,
            });
        }
        if !self.chunks.contains_key(&id) {
            let chunk = self.read_chunk_from_slot(id, slot)?;
            self.chunks.insert(id, chunk);
            if matches!(self.chunks[&id], Chunk::ScriptContext(_)) {
                self.link_context(id)?;
            }
        }
        Ok(&self.chunks[&id])
    }

    fn read_chunk_from_slot(&mut self, id: i32, slot: ChunkSlot) -> Result<Chunk> {
        // a capital-X context changes handler records in every script that
        // follows
        if slot.fourcc == FourCC::LCTX_CAP {
            self.capital_x = true;
        }

        let mut stream = Cursor::new(&self.data, self.endian);
        stream.seek(slot.offset as usize);
        let found = stream.read_fourcc().map_err(|_| Error::SlotOutOfBounds {
            id,
            offset: slot.offset,
            len: slot.len,
        })?;
        if found != slot.fourcc {
            warn!(
                slot = id,
                expected = %slot.fourcc,
                found = %found,
                "chunk header tag disagrees with the memory map"
            );
        }
        let len = stream.read_u32()?;
        let payload = stream
            .sub_stream(len as usize)
            .map_err(|_| Error::SlotOutOfBounds {
                id,
                offset: slot.offset,
                len,
            })?;
        Chunk::read(slot.fourcc, payload, self.version, self.capital_x)
    }

    /// First slot carrying the given tag.
    pub fn first_slot_of(&self, fourcc: FourCC) -> Option<i32> {
        self.slots
            .iter()
            .position(|slot| slot.fourcc == fourcc)
            .map(|i| i as i32)
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn codec(&self) -> FourCC {
        self.codec
    }

    /// Marketing version from the config chunk; meaningful after `load`.
    pub fn version(&self) -> MovieVersion {
        self.version
    }

    pub fn initial_map(&self) -> &InitialMapChunk {
        &self.imap
    }

    pub fn memory_map(&self) -> &MemoryMapChunk {
        &self.mmap
    }

    pub fn slots(&self) -> &[ChunkSlot] {
        &self.slots
    }

    /// A cached chunk by slot id; `None` if never materialized.
    pub fn chunk(&self, id: i32) -> Option<&Chunk> {
        self.chunks.get(&id)
    }

    pub fn config(&self) -> Option<&ConfigChunk> {
        self.chunks
            .get(&self.config_slot?)
            .and_then(Chunk::as_config)
    }

    pub fn key_table(&self) -> Option<&KeyTableChunk> {
        self.chunks
            .get(&self.key_table_slot?)
            .and_then(Chunk::as_key_table)
    }

    pub fn cast_list(&self) -> Option<&CastListChunk> {
        self.chunks
            .get(&self.cast_list_slot?)
            .and_then(Chunk::as_cast_list)
    }

    /// Populated casts, in cast-list order.
    pub fn casts(&self) -> impl Iterator<Item = (i32, &CastChunk)> {
        self.casts
            .iter()
            .filter_map(|&slot| Some((slot, self.chunks.get(&slot)?.as_cast()?)))
    }

    pub fn cast_member(&self, slot: i32) -> Option<&CastMemberChunk> {
        self.chunks.get(&slot).and_then(Chunk::as_cast_member)
    }

    pub fn script(&self, slot: i32) -> Option<&ScriptChunk> {
        self.chunks.get(&slot).and_then(Chunk::as_script)
    }

    pub fn script_context(&self, slot: i32) -> Option<&ScriptContextChunk> {
        self.chunks.get(&slot).and_then(Chunk::as_script_context)
    }

    pub fn script_names(&self, slot: i32) -> Option<&ScriptNamesChunk> {
        self.chunks.get(&slot).and_then(Chunk::as_script_names)
    }

    /// The container bytes the graph was parsed from.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Debug for DirectorFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectorFile")
            .field("size", &self.data.len())
            .field("endian", &self.endian)
            .field("codec", &self.codec)
            .field("version", &self.version)
            .field("slots", &self.slots.len())
            .field("casts", &self.casts.len())
            .finish()
    }
}
