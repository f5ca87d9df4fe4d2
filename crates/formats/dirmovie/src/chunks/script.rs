use serde::{Serialize, Serializer};

use crate::chunks::names::ScriptNamesChunk;
use crate::cursor::{Cursor, Endian, Writer};
use crate::error::Result;
use crate::version::MovieVersion;

/// Line terminator of emitted Lingo source (classic Mac ending). Shared
/// with the bytecode decompiler so all generated text agrees.
pub const LINGO_LINE_ENDING: &str = "\r";

/// One handler (function) of a script: the fixed record, the name-id
/// tables it points at, and its raw bytecode.
///
/// Records and their variable-length data are read in two phases, matching
/// the wire layout: all records first, then each record's tables and
/// bytecode by absolute offset.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Handler {
    pub name_id: i16,
    pub vector_pos: u16,
    pub compiled_len: u32,
    pub compiled_offset: u32,
    pub argument_count: u16,
    pub argument_offset: u32,
    pub locals_count: u16,
    pub locals_offset: u32,
    pub globals_count: u16,
    pub globals_offset: u32,
    pub unknown1: u32,
    pub unknown2: u16,
    pub line_count: u16,
    pub line_offset: u32,
    /// Present only in capital-X (`LctX`) movies.
    pub stack_height: u32,
    pub argument_name_ids: Vec<i16>,
    pub local_name_ids: Vec<i16>,
    pub global_name_ids: Vec<i16>,
    /// Compiled Lingo for the external decompiler.
    #[serde(skip)]
    pub bytecode: Vec<u8>,
    pub name: String,
    pub argument_names: Vec<String>,
    pub local_names: Vec<String>,
    pub global_names: Vec<String>,
}

impl Handler {
    fn read_record(stream: &mut Cursor, capital_x: bool) -> Result<Self> {
        Ok(Self {
            name_id: stream.read_i16()?,
            vector_pos: stream.read_u16()?,
            compiled_len: stream.read_u32()?,
            compiled_offset: stream.read_u32()?,
            argument_count: stream.read_u16()?,
            argument_offset: stream.read_u32()?,
            locals_count: stream.read_u16()?,
            locals_offset: stream.read_u32()?,
            globals_count: stream.read_u16()?,
            globals_offset: stream.read_u32()?,
            unknown1: stream.read_u32()?,
            unknown2: stream.read_u16()?,
            line_count: stream.read_u16()?,
            line_offset: stream.read_u32()?,
            stack_height: if capital_x { stream.read_u32()? } else { 0 },
            argument_name_ids: Vec::new(),
            local_name_ids: Vec::new(),
            global_name_ids: Vec::new(),
            bytecode: Vec::new(),
            name: String::new(),
            argument_names: Vec::new(),
            local_names: Vec::new(),
            global_names: Vec::new(),
        })
    }

    fn read_data(&mut self, stream: &mut Cursor) -> Result<()> {
        stream.seek(self.compiled_offset as usize);
        self.bytecode = stream.copy_bytes(self.compiled_len as usize)?;
        self.argument_name_ids =
            read_varnames_table(stream, self.argument_count, self.argument_offset)?;
        self.local_name_ids = read_varnames_table(stream, self.locals_count, self.locals_offset)?;
        self.global_name_ids =
            read_varnames_table(stream, self.globals_count, self.globals_offset)?;
        Ok(())
    }

    /// Resolve this handler's own name and its argument/local/global names
    /// through the context's name table.
    fn read_names(&mut self, names: &ScriptNamesChunk) {
        self.name = names.get_name(self.name_id as i32);
        self.argument_names = self
            .argument_name_ids
            .iter()
            .map(|&id| names.get_name(id as i32))
            .collect();
        self.local_names = self
            .local_name_ids
            .iter()
            .map(|&id| names.get_name(id as i32))
            .collect();
        self.global_names = self
            .global_name_ids
            .iter()
            .map(|&id| names.get_name(id as i32))
            .collect();
    }
}

/// Kind discriminator of a literal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Int,
    Float,
    Other(u32),
}

impl LiteralKind {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::String,
            4 => Self::Int,
            9 => Self::Float,
            other => Self::Other(other),
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            Self::String => 1,
            Self::Int => 4,
            Self::Float => 9,
            Self::Other(other) => other,
        }
    }
}

impl Serialize for LiteralKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.to_raw())
    }
}

/// Decoded literal payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LiteralValue {
    Int(i32),
    String(String),
    Float(f64),
    Null,
}

/// One literal of a script's literal pool. Ints are stored inline in the
/// offset field; strings and floats are length-prefixed records in the
/// literal-data region.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteralStore {
    pub kind: LiteralKind,
    pub offset: u32,
    pub value: LiteralValue,
}

impl LiteralStore {
    fn read_record(stream: &mut Cursor, version: MovieVersion) -> Result<Self> {
        let kind = if version.has_modern_member_layout() {
            LiteralKind::from_raw(stream.read_u32()?)
        } else {
            LiteralKind::from_raw(stream.read_u16()? as u32)
        };
        Ok(Self {
            kind,
            offset: stream.read_u32()?,
            value: LiteralValue::Null,
        })
    }

    fn read_data(&mut self, stream: &mut Cursor, start_offset: u32) -> Result<()> {
        if self.kind == LiteralKind::Int {
            self.value = LiteralValue::Int(self.offset as i32);
            return Ok(());
        }
        stream.seek((start_offset + self.offset) as usize);
        let length = stream.read_u32()? as usize;
        self.value = match self.kind {
            // length counts the trailing NUL
            LiteralKind::String => {
                LiteralValue::String(stream.read_string(length.saturating_sub(1))?)
            }
            LiteralKind::Float if length == 8 => LiteralValue::Float(stream.read_f64()?),
            LiteralKind::Float if length == 10 => {
                LiteralValue::Float(stream.read_apple_float80()?)
            }
            _ => LiteralValue::Null,
        };
        Ok(())
    }
}

/// `Lscr` chunk: one compiled Lingo script. Always big-endian.
///
/// The header is sparse; undocumented stretches are skipped by absolute
/// seek. The raw payload is retained so the chunk re-emits byte-exact:
/// this pipeline edits script *source* (in the cast-info sub-chunk), never
/// compiled scripts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptChunk {
    pub total_length: u32,
    pub total_length2: u32,
    pub header_length: u16,
    pub script_number: u16,
    pub script_behavior: u32,
    pub handler_vectors_count: u16,
    pub handler_vectors_offset: u32,
    pub handler_vectors_size: u32,
    pub properties_count: u16,
    pub properties_offset: u32,
    pub globals_count: u16,
    pub globals_offset: u32,
    pub handlers_count: u16,
    pub handlers_offset: u32,
    pub literals_count: u16,
    pub literals_offset: u32,
    pub literals_data_count: u32,
    pub literals_data_offset: u32,
    pub property_name_ids: Vec<i16>,
    pub global_name_ids: Vec<i16>,
    pub handlers: Vec<Handler>,
    pub literals: Vec<LiteralStore>,
    pub property_names: Vec<String>,
    pub global_names: Vec<String>,
    /// Slot of the owning `Lctx`/`LctX`, bound at link time.
    #[serde(skip)]
    pub context_slot: Option<i32>,
    /// Slot of the `CASt` member that owns this script, bound at link time.
    #[serde(skip)]
    pub member_slot: Option<i32>,
    #[serde(skip)]
    raw: Vec<u8>,
}

impl ScriptChunk {
    pub fn read(stream: Cursor, version: MovieVersion, capital_x: bool) -> Result<Self> {
        // Lingo scripts are always big-endian regardless of file endianness
        let mut stream = stream.with_endian(Endian::Big);
        let raw = {
            let mut whole = stream;
            whole.seek(0);
            whole.copy_bytes(whole.len())?
        };

        stream.seek(8);
        let total_length = stream.read_u32()?;
        let total_length2 = stream.read_u32()?;
        let header_length = stream.read_u16()?;
        let script_number = stream.read_u16()?;
        stream.seek(38);
        let script_behavior = stream.read_u32()?;
        stream.seek(50);
        let handler_vectors_count = stream.read_u16()?;
        let handler_vectors_offset = stream.read_u32()?;
        let handler_vectors_size = stream.read_u32()?;
        let properties_count = stream.read_u16()?;
        let properties_offset = stream.read_u32()?;
        let globals_count = stream.read_u16()?;
        let globals_offset = stream.read_u32()?;
        let handlers_count = stream.read_u16()?;
        let handlers_offset = stream.read_u32()?;
        let literals_count = stream.read_u16()?;
        let literals_offset = stream.read_u32()?;
        let literals_data_count = stream.read_u32()?;
        let literals_data_offset = stream.read_u32()?;

        let property_name_ids =
            read_varnames_table(&mut stream, properties_count, properties_offset)?;
        let global_name_ids = read_varnames_table(&mut stream, globals_count, globals_offset)?;

        stream.seek(handlers_offset as usize);
        let mut handlers = Vec::with_capacity(handlers_count as usize);
        for _ in 0..handlers_count {
            handlers.push(Handler::read_record(&mut stream, capital_x)?);
        }
        for handler in &mut handlers {
            handler.read_data(&mut stream)?;
        }

        stream.seek(literals_offset as usize);
        let mut literals = Vec::with_capacity(literals_count as usize);
        for _ in 0..literals_count {
            literals.push(LiteralStore::read_record(&mut stream, version)?);
        }
        for literal in &mut literals {
            literal.read_data(&mut stream, literals_data_offset)?;
        }

        Ok(Self {
            total_length,
            total_length2,
            header_length,
            script_number,
            script_behavior,
            handler_vectors_count,
            handler_vectors_offset,
            handler_vectors_size,
            properties_count,
            properties_offset,
            globals_count,
            globals_offset,
            handlers_count,
            handlers_offset,
            literals_count,
            literals_offset,
            literals_data_count,
            literals_data_offset,
            property_name_ids,
            global_name_ids,
            handlers,
            literals,
            property_names: Vec::new(),
            global_names: Vec::new(),
            context_slot: None,
            member_slot: None,
            raw,
        })
    }

    pub fn size(&self) -> usize {
        self.raw.len()
    }

    pub fn write(&self, w: &mut Writer) {
        w.set_endian(Endian::Big);
        w.write_bytes(&self.raw);
    }

    /// Bind this script to its context: resolve property and global names
    /// through the context's name table and remember the context slot.
    pub fn set_context(&mut self, context_slot: i32, names: &ScriptNamesChunk) {
        self.context_slot = Some(context_slot);
        self.property_names = self
            .property_name_ids
            .iter()
            .map(|&id| names.get_name(id as i32))
            .collect();
        self.global_names = self
            .global_name_ids
            .iter()
            .map(|&id| names.get_name(id as i32))
            .collect();
    }

    /// Hand the script off to the decompiler: resolve every handler's own
    /// name and its argument/local/global names. Handler bodies stay raw
    /// bytecode; turning them into an AST is the decompiler's side of the
    /// seam.
    pub fn translate(&mut self, names: &ScriptNamesChunk) {
        for handler in &mut self.handlers {
            handler.read_names(names);
        }
    }

    /// The `property`/`global` declaration header of the emitted source.
    pub fn var_declarations(&self) -> String {
        let mut res = String::new();
        if !self.property_names.is_empty() {
            res.push_str("property ");
            res.push_str(&self.property_names.join(", "));
            res.push_str(LINGO_LINE_ENDING);
        }
        if !self.global_names.is_empty() {
            res.push_str("global ");
            res.push_str(&self.global_names.join(", "));
            res.push_str(LINGO_LINE_ENDING);
        }
        res
    }
}

/// A name-id table: `count` i16 ids at absolute `offset`.
fn read_varnames_table(stream: &mut Cursor, count: u16, offset: u32) -> Result<Vec<i16>> {
    stream.seek(offset as usize);
    let mut name_ids = Vec::with_capacity(count as usize);
    for _ in 0..count {
        name_ids.push(stream.read_i16()?);
    }
    Ok(name_ids)
}
