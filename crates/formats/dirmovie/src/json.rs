//! Structural JSON projection of the chunk graph, for diagnostics.
//!
//! Chunks serialize their externally meaningful fields in declaration
//! order; raw byte buffers stay out. Shared nodes (a member's script, a
//! cast's context) are inlined at their usage site, so the dump reads as
//! one tree. Not used by the serializer path.

use serde_json::{json, Map, Value};

use crate::chunks::Chunk;
use crate::cursor::Endian;
use crate::movie::DirectorFile;

impl DirectorFile {
    /// Project the loaded graph as a JSON tree. Only materialized chunks
    /// appear; call [`load`](Self::load) first for the full picture.
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        root.insert(
            "endianness".into(),
            json!(match self.endian() {
                Endian::Big => "big",
                Endian::Little => "little",
            }),
        );
        root.insert("codec".into(), json!(self.codec().to_string()));
        root.insert("version".into(), json!(self.version().0));
        root.insert("initialMap".into(), json!(self.initial_map()));
        root.insert("memoryMap".into(), json!(self.memory_map()));
        if let Some(config) = self.config() {
            root.insert("config".into(), json!(config));
        }
        if let Some(key_table) = self.key_table() {
            root.insert("keyTable".into(), json!(key_table));
        }
        if let Some(cast_list) = self.cast_list() {
            root.insert("castList".into(), json!(cast_list));
        }
        root.insert(
            "casts".into(),
            Value::Array(self.casts().map(|(slot, _)| self.cast_json(slot)).collect()),
        );
        Value::Object(root)
    }

    fn cast_json(&self, cast_slot: i32) -> Value {
        let Some(cast) = self.chunk(cast_slot).and_then(Chunk::as_cast) else {
            return Value::Null;
        };
        let mut node = match json!(cast) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if let Some(ctx) = cast.lctx_slot.and_then(|s| self.script_context(s)) {
            node.insert("scriptContext".into(), json!(ctx));
            if let Some(names) = ctx.lnam_slot.and_then(|s| self.script_names(s)) {
                node.insert("scriptNames".into(), json!(names));
            }
        }
        let members: Map<String, Value> = cast
            .members
            .iter()
            .map(|(&index, &member_slot)| (index.to_string(), self.member_json(member_slot)))
            .collect();
        node.insert("members".into(), Value::Object(members));
        Value::Object(node)
    }

    fn member_json(&self, member_slot: i32) -> Value {
        let Some(member) = self.cast_member(member_slot) else {
            return Value::Null;
        };
        let mut node = match json!(member) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        // inline the member's script at the usage site
        if let Some(script) = member.script_slot.and_then(|s| self.script(s)) {
            node.insert("script".into(), json!(script));
        }
        Value::Object(node)
    }
}
