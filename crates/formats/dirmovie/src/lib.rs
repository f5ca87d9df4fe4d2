//! Reader/writer for Macromedia Director's RIFX movie container.
//!
//! Three-layer architecture:
//! - **Layer 1** (`cursor`/`reader`): Raw byte I/O — endian-aware cursor,
//!   container envelope, initial map, memory map
//! - **Layer 2** (`chunks`): Typed codecs for individual chunk formats
//! - **Layer 3** (`movie`): High-level lazy wrapper that materializes chunks
//!   on demand and resolves the cross-reference graph (casts, members,
//!   script contexts, name tables)

pub mod chunks;
pub mod cursor;
pub mod error;
pub mod fourcc;
pub mod json;
pub mod movie;
pub mod reader;
pub mod version;

pub use cursor::{Cursor, Endian, Writer};
pub use error::{Error, Result};
pub use fourcc::FourCC;
pub use movie::DirectorFile;
pub use version::MovieVersion;
