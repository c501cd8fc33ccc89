//! File-valued process variables.
//!
//! A [`FileValue`] is a named binary payload with an optional MIME type and
//! character encoding. [`FileValueBuilder`] assembles one from raw bytes, a
//! readable stream, or a filesystem path, normalizing every source into an
//! in-memory byte buffer.
//!
//! # Resource Rules
//!
//! 1. Streams and file handles live only for the duration of one ingestion call.
//! 2. Every stream is closed on every exit path, success or failure.
//! 3. Close failures are logged and discarded; they never replace a read error.
//! 4. A failed ingestion leaves the previously set content untouched.
//! 5. `create()` hands out a snapshot; later builder calls cannot alter it.

pub mod builder;
pub mod config;
pub mod encoding;
pub mod error;
pub mod stream;
pub mod value;

pub use builder::FileValueBuilder;
pub use config::{BuilderConfig, DEFAULT_CHUNK_SIZE};
pub use encoding::{Charset, Encoding};
pub use error::{FileError, FileResult};
pub use stream::{ByteStream, StreamGuard};
pub use value::FileValue;
