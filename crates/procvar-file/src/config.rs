use serde::{Deserialize, Serialize};

/// Default read chunk for stream ingestion (16 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Configuration for [`FileValueBuilder`](crate::FileValueBuilder).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Size of each read when draining a stream. Zero is treated as one.
    pub chunk_size: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl BuilderConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Chunk size actually used for reads.
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}
