//! Encoded chunks and their ordered accumulation

use super::{MediaData, MediaMimeType};

/// Bitrates reported by the encoder at the time a chunk was emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bitrates {
    pub audio_bps: u64,
    pub video_bps: u64,
}

/// One unit of encoded data delivered by a recording engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedChunk {
    pub data: Vec<u8>,
    pub bitrates: Bitrates,
}

impl EncodedChunk {
    pub fn new(data: Vec<u8>, bitrates: Bitrates) -> Self {
        Self { data, bitrates }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Append-only chunk sequence.
///
/// Chunks are kept as received; only [`assemble`](Self::assemble) copies
/// them into one contiguous container, in the order they were pushed.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<Vec<u8>>,
    total_bytes: usize,
    mime_type: MediaMimeType,
}

impl ChunkBuffer {
    pub fn new(mime_type: MediaMimeType) -> Self {
        Self {
            chunks: Vec::new(),
            total_bytes: 0,
            mime_type,
        }
    }

    /// Append a chunk. Empty chunks are dropped; returns whether it was kept.
    pub fn push(&mut self, data: Vec<u8>) -> bool {
        if data.is_empty() {
            return false;
        }
        self.total_bytes += data.len();
        self.chunks.push(data);
        true
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn mime_type(&self) -> MediaMimeType {
        self.mime_type
    }

    /// Chunks in arrival order, without copying
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.chunks.iter().map(Vec::as_slice)
    }

    /// Concatenate every chunk so far into one container buffer
    pub fn assemble(&self) -> MediaData {
        let mut data = Vec::with_capacity(self.total_bytes);
        for chunk in &self.chunks {
            data.extend_from_slice(chunk);
        }
        MediaData::new(data, self.mime_type)
    }

    /// Drop all chunks
    pub fn release(&mut self) {
        self.chunks = Vec::new();
        self.total_bytes = 0;
    }
}
