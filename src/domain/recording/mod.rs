//! Recording domain module

mod chunks;
mod duration;
mod encoding;
mod media_data;
mod timing;

pub use chunks::{Bitrates, ChunkBuffer, EncodedChunk};
pub use duration::{Duration, DEFAULT_STALL_TIMEOUT_SECS};
pub use encoding::{EncodingConfig, VideoCodec, DEFAULT_AUDIO_BITRATE};
pub use media_data::{human_readable_size, MediaData, MediaMimeType};
pub use timing::TimingRecord;
