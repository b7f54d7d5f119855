//! Scene artwork decoding and dialogue audio playback.

pub mod artwork;
pub mod audio;
