#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for beat video assembly.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with multiple inputs
//! - Progress parsing from `-progress pipe:2`
//! - Cancellation support via tokio
//! - Image letterboxing onto a canonical frame
//! - Still-image + audio muxing ("shortest" semantics)
//! - Embedded audio title tag reading
//! - Session-scoped working directories
//! - The `MediaAssembler` collaborator trait

pub mod assembler;
pub mod command;
pub mod error;
pub mod letterbox;
pub mod mux;
pub mod probe;
pub mod progress;
pub mod tags;
pub mod workdir;

pub use assembler::{FfmpegAssembler, MediaAssembler};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use letterbox::{letterbox_image, OutputFrame};
pub use mux::mux_still;
pub use probe::{get_audio_duration, probe_audio, AudioInfo};
pub use progress::FfmpegProgress;
pub use tags::read_title_tag;
pub use workdir::SessionWorkdir;
