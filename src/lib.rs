//! # audio-proxy
//!
//! **Note:** This crate is under active development. The API may change before 1.0.
//!
//! Proxy audio device that routes framework output streams to an external
//! audio bus.
//!
//! `audio-proxy` sits between an audio framework's device interface and a
//! [`StreamProvider`] that owns the real bus streams. It opens output
//! streams, keeps bookkeeping for audio patches, and refuses to close while
//! streams are still live. Every capability it does not implement is
//! declined with [`Status::NotSupported`] and never changes state.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use audio_proxy::{
//!     AudioChannelMask, AudioConfig, AudioFormat, AudioOutputFlags, DeviceAddress,
//!     DeviceConfig, MockStreamProvider, ProxyDevice,
//! };
//!
//! let provider = Arc::new(MockStreamProvider::new());
//! let device = ProxyDevice::new(provider, DeviceConfig::default());
//!
//! let config = AudioConfig::new(AudioFormat::PCM_16_BIT, 48_000, AudioChannelMask::OUT_STEREO);
//! let opened = device.open_output_stream(
//!     &DeviceAddress::bus("bus0_media_out"),
//!     &config,
//!     AudioOutputFlags::PRIMARY,
//! )?;
//!
//! let patch = device.create_audio_patch(&[], &[])?;
//! device.release_audio_patch(patch)?;
//!
//! opened.stream.close();
//! device.close()?;
//! # Ok::<(), audio_proxy::DeviceError>(())
//! ```
//!
//! ## Architecture
//!
//! - **Device**: [`ProxyDevice`] answers framework calls
//! - **Provider**: opens bus streams and decides which sessions are live
//! - **Patches**: [`PatchRegistry`] hands out handles that are never reused
//!
//! The device never stores stream sessions. Whether it may close is decided
//! by asking the provider, which prunes and counts in one step.

#![warn(missing_docs)]
// Bus and framework encodings share bit patterns across signedness
#![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
// Declined capabilities keep the framework's signatures
#![allow(clippy::unused_self, clippy::unnecessary_wraps)]
// unwrap/expect allowed in tests only
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::missing_panics_doc, clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod bus;
pub mod capability;
mod config;
mod device;
mod error;
pub mod format;
mod patch;
mod provider;
mod reply;
mod stream;
mod types;

pub use bus::{BusConfig, BusOutputStream, StreamProvider};
pub use capability::Capability;
pub use config::DeviceConfig;
pub use device::{InputStream, OpenedStream, ProxyDevice};
pub use error::{DeviceError, DeviceResult};
pub use format::{AudioChannelMask, AudioConfig, AudioFormat};
pub use patch::{PatchHandle, PatchRegistry};
pub use provider::{MockBusStream, MockStreamProvider};
pub use reply::{Reply, Status};
pub use stream::StreamOut;
pub use types::{
    AudioInputFlags, AudioOutputFlags, AudioPort, AudioPortConfig, AudioPortHandle, DeviceAddress,
    EffectId, MicrophoneInfo, ParameterValue,
};
