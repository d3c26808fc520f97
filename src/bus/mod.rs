//! Collaborator interfaces on the bus side of the proxy.
//!
//! The device never talks to an audio bus directly. A [`StreamProvider`]
//! opens [`BusOutputStream`]s on its behalf and keeps track of which
//! [`StreamOut`] sessions are still alive.

mod config;

pub use config::{BusChannelMask, BusConfig, BusFormat};

use std::sync::{Arc, Weak};

use crate::stream::StreamOut;

/// An output stream on the external audio bus.
///
/// Data transfer lives behind this trait and is not the device's concern;
/// the device only needs to know what was opened.
pub trait BusOutputStream: Send + Sync {
    /// Bus address the stream writes to.
    fn address(&self) -> &str;

    /// Configuration the stream was opened with.
    fn config(&self) -> BusConfig;

    /// Output flags the stream was opened with.
    fn flags(&self) -> i32;
}

/// Opens bus streams and tracks the sessions wrapping them.
///
/// # Implementation Notes
///
/// - Methods take `&self`; the provider is shared by the device and the
///   service that owns it, so use interior mutability
/// - `open_output_stream` may block
/// - `clean_and_count_stream_outs` must prune and count as one atomic step,
///   since the device trusts the result to decide whether it may close
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Weak};
/// use audio_proxy::{BusConfig, BusOutputStream, StreamOut, StreamProvider};
///
/// struct NullProvider;
///
/// impl StreamProvider for NullProvider {
///     fn open_output_stream(
///         &self,
///         _bus_address: &str,
///         _config: BusConfig,
///         _flags: i32,
///     ) -> Option<Arc<dyn BusOutputStream>> {
///         None
///     }
///
///     fn on_stream_out_created(&self, _stream: Weak<StreamOut>) {}
///
///     fn clean_and_count_stream_outs(&self) -> usize {
///         0
///     }
/// }
/// ```
pub trait StreamProvider: Send + Sync {
    /// Opens an output stream on `bus_address`.
    ///
    /// Returning `None` violates the provider contract; the device treats it
    /// as a fatal fault.
    fn open_output_stream(
        &self,
        bus_address: &str,
        config: BusConfig,
        flags: i32,
    ) -> Option<Arc<dyn BusOutputStream>>;

    /// Registers a freshly created session for liveness tracking.
    fn on_stream_out_created(&self, stream: Weak<StreamOut>);

    /// Drops sessions that are gone or closed and returns how many remain.
    fn clean_and_count_stream_outs(&self) -> usize;
}
