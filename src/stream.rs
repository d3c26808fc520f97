//! Output stream sessions handed to the framework.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::bus::{BusConfig, BusOutputStream};

/// Proxy output stream wrapping a bus stream.
///
/// A `StreamOut` pairs the bus stream returned by the provider with the
/// device's fixed buffer and latency settings. The device does not keep
/// sessions around after opening them; the provider holds a weak reference
/// and decides when a session no longer counts as live.
///
/// # Lifecycle
///
/// 1. Created by [`ProxyDevice::open_output_stream()`]
/// 2. Registered with the provider
/// 3. Closed by [`close()`](StreamOut::close) or by dropping every handle
///
/// [`ProxyDevice::open_output_stream()`]: crate::ProxyDevice::open_output_stream
pub struct StreamOut {
    bus_stream: Arc<dyn BusOutputStream>,
    buffer_size_ms: u32,
    latency_ms: u32,
    closed: AtomicBool,
}

impl StreamOut {
    /// Wraps `bus_stream` with the given buffer and latency settings.
    pub fn new(bus_stream: Arc<dyn BusOutputStream>, buffer_size_ms: u32, latency_ms: u32) -> Self {
        Self {
            bus_stream,
            buffer_size_ms,
            latency_ms,
            closed: AtomicBool::new(false),
        }
    }

    /// The wrapped bus stream.
    pub fn bus_stream(&self) -> &Arc<dyn BusOutputStream> {
        &self.bus_stream
    }

    /// Bus configuration of the wrapped stream.
    pub fn config(&self) -> BusConfig {
        self.bus_stream.config()
    }

    /// Buffer size in milliseconds.
    pub fn buffer_size_ms(&self) -> u32 {
        self.buffer_size_ms
    }

    /// Reported latency in milliseconds.
    pub fn latency_ms(&self) -> u32 {
        self.latency_ms
    }

    /// Reported latency.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(u64::from(self.latency_ms))
    }

    /// Buffer size in frames at the stream's sample rate.
    ///
    /// Negative sample rates from the bus count as zero.
    pub fn buffer_size_frames(&self) -> u64 {
        let rate = u64::try_from(self.config().sample_rate_hz).unwrap_or(0);
        rate * u64::from(self.buffer_size_ms) / 1000
    }

    /// Marks the session closed. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        let was_open = !self.closed.swap(true, Ordering::SeqCst);
        if was_open {
            tracing::debug!(address = self.bus_stream.address(), "output stream closed");
        }
        was_open
    }

    /// Returns `true` once [`close()`](StreamOut::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for StreamOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamOut")
            .field("address", &self.bus_stream.address())
            .field("config", &self.bus_stream.config())
            .field("buffer_size_ms", &self.buffer_size_ms)
            .field("latency_ms", &self.latency_ms)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{BusChannelMask, BusFormat};
    use crate::provider::MockBusStream;

    fn bus_stream(sample_rate_hz: i32) -> Arc<dyn BusOutputStream> {
        Arc::new(MockBusStream::new(
            "bus0",
            BusConfig {
                format: BusFormat(1),
                sample_rate_hz,
                channel_mask: BusChannelMask(3),
            },
            0,
        ))
    }

    #[test]
    fn test_stream_parameters() {
        let stream = StreamOut::new(bus_stream(48_000), 10, 20);
        assert_eq!(stream.buffer_size_ms(), 10);
        assert_eq!(stream.latency(), Duration::from_millis(20));
        assert_eq!(stream.buffer_size_frames(), 480);
        assert_eq!(stream.bus_stream().address(), "bus0");
    }

    #[test]
    fn test_negative_rate_gives_zero_frames() {
        let stream = StreamOut::new(bus_stream(-1), 10, 20);
        assert_eq!(stream.buffer_size_frames(), 0);
    }

    #[test]
    fn test_close_once() {
        let stream = StreamOut::new(bus_stream(48_000), 10, 20);
        assert!(!stream.is_closed());
        assert!(stream.close());
        assert!(!stream.close());
        assert!(stream.is_closed());
    }
}
