//! In-memory stream provider for testing without a bus.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::bus::{BusConfig, BusOutputStream, StreamProvider};
use crate::stream::StreamOut;

/// A bus output stream that only records how it was opened.
#[derive(Debug, Clone)]
pub struct MockBusStream {
    address: String,
    config: BusConfig,
    flags: i32,
}

impl MockBusStream {
    /// Creates a stream description.
    pub fn new(address: impl Into<String>, config: BusConfig, flags: i32) -> Self {
        Self {
            address: address.into(),
            config,
            flags,
        }
    }
}

impl BusOutputStream for MockBusStream {
    fn address(&self) -> &str {
        &self.address
    }

    fn config(&self) -> BusConfig {
        self.config
    }

    fn flags(&self) -> i32 {
        self.flags
    }
}

/// A provider that opens [`MockBusStream`]s and tracks sessions weakly.
///
/// A session stops counting as live once every strong handle to it is
/// dropped or once it is [closed](StreamOut::close). Pruning and counting
/// happen under the same lock.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use audio_proxy::{AudioConfig, AudioOutputFlags, DeviceAddress, DeviceConfig, MockStreamProvider, ProxyDevice};
///
/// let provider = Arc::new(MockStreamProvider::new());
/// let device = ProxyDevice::new(provider.clone(), DeviceConfig::default());
///
/// let opened = device
///     .open_output_stream(&DeviceAddress::bus("bus0"), &AudioConfig::default(), AudioOutputFlags::NONE)
///     .unwrap();
/// assert_eq!(provider.opened_addresses(), vec!["bus0".to_string()]);
///
/// drop(opened);
/// assert!(device.close().is_ok());
/// ```
#[derive(Debug, Default)]
pub struct MockStreamProvider {
    streams: Mutex<Vec<Weak<StreamOut>>>,
    opened_addresses: Mutex<Vec<String>>,
    // Only the newest stream is kept, so pruned sessions release their bus streams.
    last_opened: Mutex<Option<Arc<MockBusStream>>>,
    refuse: bool,
}

impl MockStreamProvider {
    /// Creates a provider that opens every requested stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider that breaks its contract by never returning a stream.
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    /// Bus addresses of every stream opened so far, in order.
    pub fn opened_addresses(&self) -> Vec<String> {
        self.opened_addresses.lock().clone()
    }

    /// The most recently opened bus stream.
    ///
    /// Earlier streams are not retained; they live only as long as their
    /// sessions.
    pub fn last_opened(&self) -> Option<Arc<MockBusStream>> {
        self.last_opened.lock().clone()
    }

    /// Number of sessions registered, including ones not yet pruned.
    pub fn registered(&self) -> usize {
        self.streams.lock().len()
    }
}

impl StreamProvider for MockStreamProvider {
    fn open_output_stream(
        &self,
        bus_address: &str,
        config: BusConfig,
        flags: i32,
    ) -> Option<Arc<dyn BusOutputStream>> {
        if self.refuse {
            return None;
        }

        let stream = Arc::new(MockBusStream::new(bus_address, config, flags));
        self.opened_addresses.lock().push(bus_address.to_string());
        *self.last_opened.lock() = Some(Arc::clone(&stream));
        Some(stream)
    }

    fn on_stream_out_created(&self, stream: Weak<StreamOut>) {
        self.streams.lock().push(stream);
    }

    fn clean_and_count_stream_outs(&self) -> usize {
        let mut streams = self.streams.lock();
        streams.retain(|weak| weak.upgrade().is_some_and(|stream| !stream.is_closed()));
        streams.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{BusChannelMask, BusFormat};

    fn bus_config() -> BusConfig {
        BusConfig {
            format: BusFormat(1),
            sample_rate_hz: 48_000,
            channel_mask: BusChannelMask(3),
        }
    }

    fn open(provider: &MockStreamProvider) -> Arc<StreamOut> {
        let bus = provider.open_output_stream("bus0", bus_config(), 0).unwrap();
        let stream = Arc::new(StreamOut::new(bus, 10, 20));
        provider.on_stream_out_created(Arc::downgrade(&stream));
        stream
    }

    #[test]
    fn test_open_records_stream() {
        let provider = MockStreamProvider::new();
        let bus = provider.open_output_stream("bus1", bus_config(), 2).unwrap();

        assert_eq!(bus.address(), "bus1");
        assert_eq!(bus.flags(), 2);
        assert_eq!(provider.opened_addresses(), vec!["bus1".to_string()]);
        assert_eq!(provider.last_opened().unwrap().config(), bus_config());
    }

    #[test]
    fn test_refusing_provider_returns_none() {
        let provider = MockStreamProvider::refusing();
        assert!(provider.open_output_stream("bus0", bus_config(), 0).is_none());
        assert!(provider.opened_addresses().is_empty());
    }

    #[test]
    fn test_dropped_streams_are_pruned() {
        let provider = MockStreamProvider::new();
        let a = open(&provider);
        let b = open(&provider);
        assert_eq!(provider.clean_and_count_stream_outs(), 2);

        drop(a);
        assert_eq!(provider.registered(), 2);
        assert_eq!(provider.clean_and_count_stream_outs(), 1);
        assert_eq!(provider.registered(), 1);

        drop(b);
        assert_eq!(provider.clean_and_count_stream_outs(), 0);
    }

    #[test]
    fn test_earlier_bus_streams_not_retained() {
        let provider = MockStreamProvider::new();
        let first = open(&provider);
        let first_bus = Arc::downgrade(&provider.last_opened().unwrap());
        let _second = open(&provider);

        drop(first);
        assert_eq!(provider.clean_and_count_stream_outs(), 1);
        assert!(first_bus.upgrade().is_none());
        assert_eq!(provider.opened_addresses().len(), 2);
    }

    #[test]
    fn test_closed_streams_are_pruned() {
        let provider = MockStreamProvider::new();
        let stream = open(&provider);

        stream.close();
        assert_eq!(provider.clean_and_count_stream_outs(), 0);
    }
}
