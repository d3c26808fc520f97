//! The proxy device exposed to the audio framework.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::bus::StreamProvider;
use crate::capability::{unsupported, Capability};
use crate::config::DeviceConfig;
use crate::error::{DeviceError, DeviceResult};
use crate::format::{to_bus_config, to_bus_flags, AudioConfig};
use crate::patch::{PatchHandle, PatchRegistry};
use crate::stream::StreamOut;
use crate::types::{
    AudioInputFlags, AudioOutputFlags, AudioPort, AudioPortConfig, AudioPortHandle,
    DeviceAddress, EffectId, MicrophoneInfo, ParameterValue,
};

/// An output stream returned by [`ProxyDevice::open_output_stream`].
#[derive(Debug, Clone)]
pub struct OpenedStream {
    /// The new session. The provider tracks it from here on.
    pub stream: Arc<StreamOut>,
    /// Configuration agreed with the framework; always the requested one.
    pub config: AudioConfig,
}

/// Input stream type of the proxy.
///
/// The proxy has no capture path, so no value of this type can exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStream {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Open,
    Closed,
}

/// Audio device that forwards output streams to a bus [`StreamProvider`].
///
/// The device opens output streams through the provider, tracks audio
/// patch handles, and declines every other capability (see
/// [`capability::UNSUPPORTED`](crate::capability::UNSUPPORTED)).
///
/// # Lifecycle
///
/// A device starts open. [`close()`](ProxyDevice::close) moves it to closed,
/// but only while the provider reports no live output streams. A closed
/// device refuses new streams; build a new device to start over.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use audio_proxy::{
///     AudioChannelMask, AudioConfig, AudioFormat, AudioOutputFlags, DeviceAddress,
///     DeviceConfig, DeviceError, MockStreamProvider, ProxyDevice,
/// };
///
/// let device = ProxyDevice::new(Arc::new(MockStreamProvider::new()), DeviceConfig::default());
///
/// let config = AudioConfig::new(AudioFormat::PCM_16_BIT, 48_000, AudioChannelMask::OUT_STEREO);
/// let opened = device
///     .open_output_stream(&DeviceAddress::bus("bus0_media_out"), &config, AudioOutputFlags::PRIMARY)
///     .unwrap();
/// assert_eq!(opened.config, config);
///
/// // The stream is still alive, so the device refuses to close.
/// assert!(matches!(device.close(), Err(DeviceError::InvalidState { live_streams: 1 })));
///
/// opened.stream.close();
/// assert!(device.close().is_ok());
/// ```
pub struct ProxyDevice {
    provider: Arc<dyn StreamProvider>,
    config: DeviceConfig,
    patches: PatchRegistry,
    lifecycle: Mutex<Lifecycle>,
}

impl ProxyDevice {
    /// Creates an open device backed by `provider`.
    pub fn new(provider: Arc<dyn StreamProvider>, config: DeviceConfig) -> Self {
        tracing::debug!(
            buffer_size_ms = config.buffer_size_ms,
            latency_ms = config.latency_ms,
            "proxy device created"
        );
        Self {
            provider,
            config,
            patches: PatchRegistry::new(),
            lifecycle: Mutex::new(Lifecycle::Open),
        }
    }

    /// Settings applied to every stream this device opens.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// The device's patch registry.
    pub fn patches(&self) -> &PatchRegistry {
        &self.patches
    }

    /// Returns `true` after a successful [`close()`](ProxyDevice::close).
    pub fn is_closed(&self) -> bool {
        *self.lifecycle.lock() == Lifecycle::Closed
    }

    /// The device needs no initialization and always reports ready.
    pub fn init_check(&self) -> DeviceResult<()> {
        Ok(())
    }

    /// Opens an output stream on the bus named by `address`.
    ///
    /// The framework configuration is translated for the bus and passed on
    /// unchanged; the proxy never renegotiates it, so the returned
    /// [`OpenedStream::config`] always equals `config`.
    ///
    /// # Errors
    ///
    /// [`DeviceError::DeviceClosed`] if the device was already closed.
    ///
    /// # Panics
    ///
    /// Panics if the provider returns no bus stream. The provider must always
    /// produce one, and the device has no fallback.
    pub fn open_output_stream(
        &self,
        address: &DeviceAddress,
        config: &AudioConfig,
        flags: AudioOutputFlags,
    ) -> DeviceResult<OpenedStream> {
        let lifecycle = self.lifecycle.lock();
        if *lifecycle == Lifecycle::Closed {
            tracing::warn!(address = %address.bus_address, "stream open on closed device");
            return Err(DeviceError::DeviceClosed);
        }

        let bus_config = to_bus_config(config);
        let Some(bus_stream) = self.provider.open_output_stream(
            &address.bus_address,
            bus_config,
            to_bus_flags(flags),
        ) else {
            tracing::error!(address = %address.bus_address, %bus_config, "provider returned no bus stream");
            panic!(
                "stream provider returned no bus stream for {}",
                address.bus_address
            );
        };

        let stream = Arc::new(StreamOut::new(
            bus_stream,
            self.config.buffer_size_ms,
            self.config.latency_ms,
        ));
        self.provider.on_stream_out_created(Arc::downgrade(&stream));
        drop(lifecycle);

        tracing::info!(
            address = %address.bus_address,
            %config,
            flags = flags.bits(),
            "output stream opened"
        );
        Ok(OpenedStream {
            stream,
            config: *config,
        })
    }

    /// Input streams are not supported.
    pub fn open_input_stream(
        &self,
        _address: &DeviceAddress,
        _config: &AudioConfig,
        _flags: AudioInputFlags,
    ) -> DeviceResult<InputStream> {
        unsupported(Capability::OpenInputStream)
    }

    /// Closes the device if no output streams are live.
    ///
    /// The provider prunes dead sessions and counts the rest on every call.
    ///
    /// # Errors
    ///
    /// [`DeviceError::InvalidState`] while the provider still reports live
    /// streams. The device stays open.
    pub fn close(&self) -> DeviceResult<()> {
        let mut lifecycle = self.lifecycle.lock();
        let live_streams = self.provider.clean_and_count_stream_outs();
        if live_streams > 0 {
            tracing::warn!(live_streams, "close refused, output streams still open");
            return Err(DeviceError::InvalidState { live_streams });
        }

        if *lifecycle == Lifecycle::Open {
            tracing::info!("proxy device closed");
        }
        *lifecycle = Lifecycle::Closed;
        Ok(())
    }

    /// The proxy always supports audio patches.
    pub fn supports_audio_patches(&self) -> bool {
        self.patches.supports_patches()
    }

    /// Creates a patch. No audio is rerouted.
    pub fn create_audio_patch(
        &self,
        sources: &[AudioPortConfig],
        sinks: &[AudioPortConfig],
    ) -> DeviceResult<PatchHandle> {
        self.patches.create(sources, sinks)
    }

    /// Releases a patch.
    ///
    /// # Errors
    ///
    /// [`DeviceError::InvalidArgument`] if `patch` is not open.
    pub fn release_audio_patch(&self, patch: PatchHandle) -> DeviceResult<()> {
        self.patches.release(patch)
    }

    /// Replaces `previous` with a new patch.
    ///
    /// # Errors
    ///
    /// [`DeviceError::InvalidArgument`] if `previous` is not open.
    pub fn update_audio_patch(
        &self,
        previous: PatchHandle,
        sources: &[AudioPortConfig],
        sinks: &[AudioPortConfig],
    ) -> DeviceResult<PatchHandle> {
        self.patches.update(previous, sources, sinks)
    }

    /// Connection state is not tracked; always succeeds.
    pub fn set_connected_state(&self, address: &DeviceAddress, connected: bool) -> DeviceResult<()> {
        tracing::debug!(address = %address.bus_address, connected, "connected state ignored");
        Ok(())
    }

    /// Volume is applied by the software mixer instead.
    pub fn set_master_volume(&self, _volume: f32) -> DeviceResult<()> {
        unsupported(Capability::SetMasterVolume)
    }

    /// Not supported.
    pub fn get_master_volume(&self) -> DeviceResult<f32> {
        unsupported(Capability::GetMasterVolume)
    }

    /// The proxy has no microphone.
    pub fn set_mic_mute(&self, _mute: bool) -> DeviceResult<()> {
        unsupported(Capability::SetMicMute)
    }

    /// The proxy has no microphone.
    pub fn get_mic_mute(&self) -> DeviceResult<bool> {
        unsupported(Capability::GetMicMute)
    }

    /// Muting is left to the software mixer.
    pub fn set_master_mute(&self, _mute: bool) -> DeviceResult<()> {
        unsupported(Capability::SetMasterMute)
    }

    /// Not supported.
    pub fn get_master_mute(&self) -> DeviceResult<bool> {
        unsupported(Capability::GetMasterMute)
    }

    /// Not supported; there is no input path.
    pub fn get_input_buffer_size(&self, _config: &AudioConfig) -> DeviceResult<u64> {
        unsupported(Capability::GetInputBufferSize)
    }

    /// Not supported. Reply with [`Reply::or`](crate::Reply::or) to echo
    /// the queried port back to the framework.
    pub fn get_audio_port(&self, _port: &AudioPort) -> DeviceResult<AudioPort> {
        unsupported(Capability::GetAudioPort)
    }

    /// Not supported.
    pub fn set_audio_port_config(&self, _config: &AudioPortConfig) -> DeviceResult<()> {
        unsupported(Capability::SetAudioPortConfig)
    }

    /// Not supported.
    pub fn get_hw_av_sync(&self) -> DeviceResult<u32> {
        unsupported(Capability::GetHwAvSync)
    }

    /// Not supported.
    pub fn set_screen_state(&self, _turned_on: bool) -> DeviceResult<()> {
        unsupported(Capability::SetScreenState)
    }

    /// Vendor parameters are not supported.
    pub fn get_parameters(
        &self,
        _context: &[ParameterValue],
        _keys: &[String],
    ) -> DeviceResult<Vec<ParameterValue>> {
        unsupported(Capability::GetParameters)
    }

    /// Vendor parameters are not supported.
    pub fn set_parameters(
        &self,
        _context: &[ParameterValue],
        _parameters: &[ParameterValue],
    ) -> DeviceResult<()> {
        unsupported(Capability::SetParameters)
    }

    /// The proxy has no microphones to report.
    pub fn get_microphones(&self) -> DeviceResult<Vec<MicrophoneInfo>> {
        unsupported(Capability::GetMicrophones)
    }

    /// Device effects are not supported.
    pub fn add_device_effect(&self, _device: AudioPortHandle, _effect: EffectId) -> DeviceResult<()> {
        unsupported(Capability::AddDeviceEffect)
    }

    /// Device effects are not supported.
    pub fn remove_device_effect(
        &self,
        _device: AudioPortHandle,
        _effect: EffectId,
    ) -> DeviceResult<()> {
        unsupported(Capability::RemoveDeviceEffect)
    }
}

impl fmt::Debug for ProxyDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyDevice")
            .field("config", &self.config)
            .field("patches", &self.patches)
            .field("lifecycle", &*self.lifecycle.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::BusOutputStream;
    use crate::capability::UNSUPPORTED;
    use crate::format::{AudioChannelMask, AudioFormat};
    use crate::provider::MockStreamProvider;
    use crate::reply::{Reply, Status};

    fn device() -> (Arc<MockStreamProvider>, ProxyDevice) {
        let provider = Arc::new(MockStreamProvider::new());
        let device = ProxyDevice::new(provider.clone(), DeviceConfig::default());
        (provider, device)
    }

    fn stereo_48k() -> AudioConfig {
        AudioConfig::new(AudioFormat::PCM_16_BIT, 48_000, AudioChannelMask::OUT_STEREO)
    }

    #[test]
    fn test_init_check() {
        let (_, device) = device();
        assert!(device.init_check().is_ok());
        assert!(!device.is_closed());
    }

    #[test]
    fn test_open_output_stream_echoes_config() {
        let (provider, device) = device();
        let config = AudioConfig::new(AudioFormat::PCM_FLOAT, 44_100, AudioChannelMask::OUT_5POINT1);

        let opened = device
            .open_output_stream(&DeviceAddress::bus("bus1"), &config, AudioOutputFlags::DIRECT)
            .unwrap();

        assert_eq!(opened.config, config);
        let bus = provider.last_opened().unwrap();
        assert_eq!(bus.address(), "bus1");
        assert_eq!(bus.config(), to_bus_config(&config));
        assert_eq!(bus.flags(), 1);
    }

    #[test]
    fn test_stream_uses_device_settings() {
        let provider = Arc::new(MockStreamProvider::new());
        let device = ProxyDevice::new(
            provider,
            DeviceConfig {
                buffer_size_ms: 5,
                latency_ms: 30,
            },
        );

        let opened = device
            .open_output_stream(&DeviceAddress::bus("bus0"), &stereo_48k(), AudioOutputFlags::NONE)
            .unwrap();

        assert_eq!(opened.stream.buffer_size_ms(), 5);
        assert_eq!(opened.stream.latency_ms(), 30);
        assert_eq!(opened.stream.buffer_size_frames(), 240);
    }

    #[test]
    fn test_open_registers_with_provider() {
        let (provider, device) = device();
        let _opened = device
            .open_output_stream(&DeviceAddress::bus("bus0"), &stereo_48k(), AudioOutputFlags::NONE)
            .unwrap();

        assert_eq!(provider.registered(), 1);
        assert_eq!(provider.clean_and_count_stream_outs(), 1);
    }

    #[test]
    #[should_panic(expected = "no bus stream")]
    fn test_missing_bus_stream_panics() {
        let device = ProxyDevice::new(
            Arc::new(MockStreamProvider::refusing()),
            DeviceConfig::default(),
        );
        let _ = device.open_output_stream(
            &DeviceAddress::bus("bus0"),
            &stereo_48k(),
            AudioOutputFlags::NONE,
        );
    }

    #[test]
    fn test_open_input_stream_not_supported() {
        let (_, device) = device();
        let result = device.open_input_stream(
            &DeviceAddress::bus("mic"),
            &stereo_48k(),
            AudioInputFlags::default(),
        );

        assert_eq!(
            result,
            Err(DeviceError::NotSupported {
                capability: Capability::OpenInputStream
            })
        );
        let reply = Reply::from(result.map(Some));
        assert_eq!(reply.status, Status::NotSupported);
        assert!(reply.value.is_none());
    }

    #[test]
    fn test_close_without_streams() {
        let (_, device) = device();
        assert!(device.close().is_ok());
        assert!(device.is_closed());
        // A second close re-checks and still succeeds.
        assert!(device.close().is_ok());
    }

    #[test]
    fn test_close_refused_with_live_stream() {
        let (_, device) = device();
        let opened = device
            .open_output_stream(&DeviceAddress::bus("bus0"), &stereo_48k(), AudioOutputFlags::NONE)
            .unwrap();

        assert_eq!(
            device.close(),
            Err(DeviceError::InvalidState { live_streams: 1 })
        );
        assert!(!device.is_closed());

        drop(opened);
        assert!(device.close().is_ok());
    }

    #[test]
    fn test_closed_device_refuses_streams() {
        let (provider, device) = device();
        device.close().unwrap();

        let result = device.open_output_stream(
            &DeviceAddress::bus("bus0"),
            &stereo_48k(),
            AudioOutputFlags::NONE,
        );
        assert!(matches!(result, Err(DeviceError::DeviceClosed)));
        assert!(provider.opened_addresses().is_empty());
    }

    #[test]
    fn test_patch_pass_through() {
        let (_, device) = device();
        assert!(device.supports_audio_patches());

        let a = device.create_audio_patch(&[], &[]).unwrap();
        let b = device.update_audio_patch(a, &[], &[]).unwrap();
        assert_eq!(
            device.release_audio_patch(a),
            Err(DeviceError::InvalidArgument { handle: a })
        );
        device.release_audio_patch(b).unwrap();
        assert!(device.patches().is_empty());
    }

    #[test]
    fn test_set_connected_state_accepted() {
        let (_, device) = device();
        assert!(device
            .set_connected_state(&DeviceAddress::bus("bus0"), true)
            .is_ok());
        assert!(device
            .set_connected_state(&DeviceAddress::bus("bus0"), false)
            .is_ok());
    }

    #[test]
    fn test_stub_replies_use_defaults() {
        let (_, device) = device();

        let volume = Reply::from(device.get_master_volume());
        assert_eq!(volume.status, Status::NotSupported);
        assert!(volume.value.abs() < f32::EPSILON);

        assert!(!Reply::from(device.get_mic_mute()).value);
        assert!(!Reply::from(device.get_master_mute()).value);
        assert_eq!(Reply::from(device.get_input_buffer_size(&stereo_48k())).value, 0);
        assert_eq!(Reply::from(device.get_hw_av_sync()).value, 0);
        assert!(Reply::from(device.get_parameters(&[], &["k".to_string()])).value.is_empty());
        assert!(Reply::from(device.get_microphones()).value.is_empty());
    }

    #[test]
    fn test_get_audio_port_echoes_port() {
        let (_, device) = device();
        let port = AudioPort {
            id: 3,
            name: "bus0".to_string(),
        };

        let reply = Reply::or(device.get_audio_port(&port), port.clone());
        assert_eq!(reply.status, Status::NotSupported);
        assert_eq!(reply.value, port);
    }

    #[test]
    fn test_every_stub_declines() {
        let (_, device) = device();
        let address = DeviceAddress::bus("bus0");
        let results: Vec<(Capability, Status)> = vec![
            (Capability::SetMasterVolume, Status::from(&device.set_master_volume(0.5))),
            (Capability::GetMasterVolume, Status::from(&device.get_master_volume())),
            (Capability::SetMicMute, Status::from(&device.set_mic_mute(true))),
            (Capability::GetMicMute, Status::from(&device.get_mic_mute())),
            (Capability::SetMasterMute, Status::from(&device.set_master_mute(true))),
            (Capability::GetMasterMute, Status::from(&device.get_master_mute())),
            (
                Capability::GetInputBufferSize,
                Status::from(&device.get_input_buffer_size(&stereo_48k())),
            ),
            (
                Capability::OpenInputStream,
                Status::from(&device.open_input_stream(
                    &address,
                    &stereo_48k(),
                    AudioInputFlags::default(),
                )),
            ),
            (
                Capability::GetAudioPort,
                Status::from(&device.get_audio_port(&AudioPort::default())),
            ),
            (
                Capability::SetAudioPortConfig,
                Status::from(&device.set_audio_port_config(&AudioPortConfig::default())),
            ),
            (Capability::GetHwAvSync, Status::from(&device.get_hw_av_sync())),
            (Capability::SetScreenState, Status::from(&device.set_screen_state(true))),
            (Capability::GetParameters, Status::from(&device.get_parameters(&[], &[]))),
            (Capability::SetParameters, Status::from(&device.set_parameters(&[], &[]))),
            (Capability::GetMicrophones, Status::from(&device.get_microphones())),
            (Capability::AddDeviceEffect, Status::from(&device.add_device_effect(1, 2))),
            (
                Capability::RemoveDeviceEffect,
                Status::from(&device.remove_device_effect(1, 2)),
            ),
        ];

        let covered: Vec<Capability> = results.iter().map(|(c, _)| *c).collect();
        assert_eq!(covered, UNSUPPORTED);
        assert!(results.iter().all(|(_, s)| *s == Status::NotSupported));
        // Declining never changes device state.
        assert!(!device.is_closed());
        assert!(device.patches().is_empty());
    }
}
