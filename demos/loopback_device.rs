//! Drives a proxy device against the in-memory provider.
//!
//! Run with: RUST_LOG=audio_proxy=debug cargo run --example loopback_device

use std::sync::Arc;

use audio_proxy::{
    AudioChannelMask, AudioConfig, AudioFormat, AudioOutputFlags, DeviceAddress, DeviceConfig,
    MockStreamProvider, ProxyDevice, Reply,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let provider = Arc::new(MockStreamProvider::new());
    let device = ProxyDevice::new(
        provider.clone(),
        DeviceConfig {
            buffer_size_ms: 20,
            ..Default::default()
        },
    );
    device.init_check()?;

    let config = AudioConfig::new(AudioFormat::PCM_16_BIT, 48_000, AudioChannelMask::OUT_STEREO);
    let media = device.open_output_stream(
        &DeviceAddress::bus("bus0_media_out"),
        &config,
        AudioOutputFlags::PRIMARY,
    )?;
    let nav = device.open_output_stream(
        &DeviceAddress::bus("bus1_navigation_out"),
        &config,
        AudioOutputFlags::NONE,
    )?;
    println!(
        "Opened {:?}, {} frames per buffer",
        provider.opened_addresses(),
        media.stream.buffer_size_frames()
    );

    let patch = device.create_audio_patch(&[], &[])?;
    let patch = device.update_audio_patch(patch, &[], &[])?;
    println!("Patch handle: {patch}");

    let volume = Reply::from(device.get_master_volume());
    println!("getMasterVolume -> {} ({})", volume.status, volume.value);

    if let Err(e) = device.close() {
        println!("close refused: {e}");
    }

    media.stream.close();
    drop(nav);
    device.release_audio_patch(patch)?;
    device.close()?;
    println!("Device closed");

    Ok(())
}
