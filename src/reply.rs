//! Status codes and replies for the framework dispatch layer.
//!
//! The framework expects every device call to answer with a status code and,
//! for getters, a payload even when the call fails. [`Reply`] bridges the
//! crate's `Result`-based API to that shape.

use std::fmt;

use crate::error::DeviceResult;

/// Status code reported to the audio framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// The call succeeded.
    #[default]
    Ok,
    /// The capability is not implemented by this device.
    NotSupported,
    /// An argument referenced something that does not exist.
    InvalidArguments,
    /// The device is not in a state that allows the call.
    InvalidState,
}

impl Status {
    /// Returns `true` for [`Status::Ok`].
    #[must_use]
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::NotSupported => "NOT_SUPPORTED",
            Self::InvalidArguments => "INVALID_ARGUMENTS",
            Self::InvalidState => "INVALID_STATE",
        };
        f.write_str(name)
    }
}

impl<T> From<&DeviceResult<T>> for Status {
    fn from(result: &DeviceResult<T>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(err) => err.status(),
        }
    }
}

/// A status code paired with the payload handed back to the framework.
///
/// # Example
///
/// ```
/// use audio_proxy::{Reply, Status};
///
/// let device = audio_proxy::ProxyDevice::new(
///     std::sync::Arc::new(audio_proxy::MockStreamProvider::new()),
///     audio_proxy::DeviceConfig::default(),
/// );
///
/// let reply = Reply::from(device.get_master_volume());
/// assert_eq!(reply.status, Status::NotSupported);
/// assert_eq!(reply.value, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    /// Outcome of the call.
    pub status: Status,
    /// Payload; a fallback value when `status` is not [`Status::Ok`].
    pub value: T,
}

impl<T> Reply<T> {
    /// Builds a reply, using `fallback` as the payload if the call failed.
    pub fn or(result: DeviceResult<T>, fallback: T) -> Self {
        match result {
            Ok(value) => Self {
                status: Status::Ok,
                value,
            },
            Err(err) => Self {
                status: err.status(),
                value: fallback,
            },
        }
    }
}

impl<T: Default> From<DeviceResult<T>> for Reply<T> {
    fn from(result: DeviceResult<T>) -> Self {
        Self::or(result, T::default())
    }
}
