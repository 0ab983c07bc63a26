//! Capture endpoint mute through Core Audio.
//!
//! Endpoints are resolved on every call, so a headset plugged in after start-up or a new
//! default device is picked up without restarting. COM must already be initialized on the
//! calling thread.

use std::ffi::c_void;

use silence_platform::{AudioDevice, MicrophoneControl, PlatformError, PlatformResult};
use windows::Win32::Devices::FunctionDiscovery::PKEY_Device_FriendlyName;
use windows::Win32::Media::Audio::Endpoints::IAudioEndpointVolume;
use windows::Win32::Media::Audio::{
    DEVICE_STATE_ACTIVE, IMMDevice, IMMDeviceEnumerator, MMDeviceEnumerator, eCapture, eConsole,
};
use windows::Win32::System::Com::{CLSCTX_ALL, CoCreateInstance, CoTaskMemFree, STGM_READ};
use windows::core::PCWSTR;

use crate::win_api::to_wide_chars;

fn audio_err(e: windows::core::Error) -> PlatformError {
    PlatformError::Audio(format!("{e:?}"))
}

/// [`MicrophoneControl`] over `IAudioEndpointVolume`.
#[derive(Debug, Default)]
pub struct CoreAudioMicrophone {
    device_id: Option<String>,
}

impl CoreAudioMicrophone {
    pub fn new(device_id: Option<String>) -> Self {
        Self { device_id }
    }

    fn enumerator() -> PlatformResult<IMMDeviceEnumerator> {
        unsafe { CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL) }.map_err(audio_err)
    }

    fn default_capture(enumerator: &IMMDeviceEnumerator) -> PlatformResult<IMMDevice> {
        unsafe { enumerator.GetDefaultAudioEndpoint(eCapture, eConsole) }
            .map_err(|_| PlatformError::NoCaptureDevice)
    }

    /// The selected device if it is still present, otherwise the default capture endpoint.
    fn device(&self) -> PlatformResult<IMMDevice> {
        let enumerator = Self::enumerator()?;
        if let Some(id) = &self.device_id {
            let wide = to_wide_chars(id);
            match unsafe { enumerator.GetDevice(PCWSTR(wide.as_ptr())) } {
                Ok(device) => return Ok(device),
                Err(e) => {
                    tracing::warn!(device = %id, "selected microphone unavailable, using default: {e:?}");
                }
            }
        }
        Self::default_capture(&enumerator)
    }

    fn endpoint(&self) -> PlatformResult<IAudioEndpointVolume> {
        let device = self.device()?;
        unsafe { device.Activate::<IAudioEndpointVolume>(CLSCTX_ALL, None) }.map_err(audio_err)
    }

    fn device_id(device: &IMMDevice) -> PlatformResult<String> {
        unsafe {
            let raw = device.GetId().map_err(audio_err)?;
            let id = raw.to_string();
            CoTaskMemFree(Some(raw.0 as *const c_void));
            id.map_err(|e| PlatformError::Audio(e.to_string()))
        }
    }

    fn friendly_name(device: &IMMDevice) -> Option<String> {
        unsafe {
            let store = device.OpenPropertyStore(STGM_READ).ok()?;
            let value = store.GetValue(&PKEY_Device_FriendlyName).ok()?;
            let name = value.to_string();
            (!name.is_empty()).then_some(name)
        }
    }
}

impl MicrophoneControl for CoreAudioMicrophone {
    fn is_muted(&self) -> PlatformResult<bool> {
        let endpoint = self.endpoint()?;
        unsafe { endpoint.GetMute() }
            .map(|muted| muted.as_bool())
            .map_err(audio_err)
    }

    fn toggle_mute(&self) -> PlatformResult<bool> {
        let endpoint = self.endpoint()?;
        let muted = unsafe { endpoint.GetMute() }.map_err(audio_err)?.as_bool();
        let target = !muted;
        unsafe { endpoint.SetMute(target.into(), std::ptr::null()) }.map_err(audio_err)?;
        tracing::debug!(muted = target, "microphone mute toggled");
        Ok(target)
    }

    fn devices(&self) -> PlatformResult<Vec<AudioDevice>> {
        let enumerator = Self::enumerator()?;
        let collection = unsafe { enumerator.EnumAudioEndpoints(eCapture, DEVICE_STATE_ACTIVE) }
            .map_err(audio_err)?;
        let count = unsafe { collection.GetCount() }.map_err(audio_err)?;

        let mut devices = Vec::with_capacity(count as usize);
        for index in 0..count {
            let device = unsafe { collection.Item(index) }.map_err(audio_err)?;
            let id = Self::device_id(&device)?;
            let name = Self::friendly_name(&device).unwrap_or_else(|| id.clone());
            devices.push(AudioDevice { id, name });
        }
        Ok(devices)
    }

    fn select_device(&mut self, id: Option<String>) {
        self.device_id = id;
    }
}
