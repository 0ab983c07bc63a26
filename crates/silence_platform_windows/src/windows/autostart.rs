//! Launch-at-login via the per-user `Run` key.

use std::path::Path;

use silence_platform::{AutostartControl, PlatformError, PlatformResult};
use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, WIN32_ERROR};
use windows::Win32::System::Registry::{
    HKEY_CURRENT_USER, REG_SZ, RRF_RT_REG_SZ, RegDeleteKeyValueW, RegGetValueW, RegSetKeyValueW,
};
use windows::core::PCWSTR;

use crate::win_api::to_wide_chars;

pub const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";
pub const RUN_VALUE_NAME: &str = "silence!";
pub const MINIMIZED_ARG: &str = "--minimized";

/// Registry command line that relaunches `exe` straight into the tray.
pub fn launch_command(exe: &Path) -> String {
    format!("\"{}\" {MINIMIZED_ARG}", exe.display())
}

fn registry_err(op: &str, status: WIN32_ERROR) -> PlatformError {
    PlatformError::Registry(format!("{op} failed with code {}", status.0))
}

/// [`AutostartControl`] writing `HKCU\...\Run\silence!`.
#[derive(Debug, Clone)]
pub struct RegistryAutostart {
    command: String,
}

impl RegistryAutostart {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn for_current_exe() -> PlatformResult<Self> {
        let exe = std::env::current_exe().map_err(|e| PlatformError::Init(e.to_string()))?;
        Ok(Self::new(launch_command(&exe)))
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl AutostartControl for RegistryAutostart {
    fn is_enabled(&self) -> PlatformResult<bool> {
        let key = to_wide_chars(RUN_KEY);
        let name = to_wide_chars(RUN_VALUE_NAME);
        let mut size = 0u32;
        let status = unsafe {
            RegGetValueW(
                HKEY_CURRENT_USER,
                PCWSTR(key.as_ptr()),
                PCWSTR(name.as_ptr()),
                RRF_RT_REG_SZ,
                None,
                None,
                Some(&mut size),
            )
        };
        if status.is_ok() {
            Ok(true)
        } else if status == ERROR_FILE_NOT_FOUND {
            Ok(false)
        } else {
            Err(registry_err("RegGetValueW", status))
        }
    }

    fn set_enabled(&self, enabled: bool) -> PlatformResult<()> {
        let key = to_wide_chars(RUN_KEY);
        let name = to_wide_chars(RUN_VALUE_NAME);

        if enabled {
            let value = to_wide_chars(&self.command);
            let status = unsafe {
                RegSetKeyValueW(
                    HKEY_CURRENT_USER,
                    PCWSTR(key.as_ptr()),
                    PCWSTR(name.as_ptr()),
                    REG_SZ.0,
                    Some(value.as_ptr().cast()),
                    (value.len() * std::mem::size_of::<u16>()) as u32,
                )
            };
            if status.is_err() {
                return Err(registry_err("RegSetKeyValueW", status));
            }
        } else {
            let status = unsafe {
                RegDeleteKeyValueW(
                    HKEY_CURRENT_USER,
                    PCWSTR(key.as_ptr()),
                    PCWSTR(name.as_ptr()),
                )
            };
            if status.is_err() && status != ERROR_FILE_NOT_FOUND {
                return Err(registry_err("RegDeleteKeyValueW", status));
            }
        }

        tracing::info!(enabled, "autostart updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn command_quotes_path() {
        let exe = PathBuf::from(r"C:\Program Files\silence\silence.exe");
        assert_eq!(
            launch_command(&exe),
            r#""C:\Program Files\silence\silence.exe" --minimized"#
        );
    }
}
