// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Identifies the platform the runtime executes on and the platform whose
//! bundles it should download.
//!
//! Editors download the bundles of the matching desktop player, so the two
//! enums differ only in the editor variants. Numeric values follow the host's
//! platform table and are shared between both enums.

/// The platform the host reports at runtime, editors included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RuntimePlatform {
    /// macOS editor.
    OsxEditor = 0,
    /// macOS standalone player.
    OsxPlayer = 1,
    /// Windows standalone player.
    WindowsPlayer = 2,
    /// Windows editor.
    WindowsEditor = 7,
    /// iOS player.
    IPhonePlayer = 8,
    /// Android player.
    Android = 11,
    /// Linux standalone player.
    LinuxPlayer = 13,
    /// Linux editor.
    LinuxEditor = 16,
    /// WebGL player.
    WebGlPlayer = 17,
}

/// The platform whose content is downloaded from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DevicePlatform {
    /// macOS standalone player.
    OsxPlayer = 1,
    /// Windows standalone player.
    WindowsPlayer = 2,
    /// iOS player.
    IPhonePlayer = 8,
    /// Android player.
    Android = 11,
    /// Linux standalone player.
    LinuxPlayer = 13,
    /// WebGL player.
    WebGlPlayer = 17,
}

impl RuntimePlatform {
    /// Returns the player platform matching the compilation target.
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            RuntimePlatform::IPhonePlayer
        } else if cfg!(target_os = "android") {
            RuntimePlatform::Android
        } else if cfg!(target_arch = "wasm32") {
            RuntimePlatform::WebGlPlayer
        } else if cfg!(target_os = "macos") {
            RuntimePlatform::OsxPlayer
        } else if cfg!(target_os = "windows") {
            RuntimePlatform::WindowsPlayer
        } else {
            RuntimePlatform::LinuxPlayer
        }
    }

    /// Returns `true` for editor platforms.
    pub fn is_editor(self) -> bool {
        matches!(
            self,
            RuntimePlatform::OsxEditor | RuntimePlatform::WindowsEditor | RuntimePlatform::LinuxEditor
        )
    }
}

impl From<RuntimePlatform> for DevicePlatform {
    fn from(platform: RuntimePlatform) -> Self {
        match platform {
            RuntimePlatform::OsxEditor | RuntimePlatform::OsxPlayer => DevicePlatform::OsxPlayer,
            RuntimePlatform::WindowsEditor | RuntimePlatform::WindowsPlayer => {
                DevicePlatform::WindowsPlayer
            }
            RuntimePlatform::LinuxEditor | RuntimePlatform::LinuxPlayer => {
                DevicePlatform::LinuxPlayer
            }
            RuntimePlatform::IPhonePlayer => DevicePlatform::IPhonePlayer,
            RuntimePlatform::Android => DevicePlatform::Android,
            RuntimePlatform::WebGlPlayer => DevicePlatform::WebGlPlayer,
        }
    }
}

impl DevicePlatform {
    /// Returns the host's numeric identifier for this platform.
    pub fn id(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editors_map_to_players() {
        assert_eq!(
            DevicePlatform::from(RuntimePlatform::WindowsEditor),
            DevicePlatform::WindowsPlayer
        );
        assert_eq!(
            DevicePlatform::from(RuntimePlatform::OsxEditor),
            DevicePlatform::OsxPlayer
        );
        assert_eq!(
            DevicePlatform::from(RuntimePlatform::LinuxEditor),
            DevicePlatform::LinuxPlayer
        );
    }

    #[test]
    fn players_keep_their_numeric_value() {
        for platform in [
            RuntimePlatform::OsxPlayer,
            RuntimePlatform::WindowsPlayer,
            RuntimePlatform::IPhonePlayer,
            RuntimePlatform::Android,
            RuntimePlatform::LinuxPlayer,
            RuntimePlatform::WebGlPlayer,
        ] {
            assert_eq!(DevicePlatform::from(platform).id(), platform as i32);
        }
    }

    #[test]
    fn current_is_never_an_editor() {
        assert!(!RuntimePlatform::current().is_editor());
    }
}
