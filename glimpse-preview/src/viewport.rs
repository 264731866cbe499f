//! Viewport simulator: pure presentation state for device-preset sizing.
//!
//! The sandbox always renders at the preset's true pixel dimensions; the
//! scale factor shrinks or grows only the on-screen representation.

use serde::Serialize;

pub const MIN_SCALE: f32 = 0.25;
pub const MAX_SCALE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DevicePreset {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Built-in presets. "desktop" is fluid (100% of the surface) and shows no
/// device-frame chrome.
pub const DEVICE_PRESETS: &[DevicePreset] = &[
    DevicePreset { name: "desktop", width: 1280, height: 800 },
    DevicePreset { name: "laptop", width: 1366, height: 768 },
    DevicePreset { name: "tablet", width: 768, height: 1024 },
    DevicePreset { name: "phone", width: 375, height: 667 },
];

impl DevicePreset {
    pub fn by_name(name: &str) -> Option<&'static DevicePreset> {
        DEVICE_PRESETS.iter().find(|p| p.name == name)
    }

    pub fn is_fluid(&self) -> bool {
        self.name == "desktop"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    pub preset: DevicePreset,
    pub flipped: bool,
    pub scale: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            preset: DEVICE_PRESETS[0],
            flipped: false,
            scale: 1.0,
        }
    }
}

impl ViewportState {
    /// Switching presets resets orientation and scale; the fluid preset has
    /// neither.
    pub fn set_preset(&mut self, preset: DevicePreset) {
        self.preset = preset;
        self.flipped = false;
        self.scale = 1.0;
    }

    /// Swaps width/height. No-op for the fluid preset.
    pub fn flip(&mut self) {
        if !self.preset.is_fluid() {
            self.flipped = !self.flipped;
        }
    }

    /// Display-only zoom, clamped to [`MIN_SCALE`]..=[`MAX_SCALE`]. The
    /// fluid preset stays at 1.0.
    pub fn set_scale(&mut self, scale: f32) {
        if self.preset.is_fluid() {
            self.scale = 1.0;
        } else {
            self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        }
    }

    /// True pixel dimensions the sandbox renders at; `None` means fluid.
    pub fn render_size(&self) -> Option<(u32, u32)> {
        if self.preset.is_fluid() {
            return None;
        }
        if self.flipped {
            Some((self.preset.height, self.preset.width))
        } else {
            Some((self.preset.width, self.preset.height))
        }
    }

    /// On-screen dimensions after scaling; `None` means fluid.
    pub fn display_size(&self) -> Option<(f32, f32)> {
        self.render_size()
            .map(|(w, h)| (w as f32 * self.scale, h as f32 * self.scale))
    }

    /// Whether the host should draw device-frame chrome around the surface.
    pub fn device_chrome(&self) -> bool {
        !self.preset.is_fluid()
    }
}
