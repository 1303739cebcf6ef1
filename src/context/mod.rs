//! Graphics device boundary
//!
//! Devices claim blend states by binding them. [`HeadlessDevice`] works
//! without a GPU; [`WgpuContext`] wraps a real wgpu device and queue.

use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "context")]
use std::sync::Arc;

use crate::core::BlendState;

static NEXT_DEVICE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(u64);

impl DeviceId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_DEVICE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

/// A device that consumes blend states.
pub trait GraphicsDevice {
    /// Identifier recorded on every blend state this device binds.
    fn device_id(&self) -> DeviceId;

    /// Activate `state` for pipeline configuration.
    ///
    /// The state is frozen from here on. Shared presets are built frozen and
    /// are read directly; they never record a device (`device()` stays `None`).
    fn apply_blend_state(&self, state: &mut BlendState) {
        state.bind(self.device_id());
    }
}

/// A device without a GPU behind it.
///
/// Useful for tools and tests that configure pipelines without rendering.
#[derive(Debug)]
pub struct HeadlessDevice {
    id: DeviceId,
}

impl HeadlessDevice {
    /// Create a headless device with a fresh id.
    pub fn new() -> Self {
        Self { id: DeviceId::next() }
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn device_id(&self) -> DeviceId {
        self.id
    }
}

/// Core wgpu context containing device and queue.
///
/// Adapter and device creation belong to the application; this wrapper only
/// gives the pair an identity blend states can be bound to.
#[cfg(feature = "context")]
#[derive(Clone)]
pub struct WgpuContext {
    /// The wgpu device for creating GPU resources.
    pub device: Arc<wgpu::Device>,
    /// The wgpu queue for submitting commands.
    pub queue: Arc<wgpu::Queue>,
    id: DeviceId,
}

#[cfg(feature = "context")]
impl WgpuContext {
    /// Create a new context from existing device and queue.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            id: DeviceId::next(),
        }
    }
}

#[cfg(feature = "context")]
impl GraphicsDevice for WgpuContext {
    fn device_id(&self) -> DeviceId {
        self.id
    }
}

#[cfg(feature = "context")]
impl std::fmt::Debug for WgpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuContext").field("id", &self.id).finish()
    }
}
