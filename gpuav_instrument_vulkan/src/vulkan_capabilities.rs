/// Capability detection from the device's enabled extension list

use ash::vk;
use gpuav_instrument::gpuav::DeviceCapabilities;
use std::ffi::CStr;

/// Instrumentation-relevant extensions enabled on a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceExtensions {
    pub push_descriptor: bool,
    pub shader_object: bool,
    pub ext_buffer_device_address: bool,
    pub khr_buffer_device_address: bool,
}

impl DeviceExtensions {
    /// Scan the names passed in `VkDeviceCreateInfo::ppEnabledExtensionNames`
    pub fn from_names(enabled_extensions: &[&CStr]) -> Self {
        let has = |name: &CStr| enabled_extensions.iter().any(|enabled| *enabled == name);
        Self {
            push_descriptor: has(ash::khr::push_descriptor::NAME),
            shader_object: has(ash::ext::shader_object::NAME),
            ext_buffer_device_address: has(ash::ext::buffer_device_address::NAME),
            khr_buffer_device_address: has(ash::khr::buffer_device_address::NAME),
        }
    }
}

/// Build `DeviceCapabilities` for a device
///
/// # Arguments
///
/// * `api_version` - Version the device was created with (`VkApplicationInfo::apiVersion`
///   clamped to the physical device's version)
/// * `enabled_extensions` - Enabled device extension names
pub fn device_capabilities(api_version: u32, enabled_extensions: &[&CStr]) -> DeviceCapabilities {
    let extensions = DeviceExtensions::from_names(enabled_extensions);
    DeviceCapabilities {
        api_version,
        ext_buffer_device_address: extensions.ext_buffer_device_address,
        khr_buffer_device_address: extensions.khr_buffer_device_address,
    }
}

/// Whether `api_version` exposes the core `vkGetBufferDeviceAddress`
pub(crate) fn has_core_buffer_device_address(api_version: u32) -> bool {
    api_version >= vk::API_VERSION_1_2
}

#[cfg(test)]
#[path = "vulkan_capabilities_tests.rs"]
mod tests;
