/*!
# GPU-AV Command Instrumentation - Vulkan Backend

Vulkan implementation of the gpuav_instrument dispatch traits.

This crate forwards restore and diagnostic-bind calls to the driver using the
Ash library for Vulkan bindings. Extension entry points (push descriptors,
shader objects, buffer device address) are loaded only when the matching
extension is enabled on the device.
*/

mod vulkan_capabilities;
mod vulkan_convert;
mod vulkan_dispatch;

// Main gpuav namespace module
pub mod gpuav {
    pub use crate::vulkan_capabilities::{device_capabilities, DeviceExtensions};
    pub use crate::vulkan_dispatch::VulkanDispatcher;
}
