/// VulkanDispatcher - CommandDispatch / BufferAddressDispatch over ash

use ash::vk;
use gpuav_instrument::gpuav::dispatch::{BufferAddressDispatch, CommandDispatch};
use gpuav_instrument::gpuav::state::{BindPoint, PushDescriptorWrite};
use gpuav_instrument::gpuav::{AddressResolver, DeviceCapabilities, Error, Result};
use gpuav_instrument::{gpuav_error, gpuav_info};
use std::ffi::CStr;

use crate::vulkan_capabilities::{device_capabilities, has_core_buffer_device_address, DeviceExtensions};
use crate::vulkan_convert::{lower_writes, to_vk_writes};

const SOURCE: &str = "gpuav::vulkan";

/// Vulkan dispatcher
///
/// Forwards every call to the driver unchanged. Entry points of extensions
/// that are not enabled are never loaded; calls that need them are dropped
/// and logged.
pub struct VulkanDispatcher {
    /// Vulkan device
    device: ash::Device,
    /// Capabilities used for address resolution
    capabilities: DeviceCapabilities,
    /// VK_KHR_push_descriptor entry points
    push_descriptor: Option<ash::khr::push_descriptor::Device>,
    /// VK_EXT_shader_object entry points
    shader_object: Option<ash::ext::shader_object::Device>,
    /// VK_KHR_buffer_device_address entry points
    buffer_device_address_khr: Option<ash::khr::buffer_device_address::Device>,
    /// VK_EXT_buffer_device_address function table
    buffer_device_address_ext: Option<ash::ext::buffer_device_address::DeviceFn>,
}

impl VulkanDispatcher {
    /// Create a dispatcher for `device`
    ///
    /// # Arguments
    ///
    /// * `instance` - Instance the device was created from (used to load extension entry points)
    /// * `device` - Vulkan logical device
    /// * `api_version` - API version the device was created with
    /// * `enabled_extensions` - Device extensions enabled at creation
    ///
    /// # Errors
    ///
    /// `Error::BackendError` if an enabled extension's entry point cannot be
    /// resolved on `device`.
    pub fn new(
        instance: &ash::Instance,
        device: ash::Device,
        api_version: u32,
        enabled_extensions: &[&CStr],
    ) -> Result<Self> {
        let extensions = DeviceExtensions::from_names(enabled_extensions);
        let capabilities = device_capabilities(api_version, enabled_extensions);

        let required = [
            (extensions.push_descriptor, c"vkCmdPushDescriptorSetKHR"),
            (extensions.shader_object, c"vkCmdBindShadersEXT"),
            (extensions.khr_buffer_device_address, c"vkGetBufferDeviceAddressKHR"),
            (extensions.ext_buffer_device_address, c"vkGetBufferDeviceAddressEXT"),
        ];
        for (_, name) in required.iter().filter(|(enabled, _)| *enabled) {
            let entry_point = unsafe { instance.get_device_proc_addr(device.handle(), name.as_ptr()) };
            if entry_point.is_none() {
                return Err(missing_entry_point(name));
            }
        }

        let push_descriptor = extensions
            .push_descriptor
            .then(|| ash::khr::push_descriptor::Device::new(instance, &device));
        let shader_object = extensions
            .shader_object
            .then(|| ash::ext::shader_object::Device::new(instance, &device));
        let buffer_device_address_khr = extensions
            .khr_buffer_device_address
            .then(|| ash::khr::buffer_device_address::Device::new(instance, &device));
        let buffer_device_address_ext = extensions.ext_buffer_device_address.then(|| {
            ash::ext::buffer_device_address::DeviceFn::load(|name| unsafe {
                std::mem::transmute(instance.get_device_proc_addr(device.handle(), name.as_ptr()))
            })
        });

        gpuav_info!(
            SOURCE,
            "dispatcher created (api {}.{}, extensions {:?})",
            vk::api_version_major(api_version),
            vk::api_version_minor(api_version),
            extensions
        );

        Ok(Self {
            device,
            capabilities,
            push_descriptor,
            shader_object,
            buffer_device_address_khr,
            buffer_device_address_ext,
        })
    }

    /// Capabilities detected at creation
    pub fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    /// Address resolver matching this device's capabilities
    pub fn address_resolver(&self) -> AddressResolver {
        AddressResolver::new(self.capabilities)
    }

    /// Vulkan device
    pub fn device(&self) -> &ash::Device {
        &self.device
    }
}

fn missing_entry_point(name: &CStr) -> Error {
    gpuav_error!(SOURCE, "Failed to resolve {:?} on an enabled extension", name);
    Error::BackendError(format!("Failed to resolve {:?}", name))
}

impl CommandDispatch for VulkanDispatcher {
    fn bind_pipeline(&self, command_buffer: vk::CommandBuffer, bind_point: BindPoint, pipeline: vk::Pipeline) {
        unsafe {
            self.device.cmd_bind_pipeline(command_buffer, bind_point.to_vk(), pipeline);
        }
    }

    fn bind_descriptor_sets(
        &self,
        command_buffer: vk::CommandBuffer,
        bind_point: BindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        sets: &[vk::DescriptorSet],
        dynamic_offsets: &[u32],
    ) {
        unsafe {
            self.device.cmd_bind_descriptor_sets(
                command_buffer,
                bind_point.to_vk(),
                layout,
                first_set,
                sets,
                dynamic_offsets,
            );
        }
    }

    fn push_descriptor_set(
        &self,
        command_buffer: vk::CommandBuffer,
        bind_point: BindPoint,
        layout: vk::PipelineLayout,
        set: u32,
        writes: &[PushDescriptorWrite],
    ) {
        let Some(push_descriptor) = &self.push_descriptor else {
            gpuav_error!(SOURCE, "VK_KHR_push_descriptor not enabled, push descriptors for set {} dropped", set);
            return;
        };

        let lowered = lower_writes(writes);
        let vk_writes = to_vk_writes(&lowered);
        unsafe {
            push_descriptor.cmd_push_descriptor_set(command_buffer, bind_point.to_vk(), layout, set, &vk_writes);
        }
    }

    fn push_constants(
        &self,
        command_buffer: vk::CommandBuffer,
        layout: vk::PipelineLayout,
        stage_flags: vk::ShaderStageFlags,
        offset: u32,
        data: &[u8],
    ) {
        unsafe {
            self.device.cmd_push_constants(command_buffer, layout, stage_flags, offset, data);
        }
    }

    fn bind_shaders(&self, command_buffer: vk::CommandBuffer, stages: &[vk::ShaderStageFlags], shaders: &[vk::ShaderEXT]) {
        let Some(shader_object) = &self.shader_object else {
            gpuav_error!(SOURCE, "VK_EXT_shader_object not enabled, {} shader binds dropped", shaders.len());
            return;
        };

        unsafe {
            shader_object.cmd_bind_shaders(command_buffer, stages, shaders);
        }
    }
}

impl BufferAddressDispatch for VulkanDispatcher {
    fn get_buffer_device_address(&self, buffer: vk::Buffer) -> vk::DeviceAddress {
        if !has_core_buffer_device_address(self.capabilities.api_version) {
            gpuav_error!(SOURCE, "core vkGetBufferDeviceAddress requires Vulkan 1.2");
            return 0;
        }

        let info = vk::BufferDeviceAddressInfo::default().buffer(buffer);
        unsafe { self.device.get_buffer_device_address(&info) }
    }

    fn get_buffer_device_address_ext(&self, buffer: vk::Buffer) -> vk::DeviceAddress {
        let Some(fp) = &self.buffer_device_address_ext else {
            gpuav_error!(SOURCE, "VK_EXT_buffer_device_address not enabled");
            return 0;
        };

        let info = vk::BufferDeviceAddressInfo::default().buffer(buffer);
        unsafe { (fp.get_buffer_device_address_ext)(self.device.handle(), &info) }
    }

    fn get_buffer_device_address_khr(&self, buffer: vk::Buffer) -> vk::DeviceAddress {
        let Some(buffer_device_address) = &self.buffer_device_address_khr else {
            gpuav_error!(SOURCE, "VK_KHR_buffer_device_address not enabled");
            return 0;
        };

        let info = vk::BufferDeviceAddressInfo::default().buffer(buffer);
        unsafe { buffer_device_address.get_buffer_device_address(&info) }
    }
}
