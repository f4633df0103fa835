/// CommandDispatch and BufferAddressDispatch traits
///
/// Thin pass-through seams to the driver. Implementations forward each call
/// as-is; success or failure belongs to the driver and is not re-validated.
/// Nothing dispatched through these traits touches the tracked binding table.

use ash::vk;
use crate::state::{BindPoint, PushDescriptorWrite};

/// Command-recording calls reissued around an injection point
pub trait CommandDispatch: Send + Sync {
    /// Bind a pipeline
    fn bind_pipeline(
        &self,
        command_buffer: vk::CommandBuffer,
        bind_point: BindPoint,
        pipeline: vk::Pipeline,
    );

    /// Bind consecutive descriptor sets starting at `first_set`
    ///
    /// # Arguments
    ///
    /// * `layout` - Layout the sets are bound against
    /// * `first_set` - Set index of `sets[0]`
    /// * `sets` - Descriptor sets to bind
    /// * `dynamic_offsets` - Offsets for every dynamic descriptor of `sets`, in order
    fn bind_descriptor_sets(
        &self,
        command_buffer: vk::CommandBuffer,
        bind_point: BindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        sets: &[vk::DescriptorSet],
        dynamic_offsets: &[u32],
    );

    /// Push descriptors inline into `set`
    fn push_descriptor_set(
        &self,
        command_buffer: vk::CommandBuffer,
        bind_point: BindPoint,
        layout: vk::PipelineLayout,
        set: u32,
        writes: &[PushDescriptorWrite],
    );

    /// Write `data` into the push-constant block at `offset`
    fn push_constants(
        &self,
        command_buffer: vk::CommandBuffer,
        layout: vk::PipelineLayout,
        stage_flags: vk::ShaderStageFlags,
        offset: u32,
        data: &[u8],
    );

    /// Bind shader objects; `stages` and `shaders` are parallel arrays
    fn bind_shaders(
        &self,
        command_buffer: vk::CommandBuffer,
        stages: &[vk::ShaderStageFlags],
        shaders: &[vk::ShaderEXT],
    );
}

/// Buffer device-address queries, one per capability tier
pub trait BufferAddressDispatch: Send + Sync {
    /// Core entry point (API version 1.2 and later)
    fn get_buffer_device_address(&self, buffer: vk::Buffer) -> vk::DeviceAddress;

    /// VK_EXT_buffer_device_address entry point
    fn get_buffer_device_address_ext(&self, buffer: vk::Buffer) -> vk::DeviceAddress;

    /// VK_KHR_buffer_device_address entry point
    fn get_buffer_device_address_khr(&self, buffer: vk::Buffer) -> vk::DeviceAddress;
}
