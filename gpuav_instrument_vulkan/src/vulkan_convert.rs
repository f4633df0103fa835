/// Conversions from owned push-descriptor writes to Vulkan structs

use ash::vk;
use gpuav_instrument::gpuav::state::{DescriptorPayload, PushDescriptorWrite};

/// Vulkan payload of one write
///
/// `vk::WriteDescriptorSet` only points at its payload, so the lowered
/// arrays must outlive the `vk::WriteDescriptorSet`s built from them.
#[derive(Debug)]
pub(crate) enum LoweredPayload {
    Images(Vec<vk::DescriptorImageInfo>),
    Buffers(Vec<vk::DescriptorBufferInfo>),
    TexelBufferViews(Vec<vk::BufferView>),
}

#[derive(Debug)]
pub(crate) struct LoweredWrite<'w> {
    write: &'w PushDescriptorWrite,
    payload: LoweredPayload,
}

/// Lower the payload arrays of `writes`
pub(crate) fn lower_writes(writes: &[PushDescriptorWrite]) -> Vec<LoweredWrite<'_>> {
    writes
        .iter()
        .map(|write| {
            let payload = match &write.payload {
                DescriptorPayload::Images(images) => LoweredPayload::Images(
                    images
                        .iter()
                        .map(|image| {
                            vk::DescriptorImageInfo::default()
                                .sampler(image.sampler)
                                .image_view(image.image_view)
                                .image_layout(image.image_layout)
                        })
                        .collect(),
                ),
                DescriptorPayload::Buffers(buffers) => LoweredPayload::Buffers(
                    buffers
                        .iter()
                        .map(|buffer| {
                            vk::DescriptorBufferInfo::default()
                                .buffer(buffer.buffer)
                                .offset(buffer.offset)
                                .range(buffer.range)
                        })
                        .collect(),
                ),
                DescriptorPayload::TexelBufferViews(views) => LoweredPayload::TexelBufferViews(views.clone()),
            };
            LoweredWrite { write, payload }
        })
        .collect()
}

/// Build the `vk::WriteDescriptorSet`s for `vkCmdPushDescriptorSetKHR`
///
/// `dst_set` stays null: push descriptors target the set index passed to
/// the command, not a set handle.
pub(crate) fn to_vk_writes<'a>(lowered: &'a [LoweredWrite<'_>]) -> Vec<vk::WriteDescriptorSet<'a>> {
    lowered
        .iter()
        .map(|lowered| {
            let write = vk::WriteDescriptorSet::default()
                .dst_binding(lowered.write.binding)
                .dst_array_element(lowered.write.array_element)
                .descriptor_type(lowered.write.descriptor_type);
            match &lowered.payload {
                LoweredPayload::Images(infos) => write.image_info(infos),
                LoweredPayload::Buffers(infos) => write.buffer_info(infos),
                LoweredPayload::TexelBufferViews(views) => write.texel_buffer_view(views),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "vulkan_convert_tests.rs"]
mod tests;
