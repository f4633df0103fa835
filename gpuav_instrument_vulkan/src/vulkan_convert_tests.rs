//! Unit tests for push-descriptor write conversion
//!
//! Tests pure conversion functions without requiring GPU.

use super::*;
use ash::vk::Handle;
use gpuav_instrument::gpuav::state::{DescriptorBuffer, DescriptorImage};

fn image_write() -> PushDescriptorWrite {
    PushDescriptorWrite {
        binding: 3,
        array_element: 1,
        descriptor_type: vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
        payload: DescriptorPayload::Images(vec![
            DescriptorImage {
                sampler: vk::Sampler::from_raw(0x51),
                image_view: vk::ImageView::from_raw(0x71),
                image_layout: vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            },
            DescriptorImage {
                sampler: vk::Sampler::from_raw(0x52),
                image_view: vk::ImageView::from_raw(0x72),
                image_layout: vk::ImageLayout::GENERAL,
            },
        ]),
    }
}

fn buffer_write() -> PushDescriptorWrite {
    PushDescriptorWrite {
        binding: 0,
        array_element: 0,
        descriptor_type: vk::DescriptorType::STORAGE_BUFFER,
        payload: DescriptorPayload::Buffers(vec![DescriptorBuffer {
            buffer: vk::Buffer::from_raw(0xB0),
            offset: 64,
            range: vk::WHOLE_SIZE,
        }]),
    }
}

// ============================================================================
// LOWERING TESTS
// ============================================================================

#[test]
fn test_lower_images_keeps_every_field() {
    let writes = vec![image_write()];
    let lowered = lower_writes(&writes);

    assert_eq!(lowered.len(), 1);
    match &lowered[0].payload {
        LoweredPayload::Images(infos) => {
            assert_eq!(infos.len(), 2);
            assert_eq!(infos[1].sampler, vk::Sampler::from_raw(0x52));
            assert_eq!(infos[1].image_view, vk::ImageView::from_raw(0x72));
            assert_eq!(infos[1].image_layout, vk::ImageLayout::GENERAL);
        }
        other => panic!("expected images, got {:?}", other),
    }
}

#[test]
fn test_lower_buffers_keeps_every_field() {
    let writes = vec![buffer_write()];
    let lowered = lower_writes(&writes);

    match &lowered[0].payload {
        LoweredPayload::Buffers(infos) => {
            assert_eq!(infos[0].buffer, vk::Buffer::from_raw(0xB0));
            assert_eq!(infos[0].offset, 64);
            assert_eq!(infos[0].range, vk::WHOLE_SIZE);
        }
        other => panic!("expected buffers, got {:?}", other),
    }
}

// ============================================================================
// VK WRITE TESTS
// ============================================================================

#[test]
fn test_vk_writes_point_at_lowered_payload() {
    let writes = vec![image_write(), buffer_write()];
    let lowered = lower_writes(&writes);
    let vk_writes = to_vk_writes(&lowered);

    assert_eq!(vk_writes.len(), 2);

    let images = &vk_writes[0];
    assert_eq!(images.dst_set, vk::DescriptorSet::null());
    assert_eq!(images.dst_binding, 3);
    assert_eq!(images.dst_array_element, 1);
    assert_eq!(images.descriptor_type, vk::DescriptorType::COMBINED_IMAGE_SAMPLER);
    assert_eq!(images.descriptor_count, 2);
    assert!(!images.p_image_info.is_null());
    assert!(images.p_buffer_info.is_null());

    let buffers = &vk_writes[1];
    assert_eq!(buffers.dst_binding, 0);
    assert_eq!(buffers.descriptor_count, 1);
    assert!(!buffers.p_buffer_info.is_null());
    assert!(buffers.p_image_info.is_null());
}

#[test]
fn test_vk_writes_texel_buffer_views() {
    let writes = vec![PushDescriptorWrite {
        binding: 5,
        array_element: 0,
        descriptor_type: vk::DescriptorType::UNIFORM_TEXEL_BUFFER,
        payload: DescriptorPayload::TexelBufferViews(vec![
            vk::BufferView::from_raw(1),
            vk::BufferView::from_raw(2),
            vk::BufferView::from_raw(3),
        ]),
    }];
    let lowered = lower_writes(&writes);
    let vk_writes = to_vk_writes(&lowered);

    assert_eq!(vk_writes[0].descriptor_count, writes[0].descriptor_count());
    assert!(!vk_writes[0].p_texel_buffer_view.is_null());
    // SAFETY: the pointer refers to `lowered`, which is still alive
    let second = unsafe { *vk_writes[0].p_texel_buffer_view.add(1) };
    assert_eq!(second, vk::BufferView::from_raw(2));
}
