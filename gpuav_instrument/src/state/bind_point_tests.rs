//! Unit tests for bind_point.rs

use crate::state::{BindPoint, ShaderObjectStage, BIND_POINT_COUNT};
use ash::vk;

#[test]
fn test_bind_point_indices_are_distinct() {
    let mut seen = [false; BIND_POINT_COUNT];
    for bind_point in BindPoint::ALL {
        assert!(!seen[bind_point.index()]);
        seen[bind_point.index()] = true;
    }
}

#[test]
fn test_bind_point_vk_conversion() {
    for bind_point in BindPoint::ALL {
        assert_eq!(BindPoint::from_vk(bind_point.to_vk()), Some(bind_point));
    }
}

#[test]
fn test_untracked_bind_point_is_none() {
    assert_eq!(BindPoint::from_vk(vk::PipelineBindPoint::SUBPASS_SHADING_HUAWEI), None);
}

#[test]
fn test_shader_stage_slot_order() {
    for (i, stage) in ShaderObjectStage::ALL.iter().enumerate() {
        assert_eq!(stage.index(), i);
    }
}

#[test]
fn test_shader_stage_bind_point() {
    assert_eq!(ShaderObjectStage::Compute.bind_point(), BindPoint::Compute);
    assert_eq!(ShaderObjectStage::Mesh.bind_point(), BindPoint::Graphics);
    assert!(!ShaderObjectStage::Compute.is_graphics());
    assert!(ShaderObjectStage::Fragment.is_graphics());
}

#[test]
fn test_shader_stage_flags_round_trip() {
    for stage in ShaderObjectStage::ALL {
        assert_eq!(ShaderObjectStage::from_vk(stage.to_vk()), Some(stage));
    }
}

#[test]
fn test_combined_stage_flags_are_rejected() {
    let combined = vk::ShaderStageFlags::VERTEX | vk::ShaderStageFlags::FRAGMENT;
    assert_eq!(ShaderObjectStage::from_vk(combined), None);
    assert_eq!(ShaderObjectStage::from_vk(vk::ShaderStageFlags::RAYGEN_KHR), None);
}
