//! Unit tests for diagnostic_binder.rs

use crate::dispatch::mock_dispatch::{mock_layout, mock_pipeline, mock_set, plain_sets, MockDispatcher, RecordedCommand};
use crate::restore::{BoundExecutionState, DiagnosticDescriptorBinder, RestorableState};
use crate::settings::InstrumentationSettings;
use crate::state::{BindPoint, CommandBuffer, SharedCommandBuffer};
use ash::vk::{self, Handle};

fn shared_cb() -> SharedCommandBuffer {
    SharedCommandBuffer::new(CommandBuffer::new(vk::CommandBuffer::from_raw(0xC0), vk::DescriptorSet::from_raw(0xD1A6)))
}

#[test]
fn test_default_settings() {
    let binder = DiagnosticDescriptorBinder::default();
    assert_eq!(binder.settings().diagnostic_set_index, 0);
    assert_eq!(binder.settings().indices_count, 1023);
}

#[test]
fn test_dynamic_offsets_are_word_sized() {
    let binder = DiagnosticDescriptorBinder::default();
    assert_eq!(binder.dynamic_offsets(0, 0), [0, 0]);
    assert_eq!(binder.dynamic_offsets(3, 7), [12, 28]);
    assert_eq!(binder.dynamic_offsets(1022, 1022), [4088, 4088]);
}

#[test]
fn test_bind_issues_single_descriptor_bind() {
    let shared = shared_cb();
    let guard = shared.write().unwrap();
    let dispatcher = MockDispatcher::new();
    let binder = DiagnosticDescriptorBinder::new(InstrumentationSettings { diagnostic_set_index: 3, indices_count: 16 });

    binder.bind(&guard, &dispatcher, BindPoint::Compute, vk::PipelineLayout::from_raw(0xAA), 2, 5);

    assert_eq!(
        dispatcher.commands(),
        vec![RecordedCommand::BindDescriptorSets {
            command_buffer: vk::CommandBuffer::from_raw(0xC0),
            bind_point: BindPoint::Compute,
            layout: vk::PipelineLayout::from_raw(0xAA),
            first_set: 3,
            sets: vec![vk::DescriptorSet::from_raw(0xD1A6)],
            dynamic_offsets: vec![8, 20],
        }]
    );
}

#[test]
#[should_panic(expected = "command index")]
fn test_command_index_out_of_range_panics() {
    let binder = DiagnosticDescriptorBinder::new(InstrumentationSettings { diagnostic_set_index: 0, indices_count: 4 });
    binder.dynamic_offsets(4, 0);
}

#[test]
#[should_panic(expected = "error logger index")]
fn test_error_logger_index_out_of_range_panics() {
    let binder = DiagnosticDescriptorBinder::new(InstrumentationSettings { diagnostic_set_index: 0, indices_count: 4 });
    binder.dynamic_offsets(0, 4);
}

#[test]
fn test_capture_after_bind_reports_application_sets_only() {
    let shared = shared_cb();
    let mut guard = shared.write().unwrap();
    let layout = mock_layout(0x1A, plain_sets(3), vec![]);
    guard.record_bind_pipeline(BindPoint::Graphics, mock_pipeline(0xB0, &layout));
    guard.record_bind_descriptor_sets(BindPoint::Graphics, &layout, 1, &[mock_set(0xD1, 0), mock_set(0xD2, 1)], &[64]).unwrap();
    let before = RestorableState::capture(&guard, BindPoint::Graphics);

    let dispatcher = MockDispatcher::new();
    DiagnosticDescriptorBinder::default().bind(&guard, &dispatcher, BindPoint::Graphics, vk::PipelineLayout::from_raw(0xAA), 1, 1);

    let after = RestorableState::capture(&guard, BindPoint::Graphics);
    assert_eq!(before, after);
    let BoundExecutionState::Pipeline(binding) = after.bound() else {
        panic!("expected pipeline variant");
    };
    let indices: Vec<_> = binding.descriptor_sets.iter().map(|set| set.set_index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert!(binding.descriptor_sets.iter().all(|set| set.handle != vk::DescriptorSet::from_raw(0xD1A6)));
}
