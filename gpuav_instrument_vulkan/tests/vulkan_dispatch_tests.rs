//! Tests for VulkanDispatcher against a real device
//!
//! These tests create a headless Vulkan device. All of them require a GPU
//! (or a software driver) and are marked with #[ignore].
//!
//! Run with: cargo test --test vulkan_dispatch_tests -- --ignored

use ash::vk;
use gpuav_instrument::gpuav::log::{Log, LogEntry, LogSeverity, Logger};
use gpuav_instrument::gpuav::state::{
    BindPoint, CommandBuffer, DescriptorBuffer, DescriptorPayload, PushDescriptorWrite, SharedCommandBuffer,
};
use gpuav_instrument::gpuav::dispatch::{BufferAddressDispatch, CommandDispatch};
use gpuav_instrument::gpuav::{instrument, AddressTier};
use gpuav_instrument_vulkan::gpuav::VulkanDispatcher;
use serial_test::serial;
use std::sync::{Arc, Mutex};

/// Headless device with one primary command buffer in the recording state
struct TestDevice {
    _entry: ash::Entry,
    instance: ash::Instance,
    device: ash::Device,
    command_pool: vk::CommandPool,
    command_buffer: vk::CommandBuffer,
}

impl TestDevice {
    fn new() -> Self {
        unsafe {
            let entry = ash::Entry::load().unwrap();
            let app_info = vk::ApplicationInfo::default().api_version(vk::API_VERSION_1_2);
            let instance = entry
                .create_instance(&vk::InstanceCreateInfo::default().application_info(&app_info), None)
                .unwrap();

            let physical_device = instance.enumerate_physical_devices().unwrap()[0];
            let queue_family = instance
                .get_physical_device_queue_family_properties(physical_device)
                .iter()
                .position(|family| family.queue_flags.contains(vk::QueueFlags::COMPUTE))
                .unwrap() as u32;
            let priorities = [1.0];
            let queue_info = vk::DeviceQueueCreateInfo::default()
                .queue_family_index(queue_family)
                .queue_priorities(&priorities);
            let device = instance
                .create_device(
                    physical_device,
                    &vk::DeviceCreateInfo::default().queue_create_infos(std::slice::from_ref(&queue_info)),
                    None,
                )
                .unwrap();

            let command_pool = device
                .create_command_pool(&vk::CommandPoolCreateInfo::default().queue_family_index(queue_family), None)
                .unwrap();
            let command_buffer = device
                .allocate_command_buffers(
                    &vk::CommandBufferAllocateInfo::default()
                        .command_pool(command_pool)
                        .level(vk::CommandBufferLevel::PRIMARY)
                        .command_buffer_count(1),
                )
                .unwrap()[0];
            device
                .begin_command_buffer(command_buffer, &vk::CommandBufferBeginInfo::default())
                .unwrap();

            Self { _entry: entry, instance, device, command_pool, command_buffer }
        }
    }
}

impl Drop for TestDevice {
    fn drop(&mut self) {
        unsafe {
            let _ = self.device.end_command_buffer(self.command_buffer);
            self.device.destroy_command_pool(self.command_pool, None);
            self.device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
    }
}

struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// CAPABILITY TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
fn test_vulkan_dispatcher_core_address_tier() {
    let test_device = TestDevice::new();
    let dispatcher = VulkanDispatcher::new(&test_device.instance, test_device.device.clone(), vk::API_VERSION_1_2, &[]).unwrap();

    assert_eq!(dispatcher.capabilities().api_version, vk::API_VERSION_1_2);
    assert_eq!(dispatcher.address_resolver().tier(), Some(AddressTier::Core));
}

// ============================================================================
// DISPATCH TESTS
// ============================================================================

#[test]
#[ignore] // Requires GPU
fn test_vulkan_instrument_empty_state_records_nothing_back() {
    let test_device = TestDevice::new();
    let dispatcher = VulkanDispatcher::new(&test_device.instance, test_device.device.clone(), vk::API_VERSION_1_2, &[]).unwrap();
    let shared = SharedCommandBuffer::new(CommandBuffer::new(test_device.command_buffer, vk::DescriptorSet::null()));

    let value = instrument(&shared, &dispatcher, BindPoint::Compute, |cb, _| cb.handle()).unwrap();
    assert_eq!(value, test_device.command_buffer);
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_vulkan_missing_extensions_are_dropped_and_logged() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Log::set_logger(TestLogger { entries: entries.clone() });

    let test_device = TestDevice::new();
    let dispatcher = VulkanDispatcher::new(&test_device.instance, test_device.device.clone(), vk::API_VERSION_1_2, &[]).unwrap();

    dispatcher.push_descriptor_set(
        test_device.command_buffer,
        BindPoint::Compute,
        vk::PipelineLayout::null(),
        0,
        &[PushDescriptorWrite {
            binding: 0,
            array_element: 0,
            descriptor_type: vk::DescriptorType::STORAGE_BUFFER,
            payload: DescriptorPayload::Buffers(vec![DescriptorBuffer {
                buffer: vk::Buffer::null(),
                offset: 0,
                range: vk::WHOLE_SIZE,
            }]),
        }],
    );
    dispatcher.bind_shaders(test_device.command_buffer, &[], &[]);
    assert_eq!(dispatcher.get_buffer_device_address_ext(vk::Buffer::null()), 0);
    assert_eq!(dispatcher.get_buffer_device_address_khr(vk::Buffer::null()), 0);

    {
        let entries = entries.lock().unwrap();
        let errors = entries.iter().filter(|entry| entry.severity == LogSeverity::Error).count();
        assert_eq!(errors, 4);
    }

    Log::reset_logger();
}
