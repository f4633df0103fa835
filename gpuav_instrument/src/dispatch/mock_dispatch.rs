/// Mock dispatchers for unit tests (no GPU required)
///
/// `MockDispatcher` records every dispatched command and can replay the
/// recording onto a `SimulatedBindings` table, which models what the driver
/// would have bound. `MockAddressDispatch` answers address queries per tier
/// and records which tiers were asked.

#[cfg(test)]
use ash::vk;
#[cfg(test)]
use ash::vk::Handle;
#[cfg(test)]
use std::collections::BTreeMap;
#[cfg(test)]
use std::sync::{Arc, Mutex};

#[cfg(test)]
use crate::dispatch::{CommandDispatch, BufferAddressDispatch};
#[cfg(test)]
use crate::state::{
    BindPoint, BIND_POINT_COUNT, PushDescriptorWrite, PipelineLayoutState, PipelineState,
    DescriptorSetState, ShaderObjectState, ShaderObjectStage, SetLayoutInfo, PushConstantRange,
};

// ============================================================================
// Recorded commands
// ============================================================================

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCommand {
    BindPipeline {
        command_buffer: vk::CommandBuffer,
        bind_point: BindPoint,
        pipeline: vk::Pipeline,
    },
    BindDescriptorSets {
        command_buffer: vk::CommandBuffer,
        bind_point: BindPoint,
        layout: vk::PipelineLayout,
        first_set: u32,
        sets: Vec<vk::DescriptorSet>,
        dynamic_offsets: Vec<u32>,
    },
    PushDescriptorSet {
        command_buffer: vk::CommandBuffer,
        bind_point: BindPoint,
        layout: vk::PipelineLayout,
        set: u32,
        writes: Vec<PushDescriptorWrite>,
    },
    PushConstants {
        command_buffer: vk::CommandBuffer,
        layout: vk::PipelineLayout,
        stage_flags: vk::ShaderStageFlags,
        offset: u32,
        data: Vec<u8>,
    },
    BindShaders {
        command_buffer: vk::CommandBuffer,
        stages: Vec<vk::ShaderStageFlags>,
        shaders: Vec<vk::ShaderEXT>,
    },
}

// ============================================================================
// Mock CommandDispatch
// ============================================================================

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockDispatcher {
    commands: Mutex<Vec<RecordedCommand>>,
}

#[cfg(test)]
impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything dispatched so far
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// Take the recording, leaving the mock empty
    pub fn take(&self) -> Vec<RecordedCommand> {
        std::mem::take(&mut *self.commands.lock().unwrap())
    }

    pub fn count_push_constants(&self) -> usize {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|command| matches!(command, RecordedCommand::PushConstants { .. }))
            .count()
    }

    fn record(&self, command: RecordedCommand) {
        self.commands.lock().unwrap().push(command);
    }
}

#[cfg(test)]
impl CommandDispatch for MockDispatcher {
    fn bind_pipeline(&self, command_buffer: vk::CommandBuffer, bind_point: BindPoint, pipeline: vk::Pipeline) {
        self.record(RecordedCommand::BindPipeline { command_buffer, bind_point, pipeline });
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
        self.record(RecordedCommand::BindDescriptorSets {
            command_buffer,
            bind_point,
            layout,
            first_set,
            sets: sets.to_vec(),
            dynamic_offsets: dynamic_offsets.to_vec(),
        });
    }

    fn push_descriptor_set(
        &self,
        command_buffer: vk::CommandBuffer,
        bind_point: BindPoint,
        layout: vk::PipelineLayout,
        set: u32,
        writes: &[PushDescriptorWrite],
    ) {
        self.record(RecordedCommand::PushDescriptorSet {
            command_buffer,
            bind_point,
            layout,
            set,
            writes: writes.to_vec(),
        });
    }

    fn push_constants(
        &self,
        command_buffer: vk::CommandBuffer,
        layout: vk::PipelineLayout,
        stage_flags: vk::ShaderStageFlags,
        offset: u32,
        data: &[u8],
    ) {
        self.record(RecordedCommand::PushConstants {
            command_buffer,
            layout,
            stage_flags,
            offset,
            data: data.to_vec(),
        });
    }

    fn bind_shaders(&self, command_buffer: vk::CommandBuffer, stages: &[vk::ShaderStageFlags], shaders: &[vk::ShaderEXT]) {
        self.record(RecordedCommand::BindShaders {
            command_buffer,
            stages: stages.to_vec(),
            shaders: shaders.to_vec(),
        });
    }
}

// ============================================================================
// Simulated driver-side binding table
// ============================================================================

#[cfg(test)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatedBindPoint {
    pub pipeline: Option<vk::Pipeline>,
    pub sets: BTreeMap<u32, (vk::DescriptorSet, Vec<u32>)>,
    pub push_descriptors: BTreeMap<u32, Vec<PushDescriptorWrite>>,
    pub shaders: BTreeMap<u32, vk::ShaderEXT>,
}

#[cfg(test)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatedBindings {
    pub bind_points: [SimulatedBindPoint; BIND_POINT_COUNT],
    pub push_constants: Vec<u8>,
}

#[cfg(test)]
impl SimulatedBindings {
    /// Replay a recording onto a fresh table
    pub fn from_commands(commands: &[RecordedCommand]) -> Self {
        let mut bindings = Self::default();
        for command in commands {
            bindings.apply(command);
        }
        bindings
    }

    pub fn apply(&mut self, command: &RecordedCommand) {
        match command {
            RecordedCommand::BindPipeline { bind_point, pipeline, .. } => {
                let state = &mut self.bind_points[bind_point.index()];
                state.pipeline = Some(*pipeline);
                state.shaders.clear();
            }
            RecordedCommand::BindDescriptorSets { bind_point, first_set, sets, dynamic_offsets, .. } => {
                // The simulation gives every set the whole offset list; tests bind one set per call
                let state = &mut self.bind_points[bind_point.index()];
                for (i, set) in sets.iter().enumerate() {
                    state.sets.insert(first_set + i as u32, (*set, dynamic_offsets.clone()));
                }
            }
            RecordedCommand::PushDescriptorSet { bind_point, set, writes, .. } => {
                self.bind_points[bind_point.index()].push_descriptors.insert(*set, writes.clone());
            }
            RecordedCommand::PushConstants { offset, data, .. } => {
                let end = *offset as usize + data.len();
                if self.push_constants.len() < end {
                    self.push_constants.resize(end, 0);
                }
                self.push_constants[*offset as usize..end].copy_from_slice(data);
            }
            RecordedCommand::BindShaders { stages, shaders, .. } => {
                for (stage, shader) in stages.iter().zip(shaders) {
                    let Some(slot) = ShaderObjectStage::from_vk(*stage) else { continue };
                    let state = &mut self.bind_points[slot.bind_point().index()];
                    state.pipeline = None;
                    if *shader == vk::ShaderEXT::null() {
                        state.shaders.remove(&stage.as_raw());
                    } else {
                        state.shaders.insert(stage.as_raw(), *shader);
                    }
                }
            }
        }
    }
}

// ============================================================================
// Mock BufferAddressDispatch
// ============================================================================

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockAddressDispatch {
    pub core_address: vk::DeviceAddress,
    pub ext_address: vk::DeviceAddress,
    pub khr_address: vk::DeviceAddress,
    pub calls: Mutex<Vec<&'static str>>,
}

#[cfg(test)]
impl MockAddressDispatch {
    pub fn new(core_address: vk::DeviceAddress, ext_address: vk::DeviceAddress, khr_address: vk::DeviceAddress) -> Self {
        Self {
            core_address,
            ext_address,
            khr_address,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl BufferAddressDispatch for MockAddressDispatch {
    fn get_buffer_device_address(&self, _buffer: vk::Buffer) -> vk::DeviceAddress {
        self.calls.lock().unwrap().push("core");
        self.core_address
    }

    fn get_buffer_device_address_ext(&self, _buffer: vk::Buffer) -> vk::DeviceAddress {
        self.calls.lock().unwrap().push("ext");
        self.ext_address
    }

    fn get_buffer_device_address_khr(&self, _buffer: vk::Buffer) -> vk::DeviceAddress {
        self.calls.lock().unwrap().push("khr");
        self.khr_address
    }
}

// ============================================================================
// Mock binding-table objects
// ============================================================================

#[cfg(test)]
pub fn mock_layout(raw: u64, set_layouts: Vec<SetLayoutInfo>, ranges: Vec<PushConstantRange>) -> Arc<PipelineLayoutState> {
    Arc::new(PipelineLayoutState::new(vk::PipelineLayout::from_raw(raw), set_layouts, ranges))
}

#[cfg(test)]
pub fn mock_pipeline(raw: u64, layout: &Arc<PipelineLayoutState>) -> Arc<PipelineState> {
    Arc::new(PipelineState::new(vk::Pipeline::from_raw(raw), Arc::clone(layout)))
}

#[cfg(test)]
pub fn mock_set(raw: u64, dynamic_descriptor_count: u32) -> Arc<DescriptorSetState> {
    Arc::new(DescriptorSetState::new(vk::DescriptorSet::from_raw(raw), dynamic_descriptor_count))
}

#[cfg(test)]
pub fn mock_shader(raw: u64, stage: ShaderObjectStage) -> Arc<ShaderObjectState> {
    Arc::new(ShaderObjectState::new(vk::ShaderEXT::from_raw(raw), stage))
}

#[cfg(test)]
pub fn plain_sets(count: usize) -> Vec<SetLayoutInfo> {
    vec![SetLayoutInfo::default(); count]
}

#[cfg(test)]
#[path = "mock_dispatch_tests.rs"]
mod tests;
