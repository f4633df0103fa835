/// Tracked command-buffer state
///
/// Mirrors what the application has bound on a command buffer, per bind point.
/// The application path records into it; capture reads it. Diagnostic
/// commands are dispatched straight to the driver and never recorded here,
/// so the table keeps describing the application's view of the command buffer.

use ash::vk;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};
use crate::state::{
    BindPoint, ShaderObjectStage, BIND_POINT_COUNT, SHADER_OBJECT_STAGE_COUNT,
    PipelineState, PipelineLayoutState, DescriptorSetState, ShaderObjectState,
    PushDescriptorSetState, PushDescriptorWrite, PushConstantRanges,
};
use crate::{gpuav_debug, gpuav_trace};

/// Descriptor set bound at one set index
#[derive(Debug, Clone, Default)]
pub struct PerSet {
    pub bound_descriptor_set: Option<Arc<DescriptorSetState>>,
    pub dynamic_offsets: Vec<u32>,
}

/// Everything last bound on one bind point
#[derive(Debug, Clone, Default)]
pub struct LastBound {
    pipeline: Option<Arc<PipelineState>>,
    pipeline_layout: Option<Arc<PipelineLayoutState>>,
    per_set: Vec<PerSet>,
    push_descriptor_set: Option<Arc<PushDescriptorSetState>>,
    shader_objects: [Option<Arc<ShaderObjectState>>; SHADER_OBJECT_STAGE_COUNT],
}

impl LastBound {
    pub fn pipeline(&self) -> Option<&Arc<PipelineState>> {
        self.pipeline.as_ref()
    }

    /// Layout of the most recent descriptor bind or push on this bind point
    pub fn pipeline_layout(&self) -> Option<&Arc<PipelineLayoutState>> {
        self.pipeline_layout.as_ref()
    }

    pub fn per_set(&self) -> &[PerSet] {
        &self.per_set
    }

    pub fn push_descriptor_set(&self) -> Option<&Arc<PushDescriptorSetState>> {
        self.push_descriptor_set.as_ref()
    }

    pub fn shader(&self, stage: ShaderObjectStage) -> Option<&Arc<ShaderObjectState>> {
        self.shader_objects[stage.index()].as_ref()
    }

    /// Bound graphics-stage shader objects, in slot order
    pub fn bound_graphics_shaders(&self) -> Vec<Arc<ShaderObjectState>> {
        ShaderObjectStage::ALL
            .iter()
            .filter(|stage| stage.is_graphics())
            .filter_map(|stage| self.shader(*stage).cloned())
            .collect()
    }

    fn clear_shaders(&mut self) {
        for slot in self.shader_objects.iter_mut() {
            *slot = None;
        }
    }
}

/// Tracked state of one command buffer
#[derive(Debug)]
pub struct CommandBuffer {
    handle: vk::CommandBuffer,
    last_bound: [LastBound; BIND_POINT_COUNT],
    push_constant_data: Vec<u8>,
    push_constant_data_ranges: Option<PushConstantRanges>,
    diagnostic_descriptor_set: vk::DescriptorSet,
}

impl CommandBuffer {
    const SOURCE: &'static str = "gpuav::CommandBuffer";

    /// Start tracking a command buffer
    ///
    /// # Arguments
    ///
    /// * `handle` - The Vulkan command buffer
    /// * `diagnostic_descriptor_set` - The layer's shared diagnostic set, bound by
    ///   `DiagnosticDescriptorBinder` around injected commands
    pub fn new(handle: vk::CommandBuffer, diagnostic_descriptor_set: vk::DescriptorSet) -> Self {
        Self {
            handle,
            last_bound: Default::default(),
            push_constant_data: Vec::new(),
            push_constant_data_ranges: None,
            diagnostic_descriptor_set,
        }
    }

    pub fn handle(&self) -> vk::CommandBuffer {
        self.handle
    }

    pub fn last_bound(&self, bind_point: BindPoint) -> &LastBound {
        &self.last_bound[bind_point.index()]
    }

    pub fn push_constant_data(&self) -> &[u8] {
        &self.push_constant_data
    }

    /// Ranges of the layout the push-constant bytes were last written against
    pub fn push_constant_data_ranges(&self) -> Option<&PushConstantRanges> {
        self.push_constant_data_ranges.as_ref()
    }

    pub fn diagnostic_descriptor_set(&self) -> vk::DescriptorSet {
        self.diagnostic_descriptor_set
    }

    /// Forget everything bound so far (command buffer begin or reset)
    pub fn reset(&mut self) {
        self.last_bound = Default::default();
        self.push_constant_data.clear();
        self.push_constant_data_ranges = None;
    }

    /// Track a pipeline bind
    ///
    /// Pipelines and shader objects are mutually exclusive on a bind point:
    /// binding a pipeline unbinds the shader objects of that bind point.
    pub fn record_bind_pipeline(&mut self, bind_point: BindPoint, pipeline: Arc<PipelineState>) {
        gpuav_trace!(Self::SOURCE, "bind pipeline {:?} at {:?}", pipeline.handle(), bind_point);
        let last_bound = &mut self.last_bound[bind_point.index()];
        last_bound.pipeline = Some(pipeline);
        last_bound.clear_shaders();
    }

    /// Track a descriptor-set bind
    ///
    /// Dynamic offsets are handed out to the sets in order, each set taking as
    /// many as it has dynamic descriptors.
    ///
    /// # Errors
    ///
    /// `Error::InvalidBinding` if the sets do not fit in the layout or the
    /// offset count does not match the sets' dynamic descriptor count. State is
    /// left untouched on error.
    pub fn record_bind_descriptor_sets(
        &mut self,
        bind_point: BindPoint,
        layout: &Arc<PipelineLayoutState>,
        first_set: u32,
        sets: &[Arc<DescriptorSetState>],
        dynamic_offsets: &[u32],
    ) -> Result<()> {
        let end = first_set as usize + sets.len();
        if end > layout.set_count() as usize {
            return Err(Error::InvalidBinding(format!(
                "sets {}..{} exceed the {} sets of layout {:?}",
                first_set, end, layout.set_count(), layout.handle()
            )));
        }

        let required: usize = sets.iter().map(|set| set.dynamic_descriptor_count() as usize).sum();
        if required != dynamic_offsets.len() {
            return Err(Error::InvalidBinding(format!(
                "{} dynamic offsets supplied, {} required",
                dynamic_offsets.len(), required
            )));
        }

        let last_bound = &mut self.last_bound[bind_point.index()];
        if last_bound.per_set.len() < end {
            last_bound.per_set.resize_with(end, PerSet::default);
        }

        let mut offsets = dynamic_offsets;
        for (i, set) in sets.iter().enumerate() {
            let (own, rest) = offsets.split_at(set.dynamic_descriptor_count() as usize);
            offsets = rest;

            let index = first_set + i as u32;
            last_bound.per_set[index as usize] = PerSet {
                bound_descriptor_set: Some(Arc::clone(set)),
                dynamic_offsets: own.to_vec(),
            };

            if last_bound.push_descriptor_set.as_ref().is_some_and(|push| push.set_index() == index) {
                last_bound.push_descriptor_set = None;
            }
        }

        last_bound.pipeline_layout = Some(Arc::clone(layout));
        Ok(())
    }

    /// Track a push-descriptor update
    ///
    /// # Errors
    ///
    /// `Error::InvalidBinding` if `set` is outside the layout or its set layout
    /// was not created for push descriptors.
    pub fn record_push_descriptor_set(
        &mut self,
        bind_point: BindPoint,
        layout: &Arc<PipelineLayoutState>,
        set: u32,
        writes: Vec<PushDescriptorWrite>,
    ) -> Result<()> {
        match layout.set_layout(set) {
            Some(info) if info.push_descriptor => {}
            Some(_) => {
                return Err(Error::InvalidBinding(format!(
                    "set {} of layout {:?} is not a push-descriptor set", set, layout.handle()
                )));
            }
            None => {
                return Err(Error::InvalidBinding(format!(
                    "set {} exceeds the {} sets of layout {:?}", set, layout.set_count(), layout.handle()
                )));
            }
        }

        let last_bound = &mut self.last_bound[bind_point.index()];
        if last_bound.per_set.len() <= set as usize {
            last_bound.per_set.resize_with(set as usize + 1, PerSet::default);
        }
        last_bound.per_set[set as usize] = PerSet {
            bound_descriptor_set: Some(Arc::new(DescriptorSetState::push_descriptor())),
            dynamic_offsets: Vec::new(),
        };
        last_bound.push_descriptor_set = Some(Arc::new(PushDescriptorSetState::new(set, writes)));
        last_bound.pipeline_layout = Some(Arc::clone(layout));
        Ok(())
    }

    /// Track a push-constants write
    ///
    /// The byte store follows the layout it was written against: when the
    /// layout's ranges differ from the last-written ones, the store is reset to
    /// zeros sized to the new layout before the bytes are copied in.
    ///
    /// # Errors
    ///
    /// `Error::InvalidBinding` for an empty write or one past the layout's
    /// push-constant block.
    pub fn record_push_constants(
        &mut self,
        layout: &PipelineLayoutState,
        stage_flags: vk::ShaderStageFlags,
        offset: u32,
        data: &[u8],
    ) -> Result<()> {
        if data.is_empty() {
            return Err(Error::InvalidBinding("zero-size push constants".to_string()));
        }

        let end = offset as usize + data.len();
        if end > layout.push_constant_size() as usize {
            return Err(Error::InvalidBinding(format!(
                "push constants {}..{} exceed the {}-byte block of layout {:?}",
                offset, end, layout.push_constant_size(), layout.handle()
            )));
        }

        let same_ranges = self
            .push_constant_data_ranges
            .as_ref()
            .is_some_and(|ranges| **ranges == **layout.push_constant_ranges());
        if !same_ranges {
            gpuav_debug!(
                Self::SOURCE,
                "push constant layout changed to {:?}, resetting {} bytes",
                layout.handle(),
                layout.push_constant_size()
            );
            self.push_constant_data = vec![0; layout.push_constant_size() as usize];
            self.push_constant_data_ranges = Some(Arc::clone(layout.push_constant_ranges()));
        }

        gpuav_trace!(Self::SOURCE, "push constants {:?} [{}..{})", stage_flags, offset, end);
        self.push_constant_data[offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    /// Track a push-constants write of a plain-old-data value
    pub fn record_push_constants_pod<T: bytemuck::Pod>(
        &mut self,
        layout: &PipelineLayoutState,
        stage_flags: vk::ShaderStageFlags,
        offset: u32,
        value: &T,
    ) -> Result<()> {
        self.record_push_constants(layout, stage_flags, offset, bytemuck::bytes_of(value))
    }

    /// Track a shader-object bind
    ///
    /// A `None` shader unbinds its stage. Binding shaders unbinds the pipeline
    /// of each bind point they touch.
    pub fn record_bind_shaders(&mut self, shaders: &[(ShaderObjectStage, Option<Arc<ShaderObjectState>>)]) {
        for (stage, shader) in shaders {
            let last_bound = &mut self.last_bound[stage.bind_point().index()];
            last_bound.shader_objects[stage.index()] = shader.clone();
            last_bound.pipeline = None;
        }
    }
}

/// Write guard over a tracked command buffer
///
/// Capture, restore and the diagnostic binder all take this guard by
/// reference, so the whole capture-inject-restore sequence runs under one lock.
pub type CommandBufferWriteGuard<'a> = RwLockWriteGuard<'a, CommandBuffer>;

/// Tracked command buffer shared with the rest of the validation system
#[derive(Debug, Clone)]
pub struct SharedCommandBuffer {
    inner: Arc<RwLock<CommandBuffer>>,
}

impl SharedCommandBuffer {
    pub fn new(command_buffer: CommandBuffer) -> Self {
        Self {
            inner: Arc::new(RwLock::new(command_buffer)),
        }
    }

    /// Lock for writing
    ///
    /// # Errors
    ///
    /// `Error::LockPoisoned` if a thread panicked while holding the lock.
    pub fn write(&self) -> Result<CommandBufferWriteGuard<'_>> {
        self.inner
            .write()
            .map_err(|_| Error::LockPoisoned("command buffer state".to_string()))
    }

    /// Lock for writing without blocking; `None` while the lock is held elsewhere
    pub fn try_write(&self) -> Option<CommandBufferWriteGuard<'_>> {
        self.inner.try_write().ok()
    }

    /// Lock for reading
    pub fn read(&self) -> Result<RwLockReadGuard<'_, CommandBuffer>> {
        self.inner
            .read()
            .map_err(|_| Error::LockPoisoned("command buffer state".to_string()))
    }
}

#[cfg(test)]
#[path = "command_buffer_tests.rs"]
mod tests;
