/// RestorableState - capture and replay of a command buffer's bound state
///
/// Taken right before diagnostic commands are injected and replayed right
/// after, so the application never observes the injection. A snapshot
/// describes exactly one binding model: a pipeline with its descriptor sets,
/// push descriptors and push constants, or a set of shader objects.

use ash::vk;

use crate::dispatch::CommandDispatch;
use crate::state::{
    BindPoint, CommandBuffer, CommandBufferWriteGuard, PipelineLayoutState,
    PushConstantRanges, PushDescriptorWrite, ShaderObjectStage,
};
use crate::{gpuav_debug, gpuav_trace, gpuav_warn};

/// Descriptor set captured at one set index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundDescriptorSet {
    /// Null for push-descriptor sets, which are restored from their writes
    pub handle: vk::DescriptorSet,
    pub set_index: u32,
    pub dynamic_offsets: Vec<u32>,
}

/// Pending writes of the active push-descriptor set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushDescriptorCapture {
    pub set_index: u32,
    pub writes: Vec<PushDescriptorWrite>,
}

/// Push-constant bytes together with the ranges they were written against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushConstantsCapture {
    data: Vec<u8>,
    ranges: PushConstantRanges,
}

impl PushConstantsCapture {
    /// Capture push constants if they can be replayed against `layout`
    ///
    /// Bytes written against other ranges would land in the wrong places of
    /// this layout's block, so anything but an exact range match yields `None`.
    pub fn capture(command_buffer: &CommandBuffer, layout: &PipelineLayoutState) -> Option<Self> {
        let written_ranges = command_buffer.push_constant_data_ranges()?;
        if **written_ranges != **layout.push_constant_ranges() {
            gpuav_debug!(
                RestorableState::SOURCE,
                "push constants were written against other ranges than layout {:?}, not captured",
                layout.handle()
            );
            return None;
        }
        if command_buffer.push_constant_data().is_empty() {
            return None;
        }
        Some(Self {
            data: command_buffer.push_constant_data().to_vec(),
            ranges: written_ranges.clone(),
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn ranges(&self) -> &PushConstantRanges {
        &self.ranges
    }
}

/// Pipeline binding model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineBinding {
    pub pipeline: vk::Pipeline,
    pub layout: vk::PipelineLayout,
    pub descriptor_sets: Vec<BoundDescriptorSet>,
    pub push_descriptor: Option<PushDescriptorCapture>,
    pub push_constants: Option<PushConstantsCapture>,
}

/// One bound shader object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundShaderObject {
    pub stage: vk::ShaderStageFlags,
    pub shader: vk::ShaderEXT,
}

/// What was bound on a bind point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundExecutionState {
    /// Nothing bound; restoring is a no-op
    Empty,
    Pipeline(PipelineBinding),
    /// Never empty; no bound shader yields `Empty`
    ShaderObjects(Vec<BoundShaderObject>),
}

/// Snapshot of one bind point of one command buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestorableState {
    command_buffer: vk::CommandBuffer,
    bind_point: BindPoint,
    bound: BoundExecutionState,
}

impl RestorableState {
    const SOURCE: &'static str = "gpuav::RestorableState";

    /// Capture what is bound on `bind_point`
    ///
    /// Reads the binding table only. Never fails: a bind point with nothing
    /// bound yields an empty snapshot.
    pub fn capture(command_buffer: &CommandBufferWriteGuard<'_>, bind_point: BindPoint) -> Self {
        let command_buffer: &CommandBuffer = command_buffer;
        let last_bound = command_buffer.last_bound(bind_point);

        let bound = if let Some(pipeline) = last_bound.pipeline() {
            let mut descriptor_sets = Vec::with_capacity(last_bound.per_set().len());
            let mut push_descriptor_index = None;
            for (i, per_set) in last_bound.per_set().iter().enumerate() {
                let Some(set) = &per_set.bound_descriptor_set else { continue };
                if set.is_push_descriptor() {
                    push_descriptor_index = Some(i as u32);
                }
                descriptor_sets.push(BoundDescriptorSet {
                    handle: set.handle(),
                    set_index: i as u32,
                    dynamic_offsets: per_set.dynamic_offsets.clone(),
                });
            }

            let push_descriptor = last_bound
                .push_descriptor_set()
                .filter(|push| !push.writes().is_empty())
                .map(|push| PushDescriptorCapture {
                    set_index: push_descriptor_index.unwrap_or(push.set_index()),
                    writes: push.writes().to_vec(),
                });

            let layout = last_bound
                .pipeline_layout()
                .map(|layout| layout.handle())
                .unwrap_or_else(|| pipeline.layout().handle());

            BoundExecutionState::Pipeline(PipelineBinding {
                pipeline: pipeline.handle(),
                layout,
                descriptor_sets,
                push_descriptor,
                push_constants: PushConstantsCapture::capture(command_buffer, pipeline.layout()),
            })
        } else {
            let shaders = match bind_point {
                BindPoint::Graphics => last_bound.bound_graphics_shaders(),
                BindPoint::Compute => last_bound
                    .shader(ShaderObjectStage::Compute)
                    .cloned()
                    .into_iter()
                    .collect(),
                BindPoint::RayTracing => Vec::new(),
            };

            if shaders.is_empty() {
                BoundExecutionState::Empty
            } else {
                BoundExecutionState::ShaderObjects(
                    shaders
                        .iter()
                        .map(|shader| BoundShaderObject {
                            stage: shader.stage().to_vk(),
                            shader: shader.handle(),
                        })
                        .collect(),
                )
            }
        };

        gpuav_trace!(Self::SOURCE, "captured {:?} on {:?}", bound, bind_point);

        Self {
            command_buffer: command_buffer.handle(),
            bind_point,
            bound,
        }
    }

    pub fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    pub fn bind_point(&self) -> BindPoint {
        self.bind_point
    }

    pub fn bound(&self) -> &BoundExecutionState {
        &self.bound
    }

    pub fn is_empty(&self) -> bool {
        self.bound == BoundExecutionState::Empty
    }

    /// Reissue the commands that rebuild the captured state
    ///
    /// The pipeline (or shader objects) is rebound first; descriptor sets and
    /// push constants are layout-relative and follow it. Null descriptor sets
    /// and zero-size push-constant ranges are skipped. Restoring twice
    /// re-applies the same state.
    pub fn restore<D: CommandDispatch + ?Sized>(&self, command_buffer: &CommandBufferWriteGuard<'_>, dispatcher: &D) {
        debug_assert_eq!(
            command_buffer.handle(),
            self.command_buffer,
            "snapshot restored onto another command buffer"
        );
        let cb = self.command_buffer;
        let bind_point = self.bind_point;

        match &self.bound {
            BoundExecutionState::Empty => {}
            BoundExecutionState::Pipeline(binding) => {
                dispatcher.bind_pipeline(cb, bind_point, binding.pipeline);

                for set in &binding.descriptor_sets {
                    if set.handle == vk::DescriptorSet::null() {
                        gpuav_trace!(Self::SOURCE, "skipping null descriptor set at index {}", set.set_index);
                        continue;
                    }
                    dispatcher.bind_descriptor_sets(
                        cb,
                        bind_point,
                        binding.layout,
                        set.set_index,
                        std::slice::from_ref(&set.handle),
                        &set.dynamic_offsets,
                    );
                }

                if let Some(push) = &binding.push_descriptor {
                    dispatcher.push_descriptor_set(cb, bind_point, binding.layout, push.set_index, &push.writes);
                }

                if let Some(push_constants) = &binding.push_constants {
                    for range in push_constants.ranges().iter() {
                        if range.size == 0 {
                            continue;
                        }
                        let Some(bytes) = push_constants.data().get(range.offset as usize..range.end() as usize) else {
                            gpuav_warn!(
                                Self::SOURCE,
                                "push constant range {}..{} outside the {} captured bytes",
                                range.offset,
                                range.end(),
                                push_constants.data().len()
                            );
                            continue;
                        };
                        dispatcher.push_constants(cb, binding.layout, range.stage_flags, range.offset, bytes);
                    }
                }
            }
            BoundExecutionState::ShaderObjects(shaders) => {
                let (stages, handles): (Vec<_>, Vec<_>) =
                    shaders.iter().map(|bound| (bound.stage, bound.shader)).unzip();
                dispatcher.bind_shaders(cb, &stages, &handles);
            }
        }
    }
}

#[cfg(test)]
#[path = "restorable_state_tests.rs"]
mod tests;
