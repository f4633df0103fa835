/// Pipeline layouts, descriptor sets and owned push-descriptor writes

use ash::vk;
use std::sync::Arc;

/// Push-constant range declared by a pipeline layout
///
/// Kept separate from `vk::PushConstantRange` so ranges compare by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PushConstantRange {
    pub stage_flags: vk::ShaderStageFlags,
    pub offset: u32,
    pub size: u32,
}

impl PushConstantRange {
    pub fn new(stage_flags: vk::ShaderStageFlags, offset: u32, size: u32) -> Self {
        Self { stage_flags, offset, size }
    }

    /// One past the last byte covered by the range
    pub fn end(&self) -> u32 {
        self.offset + self.size
    }
}

impl From<vk::PushConstantRange> for PushConstantRange {
    fn from(range: vk::PushConstantRange) -> Self {
        Self::new(range.stage_flags, range.offset, range.size)
    }
}

/// Ranges shared between a layout and the command buffers that pushed against it
pub type PushConstantRanges = Arc<Vec<PushConstantRange>>;

/// Per-set information a pipeline layout declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SetLayoutInfo {
    /// Number of dynamic uniform/storage buffer descriptors in the set
    pub dynamic_descriptor_count: u32,
    /// Set layout was created for push descriptors
    pub push_descriptor: bool,
}

/// Tracked pipeline layout
#[derive(Debug, Clone)]
pub struct PipelineLayoutState {
    handle: vk::PipelineLayout,
    set_layouts: Vec<SetLayoutInfo>,
    push_constant_ranges: PushConstantRanges,
}

impl PipelineLayoutState {
    pub fn new(
        handle: vk::PipelineLayout,
        set_layouts: Vec<SetLayoutInfo>,
        push_constant_ranges: Vec<PushConstantRange>,
    ) -> Self {
        Self {
            handle,
            set_layouts,
            push_constant_ranges: Arc::new(push_constant_ranges),
        }
    }

    pub fn handle(&self) -> vk::PipelineLayout {
        self.handle
    }

    pub fn set_count(&self) -> u32 {
        self.set_layouts.len() as u32
    }

    pub fn set_layout(&self, index: u32) -> Option<&SetLayoutInfo> {
        self.set_layouts.get(index as usize)
    }

    pub fn push_constant_ranges(&self) -> &PushConstantRanges {
        &self.push_constant_ranges
    }

    /// Size of the push-constant block: highest end over all ranges
    pub fn push_constant_size(&self) -> u32 {
        self.push_constant_ranges.iter().map(PushConstantRange::end).max().unwrap_or(0)
    }
}

/// Tracked pipeline
#[derive(Debug, Clone)]
pub struct PipelineState {
    handle: vk::Pipeline,
    layout: Arc<PipelineLayoutState>,
}

impl PipelineState {
    pub fn new(handle: vk::Pipeline, layout: Arc<PipelineLayoutState>) -> Self {
        Self { handle, layout }
    }

    pub fn handle(&self) -> vk::Pipeline {
        self.handle
    }

    pub fn layout(&self) -> &Arc<PipelineLayoutState> {
        &self.layout
    }
}

/// Tracked descriptor set
///
/// Push-descriptor sets have no handle of their own; they are tracked with a
/// null handle and their content lives in the command buffer's push-descriptor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorSetState {
    handle: vk::DescriptorSet,
    dynamic_descriptor_count: u32,
    push_descriptor: bool,
}

impl DescriptorSetState {
    pub fn new(handle: vk::DescriptorSet, dynamic_descriptor_count: u32) -> Self {
        Self {
            handle,
            dynamic_descriptor_count,
            push_descriptor: false,
        }
    }

    pub fn push_descriptor() -> Self {
        Self {
            handle: vk::DescriptorSet::null(),
            dynamic_descriptor_count: 0,
            push_descriptor: true,
        }
    }

    pub fn handle(&self) -> vk::DescriptorSet {
        self.handle
    }

    pub fn dynamic_descriptor_count(&self) -> u32 {
        self.dynamic_descriptor_count
    }

    pub fn is_push_descriptor(&self) -> bool {
        self.push_descriptor
    }
}

/// Tracked shader object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderObjectState {
    handle: vk::ShaderEXT,
    stage: super::ShaderObjectStage,
}

impl ShaderObjectState {
    pub fn new(handle: vk::ShaderEXT, stage: super::ShaderObjectStage) -> Self {
        Self { handle, stage }
    }

    pub fn handle(&self) -> vk::ShaderEXT {
        self.handle
    }

    pub fn stage(&self) -> super::ShaderObjectStage {
        self.stage
    }
}

// ============================================================================
// Push descriptor writes
// ============================================================================

/// Image descriptor payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorImage {
    pub sampler: vk::Sampler,
    pub image_view: vk::ImageView,
    pub image_layout: vk::ImageLayout,
}

/// Buffer descriptor payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorBuffer {
    pub buffer: vk::Buffer,
    pub offset: vk::DeviceSize,
    pub range: vk::DeviceSize,
}

/// Descriptors carried by one write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorPayload {
    Images(Vec<DescriptorImage>),
    Buffers(Vec<DescriptorBuffer>),
    TexelBufferViews(Vec<vk::BufferView>),
}

impl DescriptorPayload {
    pub fn len(&self) -> usize {
        match self {
            DescriptorPayload::Images(images) => images.len(),
            DescriptorPayload::Buffers(buffers) => buffers.len(),
            DescriptorPayload::TexelBufferViews(views) => views.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owned push-descriptor write
///
/// `vk::WriteDescriptorSet` borrows its payload through raw pointers, so the
/// binding table keeps this owned form and backends build the Vulkan struct
/// at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushDescriptorWrite {
    pub binding: u32,
    pub array_element: u32,
    pub descriptor_type: vk::DescriptorType,
    pub payload: DescriptorPayload,
}

impl PushDescriptorWrite {
    pub fn descriptor_count(&self) -> u32 {
        self.payload.len() as u32
    }
}

/// Active push-descriptor set of a bind point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushDescriptorSetState {
    set_index: u32,
    writes: Vec<PushDescriptorWrite>,
}

impl PushDescriptorSetState {
    pub fn new(set_index: u32, writes: Vec<PushDescriptorWrite>) -> Self {
        Self { set_index, writes }
    }

    pub fn set_index(&self) -> u32 {
        self.set_index
    }

    pub fn writes(&self) -> &[PushDescriptorWrite] {
        &self.writes
    }
}
