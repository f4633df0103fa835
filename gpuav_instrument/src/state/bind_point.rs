/// Bind points and shader-object stages of the binding table

use ash::vk;

/// Number of binding-table slots per command buffer
pub const BIND_POINT_COUNT: usize = 3;

/// Number of independently bindable shader-object stages
pub const SHADER_OBJECT_STAGE_COUNT: usize = 8;

/// Binding-table slot of a command buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindPoint {
    Graphics,
    Compute,
    RayTracing,
}

impl BindPoint {
    /// All bind points in table order
    pub const ALL: [BindPoint; BIND_POINT_COUNT] = [
        BindPoint::Graphics,
        BindPoint::Compute,
        BindPoint::RayTracing,
    ];

    /// Index into the per-command-buffer binding table
    pub fn index(self) -> usize {
        match self {
            BindPoint::Graphics => 0,
            BindPoint::Compute => 1,
            BindPoint::RayTracing => 2,
        }
    }

    /// Map a Vulkan bind point onto a table slot
    ///
    /// Returns `None` for bind points the binding table does not track
    /// (subpass shading, execution graphs).
    pub fn from_vk(bind_point: vk::PipelineBindPoint) -> Option<Self> {
        match bind_point {
            vk::PipelineBindPoint::GRAPHICS => Some(BindPoint::Graphics),
            vk::PipelineBindPoint::COMPUTE => Some(BindPoint::Compute),
            vk::PipelineBindPoint::RAY_TRACING_KHR => Some(BindPoint::RayTracing),
            _ => None,
        }
    }

    pub fn to_vk(self) -> vk::PipelineBindPoint {
        match self {
            BindPoint::Graphics => vk::PipelineBindPoint::GRAPHICS,
            BindPoint::Compute => vk::PipelineBindPoint::COMPUTE,
            BindPoint::RayTracing => vk::PipelineBindPoint::RAY_TRACING_KHR,
        }
    }
}

/// Stage slot for the shader-object binding model
///
/// Slots are kept in a fixed order; capture reports bound shaders in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderObjectStage {
    Vertex,
    TessellationControl,
    TessellationEvaluation,
    Geometry,
    Fragment,
    Compute,
    Task,
    Mesh,
}

impl ShaderObjectStage {
    /// All stages in slot order
    pub const ALL: [ShaderObjectStage; SHADER_OBJECT_STAGE_COUNT] = [
        ShaderObjectStage::Vertex,
        ShaderObjectStage::TessellationControl,
        ShaderObjectStage::TessellationEvaluation,
        ShaderObjectStage::Geometry,
        ShaderObjectStage::Fragment,
        ShaderObjectStage::Compute,
        ShaderObjectStage::Task,
        ShaderObjectStage::Mesh,
    ];

    pub fn index(self) -> usize {
        match self {
            ShaderObjectStage::Vertex => 0,
            ShaderObjectStage::TessellationControl => 1,
            ShaderObjectStage::TessellationEvaluation => 2,
            ShaderObjectStage::Geometry => 3,
            ShaderObjectStage::Fragment => 4,
            ShaderObjectStage::Compute => 5,
            ShaderObjectStage::Task => 6,
            ShaderObjectStage::Mesh => 7,
        }
    }

    /// Every stage except compute belongs to the graphics bind point
    pub fn is_graphics(self) -> bool {
        self != ShaderObjectStage::Compute
    }

    /// Bind point whose binding table holds this stage
    pub fn bind_point(self) -> BindPoint {
        if self.is_graphics() {
            BindPoint::Graphics
        } else {
            BindPoint::Compute
        }
    }

    /// Map a single-bit stage flag onto a slot
    pub fn from_vk(stage: vk::ShaderStageFlags) -> Option<Self> {
        match stage {
            vk::ShaderStageFlags::VERTEX => Some(ShaderObjectStage::Vertex),
            vk::ShaderStageFlags::TESSELLATION_CONTROL => Some(ShaderObjectStage::TessellationControl),
            vk::ShaderStageFlags::TESSELLATION_EVALUATION => Some(ShaderObjectStage::TessellationEvaluation),
            vk::ShaderStageFlags::GEOMETRY => Some(ShaderObjectStage::Geometry),
            vk::ShaderStageFlags::FRAGMENT => Some(ShaderObjectStage::Fragment),
            vk::ShaderStageFlags::COMPUTE => Some(ShaderObjectStage::Compute),
            vk::ShaderStageFlags::TASK_EXT => Some(ShaderObjectStage::Task),
            vk::ShaderStageFlags::MESH_EXT => Some(ShaderObjectStage::Mesh),
            _ => None,
        }
    }

    pub fn to_vk(self) -> vk::ShaderStageFlags {
        match self {
            ShaderObjectStage::Vertex => vk::ShaderStageFlags::VERTEX,
            ShaderObjectStage::TessellationControl => vk::ShaderStageFlags::TESSELLATION_CONTROL,
            ShaderObjectStage::TessellationEvaluation => vk::ShaderStageFlags::TESSELLATION_EVALUATION,
            ShaderObjectStage::Geometry => vk::ShaderStageFlags::GEOMETRY,
            ShaderObjectStage::Fragment => vk::ShaderStageFlags::FRAGMENT,
            ShaderObjectStage::Compute => vk::ShaderStageFlags::COMPUTE,
            ShaderObjectStage::Task => vk::ShaderStageFlags::TASK_EXT,
            ShaderObjectStage::Mesh => vk::ShaderStageFlags::MESH_EXT,
        }
    }
}

#[cfg(test)]
#[path = "bind_point_tests.rs"]
mod tests;
