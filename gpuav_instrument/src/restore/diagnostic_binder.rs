/// DiagnosticDescriptorBinder - binds the layer's shared diagnostic set
///
/// One preallocated descriptor set backs every diagnostic invocation. Each
/// call selects its slots through two dynamic offsets (command index and
/// error-logger index), so nothing is allocated per call.

use ash::vk;

use crate::dispatch::CommandDispatch;
use crate::settings::InstrumentationSettings;
use crate::state::{BindPoint, CommandBufferWriteGuard};
use crate::gpuav_trace;

#[derive(Debug, Clone, Copy)]
pub struct DiagnosticDescriptorBinder {
    settings: InstrumentationSettings,
}

impl DiagnosticDescriptorBinder {
    pub fn new(settings: InstrumentationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &InstrumentationSettings {
        &self.settings
    }

    /// Dynamic offsets selecting the given slots of the index arrays
    ///
    /// # Panics
    ///
    /// If either index is not below `indices_count`; that is a caller bug.
    pub fn dynamic_offsets(&self, cmd_index: u32, error_logger_index: u32) -> [u32; 2] {
        assert!(
            cmd_index < self.settings.indices_count,
            "command index {} out of range (max {})",
            cmd_index,
            self.settings.indices_count
        );
        assert!(
            error_logger_index < self.settings.indices_count,
            "error logger index {} out of range (max {})",
            error_logger_index,
            self.settings.indices_count
        );
        [
            cmd_index * InstrumentationSettings::INDEX_STRIDE,
            error_logger_index * InstrumentationSettings::INDEX_STRIDE,
        ]
    }

    /// Bind the diagnostic set at its reserved index
    ///
    /// Only the reserved set index changes on the command buffer. The tracked
    /// binding table is not updated, so a later capture still reports the
    /// application's bindings.
    ///
    /// # Arguments
    ///
    /// * `command_buffer` - Locked command buffer the diagnostic commands are recorded into
    /// * `layout` - Layout the diagnostic commands run against
    /// * `cmd_index` - Slot of the current command
    /// * `error_logger_index` - Slot of the error logger
    ///
    /// # Panics
    ///
    /// If either index is not below `indices_count`.
    pub fn bind<D: CommandDispatch + ?Sized>(
        &self,
        command_buffer: &CommandBufferWriteGuard<'_>,
        dispatcher: &D,
        bind_point: BindPoint,
        layout: vk::PipelineLayout,
        cmd_index: u32,
        error_logger_index: u32,
    ) {
        let dynamic_offsets = self.dynamic_offsets(cmd_index, error_logger_index);
        gpuav_trace!(
            "gpuav::DiagnosticDescriptorBinder",
            "binding diagnostic set at {} with offsets {:?}",
            self.settings.diagnostic_set_index,
            dynamic_offsets
        );
        dispatcher.bind_descriptor_sets(
            command_buffer.handle(),
            bind_point,
            layout,
            self.settings.diagnostic_set_index,
            &[command_buffer.diagnostic_descriptor_set()],
            &dynamic_offsets,
        );
    }
}

impl Default for DiagnosticDescriptorBinder {
    fn default() -> Self {
        Self::new(InstrumentationSettings::default())
    }
}

#[cfg(test)]
#[path = "diagnostic_binder_tests.rs"]
mod tests;
