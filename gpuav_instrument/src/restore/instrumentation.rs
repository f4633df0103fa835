/// Capture-inject-restore under a single lock

use ash::vk;

use crate::dispatch::CommandDispatch;
use crate::error::{Error, Result};
use crate::restore::RestorableState;
use crate::state::{BindPoint, CommandBufferWriteGuard, SharedCommandBuffer};

/// Run `inject` between a capture and a restore of `bind_point`
///
/// The command buffer's write lock is taken once and held across capture,
/// injection and restore, so no other thread observes or changes the
/// binding table mid-sequence. The closure's return value is passed through.
///
/// # Errors
///
/// `Error::LockPoisoned` if the lock cannot be taken; nothing is recorded then.
///
/// # Example
///
/// ```ignore
/// let address = instrument(&shared, &dispatcher, BindPoint::Compute, |cb, dispatcher| {
///     binder.bind(cb, dispatcher, BindPoint::Compute, diag_layout, cmd_index, logger_index);
///     dispatcher.bind_pipeline(cb.handle(), BindPoint::Compute, diag_pipeline);
/// })?;
/// ```
pub fn instrument<D, F, R>(
    command_buffer: &SharedCommandBuffer,
    dispatcher: &D,
    bind_point: BindPoint,
    inject: F,
) -> Result<R>
where
    D: CommandDispatch + ?Sized,
    F: FnOnce(&CommandBufferWriteGuard<'_>, &D) -> R,
{
    let guard = command_buffer.write()?;
    let snapshot = RestorableState::capture(&guard, bind_point);
    let result = inject(&guard, dispatcher);
    snapshot.restore(&guard, dispatcher);
    Ok(result)
}

/// `instrument` for a raw Vulkan bind point
///
/// # Errors
///
/// `Error::UnsupportedBindPoint` for bind points without a binding-table
/// slot, `Error::LockPoisoned` as for `instrument`.
pub fn instrument_vk<D, F, R>(
    command_buffer: &SharedCommandBuffer,
    dispatcher: &D,
    bind_point: vk::PipelineBindPoint,
    inject: F,
) -> Result<R>
where
    D: CommandDispatch + ?Sized,
    F: FnOnce(&CommandBufferWriteGuard<'_>, &D) -> R,
{
    let bind_point = BindPoint::from_vk(bind_point)
        .ok_or_else(|| Error::UnsupportedBindPoint(format!("{:?}", bind_point)))?;
    instrument(command_buffer, dispatcher, bind_point, inject)
}

#[cfg(test)]
#[path = "instrumentation_tests.rs"]
mod tests;
