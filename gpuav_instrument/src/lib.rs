/*!
# GPU-AV Command Instrumentation

Non-destructive instrumentation of Vulkan command buffers.

A GPU-assisted validation layer injects its own commands (diagnostic
descriptor binds, buffer-address queries, validation dispatches) into the
application's command stream. This crate captures the application's bound
state around each injection point and replays it afterwards, so the
application observes nothing.

## Architecture

- **state**: tracked binding table of a command buffer (pipelines, descriptor
  sets with dynamic offsets, push descriptors, push constants, shader objects)
- **dispatch**: `CommandDispatch` / `BufferAddressDispatch` seams to the driver
- **restore**: `RestorableState` capture/restore, `DiagnosticDescriptorBinder`,
  `AddressResolver`, and `instrument` tying them together under one lock

Backends (see `gpuav_instrument_vulkan`) implement the dispatch traits.
*/

mod error;
mod settings;
pub mod log;
pub mod state;
pub mod dispatch;
pub mod restore;

// Main gpuav namespace module
pub mod gpuav {
    pub use crate::error::{Error, Result};

    pub use crate::settings::InstrumentationSettings;

    pub mod log {
        pub use crate::log::{Log, Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    pub mod state {
        pub use crate::state::*;
    }

    pub mod dispatch {
        pub use crate::dispatch::{CommandDispatch, BufferAddressDispatch};
    }

    pub use crate::restore::*;
}

// Re-export Vulkan types used throughout the API
pub use ash::vk;
