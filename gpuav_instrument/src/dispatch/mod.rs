/// Dispatch interfaces - the driver-facing commands instrumentation reissues

pub mod command_dispatch;
pub mod mock_dispatch;

pub use command_dispatch::*;
