/// Instrumentation around injected diagnostic commands
///
/// - **RestorableState**: capture the binding table, replay it afterwards
/// - **DiagnosticDescriptorBinder**: bind the shared diagnostic set at its reserved index
/// - **AddressResolver**: buffer device address across capability tiers
/// - **instrument**: the whole capture-inject-restore sequence under one lock

pub mod restorable_state;
pub mod diagnostic_binder;
pub mod address_resolver;
pub mod instrumentation;

pub use restorable_state::*;
pub use diagnostic_binder::*;
pub use address_resolver::*;
pub use instrumentation::*;
