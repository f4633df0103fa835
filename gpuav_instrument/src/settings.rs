/// Instrumentation settings

/// Settings shared by every instrumentation point of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentationSettings {
    /// Descriptor-set index reserved for the diagnostic common set
    pub diagnostic_set_index: u32,
    /// Length of the preallocated command and error-logger index arrays
    pub indices_count: u32,
}

impl InstrumentationSettings {
    /// Size in bytes of one slot of the diagnostic index arrays
    pub const INDEX_STRIDE: u32 = std::mem::size_of::<u32>() as u32;
}

impl Default for InstrumentationSettings {
    fn default() -> Self {
        Self {
            diagnostic_set_index: 0,
            indices_count: 1023,
        }
    }
}
