/// Tracked command-buffer state - the binding table that capture and restore operate on

pub mod bind_point;
pub mod layout;
pub mod command_buffer;

pub use bind_point::*;
pub use layout::*;
pub use command_buffer::*;
