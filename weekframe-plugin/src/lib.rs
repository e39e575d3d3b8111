//! Weekframe Plugin System
//!
//! Functions are pure computations over `Value`s, registered by name and
//! described by static metadata. The same metadata drives help output and
//! the MCP tool schemas.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::CallContext;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{FunctionPlugin, FunctionMeta, ArgMeta, PluginRegistry, CallContext};
    pub use weekframe_core::prelude::*;
    pub use weekframe_range::{ColumnScheme, Timeframe, ValidTimeframes};
}
