/*
    =================  components/memory_host/src/lib.rs  =====================
    A host environment kept entirely in memory.

    Elements added up front are visible from the first round. Elements
    generated while a round runs only become visible (and resolvable) once
    the next round starts, and a round that generated nothing is terminal.
    ---------------------------------------------------------------------------
*/

mod error;
mod host;
mod record;

#[cfg(test)]
mod scenarios;

pub use error::HostError;
pub use host::{HostReport, MemoryHost};
pub use record::{ElementKind, ElementRecord, Origin};
