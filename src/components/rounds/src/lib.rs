/*
    ====================  components/rounds/src/lib.rs  =======================
    Round-based dispatch of annotated elements to processing steps.

    Steps may defer elements they cannot finish yet. Deferred elements are
    handed back to the same step in the next round, until a round where the
    host promises no more code will be generated. Whatever is still deferred
    after that final round becomes an error.
    ---------------------------------------------------------------------------
*/

mod deferral_tracker;
mod element_index;
mod error;
mod host;
mod options;
mod round_driver;
mod step;
mod summary;

pub use deferral_tracker::*;
pub use element_index::*;
pub use error::*;
pub use host::*;
pub use options::*;
pub use round_driver::*;
pub use step::*;
pub use summary::*;
