//! Enhancement engine: attempt resolution, the forge state object, and its
//! outcome types.

pub mod forge;
pub mod gate;
pub mod logic;
pub mod types;

pub use forge::Forge;
pub use gate::BusyGate;
pub use logic::*;
pub use types::*;
