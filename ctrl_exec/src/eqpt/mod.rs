//! Equipment interfaces
//!
//! The controller does not talk to hardware directly. Instead the equipment
//! layer exposes one narrow trait per collaborator (receiver, navigation,
//! guidance, range finding, power), and the executable samples them once per
//! cycle into the controller's input snapshot. Hardware drivers and the
//! simulation stack both implement these traits.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod guide;
mod nav;
mod power;
mod radio_io;
mod range;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use guide::*;
pub use nav::*;
pub use power::*;
pub use radio_io::*;
pub use range::*;
