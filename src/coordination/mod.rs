//! Coordination primitives shared by the coordinators
//!
//! Implements the broadcast-once control signal, the countdown used to wait
//! for a fixed number of completions, and the randomness seam.

pub mod countdown;
pub mod draw;
pub mod signals;

pub use countdown::*;
pub use draw::*;
pub use signals::*;
