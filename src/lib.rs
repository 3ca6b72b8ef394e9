mod constraint;
mod gesture;
mod handle;
mod session;
mod solver;
mod surface;
mod zoom;

pub use constraint::*;
pub use handle::*;
pub use session::*;
pub use solver::{clamp_manual_rect, propose_create, propose_move, propose_resize};
pub use surface::*;
pub use zoom::*;
