mod action;
mod model;
mod session;
mod stats;

pub use action::*;
pub use model::*;
pub use session::*;
pub use stats::*;
