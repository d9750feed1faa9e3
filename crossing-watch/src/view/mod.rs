//! Viewer session state.
//!
//! Holds the reference point, zoom and ranked crossing list for one viewer,
//! and keeps the list ordered as interactions move the point.

mod interaction;
mod render;
mod session;
mod state;

pub use interaction::{Interaction, MapDirective};
pub use render::{render_crossing, render_list};
pub use session::{Session, SessionClosed, SessionHandle};
pub use state::{LoadOutcome, LoadTicket, Phase, ViewConfig, ViewSnapshot, ViewState};
