//! Refresh controller: the board's state machine.
//!
//! Owns the [`RefreshState`], decides when to ask for a position or fetch
//! departures, and turns every outcome into something on the render sink.

mod clock;
mod refresh;
mod state;
pub mod status;
mod view;

pub use clock::{Clock, SystemClock};
pub use refresh::RefreshController;
pub use state::{Job, Outcome, Phase, RefreshState, Services};
pub use view::{build_board, departure_row};
