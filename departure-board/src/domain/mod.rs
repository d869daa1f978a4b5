//! Domain types for the departure board.
//!
//! Plain values plus the pure functions that classify and filter them.
//! Nothing in here touches the network, the clock or the screen; callers
//! pass `now` in explicitly.

mod coordinates;
mod departure;
mod filter;
mod time;

pub use coordinates::Coordinates;
pub use departure::{Departure, ResponseEnvelope, Station};
pub use filter::{DestinationRule, HELSINKI, is_destination_match, visible_departures};
pub use time::{
    Urgency, format_clock, format_clock_in, format_relative, minutes_until, urgency_bucket,
};
