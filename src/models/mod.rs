pub mod event;
pub mod media;
pub mod token;
pub mod trip;

pub use event::{Event, EventCreate, EventUpdate, Location};
pub use media::{Media, MediaCreate};
pub use token::Token;
pub use trip::{Trip, TripCreate, TripUpdate};
