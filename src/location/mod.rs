//! Location search backing the maps overlay: geocoding client plus the
//! debounced, sequence-guarded search session.

mod client;
mod search;

pub use client::{GeocodeError, GeocodeProvider, NominatimClient, Place};
pub use search::{SearchOutcome, SearchSession};
