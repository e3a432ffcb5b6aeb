//! Profile panel: extended records and their sectioned presentation.

pub mod presenter;
pub mod record;
