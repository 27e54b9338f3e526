//! Domain types for the signal engine

pub mod bar;
pub mod record;
pub mod status;

pub use bar::Bar;
pub use record::{RecordValues, SignalRecord};
pub use status::{BandLocation, CeiState, GateStatus, Inversion, SlopeMode, SlopeStatus, Trigger};
