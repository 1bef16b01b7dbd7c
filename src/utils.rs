//! Helpers for the serial control channel and the timed holds of the reset
//! sequence.

mod delay;
pub(crate) mod ports;

pub(crate) use delay::hold;
