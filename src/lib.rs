//! Keeps your exact age on screen: a persistent notification refreshed every
//! second, plus a once-a-day reminder when the date flips onto your birthday.
//!
//! All calendar arithmetic sits in [age] and is shared by every surface. The
//! rest is a thin shell: a settings file holding one timestamp, a ticking
//! daemon and a cli to drive both.

pub mod age;
pub mod cli;
pub mod daemon;
pub mod notify;
pub mod settings;
pub mod utils;
