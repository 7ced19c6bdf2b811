//! Persistence of user configuration through [store::JsonSettingsStore].
//! There is a single settings file holding one scalar: the birthdate as a
//! millisecond timestamp. 0 means no birthdate was configured yet.

pub mod entity;
pub mod store;
