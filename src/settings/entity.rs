use serde::Deserialize;
use serde::Serialize;

use crate::age::BirthInstant;

/// The struct stored in the settings file. Kept flat so additions only need a
/// field with a serde default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Birth moment in milliseconds since the Unix epoch, 0 while unset.
    #[serde(default)]
    pub birthdate: i64,
}

impl Settings {
    pub fn with_birthdate(birth: BirthInstant) -> Self {
        Self {
            birthdate: birth.millis(),
        }
    }

    pub fn birth_instant(&self) -> BirthInstant {
        BirthInstant::from_millis(self.birthdate)
    }
}
