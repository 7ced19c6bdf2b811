/// Messages flowing from the ticker to the display module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgeEvent {
    /// New text for the persistent readout.
    Refresh { text: String },
    /// The local calendar day flipped onto the stored birthday.
    Birthday,
}
