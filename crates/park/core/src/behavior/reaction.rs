/// Cosmetic animation an agent plays while standing near its target.
///
/// Reactions never affect movement or pursuit; they only occupy the agent
/// until the animation finishes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Reaction {
    TakePhoto,
    Jump,
    Wave,
    Joy,
    ShakeHead,
    EmptyPockets,
    CheckTime,
}

impl Reaction {
    /// Animation length in ticks.
    pub const fn frames(self) -> u8 {
        match self {
            Reaction::TakePhoto => 32,
            Reaction::Jump => 16,
            Reaction::Wave | Reaction::Joy => 24,
            Reaction::ShakeHead | Reaction::CheckTime => 20,
            Reaction::EmptyPockets => 28,
        }
    }

    /// Unhappy reaction of an escorted agent for a `random_uint(16)` roll.
    pub const fn escorted(roll: u32) -> Option<Self> {
        match roll {
            0..=3 => Some(Reaction::ShakeHead),
            4..=7 => Some(Reaction::EmptyPockets),
            8 => Some(Reaction::CheckTime),
            _ => None,
        }
    }
}
