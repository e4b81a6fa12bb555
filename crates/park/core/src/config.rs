/// Tuning parameters for following and behavior cadences.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FollowConfig {
    /// Ticks between forced slide re-validations, staggered per agent.
    pub validation_period: u32,
    /// Ticks between behavior countdown decrements.
    pub countdown_period: u32,
    /// Ticks between cosmetic reaction rolls, staggered per agent.
    pub reaction_period: u32,
    /// Slide iterations after which a warning is logged.
    pub slide_warn_iterations: u32,
    /// Slide iterations after which the check fails.
    pub slide_max_iterations: u32,
    /// Junction budget handed to the pathfinding hint.
    pub hint_search_depth: u32,
    /// Half-size of the box scanned for crowding agents, in world units.
    pub crowd_scan_range: i32,
}

impl FollowConfig {
    // ===== compile-time constants =====
    /// Maximum number of candidate destinations scored per optimizer call.
    pub const CANDIDATES: usize = 3;
    /// Behavior commands a single agent may emit in one tick.
    pub const MAX_COMMANDS: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_VALIDATION_PERIOD: u32 = 31;
    pub const DEFAULT_COUNTDOWN_PERIOD: u32 = 11;
    pub const DEFAULT_REACTION_PERIOD: u32 = 21;
    pub const DEFAULT_SLIDE_WARN_ITERATIONS: u32 = 16;
    pub const DEFAULT_SLIDE_MAX_ITERATIONS: u32 = 32;
    pub const DEFAULT_HINT_SEARCH_DEPTH: u32 = 5;
    pub const DEFAULT_CROWD_SCAN_RANGE: i32 = 32;

    pub fn new() -> Self {
        Self {
            validation_period: Self::DEFAULT_VALIDATION_PERIOD,
            countdown_period: Self::DEFAULT_COUNTDOWN_PERIOD,
            reaction_period: Self::DEFAULT_REACTION_PERIOD,
            slide_warn_iterations: Self::DEFAULT_SLIDE_WARN_ITERATIONS,
            slide_max_iterations: Self::DEFAULT_SLIDE_MAX_ITERATIONS,
            hint_search_depth: Self::DEFAULT_HINT_SEARCH_DEPTH,
            crowd_scan_range: Self::DEFAULT_CROWD_SCAN_RANGE,
        }
    }

    pub fn with_countdown_period(mut self, period: u32) -> Self {
        self.countdown_period = period;
        self
    }

    pub fn with_validation_period(mut self, period: u32) -> Self {
        self.validation_period = period;
        self
    }

    pub fn with_slide_limits(mut self, warn: u32, max: u32) -> Self {
        self.slide_warn_iterations = warn;
        self.slide_max_iterations = max;
        self
    }
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self::new()
    }
}
