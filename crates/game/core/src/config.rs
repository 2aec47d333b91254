/// Tunable rules constants consulted by the ledger, command executor and AI.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Momentum granted at the start of every turn.
    pub momentum_base: u32,
    /// Per-turn gain cap as a multiple of `momentum_base`.
    pub momentum_cap_factor: u32,
    pub move_cost: u32,
    pub attack_cost: u32,
    /// Cheapest action the AI considers when deciding whether it can still act.
    pub min_action_cost: u32,
    /// Faces of the die rolled for initiative and to-hit checks.
    pub check_die: u32,

    // ===== AI =====
    /// Below this share of max HP (percent) the AI prefers to seek cover.
    pub low_health_percent: u32,
    pub min_safe_range: u32,
    pub close_range_penalty: i32,
    pub pursuit_close_penalty: i32,
    pub optimal_range_bonus: i32,
    /// Tile scores get a uniform jitter in `[-score_jitter, score_jitter)`.
    pub score_jitter: i32,
    pub full_cover_bonus: i32,
    pub half_cover_bonus: i32,
}

impl GameConfig {
    pub const DEFAULT_MOMENTUM_BASE: u32 = 4;
    pub const DEFAULT_MOMENTUM_CAP_FACTOR: u32 = 2;
    pub const DEFAULT_MOVE_COST: u32 = 2;
    pub const DEFAULT_ATTACK_COST: u32 = 2;
    pub const DEFAULT_MIN_ACTION_COST: u32 = 2;
    pub const DEFAULT_CHECK_DIE: u32 = 20;

    pub const DEFAULT_LOW_HEALTH_PERCENT: u32 = 20;
    pub const DEFAULT_MIN_SAFE_RANGE: u32 = 1;
    pub const DEFAULT_CLOSE_RANGE_PENALTY: i32 = 20;
    pub const DEFAULT_PURSUIT_CLOSE_PENALTY: i32 = 5;
    pub const DEFAULT_OPTIMAL_RANGE_BONUS: i32 = 10;
    pub const DEFAULT_SCORE_JITTER: i32 = 5;
    pub const DEFAULT_FULL_COVER_BONUS: i32 = 10;
    pub const DEFAULT_HALF_COVER_BONUS: i32 = 5;

    pub fn new() -> Self {
        Self {
            momentum_base: Self::DEFAULT_MOMENTUM_BASE,
            momentum_cap_factor: Self::DEFAULT_MOMENTUM_CAP_FACTOR,
            move_cost: Self::DEFAULT_MOVE_COST,
            attack_cost: Self::DEFAULT_ATTACK_COST,
            min_action_cost: Self::DEFAULT_MIN_ACTION_COST,
            check_die: Self::DEFAULT_CHECK_DIE,
            low_health_percent: Self::DEFAULT_LOW_HEALTH_PERCENT,
            min_safe_range: Self::DEFAULT_MIN_SAFE_RANGE,
            close_range_penalty: Self::DEFAULT_CLOSE_RANGE_PENALTY,
            pursuit_close_penalty: Self::DEFAULT_PURSUIT_CLOSE_PENALTY,
            optimal_range_bonus: Self::DEFAULT_OPTIMAL_RANGE_BONUS,
            score_jitter: Self::DEFAULT_SCORE_JITTER,
            full_cover_bonus: Self::DEFAULT_FULL_COVER_BONUS,
            half_cover_bonus: Self::DEFAULT_HALF_COVER_BONUS,
        }
    }

    /// Per-turn momentum gain cap.
    pub fn momentum_cap(&self) -> u32 {
        self.momentum_base.saturating_mul(self.momentum_cap_factor)
    }

    pub fn with_momentum_base(mut self, base: u32) -> Self {
        self.momentum_base = base;
        self
    }

    pub fn with_costs(mut self, move_cost: u32, attack_cost: u32) -> Self {
        self.move_cost = move_cost;
        self.attack_cost = attack_cost;
        self
    }

    pub fn with_score_jitter(mut self, jitter: i32) -> Self {
        self.score_jitter = jitter;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
