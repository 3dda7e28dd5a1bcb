/// Symbols a deal draws its card values from. Each deal shuffles the pool and
/// takes the first `value_count` entries, so two games rarely share a set.
pub const SYMBOL_POOL: &[&str] = &[
    "🐶", "🦊", "🐸", "🐙", "🍎", "🍋", "🍉", "🍒", "⚽", "🎲", "🚀", "⭐",
];

/// The full configuration surface of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Number of distinct card values; the board holds twice as many cards.
    pub value_count: usize,
    /// Completed pair flips allowed before the game is lost. `None` means
    /// the game can only end in a win.
    pub attempt_limit: Option<u32>,
    /// How long a mismatched pair stays face-up before flipping back.
    pub reveal_delay_ms: u64,
    /// Pause between the final mismatch and the loss alert.
    pub loss_delay_ms: u64,
}

impl GameConfig {
    pub fn total_cards(&self) -> usize {
        self.value_count * 2
    }

    /// Narrowest column count that still divides the board evenly.
    pub fn grid_cols(&self) -> i32 {
        let total = self.total_cards().max(1);
        let mut cols = (total as f64).sqrt().ceil() as usize;
        while total % cols != 0 {
            cols += 1;
        }
        cols as i32
    }

    pub fn grid_rows(&self) -> i32 {
        self.total_cards().max(1) as i32 / self.grid_cols()
    }
}

/// The two historical rule sets, expressed as presets over one design.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Challenge,
    FreePlay,
}

impl Mode {
    pub fn config(self) -> GameConfig {
        match self {
            Mode::Challenge => GameConfig {
                value_count: 2,
                attempt_limit: Some(3),
                reveal_delay_ms: 800,
                loss_delay_ms: 200,
            },
            Mode::FreePlay => GameConfig {
                value_count: 4,
                attempt_limit: None,
                reveal_delay_ms: 800,
                loss_delay_ms: 200,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Challenge => "Challenge",
            Mode::FreePlay => "Free Play",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Mode::Challenge => "2 pairs, 3 attempts",
            Mode::FreePlay => "4 pairs, unlimited attempts",
        }
    }

    pub const ALL: [Mode; 2] = [Mode::Challenge, Mode::FreePlay];
}
