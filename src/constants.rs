/// Rating assumed for any team with no rating history
pub const DEFAULT_RATING: f64 = 1500.0;

/// Rating-point scale of the logistic curve (400 points = 10:1 odds)
pub const ELO_SCALE: f64 = 400.0;

/// Default rating sensitivity per game
pub const DEFAULT_K_FACTOR: f64 = 20.0;

/// Default rating-point bonus for the home team
pub const DEFAULT_HOME_COURT_ADV: f64 = 65.0;

/// Default number of Monte Carlo trials
pub const DEFAULT_SIMULATIONS: usize = 10_000;

/// Default top-level RNG seed
pub const DEFAULT_SEED: u64 = 7;

/// Teams per conference bracket
pub const FIELD_SIZE: usize = 8;

/// Wins needed to take a best-of-seven series
pub const SERIES_WINS_NEEDED: u8 = 4;

/// Venue for each game slot of a series: `true` when the higher seed is home (2-2-1-1-1)
pub const HIGHER_SEED_HOME: [bool; 7] = [true, true, false, false, true, false, true];

/// Quarterfinal pairings by seed, in bracket order
pub const QUARTERFINAL_SEEDS: [(u8, u8); 4] = [(1, 8), (4, 5), (2, 7), (3, 6)];

/// Number of finals matchups kept in the odds report
pub const FINALS_MATCHUP_LIMIT: usize = 10;

/// Upper bound (inclusive) for per-trial seeds drawn from the parent generator
pub const TRIAL_SEED_MAX: u64 = 1_000_000_000;
