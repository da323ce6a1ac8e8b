// --- Field Geometry ---
pub const MAP_WIDTH: u16 = 60;
pub const MAP_HEIGHT: u16 = 18;

// --- Ship ---
pub const SHIP_GLYPH: char = '>';
pub const MAX_HEALTH: u8 = 3;

// --- Weapon ---
pub const MAX_SHOTS: usize = 5;
pub const MAX_SHOT_COOLDOWN: u8 = 6;
pub const SHOT_COST: u8 = 3; // Charge consumed per shot
pub const SHOT_GLYPH: char = '-';
pub const FIRE_SPEED_MS: u64 = 100; // Shot advances one cell per interval
pub const RECHARGE_RATE_MS: u64 = 750;

// --- Field Tasks ---
pub const SPAWN_SHIFT_DELAY_MS: u64 = 500;
pub const SPAWN_SHIFT_PERIOD_MS: u64 = 1000;
pub const SCORE_TICK_DELAY_MS: u64 = 2500;
pub const SCORE_TICK_PERIOD_MS: u64 = 2500;
pub const COLOR_RESET_DELAY_MS: u64 = 250;

// --- Difficulty ---
/// Reciprocal spawn chance per row per tick. Lower means more asteroids.
pub const STARTING_DIFFICULTY: u32 = 24;
pub const MIN_SPAWN_PROBABILITY: u32 = 1;
pub const DIFFICULTY_THRESHOLDS: [u32; 10] = [35, 55, 65, 80, 100, 120, 140, 160, 180, 200];

// --- Glyphs ---
pub const SMALL_ASTEROID_GLYPH: char = 'o';
pub const LARGE_ASTEROID_GLYPH: char = 'O';
pub const IMPACT_GLYPH: char = '*';

// --- HUD rows, relative to the bottom wall ---
pub const SCORE_ROW_OFFSET: u16 = 1;
pub const HEALTH_ROW_OFFSET: u16 = 2;
pub const CHARGE_ROW_OFFSET: u16 = 3;
pub const DIFFICULTY_ROW_OFFSET: u16 = 4;
pub const CURSOR_PARK_ROW_OFFSET: u16 = 5;
