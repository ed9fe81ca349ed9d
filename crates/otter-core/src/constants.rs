// Shared tuning constants for the node engine. Distances are in metres
// (AR world units), times in seconds unless the name says otherwise.

// Avatar motion
pub const DEFAULT_AVATAR_SPEED: f32 = 0.3; // units per second
pub const ARRIVAL_EPSILON: f32 = 0.02; // remaining distance that counts as "arrived"
pub const AVATAR_FACING_YAW: f32 = std::f32::consts::PI; // models are authored facing +Z
pub const FADE_OUT_MS: u64 = 1200;

// Narration
pub const NARRATION_CHAR_DELAY_MS: u64 = 60;

// Ground plane
pub const GROUND_SIZE: f32 = 6.0;
pub const GROUND_SEGMENTS: u32 = 50;
pub const GROUND_DROP: f32 = 0.01; // ground sits just below the hit-test pose

// Zone generation
pub const MAX_PLACEMENT_ATTEMPTS: usize = 50;

// Puzzle
pub const PUZZLE_SNAP_TOLERANCE: f32 = 2.0;

// Balance
pub const BALANCE_THRESHOLD: u32 = 3;

// Picking
pub const PICK_SPHERE_RADIUS: f32 = 0.2; // default ray-sphere radius for tappable entities

// Warnings and toasts
pub const WARNING_DURATION_SEC: f32 = 3.0;
pub const TOAST_DURATION_SEC: f32 = 3.0;

// Noise ripple pulse
pub const RIPPLE_GROWTH_PER_SEC: f32 = 0.5;
pub const RIPPLE_MIN_SCALE: f32 = 1.0;
pub const RIPPLE_MAX_SCALE: f32 = 2.0;

// Food bobbing
pub const BOB_AMPLITUDE: f32 = 0.05;
pub const BOB_RATE: f32 = 1.5; // radians per second

// Page routing
pub const MAP_PAGE: &str = "/index.html";
pub const NODE_COUNT: u8 = 10;
