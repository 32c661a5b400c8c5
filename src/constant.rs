// Window size constants
pub const DEFAULT_WINDOW_WIDTH: f32 = 1200.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 760.0;
pub const DEFAULT_WINDOW_TITLE: &str = "Sketch Studio";

/// Application name and metadata constants
pub const APP_QUALIFIER: &str = "com";
pub const APP_ORGANIZATION: &str = "SketchStudio";
pub const APP_NAME: &str = "Sketch Studio";

/// Change highlighting
pub const DEFAULT_HIGHLIGHT_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_SCROLL_MARGIN_LINES: usize = 3;

/// Projects
pub const DEFAULT_PROJECT_NAME: &str = "Untitled Sketch";
pub const MAX_RECENT_PROJECTS: usize = 10;
pub const AUTOSAVE_DELAY_MS: u64 = 2000;

/// Generation
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Functions panel
pub const FREQUENT_FUNCTION_MIN_COUNT: usize = 4;

/// Chat
pub const STARTER_PROMPTS: [&str; 3] = [
    "Make a bouncing ball",
    "Draw a rainbow",
    "Make stars that twinkle",
];
