//! Shared constants for end-to-end tests
//!
//! When fake upstream data changes, update only this file.

// ============================================================================
// Upstream Credentials
// ============================================================================

/// Key the fake TMDB upstream accepts
pub const TEST_TMDB_KEY: &str = "test-tmdb-key";

/// Bearer credential handed to the fake LLM upstream
pub const TEST_OPENAI_KEY: &str = "test-openai-key";

// ============================================================================
// Fake Catalog Data
// ============================================================================

/// TMDB id of "Inception"
pub const MOVIE_1_ID: i64 = 27205;

pub const MOVIE_1_TITLE: &str = "Inception";

/// TMDB id of "3 Idiots"
pub const MOVIE_2_ID: i64 = 20453;

pub const MOVIE_2_TITLE: &str = "3 Idiots";

pub const POSTER_PATH: &str = "/poster.jpg";

/// Genre id for "Action"
pub const GENRE_ACTION_ID: i64 = 28;

/// Genre id for "Comedy"
pub const GENRE_COMEDY_ID: i64 = 35;

// ============================================================================
// Fake Model Replies
// ============================================================================

/// Fenced script reply with newline-delimited beats and noisy hashtags
pub const SCRIPT_REPLY: &str = r##"Here you go:
```json
{
  "title": "Model Title",
  "hook": "You won't believe this heist",
  "fact": "Shot in six countries",
  "cta": "Follow for more",
  "beats": "1. Setup\n2. Dream levels\n- Kick\n\n* Limbo\n5) Top spins\n  Ending  ",
  "scenes": ["Paris folds", "Hallway fight"],
  "captions": "Dreams within dreams",
  "hashtags": "#Movies, #movies, #Nolan, ##Heist, #dreams, #scifi, #thriller, #cinema, #reels"
}
```"##;

/// Review reply satisfying every required field
pub const REVIEW_REPLY: &str = r#"{
  "oneLiner": "Full paisa vasool",
  "summary": "A heist inside dreams.",
  "plotTheme": "Grief and guilt",
  "whatWorks": ["Acting", "Score"],
  "whatDoesnt": "- Exposition heavy",
  "bestScenes": ["Hallway fight"],
  "performances": "Solid",
  "writingDirection": "Tight",
  "actionTechnical": "Slick",
  "musicVfx": "Iconic",
  "paceTone": "Brisk",
  "familyGuide": "Mild violence",
  "whoShouldWatch": ["Thriller fans"],
  "whoShouldSkip": ["Kids"],
  "ratings": {"overall": 9, "story": "8.5", "acting": 9, "direction": 10, "action": 8, "music": 9, "vfx": 9},
  "verdict": "Watch it",
  "narration": "Dreams collide in this mind-bending heist."
}"#;

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
