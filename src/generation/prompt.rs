//! Prompt templates for script and review generation.

use super::GenerationError;

/// What a generation call is about.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSubject {
    title: String,
    pub year: Option<i32>,
    pub overview: Option<String>,
}

impl GenerationSubject {
    /// Fails with an input error when the title is blank.
    pub fn new(
        title: impl Into<String>,
        year: Option<i32>,
        overview: Option<String>,
    ) -> Result<Self, GenerationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(GenerationError::Input("title required".to_string()));
        }
        Ok(Self {
            title,
            year,
            overview: overview.filter(|o| !o.trim().is_empty()),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// `Title (2024)` or just `Title`.
    pub fn display_title(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }

    fn overview_line(&self) -> String {
        match &self.overview {
            Some(overview) => format!("Overview (for reference): {}", overview),
            None => String::new(),
        }
    }
}

pub const SCRIPT_KEYS: [&str; 8] = [
    "title", "hook", "beats", "fact", "cta", "hashtags", "scenes", "captions",
];

pub const REVIEW_KEYS: [&str; 18] = [
    "title",
    "oneLiner",
    "summary",
    "plotTheme",
    "whatWorks",
    "whatDoesnt",
    "bestScenes",
    "performances",
    "writingDirection",
    "actionTechnical",
    "musicVfx",
    "paceTone",
    "familyGuide",
    "whoShouldWatch",
    "whoShouldSkip",
    "ratings",
    "verdict",
    "narration",
];

fn quoted_keys(keys: &[&str], separator: &str) -> String {
    keys.iter()
        .map(|k| format!("\"{}\"", k))
        .collect::<Vec<_>>()
        .join(separator)
}

/// High-retention YouTube Shorts script prompt.
pub fn build_script_prompt(subject: &GenerationSubject, style_text: &str) -> String {
    format!(
        r#"You are a shorts scriptwriter. Write a HIGH-RETENTION YouTube Shorts script in Hinglish for the movie "{title}".
Keep spoilers light. The video length should feel 60–75 seconds.

STYLE PROFILE
{style}

Return ONLY JSON with exactly these keys:
{keys}.

Rules:
- HOOK: <= 8 words, direct address (you/tum), curiosity gap, 0–1 emoji max.
- LENGTH & FLOW:
  - Make overall pacing feel 60–75s.
  - EXACTLY 6 beats with mm:ss start markers (e.g., "00:00 - ...").
  - Beat plan:
    1) Tease the central conflict (no spoilers).
    2) Raise stakes with a vivid detail.
    3) Character/relationship tension in 1 crisp line.
    4) Visual set-piece tease (fast, cinematic).
    5) A twist / unexpected angle (no major spoiler).
    6) Payoff feeling + tease more, lead into CTA.
  - Each beat must be punchy and intriguing.
- FACT: 1 surprising production/behind-the-scenes tidbit.
- CTA: short, hype, imperative — ask to follow/subscribe for more Hinglish movie shorts.
- HASHTAGS: 7 items, all lowercase, no spaces (# optional), no duplicates, avoid movie title itself.
- SCENES (9:16): 8–10 shots, each a short creator-friendly line including VISUAL + ACTION + (optional) on-screen text + (optional) [SFX:], all in one string.
- CAPTIONS: 20–28 lines, SRT-style text (no timestamps), <= 40 chars per line, crisp Hinglish, readable on phone, natural line breaks.
- STYLE GUARDRAILS: keep slang natural (no cringe), avoid over-emoji.
- JSON STRICTNESS: Arrays MUST be valid JSON arrays like ["...","..."]. Do NOT join items into a single string.
- OUTPUT: pure JSON object only. No prose, no markdown, no code fences.

{overview}"#,
        title = subject.display_title(),
        style = style_text,
        keys = quoted_keys(&SCRIPT_KEYS, ", "),
        overview = subject.overview_line(),
    )
}

/// Hinglish movie review prompt with a voice-over narration of `narration_words` words.
pub fn build_review_prompt(
    subject: &GenerationSubject,
    style_text: &str,
    narration_words: u32,
) -> String {
    format!(
        r#"Tu ek mast movie reviewer hai jo Hinglish me masti, style aur thoda masala dal ke review deta hai.
Movie: "{title}"

STYLE PROFILE
{style}


Return ONLY JSON with exactly these keys:
{keys}.

Rules:
- "narration": 3 short paras (total ~{words} words).
  * Para 1: Seedha audience se baat karo, thoda story tease karo — “Scene aisa hai ki tumhe lagega wah kya premise hai!”
  * Para 2: Mast factor batao — kya dhamaka hai (acting, action, music, VFX, comedy, jo bhi movie ka spice ho). Energetic tone, thoda Hinglish slang.
  * Para 3: Waaoo factor + verdict line, ekdum catchy. CTA style line do — "subscribe karna mat bhoolna" jaisa ekdum bindass.
- Avoid boring critic tone. Zyada engaging aur hype build karne wala.
- Keep spoilers very light, bas feel dikhana hai.
- "whatWorks": 4–6 bullets (mast cheezein).
- "whatDoesnt": 2–3 polite bullets.
- "bestScenes": 3–5 teaser highlights (waoo moments).
- "ratings": 0–10 numbers (overall, story, acting, direction, action, music, vfx).
- Arrays must be JSON arrays. Pure JSON output, no prose.


{overview}"#,
        title = subject.display_title(),
        style = style_text,
        keys = quoted_keys(&REVIEW_KEYS, ","),
        words = narration_words,
        overview = subject.overview_line(),
    )
}
