//! Prompt feature extraction.
//!
//! Turns a raw prompt into the four-component [`FeatureVector`] the router
//! scores against each model's capability embedding. Everything here is a
//! pure function of its inputs.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prompt length (in chars) at which the length signal saturates at 1.0.
pub const LENGTH_SATURATION: f64 = 500.0;

/// Complexity added per reasoning keyword occurrence.
pub const REASONING_INCREMENT: f64 = 0.2;

/// Code keyword occurrences that map to a code density of 1.0.
///
/// Hand-picked for [`CODE_KEYWORDS`]; retune when that list changes.
pub const CODE_DENSITY_NORMALIZER: f64 = 5.0;

/// Cost sensitivity reported for cost-sensitive callers.
pub const COST_SENSITIVE: f64 = 0.8;

/// Cost sensitivity reported for premium/enterprise callers.
pub const COST_INSENSITIVE: f64 = 0.1;

/// Vocabulary that suggests the prompt asks for reasoning.
pub const REASONING_KEYWORDS: &[&str] = &[
    "explain",
    "why",
    "reason",
    "analyze",
    "step-by-step",
    "logic",
    "proof",
];

/// Vocabulary that suggests the prompt contains or asks for code.
pub const CODE_KEYWORDS: &[&str] = &[
    "function",
    "const",
    "class",
    "import",
    "export",
    "=>",
    "return",
    "if",
    "for",
    "while",
    "interface",
    "type",
    "sudo",
    "bash",
];

static REASONING_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex(REASONING_KEYWORDS));
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| keyword_regex(CODE_KEYWORDS));

/// Who is asking. Only cost sensitivity influences routing today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerProfile {
    /// Whether the caller should be steered towards cheaper models.
    #[serde(default = "default_cost_sensitive")]
    pub cost_sensitive: bool,
}

fn default_cost_sensitive() -> bool {
    true
}

impl Default for CallerProfile {
    fn default() -> Self {
        Self {
            cost_sensitive: default_cost_sensitive(),
        }
    }
}

impl CallerProfile {
    /// A cost-sensitive caller (the default).
    pub fn standard() -> Self {
        Self::default()
    }

    /// A premium/enterprise caller that cares little about cost.
    pub fn enterprise() -> Self {
        Self {
            cost_sensitive: false,
        }
    }
}

/// Per-request signal extracted from a prompt and caller profile.
///
/// Components are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub complexity: f64,
    pub code_density: f64,
    pub language_signal: f64,
    pub cost_sensitivity: f64,
}

/// Extract the feature vector for `prompt`.
pub fn extract(prompt: &str, profile: &CallerProfile) -> FeatureVector {
    let length_signal = prompt.chars().count() as f64 / LENGTH_SATURATION;
    let reasoning_signal = REASONING_RE.find_iter(prompt).count() as f64 * REASONING_INCREMENT;
    let code_hits = CODE_RE.find_iter(prompt).count() as f64;

    FeatureVector {
        complexity: (length_signal + reasoning_signal).min(1.0),
        code_density: (code_hits / CODE_DENSITY_NORMALIZER).min(1.0),
        language_signal: if prompt.chars().any(is_arabic) {
            1.0
        } else {
            0.0
        },
        cost_sensitivity: if profile.cost_sensitive {
            COST_SENSITIVE
        } else {
            COST_INSENSITIVE
        },
    }
}

/// Whether `c` lies in the Arabic Unicode block (U+0600..=U+06FF).
pub fn is_arabic(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Case-insensitive alternation over `keywords`.
///
/// Matches are leftmost-first and never overlap, so at each position the
/// earliest listed keyword wins and scanning resumes after it: "ifor" is
/// one hit ("if"), not two.
fn keyword_regex(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    // built from escaped literals, so it always compiles
    Regex::new(&format!("(?i){alternation}")).unwrap()
}
