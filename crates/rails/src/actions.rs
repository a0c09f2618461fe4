//! Heuristic rail actions.
//!
//! These are the custom checks a guardrails configuration can call. They
//! are plain keyword and pattern matches over the message text: each returns
//! `true` when the text should be blocked (or, for the topic checks, when it
//! is off topic). The local backend runs them directly and the web server
//! exposes them to an external guardrails engine through the actions
//! endpoint.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum accepted user input, in characters.
pub const MAX_INPUT_CHARS: usize = 2000;

static JAILBREAK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"ignore\s+(all\s+)?(previous|prior|above)\s+instructions?",
        r"disregard\s+(all\s+)?(previous|prior|above)",
        r"forget\s+(all\s+)?(previous|prior|above)",
        r"pretend\s+(you\s+are|to\s+be)",
        r"roleplay\s+as",
        r"act\s+as\s+(if\s+)?you",
        r"simulate\s+(being|that\s+you)",
        r"jailbreak",
        r"DAN\s+mode",
        r"developer\s+mode",
        r"bypass\s+(your\s+)?(safety|guidelines|rules|restrictions)",
        r"override\s+(your\s+)?(safety|guidelines|rules|restrictions)",
    ])
});

static OFF_TOPIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(weather|temperature|forecast)\b",
        r"\b(cook|recipe|food|restaurant)\b",
        r"\b(sports|game|match|score)\b",
        r"\b(movie|film|actor|actress)\b",
        r"\b(music|song|album|artist)\b",
        r"\b(news|politics|election)\b",
        r"\b(car|vehicle|drive|engine)\b",
        r"\b(health|medical|doctor|medicine)\b",
    ])
});

const BLOCKED_TERMS: &[&str] = &[
    // cybersecurity
    "hack",
    "exploit",
    "bypass",
    "malware",
    "virus",
    // weapons
    "bomb",
    "explosive",
    "weapon",
    "gun",
    "ammunition",
    "grenade",
    "missile",
    // violence
    "kill",
    "murder",
    "assassinate",
    "torture",
    "poison",
    "suicide",
    // illegal activity
    "illegal",
    "smuggle",
    "counterfeit",
    "fraud",
    "scam",
    // drugs
    "cocaine",
    "heroin",
    "methamphetamine",
    "fentanyl",
];

const POLITICAL_TERMS: &[&str] = &[
    "trump",
    "donald trump",
    "biden",
    "joe biden",
    "obama",
    "clinton",
    "hillary",
    "republican",
    "democrat",
    "gop",
    "maga",
    "politics",
    "political",
    "election",
    "vote",
    "voting",
    "congress",
    "senate",
    "president",
    "presidential",
    "white house",
    "capitol",
    "impeach",
];

const TOPIC_KEYWORDS: &[&str] = &[
    "dynatrace",
    "observability",
    "monitoring",
    "apm",
    "application performance",
    "tracing",
    "logs",
    "metrics",
    "oneagent",
    "activegate",
    "davis",
    "rum",
    "synthetic",
    "infrastructure",
    "kubernetes",
    "opentelemetry",
    "grail",
];

const RELEVANCE_KEYWORDS: &[&str] = &[
    "dynatrace",
    "observability",
    "monitoring",
    "apm",
    "tracing",
    "logs",
    "metrics",
    "oneagent",
    "activegate",
    "davis",
    "kubernetes",
    "opentelemetry",
    "debugging",
    "evaluation",
    "llm",
    "agent",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(&format!("(?i){}", pattern)) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::warn!("Skipping invalid rail pattern {}: {}", pattern, e);
                None
            }
        })
        .collect()
}

/// Context handed to a rail action.
///
/// Field names follow what guardrails engines put into the action context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_user_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_bot_message: Option<String>,
}

impl ActionContext {
    /// Context for checking a user message.
    pub fn for_user(message: impl Into<String>) -> Self {
        Self {
            user_message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Context for checking a bot answer to a user message.
    pub fn for_exchange(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            user_message: Some(user.into()),
            bot_message: Some(bot.into()),
            ..Default::default()
        }
    }

    /// User text, falling back to the last user message.
    pub fn user_text(&self) -> Option<&str> {
        first_non_empty(&self.user_message, &self.last_user_message)
    }

    /// Bot text, falling back to the last bot message.
    pub fn bot_text(&self) -> Option<&str> {
        first_non_empty(&self.bot_message, &self.last_bot_message)
    }
}

fn first_non_empty<'a>(primary: &'a Option<String>, fallback: &'a Option<String>) -> Option<&'a str> {
    primary
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| fallback.as_deref().filter(|s| !s.is_empty()))
}

/// Detects attempts to override the assistant's instructions.
pub fn check_jailbreak(context: &ActionContext) -> bool {
    match context.user_text() {
        Some(text) => JAILBREAK_PATTERNS.iter().any(|re| re.is_match(text)),
        None => false,
    }
}

/// Detects harmful terms in the user message and the bot answer together.
pub fn check_blocked_terms(context: &ActionContext) -> bool {
    let text = format!(
        "{} {}",
        context.user_text().unwrap_or_default(),
        context.bot_text().unwrap_or_default()
    )
    .to_lowercase();

    BLOCKED_TERMS.iter().any(|term| text.contains(term))
}

/// True when the user message is longer than [`MAX_INPUT_CHARS`].
pub fn check_input_length(context: &ActionContext) -> bool {
    match context.user_text() {
        Some(text) => text.chars().count() > MAX_INPUT_CHARS,
        None => false,
    }
}

/// Detects political figures and topics in the user message.
pub fn check_politics(context: &ActionContext) -> bool {
    match context.user_text() {
        Some(text) => {
            let text = text.to_lowercase();
            POLITICAL_TERMS.iter().any(|term| text.contains(term))
        }
        None => false,
    }
}

/// True when the user message is clearly off topic.
///
/// Any topic keyword keeps the message on topic; otherwise it is off topic
/// only when it matches one of the off-topic categories.
pub fn check_input_topic(context: &ActionContext) -> bool {
    let Some(text) = context.user_text() else {
        return false;
    };
    let text = text.to_lowercase();

    if TOPIC_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        return false;
    }

    OFF_TOPIC_PATTERNS.iter().any(|re| re.is_match(&text))
}

/// True when the bot answer mentions none of the relevance keywords.
pub fn check_output_relevance(context: &ActionContext) -> bool {
    match context.bot_text() {
        Some(text) => {
            let text = text.to_lowercase();
            !RELEVANCE_KEYWORDS.iter().any(|keyword| text.contains(keyword))
        }
        None => false,
    }
}

/// The registered rail actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RailAction {
    Jailbreak,
    BlockedTerms,
    InputLength,
    Politics,
    InputTopic,
    OutputRelevance,
}

impl RailAction {
    pub const ALL: [RailAction; 6] = [
        Self::Jailbreak,
        Self::BlockedTerms,
        Self::InputLength,
        Self::Politics,
        Self::InputTopic,
        Self::OutputRelevance,
    ];

    /// Parse an action from its registered name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    /// Name the action is registered under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jailbreak => "check_jailbreak",
            Self::BlockedTerms => "check_blocked_terms",
            Self::InputLength => "check_input_length",
            Self::Politics => "check_politics",
            Self::InputTopic => "check_input_topic",
            Self::OutputRelevance => "check_output_relevance",
        }
    }

    /// Run the action.
    pub fn run(&self, context: &ActionContext) -> bool {
        match self {
            Self::Jailbreak => check_jailbreak(context),
            Self::BlockedTerms => check_blocked_terms(context),
            Self::InputLength => check_input_length(context),
            Self::Politics => check_politics(context),
            Self::InputTopic => check_input_topic(context),
            Self::OutputRelevance => check_output_relevance(context),
        }
    }

    /// Answer the local backend gives when this action triggers.
    ///
    /// Every refusal contains one of the phrases the pipeline treats as a
    /// block.
    pub fn refusal(&self) -> &'static str {
        match self {
            Self::Jailbreak => "I'm sorry, I can't comply with requests to ignore my instructions.",
            Self::BlockedTerms => "I'm sorry, I can't respond to that.",
            Self::InputLength => "I'm sorry, your question is too long. Please ask a shorter question.",
            Self::Politics => "I'm sorry, I cannot discuss political topics.",
            Self::InputTopic | Self::OutputRelevance => {
                "I can only answer questions about observability and monitoring. Please ask questions on that topic."
            }
        }
    }
}
