//! Bot command parser.
//!
//! Recognizes `/start` and `/news [provider|all] [count]`; everything else
//! is answered with the usage text.

use crate::{NewsError, Result};

/// Items per provider when the command does not give a count.
pub const DEFAULT_NEWS_COUNT: usize = 3;

/// Largest count a single request may ask for.
pub const MAX_NEWS_COUNT: usize = 10;

/// Selector value meaning every provider.
pub const ALL_PROVIDERS: &str = "all";

/// A parsed bot input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// `/start` greeting.
    Start,
    /// `/news` with its raw arguments (everything after the command word).
    News(String),
    /// Anything else.
    Unknown(String),
}

impl BotCommand {
    /// Get the command name.
    pub fn name(&self) -> &str {
        match self {
            BotCommand::Start => "start",
            BotCommand::News(_) => "news",
            BotCommand::Unknown(_) => "unknown",
        }
    }
}

/// Which providers a `news` request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    All,
    /// Lowercased provider name; may not be registered.
    Provider(String),
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::All => write!(f, "{ALL_PROVIDERS}"),
            Selector::Provider(name) => write!(f, "{name}"),
        }
    }
}

/// A validated `news` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRequest {
    pub selector: Selector,
    pub count: usize,
}

impl NewsRequest {
    /// Parse `news` arguments.
    ///
    /// The first token picks a provider (`all` or absent means every
    /// provider). The second token sets the count when it is a positive
    /// integer, otherwise [`DEFAULT_NEWS_COUNT`] applies. A count above
    /// [`MAX_NEWS_COUNT`] is rejected outright.
    pub fn parse(args: &str) -> Result<Self> {
        let mut tokens = args.split_whitespace();

        let selector = match tokens.next().map(str::to_lowercase) {
            None => Selector::All,
            Some(name) if name == ALL_PROVIDERS => Selector::All,
            Some(name) => Selector::Provider(name),
        };

        let count = match tokens.next().map(parse_count) {
            Some(Count::Value(n)) if n > 0 => n,
            Some(Count::Overflow) => {
                return Err(NewsError::CountExceedsLimit {
                    requested: usize::MAX,
                    max: MAX_NEWS_COUNT,
                })
            }
            _ => DEFAULT_NEWS_COUNT,
        };

        if count > MAX_NEWS_COUNT {
            return Err(NewsError::CountExceedsLimit {
                requested: count,
                max: MAX_NEWS_COUNT,
            });
        }

        Ok(Self { selector, count })
    }
}

enum Count {
    Value(usize),
    /// All digits, but too large for `usize`.
    Overflow,
    Invalid,
}

fn parse_count(token: &str) -> Count {
    let digits = token.strip_prefix('+').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Count::Invalid;
    }
    match digits.parse::<usize>() {
        Ok(n) => Count::Value(n),
        Err(_) => Count::Overflow,
    }
}

/// Parse a chat message into a bot command.
///
/// Accepts the `/cmd@BotName` form used in group chats. Command words are
/// case-insensitive.
pub fn parse_input(input: &str) -> BotCommand {
    let trimmed = input.trim();

    let Some(without_slash) = trimmed.strip_prefix('/') else {
        return BotCommand::Unknown(trimmed.to_string());
    };

    let (word, args) = match without_slash.find(char::is_whitespace) {
        Some(pos) => (&without_slash[..pos], without_slash[pos..].trim()),
        None => (without_slash, ""),
    };
    let word = word.split('@').next().unwrap_or(word);

    match word.to_lowercase().as_str() {
        "news" => BotCommand::News(args.to_string()),
        "start" => BotCommand::Start,
        _ => BotCommand::Unknown(trimmed.to_string()),
    }
}
