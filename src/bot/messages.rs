//! Fixed reply texts.

use super::command::{DEFAULT_NEWS_COUNT, MAX_NEWS_COUNT};

/// Greeting for `/start`.
pub const GREETING: &str = "👋 Hi! Send /news to get the latest crypto news.";

/// Shown in place of a provider's items when its feed could not be used.
pub const PROVIDER_FAILED_TO_LOAD: &str = "❌ News failed to load.";

/// Every source failed for this request.
pub const NO_RSS_DATA: &str = "❌ No data available from RSS providers.";

/// Unexpected failure; details go to the log only.
pub const FETCH_ERROR: &str = "❌ Failed to fetch news.";

/// Visual separator between provider blocks.
pub const PROVIDER_SEPARATOR: &str = "\n\n—————————————\n\n";

/// Rejection for a count above the cap.
pub fn count_exceeds_limit() -> String {
    format!("❌ Requested news count exceeds limit: at most {MAX_NEWS_COUNT} items per request.")
}

/// Rejection for an unregistered provider.
pub fn provider_not_recognized(available: &[&str]) -> String {
    format!(
        "❌ News provider not recognized. Available providers: {}.",
        available.join(", ")
    )
}

/// Usage text for unknown input.
pub fn usage(available: &[&str]) -> String {
    [
        "❌ Unknown command.".to_string(),
        String::new(),
        "📌 Available commands:".to_string(),
        format!("/news - latest {DEFAULT_NEWS_COUNT} news from every provider"),
        format!(
            "/news [provider] - news from one provider ({})",
            available.join(", ")
        ),
        format!("/news [provider] [n] - latest n news from one provider (max {MAX_NEWS_COUNT})"),
        format!("/news all [n] - latest n news from every provider (max {MAX_NEWS_COUNT})"),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_exceeds_limit_text() {
        let text = count_exceeds_limit();
        assert!(text.contains("exceeds limit"));
        assert!(text.contains("10"));
    }

    #[test]
    fn test_provider_not_recognized_lists_providers() {
        let text = provider_not_recognized(&["coindesk", "decrypt"]);
        assert!(text.contains("provider not recognized"));
        assert!(text.ends_with("coindesk, decrypt."));
    }

    #[test]
    fn test_usage_lists_every_form() {
        let text = usage(&["coindesk", "cointelegraph", "decrypt"]);
        assert!(text.contains("/news - "));
        assert!(text.contains("/news [provider] - "));
        assert!(text.contains("/news [provider] [n]"));
        assert!(text.contains("/news all [n]"));
        assert!(text.contains("coindesk, cointelegraph, decrypt"));
    }
}
