//! Click event model for asynchronous click tracking.

/// A click captured by the redirect handler, waiting to be persisted.
///
/// Travels from the handler to the background worker over a channel so the
/// redirect never waits on the analytics write. Header values are kept as
/// received; empty strings mean the header was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub referer: String,
    pub user_agent: String,
    pub ip: String,
}

impl ClickEvent {
    /// Creates a new click event.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(
    ///     42,
    ///     Some("https://google.com"),
    ///     Some("Mozilla/5.0"),
    ///     "192.168.1.1".to_string(),
    /// );
    /// ```
    pub fn new(link_id: i64, referer: Option<&str>, user_agent: Option<&str>, ip: String) -> Self {
        Self {
            link_id,
            referer: referer.unwrap_or_default().to_string(),
            user_agent: user_agent.unwrap_or_default().to_string(),
            ip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_creation_full() {
        let event = ClickEvent::new(
            42,
            Some("https://google.com"),
            Some("Mozilla/5.0"),
            "192.168.1.1".to_string(),
        );

        assert_eq!(event.link_id, 42);
        assert_eq!(event.referer, "https://google.com");
        assert_eq!(event.user_agent, "Mozilla/5.0");
        assert_eq!(event.ip, "192.168.1.1");
    }

    #[test]
    fn test_click_event_creation_minimal() {
        let event = ClickEvent::new(7, None, None, String::new());

        assert_eq!(event.link_id, 7);
        assert!(event.referer.is_empty());
        assert!(event.user_agent.is_empty());
        assert!(event.ip.is_empty());
    }
}
