//! Entry prompt offered to first-time visitors of the dashboard

use crate::config::TourConfig;

/// The user's answer to the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptChoice {
    /// "Yes, show me around"
    Accept,
    /// "No, thanks"
    Decline,
}

/// Prompt copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptView {
    pub icon: String,
    pub heading: String,
    pub message: String,
    pub accept_label: String,
    pub decline_label: String,
}

impl Default for PromptView {
    fn default() -> Self {
        Self {
            icon: "👋".to_string(),
            heading: "Welcome to Klodev Apex!".to_string(),
            message: "Would you like a quick tour to see how everything works?".to_string(),
            accept_label: "Yes, show me around".to_string(),
            decline_label: "No, thanks".to_string(),
        }
    }
}

impl PromptView {
    pub fn label(&self, choice: PromptChoice) -> &str {
        match choice {
            PromptChoice::Accept => &self.accept_label,
            PromptChoice::Decline => &self.decline_label,
        }
    }
}

/// Lifecycle of the prompt within one page load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptPhase {
    /// Not offered on this page load
    #[default]
    Idle,
    /// Waiting for the load delay to pass
    Scheduled { due_at: u64 },
    /// On screen, waiting for an answer
    Shown,
    /// Answered
    Dismissed(PromptChoice),
}

/// The prompt is only offered on the dashboard route, and never once the
/// tour has been completed or declined.
pub fn should_offer(path: &str, completed: bool, config: &TourConfig) -> bool {
    !completed && path == config.dashboard_route
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_only_on_dashboard() {
        let config = TourConfig::default();
        assert!(should_offer("/dashboard", false, &config));
        assert!(!should_offer("/dashboard", true, &config));
        assert!(!should_offer("/landing", false, &config));
        assert!(!should_offer("/agents/classification", false, &config));
    }

    #[test]
    fn test_prompt_labels() {
        let view = PromptView::default();
        assert_eq!(view.label(PromptChoice::Accept), "Yes, show me around");
        assert_eq!(view.label(PromptChoice::Decline), "No, thanks");
    }
}
