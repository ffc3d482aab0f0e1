//! Tour script: the ordered, immutable list of steps
//!
//! Scripts are authored statically. The built-in script walks a new user
//! through the campaign dashboard; custom scripts can be loaded from JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::TourError;
use crate::types::Placement;

/// One highlight + popup unit of the tour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourStep {
    /// Selector identifying exactly one element on the page
    pub target: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub placement: Placement,
    /// Pixels kept between the top of the viewport and the target after scrolling
    #[serde(default)]
    pub scroll_offset: i32,
}

impl TourStep {
    pub fn new(
        target: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        placement: Placement,
        scroll_offset: i32,
    ) -> Self {
        Self {
            target: target.into(),
            title: title.into(),
            description: description.into(),
            placement,
            scroll_offset,
        }
    }
}

/// Ordered sequence of steps, fixed for the lifetime of an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TourScript {
    steps: Vec<TourStep>,
}

impl TourScript {
    pub fn new(steps: Vec<TourStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[TourStep] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&TourStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the final step, None for an empty script
    pub fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    pub fn is_last(&self, index: usize) -> bool {
        self.last_index() == Some(index)
    }

    /// Load a script from a JSON array of steps
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read tour script from {:?}", path.as_ref()))?;

        let script: Self =
            serde_json::from_str(&content).context("Failed to parse tour script JSON")?;

        Ok(script)
    }

    /// Save the script as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize tour script")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write tour script to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Validate the script
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.steps.is_empty() {
            return Err(TourError::script("Tour script must contain at least one step"));
        }

        for (index, step) in self.steps.iter().enumerate() {
            if step.target.trim().is_empty() {
                return Err(TourError::script(format!(
                    "Step {} has an empty target selector",
                    index + 1
                )));
            }
            if step.title.trim().is_empty() {
                return Err(TourError::script(format!(
                    "Step {} has an empty title",
                    index + 1
                )));
            }
        }

        Ok(())
    }
}

impl Default for TourScript {
    /// The dashboard onboarding tour
    fn default() -> Self {
        Self::new(vec![
            TourStep::new(
                ".page-title",
                "👋 Welcome to Klodev Apex!",
                "This is your dashboard where you can monitor all your campaigns and agent activities in real-time.",
                Placement::Bottom,
                100,
            ),
            TourStep::new(
                ".stats-grid",
                "📊 Real-time Metrics",
                "Track your key performance indicators here. See emails sent, calls made, and engagement rates at a glance.",
                Placement::Top,
                100,
            ),
            TourStep::new(
                ".agent-pipeline",
                "🤖 Multi-Agent Pipeline",
                "Watch your 4 AI agents work in sequence: Classification → ICP → Platform Decision → Content Generation.",
                Placement::Bottom,
                100,
            ),
            TourStep::new(
                ".global-execute-btn",
                "🚀 Execute All Agents",
                "Click here to run all agents at once. They will process your input and take real actions like sending emails and making calls!",
                Placement::Left,
                50,
            ),
            TourStep::new(
                ".nav-item[href=\"/agents/classification\"]",
                "🎯 Agent 1 - Classification",
                "Visit each agent page to see detailed results and fine-tune parameters for your specific needs.",
                Placement::Right,
                50,
            ),
            TourStep::new(
                ".ai-insights-panel",
                "💡 AI Assistant",
                "Get real-time insights and suggestions from your AI assistant to optimize your campaigns and improve performance.",
                Placement::Left,
                20,
            ),
        ])
    }
}
