//! Tour stylesheet for DOM hosts
//!
//! Injected once per page. Every themed token is written as
//! `var(--token, fallback)` so the tour renders correctly on pages that do not
//! define the dashboard theme variables.

/// Id of the injected `<style>` element
pub const STYLESHEET_ID: &str = "tour-styles";

/// Class toggled on the highlighted target
pub const HIGHLIGHT_CLASS: &str = "tour-highlight";

/// Attribute mirrored with the highlight class
pub const HIGHLIGHT_ATTRIBUTE: &str = "data-tour-highlight";

/// Element ids of the mounted surfaces
pub const OVERLAY_ID: &str = "tourOverlay";
pub const POPUP_ID: &str = "tourPopup";
pub const PROMPT_ID: &str = "tourPrompt";

pub const TOUR_STYLESHEET: &str = r#"
.tour-overlay {
    position: fixed;
    inset: 0;
    background: rgba(0, 0, 0, 0.6);
    backdrop-filter: blur(4px);
    z-index: 9998;
    animation: fadeIn 0.3s ease;
}

.tour-highlight {
    position: relative !important;
    z-index: 9999 !important;
    box-shadow: 0 0 0 4px var(--primary, #2563eb), 0 0 30px var(--primary-glow, rgba(37, 99, 235, 0.5)) !important;
    border-radius: 12px !important;
    animation: pulse 2s infinite !important;
    background: var(--bg-card, #ffffff) !important;
    transition: all 0.3s ease !important;
}

.tour-popup {
    position: fixed;
    background: var(--bg-card, #ffffff);
    color: var(--text-primary, #0f172a);
    border-radius: 16px;
    padding: 1.5rem;
    width: 340px;
    box-shadow: 0 20px 40px rgba(0, 0, 0, 0.3);
    z-index: 10000;
    border: 1px solid var(--border-light, #e2e8f0);
    animation: scaleIn 0.3s ease;
}

.tour-popup-arrow {
    position: absolute;
    width: 16px;
    height: 16px;
    background: var(--bg-card, #ffffff);
    transform: rotate(45deg);
    border: 1px solid var(--border-light, #e2e8f0);
    z-index: 9999;
}

.tour-popup-arrow-top { border-bottom: none; border-right: none; }
.tour-popup-arrow-bottom { border-top: none; border-left: none; }
.tour-popup-arrow-left { border-right: none; border-top: none; }
.tour-popup-arrow-right { border-left: none; border-bottom: none; }

.tour-popup-header {
    display: flex;
    align-items: center;
    justify-content: space-between;
    margin-bottom: 1rem;
}

.tour-popup-header h3 {
    font-size: 1.2rem;
    font-weight: 700;
    margin: 0;
    color: var(--text-primary, #0f172a);
}

.tour-close {
    width: 30px;
    height: 30px;
    border-radius: 50%;
    border: 1px solid var(--border-light, #e2e8f0);
    background: var(--bg-tertiary, #f8fafc);
    color: var(--text-tertiary, #64748b);
    cursor: pointer;
}

.tour-close:hover {
    background: var(--error, #ef4444);
    color: white;
    border-color: var(--error, #ef4444);
}

.tour-popup-body {
    margin-bottom: 1.5rem;
    line-height: 1.6;
    color: var(--text-secondary, #475569);
    font-size: 0.95rem;
}

.tour-popup-footer {
    border-top: 1px solid var(--border-light, #e2e8f0);
    padding-top: 1rem;
}

.tour-progress { margin-bottom: 1rem; }

.tour-progress span {
    font-size: 0.8rem;
    color: var(--text-tertiary, #64748b);
    display: block;
    margin-bottom: 0.5rem;
}

.tour-progress-bar {
    height: 4px;
    background: var(--bg-tertiary, #e2e8f0);
    border-radius: 2px;
    overflow: hidden;
}

.tour-progress-fill {
    height: 100%;
    background: linear-gradient(90deg, var(--primary, #2563eb), var(--secondary, #06b6d4));
    transition: width 0.3s ease;
}

.tour-buttons {
    display: flex;
    gap: 0.5rem;
    justify-content: flex-end;
}

.tour-prev, .tour-next, .tour-complete {
    padding: 0.6rem 1.2rem;
    border: none;
    border-radius: 8px;
    cursor: pointer;
    font-weight: 600;
    font-size: 0.9rem;
}

.tour-prev { background: var(--bg-tertiary, #f8fafc); color: var(--text-secondary, #475569); }
.tour-next { background: var(--primary, #2563eb); color: white; }
.tour-complete { background: var(--success, #10b981); color: white; }

.tour-prompt {
    position: fixed;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    z-index: 10001;
    background: rgba(0, 0, 0, 0.4);
    backdrop-filter: blur(4px);
}

.tour-prompt-content {
    background: var(--bg-card, #ffffff);
    color: var(--text-primary, #0f172a);
    border-radius: 24px;
    padding: 2.5rem;
    max-width: 400px;
    text-align: center;
    border: 1px solid var(--border-light, #e2e8f0);
}

.tour-prompt-yes {
    background: linear-gradient(135deg, var(--primary, #2563eb), var(--secondary, #06b6d4));
    color: white;
}

.tour-prompt-no {
    background: var(--bg-tertiary, #f8fafc);
    color: var(--text-secondary, #475569);
    border: 1px solid var(--border-light, #e2e8f0);
}

@keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }
@keyframes scaleIn { from { opacity: 0; transform: scale(0.9); } to { opacity: 1; transform: scale(1); } }
@keyframes pulse {
    0%, 100% { box-shadow: 0 0 0 4px var(--primary, #2563eb), 0 0 20px var(--primary-glow, rgba(37, 99, 235, 0.3)); }
    50% { box-shadow: 0 0 0 8px var(--primary, #2563eb), 0 0 30px var(--primary-glow, rgba(37, 99, 235, 0.5)); }
}
"#;

/// A theme variable referenced by the stylesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeToken {
    pub name: String,
    pub fallback: Option<String>,
}

/// Every `var(--name, fallback)` in `css`, in order of first appearance
pub fn theme_tokens(css: &str) -> Vec<ThemeToken> {
    let mut tokens: Vec<ThemeToken> = Vec::new();
    let mut rest = css;

    while let Some(start) = rest.find("var(") {
        let body = &rest[start + 4..];
        let Some(end) = matching_paren(body) else {
            break;
        };
        let inner = &body[..end];
        let (name, fallback) = match inner.split_once(',') {
            Some((name, fallback)) => (name.trim(), Some(fallback.trim().to_string())),
            None => (inner.trim(), None),
        };
        if !tokens.iter().any(|t| t.name == name) {
            tokens.push(ThemeToken {
                name: name.to_string(),
                fallback,
            });
        }
        rest = &body[end + 1..];
    }

    tokens
}

// Index of the `)` closing a `var(` whose body starts at `body`
fn matching_paren(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(i),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}
