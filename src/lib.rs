//! Dashboard Tour Library
//!
//! A guided product tour engine: it highlights page elements one step at a
//! time, places a popup next to each, and remembers when the user is done.
//! The engine drives any host implementing `Page`; the crate also ships an
//! in-memory page and a terminal front end.

pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod notify;
pub mod page;
pub mod placement;
pub mod popup;
pub mod prompt;
pub mod resolver;
pub mod script;
pub mod store;
pub mod styles;
pub mod theme;
pub mod types;
pub mod ui;

// Re-export main types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{PlacementMetrics, TourConfig};
pub use engine::{NavEvent, StartOutcome, StepPhase, TourEngine, TourState, TourTransitionError};
pub use error::TourError;
pub use notify::{Notifier, Toast, ToastBoard};
pub use page::{ElementId, Page, ScrollBehavior, Surface, VirtualPage};
pub use placement::{Arrow, PopupLayout, place_popup};
pub use popup::{PopupControl, PopupView, Progress};
pub use prompt::{PromptChoice, PromptPhase, PromptView};
pub use resolver::{Resolve, ResolveStatus};
pub use script::{TourScript, TourStep};
pub use store::{CompletionFlag, FlagStore, JsonFileStore, MemoryStore};
pub use types::{NoticeKind, Placement, Point, Rect, Size};
