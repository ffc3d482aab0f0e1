//! Host page abstraction
//!
//! The engine never touches a document directly. Everything it needs from the
//! host (element lookup and measurement, scrolling, highlight marks, mounting
//! the overlay/popup/prompt surfaces, key listener registration, stylesheet
//! injection) goes through `Page`. `VirtualPage` is the in-memory document used
//! by the terminal front end and the tests.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{Result, TourError};
use crate::placement::PopupLayout;
use crate::popup::PopupView;
use crate::prompt::PromptView;
use crate::styles::{HIGHLIGHT_ATTRIBUTE, HIGHLIGHT_CLASS, OVERLAY_ID, POPUP_ID, PROMPT_ID};
use crate::types::{Rect, Size};

/// Handle to a live element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// Transient UI surfaces the tour adds to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Dimming backdrop
    Overlay,
    /// Step popup with controls
    Popup,
    /// Entry prompt modal
    Prompt,
}

impl Surface {
    /// Element id the surface is mounted under; one element per surface
    pub const fn dom_id(self) -> &'static str {
        match self {
            Surface::Overlay => OVERLAY_ID,
            Surface::Popup => POPUP_ID,
            Surface::Prompt => PROMPT_ID,
        }
    }
}

/// Registration handle of a keydown listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Scroll animation hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// Everything the tour needs from the host page
pub trait Page {
    /// Path of the current route, e.g. `/dashboard`
    fn current_path(&self) -> String;

    /// First element matching `selector`
    fn query(&self, selector: &str) -> Option<ElementId>;

    /// Element box in viewport coordinates; None once the element is gone
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    fn viewport(&self) -> Size;

    fn scroll_y(&self) -> f64;

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    /// Remove the highlight mark from every element
    fn clear_highlights(&mut self);

    fn highlight(&mut self, element: ElementId);

    fn highlighted(&self) -> Vec<ElementId>;

    fn mount(&mut self, surface: Surface) -> Result<()>;

    /// Removing an absent surface is a no-op
    fn unmount(&mut self, surface: Surface);

    fn is_mounted(&self, surface: Surface) -> bool;

    /// Current rendered size of the popup surface
    fn popup_size(&self) -> Size;

    fn render_popup(&mut self, view: &PopupView, layout: &PopupLayout);

    fn render_prompt(&mut self, view: &PromptView);

    fn add_key_listener(&mut self) -> ListenerId;

    /// Removing an unknown listener is a no-op
    fn remove_key_listener(&mut self, id: ListenerId);

    /// Inject a stylesheet; returns false if one with `id` already exists
    fn inject_stylesheet(&mut self, id: &str, css: &str) -> bool;
}

/// A borrowed page, for hosts that outlive the engine driving them
impl<P: Page + ?Sized> Page for &mut P {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn query(&self, selector: &str) -> Option<ElementId> {
        (**self).query(selector)
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        (**self).bounding_rect(element)
    }

    fn viewport(&self) -> Size {
        (**self).viewport()
    }

    fn scroll_y(&self) -> f64 {
        (**self).scroll_y()
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        (**self).scroll_to(top, behavior)
    }

    fn clear_highlights(&mut self) {
        (**self).clear_highlights()
    }

    fn highlight(&mut self, element: ElementId) {
        (**self).highlight(element)
    }

    fn highlighted(&self) -> Vec<ElementId> {
        (**self).highlighted()
    }

    fn mount(&mut self, surface: Surface) -> Result<()> {
        (**self).mount(surface)
    }

    fn unmount(&mut self, surface: Surface) {
        (**self).unmount(surface)
    }

    fn is_mounted(&self, surface: Surface) -> bool {
        (**self).is_mounted(surface)
    }

    fn popup_size(&self) -> Size {
        (**self).popup_size()
    }

    fn render_popup(&mut self, view: &PopupView, layout: &PopupLayout) {
        (**self).render_popup(view, layout)
    }

    fn render_prompt(&mut self, view: &PromptView) {
        (**self).render_prompt(view)
    }

    fn add_key_listener(&mut self) -> ListenerId {
        (**self).add_key_listener()
    }

    fn remove_key_listener(&mut self, id: ListenerId) {
        (**self).remove_key_listener(id)
    }

    fn inject_stylesheet(&mut self, id: &str, css: &str) -> bool {
        (**self).inject_stylesheet(id, css)
    }
}

/// Element of a `VirtualPage`
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualElement {
    pub selector: String,
    /// Box in document coordinates
    pub rect: Rect,
    pub classes: BTreeSet<String>,
    pub attributes: HashMap<String, String>,
}

impl VirtualElement {
    pub fn is_highlighted(&self) -> bool {
        self.classes.contains(HIGHLIGHT_CLASS)
    }
}

/// In-memory document with a scrollable viewport
#[derive(Debug, Clone)]
pub struct VirtualPage {
    path: String,
    viewport: Size,
    document_height: f64,
    scroll_y: f64,
    elements: Vec<Option<VirtualElement>>,
    mounted: HashSet<Surface>,
    failing: HashSet<Surface>,
    popup_size: Size,
    popup: Option<(PopupView, PopupLayout)>,
    prompt: Option<PromptView>,
    listeners: Vec<ListenerId>,
    next_listener: u64,
    stylesheets: HashMap<String, String>,
    scroll_log: Vec<f64>,
}

impl VirtualPage {
    pub fn new(path: impl Into<String>, viewport: Size) -> Self {
        Self {
            path: path.into(),
            viewport,
            document_height: viewport.height,
            scroll_y: 0.0,
            elements: Vec::new(),
            mounted: HashSet::new(),
            failing: HashSet::new(),
            popup_size: Size::new(340.0, 220.0),
            popup: None,
            prompt: None,
            listeners: Vec::new(),
            next_listener: 1,
            stylesheets: HashMap::new(),
            scroll_log: Vec::new(),
        }
    }

    /// Add an element; the document grows to contain it
    pub fn insert(&mut self, selector: impl Into<String>, rect: Rect) -> ElementId {
        self.document_height = self.document_height.max(rect.bottom());
        self.elements.push(Some(VirtualElement {
            selector: selector.into(),
            rect,
            classes: BTreeSet::new(),
            attributes: HashMap::new(),
        }));
        ElementId(self.elements.len() - 1)
    }

    /// Remove every element matching `selector`
    pub fn remove(&mut self, selector: &str) {
        for slot in &mut self.elements {
            if slot.as_ref().is_some_and(|e| e.selector == selector) {
                *slot = None;
            }
        }
    }

    pub fn element(&self, id: ElementId) -> Option<&VirtualElement> {
        self.elements.get(id.0)?.as_ref()
    }

    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &VirtualElement)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (ElementId(i), e)))
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.scroll_y = self.scroll_y.min(self.max_scroll());
    }

    pub fn set_popup_size(&mut self, size: Size) {
        self.popup_size = size;
    }

    pub fn set_document_height(&mut self, height: f64) {
        self.document_height = height;
    }

    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    /// Make the next `mount` of `surface` fail
    pub fn fail_mount(&mut self, surface: Surface) {
        self.failing.insert(surface);
    }

    /// Mounted surface carrying the element id `id`
    pub fn surface_by_id(&self, id: &str) -> Option<Surface> {
        self.mounted.iter().copied().find(|s| s.dom_id() == id)
    }

    pub fn popup(&self) -> Option<&(PopupView, PopupLayout)> {
        self.popup.as_ref()
    }

    pub fn prompt(&self) -> Option<&PromptView> {
        self.prompt.as_ref()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_stylesheet(&self, id: &str) -> bool {
        self.stylesheets.contains_key(id)
    }

    pub fn stylesheet_count(&self) -> usize {
        self.stylesheets.len()
    }

    /// Every scroll target requested so far
    pub fn scroll_log(&self) -> &[f64] {
        &self.scroll_log
    }

    fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport.height).max(0.0)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut VirtualElement> {
        self.elements.get_mut(id.0)?.as_mut()
    }
}

impl Page for VirtualPage {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn query(&self, selector: &str) -> Option<ElementId> {
        self.elements()
            .find(|(_, e)| e.selector == selector)
            .map(|(id, _)| id)
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.element(element)
            .map(|e| e.rect.offset_y(-self.scroll_y))
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, top: f64, _behavior: ScrollBehavior) {
        self.scroll_log.push(top);
        self.scroll_y = top.clamp(0.0, self.max_scroll());
    }

    fn clear_highlights(&mut self) {
        for element in self.elements.iter_mut().flatten() {
            element.classes.remove(HIGHLIGHT_CLASS);
            element.attributes.remove(HIGHLIGHT_ATTRIBUTE);
        }
    }

    fn highlight(&mut self, element: ElementId) {
        if let Some(element) = self.element_mut(element) {
            element.classes.insert(HIGHLIGHT_CLASS.to_string());
            element
                .attributes
                .insert(HIGHLIGHT_ATTRIBUTE.to_string(), "true".to_string());
        }
    }

    fn highlighted(&self) -> Vec<ElementId> {
        self.elements()
            .filter(|(_, e)| e.is_highlighted())
            .map(|(id, _)| id)
            .collect()
    }

    fn mount(&mut self, surface: Surface) -> Result<()> {
        if self.failing.remove(&surface) {
            return Err(TourError::page(format!("failed to mount #{}", surface.dom_id())));
        }
        self.mounted.insert(surface);
        Ok(())
    }

    fn unmount(&mut self, surface: Surface) {
        self.mounted.remove(&surface);
        match surface {
            Surface::Popup => self.popup = None,
            Surface::Prompt => self.prompt = None,
            Surface::Overlay => {}
        }
    }

    fn is_mounted(&self, surface: Surface) -> bool {
        self.mounted.contains(&surface)
    }

    fn popup_size(&self) -> Size {
        self.popup_size
    }

    fn render_popup(&mut self, view: &PopupView, layout: &PopupLayout) {
        if self.is_mounted(Surface::Popup) {
            self.popup = Some((view.clone(), *layout));
        }
    }

    fn render_prompt(&mut self, view: &PromptView) {
        if self.is_mounted(Surface::Prompt) {
            self.prompt = Some(view.clone());
        }
    }

    fn add_key_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(id);
        id
    }

    fn remove_key_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|l| *l != id);
    }

    fn inject_stylesheet(&mut self, id: &str, css: &str) -> bool {
        if self.stylesheets.contains_key(id) {
            return false;
        }
        self.stylesheets.insert(id.to_string(), css.to_string());
        true
    }
}
