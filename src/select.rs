//! Headless generic search-select widget.
//!
//! `SelectionSearch<T>` models the type-ahead combobox used across the
//! dashboard's forms: a text buffer, an open/closed options panel, and a
//! selection callback fired exactly once per chosen item. It is polymorphic
//! over a small capability set (label extraction, optional detail
//! rendering, selection callback) instead of per-entity variants.
//!
//! The widget does not filter: callers narrow `items` upstream (typically
//! name-contains, case-insensitive) and the widget only truncates the list
//! to `max_options`. Its sole global-scope side effect is a pointer-down
//! listener held through a [`PointerGuard`] for outside-press closing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::pointer::{PointerGuard, PointerRouter, RegionId};

/// Default cap on rendered options.
pub const DEFAULT_MAX_OPTIONS: usize = 20;

type LabelFn<T> = Box<dyn Fn(&T) -> String>;
type SelectFn<T> = Box<dyn FnMut(&T)>;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Capability set a [`SelectionSearch`] is mounted with.
pub struct SelectConfig<T> {
    label: LabelFn<T>,
    detail: Option<LabelFn<T>>,
    on_select: SelectFn<T>,
    placeholder: String,
    empty_text: String,
    max_options: usize,
}

impl<T> SelectConfig<T> {
    pub fn new(
        label: impl Fn(&T) -> String + 'static,
        on_select: impl FnMut(&T) + 'static,
    ) -> Self {
        Self {
            label: Box::new(label),
            detail: None,
            on_select: Box::new(on_select),
            placeholder: String::new(),
            empty_text: "No results".to_string(),
            max_options: DEFAULT_MAX_OPTIONS,
        }
    }

    /// Secondary per-option text (price, stock, ...).
    pub fn detail(mut self, detail: impl Fn(&T) -> String + 'static) -> Self {
        self.detail = Some(Box::new(detail));
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn empty_text(mut self, empty_text: impl Into<String>) -> Self {
        self.empty_text = empty_text.into();
        self
    }

    pub fn max_options(mut self, max_options: usize) -> Self {
        self.max_options = max_options;
        self
    }
}

// ---------------------------------------------------------------------------
// Panel view
// ---------------------------------------------------------------------------

/// What the options panel currently shows.
#[derive(Debug, PartialEq)]
pub enum Panel<'a, T> {
    Closed,
    Loading,
    Empty(&'a str),
    Options(&'a [T]),
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Headless state of one mounted search-select widget.
pub struct SelectionSearch<T> {
    items: Vec<T>,
    input: String,
    open: Arc<AtomicBool>,
    disabled: bool,
    loading: bool,
    config: SelectConfig<T>,
    region: RegionId,
    // Released on drop; keeps the outside-press listener alive for exactly
    // the widget's mounted lifetime.
    _guard: PointerGuard,
}

impl<T> SelectionSearch<T> {
    /// Mount against the process-global pointer router.
    pub fn mount(config: SelectConfig<T>) -> Self {
        Self::mount_with(config, PointerRouter::global())
    }

    /// Mount against an explicit router (tests inject their own).
    pub fn mount_with(config: SelectConfig<T>, router: &Arc<PointerRouter>) -> Self {
        let region = RegionId::next();
        let open = Arc::new(AtomicBool::new(false));
        let guard = {
            let open = open.clone();
            router.subscribe(move |target| {
                // Presses inside our own region keep the panel open; anything
                // else closes it without selecting.
                if target != Some(region) {
                    open.store(false, Ordering::SeqCst);
                }
            })
        };
        debug!(region = ?region, "search-select mounted");
        Self {
            items: Vec::new(),
            input: String::new(),
            open,
            disabled: false,
            loading: false,
            config,
            region,
            _guard: guard,
        }
    }

    /// The widget's bounding region, for tagging pointer presses.
    pub fn region(&self) -> RegionId {
        self.region
    }

    // -- candidate list ----------------------------------------------------

    /// Replace the candidate list (already filtered by the caller).
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    // -- text buffer -------------------------------------------------------

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Overwrite the buffer from an externally-controlled value.
    /// The external value always wins; the panel state is untouched.
    pub fn sync_input(&mut self, value: &str) {
        self.input = value.to_string();
    }

    /// User typed into the field: update the buffer and open the panel.
    pub fn input_changed(&mut self, value: &str) {
        if !self.can_interact() {
            return;
        }
        self.input = value.to_string();
        self.open.store(true, Ordering::SeqCst);
    }

    /// Focusing the field opens the panel.
    pub fn focus(&mut self) {
        if !self.can_interact() {
            return;
        }
        self.open.store(true, Ordering::SeqCst);
    }

    // -- flags -------------------------------------------------------------

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst) && !self.disabled
    }

    fn can_interact(&self) -> bool {
        !self.disabled && !self.loading
    }

    // -- rendering ---------------------------------------------------------

    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    pub fn label_of(&self, item: &T) -> String {
        (self.config.label)(item)
    }

    pub fn detail_of(&self, item: &T) -> Option<String> {
        self.config.detail.as_ref().map(|detail| detail(item))
    }

    /// The options currently visible, capped at `max_options`.
    pub fn visible_options(&self) -> &[T] {
        let end = self.items.len().min(self.config.max_options);
        &self.items[..end]
    }

    /// Current panel contents.
    pub fn panel(&self) -> Panel<'_, T> {
        if !self.is_open() {
            return Panel::Closed;
        }
        if self.loading {
            return Panel::Loading;
        }
        let visible = self.visible_options();
        if visible.is_empty() {
            Panel::Empty(&self.config.empty_text)
        } else {
            Panel::Options(visible)
        }
    }

    // -- selection ---------------------------------------------------------

    /// Choose the option at `index` within the visible list.
    ///
    /// Invokes the selection callback exactly once with that item, closes
    /// the panel, and leaves the text buffer as-is (the caller decides
    /// whether to overwrite it with the chosen label). Returns the chosen
    /// item, or `None` if the panel was closed, the widget disabled or
    /// loading, or the index out of range.
    pub fn select(&mut self, index: usize) -> Option<&T> {
        if !self.can_interact() || !self.is_open() {
            return None;
        }
        let visible = self.items.len().min(self.config.max_options);
        if index >= visible {
            return None;
        }
        self.open.store(false, Ordering::SeqCst);
        let item = &self.items[index];
        (self.config.on_select)(item);
        Some(item)
    }
}

impl<T> Drop for SelectionSearch<T> {
    fn drop(&mut self) {
        debug!(region = ?self.region, "search-select unmounted");
    }
}
