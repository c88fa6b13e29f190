//! Attach-once registry: one engine per matching element inside a container,
//! including elements added after setup.
//!
//! Elements are marked with [`INIT_MARKER_ATTR`] when their engine is built,
//! so repeated scans never attach twice. A `MutationObserver` on the
//! container re-scans on structural changes, and a single fallback re-scan
//! runs [`FALLBACK_RESCAN_MS`] after setup for content inserted before the
//! observer was live. Tracked elements that leave the document are detached
//! on the next scan and lose their marker, so a node moved back in later is
//! picked up again.
//!
//! The attach-once bookkeeping lives in [`Tracker`], generic over an
//! [`ElementHost`], so it runs unchanged against a fake page in tests.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, HtmlElement, MutationObserver, MutationObserverInit};

use crate::config::EngineConfig;
use crate::consts::{CONFIG_ATTR, FALLBACK_RESCAN_MS, INIT_MARKER_ATTR};
use crate::dom::DomTilt;

/// Selector matching elements of `selector` that have no engine yet. Each
/// comma-separated alternative gets its own exclusion.
#[must_use]
pub fn pending_selector(selector: &str) -> String {
    selector
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| format!("{part}:not([{INIT_MARKER_ATTR}])"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Config for one element: the preset, with the element's JSON override
/// merged over it when present. An invalid override is logged and ignored.
#[must_use]
pub fn resolve_config(preset: &EngineConfig, raw_override: Option<&str>) -> EngineConfig {
    let Some(raw) = raw_override.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return preset.clone();
    };
    match preset.with_overrides(raw) {
        Ok(config) => config,
        Err(err) => {
            warn!("tilt: ignoring {CONFIG_ATTR} override: {err}");
            preset.clone()
        }
    }
}

// =============================================================
// Attach-once tracking
// =============================================================

/// Element-level operations a registry needs from its environment. The
/// browser implementation is [`DomElements`]; tests use an in-memory page.
pub trait ElementHost {
    type Element;
    type Engine;

    /// Whether `element` carries the init marker.
    fn is_marked(&self, element: &Self::Element) -> bool;

    /// Set or clear the init marker. Returns `false` when the write failed.
    fn set_marked(&self, element: &Self::Element, marked: bool) -> bool;

    /// Raw per-element JSON override, if any.
    fn config_override(&self, element: &Self::Element) -> Option<String>;

    /// Build a live engine, or `None` when the host refuses.
    fn attach(&self, element: &Self::Element, config: EngineConfig) -> Option<Self::Engine>;

    /// Whether `element` is still part of the document.
    fn is_connected(&self, element: &Self::Element) -> bool;

    /// Tear down a live engine.
    fn detach(&self, engine: Self::Engine);
}

/// Attach an engine to `element` unless it already carries the marker. The
/// marker is set only once an engine exists.
pub fn attach_once<H: ElementHost>(host: &H, element: &H::Element, preset: &EngineConfig) -> Option<H::Engine> {
    if host.is_marked(element) {
        return None;
    }
    let config = resolve_config(preset, host.config_override(element).as_deref());
    let engine = host.attach(element, config)?;
    if !host.set_marked(element, true) {
        warn!("tilt: failed to mark element, dropping its engine");
        host.detach(engine);
        return None;
    }
    Some(engine)
}

/// Engines attached by one registry, keyed by their element.
pub struct Tracker<H: ElementHost> {
    host: H,
    preset: EngineConfig,
    tracked: Vec<(H::Element, H::Engine)>,
}

impl<H: ElementHost> Tracker<H> {
    #[must_use]
    pub fn new(host: H, preset: EngineConfig) -> Self {
        Self { host, preset, tracked: Vec::new() }
    }

    /// Release engines whose element left the document, then attach to
    /// every unmarked element in `candidates`. Returns the number of new
    /// engines.
    pub fn scan<I: IntoIterator<Item = H::Element>>(&mut self, candidates: I) -> usize {
        let (live, gone): (Vec<_>, Vec<_>) =
            self.tracked.drain(..).partition(|(element, _)| self.host.is_connected(element));
        self.tracked = live;
        for (element, engine) in gone {
            self.release_one(&element, engine);
        }

        let mut added = 0;
        for element in candidates {
            if let Some(engine) = attach_once(&self.host, &element, &self.preset) {
                self.tracked.push((element, engine));
                added += 1;
            }
        }
        added
    }

    /// Detach every engine and clear their markers.
    pub fn release(&mut self) {
        for (element, engine) in std::mem::take(&mut self.tracked) {
            self.release_one(&element, engine);
        }
    }

    fn release_one(&self, element: &H::Element, engine: H::Engine) {
        self.host.detach(engine);
        if !self.host.set_marked(element, false) {
            warn!("tilt: failed to clear init marker");
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }
}

/// [`ElementHost`] over real DOM elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomElements;

impl ElementHost for DomElements {
    type Element = HtmlElement;
    type Engine = DomTilt;

    fn is_marked(&self, element: &HtmlElement) -> bool {
        element.has_attribute(INIT_MARKER_ATTR)
    }

    fn set_marked(&self, element: &HtmlElement, marked: bool) -> bool {
        let result = if marked {
            element.set_attribute(INIT_MARKER_ATTR, "")
        } else {
            element.remove_attribute(INIT_MARKER_ATTR)
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!("tilt: marker write failed: {err:?}");
                false
            }
        }
    }

    fn config_override(&self, element: &HtmlElement) -> Option<String> {
        element.get_attribute(CONFIG_ATTR)
    }

    fn attach(&self, element: &HtmlElement, config: EngineConfig) -> Option<DomTilt> {
        DomTilt::attach(element.clone(), config)
    }

    fn is_connected(&self, element: &HtmlElement) -> bool {
        element.is_connected()
    }

    fn detach(&self, engine: DomTilt) {
        engine.detach();
    }
}

/// Attach an engine to a single element unless it already has one.
#[must_use]
pub fn attach_element(element: &HtmlElement, preset: &EngineConfig) -> Option<DomTilt> {
    attach_once(&DomElements, element, preset)
}

// =============================================================
// Container watch
// =============================================================

struct Watch {
    container: Element,
    query: String,
    tracker: RefCell<Tracker<DomElements>>,
}

impl Watch {
    /// Run a tracker scan over the container's pending matches.
    fn scan(&self) -> usize {
        let Ok(mut tracker) = self.tracker.try_borrow_mut() else {
            return 0;
        };
        let candidates = match self.container.query_selector_all(&self.query) {
            Ok(nodes) => (0..nodes.length())
                .filter_map(|index| nodes.item(index))
                .filter_map(|node| node.dyn_ref::<HtmlElement>().cloned())
                .collect(),
            Err(err) => {
                warn!("tilt: scan failed for {:?}: {err:?}", self.query);
                Vec::new()
            }
        };
        tracker.scan(candidates)
    }

    fn release(&self) {
        match self.tracker.try_borrow_mut() {
            Ok(mut tracker) => tracker.release(),
            Err(_) => warn!("tilt: registry busy during release"),
        }
    }
}

type MutationCallback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

/// Keeps engines attached to every `selector` match inside a container.
pub struct TiltRegistry {
    watch: Rc<Watch>,
    observer: Option<(MutationObserver, MutationCallback)>,
    _fallback: Timeout,
}

impl TiltRegistry {
    /// Attach to current matches, then watch `container` for more.
    #[must_use]
    pub fn watch(container: Element, selector: &str, preset: EngineConfig) -> Self {
        let watch = Rc::new(Watch {
            container,
            query: pending_selector(selector),
            tracker: RefCell::new(Tracker::new(DomElements, preset)),
        });
        let initial = watch.scan();
        debug!("tilt: {initial} engines for {selector:?}");

        let observer = observe(&watch);

        let delayed = Rc::clone(&watch);
        let fallback = Timeout::new(FALLBACK_RESCAN_MS, move || {
            let added = delayed.scan();
            if added > 0 {
                debug!("tilt: fallback scan attached {added}");
            }
        });

        Self { watch, observer, _fallback: fallback }
    }

    /// Run a scan now. Returns the number of new engines.
    #[must_use]
    pub fn rescan(&self) -> usize {
        self.watch.scan()
    }

    /// Number of live engines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.watch.tracker.try_borrow().map_or(0, |tracker| tracker.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop observing and detach every engine.
    pub fn disconnect(self) {
        if let Some((observer, _callback)) = &self.observer {
            observer.disconnect();
        }
        self.watch.release();
    }
}

fn observe(watch: &Rc<Watch>) -> Option<(MutationObserver, MutationCallback)> {
    let target = Rc::clone(watch);
    let callback: MutationCallback = Closure::wrap(Box::new(move |_records: js_sys::Array, _observer: MutationObserver| {
        let added = target.scan();
        if added > 0 {
            debug!("tilt: attached {added} after mutation");
        }
    }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

    let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
        Ok(observer) => observer,
        Err(err) => {
            warn!("tilt: MutationObserver unavailable, relying on fallback scan: {err:?}");
            return None;
        }
    };
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    if let Err(err) = observer.observe_with_options(&watch.container, &options) {
        warn!("tilt: observe failed: {err:?}");
        return None;
    }
    Some((observer, callback))
}
