//! Browser host: web-sys implementations of the engine seams and the event
//! wiring that drives a [`TiltEngine`] from real pointer events.
//!
//! DOM calls that can throw are handled where they are made and logged at
//! `warn`; a failed style write never interrupts the frame loop.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CssStyleDeclaration, Element, HtmlElement, MouseEvent};

use crate::config::EngineConfig;
use crate::consts::REDUCE_MOTION_ATTR;
use crate::engine::TiltEngine;
use crate::geom::{Rect, Vec2};
use crate::host::{FrameHandle, FrameScheduler, MotionGate, Surface};
use crate::output::FrameStyles;

/// Engine bound to the browser hosts.
pub type DomEngine = TiltEngine<DomSurface, RafScheduler, DocumentMotionGate>;

// =============================================================
// Surface
// =============================================================

/// Target element plus every channel element resolved under it.
pub struct DomSurface {
    target: HtmlElement,
    rotor: HtmlElement,
    channels: HashMap<String, HtmlElement>,
}

impl DomSurface {
    /// Resolve the rotor, layer channels and magnet anchor of `config`
    /// inside `target`. Selectors that match nothing are left out.
    #[must_use]
    pub fn resolve(target: HtmlElement, config: &EngineConfig) -> Self {
        let rotor = config
            .rotor
            .as_deref()
            .and_then(|selector| find_html(&target, selector))
            .unwrap_or_else(|| target.clone());

        let mut selectors: Vec<&str> = config.layers.iter().map(|layer| layer.channel.as_str()).collect();
        if let Some(magnet) = &config.magnet {
            selectors.push(&magnet.anchor);
        }
        let channels = selectors
            .into_iter()
            .filter_map(|selector| find_html(&target, selector).map(|el| (selector.to_owned(), el)))
            .collect();

        Self { target, rotor, channels }
    }

    #[must_use]
    pub fn target(&self) -> &HtmlElement {
        &self.target
    }
}

impl Surface for DomSurface {
    fn bounds(&self) -> Rect {
        element_rect(&self.target)
    }

    fn channel_bounds(&self, channel: &str) -> Option<Rect> {
        self.channels.get(channel).map(|el| element_rect(el))
    }

    fn has_channel(&self, channel: &str) -> bool {
        self.channels.contains_key(channel)
    }

    fn prepare(&mut self, config: &EngineConfig) {
        let target = self.target.style();
        if let Some(px) = config.perspective_px {
            set_style(&target, "perspective", &format!("{px}px"));
            set_style(&target, "transform-style", "preserve-3d");
        }
        if config.clear_entrance {
            // A running or filled keyframe animation would override the inline transform.
            set_style(&target, "animation", "none");
            set_style(&target, "opacity", "1");
        }
        set_style(&self.rotor.style(), "transform-style", "preserve-3d");
    }

    fn raise(&mut self, z_index: Option<i32>) {
        let style = self.target.style();
        match z_index {
            Some(z) => set_style(&style, "z-index", &z.to_string()),
            None => remove_style(&style, "z-index"),
        }
    }

    fn apply(&mut self, styles: &FrameStyles) {
        let rotor = self.rotor.style();
        match &styles.root {
            Some(root) => set_style(&rotor, "transform", &root.to_css()),
            None => remove_style(&rotor, "transform"),
        }

        let target = self.target.style();
        for (name, value) in styles.shine_vars() {
            match value {
                Some(value) => set_style(&target, name, &value),
                None => remove_style(&target, name),
            }
        }

        for layer in &styles.layers {
            let Some(el) = self.channels.get(&layer.channel) else {
                continue;
            };
            match &layer.transform {
                Some(transform) => set_style(&el.style(), "transform", &transform.to_css()),
                None => remove_style(&el.style(), "transform"),
            }
        }
    }
}

fn find_html(root: &Element, selector: &str) -> Option<HtmlElement> {
    match root.query_selector(selector) {
        Ok(found) => found.and_then(|el| el.dyn_ref::<HtmlElement>().cloned()),
        Err(err) => {
            warn!("tilt: bad selector {selector:?}: {err:?}");
            None
        }
    }
}

fn element_rect(el: &Element) -> Rect {
    let rect = el.get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

fn set_style(style: &CssStyleDeclaration, name: &str, value: &str) {
    if let Err(err) = style.set_property(name, value) {
        warn!("tilt: failed to set {name}: {err:?}");
    }
}

fn remove_style(style: &CssStyleDeclaration, name: &str) {
    if let Err(err) = style.remove_property(name) {
        warn!("tilt: failed to remove {name}: {err:?}");
    }
}

// =============================================================
// Frame scheduler
// =============================================================

/// `requestAnimationFrame` scheduler. The callback is bound once after the
/// engine exists and reused for every request.
#[derive(Default)]
pub struct RafScheduler {
    callback: Option<Closure<dyn FnMut(f64)>>,
}

impl RafScheduler {
    pub fn bind(&mut self, callback: Closure<dyn FnMut(f64)>) {
        self.callback = Some(callback);
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.callback.as_ref()?;
        let window = web_sys::window()?;
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => Some(FrameHandle(id)),
            Err(err) => {
                warn!("tilt: requestAnimationFrame failed: {err:?}");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(err) = window.cancel_animation_frame(handle.0) {
            warn!("tilt: cancelAnimationFrame failed: {err:?}");
        }
    }
}

// =============================================================
// Motion gate
// =============================================================

/// Reads the reduce-motion attribute on the document element each time it
/// is asked, so toggling the setting takes effect on the next frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentMotionGate;

impl MotionGate for DocumentMotionGate {
    fn motion_reduced(&self) -> bool {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            .is_some_and(|html| html.has_attribute(REDUCE_MOTION_ATTR))
    }
}

// =============================================================
// Event wiring
// =============================================================

type Listener = Closure<dyn FnMut(MouseEvent)>;

/// A live engine attached to one element, with its pointer listeners.
pub struct DomTilt {
    engine: Rc<RefCell<DomEngine>>,
    target: HtmlElement,
    listeners: Vec<(&'static str, Listener)>,
}

impl DomTilt {
    /// Build an engine for `target` and start listening for pointer events.
    /// Returns `None`, leaving the element untouched, when `config` fails
    /// validation.
    #[must_use]
    pub fn attach(target: HtmlElement, config: EngineConfig) -> Option<Self> {
        if let Err(err) = config.validate() {
            warn!("tilt: not attaching to <{}>: {err}", target.tag_name().to_lowercase());
            return None;
        }
        let surface = DomSurface::resolve(target.clone(), &config);
        let engine = Rc::new(RefCell::new(TiltEngine::attach(
            config,
            surface,
            RafScheduler::default(),
            DocumentMotionGate,
        )));

        let weak = Rc::downgrade(&engine);
        let frame = Closure::wrap(Box::new(move |_ts: f64| {
            let Some(engine) = weak.upgrade() else {
                return;
            };
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.on_frame();
            }
        }) as Box<dyn FnMut(f64)>);
        if let Ok(mut bound) = engine.try_borrow_mut() {
            bound.scheduler_mut().bind(frame);
        }

        let mut tilt = Self { engine, target, listeners: Vec::new() };
        tilt.listen("mouseenter", |engine, _| engine.pointer_enter());
        tilt.listen("mouseleave", |engine, _| engine.pointer_leave());
        tilt.listen("mousemove", |engine, event| {
            engine.pointer_move(Vec2::new(f64::from(event.client_x()), f64::from(event.client_y())));
        });
        Some(tilt)
    }

    fn listen(&mut self, event: &'static str, handler: fn(&mut DomEngine, &MouseEvent)) {
        let engine = Rc::clone(&self.engine);
        let listener = Closure::wrap(Box::new(move |ev: MouseEvent| {
            if let Ok(mut engine) = engine.try_borrow_mut() {
                handler(&mut engine, &ev);
            }
        }) as Box<dyn FnMut(MouseEvent)>);
        match self.target.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref()) {
            Ok(()) => self.listeners.push((event, listener)),
            Err(err) => warn!("tilt: failed to listen for {event}: {err:?}"),
        }
    }

    #[must_use]
    pub fn target(&self) -> &HtmlElement {
        &self.target
    }

    /// Whether the target is still part of the document.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.target.is_connected()
    }

    /// Remove listeners, cancel any pending frame and clear all outputs.
    pub fn detach(self) {
        for (event, listener) in &self.listeners {
            if let Err(err) = self
                .target
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
            {
                warn!("tilt: failed to remove {event} listener: {err:?}");
            }
        }
        match self.engine.try_borrow_mut() {
            Ok(mut engine) => engine.detach(),
            Err(_) => warn!("tilt: engine busy during detach"),
        }
        debug!("tilt: listeners released for <{}>", self.target.tag_name().to_lowercase());
    }
}
