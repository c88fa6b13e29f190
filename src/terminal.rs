//! Fake terminal chrome for the header: a trickle of log lines behind the
//! hero, a row of command hints under the nav, and an ASCII divider that
//! swaps its pattern every few seconds.
//!
//! Log lines arrive one at a time at random intervals, at most
//! [`MAX_LINES`] stay visible, and each fades out [`LINE_LIFETIME_MS`] after
//! it appears. While motion is reduced no new lines are added and the
//! divider holds its pattern.

#[cfg(test)]
#[path = "terminal_test.rs"]
mod terminal_test;

use std::collections::VecDeque;
use std::ops::Range;

use rand::Rng;

// ── Content ─────────────────────────────────────────────────────

pub const LOG_LINES: &[&str] = &[
    "> initializing design_system.css",
    "> loading projects.json",
    "[OK] fonts loaded: Instrument Serif, JetBrains Mono",
    "> compiling editorial_hacker.theme",
    "[OK] accent: #00FF41",
    "> mounting components...",
    "[OK] header rendered",
    "[OK] project cards: 3 loaded",
    "> listening on localhost:8080",
    "$ git status",
    "On branch main",
    "nothing to commit, working tree clean",
    "> checking for updates...",
    "[OK] system ready",
    "$ whoami",
    "chadbercea",
    "> idle...",
];

/// Key and action label of each command hint.
pub const COMMAND_HINTS: &[(&str, &str)] = &[("j/k", "navigate"), ("/", "search"), ("g h", "go home"), ("esc", "close")];

pub const DIVIDER_PATTERNS: &[&str] = &[
    "═══════════════════",
    "───────────────────",
    "┌──────────────────┐",
    "└──────────────────┘",
    "╔══════════════════╗",
    "╚══════════════════╝",
    "▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓",
    "░░░░░░░░░░░░░░░░░░░",
    "├──────────────────┤",
];

// ── Timing ──────────────────────────────────────────────────────

/// Delay before the next log line, in milliseconds.
pub const LOG_DELAY_MS: Range<u32> = 1000..4000;

pub const MAX_LINES: usize = 5;

/// Time a line stays fully visible before it starts fading.
pub const LINE_LIFETIME_MS: u32 = 4000;

/// Length of the fade-out; the line is removed afterwards.
pub const FADE_MS: u32 = 1000;

pub const DIVIDER_INTERVAL_MS: u32 = 5000;

/// Times a divider pattern is repeated to span the header.
pub const DIVIDER_REPEAT: usize = 10;

pub fn next_log_delay<R: Rng>(rng: &mut R) -> u32 {
    rng.random_range(LOG_DELAY_MS)
}

pub fn random_log_line<R: Rng>(rng: &mut R) -> &'static str {
    LOG_LINES[rng.random_range(0..LOG_LINES.len())]
}

/// A random divider pattern repeated to full width.
pub fn divider<R: Rng>(rng: &mut R) -> String {
    DIVIDER_PATTERNS[rng.random_range(0..DIVIDER_PATTERNS.len())].repeat(DIVIDER_REPEAT)
}

/// Identifies one line in a [`LogFeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(u64);

/// Visible log lines, oldest first, capped at [`MAX_LINES`]. `T` is whatever
/// the host renders a line as.
#[derive(Debug)]
pub struct LogFeed<T> {
    lines: VecDeque<(LineId, T)>,
    next_id: u64,
}

impl<T> Default for LogFeed<T> {
    fn default() -> Self {
        Self { lines: VecDeque::new(), next_id: 0 }
    }
}

impl<T> LogFeed<T> {
    /// Append a line. Returns its id and the lines evicted to stay within
    /// the cap, oldest first.
    pub fn push(&mut self, line: T) -> (LineId, Vec<T>) {
        let id = LineId(self.next_id);
        self.next_id += 1;
        self.lines.push_back((id, line));

        let excess = self.lines.len().saturating_sub(MAX_LINES);
        let evicted = self.lines.drain(..excess).map(|(_, line)| line).collect();
        (id, evicted)
    }

    /// The line with `id`, unless it was already evicted or removed.
    pub fn get(&self, id: LineId) -> Option<&T> {
        self.lines.iter().find(|(line_id, _)| *line_id == id).map(|(_, line)| line)
    }

    /// Remove the line with `id` once its fade finishes.
    pub fn remove(&mut self, id: LineId) -> Option<T> {
        let index = self.lines.iter().position(|(line_id, _)| *line_id == id)?;
        self.lines.remove(index).map(|(_, line)| line)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines in display order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.lines.iter().map(|(_, line)| line)
    }
}

#[cfg(feature = "csr")]
pub use browser::attach;

#[cfg(feature = "csr")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gloo_timers::callback::{Interval, Timeout};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use tilt::host::MotionGate;
    use wasm_bindgen::JsValue;
    use web_sys::{Document, Element};

    use super::*;
    use crate::settings::DocumentMotionGate;

    const HERO_SELECTOR: &str = ".header__hero";
    const NAV_SELECTOR: &str = ".nav";
    const HEADER_SELECTOR: &str = ".header";

    type SharedRng = Rc<RefCell<SmallRng>>;

    struct Logs {
        container: Element,
        feed: RefCell<LogFeed<Element>>,
        rng: SharedRng,
    }

    fn div(document: &Document, class: &str) -> Result<Element, JsValue> {
        let el = document.create_element("div")?;
        el.set_class_name(class);
        Ok(el)
    }

    fn find(document: &Document, selector: &str) -> Option<Element> {
        document.query_selector(selector).unwrap_or_default()
    }

    impl Logs {
        fn add_line(self: &Rc<Self>, document: &Document) -> Result<(), JsValue> {
            let text = match self.rng.try_borrow_mut() {
                Ok(mut rng) => random_log_line(&mut *rng),
                Err(_) => return Ok(()),
            };
            let line = div(document, "terminal-log-line")?;
            line.set_text_content(Some(text));
            self.container.append_child(&line)?;

            let Ok(mut feed) = self.feed.try_borrow_mut() else {
                line.remove();
                return Ok(());
            };
            let (id, evicted) = feed.push(line);
            for old in evicted {
                old.remove();
            }
            drop(feed);

            let logs = Rc::clone(self);
            Timeout::new(LINE_LIFETIME_MS, move || {
                let faded = logs.feed.try_borrow().ok().and_then(|feed| {
                    feed.get(id).map(|line| line.class_list().add_1("fade-out"))
                });
                if let Some(Err(err)) = faded {
                    log::warn!("terminal: fade failed: {err:?}");
                }
                Timeout::new(FADE_MS, move || {
                    if let Some(line) = logs.feed.try_borrow_mut().ok().and_then(|mut feed| feed.remove(id)) {
                        line.remove();
                    }
                })
                .forget();
            })
            .forget();
            Ok(())
        }
    }

    fn schedule_next(logs: Rc<Logs>, document: Document) {
        let delay = match logs.rng.try_borrow_mut() {
            Ok(mut rng) => next_log_delay(&mut *rng),
            Err(_) => LOG_DELAY_MS.start,
        };
        Timeout::new(delay, move || {
            if !DocumentMotionGate.motion_reduced() {
                if let Err(err) = logs.add_line(&document) {
                    log::warn!("terminal: failed to add log line: {err:?}");
                }
            }
            schedule_next(logs, document);
        })
        .forget();
    }

    fn start_logs(document: &Document, rng: &SharedRng) -> Result<(), JsValue> {
        let Some(hero) = find(document, HERO_SELECTOR) else {
            return Ok(());
        };
        let container = div(document, "terminal-logs")?;
        hero.append_child(&container)?;
        let logs = Rc::new(Logs { container, feed: RefCell::new(LogFeed::default()), rng: Rc::clone(rng) });
        schedule_next(logs, document.clone());
        Ok(())
    }

    fn add_hints(document: &Document) -> Result<(), JsValue> {
        let Some(parent) = find(document, NAV_SELECTOR).and_then(|nav| nav.parent_element()) else {
            return Ok(());
        };
        let hints = div(document, "command-hints")?;
        for &(key, action) in COMMAND_HINTS {
            let hint = document.create_element("span")?;
            hint.set_class_name("command-hint");
            let kbd = document.create_element("kbd")?;
            kbd.set_text_content(Some(key));
            hint.append_child(&kbd)?;
            hint.append_child(&document.create_text_node(&format!(" {action}")))?;
            hints.append_child(&hint)?;
        }
        parent.append_child(&hints)?;
        Ok(())
    }

    fn start_divider(document: &Document, rng: &SharedRng) -> Result<(), JsValue> {
        let Some(header) = find(document, HEADER_SELECTOR) else {
            return Ok(());
        };
        let divider_el = div(document, "ascii-divider")?;
        divider_el.set_attribute("aria-hidden", "true")?;
        if let Ok(mut rng) = rng.try_borrow_mut() {
            divider_el.set_text_content(Some(&divider(&mut *rng)));
        }
        header.append_child(&divider_el)?;

        let rng = Rc::clone(rng);
        // Lives as long as the page.
        Interval::new(DIVIDER_INTERVAL_MS, move || {
            if DocumentMotionGate.motion_reduced() {
                return;
            }
            if let Ok(mut rng) = rng.try_borrow_mut() {
                divider_el.set_text_content(Some(&divider(&mut *rng)));
            }
        })
        .forget();
        Ok(())
    }

    /// Add the log trickle, command hints and divider to whichever of their
    /// host elements exist in `document`.
    pub fn attach(document: &Document) {
        let rng: SharedRng = Rc::new(RefCell::new(SmallRng::seed_from_u64(js_sys::Date::now().to_bits())));
        if let Err(err) = start_logs(document, &rng) {
            log::warn!("terminal: log feed failed: {err:?}");
        }
        if let Err(err) = add_hints(document) {
            log::warn!("terminal: command hints failed: {err:?}");
        }
        if let Err(err) = start_divider(document, &rng) {
            log::warn!("terminal: divider failed: {err:?}");
        }
        log::debug!("terminal: attached");
    }
}
