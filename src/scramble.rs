//! Terminal-style decode effect for a heading.
//!
//! On hover, every visible character is replaced by random glyphs and then
//! resolved left to right over `3 × chars` frames. The element's text nodes
//! are rewritten in place, so inline markup survives. A run in progress
//! ignores further hovers, and nothing runs while motion is reduced.

#[cfg(test)]
#[path = "scramble_test.rs"]
mod scramble_test;

use rand::Rng;

/// Glyphs drawn for unresolved characters.
pub const GLYPHS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '-', '=', '[', ']', '{', '}', '|', ';', ':', ',', '.',
    '<', '>', '?', '/', '\\', '~', '`', '0', '1',
];

/// Frames spent per character of text.
pub const FRAMES_PER_CHAR: usize = 3;

/// Progress lag between a character's start and its resolution.
pub const RESOLVE_LAG: f64 = 0.3;

/// Output of one animation frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrambleFrame {
    /// Partially decoded text, one entry per segment.
    Running(Vec<String>),
    /// Final frame: the original text, one entry per segment.
    Done(Vec<String>),
}

/// One decode run over a fixed list of text segments.
#[derive(Debug, Clone)]
pub struct Scramble {
    originals: Vec<Vec<char>>,
    total_chars: usize,
    frame: usize,
}

impl Scramble {
    /// Start a run over `segments`. Returns `None` when there is no text.
    pub fn new<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let originals: Vec<Vec<char>> = segments
            .into_iter()
            .filter(|segment| !segment.as_ref().trim().is_empty())
            .map(|segment| segment.as_ref().chars().collect())
            .collect();
        let total_chars = originals.iter().map(Vec::len).sum();
        (total_chars > 0).then_some(Self { originals, total_chars, frame: 0 })
    }

    pub fn total_frames(&self) -> usize {
        self.total_chars * FRAMES_PER_CHAR
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    /// Whether the character at `index` (counted across all segments) shows
    /// its real value at `progress`.
    #[allow(clippy::cast_precision_loss)]
    pub fn is_resolved(&self, index: usize, progress: f64) -> bool {
        progress > index as f64 / self.total_chars as f64 + RESOLVE_LAG
    }

    /// Advance one frame.
    #[allow(clippy::cast_precision_loss)]
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> ScrambleFrame {
        self.frame += 1;
        if self.frame >= self.total_frames() {
            return ScrambleFrame::Done(self.originals());
        }

        let progress = self.frame as f64 / self.total_frames() as f64;
        let mut index = 0;
        let mut texts = Vec::with_capacity(self.originals.len());
        for segment in &self.originals {
            let mut text = String::with_capacity(segment.len());
            for &ch in segment {
                if ch.is_whitespace() || self.is_resolved(index, progress) {
                    text.push(ch);
                } else {
                    text.push(random_glyph(rng));
                }
                index += 1;
            }
            texts.push(text);
        }
        ScrambleFrame::Running(texts)
    }

    fn originals(&self) -> Vec<String> {
        self.originals.iter().map(|segment| segment.iter().collect()).collect()
    }
}

pub fn random_glyph<R: Rng>(rng: &mut R) -> char {
    GLYPHS[rng.random_range(0..GLYPHS.len())]
}

#[cfg(feature = "csr")]
pub use browser::attach;

#[cfg(feature = "csr")]
mod browser {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use tilt::host::MotionGate;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::{Element, Node};

    use super::{Scramble, ScrambleFrame};
    use crate::settings::DocumentMotionGate;
    use crate::util::frame_loop;

    /// Non-blank text nodes under `root`, in document order.
    fn text_nodes(root: &Node, out: &mut Vec<Node>) {
        let children = root.child_nodes();
        for index in 0..children.length() {
            let Some(child) = children.item(index) else {
                continue;
            };
            if child.node_type() == Node::TEXT_NODE {
                if child.text_content().is_some_and(|text| !text.trim().is_empty()) {
                    out.push(child);
                }
            } else {
                text_nodes(&child, out);
            }
        }
    }

    /// Run the decode effect on `element` whenever the pointer enters it.
    pub fn attach(element: &Element) {
        let running = Rc::new(Cell::new(false));
        let rng = Rc::new(RefCell::new(SmallRng::seed_from_u64(js_sys::Date::now().to_bits())));
        let root: Node = element.clone().into();

        let on_enter = Closure::wrap(Box::new(move || {
            if running.get() || DocumentMotionGate.motion_reduced() {
                return;
            }
            let mut nodes = Vec::new();
            text_nodes(&root, &mut nodes);
            let Some(mut scramble) = Scramble::new(nodes.iter().map(|node| node.text_content().unwrap_or_default()))
            else {
                return;
            };

            running.set(true);
            let running = Rc::clone(&running);
            let rng = Rc::clone(&rng);
            frame_loop::run(move |_ts| {
                let frame = match rng.try_borrow_mut() {
                    Ok(mut rng) => scramble.step(&mut *rng),
                    Err(_) => return true,
                };
                let (texts, done) = match frame {
                    ScrambleFrame::Running(texts) => (texts, false),
                    ScrambleFrame::Done(texts) => (texts, true),
                };
                for (node, text) in nodes.iter().zip(&texts) {
                    node.set_text_content(Some(text));
                }
                if done {
                    running.set(false);
                }
                !done
            });
        }) as Box<dyn FnMut()>);

        if let Err(err) = element.add_event_listener_with_callback("mouseenter", on_enter.as_ref().unchecked_ref()) {
            log::warn!("scramble: failed to listen for mouseenter: {err:?}");
            return;
        }
        // Lives as long as the page.
        on_enter.forget();
        log::debug!("scramble: attached");
    }
}
