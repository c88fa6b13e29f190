#![allow(clippy::float_cmp)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use super::*;
use crate::config::Facing;

// =============================================================
// Fake page
// =============================================================

#[derive(Debug, PartialEq)]
struct FakeEngine(u32);

/// Elements are plain ids; every effect is recorded.
#[derive(Default)]
struct FakePage {
    connected: RefCell<HashSet<u32>>,
    marked: RefCell<HashSet<u32>>,
    overrides: HashMap<u32, String>,
    attached: RefCell<Vec<(u32, EngineConfig)>>,
    detached: RefCell<Vec<u32>>,
    refused: RefCell<HashSet<u32>>,
    marker_writes_fail: Cell<bool>,
}

impl FakePage {
    fn with(ids: &[u32]) -> Self {
        let page = Self::default();
        page.connected.borrow_mut().extend(ids);
        page
    }

    fn remove(&self, id: u32) {
        self.connected.borrow_mut().remove(&id);
    }

    fn insert(&self, id: u32) {
        self.connected.borrow_mut().insert(id);
    }

    fn is_marked_id(&self, id: u32) -> bool {
        self.marked.borrow().contains(&id)
    }

    fn attach_count(&self, id: u32) -> usize {
        self.attached.borrow().iter().filter(|(attached, _)| *attached == id).count()
    }
}

impl ElementHost for FakePage {
    type Element = u32;
    type Engine = FakeEngine;

    fn is_marked(&self, element: &u32) -> bool {
        self.marked.borrow().contains(element)
    }

    fn set_marked(&self, element: &u32, marked: bool) -> bool {
        if self.marker_writes_fail.get() {
            return false;
        }
        if marked {
            self.marked.borrow_mut().insert(*element);
        } else {
            self.marked.borrow_mut().remove(element);
        }
        true
    }

    fn config_override(&self, element: &u32) -> Option<String> {
        self.overrides.get(element).cloned()
    }

    fn attach(&self, element: &u32, config: EngineConfig) -> Option<FakeEngine> {
        if self.refused.borrow().contains(element) || config.validate().is_err() {
            return None;
        }
        self.attached.borrow_mut().push((*element, config));
        Some(FakeEngine(*element))
    }

    fn is_connected(&self, element: &u32) -> bool {
        self.connected.borrow().contains(element)
    }

    fn detach(&self, engine: FakeEngine) {
        self.detached.borrow_mut().push(engine.0);
    }
}

fn tracker(page: FakePage) -> Tracker<FakePage> {
    Tracker::new(page, EngineConfig::card())
}

// =============================================================
// Tracker
// =============================================================

#[test]
fn scan_attaches_each_element_once() {
    let mut tracker = tracker(FakePage::with(&[1, 2, 3]));
    assert_eq!(tracker.scan([1, 2, 3]), 3);
    assert_eq!(tracker.scan([1, 2, 3]), 0);
    assert_eq!(tracker.scan([3, 3]), 0);
    assert_eq!(tracker.len(), 3);
    for id in [1, 2, 3] {
        assert_eq!(tracker.host().attach_count(id), 1);
        assert!(tracker.host().is_marked_id(id));
    }
}

#[test]
fn duplicate_candidates_in_one_scan_attach_once() {
    let mut tracker = tracker(FakePage::with(&[7]));
    assert_eq!(tracker.scan([7, 7, 7]), 1);
    assert_eq!(tracker.host().attach_count(7), 1);
}

#[test]
fn element_marked_elsewhere_is_skipped() {
    let page = FakePage::with(&[4]);
    page.marked.borrow_mut().insert(4);
    let mut tracker = tracker(page);
    assert_eq!(tracker.scan([4]), 0);
    assert!(tracker.is_empty());
    assert_eq!(tracker.host().attach_count(4), 0);
}

#[test]
fn elements_added_later_are_picked_up() {
    let mut tracker = tracker(FakePage::with(&[1]));
    assert_eq!(tracker.scan([1]), 1);
    tracker.host().insert(2);
    assert_eq!(tracker.scan([1, 2]), 1);
    assert_eq!(tracker.len(), 2);
}

#[test]
fn disconnected_elements_are_detached_and_unmarked() {
    let mut tracker = tracker(FakePage::with(&[1, 2]));
    tracker.scan([1, 2]);
    tracker.host().remove(2);

    assert_eq!(tracker.scan(Vec::new()), 0);
    assert_eq!(*tracker.host().detached.borrow(), vec![2]);
    assert!(!tracker.host().is_marked_id(2));
    assert!(tracker.host().is_marked_id(1));
    assert_eq!(tracker.len(), 1);
}

#[test]
fn element_moved_back_in_gets_a_fresh_engine() {
    let mut tracker = tracker(FakePage::with(&[5]));
    tracker.scan([5]);
    tracker.host().remove(5);
    tracker.scan(Vec::new());
    tracker.host().insert(5);

    assert_eq!(tracker.scan([5]), 1);
    assert_eq!(tracker.host().attach_count(5), 2);
    assert_eq!(tracker.len(), 1);
}

#[test]
fn per_element_override_is_merged_over_preset() {
    let mut page = FakePage::with(&[1, 2]);
    page.overrides.insert(1, r#"{"maxRotationDeg": 10}"#.to_owned());
    let mut tracker = tracker(page);
    tracker.scan([1, 2]);

    let attached = tracker.host().attached.borrow();
    assert_eq!(attached[0].1.max_rotation_deg, 10.0);
    assert_eq!(attached[1].1, EngineConfig::card());
}

#[test]
fn refused_attach_leaves_element_unmarked_for_retry() {
    let page = FakePage::with(&[3]);
    page.refused.borrow_mut().insert(3);
    let mut tracker = tracker(page);
    assert_eq!(tracker.scan([3]), 0);
    assert!(!tracker.host().is_marked_id(3));

    tracker.host().refused.borrow_mut().clear();
    assert_eq!(tracker.scan([3]), 1);
}

#[test]
fn invalid_preset_attaches_nothing() {
    let preset = EngineConfig { max_rotation_deg: -10.0, ..EngineConfig::card() };
    let mut tracker = Tracker::new(FakePage::with(&[1]), preset);
    assert_eq!(tracker.scan([1]), 0);
    assert!(!tracker.host().is_marked_id(1));
}

#[test]
fn failed_marker_write_drops_the_engine() {
    let page = FakePage::with(&[1]);
    page.marker_writes_fail.set(true);
    let mut tracker = tracker(page);
    assert_eq!(tracker.scan([1]), 0);
    assert_eq!(*tracker.host().detached.borrow(), vec![1]);
    assert!(tracker.is_empty());
}

#[test]
fn release_detaches_everything_and_clears_markers() {
    let mut tracker = tracker(FakePage::with(&[1, 2]));
    tracker.scan([1, 2]);
    tracker.release();
    assert!(tracker.is_empty());
    assert_eq!(*tracker.host().detached.borrow(), vec![1, 2]);
    assert!(tracker.host().marked.borrow().is_empty());
}

#[test]
fn attach_once_respects_marker() {
    let page = FakePage::with(&[9]);
    let preset = EngineConfig::window();
    assert_eq!(attach_once(&page, &9, &preset), Some(FakeEngine(9)));
    assert_eq!(attach_once(&page, &9, &preset), None);
}

// =============================================================
// Selector and config helpers
// =============================================================

#[test]
fn pending_selector_excludes_marked_elements() {
    assert_eq!(pending_selector(".card"), ".card:not([data-tilt-init])");
}

#[test]
fn pending_selector_handles_each_alternative() {
    assert_eq!(
        pending_selector(".card, .tile ,"),
        ".card:not([data-tilt-init]), .tile:not([data-tilt-init])"
    );
}

#[test]
fn resolve_config_without_override_is_preset() {
    let preset = EngineConfig::card();
    assert_eq!(resolve_config(&preset, None), preset);
    assert_eq!(resolve_config(&preset, Some("   ")), preset);
}

#[test]
fn resolve_config_merges_override() {
    let preset = EngineConfig::card();
    let config = resolve_config(&preset, Some(r#"{"maxRotationDeg": 10, "facing": "away"}"#));
    assert_eq!(config.max_rotation_deg, 10.0);
    assert_eq!(config.facing, Facing::Away);
    assert_eq!(config.layers, preset.layers);
}

#[test]
fn resolve_config_merges_nested_magnet_fields() {
    let preset = EngineConfig::card();
    let config = resolve_config(&preset, Some(r#"{"magnet": {"strength": 0.1}}"#));
    let magnet = config.magnet.expect("magnet kept");
    assert_eq!(magnet.strength, 0.1);
    assert_eq!(magnet.anchor, ".card__link");
}

#[test]
fn resolve_config_falls_back_on_invalid_json() {
    let preset = EngineConfig::window();
    assert_eq!(resolve_config(&preset, Some("{not json")), preset);
}

#[test]
fn resolve_config_falls_back_on_out_of_range_values() {
    let preset = EngineConfig::card();
    assert_eq!(resolve_config(&preset, Some(r#"{"rotationEase": 0}"#)), preset);
    assert_eq!(resolve_config(&preset, Some("[1, 2]")), preset);
}
