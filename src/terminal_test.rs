use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(11)
}

#[test]
fn log_delay_stays_between_one_and_four_seconds() {
    let mut rng = rng();
    for _ in 0..1000 {
        let delay = next_log_delay(&mut rng);
        assert!((1000..4000).contains(&delay), "delay {delay}");
    }
}

#[test]
fn log_lines_come_from_the_script() {
    let mut rng = rng();
    for _ in 0..100 {
        assert!(LOG_LINES.contains(&random_log_line(&mut rng)));
    }
}

#[test]
fn divider_repeats_one_pattern() {
    let mut rng = rng();
    for _ in 0..50 {
        let line = divider(&mut rng);
        let pattern = DIVIDER_PATTERNS
            .iter()
            .find(|pattern| line.starts_with(**pattern))
            .expect("known pattern");
        assert_eq!(line, pattern.repeat(DIVIDER_REPEAT));
        assert_eq!(line.chars().count(), pattern.chars().count() * 10);
    }
}

#[test]
fn feed_keeps_at_most_five_lines() {
    let mut feed = LogFeed::default();
    for n in 0..5 {
        let (_, evicted) = feed.push(n);
        assert!(evicted.is_empty());
    }
    let (_, evicted) = feed.push(5);
    assert_eq!(evicted, vec![0]);
    let (_, evicted) = feed.push(6);
    assert_eq!(evicted, vec![1]);
    assert_eq!(feed.len(), MAX_LINES);
    assert_eq!(feed.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
}

#[test]
fn faded_line_is_removed_by_id() {
    let mut feed = LogFeed::default();
    let (first, _) = feed.push("a");
    let (second, _) = feed.push("b");
    assert_eq!(feed.get(second), Some(&"b"));
    assert_eq!(feed.remove(first), Some("a"));
    assert_eq!(feed.remove(first), None);
    assert_eq!(feed.iter().copied().collect::<Vec<_>>(), vec!["b"]);
}

#[test]
fn evicted_line_cannot_be_removed_again() {
    let mut feed = LogFeed::default();
    let (oldest, _) = feed.push(0);
    for n in 1..=MAX_LINES {
        feed.push(n);
    }
    assert!(feed.get(oldest).is_none());
    assert_eq!(feed.remove(oldest), None);
    assert_eq!(feed.len(), MAX_LINES);
}

#[test]
fn ids_are_unique_after_removal() {
    let mut feed = LogFeed::default();
    let (a, _) = feed.push(1);
    feed.remove(a);
    let (b, _) = feed.push(2);
    assert_ne!(a, b);
    assert!(!feed.is_empty());
}

#[test]
fn hints_cover_the_keyboard_shortcuts() {
    let keys: Vec<&str> = COMMAND_HINTS.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys, vec!["j/k", "/", "g h", "esc"]);
}
