#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn card_magnet() -> MagnetConfig {
    MagnetConfig {
        anchor: ".card__link".to_owned(),
        carrier: ".card__links".to_owned(),
        ease: 0.2,
        max_distance: 150.0,
        strength: 0.4,
    }
}

fn rect() -> Rect {
    Rect::new(100.0, 100.0, 200.0, 100.0)
}

// =============================================================
// normalized_offset
// =============================================================

#[test]
fn center_has_zero_offset() {
    let offset = normalized_offset(Vec2::new(200.0, 150.0), &rect());
    assert_eq!(offset, Vec2::ZERO);
}

#[test]
fn edges_map_to_unit_offsets() {
    let r = rect();
    assert_eq!(normalized_offset(Vec2::new(300.0, 150.0), &r), Vec2::new(1.0, 0.0));
    assert_eq!(normalized_offset(Vec2::new(100.0, 150.0), &r), Vec2::new(-1.0, 0.0));
    assert_eq!(normalized_offset(Vec2::new(200.0, 100.0), &r), Vec2::new(0.0, -1.0));
    assert_eq!(normalized_offset(Vec2::new(200.0, 200.0), &r), Vec2::new(0.0, 1.0));
}

#[test]
fn offset_beyond_edge_is_linear_and_unclamped() {
    let offset = normalized_offset(Vec2::new(400.0, 150.0), &rect());
    assert!(approx_eq(offset.x, 2.0));
}

#[test]
fn degenerate_rect_has_zero_offset() {
    let zero_width = Rect::new(10.0, 10.0, 0.0, 40.0);
    assert_eq!(normalized_offset(Vec2::new(50.0, 50.0), &zero_width), Vec2::ZERO);
    let zero_height = Rect::new(10.0, 10.0, 40.0, 0.0);
    assert_eq!(normalized_offset(Vec2::new(50.0, 50.0), &zero_height), Vec2::ZERO);
}

#[test]
fn non_finite_pointer_has_zero_offset() {
    assert_eq!(normalized_offset(Vec2::new(f64::NAN, 1.0), &rect()), Vec2::ZERO);
}

// =============================================================
// target_rotation
// =============================================================

#[test]
fn rotation_at_center_is_zero() {
    let rot = target_rotation(Vec2::ZERO, 25.0, Facing::Toward);
    assert_eq!(rot.x, 0.0);
    assert_eq!(rot.y, 0.0);
}

#[test]
fn right_edge_tilts_y_negative_when_facing_toward() {
    let rot = target_rotation(Vec2::new(1.0, 0.0), 25.0, Facing::Toward);
    assert_eq!(rot.y, -25.0);
    assert_eq!(rot.x, 0.0);
}

#[test]
fn bottom_edge_tilts_x_positive_when_facing_toward() {
    let rot = target_rotation(Vec2::new(0.0, 1.0), 25.0, Facing::Toward);
    assert_eq!(rot.x, 25.0);
}

#[test]
fn facing_away_inverts_both_axes() {
    let rot = target_rotation(Vec2::new(0.5, -0.5), 15.0, Facing::Away);
    assert!(approx_eq(rot.x, 7.5));
    assert!(approx_eq(rot.y, 7.5));
}

#[test]
fn rotation_inside_rect_is_linear() {
    let rot = target_rotation(Vec2::new(0.4, -0.2), 25.0, Facing::Toward);
    assert!(approx_eq(rot.x, -5.0));
    assert!(approx_eq(rot.y, -10.0));
}

#[test]
fn rotation_never_exceeds_max() {
    for step in -40..=40 {
        let t = f64::from(step) / 10.0;
        let rot = target_rotation(Vec2::new(t, -t), 25.0, Facing::Toward);
        assert!(rot.x.abs() <= 25.0);
        assert!(rot.y.abs() <= 25.0);
    }
}

#[test]
fn negative_max_uses_its_magnitude() {
    let rot = target_rotation(Vec2::new(3.0, 0.5), -10.0, Facing::Toward);
    assert!(approx_eq(rot.x, 5.0));
    assert!(approx_eq(rot.y, -10.0));
}

#[test]
fn non_finite_or_zero_max_gives_no_rotation() {
    for max in [f64::NAN, f64::INFINITY, 0.0] {
        assert_eq!(target_rotation(Vec2::new(0.8, -0.3), max, Facing::Toward), Vec2::ZERO);
    }
}

// =============================================================
// Magnet
// =============================================================

#[test]
fn pull_is_one_at_zero_distance() {
    assert_eq!(magnet_pull(0.0, 150.0), 1.0);
}

#[test]
fn pull_is_zero_at_and_beyond_max_distance() {
    assert_eq!(magnet_pull(150.0, 150.0), 0.0);
    assert_eq!(magnet_pull(400.0, 150.0), 0.0);
}

#[test]
fn pull_is_quadratic_and_strictly_decreasing() {
    assert!(approx_eq(magnet_pull(75.0, 150.0), 0.25));
    let mut previous = magnet_pull(0.0, 150.0);
    for d in 1..150 {
        let pull = magnet_pull(f64::from(d), 150.0);
        assert!(pull < previous, "pull should decrease at distance {d}");
        previous = pull;
    }
}

#[test]
fn pull_with_invalid_radius_is_zero() {
    assert_eq!(magnet_pull(10.0, 0.0), 0.0);
    assert_eq!(magnet_pull(10.0, f64::NAN), 0.0);
}

#[test]
fn magnet_target_at_half_radius() {
    let target = magnet_target(Vec2::new(175.0, 50.0), Vec2::new(100.0, 50.0), &card_magnet());
    assert!(approx_eq(target.x, 7.5));
    assert!(approx_eq(target.y, 0.0));
}

#[test]
fn magnet_target_outside_radius_is_zero() {
    let target = magnet_target(Vec2::new(400.0, 50.0), Vec2::new(100.0, 50.0), &card_magnet());
    assert_eq!(target, Vec2::ZERO);
}

#[test]
fn magnet_target_points_toward_pointer() {
    let target = magnet_target(Vec2::new(90.0, 40.0), Vec2::new(100.0, 50.0), &card_magnet());
    assert!(target.x < 0.0);
    assert!(target.y < 0.0);
}

// =============================================================
// Interpolation and settle
// =============================================================

#[test]
fn ease_moves_fraction_of_the_gap() {
    let next = ease_toward(Vec2::ZERO, Vec2::new(-25.0, 10.0), 0.15);
    assert!(approx_eq(next.x, -3.75));
    assert!(approx_eq(next.y, 1.5));
}

#[test]
fn ease_of_one_snaps_to_target() {
    let target = Vec2::new(3.0, -4.0);
    assert_eq!(ease_toward(Vec2::new(9.0, 9.0), target, 1.0), target);
}

#[test]
fn repeated_easing_matches_closed_form() {
    let target = Vec2::new(0.0, -25.0);
    let mut current = Vec2::ZERO;
    for _ in 0..10 {
        current = ease_toward(current, target, 0.15);
    }
    let expected = -25.0 * (1.0 - 0.85_f64.powi(10));
    assert!(approx_eq(current.y, expected));
    assert!((current.y + 20.08).abs() < 0.01);
}

#[test]
fn within_threshold_on_both_axes() {
    assert!(within(Vec2::new(0.005, -0.005), Vec2::ZERO, 0.01));
    assert!(!within(Vec2::new(0.005, 0.02), Vec2::ZERO, 0.01));
    assert!(!within(Vec2::new(0.01, 0.0), Vec2::ZERO, 0.01));
}

// =============================================================
// Shine and parallax
// =============================================================

#[test]
fn shine_is_centered_at_rest() {
    let s = shine(Vec2::ZERO, false, 0.15);
    assert_eq!(s.x_pct, 50.0);
    assert_eq!(s.y_pct, 50.0);
    assert_eq!(s.opacity, 0.0);
}

#[test]
fn shine_follows_rotation_and_hover() {
    let s = shine(Vec2::new(2.0, -5.0), true, 0.15);
    assert_eq!(s.x_pct, 35.0);
    assert_eq!(s.y_pct, 56.0);
    assert_eq!(s.opacity, 0.15);
}

#[test]
fn layer_offset_follows_card_formula() {
    let layer = Layer::new(".card__title", 55.0);
    let offset = layer_offset(Vec2::new(12.5, -25.0), 25.0, &layer, Facing::Toward);
    assert!(approx_eq(offset.x, 55.0));
    assert!(approx_eq(offset.y, 27.5));
}

#[test]
fn horizontal_only_layer_has_no_vertical_offset() {
    let layer = Layer::new(".preview__nav", 45.0).horizontal_only();
    let offset = layer_offset(Vec2::new(15.0, 15.0), 15.0, &layer, Facing::Away);
    assert!(approx_eq(offset.x, 45.0));
    assert_eq!(offset.y, 0.0);
}

#[test]
fn layers_drift_toward_pointer_for_both_facings() {
    let layer = Layer::new(".l", 10.0);
    let pointer_right = Vec2::new(1.0, 0.0);
    for facing in [Facing::Toward, Facing::Away] {
        let rot = target_rotation(pointer_right, 20.0, facing);
        let offset = layer_offset(rot, 20.0, &layer, facing);
        assert!(offset.x > 0.0, "{facing:?} layer should drift right");
    }
}

#[test]
fn layer_offset_with_unusable_max_is_zero() {
    let layer = Layer::new(".l", 10.0);
    for max in [0.0, f64::NAN] {
        assert_eq!(layer_offset(Vec2::new(5.0, 5.0), max, &layer, Facing::Toward), Vec2::ZERO);
    }
}
