use approx::assert_abs_diff_eq;
use vectorplay_core::{fit_rect, FitPolicy, Rect, Vec2};

const CENTER: Vec2 = Vec2::new(0.5, 0.5);

fn assert_rect(actual: Rect, expected: Rect) {
    assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-4);
    assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-4);
    assert_abs_diff_eq!(actual.width, expected.width, epsilon = 1e-4);
    assert_abs_diff_eq!(actual.height, expected.height, epsilon = 1e-4);
}

#[test]
fn contain_wide_source_in_square_is_letterboxed() {
    let placed = fit_rect(
        200.0,
        100.0,
        Rect::new(0.0, 0.0, 100.0, 100.0),
        FitPolicy::Contain,
        CENTER,
    );
    assert_rect(placed, Rect::new(0.0, 25.0, 100.0, 50.0));
}

#[test]
fn placement_is_relative_to_destination_origin() {
    let placed = fit_rect(
        200.0,
        100.0,
        Rect::new(40.0, -10.0, 100.0, 100.0),
        FitPolicy::Contain,
        CENTER,
    );
    assert_rect(placed, Rect::new(40.0, 15.0, 100.0, 50.0));
}

#[test]
fn every_policy_preserves_aspect_ratio() {
    let dest = Rect::new(0.0, 0.0, 320.0, 180.0);
    for policy in [
        FitPolicy::Contain,
        FitPolicy::Cover,
        FitPolicy::Fill,
        FitPolicy::FitWidth,
        FitPolicy::FitHeight,
    ] {
        let placed = fit_rect(100.0, 100.0, dest, policy, CENTER);
        assert_abs_diff_eq!(placed.width, placed.height, epsilon = 1e-4);
    }
}

#[test]
fn contain_fits_inside_and_cover_spans_destination() {
    let dest = Rect::new(0.0, 0.0, 300.0, 120.0);
    for (w, h) in [(50.0, 200.0), (640.0, 480.0), (10.0, 10.0)] {
        let inner = fit_rect(w, h, dest, FitPolicy::Contain, CENTER);
        assert!(inner.width <= dest.width + 1e-3 && inner.height <= dest.height + 1e-3);

        let outer = fit_rect(w, h, dest, FitPolicy::Cover, CENTER);
        assert!(outer.width >= dest.width - 1e-3 && outer.height >= dest.height - 1e-3);
    }
}

#[test]
fn fill_uses_mean_of_axis_scales() {
    // sx = 2, sy = 1 -> scale 1.5
    let placed = fit_rect(
        50.0,
        100.0,
        Rect::new(0.0, 0.0, 100.0, 100.0),
        FitPolicy::Fill,
        CENTER,
    );
    assert_rect(placed, Rect::new(12.5, -25.0, 75.0, 150.0));
}

#[test]
fn anchor_corners_pin_content() {
    let dest = Rect::new(0.0, 0.0, 100.0, 100.0);
    let top_left = fit_rect(200.0, 100.0, dest, FitPolicy::Contain, Vec2::ZERO);
    assert_rect(top_left, Rect::new(0.0, 0.0, 100.0, 50.0));

    let bottom_right = fit_rect(200.0, 100.0, dest, FitPolicy::Contain, Vec2::new(1.0, 1.0));
    assert_rect(bottom_right, Rect::new(0.0, 50.0, 100.0, 50.0));
}

#[test]
fn fit_height_lets_width_overflow() {
    let placed = fit_rect(
        400.0,
        100.0,
        Rect::new(0.0, 0.0, 200.0, 200.0),
        FitPolicy::FitHeight,
        CENTER,
    );
    assert_rect(placed, Rect::new(-300.0, 0.0, 800.0, 200.0));
}
