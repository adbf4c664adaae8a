// Host-side tests for render surface geometry and primitive draws.

mod support;

use glam::Vec2;
use support::*;
use synesthesia::core::{backing_store_px, Glow, Rect, RenderSurface, Rgba, ViewportGeometry};
use synesthesia::error::VisualizerError;

fn surface() -> (RenderSurface<RecordingTarget>, RecordingTarget) {
    let target = RecordingTarget::default();
    let mut s = RenderSurface::new(target.clone());
    s.resize(640.0, 480.0).unwrap();
    (s, target)
}

#[test]
fn resize_sets_geometry_and_backing_store() {
    let (mut s, target) = surface();
    s.resize(1024.4, 767.6).unwrap();
    assert_eq!(
        s.geometry(),
        ViewportGeometry {
            width: 1024,
            height: 768
        }
    );
    assert_eq!(
        target.ops.borrow().last(),
        Some(&DrawOp::Resize(1024, 768))
    );
}

#[test]
fn zero_width_resize_is_rejected_and_geometry_kept() {
    let (mut s, target) = surface();
    let before = target.ops.borrow().len();
    let err = s.resize(0.0, 500.0).unwrap_err();
    assert!(matches!(err, VisualizerError::GeometryInvalid { .. }));
    assert_eq!(s.geometry().width, 640);
    assert_eq!(s.geometry().height, 480);
    assert_eq!(target.ops.borrow().len(), before);
}

#[test]
fn negative_and_non_finite_sizes_are_rejected() {
    let (mut s, _) = surface();
    for (w, h) in [
        (-1.0, 100.0),
        (100.0, -20.0),
        (f64::NAN, 100.0),
        (100.0, f64::INFINITY),
        (0.2, 0.2),
    ] {
        assert!(s.resize(w, h).is_err(), "{w}x{h} accepted");
    }
    assert_eq!(s.width(), 640.0);
    assert_eq!(s.height(), 480.0);
}

#[test]
fn bars_are_anchored_at_the_bottom() {
    let (mut s, target) = surface();
    let glow = Glow {
        color: Rgba::rgb(1, 2, 3),
        blur: 20.0,
    };
    s.draw_bar(10.0, 8.0, 100.0, Rgba::rgb(1, 2, 3), Some(glow))
        .unwrap();
    assert_eq!(
        target.bars(),
        vec![(
            Rect {
                x: 10.0,
                y: 380.0,
                width: 8.0,
                height: 100.0
            },
            Rgba::rgb(1, 2, 3),
            Some(glow)
        )]
    );
}

#[test]
fn bar_height_is_clamped_to_surface() {
    let (mut s, target) = surface();
    s.draw_bar(0.0, 4.0, 10_000.0, Rgba::rgb(0, 0, 0), None)
        .unwrap();
    let (rect, _, _) = target.bars()[0];
    assert_eq!(rect.y, 0.0);
    assert_eq!(rect.height, 480.0);
}

#[test]
fn polyline_needs_two_points() {
    let (mut s, target) = surface();
    s.draw_polyline(&[Vec2::new(1.0, 1.0)], Rgba::rgb(0, 0, 0), 2.0)
        .unwrap();
    assert!(target.polylines().is_empty());
    s.draw_polyline(
        &[Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0)],
        Rgba::rgb(0, 0, 0),
        2.0,
    )
    .unwrap();
    assert_eq!(target.polylines().len(), 1);
}

#[test]
fn clear_paints_requested_colour() {
    let (mut s, target) = surface();
    s.clear(Rgba::TRANSPARENT).unwrap();
    assert_eq!(target.draw_calls(), vec![DrawOp::Fill(Rgba::TRANSPARENT)]);
}

#[test]
fn css_colour_string() {
    assert_eq!(Rgba::rgb(50, 255, 133).css(), "rgba(50,255,133,1)");
    assert_eq!(Rgba::TRANSPARENT.css(), "rgba(0,0,0,0)");
}

#[test]
fn backing_store_scales_window_size_by_pixel_ratio() {
    assert_eq!(backing_store_px(1280.0, 720.0, 1.0), (1280.0, 720.0));
    assert_eq!(backing_store_px(1280.0, 720.0, 2.0), (2560.0, 1440.0));
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert_eq!(backing_store_px(800.0, 600.0, bad), (800.0, 600.0));
    }
}

#[test]
fn repeated_resizes_to_the_same_window_are_stable() {
    let (mut s, _) = surface();
    for _ in 0..5 {
        let (w, h) = backing_store_px(1024.0, 768.0, 2.0);
        s.resize(w, h).unwrap();
    }
    assert_eq!(
        s.geometry(),
        ViewportGeometry {
            width: 2048,
            height: 1536
        }
    );
}
