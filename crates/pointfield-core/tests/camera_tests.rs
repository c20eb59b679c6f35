//! Camera integration tests

use pointfield_core::camera::{Bounds, LookAt, ViewCamera};
use pointfield_core::Mat4;
use proptest::prelude::*;
use rstest::rstest;

fn assert_close(a: &Mat4, b: &Mat4) {
    for (x, y) in a.as_array().iter().zip(b.as_array()) {
        assert!((x - y).abs() < 1e-9, "{:?} != {:?}", a, b);
    }
}

#[rstest]
#[case(None)]
#[case(Some([0.3, -0.7]))]
#[case(Some([10.0, 10.0]))]
fn test_zoom_by_one_is_exact(#[case] anchor: Option<[f64; 2]>) {
    let mut camera = ViewCamera::new(LookAt {
        target: [1.5, -2.0],
        distance: 0.25,
        rotation: 0.4,
    });
    let before = *camera.view();
    assert!(!camera.zoom(1.0, anchor));
    assert_eq!(camera.view().as_array(), before.as_array());
}

#[test]
fn test_zoom_respects_scale_bounds() {
    let mut camera = ViewCamera::default();
    camera.set_scale_bounds(Bounds::Uniform([0.5, 4.0]));
    camera.zoom(100.0, None);
    assert!((camera.max_scaling() - 4.0).abs() < 1e-9);
    camera.zoom(0.0001, None);
    assert!((camera.min_scaling() - 0.5).abs() < 1e-9);
}

#[test]
fn test_reset_restores_initial_view() {
    let mut camera = ViewCamera::new(LookAt {
        target: [2.0, 3.0],
        distance: 2.0,
        rotation: 0.0,
    });
    let initial = *camera.view();
    camera.pan(0.5, 0.5);
    camera.zoom(3.0, Some([0.2, 0.2]));
    camera.rotate(1.0);
    camera.reset();
    assert_close(camera.view(), &initial);
}

proptest! {
    #[test]
    fn test_pan_round_trip(dx in -10.0f64..10.0, dy in -10.0f64..10.0, rotation in -3.0f64..3.0) {
        let mut camera = ViewCamera::new(LookAt {
            target: [0.5, 0.5],
            distance: 2.0,
            rotation,
        });
        let before = *camera.view();
        camera.pan(dx, dy);
        camera.pan(-dx, -dy);
        for (x, y) in camera.view().as_array().iter().zip(before.as_array()) {
            prop_assert!((x - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed(factor in 0.1f64..10.0, ax in -1.0f64..1.0, ay in -1.0f64..1.0) {
        let mut camera = ViewCamera::default();
        let before = camera.view().invert().unwrap().transform_xy([ax, ay]);
        camera.zoom(factor, Some([ax, ay]));
        let after = camera.view().invert().unwrap().transform_xy([ax, ay]);
        prop_assert!((before[0] - after[0]).abs() < 1e-9);
        prop_assert!((before[1] - after[1]).abs() < 1e-9);
    }
}
