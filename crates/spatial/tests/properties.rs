use proptest::prelude::*;

use spatial::{
    GridCodec, OcclusionCalculator, OcclusionMode, PaintOrder, Rect, Size, WindowId, WindowState,
    occlusion::{MIN_VISIBLE_AREA, Overlap},
};

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (
        -200.0f64..1800.0,
        -200.0f64..1000.0,
        0.0f64..900.0,
        0.0f64..700.0,
    )
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn window_strategy() -> impl Strategy<Value = WindowState> {
    (rect_strategy(), -3i32..4, 0usize..2, any::<bool>(), 0usize..6).prop_map(
        |(frame, layer, display, minimized, app)| {
            let apps = ["Arc", "Safari", "Slack", "Xcode", "Unlisted", "Figma"];
            WindowState::new(apps[app], 0, frame)
                .with_layer(layer)
                .with_display(display)
                .with_minimized(minimized)
        },
    )
}

fn windows_strategy() -> impl Strategy<Value = Vec<WindowState>> {
    prop::collection::vec(window_strategy(), 0..8).prop_map(|mut wins| {
        for (i, w) in wins.iter_mut().enumerate() {
            w.id = WindowId(i as u32 + 1);
        }
        wins
    })
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in window_strategy(), b in window_strategy()) {
        let a = WindowState { id: WindowId(1), ..a };
        let b = WindowState { id: WindowId(2), ..b };
        let ab = Overlap::between(&a, &b);
        let ba = Overlap::between(&b, &a);
        prop_assert_eq!(ab.map(|o| o.area), ba.map(|o| o.area));
        prop_assert_eq!(ab.map(|o| o.rect), ba.map(|o| o.rect));
    }

    #[test]
    fn visible_area_is_bounded(wins in windows_strategy()) {
        for mode in [OcclusionMode::Sequential, OcclusionMode::Union] {
            let report = OcclusionCalculator::new(mode).validate_constraints(&wins);
            for v in &report.validated {
                prop_assert!(v.visible_area >= 0.0);
                prop_assert!(v.visible_area <= v.total_area + 1e-6);
            }
        }
    }

    #[test]
    fn union_never_reports_less_than_sequential(wins in windows_strategy()) {
        let seq = OcclusionCalculator::new(OcclusionMode::Sequential).validate_constraints(&wins);
        let uni = OcclusionCalculator::new(OcclusionMode::Union).validate_constraints(&wins);
        for (s, u) in seq.validated.iter().zip(&uni.validated) {
            prop_assert!(u.visible_area + 1e-6 >= s.visible_area);
        }
    }

    #[test]
    fn windows_without_overlaps_are_fully_visible(wins in windows_strategy()) {
        let calc = OcclusionCalculator::default();
        let overlaps = calc.calculate_overlaps(&wins);
        let report = calc.validate_constraints(&wins);
        for (w, v) in wins.iter().zip(&report.validated) {
            if !overlaps.contains_key(&w.id) {
                prop_assert_eq!(v.visible_area, w.area());
                prop_assert_eq!(v.meets_minimum, w.minimized || w.area() >= MIN_VISIBLE_AREA);
            }
        }
    }

    #[test]
    fn encode_is_deterministic(wins in windows_strategy()) {
        let codec = GridCodec::default();
        let screen = Size::new(1600.0, 900.0);
        let first = codec.encode(&PaintOrder::by_layer(wins.clone()), screen);
        let second = codec.encode(&PaintOrder::by_layer(wins), screen);
        prop_assert_eq!(first.render(), second.render());
    }

    #[test]
    fn round_trip_is_within_one_cell(
        parts in prop::collection::vec(
            (0.0f64..200.0, 50.0f64..300.0, 0.0f64..500.0, 50.0f64..400.0),
            1..5,
        )
    ) {
        // One window per 500px column band, so nothing overlaps.
        let apps = ["Finder", "Arc", "Safari", "Google Chrome"];
        let wins: Vec<WindowState> = parts
            .iter()
            .enumerate()
            .map(|(i, &(dx, w, y, h))| {
                WindowState::new(apps[i], i as u32 + 1, Rect::new(i as f64 * 500.0 + dx, y, w, h))
            })
            .collect();
        let screen = Size::new(2000.0, 1000.0);
        let codec = GridCodec::default();
        let encoded = codec.encode(&PaintOrder::as_given(wins.clone()), screen);
        prop_assert!(!encoded.has_overlap);
        let decoded = codec.decode(&encoded.render(), screen).unwrap();
        prop_assert_eq!(decoded.commands.len(), wins.len());
        prop_assert_eq!(decoded.unmapped_count(), 0);
        let bounds = Rect::from_size(screen);
        for w in &wins {
            let cmd = decoded.commands.iter().find(|c| c.app == w.app).unwrap();
            let got = cmd.resolve(&bounds);
            prop_assert!((got.x - w.frame.x).abs() < 50.0);
            prop_assert!((got.y - w.frame.y).abs() < 50.0);
            prop_assert!((got.w - w.frame.w).abs() < 50.0);
            prop_assert!((got.h - w.frame.h).abs() < 50.0);
        }
    }
}
