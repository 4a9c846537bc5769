use std::sync::Arc;

use spatial::{
    GridCodec, LayoutPlanner, MockWindowService, PaintOrder, Rect, Role, Size, SpatialConfig,
    Visibility, WindowId, WindowService, WindowState,
    arrange::Strategy,
    constraints::{DiscoveryPolicy, NoSettle},
    importance::{AppPreferences, FocusHistory},
};

fn desk() -> Arc<MockWindowService> {
    let svc = Arc::new(MockWindowService::new());
    svc.set_windows(vec![
        WindowState::new("Visual Studio Code", 1, Rect::new(0.0, 0.0, 1400.0, 1000.0)),
        WindowState::new("Safari", 2, Rect::new(300.0, 100.0, 1200.0, 800.0)).with_layer(1),
        WindowState::new("Spotify", 3, Rect::new(900.0, 500.0, 600.0, 400.0)).with_layer(2),
    ]);
    svc.set_min_size(WindowId(2), Size::new(1200.0, 800.0));
    svc
}

/// Sizes agree to within the discovery tolerance.
fn within_tolerance(actual: Size, expected: Size) -> bool {
    let tolerance = DiscoveryPolicy::default().tolerance;
    (actual.width - expected.width).abs() <= tolerance
        && (actual.height - expected.height).abs() <= tolerance
}

#[test]
fn cascade_plan_orders_roles_by_importance() {
    let svc = desk();
    let mut config = SpatialConfig::default();
    let mut prefs = AppPreferences::new();
    prefs.set("Visual Studio Code", 1.0);
    prefs.set("Safari", 0.8);
    prefs.set("Spotify", 0.0);
    config.app_preferences = prefs;

    let planner = LayoutPlanner::new(svc.clone(), config)
        .with_settle(Arc::new(NoSettle))
        .with_history(FocusHistory::from_recent(["Visual Studio Code", "Safari"]));
    let plan = planner.plan(0).unwrap();

    assert_eq!(plan.strategy, Strategy::Cascade);
    let roles: Vec<Role> = plan.arrangements.iter().map(|a| a.role).collect();
    assert_eq!(roles, [Role::Primary, Role::Secondary, Role::Auxiliary]);
    assert_eq!(plan.arrangements[0].visibility, Visibility::FullyVisible);
    assert_eq!(plan.arrangements[1].window.app, "Safari");
    // Safari refuses to shrink at all, so its secondary slot grows to fit.
    let safari = plan.arrangements[1].bounds.size();
    assert!(within_tolerance(safari, Size::new(1200.0, 800.0)), "{safari:?}");
    assert!(plan.feasibility.is_feasible);
    assert!(plan.is_acceptable(), "{}", plan.visibility.summary());

    // Discovery restored every probed window.
    assert_eq!(svc.window_frame(WindowId(2)), Some(Rect::new(300.0, 100.0, 1200.0, 800.0)));

    let report = plan.apply(svc.as_ref());
    assert_eq!(report.applied, 3);
    for a in &plan.arrangements {
        let frame = svc.window_frame(a.window.id).unwrap();
        assert_eq!(frame.origin(), a.bounds.origin());
        assert!(within_tolerance(frame.size(), a.bounds.size()), "{frame:?}");
    }
}

#[test]
fn decoded_grid_commands_drive_the_service() {
    let svc = desk();
    let screen = Size::new(1920.0, 1080.0);
    let codec = GridCodec::default();
    let reply = "Sure, here is the layout:\n\
                 +--------+\n\
                 |22223333|\n\
                 |22223333|\n\
                 +--------+\n";
    let decoded = codec.decode(reply, screen).unwrap();
    assert_eq!(decoded.commands.len(), 2);

    let bounds = Rect::from_size(screen);
    let windows = svc.list_windows();
    for cmd in &decoded.commands {
        let target = cmd.resolve(&bounds);
        let Some(w) = windows.iter().find(|w| w.is_app(&cmd.app)) else {
            continue;
        };
        svc.set_window_bounds(w.id, target).unwrap();
    }
    assert_eq!(
        svc.window_frame(WindowId(2)),
        Some(Rect::new(0.0, 0.0, 1200.0, 800.0))
    );

    let snapshot = codec.encode(&PaintOrder::by_layer(svc.list_windows()), screen);
    assert!(snapshot.render().contains("LEGEND:"));
}

#[test]
fn ultrawide_display_tiles_four_windows() {
    let svc = desk();
    svc.set_displays(vec![Rect::new(0.0, 0.0, 3440.0, 1440.0)]);
    let mut wins = svc.list_windows();
    wins.push(WindowState::new("Slack", 4, Rect::new(0.0, 0.0, 800.0, 600.0)));
    svc.set_windows(wins);
    svc.set_read_only(true);

    let plan = LayoutPlanner::new(svc.clone(), SpatialConfig::default())
        .plan(0)
        .unwrap();
    assert_eq!(plan.strategy, Strategy::Tiled);
    assert!(plan.visibility.is_valid());
    assert!(
        plan.arrangements
            .iter()
            .all(|a| a.visibility == Visibility::FullyVisible)
    );
}
