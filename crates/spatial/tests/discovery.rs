use std::{
    sync::Arc,
    thread,
    time::{Duration, SystemTime},
};

use spatial::{
    ConstraintCache, ConstraintDiscovery, MockWindowService, Rect, Size, WindowId, WindowService,
    WindowState,
    constraints::{DiscoveryPolicy, ManualClock, NoSettle},
};

fn refusing_app(frame: Rect) -> Arc<MockWindowService> {
    let svc = Arc::new(MockWindowService::new());
    svc.set_windows(vec![WindowState::new("Notion", 11, frame)]);
    svc.set_min_size(WindowId(11), Size::new(400.0, 300.0));
    svc
}

fn discovery(svc: Arc<MockWindowService>, cache: Arc<ConstraintCache>) -> ConstraintDiscovery {
    ConstraintDiscovery::new(svc, cache).with_settle(Arc::new(NoSettle))
}

#[test]
fn refusing_app_reports_its_minimum() {
    for frame in [
        Rect::new(0.0, 0.0, 1200.0, 900.0),
        Rect::new(50.0, 40.0, 1800.0, 1000.0),
        Rect::new(0.0, 0.0, 640.0, 480.0),
    ] {
        let svc = refusing_app(frame);
        let cache = Arc::new(ConstraintCache::new(Duration::from_secs(3600)));
        let d = discovery(svc.clone(), cache.clone());
        let got = d.get_constraints("notion").expect("constraint");
        assert!((got.min_width - 400.0).abs() <= 10.0, "{frame:?}: {got:?}");
        assert!((got.min_height - 300.0).abs() <= 10.0, "{frame:?}: {got:?}");
        // Sixteen probes at most, plus the restore.
        assert!(svc.request_count(WindowId(11)) <= 17);
        assert_eq!(svc.window_frame(WindowId(11)), Some(frame));
        assert_eq!(cache.len(), 1);
    }
}

#[test]
fn iteration_cap_bounds_probes() {
    let svc = refusing_app(Rect::new(0.0, 0.0, 4000.0, 3000.0));
    let cache = Arc::new(ConstraintCache::new(Duration::from_secs(3600)));
    let d = discovery(svc.clone(), cache).with_policy(DiscoveryPolicy {
        max_iterations: 3,
        ..DiscoveryPolicy::default()
    });
    let outcome = d.discover("Notion").unwrap();
    assert!(outcome.complete);
    assert_eq!(outcome.probes, 6);
}

#[test]
fn expired_entries_are_rediscovered() {
    let svc = refusing_app(Rect::new(0.0, 0.0, 1200.0, 900.0));
    let clock = Arc::new(ManualClock::new(SystemTime::UNIX_EPOCH));
    let cache = Arc::new(ConstraintCache::with_clock(
        Duration::from_secs(24 * 60 * 60),
        clock.clone(),
    ));
    let d = discovery(svc.clone(), cache);

    d.get_constraints("Notion").unwrap();
    let first = svc.request_count(WindowId(11));
    clock.advance(Duration::from_secs(23 * 60 * 60));
    d.get_constraints("Notion").unwrap();
    assert_eq!(svc.request_count(WindowId(11)), first);

    clock.advance(Duration::from_secs(2 * 60 * 60));
    let again = d.get_constraints("Notion").unwrap();
    assert!(svc.request_count(WindowId(11)) > first);
    assert_eq!(
        again.discovered_at,
        SystemTime::UNIX_EPOCH + Duration::from_secs(25 * 60 * 60)
    );
}

#[test]
fn vanishing_window_leaves_cache_untouched() {
    let svc = refusing_app(Rect::new(0.0, 0.0, 1200.0, 900.0));
    svc.vanish_after(WindowId(11), 10);
    let cache = Arc::new(ConstraintCache::new(Duration::from_secs(3600)));
    let d = discovery(svc.clone(), cache.clone());
    let outcome = d.discover("Notion").unwrap();
    assert!(!outcome.complete);
    assert!((outcome.constraint.min_width - 400.0).abs() <= 10.0);
    assert!(svc.list_windows().is_empty());
    assert!(d.get_constraints("Notion").is_none());
    assert!(cache.is_empty());
}

#[test]
fn parallel_requests_for_one_app_probe_once() {
    let svc = refusing_app(Rect::new(0.0, 0.0, 1200.0, 900.0));
    let cache = Arc::new(ConstraintCache::new(Duration::from_secs(3600)));
    let d = Arc::new(discovery(svc.clone(), cache));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let d = d.clone();
            thread::spawn(move || d.get_constraints("Notion"))
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap().is_some());
    }
    assert!(svc.request_count(WindowId(11)) <= 17);
}

#[test]
fn cache_entries_serialize() {
    let cache = ConstraintCache::new(Duration::from_secs(60));
    cache.seed("Figma", Size::new(900.0, 600.0));
    let json = serde_json::to_string(&cache.entries()).unwrap();
    assert!(json.contains("\"figma\""));
    assert!(json.contains("900"));
}
