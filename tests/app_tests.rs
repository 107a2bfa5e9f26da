//! Tests for the clock loop: compositor tracking, redraw triggers and the
//! wait schedule, against a scripted display.

mod common;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use chrono::TimeDelta;
use common::{ROOT, test_app, test_config};
use rootclock::display::{DisplayEvent, DrawTarget, WaitOutcome};
use rootclock_config::BackgroundMode;
use rootclock_render::Rect;

#[test]
fn test_no_compositor_draws_on_root_only() {
    let (mut app, state, _clock) = test_app(test_config(), |_| {});

    assert!(app.step().unwrap());

    let s = state.borrow();
    assert!(s.created.is_empty());
    assert_eq!(s.presents, vec![(DrawTarget::Root, Rect::new(0, 0, 1920, 1080))]);
    assert_eq!(app.draw_target(), DrawTarget::Root);
}

#[test]
fn test_compositor_at_start_creates_window_before_first_frame() {
    let (mut app, state, _clock) = test_app(test_config(), |s| s.compositor = true);

    let window = {
        let s = state.borrow();
        assert_eq!(s.created.len(), 1);
        assert!(s.presents.is_empty());
        s.created[0]
    };
    assert_eq!(app.draw_target(), DrawTarget::Desktop(window));

    app.step().unwrap();
    let s = state.borrow();
    assert_eq!(s.presents_to(DrawTarget::Desktop(window)), 1);
    assert_eq!(s.presents_to(DrawTarget::Root), 0);
}

#[test]
fn test_one_redraw_per_compositor_transition() {
    let (mut app, state, _clock) = test_app(test_config(), |_| {});

    assert!(app.step().unwrap());
    assert!(!app.step().unwrap());

    state.borrow_mut().compositor = true;
    assert!(app.step().unwrap());
    assert!(!app.step().unwrap());
    let window = state.borrow().created[0];
    assert_eq!(app.draw_target(), DrawTarget::Desktop(window));

    state.borrow_mut().compositor = false;
    assert!(app.step().unwrap());
    assert!(!app.step().unwrap());
    assert_eq!(app.draw_target(), DrawTarget::Root);

    assert_eq!(app.frames(), 3);
    let s = state.borrow();
    assert_eq!(s.destroyed, vec![window]);
    assert_eq!(s.created.len(), 1);
    assert_eq!(s.presents_to(DrawTarget::Desktop(window)), 1);
    assert_eq!(s.presents_to(DrawTarget::Root), 2);
}

#[test]
fn test_desktop_window_failure_stays_on_root_and_retries() {
    let (mut app, state, _clock) = test_app(test_config(), |s| {
        s.compositor = true;
        s.fail_create = true;
    });

    assert_eq!(app.draw_target(), DrawTarget::Root);
    assert!(app.step().unwrap());
    assert_eq!(state.borrow().presents_to(DrawTarget::Root), 1);

    state.borrow_mut().fail_create = false;
    assert!(app.step().unwrap());
    let window = state.borrow().created[0];
    assert_eq!(app.draw_target(), DrawTarget::Desktop(window));
    assert_eq!(state.borrow().presents_to(DrawTarget::Desktop(window)), 1);
}

#[test]
fn test_expose_only_for_our_windows() {
    let (mut app, state, _clock) = test_app(test_config(), |_| {});
    app.step().unwrap();

    state
        .borrow_mut()
        .events
        .push_back(DisplayEvent::Expose { window: 0x999 });
    assert!(!app.step().unwrap());

    state
        .borrow_mut()
        .events
        .push_back(DisplayEvent::Expose { window: ROOT });
    assert!(app.step().unwrap());
}

#[test]
fn test_configure_resizes_window_and_refreshes_monitors() {
    let (mut app, state, _clock) = test_app(test_config(), |s| s.compositor = true);
    app.step().unwrap();
    assert_eq!(state.borrow().monitor_queries, 1);

    state
        .borrow_mut()
        .events
        .push_back(DisplayEvent::Configure {
            width: 2560,
            height: 1440,
        });
    assert!(app.step().unwrap());

    let s = state.borrow();
    let window = s.created[0];
    assert_eq!(s.resized, vec![(window, 2560, 1440)]);
    assert_eq!(s.monitor_queries, 2);
    assert_eq!(
        s.presents.last(),
        Some(&(DrawTarget::Desktop(window), Rect::new(0, 0, 2560, 1440)))
    );
}

#[test]
fn test_configure_with_same_size_only_redraws() {
    let (mut app, state, _clock) = test_app(test_config(), |s| s.compositor = true);
    app.step().unwrap();

    state
        .borrow_mut()
        .events
        .push_back(DisplayEvent::Configure {
            width: 1920,
            height: 1080,
        });
    assert!(app.step().unwrap());
    assert!(state.borrow().resized.is_empty());
}

#[test]
fn test_second_rollover_redraws() {
    let (mut app, _state, clock) = test_app(test_config(), |_| {});
    app.step().unwrap();

    clock.advance(TimeDelta::milliseconds(500));
    assert!(!app.step().unwrap());
    clock.advance(TimeDelta::milliseconds(500));
    assert!(app.step().unwrap());
}

#[test]
fn test_every_monitor_is_presented() {
    let screens = vec![Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 1280, 1024)];
    let expected = screens.clone();
    let (mut app, state, _clock) = test_app(test_config(), move |s| {
        s.size = (3200, 1080);
        s.monitors = Some(screens);
    });

    app.step().unwrap();
    let presented: Vec<Rect> = state.borrow().presents.iter().map(|(_, r)| *r).collect();
    assert_eq!(presented, expected);
}

#[test]
fn test_blend_mode_without_date() {
    let config = test_config()
        .with_background_mode(BackgroundMode::Invert)
        .with_show_date(false);
    let (mut app, state, _clock) = test_app(config, |_| {});

    assert!(app.step().unwrap());
    assert_eq!(state.borrow().presents.len(), 1);
}

#[test]
fn test_timeout_forces_redraw() {
    let (mut app, state, _clock) = test_app(test_config(), |_| {});
    let running = Arc::new(AtomicBool::new(true));
    {
        let mut s = state.borrow_mut();
        s.wait_outcomes.extend([WaitOutcome::TimedOut, WaitOutcome::Ready]);
        s.stop_after = Some((2, Arc::clone(&running)));
    }

    app.run(&running).unwrap();

    // first frame, then one more after the timeout; the event wakeup draws nothing
    assert_eq!(app.frames(), 2);
    assert_eq!(state.borrow().waits.len(), 2);
}

#[test]
fn test_wait_follows_schedule() {
    let (mut app, state, _clock) = test_app(test_config(), |_| {});
    let running = Arc::new(AtomicBool::new(true));
    state.borrow_mut().stop_after = Some((1, Arc::clone(&running)));

    app.run(&running).unwrap();

    // the fake clock sits at .200 past the second
    assert_eq!(state.borrow().waits, vec![Duration::from_millis(750)]);
}

#[test]
fn test_run_returns_when_already_stopped() {
    let (mut app, state, _clock) = test_app(test_config(), |_| {});
    app.run(&AtomicBool::new(false)).unwrap();
    assert_eq!(app.frames(), 0);
    assert!(state.borrow().waits.is_empty());
}

#[test]
fn test_drop_destroys_desktop_window() {
    let (app, state, _clock) = test_app(test_config(), |s| s.compositor = true);
    let window = state.borrow().created[0];
    drop(app);
    assert_eq!(state.borrow().destroyed, vec![window]);
}

#[test]
fn test_missing_fonts_are_fatal() {
    let config = rootclock_config::Config {
        time_fonts: vec!["Nowhere:pixelsize=10".to_string()],
        ..test_config()
    };
    let (display, _state) = common::FakeDisplay::new(800, 600);
    // no sans-serif fallback either
    let result = rootclock::app::App::new(
        config,
        display,
        common::FakeClock::new(),
        rootclock_fonts::testing::FakeMatcher::default(),
    );
    let err = result.err().expect("loading fonts should fail");
    assert!(format!("{err:#}").contains("failed to load time fonts"));
}
