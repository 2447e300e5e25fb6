use super::*;

fn load(token: u64, view: View) -> BackgroundLoad {
    BackgroundLoad {
        token,
        view,
        source_key: None,
        photo: PhotoOutcome::Missing,
    }
}

#[test]
fn starts_transitioning_without_origin() {
    let c = ViewController::new(View::Front, Duration::from_secs(5));
    assert!(matches!(
        c.state(),
        ControllerState::Transitioning { from: None, to: View::Front, .. }
    ));
    assert_eq!(c.state().idle_view(), None);
    assert_eq!(c.state().target(), View::Front);
}

#[test]
fn tokens_increase_and_only_latest_is_accepted() {
    let mut c = ViewController::new(View::Front, Duration::from_secs(5));
    let t1 = c.begin(View::Front);
    c.finish(View::Front);
    let t2 = c.begin(View::Back);
    let t3 = c.begin(View::LeftSleeve);
    assert!(t1 < t2 && t2 < t3);

    assert!(!c.accepts(&load(t2, View::Back)));
    assert!(!c.accepts(&load(t3, View::Back)));
    assert!(c.accepts(&load(t3, View::LeftSleeve)));

    c.finish(View::LeftSleeve);
    assert!(!c.accepts(&load(t3, View::LeftSleeve)));
    assert_eq!(c.state(), ControllerState::Idle(View::LeftSleeve));
}

#[test]
fn begin_records_origin_only_when_idle() {
    let mut c = ViewController::new(View::Front, Duration::from_secs(5));
    c.begin(View::Front);
    c.finish(View::Front);
    c.begin(View::Back);
    assert!(matches!(
        c.state(),
        ControllerState::Transitioning { from: Some(View::Front), to: View::Back, .. }
    ));
    c.begin(View::InsideLabel);
    assert!(matches!(
        c.state(),
        ControllerState::Transitioning { from: None, to: View::InsideLabel, .. }
    ));
}

#[test]
fn completions_arrive_through_the_channel() {
    let mut c = ViewController::new(View::Front, Duration::from_secs(5));
    let token = c.begin(View::Back);
    assert!(c.try_recv().is_none());

    c.spawn_load(token, View::Back, "back.png".to_string(), || PhotoOutcome::Missing);
    let got = c.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(got.token, token);
    assert_eq!(got.view, View::Back);
    assert_eq!(got.source_key.as_deref(), Some("back.png"));

    c.complete_now(token, View::Back, None, PhotoOutcome::TimedOut);
    assert!(matches!(c.try_recv().unwrap().photo, PhotoOutcome::TimedOut));
}

#[test]
fn recv_timeout_returns_none_when_nothing_arrives() {
    let c = ViewController::new(View::Front, Duration::from_secs(5));
    assert!(c.recv_timeout(Duration::from_millis(10)).is_none());
}

#[test]
fn transitions_expire_after_the_load_timeout() {
    let mut c = ViewController::new(View::Front, Duration::from_millis(100));
    assert_eq!(c.deadline(), None);

    let token = c.begin(View::Back);
    let deadline = c.deadline().unwrap();
    assert_eq!(c.expired(deadline - Duration::from_millis(1)), None);
    assert_eq!(c.expired(deadline), Some((View::Back, token)));

    c.finish(View::Back);
    assert_eq!(c.deadline(), None);
    assert_eq!(c.expired(deadline + Duration::from_secs(1)), None);
}

#[test]
fn a_newer_request_restarts_the_deadline() {
    let mut c = ViewController::new(View::Front, Duration::from_secs(60));
    c.begin(View::Back);
    let first = c.deadline().unwrap();
    std::thread::sleep(Duration::from_millis(5));
    let token = c.begin(View::InsideLabel);
    let second = c.deadline().unwrap();
    assert!(second > first);
    assert_eq!(c.expired(second), Some((View::InsideLabel, token)));
}
