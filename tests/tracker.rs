use fit_tracker::day::CalendarDay;
use fit_tracker::errors::{TrackerError, ValidationError};
use fit_tracker::models::{LeaderboardMode, LeaderboardResponse, SignInRequest, SignUpRequest};
use fit_tracker::progress::{DailyProgress, Exercise, Goals};
use fit_tracker::session::{AuthChange, Credentials, LocalSessionProvider, SessionProvider};
use fit_tracker::store::ProfileStore;
use fit_tracker::{JsonStore, Tracker};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const GOALS: Goals = Goals {
    pushups: 10,
    pullups: 5,
};

struct Fixture {
    _dir: TempDir,
    store: JsonStore,
    sessions: Arc<LocalSessionProvider>,
    tracker: Tracker,
}

async fn fixture(goals: Goals) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStore::open(dir.path().join("state.json")).await.unwrap();
    let sessions = Arc::new(LocalSessionProvider::new(store.clone()));
    let tracker = Tracker::new(
        goals,
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        sessions.clone(),
    );
    Fixture {
        _dir: dir,
        store,
        sessions,
        tracker,
    }
}

fn sign_up_form(email: &str, nickname: &str) -> SignUpRequest {
    SignUpRequest {
        email: email.into(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        nickname: nickname.into(),
    }
}

fn day(d: u32) -> CalendarDay {
    CalendarDay::from_ymd(2026, 4, d).unwrap()
}

async fn complete_day(tracker: &Tracker, token: &str, today: CalendarDay) -> u32 {
    let goals = tracker.goals();
    tracker
        .add_progress(token, Exercise::Pushups, &goals.pushups.to_string(), today)
        .await
        .unwrap();
    let view = tracker
        .add_progress(token, Exercise::Pullups, &goals.pullups.to_string(), today)
        .await
        .unwrap();
    assert!(view.goal_met);
    view.current_streak
}

#[tokio::test]
async fn fresh_account_starts_empty() {
    let fx = fixture(GOALS).await;
    let session = fx.tracker.sign_up(sign_up_form("ala@example.com", "Ala")).await.unwrap();

    let view = fx.tracker.today(&session.token, day(1)).await.unwrap();
    assert_eq!(view.date, "2026-04-01");
    assert_eq!(view.nickname, "Ala");
    assert_eq!(view.pushups.done, 0);
    assert_eq!(view.pushups.remaining, 10);
    assert_eq!(view.pullups.remaining, 5);
    assert_eq!(view.current_streak, 0);
    assert!(!view.goal_met);

    let profile = ProfileStore::get(&fx.store, &session.user.id).await.unwrap().unwrap();
    assert_eq!(profile.nickname, "Ala");
}

#[tokio::test]
async fn streak_follows_consecutive_days() {
    let fx = fixture(GOALS).await;
    let session = fx.tracker.sign_up(sign_up_form("ola@example.com", "Ola")).await.unwrap();
    let token = session.token.as_str();

    assert_eq!(complete_day(&fx.tracker, token, day(1)).await, 1);

    let reset = fx.tracker.reset_day(token, day(1)).await.unwrap();
    assert_eq!(reset.pushups.done, 0);
    assert_eq!(reset.current_streak, 1);
    assert_eq!(complete_day(&fx.tracker, token, day(1)).await, 1);

    assert_eq!(complete_day(&fx.tracker, token, day(2)).await, 2);
    assert_eq!(complete_day(&fx.tracker, token, day(4)).await, 1);

    let view = fx.tracker.today(token, day(4)).await.unwrap();
    assert_eq!(view.longest_streak, 2);
}

#[tokio::test]
async fn overshoot_is_rejected_without_changing_counts() {
    let fx = fixture(Goals::default()).await;
    let session = fx.tracker.sign_up(sign_up_form("ewa@example.com", "Ewa")).await.unwrap();
    let token = session.token.as_str();

    fx.tracker
        .add_progress(token, Exercise::Pushups, "90", day(1))
        .await
        .unwrap();
    let err = fx
        .tracker
        .add_progress(token, Exercise::Pushups, "25", day(1))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "you can add at most 10 more pushups");

    let err = fx
        .tracker
        .add_progress(token, Exercise::Pullups, "abc", day(1))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::Validation(ValidationError::InvalidNumber(_))));

    let view = fx.tracker.today(token, day(1)).await.unwrap();
    assert_eq!(view.pushups.done, 90);
    assert_eq!(view.pullups.done, 0);
}

#[tokio::test]
async fn progress_survives_a_new_session() {
    let fx = fixture(GOALS).await;
    let first = fx.tracker.sign_up(sign_up_form("iza@example.com", "Iza")).await.unwrap();
    fx.tracker
        .add_progress(&first.token, Exercise::Pullups, "3", day(1))
        .await
        .unwrap();
    fx.tracker.sign_out(&first.token).await.unwrap();

    let err = fx.tracker.today(&first.token, day(1)).await.unwrap_err();
    assert!(matches!(err, TrackerError::Unauthorized));

    let second = fx
        .tracker
        .sign_in(SignInRequest {
            email: "iza@example.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap();
    let view = fx.tracker.today(&second.token, day(1)).await.unwrap();
    assert_eq!(view.pullups.done, 3);

    let next_day = fx.tracker.today(&second.token, day(2)).await.unwrap();
    assert_eq!(next_day.pullups.done, 0);
}

#[tokio::test]
async fn invalid_sign_up_creates_nothing() {
    let fx = fixture(GOALS).await;
    let mut form = sign_up_form("kim@example.com", "Kim");
    form.confirm_password = "different".into();
    let err = fx.tracker.sign_up(form).await.unwrap_err();
    assert!(matches!(err, TrackerError::Validation(ValidationError::PasswordMismatch)));

    let err = fx
        .tracker
        .sign_in(SignInRequest {
            email: "kim@example.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::InvalidCredentials));
}

#[tokio::test]
async fn profile_is_created_on_first_completion() {
    let fx = fixture(GOALS).await;
    let session = fx
        .sessions
        .sign_up(
            &Credentials {
                email: "max@example.com".into(),
                password: "secret1".into(),
            },
            "Max",
        )
        .await
        .unwrap();
    assert!(ProfileStore::get(&fx.store, &session.user.id).await.unwrap().is_none());

    complete_day(&fx.tracker, &session.token, day(1)).await;

    let profile = ProfileStore::get(&fx.store, &session.user.id).await.unwrap().unwrap();
    assert_eq!(profile.nickname, "Max");
    assert_eq!(profile.streak.current, 1);
    assert_eq!(profile.streak.last_goal_met_date, Some(day(1)));
}

#[tokio::test]
async fn leaderboards_rank_users() {
    let fx = fixture(Goals::default()).await;
    let strong = fx.tracker.sign_up(sign_up_form("a@example.com", "Strong")).await.unwrap();
    let steady = fx.tracker.sign_up(sign_up_form("b@example.com", "Steady")).await.unwrap();

    for (token, exercise, amount) in [
        (&steady.token, Exercise::Pushups, "60"),
        (&steady.token, Exercise::Pullups, "50"),
        (&strong.token, Exercise::Pushups, "100"),
        (&strong.token, Exercise::Pullups, "50"),
    ] {
        fx.tracker.add_progress(token, exercise, amount, day(1)).await.unwrap();
    }

    match fx.tracker.leaderboard(LeaderboardMode::Daily, day(1)).await {
        LeaderboardResponse::Daily(entries) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].nickname, "Strong");
            assert_eq!(entries[0].score, 200);
            assert_eq!(entries[1].nickname, "Steady");
            assert_eq!(entries[1].score, 160);
        }
        other => panic!("unexpected board {other:?}"),
    }

    match fx.tracker.leaderboard(LeaderboardMode::Streak, day(1)).await {
        LeaderboardResponse::Streak(entries) => {
            assert_eq!(entries[0].nickname, "Strong");
            assert_eq!(entries[0].score, 1);
            assert_eq!(entries[1].score, 0);
        }
        other => panic!("unexpected board {other:?}"),
    }

    match fx.tracker.leaderboard(LeaderboardMode::Daily, day(2)).await {
        LeaderboardResponse::Daily(entries) => assert!(entries.is_empty()),
        other => panic!("unexpected board {other:?}"),
    }
}

#[tokio::test]
async fn auth_changes_load_and_drop_dashboards() {
    let fx = fixture(GOALS).await;
    let session = fx
        .sessions
        .sign_up(
            &Credentials {
                email: "ula@example.com".into(),
                password: "secret1".into(),
            },
            "Ula",
        )
        .await
        .unwrap();
    let token = session.token.clone();
    assert!(fx.tracker.cached_dashboard(&token).await.is_none());

    let signed_in = AuthChange {
        token: token.clone(),
        user: Some(session.user.clone()),
    };
    fx.tracker.handle_auth_change(signed_in.clone(), day(1)).await;
    let loaded = fx.tracker.cached_dashboard(&token).await.unwrap();
    assert_eq!(loaded.day, day(1));
    assert_eq!(loaded.progress, DailyProgress::default());

    fx.tracker
        .add_progress(&token, Exercise::Pushups, "3", day(1))
        .await
        .unwrap();
    fx.tracker.handle_auth_change(signed_in, day(1)).await;
    let kept = fx.tracker.cached_dashboard(&token).await.unwrap();
    assert_eq!(kept.progress.pushups, 3);

    fx.tracker
        .handle_auth_change(
            AuthChange {
                token: token.clone(),
                user: None,
            },
            day(1),
        )
        .await;
    assert!(fx.tracker.cached_dashboard(&token).await.is_none());
}

async fn wait_for_dashboard(tracker: &Tracker, token: &str, present: bool) {
    let wait = async {
        while tracker.cached_dashboard(token).await.is_some() != present {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(3), wait)
        .await
        .expect("auth listener did not catch up");
}

#[tokio::test]
async fn auth_listener_follows_the_session_provider() {
    let fx = fixture(GOALS).await;
    let tracker = Arc::new(fx.tracker);
    let listener = tracker.spawn_auth_listener();

    let session = tracker.sign_up(sign_up_form("zoe@example.com", "Zoe")).await.unwrap();
    wait_for_dashboard(&tracker, &session.token, true).await;

    fx.sessions.sign_out(&session.token).await.unwrap();
    wait_for_dashboard(&tracker, &session.token, false).await;

    listener.abort();
}
