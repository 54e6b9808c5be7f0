//! Activation scenario: direct entry, badge fallback, retry budget,
//! downstream bot sensitivity.

mod common;

use common::{FakePage, iframe_candidate, partner, test_config};
use wv::{ChatActivator, ScenarioKind, ScenarioRunner, Trigger, VerifyError};

fn page_with_widget() -> FakePage {
    let page = FakePage::new();
    page.state().widget_candidates = vec![iframe_candidate(20.0, 300.0, 360.0, 480.0)];
    page
}

#[tokio::test]
async fn already_open_chat_activates_directly() {
    let page = page_with_widget();
    page.state().action_visible = true;

    let config = test_config();
    let attempts = ChatActivator::new(&config).run(&page).await.unwrap();

    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].triggered_via, Trigger::Direct);
    assert!(attempts[0].succeeded);

    let state = page.state();
    assert_eq!(state.badge_clicks, 0, "badge must not be touched");
    assert_eq!(state.action_clicks, 1);
}

#[tokio::test]
async fn first_badge_click_opening_the_chat_stops_the_retry() {
    let page = page_with_widget();
    {
        let mut state = page.state();
        state.secondary_attached = true;
        state.reveal_after_clicks = Some(1);
    }

    let config = test_config();
    let attempts = ChatActivator::new(&config).run(&page).await.unwrap();

    // one failed direct probe, then exactly one badge attempt
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].triggered_via, Trigger::Direct);
    assert!(!attempts[0].succeeded);
    assert_eq!(attempts[1].triggered_via, Trigger::SecondaryFrame);
    assert!(attempts[1].succeeded);

    let state = page.state();
    assert_eq!(state.badge_clicks, 1, "no second click after success");
    assert_eq!(state.action_clicks, 1);
}

#[tokio::test]
async fn chat_needing_two_badge_clicks_still_activates() {
    let page = page_with_widget();
    {
        let mut state = page.state();
        state.secondary_attached = true;
        state.reveal_after_clicks = Some(2);
    }

    let config = test_config();
    let attempts = ChatActivator::new(&config).run(&page).await.unwrap();

    assert_eq!(attempts.len(), 3);
    assert!(attempts[2].succeeded);
    assert_eq!(page.state().badge_clicks, 2);
}

#[tokio::test]
async fn badge_retry_budget_is_exhausted_after_two_clicks() {
    let page = page_with_widget();
    page.state().secondary_attached = true;
    // reveal_after_clicks stays None: the chat never opens

    let config = test_config();
    let err = ChatActivator::new(&config).run(&page).await.unwrap_err();

    assert!(matches!(err, VerifyError::ActivationExhausted { attempts: 2 }));
    let state = page.state();
    assert_eq!(state.badge_clicks, 2, "no third attempt");
    assert_eq!(state.action_clicks, 0);
}

#[tokio::test]
async fn missing_badge_frame_is_fatal_to_the_fallback() {
    let page = page_with_widget();
    // action hidden and no badge attached

    let config = test_config();
    let err = ChatActivator::new(&config).run(&page).await.unwrap_err();

    assert!(matches!(err, VerifyError::SecondaryFrameNotFound { .. }));
}

#[tokio::test]
async fn widget_never_attaching_fails_activation() {
    let page = FakePage::new();
    page.state().widget_attach_after_polls = u32::MAX;

    let config = test_config();
    let err = ChatActivator::new(&config).run(&page).await.unwrap_err();

    assert!(matches!(err, VerifyError::WidgetNotFound { .. }));
}

#[tokio::test]
async fn bot_answering_with_the_auth_form_passes_the_scenario() {
    let page = page_with_widget();
    {
        let mut state = page.state();
        state.action_visible = true;
        state.auth_after_action = true;
    }

    let dir = tempfile::tempdir().unwrap();
    let runner = ScenarioRunner::new(test_config(), dir.path());
    let result = runner
        .run_scenario(&page, &partner(), ScenarioKind::Activation)
        .await;

    assert!(result.passed(), "unexpected failure: {:?}", result.error);
    assert!(result.screenshot.is_none());
    assert!(!result.attempts.is_empty());
}

#[tokio::test]
async fn silent_bot_fails_with_downstream_timeout_and_a_screenshot() {
    let page = page_with_widget();
    page.state().action_visible = true;
    // auth_after_action stays false: the action click goes unanswered

    let dir = tempfile::tempdir().unwrap();
    let runner = ScenarioRunner::new(test_config(), dir.path());
    let result = runner
        .run_scenario(&page, &partner(), ScenarioKind::Activation)
        .await;

    assert!(matches!(
        result.error,
        Some(VerifyError::DownstreamTimeout { .. })
    ));
    assert_eq!(page.state().action_clicks, 1);

    let screenshot = result.screenshot.expect("diagnostics captured");
    assert!(screenshot.exists());
    assert!(screenshot.starts_with(dir.path()));
    let name = screenshot.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("fail-") && name.ends_with(".png"));
}
