//! End-to-end orchestrator runs against scripted generation clients.

use super::test_utils::{
    FixedImageClient, GatedImageClient, GatedTextClient, ScriptedTextClient, FIVE_TITLES,
};
use blogsmith::error::GenerationError;
use blogsmith::export::export_session;
use blogsmith::orchestrator::{
    IgnoreReason, Orchestrator, Outcome, ARTICLE_ERROR_MESSAGE, TITLES_ERROR_MESSAGE,
};
use blogsmith::prompt::{PromptBuilder, MIN_ARTICLE_WORDS};
use blogsmith::session::{DraftPhase, Stage, StageKind};
use blogsmith::types::Tone;
use std::sync::Arc;

fn orchestrator(text: Arc<ScriptedTextClient>, image: Arc<FixedImageClient>) -> Orchestrator {
    Orchestrator::new(PromptBuilder::default(), text, image, Tone::Expert)
}

#[tokio::test]
async fn test_full_run_exports_article_with_cover() {
    let text = ScriptedTextClient::new(vec![
        Ok(format!("```json\n{}\n```", FIVE_TITLES)),
        Ok("```html\n<h2>Intro</h2><p>Body</p>\n```".to_string()),
    ]);
    let image = FixedImageClient::new(Some("data:image/png;base64,AAAA"));
    let orchestrator = orchestrator(text.clone(), image.clone());

    assert_eq!(
        orchestrator.submit_topic("home espresso", Tone::Casual).await,
        Outcome::Applied
    );
    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.stage_kind(), StageKind::TitleSelection);
    let titles: Vec<&str> = snapshot.titles().iter().map(|t| t.as_str()).collect();
    assert_eq!(titles, vec!["T1", "T2", "T3", "T4", "T5"]);

    assert_eq!(orchestrator.select_title("T3").await, Outcome::Applied);
    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.stage_kind(), StageKind::Result);
    assert!(!snapshot.is_busy());
    assert_eq!(image.calls(), 1);

    assert_eq!(
        export_session(&snapshot).unwrap(),
        "<h1>T3</h1>\n<img src=\"data:image/png;base64,AAAA\" alt=\"T3\" />\n<h2>Intro</h2><p>Body</p>"
    );
}

#[tokio::test]
async fn test_unparseable_titles_stay_on_topic_with_error() {
    let text = ScriptedTextClient::new(vec![Ok("not json".to_string())]);
    let orchestrator = orchestrator(text, FixedImageClient::new(None));

    let outcome = orchestrator.submit_topic("rust", Tone::Expert).await;
    assert_eq!(outcome, Outcome::Failed(TITLES_ERROR_MESSAGE.to_string()));

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.stage_kind(), StageKind::Topic);
    assert_eq!(snapshot.error_message(), Some(TITLES_ERROR_MESSAGE));
    assert!(snapshot.titles().is_empty());
    assert_eq!(snapshot.topic(), "rust");
    assert!(!snapshot.is_busy());
}

#[tokio::test]
async fn test_transport_failure_on_titles_is_reported() {
    let text = ScriptedTextClient::new(vec![Err(GenerationError::HttpStatus {
        status: 503,
        message: "overloaded".to_string(),
    })]);
    let orchestrator = orchestrator(text, FixedImageClient::new(None));

    assert!(matches!(
        orchestrator.submit_topic("rust", Tone::Expert).await,
        Outcome::Failed(_)
    ));
    assert_eq!(orchestrator.snapshot().stage_kind(), StageKind::Topic);
}

#[tokio::test]
async fn test_article_prompt_carries_title_tone_and_word_floor() {
    let text = ScriptedTextClient::new(vec![
        Ok(FIVE_TITLES.to_string()),
        Ok("<p>ok</p>".to_string()),
    ]);
    let orchestrator = orchestrator(text.clone(), FixedImageClient::new(None));

    orchestrator.submit_topic("gardening", Tone::Tutorial).await;
    orchestrator.select_title("X").await;

    let prompts = text.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("gardening"));
    assert!(prompts[0].contains("tutorial"));
    assert!(prompts[1].contains("X"));
    assert!(prompts[1].contains("tutorial"));
    assert!(prompts[1].contains(&MIN_ARTICLE_WORDS.to_string()));
}

#[tokio::test]
async fn test_missing_cover_still_publishes() {
    let text = ScriptedTextClient::new(vec![
        Ok(FIVE_TITLES.to_string()),
        Ok("<p>Hi</p>".to_string()),
    ]);
    let orchestrator = orchestrator(text, FixedImageClient::new(None));

    orchestrator.submit_topic("t", Tone::Expert).await;
    assert_eq!(orchestrator.select_title("Hello").await, Outcome::Applied);

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.stage_kind(), StageKind::Result);
    assert!(snapshot.error_message().is_none());
    let artifact = snapshot.artifact().unwrap();
    assert_eq!(artifact.content(), "<p>Hi</p>");
    assert!(artifact.cover_image_url().is_none());
    assert_eq!(
        export_session(&snapshot).unwrap(),
        "<h1>Hello</h1>\n<p>Hi</p>"
    );
}

#[tokio::test]
async fn test_article_failure_returns_to_selection_and_skips_image() {
    let text = ScriptedTextClient::new(vec![
        Ok(FIVE_TITLES.to_string()),
        Err(GenerationError::Transport("connection reset".to_string())),
    ]);
    let image = FixedImageClient::new(Some("u"));
    let orchestrator = orchestrator(text, image.clone());

    orchestrator.submit_topic("t", Tone::Expert).await;
    assert_eq!(
        orchestrator.select_title("T1").await,
        Outcome::Failed(ARTICLE_ERROR_MESSAGE.to_string())
    );

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.stage_kind(), StageKind::TitleSelection);
    assert_eq!(snapshot.titles().len(), 5);
    assert_eq!(snapshot.error_message(), Some(ARTICLE_ERROR_MESSAGE));
    assert_eq!(image.calls(), 0);
}

#[tokio::test]
async fn test_blank_article_is_a_failure() {
    let text = ScriptedTextClient::new(vec![
        Ok(FIVE_TITLES.to_string()),
        Ok("```html\n```".to_string()),
    ]);
    let orchestrator = orchestrator(text, FixedImageClient::new(Some("u")));

    orchestrator.submit_topic("t", Tone::Expert).await;
    assert!(matches!(
        orchestrator.select_title("T1").await,
        Outcome::Failed(_)
    ));
    assert_eq!(orchestrator.snapshot().stage_kind(), StageKind::TitleSelection);
}

#[tokio::test]
async fn test_reset_from_result_restores_defaults() {
    let text = ScriptedTextClient::new(vec![
        Ok(FIVE_TITLES.to_string()),
        Ok("<p>Hi</p>".to_string()),
    ]);
    let orchestrator = orchestrator(text, FixedImageClient::new(None));

    orchestrator.submit_topic("t", Tone::Persuasive).await;
    orchestrator.select_title("T1").await;
    assert_eq!(orchestrator.reset(), Outcome::Applied);

    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.stage_kind(), StageKind::Topic);
    assert_eq!(snapshot.topic(), "");
    assert_eq!(snapshot.tone(), Tone::Expert);
    assert!(snapshot.titles().is_empty());
    assert!(snapshot.artifact().is_none());
}

#[tokio::test]
async fn test_back_from_result_allows_another_title() {
    let text = ScriptedTextClient::new(vec![
        Ok(FIVE_TITLES.to_string()),
        Ok("<p>one</p>".to_string()),
        Ok("<p>two</p>".to_string()),
    ]);
    let orchestrator = orchestrator(text, FixedImageClient::new(None));

    orchestrator.submit_topic("t", Tone::Expert).await;
    orchestrator.select_title("T1").await;
    assert_eq!(orchestrator.back(), Outcome::Applied);
    assert_eq!(orchestrator.snapshot().stage_kind(), StageKind::TitleSelection);

    orchestrator.select_title("T2").await;
    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.selected_title().unwrap().as_str(), "T2");
    assert_eq!(snapshot.artifact().unwrap().content(), "<p>two</p>");
}

#[tokio::test]
async fn test_wrong_stage_calls_are_ignored() {
    let orchestrator = orchestrator(ScriptedTextClient::new(vec![]), FixedImageClient::new(None));

    assert_eq!(
        orchestrator.select_title("T1").await,
        Outcome::Ignored(IgnoreReason::WrongStage(StageKind::Topic))
    );
    assert_eq!(
        orchestrator.submit_topic("   ", Tone::Expert).await,
        Outcome::Ignored(IgnoreReason::EmptyInput)
    );
    assert_eq!(
        orchestrator.back(),
        Outcome::Ignored(IgnoreReason::WrongStage(StageKind::Topic))
    );
}

#[tokio::test]
async fn test_reset_while_in_flight_discards_response() {
    let text = GatedTextClient::new(FIVE_TITLES);
    let orchestrator = Arc::new(Orchestrator::new(
        PromptBuilder::default(),
        text.clone(),
        FixedImageClient::new(None),
        Tone::Expert,
    ));

    let task = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit_topic("slow topic", Tone::Casual).await })
    };

    text.wait_entered().await;
    assert!(orchestrator.snapshot().is_busy());
    assert_eq!(
        orchestrator.submit_topic("second", Tone::Casual).await,
        Outcome::Ignored(IgnoreReason::Busy)
    );
    assert!(orchestrator.busy_message().is_some());

    orchestrator.reset();
    text.release();

    assert_eq!(task.await.unwrap(), Outcome::Stale);
    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.stage_kind(), StageKind::Topic);
    assert!(snapshot.titles().is_empty());
    assert_eq!(snapshot.topic(), "");
    assert!(!snapshot.is_busy());
}

#[tokio::test]
async fn test_fresh_request_after_reset_is_accepted() {
    let text = GatedTextClient::new(FIVE_TITLES);
    let orchestrator = Arc::new(Orchestrator::new(
        PromptBuilder::default(),
        text.clone(),
        FixedImageClient::new(None),
        Tone::Expert,
    ));

    let stale = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit_topic("first", Tone::Expert).await })
    };
    text.wait_entered().await;
    orchestrator.reset();
    text.release();
    assert_eq!(stale.await.unwrap(), Outcome::Stale);

    let fresh = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit_topic("second", Tone::Expert).await })
    };
    text.wait_entered().await;
    text.release();
    assert_eq!(fresh.await.unwrap(), Outcome::Applied);
    assert_eq!(orchestrator.snapshot().topic(), "second");
}

#[tokio::test]
async fn test_reset_during_cover_image_discards_article() {
    let text = ScriptedTextClient::new(vec![
        Ok(FIVE_TITLES.to_string()),
        Ok("<p>Body</p>".to_string()),
    ]);
    let image = GatedImageClient::new(Some("data:image/png;base64,AAAA"));
    let orchestrator = Arc::new(Orchestrator::new(
        PromptBuilder::default(),
        text.clone(),
        image.clone(),
        Tone::Expert,
    ));

    assert!(orchestrator
        .submit_topic("espresso", Tone::Expert)
        .await
        .is_applied());

    let task = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.select_title("T1").await })
    };
    image.wait_entered().await;

    let snapshot = orchestrator.snapshot();
    assert!(matches!(
        snapshot.stage(),
        Stage::Drafting {
            phase: DraftPhase::CoverImage,
            ..
        }
    ));
    assert!(snapshot.is_busy());
    assert_eq!(
        orchestrator.busy_message(),
        Some("Creating an exclusive cover image...")
    );
    assert_eq!(
        orchestrator.select_title("T2").await,
        Outcome::Ignored(IgnoreReason::Busy)
    );
    assert_eq!(
        orchestrator.submit_topic("other", Tone::Casual).await,
        Outcome::Ignored(IgnoreReason::Busy)
    );
    assert_eq!(orchestrator.back(), Outcome::Ignored(IgnoreReason::Busy));
    assert_eq!(text.prompts().len(), 2);

    orchestrator.reset();
    image.release();

    assert_eq!(task.await.unwrap(), Outcome::Stale);
    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.stage_kind(), StageKind::Topic);
    assert!(snapshot.artifact().is_none());
    assert!(snapshot.titles().is_empty());
    assert!(!snapshot.is_busy());
}

#[tokio::test]
async fn test_reset_during_article_content_skips_cover() {
    let text = GatedTextClient::new(FIVE_TITLES);
    let image = FixedImageClient::new(Some("u"));
    let orchestrator = Arc::new(Orchestrator::new(
        PromptBuilder::default(),
        text.clone(),
        image.clone(),
        Tone::Expert,
    ));

    let titles = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit_topic("espresso", Tone::Expert).await })
    };
    text.wait_entered().await;
    text.release();
    assert_eq!(titles.await.unwrap(), Outcome::Applied);

    let article = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.select_title("T1").await })
    };
    text.wait_entered().await;

    let snapshot = orchestrator.snapshot();
    assert!(matches!(
        snapshot.stage(),
        Stage::Drafting {
            phase: DraftPhase::Content,
            ..
        }
    ));
    assert_eq!(
        orchestrator.select_title("T2").await,
        Outcome::Ignored(IgnoreReason::Busy)
    );

    orchestrator.reset();
    text.release();

    assert_eq!(article.await.unwrap(), Outcome::Stale);
    assert_eq!(image.calls(), 0);
    let snapshot = orchestrator.snapshot();
    assert_eq!(snapshot.stage_kind(), StageKind::Topic);
    assert!(snapshot.artifact().is_none());
    assert!(!snapshot.is_busy());
}
