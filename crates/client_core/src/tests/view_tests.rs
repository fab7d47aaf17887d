use super::*;
use shared::domain::{
    CategoryScore, ClassificationResult, KeywordsResult, SentimentResult, SummaryResult,
};

fn classified_state() -> SessionState {
    let mut state = SessionState::default().with_slot(
        OperationKind::Classification,
        ResultSlot::Success(AnalysisResult::Classification(ClassificationResult {
            primary_category: "Sports".into(),
            top_categories: vec![
                CategoryScore {
                    label: "Sports".into(),
                    confidence: 0.92,
                },
                CategoryScore {
                    label: "News".into(),
                    confidence: 0.05,
                },
            ],
        })),
    );
    state.select_tab(OperationKind::Classification);
    state
}

#[test]
fn classification_confidence_renders_as_one_decimal_percent() {
    let view = render(&classified_state());

    assert_eq!(view.active.heading, "Text Classification");
    assert_eq!(
        view.active.body,
        TabBody::Classification {
            primary_category: "Sports".into(),
            top_categories: vec![
                ScoredRow {
                    label: "Sports".into(),
                    percent: "92.0%".into(),
                },
                ScoredRow {
                    label: "News".into(),
                    percent: "5.0%".into(),
                },
            ],
        }
    );
}

#[test]
fn empty_slots_render_operation_specific_placeholders() {
    let state = SessionState::default();
    for kind in OperationKind::ALL {
        assert_eq!(
            render_tab(&state, kind).body,
            TabBody::Placeholder(placeholder(kind))
        );
    }
    assert_eq!(
        placeholder(OperationKind::Keywords),
        "No keywords extracted yet. Click \"Keywords\" to analyze your text."
    );
}

#[test]
fn failure_renders_stored_message_in_result_region() {
    let mut state = SessionState::default().with_slot(
        OperationKind::Sentiment,
        ResultSlot::Failure("Network Error: connection refused".into()),
    );
    state.select_tab(OperationKind::Sentiment);

    let view = render(&state);

    assert_eq!(
        view.active.body,
        TabBody::Error("Network Error: connection refused".into())
    );
    assert_eq!(
        view.active.to_string(),
        "Sentiment Analysis\nNetwork Error: connection refused\n"
    );
}

#[test]
fn sentiment_scores_render_as_percentages_including_compound() {
    let state = SessionState::default().with_slot(
        OperationKind::Sentiment,
        ResultSlot::Success(AnalysisResult::Sentiment(SentimentResult {
            label: "negative".into(),
            scores: SentimentScores {
                positive: 0.1,
                neutral: 0.3,
                negative: 0.6,
                compound: -0.4767,
            },
        })),
    );

    let tab = render_tab(&state, OperationKind::Sentiment);

    let TabBody::Sentiment { label, scores } = &tab.body else {
        panic!("unexpected body: {:?}", tab.body);
    };
    assert_eq!(label, "negative");
    let percents: Vec<_> = scores
        .iter()
        .map(|row| (row.label.as_str(), row.percent.as_str()))
        .collect();
    assert_eq!(
        percents,
        vec![
            ("Positive", "10.0%"),
            ("Neutral", "30.0%"),
            ("Negative", "60.0%"),
            ("Compound", "-47.7%"),
        ]
    );
}

#[test]
fn keywords_render_with_one_based_rank() {
    let state = SessionState::default().with_slot(
        OperationKind::Keywords,
        ResultSlot::Success(AnalysisResult::Keywords(KeywordsResult {
            terms: vec!["alpha".into(), "beta".into()],
        })),
    );

    let tab = render_tab(&state, OperationKind::Keywords);

    assert_eq!(
        tab.to_string(),
        "Keyword Extraction\nTop Keywords:\n  #1 alpha\n  #2 beta\n"
    );
}

#[test]
fn tab_bar_marks_active_tab_and_view_does_not_mutate_state() {
    let state = classified_state().with_slot(
        OperationKind::Summary,
        ResultSlot::Success(AnalysisResult::Summary(SummaryResult {
            text: "short".into(),
        })),
    );
    let before = state.clone();

    let view = render(&state);

    assert_eq!(state, before);
    let active: Vec<_> = view
        .tabs
        .iter()
        .filter(|tab| tab.active)
        .map(|tab| tab.kind)
        .collect();
    assert_eq!(active, vec![OperationKind::Classification]);
    assert_eq!(
        view.tabs.iter().map(|tab| tab.title).collect::<Vec<_>>(),
        vec!["Summary", "Classification", "Sentiment", "Keywords"]
    );
    assert!(view
        .to_string()
        .starts_with(" Summary |[Classification]| Sentiment | Keywords \n"));
}

#[test]
fn submit_requires_non_blank_input_and_idle_session() {
    let mut state = SessionState::default();
    assert!(!render(&state).can_submit);

    state.set_input_text("  ".into());
    assert!(!render(&state).can_submit);

    state.set_input_text("text".into());
    let view = render(&state);
    assert!(view.can_submit);
    assert_eq!(view.analyze_all_label, ANALYZE_ALL_LABEL);

    state.begin(OperationKind::Summary);
    let view = render(&state);
    assert!(view.loading);
    assert!(!view.can_submit);
    assert_eq!(view.analyze_all_label, ANALYZING_LABEL);
    assert!(view.tabs[0].loading);
}

#[test]
fn rendering_mid_flight_shows_last_known_result() {
    let mut state = classified_state();
    state.begin(OperationKind::Classification);

    let view = render(&state);

    assert!(view.loading);
    assert!(matches!(
        view.active.body,
        TabBody::Classification { .. }
    ));
}
