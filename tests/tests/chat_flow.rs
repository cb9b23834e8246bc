use application::chat_service::{ChatService, GATEWAY_ERROR_REPLY, SIMPLER_REQUEST};
use application::progress_service::ProgressTracker;
use application::prompt_builder::StudentProfile;
use domain::chat_state::THEME_OFFER;
use domain::error::ChatError;
use domain::models::{Feedback, LearningStyle, PerformanceLevel};
use domain::speech::SpeechStatus;
use domain::storage::KeyValueStore;
use domain::subjects::find_subject;
use infrastructure::memory_store::MemoryStore;
use std::sync::Arc;
use std::time::Duration;
use tests::{FakeGateway, FakeVideoSearch, RecordingSpeech, Scripted};

type Chat = ChatService<FakeGateway, FakeVideoSearch, RecordingSpeech>;

fn chat_for(subject_id: &str, profile: StudentProfile, gateway: FakeGateway) -> (Chat, Arc<dyn KeyValueStore>) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let chat = ChatService::new(
        gateway,
        FakeVideoSearch::default(),
        RecordingSpeech::default(),
        store.clone(),
        find_subject(subject_id).unwrap(),
        profile,
    );
    (chat, store)
}

fn chat_with(style: LearningStyle, gateway: FakeGateway, videos: FakeVideoSearch) -> (Chat, Arc<dyn KeyValueStore>) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let profile = StudentProfile {
        learning_style: style,
        ..StudentProfile::default()
    };
    let chat = ChatService::new(
        gateway,
        videos,
        RecordingSpeech::default(),
        store.clone(),
        find_subject("science").unwrap(),
        profile,
    );
    (chat, store)
}

#[tokio::test]
async fn visual_learner_gets_prose_and_one_video_per_query() {
    let reply = "Photosynthesis converts light to energy.\n\"photosynthesis animation for kids\"";
    let (mut chat, _) = chat_with(
        LearningStyle::Visual,
        FakeGateway::replying(&[reply]),
        FakeVideoSearch::default(),
    );

    let message = chat.send("explain photosynthesis").await.unwrap();

    assert!(message.is_bot);
    assert_eq!(message.text, "Photosynthesis converts light to energy.");
    assert_eq!(
        message.video_list,
        Some(vec![FakeVideoSearch::video_for("photosynthesis animation for kids")])
    );
    assert_eq!(
        chat.videos().calls(),
        vec![("photosynthesis animation for kids".to_string(), 1)]
    );
    // welcome, user, bot
    assert_eq!(chat.messages().len(), 3);
    assert_eq!(chat.messages()[2], message);
    assert!(!chat.state().loading);
}

#[tokio::test]
async fn failed_lookup_leaves_an_empty_video_list() {
    let reply = "Photosynthesis converts light to energy.\n\"photosynthesis animation for kids\"";
    let (mut chat, _) = chat_with(
        LearningStyle::Visual,
        FakeGateway::replying(&[reply]),
        FakeVideoSearch::failing_on(&["photosynthesis animation for kids"]),
    );

    let message = chat.send("explain photosynthesis").await.unwrap();

    assert_eq!(message.text, "Photosynthesis converts light to energy.");
    assert_eq!(message.video_list, Some(Vec::new()));
}

#[tokio::test]
async fn non_visual_learners_never_trigger_lookups() {
    for style in [LearningStyle::Auditory, LearningStyle::Kinesthetic, LearningStyle::ReadWrite] {
        let reply = "Cells divide.\n\"mitosis animation\"";
        let (mut chat, _) = chat_with(style, FakeGateway::replying(&[reply]), FakeVideoSearch::default());

        let message = chat.send("how do cells divide?").await.unwrap();

        assert!(chat.videos().calls().is_empty());
        assert_eq!(message.video_list, None);
        assert_eq!(message.text, "Cells divide.");
    }
}

#[tokio::test]
async fn only_six_queries_are_looked_up_and_the_rest_listed() {
    let queries: Vec<String> = (1..=8).map(|i| format!("topic {i}")).collect();
    let mut reply = String::from("Here is an overview.");
    for query in &queries {
        reply.push_str(&format!("\n\"{query}\""));
    }
    let (mut chat, _) = chat_with(
        LearningStyle::Visual,
        FakeGateway::replying(&[&reply]),
        FakeVideoSearch::default(),
    );

    let message = chat.send("overview please").await.unwrap();

    let looked_up: Vec<String> = chat.videos().calls().into_iter().map(|(q, _)| q).collect();
    let mut sorted = looked_up.clone();
    sorted.sort();
    assert_eq!(sorted, queries[..6].to_vec());
    assert_eq!(message.video_list.as_ref().map(Vec::len), Some(6));
    assert!(message.text.contains("### For Further Research:"));
    assert!(message.text.contains("- You can also search for: \"topic 7\""));
    assert!(message.text.contains("- You can also search for: \"topic 8\""));
    assert!(!message.text.contains("\"topic 6\""));
}

#[tokio::test]
async fn structured_block_wins_over_quoted_lines() {
    let reply = "Light reactions happen in the thylakoid.\n\"a quoted aside\"\n```json\n{\"suggestedQueries\": [\"thylakoid diagram\"]}\n```";
    let (mut chat, _) = chat_with(
        LearningStyle::Visual,
        FakeGateway::replying(&[reply]),
        FakeVideoSearch::default(),
    );

    let message = chat.send("where do light reactions happen?").await.unwrap();

    assert_eq!(chat.videos().calls(), vec![("thylakoid diagram".to_string(), 1)]);
    assert!(message.text.contains("\"a quoted aside\""));
    assert!(!message.text.contains("suggestedQueries"));
}

#[tokio::test]
async fn history_excludes_the_message_being_sent() {
    let (mut chat, _) = chat_with(
        LearningStyle::ReadWrite,
        FakeGateway::replying(&["First answer.", "Second answer."]),
        FakeVideoSearch::default(),
    );

    chat.send("first question").await.unwrap();
    chat.send("  second question  ").await.unwrap();

    let requests = chat.gateway().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].history.len(), 1);
    assert_eq!(requests[0].history[0].role, "model");
    let second = &requests[1];
    assert_eq!(second.message, "second question");
    let roles: Vec<&str> = second.history.iter().map(|t| t.role.as_str()).collect();
    assert_eq!(roles, vec!["model", "user", "model"]);
    assert_eq!(second.history[1].parts[0].text, "first question");
    assert!(second.system_instruction.starts_with("You are an expert AI tutor for Science."));
}

#[tokio::test]
async fn empty_input_is_rejected_without_changes() {
    let (mut chat, _) = chat_with(LearningStyle::Visual, FakeGateway::default(), FakeVideoSearch::default());

    let err = chat.send("   ").await.unwrap_err();

    assert!(matches!(err, ChatError::EmptyMessage));
    assert_eq!(chat.messages().len(), 1);
    assert!(chat.gateway().requests().is_empty());
}

#[tokio::test]
async fn send_while_loading_is_busy_until_reset() {
    let gateway = FakeGateway::default();
    gateway.push(Scripted::Hang);
    gateway.push(Scripted::Reply("Recovered.".into()));
    let (mut chat, _) = chat_with(LearningStyle::Visual, gateway, FakeVideoSearch::default());

    let abandoned = tokio::time::timeout(Duration::from_millis(20), chat.send("slow question")).await;
    assert!(abandoned.is_err());
    assert!(chat.state().loading);

    let before = chat.messages().len();
    let err = chat.send("impatient follow-up").await.unwrap_err();
    assert!(matches!(err, ChatError::Busy));
    assert_eq!(chat.messages().len(), before);

    chat.start_new_chat();
    assert!(!chat.state().loading);
    assert_eq!(chat.messages().len(), 1);
    let reply = chat.send("try again").await.unwrap();
    assert_eq!(reply.text, "Recovered.");
}

#[tokio::test]
async fn gateway_failure_appends_apology() {
    let gateway = FakeGateway::default();
    gateway.push(Scripted::Fail("503 from provider".into()));
    let (mut chat, _) = chat_with(LearningStyle::Visual, gateway, FakeVideoSearch::default());

    let reply = chat.send("anything").await.unwrap();

    assert_eq!(reply.text, GATEWAY_ERROR_REPLY);
    assert_eq!(chat.messages().len(), 3);
    assert!(!chat.state().loading);
    assert!(chat.state().recommended_messages.is_empty());
    assert!(!chat.state().has_received_initial_explanation);
}

#[tokio::test]
async fn recommendations_follow_the_reply() {
    let (mut chat, _) = chat_with(
        LearningStyle::ReadWrite,
        FakeGateway::replying(&["Plants make food from light.", "Sure, here is more."]),
        FakeVideoSearch::default(),
    );

    chat.send("what is photosynthesis?").await.unwrap();
    assert_eq!(
        chat.state().recommended_messages,
        vec![THEME_OFFER, "Tell me more", "Can you give me an example?"]
    );
    assert!(chat.state().has_received_initial_explanation);
    assert_eq!(chat.state().last_explained_concept.as_deref(), Some("what is photosynthesis?"));

    chat.click_recommendation(1).await.unwrap();
    assert_eq!(chat.gateway().requests()[1].message, "Tell me more");
    assert_eq!(
        chat.state().recommended_messages,
        vec!["Tell me more", "Can you give me an example?", "Quiz me on this"]
    );
}

#[tokio::test]
async fn help_offer_yields_help_follow_ups() {
    let (mut chat, _) = chat_with(
        LearningStyle::ReadWrite,
        FakeGateway::replying(&["Hello! How can I help you today?"]),
        FakeVideoSearch::default(),
    );

    chat.send("hi").await.unwrap();

    assert_eq!(
        chat.state().recommended_messages,
        vec!["Explain this concept", "Help me with my homework", "Can you quiz me?"]
    );
}

#[tokio::test]
async fn auditory_replies_are_spoken_and_others_are_not() {
    let (mut chat, _) = chat_with(
        LearningStyle::Auditory,
        FakeGateway::replying(&["**Energy** is conserved."]),
        FakeVideoSearch::default(),
    );
    chat.send("tell me about energy").await.unwrap();
    assert_eq!(chat.speech().engine().spoken, vec!["Energy is conserved."]);
    assert_eq!(chat.toggle_speech(), SpeechStatus::Paused);
    assert_eq!(chat.toggle_speech(), SpeechStatus::Speaking);

    let (mut quiet, _) = chat_with(LearningStyle::Visual, FakeGateway::default(), FakeVideoSearch::default());
    assert!(!quiet.speak("First."));
    assert!(!quiet.speak("First."));
    assert!(quiet.speech().engine().spoken.is_empty());
    assert_eq!(quiet.speech().engine().cancels, 0);
}

#[tokio::test]
async fn adjust_feedback_lowers_level_and_asks_for_simpler() {
    let (mut chat, store) = chat_with(
        LearningStyle::ReadWrite,
        FakeGateway::replying(&["Osmosis is diffusion of water.", "Water moves to where there is less of it."]),
        FakeVideoSearch::default(),
    );
    let first = chat.send("what is osmosis").await.unwrap();

    let simpler = chat
        .give_feedback(&first.id, Feedback::Adjust)
        .await
        .unwrap()
        .expect("a simpler explanation");

    assert_eq!(simpler.text, "Water moves to where there is less of it.");
    assert_eq!(chat.profile().performance_level, PerformanceLevel::Weak);
    assert_eq!(chat.gateway().requests()[1].message, SIMPLER_REQUEST);
    assert!(chat.gateway().requests()[1].system_instruction.contains("weak"));
    let tracker = ProgressTracker::new(store);
    assert_eq!(tracker.performance_for("Science"), Some(PerformanceLevel::Weak));
    assert_eq!(chat.feedback_for(&first.id), Some(Feedback::Adjust));
}

#[tokio::test]
async fn good_feedback_raises_concept_progress() {
    let (mut chat, store) = chat_with(
        LearningStyle::ReadWrite,
        FakeGateway::replying(&["Mass times acceleration."]),
        FakeVideoSearch::default(),
    );
    let reply = chat.send("newton's second law").await.unwrap();

    assert!(chat.give_feedback(&reply.id, Feedback::Good).await.unwrap().is_none());
    assert!(chat.give_feedback("missing", Feedback::Good).await.unwrap().is_none());

    let scores = ProgressTracker::new(store).progress();
    assert_eq!(scores.get("eduChat:progress:science:newton's second law"), Some(&0.1));
    assert_eq!(chat.gateway().requests().len(), 1);
}

#[tokio::test]
async fn material_analysis_replaces_the_log() {
    let (mut chat, _) = chat_with(
        LearningStyle::ReadWrite,
        FakeGateway::replying(&["Noted.", "The chapter covers the water cycle."]),
        FakeVideoSearch::default(),
    );
    chat.send("unrelated").await.unwrap();

    let reply = chat
        .analyze_material("Evaporation, condensation, precipitation.", Some("Focus on clouds"))
        .await
        .unwrap();

    let texts: Vec<&str> = chat.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts[1], "Analyzing your teacher's material...");
    assert_eq!(texts.len(), 3);
    assert_eq!(reply.text, "The chapter covers the water cycle.");
    let request = chat.gateway().requests().pop().unwrap();
    assert!(request.history.is_empty());
    assert!(request.message.contains("My teacher's comment is: \"Focus on clouds\"."));
    assert!(request.message.ends_with("Evaporation, condensation, precipitation."));
}

#[tokio::test]
async fn feedback_leaves_logged_messages_untouched() {
    let (mut chat, _) = chat_with(
        LearningStyle::ReadWrite,
        FakeGateway::replying(&["Atoms are tiny."]),
        FakeVideoSearch::default(),
    );
    chat.send("q").await.unwrap();
    let logged = chat.messages()[2].clone();

    chat.give_feedback(&logged.id, Feedback::Good).await.unwrap();

    assert_eq!(chat.messages()[2], logged);
    assert_eq!(chat.messages()[2].feedback, None);
    assert_eq!(chat.feedback_for(&logged.id), Some(Feedback::Good));

    chat.start_new_chat();
    assert_eq!(chat.feedback_for(&logged.id), None);
}

#[tokio::test]
async fn feedback_while_loading_is_busy_and_changes_nothing() {
    let gateway = FakeGateway::default();
    gateway.push(Scripted::Reply("Forces push or pull.".into()));
    gateway.push(Scripted::Hang);
    let profile = StudentProfile {
        performance_level: PerformanceLevel::Good,
        ..StudentProfile::default()
    };
    let (mut chat, store) = chat_for("science", profile, gateway);
    let answer = chat.send("what is a force").await.unwrap();

    let abandoned = tokio::time::timeout(Duration::from_millis(20), chat.send("slow question")).await;
    assert!(abandoned.is_err());
    let before = chat.messages().to_vec();

    let err = chat.give_feedback(&answer.id, Feedback::Adjust).await.unwrap_err();

    assert!(matches!(err, ChatError::Busy));
    assert_eq!(chat.profile().performance_level, PerformanceLevel::Good);
    let tracker = ProgressTracker::new(store);
    assert_eq!(tracker.performance_for("Science"), None);
    assert!(tracker.progress().is_empty());
    assert_eq!(chat.feedback_for(&answer.id), None);
    assert_eq!(chat.messages(), before.as_slice());
    assert_eq!(chat.gateway().requests().len(), 2);
}

#[tokio::test]
async fn math_subjects_carry_a_math_digest_into_notes() {
    let gateway = FakeGateway::replying(&["Half of 6 is 3.", "  6 / 2 = 3  "]);
    let (mut chat, _) = chat_for("mathematics", StudentProfile::default(), gateway);

    let reply = chat.send("what is half of 6?").await.unwrap();

    assert_eq!(reply.extracted_math.as_deref(), Some("6 / 2 = 3"));
    let prompts = chat.gateway().prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("Extract only the mathematical content"));
    assert!(prompts[0].ends_with("Half of 6 is 3."));
    let notes = chat.last_answer_notes().unwrap();
    assert_eq!(notes.answer, "Half of 6 is 3.");
    assert_eq!(notes.math.as_deref(), Some("6 / 2 = 3"));
}

#[tokio::test]
async fn failed_math_digest_still_delivers_the_answer() {
    let gateway = FakeGateway::default();
    gateway.push(Scripted::Reply("F = ma.".into()));
    gateway.push(Scripted::Fail("quota".into()));
    let (mut chat, _) = chat_for("physics", StudentProfile::default(), gateway);

    let reply = chat.send("newton's second law").await.unwrap();

    assert_eq!(reply.text, "F = ma.");
    assert_eq!(reply.extracted_math, None);
}

#[tokio::test]
async fn other_subjects_skip_the_math_digest() {
    let (mut chat, _) = chat_for("history", StudentProfile::default(), FakeGateway::replying(&["Rome fell in 476."]));

    let reply = chat.send("when did rome fall?").await.unwrap();

    assert_eq!(reply.extracted_math, None);
    assert!(chat.gateway().prompts().is_empty());
}
