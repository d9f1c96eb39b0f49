//! End-to-end turn tests with mock collaborators and a recording channel.

mod common;

use std::sync::Arc;

use brain_core::{BrainError, InboundMessage, MediaData, MediaRef, Role};
use common::{ana, text, HarnessBuilder, Sent, ADDRESS};
use mock_brain::{DelayedBrain, ScriptedBrain, StaticImageGenerator, StaticTranscriber};
use orchestrator::{
    ConversationStore, OrchestratorError, RelayConfig, SqliteStore, TerminationReason,
    TurnOutcome, EMPTY_REPLY_TEXT, IMAGE_FAILED_TEXT, NOT_UNDERSTOOD_TEXT,
};

#[tokio::test]
async fn test_first_turn_detects_language_and_replies() {
    let brain = Arc::new(ScriptedBrain::new(["Spanish", "¡Hola Ana!"]));
    let h = HarnessBuilder::new(brain.clone()).build();

    let outcome = h.orchestrator.process(text("hola")).await.unwrap();

    assert_eq!(
        outcome,
        TurnOutcome::Replied {
            chunks_sent: 1,
            image_requested: false
        }
    );
    assert_eq!(
        h.channel.sent(),
        vec![Sent::Text {
            to: ADDRESS.to_string(),
            text: "¡Hola Ana!".to_string()
        }]
    );

    // Detection saw only its own prompt; the reply saw system + user
    let transcripts = brain.transcripts();
    assert_eq!(transcripts.len(), 2);
    assert_eq!(transcripts[0].len(), 1);
    assert!(transcripts[0][0].content.ends_with("hola ->"));
    assert_eq!(transcripts[1].len(), 2);
    assert!(transcripts[1][0].content.ends_with("Always reply in spanish."));
    assert_eq!(transcripts[1][1].content, "hola");

    let saved = h.store.load(ADDRESS).await.unwrap().unwrap();
    assert_eq!(saved.language.as_deref(), Some("spanish"));
    assert_eq!(saved.messages.len(), 3);
    assert_eq!(saved.messages[2].role, Role::Assistant);
}

#[tokio::test]
async fn test_language_detected_only_on_first_turn() {
    let brain = Arc::new(ScriptedBrain::new(["english", "Hi!", "Fine, thanks."]));
    let h = HarnessBuilder::new(brain.clone()).build();

    h.orchestrator.process(text("hello")).await.unwrap();
    h.orchestrator.process(text("how are you?")).await.unwrap();

    // One detection call plus two replies
    assert_eq!(brain.call_count(), 3);
    assert_eq!(h.channel.texts(), vec!["Hi!", "Fine, thanks."]);

    let handle = h.registry.get_or_create(&ana(), &common::config()).await.unwrap();
    let conversation = handle.lock().await;
    let roles: Vec<Role> = conversation.messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
}

#[tokio::test]
async fn test_language_detection_failure_does_not_fail_turn() {
    let brain = Arc::new(ScriptedBrain::default());
    brain.push_error(BrainError::Timeout);
    brain.push_reply("Hello!");
    let h = HarnessBuilder::new(brain.clone()).build();

    let outcome = h.orchestrator.process(text("hello")).await.unwrap();

    assert!(matches!(outcome, TurnOutcome::Replied { chunks_sent: 1, .. }));
    let saved = h.store.load(ADDRESS).await.unwrap().unwrap();
    assert!(saved.language.is_none());
}

#[tokio::test]
async fn test_empty_input_sends_apology_without_mutation() {
    let brain = Arc::new(ScriptedBrain::default());
    let h = HarnessBuilder::new(brain.clone()).build();

    let outcome = h.orchestrator.process(text("   ")).await.unwrap();

    assert_eq!(outcome, TurnOutcome::Terminated(TerminationReason::Empty));
    assert_eq!(h.channel.texts(), vec![NOT_UNDERSTOOD_TEXT]);
    assert_eq!(brain.call_count(), 0);
    assert!(h.store.is_empty().await);

    let handle = h.registry.get_or_create(&ana(), &common::config()).await.unwrap();
    assert_eq!(handle.lock().await.len(), 1);
}

#[tokio::test]
async fn test_goodbye_sends_rendered_goodbye() {
    let brain = Arc::new(ScriptedBrain::new(["english", "Hi!"]));
    let h = HarnessBuilder::new(brain.clone()).build();
    h.orchestrator.process(text("hello")).await.unwrap();

    let outcome = h.orchestrator.process(text("bye")).await.unwrap();

    assert_eq!(outcome, TurnOutcome::Terminated(TerminationReason::Goodbye));
    assert_eq!(h.channel.texts(), vec!["Hi!", "Bye Ana!"]);
    assert_eq!(brain.call_count(), 2);

    let saved = h.store.load(ADDRESS).await.unwrap().unwrap();
    assert_eq!(saved.messages.len(), 3);
}

#[tokio::test]
async fn test_short_question_with_farewell_word_is_answered() {
    let brain = Arc::new(ScriptedBrain::new(["english", "Later works too."]));
    let h = HarnessBuilder::new(brain.clone()).build();

    let outcome = h.orchestrator.process(text("what about later?")).await.unwrap();

    assert!(matches!(outcome, TurnOutcome::Replied { chunks_sent: 1, .. }));
    assert_eq!(h.channel.texts(), vec!["Later works too."]);
    assert_eq!(brain.call_count(), 2);
}

#[tokio::test]
async fn test_long_reply_is_chunked() {
    let reply: String = "abcdefghij".repeat(320);
    let brain = Arc::new(ScriptedBrain::new(["english".to_string(), reply.clone()]));
    let h = HarnessBuilder::new(brain).build();

    let outcome = h.orchestrator.process(text("tell me a story")).await.unwrap();

    assert_eq!(
        outcome,
        TurnOutcome::Replied {
            chunks_sent: 3,
            image_requested: false
        }
    );
    let texts = h.channel.texts();
    assert_eq!(texts.len(), 3);
    assert_eq!(texts[0], format!("{}...", &reply[..1500]));
    assert_eq!(texts[1], format!("{}...", &reply[1500..3000]));
    assert_eq!(texts[2], &reply[3000..]);

    // The transcript keeps the whole reply once
    let saved = h.store.load(ADDRESS).await.unwrap().unwrap();
    assert_eq!(saved.messages.last().unwrap().content, reply);
}

#[tokio::test]
async fn test_failed_chunk_replaced_by_apology() {
    let reply: String = "x".repeat(1500) + &"y".repeat(1500) + &"z".repeat(200);
    let brain = Arc::new(ScriptedBrain::new(["english".to_string(), reply.clone()]));
    let h = HarnessBuilder::new(brain).build();
    h.channel.fail_text_call(1);

    let outcome = h.orchestrator.process(text("go")).await.unwrap();

    assert_eq!(
        outcome,
        TurnOutcome::Replied {
            chunks_sent: 2,
            image_requested: false
        }
    );
    assert_eq!(
        h.channel.texts(),
        vec![
            format!("{}...", "x".repeat(1500)),
            NOT_UNDERSTOOD_TEXT.to_string(),
            "z".repeat(200),
        ]
    );

    let saved = h.store.load(ADDRESS).await.unwrap().unwrap();
    let assistant: Vec<_> = saved
        .messages
        .iter()
        .filter(|m| m.role == Role::Assistant)
        .collect();
    assert_eq!(assistant.len(), 1);
    assert_eq!(assistant[0].content, reply);
}

#[tokio::test]
async fn test_image_directive_generates_and_sends_image() {
    let brain = Arc::new(ScriptedBrain::new([
        "english",
        r#"Here is your picture! [img:"a red bicycle"]"#,
    ]));
    let images = Arc::new(StaticImageGenerator::new("https://img.example/bike.png"));
    let h = HarnessBuilder::new(brain).images(images.clone()).build();

    let outcome = h.orchestrator.process(text("draw a bike")).await.unwrap();

    assert_eq!(
        outcome,
        TurnOutcome::Replied {
            chunks_sent: 1,
            image_requested: true
        }
    );
    assert_eq!(
        h.channel.sent(),
        vec![
            Sent::Text {
                to: ADDRESS.to_string(),
                text: "Here is your picture!".to_string()
            },
            Sent::Image {
                to: ADDRESS.to_string(),
                url: "https://img.example/bike.png".to_string(),
                caption: Some("Generated image: a red bicycle".to_string()),
            },
        ]
    );
    assert_eq!(images.prompts(), vec!["a red bicycle".to_string()]);

    // Audit message follows the assistant message
    let saved = h.store.load(ADDRESS).await.unwrap().unwrap();
    let n = saved.messages.len();
    assert_eq!(saved.messages[n - 2].role, Role::Assistant);
    assert_eq!(saved.messages[n - 2].content, "Here is your picture!");
    assert_eq!(saved.messages[n - 1].role, Role::System);
    assert_eq!(saved.messages[n - 1].content, r#"[img:"a red bicycle"]"#);
}

#[tokio::test]
async fn test_image_failures_send_apology() {
    let reply = r#"Sure [img:"a cat"]"#;

    // Generator error
    let h = HarnessBuilder::new(Arc::new(ScriptedBrain::new(["english", reply])))
        .images(Arc::new(StaticImageGenerator::failing()))
        .build();
    h.orchestrator.process(text("cat please")).await.unwrap();
    assert_eq!(h.channel.texts(), vec!["Sure", IMAGE_FAILED_TEXT]);

    // No image produced
    let h = HarnessBuilder::new(Arc::new(ScriptedBrain::new(["english", reply])))
        .images(Arc::new(StaticImageGenerator::empty()))
        .build();
    h.orchestrator.process(text("cat please")).await.unwrap();
    assert_eq!(h.channel.texts(), vec!["Sure", IMAGE_FAILED_TEXT]);

    // Delivery rejected
    let h = HarnessBuilder::new(Arc::new(ScriptedBrain::new(["english", reply]))).build();
    h.channel.fail_images();
    h.orchestrator.process(text("cat please")).await.unwrap();
    assert_eq!(h.channel.texts(), vec!["Sure", IMAGE_FAILED_TEXT]);

    // The audit message is recorded either way
    let saved = h.store.load(ADDRESS).await.unwrap().unwrap();
    assert_eq!(saved.messages.last().unwrap().content, r#"[img:"a cat"]"#);
}

#[tokio::test]
async fn test_directive_ignored_when_images_disabled() {
    let brain = Arc::new(ScriptedBrain::new(["english", r#"Sure [img:"a cat"]"#]));
    let images = Arc::new(StaticImageGenerator::new("https://img.example/cat.png"));
    let config = RelayConfig::builder().allow_images(false).build();
    let h = HarnessBuilder::new(brain).images(images.clone()).config(config).build();

    let outcome = h.orchestrator.process(text("cat please")).await.unwrap();

    assert_eq!(
        outcome,
        TurnOutcome::Replied {
            chunks_sent: 1,
            image_requested: false
        }
    );
    assert_eq!(h.channel.texts(), vec!["Sure"]);
    assert!(images.prompts().is_empty());
}

#[tokio::test]
async fn test_directive_only_reply_sends_just_the_image() {
    let brain = Arc::new(ScriptedBrain::new(["english", r#"[img:"a sunset"]"#]));
    let h = HarnessBuilder::new(brain).build();

    let outcome = h.orchestrator.process(text("sunset")).await.unwrap();

    assert_eq!(
        outcome,
        TurnOutcome::Replied {
            chunks_sent: 0,
            image_requested: true
        }
    );
    let sent = h.channel.sent();
    assert_eq!(sent.len(), 1);
    assert!(matches!(sent[0], Sent::Image { .. }));
}

#[tokio::test]
async fn test_blank_reply_sends_fallback() {
    let brain = Arc::new(ScriptedBrain::new(["english", "   "]));
    let h = HarnessBuilder::new(brain).build();

    let outcome = h.orchestrator.process(text("hello")).await.unwrap();

    assert_eq!(
        outcome,
        TurnOutcome::Replied {
            chunks_sent: 0,
            image_requested: false
        }
    );
    assert_eq!(h.channel.texts(), vec![EMPTY_REPLY_TEXT]);

    // The transcript keeps the cleaned reply, not the notice
    let saved = h.store.load(ADDRESS).await.unwrap().unwrap();
    assert_eq!(saved.messages.len(), 3);
    assert_eq!(saved.messages[2].role, Role::Assistant);
    assert_eq!(saved.messages[2].content, "");
}

#[tokio::test]
async fn test_completion_failure_propagates_without_save() {
    let brain = Arc::new(ScriptedBrain::new(["english"]));
    brain.push_error(BrainError::Unavailable("down".to_string()));
    let h = HarnessBuilder::new(brain).build();

    let result = h.orchestrator.process(text("hello")).await;

    assert!(matches!(result, Err(OrchestratorError::Brain(_))));
    assert!(h.channel.sent().is_empty());
    assert!(h.store.is_empty().await);

    // The user message is not rolled back
    let handle = h.registry.get_or_create(&ana(), &common::config()).await.unwrap();
    assert_eq!(handle.lock().await.messages.last().unwrap().content, "hello");
}

#[tokio::test]
async fn test_voice_note_is_transcribed() {
    let brain = Arc::new(ScriptedBrain::new(["english", "Got it."]));
    let transcriber = Arc::new(StaticTranscriber::new("remind me to call mom"));
    let h = HarnessBuilder::new(brain.clone())
        .transcriber(transcriber.clone())
        .build();
    h.channel.serve_media(MediaData::new(vec![1, 2, 3], "audio/ogg"));

    let message = InboundMessage::audio(
        ana(),
        MediaRef::new("https://media.example/1", Some("audio/ogg".to_string())),
    );
    h.orchestrator.process(message).await.unwrap();

    assert_eq!(transcriber.call_count(), 1);
    let transcripts = brain.transcripts();
    assert_eq!(transcripts[1].last().unwrap().content, "remind me to call mom");
    assert_eq!(h.channel.texts(), vec!["Got it."]);
}

#[tokio::test]
async fn test_voice_note_fetch_failure_is_empty_input() {
    let transcriber = Arc::new(StaticTranscriber::new("unused"));
    let h = HarnessBuilder::new(Arc::new(ScriptedBrain::default()))
        .transcriber(transcriber.clone())
        .build();

    let message = InboundMessage::audio(ana(), MediaRef::new("https://media.example/1", None));
    let outcome = h.orchestrator.process(message).await.unwrap();

    assert_eq!(outcome, TurnOutcome::Terminated(TerminationReason::Empty));
    assert_eq!(transcriber.call_count(), 0);
    assert_eq!(h.channel.texts(), vec![NOT_UNDERSTOOD_TEXT]);
}

#[tokio::test]
async fn test_voice_note_ignored_when_transcription_disabled() {
    let transcriber = Arc::new(StaticTranscriber::new("unused"));
    let config = RelayConfig::builder().voice_transcription(false).build();
    let h = HarnessBuilder::new(Arc::new(ScriptedBrain::default()))
        .transcriber(transcriber.clone())
        .config(config)
        .build();
    h.channel.serve_media(MediaData::new(vec![1, 2, 3], "audio/ogg"));

    let message = InboundMessage::audio(ana(), MediaRef::new("https://media.example/1", None));
    let outcome = h.orchestrator.process(message).await.unwrap();

    assert_eq!(outcome, TurnOutcome::Terminated(TerminationReason::Empty));
    assert_eq!(transcriber.call_count(), 0);
}

#[tokio::test]
async fn test_transcription_failure_propagates() {
    let h = HarnessBuilder::new(Arc::new(ScriptedBrain::default()))
        .transcriber(Arc::new(StaticTranscriber::failing()))
        .build();
    h.channel.serve_media(MediaData::new(vec![1, 2, 3], "audio/ogg"));

    let message = InboundMessage::audio(ana(), MediaRef::new("https://media.example/1", None));
    let result = h.orchestrator.process(message).await;

    assert!(matches!(result, Err(OrchestratorError::Brain(_))));
    assert!(h.channel.texts().is_empty());
}

#[tokio::test]
async fn test_image_caption_is_used_as_text() {
    let brain = Arc::new(ScriptedBrain::new(["english", "Nice photo!"]));
    let h = HarnessBuilder::new(brain.clone()).build();

    let message = InboundMessage::image(
        ana(),
        MediaRef::new("https://media.example/2", Some("image/jpeg".to_string())),
        Some("look at my dog".to_string()),
    );
    h.orchestrator.process(message).await.unwrap();

    assert_eq!(brain.transcripts()[1].last().unwrap().content, "look at my dog");
}

#[tokio::test]
async fn test_message_marked_read() {
    let brain = Arc::new(ScriptedBrain::new(["english", "Hi!"]));
    let h = HarnessBuilder::new(brain).build();

    h.orchestrator
        .process(text("hello").with_message_id("wamid.ABC"))
        .await
        .unwrap();

    assert_eq!(h.channel.sent()[0], Sent::Read("wamid.ABC".to_string()));
}

#[tokio::test]
async fn test_turns_for_same_sender_are_serialized() {
    let scripted = ScriptedBrain::new(["english"]).with_fallback("ok");
    let brain = Arc::new(DelayedBrain::with_millis(scripted, 50));
    let h = HarnessBuilder::new(brain).build();

    let (first, second) = tokio::join!(
        h.orchestrator.process(text("first question")),
        h.orchestrator.process(text("second question")),
    );
    first.unwrap();
    second.unwrap();

    let handle = h.registry.get_or_create(&ana(), &common::config()).await.unwrap();
    let conversation = handle.lock().await;
    let roles: Vec<Role> = conversation.messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
}

#[tokio::test]
async fn test_different_senders_get_separate_conversations() {
    let brain = Arc::new(ScriptedBrain::default().with_fallback("ok"));
    let h = HarnessBuilder::new(brain).build();

    let bob = brain_core::Sender::new("whatsapp:+15559876543", Some("Bob".to_string()));
    let turns = futures::future::join_all([
        h.orchestrator.process(text("hi from ana")),
        h.orchestrator.process(InboundMessage::text(bob, "hi from bob")),
    ])
    .await;
    assert!(turns.iter().all(|t| t.is_ok()));

    assert_eq!(h.registry.len().await, 2);
    let ana_saved = h.store.load(ADDRESS).await.unwrap().unwrap();
    let bob_saved = h.store.load("whatsapp:+15559876543").await.unwrap().unwrap();
    assert_eq!(ana_saved.messages[1].content, "hi from ana");
    assert_eq!(bob_saved.messages[1].content, "hi from bob");
    assert!(bob_saved.messages[0].content.contains("Bob"));
}

#[tokio::test]
async fn test_conversation_survives_restart_with_sqlite_store() {
    let database = database::Database::connect("sqlite::memory:").await.unwrap();
    database.migrate().await.unwrap();
    let store = Arc::new(SqliteStore::with_database(database));

    let first = HarnessBuilder::new(Arc::new(ScriptedBrain::new(["english", "Hi Ana!"])))
        .store(store.clone())
        .build();
    first.orchestrator.process(text("hello")).await.unwrap();

    // A new registry over the same store picks the transcript back up
    let brain = Arc::new(ScriptedBrain::new(["Welcome back."]));
    let second = HarnessBuilder::new(brain.clone()).store(store.clone()).build();
    second.orchestrator.process(text("I'm back")).await.unwrap();

    assert_eq!(brain.call_count(), 1);
    let transcript = &brain.transcripts()[0];
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[1].content, "hello");
    assert_eq!(transcript[2].content, "Hi Ana!");
    assert!(transcript[0].content.ends_with("Always reply in english."));

    let saved = store.load(ADDRESS).await.unwrap().unwrap();
    assert_eq!(saved.messages.len(), 5);
}

#[tokio::test]
async fn test_handle_webhook_ignores_malformed_payload() {
    let brain = Arc::new(ScriptedBrain::default());
    let h = HarnessBuilder::new(brain.clone()).build();

    let outcome = h.orchestrator.handle_webhook(b"{not json").await.unwrap();

    assert!(outcome.is_none());
    assert_eq!(brain.call_count(), 0);
    assert!(h.channel.sent().is_empty());
}

#[tokio::test]
async fn test_handle_webhook_runs_turn() {
    let brain = Arc::new(ScriptedBrain::new(["english", "Hi!"]));
    let h = HarnessBuilder::new(brain).build();
    let body = serde_json::to_vec(&text("hello")).unwrap();

    let outcome = h.orchestrator.handle_webhook(&body).await.unwrap();

    assert!(matches!(outcome, Some(TurnOutcome::Replied { chunks_sent: 1, .. })));
    assert_eq!(h.channel.texts(), vec!["Hi!"]);
}
