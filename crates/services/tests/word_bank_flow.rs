use std::sync::Arc;

use mockito::Server;
use serde_json::json;
use services::{
    AddStatus, AppServices, BankConfig, BankSource, HttpBankClient, Persisted, QuizPhase,
    RemoveTarget,
};
use storage::{LocalCache, Storage};
use vocab_core::PoolSources;
use vocab_core::model::VocabularyEntry;
use vocab_core::time::fixed_clock;

fn services_for(server: &Server, storage: &Storage) -> AppServices {
    let api = Arc::new(HttpBankClient::new(BankConfig::new(&server.url()).unwrap()));
    AppServices::with_api(storage, fixed_clock(), api)
}

#[tokio::test]
async fn server_error_falls_back_to_cached_words() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/bank")
        .with_status(500)
        .create_async()
        .await;
    let storage = Storage::in_memory();
    let cached: Vec<VocabularyEntry> = ["one", "two", "three"]
        .iter()
        .map(|w| VocabularyEntry::new(*w, format!("{w}-ta"), None).unwrap())
        .collect();
    LocalCache::new(Arc::clone(&storage.local))
        .save_bank(&cached)
        .await
        .unwrap();

    let loaded = services_for(&server, &storage).word_bank().load().await;

    assert_eq!(loaded.source, BankSource::Cache);
    assert_eq!(loaded.entries, cached);
}

#[tokio::test]
async fn hello_added_twice_is_saved_once() {
    let mut server = Server::new_async().await;
    let add = server
        .mock("POST", "/api/bank")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"status": "added", "id": 1}).to_string())
        .expect(1)
        .create_async()
        .await;
    let storage = Storage::in_memory();
    let app = services_for(&server, &storage);
    app.set_access_token(Some("token")).await.unwrap();
    let bank = app.word_bank();

    let first = bank
        .add(VocabularyEntry::new("hello", "வணக்கம்", None).unwrap())
        .await
        .unwrap();
    let second = bank
        .add(VocabularyEntry::new("hello", "வணக்கம்", None).unwrap())
        .await
        .unwrap();

    add.assert_async().await;
    assert_eq!(first.status, AddStatus::Added);
    assert_eq!(first.persisted, Persisted::Remote);
    assert_eq!(second.status, AddStatus::Exists);
    assert_eq!(bank.cached().await.unwrap().len(), 1);
}

#[tokio::test]
async fn offline_words_feed_a_quiz() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/bank")
        .with_status(503)
        .create_async()
        .await;
    let storage = Storage::in_memory();
    let app = services_for(&server, &storage);
    assert!(!app.signed_in().await.unwrap());

    let bank = app.word_bank();
    for (en, ta) in [("cat", "பூனை"), ("dog", "நாய்"), ("cow", "பசு")] {
        let outcome = bank
            .add(VocabularyEntry::new(en, ta, None).unwrap())
            .await
            .unwrap();
        assert_eq!(outcome.persisted, Persisted::Local);
    }
    assert!(bank.remove(RemoveTarget::Local(0)).await.unwrap());

    let quiz = app.quiz();
    let mut session = quiz
        .start_quiz(
            10,
            PoolSources {
                include_defaults: false,
                include_saved: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(session.questions().len(), 2);

    while let QuizPhase::InProgress { .. } = session.phase() {
        let pick = session.current_question().unwrap().options[0].clone();
        session.select(&pick).unwrap();
        quiz.advance(&mut session).unwrap();
    }
    assert!(session.is_complete());
    assert!(quiz.finish(&session).await);
}
