//! Library API integration tests
use postea_core::*;

const ARTICLE_HTML: &str = r##"
    <!DOCTYPE html>
    <html lang="en">
    <head>
        <title>Integration Article</title>
        <meta name="author" content="Int Author">
        <meta property="og:site_name" content="Int Site">
    </head>
    <body>
        <article class="article-body">
            <h1>Integration Article</h1>
            <p>A reasonably long opening paragraph, with commas, multiple clauses, and enough words
            that both extraction algorithms accept the page as readable content.</p>
            <p>A second paragraph that continues the prose, keeps the character count climbing, and
            gives the sibling logic something to include alongside the first one.</p>
            <p>A closing paragraph so that the density heuristic sees a healthy paragraph count in
            the winning container as well.</p>
        </article>
    </body>
    </html>
"##;

#[test]
fn test_parse_document_api() {
    let article = parse_document(ARTICLE_HTML, ParserKind::Readability, None).expect("should parse");
    assert_eq!(article.title.as_deref(), Some("Integration Article"));
    assert_eq!(article.byline.as_deref(), Some("Int Author"));
    assert_eq!(article.site_name.as_deref(), Some("Int Site"));
    assert!(!article.content.is_empty());
    assert!(article.word_count > 30);
}

#[test]
fn test_parser_kinds_interchangeable() {
    let readability = parse_document(ARTICLE_HTML, ParserKind::Readability, None).expect("readability");
    let density = parse_document(ARTICLE_HTML, ParserKind::Density, None).expect("density");
    assert!(readability.content.contains("opening paragraph"));
    assert!(density.content.contains("opening paragraph"));
}

#[test]
fn test_dispatch_normalization_is_markup_light() {
    let article = parse_document(ARTICLE_HTML, ParserKind::Readability, None).expect("should parse");
    let markdown = normalize_for_dispatch(&article.content).expect("should convert");
    assert!(!markdown.contains("<p>"));
    assert!(markdown.contains("opening paragraph"));
}

#[test]
fn test_settings_store_with_prompts_and_models() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = SettingsStore::open(dir.path().join("settings.json")).unwrap();

    store.set_server_url("https://postea.example.com").unwrap();
    store
        .set_provider(
            "acme",
            ProviderSettings {
                display_name: "Acme".to_string(),
                enabled: true,
                base_url: "https://api.acme.test/v1".to_string(),
                api_key: Some("sk-int".to_string()),
                models: vec![ModelEntry { id: "fast-1".to_string(), name: "Fast 1".to_string() }],
            },
        )
        .unwrap();

    let models = store.available_models();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id, "server:default");
    assert_eq!(models[1].id, "acme:fast-1");

    store.set_selected_model_id("acme:fast-1").unwrap();
    assert_eq!(store.selected_model().unwrap().id, "acme:fast-1");

    // Disabling server shortcuts removes the server model and the fallback
    // chain re-resolves.
    store.set_shortcuts_enabled(false).unwrap();
    let models = store.available_models();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].provider, "acme");
}

#[test]
fn test_task_view_follows_protocol() {
    let id = TaskId::new();
    let mut view = TaskView::new(id);

    view.apply(&TaskMessage::new(id, TaskEvent::ProcessingStart));
    view.apply(&TaskMessage::new(id, TaskEvent::ProcessData { text: "Hello".to_string() }));
    view.apply(&TaskMessage::new(id, TaskEvent::ProcessData { text: "Hello world".to_string() }));
    assert_eq!(view.text(), "Hello world");

    view.apply(&TaskMessage::new(id, TaskEvent::ProcessResult));
    assert_eq!(view.phase(), TaskPhase::Done);
}
