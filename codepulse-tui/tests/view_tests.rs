//! Rendered screens on a test backend.


use codepulse_core::{Feature, Resource};
use codepulse_tui::cache::QueryCache;
use codepulse_tui::nav::Page;
use codepulse_tui::state::App;
use codepulse_tui::views::render_view;
use crossterm::event::KeyCode;
use ratatui::{backend::TestBackend, Terminal};
use test_support::{features, files, press, search_result, test_config, ScriptedFetcher};

const WIDTH: u16 = 100;
const HEIGHT: u16 = 30;

/// App on `page` whose first fetch has been answered with `resource`.
async fn loaded_app(page: Page, resource: Resource) -> App {
    let (fetcher, mut requests) = ScriptedFetcher::new();
    let (cache, mut outcomes) = QueryCache::new(fetcher, 4);
    let mut app = App::new(test_config(), cache, page);
    requests.recv().await.unwrap().succeed(resource);
    app.apply_outcome(outcomes.recv().await.unwrap());
    app
}

fn draw(app: &App) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
    terminal.draw(|f| render_view(f, app)).unwrap();
    terminal
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer.get(x, y).symbol());
        }
        text.push('\n');
    }
    text
}

fn many_files(count: usize) -> Resource {
    let names: Vec<String> = (0..count).map(|i| format!("file_{:03}.c", i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    files(&refs)
}

#[tokio::test]
async fn test_files_last_row_reachable() {
    let mut app = loaded_app(Page::Files, many_files(100)).await;
    let first = screen_text(&draw(&app));
    assert!(first.contains("file_000.c"));
    assert!(!first.contains("file_099.c"));

    app.handle_key(press(KeyCode::End));
    let bottom = screen_text(&draw(&app));
    assert!(bottom.contains("file_099.c"));
    assert!(!bottom.contains("file_000.c"));

    app.handle_key(press(KeyCode::Home));
    assert!(screen_text(&draw(&app)).contains("file_000.c"));
}

#[tokio::test]
async fn test_files_step_scrolling() {
    let mut app = loaded_app(Page::Files, many_files(100)).await;
    for _ in 0..5 {
        app.handle_key(press(KeyCode::PageDown));
    }
    app.handle_key(press(KeyCode::Char('j')));
    app.handle_key(press(KeyCode::Down));
    assert_eq!(app.selected_row(Page::Files, 100), 52);
    assert!(screen_text(&draw(&app)).contains("file_052.c"));
}

#[tokio::test]
async fn test_features_scroll_to_last() {
    let items = (0..12)
        .map(|id| Feature {
            id,
            name: format!("feature_{:02}", id),
            implementation_percentage: 40.0,
            ..Feature::default()
        })
        .collect();
    let mut app = loaded_app(Page::Features, features(items)).await;
    assert!(!screen_text(&draw(&app)).contains("feature_11"));

    app.handle_key(press(KeyCode::Char('G')));
    let text = screen_text(&draw(&app));
    assert!(text.contains("feature_11"));
    assert!(text.contains("Features (12/12)"));
}

#[tokio::test]
async fn test_feature_progress_fills_with_accent() {
    let app = loaded_app(
        Page::Features,
        features(vec![Feature {
            id: 1,
            name: "X".to_string(),
            implementation_percentage: 40.0,
            ..Feature::default()
        }]),
    )
    .await;
    let terminal = draw(&app);
    let buffer = terminal.backend().buffer();
    let fills: Vec<_> = buffer
        .content()
        .iter()
        .filter(|cell| cell.symbol() == "█")
        .collect();
    assert!(!fills.is_empty());
    assert!(fills.iter().all(|cell| cell.fg == app.theme.accent));
}

#[tokio::test]
async fn test_search_results_scroll() {
    let results: Vec<String> = (0..60).map(|i| format!("match_{:02}", i)).collect();
    let (fetcher, mut requests) = ScriptedFetcher::new();
    let (cache, mut outcomes) = QueryCache::new(fetcher, 4);
    let mut app = App::new(test_config(), cache, Page::Overview);
    let _dashboard = requests.recv().await.unwrap();

    app.handle_key(press(KeyCode::Char('/')));
    for c in "ept".chars() {
        app.handle_key(press(KeyCode::Char(c)));
    }
    app.handle_key(press(KeyCode::Enter));
    assert!(screen_text(&draw(&app)).contains("loading"));

    requests
        .recv()
        .await
        .unwrap()
        .succeed(search_result(serde_json::json!({ "results": results })));
    app.apply_outcome(outcomes.recv().await.unwrap());
    let top = screen_text(&draw(&app));
    assert!(top.contains("success"));
    assert!(!top.contains("match_59"));

    app.handle_key(press(KeyCode::End));
    assert!(screen_text(&draw(&app)).contains("match_59"));
}
