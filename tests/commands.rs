use ladder::cache::RatingCache;
use ladder::config::Config;
use ladder::handler::Handler;
use ladder::store::MemoryStore;
use ladder::LadderService;
use std::sync::Arc;

async fn handler() -> Handler {
    let cfg = Config::default();
    let service = LadderService::new(
        Arc::new(MemoryStore::new()),
        Arc::new(RatingCache::new()),
        cfg.rating_settings(),
    )
    .await
    .unwrap();
    Handler::new(cfg, service)
}

async fn say(handler: &Handler, line: &str) -> String {
    handler.handle_line(line).await.unwrap()
}

#[tokio::test]
async fn help_lists_every_command() {
    let handler = handler().await;
    let help = say(&handler, "/help").await;
    for command in [
        "/help", "/top", "/gtop", "/info", "/card", "/history", "/player", "/game", "/export",
        "/import",
    ] {
        assert!(help.contains(command), "{command} missing from:\n{help}");
    }
}

#[tokio::test]
async fn register_and_play() {
    let handler = handler().await;
    say(&handler, "/player Ivan").await;
    say(&handler, "/player Olga").await;

    let reply = say(&handler, "/game ivan OLGA olga").await;
    assert!(
        reply.ends_with("Olga (1020, +20) beat Ivan (980, -20)"),
        "{reply}"
    );

    assert_eq!(say(&handler, "/top").await, "1. Olga (1020)\n2. Ivan (980)");

    let info = say(&handler, "info ivan").await;
    assert!(info.contains("Rank: 🥈"), "{info}");
    assert!(info.contains("Rating: 980"), "{info}");
    assert!(info.contains("Games: 1"), "{info}");
    assert!(info.contains("Last change: -20"), "{info}");

    let card = say(&handler, "/card olga").await;
    assert_eq!(card, "🥇 Olga (1020)\nvs Ivan: 1W 0D 0L");
}

#[tokio::test]
async fn draws_and_history() {
    let handler = handler().await;
    say(&handler, "/player Ivan").await;
    say(&handler, "/player Olga").await;
    say(&handler, "/game ivan olga draw").await;
    say(&handler, "/game ivan olga ivan").await;

    let history = say(&handler, "/history").await;
    let lines: Vec<_> = history.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("#2 "), "{history}");
    assert!(lines[0].contains("Ivan (1020, +20) beat Olga (980, -20)"));
    assert!(lines[1].contains("Ivan (1000, +0) drew with Olga (1000, +0)"));

    assert_eq!(say(&handler, "/history 1").await.lines().count(), 1);
    assert!(say(&handler, "/history lots").await.starts_with("Error:"));
}

#[tokio::test]
async fn gtop_shows_intervals() {
    let handler = handler().await;
    say(&handler, "/player Ivan").await;
    say(&handler, "/player Olga").await;
    say(&handler, "/game ivan olga ivan").await;

    let gtop = say(&handler, "/gtop").await;
    let lines: Vec<_> = gtop.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1. Ivan - "), "{gtop}");
    assert!(lines[1].starts_with("2. Olga - "), "{gtop}");
}

#[tokio::test]
async fn errors_are_replies() {
    let handler = handler().await;
    say(&handler, "/player Ivan").await;

    let reply = say(&handler, "/player  ivan ").await;
    assert!(reply.starts_with("Error:"), "{reply}");
    assert!(reply.contains("already exists"), "{reply}");

    let reply = say(&handler, "/game ivan nobody ivan").await;
    assert_eq!(reply, "Error: player 'nobody' not found");

    let reply = say(&handler, "/game ivan ivan draw").await;
    assert!(reply.starts_with("Error:"), "{reply}");

    let reply = say(&handler, "/game ivan").await;
    assert_eq!(reply, "Error: Usage: game <a> <b> <winner|draw>");

    assert_eq!(say(&handler, "/top").await, "1. Ivan (1000)");
}

#[tokio::test]
async fn export_then_import() {
    let path = std::env::temp_dir().join(format!("ladder-export-{}.json", std::process::id()));
    let path = path.to_string_lossy().to_string();

    let source = handler().await;
    say(&source, "/player Ivan").await;
    say(&source, "/player Olga").await;
    say(&source, "/game ivan olga olga").await;
    assert!(say(&source, &format!("/export {}", path))
        .await
        .starts_with("Exported"));

    let target = handler().await;
    assert_eq!(
        say(&target, &format!("/import {}", path)).await,
        "Imported 2 players and 1 matches"
    );
    assert_eq!(say(&target, "/top").await, say(&source, "/top").await);

    tokio::fs::remove_file(&path).await.unwrap();
}
