//! Integration test: start the webhook server on a free port, GET /, assert the
//! liveness text. Does not require Telegram or a generation backend; no outbound
//! call is made. The server task is left running when the test ends.

use lib::config::Config;
use lib::server;
use std::time::Duration;

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    listener.local_addr().expect("local_addr").port()
}

#[tokio::test]
async fn liveness_responds_with_running_text() {
    let port = free_port();

    let mut config = Config::default();
    config.server.port = port;
    config.server.bind = "127.0.0.1".to_string();
    config.channels.telegram.bot_token = Some("health-token".to_string());

    let server_handle = tokio::spawn(async move {
        let _ = server::run_server(config).await;
    });

    let url = format!("http://127.0.0.1:{}/", port);
    let client = reqwest::Client::new();
    let mut last_err = None;
    for _ in 0..100 {
        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                let body = resp.text().await.expect("read body");
                assert_eq!(body, "Bot is running!");
                return;
            }
            Ok(_) => {}
            Err(e) => last_err = Some(e),
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let _ = server_handle.abort();
    panic!(
        "GET {} did not return 200 with liveness text within 5s; last error: {:?}",
        url, last_err
    );
}

#[tokio::test]
async fn missing_bot_token_is_fatal() {
    // Only meaningful when the env var is absent; tests do not set it.
    if std::env::var("TELEGRAM_BOT_TOKEN").is_ok() {
        return;
    }
    let mut config = Config::default();
    config.server.port = free_port();
    config.server.bind = "127.0.0.1".to_string();

    let err = server::run_server(config)
        .await
        .expect_err("server must refuse to start without a bot token");
    assert!(err.to_string().contains("bot token"));
}
