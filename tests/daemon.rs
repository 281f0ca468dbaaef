use std::time::Duration;

use httpmock::Method::{DELETE, GET};
use httpmock::MockServer;
use serde_json::json;

use toshi_relay::config::{Config, FetcherConfig, RelayConfig};
use toshi_relay::daemon;

#[tokio::test]
async fn daemon_flushes_acknowledgements_on_shutdown() {
    let server = MockServer::start_async().await;
    let messages_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/messages");
            then.status(200).json_body(json!({
                "messages": [
                    {"type": 1, "timestamp": 21, "source": "0xaaa", "sourceDevice": 1},
                    {"type": 1, "timestamp": 22, "source": "0xbbb", "sourceDevice": 1}
                ],
                "more": false
            }));
        })
        .await;
    let ack_first = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/v1/messages/0xaaa/21");
            then.status(204).delay(Duration::from_millis(300));
        })
        .await;
    let ack_second = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/v1/messages/0xbbb/22");
            then.status(204).delay(Duration::from_millis(300));
        })
        .await;

    let config = Config {
        relay: RelayConfig::new(server.base_url()),
        fetcher: Some(FetcherConfig {
            poll_seconds: Some(3600),
        }),
    };

    daemon::run(config, async {
        tokio::time::sleep(Duration::from_millis(150)).await;
    })
    .await
    .unwrap();

    messages_mock.assert_hits(1);
    ack_first.assert_hits(1);
    ack_second.assert_hits(1);
}
