//! Tests for the alerts façade.

use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, TryStreamExt};
use serde_json::{Value, json};

use super::{
    AlertCondition, AlertParameters, AlertStatus, CreateAlert, ListAlertsParams,
    NotificationChannel, UpdateAlert,
};
use crate::Client;
use crate::engine::RequestEngine;
use crate::error::{Error, ErrorKind};
use crate::test_support::{
    MockClient, MockClock, NOW_MS, RecordingSleeper, envelope, error_envelope, json_response,
    request_json, test_config,
};

const ALERT_ID: &str = "5f8c2e1a-0b3d-4c5e-8f9a-0123456789ab";

type TestClient = Client<Arc<MockClient>, RecordingSleeper, MockClock>;

fn client(mock: MockClient) -> (TestClient, Arc<MockClient>) {
    let mock = Arc::new(mock);
    let engine = RequestEngine::with_parts(
        &test_config(),
        Arc::clone(&mock),
        RecordingSleeper::default(),
        MockClock::new(NOW_MS),
    )
    .unwrap();
    (Client::from_engine(engine), mock)
}

fn alert_json(id: &str, symbol: &str) -> Value {
    json!({
        "id": id,
        "symbol": symbol,
        "condition": "price_above",
        "threshold": 200,
        "notification": "email",
        "status": "active",
        "created_at": "2026-01-01T00:00:00Z"
    })
}

fn page(items: Vec<Value>, page: u32, total_pages: u32) -> crate::transport::HttpResponse {
    let total = items.len() as u64;
    json_response(
        200,
        &json!({
            "success": true,
            "data": items,
            "meta": {"pagination": {"page": page, "limit": 2, "total": total, "total_pages": total_pages}}
        }),
    )
}

mod create {
    use super::*;

    #[tokio::test]
    async fn price_alert_round_trip() {
        let (client, mock) = client(MockClient::new(vec![Ok(envelope(
            201,
            alert_json(ALERT_ID, "AAPL"),
        ))]));

        let request = CreateAlert::new("AAPL", AlertCondition::PriceAbove)
            .with_threshold(200.0)
            .with_notification(NotificationChannel::Email);
        let alert = client.alerts().create(&request).await.unwrap();

        assert_eq!(alert.status, AlertStatus::Active);
        assert_eq!(alert.symbol, "AAPL");
        assert_eq!(alert.condition, AlertCondition::PriceAbove);

        let sent = mock.last_request();
        assert_eq!(sent.method, http::Method::POST);
        assert_eq!(sent.url.path(), "/v1/alerts");
        assert_eq!(
            request_json(&sent),
            json!({
                "symbol": "AAPL",
                "condition": "price_above",
                "threshold": 200.0,
                "notification": "email"
            })
        );
    }

    #[tokio::test]
    async fn missing_threshold_fails_before_network() {
        let (client, mock) = client(MockClient::failing());

        let request = CreateAlert::new("AAPL", AlertCondition::PriceAbove);
        let err = client.alerts().create(&request).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn symbol_is_normalized_before_sending() {
        let (client, mock) = client(MockClient::ok(alert_json(ALERT_ID, "MSFT")));

        let request = CreateAlert::new("  msft ", AlertCondition::NewHigh);
        client.alerts().create(&request).await.unwrap();

        let body = request_json(&mock.last_request());
        assert_eq!(body["symbol"], "MSFT");
        assert!(body.get("threshold").is_none());
        assert!(body.get("parameters").is_none());
    }

    #[tokio::test]
    async fn reminder_parameters_are_sent() {
        let mut reminder = alert_json(ALERT_ID, "AAPL");
        reminder["condition"] = json!("reminder");
        let (client, mock) = client(MockClient::ok(reminder));

        let request = CreateAlert::new("AAPL", AlertCondition::Reminder).with_parameters(
            AlertParameters {
                date: Some("2026-12-01".to_string()),
                ..AlertParameters::default()
            },
        );
        client.alerts().create(&request).await.unwrap();

        let body = request_json(&mock.last_request());
        assert_eq!(body["parameters"], json!({"date": "2026-12-01"}));
    }
}

mod batch {
    use super::*;

    fn valid(symbol: &str) -> CreateAlert {
        CreateAlert::new(symbol, AlertCondition::PriceBelow).with_threshold(100.0)
    }

    #[tokio::test]
    async fn invalid_item_reports_index_and_sends_nothing() {
        let (client, mock) = client(MockClient::failing());
        let requests = vec![
            valid("AAPL"),
            valid("MSFT"),
            CreateAlert::new("GOOG", AlertCondition::PriceAbove),
        ];

        let err = client.alerts().create_batch(&requests).await.unwrap_err();

        match err {
            Error::Validation { index, message, .. } => {
                assert_eq!(index, Some(2));
                assert!(message.starts_with("Item 2:"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn results_keep_input_order_and_partial_failures() {
        let (client, mock) = client(MockClient::new(vec![
            Ok(envelope(201, alert_json(ALERT_ID, "AAPL"))),
            Ok(error_envelope(400, "Duplicate alert")),
            Ok(envelope(201, alert_json(ALERT_ID, "TSLA"))),
        ]));
        let requests = vec![valid("AAPL"), valid("MSFT"), valid("TSLA")];

        let results = client.alerts().create_batch(&requests).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().symbol, "AAPL");
        assert_eq!(results[1].as_ref().unwrap_err().status_code(), Some(400));
        assert_eq!(results[2].as_ref().unwrap().symbol, "TSLA");
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn at_most_five_creates_in_flight() {
        let responses = (0..12)
            .map(|_| Ok(envelope(201, alert_json(ALERT_ID, "AAPL"))))
            .collect();
        let mock = MockClient::new(responses).with_delay(Duration::from_secs(1));
        let (client, mock) = client(mock);
        let requests: Vec<_> = (0..12).map(|_| valid("AAPL")).collect();

        let start = tokio::time::Instant::now();
        let results = client.alerts().create_batch(&requests).await.unwrap();

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(mock.calls(), 12);
        // 12 requests of 1s each, five at a time: three rounds.
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let (client, mock) = client(MockClient::failing());
        let results = client.alerts().create_batch(&[]).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(mock.calls(), 0);
    }
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn update_missing_alert_is_not_retried() {
        let (client, mock) = client(MockClient::new(vec![Ok(error_envelope(
            404,
            "Alert not found",
        ))]));
        let update = UpdateAlert {
            threshold: Some(210.0),
            ..UpdateAlert::default()
        };

        let err = client.alerts().update(ALERT_ID, &update).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(mock.calls(), 1);
        assert_eq!(request_json(&mock.last_request()), json!({"threshold": 210.0}));
    }

    #[tokio::test]
    async fn get_rejects_non_uuid_ids() {
        let (client, mock) = client(MockClient::failing());
        let err = client.alerts().get("../api-keys").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn get_fetches_by_id() {
        let (client, mock) = client(MockClient::ok(alert_json(ALERT_ID, "AAPL")));
        let alert = client.alerts().get(ALERT_ID).await.unwrap();

        assert_eq!(alert.id, ALERT_ID);
        assert_eq!(
            mock.last_request().url.path(),
            format!("/v1/alerts/{ALERT_ID}")
        );
    }

    #[tokio::test]
    async fn pause_and_activate_set_status() {
        let mut paused = alert_json(ALERT_ID, "AAPL");
        paused["status"] = json!("paused");
        let (client, mock) = client(MockClient::new(vec![
            Ok(envelope(200, paused)),
            Ok(envelope(200, alert_json(ALERT_ID, "AAPL"))),
        ]));

        let alert = client.alerts().pause(ALERT_ID).await.unwrap();
        assert_eq!(alert.status, AlertStatus::Paused);
        assert_eq!(request_json(&mock.last_request()), json!({"status": "paused"}));

        let alert = client.alerts().activate(ALERT_ID).await.unwrap();
        assert_eq!(alert.status, AlertStatus::Active);
        assert_eq!(request_json(&mock.last_request()), json!({"status": "active"}));
    }

    #[tokio::test]
    async fn delete_accepts_empty_success() {
        let (client, mock) = client(MockClient::new(vec![Ok(json_response(
            200,
            &json!({"success": true, "data": null}),
        ))]));

        client.alerts().delete(ALERT_ID).await.unwrap();
        assert_eq!(mock.last_request().method, http::Method::DELETE);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn list_sends_filters_and_returns_pagination() {
        let (client, mock) = client(MockClient::new(vec![Ok(page(
            vec![alert_json(ALERT_ID, "AAPL")],
            1,
            1,
        ))]));
        let params = ListAlertsParams {
            status: Some(AlertStatus::Active),
            symbol: Some("aapl".to_string()),
            limit: Some(10),
            ..ListAlertsParams::default()
        };

        let result = client.alerts().list(&params).await.unwrap();

        assert_eq!(result.data.len(), 1);
        assert_eq!(result.pagination().unwrap().page, 1);
        assert_eq!(
            mock.last_request().url.query(),
            Some("limit=10&status=active&symbol=AAPL")
        );
    }

    #[tokio::test]
    async fn list_rejects_oversized_pages() {
        let (client, mock) = client(MockClient::failing());
        let params = ListAlertsParams {
            limit: Some(500),
            ..ListAlertsParams::default()
        };

        let err = client.alerts().list(&params).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn iter_walks_every_page() {
        let (client, mock) = client(MockClient::new(vec![
            Ok(page(vec![alert_json(ALERT_ID, "A"), alert_json(ALERT_ID, "B")], 1, 2)),
            Ok(page(vec![alert_json(ALERT_ID, "C"), alert_json(ALERT_ID, "D")], 2, 2)),
        ]));
        let params = ListAlertsParams {
            limit: Some(2),
            ..ListAlertsParams::default()
        };

        let symbols: Vec<String> = client
            .alerts()
            .iter(&params)
            .unwrap()
            .map_ok(|alert| alert.symbol)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(symbols, ["A", "B", "C", "D"]);
        assert_eq!(mock.calls(), 2);
        let queries: Vec<_> = mock
            .captured_requests()
            .iter()
            .map(|r| r.url.query().unwrap_or_default().to_string())
            .collect();
        assert_eq!(queries, ["page=1&limit=2", "page=2&limit=2"]);
    }

    #[tokio::test]
    async fn iter_stops_on_short_page_without_meta() {
        let (client, mock) = client(MockClient::new(vec![Ok(envelope(
            200,
            json!([alert_json(ALERT_ID, "A")]),
        ))]));
        let params = ListAlertsParams {
            limit: Some(2),
            ..ListAlertsParams::default()
        };

        let alerts: Vec<_> = client
            .alerts()
            .iter(&params)
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(alerts.len(), 1);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn iter_is_lazy_and_yields_errors() {
        let (client, mock) = client(MockClient::new(vec![Ok(error_envelope(
            403,
            "Forbidden",
        ))]));

        let stream = client.alerts().iter(&ListAlertsParams::default()).unwrap();
        assert_eq!(mock.calls(), 0);

        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap_err().status_code(), Some(403));
    }

    #[tokio::test]
    async fn iter_validates_eagerly() {
        let (client, _) = client(MockClient::failing());
        let params = ListAlertsParams {
            page: Some(0),
            ..ListAlertsParams::default()
        };
        assert!(client.alerts().iter(&params).is_err());
    }

    #[tokio::test]
    async fn iter_restarts_from_first_page() {
        let first = vec![alert_json(ALERT_ID, "A")];
        let (client, mock) = client(MockClient::new(vec![
            Ok(page(first.clone(), 1, 1)),
            Ok(page(first, 1, 1)),
        ]));
        let alerts = client.alerts();

        for _ in 0..2 {
            let items: Vec<_> = alerts
                .iter(&ListAlertsParams::default())
                .unwrap()
                .try_collect()
                .await
                .unwrap();
            assert_eq!(items.len(), 1);
        }

        let queries: Vec<_> = mock
            .captured_requests()
            .iter()
            .map(|r| r.url.query().unwrap_or_default().to_string())
            .collect();
        assert_eq!(queries, ["page=1&limit=50", "page=1&limit=50"]);
    }
}
