//! HTTP delivery of readings to the collector.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::config::CollectorConfig;
use crate::error::{AgentError, Result};
use crate::reading::SensorReading;

/// Name of the shared-secret header.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Publishes readings to the collector.
///
/// Delivery is fire-and-forget: one POST per reading, no retry, no queue.
/// Only HTTP 200 counts as delivered.
#[derive(Debug, Clone)]
pub struct TelemetryPublisher {
    client: Client,
    url: String,
    api_key: String,
}

impl TelemetryPublisher {
    /// Build a publisher for the configured collector endpoint.
    pub fn new(config: &CollectorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.endpoint_url(),
            api_key: config.api_key.clone(),
        })
    }

    /// The endpoint URL readings are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one reading to the collector.
    pub async fn publish(&self, reading: &SensorReading) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .json(reading)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn collector_for(server: &MockServer) -> CollectorConfig {
        let addr = server.address();
        CollectorConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            api_key: "secret".to_string(),
            request_timeout_secs: 1,
        }
    }

    fn sample_reading() -> SensorReading {
        SensorReading {
            cpu_temp: 45.0,
            gpu_temp: 60.0,
            fan_speed: 1200,
        }
    }

    #[tokio::test]
    async fn test_publish_sends_expected_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/update"))
            .and(header(API_KEY_HEADER, "secret"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "cpu_temp": 45.0,
                "gpu_temp": 60.0,
                "fan_speed": 1200
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let publisher = TelemetryPublisher::new(&collector_for(&server)).unwrap();
        publisher.publish(&sample_reading()).await.unwrap();
    }

    #[tokio::test]
    async fn test_publish_rejects_non_200_without_retry() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/update"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let publisher = TelemetryPublisher::new(&collector_for(&server)).unwrap();
        let err = publisher.publish(&sample_reading()).await.unwrap_err();

        match err {
            AgentError::UnexpectedStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected UnexpectedStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_publish_accepts_only_200() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/update"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let publisher = TelemetryPublisher::new(&collector_for(&server)).unwrap();
        let err = publisher.publish(&sample_reading()).await.unwrap_err();

        assert!(matches!(
            err,
            AgentError::UnexpectedStatus { status: 201, .. }
        ));
    }

    #[tokio::test]
    async fn test_publish_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/update"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let publisher = TelemetryPublisher::new(&collector_for(&server)).unwrap();
        let err = publisher.publish(&sample_reading()).await.unwrap_err();

        match err {
            AgentError::Delivery(e) => assert!(e.is_timeout()),
            other => panic!("expected Delivery, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_publish_reports_connection_failure() {
        // Grab a port nobody is listening on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = CollectorConfig {
            host: "127.0.0.1".to_string(),
            port,
            api_key: "secret".to_string(),
            request_timeout_secs: 1,
        };

        let publisher = TelemetryPublisher::new(&config).unwrap();
        let err = publisher.publish(&sample_reading()).await.unwrap_err();

        assert!(err.is_connection_failure());
    }
}
