//! Client for the reporting backend.

use crate::core::{DateRange, LoadedReport, RawReservation};
use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;

pub const REPORT_PATH: &str = "/api/group-allotment-report";
pub const RESERVATIONS_PATH: &str = "/api/reservations";

/// The backend operations the dashboard depends on
#[allow(async_fn_in_trait)]
pub trait AllotmentApi {
    /// Fetch the group allotment report for a date range
    async fn fetch_report(&self, range: &DateRange) -> Result<LoadedReport, AppError>;

    /// Fetch the reservations bound to one allotment block.
    ///
    /// Issues one request per call; results are never cached.
    async fn fetch_reservations(&self, block_code: &str)
        -> Result<Vec<RawReservation>, AppError>;
}

/// `{success, data?, error?}` wrapper used by every backend endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<Option<T>, AppError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(AppError::Application(
                self.error.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Envelope<T>, AppError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(AppError::transport)?;

        let status = response.status();
        log::info!("{} - Status: {}", path, status.as_u16());
        if !status.is_success() {
            return Err(AppError::http_status(status));
        }

        let body = response.text().await.map_err(AppError::transport)?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl AllotmentApi for HttpApi {
    async fn fetch_report(&self, range: &DateRange) -> Result<LoadedReport, AppError> {
        let envelope: Envelope<Box<RawValue>> = self
            .get(
                REPORT_PATH,
                &[
                    ("start_date", range.start_date.as_str()),
                    ("end_date", range.end_date.as_str()),
                ],
            )
            .await?;

        let raw = envelope.into_result()?.ok_or_else(|| {
            AppError::Application("Report response contained no data".to_string())
        })?;
        let loaded = LoadedReport::from_raw(raw)?;
        log::info!(
            "Report {} with {} groups",
            range.display(),
            loaded.report.groups.len()
        );
        Ok(loaded)
    }

    async fn fetch_reservations(
        &self,
        block_code: &str,
    ) -> Result<Vec<RawReservation>, AppError> {
        let envelope: Envelope<Vec<RawReservation>> = self
            .get(RESERVATIONS_PATH, &[("allotmentBlockCode", block_code)])
            .await?;

        let reservations = envelope.into_result()?.unwrap_or_default();
        log::info!(
            "Found {} reservations for allotment block {}",
            reservations.len(),
            block_code
        );
        Ok(reservations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    #[test]
    fn envelope_failure_surfaces_backend_error() {
        let envelope: Envelope<Vec<RawReservation>> =
            serde_json::from_str(r#"{"success": false, "error": "allotmentBlockCode parameter is required"}"#)
                .unwrap();
        let err = envelope.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Error: allotmentBlockCode parameter is required");
    }

    #[test]
    fn envelope_success_without_data_is_empty() {
        let envelope: Envelope<Vec<RawReservation>> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(envelope.into_result().unwrap().unwrap_or_default().is_empty());
    }

    #[test]
    fn report_envelope_keeps_raw_payload() {
        let body = r#"{"success": true, "data": {"groups": [],  "summary": {"total_groups": 0}}}"#;
        let envelope: Envelope<Box<RawValue>> = serde_json::from_str(body).unwrap();
        let raw = envelope.into_result().unwrap().unwrap();
        let loaded = LoadedReport::from_raw(raw).unwrap();
        assert_eq!(
            loaded.raw_json(),
            r#"{"groups": [],  "summary": {"total_groups": 0}}"#
        );
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let api = HttpApi::new("http://127.0.0.1:5000/");
        assert_eq!(api.base_url, "http://127.0.0.1:5000");
    }

    /// Answer a single HTTP request with `status` and `body`; the handle yields the request head
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn server_error_carries_status_code() {
        let (url, server) = serve_once("500 Internal Server Error", "oops").await;
        let err = HttpApi::new(url)
            .fetch_reservations("ACME-JUN")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(
            err.to_string(),
            "Network error: HTTP 500: Internal Server Error"
        );
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/reservations?allotmentBlockCode=ACME-JUN "));
    }

    #[tokio::test]
    async fn backend_failure_is_application_error() {
        let (url, _server) = serve_once(
            "200 OK",
            r#"{"success": false, "error": "API credentials not configured."}"#,
        )
        .await;
        let err = HttpApi::new(url)
            .fetch_reservations("ACME-JUN")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Application(_)));
        assert_eq!(err.to_string(), "Error: API credentials not configured.");
    }

    #[tokio::test]
    async fn missing_or_empty_data_is_no_reservations() {
        for body in [r#"{"success": true}"#, r#"{"success": true, "data": []}"#] {
            let (url, _server) = serve_once("200 OK", body).await;
            let reservations = HttpApi::new(url).fetch_reservations("ACME-OFF").await.unwrap();
            assert!(reservations.is_empty());
        }
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let (url, _server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let err = HttpApi::new(url)
            .fetch_reservations("ACME-JUN")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn report_fetch_sends_range_and_keeps_payload() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"success": true, "data": {"date_range": {"start_date": "2025-06-01", "end_date": "2025-07-01"}, "groups": []}}"#,
        )
        .await;
        let loaded = HttpApi::new(url)
            .fetch_report(&DateRange::new("2025-06-01", "2025-07-01"))
            .await
            .unwrap();

        assert_eq!(
            loaded.raw_json(),
            r#"{"date_range": {"start_date": "2025-06-01", "end_date": "2025-07-01"}, "groups": []}"#
        );
        let request = server.await.unwrap();
        assert!(request.starts_with(
            "GET /api/group-allotment-report?start_date=2025-06-01&end_date=2025-07-01 "
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_has_no_status() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpApi::new(format!("http://{}", addr))
            .fetch_reservations("ACME-JUN")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Request { status: None, .. }));
        assert!(err.to_string().starts_with("Network error: "));
    }
}
