use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use super::DataSupplier;
use crate::config::Config;
use crate::errors::{PortalError, PortalResult};
use crate::models::{FieldDescriptor, Record};

/// Fetches fields from `{endpoint}/fields` and records from `{endpoint}`
pub struct HttpSupplier {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    rows_key: Option<String>,
}

impl HttpSupplier {
    pub fn new(config: &Config, endpoint: &str) -> PortalResult<Self> {
        let client = Client::builder()
            .user_agent(config.http.user_agent.as_str())
            .timeout(config.http_timeout())
            .build()?;

        let endpoint = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.trim_end_matches('/').to_string()
        } else {
            config.endpoint(endpoint).trim_end_matches('/').to_string()
        };

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            rows_key: None,
        })
    }

    /// Key holding the record list when the response is a wrapped object
    pub fn with_rows_key(mut self, key: &str) -> Self {
        self.rows_key = Some(key.to_string());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn fields_url(&self) -> String {
        format!("{}/fields", self.endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> PortalResult<T> {
        debug!("GET {}", url);
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::Rejected {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| PortalError::InvalidResponse {
            endpoint: url.to_string(),
            source,
        })
    }
}

/// Records come as a bare array or wrapped in an object such as `{"donors": [...]}`.
/// A wrapped object is read from `rows_key` when it holds a list, otherwise from
/// its first list value in document order.
pub fn extract_rows(endpoint: &str, body: Value, rows_key: Option<&str>) -> PortalResult<Vec<Record>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(map) => {
            let keyed = rows_key.filter(|key| map.get(*key).is_some_and(Value::is_array));
            map.into_iter()
                .find_map(|(key, value)| match value {
                    Value::Array(items) if keyed.map_or(true, |k| k == key) => Some(items),
                    _ => None,
                })
                .ok_or_else(|| PortalError::UnexpectedShape {
                    endpoint: endpoint.to_string(),
                    message: "object response holds no record list".to_string(),
                })?
        }
        other => {
            return Err(PortalError::UnexpectedShape {
                endpoint: endpoint.to_string(),
                message: format!("expected a list of records, got {}", other),
            })
        }
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value::<Record>(item).map_err(|source| PortalError::InvalidResponse {
                endpoint: endpoint.to_string(),
                source,
            })
        })
        .collect()
}

#[async_trait]
impl DataSupplier for HttpSupplier {
    fn name(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_fields(&self) -> PortalResult<Vec<FieldDescriptor>> {
        let fields: Vec<FieldDescriptor> = self.get_json(&self.fields_url()).await?;
        info!("Fetched {} fields from {}", fields.len(), self.endpoint);
        Ok(fields)
    }

    async fn fetch_rows(&self) -> PortalResult<Vec<Record>> {
        let body: Value = self.get_json(&self.endpoint).await?;
        extract_rows(&self.endpoint, body, self.rows_key.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supplier;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer one GET per response in order, returning the raw requests
    async fn serve_gets(
        responses: Vec<(&'static str, &'static str)>,
    ) -> (String, tokio::task::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status_line, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 4096];
                while !String::from_utf8_lossy(&request).contains("\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }

                let response = format!(
                    "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                requests.push(String::from_utf8_lossy(&request).to_string());
            }
            requests
        });

        (base, handle)
    }

    fn config_for(base: &str) -> Config {
        Config {
            api_url: base.to_string(),
            api_key: Some("secret-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_resolution() {
        let config = Config::default();
        let relative = HttpSupplier::new(&config, "/api/donors/").unwrap();
        assert_eq!(relative.endpoint(), "http://localhost:8000/api/donors");
        assert_eq!(relative.fields_url(), "http://localhost:8000/api/donors/fields");

        let absolute = HttpSupplier::new(&config, "https://portal.example.org/api/recipients").unwrap();
        assert_eq!(absolute.endpoint(), "https://portal.example.org/api/recipients");
    }

    #[test]
    fn test_extract_bare_array() {
        let rows = extract_rows("test", json!([{ "name": "A" }, { "name": "B", "amount": 10 }]), None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("amount"), Some("10"));
    }

    #[test]
    fn test_extract_wrapped_array() {
        let rows = extract_rows("test", json!({ "donors": [{ "name": "A" }] }), None).unwrap();
        assert_eq!(rows[0].get("name"), Some("A"));
    }

    #[test]
    fn test_extract_rejects_other_shapes() {
        assert!(matches!(
            extract_rows("test", json!({ "status": "ok" }), Some("donors")),
            Err(PortalError::UnexpectedShape { .. })
        ));
        assert!(matches!(
            extract_rows("test", json!("nope"), None),
            Err(PortalError::UnexpectedShape { .. })
        ));
        assert!(matches!(
            extract_rows("test", json!([1, 2]), None),
            Err(PortalError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_extract_prefers_rows_key() {
        let body = json!({ "recipients": [{ "name": "Maria" }], "audit": [] });
        let rows = extract_rows("test", body.clone(), Some("recipients")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some("Maria"));

        // without a key the first list in the response wins
        let rows = extract_rows("test", body, None).unwrap();
        assert_eq!(rows.len(), 1);

        let rows = extract_rows("test", json!({ "recipients": "n/a", "items": [{ "name": "B" }] }), Some("recipients")).unwrap();
        assert_eq!(rows[0].get("name"), Some("B"));
    }

    #[tokio::test]
    async fn test_load_fetches_fields_then_rows() {
        let (base, server) = serve_gets(vec![
            ("HTTP/1.1 200 OK", r#"[{"key":"name","label":"Recipient Name"}]"#),
            ("HTTP/1.1 200 OK", r#"{"recipients":[{"name":"Maria Garcia"}],"audit":[]}"#),
        ])
        .await;
        let http = HttpSupplier::new(&config_for(&base), "/api/recipients")
            .unwrap()
            .with_rows_key("recipients");

        let (fields, rows) = supplier::load(&http).await.unwrap();
        assert_eq!(fields[0].label, "Recipient Name");
        assert_eq!(rows[0].get("name"), Some("Maria Garcia"));

        let requests = server.await.unwrap();
        assert!(requests[0].starts_with("GET /api/recipients/fields "));
        assert!(requests[1].starts_with("GET /api/recipients "));
        assert!(requests
            .iter()
            .all(|r| r.to_lowercase().contains("authorization: bearer secret-key")));
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected() {
        let (base, server) = serve_gets(vec![("HTTP/1.1 401 Unauthorized", r#"{"detail":"no"}"#)]).await;
        let http = HttpSupplier::new(&config_for(&base), "/api/donors").unwrap();

        let result = http.fetch_fields().await;
        assert!(matches!(
            result,
            Err(PortalError::Rejected { status: 401, ref endpoint }) if endpoint.ends_with("/api/donors/fields")
        ));
        server.await.unwrap();
    }
}
