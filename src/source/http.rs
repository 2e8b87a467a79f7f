//! JSON-over-HTTP implementation of the collaborator traits.
//!
//! All endpoints hang off a single base URL (e.g.
//! `https://news.example.com/api`).  Every non-2xx status is turned into an
//! error so callers only ever see `Ok` for a successful round trip.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::debug;
use url::Url;

use super::{
    NewsFetcher, ReadStatePersistence, Section, SectionCatalog, SectionId, SectionWithNews,
};

/// Client for the news API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base: Url,
    /// Bearer token attached to every request when present.
    token: Option<String>,
}

impl HttpClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` — API root, e.g. `http://localhost:5000/api`.
    /// * `token` — optional bearer token for authenticated endpoints.
    /// * `timeout` — per-request timeout applied by reqwest.
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid API url {base_url:?}"))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("API url {base_url:?} cannot be used as a base"));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base,
            token,
        })
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("API url cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn post_command(&self, segments: &[&str]) -> Result<()> {
        let url = self.endpoint(segments)?;
        debug!(%url, "POST");
        self.authorize(self.client.post(url))
            .json(&serde_json::json!({}))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl NewsFetcher for HttpClient {
    async fn get_news_by_sections(&self, section_ids: &[SectionId]) -> Result<Vec<SectionWithNews>> {
        let url = self.endpoint(&["news", "by-sections"])?;
        debug!(%url, sections = ?section_ids, "fetching news");
        let sections = self
            .authorize(self.client.post(url))
            .json(section_ids)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(sections)
    }
}

#[async_trait]
impl ReadStatePersistence for HttpClient {
    async fn mark_as_read(&self, item_id: &str) -> Result<()> {
        self.post_command(&["news", "mark-as-read", item_id]).await
    }

    async fn mark_link_clicked(&self, item_id: &str) -> Result<()> {
        self.post_command(&["news", "mark-link-clicked", item_id])
            .await
    }
}

#[async_trait]
impl SectionCatalog for HttpClient {
    async fn get_sections(&self) -> Result<Vec<Section>> {
        let url = self.endpoint(&["sections"])?;
        let sections = self
            .authorize(self.client.get(url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(sections)
    }

    async fn get_user_sections(&self) -> Result<Vec<SectionId>> {
        let url = self.endpoint(&["userpreferences", "sections"])?;
        let ids = self
            .authorize(self.client.get(url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(ids)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> HttpClient {
        HttpClient::new(
            &format!("{}/api", server.uri()),
            token.map(String::from),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn fetches_news_for_selected_sections() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/news/by-sections"))
            .and(body_json(json!([1, 2])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "sectionId": 1,
                    "sectionName": "World",
                    "news": [{
                        "id": "n1",
                        "title": "t",
                        "summary": "s",
                        "link": "https://a.com/1",
                        "publishedAt": "2025-01-01T00:00:00Z",
                        "sectionId": 1,
                        "sourceUrl": "https://a.com",
                        "isRead": true
                    }]
                }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let sections = client.get_news_by_sections(&[1, 2]).await.unwrap();

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section_name, "World");
        assert!(sections[0].news[0].is_read);
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/news/by-sections"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(client.get_news_by_sections(&[1]).await.is_err());
    }

    #[tokio::test]
    async fn mark_commands_hit_item_endpoints() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/news/mark-as-read/abc"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/news/mark-link-clicked/abc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        client.mark_as_read("abc").await.unwrap();
        client.mark_link_clicked("abc").await.unwrap();
    }

    #[tokio::test]
    async fn mark_as_read_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/news/mark-as-read/abc"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(client.mark_as_read("abc").await.is_err());
    }

    #[tokio::test]
    async fn loads_directory_and_user_selection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sections"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"id": 1, "name": "world_news"}])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/userpreferences/sections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([3, 1])))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let sections = client.get_sections().await.unwrap();
        assert_eq!(sections[0].name, "world_news");
        assert_eq!(client.get_user_sections().await.unwrap(), vec![3, 1]);
    }

    #[test]
    fn endpoint_encodes_item_ids() {
        let client =
            HttpClient::new("http://localhost:5000/api/", None, Duration::from_secs(1)).unwrap();
        let url = client.endpoint(&["news", "mark-as-read", "a/b c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/news/mark-as-read/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(HttpClient::new("not a url", None, Duration::from_secs(1)).is_err());
    }
}
