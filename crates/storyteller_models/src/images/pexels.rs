use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use storyteller_error::{ProviderError, ProviderErrorKind, StorytellerResult};
use storyteller_interface::{ImageProvider, RetryCallback};
use tracing::{debug, instrument};

const PROVIDER: &str = "pexels";

/// Size variants a Pexels photo is offered in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PhotoSources {
    /// Landscape crop
    pub landscape: Option<String>,
    /// Double-width large rendition
    pub large2x: Option<String>,
    /// Large rendition
    pub large: Option<String>,
    /// Uploaded original
    pub original: Option<String>,
    /// Medium rendition
    pub medium: Option<String>,
}

impl PhotoSources {
    /// First non-empty URL in the order landscape, large2x, large, original, medium.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyteller_models::PhotoSources;
    ///
    /// let sources = PhotoSources {
    ///     large: Some("https://images.pexels.com/large.jpg".into()),
    ///     medium: Some("https://images.pexels.com/medium.jpg".into()),
    ///     ..Default::default()
    /// };
    /// assert_eq!(sources.usable_url(), Some("https://images.pexels.com/large.jpg"));
    /// ```
    pub fn usable_url(&self) -> Option<&str> {
        [
            &self.landscape,
            &self.large2x,
            &self.large,
            &self.original,
            &self.medium,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|url| !url.is_empty())
    }
}

/// One search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StockPhoto {
    /// Renditions of the photo
    #[serde(default)]
    pub src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<StockPhoto>,
}

/// The two calls a stock photo provider needs.
#[async_trait]
pub trait StockPhotoApi: Send + Sync {
    /// Search for landscape photos matching `query`, at most one result.
    async fn search(&self, query: &str) -> StorytellerResult<Vec<StockPhoto>>;

    /// Fetch the bytes behind `url`.
    async fn download(&self, url: &str) -> StorytellerResult<Vec<u8>>;
}

/// HTTP implementation of [`StockPhotoApi`] for api.pexels.com.
#[derive(Debug, Clone)]
pub struct PexelsApi {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl PexelsApi {
    /// Creates an API client against the search `endpoint`.
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl StockPhotoApi for PexelsApi {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> StorytellerResult<Vec<StockPhoto>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("per_page", "1"), ("orientation", "landscape")])
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .send()
            .await
            .map_err(|e| ProviderError::request(PROVIDER, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::request(PROVIDER, e))?;
        if !status.is_success() {
            return Err(ProviderError::api(PROVIDER, status.as_u16(), text).into());
        }

        let search: SearchResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::new(ProviderErrorKind::MalformedResponse {
                provider: PROVIDER.to_string(),
                message: e.to_string(),
            })
        })?;
        debug!(count = search.photos.len(), "Search returned photos");
        Ok(search.photos)
    }

    #[instrument(skip(self))]
    async fn download(&self, url: &str) -> StorytellerResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Download(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(ProviderErrorKind::Download(format!(
                "HTTP {}: {}",
                status.as_u16(),
                text
            )))
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Download(e.to_string())))?;
        Ok(bytes.to_vec())
    }
}

/// Stock photo search used as an image source.
///
/// The prompt is the search query; the first hit is downloaded verbatim.
#[derive(Debug, Clone)]
pub struct PexelsProvider<A = PexelsApi> {
    api: A,
}

impl<A: StockPhotoApi> PexelsProvider<A> {
    /// Creates a provider over `api`.
    pub fn new(api: A) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<A: StockPhotoApi> ImageProvider for PexelsProvider<A> {
    #[instrument(skip(self, _on_retry), fields(provider = PROVIDER))]
    async fn resolve(
        &self,
        prompt: &str,
        _on_retry: RetryCallback<'_>,
    ) -> StorytellerResult<Vec<u8>> {
        let photos = self.api.search(prompt).await?;
        let photo = photos
            .first()
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::NoResults))?;
        let url = photo
            .src
            .usable_url()
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::NoUsableUrl))?;

        debug!(url, "Downloading stock photo");
        self.api.download(url).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
