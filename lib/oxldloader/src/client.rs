use crate::loader::{DocumentFetcher, DocumentRequest, FetchedResponse};
use oxhttp::model::Request;
use oxhttp::model::header::{ACCEPT, CONTENT_TYPE, LINK, USER_AGENT};
use std::error::Error;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

/// Default [`DocumentFetcher`] built on top of [oxhttp](https://crates.io/crates/oxhttp).
///
/// Redirects are followed up to `redirection_limit`. Unlike a transport
/// failure, a non-2xx response is returned as-is: the loader decides on the
/// content type alone.
#[derive(Clone)]
pub struct Client {
    client: Arc<oxhttp::Client>,
}

impl Client {
    pub fn new(timeout: Option<Duration>, redirection_limit: usize) -> Self {
        let mut client = oxhttp::Client::new().with_redirection_limit(redirection_limit);
        if let Some(timeout) = timeout {
            client = client.with_global_timeout(timeout);
        }
        Self {
            client: Arc::new(client),
        }
    }
}

impl DocumentFetcher for Client {
    fn fetch(
        &self,
        request: &DocumentRequest<'_>,
    ) -> Result<FetchedResponse, Box<dyn Error + Send + Sync>> {
        let request = Request::builder()
            .uri(request.url)
            .header(ACCEPT, request.accept)
            .header(USER_AGENT, request.user_agent)
            .body(())?;
        let response = self.client.request(request)?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| value.to_str())
            .transpose()?
            .unwrap_or_default()
            .to_owned();
        let mut link_headers = Vec::new();
        for value in response.headers().get_all(LINK) {
            link_headers.push(value.to_str()?.to_owned());
        }
        let mut body = Vec::new();
        response.into_body().read_to_end(&mut body)?;
        Ok(FetchedResponse {
            content_type,
            link_headers,
            body,
        })
    }
}
