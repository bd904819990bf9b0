#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/oxigraph/oxigraph/main/logo.svg")]

#[cfg(feature = "http-client")]
mod client;
mod error;
mod json;
mod link;
mod loader;

#[cfg(feature = "http-client")]
pub use client::Client;
pub use error::{JsonLdLoaderError, JsonLdLoaderErrorCode};
pub use json::{JsonNode, JsonNodeParser};
pub use link::{
    JSON_LD_CONTEXT_REL, LinkRecord, alternate_links, context_links, parse_link_headers,
};
pub use loader::{
    DocumentFetcher, DocumentParser, DocumentRequest, FetchedResponse, JSON_LD_MEDIA_TYPE,
    JSON_MEDIA_TYPE, JsonLdDocumentLoader, JsonLdRemoteDocument, is_acceptable_media_type,
    normalize_media_type,
};

const MAX_ALTERNATE_HOPS: usize = 8;
