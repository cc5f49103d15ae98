pub mod api;
pub mod catalog;
pub mod fetch;
pub mod pages;
pub mod relay;
pub mod source;
pub mod sse;

pub use api::{ApiClient, DEFAULT_TIMEOUT};
pub use fetch::{FetchConfig, fetch_url};
pub use catalog::{Collection, CollectionGroup, CollectionOption, CollectionTree, ServerShortcut, SourceItem};
pub use relay::{DISPATCH_TIMEOUT, ShortcutRelay};
pub use source::{ByteStream, HttpStreamSource, ShortcutRequest, StreamSource};
pub use sse::{Frame, SseDecoder};
