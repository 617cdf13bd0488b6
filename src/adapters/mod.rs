//! Adapters for the remote metadata API.
//!
//! `http` is the transport seam, `tmdb` the listing client and
//! `external_ids` the per-item IMDb lookup.

pub mod external_ids;
pub mod http;
pub mod tmdb;

pub use http::{HttpReply, ReqwestTransport, Transport, TransportError};
pub use tmdb::{ClientSettings, FetchError, TmdbClient, DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
