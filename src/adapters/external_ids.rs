//! IMDb identifier lookup via the external IDs endpoint.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, warn};

use super::http::Transport;
use super::tmdb::TmdbClient;
use crate::domain::ContentKind;

#[derive(Debug, Deserialize)]
struct ExternalIdsBody {
    imdb_id: Option<String>,
}

impl<T: Transport> TmdbClient<T> {
    /// Look up the IMDb id for a TMDb id.
    ///
    /// Any failure (transport, status, body, missing or empty field) is
    /// logged and reported as `None`.
    pub async fn resolve_imdb_id(&self, tmdb_id: u64, kind: ContentKind) -> Option<String> {
        let url = self.url(&format!("/{}/{}/external_ids", kind.api_segment(), tmdb_id));

        let mut params = BTreeMap::new();
        params.insert("api_key".to_string(), self.settings.api_key.clone());

        let reply = match self.transport.get(&url, &params).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(tmdb_id, %kind, error = %e, "External IDs request failed");
                return None;
            }
        };

        if !reply.is_success() {
            warn!(
                tmdb_id,
                %kind,
                status = reply.status,
                "External IDs lookup returned error status"
            );
            return None;
        }

        let body: ExternalIdsBody = match serde_json::from_str(&reply.body) {
            Ok(body) => body,
            Err(e) => {
                warn!(tmdb_id, %kind, error = %e, "Invalid JSON in external IDs response");
                return None;
            }
        };

        let imdb_id = body.imdb_id.filter(|id| !id.trim().is_empty());
        if imdb_id.is_none() {
            debug!(tmdb_id, %kind, "No IMDb id");
        }
        imdb_id
    }
}
