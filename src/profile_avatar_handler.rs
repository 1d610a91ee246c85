use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{error, info};

use crate::avatar_fetcher::AvatarFetcher;
use crate::error::ProxyError;
use crate::gravatar::{parse_size, GravatarUrlBuilder};
use crate::request_meta::RequestMeta;
use crate::signal_store::{Signal, SignalStore};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProfileQuery {
    pub email: Option<String>,
    pub ref_id: Option<String>,
    pub size: Option<String>,
}

impl ProfileQuery {
    /// Build from decoded query pairs. A repeated key keeps its first value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "email" => &mut query.email,
                "refId" => &mut query.ref_id,
                "size" => &mut query.size,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// Shared handler state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub urls: GravatarUrlBuilder,
    pub fetcher: AvatarFetcher,
    /// `None` disables signal recording
    pub signals: Option<Arc<dyn SignalStore>>,
}

impl AppState {
    pub fn new(
        urls: GravatarUrlBuilder,
        fetcher: AvatarFetcher,
        signals: Option<Arc<dyn SignalStore>>,
    ) -> Self {
        Self {
            urls,
            fetcher,
            signals,
        }
    }
}

pub async fn profile_avatar_handler(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    // Pair decoding is lossy rather than strict, so this only fails on
    // input that cannot be split into pairs at all
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_else(|e| {
        info!("Unreadable query string, treating as empty - {}", e);
        Vec::new()
    });
    let params = ProfileQuery::from_pairs(pairs);

    match serve_avatar(&state, params, &headers).await {
        Ok(bytes) => image_response(bytes),
        Err(ProxyError::MissingParams) => {
            info!("Avatar request rejected: missing email or refId");
            ProxyError::MissingParams.into_response()
        }
        Err(e) => {
            error!("Avatar request failed: {}", e);
            e.into_response()
        }
    }
}

/// Validate, record the signal, then fetch. A failed signal write stops the
/// request before any upstream call is made.
async fn serve_avatar(
    state: &AppState,
    params: ProfileQuery,
    headers: &HeaderMap,
) -> Result<Bytes, ProxyError> {
    let (Some(email), Some(ref_id)) = (params.email, params.ref_id) else {
        return Err(ProxyError::MissingParams);
    };

    let size = parse_size(params.size.as_deref());
    let avatar_url = state.urls.avatar_url(&email, size);
    info!("Avatar URL for refId {}: {}", ref_id, avatar_url);

    if let Some(signals) = &state.signals {
        let meta = RequestMeta::new(headers);
        let signal = Signal {
            ref_id,
            ip: meta.client_ip_or_unavailable(),
            user_agent: meta.user_agent_or_unavailable(),
        };
        signals.insert(&signal).await?;
    }

    Ok(state.fetcher.fetch(&avatar_url).await?)
}

fn image_response(bytes: Bytes) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (header::CONTENT_LENGTH, bytes.len().to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        bytes,
    )
        .into_response()
}
