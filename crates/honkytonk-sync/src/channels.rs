//! Channel registration shared by the admin API and the CLI.

use honkytonk_core::{
    models::{Channel, CreateChannelRequest},
    AppError,
};
use honkytonk_db::ChannelRepository;
use honkytonk_sources::{parse_channel_input, ChannelRef, ResolvedChannel, YouTubeApiClient};

#[derive(Clone)]
pub struct ChannelRegistry {
    channels: ChannelRepository,
    youtube_api: Option<YouTubeApiClient>,
}

impl ChannelRegistry {
    pub fn new(channels: ChannelRepository, youtube_api: Option<YouTubeApiClient>) -> Self {
        Self {
            channels,
            youtube_api,
        }
    }

    /// Resolve the request's channel input and insert it. A channel that is already
    /// registered yields `AppError::Conflict`.
    #[tracing::instrument(skip(self, request), fields(channel.input = %request.channel))]
    pub async fn register(&self, request: &CreateChannelRequest) -> Result<Channel, AppError> {
        let resolved = self.resolve(request).await?;
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&resolved.title);

        let channel = self
            .channels
            .create(
                &resolved.channel_id,
                name,
                resolved.handle.as_deref(),
                request.category.unwrap_or_default(),
            )
            .await?;

        tracing::info!(
            channel_id = %channel.channel_id,
            name = %channel.name,
            "Channel registered"
        );
        Ok(channel)
    }

    /// Turn user input into a channel id and display title.
    ///
    /// Raw `UC…` ids need no API call. Handles and URLs pointing at handles require the
    /// YouTube Data API; without a key they are rejected as not configured.
    pub async fn resolve(&self, request: &CreateChannelRequest) -> Result<ResolvedChannel, AppError> {
        let channel_ref = parse_channel_input(&request.channel)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        match channel_ref {
            ChannelRef::Id(channel_id) => {
                let wants_title = request.name.is_none();
                match (&self.youtube_api, wants_title) {
                    (Some(api), true) => match api.resolve_channel(&channel_id).await {
                        Ok(resolved) => Ok(resolved),
                        Err(e) => {
                            tracing::warn!(
                                error = %e,
                                channel_id = %channel_id,
                                "Could not look up channel title, using the id"
                            );
                            Ok(unresolved(channel_id))
                        }
                    },
                    _ => Ok(unresolved(channel_id)),
                }
            }
            ChannelRef::Handle(handle) => {
                let api = self.youtube_api.as_ref().ok_or_else(|| {
                    AppError::NotConfigured(format!(
                        "YOUTUBE_API_KEY is required to resolve {}; pass a UC… channel id instead",
                        handle
                    ))
                })?;
                Ok(api.resolve_channel(&handle).await?)
            }
        }
    }
}

fn unresolved(channel_id: String) -> ResolvedChannel {
    ResolvedChannel {
        title: channel_id.clone(),
        channel_id,
        handle: None,
    }
}
