//! Shared handler state.

use std::sync::Arc;

use orchestrator::{ConversationRegistry, Orchestrator, RelayConfig, Services};
use tracing::info;
use whatsapp_channel::{CloudChannel, CloudConfig, TwilioChannel, TwilioConfig};

/// One orchestrator per configured transport, sharing a registry.
#[derive(Clone, Default)]
pub struct AppState {
    pub twilio: Option<Arc<Orchestrator<TwilioChannel>>>,
    pub cloud: Option<Arc<Orchestrator<CloudChannel>>>,
}

impl AppState {
    /// Create state with no transports.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the Twilio webhooks through `orchestrator`.
    pub fn with_twilio(mut self, orchestrator: Orchestrator<TwilioChannel>) -> Self {
        self.twilio = Some(Arc::new(orchestrator));
        self
    }

    /// Serve the Cloud API webhooks through `orchestrator`.
    pub fn with_cloud(mut self, orchestrator: Orchestrator<CloudChannel>) -> Self {
        self.cloud = Some(Arc::new(orchestrator));
        self
    }

    /// Enable each transport whose credentials are present in the environment.
    pub fn from_env(
        services: Services,
        registry: Arc<ConversationRegistry>,
        config: Arc<RelayConfig>,
    ) -> Result<Self, whatsapp_channel::ChannelError> {
        let mut state = Self::new();

        match TwilioConfig::from_env() {
            Ok(twilio) => {
                let channel = TwilioChannel::new(twilio)?;
                state = state.with_twilio(Orchestrator::new(
                    channel,
                    services.clone(),
                    registry.clone(),
                    config.clone(),
                ));
            }
            Err(e) => info!("Twilio transport disabled: {}", e),
        }

        match CloudConfig::from_env() {
            Ok(cloud) => {
                let channel = CloudChannel::new(cloud)?;
                state = state.with_cloud(Orchestrator::new(channel, services, registry, config));
            }
            Err(e) => info!("Cloud API transport disabled: {}", e),
        }

        Ok(state)
    }

    /// Whether at least one transport is configured.
    pub fn has_transport(&self) -> bool {
        self.twilio.is_some() || self.cloud.is_some()
    }
}
