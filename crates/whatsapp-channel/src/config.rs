//! Configuration types for the WhatsApp transports.

use std::env;

use crate::error::ChannelError;

/// Default Twilio REST API base URL.
pub const TWILIO_API_URL: &str = "https://api.twilio.com";

/// Twilio's shared WhatsApp sandbox number.
pub const TWILIO_SANDBOX_NUMBER: &str = "+14155238886";

/// Default Graph API base URL.
pub const GRAPH_API_URL: &str = "https://graph.facebook.com";

/// Default Graph API version.
pub const GRAPH_API_VERSION: &str = "v21.0";

/// Configuration for the Twilio WhatsApp transport.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Account SID, used in request paths and as the basic-auth user.
    pub account_sid: String,
    /// Auth token, the basic-auth password.
    pub auth_token: String,
    /// WhatsApp-enabled sender number in E.164 form.
    pub whatsapp_number: String,
    /// REST API base URL.
    pub api_url: String,
}

impl TwilioConfig {
    /// Create a configuration for the given credentials.
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            whatsapp_number: TWILIO_SANDBOX_NUMBER.to_string(),
            api_url: TWILIO_API_URL.to_string(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `TWILIO_ACCOUNT_SID`
    /// - `TWILIO_AUTH_TOKEN`
    ///
    /// Optional environment variables:
    /// - `TWILLIO_WHATSAPP_NUMBER` or `TWILIO_WHATSAPP_NUMBER` - sender
    ///   number (default: the sandbox number +14155238886)
    /// - `TWILIO_API_URL` - default: https://api.twilio.com
    pub fn from_env() -> Result<Self, ChannelError> {
        let account_sid = required("TWILIO_ACCOUNT_SID")?;
        let auth_token = required("TWILIO_AUTH_TOKEN")?;

        let whatsapp_number = env::var("TWILLIO_WHATSAPP_NUMBER")
            .or_else(|_| env::var("TWILIO_WHATSAPP_NUMBER"))
            .unwrap_or_else(|_| TWILIO_SANDBOX_NUMBER.to_string());

        Ok(Self {
            account_sid,
            auth_token,
            whatsapp_number,
            api_url: env::var("TWILIO_API_URL").unwrap_or_else(|_| TWILIO_API_URL.to_string()),
        })
    }

    /// Create a new config builder.
    pub fn builder(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> TwilioConfigBuilder {
        TwilioConfigBuilder {
            config: Self::new(account_sid, auth_token),
        }
    }

    /// Get the message creation endpoint.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_url.trim_end_matches('/'),
            self.account_sid
        )
    }
}

/// Builder for TwilioConfig.
#[derive(Debug)]
pub struct TwilioConfigBuilder {
    config: TwilioConfig,
}

impl TwilioConfigBuilder {
    /// Set the sender number.
    pub fn whatsapp_number(mut self, number: impl Into<String>) -> Self {
        self.config.whatsapp_number = number.into();
        self
    }

    /// Set the REST API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> TwilioConfig {
        self.config
    }
}

/// Configuration for the WhatsApp Cloud API transport.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Business phone number ID messages are sent from.
    pub phone_number_id: String,
    /// Graph API access token.
    pub access_token: String,
    /// Token expected in the webhook subscription handshake.
    pub verify_token: Option<String>,
    /// Graph API version segment, e.g. "v21.0".
    pub api_version: String,
    /// Graph API base URL.
    pub graph_url: String,
}

impl CloudConfig {
    /// Create a configuration for the given credentials.
    pub fn new(phone_number_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            phone_number_id: phone_number_id.into(),
            access_token: access_token.into(),
            verify_token: None,
            api_version: GRAPH_API_VERSION.to_string(),
            graph_url: GRAPH_API_URL.to_string(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `WHATSAPP_PHONE_NUMBER_ID`
    /// - `WHATSAPP_ACCESS_TOKEN`
    ///
    /// Optional environment variables:
    /// - `WHATSAPP_VERIFY_TOKEN` - without it every handshake is refused
    /// - `WHATSAPP_API_VERSION` - default: v21.0
    /// - `WHATSAPP_GRAPH_URL` - default: https://graph.facebook.com
    pub fn from_env() -> Result<Self, ChannelError> {
        Ok(Self {
            phone_number_id: required("WHATSAPP_PHONE_NUMBER_ID")?,
            access_token: required("WHATSAPP_ACCESS_TOKEN")?,
            verify_token: env::var("WHATSAPP_VERIFY_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            api_version: env::var("WHATSAPP_API_VERSION")
                .unwrap_or_else(|_| GRAPH_API_VERSION.to_string()),
            graph_url: env::var("WHATSAPP_GRAPH_URL")
                .unwrap_or_else(|_| GRAPH_API_URL.to_string()),
        })
    }

    /// Create a new config builder.
    pub fn builder(
        phone_number_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> CloudConfigBuilder {
        CloudConfigBuilder {
            config: Self::new(phone_number_id, access_token),
        }
    }

    /// Get the base URL including the API version.
    pub fn versioned_url(&self) -> String {
        format!("{}/{}", self.graph_url.trim_end_matches('/'), self.api_version)
    }

    /// Get the messages endpoint for the configured phone number.
    pub fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.versioned_url(), self.phone_number_id)
    }

    /// Get the metadata endpoint for an uploaded media object.
    pub fn media_url(&self, media_id: &str) -> String {
        format!("{}/{}", self.versioned_url(), media_id)
    }
}

/// Builder for CloudConfig.
#[derive(Debug)]
pub struct CloudConfigBuilder {
    config: CloudConfig,
}

impl CloudConfigBuilder {
    /// Set the handshake verify token.
    pub fn verify_token(mut self, token: impl Into<String>) -> Self {
        self.config.verify_token = Some(token.into());
        self
    }

    /// Set the Graph API version.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    /// Set the Graph API base URL.
    pub fn graph_url(mut self, url: impl Into<String>) -> Self {
        self.config.graph_url = url.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CloudConfig {
        self.config
    }
}

fn required(var: &str) -> Result<String, ChannelError> {
    env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ChannelError::Config(format!("{} not set", var)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twilio_urls() {
        let config = TwilioConfig::builder("AC123", "secret")
            .api_url("http://localhost:9000/")
            .build();

        assert_eq!(config.whatsapp_number, "+14155238886");
        assert_eq!(
            config.messages_url(),
            "http://localhost:9000/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn test_cloud_urls() {
        let config = CloudConfig::new("10987", "token");

        assert_eq!(
            config.messages_url(),
            "https://graph.facebook.com/v21.0/10987/messages"
        );
        assert_eq!(config.media_url("m-1"), "https://graph.facebook.com/v21.0/m-1");
        assert!(config.verify_token.is_none());
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_vars() {
            for var in [
                "TWILIO_ACCOUNT_SID",
                "TWILIO_AUTH_TOKEN",
                "TWILLIO_WHATSAPP_NUMBER",
                "TWILIO_WHATSAPP_NUMBER",
                "TWILIO_API_URL",
                "WHATSAPP_PHONE_NUMBER_ID",
                "WHATSAPP_ACCESS_TOKEN",
                "WHATSAPP_VERIFY_TOKEN",
                "WHATSAPP_API_VERSION",
                "WHATSAPP_GRAPH_URL",
            ] {
                std::env::remove_var(var);
            }
        }

        // Scenario 1: nothing configured
        clear_all_vars();
        match TwilioConfig::from_env() {
            Err(ChannelError::Config(msg)) => assert!(msg.contains("TWILIO_ACCOUNT_SID")),
            other => panic!("Expected Config error, got {:?}", other),
        }
        match CloudConfig::from_env() {
            Err(ChannelError::Config(msg)) => assert!(msg.contains("WHATSAPP_PHONE_NUMBER_ID")),
            other => panic!("Expected Config error, got {:?}", other),
        }

        // Scenario 2: Twilio with the misspelled number variable
        clear_all_vars();
        std::env::set_var("TWILIO_ACCOUNT_SID", "AC123");
        std::env::set_var("TWILIO_AUTH_TOKEN", "secret");
        std::env::set_var("TWILLIO_WHATSAPP_NUMBER", "+15550001111");
        let config = TwilioConfig::from_env().unwrap();
        assert_eq!(config.account_sid, "AC123");
        assert_eq!(config.whatsapp_number, "+15550001111");
        assert_eq!(config.api_url, TWILIO_API_URL);

        // Scenario 3: Cloud with overrides
        clear_all_vars();
        std::env::set_var("WHATSAPP_PHONE_NUMBER_ID", "10987");
        std::env::set_var("WHATSAPP_ACCESS_TOKEN", "token");
        std::env::set_var("WHATSAPP_VERIFY_TOKEN", "hunter2");
        std::env::set_var("WHATSAPP_API_VERSION", "v20.0");
        let config = CloudConfig::from_env().unwrap();
        assert_eq!(config.verify_token.as_deref(), Some("hunter2"));
        assert_eq!(
            config.messages_url(),
            "https://graph.facebook.com/v20.0/10987/messages"
        );

        clear_all_vars();
    }
}
