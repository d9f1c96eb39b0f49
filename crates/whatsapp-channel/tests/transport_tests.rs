//! HTTP behavior of the transports against a mock provider.

use brain_core::MediaRef;
use orchestrator::{Channel, OrchestratorError};
use whatsapp_channel::{ChannelError, CloudChannel, CloudConfig, TwilioChannel, TwilioConfig};
use wiremock::matchers::{bearer_token, body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn twilio(server: &MockServer) -> TwilioChannel {
    let config = TwilioConfig::builder("AC123", "secret")
        .whatsapp_number("+14155238886")
        .api_url(server.uri())
        .build();
    TwilioChannel::new(config).unwrap()
}

fn cloud(server: &MockServer) -> CloudChannel {
    let config = CloudConfig::builder("10987", "graph-token")
        .graph_url(server.uri())
        .build();
    CloudChannel::new(config).unwrap()
}

mod twilio_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_text_adds_whatsapp_prefixes() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            .and(header("authorization", "Basic QUMxMjM6c2VjcmV0"))
            .and(body_string_contains("From=whatsapp%3A%2B14155238886"))
            .and(body_string_contains("To=whatsapp%3A%2B15551234567"))
            .and(body_string_contains("Body=Hello+there"))
            .respond_with(
                ResponseTemplate::new(201).set_body_string(r#"{"sid": "SM1", "status": "queued"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        twilio(&server)
            .send_text("whatsapp:+15551234567", "Hello there")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_image_uses_media_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            .and(body_string_contains(
                "MediaUrl=https%3A%2F%2Fimg.example%2Fcat.png",
            ))
            .and(body_string_contains("Body=Generated+image%3A+a+cat"))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"sid": "SM2"}"#))
            .expect(1)
            .mount(&server)
            .await;

        twilio(&server)
            .send_image(
                "+15551234567",
                "https://img.example/cat.png",
                Some("Generated image: a cat"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_error_is_send_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"code": 21211, "message": "Invalid 'To' Phone Number", "status": 400}"#,
            ))
            .mount(&server)
            .await;

        let channel = twilio(&server);
        match channel.create_message("+1", Some("hi"), None).await {
            Err(ChannelError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert!(message.contains("21211"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }

        assert!(matches!(
            channel.send_text("+1", "hi").await,
            Err(OrchestratorError::SendFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_media_with_basic_auth() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/media/ME1"))
            .and(header("authorization", "Basic QUMxMjM6c2VjcmV0"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(vec![1u8, 2, 3], "audio/ogg"),
            )
            .mount(&server)
            .await;

        let media = MediaRef::new(format!("{}/media/ME1", server.uri()), None);
        let data = twilio(&server).fetch_media(&media).await.unwrap();

        assert_eq!(data.bytes, vec![1, 2, 3]);
        assert_eq!(data.mime_type, "audio/ogg");
    }

    #[tokio::test]
    async fn test_fetch_media_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let media = MediaRef::new(format!("{}/media/gone", server.uri()), None);
        assert!(matches!(
            twilio(&server).fetch_media(&media).await,
            Err(OrchestratorError::MediaUnavailable(_))
        ));
    }
}

mod cloud_tests {
    use super::*;

    #[tokio::test]
    async fn test_send_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v21.0/10987/messages"))
            .and(bearer_token("graph-token"))
            .and(body_json(serde_json::json!({
                "messaging_product": "whatsapp",
                "to": "15551234567",
                "type": "text",
                "text": {"preview_url": false, "body": "Hello"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"messaging_product": "whatsapp", "messages": [{"id": "wamid.OUT"}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let id = cloud(&server)
            .send_message("15551234567", "Hello")
            .await
            .unwrap();
        assert_eq!(id.as_deref(), Some("wamid.OUT"));
    }

    #[tokio::test]
    async fn test_mark_read() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v21.0/10987/messages"))
            .and(body_json(serde_json::json!({
                "messaging_product": "whatsapp",
                "status": "read",
                "message_id": "wamid.IN"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success": true}"#))
            .expect(1)
            .mount(&server)
            .await;

        cloud(&server).mark_read("wamid.IN").await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_media_resolves_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v21.0/media-9"))
            .and(bearer_token("graph-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": format!("{}/download/media-9", server.uri()),
                "mime_type": "audio/ogg"
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/download/media-9"))
            .and(bearer_token("graph-token"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8, 8, 7]))
            .mount(&server)
            .await;

        let data = cloud(&server)
            .fetch_media(&MediaRef::new("media-9", None))
            .await
            .unwrap();

        assert_eq!(data.bytes, vec![9, 8, 7]);
        assert_eq!(data.mime_type, "audio/ogg");
    }

    #[tokio::test]
    async fn test_graph_error_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"error": {"message": "Invalid OAuth access token.", "type": "OAuthException", "code": 190}}"#,
            ))
            .mount(&server)
            .await;

        match cloud(&server).send_message("15551234567", "hi").await {
            Err(ChannelError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid OAuth access token.");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }
}
