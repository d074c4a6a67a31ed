// ABOUTME: reqwest client for the chat and upload webhooks.
// ABOUTME: One shared connection pool, one attempt per call, status and body checks only.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};

use crate::config::{Endpoints, HttpConfig};
use crate::error::WebhookError;
use crate::webhook::{ChatEndpoint, ChatReply, ChatRequest, UploadEndpoint, UploadPayload};

#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: Client,
    chat_url: Url,
    upload_url: Url,
}

impl WebhookClient {
    pub fn new(endpoints: Endpoints, config: &HttpConfig) -> Result<Self, WebhookError> {
        let mut builder = Client::builder()
            .user_agent(concat!("hookdesk/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            chat_url: endpoints.chat,
            upload_url: endpoints.upload,
        })
    }

    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }
}

#[async_trait]
impl ChatEndpoint for WebhookClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, WebhookError> {
        let resp = self
            .http
            .post(self.chat_url.clone())
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WebhookError::Status {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        let value: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| WebhookError::Decode(e.to_string()))?;
        Ok(ChatReply::from_value(&value))
    }
}

#[async_trait]
impl UploadEndpoint for WebhookClient {
    async fn upload(&self, payload: UploadPayload) -> Result<(), WebhookError> {
        let file_part = Part::bytes(payload.bytes)
            .file_name(payload.filename.clone())
            .mime_str("application/octet-stream")?;

        let form = Form::new()
            .part("file", file_part)
            .text("filename", payload.filename)
            .text("size", payload.size.to_string());

        let resp = self
            .http
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WebhookError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
