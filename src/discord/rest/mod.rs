use crate::automod::dispatch::{
    AllowedMentions, ChannelPoster, MemberDirectory, ProxyChannel, ProxyMessage,
};
use crate::automod::identity::MemberProfile;
use crate::automod::webhook_cache::{ChannelIdentityDirectory, DeliveryIdentity, WebhookRecord};
use crate::discord::payload::{MemberResponse, MessagePayload};
use crate::utils::http::{ERROR_BODY_LIMIT, http_client, limited_text};
use anyhow::{Result, bail};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

/// Discord HTTP API client covering the calls the automod pipeline makes.
pub struct DiscordRest {
    token: String,
    base_url: String,
    client: Client,
}

impl DiscordRest {
    pub fn new(token: impl Into<String>, base_url: &str, timeout: Duration) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(timeout),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("Authorization", format!("Bot {}", self.token))
    }

    /// Send a request, stripping the URL from transport errors so webhook tokens embedded
    /// in paths never reach the logs.
    async fn execute(req: RequestBuilder, what: &str) -> Result<Response> {
        let resp = req
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Discord {} request failed: {}", what, e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = limited_text(resp, ERROR_BODY_LIMIT)
                .await
                .unwrap_or_default();
            bail!("Discord API {} {}: {}", what, status, body.trim());
        }
        Ok(resp)
    }

    async fn json<T: serde::de::DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
        resp.json::<T>()
            .await
            .map_err(|e| anyhow::anyhow!("Discord {} returned unexpected body: {}", what, e.without_url()))
    }
}

#[async_trait]
impl ChannelIdentityDirectory for DiscordRest {
    async fn list(&self, channel_id: &str) -> Result<Vec<WebhookRecord>> {
        let req = self.authed(
            self.client
                .get(self.url(&format!("/channels/{}/webhooks", channel_id))),
        );
        let resp = Self::execute(req, "list webhooks").await?;
        Self::json(resp, "list webhooks").await
    }

    async fn create(&self, channel_id: &str, name: &str) -> Result<WebhookRecord> {
        let req = self.authed(
            self.client
                .post(self.url(&format!("/channels/{}/webhooks", channel_id)))
                .json(&serde_json::json!({ "name": name })),
        );
        let resp = Self::execute(req, "create webhook").await?;
        Self::json(resp, "create webhook").await
    }
}

#[async_trait]
impl MemberDirectory for DiscordRest {
    async fn fetch(&self, guild_id: &str, user_id: &str) -> Result<MemberProfile> {
        let req = self.authed(
            self.client
                .get(self.url(&format!("/guilds/{}/members/{}", guild_id, user_id))),
        );
        let resp = Self::execute(req, "get member").await?;
        let member: MemberResponse = Self::json(resp, "get member").await?;
        Ok(member.into_profile(guild_id, user_id))
    }
}

#[async_trait]
impl ProxyChannel for DiscordRest {
    async fn send(&self, identity: &DeliveryIdentity, message: &ProxyMessage) -> Result<()> {
        // Webhook execution authenticates with the token in the path, not the bot token.
        let req = self
            .client
            .post(self.url(&format!("/webhooks/{}/{}", identity.id, identity.token)))
            .query(&[("wait", "true"), ("with_components", "true")])
            .json(&MessagePayload::impersonating(message));
        Self::execute(req, "execute webhook").await?;
        Ok(())
    }
}

#[async_trait]
impl ChannelPoster for DiscordRest {
    async fn post(
        &self,
        channel_id: &str,
        content: &str,
        mentions: &AllowedMentions,
    ) -> Result<()> {
        let req = self.authed(
            self.client
                .post(self.url(&format!("/channels/{}/messages", channel_id)))
                .json(&MessagePayload::text(content, mentions)),
        );
        Self::execute(req, "create message").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
