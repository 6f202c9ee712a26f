use crate::automod::{ActorHint, DispatchOutcome, DispatchPipeline, ModerationEvent};
use anyhow::Result;
use serenity::model::guild::automod::ActionExecution;
use serenity::model::user::User;
use serenity::async_trait as serenity_async_trait;
use serenity::model::gateway::{GatewayIntents, Ready};
use serenity::prelude::*;
use std::sync::Arc;

/// Intents the responder needs: AutoMod executions plus message content, so the
/// execution payload carries the flagged text.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::AUTO_MODERATION_EXECUTION
}

struct Handler {
    pipeline: Arc<DispatchPipeline>,
}

#[serenity_async_trait]
impl EventHandler for Handler {
    async fn auto_moderation_action_execution(&self, ctx: Context, execution: ActionExecution) {
        // The cache ref must not live across an await.
        let actor = ctx.cache.user(execution.user_id).map(|user| actor_hint(&user));
        let event = moderation_event(&execution, actor);

        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(async move {
            match pipeline.handle(&event).await {
                DispatchOutcome::Filtered(reason) => {
                    tracing::trace!(rule_id = %event.rule_id, "automod event ignored: {:?}", reason);
                }
                DispatchOutcome::Delivered | DispatchOutcome::Failed(_) => {}
            }
        });
    }

    async fn ready(&self, _: Context, ready: Ready) {
        tracing::info!(
            "Discord bot connected as {} (id: {})",
            ready.user.name,
            ready.user.id
        );
    }
}

/// Convert a gateway AutoMod execution into the pipeline's event record.
pub fn moderation_event(execution: &ActionExecution, actor: Option<ActorHint>) -> ModerationEvent {
    ModerationEvent {
        guild_id: Some(execution.guild_id.to_string()),
        channel_id: execution.channel_id.map(|id| id.to_string()),
        user_id: execution.user_id.to_string(),
        rule_id: execution.rule_id.to_string(),
        matched_keyword: execution.matched_keyword.clone(),
        matched_content: execution.matched_content.clone(),
        // Without the MESSAGE_CONTENT intent Discord sends an empty string.
        content: Some(execution.content.clone()).filter(|c| !c.is_empty()),
        actor,
    }
}

pub fn actor_hint(user: &User) -> ActorHint {
    ActorHint {
        global_name: user.global_name.clone(),
        username: Some(user.name.clone()),
        avatar_url: user.avatar_url(),
    }
}

/// Connect to the gateway and feed AutoMod executions to `pipeline` until Ctrl-C.
pub async fn run_gateway(token: &str, pipeline: Arc<DispatchPipeline>) -> Result<()> {
    if token.is_empty() {
        return Err(anyhow::anyhow!("Discord token is empty"));
    }

    tracing::info!("Connecting to Discord gateway...");
    let mut client = Client::builder(token, intents())
        .event_handler(Handler { pipeline })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create Discord client: {}", e);
            anyhow::anyhow!("Failed to create Discord client: {}", e)
        })?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutting down Discord client");
        shard_manager.shutdown_all().await;
    });

    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client connection error: {}", e))
}
