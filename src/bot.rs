//! Gateway event handler: command dispatch and report delivery.
//!
//! Two equivalent entry points run the same pipeline: the prefix text command
//! (`<prefix>rere <channel>`) and the `/rere` slash command. Everything here
//! is thin glue around resolve -> fetch -> extract -> render.

use std::path::PathBuf;

use serenity::async_trait;
use serenity::builder::{
    CreateAttachment, CreateCommand, CreateCommandOption, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, CreateMessage,
};
use serenity::client::{Context, EventHandler};
use serenity::model::application::{
    Command, CommandDataOptionValue, CommandInteraction, CommandOptionType, Interaction,
};
use serenity::model::channel::{ChannelType, Message};
use serenity::model::gateway::Ready;
use tracing::{error, info};
use uuid::Uuid;

use crate::core::config::{AppConfig, ReportMode};
use crate::core::models::ExtractedReaction;
use crate::discord::DiscordClient;
use crate::errors::BotError;
use crate::extractor::extract_reactions;
use crate::fetcher::fetch_all_messages;
use crate::render::{render_counts, render_html, report_file_stem};
use crate::resolver::{self, ChannelCandidate, ResolvedChannel};

pub struct Handler {
    config: AppConfig,
}

impl Handler {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    async fn handle_text_command(&self, ctx: &Context, msg: &Message, reference: &str) {
        let correlation_id = Uuid::new_v4().to_string();
        info!(
            correlation_id = %correlation_id,
            reference = %reference,
            user = %msg.author.tag(),
            "rere text command received"
        );

        let candidates = cache_candidates(ctx);
        let channel = match resolver::resolve_channel(reference, msg.guild_id, &candidates) {
            Ok(channel) => channel,
            Err(e) => {
                info!(correlation_id = %correlation_id, error = %e, "channel resolution failed");
                reply_text(ctx, msg, &invalid_channel_message(reference)).await;
                return;
            }
        };

        let reader = DiscordClient::new(ctx.http.clone());
        let messages = match fetch_all_messages(&reader, &channel).await {
            Ok(messages) => messages,
            Err(e) => {
                error!(
                    correlation_id = %correlation_id,
                    channel = %channel.name,
                    error = %e,
                    "history fetch failed"
                );
                reply_text(ctx, msg, &invalid_channel_message(reference)).await;
                return;
            }
        };

        let extracted = extract_reactions(&reader, &channel, &messages).await;

        if let Err(e) = self.deliver_to_message(ctx, msg, &channel, &extracted).await {
            error!(
                correlation_id = %correlation_id,
                channel = %channel.name,
                error = %e,
                "failed to deliver report"
            );
        }
    }

    async fn deliver_to_message(
        &self,
        ctx: &Context,
        msg: &Message,
        channel: &ResolvedChannel,
        extracted: &[ExtractedReaction],
    ) -> Result<(), BotError> {
        match self.config.report_mode {
            ReportMode::Html => {
                let html = render_html(extracted);
                let path = write_report(&self.config.output_dir, channel, &html).await?;
                let attachment = CreateAttachment::path(&path).await?;
                let builder = CreateMessage::new()
                    .content("Done!")
                    .reference_message(msg)
                    .add_file(attachment);
                msg.channel_id.send_message(&ctx.http, builder).await?;
            }
            ReportMode::Counts => {
                log_counts(channel, extracted);
                msg.reply(&ctx.http, counts_summary(extracted)).await?;
            }
        }
        Ok(())
    }

    async fn handle_slash_command(&self, ctx: &Context, command: &CommandInteraction) {
        let correlation_id = Uuid::new_v4().to_string();

        let ack = CreateInteractionResponseMessage::new()
            .content("Trying to find the channel and fetch its messages; please wait...")
            .ephemeral(true);
        if let Err(e) = command
            .create_response(&ctx.http, CreateInteractionResponse::Message(ack))
            .await
        {
            error!(correlation_id = %correlation_id, error = %e, "failed to acknowledge command");
            return;
        }

        // The channel option is required and restricted to guild text
        // channels at registration time.
        let reference = command
            .data
            .options
            .iter()
            .find_map(|opt| match &opt.value {
                CommandDataOptionValue::Channel(id) => Some(id.to_string()),
                _ => None,
            })
            .unwrap_or_default();
        info!(
            correlation_id = %correlation_id,
            reference = %reference,
            user = %command.user.tag(),
            "rere slash command received"
        );

        let candidates = cache_candidates(ctx);
        let channel = match resolver::resolve_channel(&reference, command.guild_id, &candidates) {
            Ok(channel) => channel,
            Err(e) => {
                info!(correlation_id = %correlation_id, error = %e, "channel resolution failed");
                let mention = format!("<#{}>", reference);
                followup_text(ctx, command, &invalid_channel_message(&mention)).await;
                return;
            }
        };

        let reader = DiscordClient::new(ctx.http.clone());
        let messages = match fetch_all_messages(&reader, &channel).await {
            Ok(messages) => messages,
            Err(e) => {
                error!(
                    correlation_id = %correlation_id,
                    channel = %channel.name,
                    error = %e,
                    "history fetch failed"
                );
                let mention = format!("<#{}>", reference);
                followup_text(ctx, command, &invalid_channel_message(&mention)).await;
                return;
            }
        };

        followup_text(
            ctx,
            command,
            "Messages fetched. Please wait a few minutes while their reactions are retrieved...",
        )
        .await;

        let extracted = extract_reactions(&reader, &channel, &messages).await;

        if let Err(e) = self
            .deliver_to_interaction(ctx, command, &channel, &extracted)
            .await
        {
            error!(
                correlation_id = %correlation_id,
                channel = %channel.name,
                error = %e,
                "failed to deliver report"
            );
        }
    }

    async fn deliver_to_interaction(
        &self,
        ctx: &Context,
        command: &CommandInteraction,
        channel: &ResolvedChannel,
        extracted: &[ExtractedReaction],
    ) -> Result<(), BotError> {
        match self.config.report_mode {
            ReportMode::Html => {
                let html = render_html(extracted);
                let path = write_report(&self.config.output_dir, channel, &html).await?;
                let attachment = CreateAttachment::path(&path).await?;
                let followup = CreateInteractionResponseFollowup::new()
                    .content("Done!")
                    .ephemeral(true)
                    .add_file(attachment);
                command.create_followup(&ctx.http, followup).await?;
            }
            ReportMode::Counts => {
                log_counts(channel, extracted);
                followup_text(ctx, command, &counts_summary(extracted)).await;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is online.", ready.user.tag());

        match Command::create_global_command(&ctx.http, rere_command()).await {
            Ok(cmd) => info!("Registered command: {}", cmd.name),
            Err(e) => error!("Failed to register command: {}", e),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(rest) = msg.content.strip_prefix(&self.config.command_prefix) else {
            return;
        };

        // Newlines in the command line are treated as spaces.
        let normalized = rest.replace('\n', " ");
        let mut args = normalized.split_whitespace();
        let Some(cmd) = args.next() else {
            return;
        };
        if !cmd.eq_ignore_ascii_case("rere") {
            return;
        }
        let reference = args.next().unwrap_or("").to_string();

        self.handle_text_command(&ctx, &msg, &reference).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            if command.data.name.eq_ignore_ascii_case("rere") {
                self.handle_slash_command(&ctx, &command).await;
            }
        }
    }
}

/// The `/rere` slash command definition, registered globally on ready.
fn rere_command() -> CreateCommand {
    CreateCommand::new("rere")
        .description("Retrieves information related to message reactions from a given channel.")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Channel,
                "channel",
                "The channel to retrieve message reactions information from.",
            )
            .required(true)
            .channel_types(vec![ChannelType::Text]),
        )
}

/// Write the rendered report under `output_dir`, creating the directory if
/// absent. The file name is `<guild>.<channel>.html` per the derivation in
/// [`report_file_stem`].
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub async fn write_report(
    output_dir: &str,
    channel: &ResolvedChannel,
    html: &str,
) -> Result<PathBuf, BotError> {
    tokio::fs::create_dir_all(output_dir).await?;
    let path = PathBuf::from(output_dir).join(format!(
        "{}.html",
        report_file_stem(&channel.guild_name, &channel.name)
    ));
    tokio::fs::write(&path, html).await?;
    Ok(path)
}

/// Flatten the cached text channels into resolution candidates.
fn cache_candidates(ctx: &Context) -> Vec<ChannelCandidate> {
    let mut candidates = Vec::new();
    for guild_id in ctx.cache.guilds() {
        let Some(guild) = ctx.cache.guild(guild_id) else {
            continue;
        };
        for channel in guild.channels.values() {
            if channel.kind == ChannelType::Text {
                candidates.push(ChannelCandidate {
                    id: channel.id,
                    name: channel.name.clone(),
                    guild_id,
                    guild_name: guild.name.clone(),
                });
            }
        }
    }
    candidates
}

fn invalid_channel_message(reference: &str) -> String {
    format!(
        "Channel {} is not a valid text channel on this server, or I cannot access its messages for some reason.",
        reference
    )
}

fn counts_summary(extracted: &[ExtractedReaction]) -> String {
    format!(
        "Done! Counted {} reaction(s); details are in the bot log.",
        extracted.len()
    )
}

fn log_counts(channel: &ResolvedChannel, extracted: &[ExtractedReaction]) {
    for line in render_counts(extracted).lines() {
        info!(channel = %channel.name, "{}", line);
    }
}

async fn reply_text(ctx: &Context, msg: &Message, text: &str) {
    if let Err(e) = msg.reply(&ctx.http, text).await {
        error!("Failed to send reply: {}", e);
    }
}

async fn followup_text(ctx: &Context, command: &CommandInteraction, text: &str) {
    let followup = CreateInteractionResponseFollowup::new()
        .content(text)
        .ephemeral(true);
    if let Err(e) = command.create_followup(&ctx.http, followup).await {
        error!("Failed to send followup: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_channel_message_names_the_reference() {
        let text = invalid_channel_message("<#555>");
        assert!(text.starts_with("Channel <#555> is not a valid text channel"));
    }

    #[test]
    fn counts_summary_reports_the_total() {
        assert_eq!(
            counts_summary(&[]),
            "Done! Counted 0 reaction(s); details are in the bot log."
        );
    }
}
