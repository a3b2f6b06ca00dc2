//! Chat panel protocol handler.
//!
//! Reads inbound messages as JSON lines and writes outbound messages the same
//! way. Errors from the dispatcher stop here: they are logged and the user gets
//! a generic failure reply.

use anyhow::Result;
use common::{SessionContext, SessionStore};
use router::AgentRouter;
use serde_json::Value;
use services::{ChatModel, QbraidApi};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::commands::select_model;
use crate::messages::{InboundMessage, InboundMessageType, OutboundMessage};

pub const FAILURE_REPLY: &str =
    "Sorry, something went wrong while processing your request. Please try again.";

pub struct ChatHandler<A: QbraidApi> {
    router: AgentRouter<A>,
    store: SessionStore,
    model: ChatModel,
}

impl<A: QbraidApi> ChatHandler<A> {
    pub fn new(router: AgentRouter<A>, store: SessionStore, model: ChatModel) -> Self {
        Self {
            router,
            store,
            model,
        }
    }

    pub fn model(&self) -> &ChatModel {
        &self.model
    }

    pub fn router(&self) -> &AgentRouter<A> {
        &self.router
    }

    /// Serves messages until the reader is exhausted.
    pub async fn run<R, W>(&mut self, reader: R, writer: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(&line) {
                Ok(value) => self.handle_message(&value, writer).await?,
                Err(e) => warn!(error = %e, "Discarding line that is not JSON"),
            }
        }
        info!("Chat input closed");
        Ok(())
    }

    /// Handles one inbound message. Only writer failures are returned.
    pub async fn handle_message<W>(&mut self, raw: &Value, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let Some(message) = InboundMessage::parse(raw) else {
            warn!(message = %raw, "Received message that is not a chat message");
            return Ok(());
        };
        debug!(message_type = ?message.message_type, "Inbound message");

        match message.message_type {
            InboundMessageType::UserMessage => {
                let Some(content) = message.content.filter(|c| !c.is_empty()) else {
                    return Ok(());
                };
                emit(writer, &OutboundMessage::bot_thinking()).await?;
                let reply = match self.answer(&content).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        error!(error = %e, "Failed to process user request");
                        FAILURE_REPLY.to_string()
                    }
                };
                emit(writer, &OutboundMessage::bot_message(reply)).await?;
            }
            InboundMessageType::GetChatModel => {
                emit(writer, &OutboundMessage::chat_model(&self.model.model)).await?;
            }
            InboundMessageType::ChangeChatModel => {
                if let Err(e) = self.change_model(message.content.as_deref()).await {
                    error!(error = %e, "Failed to change chat model");
                }
                emit(writer, &OutboundMessage::chat_model(&self.model.model)).await?;
            }
        }
        Ok(())
    }

    async fn answer(&self, content: &str) -> Result<String> {
        // re-read so a toggle from another command applies to the next message
        let context: SessionContext = self.store.load()?.context();
        let reply = self
            .router
            .process_user_request(context, &self.model, content)
            .await?;
        Ok(reply)
    }

    async fn change_model(&mut self, requested: Option<&str>) -> Result<()> {
        let models = self.router.api().get_chat_models().await?;
        if let Some(model) = select_model(&models, requested) {
            self.store.set_chat_model(&model.model)?;
            info!(model = %model.model, "Chat model changed");
            self.model = model;
        } else {
            warn!("No chat models offered, keeping current model");
        }
        Ok(())
    }
}

async fn emit<W: AsyncWrite + Unpin>(writer: &mut W, message: &OutboundMessage) -> Result<()> {
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}
