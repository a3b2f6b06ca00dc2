use anyhow::{anyhow, Result};
use clap::Args;
use common::SessionStore;
use console::style;
use services::{ChatModel, QbraidApi};
use tracing::{info, warn};

#[derive(Debug, Args)]
pub struct ModelsCommand {
    /// Model to use for chat; unknown names fall back to the first model
    #[arg(short, long)]
    pub select: Option<String>,
}

impl ModelsCommand {
    pub async fn execute(self, api: &impl QbraidApi, store: &SessionStore) -> Result<()> {
        let models = api.get_chat_models().await?;
        let current = store.load()?.chat_model;

        match self.select {
            Some(name) => {
                let model = select_model(&models, Some(&name))
                    .ok_or_else(|| anyhow!("No chat models available"))?;
                if model.model != name {
                    warn!(requested = %name, fallback = %model.model, "Unknown chat model");
                }
                store.set_chat_model(&model.model)?;
                info!(model = %model.model, "Chat model selected");
                println!("Chat model set to {}", style(&model.model).cyan().bold());
            }
            None => print_models(&models, current.as_deref()),
        }
        Ok(())
    }
}

/// The named model if offered, otherwise the first one.
pub fn select_model(models: &[ChatModel], name: Option<&str>) -> Option<ChatModel> {
    name.and_then(|name| models.iter().find(|m| m.model == name))
        .or_else(|| models.first())
        .cloned()
}

/// Model for a chat turn: the stored choice while it is still offered.
pub async fn resolve_model(api: &impl QbraidApi, store: &SessionStore) -> Result<ChatModel> {
    let models = api.get_chat_models().await?;
    let stored = store.load()?.chat_model;
    select_model(&models, stored.as_deref()).ok_or_else(|| anyhow!("No chat models available"))
}

fn print_models(models: &[ChatModel], current: Option<&str>) {
    if models.is_empty() {
        println!("{}", style("No chat models available").yellow());
        return;
    }
    for model in models {
        let marker = if Some(model.model.as_str()) == current {
            style("*").green().bold()
        } else {
            style(" ")
        };
        println!(
            "{marker} {}  {}",
            style(&model.model).cyan().bold(),
            style(&model.description).dim()
        );
        println!(
            "    input {} / output {} per {}",
            model.pricing.input, model.pricing.output, model.pricing.units
        );
    }
}
