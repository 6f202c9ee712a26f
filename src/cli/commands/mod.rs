
use crate::automod::{DispatchPipeline, FileRuleSource, RuleStore, RuleTable, WebhookCache};
use crate::automod::rules::example_rules;
use crate::config::{Config, load_config};
use crate::discord::{DiscordRest, run_gateway};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "barnacle")]
#[command(about = "Discord AutoMod responder", version = crate::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and respond to AutoMod keyword hits
    Run {
        /// Path to config.json (defaults to ~/.barnacle/config.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write a default config and an example rule file
    Init,
    /// Show the configured automod rules
    Rules {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            run_command(config.as_deref()).await?;
        }
        Commands::Init => {
            init_command()?;
        }
        Commands::Rules { config } => {
            rules_command(config.as_deref()).await?;
        }
    }

    Ok(())
}

async fn run_command(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    if config.discord.token.is_empty() {
        anyhow::bail!(
            "No Discord token configured. Set discord.token in config.json or BARNACLE_DISCORD_TOKEN"
        );
    }

    info!(
        rules = %config.automod.rules_path().display(),
        webhook = %config.automod.webhook_name,
        "starting automod responder"
    );
    let pipeline = build_pipeline(&config);
    run_gateway(&config.discord.token, pipeline).await
}

/// Wire the pipeline to the Discord REST API and the configured rule file.
pub(crate) fn build_pipeline(config: &Config) -> Arc<DispatchPipeline> {
    let rest = Arc::new(DiscordRest::new(
        config.discord.token.clone(),
        &config.discord.api_base_url,
        config.automod.http_timeout(),
    ));
    let rules = RuleStore::new(Arc::new(FileRuleSource::new(config.automod.rules_path())));
    let webhooks = Arc::new(WebhookCache::with_settings(
        rest.clone(),
        config.automod.webhook_name.clone(),
        config.automod.webhook_cache_ttl(),
    ));
    Arc::new(DispatchPipeline::new(
        rules,
        webhooks,
        rest.clone(),
        rest.clone(),
        rest,
    ))
}

fn init_command() -> Result<()> {
    println!("Initializing barnacle...");

    let config_path = crate::config::get_config_path()?;
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        println!("Overwrite? (y/N): ");
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if input.trim().eq_ignore_ascii_case("y") {
            write_default_config(&config_path)?;
        }
    } else {
        write_default_config(&config_path)?;
    }

    let config = load_config(Some(&config_path))?;
    let rules_path = config.automod.rules_path();
    if write_example_rules(&rules_path)? {
        println!("✓ Created example rules at {}", rules_path.display());
    } else {
        println!("Rules already exist at {}", rules_path.display());
    }

    println!("\nNext steps:");
    println!("  1. Add your bot token to {}", config_path.display());
    println!("  2. Map your AutoMod rule ids to messages in {}", rules_path.display());
    println!("  3. Start: barnacle run");

    Ok(())
}

fn write_default_config(path: &Path) -> Result<()> {
    crate::config::save_config(&Config::default(), Some(path))?;
    println!("✓ Created config at {}", path.display());
    Ok(())
}

/// Write the example rule table unless a rule file already exists. Returns whether it wrote.
pub(crate) fn write_example_rules(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        crate::utils::ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(&example_rules())?;
    crate::utils::atomic_write(path, &json)
        .with_context(|| format!("Failed to write example rules to {}", path.display()))?;
    Ok(true)
}

async fn rules_command(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let source = FileRuleSource::new(config.automod.rules_path());
    let rules = crate::automod::RuleConfigSource::read_all(&source).await?;
    println!("Rules from {}:", source.path().display());
    print!("{}", format_rules(&rules));
    Ok(())
}

/// One line per rule, sorted by rule id.
pub(crate) fn format_rules(rules: &RuleTable) -> String {
    if rules.is_empty() {
        return "  (none)\n".to_string();
    }
    let mut ids: Vec<&String> = rules.keys().collect();
    ids.sort();
    let mut out = String::new();
    for id in ids {
        let rule = &rules[id];
        out.push_str(&format!("  {}  {:?} → {}\n", id, rule.trigger, rule.message));
    }
    out
}
