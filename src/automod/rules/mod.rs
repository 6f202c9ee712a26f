use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error};

/// A keyword rule this handler reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Keyword the AutoMod rule is expected to match.
    pub trigger: String,
    /// Warning template; supports `{user}`, `{keyword}` and `{content}`.
    pub message: String,
}

/// Rule id → rule.
pub type RuleTable = HashMap<String, Rule>;

#[async_trait]
pub trait RuleConfigSource: Send + Sync {
    async fn read_all(&self) -> Result<RuleTable>;
}

/// Reads the rule table from a JSON object file: `{ "<ruleId>": { "trigger", "message" } }`.
pub struct FileRuleSource {
    path: PathBuf,
}

impl FileRuleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RuleConfigSource for FileRuleSource {
    async fn read_all(&self) -> Result<RuleTable> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read rules from {}", self.path.display()))?;
        parse_rules(&raw)
            .with_context(|| format!("Failed to parse rules JSON from {}", self.path.display()))
    }
}

pub fn parse_rules(raw: &str) -> Result<RuleTable> {
    Ok(serde_json::from_str(raw)?)
}

/// Rule table access for the dispatch pipeline.
///
/// Reloads from the source on every call so edits apply to the next event without a restart.
#[derive(Clone)]
pub struct RuleStore {
    source: Arc<dyn RuleConfigSource>,
}

impl RuleStore {
    pub fn new(source: Arc<dyn RuleConfigSource>) -> Self {
        Self { source }
    }

    /// Load the rule table. Failures are logged and yield an empty table.
    pub async fn load(&self) -> RuleTable {
        match self.source.read_all().await {
            Ok(rules) => {
                debug!("loaded {} automod rules", rules.len());
                rules
            }
            Err(e) => {
                let err = crate::errors::BarnacleError::RuleLoad(format!("{:#}", e));
                error!("{}", err);
                RuleTable::new()
            }
        }
    }
}

/// Trim and lowercase a keyword for comparison.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

/// Example rule file written by `barnacle init`.
pub fn example_rules() -> RuleTable {
    let mut rules = RuleTable::new();
    rules.insert(
        "000000000000000000".to_string(),
        Rule {
            trigger: "spam".to_string(),
            message: "{user} your message was hidden because it matched `{keyword}`.".to_string(),
        },
    );
    rules
}
