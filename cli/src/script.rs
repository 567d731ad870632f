//! Navigation scripts: scene declarations plus the steps to replay.
//!
//! ```toml
//! launch = "list"
//!
//! [[scene]]
//! name = "list"
//! mode = "single_task"
//!
//! [[scene]]
//! name = "favorites"
//! ancestors = ["list"]
//!
//! [[step]]
//! op = "push"
//! scene = "list"
//!
//! [[step]]
//! op = "push"
//! scene = "picker"
//! args = { result = "red" }
//! request_code = 7
//!
//! [[step]]
//! op = "pop"
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use stage_core::{LaunchMode, SceneArgs};

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Scene pushed when the stage starts without a saved record.
    #[serde(default)]
    pub launch: Option<String>,
    #[serde(default, rename = "scene")]
    pub scenes: Vec<SceneDecl>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneDecl {
    pub name: String,
    #[serde(default)]
    pub mode: LaunchMode,
    #[serde(default)]
    pub ancestors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Push {
        scene: String,
        #[serde(default)]
        args: Option<SceneArgs>,
        /// Ask for a result on behalf of the current top scene.
        #[serde(default)]
        request_code: Option<i32>,
    },
    /// Clear the stack down to a single `scene`.
    Root {
        scene: String,
        #[serde(default)]
        args: Option<SceneArgs>,
    },
    /// Pops `tag`, or the current top when absent.
    Pop {
        #[serde(default)]
        tag: Option<String>,
    },
    Refresh,
    Back,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid script {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let script: Script = toml::from_str(content)?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        for (index, decl) in self.scenes.iter().enumerate() {
            if decl.name.trim().is_empty() {
                bail!("scene #{index} has an empty name");
            }
            if self.scenes[..index].iter().any(|other| other.name == decl.name) {
                bail!("scene `{}` is declared twice", decl.name);
            }
        }
        if let Some(launch) = &self.launch
            && !self.scenes.iter().any(|decl| &decl.name == launch)
        {
            bail!("launch scene `{launch}` is not declared");
        }
        Ok(())
    }
}
