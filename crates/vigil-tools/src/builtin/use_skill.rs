// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::skill_loader::SkillLoader;
use crate::tool::{error, success, Tool};

/// Loads the full instructions for a named skill on demand.
pub struct UseSkillTool {
    loader: Arc<SkillLoader>,
}

impl UseSkillTool {
    pub fn new(loader: Arc<SkillLoader>) -> Self {
        Self { loader }
    }
}

#[async_trait]
impl Tool for UseSkillTool {
    fn name(&self) -> &str {
        "use_skill"
    }

    fn description(&self) -> &str {
        "Load instructions for a specialized skill. Use this when you \
         identify a relevant skill from your available skills list. Skills \
         provide detailed instructions for specific tasks."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "skill_name": {
                    "type": "string",
                    "description": "The name of the skill to load."
                }
            },
            "required": ["skill_name"]
        })
    }

    async fn call(&self, args: Value) -> anyhow::Result<Value> {
        let Some(skill_name) = args.get("skill_name").and_then(|v| v.as_str()) else {
            return Ok(error("missing 'skill_name'"));
        };

        match self.loader.load_skill(skill_name) {
            Some(skill) => Ok(success(json!({"skill": skill}))),
            None => Ok(error(format!("Skill '{skill_name}' not found"))),
        }
    }
}
