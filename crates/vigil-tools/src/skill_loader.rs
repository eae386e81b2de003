// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{error, warn};
use vigil_model::{Skill, SkillSummary};

/// Discovers and loads skills from a directory of `<name>/SKILL.md` files.
/// Loaded skills are cached by name; discovery itself is not cached, since
/// the directory may gain new skills between heartbeats.
pub struct SkillLoader {
    skills_dir: PathBuf,
    cache: Mutex<HashMap<String, Skill>>,
}

impl SkillLoader {
    pub fn new(skills_dir: impl Into<PathBuf>) -> Self {
        Self {
            skills_dir: skills_dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Brief summaries of every skill found under `skills_dir`.
    pub fn discover_skills(&self) -> Vec<SkillSummary> {
        let mut summaries = Vec::new();
        if !self.skills_dir.exists() {
            warn!(dir = %self.skills_dir.display(), "skills directory does not exist");
            return summaries;
        }

        for skill_file in find_skill_files(&self.skills_dir) {
            match std::fs::read_to_string(&skill_file) {
                Ok(content) => {
                    let data = parse_frontmatter(&content);
                    if let Some(name) = data.get("name") {
                        let description = data.get("description").cloned().unwrap_or_default();
                        summaries.push(SkillSummary {
                            name: name.clone(),
                            description,
                        });
                    }
                }
                Err(e) => error!(file = %skill_file.display(), error = %e, "failed to read skill"),
            }
        }
        summaries
    }

    /// Load the full instructions for a named skill, caching the result.
    pub fn load_skill(&self, name: &str) -> Option<Skill> {
        if let Some(cached) = self.cache.lock().unwrap().get(name) {
            return Some(cached.clone());
        }

        for skill_file in find_skill_files(&self.skills_dir) {
            let Ok(content) = std::fs::read_to_string(&skill_file) else {
                continue;
            };
            let data = parse_frontmatter(&content);
            if data.get("name").map(|s| s.as_str()) != Some(name) {
                continue;
            }
            let description = data.get("description").cloned().unwrap_or_default();
            let skill_dir = skill_file
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            let skill = Skill {
                name: name.to_string(),
                skill_dir,
                description,
                instructions: content,
            };
            self.cache
                .lock()
                .unwrap()
                .insert(name.to_string(), skill.clone());
            return Some(skill);
        }
        None
    }
}

fn find_skill_files(skills_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let Ok(entries) = std::fs::read_dir(skills_dir) else {
        return files;
    };
    for entry in entries.flatten() {
        let candidate = entry.path().join("SKILL.md");
        if candidate.is_file() {
            files.push(candidate);
        }
    }
    files
}

/// Minimal `--- key: value ---` frontmatter parser, deliberately limited to
/// scalar string values since that is all a skill's header ever carries.
fn parse_frontmatter(content: &str) -> HashMap<String, String> {
    let mut data = HashMap::new();
    let Some(rest) = content.strip_prefix("---") else {
        return data;
    };
    let Some(end) = rest.find("\n---") else {
        return data;
    };
    for line in rest[..end].lines() {
        let line = line.trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        data.insert(key.trim().to_string(), value.to_string());
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_skill(dir: &Path, name: &str, description: &str, body: &str) {
        let skill_dir = dir.join(name);
        std::fs::create_dir_all(&skill_dir).unwrap();
        std::fs::write(
            skill_dir.join("SKILL.md"),
            format!("---\nname: {name}\ndescription: {description}\n---\n{body}"),
        )
        .unwrap();
    }

    #[test]
    fn discovers_skills_with_summaries() {
        let dir = tempfile::tempdir().unwrap();
        write_skill(dir.path(), "deploy", "deploys the app", "do the deploy");
        let loader = SkillLoader::new(dir.path());
        let summaries = loader.discover_skills();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "deploy");
        assert_eq!(summaries[0].description, "deploys the app");
    }

    #[test]
    fn missing_directory_yields_no_skills() {
        let loader = SkillLoader::new("/nonexistent/path/for/skills");
        assert!(loader.discover_skills().is_empty());
    }

    #[test]
    fn loads_full_instructions_by_name() {
        let dir = tempfile::tempdir().unwrap();
        write_skill(dir.path(), "deploy", "deploys the app", "steps here");
        let loader = SkillLoader::new(dir.path());
        let skill = loader.load_skill("deploy").unwrap();
        assert_eq!(skill.name, "deploy");
        assert!(skill.instructions.contains("steps here"));
    }

    #[test]
    fn unknown_skill_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let loader = SkillLoader::new(dir.path());
        assert!(loader.load_skill("nope").is_none());
    }

    #[test]
    fn load_skill_caches_result() {
        let dir = tempfile::tempdir().unwrap();
        write_skill(dir.path(), "deploy", "deploys the app", "v1");
        let loader = SkillLoader::new(dir.path());
        let first = loader.load_skill("deploy").unwrap();
        std::fs::write(
            dir.path().join("deploy").join("SKILL.md"),
            "---\nname: deploy\ndescription: deploys the app\n---\nv2",
        )
        .unwrap();
        let second = loader.load_skill("deploy").unwrap();
        assert_eq!(first.instructions, second.instructions);
    }
}
