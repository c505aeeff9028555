//! Synthesis context
//!
//! A [`Stack`] collects resource and output declarations for one template;
//! the [`App`] owns the stacks and writes the synthesized templates to the
//! output directory. This is the only place in the crate that touches the
//! filesystem.

use crate::error::Result;
use crate::template::{Output, Resource, Tag, Template};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

const DEFAULT_OUT_DIR: &str = "sky.out";

/// Target account and region a stack is synthesized for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployEnv {
    pub account: String,
    pub region: String,
}

/// A deployable stack being assembled
#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    env: DeployEnv,
    tags: Vec<Tag>,
    template: Template,
}

impl Stack {
    pub fn new(name: impl Into<String>, description: impl Into<String>, env: DeployEnv) -> Self {
        Self {
            name: name.into(),
            env,
            tags: Vec::new(),
            template: Template::new(Some(description.into())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &DeployEnv {
        &self.env
    }

    /// Tag every taggable resource of this stack at synthesis time
    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.push(Tag::new(key, value));
    }

    pub fn add_resource(&mut self, id: impl Into<String>, resource: Resource) {
        self.template.resources.insert(id.into(), resource);
    }

    pub fn add_output(&mut self, id: impl Into<String>, output: Output) {
        self.template.outputs.insert(id.into(), output);
    }

    pub fn resource_count(&self) -> usize {
        self.template.resources.len()
    }

    /// Finalize the stack: propagate stack tags and hand over the template
    pub fn into_template(mut self) -> Template {
        for resource in self.template.resources.values_mut() {
            if resource.taggable {
                resource.apply_tags(&self.tags);
            }
        }
        self.template
    }
}

/// Root of a synthesis run
#[derive(Debug)]
pub struct App {
    out_dir: PathBuf,
    stacks: Vec<Stack>,
}

impl App {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            stacks: Vec::new(),
        }
    }

    pub fn add_stack(&mut self, stack: Stack) {
        self.stacks.push(stack);
    }

    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    /// Write one `<stack-name>.template.json` per stack and return the
    /// written paths, in stack order
    pub fn synth(self) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.out_dir)?;

        let mut written = Vec::with_capacity(self.stacks.len());
        for stack in self.stacks {
            let name = stack.name().to_string();
            let resource_count = stack.resource_count();
            let template = stack.into_template();

            let path = self.out_dir.join(format!("{name}.template.json"));
            std::fs::write(&path, template.to_json_pretty()?)?;

            info!(
                stack = %name,
                resources = resource_count,
                path = %path.display(),
                "template written"
            );
            written.push(path);
        }

        Ok(written)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(DEFAULT_OUT_DIR)
    }
}
