//! CloudFormation template model
//!
//! A minimal, serialization-oriented model of a CloudFormation template:
//! resources, outputs, tags, and the intrinsic functions the builders need.
//! Resources and outputs are kept in `BTreeMap`s so the emitted JSON is
//! byte-stable across synthesis runs.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

const FORMAT_VERSION: &str = "2010-09-09";

/// A single CloudFormation template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub resources: BTreeMap<String, Resource>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn new(description: Option<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            description,
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// All resources of the given CloudFormation type
    pub fn resources_of_type(&self, resource_type: &str) -> Vec<(&String, &Resource)> {
        self.resources
            .iter()
            .filter(|(_, r)| r.resource_type == resource_type)
            .collect()
    }

    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A resource declaration within a template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub depends_on: Vec<String>,

    pub properties: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<String>,

    /// Whether stack-level tags are propagated into this resource.
    /// Gateway attachments, routes, and endpoints do not take tags.
    #[serde(skip, default = "default_taggable")]
    pub taggable: bool,
}

fn default_taggable() -> bool {
    true
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            depends_on: Vec::new(),
            properties,
            deletion_policy: None,
            update_replace_policy: None,
            taggable: true,
        }
    }

    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.depends_on.push(id.into());
        self
    }

    /// Keep the resource when its declaration is removed or replaced
    pub fn retain(mut self) -> Self {
        self.deletion_policy = Some("Retain".to_string());
        self.update_replace_policy = Some("Retain".to_string());
        self
    }

    pub fn untagged(mut self) -> Self {
        self.taggable = false;
        self
    }

    /// Append tags to the resource's `Tags` property, after any tags the
    /// resource already carries (e.g. its `Name` tag)
    pub fn apply_tags(&mut self, tags: &[Tag]) {
        if tags.is_empty() {
            return;
        }

        let Some(properties) = self.properties.as_object_mut() else {
            return;
        };

        let existing = properties
            .entry("Tags")
            .or_insert_with(|| Value::Array(Vec::new()));

        if let Some(list) = existing.as_array_mut() {
            for tag in tags {
                list.push(json!({ "Key": tag.key, "Value": tag.value }));
            }
        }
    }
}

/// A named output value of a template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub value: Value,
}

impl Output {
    pub fn new(value: Value, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            value,
        }
    }
}

/// A resource tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// `{"Ref": id}`
pub fn reference(id: &str) -> Value {
    json!({ "Ref": id })
}

/// `{"Fn::GetAtt": [id, attr]}`
pub fn get_att(id: &str, attr: &str) -> Value {
    json!({ "Fn::GetAtt": [id, attr] })
}

/// `{"Fn::Join": [delimiter, parts]}`
pub fn join(delimiter: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [delimiter, parts] })
}

/// `{"Fn::Select": [index, list]}`
pub fn select(index: u32, list: Value) -> Value {
    json!({ "Fn::Select": [index, list] })
}

/// `{"Fn::GetAZs": ""}` — the availability zones of the deployment region
pub fn get_azs() -> Value {
    json!({ "Fn::GetAZs": "" })
}
