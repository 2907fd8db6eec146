//! Resource model shared by the provisioner and remote clients
//!
//! A [`ResourceSpec`] describes a table to create. It is immutable once built;
//! the only state the provisioner keeps afterwards is the [`ResourceHandle`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// A record to store, as a JSON object
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Scalar type of a key attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Number,
    Binary,
}

impl AttributeType {
    /// DynamoDB-style short code (`S`, `N`, `B`)
    pub fn code(&self) -> &'static str {
        match self {
            AttributeType::String => "S",
            AttributeType::Number => "N",
            AttributeType::Binary => "B",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::String => write!(f, "string"),
            AttributeType::Number => write!(f, "number"),
            AttributeType::Binary => write!(f, "binary"),
        }
    }
}

impl FromStr for AttributeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "s" | "string" => Ok(AttributeType::String),
            "n" | "number" => Ok(AttributeType::Number),
            "b" | "binary" => Ok(AttributeType::Binary),
            other => Err(CoreError::invalid_spec(format!(
                "unknown attribute type '{}' (expected S, N or B)",
                other
            ))),
        }
    }
}

/// Role of an attribute in the key schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    /// Hash key determining item distribution
    Partition,
    /// Range key ordering items within a partition
    Sort,
}

/// One entry of the key schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    pub role: KeyRole,
}

impl KeyAttribute {
    pub fn partition(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            role: KeyRole::Partition,
        }
    }

    pub fn sort(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            role: KeyRole::Sort,
        }
    }

    /// Parse `NAME` or `NAME:TYPE` (type defaults to string)
    pub fn parse(input: &str, role: KeyRole) -> Result<Self> {
        let (name, attribute_type) = match input.split_once(':') {
            Some((name, ty)) => (name, ty.parse()?),
            None => (input, AttributeType::String),
        };
        Ok(Self {
            name: name.trim().to_string(),
            attribute_type,
            role,
        })
    }
}

/// Provisioned capacity hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Throughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

/// Declaration of a remote resource to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    name: String,
    key_schema: Vec<KeyAttribute>,
    throughput: Option<Throughput>,
}

impl ResourceSpec {
    pub fn new(
        name: impl Into<String>,
        key_schema: Vec<KeyAttribute>,
        throughput: Option<Throughput>,
    ) -> Self {
        Self {
            name: name.into(),
            key_schema,
            throughput,
        }
    }

    pub fn builder(name: impl Into<String>) -> ResourceSpecBuilder {
        ResourceSpecBuilder {
            name: name.into(),
            key_schema: Vec::new(),
            throughput: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_schema(&self) -> &[KeyAttribute] {
        &self.key_schema
    }

    pub fn throughput(&self) -> Option<Throughput> {
        self.throughput
    }

    pub fn partition_key(&self) -> Option<&KeyAttribute> {
        self.key_schema
            .iter()
            .find(|k| k.role == KeyRole::Partition)
    }

    pub fn sort_key(&self) -> Option<&KeyAttribute> {
        self.key_schema.iter().find(|k| k.role == KeyRole::Sort)
    }

    /// Check the declaration before anything is sent to the service
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::invalid_spec("resource name must not be empty"));
        }

        let partitions = self
            .key_schema
            .iter()
            .filter(|k| k.role == KeyRole::Partition)
            .count();
        let sorts = self
            .key_schema
            .iter()
            .filter(|k| k.role == KeyRole::Sort)
            .count();

        if partitions == 0 {
            return Err(CoreError::invalid_spec(format!(
                "key schema for '{}' needs a partition key",
                self.name
            )));
        }
        if partitions > 1 {
            return Err(CoreError::invalid_spec(format!(
                "key schema for '{}' has {} partition keys, expected one",
                self.name, partitions
            )));
        }
        if sorts > 1 {
            return Err(CoreError::invalid_spec(format!(
                "key schema for '{}' has {} sort keys, expected at most one",
                self.name, sorts
            )));
        }

        let mut seen = HashSet::new();
        for key in &self.key_schema {
            if key.name.is_empty() {
                return Err(CoreError::invalid_spec("key attribute name must not be empty"));
            }
            if !seen.insert(key.name.as_str()) {
                return Err(CoreError::invalid_spec(format!(
                    "duplicate key attribute '{}'",
                    key.name
                )));
            }
        }

        if let Some(t) = self.throughput
            && (t.read_capacity_units <= 0 || t.write_capacity_units <= 0)
        {
            return Err(CoreError::invalid_spec(
                "read and write capacity units must be positive",
            ));
        }

        Ok(())
    }
}

/// Builder for [`ResourceSpec`]
#[derive(Debug, Clone)]
pub struct ResourceSpecBuilder {
    name: String,
    key_schema: Vec<KeyAttribute>,
    throughput: Option<Throughput>,
}

impl ResourceSpecBuilder {
    pub fn partition_key(mut self, name: impl Into<String>, ty: AttributeType) -> Self {
        self.key_schema.push(KeyAttribute::partition(name, ty));
        self
    }

    pub fn sort_key(mut self, name: impl Into<String>, ty: AttributeType) -> Self {
        self.key_schema.push(KeyAttribute::sort(name, ty));
        self
    }

    pub fn key(mut self, key: KeyAttribute) -> Self {
        self.key_schema.push(key);
        self
    }

    pub fn throughput(mut self, read_capacity_units: i64, write_capacity_units: i64) -> Self {
        self.throughput = Some(Throughput {
            read_capacity_units,
            write_capacity_units,
        });
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<ResourceSpec> {
        let spec = ResourceSpec::new(self.name, self.key_schema, self.throughput);
        spec.validate()?;
        Ok(spec)
    }
}

/// Status of a remote resource as reported by a single poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    Creating,
    Active,
    Failed,
    NotFound,
}

impl ResourceStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResourceStatus::Active | ResourceStatus::Failed)
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceStatus::Creating => write!(f, "CREATING"),
            ResourceStatus::Active => write!(f, "ACTIVE"),
            ResourceStatus::Failed => write!(f, "FAILED"),
            ResourceStatus::NotFound => write!(f, "NOT_FOUND"),
        }
    }
}

/// Reference to a resource whose creation has been requested
///
/// Creating a handle does not mean the resource is usable yet. Once a wait has
/// observed `ACTIVE` the handle remembers it, so waiting again is free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    name: String,
    ready: bool,
}

impl ResourceHandle {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ready: false,
        }
    }

    /// Handle for a resource created outside this process
    pub fn existing(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub(crate) fn mark_ready(&mut self) {
        self.ready = true;
    }
}

/// One object in a bucket listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

/// Options for a single-page object listing
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub prefix: Option<String>,
    pub max_keys: Option<i32>,
}
