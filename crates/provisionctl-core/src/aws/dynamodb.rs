//! DynamoDB table operations
//!
//! Table creation, status lookup and item insertion, plus conversion between
//! the crate's resource model and DynamoDB's wire types.

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, KeySchemaElement, KeyType,
    ProvisionedThroughput, ScalarAttributeType, TableStatus,
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::remote_error;
use crate::error::{CoreError, Result};
use crate::resource::{AttributeType, KeyRole, Record, ResourceSpec, ResourceStatus};

/// Issue a single CreateTable request for `spec`
pub(crate) async fn create_table(client: &Client, spec: &ResourceSpec) -> Result<()> {
    let mut request = client
        .create_table()
        .table_name(spec.name())
        .set_key_schema(Some(key_schema(spec)?))
        .set_attribute_definitions(Some(attribute_definitions(spec)?));

    request = match spec.throughput() {
        Some(t) => request
            .billing_mode(BillingMode::Provisioned)
            .provisioned_throughput(
                ProvisionedThroughput::builder()
                    .read_capacity_units(t.read_capacity_units)
                    .write_capacity_units(t.write_capacity_units)
                    .build()
                    .map_err(|e| CoreError::invalid_spec(e.to_string()))?,
            ),
        None => request.billing_mode(BillingMode::PayPerRequest),
    };

    match request.send().await {
        Ok(output) => {
            debug!(
                table = spec.name(),
                status = ?output.table_description().and_then(|d| d.table_status()),
                "CreateTable accepted"
            );
            Ok(())
        }
        Err(err) => Err(classify_create_error(spec.name(), &err)),
    }
}

/// Describe `name` and map its status
pub(crate) async fn table_status(client: &Client, name: &str) -> Result<ResourceStatus> {
    match client.describe_table().table_name(name).send().await {
        Ok(output) => Ok(output
            .table()
            .and_then(|t| t.table_status())
            .map(map_table_status)
            .unwrap_or(ResourceStatus::NotFound)),
        Err(SdkError::ServiceError(service_err))
            if matches!(
                service_err.err(),
                DescribeTableError::ResourceNotFoundException(_)
            ) =>
        {
            Ok(ResourceStatus::NotFound)
        }
        Err(err) => Err(remote_error(&err)),
    }
}

/// Store `record` as a single item in `table`
pub(crate) async fn put_item(client: &Client, table: &str, record: &Record) -> Result<()> {
    client
        .put_item()
        .table_name(table)
        .set_item(Some(record_to_item(record)))
        .send()
        .await
        .map_err(|e| remote_error(&e))?;

    debug!(table, attributes = record.len(), "PutItem succeeded");
    Ok(())
}

fn classify_create_error<R: std::fmt::Debug>(
    name: &str,
    err: &SdkError<CreateTableError, R>,
) -> CoreError {
    if let SdkError::ServiceError(service_err) = err {
        let inner = service_err.err();
        if matches!(inner, CreateTableError::ResourceInUseException(_)) {
            return CoreError::AlreadyExists {
                name: name.to_string(),
            };
        }
        if inner.code() == Some("ValidationException") {
            return CoreError::InvalidSpec(inner.message().unwrap_or_default().to_string());
        }
    }
    remote_error(err)
}

fn key_schema(spec: &ResourceSpec) -> Result<Vec<KeySchemaElement>> {
    spec.key_schema()
        .iter()
        .map(|key| {
            let key_type = match key.role {
                KeyRole::Partition => KeyType::Hash,
                KeyRole::Sort => KeyType::Range,
            };
            KeySchemaElement::builder()
                .attribute_name(&key.name)
                .key_type(key_type)
                .build()
                .map_err(|e| CoreError::invalid_spec(e.to_string()))
        })
        .collect()
}

fn attribute_definitions(spec: &ResourceSpec) -> Result<Vec<AttributeDefinition>> {
    spec.key_schema()
        .iter()
        .map(|key| {
            AttributeDefinition::builder()
                .attribute_name(&key.name)
                .attribute_type(scalar_type(key.attribute_type))
                .build()
                .map_err(|e| CoreError::invalid_spec(e.to_string()))
        })
        .collect()
}

fn scalar_type(ty: AttributeType) -> ScalarAttributeType {
    match ty {
        AttributeType::String => ScalarAttributeType::S,
        AttributeType::Number => ScalarAttributeType::N,
        AttributeType::Binary => ScalarAttributeType::B,
    }
}

/// `UPDATING` still counts as converging; deleted or archived tables can
/// never become active.
pub(crate) fn map_table_status(status: &TableStatus) -> ResourceStatus {
    match status {
        TableStatus::Active => ResourceStatus::Active,
        TableStatus::Creating | TableStatus::Updating => ResourceStatus::Creating,
        TableStatus::Deleting
        | TableStatus::Archiving
        | TableStatus::Archived
        | TableStatus::InaccessibleEncryptionCredentials => ResourceStatus::Failed,
        other => {
            warn!(status = other.as_str(), "unrecognized table status, still waiting");
            ResourceStatus::Creating
        }
    }
}

pub(crate) fn record_to_item(record: &Record) -> HashMap<String, AttributeValue> {
    record
        .iter()
        .map(|(k, v)| (k.clone(), json_to_attribute(v)))
        .collect()
}

fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(json_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(record_to_item(map)),
    }
}
