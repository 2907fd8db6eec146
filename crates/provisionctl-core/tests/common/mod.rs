//! In-memory stand-in for a managed storage/database service

#![allow(dead_code)]

use async_trait::async_trait;
use provisionctl_core::{
    CoreError, ListOptions, ObjectSummary, Record, RemoteServiceClient, ResourceSpec,
    ResourceStatus, Result,
};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Tables report CREATING for `creating_polls` polls after being submitted,
/// then `terminal` forever.
pub struct FakeClient {
    creating_polls: usize,
    terminal: ResourceStatus,
    tables: Mutex<HashSet<String>>,
    objects: Vec<ObjectSummary>,
    list_error: Option<(String, String)>,
    records: Mutex<Vec<(String, Record)>>,
    status_delay: Option<Duration>,
    submit_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl FakeClient {
    pub fn becomes_active_after(creating_polls: usize) -> Self {
        Self {
            creating_polls,
            terminal: ResourceStatus::Active,
            tables: Mutex::new(HashSet::new()),
            objects: Vec::new(),
            list_error: None,
            records: Mutex::new(Vec::new()),
            status_delay: None,
            submit_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
        }
    }

    pub fn never_ready() -> Self {
        Self::becomes_active_after(usize::MAX)
    }

    pub fn fails_after(creating_polls: usize) -> Self {
        Self {
            terminal: ResourceStatus::Failed,
            ..Self::becomes_active_after(creating_polls)
        }
    }

    pub fn with_existing_table(self, name: &str) -> Self {
        self.tables.lock().unwrap().insert(name.to_string());
        self
    }

    pub fn with_objects(mut self, keys: &[&str]) -> Self {
        self.objects = keys
            .iter()
            .map(|k| ObjectSummary {
                key: k.to_string(),
                size: Some(1),
                last_modified: None,
            })
            .collect();
        self
    }

    pub fn with_list_error(mut self, code: &str, message: &str) -> Self {
        self.list_error = Some((code.to_string(), message.to_string()));
        self
    }

    /// Every status call takes `delay` before answering
    pub fn with_status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = Some(delay);
        self
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<(String, Record)> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteServiceClient for FakeClient {
    async fn submit_create(&self, spec: &ResourceSpec) -> Result<()> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock().unwrap();
        if !tables.insert(spec.name().to_string()) {
            return Err(CoreError::AlreadyExists {
                name: spec.name().to_string(),
            });
        }
        Ok(())
    }

    async fn get_status(&self, name: &str) -> Result<ResourceStatus> {
        let polls_so_far = self.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.status_delay {
            tokio::time::sleep(delay).await;
        }
        if !self.tables.lock().unwrap().contains(name) {
            return Ok(ResourceStatus::NotFound);
        }
        if polls_so_far < self.creating_polls {
            Ok(ResourceStatus::Creating)
        } else {
            Ok(self.terminal)
        }
    }

    async fn list_objects(
        &self,
        _bucket: &str,
        _options: &ListOptions,
    ) -> Result<Vec<ObjectSummary>> {
        match &self.list_error {
            Some((code, message)) => Err(CoreError::remote(code.clone(), message.clone())),
            None => Ok(self.objects.clone()),
        }
    }

    async fn put_record(&self, resource: &str, record: &Record) -> Result<()> {
        if !self.tables.lock().unwrap().contains(resource) {
            return Err(CoreError::remote(
                "ResourceNotFoundException",
                "Requested resource not found",
            ));
        }
        self.records
            .lock()
            .unwrap()
            .push((resource.to_string(), record.clone()));
        Ok(())
    }
}
