//! In-process fakes for the remote services.
//!
//! Each fake records every call it receives, in order, and can be told to
//! fail a specific operation.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use rocky_core::models::organization::OrganizationCode;
use rocky_services::client::{
    CatalogClient, ClientError, GraphStoreClient, InfoSource, ServiceHealth,
};
use serde_json::{Map, Value};

#[derive(Debug, Default)]
pub struct CatalogState {
    pub organizations: BTreeSet<String>,
    pub unhealthy: bool,
    pub down: Option<ClientError>,
    pub fail_exists: Option<ClientError>,
    pub fail_create: Option<ClientError>,
    pub fail_delete: Option<ClientError>,
    pub calls: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl FakeCatalog {
    pub fn state(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap()
    }

    pub fn with_organization(self, code: &str) -> Self {
        self.state().organizations.insert(code.to_string());
        self
    }

    pub fn contains(&self, code: &str) -> bool {
        self.state().organizations.contains(code)
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    /// Calls other than health checks.
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("create") || c.starts_with("delete"))
            .collect()
    }
}

impl CatalogClient for FakeCatalog {
    async fn health(&self) -> Result<ServiceHealth, ClientError> {
        let mut state = self.state();
        state.calls.push("health".into());
        if let Some(e) = state.down.clone() {
            return Err(e);
        }
        if state.unhealthy {
            return Ok(ServiceHealth::unhealthy());
        }
        Ok(ServiceHealth {
            version: Some("1.0.0".into()),
            ..ServiceHealth::healthy()
        })
    }

    async fn organization_exists(&self, code: &OrganizationCode) -> Result<bool, ClientError> {
        let mut state = self.state();
        state.calls.push(format!("exists {code}"));
        if let Some(e) = state.fail_exists.clone() {
            return Err(e);
        }
        Ok(state.organizations.contains(code.as_str()))
    }

    async fn create_organization(
        &self,
        code: &OrganizationCode,
        name: &str,
    ) -> Result<(), ClientError> {
        let mut state = self.state();
        state.calls.push(format!("create {code} {name}"));
        if let Some(e) = state.fail_create.clone() {
            return Err(e);
        }
        state.organizations.insert(code.to_string());
        Ok(())
    }

    async fn delete_organization(&self, code: &OrganizationCode) -> Result<(), ClientError> {
        let mut state = self.state();
        state.calls.push(format!("delete {code}"));
        if let Some(e) = state.fail_delete.clone() {
            return Err(e);
        }
        state.organizations.remove(code.as_str());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct GraphStoreState {
    pub nodes: BTreeSet<String>,
    pub unhealthy: bool,
    pub down: Option<ClientError>,
    pub fail_create: Option<ClientError>,
    pub fail_delete: Option<ClientError>,
    pub calls: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeGraphStore {
    state: Arc<Mutex<GraphStoreState>>,
}

impl FakeGraphStore {
    pub fn state(&self) -> MutexGuard<'_, GraphStoreState> {
        self.state.lock().unwrap()
    }

    pub fn with_node(self, code: &str) -> Self {
        self.state().nodes.insert(code.to_string());
        self
    }

    pub fn contains(&self, code: &str) -> bool {
        self.state().nodes.contains(code)
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c != "health")
            .collect()
    }
}

impl GraphStoreClient for FakeGraphStore {
    async fn root_health(&self) -> Result<ServiceHealth, ClientError> {
        let mut state = self.state();
        state.calls.push("health".into());
        if let Some(e) = state.down.clone() {
            return Err(e);
        }
        if state.unhealthy {
            return Ok(ServiceHealth::unhealthy());
        }
        Ok(ServiceHealth::healthy())
    }

    async fn create_node(&self, code: &OrganizationCode) -> Result<(), ClientError> {
        let mut state = self.state();
        state.calls.push(format!("create_node {code}"));
        if let Some(e) = state.fail_create.clone() {
            return Err(e);
        }
        state.nodes.insert(code.to_string());
        Ok(())
    }

    async fn delete_node(&self, code: &OrganizationCode) -> Result<(), ClientError> {
        let mut state = self.state();
        state.calls.push(format!("delete_node {code}"));
        if let Some(e) = state.fail_delete.clone() {
            return Err(e);
        }
        state.nodes.remove(code.as_str());
        Ok(())
    }
}

/// Info source that answers every lookup with the same fields.
#[derive(Debug, Clone, Default)]
pub struct FakeInfoSource {
    fields: Arc<Mutex<Map<String, Value>>>,
    fail: Arc<Mutex<Option<ClientError>>>,
    lookups: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeInfoSource {
    pub fn returning(fields: Value) -> Self {
        let source = Self::default();
        if let Value::Object(map) = fields {
            *source.fields.lock().unwrap() = map;
        }
        source
    }

    pub fn failing(self, err: ClientError) -> Self {
        *self.fail.lock().unwrap() = Some(err);
        self
    }

    pub fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.lock().unwrap().clone()
    }
}

impl InfoSource for FakeInfoSource {
    async fn get_info(
        &self,
        ooi_type: &str,
        natural_key: &str,
    ) -> Result<Map<String, Value>, ClientError> {
        self.lookups
            .lock()
            .unwrap()
            .push((ooi_type.to_string(), natural_key.to_string()));
        if let Some(e) = self.fail.lock().unwrap().clone() {
            return Err(e);
        }
        Ok(self.fields.lock().unwrap().clone())
    }
}
