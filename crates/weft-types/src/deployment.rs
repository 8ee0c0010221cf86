//! Deployment and resource entities

use crate::{DeploymentId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named byte blob belonging to a deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub bytes: Vec<u8>,
    pub deployment_id: DeploymentId,
    /// True for resources the engine generated itself (e.g. diagrams)
    pub generated: bool,
}

impl Resource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, deployment_id: DeploymentId) -> Self {
        Self {
            name: name.into(),
            bytes,
            deployment_id,
            generated: false,
        }
    }
}

/// The atomic unit introducing one or more process definitions plus their
/// resources together.
///
/// `is_new` distinguishes a first deploy from a redeploy of an already
/// persisted deployment (e.g. restart rehydration): a redeploy never
/// mutates persisted identity, version or suspension state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: DeploymentId,
    pub name: Option<String>,
    pub tenant_id: TenantId,
    pub is_new: bool,
    pub category: Option<String>,
    pub resources: BTreeMap<String, Resource>,
    pub deployment_time: DateTime<Utc>,
}

impl Deployment {
    pub fn new(id: DeploymentId) -> Self {
        Self {
            id,
            name: None,
            tenant_id: TenantId::default(),
            is_new: true,
            category: None,
            resources: BTreeMap::new(),
            deployment_time: Utc::now(),
        }
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.insert(resource.name.clone(), resource);
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resources_are_looked_up_by_name() {
        let id = DeploymentId::new("deploy-1");
        let mut deployment = Deployment::new(id.clone());
        deployment.add_resource(Resource::new("order.flow", vec![1, 2, 3], id));

        assert!(deployment.resource("order.flow").is_some());
        assert!(deployment.resource("missing.flow").is_none());
    }
}
