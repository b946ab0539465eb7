//! Kubernetes access used by the fetch and store stages
//!
//! The stages only see these traits, so tests drive them with mocks and the
//! binary plugs in the kube-backed implementations below.

use async_trait::async_trait;
use gardener_syncer_common::crd::Seed;
use gardener_syncer_common::kube_utils::is_not_found;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::{Api, ListParams, Patch, PatchParams};
use kube::{Client, ResourceExt};

#[cfg(test)]
use mockall::automock;

use crate::config::ObjectKey;

/// Lists Gardener seeds
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SeedLister: Send + Sync {
    /// List every seed visible to the caller
    async fn list_seeds(&self) -> Result<Vec<Seed>, kube::Error>;
}

/// Reads and server-side applies ConfigMaps
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConfigMapClient: Send + Sync {
    /// Get a ConfigMap, `Ok(None)` if it does not exist
    async fn get_config_map(&self, key: &ObjectKey) -> Result<Option<ConfigMap>, kube::Error>;

    /// Server-side apply a ConfigMap under the given field manager
    ///
    /// Fields owned by other managers are left alone; a conflict with them is
    /// returned as an error.
    async fn apply_config_map(
        &self,
        config_map: &ConfigMap,
        field_manager: &str,
    ) -> Result<(), kube::Error>;
}

/// [`SeedLister`] backed by the Gardener API server
pub struct KubeSeedLister {
    client: Client,
}

impl KubeSeedLister {
    /// Wrap a client connected to Gardener
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SeedLister for KubeSeedLister {
    async fn list_seeds(&self) -> Result<Vec<Seed>, kube::Error> {
        let api: Api<Seed> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        Ok(list.items)
    }
}

/// [`ConfigMapClient`] backed by the KCP API server
pub struct KubeConfigMapClient {
    client: Client,
}

impl KubeConfigMapClient {
    /// Wrap a client connected to KCP
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConfigMapClient for KubeConfigMapClient {
    async fn get_config_map(&self, key: &ObjectKey) -> Result<Option<ConfigMap>, kube::Error> {
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), &key.namespace);
        match api.get(&key.name).await {
            Ok(cm) => Ok(Some(cm)),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn apply_config_map(
        &self,
        config_map: &ConfigMap,
        field_manager: &str,
    ) -> Result<(), kube::Error> {
        let namespace = config_map.namespace().unwrap_or_default();
        let name = config_map.name_any();
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), &namespace);
        api.patch(
            &name,
            &PatchParams::apply(field_manager),
            &Patch::Apply(config_map),
        )
        .await?;
        Ok(())
    }
}
