//! Store stage: write provider regions into the target ConfigMap
//!
//! The ConfigMap is read first so labels and annotations set by other
//! writers survive, then its data is replaced wholesale and the object is
//! server-side applied as [`FIELD_MANAGER`]. Provider keys from earlier runs
//! that are no longer present are dropped.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use gardener_syncer_common::kube_utils::strip_server_managed_metadata;
use k8s_openapi::api::core::v1::ConfigMap;
use tokio::time::timeout_at;
use tracing::{debug, info};

use crate::client::ConfigMapClient;
use crate::config::ObjectKey;
use crate::convert::to_config_map_data;
use crate::error::StageFailure;
use crate::providers::Providers;
use crate::sync::StoreProviders;
use crate::{SyncError, FIELD_MANAGER};

/// Persists provider regions in a single ConfigMap
pub struct ConfigMapStore<C> {
    client: C,
    key: ObjectKey,
    timeout: Duration,
}

impl<C: ConfigMapClient> ConfigMapStore<C> {
    /// Create a store for `key`; `timeout` bounds the read and the write together
    pub fn new(client: C, key: ObjectKey, timeout: Duration) -> Self {
        Self {
            client,
            key,
            timeout,
        }
    }

    /// Read-or-create the ConfigMap and apply `providers` as its data
    pub async fn store(&self, providers: &Providers) -> Result<(), SyncError> {
        let start = Instant::now();
        let deadline = tokio::time::Instant::now() + self.timeout;

        let existing = timeout_at(deadline, self.client.get_config_map(&self.key))
            .await
            .map_err(|_| self.read_error(StageFailure::Timeout(self.timeout)))?
            .map_err(|e| self.read_error(e.into()))?;

        if existing.is_none() {
            debug!(key = %self.key, "config map not found, creating it");
        }

        let config_map = self.desired_config_map(existing, providers)?;

        timeout_at(
            deadline,
            self.client.apply_config_map(&config_map, FIELD_MANAGER),
        )
        .await
        .map_err(|_| self.write_error(StageFailure::Timeout(self.timeout)))?
        .map_err(|e| self.write_error(e.into()))?;

        info!(
            key = %self.key,
            providers = providers.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "storing data complete"
        );
        Ok(())
    }

    /// Build the object to apply from what is currently stored
    fn desired_config_map(
        &self,
        existing: Option<ConfigMap>,
        providers: &Providers,
    ) -> Result<ConfigMap, SyncError> {
        let mut cm = existing.unwrap_or_default();
        cm.metadata.name = Some(self.key.name.clone());
        cm.metadata.namespace = Some(self.key.namespace.clone());
        strip_server_managed_metadata(&mut cm.metadata);
        cm.data = Some(to_config_map_data(providers)?);
        cm.binary_data = None;
        Ok(cm)
    }

    fn read_error(&self, source: StageFailure) -> SyncError {
        SyncError::Read {
            key: self.key.clone(),
            source,
        }
    }

    fn write_error(&self, source: StageFailure) -> SyncError {
        SyncError::Write {
            key: self.key.clone(),
            source,
        }
    }
}

#[async_trait]
impl<C: ConfigMapClient> StoreProviders for ConfigMapStore<C> {
    async fn store(&self, providers: &Providers) -> Result<(), SyncError> {
        ConfigMapStore::store(self, providers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockConfigMapClient;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ManagedFieldsEntry, ObjectMeta};
    use mockall::predicate::eq;
    use std::collections::BTreeMap;

    const TEST_NAME: &str = "test-name";
    const TEST_NAMESPACE: &str = "test-namespace";

    fn test_key() -> ObjectKey {
        ObjectKey::new(TEST_NAMESPACE, TEST_NAME)
    }

    fn test_providers() -> Providers {
        let mut providers = Providers::new();
        providers.add("test", "me");
        providers.add("test", "plz");
        providers
    }

    fn test_data() -> BTreeMap<String, String> {
        [("test".to_string(), "seedRegions:\n- me\n- plz".to_string())].into()
    }

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(kube::error::ErrorResponse {
            status: "Failure".to_string(),
            message: format!("{} test", reason),
            reason: reason.to_string(),
            code,
        })
    }

    fn stored_config_map() -> ConfigMap {
        let mut labels = BTreeMap::new();
        labels.insert("app.kubernetes.io/part-of".to_string(), "kcp".to_string());

        ConfigMap {
            metadata: ObjectMeta {
                name: Some(TEST_NAME.to_string()),
                namespace: Some(TEST_NAMESPACE.to_string()),
                labels: Some(labels),
                resource_version: Some("12345".to_string()),
                uid: Some("8a1f".to_string()),
                managed_fields: Some(vec![ManagedFieldsEntry {
                    manager: Some("gardener-syncer".to_string()),
                    operation: Some("Apply".to_string()),
                    ..Default::default()
                }]),
                ..Default::default()
            },
            data: Some(
                [
                    ("stale-provider".to_string(), "seedRegions:\n- gone".to_string()),
                    ("test".to_string(), "seedRegions:\n- me".to_string()),
                ]
                .into(),
            ),
            ..Default::default()
        }
    }

    fn assert_applied_shape(cm: &ConfigMap) {
        assert_eq!(cm.metadata.name.as_deref(), Some(TEST_NAME));
        assert_eq!(cm.metadata.namespace.as_deref(), Some(TEST_NAMESPACE));
        assert!(cm.metadata.managed_fields.is_none());
        assert!(cm.metadata.resource_version.is_none());
        assert!(cm.metadata.uid.is_none());
        assert_eq!(cm.data, Some(test_data()));
    }

    #[tokio::test]
    async fn get_failure_aborts_before_write() {
        let mut client = MockConfigMapClient::new();
        client
            .expect_get_config_map()
            .with(eq(test_key()))
            .times(1)
            .returning(|_| Err(api_error(500, "InternalError")));
        client.expect_apply_config_map().never();

        let store = ConfigMapStore::new(client, test_key(), Duration::from_secs(10));
        let err = store.store(&test_providers()).await.unwrap_err();

        match err {
            SyncError::Read {
                key,
                source: StageFailure::Kube(kube::Error::Api(ae)),
            } => {
                assert_eq!(key, test_key());
                assert_eq!(ae.code, 500);
            }
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn not_found_creates_config_map() {
        let mut client = MockConfigMapClient::new();
        client
            .expect_get_config_map()
            .times(1)
            .returning(|_| Ok(None));
        client
            .expect_apply_config_map()
            .withf(|cm, manager| {
                assert_applied_shape(cm);
                manager == "gardener-syncer"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let store = ConfigMapStore::new(client, test_key(), Duration::from_secs(10));
        store.store(&test_providers()).await.unwrap();
    }

    #[tokio::test]
    async fn existing_config_map_is_replaced_and_keeps_labels() {
        let mut client = MockConfigMapClient::new();
        client
            .expect_get_config_map()
            .returning(|_| Ok(Some(stored_config_map())));
        client
            .expect_apply_config_map()
            .withf(|cm, _| {
                assert_applied_shape(cm);
                let labels = cm.metadata.labels.clone().unwrap_or_default();
                labels.get("app.kubernetes.io/part-of").map(String::as_str) == Some("kcp")
                    && !cm.data.as_ref().unwrap().contains_key("stale-provider")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let store = ConfigMapStore::new(client, test_key(), Duration::from_secs(10));
        store.store(&test_providers()).await.unwrap();
    }

    #[tokio::test]
    async fn apply_failure_is_a_write_error() {
        let mut client = MockConfigMapClient::new();
        client.expect_get_config_map().returning(|_| Ok(None));
        client
            .expect_apply_config_map()
            .times(1)
            .returning(|_, _| Err(api_error(409, "Conflict")));

        let store = ConfigMapStore::new(client, test_key(), Duration::from_secs(10));
        let err = store.store(&test_providers()).await.unwrap_err();

        assert!(matches!(err, SyncError::Write { ref key, .. } if *key == test_key()));
        assert!(err.to_string().contains("Conflict test"));
    }

    #[tokio::test]
    async fn empty_aggregate_writes_empty_data() {
        let mut client = MockConfigMapClient::new();
        client
            .expect_get_config_map()
            .returning(|_| Ok(Some(stored_config_map())));
        client
            .expect_apply_config_map()
            .withf(|cm, _| cm.data.as_ref().is_some_and(|d| d.is_empty()))
            .times(1)
            .returning(|_, _| Ok(()));

        let store = ConfigMapStore::new(client, test_key(), Duration::from_secs(10));
        store.store(&Providers::new()).await.unwrap();
    }

    #[test]
    fn applied_body_carries_config_map_type() {
        let store = ConfigMapStore::new(
            MockConfigMapClient::new(),
            test_key(),
            Duration::from_secs(10),
        );
        let cm = store
            .desired_config_map(Some(stored_config_map()), &test_providers())
            .unwrap();

        let body = serde_json::to_value(&cm).unwrap();
        assert_eq!(body["apiVersion"], "v1");
        assert_eq!(body["kind"], "ConfigMap");
        assert_eq!(body["metadata"]["name"], TEST_NAME);
        assert!(body["metadata"].get("managedFields").is_none());
        assert_eq!(body["data"]["test"], "seedRegions:\n- me\n- plz");
    }

    /// The read and the write share one deadline.
    #[tokio::test(start_paused = true)]
    async fn slow_apply_hits_the_deadline() {
        struct SlowApply;

        #[async_trait]
        impl ConfigMapClient for SlowApply {
            async fn get_config_map(
                &self,
                _key: &ObjectKey,
            ) -> Result<Option<ConfigMap>, kube::Error> {
                tokio::time::sleep(Duration::from_secs(6)).await;
                Ok(None)
            }

            async fn apply_config_map(
                &self,
                _config_map: &ConfigMap,
                _field_manager: &str,
            ) -> Result<(), kube::Error> {
                tokio::time::sleep(Duration::from_secs(6)).await;
                Ok(())
            }
        }

        let store = ConfigMapStore::new(SlowApply, test_key(), Duration::from_secs(10));
        let err = store.store(&test_providers()).await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::Write {
                source: StageFailure::Timeout(_),
                ..
            }
        ));
    }
}
