//! Shared Kubernetes utilities using kube-rs

use std::path::Path;
use std::time::{Duration, Instant};

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tracing::info;

use crate::{Error, STATUS_TRUE};

/// Trait for types that have condition-like fields (type and status)
pub trait HasConditionFields {
    /// Get the condition type field value
    fn type_field(&self) -> &str;
    /// Get the condition status field value
    fn status_field(&self) -> &str;
}

/// Find the condition of the given type
pub fn get_condition<'a, T>(conditions: &'a [T], condition_type: &str) -> Option<&'a T>
where
    T: HasConditionFields,
{
    conditions.iter().find(|c| c.type_field() == condition_type)
}

/// Check if a condition of the given type exists and has status "True"
///
/// A missing condition and a condition with any other status (False,
/// Unknown, Progressing) both return `false`.
pub fn has_condition<T>(conditions: &[T], condition_type: &str) -> bool
where
    T: HasConditionFields,
{
    get_condition(conditions, condition_type).is_some_and(|c| c.status_field() == STATUS_TRUE)
}

/// Check whether a kube error is an API "not found" response
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(ae) if ae.code == 404)
}

/// Clear metadata owned by the API server before sending an object back
///
/// Server-side apply rejects bodies carrying `managedFields`, and a stale
/// `resourceVersion` would turn the apply into an optimistic-lock update.
pub fn strip_server_managed_metadata(meta: &mut ObjectMeta) {
    meta.uid = None;
    meta.resource_version = None;
    meta.creation_timestamp = None;
    meta.deletion_timestamp = None;
    meta.deletion_grace_period_seconds = None;
    meta.managed_fields = None;
    meta.generation = None;
}

/// Create a kube client from an optional kubeconfig path with custom timeouts
///
/// Without a path the configuration is inferred (in-cluster service account,
/// then `KUBECONFIG` / `~/.kube/config`). `name` identifies the control plane
/// in logs and errors.
pub async fn create_client_with_timeout(
    name: &str,
    kubeconfig: Option<&Path>,
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<Client, Error> {
    let start = Instant::now();

    let mut config = match kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                Error::client(
                    name,
                    format!("failed to read kubeconfig {}: {}", path.display(), e),
                )
            })?;
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .map_err(|e| Error::client(name, format!("failed to load kubeconfig: {}", e)))?
        }
        None => Config::infer()
            .await
            .map_err(|e| Error::client(name, format!("failed to infer config: {}", e)))?,
    };
    config.connect_timeout = Some(connect_timeout);
    config.read_timeout = Some(read_timeout);

    let client = Client::try_from(config)?;

    info!(
        client = name,
        duration_ms = start.elapsed().as_millis() as u64,
        "client created"
    );
    Ok(client)
}
