//! The small slice of Kubernetes object shapes read from `-o=json` output
//!
//! Only the attributes discovery needs are modeled; everything else in the
//! documents is ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObjectMeta {
    pub name: Option<String>,
    pub namespace: Option<String>,
}

/// `kubectl get serviceaccount default -o=json`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceAccount {
    pub metadata: ObjectMeta,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Pod {
    pub metadata: ObjectMeta,
}

/// `kubectl get pod -o=json`, which reports `kind: List` or `kind: PodList`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PodList {
    pub items: Vec<Pod>,
}
