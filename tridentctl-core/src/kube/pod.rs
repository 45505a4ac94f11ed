//! Locating the single Trident controller pod in a namespace

use super::{KubeCli, PodIdentity, PodList};
use crate::error::ResolveError;
use crate::process;

impl KubeCli {
    /// Find the one pod in `namespace` matching `selector`.
    ///
    /// Zero matches and several matches are the same failure: the caller cannot
    /// tell which pod to talk to and has to name the namespace explicitly.
    pub fn locate_pod(&self, namespace: &str, selector: &str) -> Result<PodIdentity, ResolveError> {
        let list: PodList = process::run_and_decode(
            self.binary(),
            &["get", "pod", "-n", namespace, "-l", selector, "-o=json"],
        )
        .map_err(|source| ResolveError::PodLookup {
            cli: self.binary().to_string(),
            namespace: namespace.to_string(),
            source,
        })?;

        let not_found = |found| ResolveError::PodNotFound {
            namespace: namespace.to_string(),
            found,
        };

        match list.items.as_slice() {
            [pod] => {
                let name = pod
                    .metadata
                    .name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| not_found(0))?;
                Ok(PodIdentity {
                    name,
                    namespace: namespace.to_string(),
                })
            }
            items => Err(not_found(items.len())),
        }
    }
}
