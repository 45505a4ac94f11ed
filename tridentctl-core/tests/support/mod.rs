//! Fake orchestration CLIs for driving discovery against real subprocesses

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// What a fake `oc`/`kubectl` answers
#[derive(Debug, Clone)]
pub struct CliBehavior {
    pub version_exit: i32,
    /// Namespace of the default service account; `None` makes the lookup fail
    pub namespace: Option<String>,
    /// Raw service account output, replacing the generated document
    pub service_account_body: Option<String>,
    pub pods: Vec<String>,
    pub exec_exit: i32,
}

impl Default for CliBehavior {
    fn default() -> Self {
        Self {
            version_exit: 0,
            namespace: Some("trident".to_string()),
            service_account_body: None,
            pods: vec!["trident-7d4b9c8f6-abcde".to_string()],
            exec_exit: 0,
        }
    }
}

impl CliBehavior {
    pub fn broken() -> Self {
        Self {
            version_exit: 1,
            ..Self::default()
        }
    }

    pub fn with_pods(mut self, pods: &[&str]) -> Self {
        self.pods = pods.iter().map(|p| p.to_string()).collect();
        self
    }

    fn pod_list_json(&self) -> String {
        let items: Vec<String> = self
            .pods
            .iter()
            .map(|name| {
                format!(
                    r#"{{"metadata":{{"name":"{}","namespace":"trident"}},"status":{{"phase":"Running"}}}}"#,
                    name
                )
            })
            .collect();
        format!(
            r#"{{"apiVersion":"v1","kind":"List","items":[{}],"metadata":{{"resourceVersion":""}}}}"#,
            items.join(",")
        )
    }

    fn service_account_script(&self) -> String {
        if let Some(body) = &self.service_account_body {
            return format!("printf '%s\\n' '{}'", body);
        }
        match &self.namespace {
            Some(ns) => format!(
                r#"printf '%s\n' '{{"apiVersion":"v1","kind":"ServiceAccount","metadata":{{"name":"default","namespace":"{}"}}}}'"#,
                ns
            ),
            None => "printf 'error: current context is not set\\n' >&2; exit 1".to_string(),
        }
    }

    fn script(&self, log: &Path) -> String {
        format!(
            r#"#!/bin/sh
printf '%s\n' "$*" >> '{log}'
case "$1" in
version)
  exit {version_exit}
  ;;
get)
  if [ "$2" = "serviceaccount" ]; then
    {service_account}
  else
    printf '%s\n' '{pods}'
  fi
  exit 0
  ;;
exec)
  while [ "$#" -gt 0 ] && [ "$1" != "--" ]; do shift; done
  shift
  printf 'remote: %s\n' "$*"
  printf 'remote-stderr\n' >&2
  exit {exec_exit}
  ;;
logs)
  printf 'log line from %s\n' "$2"
  exit 0
  ;;
esac
exit 1
"#,
            log = log.display(),
            version_exit = self.version_exit,
            service_account = self.service_account_script(),
            pods = self.pod_list_json(),
            exec_exit = self.exec_exit,
        )
    }
}

/// A temporary directory of fake CLIs that log every invocation
pub struct FakeCluster {
    dir: TempDir,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Install a fake CLI called `name` and return its full path
    pub fn install(&self, name: &str, behavior: &CliBehavior) -> String {
        let path = self.dir.path().join(name);
        fs::write(&path, behavior.script(&self.log_path(name))).expect("failed to write fake CLI");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("failed to make fake CLI executable");
        path.to_string_lossy().into_owned()
    }

    /// Argument lines the fake CLI `name` was invoked with, in order
    pub fn calls(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.log_path(name))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn log_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(format!("{}.log", name))
    }
}
