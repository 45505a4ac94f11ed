#![cfg(unix)]

mod support;

use support::{CliBehavior, FakeCluster};
use tridentctl_core::mode::{PrecedenceSource, POD_SERVER};
use tridentctl_core::process::ProcessError;
use tridentctl_core::{OperatingMode, ResolveError, Resolver, SessionConfig};

fn resolver(cluster: &FakeCluster, oc: &CliBehavior, kubectl: &CliBehavior) -> Resolver {
    let oc = cluster.install("oc", oc);
    let kubectl = cluster.install("kubectl", kubectl);
    Resolver::new().with_cli_candidates([oc, kubectl])
}

#[test]
fn explicit_server_never_spawns_a_process() {
    let cluster = FakeCluster::new();
    let resolver = resolver(&cluster, &CliBehavior::default(), &CliBehavior::default());

    let config = SessionConfig {
        server: Some("10.0.0.1:8000".to_string()),
        ..SessionConfig::default()
    };
    let from_flag = resolver.resolve_with_env(&config, "get", Some(None)).unwrap();
    let from_env = resolver
        .resolve_with_env(
            &SessionConfig::default(),
            "logs",
            Some(Some("10.0.0.2:8000".to_string())),
        )
        .unwrap();

    assert_eq!(from_flag.mode(), OperatingMode::Direct);
    assert_eq!(from_flag.server(), Some("10.0.0.1:8000"));
    assert_eq!(from_env.mode(), OperatingMode::Direct);
    assert_eq!(from_env.precedence_source(), PrecedenceSource::Environment);
    assert!(cluster.calls("oc").is_empty());
    assert!(cluster.calls("kubectl").is_empty());
}

#[test]
fn no_usable_cli_fails_after_one_probe_each() {
    let cluster = FakeCluster::new();
    let resolver = resolver(&cluster, &CliBehavior::broken(), &CliBehavior::broken());

    let result = resolver.resolve_with_env(&SessionConfig::default(), "get", Some(None));

    assert!(matches!(result, Err(ResolveError::CliNotFound { .. })));
    assert_eq!(cluster.calls("oc"), vec!["version"]);
    assert_eq!(cluster.calls("kubectl"), vec!["version"]);
}

#[test]
fn openshift_cli_is_preferred() {
    let cluster = FakeCluster::new();
    let resolver = resolver(&cluster, &CliBehavior::default(), &CliBehavior::default());

    let session = resolver
        .resolve_with_env(&SessionConfig::default(), "get", Some(None))
        .unwrap();

    let cli = session.cli().expect("tunnel mode has a CLI");
    assert!(cli.binary().ends_with("/oc"));
    assert!(cluster.calls("kubectl").is_empty());
}

#[test]
fn falls_back_to_kubectl() {
    let cluster = FakeCluster::new();
    let resolver = resolver(&cluster, &CliBehavior::broken(), &CliBehavior::default());

    let session = resolver
        .resolve_with_env(&SessionConfig::default(), "get", Some(None))
        .unwrap();

    assert!(session.cli().unwrap().binary().ends_with("/kubectl"));
    assert_eq!(cluster.calls("oc"), vec!["version"]);
}

#[test]
fn single_pod_resolves_to_tunnel_mode() {
    let cluster = FakeCluster::new();
    let resolver = resolver(&cluster, &CliBehavior::broken(), &CliBehavior::default());

    let session = resolver
        .resolve_with_env(&SessionConfig::default(), "get", Some(None))
        .unwrap();

    assert_eq!(session.mode(), OperatingMode::Tunnel);
    assert_eq!(session.server(), Some(POD_SERVER));
    assert_eq!(session.namespace(), Some("trident"));
    let pod = session.pod().expect("tunnel mode has a pod");
    assert_eq!(pod.name, "trident-7d4b9c8f6-abcde");
    assert_eq!(pod.namespace, "trident");

    assert_eq!(
        cluster.calls("kubectl"),
        vec![
            "version",
            "get serviceaccount default -o=json",
            "get pod -n trident -l app=trident.netapp.io -o=json",
        ]
    );
}

#[test]
fn explicit_namespace_skips_service_account_lookup() {
    let cluster = FakeCluster::new();
    let resolver = resolver(&cluster, &CliBehavior::default(), &CliBehavior::broken());

    let config = SessionConfig {
        namespace: Some("storage".to_string()),
        ..SessionConfig::default()
    };
    let session = resolver.resolve_with_env(&config, "get", Some(None)).unwrap();

    assert_eq!(session.namespace(), Some("storage"));
    assert_eq!(
        cluster.calls("oc"),
        vec![
            "version",
            "get pod -n storage -l app=trident.netapp.io -o=json"
        ]
    );
}

#[test]
fn missing_pod_degrades_logs_command() {
    let cluster = FakeCluster::new();
    let behavior = CliBehavior::default().with_pods(&[]);
    let resolver = resolver(&cluster, &behavior, &behavior);

    let session = resolver
        .resolve_with_env(&SessionConfig::default(), "logs", Some(None))
        .unwrap();

    assert_eq!(session.mode(), OperatingMode::Logs);
    assert_eq!(session.pod(), None);
    assert_eq!(session.namespace(), Some("trident"));
    assert!(session.tunnel().is_none());
}

#[test]
fn missing_pod_is_fatal_for_other_commands() {
    let cluster = FakeCluster::new();
    let behavior = CliBehavior::default().with_pods(&[]);
    let resolver = resolver(&cluster, &behavior, &behavior);

    match resolver.resolve_with_env(&SessionConfig::default(), "get", Some(None)) {
        Err(ResolveError::PodNotFound { namespace, found }) => {
            assert_eq!(namespace, "trident");
            assert_eq!(found, 0);
        }
        other => panic!("expected PodNotFound, got {:?}", other),
    }
}

#[test]
fn several_pods_are_ambiguous() {
    let cluster = FakeCluster::new();
    let behavior = CliBehavior::default().with_pods(&["trident-a", "trident-b"]);
    let resolver = resolver(&cluster, &behavior, &behavior);

    let err = resolver
        .resolve_with_env(&SessionConfig::default(), "version", Some(None))
        .unwrap_err();

    assert!(matches!(err, ResolveError::PodNotFound { found: 2, .. }));
    assert!(err.to_string().contains("in the trident namespace"));
}

#[test]
fn namespace_lookup_failure_is_fatal() {
    let cluster = FakeCluster::new();
    let behavior = CliBehavior {
        namespace: None,
        ..CliBehavior::default()
    };
    let resolver = resolver(&cluster, &behavior, &behavior);

    // Even logs cannot continue without a namespace
    let err = resolver
        .resolve_with_env(&SessionConfig::default(), "logs", Some(None))
        .unwrap_err();

    match err {
        ResolveError::Namespace {
            source: ProcessError::Exited { code, .. },
            ..
        } => assert_eq!(code, 1),
        other => panic!("expected namespace error, got {:?}", other),
    }
}

#[test]
fn malformed_service_account_is_a_decode_error() {
    let cluster = FakeCluster::new();
    let behavior = CliBehavior {
        service_account_body: Some("{\"metadata\": [".to_string()),
        ..CliBehavior::default()
    };
    let resolver = resolver(&cluster, &behavior, &behavior);

    let err = resolver
        .resolve_with_env(&SessionConfig::default(), "get", Some(None))
        .unwrap_err();

    assert!(matches!(
        err,
        ResolveError::Namespace {
            source: ProcessError::Decode { .. },
            ..
        }
    ));
}
