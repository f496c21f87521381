use std::collections::HashMap;

use monoflow_core::graph::DependencyGraph;
use monoflow_core::package::Package;
use monoflow_core::registry::PackageRegistry;
use proptest::prelude::*;
use semver::Version;

const NAMES: [&str; 5] = ["core", "auth", "api", "worker", "cli"];

fn gen_packages() -> impl Strategy<Value = Vec<Package>> {
    // One flag per possible forward edge (dependency index < package
    // index), so every generated graph is acyclic by construction.
    prop::collection::vec(any::<bool>(), 10).prop_map(|edges| {
        let mut flags = edges.into_iter();
        NAMES
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let deps: Vec<String> = NAMES[..index]
                    .iter()
                    .filter(|_| flags.next().unwrap_or(false))
                    .map(|dep| dep.to_string())
                    .collect();
                Package::new(
                    name.to_string(),
                    Version::new(1, 0, 0),
                    format!("packages/{}", name).into(),
                    deps,
                )
            })
            .collect()
    })
}

fn build_graph(packages: Vec<Package>) -> DependencyGraph {
    let registry = PackageRegistry::from_packages(packages).unwrap();
    DependencyGraph::build(&registry)
}

proptest! {
    #[test]
    fn test_build_order_covers_every_package(packages in gen_packages()) {
        let graph = build_graph(packages);
        let order = graph.build_order().unwrap();

        prop_assert_eq!(order.len(), NAMES.len());
        let mut seen = std::collections::HashSet::new();
        for pkg in order {
            prop_assert!(seen.insert(pkg.clone()), "Duplicate package in order: {}", pkg);
        }
    }

    #[test]
    fn test_build_order_respects_dependencies(packages in gen_packages()) {
        let graph = build_graph(packages.clone());
        let order = graph.build_order().unwrap();

        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index))
            .collect();

        for package in &packages {
            for dep in &package.dependencies {
                prop_assert!(
                    position[dep.as_str()] < position[package.name.as_str()],
                    "{} must come before {}",
                    dep,
                    package.name
                );
            }
        }
    }

    #[test]
    fn test_affected_closure_contains_seed(packages in gen_packages()) {
        let graph = build_graph(packages);

        for name in NAMES {
            let affected = graph.affected_packages(&[name.to_string()]).unwrap();
            prop_assert!(affected.contains(name));
        }
    }
}
