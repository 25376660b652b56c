//! MW-017: Module dependency DAG and install order.
//!
//! Builds a DAG from each module's `dependencies` and computes a topological
//! order with Kahn's algorithm, breaking ties alphabetically so the same
//! manifest always installs in the same order.

use super::error::ModError;
use super::manifest::Manifest;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Order in which the manifest's modules must be loaded and installed:
/// every module appears after all of its dependencies.
pub fn install_order(manifest: &Manifest) -> Result<Vec<String>, ModError> {
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

    for id in manifest.modules.keys() {
        in_degree.insert(id, 0);
        dependents.insert(id, Vec::new());
    }

    for (id, module) in &manifest.modules {
        for dep in &module.dependencies {
            let Some(edges) = dependents.get_mut(dep.as_str()) else {
                return Err(ModError::UnknownDependency {
                    module: id.clone(),
                    dependency: dep.clone(),
                });
            };
            edges.push(id);
            if let Some(degree) = in_degree.get_mut(id.as_str()) {
                *degree += 1;
            }
        }
    }

    let mut ready: Vec<&str> = in_degree
        .iter()
        .filter(|(_, &d)| d == 0)
        .map(|(id, _)| *id)
        .collect();
    ready.sort_unstable();
    let mut queue: VecDeque<&str> = ready.into_iter().collect();

    let mut order: Vec<String> = Vec::with_capacity(manifest.modules.len());
    while let Some(current) = queue.pop_front() {
        order.push(current.to_string());

        let mut next_ready: Vec<&str> = Vec::new();
        for dependent in dependents.get(current).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree -= 1;
                if *degree == 0 {
                    next_ready.push(dependent);
                }
            }
        }
        next_ready.sort_unstable();
        queue.extend(next_ready);
    }

    if order.len() != manifest.modules.len() {
        let placed: BTreeSet<&str> = order.iter().map(String::as_str).collect();
        let members = manifest
            .modules
            .keys()
            .filter(|id| !placed.contains(id.as_str()))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        return Err(ModError::DependencyCycle(members));
    }

    Ok(order)
}
