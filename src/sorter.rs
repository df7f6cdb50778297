//! Dependency-graph sorting: compute a valid instantiation order.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::definition::Definition;
use crate::error::{WireError, WireResult};

/// Sort definitions so that every definition is emitted only after all
/// definitions it depends on.
///
/// Integer weights are computed by fixed-point iteration: all weights start
/// at zero, and whenever a definition depends on another with an equal or
/// greater weight, its own weight is raised above it. A weight that would
/// exceed `definitions.len() - 1` is impossible in an acyclic graph of that
/// size, so a cycle exists; it is located by breadth-first path search and
/// reported as [`WireError::CyclicDependency`] carrying the path (a
/// self-dependency reports as `[key, key]`).
///
/// On success, definitions are grouped by ascending weight; within a weight
/// group the original relative order is preserved. Dependency keys naming no
/// definition (nested field references) never influence weights.
pub fn sort(definitions: &[Definition]) -> WireResult<Vec<Definition>> {
    let mut weights: HashMap<&str, usize> = definitions
        .iter()
        .map(|definition| (definition.key(), 0))
        .collect();
    let keys: Vec<&str> = definitions.iter().map(Definition::key).collect();
    let max_possible_weight = definitions.len().saturating_sub(1);

    let mut done_something = true;
    while done_something {
        done_something = false;

        for &weight_key in &keys {
            let weight = weights[weight_key];

            for definition in definitions {
                let depends = definition
                    .dependency_keys()
                    .iter()
                    .any(|key| key.as_str() == weight_key);
                if depends && weights[definition.key()] <= weight {
                    if weight >= max_possible_weight {
                        let cycle = find_dependency_cycle(definitions);
                        return Err(WireError::CyclicDependency(cycle));
                    }
                    weights.insert(definition.key(), weight + 1);
                    done_something = true;
                }
            }
        }
    }

    let max_weight = weights.values().copied().max().unwrap_or(0);
    let mut sorted = Vec::with_capacity(definitions.len());
    for weight in 0..=max_weight {
        for definition in definitions {
            if weights[definition.key()] == weight {
                trace!(key = definition.key(), weight, "definition weighted");
                sorted.push(definition.clone());
            }
        }
    }

    debug!(
        definitions = sorted.len(),
        depth = max_weight + if sorted.is_empty() { 0 } else { 1 },
        "definitions sorted"
    );
    Ok(sorted)
}

/// Locate one dependency cycle by breadth-first path search.
///
/// Path length is bounded by the definition count so a cycle that does not
/// involve the probed key cannot loop the search.
fn find_dependency_cycle(definitions: &[Definition]) -> Vec<String> {
    let indexed: HashMap<&str, &Definition> = definitions
        .iter()
        .map(|definition| (definition.key(), definition))
        .collect();

    for definition in definitions {
        let key = definition.key();
        let mut paths: Vec<Vec<String>> = definition
            .dependency_keys()
            .iter()
            .filter(|dependency| indexed.contains_key(dependency.as_str()))
            .map(|dependency| vec![dependency.clone()])
            .collect();

        while !paths.is_empty() {
            if let Some(cycle_path) = paths.iter().find(|path| path.iter().any(|k| k.as_str() == key)) {
                let mut cycle = vec![key.to_string()];
                cycle.extend(cycle_path.iter().cloned());
                return cycle;
            }

            paths = paths
                .into_iter()
                .filter(|path| path.len() < definitions.len())
                .flat_map(|path| {
                    let last = path.last().cloned().unwrap_or_default();
                    let next: Vec<String> = indexed
                        .get(last.as_str())
                        .map(|definition| {
                            definition
                                .dependency_keys()
                                .iter()
                                .filter(|dependency| indexed.contains_key(dependency.as_str()))
                                .cloned()
                                .collect()
                        })
                        .unwrap_or_default();
                    next.into_iter()
                        .map(move |dependency| {
                            let mut extended = path.clone();
                            extended.push(dependency);
                            extended
                        })
                        .collect::<Vec<_>>()
                })
                .collect();
        }
    }

    Vec::new()
}
