//! Cross-reference pass
//!
//! Runs once the whole component tree is built, so a `source` may point at a
//! component declared later in the document. Links each source-bound
//! component to its source, registers it as a listener there, then binds the
//! subtrees that were waiting on a source scope.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::builder::ComponentTreeBuilder;
use super::component::ComponentId;
use crate::error::ViewError;

pub(crate) fn resolve(builder: &mut ComponentTreeBuilder<'_>) -> Result<(), ViewError> {
    let mut linked = Vec::new();

    for index in 0..builder.nodes.len() {
        let Some(source_path) = builder.nodes[index].source.clone() else {
            continue;
        };
        let path = builder.nodes[index].path.clone();
        let target = builder
            .find(&source_path)
            .ok_or_else(|| ViewError::DanglingComponentReference {
                path: path.clone(),
                source_path: source_path.clone(),
            })?;
        if target.0 == index {
            return Err(ViewError::CyclicComponentReference { path });
        }

        builder.nodes[index].source_component = Some(target);
        builder.nodes[target.0].listeners.insert(path.clone());
        debug!("Linked '{}' to source '{}'", path, source_path);
        linked.push(ComponentId(index));
    }

    let mut visiting = HashSet::new();
    for id in linked {
        ensure_bound(builder, id, &mut visiting)?;
    }
    Ok(())
}

/// Bind `id`, binding whatever it depends on first. `visiting` holds the
/// components on the current dependency chain.
fn ensure_bound(
    builder: &mut ComponentTreeBuilder<'_>,
    id: ComponentId,
    visiting: &mut HashSet<ComponentId>,
) -> Result<(), ViewError> {
    if builder.nodes[id.0].data_definition.is_some() {
        return Ok(());
    }
    if !visiting.insert(id) {
        return Err(ViewError::CyclicComponentReference {
            path: builder.nodes[id.0].path.clone(),
        });
    }

    // The nearest component on the ancestor chain that declares a source
    // decides when this one can be bound.
    let mut owner = Some(id);
    while let Some(current) = owner {
        if builder.nodes[current.0].source_component.is_some() {
            break;
        }
        owner = builder.nodes[current.0].parent;
    }
    let Some(owner) = owner else {
        return Err(ViewError::UnboundComponent {
            path: builder.nodes[id.0].path.clone(),
        });
    };

    if owner != id {
        ensure_bound(builder, owner, visiting)?;
    } else if let Some(source) = builder.nodes[id.0].source_component {
        ensure_bound(builder, source, visiting)?;
        let scope = builder.nodes[source.0]
            .data_definition
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| ViewError::UnboundComponent {
                path: builder.nodes[source.0].path.clone(),
            })?;
        builder.bind_subtree(id, scope)?;
    }

    visiting.remove(&id);
    Ok(())
}
