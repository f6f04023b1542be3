//! Render graph compilation.
//!
//! Compilation turns the resource accesses declared by each pass into an
//! execution order:
//!
//! 1. **Node creation** - one [`RenderGraphNode`] per registered pass
//! 2. **Access indexing** - find the single writer and all readers of every resource
//! 3. **Stable topological sort** - Kahn's algorithm over "reader depends on writer" edges
//!
//! The sort is stable: whenever several passes are ready, the one with the
//! smallest [`RenderPassId`] is emitted first (or the earliest added one, see
//! [`TieBreak`]). Two frames that register the same passes with the same
//! accesses therefore always execute in the same order, regardless of the
//! order of `add_pass` calls.
//!
//! # Example
//!
//! ```ignore
//! // P1 writes R1, P2 reads R1 and writes R2, P3 reads R2
//! let nodes = create_nodes(&[&p1, &p2, &p3])?;
//! let mut order = Vec::new();
//! stable_topological_sort(&nodes, TieBreak::AscendingId, &mut order)?;
//! assert_eq!(order, [p1.id(), p2.id(), p3.id()]);
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::render_graph::config::TieBreak;
use crate::render_graph::error::{GraphError, GraphResult};
use crate::render_graph::pass::{RenderPass, RenderPassId};
use crate::render_graph::resource::ResourceHandle;

/// A pass and the passes it must wait for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderGraphNode {
    pub pass_id: RenderPassId,
    /// Writers of the resources this pass reads, sorted by id
    pub dependencies: Vec<RenderPassId>,
}

/// Build one node per pass and derive dependencies from declared accesses.
///
/// `passes` must be given in the order they were added to the graph; the
/// returned nodes keep that order.
///
/// # Errors
///
/// * [`GraphError::MultipleWriters`] - two passes write the same resource
/// * [`GraphError::ReadWriteConflict`] - a pass reads a resource it also writes
pub fn create_nodes(passes: &[&RenderPass]) -> GraphResult<Vec<RenderGraphNode>> {
    let mut nodes: Vec<RenderGraphNode> = passes
        .iter()
        .map(|pass| RenderGraphNode {
            pass_id: pass.id(),
            dependencies: Vec::new(),
        })
        .collect();

    let index_of: HashMap<RenderPassId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.pass_id, index))
        .collect();

    // Exactly one writer per resource, any number of readers
    let mut writers: HashMap<ResourceHandle, RenderPassId> = HashMap::new();
    let mut readers: HashMap<ResourceHandle, Vec<RenderPassId>> = HashMap::new();

    for pass in passes {
        for &resource in pass.write_token().accessible_resource_handles() {
            if let Some(&first) = writers.get(&resource) {
                return Err(GraphError::MultipleWriters {
                    resource,
                    first,
                    second: pass.id(),
                });
            }
            writers.insert(resource, pass.id());
        }

        for &resource in pass.read_token().accessible_resource_handles() {
            if pass.write_token().has_access(resource) {
                return Err(GraphError::ReadWriteConflict {
                    pass: pass.id(),
                    resource,
                });
            }
            readers.entry(resource).or_default().push(pass.id());
        }
    }

    for (resource, writer) in &writers {
        let Some(resource_readers) = readers.get(resource) else {
            continue;
        };
        for reader in resource_readers {
            nodes[index_of[reader]].dependencies.push(*writer);
        }
    }

    for node in &mut nodes {
        node.dependencies.sort_unstable();
        node.dependencies.dedup();
    }

    Ok(nodes)
}

/// Order `nodes` so that every pass comes after all of its dependencies.
///
/// The result is written into `sorted`, which is cleared first so its
/// allocation can be reused between frames. On a cycle `sorted` is left empty.
///
/// # Errors
///
/// * [`GraphError::CyclicDependency`] - listing every pass that could not be ordered
pub fn stable_topological_sort(
    nodes: &[RenderGraphNode],
    tie_break: TieBreak,
    sorted: &mut Vec<RenderPassId>,
) -> GraphResult<()> {
    sorted.clear();

    let index_of: HashMap<RenderPassId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.pass_id, index))
        .collect();

    let priority = |index: usize| -> usize {
        match tie_break {
            TieBreak::AscendingId => nodes[index].pass_id.index() as usize,
            TieBreak::InsertionOrder => index,
        }
    };

    // Reverse edges: dependency -> dependents
    let mut in_degree = vec![0u32; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (index, node) in nodes.iter().enumerate() {
        for dependency in &node.dependencies {
            in_degree[index] += 1;
            // A dependency outside this node set never becomes ready
            if let Some(&dependency_index) = index_of.get(dependency) {
                dependents[dependency_index].push(index);
            }
        }
    }

    let mut ready: BTreeSet<(usize, usize)> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(index, _)| (priority(index), index))
        .collect();

    while let Some((_, index)) = ready.pop_first() {
        sorted.push(nodes[index].pass_id);

        for &dependent in &dependents[index] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.insert((priority(dependent), dependent));
            }
        }
    }

    if sorted.len() != nodes.len() {
        sorted.clear();
        let mut involved: Vec<RenderPassId> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &degree)| degree > 0)
            .map(|(index, _)| nodes[index].pass_id)
            .collect();
        involved.sort_unstable();
        return Err(GraphError::CyclicDependency { involved });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass(id: u32, reads: &[u32], writes: &[u32]) -> RenderPass {
        let mut pass = RenderPass::new(RenderPassId::new(id));
        pass.setup(|builder| {
            for &r in reads {
                builder.read(ResourceHandle::new(r, 0));
            }
            for &w in writes {
                builder.write(ResourceHandle::new(w, 0));
            }
            true
        });
        pass
    }

    fn node(id: u32, dependencies: &[u32]) -> RenderGraphNode {
        RenderGraphNode {
            pass_id: RenderPassId::new(id),
            dependencies: dependencies.iter().map(|&d| RenderPassId::new(d)).collect(),
        }
    }

    fn ids(raw: &[u32]) -> Vec<RenderPassId> {
        raw.iter().map(|&i| RenderPassId::new(i)).collect()
    }

    fn sort(nodes: &[RenderGraphNode], tie_break: TieBreak) -> GraphResult<Vec<RenderPassId>> {
        let mut sorted = Vec::new();
        stable_topological_sort(nodes, tie_break, &mut sorted)?;
        Ok(sorted)
    }

    #[test]
    fn test_create_nodes_empty() {
        let nodes = create_nodes(&[]).unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_create_nodes_chain() {
        let p1 = pass(0, &[], &[1]);
        let p2 = pass(1, &[1], &[2]);
        let p3 = pass(2, &[2], &[]);

        let nodes = create_nodes(&[&p1, &p2, &p3]).unwrap();
        assert_eq!(nodes, vec![node(0, &[]), node(1, &[0]), node(2, &[1])]);
    }

    #[test]
    fn test_create_nodes_keeps_insertion_order() {
        let p1 = pass(4, &[], &[]);
        let p2 = pass(1, &[], &[]);
        let nodes = create_nodes(&[&p1, &p2]).unwrap();
        assert_eq!(nodes[0].pass_id, RenderPassId::new(4));
        assert_eq!(nodes[1].pass_id, RenderPassId::new(1));
    }

    #[test]
    fn test_create_nodes_deduplicates_dependencies() {
        // Reader depends on the same writer through two resources
        let writer = pass(0, &[], &[1, 2]);
        let reader = pass(1, &[1, 2], &[]);

        let nodes = create_nodes(&[&writer, &reader]).unwrap();
        assert_eq!(nodes[1], node(1, &[0]));
    }

    #[test]
    fn test_create_nodes_reader_added_before_writer() {
        let reader = pass(0, &[5], &[]);
        let writer = pass(1, &[], &[5]);

        let nodes = create_nodes(&[&reader, &writer]).unwrap();
        assert_eq!(nodes, vec![node(0, &[1]), node(1, &[])]);
    }

    #[test]
    fn test_create_nodes_unwritten_reads_have_no_dependency() {
        let a = pass(0, &[9], &[]);
        let b = pass(1, &[9], &[]);
        let nodes = create_nodes(&[&a, &b]).unwrap();
        assert!(nodes.iter().all(|n| n.dependencies.is_empty()));
    }

    #[test]
    fn test_create_nodes_multiple_writers() {
        let a = pass(0, &[], &[3]);
        let b = pass(1, &[], &[3]);

        let result = create_nodes(&[&a, &b]);
        assert_eq!(
            result,
            Err(GraphError::MultipleWriters {
                resource: ResourceHandle::new(3, 0),
                first: RenderPassId::new(0),
                second: RenderPassId::new(1),
            })
        );
    }

    #[test]
    fn test_create_nodes_read_write_conflict() {
        let a = pass(0, &[3], &[3]);

        let result = create_nodes(&[&a]);
        assert_eq!(
            result,
            Err(GraphError::ReadWriteConflict {
                pass: RenderPassId::new(0),
                resource: ResourceHandle::new(3, 0),
            })
        );
    }

    #[test]
    fn test_sort_empty() {
        assert!(sort(&[], TieBreak::AscendingId).unwrap().is_empty());
    }

    #[test]
    fn test_sort_linear_chain() {
        let nodes = [node(0, &[]), node(1, &[0]), node(2, &[1])];
        assert_eq!(sort(&nodes, TieBreak::AscendingId).unwrap(), ids(&[0, 1, 2]));
    }

    #[test]
    fn test_sort_independent_passes_by_ascending_id() {
        // Added as 3, 1, 2 but independent passes run by id
        let nodes = [node(3, &[]), node(1, &[]), node(2, &[])];
        assert_eq!(sort(&nodes, TieBreak::AscendingId).unwrap(), ids(&[1, 2, 3]));
    }

    #[test]
    fn test_sort_independent_passes_by_insertion_order() {
        let nodes = [node(3, &[]), node(1, &[]), node(2, &[])];
        assert_eq!(
            sort(&nodes, TieBreak::InsertionOrder).unwrap(),
            ids(&[3, 1, 2])
        );
    }

    #[test]
    fn test_sort_newly_ready_pass_competes_by_id() {
        // 0 unlocks 1; 2 is independent. 1 is ready before 2 is taken and wins on id.
        let nodes = [node(2, &[]), node(0, &[]), node(1, &[0])];
        assert_eq!(sort(&nodes, TieBreak::AscendingId).unwrap(), ids(&[0, 1, 2]));
    }

    #[test]
    fn test_sort_diamond() {
        //     0
        //    / \
        //   1   2
        //    \ /
        //     3
        let nodes = [
            node(3, &[1, 2]),
            node(2, &[0]),
            node(1, &[0]),
            node(0, &[]),
        ];
        assert_eq!(
            sort(&nodes, TieBreak::AscendingId).unwrap(),
            ids(&[0, 1, 2, 3])
        );
    }

    #[test]
    fn test_sort_cycle_two_nodes() {
        let nodes = [node(0, &[1]), node(1, &[0])];
        let mut sorted = vec![RenderPassId::new(7)];
        let result = stable_topological_sort(&nodes, TieBreak::AscendingId, &mut sorted);

        assert_eq!(
            result,
            Err(GraphError::CyclicDependency {
                involved: ids(&[0, 1])
            })
        );
        assert!(sorted.is_empty());
    }

    #[test]
    fn test_sort_partial_cycle() {
        // 0 is fine, 1 <-> 2 cycle, 3 waits on the cycle
        let nodes = [node(0, &[]), node(1, &[0, 2]), node(2, &[1]), node(3, &[2])];
        let result = sort(&nodes, TieBreak::AscendingId);
        assert_eq!(
            result,
            Err(GraphError::CyclicDependency {
                involved: ids(&[1, 2, 3])
            })
        );
    }

    #[test]
    fn test_sort_reuses_output() {
        let nodes = [node(0, &[]), node(1, &[0])];
        let mut sorted = ids(&[5, 6, 7]);
        stable_topological_sort(&nodes, TieBreak::AscendingId, &mut sorted).unwrap();
        assert_eq!(sorted, ids(&[0, 1]));
    }
}
