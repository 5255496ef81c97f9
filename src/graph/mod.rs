//! Attributed graph representation used by all kernel engines.
//!
//! The graph representation relies on petgraph.
//! Nodes carry an optional discrete label and a numeric attribute vector.
//! Edges carry an optional discrete label, a numeric attribute vector and an optional weight.
//! A graph is directed or not according to a flag given at construction : storage is always a
//! directed petgraph, an undirected graph stores each edge once and answers neighbour and
//! edge queries in both orientations.
//!
//! Kernel computations index nodes by consecutive integers beginning at 0. This is guaranteed
//! by petgraph as long as no node is removed, which we never do. The original identifier of a
//! node (as it came out of some dataset loader) is kept aside in the node data.


use ndarray::Array2;

use petgraph::graph::{Graph, NodeIndex};
use petgraph::{Directed, Direction};

/// data attached to a node.
#[derive(Clone, Debug)]
pub struct NodeData {
    /// discrete (symbolic) label if any
    label: Option<String>,
    /// numeric attribute vector, possibly empty
    attributes: Vec<f64>,
    /// node id as found in the original dataset
    original_id: usize,
}

impl NodeData {
    pub fn new(label: Option<String>, attributes: Vec<f64>, original_id: usize) -> Self {
        NodeData { label, attributes, original_id }
    }

    /// a node with just a symbolic label
    pub fn with_label(label: &str) -> Self {
        NodeData { label: Some(label.to_string()), attributes: Vec::new(), original_id: 0 }
    }

    /// a node with neither label nor attributes
    pub fn unlabeled() -> Self {
        NodeData { label: None, attributes: Vec::new(), original_id: 0 }
    }

    pub fn get_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn get_attributes(&self) -> &[f64] {
        &self.attributes
    }

    pub fn get_original_id(&self) -> usize {
        self.original_id
    }
} // end of NodeData


/// data attached to an edge.
#[derive(Clone, Debug)]
pub struct EdgeData {
    /// discrete (symbolic) label if any
    label: Option<String>,
    /// numeric attribute vector, possibly empty
    attributes: Vec<f64>,
    /// optional weight. Kernels fall back to 1. when absent
    weight: Option<f64>,
}

impl EdgeData {
    pub fn new(label: Option<String>, attributes: Vec<f64>, weight: Option<f64>) -> Self {
        EdgeData { label, attributes, weight }
    }

    /// an edge with just a symbolic label
    pub fn with_label(label: &str) -> Self {
        EdgeData { label: Some(label.to_string()), attributes: Vec::new(), weight: None }
    }

    /// an edge with neither label nor attributes nor weight
    pub fn unlabeled() -> Self {
        EdgeData { label: None, attributes: Vec::new(), weight: None }
    }

    pub fn get_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn get_attributes(&self) -> &[f64] {
        &self.attributes
    }

    pub fn get_weight(&self) -> Option<f64> {
        self.weight
    }

    /// weight with the unit fallback
    pub fn weight_or_one(&self) -> f64 {
        self.weight.unwrap_or(1.)
    }
} // end of EdgeData


//==============================================================================


/// The attributed graph passed to kernel engines.
#[derive(Clone)]
pub struct LabeledGraph {
    /// underlying storage, always a directed petgraph
    graph: Graph<NodeData, EdgeData, Directed>,
    /// interpretation flag
    directed: bool,
}

impl LabeledGraph {
    pub fn new(directed: bool) -> Self {
        LabeledGraph { graph: Graph::<NodeData, EdgeData, Directed>::new(), directed }
    }

    /// adding a node. returns its (contiguous) index
    pub fn add_node(&mut self, data: NodeData) -> usize {
        self.graph.add_node(data).index()
    }

    /// adding an edge between nodes already inserted
    pub fn add_edge(&mut self, n1: usize, n2: usize, data: EdgeData) {
        self.graph.add_edge(NodeIndex::new(n1), NodeIndex::new(n2), data);
    } // end of add_edge

    pub fn nb_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn nb_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn get_node(&self, n: usize) -> &NodeData {
        &self.graph[NodeIndex::new(n)]
    }

    /// iterator over edges as stored : each edge appears once even for undirected graphs
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, &EdgeData)> {
        self.graph.edge_indices().map(move |e| {
            let (a, b) = self.graph.edge_endpoints(e).unwrap();
            (a.index(), b.index(), &self.graph[e])
        })
    } // end of edges

    /// neighbours of a node. For a directed graph these are the successors,
    /// for an undirected graph both orientations are followed.
    pub fn neighbors(&self, n: usize) -> Vec<usize> {
        let idx = NodeIndex::new(n);
        if self.directed {
            self.graph.neighbors_directed(idx, Direction::Outgoing).map(|v| v.index()).collect()
        } else {
            self.graph.neighbors_undirected(idx).map(|v| v.index()).collect()
        }
    } // end of neighbors

    /// edge data between 2 nodes, following orientation only for directed graphs. None if no edge
    pub fn get_edge(&self, n1: usize, n2: usize) -> Option<&EdgeData> {
        let i1 = NodeIndex::new(n1);
        let i2 = NodeIndex::new(n2);
        if let Some(e) = self.graph.find_edge(i1, i2) {
            return Some(&self.graph[e]);
        }
        if !self.directed {
            if let Some(e) = self.graph.find_edge(i2, i1) {
                return Some(&self.graph[e]);
            }
        }
        None
    } // end of get_edge

    /// dense transposed adjacency matrix : entry (v,u) is the weight of edge (u,v).
    /// Symmetric for undirected graphs. With use_weight false all present edges count 1.
    pub fn transposed_adjacency(&self, use_weight: bool) -> Array2<f64> {
        let n = self.nb_nodes();
        let mut a = Array2::<f64>::zeros((n, n));
        for (u, v, data) in self.edges() {
            let w = if use_weight { data.weight_or_one() } else { 1. };
            a[[v, u]] = w;
            if !self.directed {
                a[[u, v]] = w;
            }
        }
        a
    } // end of transposed_adjacency

    /// a copy of the graph with node labels replaced positionally.
    /// Used by the Weisfeiler-Lehman engine : refinement produces new label layers
    /// instead of overwriting the graphs given by the caller.
    pub fn with_node_labels(&self, labels: &[String]) -> LabeledGraph {
        assert_eq!(labels.len(), self.nb_nodes());
        let mut relabeled = self.clone();
        for n in self.graph.node_indices() {
            relabeled.graph[n].label = Some(labels[n.index()].clone());
        }
        relabeled
    } // end of with_node_labels

    /// all pairs shortest path lengths by the Floyd-Warshall transformation.
    /// Unreachable pairs get f64::INFINITY. With use_weight false all edges count 1.
    pub fn floyd_warshall(&self, use_weight: bool) -> Array2<f64> {
        let n = self.nb_nodes();
        let mut dist = Array2::<f64>::from_elem((n, n), f64::INFINITY);
        for i in 0..n {
            dist[[i, i]] = 0.;
        }
        for (u, v, data) in self.edges() {
            let w = if use_weight { data.weight_or_one() } else { 1. };
            dist[[u, v]] = dist[[u, v]].min(w);
            if !self.directed {
                dist[[v, u]] = dist[[v, u]].min(w);
            }
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    let d = dist[[i, k]] + dist[[k, j]];
                    if d < dist[[i, j]] {
                        dist[[i, j]] = d;
                    }
                }
            }
        }
        dist
    } // end of floyd_warshall
} // end of impl LabeledGraph


//==============================================================================

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // a triangle with a pending node
    fn small_graph(directed: bool) -> LabeledGraph {
        let mut g = LabeledGraph::new(directed);
        for label in ["C", "C", "O", "H"] {
            g.add_node(NodeData::with_label(label));
        }
        g.add_edge(0, 1, EdgeData::unlabeled());
        g.add_edge(1, 2, EdgeData::unlabeled());
        g.add_edge(2, 0, EdgeData::unlabeled());
        g.add_edge(2, 3, EdgeData::unlabeled());
        g
    }

    #[test]
    fn test_graph_neighbors() {
        log_init_test();
        let g = small_graph(false);
        let mut nbrs = g.neighbors(2);
        nbrs.sort_unstable();
        assert_eq!(nbrs, vec![0, 1, 3]);
        assert!(g.get_edge(3, 2).is_some());
        //
        let gd = small_graph(true);
        let mut nbrs = gd.neighbors(2);
        nbrs.sort_unstable();
        assert_eq!(nbrs, vec![0, 3]);
        assert!(gd.get_edge(3, 2).is_none());
    } // end of test_graph_neighbors

    #[test]
    fn test_graph_adjacency() {
        log_init_test();
        let g = small_graph(false);
        let a = g.transposed_adjacency(false);
        for i in 0..g.nb_nodes() {
            for j in 0..g.nb_nodes() {
                assert_eq!(a[[i, j]], a[[j, i]]);
            }
        }
        assert_eq!(a[[1, 0]], 1.);
        assert_eq!(a[[3, 0]], 0.);
    } // end of test_graph_adjacency

    #[test]
    fn test_floyd_warshall() {
        log_init_test();
        let g = small_graph(false);
        let dist = g.floyd_warshall(false);
        assert_eq!(dist[[0, 3]], 2.);
        assert_eq!(dist[[3, 0]], 2.);
        // isolated node added afterwards is unreachable
        let mut g2 = small_graph(false);
        g2.add_node(NodeData::unlabeled());
        let dist2 = g2.floyd_warshall(false);
        assert!(dist2[[0, 4]].is_infinite());
    } // end of test_floyd_warshall
} // end of mod tests
