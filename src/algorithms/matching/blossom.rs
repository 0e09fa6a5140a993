//! Edmonds' blossom algorithm for weighted matching in general graphs.
//!
//! Primal-dual formulation following Galil, "Efficient Algorithms for Finding
//! Maximum Matching in Graphs" (ACM Computing Surveys, 1986), O(n³).
//!
//! Vertices are numbered `0..n`, non-trivial blossoms `n..2n`. Edge `k`
//! owns the endpoints `2k` and `2k + 1`. Vertex duals are stored doubled so
//! that slacks stay integral on integral input. Weights are `f64`, so a slack
//! within [`Blossom::tolerance`] of zero counts as tight.

use log::debug;
use ordered_float::OrderedFloat;

use super::{check_vertex_set, MatchingSolver};
use crate::error::{ChristofidesError, Result};
use crate::graph::{Matching, WeightedGraph};

const NONE: usize = usize::MAX;

const FREE: u8 = 0;
const S_LABEL: u8 = 1;
const T_LABEL: u8 = 2;
const BREADCRUMB: u8 = 4;

/// Minimum-weight perfect matching through the blossom algorithm.
///
/// The induced subgraph is re-weighted to `max_w + 1 - w`; a maximum-cardinality
/// matching of maximum re-weighted total is then a minimum-weight perfect
/// matching of the original weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlossomMatching;

impl BlossomMatching {
    pub fn new() -> Self {
        BlossomMatching
    }
}

impl MatchingSolver for BlossomMatching {
    fn min_weight_perfect_matching(
        &self,
        graph: &WeightedGraph,
        vertices: &[usize],
    ) -> Result<Matching> {
        check_vertex_set(graph, vertices)?;
        if vertices.is_empty() {
            return Ok(Matching::default());
        }

        let mut edges = Vec::new();
        for (a, &u) in vertices.iter().enumerate() {
            for (b, &v) in vertices.iter().enumerate().skip(a + 1) {
                if graph.has_edge(u, v) {
                    edges.push((a, b, graph.weight(u, v)));
                }
            }
        }
        let max_weight = match edges.iter().map(|e| OrderedFloat(e.2)).max() {
            Some(w) => w.into_inner(),
            None => {
                return Err(ChristofidesError::NoPerfectMatching(format!(
                    "no edge among the {} odd vertices",
                    vertices.len()
                )))
            }
        };
        for edge in edges.iter_mut() {
            edge.2 = max_weight + 1.0 - edge.2;
        }

        let mate = max_weight_matching(vertices.len(), edges, true);

        let mut pairs = Vec::with_capacity(vertices.len() / 2);
        for (a, m) in mate.iter().enumerate() {
            match *m {
                Some(b) if a < b => pairs.push((vertices[a], vertices[b])),
                Some(_) => {}
                None => {
                    return Err(ChristofidesError::NoPerfectMatching(format!(
                        "vertex {} is left unmatched in the induced subgraph",
                        vertices[a]
                    )))
                }
            }
        }

        let matching = Matching::from_pairs(graph, pairs);
        debug!(
            "Blossom matching: {} pairs, total weight {:.6}",
            matching.len(),
            matching.total_weight
        );
        Ok(matching)
    }

    fn name(&self) -> &str {
        "Blossom"
    }
}

/// Maximum-weight matching on `num_vertices` vertices and the edge list
/// `(i, j, weight)`. With `max_cardinality`, only maximum-cardinality
/// matchings are considered. Returns each vertex's partner.
pub(crate) fn max_weight_matching(
    num_vertices: usize,
    edges: Vec<(usize, usize, f64)>,
    max_cardinality: bool,
) -> Vec<Option<usize>> {
    if edges.is_empty() {
        return vec![None; num_vertices];
    }
    let mut blossom = Blossom::new(num_vertices, edges, max_cardinality);
    blossom.solve();
    blossom
        .mate
        .iter()
        .map(|&p| if p == NONE { None } else { Some(blossom.endpoint[p]) })
        .collect()
}

/// Index a blossom's child or endpoint list modulo its length, negative offsets included.
#[inline]
fn cyclic(list: &[usize], j: isize) -> usize {
    list[j.rem_euclid(list.len() as isize) as usize]
}

struct Blossom {
    n: usize,
    edges: Vec<(usize, usize, f64)>,
    max_cardinality: bool,
    tolerance: f64,
    /// Vertex attached to each edge endpoint.
    endpoint: Vec<usize>,
    /// Remote endpoints of the edges incident to each vertex.
    neighbour_ends: Vec<Vec<usize>>,
    /// Remote endpoint of each vertex's matched edge.
    mate: Vec<usize>,
    label: Vec<u8>,
    /// Remote endpoint of the edge through which a blossom got its label.
    label_end: Vec<usize>,
    /// Top-level blossom containing each vertex.
    in_blossom: Vec<usize>,
    blossom_parent: Vec<usize>,
    /// Sub-blossoms, starting at the base and going round.
    blossom_children: Vec<Vec<usize>>,
    blossom_base: Vec<usize>,
    /// `blossom_endps[b][i]` connects child `i` to child `i + 1`.
    blossom_endps: Vec<Vec<usize>>,
    /// Least-slack edge to an S-vertex (free vertices) or to another S-blossom.
    best_edge: Vec<usize>,
    blossom_best_edges: Vec<Option<Vec<usize>>>,
    unused_blossoms: Vec<usize>,
    dual: Vec<f64>,
    allow_edge: Vec<bool>,
    queue: Vec<usize>,
}

impl Blossom {
    fn new(n: usize, edges: Vec<(usize, usize, f64)>, max_cardinality: bool) -> Self {
        let max_weight = edges.iter().map(|e| e.2).fold(0.0, f64::max);
        let num_edges = edges.len();

        let endpoint = (0..2 * num_edges)
            .map(|p| if p % 2 == 0 { edges[p / 2].0 } else { edges[p / 2].1 })
            .collect();
        let mut neighbour_ends = vec![Vec::new(); n];
        for (k, &(i, j, _)) in edges.iter().enumerate() {
            neighbour_ends[i].push(2 * k + 1);
            neighbour_ends[j].push(2 * k);
        }

        let mut blossom_base: Vec<usize> = (0..n).collect();
        blossom_base.extend(std::iter::repeat(NONE).take(n));
        let mut dual = vec![max_weight; n];
        dual.extend(std::iter::repeat(0.0).take(n));

        Blossom {
            n,
            edges,
            max_cardinality,
            tolerance: 1e-9 * max_weight.max(1.0),
            endpoint,
            neighbour_ends,
            mate: vec![NONE; n],
            label: vec![FREE; 2 * n],
            label_end: vec![NONE; 2 * n],
            in_blossom: (0..n).collect(),
            blossom_parent: vec![NONE; 2 * n],
            blossom_children: vec![Vec::new(); 2 * n],
            blossom_base,
            blossom_endps: vec![Vec::new(); 2 * n],
            best_edge: vec![NONE; 2 * n],
            blossom_best_edges: vec![None; 2 * n],
            unused_blossoms: (n..2 * n).collect(),
            dual,
            allow_edge: vec![false; num_edges],
            queue: Vec::new(),
        }
    }

    /// Twice the slack of edge `k` (not valid inside blossoms).
    #[inline]
    fn slack(&self, k: usize) -> f64 {
        let (i, j, w) = self.edges[k];
        self.dual[i] + self.dual[j] - 2.0 * w
    }

    fn blossom_leaves(&self, b: usize) -> Vec<usize> {
        if b < self.n {
            return vec![b];
        }
        let mut leaves = Vec::new();
        for &t in &self.blossom_children[b] {
            if t < self.n {
                leaves.push(t);
            } else {
                leaves.extend(self.blossom_leaves(t));
            }
        }
        leaves
    }

    /// Label the top-level blossom containing `w` with `t`, reached through
    /// the edge whose remote endpoint is `p`.
    fn assign_label(&mut self, w: usize, t: u8, p: usize) {
        let b = self.in_blossom[w];
        debug_assert!(self.label[w] == FREE && self.label[b] == FREE);
        self.label[w] = t;
        self.label[b] = t;
        self.label_end[w] = p;
        self.label_end[b] = p;
        self.best_edge[w] = NONE;
        self.best_edge[b] = NONE;
        if t == S_LABEL {
            let leaves = self.blossom_leaves(b);
            self.queue.extend(leaves);
        } else if t == T_LABEL {
            // Only the base of a T-blossom has an external mate; it becomes S.
            let base = self.blossom_base[b];
            let mate = self.mate[base];
            debug_assert!(mate != NONE);
            self.assign_label(self.endpoint[mate], S_LABEL, mate ^ 1);
        }
    }

    /// Trace back from `v` and `w` to find either a new blossom (returns its
    /// base) or an augmenting path (returns `NONE`).
    fn scan_blossom(&mut self, v: usize, w: usize) -> usize {
        let mut path = Vec::new();
        let mut base = NONE;
        let (mut v, mut w) = (v, w);
        while v != NONE || w != NONE {
            let mut b = self.in_blossom[v];
            if self.label[b] & BREADCRUMB != 0 {
                base = self.blossom_base[b];
                break;
            }
            debug_assert_eq!(self.label[b], S_LABEL);
            path.push(b);
            self.label[b] = S_LABEL | BREADCRUMB;
            if self.label_end[b] == NONE {
                // Base of b is single; this path stops here.
                v = NONE;
            } else {
                v = self.endpoint[self.label_end[b]];
                b = self.in_blossom[v];
                debug_assert_eq!(self.label[b], T_LABEL);
                v = self.endpoint[self.label_end[b]];
            }
            if w != NONE {
                std::mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.label[b] = S_LABEL;
        }
        base
    }

    /// Create a new S-blossom with the given base through edge `k`, which
    /// joins two S-vertices.
    fn add_blossom(&mut self, base: usize, k: usize) {
        let (mut v, mut w, _) = self.edges[k];
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[v];
        let mut bw = self.in_blossom[w];

        let b = match self.unused_blossoms.pop() {
            Some(b) => b,
            None => unreachable!("at most n/2 blossoms are ever in use"),
        };
        self.blossom_base[b] = base;
        self.blossom_parent[b] = NONE;
        self.blossom_parent[bb] = b;

        let mut children = Vec::new();
        let mut endps = Vec::new();

        while bv != bb {
            self.blossom_parent[bv] = b;
            children.push(bv);
            endps.push(self.label_end[bv]);
            v = self.endpoint[self.label_end[bv]];
            bv = self.in_blossom[v];
        }
        children.push(bb);
        children.reverse();
        endps.reverse();
        endps.push(2 * k);

        while bw != bb {
            self.blossom_parent[bw] = b;
            children.push(bw);
            endps.push(self.label_end[bw] ^ 1);
            w = self.endpoint[self.label_end[bw]];
            bw = self.in_blossom[w];
        }

        self.blossom_children[b] = children;
        self.blossom_endps[b] = endps;

        debug_assert_eq!(self.label[bb], S_LABEL);
        self.label[b] = S_LABEL;
        self.label_end[b] = self.label_end[bb];
        self.dual[b] = 0.0;

        for leaf in self.blossom_leaves(b) {
            if self.label[self.in_blossom[leaf]] == T_LABEL {
                // A T-vertex swallowed by an S-blossom becomes an S-vertex.
                self.queue.push(leaf);
            }
            self.in_blossom[leaf] = b;
        }

        let mut best_edge_to = vec![NONE; 2 * self.n];
        for bv in self.blossom_children[b].clone() {
            let lists: Vec<Vec<usize>> = match self.blossom_best_edges[bv].take() {
                Some(list) => vec![list],
                None => self
                    .blossom_leaves(bv)
                    .into_iter()
                    .map(|leaf| self.neighbour_ends[leaf].iter().map(|p| p / 2).collect())
                    .collect(),
            };
            for list in lists {
                for k in list {
                    let (mut i, mut j, _) = self.edges[k];
                    if self.in_blossom[j] == b {
                        std::mem::swap(&mut i, &mut j);
                    }
                    let bj = self.in_blossom[j];
                    if bj != b
                        && self.label[bj] == S_LABEL
                        && (best_edge_to[bj] == NONE || self.slack(k) < self.slack(best_edge_to[bj]))
                    {
                        best_edge_to[bj] = k;
                    }
                }
            }
            self.best_edge[bv] = NONE;
        }

        let best: Vec<usize> = best_edge_to.into_iter().filter(|&k| k != NONE).collect();
        self.best_edge[b] = NONE;
        for &k in &best {
            if self.best_edge[b] == NONE || self.slack(k) < self.slack(self.best_edge[b]) {
                self.best_edge[b] = k;
            }
        }
        self.blossom_best_edges[b] = Some(best);
    }

    /// Dissolve top-level blossom `b`.
    fn expand_blossom(&mut self, b: usize, end_stage: bool) {
        for s in self.blossom_children[b].clone() {
            self.blossom_parent[s] = NONE;
            if s < self.n {
                self.in_blossom[s] = s;
            } else if end_stage && self.dual[s] <= 0.0 {
                self.expand_blossom(s, end_stage);
            } else {
                for leaf in self.blossom_leaves(s) {
                    self.in_blossom[leaf] = s;
                }
            }
        }

        // Expanding a T-blossom mid-stage: relabel the sub-blossoms on the
        // even-length path from the entry child to the base.
        if !end_stage && self.label[b] == T_LABEL {
            let entry_child = self.in_blossom[self.endpoint[self.label_end[b] ^ 1]];
            let len = self.blossom_children[b].len() as isize;
            let mut j = self.blossom_children[b]
                .iter()
                .position(|&c| c == entry_child)
                .map_or(0, |pos| pos as isize);
            let (jstep, endptrick): (isize, usize) = if j & 1 != 0 {
                j -= len;
                (1, 0)
            } else {
                (-1, 1)
            };

            let mut p = self.label_end[b];
            while j != 0 {
                let q = cyclic(&self.blossom_endps[b], j - endptrick as isize);
                self.label[self.endpoint[p ^ 1]] = FREE;
                self.label[self.endpoint[q ^ endptrick ^ 1]] = FREE;
                self.assign_label(self.endpoint[p ^ 1], T_LABEL, p);
                self.allow_edge[q / 2] = true;
                j += jstep;
                p = cyclic(&self.blossom_endps[b], j - endptrick as isize) ^ endptrick;
                self.allow_edge[p / 2] = true;
                j += jstep;
            }

            // The base sub-blossom keeps label T without passing it to its mate.
            let bv = cyclic(&self.blossom_children[b], j);
            self.label[self.endpoint[p ^ 1]] = T_LABEL;
            self.label[bv] = T_LABEL;
            self.label_end[self.endpoint[p ^ 1]] = p;
            self.label_end[bv] = p;
            self.best_edge[bv] = NONE;

            j += jstep;
            while cyclic(&self.blossom_children[b], j) != entry_child {
                let bv = cyclic(&self.blossom_children[b], j);
                if self.label[bv] == S_LABEL {
                    j += jstep;
                    continue;
                }
                let reached = self
                    .blossom_leaves(bv)
                    .into_iter()
                    .find(|&leaf| self.label[leaf] != FREE);
                if let Some(v) = reached {
                    debug_assert_eq!(self.label[v], T_LABEL);
                    debug_assert_eq!(self.in_blossom[v], bv);
                    self.label[v] = FREE;
                    let base_mate = self.mate[self.blossom_base[bv]];
                    self.label[self.endpoint[base_mate]] = FREE;
                    let end = self.label_end[v];
                    self.assign_label(v, T_LABEL, end);
                }
                j += jstep;
            }
        }

        self.label[b] = FREE;
        self.label_end[b] = NONE;
        self.blossom_children[b].clear();
        self.blossom_endps[b].clear();
        self.blossom_base[b] = NONE;
        self.blossom_best_edges[b] = None;
        self.best_edge[b] = NONE;
        self.unused_blossoms.push(b);
    }

    /// Flip matched and unmatched edges on the path through blossom `b`
    /// from vertex `v` to the base; `v` becomes the new base.
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.blossom_parent[t] != b {
            t = self.blossom_parent[t];
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }

        let len = self.blossom_children[b].len() as isize;
        let i = self.blossom_children[b]
            .iter()
            .position(|&c| c == t)
            .unwrap_or(0);
        let mut j = i as isize;
        let (jstep, endptrick): (isize, usize) = if i & 1 != 0 {
            j -= len;
            (1, 0)
        } else {
            (-1, 1)
        };

        while j != 0 {
            j += jstep;
            let t = cyclic(&self.blossom_children[b], j);
            let p = cyclic(&self.blossom_endps[b], j - endptrick as isize) ^ endptrick;
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p]);
            }
            j += jstep;
            let t = cyclic(&self.blossom_children[b], j);
            if t >= self.n {
                self.augment_blossom(t, self.endpoint[p ^ 1]);
            }
            self.mate[self.endpoint[p]] = p ^ 1;
            self.mate[self.endpoint[p ^ 1]] = p;
        }

        self.blossom_children[b].rotate_left(i);
        self.blossom_endps[b].rotate_left(i);
        self.blossom_base[b] = self.blossom_base[self.blossom_children[b][0]];
        debug_assert_eq!(self.blossom_base[b], v);
    }

    /// Augment along the path through edge `k`, which joins two S-vertices.
    fn augment_matching(&mut self, k: usize) {
        let (v, w, _) = self.edges[k];
        for (start, remote) in [(v, 2 * k + 1), (w, 2 * k)] {
            let (mut s, mut p) = (start, remote);
            loop {
                let bs = self.in_blossom[s];
                debug_assert_eq!(self.label[bs], S_LABEL);
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = p;
                if self.label_end[bs] == NONE {
                    // Reached a single vertex.
                    break;
                }
                let t = self.endpoint[self.label_end[bs]];
                let bt = self.in_blossom[t];
                debug_assert_eq!(self.label[bt], T_LABEL);
                s = self.endpoint[self.label_end[bt]];
                let j = self.endpoint[self.label_end[bt] ^ 1];
                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = self.label_end[bt];
                p = self.label_end[bt] ^ 1;
            }
        }
    }

    fn solve(&mut self) {
        for _stage in 0..self.n {
            self.label.iter_mut().for_each(|l| *l = FREE);
            self.best_edge.iter_mut().for_each(|e| *e = NONE);
            for b in self.n..2 * self.n {
                self.blossom_best_edges[b] = None;
            }
            self.allow_edge.iter_mut().for_each(|a| *a = false);
            self.queue.clear();

            for v in 0..self.n {
                if self.mate[v] == NONE && self.label[self.in_blossom[v]] == FREE {
                    self.assign_label(v, S_LABEL, NONE);
                }
            }

            let mut augmented = false;
            loop {
                while !augmented {
                    let v = match self.queue.pop() {
                        Some(v) => v,
                        None => break,
                    };
                    debug_assert_eq!(self.label[self.in_blossom[v]], S_LABEL);

                    for p in self.neighbour_ends[v].clone() {
                        let k = p / 2;
                        let w = self.endpoint[p];
                        if self.in_blossom[v] == self.in_blossom[w] {
                            continue;
                        }
                        let mut kslack = 0.0;
                        if !self.allow_edge[k] {
                            kslack = self.slack(k);
                            if kslack <= self.tolerance {
                                self.allow_edge[k] = true;
                            }
                        }
                        if self.allow_edge[k] {
                            if self.label[self.in_blossom[w]] == FREE {
                                self.assign_label(w, T_LABEL, p ^ 1);
                            } else if self.label[self.in_blossom[w]] == S_LABEL {
                                let base = self.scan_blossom(v, w);
                                if base != NONE {
                                    self.add_blossom(base, k);
                                } else {
                                    self.augment_matching(k);
                                    augmented = true;
                                    break;
                                }
                            } else if self.label[w] == FREE {
                                // w sits inside a T-blossom and is now reachable.
                                self.label[w] = T_LABEL;
                                self.label_end[w] = p ^ 1;
                            }
                        } else if self.label[self.in_blossom[w]] == S_LABEL {
                            let b = self.in_blossom[v];
                            if self.best_edge[b] == NONE || kslack < self.slack(self.best_edge[b]) {
                                self.best_edge[b] = k;
                            }
                        } else if self.label[w] == FREE
                            && (self.best_edge[w] == NONE || kslack < self.slack(self.best_edge[w]))
                        {
                            self.best_edge[w] = k;
                        }
                    }
                }

                if augmented {
                    break;
                }

                // No augmenting path with tight edges: adjust the duals.
                let mut delta_type = 0u8;
                let mut delta = 0.0;
                let mut delta_edge = NONE;
                let mut delta_blossom = NONE;

                if !self.max_cardinality {
                    delta_type = 1;
                    delta = self.dual[..self.n].iter().cloned().fold(f64::INFINITY, f64::min);
                }

                // delta2: least slack between an S-vertex and a free vertex.
                for v in 0..self.n {
                    if self.label[self.in_blossom[v]] == FREE && self.best_edge[v] != NONE {
                        let d = self.slack(self.best_edge[v]);
                        if delta_type == 0 || d < delta {
                            delta = d;
                            delta_type = 2;
                            delta_edge = self.best_edge[v];
                        }
                    }
                }

                // delta3: half the least slack between two S-blossoms.
                for b in 0..2 * self.n {
                    if self.blossom_parent[b] == NONE
                        && self.label[b] == S_LABEL
                        && self.best_edge[b] != NONE
                    {
                        let d = self.slack(self.best_edge[b]) / 2.0;
                        if delta_type == 0 || d < delta {
                            delta = d;
                            delta_type = 3;
                            delta_edge = self.best_edge[b];
                        }
                    }
                }

                // delta4: least dual of a T-blossom.
                for b in self.n..2 * self.n {
                    if self.blossom_base[b] != NONE
                        && self.blossom_parent[b] == NONE
                        && self.label[b] == T_LABEL
                        && (delta_type == 0 || self.dual[b] < delta)
                    {
                        delta = self.dual[b];
                        delta_type = 4;
                        delta_blossom = b;
                    }
                }

                if delta_type == 0 {
                    // Maximum cardinality reached; final update keeps duals feasible.
                    delta_type = 1;
                    delta = self.dual[..self.n]
                        .iter()
                        .cloned()
                        .fold(f64::INFINITY, f64::min)
                        .max(0.0);
                }

                for v in 0..self.n {
                    match self.label[self.in_blossom[v]] {
                        S_LABEL => self.dual[v] -= delta,
                        T_LABEL => self.dual[v] += delta,
                        _ => {}
                    }
                }
                for b in self.n..2 * self.n {
                    if self.blossom_base[b] != NONE && self.blossom_parent[b] == NONE {
                        match self.label[b] {
                            S_LABEL => self.dual[b] += delta,
                            T_LABEL => self.dual[b] -= delta,
                            _ => {}
                        }
                    }
                }

                match delta_type {
                    1 => break,
                    2 => {
                        self.allow_edge[delta_edge] = true;
                        let (mut i, j, _) = self.edges[delta_edge];
                        if self.label[self.in_blossom[i]] == FREE {
                            i = j;
                        }
                        self.queue.push(i);
                    }
                    3 => {
                        self.allow_edge[delta_edge] = true;
                        let (i, _, _) = self.edges[delta_edge];
                        self.queue.push(i);
                    }
                    _ => self.expand_blossom(delta_blossom, false),
                }
            }

            if !augmented {
                break;
            }

            // End of stage: dissolve S-blossoms whose dual dropped to zero.
            for b in self.n..2 * self.n {
                if self.blossom_parent[b] == NONE
                    && self.blossom_base[b] != NONE
                    && self.label[b] == S_LABEL
                    && self.dual[b] <= 0.0
                {
                    self.expand_blossom(b, true);
                }
            }
        }
    }
}
