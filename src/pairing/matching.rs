//! Weighted matching on general (non-bipartite) graphs.
//!
//! Primal-dual Edmonds blossom algorithm in the O(n^3) formulation from
//! Galil, "Efficient algorithms for finding maximum matching in graphs"
//! (ACM Computing Surveys, 1986). Edge endpoints are numbered `2k` and
//! `2k + 1` for edge `k`, so `p ^ 1` is the opposite end of endpoint `p`.
//! Weights are `f64`; fractional weights are supported.

const NONE: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge {
    pub u: usize,
    pub v: usize,
    pub weight: f64,
}

impl WeightedEdge {
    pub fn new(u: usize, v: usize, weight: f64) -> Self {
        Self { u, v, weight }
    }
}

/// Perfect matching of minimum total weight. Returned pairs have `a < b`,
/// ordered by `a`.
///
/// Without a perfect matching, returns the nodes a maximum-cardinality
/// matching still leaves uncovered, in node order.
pub fn min_weight_perfect_matching(
    node_count: usize,
    edges: &[WeightedEdge],
) -> Result<Vec<(usize, usize)>, Vec<usize>> {
    // Every perfect matching has node_count / 2 edges, so maximising
    // (offset - w) over maximum-cardinality matchings minimises w.
    let offset = 1.0 + edges.iter().map(|e| e.weight).fold(0.0, f64::max);
    let inverted: Vec<WeightedEdge> = edges
        .iter()
        .map(|e| WeightedEdge::new(e.u, e.v, offset - e.weight))
        .collect();

    let mate = max_weight_matching(node_count, &inverted, true);
    let unmatched: Vec<usize> = (0..node_count).filter(|&v| mate[v].is_none()).collect();

    if unmatched.is_empty() {
        Ok(mate_to_pairs(&mate))
    } else {
        Err(unmatched)
    }
}

/// Maximum-weight matching. With `max_cardinality` set, only
/// maximum-cardinality matchings are considered.
/// Returns the mate of every vertex.
pub fn max_weight_matching(
    node_count: usize,
    edges: &[WeightedEdge],
    max_cardinality: bool,
) -> Vec<Option<usize>> {
    if edges.is_empty() || node_count == 0 {
        return vec![None; node_count];
    }

    debug_assert!(edges.iter().all(|e| e.u != e.v));
    debug_assert!(edges.iter().all(|e| e.u < node_count && e.v < node_count));

    Matcher::new(node_count, edges, max_cardinality).solve()
}

pub fn mate_to_pairs(mate: &[Option<usize>]) -> Vec<(usize, usize)> {
    mate.iter()
        .enumerate()
        .filter_map(|(v, m)| m.filter(|&u| v < u).map(|u| (v, u)))
        .collect()
}

enum DualStep {
    /// No further progress possible in this stage
    Stop,
    /// Edge from a free vertex to an S-vertex becomes tight
    FreeEdge(usize),
    /// Edge between two S-blossoms becomes tight
    BlossomEdge(usize),
    /// Dual of a T-blossom reaches zero
    Expand(usize),
}

struct Matcher<'a> {
    edges: &'a [WeightedEdge],
    n: usize,
    max_cardinality: bool,
    endpoint: Vec<usize>,
    neighbour_ends: Vec<Vec<usize>>,
    /// Remote endpoint of the matched edge, per vertex
    mate: Vec<usize>,
    /// 0 = free, 1 = S, 2 = T; bit 4 marks breadcrumbs during scans
    label: Vec<u8>,
    label_end: Vec<usize>,
    in_blossom: Vec<usize>,
    blossom_parent: Vec<usize>,
    blossom_children: Vec<Vec<usize>>,
    blossom_base: Vec<usize>,
    blossom_endpoints: Vec<Vec<usize>>,
    best_edge: Vec<usize>,
    blossom_best_edges: Vec<Option<Vec<usize>>>,
    unused_blossoms: Vec<usize>,
    dual: Vec<f64>,
    allow_edge: Vec<bool>,
    queue: Vec<usize>,
}

impl<'a> Matcher<'a> {
    fn new(n: usize, edges: &'a [WeightedEdge], max_cardinality: bool) -> Self {
        let max_weight = edges.iter().map(|e| e.weight).fold(0.0, f64::max);

        let endpoint = (0..2 * edges.len())
            .map(|p| {
                let edge = edges[p / 2];
                if p % 2 == 0 { edge.u } else { edge.v }
            })
            .collect();

        let mut neighbour_ends = vec![Vec::new(); n];
        for (k, edge) in edges.iter().enumerate() {
            neighbour_ends[edge.u].push(2 * k + 1);
            neighbour_ends[edge.v].push(2 * k);
        }

        let mut blossom_base: Vec<usize> = (0..n).collect();
        blossom_base.extend(std::iter::repeat(NONE).take(n));

        let mut dual = vec![max_weight; n];
        dual.extend(std::iter::repeat(0.0).take(n));

        Self {
            edges,
            n,
            max_cardinality,
            endpoint,
            neighbour_ends,
            mate: vec![NONE; n],
            label: vec![0; 2 * n],
            label_end: vec![NONE; 2 * n],
            in_blossom: (0..n).collect(),
            blossom_parent: vec![NONE; 2 * n],
            blossom_children: vec![Vec::new(); 2 * n],
            blossom_base,
            blossom_endpoints: vec![Vec::new(); 2 * n],
            best_edge: vec![NONE; 2 * n],
            blossom_best_edges: vec![None; 2 * n],
            unused_blossoms: (n..2 * n).collect(),
            dual,
            allow_edge: vec![false; edges.len()],
            queue: Vec::new(),
        }
    }

    fn solve(mut self) -> Vec<Option<usize>> {
        // Each stage either augments the matching or proves it maximal
        for _ in 0..self.n {
            if !self.run_stage() {
                break;
            }
            self.expand_spent_blossoms();
        }

        self.mate
            .iter()
            .map(|&p| (p != NONE).then(|| self.endpoint[p]))
            .collect()
    }

    fn run_stage(&mut self) -> bool {
        self.reset_stage();

        for v in 0..self.n {
            if self.mate[v] == NONE && self.label[self.in_blossom[v]] == 0 {
                self.assign_label(v, 1, NONE);
            }
        }

        loop {
            while let Some(v) = self.queue.pop() {
                if self.scan_vertex(v) {
                    return true;
                }
            }

            let (step, delta) = self.choose_dual_step();
            self.apply_dual_delta(delta);

            match step {
                DualStep::Stop => return false,
                DualStep::FreeEdge(k) => {
                    self.allow_edge[k] = true;
                    let edge = self.edges[k];
                    let s_vertex = if self.label[self.in_blossom[edge.u]] == 0 {
                        edge.v
                    } else {
                        edge.u
                    };
                    self.queue.push(s_vertex);
                }
                DualStep::BlossomEdge(k) => {
                    self.allow_edge[k] = true;
                    self.queue.push(self.edges[k].u);
                }
                DualStep::Expand(b) => self.expand_blossom(b, false),
            }
        }
    }

    fn reset_stage(&mut self) {
        self.label.fill(0);
        self.best_edge.fill(NONE);
        for b in self.n..2 * self.n {
            self.blossom_best_edges[b] = None;
        }
        self.allow_edge.fill(false);
        self.queue.clear();
    }

    fn expand_spent_blossoms(&mut self) {
        for b in self.n..2 * self.n {
            if self.blossom_parent[b] == NONE
                && self.blossom_base[b] != NONE
                && self.label[b] == 1
                && self.dual[b] == 0.0
            {
                self.expand_blossom(b, true);
            }
        }
    }

    fn slack(&self, k: usize) -> f64 {
        let edge = self.edges[k];
        self.dual[edge.u] + self.dual[edge.v] - 2.0 * edge.weight
    }

    fn child(&self, b: usize, j: isize) -> usize {
        let children = &self.blossom_children[b];
        children[j.rem_euclid(children.len() as isize) as usize]
    }

    fn child_endpoint(&self, b: usize, j: isize) -> usize {
        let endpoints = &self.blossom_endpoints[b];
        endpoints[j.rem_euclid(endpoints.len() as isize) as usize]
    }

    fn blossom_leaves(&self, b: usize) -> Vec<usize> {
        let mut leaves = Vec::new();
        self.collect_leaves(b, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, b: usize, leaves: &mut Vec<usize>) {
        if b < self.n {
            leaves.push(b);
            return;
        }
        for &child in &self.blossom_children[b] {
            self.collect_leaves(child, leaves);
        }
    }

    /// Label the top-level blossom of `w` with `t`, reached through endpoint `p`.
    /// T-blossoms immediately pass an S label on to their mate.
    fn assign_label(&mut self, w: usize, t: u8, p: usize) {
        let b = self.in_blossom[w];
        self.label[w] = t;
        self.label[b] = t;
        self.label_end[w] = p;
        self.label_end[b] = p;
        self.best_edge[w] = NONE;
        self.best_edge[b] = NONE;

        if t == 1 {
            let leaves = self.blossom_leaves(b);
            self.queue.extend(leaves);
        } else if t == 2 {
            let base_mate = self.mate[self.blossom_base[b]];
            let next = self.endpoint[base_mate];
            self.assign_label(next, 1, base_mate ^ 1);
        }
    }

    /// Scan the neighbours of S-vertex `v`. Returns true once augmented.
    fn scan_vertex(&mut self, v: usize) -> bool {
        for idx in 0..self.neighbour_ends[v].len() {
            let p = self.neighbour_ends[v][idx];
            let k = p / 2;
            let w = self.endpoint[p];

            if self.in_blossom[v] == self.in_blossom[w] {
                continue;
            }

            let mut kslack = 0.0;
            if !self.allow_edge[k] {
                kslack = self.slack(k);
                if kslack <= 0.0 {
                    self.allow_edge[k] = true;
                }
            }

            if self.allow_edge[k] {
                let w_label = self.label[self.in_blossom[w]];
                if w_label == 0 {
                    self.assign_label(w, 2, p ^ 1);
                } else if w_label == 1 {
                    let base = self.scan_blossom(v, w);
                    if base != NONE {
                        self.add_blossom(base, k);
                    } else {
                        self.augment_matching(k);
                        return true;
                    }
                } else if self.label[w] == 0 {
                    // w sits inside a T-blossom but was not reached yet
                    self.label[w] = 2;
                    self.label_end[w] = p ^ 1;
                }
            } else if self.label[self.in_blossom[w]] == 1 {
                let b = self.in_blossom[v];
                if self.best_edge[b] == NONE || kslack < self.slack(self.best_edge[b]) {
                    self.best_edge[b] = k;
                }
            } else if self.label[w] == 0
                && (self.best_edge[w] == NONE || kslack < self.slack(self.best_edge[w]))
            {
                self.best_edge[w] = k;
            }
        }

        false
    }

    /// Trace back from `v` and `w` towards the roots of their trees.
    /// Returns the base of a new blossom, or NONE for an augmenting path.
    fn scan_blossom(&mut self, v: usize, w: usize) -> usize {
        let mut path = Vec::new();
        let mut base = NONE;
        let (mut v, mut w) = (v, w);

        while v != NONE {
            let b = self.in_blossom[v];
            if self.label[b] & 4 != 0 {
                base = self.blossom_base[b];
                break;
            }

            path.push(b);
            self.label[b] = 5;

            if self.label_end[b] == NONE {
                v = NONE;
            } else {
                let t = self.endpoint[self.label_end[b]];
                let bt = self.in_blossom[t];
                v = self.endpoint[self.label_end[bt]];
            }

            if w != NONE {
                std::mem::swap(&mut v, &mut w);
            }
        }

        for b in path {
            self.label[b] = 1;
        }

        base
    }

    /// Form a new S-blossom from the tight edge `k` whose ends share `base`.
    fn add_blossom(&mut self, base: usize, k: usize) {
        let edge = self.edges[k];
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[edge.u];
        let mut bw = self.in_blossom[edge.v];

        let b = self
            .unused_blossoms
            .pop()
            .expect("at most n blossoms exist at any time");

        self.blossom_base[b] = base;
        self.blossom_parent[b] = NONE;
        self.blossom_parent[bb] = b;

        let mut path = Vec::new();
        let mut endpoints = Vec::new();

        while bv != bb {
            self.blossom_parent[bv] = b;
            path.push(bv);
            endpoints.push(self.label_end[bv]);
            let v = self.endpoint[self.label_end[bv]];
            bv = self.in_blossom[v];
        }

        path.push(bb);
        path.reverse();
        endpoints.reverse();
        endpoints.push(2 * k);

        while bw != bb {
            self.blossom_parent[bw] = b;
            path.push(bw);
            endpoints.push(self.label_end[bw] ^ 1);
            let w = self.endpoint[self.label_end[bw]];
            bw = self.in_blossom[w];
        }

        self.label[b] = 1;
        self.label_end[b] = self.label_end[bb];
        self.dual[b] = 0.0;
        self.blossom_children[b] = path.clone();
        self.blossom_endpoints[b] = endpoints;

        for v in self.blossom_leaves(b) {
            if self.label[self.in_blossom[v]] == 2 {
                // former T-vertices become S-vertices and must be scanned
                self.queue.push(v);
            }
            self.in_blossom[v] = b;
        }

        self.compute_blossom_best_edges(b, &path);
    }

    fn compute_blossom_best_edges(&mut self, b: usize, children: &[usize]) {
        let mut best_edge_to = vec![NONE; 2 * self.n];

        for &child in children {
            let cached = self.blossom_best_edges[child].take();
            let candidate_lists: Vec<Vec<usize>> = match cached {
                Some(list) => vec![list],
                None => self
                    .blossom_leaves(child)
                    .into_iter()
                    .map(|v| self.neighbour_ends[v].iter().map(|p| p / 2).collect())
                    .collect(),
            };

            for k in candidate_lists.into_iter().flatten() {
                let edge = self.edges[k];
                let j = if self.in_blossom[edge.v] == b { edge.u } else { edge.v };
                let bj = self.in_blossom[j];

                if bj != b
                    && self.label[bj] == 1
                    && (best_edge_to[bj] == NONE || self.slack(k) < self.slack(best_edge_to[bj]))
                {
                    best_edge_to[bj] = k;
                }
            }

            self.best_edge[child] = NONE;
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

    /// Dissolve top-level blossom `b` into its children.
    fn expand_blossom(&mut self, b: usize, end_stage: bool) {
        let children = self.blossom_children[b].clone();

        for &s in &children {
            self.blossom_parent[s] = NONE;
            if s < self.n {
                self.in_blossom[s] = s;
            } else if end_stage && self.dual[s] == 0.0 {
                self.expand_blossom(s, end_stage);
            } else {
                for v in self.blossom_leaves(s) {
                    self.in_blossom[v] = s;
                }
            }
        }

        if !end_stage && self.label[b] == 2 {
            self.relabel_expanded_t_blossom(b, &children);
        }

        self.label[b] = 0;
        self.label_end[b] = NONE;
        self.blossom_children[b].clear();
        self.blossom_endpoints[b].clear();
        self.blossom_base[b] = NONE;
        self.blossom_best_edges[b] = None;
        self.best_edge[b] = NONE;
        self.unused_blossoms.push(b);
    }

    /// After expanding a T-blossom mid-stage, relabel its children so the
    /// alternating tree stays consistent.
    fn relabel_expanded_t_blossom(&mut self, b: usize, children: &[usize]) {
        let entry_child = self.in_blossom[self.endpoint[self.label_end[b] ^ 1]];
        let mut j = children
            .iter()
            .position(|&c| c == entry_child)
            .expect("entry child belongs to the blossom") as isize;

        // Walk towards the base along the even-length side
        let (step, trick): (isize, usize) = if j & 1 == 1 {
            j -= children.len() as isize;
            (1, 0)
        } else {
            (-1, 1)
        };

        let mut p = self.label_end[b];
        while j != 0 {
            let t_vertex = self.endpoint[p ^ 1];
            self.label[t_vertex] = 0;
            let q = self.child_endpoint(b, j - trick as isize) ^ trick ^ 1;
            self.label[self.endpoint[q]] = 0;
            self.assign_label(t_vertex, 2, p);

            let forward = self.child_endpoint(b, j - trick as isize);
            self.allow_edge[forward / 2] = true;
            j += step;
            p = self.child_endpoint(b, j - trick as isize) ^ trick;
            self.allow_edge[p / 2] = true;
            j += step;
        }

        // The base child keeps its T label without passing it on to its mate
        let bv = self.child(b, j);
        let base_vertex = self.endpoint[p ^ 1];
        self.label[base_vertex] = 2;
        self.label[bv] = 2;
        self.label_end[base_vertex] = p;
        self.label_end[bv] = p;
        self.best_edge[bv] = NONE;

        j += step;
        while self.child(b, j) != entry_child {
            let bv = self.child(b, j);
            if self.label[bv] == 1 {
                j += step;
                continue;
            }

            let reached = self
                .blossom_leaves(bv)
                .into_iter()
                .find(|&v| self.label[v] != 0);

            if let Some(v) = reached {
                self.label[v] = 0;
                let base_mate = self.endpoint[self.mate[self.blossom_base[bv]]];
                self.label[base_mate] = 0;
                let end = self.label_end[v];
                self.assign_label(v, 2, end);
            }

            j += step;
        }
    }

    /// Swap matched and unmatched edges on the even path from `v` to the
    /// base of blossom `b`, making `v` the new base.
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.blossom_parent[t] != b {
            t = self.blossom_parent[t];
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }

        let len = self.blossom_children[b].len();
        let i = self.blossom_children[b]
            .iter()
            .position(|&c| c == t)
            .expect("sub-blossom belongs to its parent");

        let mut j = i as isize;
        let (step, trick): (isize, usize) = if i & 1 == 1 {
            j -= len as isize;
            (1, 0)
        } else {
            (-1, 1)
        };

        while j != 0 {
            j += step;
            let t = self.child(b, j);
            let p = self.child_endpoint(b, j - trick as isize) ^ trick;
            if t >= self.n {
                let end = self.endpoint[p];
                self.augment_blossom(t, end);
            }

            j += step;
            let t = self.child(b, j);
            if t >= self.n {
                let end = self.endpoint[p ^ 1];
                self.augment_blossom(t, end);
            }

            self.mate[self.endpoint[p]] = p ^ 1;
            self.mate[self.endpoint[p ^ 1]] = p;
        }

        self.blossom_children[b].rotate_left(i);
        self.blossom_endpoints[b].rotate_left(i);
        self.blossom_base[b] = self.blossom_base[self.blossom_children[b][0]];
    }

    /// Augment along the path through tight edge `k` between two S-vertices.
    fn augment_matching(&mut self, k: usize) {
        let edge = self.edges[k];

        for (mut s, mut p) in [(edge.u, 2 * k + 1), (edge.v, 2 * k)] {
            loop {
                let bs = self.in_blossom[s];
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = p;

                if self.label_end[bs] == NONE {
                    // reached a tree root
                    break;
                }

                let t = self.endpoint[self.label_end[bs]];
                let bt = self.in_blossom[t];
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

    fn min_vertex_dual(&self) -> f64 {
        self.dual[..self.n].iter().copied().fold(f64::INFINITY, f64::min)
    }

    fn choose_dual_step(&self) -> (DualStep, f64) {
        let mut best: Option<(DualStep, f64)> = None;
        let improves = |best: &Option<(DualStep, f64)>, d: f64| match best {
            None => true,
            Some((_, current)) => d < *current,
        };

        if !self.max_cardinality {
            best = Some((DualStep::Stop, self.min_vertex_dual()));
        }

        for v in 0..self.n {
            if self.label[self.in_blossom[v]] == 0 && self.best_edge[v] != NONE {
                let d = self.slack(self.best_edge[v]);
                if improves(&best, d) {
                    best = Some((DualStep::FreeEdge(self.best_edge[v]), d));
                }
            }
        }

        for b in 0..2 * self.n {
            if self.blossom_parent[b] == NONE && self.label[b] == 1 && self.best_edge[b] != NONE {
                let d = self.slack(self.best_edge[b]) / 2.0;
                if improves(&best, d) {
                    best = Some((DualStep::BlossomEdge(self.best_edge[b]), d));
                }
            }
        }

        for b in self.n..2 * self.n {
            if self.blossom_base[b] != NONE
                && self.blossom_parent[b] == NONE
                && self.label[b] == 2
                && improves(&best, self.dual[b])
            {
                best = Some((DualStep::Expand(b), self.dual[b]));
            }
        }

        // Maximum cardinality reached: finish with a last dual adjustment
        best.unwrap_or_else(|| (DualStep::Stop, self.min_vertex_dual().max(0.0)))
    }

    fn apply_dual_delta(&mut self, delta: f64) {
        for v in 0..self.n {
            match self.label[self.in_blossom[v]] {
                1 => self.dual[v] -= delta,
                2 => self.dual[v] += delta,
                _ => {}
            }
        }

        for b in self.n..2 * self.n {
            if self.blossom_base[b] != NONE && self.blossom_parent[b] == NONE {
                match self.label[b] {
                    1 => self.dual[b] += delta,
                    2 => self.dual[b] -= delta,
                    _ => {}
                }
            }
        }
    }
}
