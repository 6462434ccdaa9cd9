//! Deletion-neighborhood generation for the Symmetric Delete algorithm.
//!
//! For a word `w` and max depth `k`, the neighborhood is the set of strings reachable by
//! deleting up to `k` code points from `w`, including `w` itself. Generation is depth-first
//! with an explicit visited set so the same candidate reached by two different deletion
//! orders is only ever emitted once, and only recurses into candidates with more than two
//! code points left (deleting further from a one- or two-code-point string is not useful:
//! the edit distance of deleting past that point is already at the search boundary).

use std::collections::HashSet;

/// All distinct deletion-neighborhood candidates for `word` up to depth `max_depth`,
/// paired with the depth (number of deletions) at which each was first reached.
///
/// `word` itself is always included at depth 0.
pub fn neighborhood(word: &str, max_depth: u32) -> Vec<(String, u32)> {
    let mut out = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(word.to_string());
    out.push((word.to_string(), 0));

    if max_depth == 0 {
        return out;
    }

    let mut frontier: Vec<String> = vec![word.to_string()];
    for depth in 1..=max_depth {
        let mut next = Vec::new();
        for candidate in &frontier {
            let chars: Vec<char> = candidate.chars().collect();
            if chars.len() <= 2 {
                continue;
            }
            for i in 0..chars.len() {
                let deleted: String = chars
                    .iter()
                    .enumerate()
                    .filter_map(|(j, c)| if j == i { None } else { Some(*c) })
                    .collect();
                if seen.insert(deleted.clone()) {
                    out.push((deleted.clone(), depth));
                    next.push(deleted);
                }
            }
        }
        frontier = next;
    }

    out
}

/// Streaming variant of [`neighborhood`] for callers that want to avoid materializing the
/// full candidate set up front (used by the builder when expanding many words).
pub struct NeighborhoodIter {
    seen: HashSet<String>,
    frontier: Vec<String>,
    next_frontier: Vec<String>,
    pending: std::vec::IntoIter<(String, u32)>,
    depth: u32,
    max_depth: u32,
    done: bool,
}

impl NeighborhoodIter {
    pub fn new(word: &str, max_depth: u32) -> Self {
        let mut seen = HashSet::new();
        seen.insert(word.to_string());
        NeighborhoodIter {
            seen,
            frontier: vec![word.to_string()],
            next_frontier: Vec::new(),
            pending: vec![(word.to_string(), 0)].into_iter(),
            depth: 0,
            max_depth,
            done: max_depth == 0,
        }
    }

    fn advance_depth(&mut self) -> bool {
        if self.done || self.depth >= self.max_depth {
            self.done = true;
            return false;
        }
        self.depth += 1;
        let mut batch = Vec::new();
        for candidate in std::mem::take(&mut self.frontier) {
            let chars: Vec<char> = candidate.chars().collect();
            if chars.len() <= 2 {
                continue;
            }
            for i in 0..chars.len() {
                let deleted: String = chars
                    .iter()
                    .enumerate()
                    .filter_map(|(j, c)| if j == i { None } else { Some(*c) })
                    .collect();
                if self.seen.insert(deleted.clone()) {
                    self.next_frontier.push(deleted.clone());
                    batch.push((deleted, self.depth));
                }
            }
        }
        self.frontier = std::mem::take(&mut self.next_frontier);
        if batch.is_empty() {
            self.done = self.depth >= self.max_depth;
            return self.advance_depth_if_not_done();
        }
        self.pending = batch.into_iter();
        true
    }

    fn advance_depth_if_not_done(&mut self) -> bool {
        if self.done {
            false
        } else {
            self.advance_depth()
        }
    }
}

impl Iterator for NeighborhoodIter {
    type Item = (String, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(item) = self.pending.next() {
            return Some(item);
        }
        if self.advance_depth() {
            self.pending.next()
        } else {
            None
        }
    }
}
