//! Character-level diff of two field renderings.
//!
//! Alignment uses the longest-matching-block method: find the longest common
//! run, then recurse on the text to its left and right. Opcodes are derived
//! from the resulting matching blocks and flattened into tagged segments.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use strum_macros::{Display, EnumString};

/// Sequences at least this long ignore characters that make up more than 1%
/// of the right-hand text when searching for anchors.
const POPULAR_MIN_LEN: usize = 200;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    Equal,
    Delete,
    Insert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub kind: DiffKind,
    pub text: String,
}

impl DiffSegment {
    fn new(kind: DiffKind, chars: &[char]) -> Self {
        Self {
            kind,
            text: chars.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Equal,
    Replace,
    Delete,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Opcode {
    tag: Tag,
    i1: usize,
    i2: usize,
    j1: usize,
    j2: usize,
}

pub fn generate_diff(left: &str, right: &str) -> Vec<DiffSegment> {
    if left == right {
        return vec![DiffSegment {
            kind: DiffKind::Equal,
            text: left.to_string(),
        }];
    }

    let a: Vec<char> = left.chars().collect();
    let b: Vec<char> = right.chars().collect();

    let mut segments = Vec::new();
    for op in Matcher::new(&a, &b).opcodes() {
        let left_part = &a[op.i1..op.i2];
        let right_part = &b[op.j1..op.j2];
        match op.tag {
            Tag::Equal => segments.push(DiffSegment::new(DiffKind::Equal, left_part)),
            Tag::Delete => segments.push(DiffSegment::new(DiffKind::Delete, left_part)),
            Tag::Insert => segments.push(DiffSegment::new(DiffKind::Insert, right_part)),
            Tag::Replace => {
                segments.push(DiffSegment::new(DiffKind::Delete, left_part));
                segments.push(DiffSegment::new(DiffKind::Insert, right_part));
            }
        }
    }
    segments
}

/// Rebuilds the left (`Equal` + `Delete`) or right (`Equal` + `Insert`) text.
pub fn reconstruct(segments: &[DiffSegment], left_side: bool) -> String {
    let skip = if left_side {
        DiffKind::Insert
    } else {
        DiffKind::Delete
    };
    segments
        .iter()
        .filter(|s| s.kind != skip)
        .map(|s| s.text.as_str())
        .collect()
}

/// Plain-text markup: `[-deleted-]` and `{+inserted+}`.
pub fn render_markup(segments: &[DiffSegment]) -> String {
    let mut out = String::new();
    for seg in segments {
        match seg.kind {
            DiffKind::Equal => out.push_str(&seg.text),
            DiffKind::Delete => {
                out.push_str("[-");
                out.push_str(&seg.text);
                out.push_str("-]");
            }
            DiffKind::Insert => {
                out.push_str("{+");
                out.push_str(&seg.text);
                out.push_str("+}");
            }
        }
    }
    out
}

struct Matcher<'a> {
    a: &'a [char],
    b: &'a [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> Matcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, idxs)| idxs.len() > limit)
                .map(|(&c, _)| c)
                .collect();
            b2j.retain(|c, _| !popular.contains(c));
        }

        Self { a, b, b2j }
    }

    /// Longest run of equal characters within `a[alo..ahi]` and `b[blo..bhi]`.
    /// Ties go to the earliest start in `a`, then in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Popular characters were left out of the index; grow the match over them.
        while besti > alo && bestj > blo && self.a[besti - 1] == self.b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && self.a[besti + bestsize] == self.b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }

    fn matching_blocks(&self) -> Vec<(usize, usize, usize)> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            blocks.push((i, j, k));
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        blocks.sort_unstable();

        // Merge blocks that touch.
        let mut merged: Vec<(usize, usize, usize)> = Vec::with_capacity(blocks.len() + 1);
        for (i, j, k) in blocks {
            match merged.last_mut() {
                Some(last) if last.0 + last.2 == i && last.1 + last.2 == j => last.2 += k,
                _ => merged.push((i, j, k)),
            }
        }
        merged.push((self.a.len(), self.b.len(), 0));
        merged
    }

    fn opcodes(&self) -> Vec<Opcode> {
        let (mut i, mut j) = (0, 0);
        let mut ops = Vec::new();

        for (ai, bj, size) in self.matching_blocks() {
            let tag = match (i < ai, j < bj) {
                (true, true) => Some(Tag::Replace),
                (true, false) => Some(Tag::Delete),
                (false, true) => Some(Tag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                ops.push(Opcode {
                    tag,
                    i1: i,
                    i2: ai,
                    j1: j,
                    j2: bj,
                });
            }
            i = ai + size;
            j = bj + size;
            if size > 0 {
                ops.push(Opcode {
                    tag: Tag::Equal,
                    i1: ai,
                    i2: i,
                    j1: bj,
                    j2: j,
                });
            }
        }
        ops
    }
}
