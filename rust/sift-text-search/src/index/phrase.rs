//! Positional matching of multi-word phrases.
//!
//! A phrase `w1 .. wn` matches where occurrences of consecutive words lie
//! within `slop` word positions of each other in the same document (or
//! exactly one position apart when the slop is zero). The search runs in
//! three passes over per-document sorted positions of the phrase words:
//!
//! 1. **Forward**: starting from every occurrence of `w1`, keep the
//!    occurrences of each following word that can be reached from a kept
//!    occurrence of the previous word.
//! 2. **Backward**: drop occurrences from which no complete chain continues
//!    to the last word.
//! 3. **Chains**: from every surviving occurrence of `w1`, follow one chain
//!    through the surviving occurrences without reusing a position. Each
//!    chain spells one matched phrase in positional order; all but its last
//!    occurrence are phrase vectors, so the phrase counts once per chain.
//!
//! Candidates are looked up with range queries, so the cost depends on the
//! posting lists and not on the slop.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

use super::vectors::{Vector, Vectors};

/// Sorted word positions per document.
type Positions = AHashMap<u32, BTreeSet<u32>>;

/// Window of positions that may hold the word following an occurrence at
/// `vector`.
///
/// With a slop of zero the next word must sit at the next position. A larger
/// slop admits any position within `slop` on either side, excluding positions
/// below 1. The window includes the location of `vector` itself, which never
/// continues a phrase.
pub fn valid_phrase_positions(vector: Vector, slop: u32) -> RangeInclusive<u32> {
    let location = vector.location;
    if slop == 0 {
        let next = location.saturating_add(1);
        next..=next
    } else {
        location.saturating_sub(slop).max(1)..=location.saturating_add(slop)
    }
}

/// Positions of `positions` that can follow the occurrence at `vector`.
fn candidates<'a>(
    positions: &'a Positions,
    vector: Vector,
    slop: u32,
) -> impl Iterator<Item = u32> + 'a {
    positions
        .get(&vector.doc_id)
        .into_iter()
        .flat_map(move |set| set.range(valid_phrase_positions(vector, slop)))
        .copied()
        .filter(move |&location| location != vector.location)
}

fn group_by_doc<'a>(vectors: impl Iterator<Item = &'a Vector>) -> Positions {
    let mut positions = Positions::new();
    for vector in vectors {
        positions
            .entry(vector.doc_id)
            .or_default()
            .insert(vector.location);
    }
    positions
}

fn vectors_of(positions: &Positions) -> impl Iterator<Item = Vector> + '_ {
    positions.iter().flat_map(|(&doc_id, set)| {
        set.iter().map(move |&location| Vector::new(doc_id, location))
    })
}

/// Finds all occurrences of the phrase `words` in `postings`.
///
/// # Returns
/// One entry per distinct matched phrase string, in ascending string order,
/// or `None` when any word is missing or no complete chain exists. Phrases
/// of fewer than two words are not handled here.
pub fn find_phrases(
    postings: &AHashMap<String, Vectors>,
    words: &[&str],
    slop: u32,
) -> Option<Vec<(String, Vectors)>> {
    if words.len() < 2 {
        return None;
    }
    let lists: Vec<Positions> = words
        .iter()
        .map(|word| postings.get(*word).map(|list| group_by_doc(list.locations().iter())))
        .collect::<Option<_>>()?;

    // forward pass
    let mut reached: Vec<Positions> = Vec::with_capacity(words.len());
    reached.push(lists[0].clone());
    for list in &lists[1..] {
        let previous = reached.last()?;
        let mut next = Positions::new();
        for vector in vectors_of(previous) {
            for location in candidates(list, vector, slop) {
                next.entry(vector.doc_id).or_default().insert(location);
            }
        }
        if next.is_empty() {
            return None;
        }
        reached.push(next);
    }

    // backward pass
    for i in (0..reached.len() - 1).rev() {
        let (head, tail) = reached.split_at_mut(i + 1);
        let following = &tail[0];
        for (&doc_id, set) in head[i].iter_mut() {
            set.retain(|&location| {
                candidates(following, Vector::new(doc_id, location), slop)
                    .next()
                    .is_some()
            });
        }
        head[i].retain(|_, set| !set.is_empty());
        if head[i].is_empty() {
            return None;
        }
    }

    let mut starts: Vec<Vector> = vectors_of(&reached[0]).collect();
    starts.sort_unstable();

    let mut phrases: BTreeMap<String, Vectors> = BTreeMap::new();
    for start in starts {
        let mut chain = vec![start];
        let mut dead = AHashSet::new();
        if !extend_chain(&reached, slop, &mut chain, &mut dead) {
            continue;
        }
        let mut window: Vec<(Vector, &str)> = chain.into_iter().zip(words.iter().copied()).collect();
        window.sort_unstable_by_key(|(vector, _)| *vector);

        let phrase = window.iter().map(|(_, word)| *word).join(" ");
        let vectors = phrases.entry(phrase).or_default();
        let ((last, _), interior) = window.split_last()?;
        for (vector, _) in interior {
            vectors.add_phrase_vector(*vector);
        }
        vectors.add_vector(*last);
    }

    if phrases.is_empty() {
        None
    } else {
        Some(phrases.into_iter().collect())
    }
}

/// Extends `chain` to one occurrence per layer of `reached`, preferring the
/// nearest candidate at each step.
///
/// `dead` remembers `(layer, vector)` pairs that led nowhere, so every
/// occurrence is tried at most once per chain.
fn extend_chain(
    reached: &[Positions],
    slop: u32,
    chain: &mut Vec<Vector>,
    dead: &mut AHashSet<(usize, Vector)>,
) -> bool {
    let layer = chain.len();
    let Some(positions) = reached.get(layer) else {
        return true;
    };
    let Some(&current) = chain.last() else {
        return false;
    };

    let mut next: Vec<Vector> = candidates(positions, current, slop)
        .map(|location| Vector::new(current.doc_id, location))
        .filter(|vector| !chain.contains(vector) && !dead.contains(&(layer, *vector)))
        .collect();
    next.sort_by_key(|vector| (vector.location.abs_diff(current.location), vector.location));

    for vector in next {
        chain.push(vector);
        if extend_chain(reached, slop, chain, dead) {
            return true;
        }
        chain.pop();
        dead.insert((layer, vector));
    }
    false
}
