//! Associative container keyed by `Location` that tolerates small position differences.

use std::collections::HashMap;

use super::{Location, Strand};

/// Orientation part of a slot key; `None` when strands are not compared.
type OrientationKey = Option<(Strand, bool)>;

/// Map from `Location` to `V` where lookups match existing keys within a window.
///
/// A lookup for `key` tries the positions `key + 0, +1, -1, +2, -2, ..., +w, -w` and
/// uses the first existing key that is hit.  An insertion that does not hit any
/// existing key creates a new entry at the exact position of `key`.  Iteration
/// follows insertion order.
///
/// In a stranded index (the default), an existing key is only hit by lookups with
/// the same strand and direction.
#[derive(Debug, Clone)]
pub struct WindowedIndex<V> {
    window: u32,
    stranded: bool,
    /// Chromosome -> (orientation, position) -> index into `entries`.
    slots: HashMap<String, HashMap<(OrientationKey, i64), usize>>,
    entries: Vec<(Location, V)>,
}

impl<V> WindowedIndex<V> {
    /// Create a new, stranded index.
    pub fn new(window: u32) -> Self {
        Self::with_strandedness(window, true)
    }

    /// Create a new index that ignores strand and direction.
    pub fn unstranded(window: u32) -> Self {
        Self::with_strandedness(window, false)
    }

    pub fn with_strandedness(window: u32, stranded: bool) -> Self {
        Self {
            window,
            stranded,
            slots: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn orientation_key(&self, key: &Location) -> OrientationKey {
        self.stranded.then(|| (key.strand(), key.extends_right()))
    }

    /// Index into `entries` of the first key hit when probing around `key`.
    fn find_idx(&self, key: &Location) -> Option<usize> {
        let slots = self.slots.get(key.chrom())?;
        let orientation = self.orientation_key(key);
        let window = i64::from(self.window);
        std::iter::once(0)
            .chain((1..=window).flat_map(|k| [k, -k]))
            .find_map(|offset| slots.get(&(orientation, key.pos() + offset)))
            .copied()
    }

    /// The existing key that `key` resolves to, if any.
    pub fn find(&self, key: &Location) -> Option<&Location> {
        self.find_idx(key).map(|idx| &self.entries[idx].0)
    }

    pub fn contains(&self, key: &Location) -> bool {
        self.find_idx(key).is_some()
    }

    pub fn get(&self, key: &Location) -> Option<&V> {
        self.find_idx(key).map(|idx| &self.entries[idx].1)
    }

    /// Value for `key`, inserting `init()` at exactly `key` when nothing is hit.
    pub fn get_or_insert_with<F>(&mut self, key: &Location, init: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let idx = match self.find_idx(key) {
            Some(idx) => idx,
            None => self.push(key.clone(), init()),
        };
        &mut self.entries[idx].1
    }

    /// Set the value for `key`, replacing the value of any key hit by the lookup.
    ///
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: Location, value: V) -> Option<V> {
        match self.find_idx(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.push(key, value);
                None
            }
        }
    }

    fn push(&mut self, key: Location, value: V) -> usize {
        let idx = self.entries.len();
        let orientation = self.orientation_key(&key);
        self.slots
            .entry(key.chrom().to_string())
            .or_default()
            .insert((orientation, key.pos()), idx);
        self.entries.push((key, value));
        idx
    }

    /// Iterate over keys and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Location, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Location> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::WindowedIndex;
    use crate::locations::{Location, Strand};

    fn filled() -> WindowedIndex<&'static str> {
        let mut index = WindowedIndex::new(40);
        index.insert(Location::new("X", 31), "foo");
        index.insert(
            Location::with_orientation("Y", 131, Strand::Reverse, false),
            "bar",
        );
        index.insert(Location::new("Y", 121), "baz");
        index
    }

    #[test]
    fn lookup_within_window() {
        let index = filled();
        let l4 = Location::with_orientation("Y", 161, Strand::Reverse, false);

        assert_eq!(index.len(), 3);
        assert!(index.contains(&l4));
        assert_eq!(index.get(&l4), Some(&"bar"));
        assert_eq!(
            index.find(&l4).map(|key| key.to_string()),
            Some(String::from("(Y,131,-L)"))
        );
        assert!(index.contains(&Location::new("Y", 121)));
        assert!(index.contains(&Location::new("X", 31)));
        assert!(index.contains(&Location::new("X", 71)));
        assert!(!index.contains(&Location::new("X", 72)));
        assert!(!index.contains(&Location::new("1", 31)));
    }

    #[test]
    fn stranded_index_separates_orientations() {
        let index = filled();
        // The forward-strand key does not see the reverse-strand key at 131.
        assert!(!index.contains(&Location::new("Y", 171)));
        assert_eq!(index.get(&Location::new("Y", 161)), Some(&"baz"));
    }

    #[test]
    fn unstranded_index_matches_any_orientation() {
        let mut index = WindowedIndex::unstranded(10);
        index.insert(Location::new("1", 100), 1);

        for pos in 90..=110 {
            let key = Location::with_orientation("1", pos, Strand::Reverse, true);
            assert_eq!(index.get(&key), Some(&1), "pos = {}", pos);
        }
        assert!(!index.contains(&Location::new("1", 89)));
        assert!(!index.contains(&Location::new("1", 111)));
    }

    #[test]
    fn first_hit_wins() {
        let mut index = WindowedIndex::new(5);
        index.insert(Location::new("1", 97), "left");
        index.insert(Location::new("1", 103), "right");
        assert_eq!(index.len(), 2);

        // positive offsets are tried before negative ones of the same size
        assert_eq!(index.get(&Location::new("1", 100)), Some(&"right"));
        assert_eq!(index.get(&Location::new("1", 101)), Some(&"right"));
        assert_eq!(index.get(&Location::new("1", 99)), Some(&"left"));
        assert_eq!(index.get(&Location::new("1", 92)), Some(&"left"));
        assert_eq!(index.get(&Location::new("1", 108)), Some(&"right"));
        assert_eq!(index.get(&Location::new("1", 91)), None);

        // an exact hit wins over everything else
        index.insert(Location::new("1", 97), "replaced");
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&Location::new("1", 97)), Some(&"replaced"));
    }

    #[test]
    fn get_or_insert_with_creates_at_exact_key() {
        let mut index: WindowedIndex<Vec<&str>> = WindowedIndex::new(3);
        index
            .get_or_insert_with(&Location::new("1", 10), Vec::new)
            .push("a");
        index
            .get_or_insert_with(&Location::new("1", 12), Vec::new)
            .push("b");
        index
            .get_or_insert_with(&Location::new("1", 14), Vec::new)
            .push("c");

        let keys: Vec<_> = index.keys().map(|key| key.pos()).collect();
        assert_eq!(keys, vec![10, 14]);
        assert_eq!(index.get(&Location::new("1", 11)), Some(&vec!["a", "b"]));
        assert_eq!(index.get(&Location::new("1", 15)), Some(&vec!["c"]));
    }

    #[test]
    fn zero_window_matches_exactly() {
        let mut index = WindowedIndex::new(0);
        assert!(index.is_empty());
        index.insert(Location::new("1", 5), 1);
        assert_eq!(index.insert(Location::new("1", 5), 2), Some(1));
        assert_eq!(index.values().copied().collect::<Vec<_>>(), vec![2]);
        assert!(!index.contains(&Location::new("1", 6)));
        assert!(!index.contains(&Location::new("1", 4)));
    }

    #[test]
    fn large_window() {
        let mut index = WindowedIndex::new(1_000_000);
        index.insert(Location::new("1", 2_000_000), "far");
        index.insert(Location::new("1", 1_000_000), "near");
        assert_eq!(index.len(), 1);

        index.insert(Location::new("1", 3_000_001), "other");
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&Location::new("1", 2_500_000)), Some(&"near"));
        assert_eq!(index.get(&Location::new("1", 2_500_001)), Some(&"other"));
        assert_eq!(index.get(&Location::new("1", 999_999)), None);
    }
}
