use indexmap::IndexMap;

use super::pairs::Pair;

/// A running per-variant sum of squared correlations.
///
/// Every pair contributes to both of its variants. Sums are accumulated in input order, so
/// splitting the input into chunks of different sizes gives identical results; reordering the
/// input may change the sums in the last few bits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Accumulator(IndexMap<String, f64>);

impl Accumulator {
    /// Adds the contribution of a single pair to both of its variants.
    pub fn add(&mut self, pair: &Pair) {
        self.add_to(&pair.a, pair.r2);
        self.add_to(&pair.b, pair.r2);
    }

    /// Adds the contribution of every pair in a chunk.
    pub fn add_chunk(&mut self, chunk: &[Pair]) {
        chunk.iter().for_each(|pair| self.add(pair));
    }

    fn add_to(&mut self, id: &str, r2: f64) {
        match self.0.get_mut(id) {
            Some(sum) => *sum += r2,
            None => {
                self.0.insert(id.to_string(), r2);
            }
        }
    }

    /// Returns `true` if the variant has been seen.
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Returns the sum for the variant, or zero if the variant was never seen.
    pub fn get_or_zero(&self, id: &str) -> f64 {
        self.0.get(id).copied().unwrap_or(0.0)
    }

    /// Returns `true` if no variants have been seen.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over variants and their sums, in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(id, &sum)| (id.as_str(), sum))
    }

    /// Returns the number of distinct variants seen.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the sum over all variants.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

impl<'a> Extend<&'a Pair> for Accumulator {
    fn extend<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = &'a Pair>,
    {
        pairs.into_iter().for_each(|pair| self.add(pair));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, b: &str, r2: f64) -> Pair {
        Pair {
            a: a.to_string(),
            b: b.to_string(),
            r2,
        }
    }

    fn pairs() -> Vec<Pair> {
        vec![
            pair("v1", "v2", 0.4),
            pair("v2", "v3", 0.1),
            pair("v1", "v3", 0.25),
            pair("v4", "v2", 0.9),
            pair("v3", "v5", 0.05),
        ]
    }

    #[test]
    fn test_symmetric_contribution() {
        let mut accumulator = Accumulator::default();
        accumulator.add(&pair("v1", "v2", 0.4));

        assert_approx_eq!(accumulator.get_or_zero("v1"), 0.4, epsilon = 1e-12);
        assert_approx_eq!(accumulator.get_or_zero("v2"), 0.4, epsilon = 1e-12);
        assert_eq!(accumulator.get_or_zero("v3"), 0.0);
        assert!(accumulator.contains("v2"));
        assert!(!accumulator.contains("v3"));
    }

    #[test]
    fn test_total_is_twice_pair_sum() {
        let pairs = pairs();

        let mut accumulator = Accumulator::default();
        accumulator.extend(&pairs);

        let pair_sum: f64 = pairs.iter().map(|pair| pair.r2).sum();
        assert_approx_eq!(accumulator.total(), 2.0 * pair_sum, epsilon = 1e-12);
        assert_eq!(accumulator.len(), 5);
    }

    #[test]
    fn test_chunk_size_independence() {
        let pairs = pairs();

        let mut by_one = Accumulator::default();
        pairs.chunks(1).for_each(|chunk| by_one.add_chunk(chunk));

        let mut by_two = Accumulator::default();
        pairs.chunks(2).for_each(|chunk| by_two.add_chunk(chunk));

        let mut all = Accumulator::default();
        all.add_chunk(&pairs);

        for (id, sum) in all.iter() {
            assert_approx_eq!(by_one.get_or_zero(id), sum, epsilon = 1e-12);
            assert_approx_eq!(by_two.get_or_zero(id), sum, epsilon = 1e-12);
        }
        assert_eq!(by_one.len(), all.len());
        assert_eq!(by_two.len(), all.len());
    }

    #[test]
    fn test_iter_order() {
        let mut accumulator = Accumulator::default();
        accumulator.extend(&pairs());

        let ids = accumulator.iter().map(|(id, _)| id).collect::<Vec<_>>();
        assert_eq!(ids, ["v1", "v2", "v3", "v4", "v5"]);
    }
}
