use std::ops::AddAssign;

/// A square grid of head-to-head counters.
///
/// Cell `(i, j)` counts the ballots that ranked alternative `i` strictly above
/// alternative `j`. The matrix knows nothing about names: rows and columns are
/// positions in the sorted list of alternatives held by the engine.
///
/// Positions outside `[0, size)` are a programming error and panic.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PairwiseMatrix {
    data: Vec<u64>,
    size: usize,
}

impl PairwiseMatrix {
    /// A zero-filled `size` x `size` matrix.
    pub fn new(size: usize) -> PairwiseMatrix {
        PairwiseMatrix {
            data: vec![0; size * size],
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.data[self.offset(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: u64) {
        let idx = self.offset(i, j);
        self.data[idx] = value;
    }

    pub fn increment(&mut self, i: usize, j: usize) {
        let idx = self.offset(i, j);
        self.data[idx] += 1;
    }

    /// All the counters of alternative `i` against every other alternative.
    pub fn row(&self, i: usize) -> &[u64] {
        assert!(i < self.size, "row {} out of range {}", i, self.size);
        &self.data[i * self.size..(i + 1) * self.size]
    }

    fn offset(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.size && j < self.size,
            "cell ({}, {}) out of range {}",
            i,
            j,
            self.size
        );
        i * self.size + j
    }
}

impl AddAssign<&PairwiseMatrix> for PairwiseMatrix {
    // Sizes are fixed when the engine is built, a mismatch is a bug.
    fn add_assign(&mut self, rhs: &PairwiseMatrix) {
        assert_eq!(
            self.size, rhs.size,
            "cannot add matrices of different sizes"
        );
        for (cell, other) in self.data.iter_mut().zip(rhs.data.iter()) {
            *cell += *other;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PairwiseMatrix;

    #[test]
    fn starts_empty() {
        let m = PairwiseMatrix::new(3);
        assert_eq!(m.size(), 3);
        for i in 0..3 {
            assert_eq!(m.row(i), &[0, 0, 0]);
        }
    }

    #[test]
    fn zero_size() {
        let m = PairwiseMatrix::new(0);
        assert_eq!(m.size(), 0);
    }

    #[test]
    fn cell_access() {
        let mut m = PairwiseMatrix::new(2);
        m.increment(0, 1);
        m.increment(0, 1);
        m.set(1, 0, 7);
        assert_eq!(m.get(0, 1), 2);
        assert_eq!(m.get(1, 0), 7);
        assert_eq!(m.get(0, 0), 0);
        assert_eq!(m.row(1), &[7, 0]);
    }

    #[test]
    fn add_in_place() {
        let mut a = PairwiseMatrix::new(2);
        a.set(0, 1, 3);
        let mut b = PairwiseMatrix::new(2);
        b.set(0, 1, 1);
        b.set(1, 0, 4);
        a += &b;
        assert_eq!(a.get(0, 1), 4);
        assert_eq!(a.get(1, 0), 4);
        // The right-hand side is untouched.
        assert_eq!(b.get(0, 1), 1);
    }

    #[test]
    #[should_panic(expected = "different sizes")]
    fn add_mismatched_sizes() {
        let mut a = PairwiseMatrix::new(2);
        a += &PairwiseMatrix::new(3);
    }

    #[test]
    #[should_panic]
    fn out_of_range() {
        let m = PairwiseMatrix::new(2);
        m.get(2, 0);
    }
}
