//! Index odometer driving cross products.

/// Yields every index tuple below `lengths` in lexicographic order, the last
/// position varying fastest.
pub(crate) struct Odometer {
    lengths: Vec<usize>,
    current: Option<Vec<usize>>,
}

impl Odometer {
    pub(crate) fn new(lengths: &[usize]) -> Self {
        let current = lengths
            .iter()
            .all(|&len| len > 0)
            .then(|| vec![0; lengths.len()]);
        Self {
            lengths: lengths.to_vec(),
            current,
        }
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        let mut successor = current.clone();
        let mut exhausted = true;
        for (digit, &len) in successor.iter_mut().zip(&self.lengths).rev() {
            *digit += 1;
            if *digit < len {
                exhausted = false;
                break;
            }
            *digit = 0;
        }
        if !exhausted {
            self.current = Some(successor);
        }
        Some(current)
    }
}
