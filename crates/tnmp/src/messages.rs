//! Cavity message table.
//!
//! A message `m_{a → i}` is a 2-vector over the spin states (+1, -1)
//! summarizing the marginal influence of region a on node i. The table is
//! owned by the driver and read by the contraction engine; a slot that has
//! never been written reads as the source node's single-site field
//! distribution.

use std::collections::HashMap;

/// Normalized single-site distribution `exp(β·h·[1, -1]) / Z`.
///
/// Saturating fields (where the exponential overflows) collapse to the
/// corresponding deterministic spin state.
pub fn field_distribution(field: f64, beta: f64) -> [f64; 2] {
    let up = (beta * field).exp();
    let down = (-beta * field).exp();
    if up.is_infinite() {
        return [1.0, 0.0];
    }
    if down.is_infinite() {
        return [0.0, 1.0];
    }
    let sum = up + down;
    [up / sum, down / sum]
}

/// Mapping from (source boundary node, target node) to a cavity message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageTable {
    values: HashMap<(usize, usize), [f64; 2]>,
}

impl MessageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored message for the slot, if one has been computed.
    pub fn get(&self, source: usize, target: usize) -> Option<[f64; 2]> {
        self.values.get(&(source, target)).copied()
    }

    /// Stored message, falling back to the source's field distribution.
    pub fn get_or_field(&self, source: usize, target: usize, field: f64, beta: f64) -> [f64; 2] {
        self.get(source, target)
            .unwrap_or_else(|| field_distribution(field, beta))
    }

    pub fn set(&mut self, source: usize, target: usize, message: [f64; 2]) {
        self.values.insert((source, target), message);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), [f64; 2])> + '_ {
        self.values.iter().map(|(&slot, &message)| (slot, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_field_is_uniform() {
        let d = field_distribution(0.0, 1.0);
        assert_relative_eq!(d[0], 0.5);
        assert_relative_eq!(d[1], 0.5);
    }

    #[test]
    fn positive_field_prefers_spin_up() {
        let d = field_distribution(0.7, 1.3);
        assert!(d[0] > d[1]);
        assert_relative_eq!(d[0] + d[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn saturating_field_is_deterministic() {
        assert_eq!(field_distribution(1e4, 1.0), [1.0, 0.0]);
        assert_eq!(field_distribution(-1e4, 1.0), [0.0, 1.0]);
    }

    #[test]
    fn unwritten_slots_fall_back_to_the_field() {
        let mut table = MessageTable::new();
        let fallback = table.get_or_field(3, 1, 0.0, 1.0);
        assert_eq!(fallback, [0.5, 0.5]);

        table.set(3, 1, [0.8, 0.2]);
        assert_eq!(table.get(3, 1), Some([0.8, 0.2]));
        assert_eq!(table.get(1, 3), None);
        assert_eq!(table.get_or_field(3, 1, 0.0, 1.0), [0.8, 0.2]);
    }
}
