//! Flat text encoding of an MDD: the domain-limits vector followed by the
//! raw diagram vector, as whitespace-delimited integers.
//!
//! The layout is `k limit_0 .. limit_{k-1} n cell_0 .. cell_{n-1}` where
//! `n` is the free position at encode time. Encoding is faithful to
//! whatever state — trie or compacted DAG — is current; decoding rebinds
//! the cells to a fresh variable list without recompiling and validates
//! shape, capacity, and every reachable cell. Decoded diagrams are frozen:
//! they can be queried, reused, and re-encoded, but not extended.

use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::diagram::validate_cells;
use crate::mdd::Mdd;
use crate::mdd_error::MddError;
use crate::variable::TableVar;

/// Serializable snapshot of an MDD: the two integer vectors that fully
/// determine its behavior for a compatible variable list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MddDump {
    /// Per-variable reserved block widths.
    pub limits: Vec<usize>,
    /// The live diagram cells, root block first.
    pub cells: Vec<i32>,
}

impl<V: TableVar> Mdd<V> {
    /// Snapshots the current state as two integer vectors.
    pub fn dump(&self) -> MddDump {
        MddDump {
            limits: self.limits.clone(),
            cells: self.cells().to_vec(),
        }
    }

    /// Encodes the current state as whitespace-delimited integers.
    pub fn encode(&self) -> String {
        let dump = self.dump();
        format!(
            "{} {} {} {}",
            dump.limits.len(),
            dump.limits.iter().join(" "),
            dump.cells.len(),
            dump.cells.iter().join(" "),
        )
    }

    /// Reconstructs a frozen MDD from a dump and a fresh variable list.
    ///
    /// # Errors
    /// [`MddError::LimitCountMismatch`] if the limits vector and variable
    /// list disagree, [`MddError::CapacityExceeded`] if a variable's live
    /// domain does not fit its reserved limit, [`MddError::InvalidCell`] or
    /// [`MddError::MalformedEncoding`] for structurally broken cells.
    pub fn from_dump(dump: MddDump, vars: Vec<V>) -> Result<Self, MddError> {
        if vars.is_empty() {
            return Err(MddError::EmptyScope);
        }
        if dump.limits.len() != vars.len() {
            return Err(MddError::LimitCountMismatch {
                expected: vars.len(),
                found: dump.limits.len(),
            });
        }
        if let Some(level) = dump.limits.iter().position(|&w| w == 0) {
            return Err(MddError::MalformedEncoding(format!(
                "zero domain limit at level {level}"
            )));
        }
        for (index, (var, &limit)) in vars.iter().zip(&dump.limits).enumerate() {
            let domain = var.domain_size();
            if domain > limit {
                return Err(MddError::CapacityExceeded {
                    index,
                    domain,
                    limit,
                });
            }
        }
        validate_cells(&dump.cells, &dump.limits)?;
        let cells: Arc<[i32]> = dump.cells.into();
        Ok(Mdd::frozen(vars, dump.limits, cells))
    }

    /// Parses the text encoding and rebinds it to `vars`.
    ///
    /// # Errors
    /// [`MddError::MalformedEncoding`] for missing, unparsable, or trailing
    /// tokens, plus everything [`from_dump`](Self::from_dump) rejects.
    pub fn decode(text: &str, vars: Vec<V>) -> Result<Self, MddError> {
        let mut tokens = text.split_whitespace();
        let limit_count: usize = next_integer(&mut tokens, "limit count")?;
        let limits = (0..limit_count)
            .map(|i| next_integer(&mut tokens, &format!("limit {i}")))
            .collect::<Result<Vec<usize>, _>>()?;
        let cell_count: usize = next_integer(&mut tokens, "cell count")?;
        let cells = (0..cell_count)
            .map(|i| next_integer(&mut tokens, &format!("cell {i}")))
            .collect::<Result<Vec<i32>, _>>()?;
        if let Some(extra) = tokens.next() {
            return Err(MddError::MalformedEncoding(format!(
                "trailing input starting at `{extra}`"
            )));
        }
        Self::from_dump(MddDump { limits, cells }, vars)
    }
}

fn next_integer<'a, T: std::str::FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<T, MddError> {
    let token = tokens
        .next()
        .ok_or_else(|| MddError::MalformedEncoding(format!("missing {what}")))?;
    token
        .parse()
        .map_err(|_| MddError::MalformedEncoding(format!("unparsable {what}: `{token}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::SimpleVar;

    #[test]
    fn encode_layout_is_two_counted_vectors() {
        let vars = vec![SimpleVar::new([0, 1]), SimpleVar::new([0, 1])];
        let mdd = Mdd::from_table(vars, &[vec![1, 0]], None).unwrap();
        // root [0, 3], child block [-1, 0]
        assert_eq!(mdd.encode(), "2 2 2 4 0 2 -1 0");
    }

    #[test]
    fn missing_and_trailing_tokens_rejected() {
        let vars = || vec![SimpleVar::new([0, 1]), SimpleVar::new([0, 1])];
        assert!(matches!(
            Mdd::decode("2 2 2 4 0 2 -1", vars()),
            Err(MddError::MalformedEncoding(_))
        ));
        assert!(matches!(
            Mdd::decode("2 2 2 4 0 2 -1 0 99", vars()),
            Err(MddError::MalformedEncoding(_))
        ));
        assert!(matches!(
            Mdd::decode("2 2 two 4 0 2 -1 0", vars()),
            Err(MddError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn capacity_and_limit_count_validated() {
        let wide = vec![SimpleVar::new([0, 1, 2]), SimpleVar::new([0, 1])];
        assert!(matches!(
            Mdd::decode("2 2 2 4 0 2 -1 0", wide),
            Err(MddError::CapacityExceeded { index: 0, .. })
        ));
        let one = vec![SimpleVar::new([0, 1])];
        assert!(matches!(
            Mdd::decode("2 2 2 4 0 2 -1 0", one),
            Err(MddError::LimitCountMismatch {
                expected: 1,
                found: 2
            })
        ));
    }
}
