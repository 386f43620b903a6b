//! Ordered, shareable collections of partial configurations.

use std::fmt;
use std::sync::Arc;

use crate::{PartialConfig, SweepResult, utils};

/// An ordered, finite sequence of [`PartialConfig`]s.
///
/// Sweeps are materialized eagerly and can be iterated any number of times.
/// Cloning is cheap: clones share the underlying storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sweep {
    configs: Arc<[PartialConfig]>,
}

impl Sweep {
    /// Wrap an already computed list of configurations.
    #[must_use]
    pub fn new(configs: Vec<PartialConfig>) -> Self {
        Self {
            configs: configs.into(),
        }
    }

    /// Number of configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns `true` if the sweep holds no configurations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// The configuration at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PartialConfig> {
        self.configs.get(index)
    }

    /// Iterate over the configurations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PartialConfig> {
        self.configs.iter()
    }

    /// Borrow the configurations as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[PartialConfig] {
        &self.configs
    }

    /// Fail if two configurations of the sweep are identical.
    ///
    /// Identity is the order-sensitive equality of [`PartialConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Duplicate`](crate::SweepError::Duplicate) naming
    /// the first repeated pair.
    pub fn check_unique(&self) -> SweepResult<()> {
        utils::first_duplicate(self.iter()).map_or(Ok(()), |(first, duplicate)| {
            Err(Arc::new(crate::SweepError::Duplicate { first, duplicate }))
        })
    }
}

impl From<Vec<PartialConfig>> for Sweep {
    fn from(configs: Vec<PartialConfig>) -> Self {
        Self::new(configs)
    }
}

impl From<PartialConfig> for Sweep {
    fn from(config: PartialConfig) -> Self {
        Self::new(vec![config])
    }
}

impl FromIterator<PartialConfig> for Sweep {
    fn from_iter<I: IntoIterator<Item = PartialConfig>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Sweep {
    type Item = &'a PartialConfig;
    type IntoIter = std::slice::Iter<'a, PartialConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.configs.iter()
    }
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, config) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{config}")?;
        }
        f.write_str("]")
    }
}
