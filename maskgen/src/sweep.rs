//! Parameter sweeps: expanding named value ranges into the ordered list of
//! parameter sets an array will instantiate.
//!
//! Enumeration is fully deterministic: grid sweeps expand in declaration
//! order with the last range varying fastest, and random sweeps draw from a
//! caller-seeded generator, so the same sweep always produces the same
//! devices.

use arcstr::ArcStr;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::device::ParameterSet;
use crate::error::{Error, Result};

/// A named list of candidate values, in database units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedRange {
    pub name: ArcStr,
    pub values: Vec<i64>,
}

impl NamedRange {
    pub fn new(name: impl Into<ArcStr>, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// How the declared ranges are sampled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScanKind {
    /// The full cartesian product, in declaration order.
    Grid,
    /// `count` independent draws from each range, reproducibly seeded.
    Random { count: usize, seed: u64 },
    /// Explicit parameter sets; each must cover every declared range.
    Custom(Vec<ParameterSet>),
}

/// A parameter sweep over named ranges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sweep {
    ranges: Vec<NamedRange>,
    kind: ScanKind,
}

impl Sweep {
    /// A grid sweep: every combination of the given ranges.
    pub fn grid(ranges: Vec<NamedRange>) -> Self {
        Self {
            ranges,
            kind: ScanKind::Grid,
        }
    }

    /// A random sweep: `count` sets, each drawing one value per range.
    pub fn random(ranges: Vec<NamedRange>, count: usize, seed: u64) -> Self {
        Self {
            ranges,
            kind: ScanKind::Random { count, seed },
        }
    }

    /// A custom sweep of explicit sets, validated against the declared
    /// range names.
    pub fn custom(ranges: Vec<NamedRange>, sets: Vec<ParameterSet>) -> Self {
        Self {
            ranges,
            kind: ScanKind::Custom(sets),
        }
    }

    pub fn ranges(&self) -> &[NamedRange] {
        &self.ranges
    }

    /// The number of parameter sets [`Sweep::enumerate`] will produce.
    pub fn len(&self) -> usize {
        match &self.kind {
            ScanKind::Grid => self.ranges.iter().map(|r| r.values.len()).product(),
            ScanKind::Random { count, .. } => *count,
            ScanKind::Custom(sets) => sets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expands the sweep into its ordered parameter sets.
    ///
    /// Labels are left empty; the array engine stamps positional labels at
    /// placement time.
    pub fn enumerate(&self) -> Result<Vec<ParameterSet>> {
        self.validate()?;
        match &self.kind {
            ScanKind::Grid => {
                let sets = self
                    .ranges
                    .iter()
                    .map(|r| r.values.iter().copied())
                    .multi_cartesian_product()
                    .map(|combo| {
                        let mut set = ParameterSet::default();
                        for (range, value) in self.ranges.iter().zip(combo) {
                            set.insert(range.name.clone(), value);
                        }
                        set
                    })
                    .collect::<Vec<_>>();
                // multi_cartesian_product yields nothing for zero ranges;
                // a rangeless grid is the single empty set.
                if self.ranges.is_empty() {
                    Ok(vec![ParameterSet::default()])
                } else {
                    Ok(sets)
                }
            }
            ScanKind::Random { count, seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                Ok((0..*count)
                    .map(|_| {
                        let mut set = ParameterSet::default();
                        for range in &self.ranges {
                            let pick = range.values[rng.gen_range(0..range.values.len())];
                            set.insert(range.name.clone(), pick);
                        }
                        set
                    })
                    .collect())
            }
            ScanKind::Custom(sets) => {
                for set in sets {
                    set.check_contains(self.ranges.iter().map(|r| &r.name))?;
                }
                Ok(sets.clone())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        for range in &self.ranges {
            if range.values.is_empty() {
                return Err(Error::InvalidArrayConfig(format!(
                    "sweep range `{}` has no values",
                    range.name
                )));
            }
        }
        let mut names: Vec<&ArcStr> = self.ranges.iter().map(|r| &r.name).collect();
        names.sort();
        if names.windows(2).any(|w| w[0] == w[1]) {
            return Err(Error::InvalidArrayConfig(
                "duplicate sweep range name".to_string(),
            ));
        }
        Ok(())
    }
}
