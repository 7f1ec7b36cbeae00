//! Core data structures: socket color counts and the coloring requirement.
//!
//! [`SocketColors`] is a (red, green, blue) count triple used for targets,
//! current colorings, bench-forced sockets, and rolled outcomes alike.
//! [`SocketRequirement`] pairs a target with the item's socket layout and is
//! validated once before any probability work starts.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::*;
use crate::error::{ChromaticError, Result};

/// Count of sockets per color, indexed by [`RED`], [`GREEN`], [`BLUE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SocketColors(pub [u8; NUM_COLORS]);

impl SocketColors {
    pub const NONE: SocketColors = SocketColors([0; NUM_COLORS]);

    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self([red, green, blue])
    }

    pub fn red(&self) -> u8 {
        self.0[RED]
    }

    pub fn green(&self) -> u8 {
        self.0[GREEN]
    }

    pub fn blue(&self) -> u8 {
        self.0[BLUE]
    }

    /// Total number of sockets described.
    pub fn total(&self) -> u8 {
        self.0.iter().sum()
    }

    /// True if every color count reaches the corresponding count in `target`.
    pub fn satisfies(&self, target: &SocketColors) -> bool {
        self.0.iter().zip(target.0.iter()).all(|(have, want)| have >= want)
    }

    /// Counts sorted ascending, i.e. the color-agnostic shape of the triple.
    pub fn shape(&self) -> [u8; NUM_COLORS] {
        let mut s = self.0;
        s.sort_unstable();
        s
    }
}

impl Add for SocketColors {
    type Output = SocketColors;

    fn add(self, other: SocketColors) -> SocketColors {
        let mut out = self.0;
        for c in 0..NUM_COLORS {
            out[c] += other.0[c];
        }
        SocketColors(out)
    }
}

impl fmt::Display for SocketColors {
    /// Compact notation: `2R1G`, `3B`. An all-zero triple prints as `none`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            return write!(f, "none");
        }
        for (count, letter) in self.0.iter().zip(COLOR_LETTERS) {
            if *count > 0 {
                write!(f, "{}{}", count, letter)?;
            }
        }
        Ok(())
    }
}

impl FromStr for SocketColors {
    type Err = ChromaticError;

    /// Parse `<count><letter>` groups such as `1R2G` or `3b`.
    ///
    /// Repeated letters accumulate (`1R1R` == `2R`). The empty string and
    /// `none` parse to zero sockets.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(SocketColors::NONE);
        }

        let err = || ChromaticError::ParseColors(s.to_string());
        let mut counts = [0u8; NUM_COLORS];
        let mut digits = String::new();

        for ch in trimmed.chars() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                continue;
            }
            let color = COLOR_LETTERS
                .iter()
                .position(|&l| l == ch.to_ascii_uppercase())
                .ok_or_else(err)?;
            if digits.is_empty() {
                return Err(err());
            }
            let n: u8 = digits.parse().map_err(|_| err())?;
            counts[color] = counts[color].checked_add(n).ok_or_else(err)?;
            digits.clear();
        }

        if !digits.is_empty() {
            return Err(err());
        }
        Ok(SocketColors(counts))
    }
}

/// A target coloring on an item with a fixed number of sockets.
///
/// An outcome satisfies the requirement when it has at least `target[c]`
/// sockets of every color `c`. If the target accounts for every socket this
/// is an exact coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SocketRequirement {
    /// Sockets on the item.
    pub sockets: u8,
    /// Most sockets the item base can hold.
    pub capacity: u8,
    /// Minimum count per color.
    pub target: SocketColors,
    /// Coloring the item has right now, if known.
    pub current: Option<SocketColors>,
}

impl SocketRequirement {
    /// Requirement on an item whose capacity is the game maximum.
    pub fn new(sockets: u8, target: SocketColors) -> Self {
        Self {
            sockets,
            capacity: MAX_SOCKETS,
            target,
            current: None,
        }
    }

    pub fn with_capacity(mut self, capacity: u8) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_current(mut self, current: SocketColors) -> Self {
        self.current = Some(current);
        self
    }

    /// Check socket counts against the item and the game limits.
    pub fn validate(&self) -> Result<()> {
        if self.capacity > MAX_SOCKETS {
            return Err(ChromaticError::InvalidSocketCount {
                sockets: self.capacity,
                capacity: MAX_SOCKETS,
            });
        }
        if self.sockets > self.capacity {
            return Err(ChromaticError::InvalidSocketCount {
                sockets: self.sockets,
                capacity: self.capacity,
            });
        }
        let needed = self.target.total();
        if needed > self.sockets {
            return Err(ChromaticError::TargetExceedsSockets {
                target: self.target.to_string(),
                needed,
                sockets: self.sockets,
            });
        }
        if let Some(current) = self.current {
            if current.total() != self.sockets {
                return Err(ChromaticError::CurrentMismatch {
                    current: current.to_string(),
                    sockets: self.sockets,
                });
            }
        }
        Ok(())
    }

    /// True when no attempt is needed: the target is empty or already met.
    pub fn is_satisfied(&self) -> bool {
        self.target.total() == 0
            || self
                .current
                .is_some_and(|current| current.satisfies(&self.target))
    }
}
