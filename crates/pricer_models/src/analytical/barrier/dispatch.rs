//! Term-combination dispatch for the 16 single-barrier cases.
//!
//! Every barrier price is a signed sum of the reflection terms `A`, `B`,
//! `C`, `D` plus one rebate term (`E` for knock-in, `F` for knock-out). The
//! combination depends only on four bits:
//!
//! ```text
//! key = knock(In=0, Out=1) << 3 | direction(Down=0, Up=1) << 2 | call << 1 | (K > H)
//! ```
//!
//! | Case | K > H | K <= H |
//! |------|-------|--------|
//! | down-in call | C+E | A-B+D+E |
//! | down-in put | B-C+D+E | A+E |
//! | up-in call | A+E | B-C+D+E |
//! | up-in put | A-B+D+E | C+E |
//! | down-out call | A-C+F | B-D+F |
//! | down-out put | A-B+C-D+F | F |
//! | up-out call | F | A-B+C-D+F |
//! | up-out put | B-D+F | A-C+F |

use std::fmt;

use crate::instruments::{Barrier, BarrierDirection, KnockType, OptionType, VanillaOption};

/// Which rebate term closes a combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RebateTerm {
    /// `E`: rebate paid at expiry if a knock-in barrier is never touched
    AtExpiry,
    /// `F`: rebate paid when a knock-out barrier is touched
    AtHit,
}

impl RebateTerm {
    fn symbol(self) -> char {
        match self {
            RebateTerm::AtExpiry => 'E',
            RebateTerm::AtHit => 'F',
        }
    }
}

/// Signed coefficients of `A`, `B`, `C`, `D` and the rebate term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TermCombination {
    /// Coefficient of `A(x1)`
    pub a: i8,
    /// Coefficient of `B(x2)`
    pub b: i8,
    /// Coefficient of `C(y1)`
    pub c: i8,
    /// Coefficient of `D(y2)`
    pub d: i8,
    /// Coefficient of the rebate term
    pub rebate: i8,
    /// Rebate term kind
    pub rebate_term: RebateTerm,
}

impl TermCombination {
    const fn new(a: i8, b: i8, c: i8, d: i8, rebate_term: RebateTerm) -> Self {
        Self {
            a,
            b,
            c,
            d,
            rebate: 1,
            rebate_term,
        }
    }

    /// Coefficients of `A..D` as floats.
    #[inline]
    pub fn weights(&self) -> [f64; 4] {
        [self.a as f64, self.b as f64, self.c as f64, self.d as f64]
    }

    /// Canonical form such as `"A-B+D+E"` or `"F"`.
    pub fn label(&self) -> String {
        let terms = [
            ('A', self.a),
            ('B', self.b),
            ('C', self.c),
            ('D', self.d),
            (self.rebate_term.symbol(), self.rebate),
        ];
        let mut label = String::new();
        for (symbol, coefficient) in terms {
            if coefficient == 0 {
                continue;
            }
            if coefficient < 0 {
                label.push('-');
            } else if !label.is_empty() {
                label.push('+');
            }
            label.push(symbol);
        }
        label
    }
}

impl fmt::Display for TermCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

use RebateTerm::{AtExpiry as E, AtHit as F};

/// Combination for each [`DispatchKey`], indexed by the key value.
pub const DISPATCH_TABLE: [TermCombination; 16] = [
    // knock-in, down
    TermCombination::new(1, 0, 0, 0, E),   // put, K <= H: A+E
    TermCombination::new(0, 1, -1, 1, E),  // put, K > H: B-C+D+E
    TermCombination::new(1, -1, 0, 1, E),  // call, K <= H: A-B+D+E
    TermCombination::new(0, 0, 1, 0, E),   // call, K > H: C+E
    // knock-in, up
    TermCombination::new(0, 0, 1, 0, E),   // put, K <= H: C+E
    TermCombination::new(1, -1, 0, 1, E),  // put, K > H: A-B+D+E
    TermCombination::new(0, 1, -1, 1, E),  // call, K <= H: B-C+D+E
    TermCombination::new(1, 0, 0, 0, E),   // call, K > H: A+E
    // knock-out, down
    TermCombination::new(0, 0, 0, 0, F),   // put, K <= H: F
    TermCombination::new(1, -1, 1, -1, F), // put, K > H: A-B+C-D+F
    TermCombination::new(0, 1, 0, -1, F),  // call, K <= H: B-D+F
    TermCombination::new(1, 0, -1, 0, F),  // call, K > H: A-C+F
    // knock-out, up
    TermCombination::new(1, 0, -1, 0, F),  // put, K <= H: A-C+F
    TermCombination::new(0, 1, 0, -1, F),  // put, K > H: B-D+F
    TermCombination::new(1, -1, 1, -1, F), // call, K <= H: A-B+C-D+F
    TermCombination::new(0, 0, 0, 0, F),   // call, K > H: F
];

/// 4-bit key selecting one of the 16 barrier cases.
///
/// # Examples
/// ```
/// use pricer_models::analytical::barrier::DispatchKey;
/// use pricer_models::instruments::{Barrier, VanillaOption};
///
/// let option = VanillaOption::call(100.0, 1.0).unwrap();
/// let barrier = Barrier::down_in(90.0).unwrap();
///
/// let key = DispatchKey::for_contract(&option, &barrier);
/// assert!(key.strike_above_barrier());
/// assert_eq!(key.combination().label(), "C+E");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchKey(u8);

impl DispatchKey {
    /// Number of distinct keys.
    pub const COUNT: usize = 16;

    /// Builds a key from its four components.
    pub fn new(
        knock_type: KnockType,
        direction: BarrierDirection,
        option_type: OptionType,
        strike_above_barrier: bool,
    ) -> Self {
        let knock = matches!(knock_type, KnockType::Out) as u8;
        let up = matches!(direction, BarrierDirection::Up) as u8;
        let call = matches!(option_type, OptionType::Call) as u8;
        Self(knock << 3 | up << 2 | call << 1 | strike_above_barrier as u8)
    }

    /// Key of a concrete contract. A strike equal to the level counts as `K <= H`.
    pub fn for_contract(option: &VanillaOption, barrier: &Barrier) -> Self {
        Self::new(
            barrier.knock_type(),
            barrier.direction(),
            option.option_type(),
            option.strike() > barrier.level(),
        )
    }

    /// Key from its raw value, `None` when out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then_some(Self(index as u8))
    }

    /// All 16 keys in table order.
    pub fn all() -> impl Iterator<Item = DispatchKey> {
        (0..Self::COUNT as u8).map(DispatchKey)
    }

    /// Raw table index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Knock type bit.
    pub fn knock_type(self) -> KnockType {
        if self.0 & 0b1000 != 0 {
            KnockType::Out
        } else {
            KnockType::In
        }
    }

    /// Direction bit.
    pub fn direction(self) -> BarrierDirection {
        if self.0 & 0b0100 != 0 {
            BarrierDirection::Up
        } else {
            BarrierDirection::Down
        }
    }

    /// Call/put bit.
    pub fn option_type(self) -> OptionType {
        if self.0 & 0b0010 != 0 {
            OptionType::Call
        } else {
            OptionType::Put
        }
    }

    /// Strike-above-barrier bit.
    pub fn strike_above_barrier(self) -> bool {
        self.0 & 0b0001 != 0
    }

    /// Term combination for this case.
    #[inline]
    pub fn combination(self) -> TermCombination {
        DISPATCH_TABLE[self.index()]
    }
}

impl fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction() {
            BarrierDirection::Down => "down",
            BarrierDirection::Up => "up",
        };
        let knock = match self.knock_type() {
            KnockType::In => "in",
            KnockType::Out => "out",
        };
        let option = match self.option_type() {
            OptionType::Call => "call",
            OptionType::Put => "put",
        };
        let ordering = if self.strike_above_barrier() {
            "K>H"
        } else {
            "K<=H"
        };
        write!(f, "{}-{} {} {}", direction, knock, option, ordering)
    }
}
