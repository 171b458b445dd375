use std::fmt;

/// Inclusive time window; either bound may be left open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub begin: u32,
    pub end: u32,
}

impl Range {
    pub const DONTCARE: u32 = 0;

    /// Bounds below 1 become [`Range::DONTCARE`].
    pub fn new(begin: i64, end: i64) -> Self {
        let norm = |v: i64| {
            if v < 1 {
                Self::DONTCARE
            } else {
                u32::try_from(v).unwrap_or(u32::MAX)
            }
        };
        Self {
            begin: norm(begin),
            end: norm(end),
        }
    }

    pub fn in_range(&self, t: u32) -> bool {
        t >= self.begin && (self.end == Self::DONTCARE || t <= self.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: u32| {
            if v == Self::DONTCARE {
                "*".to_string()
            } else {
                v.to_string()
            }
        };
        write!(f, "({},{})", show(self.begin), show(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bounded_range() {
        let r = Range::new(3, 5);
        assert!(!r.in_range(2));
        assert!(r.in_range(3));
        assert!(r.in_range(5));
        assert!(!r.in_range(6));
    }

    #[test]
    fn display_uses_star() {
        assert_eq!(Range::new(0, 7).to_string(), "(*,7)");
        assert_eq!(Range::new(2, -1).to_string(), "(2,*)");
    }

    proptest! {
        #[test]
        fn open_end_accepts_everything_after_begin(begin in 1i64..100, t in 0u32..10_000) {
            let r = Range::new(begin, 0);
            prop_assert_eq!(r.in_range(t), t as i64 >= begin);
        }

        #[test]
        fn fully_dontcare_accepts_all(b in -50i64..1, e in -50i64..1, t in 0u32..10_000) {
            prop_assert!(Range::new(b, e).in_range(t));
        }
    }
}
