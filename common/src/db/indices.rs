use std::fmt::{self, Debug, Display};

macro_rules! define_index {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[inline(always)]
            pub fn new(id: usize) -> Self {
                Self(id as u32)
            }
            #[inline(always)]
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }
    };
}

// Ids as written in the chip description.
define_index!(DropletId);
define_index!(PinId);
define_index!(MixerId);
define_index!(FluidId);

// Position in `Chip::nets`.
define_index!(NetId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_raw_id() {
        assert_eq!(DropletId(7).to_string(), "7");
        assert_eq!(format!("{:?}", PinId::from(3)), "PinId(3)");
        assert_eq!(NetId::new(2).index(), 2);
    }
}
