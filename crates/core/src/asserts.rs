//! Leveled assertions. The level is fixed at compile time; raising it (through the
//! `debug-checks` feature or when testing) enables the more expensive consistency checks of the
//! engine and the backjump strategies.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const PROPEL_ASSERT_LEVEL_DEFINITION: u8 = PROPEL_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const PROPEL_ASSERT_LEVEL_DEFINITION: u8 = PROPEL_ASSERT_ADVANCED;

pub const PROPEL_ASSERT_SIMPLE: u8 = 1;
pub const PROPEL_ASSERT_MODERATE: u8 = 2;
pub const PROPEL_ASSERT_ADVANCED: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! propel_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::PROPEL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::PROPEL_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! propel_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::PROPEL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::PROPEL_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! propel_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::PROPEL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::PROPEL_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! propel_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::PROPEL_ASSERT_LEVEL_DEFINITION >= $crate::asserts::PROPEL_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}
