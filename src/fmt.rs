//! Crate-internal logging macros.
//!
//! Forward to `defmt` and/or `log` depending on the enabled features, and
//! compile to nothing when neither is enabled. Only use format strings
//! understood by both backends (`{}`, `{:x}`) with `Copy` arguments.

#![macro_use]
#![allow(unused_macros)]

#[cfg(feature = "defmt")]
#[doc(hidden)]
pub(crate) mod hidden {
    // Required so the macros can access it.
    pub use defmt;
}

// The defmt macros expect `defmt` to be in scope at the call site.

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        {
            use $crate::fmt::hidden::defmt;
            defmt::trace!($($arg)*);
        }
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        {
            let _ = ($($arg)*);
        }
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        {
            use $crate::fmt::hidden::defmt;
            defmt::debug!($($arg)*);
        }
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        {
            let _ = ($($arg)*);
        }
    }};
}

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        {
            use $crate::fmt::hidden::defmt;
            defmt::info!($($arg)*);
        }
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        {
            let _ = ($($arg)*);
        }
    }};
}

macro_rules! warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        {
            use $crate::fmt::hidden::defmt;
            defmt::warn!($($arg)*);
        }
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        {
            let _ = ($($arg)*);
        }
    }};
}

macro_rules! error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        {
            use $crate::fmt::hidden::defmt;
            defmt::error!($($arg)*);
        }
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
        #[cfg(not(any(feature = "defmt", feature = "log")))]
        {
            let _ = ($($arg)*);
        }
    }};
}
