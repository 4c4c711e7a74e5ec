//! Target operating system selection.
//!
//! The only encoding that depends on the target OS today is the software
//! breakpoint. Detection of the running platform lives in
//! [`TargetOs::native`] so that bootstrap code can call it once and hand the
//! result to every writer it creates.

use core::fmt;

/// Operating system the emitted code will run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetOs {
    /// Microsoft Windows.
    Windows,
    /// Apple macOS.
    Macos,
    /// GNU/Linux.
    Linux,
    /// Apple iOS.
    Ios,
    /// Android.
    Android,
    /// FreeBSD.
    Freebsd,
    /// BlackBerry QNX.
    Qnx,
}

impl TargetOs {
    /// The operating system this crate was compiled for.
    ///
    /// Unknown hosts map to [`TargetOs::Linux`].
    #[must_use]
    pub const fn native() -> TargetOs {
        if cfg!(target_os = "android") {
            TargetOs::Android
        } else if cfg!(target_os = "windows") {
            TargetOs::Windows
        } else if cfg!(target_os = "macos") {
            TargetOs::Macos
        } else if cfg!(target_os = "ios") {
            TargetOs::Ios
        } else if cfg!(target_os = "freebsd") {
            TargetOs::Freebsd
        } else if cfg!(target_os = "nto") {
            TargetOs::Qnx
        } else {
            TargetOs::Linux
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetOs::Windows => write!(f, "Windows"),
            TargetOs::Macos => write!(f, "macOS"),
            TargetOs::Linux => write!(f, "Linux"),
            TargetOs::Ios => write!(f, "iOS"),
            TargetOs::Android => write!(f, "Android"),
            TargetOs::Freebsd => write!(f, "FreeBSD"),
            TargetOs::Qnx => write!(f, "QNX"),
        }
    }
}
