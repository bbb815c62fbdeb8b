//! Platform fallback hierarchy.
//!
//! Every locator declaration is attached to a [`Platform`]. When no
//! declaration exists for the exact current platform, resolution falls back
//! to its parent, then the parent's parent, up to [`Platform::Default`].
//!
//! ```text
//! WEB_DESKTOP_CHROME -> WEB_DESKTOP -> WEB -> DEFAULT
//! MOBILE_IOS_PHONE   -> MOBILE_IOS  -> MOBILE -> DEFAULT
//! ```
//!
//! # Example
//!
//! ```
//! use page_object_driver::Platform;
//!
//! let platform = Platform::from_alias("webdesktopchrome");
//! assert_eq!(platform, Platform::WebDesktopChrome);
//! assert_eq!(platform.fallback(), Some(Platform::WebDesktop));
//! assert!(platform.has_fallback(Platform::Web));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::result::Result as StdResult;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::error::{Error, Result};

// ============================================================================
// Platform
// ============================================================================

/// Runtime platform a page object is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Platform {
    /// Root of the hierarchy.
    #[default]
    Default,

    /// All native mobile platforms.
    Mobile,
    /// Native Android.
    MobileAndroid,
    /// Native Android phones.
    MobileAndroidPhone,
    /// Native Android tablets.
    MobileAndroidTablet,
    /// Native small Android tablets.
    MobileAndroidSmallTablet,
    /// Native iOS.
    MobileIos,
    /// Native iOS phones.
    MobileIosPhone,
    /// Native iOS tablets.
    MobileIosTablet,
    /// Native small iOS tablets.
    MobileIosSmallTablet,

    /// All web platforms.
    Web,
    /// Desktop browsers.
    WebDesktop,
    /// Chrome on desktop.
    WebDesktopChrome,
    /// Edge on desktop.
    WebDesktopEdge,
    /// Firefox on desktop.
    WebDesktopFirefox,
    /// Internet Explorer on desktop.
    WebDesktopIe,
    /// Safari on desktop.
    WebDesktopSafari,
    /// Mobile browsers.
    WebMobile,
    /// Mobile browsers on phones.
    WebMobilePhone,
    /// Android phone browsers.
    WebAndroidPhone,
    /// iOS phone browsers.
    WebIosPhone,
    /// Mobile browsers on tablets.
    WebMobileTablet,
    /// Android tablet browsers.
    WebAndroidTablet,
    /// iOS tablet browsers.
    WebIosTablet,
    /// Mobile browsers on small tablets.
    WebMobileSmallTablet,
    /// Android small tablet browsers.
    WebAndroidSmallTablet,
    /// iOS small tablet browsers.
    WebIosSmallTablet,

    /// All over-the-top (TV) platforms.
    Ott,
    /// Amazon Fire TV.
    OttFireTv,
    /// Amazon Fire TV 4K.
    OttFireTv4k,
    /// Apple TV.
    OttAppleTv,
    /// Apple TV 4K.
    OttAppleTv4k,
    /// Google Chromecast.
    OttChromecast,
    /// Android TV.
    OttAndroidTv,
}

// ============================================================================
// Static Table
// ============================================================================

impl Platform {
    /// Every platform, root first, in declaration order.
    pub const ALL: [Platform; 34] = [
        Self::Default,
        Self::Mobile,
        Self::MobileAndroid,
        Self::MobileAndroidPhone,
        Self::MobileAndroidTablet,
        Self::MobileAndroidSmallTablet,
        Self::MobileIos,
        Self::MobileIosPhone,
        Self::MobileIosTablet,
        Self::MobileIosSmallTablet,
        Self::Web,
        Self::WebDesktop,
        Self::WebDesktopChrome,
        Self::WebDesktopEdge,
        Self::WebDesktopFirefox,
        Self::WebDesktopIe,
        Self::WebDesktopSafari,
        Self::WebMobile,
        Self::WebMobilePhone,
        Self::WebAndroidPhone,
        Self::WebIosPhone,
        Self::WebMobileTablet,
        Self::WebAndroidTablet,
        Self::WebIosTablet,
        Self::WebMobileSmallTablet,
        Self::WebAndroidSmallTablet,
        Self::WebIosSmallTablet,
        Self::Ott,
        Self::OttFireTv,
        Self::OttFireTv4k,
        Self::OttAppleTv,
        Self::OttAppleTv4k,
        Self::OttChromecast,
        Self::OttAndroidTv,
    ];

    /// Returns `(symbolic name, label, fallback)` for this platform.
    const fn entry(self) -> (&'static str, &'static str, Option<Platform>) {
        match self {
            Self::Default => ("DEFAULT", "Default", None),

            Self::Mobile => ("MOBILE", "Mobile", Some(Self::Default)),
            Self::MobileAndroid => ("MOBILE_ANDROID", "MobileAndroid", Some(Self::Mobile)),
            Self::MobileAndroidPhone => (
                "MOBILE_ANDROID_PHONE",
                "MobileAndroidPhone",
                Some(Self::MobileAndroid),
            ),
            Self::MobileAndroidTablet => (
                "MOBILE_ANDROID_TABLET",
                "MobileAndroidTablet",
                Some(Self::MobileAndroid),
            ),
            Self::MobileAndroidSmallTablet => (
                "MOBILE_ANDROID_SMALL_TABLET",
                "MobileAndroidSmallTablet",
                Some(Self::MobileAndroid),
            ),
            Self::MobileIos => ("MOBILE_IOS", "MobileIOS", Some(Self::Mobile)),
            Self::MobileIosPhone => ("MOBILE_IOS_PHONE", "MobileIOSPhone", Some(Self::MobileIos)),
            Self::MobileIosTablet => (
                "MOBILE_IOS_TABLET",
                "MobileIOSTablet",
                Some(Self::MobileIos),
            ),
            Self::MobileIosSmallTablet => (
                "MOBILE_IOS_SMALL_TABLET",
                "MobileIOSSmallTablet",
                Some(Self::MobileIos),
            ),

            Self::Web => ("WEB", "Web", Some(Self::Default)),
            Self::WebDesktop => ("WEB_DESKTOP", "WebDesktop", Some(Self::Web)),
            Self::WebDesktopChrome => (
                "WEB_DESKTOP_CHROME",
                "WebDesktopChrome",
                Some(Self::WebDesktop),
            ),
            Self::WebDesktopEdge => ("WEB_DESKTOP_EDGE", "WebDesktopEdge", Some(Self::WebDesktop)),
            Self::WebDesktopFirefox => (
                "WEB_DESKTOP_FIREFOX",
                "WebDesktopFirefox",
                Some(Self::WebDesktop),
            ),
            Self::WebDesktopIe => ("WEB_DESKTOP_IE", "WebDesktopIE", Some(Self::WebDesktop)),
            Self::WebDesktopSafari => (
                "WEB_DESKTOP_SAFARI",
                "WebDesktopSafari",
                Some(Self::WebDesktop),
            ),
            Self::WebMobile => ("WEB_MOBILE", "WebMobile", Some(Self::Web)),
            Self::WebMobilePhone => ("WEB_MOBILE_PHONE", "WebMobilePhone", Some(Self::WebMobile)),
            Self::WebAndroidPhone => (
                "WEB_ANDROID_PHONE",
                "WebAndroidPhone",
                Some(Self::WebMobilePhone),
            ),
            Self::WebIosPhone => ("WEB_IOS_PHONE", "WebIOSPhone", Some(Self::WebMobilePhone)),
            Self::WebMobileTablet => (
                "WEB_MOBILE_TABLET",
                "WebMobileTablet",
                Some(Self::WebMobile),
            ),
            Self::WebAndroidTablet => (
                "WEB_ANDROID_TABLET",
                "WebAndroidTablet",
                Some(Self::WebMobileTablet),
            ),
            Self::WebIosTablet => ("WEB_IOS_TABLET", "WebIOSTablet", Some(Self::WebMobileTablet)),
            Self::WebMobileSmallTablet => (
                "WEB_MOBILE_SMALL_TABLET",
                "WebMobileSmallTablet",
                Some(Self::WebMobile),
            ),
            Self::WebAndroidSmallTablet => (
                "WEB_ANDROID_SMALL_TABLET",
                "WebAndroidSmallTablet",
                Some(Self::WebMobileSmallTablet),
            ),
            Self::WebIosSmallTablet => (
                "WEB_IOS_SMALL_TABLET",
                "WebIOSSmallTablet",
                Some(Self::WebMobileSmallTablet),
            ),

            Self::Ott => ("OTT", "OTT", Some(Self::Default)),
            Self::OttFireTv => ("OTT_FIRE_TV", "OttFireTv", Some(Self::Ott)),
            Self::OttFireTv4k => ("OTT_FIRE_TV_4K", "OttFireTv4k", Some(Self::OttFireTv)),
            Self::OttAppleTv => ("OTT_APPLE_TV", "OttAppleTv", Some(Self::Ott)),
            Self::OttAppleTv4k => ("OTT_APPLE_TV_4K", "OttAppleTv4k", Some(Self::OttAppleTv)),
            Self::OttChromecast => ("OTT_CHROMECAST", "OttChromecast", Some(Self::Ott)),
            Self::OttAndroidTv => ("OTT_ANDROID_TV", "OttAndroidTv", Some(Self::Ott)),
        }
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl Platform {
    /// Returns the symbolic name (e.g. `WEB_DESKTOP_CHROME`).
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.entry().0
    }

    /// Returns the human-readable label (e.g. `WebDesktopChrome`).
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        self.entry().1
    }

    /// Returns the immediate fallback, or `None` at the root.
    #[inline]
    #[must_use]
    pub const fn fallback(self) -> Option<Platform> {
        self.entry().2
    }

    /// Returns `true` for the root platform.
    #[inline]
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.fallback().is_none()
    }

    /// Iterates the fallback chain, starting with `self` and ending at the root.
    #[must_use]
    pub fn chain(self) -> FallbackChain {
        FallbackChain {
            next: Some(self),
        }
    }
}

// ============================================================================
// Lookup
// ============================================================================

impl Platform {
    /// Looks up a platform by label or symbolic name, ignoring case.
    ///
    /// Labels are tried first (`WebDesktopChrome`), then symbolic names
    /// (`WEB_DESKTOP_CHROME`). Unknown aliases resolve to
    /// [`Platform::Default`] and log a warning.
    #[must_use]
    pub fn from_alias(alias: &str) -> Platform {
        if let Some(platform) = Self::lookup(alias) {
            return platform;
        }

        warn!(alias, "Unrecognized platform, returning DEFAULT");
        Self::Default
    }

    fn lookup(alias: &str) -> Option<Platform> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.label().eq_ignore_ascii_case(alias))
            .or_else(|| {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|p| p.name().eq_ignore_ascii_case(alias))
            })
    }
}

// ============================================================================
// Fallback Reachability
// ============================================================================

impl Platform {
    /// Returns `true` if `target` is reachable from `self` by following
    /// fallback links. Reflexive.
    #[must_use]
    pub fn has_fallback(self, target: Platform) -> bool {
        if self == target {
            return true;
        }
        match self.fallback() {
            Some(parent) => parent.has_fallback(target),
            None => false,
        }
    }

    /// Returns `true` if this platform is (or derives from) native mobile.
    #[inline]
    #[must_use]
    pub fn has_native_fallback(self) -> bool {
        self.has_fallback(Self::Mobile)
    }
}

// ============================================================================
// FallbackChain
// ============================================================================

/// Iterator over a platform's fallback chain. See [`Platform::chain`].
#[derive(Debug, Clone)]
pub struct FallbackChain {
    next: Option<Platform>,
}

impl Iterator for FallbackChain {
    type Item = Platform;

    fn next(&mut self) -> Option<Platform> {
        let current = self.next?;
        self.next = current.fallback();
        Some(current)
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = Error;

    /// Strict parse: unknown aliases are an error instead of `DEFAULT`.
    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(s).ok_or_else(|| Error::config(format!("Unknown platform: {s}")))
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> StdResult<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> StdResult<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
