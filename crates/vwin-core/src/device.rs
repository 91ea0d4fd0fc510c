#![forbid(unsafe_code)]

//! Device capability classification.
//!
//! The windowing fallback needs one coarse decision: is this device
//! resource-constrained? On constrained devices (phones, low-memory or
//! low-core machines, data-saver mode) the full collection is rendered and
//! windowing is skipped.
//!
//! Detection works from a [`DetectInputs`] snapshot that the host fills in
//! from whatever it can observe (user agent, reported device memory, logical
//! core count, save-data hint). [`DetectInputs::from_env`] reads the same
//! values from `VWIN_*` environment variables so headless hosts and tests can
//! pin the classification.
//!
//! # Predefined Profiles
//!
//! | Profile | Description |
//! |---------|-------------|
//! | `desktop()` | Plenty of memory and cores; windowing enabled |
//! | `mobile()` | Mobile user agent; constrained |
//! | `low_end()` | Low memory and few cores; constrained |
//! | `unknown()` | Nothing reported; treated as unconstrained |
//!
//! # Decision Rule
//!
//! ```text
//! IF class_override is set THEN use it
//! ELSE constrained = mobile OR low_memory OR low_cpu OR save_data
//! ```
//!
//! Missing signals never mark a device as constrained: windowing stays on
//! unless there is positive evidence against it.
//!
//! # Determinism
//!
//! Given the same inputs, [`DeviceCapabilities::detect_from_inputs`] always
//! produces the same result.

use std::env;

use bitflags::bitflags;

/// User-agent substrings that identify mobile browsers.
const MOBILE_MARKERS: &[&str] = &[
    "Android",
    "iPhone",
    "iPad",
    "iPod",
    "Mobile",
    "webOS",
    "BlackBerry",
    "IEMobile",
    "Opera Mini",
];

/// Below this reported memory the device counts as low-memory.
const LOW_MEMORY_GB: f64 = 4.0;

/// At or below this logical core count the device counts as low-CPU.
const LOW_CORE_COUNT: u32 = 2;

bitflags! {
    /// Individual constraint signals found during detection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceTraits: u8 {
        /// Mobile user agent.
        const MOBILE = 1 << 0;
        /// Reported device memory below 4 GB.
        const LOW_MEMORY = 1 << 1;
        /// Two or fewer logical cores.
        const LOW_CPU = 1 << 2;
        /// The user asked to reduce data usage.
        const SAVE_DATA = 1 << 3;
    }
}

/// Explicit classification that bypasses detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceClass {
    /// Window large collections.
    Standard,
    /// Render collections in full.
    Constrained,
}

impl DeviceClass {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Constrained => "constrained",
        }
    }
}

impl std::str::FromStr for DeviceClass {
    type Err = ParseDeviceClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "desktop" | "full" => Ok(Self::Standard),
            "constrained" | "low-end" | "lowend" | "mobile" => Ok(Self::Constrained),
            _ => Err(ParseDeviceClassError(s.trim().to_string())),
        }
    }
}

/// Unrecognized device class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDeviceClassError(String);

impl ParseDeviceClassError {
    /// The rejected input, trimmed.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParseDeviceClassError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown device class {:?}", self.0)
    }
}

impl std::error::Error for ParseDeviceClassError {}

/// Known device profile identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceProfile {
    /// Desktop-class machine.
    Desktop,
    /// Phone or tablet.
    Mobile,
    /// Low memory and few cores.
    LowEnd,
    /// No signals at all.
    Unknown,
    /// Built by hand with [`DeviceProfileBuilder`].
    Custom,
    /// Derived from [`DetectInputs`].
    Detected,
}

impl DeviceProfile {
    /// Profile name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::LowEnd => "low-end",
            Self::Unknown => "unknown",
            Self::Custom => "custom",
            Self::Detected => "detected",
        }
    }
}

impl std::fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw signals a host can observe about the device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectInputs {
    /// Browser user agent, or empty if unknown.
    pub user_agent: String,
    /// Reported device memory in gigabytes (e.g. `navigator.deviceMemory`).
    pub device_memory_gb: Option<f64>,
    /// Logical core count (e.g. `navigator.hardwareConcurrency`).
    pub hardware_concurrency: Option<u32>,
    /// Save-data / data-saver preference.
    pub save_data: bool,
    /// Explicit classification, wins over every other signal.
    pub class_override: Option<DeviceClass>,
}

impl DetectInputs {
    /// Read inputs from `VWIN_USER_AGENT`, `VWIN_DEVICE_MEMORY_GB`,
    /// `VWIN_HARDWARE_CONCURRENCY`, `VWIN_SAVE_DATA` and `VWIN_DEVICE_CLASS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read inputs through an arbitrary key lookup.
    ///
    /// Unparseable values are ignored, as if the variable was unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            user_agent: lookup("VWIN_USER_AGENT").unwrap_or_default(),
            device_memory_gb: lookup("VWIN_DEVICE_MEMORY_GB")
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0),
            hardware_concurrency: lookup("VWIN_HARDWARE_CONCURRENCY")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| *v > 0),
            save_data: lookup("VWIN_SAVE_DATA").is_some_and(|v| is_truthy(&v)),
            class_override: lookup("VWIN_DEVICE_CLASS").and_then(|v| v.parse().ok()),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Classified device capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    profile: DeviceProfile,
    /// Constraint signals that were found.
    pub traits: DeviceTraits,
    /// Explicit classification, if any.
    pub class_override: Option<DeviceClass>,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self::unknown()
    }
}

impl DeviceCapabilities {
    /// Profile identifier.
    #[must_use]
    pub const fn profile(&self) -> DeviceProfile {
        self.profile
    }

    /// Profile name, or `None` for detected capabilities.
    #[must_use]
    pub fn profile_name(&self) -> Option<&'static str> {
        match self.profile {
            DeviceProfile::Detected => None,
            p => Some(p.as_str()),
        }
    }

    /// Desktop-class device.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            profile: DeviceProfile::Desktop,
            traits: DeviceTraits::empty(),
            class_override: None,
        }
    }

    /// Mobile device.
    #[must_use]
    pub const fn mobile() -> Self {
        Self {
            profile: DeviceProfile::Mobile,
            traits: DeviceTraits::MOBILE,
            class_override: None,
        }
    }

    /// Low-end device.
    #[must_use]
    pub const fn low_end() -> Self {
        Self {
            profile: DeviceProfile::LowEnd,
            traits: DeviceTraits::LOW_MEMORY.union(DeviceTraits::LOW_CPU),
            class_override: None,
        }
    }

    /// Device with no known signals.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            profile: DeviceProfile::Unknown,
            traits: DeviceTraits::empty(),
            class_override: None,
        }
    }

    /// Builder for custom profiles, starting with no constraints.
    #[must_use]
    pub fn builder() -> DeviceProfileBuilder {
        DeviceProfileBuilder::new()
    }

    /// Detect from `VWIN_*` environment variables.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_from_inputs(&DetectInputs::from_env())
    }

    /// Classify a set of observed inputs.
    #[must_use]
    pub fn detect_from_inputs(inputs: &DetectInputs) -> Self {
        let mut traits = DeviceTraits::empty();

        if MOBILE_MARKERS.iter().any(|m| inputs.user_agent.contains(m)) {
            traits |= DeviceTraits::MOBILE;
        }
        if inputs.device_memory_gb.is_some_and(|gb| gb < LOW_MEMORY_GB) {
            traits |= DeviceTraits::LOW_MEMORY;
        }
        if inputs
            .hardware_concurrency
            .is_some_and(|cores| cores <= LOW_CORE_COUNT)
        {
            traits |= DeviceTraits::LOW_CPU;
        }
        if inputs.save_data {
            traits |= DeviceTraits::SAVE_DATA;
        }

        let caps = Self {
            profile: DeviceProfile::Detected,
            traits,
            class_override: inputs.class_override,
        };
        crate::debug!(
            traits = ?caps.traits,
            class_override = ?caps.class_override,
            constrained = caps.is_resource_constrained(),
            "device capabilities detected"
        );
        caps
    }

    /// Whether the user agent looked like a phone or tablet.
    #[must_use]
    pub const fn is_mobile(&self) -> bool {
        self.traits.contains(DeviceTraits::MOBILE)
    }

    /// Whether memory, CPU or data-saver signals indicate a weak device.
    #[must_use]
    pub const fn is_low_end(&self) -> bool {
        self.traits.intersects(
            DeviceTraits::LOW_MEMORY
                .union(DeviceTraits::LOW_CPU)
                .union(DeviceTraits::SAVE_DATA),
        )
    }

    /// Final classification.
    #[must_use]
    pub const fn class(&self) -> DeviceClass {
        match self.class_override {
            Some(class) => class,
            None if self.is_mobile() || self.is_low_end() => DeviceClass::Constrained,
            None => DeviceClass::Standard,
        }
    }

    /// Whether windowing should be skipped on this device.
    #[must_use]
    pub const fn is_resource_constrained(&self) -> bool {
        matches!(self.class(), DeviceClass::Constrained)
    }
}

/// Builder for custom device profiles.
///
/// ```
/// use vwin_core::device::DeviceProfileBuilder;
///
/// let device = DeviceProfileBuilder::new().save_data(true).build();
/// assert!(device.is_resource_constrained());
/// ```
#[derive(Debug, Clone)]
pub struct DeviceProfileBuilder {
    caps: DeviceCapabilities,
}

impl Default for DeviceProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceProfileBuilder {
    /// Start with no constraint signals.
    #[must_use]
    pub fn new() -> Self {
        Self {
            caps: DeviceCapabilities {
                profile: DeviceProfile::Custom,
                ..DeviceCapabilities::unknown()
            },
        }
    }

    /// Set the mobile signal.
    #[must_use]
    pub fn mobile(self, enabled: bool) -> Self {
        self.flag(DeviceTraits::MOBILE, enabled)
    }

    /// Set the low-memory signal.
    #[must_use]
    pub fn low_memory(self, enabled: bool) -> Self {
        self.flag(DeviceTraits::LOW_MEMORY, enabled)
    }

    /// Set the low-CPU signal.
    #[must_use]
    pub fn low_cpu(self, enabled: bool) -> Self {
        self.flag(DeviceTraits::LOW_CPU, enabled)
    }

    /// Set the save-data signal.
    #[must_use]
    pub fn save_data(self, enabled: bool) -> Self {
        self.flag(DeviceTraits::SAVE_DATA, enabled)
    }

    /// Force a classification.
    #[must_use]
    pub fn class_override(mut self, class: Option<DeviceClass>) -> Self {
        self.caps.class_override = class;
        self
    }

    /// Build the capability set.
    #[must_use]
    pub fn build(self) -> DeviceCapabilities {
        self.caps
    }

    fn flag(mut self, flag: DeviceTraits, enabled: bool) -> Self {
        self.caps.traits.set(flag, enabled);
        self
    }
}

/// The device-info collaborator consulted by the fallback policy.
pub trait DeviceInfo {
    /// Whether windowing should be skipped on this device.
    fn is_resource_constrained(&self) -> bool;
}

impl DeviceInfo for DeviceCapabilities {
    fn is_resource_constrained(&self) -> bool {
        DeviceCapabilities::is_resource_constrained(self)
    }
}

impl<D: DeviceInfo + ?Sized> DeviceInfo for &D {
    fn is_resource_constrained(&self) -> bool {
        (**self).is_resource_constrained()
    }
}

/// A fixed classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaticDevice(pub bool);

impl DeviceInfo for StaticDevice {
    fn is_resource_constrained(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn predefined_profiles() {
        assert!(!DeviceCapabilities::desktop().is_resource_constrained());
        assert!(DeviceCapabilities::mobile().is_resource_constrained());
        assert!(DeviceCapabilities::low_end().is_resource_constrained());
        assert!(!DeviceCapabilities::unknown().is_resource_constrained());
        assert_eq!(DeviceCapabilities::low_end().profile_name(), Some("low-end"));
    }

    #[test]
    fn detect_mobile_user_agent() {
        let inputs = DetectInputs {
            user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)".into(),
            ..DetectInputs::default()
        };
        let caps = DeviceCapabilities::detect_from_inputs(&inputs);
        assert!(caps.is_mobile());
        assert!(caps.is_resource_constrained());
        assert_eq!(caps.profile_name(), None);
    }

    #[test]
    fn detect_desktop_user_agent_with_memory() {
        let inputs = DetectInputs {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Firefox/130.0".into(),
            device_memory_gb: Some(8.0),
            hardware_concurrency: Some(8),
            ..DetectInputs::default()
        };
        let caps = DeviceCapabilities::detect_from_inputs(&inputs);
        assert_eq!(caps.traits, DeviceTraits::empty());
        assert_eq!(caps.class(), DeviceClass::Standard);
    }

    #[test]
    fn low_memory_and_low_cpu_thresholds() {
        let low_mem = DetectInputs {
            device_memory_gb: Some(2.0),
            ..DetectInputs::default()
        };
        assert!(DeviceCapabilities::detect_from_inputs(&low_mem).is_low_end());

        let four_gb = DetectInputs {
            device_memory_gb: Some(4.0),
            ..DetectInputs::default()
        };
        assert!(!DeviceCapabilities::detect_from_inputs(&four_gb).is_low_end());

        let two_cores = DetectInputs {
            hardware_concurrency: Some(2),
            ..DetectInputs::default()
        };
        assert!(DeviceCapabilities::detect_from_inputs(&two_cores).is_low_end());
    }

    #[test]
    fn missing_signals_are_not_constrained() {
        let caps = DeviceCapabilities::detect_from_inputs(&DetectInputs::default());
        assert!(!caps.is_resource_constrained());
    }

    #[test]
    fn override_wins() {
        let inputs = DetectInputs {
            user_agent: "Android Mobile".into(),
            class_override: Some(DeviceClass::Standard),
            ..DetectInputs::default()
        };
        let caps = DeviceCapabilities::detect_from_inputs(&inputs);
        assert!(caps.is_mobile());
        assert!(!caps.is_resource_constrained());
    }

    #[test]
    fn from_lookup_parses_values() {
        let inputs = DetectInputs::from_lookup(lookup(&[
            ("VWIN_USER_AGENT", "Opera Mini"),
            ("VWIN_DEVICE_MEMORY_GB", "1.5"),
            ("VWIN_HARDWARE_CONCURRENCY", "4"),
            ("VWIN_SAVE_DATA", "yes"),
            ("VWIN_DEVICE_CLASS", "Constrained"),
        ]));
        assert_eq!(inputs.user_agent, "Opera Mini");
        assert_eq!(inputs.device_memory_gb, Some(1.5));
        assert_eq!(inputs.hardware_concurrency, Some(4));
        assert!(inputs.save_data);
        assert_eq!(inputs.class_override, Some(DeviceClass::Constrained));
    }

    #[test]
    fn from_lookup_ignores_garbage() {
        let inputs = DetectInputs::from_lookup(lookup(&[
            ("VWIN_DEVICE_MEMORY_GB", "lots"),
            ("VWIN_HARDWARE_CONCURRENCY", "0"),
            ("VWIN_SAVE_DATA", "maybe"),
            ("VWIN_DEVICE_CLASS", "fast"),
        ]));
        assert_eq!(inputs, DetectInputs::default());
    }

    #[test]
    fn builder_sets_flags() {
        let caps = DeviceProfileBuilder::new().low_cpu(true).build();
        assert_eq!(caps.profile(), DeviceProfile::Custom);
        assert!(caps.is_low_end());
        let cleared = DeviceProfileBuilder::new().low_cpu(true).low_cpu(false).build();
        assert!(!cleared.is_resource_constrained());
    }

    #[test]
    fn static_device_and_references() {
        fn constrained(d: impl DeviceInfo) -> bool {
            d.is_resource_constrained()
        }
        assert!(constrained(StaticDevice(true)));
        assert!(!constrained(StaticDevice(false)));
        let caps = DeviceCapabilities::mobile();
        assert!(constrained(&caps));
    }

    #[test]
    fn device_class_from_str() {
        assert_eq!("low-end".parse::<DeviceClass>(), Ok(DeviceClass::Constrained));
        assert_eq!(" desktop ".parse::<DeviceClass>(), Ok(DeviceClass::Standard));
        assert!("?".parse::<DeviceClass>().is_err());
    }

    #[test]
    fn device_class_parse_error_names_input() {
        let err = " tablet ".parse::<DeviceClass>().unwrap_err();
        assert_eq!(err.input(), "tablet");
        assert_eq!(err.to_string(), "unknown device class \"tablet\"");
    }
}
