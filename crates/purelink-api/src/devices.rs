// Manifest descriptors and appliance classification.
//
// The manifest endpoint returns one descriptor per registered appliance.
// Classification inspects `ProductType` only. Two schemes exist:
//
// - `Deduplicated` (default): a single ordered match over mutually
//   exclusive predicates, first match wins, one entry per descriptor.
// - `LegacyDoublePass`: the historical behavior -- every descriptor gets
//   a link-generation classification, then a second pass appends the
//   newer direct-control kinds. A 438/520/527 appliance is listed twice.
//   Kept because upstream apps may rely on seeing both representations
//   during entity migration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ProductType values observed in the manifest.
const PRODUCT_360_EYE: &str = "N223";
const PRODUCT_HOT_COOL_LINK: &str = "455";
const PRODUCT_HOT_COOL: &str = "527";
const PRODUCT_COOL: [&str; 2] = ["438", "520"];

/// Raw device descriptor as reported by the manifest endpoint.
///
/// Vendor-defined fields beyond the known set are preserved in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceRecord {
    pub serial: String,
    pub name: Option<String>,
    pub version: Option<String>,
    pub product_type: String,
    #[serde(default)]
    pub auto_update: Option<bool>,
    #[serde(default)]
    pub new_version_available: Option<bool>,
    /// Encrypted local MQTT credentials. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub local_credentials: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Classification of an appliance by capability and generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DeviceKind {
    /// 360 Eye robot vacuum.
    Eye360,
    /// Pure Cool Link fan/purifier (link generation).
    PureCoolLink,
    /// Pure Hot+Cool Link heater (link generation).
    PureHotCoolLink,
    /// Pure Cool fan/purifier (direct-control generation).
    PureCool,
    /// Pure Hot+Cool heater (direct-control generation).
    PureHotCool,
}

impl DeviceKind {
    /// Link-generation appliances speak the older local protocol.
    pub fn is_link_generation(&self) -> bool {
        matches!(self, Self::Eye360 | Self::PureCoolLink | Self::PureHotCoolLink)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Eye360 => "360 Eye",
            Self::PureCoolLink => "Pure Cool Link",
            Self::PureHotCoolLink => "Pure Hot+Cool Link",
            Self::PureCool => "Pure Cool",
            Self::PureHotCool => "Pure Hot+Cool",
        }
    }
}

/// A classified appliance: one manifest descriptor plus its kind.
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    pub kind: DeviceKind,
    pub record: DeviceRecord,
}

/// How `list_devices` turns manifest descriptors into [`Device`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiscoveryPolicy {
    /// Single pass, mutually exclusive kinds, one entry per descriptor.
    #[default]
    Deduplicated,
    /// Historical two-pass behavior: link-generation pass over every
    /// descriptor, then direct-control kinds appended. May duplicate.
    LegacyDoublePass,
}

/// Classify one descriptor into exactly one kind. First match wins.
pub fn classify(record: &DeviceRecord) -> DeviceKind {
    match record.product_type.as_str() {
        PRODUCT_360_EYE => DeviceKind::Eye360,
        PRODUCT_HOT_COOL_LINK => DeviceKind::PureHotCoolLink,
        PRODUCT_HOT_COOL => DeviceKind::PureHotCool,
        t if PRODUCT_COOL.contains(&t) => DeviceKind::PureCool,
        _ => DeviceKind::PureCoolLink,
    }
}

/// Apply a discovery policy to a full manifest.
pub fn classify_manifest(records: Vec<DeviceRecord>, policy: DiscoveryPolicy) -> Vec<Device> {
    match policy {
        DiscoveryPolicy::Deduplicated => records
            .into_iter()
            .map(|record| Device {
                kind: classify(&record),
                record,
            })
            .collect(),
        DiscoveryPolicy::LegacyDoublePass => {
            let mut devices: Vec<Device> = records
                .iter()
                .cloned()
                .map(|record| {
                    let kind = match record.product_type.as_str() {
                        PRODUCT_360_EYE => DeviceKind::Eye360,
                        PRODUCT_HOT_COOL_LINK => DeviceKind::PureHotCoolLink,
                        _ => DeviceKind::PureCoolLink,
                    };
                    Device { kind, record }
                })
                .collect();

            for record in records {
                let kind = match record.product_type.as_str() {
                    t if PRODUCT_COOL.contains(&t) => Some(DeviceKind::PureCool),
                    PRODUCT_HOT_COOL => Some(DeviceKind::PureHotCool),
                    _ => None,
                };
                if let Some(kind) = kind {
                    devices.push(Device { kind, record });
                }
            }

            devices
        }
    }
}
