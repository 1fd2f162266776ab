use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Routing policy reported by the engine.
///
/// Text that matches none of the known policies is preserved in `Other`
/// so newer engines can report modes this build has no label for.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumString,
)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TunnelMode {
    Direct,
    Global,
    #[default]
    Rule,
    #[strum(default)]
    Other(String),
}

impl fmt::Display for TunnelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TunnelMode::Direct => write!(f, "direct"),
            TunnelMode::Global => write!(f, "global"),
            TunnelMode::Rule => write!(f, "rule"),
            TunnelMode::Other(name) => write!(f, "{}", name),
        }
    }
}

impl From<String> for TunnelMode {
    fn from(value: String) -> Self {
        match TunnelMode::from_str(&value) {
            Ok(mode) => mode,
            Err(_) => TunnelMode::Other(value),
        }
    }
}

impl From<TunnelMode> for String {
    fn from(mode: TunnelMode) -> Self {
        mode.to_string()
    }
}

/// Last state published by the engine for the main screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionSnapshot {
    pub profile_name: Option<String>,
    pub running: bool,
    pub forwarded: u64,
    pub mode: TunnelMode,
    pub has_providers: bool,
}

/// Progress tick of a long-running configuration download or check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    FetchConfiguration {
        source: String,
    },
    FetchProviders {
        source: String,
        progress: u32,
        max: u32,
    },
    Verifying {
        progress: u32,
        max: u32,
    },
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::FetchConfiguration { source } => {
                write!(f, "fetch-configuration({})", source)
            }
            FetchStatus::FetchProviders {
                source,
                progress,
                max,
            } => write!(f, "fetch-providers({}, {}/{})", source, progress, max),
            FetchStatus::Verifying { progress, max } => {
                write!(f, "verifying({}/{})", progress, max)
            }
        }
    }
}

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

pub fn traffic_total(bytes: u64) -> String {
    if bytes > GIB {
        format!("{:.2} GiB", bytes as f64 / GIB as f64)
    } else if bytes > MIB {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    } else if bytes > KIB {
        format!("{:.2} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} Bytes", bytes)
    }
}
