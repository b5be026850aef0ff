//! Target operating system for chord formatting
//!
//! The Meta modifier is spelled differently on each platform (`cmd` on macOS,
//! `win` on Windows, `meta` elsewhere), and the reserved OS shortcuts differ.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operating system a keybinding is rendered for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(rename = "macos")]
    MacOS,
    Windows,
    Linux,
}

impl Platform {
    /// All supported platforms, in a stable order
    pub const ALL: [Platform; 3] = [Platform::MacOS, Platform::Windows, Platform::Linux];

    /// The platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::MacOS => "macos",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "macos" | "mac" | "darwin" => Ok(Platform::MacOS),
            "windows" | "win" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            other => Err(format!("Unknown platform: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trips_through_str() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>(), Ok(platform));
        }
    }

    #[test]
    fn test_platform_aliases() {
        assert_eq!("darwin".parse::<Platform>(), Ok(Platform::MacOS));
        assert_eq!("Win".parse::<Platform>(), Ok(Platform::Windows));
        assert!("beos".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_serde_names() {
        let yaml = serde_yaml::to_string(&Platform::MacOS).unwrap();
        assert_eq!(yaml.trim(), "macos");
        let parsed: Platform = serde_yaml::from_str("windows").unwrap();
        assert_eq!(parsed, Platform::Windows);
    }
}
