//! Supported editors
//!
//! Variants of the same editor family (Windsurf and Cursor for VSCode, the
//! JetBrains IDEs for IntelliJ) share one mapping-table column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An editor whose keymap can be imported or exported
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EditorType {
    VSCode,
    Windsurf,
    WindsurfNext,
    Cursor,
    Zed,
    IntelliJ,
    IntelliJCommunity,
    PyCharm,
    WebStorm,
    CLion,
    PhpStorm,
    RubyMine,
    GoLand,
    RustRover,
    Vim,
    Helix,
    Xcode,
    /// Minimal JSON format used as a reference plugin
    Demo,
}

/// Column of the mapping table an editor reads its descriptors from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MappingFamily {
    VSCode,
    Windsurf,
    Cursor,
    Zed,
    IntelliJ,
    Vim,
    Helix,
    Xcode,
}

impl MappingFamily {
    pub const ALL: [MappingFamily; 8] = [
        MappingFamily::VSCode,
        MappingFamily::Windsurf,
        MappingFamily::Cursor,
        MappingFamily::Zed,
        MappingFamily::IntelliJ,
        MappingFamily::Vim,
        MappingFamily::Helix,
        MappingFamily::Xcode,
    ];

    /// Field name in the mapping YAML
    pub fn as_str(self) -> &'static str {
        match self {
            MappingFamily::VSCode => "vscode",
            MappingFamily::Windsurf => "windsurf",
            MappingFamily::Cursor => "cursor",
            MappingFamily::Zed => "zed",
            MappingFamily::IntelliJ => "intellij",
            MappingFamily::Vim => "vim",
            MappingFamily::Helix => "helix",
            MappingFamily::Xcode => "xcode",
        }
    }
}

impl fmt::Display for MappingFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EditorType {
    pub const ALL: [EditorType; 18] = [
        EditorType::VSCode,
        EditorType::Windsurf,
        EditorType::WindsurfNext,
        EditorType::Cursor,
        EditorType::Zed,
        EditorType::IntelliJ,
        EditorType::IntelliJCommunity,
        EditorType::PyCharm,
        EditorType::WebStorm,
        EditorType::CLion,
        EditorType::PhpStorm,
        EditorType::RubyMine,
        EditorType::GoLand,
        EditorType::RustRover,
        EditorType::Vim,
        EditorType::Helix,
        EditorType::Xcode,
        EditorType::Demo,
    ];

    /// Command-line and config spelling
    pub fn as_str(self) -> &'static str {
        match self {
            EditorType::VSCode => "vscode",
            EditorType::Windsurf => "windsurf",
            EditorType::WindsurfNext => "windsurf-next",
            EditorType::Cursor => "cursor",
            EditorType::Zed => "zed",
            EditorType::IntelliJ => "intellij",
            EditorType::IntelliJCommunity => "intellij-community",
            EditorType::PyCharm => "pycharm",
            EditorType::WebStorm => "webstorm",
            EditorType::CLion => "clion",
            EditorType::PhpStorm => "phpstorm",
            EditorType::RubyMine => "rubymine",
            EditorType::GoLand => "goland",
            EditorType::RustRover => "rustrover",
            EditorType::Vim => "vim",
            EditorType::Helix => "helix",
            EditorType::Xcode => "xcode",
            EditorType::Demo => "demo",
        }
    }

    /// Human-readable application name
    pub fn app_name(self) -> &'static str {
        match self {
            EditorType::VSCode => "Visual Studio Code",
            EditorType::Windsurf => "Windsurf",
            EditorType::WindsurfNext => "Windsurf Next",
            EditorType::Cursor => "Cursor",
            EditorType::Zed => "Zed",
            EditorType::IntelliJ => "IntelliJ IDEA Ultimate",
            EditorType::IntelliJCommunity => "IntelliJ IDEA Community Edition",
            EditorType::PyCharm => "PyCharm",
            EditorType::WebStorm => "WebStorm",
            EditorType::CLion => "CLion",
            EditorType::PhpStorm => "PhpStorm",
            EditorType::RubyMine => "RubyMine",
            EditorType::GoLand => "GoLand",
            EditorType::RustRover => "RustRover",
            EditorType::Vim => "Vim",
            EditorType::Helix => "Helix",
            EditorType::Xcode => "Xcode",
            EditorType::Demo => "Demo",
        }
    }

    /// Mapping-table column this editor uses, if any
    pub fn mapping_family(self) -> Option<MappingFamily> {
        match self {
            EditorType::VSCode => Some(MappingFamily::VSCode),
            EditorType::Windsurf | EditorType::WindsurfNext => Some(MappingFamily::Windsurf),
            EditorType::Cursor => Some(MappingFamily::Cursor),
            EditorType::Zed => Some(MappingFamily::Zed),
            EditorType::IntelliJ
            | EditorType::IntelliJCommunity
            | EditorType::PyCharm
            | EditorType::WebStorm
            | EditorType::CLion
            | EditorType::PhpStorm
            | EditorType::RubyMine
            | EditorType::GoLand
            | EditorType::RustRover => Some(MappingFamily::IntelliJ),
            EditorType::Vim => Some(MappingFamily::Vim),
            EditorType::Helix => Some(MappingFamily::Helix),
            EditorType::Xcode => Some(MappingFamily::Xcode),
            EditorType::Demo => None,
        }
    }

    pub fn is_vscode_variant(self) -> bool {
        matches!(
            self,
            EditorType::VSCode | EditorType::Windsurf | EditorType::WindsurfNext | EditorType::Cursor
        )
    }

    pub fn is_intellij_variant(self) -> bool {
        self.mapping_family() == Some(MappingFamily::IntelliJ)
    }
}

impl fmt::Display for EditorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        EditorType::ALL
            .into_iter()
            .find(|e| e.as_str() == lower)
            .ok_or_else(|| format!("Unknown editor: {}", s))
    }
}

impl TryFrom<String> for EditorType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EditorType> for String {
    fn from(editor: EditorType) -> Self {
        editor.as_str().to_string()
    }
}
