use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the execution service accepts.
///
/// Raw tags from upstream are normalized through [`Language::parse`] before
/// any network call; unrecognized tags are rejected there and never reach
/// the execution service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Python,
    Cpp,
    Java,
    C,
}

impl Language {
    /// Normalize a raw language tag (case-insensitive, aliases included).
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "javascript" | "js" => Some(Self::Javascript),
            "python" | "py" => Some(Self::Python),
            "cpp" | "c++" => Some(Self::Cpp),
            "java" => Some(Self::Java),
            "c" => Some(Self::C),
            _ => None,
        }
    }

    /// Canonical lowercase key used when dispatching to the execution service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Javascript => "javascript",
            Self::Python => "python",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::C => "c",
        }
    }

    /// Fixed logical name of the single source file submitted per request.
    pub fn source_file(&self) -> &'static str {
        match self {
            Self::Javascript => "main.js",
            Self::Python => "main.py",
            Self::Cpp => "main.cpp",
            Self::Java => "Main.java",
            Self::C => "main.c",
        }
    }

    pub fn all() -> &'static [Language] {
        &[
            Self::Javascript,
            Self::Python,
            Self::Cpp,
            Self::Java,
            Self::C,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
