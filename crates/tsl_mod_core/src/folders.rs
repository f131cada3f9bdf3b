//! Canonical game directories and the file extensions they accept.
//!
//! The game engine loads loose files from a fixed set of top-level directories
//! next to `swkotor2.exe`. Each directory only accepts certain resource types;
//! this table is static configuration and is never derived from the files a mod
//! happens to ship.

use serde::Serialize;
use std::fmt;

/// One of the ten top-level directories the game expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalFolder {
    Override,
    Modules,
    Lips,
    Data,
    Movies,
    StreamMusic,
    StreamSounds,
    StreamVoice,
    TexturePacks,
    Saves,
}

impl CanonicalFolder {
    /// Every canonical folder, in the order the game's directory mapping lists them.
    pub const ALL: [CanonicalFolder; 10] = [
        CanonicalFolder::Override,
        CanonicalFolder::Modules,
        CanonicalFolder::Lips,
        CanonicalFolder::Data,
        CanonicalFolder::Movies,
        CanonicalFolder::StreamMusic,
        CanonicalFolder::StreamSounds,
        CanonicalFolder::StreamVoice,
        CanonicalFolder::TexturePacks,
        CanonicalFolder::Saves,
    ];

    /// Lowercase name used for case-insensitive matching.
    pub fn name(self) -> &'static str {
        match self {
            CanonicalFolder::Override => "override",
            CanonicalFolder::Modules => "modules",
            CanonicalFolder::Lips => "lips",
            CanonicalFolder::Data => "data",
            CanonicalFolder::Movies => "movies",
            CanonicalFolder::StreamMusic => "streammusic",
            CanonicalFolder::StreamSounds => "streamsounds",
            CanonicalFolder::StreamVoice => "streamvoice",
            CanonicalFolder::TexturePacks => "texturepacks",
            CanonicalFolder::Saves => "saves",
        }
    }

    /// Spelling used by a retail installation (`Override`, `StreamMusic`, ...).
    pub fn display_name(self) -> &'static str {
        match self {
            CanonicalFolder::Override => "Override",
            CanonicalFolder::Modules => "Modules",
            CanonicalFolder::Lips => "Lips",
            CanonicalFolder::Data => "Data",
            CanonicalFolder::Movies => "Movies",
            CanonicalFolder::StreamMusic => "StreamMusic",
            CanonicalFolder::StreamSounds => "StreamSounds",
            CanonicalFolder::StreamVoice => "StreamVoice",
            CanonicalFolder::TexturePacks => "TexturePacks",
            CanonicalFolder::Saves => "saves",
        }
    }

    /// Look up a folder by directory name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|folder| folder.name().eq_ignore_ascii_case(name))
    }

    /// Extensions (lowercase, without the dot) the game loads from this folder.
    pub fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            CanonicalFolder::Override => &[
                "tga", "dds", "mdl", "mdx", "uti", "utc", "ncs", "nss", "2da", "dlg", "wav",
                "mp3", "bik", "txi", "tpc",
            ],
            CanonicalFolder::Modules => &["erf", "rim", "mod"],
            CanonicalFolder::Lips => &["mod"],
            CanonicalFolder::Data => &["bif"],
            CanonicalFolder::Movies => &["bik"],
            CanonicalFolder::StreamMusic
            | CanonicalFolder::StreamSounds
            | CanonicalFolder::StreamVoice => &["wav"],
            CanonicalFolder::TexturePacks => &["erf"],
            CanonicalFolder::Saves => &["sav"],
        }
    }

    /// Whether `file_name` has an extension this folder accepts.
    pub fn accepts(self, file_name: &str) -> bool {
        extension_of(file_name).is_some_and(|ext| self.accepted_extensions().contains(&ext.as_str()))
    }

    /// Whether any canonical folder accepts `file_name`.
    pub fn accepted_anywhere(file_name: &str) -> bool {
        Self::ALL.into_iter().any(|folder| folder.accepts(file_name))
    }
}

impl fmt::Display for CanonicalFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lowercase extension of a file name, without the leading dot.
///
/// Leading dots do not start an extension (`.gitignore` has none), and a
/// trailing dot yields `None`.
pub fn extension_of(file_name: &str) -> Option<String> {
    let trimmed = file_name.trim_start_matches('.');
    let (_, ext) = trimmed.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_folder_has_extensions() {
        for folder in CanonicalFolder::ALL {
            assert!(
                !folder.accepted_extensions().is_empty(),
                "{folder} has no accepted extensions"
            );
        }
    }

    #[test]
    fn test_names_are_unique_and_lowercase() {
        let mut names: Vec<_> = CanonicalFolder::ALL.iter().map(|f| f.name()).collect();
        assert!(names.iter().all(|n| *n == n.to_ascii_lowercase()));
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn test_from_name_ignores_case() {
        assert_eq!(
            CanonicalFolder::from_name("Override"),
            Some(CanonicalFolder::Override)
        );
        assert_eq!(
            CanonicalFolder::from_name("STREAMMUSIC"),
            Some(CanonicalFolder::StreamMusic)
        );
        assert_eq!(CanonicalFolder::from_name("tslpatchdata"), None);
    }

    #[test]
    fn test_accepts() {
        assert!(CanonicalFolder::Override.accepts("Foo.TPC"));
        assert!(!CanonicalFolder::Override.accepts("foo.bif"));
        assert!(CanonicalFolder::Data.accepts("foo.bif"));
        assert!(CanonicalFolder::accepted_anywhere("level.rim"));
        assert!(!CanonicalFolder::accepted_anywhere("readme.txt"));
        assert!(!CanonicalFolder::accepted_anywhere("tga"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a.TGA").as_deref(), Some("tga"));
        assert_eq!(extension_of("a.b.txi").as_deref(), Some("txi"));
        assert_eq!(extension_of("notes.docx#").as_deref(), Some("docx#"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".gitignore"), None);
        assert_eq!(extension_of("trailing."), None);
    }
}
