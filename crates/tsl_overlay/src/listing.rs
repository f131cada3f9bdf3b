//! The merged texture listing produced by the resolver.

use std::fmt;

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tsl_mod_core::extension_of;

/// How serious a same-name, different-extension clash is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictSeverity {
    /// A compiled texture next to its metadata (`tpc` + `txi`).
    Major,
    /// A compiled texture next to a source image (`tpc` + `tga`).
    Minor,
    /// Any other combination of extensions.
    Other,
}

impl ConflictSeverity {
    /// Classify the distinct extensions of a group; `None` if there is no conflict.
    pub fn from_extensions<'a, I>(extensions: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let extensions: Vec<&str> = extensions.into_iter().collect();
        if extensions.len() < 2 {
            return None;
        }
        let has = |ext: &str| extensions.iter().any(|e| *e == ext);
        Some(if has("tpc") && has("txi") {
            ConflictSeverity::Major
        } else if has("tpc") && has("tga") {
            ConflictSeverity::Minor
        } else {
            ConflictSeverity::Other
        })
    }

    pub fn marker(self) -> &'static str {
        match self {
            ConflictSeverity::Major => "!!",
            ConflictSeverity::Minor => "!",
            ConflictSeverity::Other => "?",
        }
    }
}

/// One row of the listing: a winning file or a hidden file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRow {
    /// Path relative to the source root, without the hidden suffix.
    pub rel_path: String,
    /// Label of the source the file lives in.
    pub source: String,
    /// Severity of the conflict group this winner belongs to.
    pub conflict: Option<ConflictSeverity>,
    pub hidden: bool,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    /// Location on disk (with the hidden suffix for hidden rows).
    pub path: Utf8PathBuf,
}

impl ListingRow {
    /// `.` for hidden rows, the conflict marker for conflicting winners, else empty.
    pub fn marker(&self) -> &'static str {
        if self.hidden {
            "."
        } else {
            self.conflict.map_or("", ConflictSeverity::marker)
        }
    }

    pub fn file_name(&self) -> &str {
        self.rel_path.rsplit('/').next().unwrap_or(&self.rel_path)
    }

    /// `TPC File`, `TGA File (hidden)`, ...
    pub fn type_label(&self) -> String {
        match (extension_of(self.file_name()), self.hidden) {
            (Some(ext), false) => format!("{} File", ext.to_ascii_uppercase()),
            (Some(ext), true) => format!("{} File (hidden)", ext.to_ascii_uppercase()),
            (None, false) => String::new(),
            (None, true) => "Hidden".to_string(),
        }
    }

    pub fn size_text(&self) -> String {
        format_size(self.size)
    }

    fn partition(&self) -> u8 {
        match (self.hidden, self.conflict) {
            (false, Some(_)) => 0,
            (false, None) => 1,
            (true, _) => 2,
        }
    }
}

/// Row counts shown above the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub total: usize,
    pub major: usize,
    pub minor: usize,
    pub other: usize,
    pub hidden: usize,
}

impl fmt::Display for ListingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} texture files | Major: {} | Minor: {} | Hidden: {}",
            self.total, self.major, self.minor, self.hidden
        )
    }
}

/// Ordered rows: conflicting winners, then other winners, then hidden files,
/// each group sorted by case-folded relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureListing {
    rows: Vec<ListingRow>,
    /// Files dropped because a higher-priority source claimed the same path.
    shadowed: usize,
}

impl TextureListing {
    pub(crate) fn new(mut rows: Vec<ListingRow>, shadowed: usize) -> Self {
        rows.sort_by_cached_key(|row| {
            (
                row.partition(),
                row.rel_path.to_lowercase(),
                row.source.clone(),
            )
        });
        Self { rows, shadowed }
    }

    pub fn rows(&self) -> &[ListingRow] {
        &self.rows
    }

    pub fn winners(&self) -> impl Iterator<Item = &ListingRow> {
        self.rows.iter().filter(|row| !row.hidden)
    }

    pub fn hidden(&self) -> impl Iterator<Item = &ListingRow> {
        self.rows.iter().filter(|row| row.hidden)
    }

    pub fn shadowed(&self) -> usize {
        self.shadowed
    }

    /// Winner for a relative path, matched case-insensitively.
    pub fn winner(&self, rel_path: &str) -> Option<&ListingRow> {
        let wanted = rel_path.replace('\\', "/").to_lowercase();
        self.winners()
            .find(|row| row.rel_path.to_lowercase() == wanted)
    }

    pub fn summary(&self) -> ListingSummary {
        let mut summary = ListingSummary {
            total: self.rows.len(),
            ..Default::default()
        };
        for row in &self.rows {
            if row.hidden {
                summary.hidden += 1;
                continue;
            }
            match row.conflict {
                Some(ConflictSeverity::Major) => summary.major += 1,
                Some(ConflictSeverity::Minor) => summary.minor += 1,
                Some(ConflictSeverity::Other) => summary.other += 1,
                None => {}
            }
        }
        summary
    }
}

/// Human-readable size: `512 B`, `1.5 KB`, `2.25 MB`, ...
pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = size as f64;
    let mut unit = UNITS[0];
    for &next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    let text = format!("{:.2}", value);
    format!("{} {}", text.trim_end_matches('0').trim_end_matches('.'), unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(rel: &str, conflict: Option<ConflictSeverity>, hidden: bool) -> ListingRow {
        ListingRow {
            rel_path: rel.to_string(),
            source: "Game Override".to_string(),
            conflict,
            hidden,
            size: 0,
            modified: None,
            path: Utf8PathBuf::from(rel),
        }
    }

    #[test]
    fn test_severity_from_extensions() {
        assert_eq!(
            ConflictSeverity::from_extensions(["tpc", "txi"]),
            Some(ConflictSeverity::Major)
        );
        assert_eq!(
            ConflictSeverity::from_extensions(["tga", "tpc", "txi"]),
            Some(ConflictSeverity::Major)
        );
        assert_eq!(
            ConflictSeverity::from_extensions(["tga", "tpc"]),
            Some(ConflictSeverity::Minor)
        );
        assert_eq!(
            ConflictSeverity::from_extensions(["dds", "tga"]),
            Some(ConflictSeverity::Other)
        );
        assert_eq!(ConflictSeverity::from_extensions(["tpc"]), None);
    }

    #[test]
    fn test_listing_order_and_summary() {
        let listing = TextureListing::new(
            vec![
                row("z.tga", None, false),
                row("b.tga", None, true),
                row("A.tpc", Some(ConflictSeverity::Minor), false),
                row("a.tga", Some(ConflictSeverity::Minor), false),
                row("c.tpc", Some(ConflictSeverity::Major), false),
            ],
            3,
        );
        let order: Vec<_> = listing.rows().iter().map(|r| r.rel_path.as_str()).collect();
        assert_eq!(order, vec!["a.tga", "A.tpc", "c.tpc", "z.tga", "b.tga"]);

        let summary = listing.summary();
        assert_eq!(
            summary.to_string(),
            "5 texture files | Major: 1 | Minor: 2 | Hidden: 1"
        );
        assert_eq!(listing.shadowed(), 3);
    }

    #[test]
    fn test_row_presentation() {
        let hidden = row("textures/foo.tga", None, true);
        assert_eq!(hidden.marker(), ".");
        assert_eq!(hidden.file_name(), "foo.tga");
        assert_eq!(hidden.type_label(), "TGA File (hidden)");

        let major = row("foo.tpc", Some(ConflictSeverity::Major), false);
        assert_eq!(major.marker(), "!!");
        assert_eq!(major.type_label(), "TPC File");
        assert_eq!(row("foo.dds", None, false).marker(), "");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024 + 1024 * 256), "5.25 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024 * 1024), "3072 GB");
    }

    #[test]
    fn test_listing_serializes_camel_case() {
        let listing = TextureListing::new(vec![row("a.tga", None, false)], 0);
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["rows"][0]["relPath"], "a.tga");
        assert_eq!(json["rows"][0]["hidden"], false);
    }
}
