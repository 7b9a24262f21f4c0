/// Category keys used by the organize operation.
///
/// A file's category is derived from its extension, the year and month of
/// its modification time, or its size. The key is used verbatim as the name
/// of the subdirectory the file is copied into.
///
/// # Examples
///
/// ```
/// use filextract::category::SizeBucket;
///
/// assert_eq!(SizeBucket::from_len(512).dir_name(), "small_<1MB");
/// assert_eq!(SizeBucket::from_len(1024 * 1024).dir_name(), "medium_1-10MB");
/// ```
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::str::FromStr;

/// Directory used for files without an extension.
pub const NO_EXTENSION: &str = "no_extension";

const MIB: u64 = 1024 * 1024;

/// The criterion used to group files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizeBy {
    /// Lower-cased file extension.
    #[default]
    Extension,
    /// `YYYY-MM` of the modification time, in local time.
    Date,
    /// One of four fixed size ranges.
    Size,
}

impl OrganizeBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizeBy::Extension => "extension",
            OrganizeBy::Date => "date",
            OrganizeBy::Size => "size",
        }
    }
}

impl fmt::Display for OrganizeBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganizeBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "extension" => Ok(OrganizeBy::Extension),
            "date" => Ok(OrganizeBy::Date),
            "size" => Ok(OrganizeBy::Size),
            other => Err(format!(
                "unknown organization criteria '{}' (expected extension, date or size)",
                other
            )),
        }
    }
}

/// Size ranges; each lower bound is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeBucket {
    /// Under 1 MiB.
    Small,
    /// 1 MiB up to 10 MiB.
    Medium,
    /// 10 MiB up to 100 MiB.
    Large,
    /// 100 MiB and above.
    Huge,
}

impl SizeBucket {
    pub fn from_len(bytes: u64) -> Self {
        if bytes < MIB {
            SizeBucket::Small
        } else if bytes < 10 * MIB {
            SizeBucket::Medium
        } else if bytes < 100 * MIB {
            SizeBucket::Large
        } else {
            SizeBucket::Huge
        }
    }

    /// Returns the directory name for this bucket.
    pub fn dir_name(&self) -> &'static str {
        match self {
            SizeBucket::Small => "small_<1MB",
            SizeBucket::Medium => "medium_1-10MB",
            SizeBucket::Large => "large_10-100MB",
            SizeBucket::Huge => "huge_>100MB",
        }
    }
}

/// Lower-cased extension of `name`, or [`NO_EXTENSION`].
///
/// A trailing dot (`notes.`) counts as no extension.
pub fn extension_category(name: &str) -> String {
    match Path::new(name).extension() {
        Some(ext) if !ext.is_empty() => ext.to_string_lossy().to_lowercase(),
        _ => NO_EXTENSION.to_string(),
    }
}

/// Zero-padded `YYYY-MM` of `modified` in local time.
pub fn date_category(modified: DateTime<Local>) -> String {
    modified.format("%Y-%m").to_string()
}

/// Computes the category directory for a file.
///
/// Fails only when the date criterion needs a modification time the
/// platform cannot provide.
pub fn category_for(by: OrganizeBy, name: &str, metadata: &Metadata) -> io::Result<String> {
    match by {
        OrganizeBy::Extension => Ok(extension_category(name)),
        OrganizeBy::Date => {
            let modified: DateTime<Local> = metadata.modified()?.into();
            Ok(date_category(modified))
        }
        OrganizeBy::Size => Ok(SizeBucket::from_len(metadata.len()).dir_name().to_string()),
    }
}
