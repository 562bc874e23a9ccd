//! Content type classification for uploaded files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Pdf,
    Csv,
}

impl FileKind {
    pub const ALL: [FileKind; 3] = [FileKind::Image, FileKind::Pdf, FileKind::Csv];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Pdf => "pdf",
            FileKind::Csv => "csv",
        }
    }

    /// The one media type that classifies to this kind.
    pub fn content_type(&self) -> mime::Mime {
        match self {
            FileKind::Image => mime::IMAGE_PNG,
            FileKind::Pdf => mime::APPLICATION_PDF,
            FileKind::Csv => mime::TEXT_CSV,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "image" => Ok(FileKind::Image),
            "pdf" => Ok(FileKind::Pdf),
            "csv" => Ok(FileKind::Csv),
            other => Err(AppError::Infrastructure(format!("unknown stored file kind: {}", other))),
        }
    }
}

/// Maps a reported content type to a [`FileKind`] by exact string equality.
pub fn classify(content_type: &str) -> Result<FileKind> {
    FileKind::ALL
        .into_iter()
        .find(|kind| kind.content_type().essence_str() == content_type)
        .ok_or_else(|| AppError::UnsupportedType(content_type.to_string()))
}
