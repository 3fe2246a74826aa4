//! Error types.

use crate::rules::Location;
use cssparser::{BasicParseErrorKind, ParseError, ParseErrorKind};
use smallvec::SmallVec;
use std::fmt;

/// An error with a source location.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Error<T> {
  /// The type of error that occurred.
  pub kind: T,
  /// The location where the error occurred.
  pub loc: Option<ErrorLocation>,
}

impl<T: fmt::Display> fmt::Display for Error<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.kind.fmt(f)?;
    if let Some(loc) = &self.loc {
      write!(f, " at {}", loc)?;
    }
    Ok(())
  }
}

impl<T: fmt::Display + fmt::Debug> std::error::Error for Error<T> {}

/// A line and column location within a source file.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorLocation {
  /// The filename in which the error occurred.
  pub filename: String,
  /// The line number, starting from 0.
  pub line: u32,
  /// The column number, starting from 1.
  pub column: u32,
}

impl ErrorLocation {
  /// Create a new error location from a source location and filename.
  pub fn new(loc: Location, filename: String) -> Self {
    ErrorLocation {
      filename,
      line: loc.line,
      column: loc.column,
    }
  }
}

impl fmt::Display for ErrorLocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.filename, self.line, self.column)
  }
}

/// A parser error.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParserError {
  /// An at rule body was invalid.
  AtRuleBodyInvalid,
  /// An unknown or unsupported at rule was encountered.
  AtRuleInvalid(String),
  /// Unexpectedly encountered the end of input data.
  EndOfInput,
  /// A declaration was invalid.
  InvalidDeclaration,
  /// Invalid qualified rule.
  QualifiedRuleInvalid,
  /// An unexpected token was encountered.
  UnexpectedToken(String),
}

impl fmt::Display for ParserError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    use ParserError::*;
    match self {
      AtRuleBodyInvalid => write!(f, "Invalid @ rule body"),
      AtRuleInvalid(name) => write!(f, "Unknown at rule: @{}", name),
      EndOfInput => write!(f, "Unexpected end of input"),
      InvalidDeclaration => write!(f, "Invalid declaration"),
      QualifiedRuleInvalid => write!(f, "Invalid qualified rule"),
      UnexpectedToken(token) => write!(f, "Unexpected token {}", token),
    }
  }
}

impl Error<ParserError> {
  /// Creates an error from a cssparser error.
  pub fn from(err: ParseError<'_, ParserError>, filename: String) -> Error<ParserError> {
    let kind = match err.kind {
      ParseErrorKind::Basic(b) => match b {
        BasicParseErrorKind::UnexpectedToken(t) => {
          use cssparser::ToCss;
          ParserError::UnexpectedToken(t.to_css_string())
        }
        BasicParseErrorKind::EndOfInput => ParserError::EndOfInput,
        BasicParseErrorKind::AtRuleInvalid(a) => ParserError::AtRuleInvalid(a.to_string()),
        BasicParseErrorKind::AtRuleBodyInvalid => ParserError::AtRuleBodyInvalid,
        BasicParseErrorKind::QualifiedRuleInvalid => ParserError::QualifiedRuleInvalid,
      },
      ParseErrorKind::Custom(c) => c,
    };

    Error {
      kind,
      loc: Some(ErrorLocation {
        filename,
        line: err.location.line,
        column: err.location.column,
      }),
    }
  }
}

/// A fatal configuration error, reported before any rewriting begins.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RetinaErrorKind {
  /// No asset directory was configured, and none can be derived because the
  /// style sheet has no known source file.
  MissingAssetDirectory,
}

impl fmt::Display for RetinaErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      RetinaErrorKind::MissingAssetDirectory => write!(f, "You must provide an assets directory"),
    }
  }
}

/// A non-fatal diagnostic produced while rewriting a style sheet.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RetinaWarningKind {
  /// No high resolution variant of an image exists for a tier.
  MissingHighResImage {
    /// The image path as written in the style sheet.
    path: String,
    /// The suffixes that were tried.
    suffixes: SmallVec<[String; 1]>,
  },
  /// A manually authored declaration already provides the image that would
  /// be generated.
  UnnecessaryHighResImage,
}

impl fmt::Display for RetinaWarningKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    use RetinaWarningKind::*;
    match self {
      MissingHighResImage { path, suffixes } => write!(
        f,
        "Could not find high resolution version for `{}` with suffixes {}",
        path,
        suffixes.join("/")
      ),
      UnnecessaryHighResImage => write!(
        f,
        "Unnecessary high resolution image provided; the same image will be generated automatically"
      ),
    }
  }
}

/// A warning attached to a [RetinaResult](crate::retina::RetinaResult).
pub type Warning = Error<RetinaWarningKind>;

/// A printer error.
pub type PrinterError = Error<PrinterErrorKind>;

/// A printer error type.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrinterErrorKind {
  /// A [std::fmt::Error](std::fmt::Error) was encountered in the underlying destination.
  FmtError,
}

impl From<fmt::Error> for PrinterError {
  fn from(_: fmt::Error) -> PrinterError {
    PrinterError {
      kind: PrinterErrorKind::FmtError,
      loc: None,
    }
  }
}

impl fmt::Display for PrinterErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      PrinterErrorKind::FmtError => write!(f, "Printer error"),
    }
  }
}
