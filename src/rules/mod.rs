pub mod media;
pub mod style;
pub mod unknown;

use crate::error::PrinterError;
use crate::printer::Printer;
use crate::traits::ToCss;
use media::MediaRule;
use style::StyleRule;
use unknown::UnknownAtRule;

/// A line and column position within a source file.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
  /// The line number, starting from 0.
  pub line: u32,
  /// The column number, starting from 1.
  pub column: u32,
}

impl From<cssparser::SourceLocation> for Location {
  fn from(loc: cssparser::SourceLocation) -> Location {
    Location {
      line: loc.line,
      column: loc.column,
    }
  }
}

/// A CSS rule.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CssRule {
  /// A `@media` rule.
  Media(MediaRule),
  /// A style rule.
  Style(StyleRule),
  /// Any other at-rule, preserved verbatim.
  Unknown(UnknownAtRule),
}

impl ToCss for CssRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), PrinterError>
  where
    W: std::fmt::Write,
  {
    match self {
      CssRule::Media(media) => media.to_css(dest),
      CssRule::Style(style) => style.to_css(dest),
      CssRule::Unknown(unknown) => unknown.to_css(dest),
    }
  }
}

/// A list of CSS rules.
#[derive(Debug, PartialEq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CssRuleList(pub Vec<CssRule>);

impl ToCss for CssRuleList {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), PrinterError>
  where
    W: std::fmt::Write,
  {
    let mut first = true;
    for rule in &self.0 {
      if first {
        first = false;
      } else {
        if !dest.minify {
          dest.write_char('\n')?;
        }
        dest.newline()?;
      }
      rule.to_css(dest)?;
    }
    Ok(())
  }
}
