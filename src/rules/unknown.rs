//! An unknown at-rule.

use super::Location;
use crate::error::PrinterError;
use crate::printer::Printer;
use crate::traits::ToCss;

/// An unknown at-rule, stored as raw text and round-tripped verbatim.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnknownAtRule {
  /// The name of the at-rule (without the @).
  pub name: String,
  /// The prelude of the rule.
  pub prelude: String,
  /// The raw contents of the block, if any.
  pub block: Option<String>,
  /// The location of the rule in the source file.
  pub loc: Location,
}

impl ToCss for UnknownAtRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), PrinterError>
  where
    W: std::fmt::Write,
  {
    dest.write_char('@')?;
    dest.write_str(&self.name)?;

    if !self.prelude.is_empty() {
      dest.write_char(' ')?;
      dest.write_str(&self.prelude)?;
    }

    if let Some(block) = &self.block {
      dest.whitespace()?;
      dest.write_char('{')?;
      dest.write_str(block)?;
      dest.write_char('}')
    } else {
      dest.write_char(';')
    }
  }
}
