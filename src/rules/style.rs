use super::Location;
use crate::declaration::DeclarationBlock;
use crate::error::PrinterError;
use crate::printer::Printer;
use crate::traits::ToCss;

/// A style rule. The selector list is kept as the raw text the author wrote.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleRule {
  /// The selector list, as raw text.
  pub selectors: String,
  /// The declarations within the rule.
  pub declarations: DeclarationBlock,
  /// The location of the rule in the source file.
  pub loc: Location,
}

impl ToCss for StyleRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), PrinterError>
  where
    W: std::fmt::Write,
  {
    dest.write_str(&self.selectors)?;
    dest.whitespace()?;
    dest.write_char('{')?;
    dest.indent();
    let len = self.declarations.declarations.len();
    for (i, decl) in self.declarations.declarations.iter().enumerate() {
      dest.newline()?;
      decl.to_css(dest)?;
      if i != len - 1 || !dest.minify {
        dest.write_char(';')?;
      }
    }
    dest.dedent();
    dest.newline()?;
    dest.write_char('}')
  }
}
