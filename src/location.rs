//! A position in a catalog source file, with some convenience functions.

use std::fmt::{Display, Formatter};

use string_cache::DefaultAtom;

// Lines and columns count from 1.
pub type LineNumberType = u32;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SourceLocation {
  /// The catalog file name. Interned, since every record of a file shares it.
  pub file   : DefaultAtom,
  pub line   : LineNumberType,
  pub column : LineNumberType
}

impl SourceLocation {

  pub fn new(file: &str, line: LineNumberType, column: LineNumberType) -> SourceLocation {
    SourceLocation{
      file: DefaultAtom::from(file),
      line,
      column
    }
  }

  /// A location for records that were built in memory rather than read from a file.
  pub fn builtin() -> SourceLocation {
    SourceLocation::new("<builtin>", 0, 0)
  }

  /**
    Converts a byte offset into `text` to a line and column. Offsets past the end of the
    text are clamped to the end.
  */
  pub fn from_offset(file: &str, text: &str, offset: usize) -> SourceLocation {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line   = before.matches('\n').count() as LineNumberType + 1;
    let column = match before.rfind('\n') {
      Some(newline) => before[newline + 1..].chars().count(),
      None          => before.chars().count()
    } as LineNumberType + 1;

    SourceLocation::new(file, line, column)
  }

  /// Locates `rest`, a suffix of `text` left over by a parser, within `text`.
  pub fn from_remainder(file: &str, text: &str, rest: &str) -> SourceLocation {
    SourceLocation::from_offset(file, text, text.len().saturating_sub(rest.len()))
  }

  pub fn is_builtin(&self) -> bool {
    self.line == 0
  }

}

impl Display for SourceLocation {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.is_builtin() {
      true  => write!(f, "{}", self.file),
      false => write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
  }
}
