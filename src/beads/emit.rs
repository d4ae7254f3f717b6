/*!
  Emits a `BeadTable` as C++ source: a static array with one row per opcode plus a
  trailing all-zero sentinel, and the accessor that returns the row of an instruction's
  opcode. The accessor does not check bounds; callers must only pass opcodes of the
  target.
*/

use std::io::{self, Write};

use serde::Deserialize;

use super::{BeadRow, BeadTable, RowKind, BEADS_NUMBER, BEAD_SIZE};

pub const SOURCE_FILE_TITLE: &str = "Machine Code Beads";

const HEADER_WIDTH: usize = 80;

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitOptions {
  /// Emit the generated-file banner before the function.
  pub header            : bool,
  /// Appended to the target name to form the class the accessor belongs to.
  pub emitter_class     : String,
  pub function_name     : String,
  pub table_name        : String,
  /// Write rows of zeros as `{ 0x0 }` instead of spelling out every byte.
  pub compact_zero_rows : bool
}

impl Default for EmitOptions {
  fn default() -> EmitOptions {
    EmitOptions{
      header            : true,
      emitter_class     : "MCCodeEmitter".to_string(),
      function_name     : "getGenInstrBeads".to_string(),
      table_name        : "InstBits".to_string(),
      compact_zero_rows : false
    }
  }
}

/// Writes the banner comment that marks a file as generated.
pub fn emit_source_file_header<W: Write>(title: &str, out: &mut W) -> io::Result<()> {
  let head   = "/*===- codebeads generated file ";
  let tail   = "*- C++ -*-===*\\";
  let dashes = HEADER_WIDTH.saturating_sub(head.len() + tail.len());
  let inner  = HEADER_WIDTH - 6;

  writeln!(out, "{}{}{}", head, "-".repeat(dashes), tail)?;
  writeln!(out, "|* {:<width$} *|", "", width = inner)?;
  writeln!(out, "|* {:<width$} *|", title, width = inner)?;
  writeln!(out, "|* {:<width$} *|", "", width = inner)?;
  writeln!(out, "|* {:<width$} *|", "Automatically generated file, do not edit!", width = inner)?;
  writeln!(out, "|* {:<width$} *|", "", width = inner)?;
  writeln!(out, "\\*==={}===*/", "-".repeat(HEADER_WIDTH - 10))?;
  writeln!(out)
}

/// Writes `\t{ 0x.., ... }` for one row, without the trailing comma or comment.
fn emit_row<W: Write>(row: &BeadRow, compact: bool, out: &mut W) -> io::Result<()> {
  if compact && row.is_zero() {
    return write!(out, "\t{{ 0x0 }}");
  }

  write!(out, "\t{{")?;
  for (p, value) in row.bytes().iter().enumerate() {
    if p != 0 {
      write!(out, ",")?;
    }
    write!(out, " 0x{:x}", value)?;
  }
  write!(out, " }}")
}

pub fn emit_bead_table<W: Write>(table: &BeadTable, options: &EmitOptions, out: &mut W) -> io::Result<()> {
  // Emit function declaration
  writeln!(
    out,
    "const uint{}_t * {}{}::{}(const MCInst &MI) const {{",
    BEAD_SIZE, table.target_name(), options.emitter_class, options.function_name
  )?;

  // Emit instruction base values
  writeln!(
    out,
    "  static const uint{}_t {}[][{}] = {{",
    BEAD_SIZE, options.table_name, BEADS_NUMBER
  )?;

  for row in table.rows() {
    emit_row(&row.beads, options.compact_zero_rows, out)?;
    match row.kind {
      RowKind::Real   => writeln!(out, ",\t// {}", row.name)?,
      RowKind::Pseudo => writeln!(out, ",\t// (Pseudo) {}", row.name)?
    }
  }

  // Sentinel
  emit_row(&BeadRow::ZERO, options.compact_zero_rows, out)?;
  writeln!(out)?;
  writeln!(out, "  }};")?;

  writeln!(out, "  return {}[MI.getOpcode()];", options.table_name)?;
  writeln!(out, "}}")?;
  writeln!(out)
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::beads::BEADS_LENGTH;
  use crate::bits::Bits;
  use crate::catalog::{Endianness, Instruction, Target, DEFAULT_RESERVED_NAMESPACE};

  fn render(instructions: Vec<Instruction>, options: &EmitOptions) -> String {
    let target = Target::new("X86", Endianness::Little, DEFAULT_RESERVED_NAMESPACE, instructions)
      .unwrap();
    let table = BeadTable::build(&target).unwrap();
    let mut out = Vec::new();
    emit_bead_table(&table, options, &mut out).unwrap();
    String::from_utf8(out).unwrap()
  }

  fn zeros(n: usize) -> String {
    vec![" 0x0"; n].join(",")
  }

  #[test]
  fn real_and_pseudo_rows(){
    let text = render(
      vec![
        Instruction::new("MOV", "X86").with_beads(Bits::from_u128(0x55, BEADS_LENGTH)),
        Instruction::new("PSEUDO_NOP", "X86").pseudo(),
      ],
      &EmitOptions::default()
    );

    let expected = format!(
      "const uint8_t * X86MCCodeEmitter::getGenInstrBeads(const MCInst &MI) const {{\n\
       \x20 static const uint8_t InstBits[][24] = {{\n\
       \t{{ 0x55,{} }},\t// MOV\n\
       \t{{{} }},\t// (Pseudo) PSEUDO_NOP\n\
       \t{{{} }}\n\
       \x20 }};\n\
       \x20 return InstBits[MI.getOpcode()];\n\
       }}\n\n",
      zeros(23), zeros(24), zeros(24)
    );
    assert_eq!(text, expected);
  }

  #[test]
  fn compact_zero_rows(){
    let options = EmitOptions{ compact_zero_rows: true, ..EmitOptions::default() };
    let text = render(
      vec![
        Instruction::new("PSEUDO_NOP", "X86").pseudo(),
        Instruction::new("ZERO", "X86").with_beads(Bits::zeros(BEADS_LENGTH)),
      ],
      &options
    );
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[2], "\t{ 0x0 },\t// (Pseudo) PSEUDO_NOP");
    assert_eq!(lines[3], "\t{ 0x0 },\t// ZERO");
    assert_eq!(lines[4], "\t{ 0x0 }");
    assert_eq!(lines[5], "  };");
  }

  #[test]
  fn row_count_includes_one_sentinel(){
    let text = render(
      vec![
        Instruction::new("A", "X86").with_beads(Bits::zeros(BEADS_LENGTH)),
        Instruction::new("B", "X86").with_beads(Bits::zeros(BEADS_LENGTH)),
        Instruction::new("C", "X86").pseudo(),
      ],
      &EmitOptions::default()
    );
    let rows: Vec<&str> = text.lines().filter(|l| l.starts_with("\t{")).collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[..3].iter().all(|r| r.contains("},\t// ")));
    assert_eq!(*rows.last().unwrap(), format!("\t{{{} }}", zeros(24)));
    for row in rows {
      assert_eq!(row.matches("0x").count(), BEADS_NUMBER);
    }
  }

  #[test]
  fn custom_names(){
    let options = EmitOptions{
      emitter_class : "Emitter".to_string(),
      function_name : "beadsOf".to_string(),
      table_name    : "Beads".to_string(),
      ..EmitOptions::default()
    };
    let text = render(vec![], &options);
    assert!(text.starts_with("const uint8_t * X86Emitter::beadsOf(const MCInst &MI) const {\n"));
    assert!(text.contains("  static const uint8_t Beads[][24] = {\n"));
    assert!(text.contains("  return Beads[MI.getOpcode()];\n"));
  }

  #[test]
  fn header_lines_are_full_width(){
    let mut out = Vec::new();
    emit_source_file_header(SOURCE_FILE_TITLE, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 8);
    assert!(lines[..7].iter().all(|l| l.len() == HEADER_WIDTH));
    assert!(lines[2].starts_with("|* Machine Code Beads "));
    assert!(lines[7].is_empty());
  }

}
