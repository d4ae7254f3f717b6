//! Human readable tables of a catalog and of single bead rows.

use prettytable::{format as TableFormat, Table};

use crate::beads::{BeadRow, BEADS_NUMBER};
use crate::catalog::Target;

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

/// One line per instruction, in opcode order.
pub fn catalog_table(target: &Target) -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"Opcode", ubl->"Name", ubl->"Namespace", ubc->"Pseudo", ubr->"Beads", ubc->"Complete"]);

  for (opcode, instruction) in target.instructions_by_enum_value().iter().enumerate() {
    let pseudo = match instruction.is_pseudo {
      true  => "yes",
      false => ""
    };
    let (width, complete) = match &instruction.beads {
      Some(beads) => (beads.num_bits().to_string(), if beads.is_complete() { "yes" } else { "no" }),
      None        => ("-".to_string(), "-")
    };

    table.add_row(
      row![r->opcode, instruction.name, instruction.namespace, c->pseudo, r->width, c->complete]
    );
  }

  table
}

/// The bytes of one row, with each byte's bits written most significant first.
pub fn row_table(name: &str, opcode: usize, row: &BeadRow) -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"Byte", ubr->"Hex", ubl->format!("{} (opcode {})", name, opcode)]);

  for (p, value) in row.bytes().iter().enumerate() {
    table.add_row(row![r->p, r->format!("0x{:02x}", value), format!("{:08b}", value)]);
  }

  debug_assert_eq!(table.len(), BEADS_NUMBER);
  table
}
