use string_cache::DefaultAtom;
use strum_macros::Display as StrumDisplay;
use tracing::{debug, info, warn};

use crate::catalog::Target;
use crate::error::BeadsError;

use super::{pack, validate, BeadRow, Disposition};

#[derive(StrumDisplay, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum RowKind {
  Real,
  Pseudo
}

/// One row of the table: the packed beads of the instruction with the same opcode.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableRow {
  pub name  : DefaultAtom,
  pub kind  : RowKind,
  pub beads : BeadRow
}

/**
  The packed beads of every instruction of a target, in opcode order. A `BeadTable` only
  exists if every instruction validated; `build` stops at the first error.
*/
#[derive(Clone, Debug)]
pub struct BeadTable {
  target : DefaultAtom,
  rows   : Vec<TableRow>
}

impl BeadTable {

  pub fn build(target: &Target) -> Result<BeadTable, BeadsError> {
    info!(target_name = %target.name(), count = target.len(), "packing beads");

    let mut rows = Vec::with_capacity(target.len());

    for (opcode, instruction) in target.instructions_by_enum_value().iter().enumerate() {
      let disposition = validate(instruction, target.reserved_namespace()).map_err(|e| {
        warn!(opcode, record = %e.record_name(), loc = %e.location(), "invalid beads, nothing emitted");
        e
      })?;

      let row = match disposition {

        Disposition::NoEncoding => {
          if instruction.beads.as_ref().map_or(false, |b| b.count_ones() > 0) {
            warn!(record = %instruction.name, "ignoring beads of instruction without encoding");
          }
          TableRow{
            name  : instruction.name.clone(),
            kind  : RowKind::Pseudo,
            beads : BeadRow::ZERO
          }
        }

        Disposition::Pack(valid) => {
          TableRow{
            name  : instruction.name.clone(),
            kind  : RowKind::Real,
            beads : pack(valid)
          }
        }

      };

      debug!(opcode, record = %row.name, kind = %row.kind, "packed row");
      rows.push(row);
    }

    Ok(BeadTable{
      target: target.name().clone(),
      rows
    })
  }

  pub fn target_name(&self) -> &DefaultAtom {
    &self.target
  }

  pub fn rows(&self) -> &[TableRow] {
    &self.rows
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  pub fn row(&self, opcode: usize) -> Option<&TableRow> {
    self.rows.get(opcode)
  }

  /// The beads of the instruction with the given opcode. Unlike the emitted accessor this
  /// checks bounds.
  pub fn get(&self, opcode: usize) -> Option<&BeadRow> {
    self.row(opcode).map(|r| &r.beads)
  }

  /// The opcode and beads of the instruction called `name`.
  pub fn get_by_name(&self, name: &str) -> Option<(usize, &BeadRow)> {
    self.rows
      .iter()
      .position(|r| &*r.name == name)
      .map(|opcode| (opcode, &self.rows[opcode].beads))
  }

}
