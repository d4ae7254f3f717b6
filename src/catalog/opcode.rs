use bimap::BiMap;
use string_cache::DefaultAtom;

/**
  An opcode map is a mapping between instruction names and their opcode, that is, their
  position in the target's enumeration. It is really just a convenience wrapper around a
  BiMap.
*/
#[derive(Clone, Debug)]
pub struct OpcodeMap {
  table: BiMap<DefaultAtom, usize>
}

impl OpcodeMap {

  pub fn new() -> OpcodeMap {
    OpcodeMap{
      table: BiMap::new()
    }
  }

  pub fn name_of(&self, opcode: usize) -> Option<&DefaultAtom> {
    self.table.get_by_right(&opcode)
  }

  pub fn opcode_of(&self, name: &str) -> Option<usize> {
    self.table.get_by_left(&DefaultAtom::from(name)).copied()
  }

  /// Fails with the rejected pair if either the name or the opcode is already present.
  pub fn insert(&mut self, name: DefaultAtom, opcode: usize)
    -> Result<(), (DefaultAtom, usize)>
  {
    self.table.insert_no_overwrite(name, opcode)
  }

  pub fn len(&self) -> usize {
    self.table.len()
  }

  pub fn is_empty(&self) -> bool {
    self.table.is_empty()
  }
}
