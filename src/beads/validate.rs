use crate::bits::Bits;
use crate::catalog::Instruction;
use crate::error::BeadsError;

use super::BEADS_LENGTH;

/// A `Beads` field that is complete and exactly `BEADS_LENGTH` bits wide. Only `validate`
/// creates one.
#[derive(Clone, Copy, Debug)]
pub struct ValidBeads<'a> {
  bits: &'a Bits
}

impl<'a> ValidBeads<'a> {
  pub fn bits(&self) -> &'a Bits {
    self.bits
  }
}

/// What to do with an instruction.
#[derive(Clone, Copy, Debug)]
pub enum Disposition<'a> {
  /// No encoding; emit a row of zeros whatever the record's beads say.
  NoEncoding,
  Pack(ValidBeads<'a>)
}

/**
  Decides whether `instruction` needs packing and, if so, checks its beads. Checks run in
  this order: presence, completeness, maximum width, required width.
*/
pub fn validate<'a>(instruction: &'a Instruction, reserved_namespace: &str)
  -> Result<Disposition<'a>, BeadsError>
{
  if !instruction.has_encoding(reserved_namespace) {
    return Ok(Disposition::NoEncoding);
  }

  let bits = match &instruction.beads {
    Some(bits) => bits,
    None => {
      return Err(BeadsError::MissingBeads{
        name : instruction.name.clone(),
        loc  : instruction.loc.clone()
      });
    }
  };

  if let Some(bit) = bits.first_undefined() {
    return Err(BeadsError::IncompleteBeads{
      name : instruction.name.clone(),
      loc  : instruction.loc.clone(),
      bit
    });
  }

  if bits.num_bits() > BEADS_LENGTH {
    return Err(BeadsError::BeadsTooLong{
      name  : instruction.name.clone(),
      loc   : instruction.loc.clone(),
      width : bits.num_bits(),
      max   : BEADS_LENGTH
    });
  }

  // Positions past the declared width have no value to read.
  if bits.num_bits() < BEADS_LENGTH {
    return Err(BeadsError::BeadsTooShort{
      name     : instruction.name.clone(),
      loc      : instruction.loc.clone(),
      width    : bits.num_bits(),
      required : BEADS_LENGTH
    });
  }

  Ok(Disposition::Pack(ValidBeads{ bits }))
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bits::Bit;
  use crate::catalog::DEFAULT_RESERVED_NAMESPACE;

  fn check(instruction: &Instruction) -> Result<Disposition<'_>, BeadsError> {
    validate(instruction, DEFAULT_RESERVED_NAMESPACE)
  }

  #[test]
  fn complete_beads_pass(){
    let add = Instruction::new("ADD", "X86").with_beads(Bits::zeros(BEADS_LENGTH));
    match check(&add) {
      Ok(Disposition::Pack(valid)) => assert_eq!(valid.bits().num_bits(), BEADS_LENGTH),
      other => panic!("unexpected disposition: {:?}", other)
    }
  }

  #[test]
  fn pseudo_skips_validation(){
    let nop = Instruction::new("NOP", "X86").pseudo().with_beads(Bits::undefined(3));
    assert!(matches!(check(&nop), Ok(Disposition::NoEncoding)));

    let phi = Instruction::new("PHI", DEFAULT_RESERVED_NAMESPACE);
    assert!(matches!(check(&phi), Ok(Disposition::NoEncoding)));
  }

  #[test]
  fn incomplete_beads(){
    let mut beads = Bits::zeros(BEADS_LENGTH);
    beads.set(100, Bit::Undefined);
    let add = Instruction::new("ADD", "X86").with_beads(beads);
    assert_eq!(
      check(&add).unwrap_err(),
      BeadsError::IncompleteBeads{ name: "ADD".into(), loc: add.loc.clone(), bit: 100 }
    );
  }

  #[test]
  fn too_long(){
    let add = Instruction::new("ADD", "X86").with_beads(Bits::zeros(200));
    match check(&add) {
      Err(BeadsError::BeadsTooLong{ width, max, .. }) => {
        assert_eq!(width, 200);
        assert_eq!(max, 192);
      }
      other => panic!("unexpected result: {:?}", other)
    }
  }

  #[test]
  fn too_short(){
    let add = Instruction::new("ADD", "X86").with_beads(Bits::zeros(8));
    assert!(matches!(check(&add), Err(BeadsError::BeadsTooShort{ width: 8, required: 192, .. })));
  }

  #[test]
  fn missing(){
    let add = Instruction::new("ADD", "X86");
    let error = check(&add).unwrap_err();
    assert!(matches!(error, BeadsError::MissingBeads{ .. }));
    assert_eq!(&**error.record_name(), "ADD");
  }

  #[test]
  fn error_message_names_record_and_location(){
    use crate::location::SourceLocation;

    let add = Instruction::new("ADD", "X86")
      .with_beads(Bits::undefined(BEADS_LENGTH))
      .at(SourceLocation::new("x86.td", 12, 1));
    let message = check(&add).unwrap_err().to_string();
    assert_eq!(
      message,
      "x86.td:12:1: Record `ADD', bit field 'Beads' is not complete (bit 'Beads[0]' is not defined)"
    );
  }

}
