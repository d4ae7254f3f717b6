/*!
  Lowers parsed catalog items into a `Target`. This is where field names, widths, and
  values are checked.
*/

use std::str::FromStr;

use string_cache::DefaultAtom;
use tracing::{debug, info};

use super::parser::{parse_catalog, Item, Rhs, Statement, Value};
use super::record::{Endianness, Instruction, Target};
use crate::bits::{Bit, Bits};
use crate::error::CatalogError;
use crate::location::SourceLocation;

/// Widest `bits<N>` field a record may declare.
pub const MAX_FIELD_WIDTH: usize = 4096;

/// Fits a parsed literal to a field of `width` bits.
fn fit_value(value: Value, width: usize) -> Result<Bits, String> {
  match value {

    Value::Integer(bits) => {
      if bits.iter().skip(width).any(|b| *b) {
        return Err(format!("value does not fit in {} bits", width));
      }
      Ok(Bits::from_lsb_first(
        (0..width).map(|i| Bit::from(bits.get(i).copied().unwrap_or(false)))
      ))
    }

    Value::List(bits) => {
      match bits.len() == width {
        true  => Ok(Bits::from_msb_first(bits)),
        false => Err(format!("expected {} bits but the list has {}", width, bits.len()))
      }
    }

  }
}

struct Lowering<'a> {
  file : &'a str,
  text : &'a str
}

impl<'a> Lowering<'a> {

  fn loc(&self, at: &str) -> SourceLocation {
    SourceLocation::from_remainder(self.file, self.text, at)
  }

  fn lower_target(&self, name: &str, body: Vec<Statement<'_>>) -> Result<Endianness, CatalogError> {
    let mut endianness = Endianness::default();

    for statement in body {
      match statement {

        Statement::Assign{ at, field: "endianness", rhs } => {
          let value = match rhs {
            Rhs::Ident(s) | Rhs::Str(s) => s.to_string(),
            Rhs::Value(v)               => format!("{:?}", v)
          };
          endianness = Endianness::from_str(&value)
            .map_err(|_| CatalogError::UnknownEndianness{ value, loc: self.loc(at) })?;
        }

        Statement::Assign{ at, field, .. }
        | Statement::Declare{ at, field, .. }
        | Statement::Slice{ at, field, .. } => {
          return Err(CatalogError::UnknownField{
            name  : DefaultAtom::from(name),
            field : field.to_string(),
            loc   : self.loc(at)
          });
        }

      }
    }

    Ok(endianness)
  }

  /// Returns the record and whether it named its own namespace.
  fn lower_def(&self, at: &str, name: &str, body: Vec<Statement<'_>>)
    -> Result<(Instruction, bool), CatalogError>
  {
    let record = DefaultAtom::from(name);
    let mut instruction = Instruction::new(name, "").at(self.loc(at));
    let mut has_namespace = false;

    let invalid = |field: &str, message: String, at: &str| {
      CatalogError::InvalidValue{
        name    : record.clone(),
        field   : field.to_string(),
        message,
        loc     : self.loc(at)
      }
    };
    let unknown = |field: &str, at: &str| {
      CatalogError::UnknownField{
        name  : record.clone(),
        field : field.to_string(),
        loc   : self.loc(at)
      }
    };
    let undeclared = |field: &str, at: &str| {
      CatalogError::UndeclaredField{
        name  : record.clone(),
        field : field.to_string(),
        loc   : self.loc(at)
      }
    };

    for statement in body {
      match statement {

        Statement::Declare{ at, field, width, value } => {
          let slot = bits_field(&mut instruction, field).ok_or_else(|| unknown(field, at))?;
          if slot.is_some() {
            return Err(invalid(field, "declared more than once".to_string(), at));
          }
          if width > MAX_FIELD_WIDTH {
            return Err(invalid(
              field,
              format!("width {} exceeds maximum of {} bits", width, MAX_FIELD_WIDTH),
              at
            ));
          }
          let bits = match value {
            Some(v) => fit_value(v, width).map_err(|m| invalid(field, m, at))?,
            None    => Bits::undefined(width)
          };
          *slot = Some(bits);
        }

        Statement::Slice{ at, field, high, low, value } => {
          let slot = bits_field(&mut instruction, field).ok_or_else(|| unknown(field, at))?;
          let bits = slot.as_mut().ok_or_else(|| undeclared(field, at))?;
          if high >= bits.num_bits() {
            return Err(invalid(
              field,
              format!("bit range {{{}-{}}} is out of range for bits<{}>", high, low, bits.num_bits()),
              at
            ));
          }
          let slice = fit_value(value, high - low + 1).map_err(|m| invalid(field, m, at))?;
          bits.assign_slice(low, &slice);
        }

        Statement::Assign{ at, field: "namespace", rhs } => {
          match rhs {
            Rhs::Str(s) | Rhs::Ident(s) => {
              instruction.namespace = DefaultAtom::from(s);
              has_namespace = true;
            }
            Rhs::Value(_) => {
              return Err(invalid("namespace", "expected a string".to_string(), at));
            }
          }
        }

        Statement::Assign{ at, field: "isPseudo", rhs } => {
          instruction.is_pseudo = match rhs {
            Rhs::Ident("true")  => true,
            Rhs::Ident("false") => false,
            Rhs::Value(v) => {
              let bit = fit_value(v, 1).map_err(|m| invalid("isPseudo", m, at))?;
              bit.bit(0) == Some(Bit::ONE)
            }
            _ => return Err(invalid("isPseudo", "expected 0 or 1".to_string(), at))
          };
        }

        Statement::Assign{ at, field, rhs } => {
          let slot = bits_field(&mut instruction, field).ok_or_else(|| unknown(field, at))?;
          let bits = slot.as_mut().ok_or_else(|| undeclared(field, at))?;
          match rhs {
            Rhs::Value(v) => {
              *bits = fit_value(v, bits.num_bits()).map_err(|m| invalid(field, m, at))?;
            }
            _ => return Err(invalid(field, "expected a bit value".to_string(), at))
          }
        }

      }
    }

    Ok((instruction, has_namespace))
  }

}

/// The bit-vector fields a record may declare.
fn bits_field<'i>(instruction: &'i mut Instruction, field: &str) -> Option<&'i mut Option<Bits>> {
  match field {
    "Beads" => Some(&mut instruction.beads),
    "Inst"  => Some(&mut instruction.inst),
    _       => None
  }
}

/**
  Reads a catalog. Instructions without a `namespace` field take the target's name as their
  namespace. The returned target has not been normalized for endianness.
*/
pub fn load_catalog(file: &str, text: &str, reserved_namespace: &str) -> Result<Target, CatalogError> {
  let lowering = Lowering{ file, text };
  let items = parse_catalog(file, text)?;

  let mut header: Option<(&str, Endianness)> = None;
  let mut records = Vec::new();

  for item in items {
    match item {

      Item::Target{ at, name, body } => {
        if header.is_some() {
          return Err(CatalogError::DuplicateTarget{ loc: lowering.loc(at) });
        }
        header = Some((name, lowering.lower_target(name, body)?));
      }

      Item::Def{ at, name, body } => {
        let record = lowering.lower_def(at, name, body)?;
        debug!(record = name, pseudo = record.0.is_pseudo, "read record");
        records.push(record);
      }

    }
  }

  let (target_name, endianness) = header.ok_or_else(|| {
    CatalogError::MissingTarget{ loc: SourceLocation::new(file, 1, 1) }
  })?;

  let instructions: Vec<Instruction> =
    records
      .into_iter()
      .map(|(mut instruction, has_namespace)| {
        if !has_namespace {
          instruction.namespace = DefaultAtom::from(target_name);
        }
        instruction
      })
      .collect();

  info!(
    target_name,
    %endianness,
    count = instructions.len(),
    "loaded catalog {}", file
  );

  Target::new(target_name, endianness, reserved_namespace, instructions)
}
