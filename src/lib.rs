/*!
  Code beads generator.

  Reads a catalog of instruction records, checks that every instruction with an encoding
  defines its 192-bit `Beads` field completely, packs each field into 24 bytes, and emits
  the bytes as a C++ table indexed by opcode together with its accessor.

  Generation is all or nothing: the first invalid instruction aborts the run and nothing is
  written.
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod beads;
pub mod bits;
pub mod catalog;
pub mod config;
pub mod display;
pub mod error;
pub mod location;

use std::io::Write;

use tracing::info;

pub use beads::{BeadRow, BeadTable, EmitOptions};
pub use catalog::Target;
pub use config::{CatalogConfig, Config};
pub use error::{BeadsError, CatalogError, ConfigError, Error, Result};

use beads::{emit_bead_table, emit_source_file_header, SOURCE_FILE_TITLE};

/// Reads a catalog and normalizes its endianness, ready for `generate`.
pub fn load_target(file: &str, text: &str, config: &CatalogConfig) -> Result<Target> {
  let mut target = catalog::load_catalog(file, text, &config.reserved_namespace)?;
  target.normalize_endianness();
  Ok(target)
}

/**
  Validates and packs every instruction of `target`, then writes the generated source to
  `out`. Nothing reaches `out` unless the whole table was built.
*/
pub fn generate<W: Write>(target: &Target, options: &EmitOptions, out: &mut W) -> Result<()> {
  let table = BeadTable::build(target)?;

  let mut buffer = Vec::new();
  if options.header {
    emit_source_file_header(SOURCE_FILE_TITLE, &mut buffer)?;
  }
  emit_bead_table(&table, options, &mut buffer)?;

  out.write_all(&buffer)?;
  info!(target_name = %target.name(), rows = table.len() + 1, bytes = buffer.len(), "emitted bead table");
  Ok(())
}

/// `load_target` followed by `generate`, returning the generated source.
pub fn generate_from_source(file: &str, text: &str, config: &Config) -> Result<Vec<u8>> {
  let target = load_target(file, text, &config.catalog)?;
  let mut out = Vec::new();
  generate(&target, &config.emit, &mut out)?;
  Ok(out)
}


#[cfg(test)]
mod tests {
  use super::*;

  fn config() -> Config {
    let mut config = Config::default();
    config.emit.header = false;
    config
  }

  fn run(text: &str) -> Result<String> {
    generate_from_source("test.td", text, &config())
      .map(|bytes| String::from_utf8(bytes).unwrap())
  }

  fn row_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|l| l.starts_with("\t{")).collect()
  }

  #[test]
  fn little_endian_mov(){
    let text = run("
      target X86 { endianness = little; }
      def MOV {
        bits<192> Beads = 0;
        Beads{7-0} = { 0, 1, 0, 1, 0, 1, 0, 1 };
      }
    ").unwrap();

    let rows = row_lines(&text);
    assert_eq!(rows.len(), 2);
    let expected = format!("\t{{ 0x55,{} }},\t// MOV", vec![" 0x0"; 23].join(","));
    assert_eq!(rows[0], expected);
  }

  #[test]
  fn pseudo_nop(){
    let text = run("
      target X86 {}
      def PSEUDO_NOP {
        isPseudo = 1;
        bits<192> Beads = 0xFFFF;
      }
    ").unwrap();

    let rows = row_lines(&text);
    assert_eq!(rows[0], format!("\t{{{} }},\t// (Pseudo) PSEUDO_NOP", vec![" 0x0"; 24].join(",")));
  }

  #[test]
  fn rows_in_opcode_order_with_sentinel(){
    let text = run("
      target X86 {}
      def SUB { bits<192> Beads = 2; }
      def PHI { namespace = \"TargetOpcode\"; }
      def ADD { bits<192> Beads = 1; }
    ").unwrap();

    let rows = row_lines(&text);
    assert_eq!(rows.len(), 4);
    assert!(rows[0].ends_with("// (Pseudo) PHI"));
    assert!(rows[1].starts_with("\t{ 0x1,") && rows[1].ends_with("// ADD"));
    assert!(rows[2].starts_with("\t{ 0x2,") && rows[2].ends_with("// SUB"));
    assert!(!rows[3].contains("//"));
    assert!(text.contains("return InstBits[MI.getOpcode()];"));
  }

  #[test]
  fn incomplete_beads_produce_no_output(){
    let target = load_target(
      "test.td",
      "target X86 {}\ndef ADD { bits<192> Beads = 0; }\ndef BAD {\n  bits<192> Beads;\n}",
      &CatalogConfig::default()
    ).unwrap();

    let mut out = Vec::new();
    match generate(&target, &EmitOptions::default(), &mut out) {
      Err(Error::Beads(BeadsError::IncompleteBeads{ name, loc, .. })) => {
        assert_eq!(&*name, "BAD");
        assert_eq!(loc.line, 3);
      }
      other => panic!("unexpected result: {:?}", other)
    }
    assert!(out.is_empty());
  }

  #[test]
  fn too_long_beads(){
    match run("target X86 {}\ndef WIDE { bits<200> Beads = 0; }") {
      Err(Error::Beads(BeadsError::BeadsTooLong{ width, max, .. })) => {
        assert_eq!(width, 200);
        assert_eq!(max, 192);
      }
      other => panic!("unexpected result: {:?}", other)
    }
  }

  #[test]
  fn header_is_emitted_by_default(){
    let bytes = generate_from_source("test.td", "target X86 {}", &Config::default()).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("/*===- codebeads generated file"));
    assert!(text.contains("Machine Code Beads"));
    assert!(text.contains("X86MCCodeEmitter::getGenInstrBeads"));
  }

  #[test]
  fn demo_catalog(){
    let demo_config = Config::from_toml(
      std::path::Path::new("demos/codebeads.toml"),
      include_str!("../demos/codebeads.toml")
    ).unwrap();
    let target = load_target("toy.td", include_str!("../demos/toy.td"), &demo_config.catalog).unwrap();

    assert_eq!(target.opcode_of("PHI"), Some(0));
    assert_eq!(target.opcode_of("ADD"), Some(2));
    // Little-endian: the encoding is bit-reversed, the beads are not.
    let mov = target.instruction(target.opcode_of("MOV").unwrap()).unwrap();
    assert_eq!(mov.inst, Some(bits::Bits::from_u128(0x2C48, 16)));

    let table = BeadTable::build(&target).unwrap();
    let add = table.get(2).unwrap();
    assert_eq!(add.bytes()[1], 0xA5);
    assert_eq!(add.bytes()[23], 0x80);
    assert_eq!(table.get(3).unwrap().bytes()[0], 0x55);

    let mut out = Vec::new();
    generate(&target, &demo_config.emit, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\t// (Pseudo) PSEUDO_NOP\n"));
    assert_eq!(row_lines(&text).len(), target.len() + 1);
  }

  #[test]
  fn catalog_errors_propagate(){
    assert!(matches!(run("def A {}"), Err(Error::Catalog(CatalogError::MissingTarget{ .. }))));
  }

}
