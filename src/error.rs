//! Error types for catalog loading, bead validation, and configuration.

use std::path::PathBuf;

use string_cache::DefaultAtom;
use thiserror::Error;

use crate::location::SourceLocation;

/// Errors found while reading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("{loc}: syntax error: {message}")]
  Syntax {
    loc     : SourceLocation,
    message : String
  },

  #[error("{loc}: catalog has no `target' block")]
  MissingTarget {
    loc: SourceLocation
  },

  #[error("{loc}: catalog has more than one `target' block")]
  DuplicateTarget {
    loc: SourceLocation
  },

  #[error("{loc}: Record `{name}' is defined more than once")]
  DuplicateRecord {
    name : DefaultAtom,
    loc  : SourceLocation
  },

  #[error("{loc}: Record `{name}', unknown field '{field}'")]
  UnknownField {
    name  : DefaultAtom,
    field : String,
    loc   : SourceLocation
  },

  #[error("{loc}: Record `{name}', field '{field}' is assigned before it is declared")]
  UndeclaredField {
    name  : DefaultAtom,
    field : String,
    loc   : SourceLocation
  },

  #[error("{loc}: Record `{name}', field '{field}': {message}")]
  InvalidValue {
    name    : DefaultAtom,
    field   : String,
    message : String,
    loc     : SourceLocation
  },

  #[error("{loc}: unknown endianness `{value}' (expected `little' or `big')")]
  UnknownEndianness {
    value : String,
    loc   : SourceLocation
  },
}

/// Fatal problems with an instruction's `Beads` field. Any one of them aborts generation.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum BeadsError {
  #[error("{loc}: Record `{name}', bit field 'Beads' is not complete (bit 'Beads[{bit}]' is not defined)")]
  IncompleteBeads {
    name : DefaultAtom,
    loc  : SourceLocation,
    bit  : usize
  },

  #[error("{loc}: Record `{name}', bit field 'Beads' is too long (width {width}, maximum: {max})")]
  BeadsTooLong {
    name  : DefaultAtom,
    loc   : SourceLocation,
    width : usize,
    max   : usize
  },

  #[error("{loc}: Record `{name}', bit field 'Beads' is too short (width {width}, required: {required})")]
  BeadsTooShort {
    name     : DefaultAtom,
    loc      : SourceLocation,
    width    : usize,
    required : usize
  },

  #[error("{loc}: Record `{name}' has no bit field 'Beads'")]
  MissingBeads {
    name : DefaultAtom,
    loc  : SourceLocation
  },
}

impl BeadsError {
  /// The instruction that failed validation.
  pub fn record_name(&self) -> &DefaultAtom {
    match self {
      BeadsError::IncompleteBeads { name, .. }
      | BeadsError::BeadsTooLong { name, .. }
      | BeadsError::BeadsTooShort { name, .. }
      | BeadsError::MissingBeads { name, .. } => name
    }
  }

  pub fn location(&self) -> &SourceLocation {
    match self {
      BeadsError::IncompleteBeads { loc, .. }
      | BeadsError::BeadsTooLong { loc, .. }
      | BeadsError::BeadsTooShort { loc, .. }
      | BeadsError::MissingBeads { loc, .. } => loc
    }
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path   : PathBuf,
    source : std::io::Error
  },

  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    path   : PathBuf,
    source : toml::de::Error
  },
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error(transparent)]
  Beads(#[from] BeadsError),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
