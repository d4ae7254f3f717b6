/*!
  The textual form of a catalog. This module only recognizes syntax; checking that fields
  exist, that values fit, and so on happens when the parsed items are lowered into
  `Instruction` records.

  Every item and statement keeps the slice of input it started at so that diagnostics can
  point back into the source.
*/

use nom::{
  branch::alt,
  bytes::complete::{is_a, is_not, tag},
  character::complete::{
    alpha1,
    alphanumeric1,
    char as one_char,
    digit1,
    hex_digit1,
    multispace1,
    not_line_ending,
    one_of
  },
  combinator::{cut, map, map_opt, map_res, opt, recognize},
  error::ErrorKind,
  multi::{many0, separated_list},
  sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
  IResult
};

use crate::bits::Bit;
use crate::error::CatalogError;
use crate::location::SourceLocation;

type PResult<'a, O> = IResult<&'a str, O>;

/// A literal on the right-hand side of an assignment, not yet fitted to a width.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
  /// `0x..`, `0b..`, or decimal. Bits least significant first.
  Integer(Vec<bool>),
  /// `{ 1, 0, ? }`. Bits most significant first, as written.
  List(Vec<Bit>)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Rhs<'a> {
  Str(&'a str),
  Ident(&'a str),
  Value(Value)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Statement<'a> {
  /// `bits<N> Field;` or `bits<N> Field = value;`
  Declare {
    at    : &'a str,
    field : &'a str,
    width : usize,
    value : Option<Value>
  },
  /// `Field{hi-lo} = value;` or `Field{i} = value;`
  Slice {
    at    : &'a str,
    field : &'a str,
    high  : usize,
    low   : usize,
    value : Value
  },
  /// `field = value;`
  Assign {
    at    : &'a str,
    field : &'a str,
    rhs   : Rhs<'a>
  }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Item<'a> {
  Target {
    at   : &'a str,
    name : &'a str,
    body : Vec<Statement<'a>>
  },
  Def {
    at   : &'a str,
    name : &'a str,
    body : Vec<Statement<'a>>
  }
}

// region Lexical

fn comment(input: &str) -> PResult<&str> {
  recognize(pair(tag("//"), not_line_ending))(input)
}

/// Skips whitespace and comments. Never fails.
fn ws(input: &str) -> PResult<()> {
  map(many0(alt((multispace1, comment))), |_| ())(input)
}

fn lexeme<'a, O, F>(parser: F) -> impl Fn(&'a str) -> PResult<'a, O>
  where F: Fn(&'a str) -> PResult<'a, O>
{
  preceded(ws, parser)
}

fn identifier(input: &str) -> PResult<&str> {
  recognize(
    pair(
      alt((alpha1, tag("_"))),
      many0(alt((alphanumeric1, tag("_"))))
    )
  )(input)
}

fn number(input: &str) -> PResult<usize> {
  map_res(digit1, |digits: &str| digits.parse::<usize>())(input)
}

fn string_literal(input: &str) -> PResult<&str> {
  delimited(
    one_char('"'),
    map(opt(is_not("\"\n")), |s: Option<&str>| s.unwrap_or("")),
    one_char('"')
  )(input)
}

// endregion

// region Values

fn hex_literal(input: &str) -> PResult<Vec<bool>> {
  map(
    preceded(tag("0x"), hex_digit1),
    |digits: &str| {
      digits
        .chars()
        .rev()
        .flat_map(|c| {
          let digit = c.to_digit(16).unwrap_or(0);
          (0..4).map(move |i| (digit >> i) & 1 == 1)
        })
        .collect()
    }
  )(input)
}

fn binary_literal(input: &str) -> PResult<Vec<bool>> {
  map(
    preceded(tag("0b"), is_a("01")),
    |digits: &str| digits.chars().rev().map(|c| c == '1').collect()
  )(input)
}

fn decimal_literal(input: &str) -> PResult<Vec<bool>> {
  map(
    map_res(digit1, |digits: &str| digits.parse::<u128>()),
    |value| (0..128).map(|i| (value >> i) & 1 == 1).collect()
  )(input)
}

fn bit_list(input: &str) -> PResult<Vec<Bit>> {
  delimited(
    one_char('{'),
    separated_list(
      lexeme(one_char(',')),
      lexeme(map_opt(one_of("01?"), Bit::from_char))
    ),
    lexeme(one_char('}'))
  )(input)
}

fn value(input: &str) -> PResult<Value> {
  // Hex and binary first, or the decimal parser would take their leading `0`.
  alt((
    map(hex_literal,     Value::Integer),
    map(binary_literal,  Value::Integer),
    map(decimal_literal, Value::Integer),
    map(bit_list,        Value::List)
  ))(input)
}

fn rhs(input: &str) -> PResult<Rhs<'_>> {
  alt((
    map(string_literal, Rhs::Str),
    map(value,          Rhs::Value),
    map(identifier,     Rhs::Ident)
  ))(input)
}

// endregion

// region Statements

fn declaration(input: &str) -> PResult<(usize, &str, Option<Value>)> {
  tuple((
    preceded(
      tag("bits"),
      delimited(lexeme(one_char('<')), lexeme(number), lexeme(one_char('>')))
    ),
    lexeme(identifier),
    opt(preceded(lexeme(one_char('=')), lexeme(value)))
  ))(input)
}

/// `{hi-lo}` or `{i}`, returned as `(high, low)`. A range written low to high is rejected.
fn bit_range(input: &str) -> PResult<(usize, usize)> {
  map_opt(
    delimited(
      one_char('{'),
      pair(lexeme(number), opt(preceded(lexeme(one_char('-')), lexeme(number)))),
      lexeme(one_char('}'))
    ),
    |(high, low): (usize, Option<usize>)| {
      let low = low.unwrap_or(high);
      match high >= low {
        true  => Some((high, low)),
        false => None
      }
    }
  )(input)
}

fn slice_assignment(input: &str) -> PResult<(&str, (usize, usize), Value)> {
  tuple((
    identifier,
    lexeme(bit_range),
    preceded(lexeme(one_char('=')), lexeme(value))
  ))(input)
}

fn assignment(input: &str) -> PResult<(&str, Rhs<'_>)> {
  separated_pair(identifier, lexeme(one_char('=')), lexeme(rhs))(input)
}

fn statement(input: &str) -> PResult<Statement<'_>> {
  let (input, _) = ws(input)?;
  let at = input;

  terminated(
    alt((
      map(declaration, move |(width, field, value)| {
        Statement::Declare{ at, field, width, value }
      }),
      map(slice_assignment, move |(field, (high, low), value)| {
        Statement::Slice{ at, field, high, low, value }
      }),
      map(assignment, move |(field, rhs)| {
        Statement::Assign{ at, field, rhs }
      })
    )),
    lexeme(one_char(';'))
  )(input)
}

fn block(input: &str) -> PResult<(&str, Vec<Statement<'_>>)> {
  pair(
    lexeme(identifier),
    delimited(lexeme(one_char('{')), many0(statement), lexeme(one_char('}')))
  )(input)
}

fn item(input: &str) -> PResult<Item<'_>> {
  let (input, _) = ws(input)?;
  let at = input;
  let (rest, keyword) = identifier(input)?;

  match keyword {
    "target" => map(cut(block), move |(name, body)| Item::Target{ at, name, body })(rest),
    "def"    => map(cut(block), move |(name, body)| Item::Def{ at, name, body })(rest),
    _        => Err(nom::Err::Failure((at, ErrorKind::Tag)))
  }
}

// endregion

fn syntax_error(file: &str, text: &str, error: nom::Err<(&str, ErrorKind)>) -> CatalogError {
  match error {
    nom::Err::Error((rest, kind)) | nom::Err::Failure((rest, kind)) => {
      let snippet: String = rest.lines().next().unwrap_or("").chars().take(24).collect();
      let message = match snippet.trim().is_empty() {
        true  => format!("unexpected end of input ({:?})", kind),
        false => format!("unexpected `{}` ({:?})", snippet.trim(), kind)
      };
      CatalogError::Syntax{
        loc: SourceLocation::from_remainder(file, text, rest),
        message
      }
    }
    nom::Err::Incomplete(_) => {
      CatalogError::Syntax{
        loc     : SourceLocation::from_offset(file, text, text.len()),
        message : "unexpected end of input".to_string()
      }
    }
  }
}

/// Parses a whole catalog into its `target` and `def` items, in source order.
pub fn parse_catalog<'a>(file: &str, text: &'a str) -> Result<Vec<Item<'a>>, CatalogError> {
  let mut items = Vec::new();
  let mut input = text;

  loop {
    let (rest, _) = ws(input).map_err(|e| syntax_error(file, text, e))?;
    if rest.is_empty() {
      break;
    }
    let (rest, parsed) = item(rest).map_err(|e| syntax_error(file, text, e))?;
    items.push(parsed);
    input = rest;
  }

  Ok(items)
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn skips_comments_and_whitespace(){
    assert_eq!(ws("  // note\n\t // more\nrest"), Ok(("rest", ())));
    assert_eq!(ws(""), Ok(("", ())));
  }

  #[test]
  fn identifiers(){
    assert_eq!(identifier("MOV32rr;"), Ok((";", "MOV32rr")));
    assert_eq!(identifier("_x1 "), Ok((" ", "_x1")));
    assert!(identifier("1abc").is_err());
  }

  #[test]
  fn integer_values(){
    assert_eq!(value("0x5"), Ok(("", Value::Integer(vec![true, false, true, false]))));
    assert_eq!(value("0b110"), Ok(("", Value::Integer(vec![false, true, true]))));
    match value("6") {
      Ok(("", Value::Integer(bits))) => {
        assert_eq!(bits.len(), 128);
        assert_eq!(&bits[..4], &[false, true, true, false]);
      }
      other => panic!("unexpected parse: {:?}", other)
    }
  }

  #[test]
  fn bit_list_value(){
    assert_eq!(
      value("{ 1, 0 ,? }"),
      Ok(("", Value::List(vec![Bit::ONE, Bit::ZERO, Bit::Undefined])))
    );
    assert_eq!(value("{}"), Ok(("", Value::List(vec![]))));
  }

  #[test]
  fn statements(){
    assert_eq!(
      statement("  bits<192> Beads;"),
      Ok(("", Statement::Declare{ at: "bits<192> Beads;", field: "Beads", width: 192, value: None }))
    );
    assert_eq!(
      statement("Beads{7-0} = 0b1;"),
      Ok(("", Statement::Slice{
        at: "Beads{7-0} = 0b1;", field: "Beads", high: 7, low: 0,
        value: Value::Integer(vec![true])
      }))
    );
    assert_eq!(
      statement("Beads{3} = 1;").map(|(_, s)| s),
      Ok(Statement::Slice{
        at: "Beads{3} = 1;", field: "Beads", high: 3, low: 3,
        value: Value::Integer((0..128).map(|i| i == 0).collect())
      })
    );
    assert_eq!(
      statement("namespace = \"X86\" ;"),
      Ok(("", Statement::Assign{ at: "namespace = \"X86\" ;", field: "namespace", rhs: Rhs::Str("X86") }))
    );
    assert_eq!(
      statement("endianness = little;"),
      Ok(("", Statement::Assign{ at: "endianness = little;", field: "endianness", rhs: Rhs::Ident("little") }))
    );
  }

  #[test]
  fn bit_ranges(){
    assert_eq!(bit_range("{7-0}"), Ok(("", (7, 0))));
    assert_eq!(bit_range("{ 5 }"), Ok(("", (5, 5))));
    assert!(bit_range("{0-7}").is_err());
  }

  #[test]
  fn low_to_high_range_is_a_syntax_error(){
    match parse_catalog("test.td", "target T {}\ndef A {\n  bits<8> Beads;\n  Beads{0-7} = 0x55;\n}") {
      Err(CatalogError::Syntax{ loc, .. }) => assert_eq!(loc.line, 4),
      other => panic!("unexpected result: {:?}", other)
    }
  }

  #[test]
  fn whole_catalog(){
    let text = "
      // A tiny target
      target Toy { endianness = big; }

      def NOP {
        namespace = \"Toy\";
        isPseudo = 1;
      }
      def ADD { bits<8> Beads = 0x1; }
    ";
    let items = parse_catalog("toy.td", text).unwrap();
    assert_eq!(items.len(), 3);
    match &items[0] {
      Item::Target{ name, body, .. } => {
        assert_eq!(*name, "Toy");
        assert_eq!(body.len(), 1);
      }
      other => panic!("expected target, found {:?}", other)
    }
    match &items[2] {
      Item::Def{ name, body, .. } => {
        assert_eq!(*name, "ADD");
        assert_eq!(body.len(), 1);
      }
      other => panic!("expected def, found {:?}", other)
    }
  }

  #[test]
  fn unknown_item_keyword(){
    match parse_catalog("bad.td", "target T {}\nclass X {}") {
      Err(CatalogError::Syntax{ loc, message }) => {
        assert_eq!((loc.line, loc.column), (2, 1));
        assert!(message.contains("class"));
      }
      other => panic!("expected syntax error, found {:?}", other)
    }
  }

  #[test]
  fn missing_semicolon_points_into_block(){
    match parse_catalog("bad.td", "def X {\n  isPseudo = 1\n}") {
      Err(CatalogError::Syntax{ loc, .. }) => assert_eq!(loc.line, 2),
      other => panic!("expected syntax error, found {:?}", other)
    }
  }

}
