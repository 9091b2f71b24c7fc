//! Recursive-descent parser for type tag text.
//!
//! Grammar (whitespace allowed between tokens):
//!
//! ```text
//! type    := "bool" | "u8" | "u16" | "u32" | "u64" | "u128" | "u256"
//!          | "address" | "signer" | "vector" "<" type ">" | struct
//! struct  := address "::" ident "::" ident [ "<" type { "," type } ">" ]
//! address := "0x" hex{1,64} | hex{64}
//! ```

use super::{is_valid_identifier, Identifier, StructTag, TypeTag, MAX_TYPE_TAG_DEPTH};
use crate::address::RoochAddress;
use crate::PrimitivesError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    ColonColon,
    Lt,
    Gt,
    Comma,
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>, PrimitivesError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            b'<' => {
                tokens.push(Token::Lt);
                i += 1;
            }
            b'>' => {
                tokens.push(Token::Gt);
                i += 1;
            }
            b',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            b':' => {
                if bytes.get(i + 1) != Some(&b':') {
                    return Err(parse_error(input, "expected '::'"));
                }
                tokens.push(Token::ColonColon);
                i += 2;
            }
            c if c.is_ascii_alphanumeric() || c == b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push(Token::Word(&input[start..i]));
            }
            _ => {
                return Err(parse_error(
                    input,
                    &format!("unexpected character '{}'", c as char),
                ))
            }
        }
    }
    Ok(tokens)
}

fn parse_error(input: &str, reason: &str) -> PrimitivesError {
    PrimitivesError::ParseError(format!("'{}': {}", input, reason))
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, PrimitivesError> {
        Ok(Parser {
            input,
            tokens: tokenize(input)?,
            pos: 0,
        })
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token<'static>) -> Result<(), PrimitivesError> {
        match self.next() {
            Some(ref t) if *t == expected => Ok(()),
            Some(t) => Err(self.error(&format!("expected {:?}, found {:?}", expected, t))),
            None => Err(self.error(&format!("expected {:?}, found end of input", expected))),
        }
    }

    fn word(&mut self) -> Result<&'a str, PrimitivesError> {
        match self.next() {
            Some(Token::Word(w)) => Ok(w),
            Some(t) => Err(self.error(&format!("expected a name, found {:?}", t))),
            None => Err(self.error("expected a name, found end of input")),
        }
    }

    fn identifier(&mut self) -> Result<Identifier, PrimitivesError> {
        let w = self.word()?;
        if !is_valid_identifier(w) {
            return Err(self.error(&format!("invalid identifier '{}'", w)));
        }
        Identifier::new(w)
    }

    fn error(&self, reason: &str) -> PrimitivesError {
        parse_error(self.input, reason)
    }

    fn finish(&self) -> Result<(), PrimitivesError> {
        match self.peek() {
            None => Ok(()),
            Some(t) => Err(self.error(&format!("unexpected trailing {:?}", t))),
        }
    }

    fn type_tag(&mut self, depth: usize) -> Result<TypeTag, PrimitivesError> {
        if depth > MAX_TYPE_TAG_DEPTH {
            return Err(self.error("type nesting too deep"));
        }
        let first = match self.peek() {
            Some(Token::Word(w)) => *w,
            Some(t) => return Err(self.error(&format!("expected a type, found {:?}", t))),
            None => return Err(self.error("expected a type, found end of input")),
        };
        let primitive = match first {
            "bool" => Some(TypeTag::Bool),
            "u8" => Some(TypeTag::U8),
            "u16" => Some(TypeTag::U16),
            "u32" => Some(TypeTag::U32),
            "u64" => Some(TypeTag::U64),
            "u128" => Some(TypeTag::U128),
            "u256" => Some(TypeTag::U256),
            "address" => Some(TypeTag::Address),
            "signer" => Some(TypeTag::Signer),
            _ => None,
        };
        if let Some(tag) = primitive {
            self.pos += 1;
            return Ok(tag);
        }
        if first == "vector" {
            self.pos += 1;
            self.expect(Token::Lt)?;
            let inner = self.type_tag(depth + 1)?;
            self.expect(Token::Gt)?;
            return Ok(TypeTag::Vector(Box::new(inner)));
        }
        Ok(TypeTag::Struct(Box::new(self.struct_tag(depth)?)))
    }

    fn struct_tag(&mut self, depth: usize) -> Result<StructTag, PrimitivesError> {
        let address_text = self.word()?;
        let address = parse_address(address_text).map_err(|_| {
            self.error(&format!("invalid struct address '{}'", address_text))
        })?;
        self.expect(Token::ColonColon)?;
        let module = self.identifier()?;
        self.expect(Token::ColonColon)?;
        let name = self.identifier()?;

        let mut type_params = Vec::new();
        if self.peek() == Some(&Token::Lt) {
            self.pos += 1;
            loop {
                type_params.push(self.type_tag(depth + 1)?);
                match self.next() {
                    Some(Token::Comma) => continue,
                    Some(Token::Gt) => break,
                    Some(t) => {
                        return Err(self.error(&format!("expected ',' or '>', found {:?}", t)))
                    }
                    None => return Err(self.error("unbalanced '<' in type arguments")),
                }
            }
        }
        Ok(StructTag {
            address,
            module,
            name,
            type_params,
        })
    }
}

/// Struct addresses are `0x`-prefixed hex, or exactly 64 un-prefixed hex digits.
fn parse_address(text: &str) -> Result<RoochAddress, PrimitivesError> {
    if text.starts_with("0x") || text.len() == RoochAddress::LENGTH * 2 {
        RoochAddress::from_hex(text)
    } else {
        Err(PrimitivesError::ParseError(format!(
            "'{}' is not an address",
            text
        )))
    }
}

/// Parse a type tag from text.
///
/// # Returns
/// The parsed tag, or `ParseError` for unknown syntax, unbalanced angle
/// brackets, empty or trailing-comma argument lists, and trailing input.
pub fn parse_type_tag(text: &str) -> Result<TypeTag, PrimitivesError> {
    let mut parser = Parser::new(text)?;
    let tag = parser.type_tag(0)?;
    parser.finish()?;
    Ok(tag)
}

/// Parse a struct tag from text.
pub fn parse_struct_tag(text: &str) -> Result<StructTag, PrimitivesError> {
    let mut parser = Parser::new(text)?;
    let tag = parser.struct_tag(0)?;
    parser.finish()?;
    Ok(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(short: u8) -> String {
        format!("0x{:064x}", short)
    }

    #[test]
    fn test_parse_primitives() {
        assert_eq!(parse_type_tag("bool").unwrap(), TypeTag::Bool);
        assert_eq!(parse_type_tag("u256").unwrap(), TypeTag::U256);
        assert_eq!(parse_type_tag(" signer ").unwrap(), TypeTag::Signer);
        assert_eq!(
            parse_type_tag("vector<vector<u8>>").unwrap(),
            TypeTag::Vector(Box::new(TypeTag::Vector(Box::new(TypeTag::U8))))
        );
    }

    #[test]
    fn test_parse_struct_short_address() {
        let tag = parse_struct_tag("0x3::gas_coin::RGas").unwrap();
        assert_eq!(tag.address, RoochAddress::THREE);
        assert_eq!(tag.module.as_str(), "gas_coin");
        assert_eq!(tag.name.as_str(), "RGas");
        assert!(tag.type_params.is_empty());
        assert_eq!(tag.to_string(), format!("{}::gas_coin::RGas", full(3)));
    }

    #[test]
    fn test_parse_nested_generics_with_whitespace() {
        let text = "0x2::object::Object< 0x3::coin_store::CoinStore<0x3::gas_coin::RGas> , u64 >";
        let tag = parse_type_tag(text).unwrap();
        assert_eq!(
            tag.to_string(),
            format!(
                "{}::object::Object<{}::coin_store::CoinStore<{}::gas_coin::RGas>,u64>",
                full(2),
                full(3),
                full(3)
            )
        );
    }

    #[test]
    fn test_parse_canonical_unprefixed_form() {
        let canonical = format!("{:064x}::gas_coin::RGas", 3);
        let tag = parse_struct_tag(&canonical).unwrap();
        assert_eq!(tag.to_canonical_string(), canonical);
    }

    #[test]
    fn test_print_parse_inverse() {
        let inputs = [
            "u8".to_string(),
            "vector<address>".to_string(),
            format!("{}::m::S", full(1)),
            format!("{}::m::S<bool,vector<u128>,{}::n::T<signer>>", full(1), full(0xab)),
        ];
        for s in inputs {
            assert_eq!(parse_type_tag(&s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_reject_malformed() {
        let bad = [
            "",
            "vector<u8",
            "vector<u8>>",
            "0x1::m::S<u8",
            "0x1::m::S<u8,>",
            "0x1::m::S<>",
            "0x1::m",
            "0x1:m::S",
            "0x1::1m::S",
            "abc::m::S",
            "u8 u8",
            "vector",
            "0x1::m::S<u8>>",
            "u9",
        ];
        for s in bad {
            assert!(
                matches!(parse_type_tag(s), Err(PrimitivesError::ParseError(_))),
                "should reject {:?}",
                s
            );
        }
    }
}
