//! Member declaration strings.
//!
//! Members are declared with a compact signature syntax:
//!
//! ```text
//! field:        [modifiers] Type name
//! method:       [modifiers] ReturnType name(Type [name], ...) [throws Type, ...]
//! constructor:  [modifiers] ClassName(Type [name], ...) [throws Type, ...]
//! ```
//!
//! Modifiers are `public`, `protected`, `private`, `static`, `final` and
//! `const` (a folded literal; implies `static final`).

use skeleton_key_core::{DataType, MemberFlags, RegistrationError};

/// A parsed field declaration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldDecl {
    pub flags: MemberFlags,
    pub data_type: DataType,
    pub name: String,
}

/// A parsed method or constructor declaration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CallableDecl {
    pub flags: MemberFlags,
    /// `None` for constructors.
    pub return_type: Option<DataType>,
    pub name: String,
    pub params: Vec<DataType>,
    pub throws: Vec<DataType>,
}

fn invalid(decl: &str, reason: impl Into<String>) -> RegistrationError {
    RegistrationError::InvalidDeclaration {
        decl: decl.to_string(),
        reason: reason.into(),
    }
}

fn tokenize(decl: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in decl.char_indices() {
        let is_punct = matches!(c, '(' | ')' | ',');
        if c.is_whitespace() || is_punct {
            if let Some(s) = start.take() {
                tokens.push(&decl[s..i]);
            }
            if is_punct {
                tokens.push(&decl[i..i + 1]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(&decl[s..]);
    }
    tokens
}

fn modifier(token: &str) -> Option<MemberFlags> {
    match token {
        "public" | "protected" => Some(MemberFlags::empty()),
        "private" => Some(MemberFlags::PRIVATE),
        "static" => Some(MemberFlags::STATIC),
        "final" => Some(MemberFlags::FINAL),
        "const" => Some(MemberFlags::STATIC | MemberFlags::FINAL | MemberFlags::CONSTANT),
        _ => None,
    }
}

/// Split leading modifiers off the token stream.
fn modifiers<'a>(tokens: &'a [&'a str]) -> (MemberFlags, &'a [&'a str]) {
    let mut flags = MemberFlags::empty();
    let mut rest = tokens;
    while let Some((first, tail)) = rest.split_first()
        && let Some(f) = modifier(first)
    {
        flags |= f;
        rest = tail;
    }
    (flags, rest)
}

fn is_identifier(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == ':')
}

/// Parse a comma separated type list, each entry optionally followed by a name.
fn type_list(decl: &str, tokens: &[&str]) -> Result<Vec<DataType>, RegistrationError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    tokens
        .split(|t| *t == ",")
        .map(|entry| match entry {
            [ty] | [ty, _] if is_identifier(ty) => Ok(DataType::parse(ty)),
            _ => Err(invalid(decl, format!("malformed type list entry {entry:?}"))),
        })
        .collect()
}

pub(crate) fn parse_field(decl: &str) -> Result<FieldDecl, RegistrationError> {
    let tokens = tokenize(decl);
    let (flags, rest) = modifiers(&tokens);
    match rest {
        [ty, name] if is_identifier(ty) && is_identifier(name) => {
            let data_type = DataType::parse(ty);
            if data_type.is_void() {
                return Err(invalid(decl, "field cannot be void"));
            }
            Ok(FieldDecl {
                flags,
                data_type,
                name: name.to_string(),
            })
        }
        _ => Err(invalid(decl, "expected `[modifiers] Type name`")),
    }
}

pub(crate) fn parse_callable(decl: &str) -> Result<CallableDecl, RegistrationError> {
    let tokens = tokenize(decl);
    let (flags, rest) = modifiers(&tokens);

    let open = rest
        .iter()
        .position(|t| *t == "(")
        .ok_or_else(|| invalid(decl, "missing parameter list"))?;
    let close = rest
        .iter()
        .position(|t| *t == ")")
        .filter(|close| *close > open)
        .ok_or_else(|| invalid(decl, "unclosed parameter list"))?;

    let (return_type, name) = match &rest[..open] {
        [name] if is_identifier(name) => (None, name.to_string()),
        [ty, name] if is_identifier(ty) && is_identifier(name) => {
            (Some(DataType::parse(ty)), name.to_string())
        }
        _ => return Err(invalid(decl, "expected `[ReturnType] name(...)`")),
    };

    let params = type_list(decl, &rest[open + 1..close])?;

    let throws = match &rest[close + 1..] {
        [] => Vec::new(),
        ["throws", list @ ..] if !list.is_empty() => type_list(decl, list)?,
        _ => return Err(invalid(decl, "unexpected tokens after parameter list")),
    };

    Ok(CallableDecl {
        flags,
        return_type,
        name,
        params,
        throws,
    })
}
