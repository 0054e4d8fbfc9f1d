//! Scope matching over raw script text.
//!
//! There is no grammar here: scopes are found by counting one kind of
//! delimiter. Delimiters inside strings or comments are counted like any other.

use crate::error::{AuditError, ScanError};
use crate::patterns::{FUNCTION_HEADER, ROUTE_REGISTRATION};

/// Returns the offset just past the delimiter closing the one at `open`.
///
/// Only delimiters of the same kind as `text[open]` are counted.
///
/// # Errors
///
/// Returns [`AuditError::InvalidArgument`] if `text[open]` is not `{`, `(` or
/// `[`, and [`ScanError::UnterminatedScope`] if the text ends first.
pub fn scope_end(text: &str, open: usize) -> Result<usize, AuditError> {
    let bytes = text.as_bytes();
    let (opener, closer) = match bytes.get(open) {
        Some(b'{') => (b'{', b'}'),
        Some(b'(') => (b'(', b')'),
        Some(b'[') => (b'[', b']'),
        other => {
            return Err(AuditError::InvalidArgument(format!(
                "offset {open} is not an opening delimiter ({:?})",
                other.map(|b| char::from(*b))
            )))
        }
    };

    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if b == opener {
            depth += 1;
        } else if b == closer {
            depth -= 1;
            if depth == 0 {
                return Ok(i + 1);
            }
        }
    }

    Err(ScanError::UnterminatedScope {
        open: char::from(opener),
        offset: open,
    }
    .into())
}

/// A function declaration or function-valued assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionScope<'a> {
    /// Declared or assigned name.
    pub name: &'a str,
    /// Offset of the header.
    pub start: usize,
    /// Offset just past the closing `}`.
    pub end: usize,
    /// The brace-delimited body, braces included.
    pub body: &'a str,
}

impl FunctionScope<'_> {
    /// True if `offset` lies in the function's span.
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        (self.start..self.end).contains(&offset)
    }

    /// True if the name starts upper-case.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

/// A `server.<verb>('Name', ...)` route registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointScope<'a> {
    /// Registration verb (`get`, `post`, `replace`...).
    pub verb: &'a str,
    /// Route name.
    pub name: &'a str,
    /// Offset of `server.`.
    pub start: usize,
    /// Offset just past the closing `)`.
    pub end: usize,
    /// The argument list, parentheses included.
    pub body: &'a str,
}

/// Finds every function in `text`, nested ones included, in source order.
///
/// # Errors
///
/// Returns a scan error if a parameter list or body is never closed.
pub fn find_functions(text: &str) -> Result<Vec<FunctionScope<'_>>, AuditError> {
    let mut functions = Vec::new();
    for caps in FUNCTION_HEADER.captures_iter(text) {
        let (Some(header), Some(name)) = (caps.get(0), caps.get(1).or_else(|| caps.get(2))) else {
            continue;
        };
        let params_end = scope_end(text, header.end() - 1)?;
        let Some(brace) = text[params_end..].find('{').map(|i| params_end + i) else {
            return Err(ScanError::MissingSequence {
                targets: "{".to_string(),
                offset: params_end,
            }
            .into());
        };
        let end = scope_end(text, brace)?;
        functions.push(FunctionScope {
            name: name.as_str(),
            start: header.start(),
            end,
            body: &text[brace..end],
        });
    }
    Ok(functions)
}

/// Functions whose name starts upper-case.
///
/// # Errors
///
/// See [`find_functions`].
pub fn find_constructors(text: &str) -> Result<Vec<FunctionScope<'_>>, AuditError> {
    Ok(find_functions(text)?
        .into_iter()
        .filter(FunctionScope::is_constructor)
        .collect())
}

/// Finds every route registration in `text`.
///
/// # Errors
///
/// Returns a scan error if an argument list is never closed.
pub fn find_endpoints(text: &str) -> Result<Vec<EndpointScope<'_>>, AuditError> {
    let mut endpoints = Vec::new();
    for caps in ROUTE_REGISTRATION.captures_iter(text) {
        let (Some(whole), Some(verb), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let open = verb.end();
        let end = scope_end(text, open)?;
        endpoints.push(EndpointScope {
            verb: verb.as_str(),
            name: name.as_str(),
            start: whole.start(),
            end,
            body: &text[open..end],
        });
    }
    Ok(endpoints)
}

/// The innermost function whose span contains `offset`.
#[must_use]
pub fn enclosing_function<'f, 'a>(
    functions: &'f [FunctionScope<'a>],
    offset: usize,
) -> Option<&'f FunctionScope<'a>> {
    functions
        .iter()
        .filter(|f| f.contains(offset))
        .max_by_key(|f| f.start)
}
