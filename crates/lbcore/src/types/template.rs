// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Template declarations and `Name<Arg,...>` parsing.

use super::{object_type, ClassBuilder, Type, TypePtr};
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum TemplateMemberType {
    Fixed(TypePtr),
    Parameter(Arc<str>),
}

/// Generic class, instantiated once per distinct argument list.
///
/// # Example
///
/// ```rust
/// use lbcore::types::{integer_type, TemplateDeclaration, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// registry
///     .declare_template(
///         TemplateDeclaration::new("Container", &["T"])
///             .parameter_member("T", "value")
///             .member(&integer_type(), "count"),
///     )
///     .unwrap();
/// let ty = registry.get_type("Container<Double>").unwrap();
/// assert_eq!(ty.name(), "Container<Double>");
/// ```
#[derive(Debug, Clone)]
pub struct TemplateDeclaration {
    name: Arc<str>,
    parameters: Vec<Arc<str>>,
    base: Option<TypePtr>,
    members: Vec<(TemplateMemberType, String)>,
}

impl TemplateDeclaration {
    pub fn new(name: &str, parameters: &[&str]) -> Self {
        Self {
            name: Arc::from(name),
            parameters: parameters.iter().map(|p| Arc::from(*p)).collect(),
            base: None,
            members: Vec::new(),
        }
    }

    /// Base class of every instance (default `Object`).
    pub fn base(mut self, base: &TypePtr) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Member with a fixed type.
    pub fn member(mut self, ty: &TypePtr, name: &str) -> Self {
        self.members
            .push((TemplateMemberType::Fixed(ty.clone()), name.to_string()));
        self
    }

    /// Member typed by the template parameter `parameter`.
    pub fn parameter_member(mut self, parameter: &str, name: &str) -> Self {
        self.members.push((
            TemplateMemberType::Parameter(Arc::from(parameter)),
            name.to_string(),
        ));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Canonical name of the instance for `args`.
    pub fn instance_name(&self, args: &[TypePtr]) -> String {
        let args: Vec<&str> = args.iter().map(|a| a.name()).collect();
        format!("{}<{}>", self.name, args.join(","))
    }

    pub(crate) fn instantiate(&self, args: &[TypePtr]) -> Result<Type> {
        let name = self.instance_name(args);
        if args.len() != self.parameters.len() {
            return Err(Error::UnknownType(name));
        }
        let base = self.base.clone().unwrap_or_else(object_type);
        let mut builder = ClassBuilder::new(name.clone())
            .base(&base)
            .template_args(args.to_vec());
        for (ty, member_name) in &self.members {
            let ty = match ty {
                TemplateMemberType::Fixed(ty) => ty.clone(),
                TemplateMemberType::Parameter(p) => {
                    let position = self
                        .parameters
                        .iter()
                        .position(|q| q == p)
                        .ok_or_else(|| Error::UnknownType(format!("{}::{}", self.name, p)))?;
                    args[position].clone()
                }
            };
            builder = builder.member(&ty, member_name);
        }
        builder.build()
    }
}

/// Builtin `Pair<First,Second>` template.
pub(crate) fn pair_template() -> TemplateDeclaration {
    TemplateDeclaration::new("Pair", &["First", "Second"])
        .parameter_member("First", "first")
        .parameter_member("Second", "second")
}

/// A type name split into template name and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTypeName {
    pub name: String,
    pub arguments: Vec<ParsedTypeName>,
}

impl ParsedTypeName {
    pub fn is_template_instance(&self) -> bool {
        !self.arguments.is_empty()
    }
}

impl fmt::Display for ParsedTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// Parse `Name` or `Name<Arg1, Arg2<...>>`; whitespace around tokens is ignored.
pub fn parse_type_name(input: &str) -> Result<ParsedTypeName> {
    let mut parser = NameParser {
        chars: input.char_indices().peekable(),
        input,
    };
    let parsed = parser.parse()?;
    parser.skip_whitespace();
    if parser.chars.peek().is_some() {
        return Err(Error::UnknownType(input.to_string()));
    }
    Ok(parsed)
}

struct NameParser<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    input: &'a str,
}

impl NameParser<'_> {
    fn fail(&self) -> Error {
        Error::UnknownType(self.input.to_string())
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn parse(&mut self) -> Result<ParsedTypeName> {
        self.skip_whitespace();
        let mut name = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if matches!(c, '<' | '>' | ',') {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        let name = name.trim_end().to_string();
        if name.is_empty() {
            return Err(self.fail());
        }

        let mut arguments = Vec::new();
        if self.chars.peek().is_some_and(|(_, c)| *c == '<') {
            self.chars.next();
            loop {
                arguments.push(self.parse()?);
                self.skip_whitespace();
                match self.chars.next() {
                    Some((_, ',')) => continue,
                    Some((_, '>')) => break,
                    _ => return Err(self.fail()),
                }
            }
        }
        Ok(ParsedTypeName { name, arguments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{double_type, integer_type};

    #[test]
    fn test_parse_plain_name() {
        let parsed = parse_type_name("Double").expect("parse");
        assert_eq!(parsed.name, "Double");
        assert!(!parsed.is_template_instance());
    }

    #[test]
    fn test_parse_nested_with_spaces() {
        let parsed = parse_type_name("Pair< Integer , Pair<Double,String> >").expect("parse");
        assert_eq!(parsed.name, "Pair");
        assert_eq!(parsed.arguments.len(), 2);
        assert_eq!(parsed.arguments[1].arguments[0].name, "Double");
        assert_eq!(parsed.to_string(), "Pair<Integer,Pair<Double,String>>");
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "Pair<", "Pair<Integer", "Pair<>", "Pair<Integer>>", "A,B"] {
            assert!(parse_type_name(bad).is_err(), "{:?} should not parse", bad);
        }
    }

    #[test]
    fn test_instantiate_pair() {
        let pair = pair_template();
        let ty = pair
            .instantiate(&[integer_type(), double_type()])
            .expect("instantiate");
        assert_eq!(ty.name(), "Pair<Integer,Double>");
        assert_eq!(ty.num_members(), 2);
        assert!(std::sync::Arc::ptr_eq(
            &ty.member_type(1).expect("second"),
            &double_type()
        ));
        assert_eq!(ty.template_args().len(), 2);
    }

    #[test]
    fn test_instantiate_wrong_arity() {
        let err = pair_template().instantiate(&[integer_type()]).unwrap_err();
        assert!(matches!(err, Error::UnknownType(_)));
    }
}
