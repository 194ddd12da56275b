//! Directive selectors.
//!
//! A selector starting with `@` is a directive. The keyword (everything up to
//! the first whitespace) picks the [`Directive`]; the rest is its argument:
//!
//! | Source                          | Resolves to                      |
//! |---------------------------------|----------------------------------|
//! | `@child span`                   | `&>span`                         |
//! | `@child li a`                   | `&>li a`                         |
//! | `@sibling class note`           | `&~.note`                        |
//! | `@adjacent h2`                  | `&+h2`                           |
//! | `@class active`                 | `&.active`                       |
//! | `@attribute href is "#"`        | `&[href="#"]`                    |
//! | `@position -2`                  | `&:nth-last-of-type(2)`          |
//! | `@first` / `@last`              | `&:nth-of-type(1)` / `&:nth-last-of-type(1)` |
//! | `@state open and not busy`      | `&.open:not(.busy)`              |
//! | `@when focused visibly`         | `&:focus-visible`                |
//! | `@with child class icon`        | `&:has(>.icon)`                  |
//! | `@device tablet .. laptop`      | `(min-width:576px)and(max-width:1439px)` |
//! | `@theme dark`                   | `(prefers-color-scheme:dark)`    |
//! | `@print`                        | `print`                          |
//!
//! The last three are scope directives: the parser turns their block into a
//! media scope instead of a rule.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{all_consuming, map, opt, rest, value},
    multi::separated_list1,
    sequence::{pair, preceded, tuple},
};
use phf::phf_map;

use crate::devices::device_range;
use crate::error::DirectiveError;
use crate::tree::BlockKind;

/// Selector of a resolved `@print` block.
pub const PRINT_CONDITION: &str = "print";

/// Pseudo-classes understood by `@when`.
pub static PSEUDO_CLASSES: phf::Map<&'static str, &'static str> = phf_map! {
    "active" => "active",
    "checked" => "checked",
    "disabled" => "disabled",
    "empty" => "empty",
    "enabled" => "enabled",
    "focused" => "focus",
    "focused visibly" => "focus-visible",
    "focused within" => "focus-within",
    "hovered" => "hover",
    "optional" => "optional",
    "required" => "required",
    "valid" => "valid",
    "visited" => "visited",
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    Child,
    Sibling,
    Adjacent,
    Class,
    Attribute,
    Position,
    First,
    Last,
    State,
    When,
    With,
    Device,
    Theme,
    Print,
}

impl Directive {
    /// Maps a keyword such as `@child` to its directive.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let directive = match keyword {
            "@child" => Self::Child,
            "@sibling" => Self::Sibling,
            "@adjacent" => Self::Adjacent,
            "@class" => Self::Class,
            "@attribute" => Self::Attribute,
            "@position" => Self::Position,
            "@first" => Self::First,
            "@last" => Self::Last,
            "@state" => Self::State,
            "@when" => Self::When,
            "@with" => Self::With,
            "@device" => Self::Device,
            "@theme" => Self::Theme,
            "@print" => Self::Print,
            _ => return None,
        };
        Some(directive)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Child => "@child",
            Self::Sibling => "@sibling",
            Self::Adjacent => "@adjacent",
            Self::Class => "@class",
            Self::Attribute => "@attribute",
            Self::Position => "@position",
            Self::First => "@first",
            Self::Last => "@last",
            Self::State => "@state",
            Self::When => "@when",
            Self::With => "@with",
            Self::Device => "@device",
            Self::Theme => "@theme",
            Self::Print => "@print",
        }
    }

    /// The block kind a scope directive gives its block, `None` for the
    /// directives that only rewrite the selector.
    pub fn scope_kind(self) -> Option<BlockKind> {
        match self {
            Self::Device => Some(BlockKind::Device),
            Self::Theme => Some(BlockKind::Theme),
            Self::Print => Some(BlockKind::Print),
            _ => None,
        }
    }
}

/// Splits `"@state open and busy"` into `("@state", "open and busy")`.
pub fn split_directive(selector: &str) -> (&str, &str) {
    let selector = selector.trim();
    match selector.split_once(char::is_whitespace) {
        Some((keyword, argument)) => (keyword, argument.trim()),
        None => (selector, ""),
    }
}

/// Resolves a directive's argument into a selector fragment, or into the
/// media condition for scope directives.
pub fn resolve(directive: Directive, argument: &str) -> Result<String, DirectiveError> {
    match directive {
        Directive::Child => resolve_combinator(directive, '>', argument),
        Directive::Sibling => resolve_combinator(directive, '~', argument),
        Directive::Adjacent => resolve_combinator(directive, '+', argument),
        Directive::Class => resolve_class(argument),
        Directive::Attribute => resolve_attribute(argument),
        Directive::Position => resolve_position(argument),
        Directive::First => {
            no_argument(directive, argument)?;
            Ok("&:nth-of-type(1)".to_string())
        }
        Directive::Last => {
            no_argument(directive, argument)?;
            Ok("&:nth-last-of-type(1)".to_string())
        }
        Directive::State => resolve_state(argument),
        Directive::When => resolve_when(argument),
        Directive::With => resolve_with(argument),
        Directive::Device => resolve_device(argument),
        Directive::Theme => resolve_theme(argument),
        Directive::Print => {
            no_argument(directive, argument)?;
            Ok(PRINT_CONDITION.to_string())
        }
    }
}

fn no_argument(directive: Directive, argument: &str) -> Result<(), DirectiveError> {
    if argument.is_empty() {
        Ok(())
    } else {
        Err(DirectiveError::UnexpectedArgument(
            directive.keyword(),
            argument.to_string(),
        ))
    }
}

fn required(directive: Directive, argument: &str) -> Result<(), DirectiveError> {
    if argument.is_empty() {
        Err(DirectiveError::MissingArgument(directive.keyword()))
    } else {
        Ok(())
    }
}

fn malformed(directive: Directive, argument: &str) -> DirectiveError {
    DirectiveError::Malformed {
        directive: directive.keyword(),
        argument: argument.to_string(),
    }
}

/// A run of non-whitespace characters.
fn word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

/// The rest of the argument as a selector, with a leading `class NAME`
/// written as `.NAME`.
fn element_target(input: &str) -> IResult<&str, String> {
    alt((
        map(preceded(pair(tag("class"), multispace1), rest), |name| {
            format!(".{name}")
        }),
        map(rest, str::to_string),
    ))(input)
}

fn parse_target(directive: Directive, argument: &str) -> Result<String, DirectiveError> {
    required(directive, argument)?;
    all_consuming(element_target)(argument)
        .map(|(_, target)| target)
        .map_err(|_| malformed(directive, argument))
}

fn resolve_combinator(
    directive: Directive,
    combinator: char,
    argument: &str,
) -> Result<String, DirectiveError> {
    let target = parse_target(directive, argument)?;
    Ok(format!("&{combinator}{target}"))
}

fn resolve_class(argument: &str) -> Result<String, DirectiveError> {
    required(Directive::Class, argument)?;
    let (_, name) =
        all_consuming(word)(argument).map_err(|_| malformed(Directive::Class, argument))?;
    Ok(format!("&.{name}"))
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum AttributeTest<'a> {
    Exists,
    Missing,
    Equals(&'a str),
    NotEquals(&'a str),
}

/// A double-quoted value, quotes included.
fn quoted(input: &str) -> IResult<&str, &str> {
    let value = input.trim_end();
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(("", value))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )))
    }
}

fn attribute_test(input: &str) -> IResult<&str, AttributeTest<'_>> {
    alt((
        value(AttributeTest::Exists, tag("exists")),
        value(
            AttributeTest::Missing,
            tuple((tag("is"), multispace1, tag("missing"))),
        ),
        map(
            preceded(tuple((tag("is"), multispace1, tag("not"), multispace1)), quoted),
            AttributeTest::NotEquals,
        ),
        map(preceded(pair(tag("is"), multispace1), quoted), AttributeTest::Equals),
    ))(input)
}

fn resolve_attribute(argument: &str) -> Result<String, DirectiveError> {
    required(Directive::Attribute, argument)?;
    let (_, (name, _, test)) = all_consuming(tuple((
        take_while1(|c: char| !c.is_whitespace() && c != '"'),
        multispace1,
        attribute_test,
    )))(argument)
    .map_err(|_| malformed(Directive::Attribute, argument))?;

    Ok(match test {
        AttributeTest::Exists => format!("&[{name}]"),
        AttributeTest::Missing => format!("&:not([{name}])"),
        AttributeTest::Equals(value) => format!("&[{name}={value}]"),
        AttributeTest::NotEquals(value) => format!("&:not([{name}={value}])"),
    })
}

fn resolve_position(argument: &str) -> Result<String, DirectiveError> {
    required(Directive::Position, argument)?;
    let (_, (minus, index)) = all_consuming(pair(opt(char('-')), digit1))(argument)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| {
            DirectiveError::InvalidPosition(argument.to_string())
        })?;

    Ok(match minus {
        Some(_) => format!("&:nth-last-of-type({index})"),
        None => format!("&:nth-of-type({index})"),
    })
}

/// One `@state` term: `NAME` or `not NAME`.
fn state_term(input: &str) -> IResult<&str, String> {
    alt((
        map(preceded(pair(tag("not"), multispace1), word), |name| {
            format!(":not(.{name})")
        }),
        map(word, |name| format!(".{name}")),
    ))(input)
}

fn and_separator(input: &str) -> IResult<&str, (&str, &str, &str)> {
    tuple((multispace1, tag("and"), multispace1))(input)
}

fn resolve_state(argument: &str) -> Result<String, DirectiveError> {
    required(Directive::State, argument)?;
    let (_, terms) = all_consuming(separated_list1(and_separator, state_term))(argument)
        .map_err(|_| malformed(Directive::State, argument))?;
    Ok(format!("&{}", terms.concat()))
}

fn resolve_when(argument: &str) -> Result<String, DirectiveError> {
    required(Directive::When, argument)?;
    // Conditions may span several words ("focused visibly"), so normalize
    // spacing before splitting on `and`.
    let normalized = argument.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut selector = String::from("&");
    for condition in normalized.split(" and ") {
        let (negated, name) = match condition.strip_prefix("not ") {
            Some(name) => (true, name),
            None => (false, condition),
        };
        let pseudo = PSEUDO_CLASSES
            .get(name)
            .ok_or_else(|| DirectiveError::UnknownCondition(name.to_string()))?;
        if negated {
            selector.push_str(&format!(":not(:{pseudo})"));
        } else {
            selector.push_str(&format!(":{pseudo}"));
        }
    }
    Ok(selector)
}

fn relation_operator(relation: &str) -> Option<&'static str> {
    match relation {
        "child" => Some(">"),
        "sibling" => Some("~"),
        "adjacent" => Some("+"),
        "descendant" => Some(""),
        _ => None,
    }
}

fn resolve_with(argument: &str) -> Result<String, DirectiveError> {
    required(Directive::With, argument)?;
    let (_, (relation, _, target)) =
        all_consuming(tuple((word, multispace1, element_target)))(argument)
            .map_err(|_| malformed(Directive::With, argument))?;
    let operator = relation_operator(relation)
        .ok_or_else(|| DirectiveError::UnknownRelation(relation.to_string()))?;
    Ok(format!("&:has({operator}{target})"))
}

/// A device name in a range: anything up to whitespace or `..`.
fn device_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != '.')(input)
}

/// The two accepted `@device` argument shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DeviceSpan<'a> {
    /// `NAME only`
    Only(&'a str),
    /// `FROM..TO`, either end optional
    Range(Option<&'a str>, Option<&'a str>),
}

fn device_only(input: &str) -> IResult<&str, DeviceSpan<'_>> {
    map(
        tuple((word, multispace1, tag("only"))),
        |(name, _, _)| DeviceSpan::Only(name),
    )(input)
}

fn device_range_span(input: &str) -> IResult<&str, DeviceSpan<'_>> {
    map(
        tuple((
            opt(device_name),
            multispace0,
            tag(".."),
            multispace0,
            opt(device_name),
        )),
        |(from, _, _, _, to)| DeviceSpan::Range(from, to),
    )(input)
}

fn resolve_device(argument: &str) -> Result<String, DirectiveError> {
    required(Directive::Device, argument)?;
    let invalid = || DirectiveError::InvalidDeviceRange(argument.to_string());

    let (_, span) =
        all_consuming(alt((device_only, device_range_span)))(argument).map_err(|_| invalid())?;

    let clauses: Vec<String> = match span {
        DeviceSpan::Only(name) => {
            let range = device_range(name)?;
            range.min_width().into_iter().chain(range.max_width()).collect()
        }
        DeviceSpan::Range(from, to) => {
            let lower = from.map(device_range).transpose()?.and_then(|r| r.min_width());
            let upper = to.map(device_range).transpose()?.and_then(|r| r.max_width());
            lower.into_iter().chain(upper).collect()
        }
    };

    // `mobile ..`, `.. desktop` and `..` select every width.
    if clauses.is_empty() {
        return Err(invalid());
    }
    Ok(clauses.join("and"))
}

fn resolve_theme(argument: &str) -> Result<String, DirectiveError> {
    required(Directive::Theme, argument)?;
    Ok(format!("(prefers-color-scheme:{argument})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_raw(selector: &str) -> Result<String, DirectiveError> {
        let (keyword, argument) = split_directive(selector);
        let directive = Directive::from_keyword(keyword).expect("known directive");
        resolve(directive, argument)
    }

    #[test]
    fn split_keyword_and_argument() {
        assert_eq!(split_directive("@state  open "), ("@state", "open"));
        assert_eq!(split_directive("@print"), ("@print", ""));
    }

    #[test]
    fn unknown_keyword() {
        assert_eq!(Directive::from_keyword("@font-face"), None);
        assert_eq!(Directive::from_keyword("@Child"), None);
    }

    #[test]
    fn scope_kinds() {
        assert_eq!(Directive::Device.scope_kind(), Some(BlockKind::Device));
        assert_eq!(Directive::Theme.scope_kind(), Some(BlockKind::Theme));
        assert_eq!(Directive::Print.scope_kind(), Some(BlockKind::Print));
        assert_eq!(Directive::State.scope_kind(), None);
    }

    #[test]
    fn combinators() {
        assert_eq!(resolve_raw("@child span").unwrap(), "&>span");
        assert_eq!(resolve_raw("@child class foo").unwrap(), "&>.foo");
        assert_eq!(resolve_raw("@sibling h2").unwrap(), "&~h2");
        assert_eq!(resolve_raw("@sibling class foo").unwrap(), "&~.foo");
        assert_eq!(resolve_raw("@adjacent h2").unwrap(), "&+h2");
        assert_eq!(resolve_raw("@adjacent class foo").unwrap(), "&+.foo");
    }

    #[test]
    fn combinator_without_target() {
        assert_eq!(
            resolve_raw("@child"),
            Err(DirectiveError::MissingArgument("@child"))
        );
    }

    #[test]
    fn combinator_with_compound_target() {
        assert_eq!(resolve_raw("@child li a").unwrap(), "&>li a");
        assert_eq!(resolve_raw("@sibling class note em").unwrap(), "&~.note em");
        assert_eq!(resolve_raw("@with child li > a").unwrap(), "&:has(>li > a)");
    }

    #[test]
    fn class() {
        assert_eq!(resolve_raw("@class foo").unwrap(), "&.foo");
        assert_eq!(
            resolve_raw("@class"),
            Err(DirectiveError::MissingArgument("@class"))
        );
    }

    #[test]
    fn attribute_forms() {
        assert_eq!(resolve_raw("@attribute foo exists").unwrap(), "&[foo]");
        assert_eq!(
            resolve_raw("@attribute foo is missing").unwrap(),
            "&:not([foo])"
        );
        assert_eq!(
            resolve_raw("@attribute foo is \"bar\"").unwrap(),
            "&[foo=\"bar\"]"
        );
        assert_eq!(
            resolve_raw("@attribute foo is not \"bar\"").unwrap(),
            "&:not([foo=\"bar\"])"
        );
    }

    #[test]
    fn attribute_value_may_contain_quotes_and_keywords() {
        assert_eq!(
            resolve_raw("@attribute title is \"not \"really\" here\"").unwrap(),
            "&[title=\"not \"really\" here\"]"
        );
    }

    #[test]
    fn attribute_value_must_be_quoted() {
        assert!(matches!(
            resolve_raw("@attribute foo is bar"),
            Err(DirectiveError::Malformed { directive: "@attribute", .. })
        ));
        assert!(resolve_raw("@attribute foo").is_err());
    }

    #[test]
    fn positions() {
        assert_eq!(resolve_raw("@position 1").unwrap(), "&:nth-of-type(1)");
        assert_eq!(resolve_raw("@position 12").unwrap(), "&:nth-of-type(12)");
        assert_eq!(resolve_raw("@position -2").unwrap(), "&:nth-last-of-type(2)");
    }

    #[test]
    fn invalid_positions() {
        assert_eq!(
            resolve_raw("@position two"),
            Err(DirectiveError::InvalidPosition("two".into()))
        );
        assert_eq!(
            resolve_raw("@position --1"),
            Err(DirectiveError::InvalidPosition("--1".into()))
        );
    }

    #[test]
    fn first_and_last() {
        assert_eq!(resolve_raw("@first").unwrap(), "&:nth-of-type(1)");
        assert_eq!(resolve_raw("@last").unwrap(), "&:nth-last-of-type(1)");
        assert_eq!(
            resolve_raw("@first 2"),
            Err(DirectiveError::UnexpectedArgument("@first", "2".into()))
        );
    }

    #[test]
    fn states() {
        assert_eq!(resolve_raw("@state collapsed").unwrap(), "&.collapsed");
        assert_eq!(
            resolve_raw("@state collapsed and expanded").unwrap(),
            "&.collapsed.expanded"
        );
        assert_eq!(resolve_raw("@state not collapsed").unwrap(), "&:not(.collapsed)");
        assert_eq!(
            resolve_raw("@state not collapsed and disabled").unwrap(),
            "&:not(.collapsed).disabled"
        );
        assert_eq!(
            resolve_raw("@state expanded and not disabled and active").unwrap(),
            "&.expanded:not(.disabled).active"
        );
    }

    #[test]
    fn state_with_dangling_and() {
        assert!(resolve_raw("@state open and").is_err());
    }

    #[test]
    fn when_conditions() {
        assert_eq!(resolve_raw("@when active").unwrap(), "&:active");
        assert_eq!(resolve_raw("@when not active").unwrap(), "&:not(:active)");
        assert_eq!(resolve_raw("@when active and hovered").unwrap(), "&:active:hover");
        assert_eq!(
            resolve_raw("@when active and not hovered").unwrap(),
            "&:active:not(:hover)"
        );
        assert_eq!(
            resolve_raw("@when focused visibly").unwrap(),
            "&:focus-visible"
        );
        assert_eq!(
            resolve_raw("@when not  focused   within").unwrap(),
            "&:not(:focus-within)"
        );
    }

    #[test]
    fn when_unknown_condition() {
        assert_eq!(
            resolve_raw("@when sleeping"),
            Err(DirectiveError::UnknownCondition("sleeping".into()))
        );
    }

    #[test]
    fn with_relations() {
        assert_eq!(resolve_raw("@with child span").unwrap(), "&:has(>span)");
        assert_eq!(resolve_raw("@with child class foo").unwrap(), "&:has(>.foo)");
        assert_eq!(resolve_raw("@with sibling span").unwrap(), "&:has(~span)");
        assert_eq!(resolve_raw("@with adjacent class foo").unwrap(), "&:has(+.foo)");
        assert_eq!(resolve_raw("@with descendant span").unwrap(), "&:has(span)");
        assert_eq!(
            resolve_raw("@with descendant class foo").unwrap(),
            "&:has(.foo)"
        );
    }

    #[test]
    fn with_unknown_relation() {
        assert_eq!(
            resolve_raw("@with parent span"),
            Err(DirectiveError::UnknownRelation("parent".into()))
        );
    }

    #[test]
    fn device_only_form() {
        assert_eq!(resolve_raw("@device mobile only").unwrap(), "(max-width:575px)");
        assert_eq!(
            resolve_raw("@device tablet only").unwrap(),
            "(min-width:576px)and(max-width:1023px)"
        );
        assert_eq!(resolve_raw("@device desktop only").unwrap(), "(min-width:1440px)");
    }

    #[test]
    fn device_ranges() {
        assert_eq!(resolve_raw("@device tablet ..").unwrap(), "(min-width:576px)");
        assert_eq!(resolve_raw("@device .. laptop").unwrap(), "(max-width:1439px)");
        assert_eq!(
            resolve_raw("@device tablet .. laptop").unwrap(),
            "(min-width:576px)and(max-width:1439px)"
        );
        assert_eq!(
            resolve_raw("@device tablet..laptop").unwrap(),
            "(min-width:576px)and(max-width:1439px)"
        );
    }

    #[test]
    fn device_unknown_name() {
        assert_eq!(
            resolve_raw("@device watch only"),
            Err(DirectiveError::UnknownDevice("watch".into()))
        );
        assert_eq!(
            resolve_raw("@device tablet .. tv"),
            Err(DirectiveError::UnknownDevice("tv".into()))
        );
    }

    #[test]
    fn device_range_shapes() {
        let span = |argument: &'static str| {
            all_consuming(device_range_span)(argument).map(|(_, span)| span)
        };
        assert_eq!(
            span("tablet .. laptop"),
            Ok(DeviceSpan::Range(Some("tablet"), Some("laptop")))
        );
        assert_eq!(span("..laptop"), Ok(DeviceSpan::Range(None, Some("laptop"))));
        assert_eq!(span("tablet.."), Ok(DeviceSpan::Range(Some("tablet"), None)));
        assert!(span("tablet laptop").is_err());
        assert!(span("tablet .. laptop desktop").is_err());
    }

    #[test]
    fn device_invalid_shapes() {
        assert_eq!(
            resolve_raw("@device mobile"),
            Err(DirectiveError::InvalidDeviceRange("mobile".into()))
        );
        assert_eq!(
            resolve_raw("@device .."),
            Err(DirectiveError::InvalidDeviceRange("..".into()))
        );
        assert_eq!(
            resolve_raw("@device mobile .."),
            Err(DirectiveError::InvalidDeviceRange("mobile ..".into()))
        );
        assert_eq!(
            resolve_raw("@device tablet ... laptop"),
            Err(DirectiveError::InvalidDeviceRange("tablet ... laptop".into()))
        );
    }

    #[test]
    fn themes() {
        assert_eq!(
            resolve_raw("@theme light").unwrap(),
            "(prefers-color-scheme:light)"
        );
        assert_eq!(resolve_raw("@theme dark").unwrap(), "(prefers-color-scheme:dark)");
        assert_eq!(
            resolve_raw("@theme"),
            Err(DirectiveError::MissingArgument("@theme"))
        );
    }

    #[test]
    fn print() {
        assert_eq!(resolve_raw("@print").unwrap(), "print");
        assert!(resolve_raw("@print now").is_err());
    }
}
