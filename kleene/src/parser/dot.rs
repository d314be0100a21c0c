use crate::parser::{DotStatement, ParsedDot};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_till1, take_while1};
use nom::character::complete::{char, multispace0, multispace1, space0};
use nom::combinator::{map, value};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;

pub(crate) fn full_dot(input: &str) -> IResult<&str, ParsedDot> {
    map(
        delimited(
            tuple((multispace0, tag("digraph"), multispace1)),
            pair(
                identifier,
                delimited(
                    preceded(multispace0, char('{')),
                    many0(preceded(multispace0, statement)),
                    preceded(multispace0, char('}')),
                ),
            ),
            multispace0,
        ),
        |(graph_name, statements)| ParsedDot {
            graph_name,
            statements,
        },
    )(input)
}

fn statement(input: &str) -> IResult<&str, DotStatement> {
    alt((
        rank_dir,
        node_shape,
        start_edge,
        start_anchor,
        edge,
        node_label,
    ))(input)
}

fn rank_dir(input: &str) -> IResult<&str, DotStatement> {
    map(
        delimited(
            tuple((tag("rankdir"), space0, char('='), space0)),
            identifier,
            semicolon,
        ),
        DotStatement::RankDir,
    )(input)
}

fn node_shape(input: &str) -> IResult<&str, DotStatement> {
    map(
        pair(
            delimited(
                tuple((
                    tag("node"),
                    space0,
                    char('['),
                    space0,
                    tag("shape"),
                    space0,
                    char('='),
                    space0,
                )),
                alt((value(true, tag("doublecircle")), value(false, tag("circle")))),
                tuple((space0, char(']'), semicolon, space0)),
            ),
            terminated(separated_list1(multispace1, identifier), semicolon),
        ),
        |(accepting, states)| DotStatement::NodeShape { accepting, states },
    )(input)
}

fn start_anchor(input: &str) -> IResult<&str, DotStatement> {
    value(
        DotStatement::StartAnchor,
        tuple((
            tag("start"),
            space0,
            char('['),
            take_till(|c| c == ']'),
            char(']'),
            semicolon,
        )),
    )(input)
}

fn start_edge(input: &str) -> IResult<&str, DotStatement> {
    map(
        delimited(
            tuple((tag("start"), space0, tag("->"), space0)),
            identifier,
            semicolon,
        ),
        DotStatement::StartEdge,
    )(input)
}

fn edge(input: &str) -> IResult<&str, DotStatement> {
    map(
        terminated(
            tuple((
                identifier,
                delimited(space0, tag("->"), space0),
                identifier,
                preceded(space0, label_attribute),
            )),
            semicolon,
        ),
        |(from, _, to, label)| DotStatement::Edge { from, to, label },
    )(input)
}

fn node_label(input: &str) -> IResult<&str, DotStatement> {
    map(
        terminated(pair(identifier, preceded(space0, label_attribute)), semicolon),
        |(name, label)| DotStatement::NodeLabel { name, label },
    )(input)
}

fn label_attribute(input: &str) -> IResult<&str, &str> {
    delimited(
        tuple((char('['), space0, tag("label"), space0, char('='), space0)),
        quoted,
        tuple((space0, char(']'))),
    )(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till1(|c| c == '"'), char('"'))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

fn semicolon(input: &str) -> IResult<&str, char> {
    preceded(space0, char(';'))(input)
}
