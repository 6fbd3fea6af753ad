//! Directive classification and conditional-chain grouping.
//!
//! Both run before code generation so that generation only reads the AST.

use crate::template_ast::{Directive, Element, Node, SimpleExpression};

const STRUCTURAL: &[&str] = &["if", "else-if", "else", "for", "model"];

/// Where an element sits in a `v-if` / `v-else-if` / `v-else` chain.
#[derive(Debug, Clone, Copy)]
pub enum Branch<'a> {
    If(&'a Directive),
    ElseIf(&'a Directive),
    Else,
}

/// An element's directives sorted into named slots.
///
/// Only the first directive of each structural kind counts; everything that
/// is not structural stays in `generic`, in source order.
#[derive(Debug, Default)]
pub struct ResolvedDirectives<'a> {
    pub branch: Option<Branch<'a>>,
    pub for_each: Option<&'a Directive>,
    pub model: Option<&'a Directive>,
    pub generic: Vec<&'a Directive>,
}

impl<'a> ResolvedDirectives<'a> {
    pub fn classify(element: &'a Element) -> Self {
        // `if` wins over `else-if`, which wins over `else`
        let branch = element
            .directive("if")
            .map(Branch::If)
            .or_else(|| element.directive("else-if").map(Branch::ElseIf))
            .or_else(|| element.has_directive("else").then_some(Branch::Else));
        ResolvedDirectives {
            branch,
            for_each: element.directive("for"),
            model: element.directive("model"),
            generic: element
                .directives
                .iter()
                .filter(|d| !STRUCTURAL.contains(&d.name.as_str()))
                .collect(),
        }
    }

    pub fn condition_exp(&self) -> Option<&'a SimpleExpression> {
        match self.branch {
            Some(Branch::If(d) | Branch::ElseIf(d)) => d.exp.as_ref(),
            _ => None,
        }
    }
}

/// A run of `v-if` / `v-else-if` / `v-else` siblings compiled as one ternary.
#[derive(Debug)]
pub struct ConditionalChain<'a> {
    /// Head first, then each `else-if` in order.
    pub branches: Vec<&'a Element>,
    pub fallback: Option<&'a Element>,
}

#[derive(Debug)]
pub enum Sibling<'a> {
    Node(&'a Node),
    Chain(ConditionalChain<'a>),
}

/// Rewrite a sibling list into plain nodes and conditional chains.
///
/// A chain head looks forward past blank text for an `else` (which ends the
/// chain) or an `else-if` (which extends it). Blank text skipped while looking
/// is dropped even when no branch follows.
pub fn group_siblings(children: &[Node]) -> Vec<Sibling<'_>> {
    let mut out = Vec::with_capacity(children.len());
    let mut i = 0;
    while i < children.len() {
        let head = match &children[i] {
            Node::Element(el) if is_condition(branch_of(el)) => el,
            node => {
                out.push(Sibling::Node(node));
                i += 1;
                continue;
            }
        };

        let mut chain = ConditionalChain {
            branches: vec![head],
            fallback: None,
        };
        i += 1;
        loop {
            while children.get(i).is_some_and(Node::is_blank_text) {
                i += 1;
            }
            let Some(Node::Element(next)) = children.get(i) else {
                break;
            };
            match branch_of(next) {
                Some(Branch::Else) => {
                    chain.fallback = Some(next);
                    i += 1;
                    break;
                }
                Some(Branch::ElseIf(_)) => {
                    chain.branches.push(next);
                    i += 1;
                }
                _ => break,
            }
        }
        out.push(Sibling::Chain(chain));
    }
    out
}

fn branch_of(el: &Element) -> Option<Branch<'_>> {
    ResolvedDirectives::classify(el).branch
}

fn is_condition(branch: Option<Branch<'_>>) -> bool {
    matches!(branch, Some(Branch::If(_) | Branch::ElseIf(_)))
}
