// Copyright 2025-present Caselex Contributors
// SPDX-License-Identifier: Apache-2.0

//! Infix-to-postfix conversion for boolean queries via the shunting-yard
//! algorithm, so the boolean evaluator only ever has to run a postfix
//! stack machine.

use super::{InfixToken, OpKind, PostfixToken};

fn precedence(op: OpKind) -> u8 {
    match op {
        OpKind::Not => 3,
        OpKind::And => 2,
        OpKind::Or => 1,
    }
}

/// `not` is right-associative (as a prefix unary operator it has no real
/// choice); `and`/`or` are left-associative.
fn is_right_associative(op: OpKind) -> bool {
    matches!(op, OpKind::Not)
}

pub fn to_postfix(tokens: Vec<InfixToken>) -> Vec<PostfixToken> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut ops: Vec<OpKind> = Vec::new();

    for token in tokens {
        match token {
            InfixToken::Operand(operand) => output.push(PostfixToken::Operand(operand)),
            InfixToken::Op(op) => {
                while let Some(&top) = ops.last() {
                    let pops = if is_right_associative(op) {
                        precedence(top) > precedence(op)
                    } else {
                        precedence(top) >= precedence(op)
                    };
                    if pops {
                        output.push(PostfixToken::Op(ops.pop().unwrap()));
                    } else {
                        break;
                    }
                }
                ops.push(op);
            }
        }
    }
    while let Some(op) = ops.pop() {
        output.push(PostfixToken::Op(op));
    }
    output
}
