//! Compilation of bound expression trees into normalized expression graphs.

use crate::{ExprError, ExprResult};
use factum_ast::Expression;
use factum_binder::{BinderError, CompilationContext};
use factum_core::ExpressionId;
use factum_model::ExpressionKind;

/// Compile an expression tree into the model's expression graph, returning
/// the root node. Multi-operand operators fold rightwards into binary nodes.
pub fn compile_expression_graph(
    ctx: &mut CompilationContext,
    expr: &Expression,
) -> ExprResult<ExpressionId> {
    match expr {
        Expression::Literal(literal) => Ok(ctx.model.add_expression(ExpressionKind::Literal {
            literal: literal.value.to_string(),
            is_string: literal.value.is_string(),
        })),
        Expression::Noun(np) => {
            let object_type = ctx
                .object_type(&np.term)
                .ok_or_else(|| BinderError::unresolved_term(&np.term))?;
            Ok(ctx.model.add_expression(ExpressionKind::Term { object_type }))
        }
        Expression::Sum(terms) => fold_binary(ctx, "+", terms),
        Expression::Product(factors) => fold_binary(ctx, "*", factors),
        Expression::LogicalAnd(factors) => fold_binary(ctx, "and", factors),
        Expression::LogicalOr(factors) => fold_binary(ctx, "or", factors),
        Expression::Negate(term) => unary(ctx, "0-", term),
        Expression::Reciprocal(factor) => unary(ctx, "1/", factor),
        Expression::LogicalNot(term) => unary(ctx, "not", term),
        Expression::Aggregate {
            operation,
            aggregand,
        } => {
            let operand = compile_expression_graph(ctx, aggregand)?;
            Ok(ctx.model.add_expression(ExpressionKind::Unary {
                operator: operation.clone(),
                operand,
            }))
        }
        Expression::Ternary {
            condition,
            if_true,
            if_false,
        } => {
            let first = compile_expression_graph(ctx, condition)?;
            let second = compile_expression_graph(ctx, if_true)?;
            let third = compile_expression_graph(ctx, if_false)?;
            Ok(ctx.model.add_expression(ExpressionKind::Ternary {
                operator: "?".to_string(),
                first,
                second,
                third,
            }))
        }
        Expression::Comparison(comparison) => {
            let first = compile_expression_graph(ctx, &comparison.lhs)?;
            let second = compile_expression_graph(ctx, &comparison.rhs)?;
            Ok(ctx.model.add_expression(ExpressionKind::Binary {
                operator: comparison.operator.as_str().to_string(),
                first,
                second,
            }))
        }
    }
}

fn unary(ctx: &mut CompilationContext, operator: &str, term: &Expression) -> ExprResult<ExpressionId> {
    let operand = compile_expression_graph(ctx, term)?;
    Ok(ctx.model.add_expression(ExpressionKind::Unary {
        operator: operator.to_string(),
        operand,
    }))
}

fn fold_binary(
    ctx: &mut CompilationContext,
    operator: &str,
    operands: &[Expression],
) -> ExprResult<ExpressionId> {
    match operands {
        [] => Err(ExprError::EmptyOperation {
            text: operator.to_string(),
        }),
        [only] => compile_expression_graph(ctx, only),
        [first, rest @ ..] => {
            let lhs = compile_expression_graph(ctx, first)?;
            let rhs = fold_binary(ctx, operator, rest)?;
            Ok(ctx.model.add_expression(ExpressionKind::Binary {
                operator: operator.to_string(),
                first: lhs,
                second: rhs,
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factum_ast::{Literal, NounPhrase};
    use factum_model::Constellation;

    #[test]
    fn test_sum_folds_rightwards() {
        // GIVEN - a + b + c
        let mut model = Constellation::new("Test");
        model.ensure_value_type("Amount").unwrap();
        let mut ctx = CompilationContext::new(&mut model);
        let expr = Expression::Sum(vec![
            Expression::Noun(NounPhrase::new("Amount")),
            Expression::Noun(NounPhrase::new("Amount")),
            Expression::Literal(Literal::new(1i64)),
        ]);

        // WHEN
        let root = compile_expression_graph(&mut ctx, &expr).unwrap();

        // THEN - the root is a binary '+' whose second operand is another '+'
        match &ctx.model.expression(root).kind {
            ExpressionKind::Binary {
                operator, second, ..
            } => {
                assert_eq!(operator, "+");
                assert!(matches!(
                    &ctx.model.expression(*second).kind,
                    ExpressionKind::Binary { operator, .. } if operator == "+"
                ));
            }
            other => panic!("expected binary root, got {:?}", other),
        }
    }

    #[test]
    fn test_string_literal_keeps_quoted_form() {
        let mut model = Constellation::new("Test");
        let mut ctx = CompilationContext::new(&mut model);
        let expr = Expression::Literal(Literal::new("abc"));

        let root = compile_expression_graph(&mut ctx, &expr).unwrap();

        match &ctx.model.expression(root).kind {
            ExpressionKind::Literal { literal, is_string } => {
                assert_eq!(literal, "'abc'");
                assert!(*is_string);
            }
            other => panic!("expected literal, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_term_in_graph_is_fatal() {
        let mut model = Constellation::new("Test");
        let mut ctx = CompilationContext::new(&mut model);
        let expr = Expression::Noun(NounPhrase::new("Mystery"));

        let result = compile_expression_graph(&mut ctx, &expr);
        assert!(result.is_err());
    }
}
