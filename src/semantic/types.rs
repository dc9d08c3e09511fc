//! Conversion and operator typing rules shared by assignment checking and
//! overload resolution (§4.5.8, §4.5.9).
use crate::ast::{BinaryOp, Expr, Type, UnaryOp};
use crate::error::{PipelineError, PipelineErrorKind, Position, WhyResult};

/// Rank along the single implicit-widening chain `bool < int < float < str`.
/// `None` for named types, which never implicitly convert.
fn rank(ty: &Type) -> Option<u8> {
    match ty {
        Type::Bool => Some(0),
        Type::Int => Some(1),
        Type::Float => Some(2),
        Type::Str => Some(3),
        Type::Named(_) => None,
    }
}

/// `Some(distance)` if `from` converts to `to` (any primitive may be cast
/// to any other, in either direction; §4.5.8), `None` if one side is a
/// named type. Distance is chain steps apart, used by overload resolution
/// to prefer the closest match; it says nothing about legality, which is
/// unconditional for primitives.
pub fn cast_needed(from: &Type, to: &Type) -> Option<u8> {
    if from == to {
        return Some(0);
    }
    match (rank(from), rank(to)) {
        (Some(f), Some(t)) => Some(f.abs_diff(t)),
        _ => None,
    }
}

/// Same rule, named for its use at a call site: is `arg` an acceptable
/// argument for a parameter declared `param`, and how far is it from exact?
pub fn arg_distance(arg: &Type, param: &Type) -> Option<u8> {
    cast_needed(arg, param)
}

fn numeric(ty: &Type) -> bool {
    matches!(ty, Type::Int | Type::Float)
}

/// Widens whichever of `left`/`right` is the narrower numeric operand,
/// returning the common type both now share.
fn promote_numeric(lt: &Type, rt: &Type, left: &mut Expr, right: &mut Expr) -> Option<Type> {
    if lt == rt {
        return Some(lt.clone());
    }
    if !numeric(lt) || !numeric(rt) {
        return None;
    }
    match (lt, rt) {
        (Type::Int, Type::Float) => {
            super::wrap_cast(left, Type::Float);
            Some(Type::Float)
        }
        (Type::Float, Type::Int) => {
            super::wrap_cast(right, Type::Float);
            Some(Type::Float)
        }
        _ => Some(lt.clone()),
    }
}

pub fn binary_result_type(op: BinaryOp, lt: &Type, rt: &Type, left: &mut Expr, right: &mut Expr, position: Position, file: &str) -> WhyResult<Type> {
    use BinaryOp::*;
    let bad = |what: &str| -> WhyResult<Type> { Err(PipelineError::new(PipelineErrorKind::InvalidOperatorArgs, what.to_owned(), file.to_owned(), position).into()) };

    match op {
        Add | Sub | Mul | Div | FloorDiv | Mod | Pow => match promote_numeric(lt, rt, left, right) {
            Some(ty) => Ok(ty),
            None => bad(&format!("Operator requires two numeric operands, got '{lt}' and '{rt}'")),
        },
        Greater | GreaterEq | Less | LessEq => match promote_numeric(lt, rt, left, right) {
            Some(_) => Ok(Type::Bool),
            None => bad(&format!("Comparison requires two numeric operands, got '{lt}' and '{rt}'")),
        },
        Eq | NotEq => match promote_numeric(lt, rt, left, right) {
            Some(_) => Ok(Type::Bool),
            None if lt == rt => Ok(Type::Bool),
            None => bad(&format!("Cannot compare '{lt}' with '{rt}'")),
        },
        Identical | NotIdentical => {
            if lt != rt {
                return bad(&format!("'===' requires both operands to have the same declared type, got '{lt}' and '{rt}'"));
            }
            Ok(Type::Bool)
        }
        Or | And | Xor => {
            if *lt != Type::Bool || *rt != Type::Bool {
                return bad(&format!("'{op:?}' requires two 'bool' operands, got '{lt}' and '{rt}'"));
            }
            Ok(Type::Bool)
        }
        StrRepeat => {
            if *lt != Type::Str || *rt != Type::Int {
                return bad(&format!("'@' requires a 'str' and an 'int' operand, got '{lt}' and '{rt}'"));
            }
            Ok(Type::Str)
        }
        Concat => {
            if matches!(lt, Type::Named(_)) || matches!(rt, Type::Named(_)) {
                return bad(&format!("'!' requires two primitive operands, got '{lt}' and '{rt}'"));
            }
            if *lt != Type::Str {
                super::wrap_cast(left, Type::Str);
            }
            if *rt != Type::Str {
                super::wrap_cast(right, Type::Str);
            }
            Ok(Type::Str)
        }
    }
}

pub fn unary_result_type(op: UnaryOp, operand_ty: &Type, position: Position, file: &str) -> WhyResult<Type> {
    match op {
        UnaryOp::Neg => {
            if numeric(operand_ty) {
                Ok(operand_ty.clone())
            } else {
                Err(PipelineError::new(PipelineErrorKind::InvalidOperatorArgs, format!("Unary '-' requires a numeric operand, got '{operand_ty}'"), file.to_owned(), position).into())
            }
        }
        UnaryOp::Not => {
            if *operand_ty == Type::Bool {
                Ok(Type::Bool)
            } else {
                Err(PipelineError::new(PipelineErrorKind::InvalidOperatorArgs, format!("Unary '!' requires a 'bool' operand, got '{operand_ty}'"), file.to_owned(), position).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cast_is_legal_in_both_directions() {
        assert_eq!(cast_needed(&Type::Str, &Type::Int), Some(2));
        assert_eq!(cast_needed(&Type::Int, &Type::Str), Some(2));
        assert_eq!(cast_needed(&Type::Bool, &Type::Float), Some(2));
        assert_eq!(cast_needed(&Type::Float, &Type::Bool), Some(2));
    }

    #[test]
    fn identical_types_need_no_cast() {
        assert_eq!(cast_needed(&Type::Int, &Type::Int), Some(0));
    }

    #[test]
    fn named_types_never_convert() {
        assert_eq!(cast_needed(&Type::Named("Point".into()), &Type::Int), None);
        assert_eq!(cast_needed(&Type::Int, &Type::Named("Point".into())), None);
    }
}
