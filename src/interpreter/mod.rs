//! Tree-walking interpreter (§4.7): executes an analyzed [`Program`].
pub mod builtins;
mod env;
mod value;

pub use value::Value;

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use crate::ast::{
    Assignable, BinaryOp, Condition, Expr, ExprKind, FunctionDecl, FunctionIdentification, Instr, InstrKind, Program, Type, UnaryOp,
};
use crate::error::{Position, RuntimeError, RuntimeErrorKind, WhyResult};
use env::Frame;
use value::{slot, Slot};

/// Bounds unbounded recursion with a runtime error instead of an OS stack
/// overflow (§7).
const MAX_CALL_DEPTH: usize = 2000;

enum Flow {
    Normal,
    Return(Option<Value>),
    Break,
    Continue,
}

pub struct Interpreter<'p> {
    program: &'p Program,
    args: Vec<String>,
    depth: usize,
    /// File of the function currently executing; used to stamp runtime
    /// errors raised from expression evaluation, which otherwise has no
    /// direct line back to a source file (§7).
    current_file: String,
}

impl<'p> Interpreter<'p> {
    pub fn new(program: &'p Program, args: Vec<String>) -> Self {
        Interpreter { program, args, depth: 0, current_file: String::new() }
    }

    pub fn run(&mut self) -> WhyResult<i32> {
        let id = FunctionIdentification::new("main", vec![]);
        let main_fn = self.program.functions.get(&id).ok_or_else(|| {
            RuntimeError::new(RuntimeErrorKind::MainNotFound, "No function 'main' taking zero arguments was found", "<program>", Position::start())
        })?;

        if main_fn.return_type.is_some() {
            return Err(RuntimeError::new(
                RuntimeErrorKind::MainReturnType,
                "Function 'main' must not declare a return type",
                main_fn.file.clone(),
                main_fn.position,
            )
            .into());
        }

        self.call(main_fn, vec![])?;
        Ok(0)
    }

    fn call(&mut self, func: &FunctionDecl, args: Vec<Slot>) -> WhyResult<Value> {
        self.depth += 1;
        if self.depth > MAX_CALL_DEPTH {
            self.depth -= 1;
            return Err(RuntimeError::new(RuntimeErrorKind::StackOverflow, "Recursion limit exceeded", func.file.clone(), func.position).into());
        }

        let mut frame = Frame::new();
        for (param, arg) in func.params.iter().zip(args) {
            frame.declare(param.name.clone(), arg);
        }

        let previous_file = std::mem::replace(&mut self.current_file, func.file.clone());

        let result = if let [Instr { kind: InstrKind::Intrinsic(name), .. }] = func.body.as_slice() {
            self.call_intrinsic(name, &frame, func)
        } else {
            match self.exec_instrs(&func.body, &mut frame) {
                Ok(Flow::Return(Some(value))) => Ok(value),
                Ok(_) => Ok(match &func.return_type {
                    Some(ty) => default_value(ty),
                    None => Value::Bool(false),
                }),
                Err(e) => Err(e),
            }
        };

        self.current_file = previous_file;
        self.depth -= 1;
        result
    }

    fn exec_block(&mut self, instrs: &[Instr], frame: &mut Frame) -> WhyResult<Flow> {
        frame.push_scope();
        let result = self.exec_instrs(instrs, frame);
        frame.pop_scope();
        result
    }

    fn exec_instrs(&mut self, instrs: &[Instr], frame: &mut Frame) -> WhyResult<Flow> {
        for instr in instrs {
            match self.exec_instr(instr, frame)? {
                Flow::Normal => continue,
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_instr(&mut self, instr: &Instr, frame: &mut Frame) -> WhyResult<Flow> {
        match &instr.kind {
            InstrKind::VarDecl { name, value, .. } => {
                let v = self.eval(value, frame)?;
                frame.declare(name.clone(), slot(v));
                Ok(Flow::Normal)
            }
            InstrKind::Assign { target, value } => {
                let v = self.eval(value, frame)?;
                self.assign(target, v, frame);
                Ok(Flow::Normal)
            }
            InstrKind::ExprStmt(expr) => {
                self.eval(expr, frame)?;
                Ok(Flow::Normal)
            }
            InstrKind::Return(expr) => {
                let value = match expr {
                    Some(e) => Some(self.eval(e, frame)?),
                    None => None,
                };
                Ok(Flow::Return(value))
            }
            InstrKind::Break => Ok(Flow::Break),
            InstrKind::Continue => Ok(Flow::Continue),
            InstrKind::If { branches, else_body } => {
                for (cond, body) in branches {
                    frame.push_scope();
                    let taken = self.eval_condition(cond, frame)?;
                    if taken {
                        let flow = self.exec_instrs(body, frame)?;
                        frame.pop_scope();
                        return Ok(flow);
                    }
                    frame.pop_scope();
                }
                match else_body {
                    Some(body) => self.exec_block(body, frame),
                    None => Ok(Flow::Normal),
                }
            }
            InstrKind::While { cond, body } => {
                while self.eval(cond, frame)?.as_bool() {
                    match self.exec_block(body, frame)? {
                        Flow::Break => break,
                        Flow::Continue | Flow::Normal => {}
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                }
                Ok(Flow::Normal)
            }
            InstrKind::DoWhile { body, cond } => {
                loop {
                    match self.exec_block(body, frame)? {
                        Flow::Break => break,
                        Flow::Continue | Flow::Normal => {}
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                    if !self.eval(cond, frame)?.as_bool() {
                        break;
                    }
                }
                Ok(Flow::Normal)
            }
            InstrKind::Intrinsic(name) => unreachable!("intrinsic '{name}' body reached outside call()"),
        }
    }

    /// Evaluates an `if`/`elif` guard. A declaration-condition only binds
    /// its name into `frame` when the narrowing actually matches; the
    /// caller is responsible for popping the scope it was declared in
    /// regardless of the outcome (§4.5.6).
    fn eval_condition(&mut self, cond: &Condition, frame: &mut Frame) -> WhyResult<bool> {
        match cond {
            Condition::Expr(expr) => Ok(self.eval(expr, frame)?.as_bool()),
            Condition::Declaration { ty, name, value, .. } => {
                let v = self.eval(value, frame)?;
                if let Value::Variant { type_name, field_name, value: inner } = &v {
                    let decl = self.program.variants.get(type_name).expect("variant type exists after semantic analysis");
                    let narrows = decl.fields.iter().any(|f| &f.ty == ty && f.name == *field_name);
                    if narrows {
                        frame.declare(name.clone(), inner.clone());
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn assign(&mut self, target: &Assignable, value: Value, frame: &mut Frame) {
        let base = frame.get(&target.base).expect("semantic analysis guarantees the variable exists");

        if target.path.is_empty() {
            *base.borrow_mut() = value;
            return;
        }

        let mut current = base;
        for field in &target.path[..target.path.len() - 1] {
            let next = field_slot(&current, field);
            current = next;
        }
        let last = target.path.last().unwrap();
        let target_slot = field_slot(&current, last);
        *target_slot.borrow_mut() = value;
    }

    fn eval(&mut self, expr: &Expr, frame: &mut Frame) -> WhyResult<Value> {
        match &expr.kind {
            ExprKind::IntLiteral(v) => Ok(Value::Int(*v)),
            ExprKind::FloatLiteral(v) => Ok(Value::Float(*v)),
            ExprKind::BoolLiteral(v) => Ok(Value::Bool(*v)),
            ExprKind::StrLiteral(v) => Ok(Value::Str(v.clone())),
            ExprKind::Variable(name) => {
                let slot = frame.get(name).expect("semantic analysis guarantees the variable exists");
                let value = slot.borrow().clone();
                Ok(value)
            }
            ExprKind::Binary { op, left, right } => {
                let l = self.eval(left, frame)?;
                let r = self.eval(right, frame)?;
                eval_binary(*op, l, r, expr.position, &self.current_file)
            }
            ExprKind::Unary { op, operand } => {
                let v = self.eval(operand, frame)?;
                Ok(match (op, v) {
                    (UnaryOp::Neg, Value::Int(i)) => Value::Int(-i),
                    (UnaryOp::Neg, Value::Float(f)) => Value::Float(-f),
                    (UnaryOp::Not, Value::Bool(b)) => Value::Bool(!b),
                    _ => unreachable!("semantic analysis guarantees operand type matches the unary operator"),
                })
            }
            ExprKind::IsType { expr: inner, ty } => {
                let v = self.eval(inner, frame)?;
                match v {
                    Value::Variant { type_name, field_name, .. } => {
                        let decl = self.program.variants.get(&type_name).expect("variant type exists");
                        let matches = decl.fields.iter().any(|f| &f.ty == ty && f.name == field_name);
                        Ok(Value::Bool(matches))
                    }
                    _ => unreachable!("semantic analysis guarantees 'is' is only used on a variant"),
                }
            }
            ExprKind::Call { name, args } => self.eval_call(name, args, frame),
            ExprKind::InitList(values) => self.eval_init_list(expr, values, frame),
            ExprKind::FieldAccess { base, field } => {
                let base_value = self.eval(base, frame)?;
                match base_value {
                    Value::Struct { fields, .. } => {
                        let slot = fields.borrow().get(field).cloned().expect("semantic analysis guarantees the field exists");
                        Ok(slot.borrow().clone())
                    }
                    _ => unreachable!("semantic analysis guarantees field access targets a struct"),
                }
            }
            ExprKind::Subscript { base, index } => {
                let base_v = self.eval(base, frame)?;
                let index_v = self.eval(index, frame)?;
                let (s, i) = (base_v.as_str(), index_v.as_int());
                let ch = usize::try_from(i)
                    .ok()
                    .and_then(|i| s.chars().nth(i))
                    .ok_or_else(|| RuntimeError::new(RuntimeErrorKind::OperatorArgument, format!("String index {i} out of range"), self.current_file.clone(), expr.position))?;
                Ok(Value::Str(ch.to_string()))
            }
            ExprKind::Cast { target, operand } => {
                let v = self.eval(operand, frame)?;
                cast_value(target, v, expr.position, &self.current_file)
            }
        }
    }

    fn eval_call(&mut self, name: &str, args: &[Expr], frame: &mut Frame) -> WhyResult<Value> {
        // Copying the `&'p Program` reference out of `self` (references are
        // `Copy`) keeps lookups independent of the `&mut self` borrow that
        // evaluating arguments and calling functions needs below.
        let program = self.program;

        if let Some(decl) = program.variants.get(name) {
            let value = self.eval(&args[0], frame)?;
            let value_ty = value.ty();
            let field = decl.fields.iter().find(|f| f.ty == value_ty).expect("semantic analysis guarantees a matching variant field");
            return Ok(Value::Variant { type_name: name.to_owned(), field_name: field.name.clone(), value: slot(value) });
        }

        let arg_values: Vec<Value> = args.iter().map(|a| self.eval(a, frame)).collect::<WhyResult<_>>()?;
        let id = FunctionIdentification::new(name.to_owned(), arg_values.iter().map(Value::ty).collect());
        let func = program.functions.get(&id).unwrap_or_else(|| panic!("semantic analysis guarantees a matching overload exists for {id}"));

        let mut slots = Vec::with_capacity(args.len());
        for (i, arg_expr) in args.iter().enumerate() {
            let aliased = if func.params[i].mutable {
                match &arg_expr.kind {
                    ExprKind::Variable(var_name) => frame.get(var_name),
                    _ => None,
                }
            } else {
                None
            };
            match aliased {
                Some(existing) => slots.push(existing),
                None => slots.push(slot(arg_values[i].clone())),
            }
        }

        self.call(func, slots)
    }

    /// A bare `{ expr, ... }` always constructs a struct; semantic analysis
    /// already resolved which one and recorded it as `expr.ty`.
    fn eval_init_list(&mut self, expr: &Expr, values: &[Expr], frame: &mut Frame) -> WhyResult<Value> {
        let type_name = match &expr.ty {
            Some(Type::Named(name)) => name.clone(),
            _ => unreachable!("semantic analysis guarantees a struct literal carries its resolved type"),
        };
        let program = self.program;
        let decl = program.structs.get(&type_name).expect("semantic analysis guarantees the literal's type names a struct");

        let mut map = HashMap::new();
        for (field, value_expr) in decl.fields.iter().zip(values) {
            let v = self.eval(value_expr, frame)?;
            map.insert(field.name.clone(), slot(v));
        }
        Ok(Value::Struct { type_name, fields: Rc::new(RefCell::new(map)) })
    }

}

fn field_slot(owner: &Slot, field: &str) -> Slot {
    let borrowed = owner.borrow();
    match &*borrowed {
        Value::Struct { fields, .. } => fields.borrow().get(field).cloned().expect("semantic analysis guarantees the field exists"),
        _ => unreachable!("semantic analysis guarantees dotted assignment targets a struct"),
    }
}

fn default_value(ty: &Type) -> Value {
    match ty {
        Type::Int => Value::Int(0),
        Type::Float => Value::Float(0.0),
        Type::Bool => Value::Bool(false),
        Type::Str => Value::Str(String::new()),
        Type::Named(_) => panic!("a function with a named return type must always return explicitly"),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Struct { type_name: t1, fields: f1 }, Value::Struct { type_name: t2, fields: f2 }) => {
            t1 == t2
                && f1.borrow().len() == f2.borrow().len()
                && f1.borrow().iter().all(|(k, v)| f2.borrow().get(k).map(|other| values_equal(&v.borrow(), &other.borrow())).unwrap_or(false))
        }
        (Value::Variant { type_name: t1, field_name: n1, value: v1 }, Value::Variant { type_name: t2, field_name: n2, value: v2 }) => {
            t1 == t2 && n1 == n2 && values_equal(&v1.borrow(), &v2.borrow())
        }
        _ => false,
    }
}

/// `===`/`!==` compare which case is active, not the payload, for
/// variants; for everything else they agree with `==`/`!=` (§4.5, GLOSSARY).
fn values_identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Variant { type_name: t1, field_name: n1, .. }, Value::Variant { type_name: t2, field_name: n2, .. }) => t1 == t2 && n1 == n2,
        (Value::Struct { type_name: t1, fields: f1 }, Value::Struct { type_name: t2, fields: f2 }) => t1 == t2 && Rc::ptr_eq(f1, f2),
        _ => values_equal(a, b),
    }
}

fn eval_binary(op: BinaryOp, l: Value, r: Value, position: Position, file: &str) -> WhyResult<Value> {
    use BinaryOp::*;

    let overflow = |what: &str| -> crate::error::WhyError {
        RuntimeError::new(RuntimeErrorKind::IntegerRange, format!("{what} overflowed the 32-bit integer range"), file.to_owned(), position).into()
    };
    let zero_division = || -> crate::error::WhyError { RuntimeError::new(RuntimeErrorKind::ZeroDivision, "Division by zero", file.to_owned(), position).into() };
    let bad_operand = |what: &str| -> crate::error::WhyError {
        RuntimeError::new(RuntimeErrorKind::OperatorArgument, what.to_owned(), file.to_owned(), position).into()
    };

    Ok(match (op, l, r) {
        (Eq, a, b) => Value::Bool(values_equal(&a, &b)),
        (NotEq, a, b) => Value::Bool(!values_equal(&a, &b)),
        (Identical, a, b) => Value::Bool(values_identical(&a, &b)),
        (NotIdentical, a, b) => Value::Bool(!values_identical(&a, &b)),

        (Add, Value::Int(a), Value::Int(b)) => Value::Int(a.checked_add(b).ok_or_else(|| overflow("Integer addition"))?),
        (Add, Value::Float(a), Value::Float(b)) => Value::Float(a + b),
        (Add, Value::Str(a), Value::Str(b)) => Value::Str(a + &b),
        (Sub, Value::Int(a), Value::Int(b)) => Value::Int(a.checked_sub(b).ok_or_else(|| overflow("Integer subtraction"))?),
        (Sub, Value::Float(a), Value::Float(b)) => Value::Float(a - b),
        (Mul, Value::Int(a), Value::Int(b)) => Value::Int(a.checked_mul(b).ok_or_else(|| overflow("Integer multiplication"))?),
        (Mul, Value::Float(a), Value::Float(b)) => Value::Float(a * b),

        (Div, Value::Int(a), Value::Int(b)) => {
            if b == 0 {
                return Err(zero_division());
            }
            Value::Int(a.wrapping_div(b))
        }
        (Div, Value::Float(a), Value::Float(b)) => {
            if b == 0.0 {
                return Err(zero_division());
            }
            Value::Float(a / b)
        }
        (FloorDiv, Value::Int(a), Value::Int(b)) => {
            if b == 0 {
                return Err(zero_division());
            }
            Value::Int(a.div_euclid(b))
        }
        (Mod, Value::Int(a), Value::Int(b)) => {
            if b == 0 {
                return Err(zero_division());
            }
            Value::Int(a.rem_euclid(b))
        }
        (Pow, Value::Int(a), Value::Int(b)) => {
            if b < 0 {
                return Err(bad_operand("Integer exponent must not be negative"));
            }
            Value::Int(a.checked_pow(b as u32).ok_or_else(|| overflow("Integer exponentiation"))?)
        }
        (Pow, Value::Float(a), Value::Float(b)) => Value::Float(a.powf(b)),

        (Greater, Value::Int(a), Value::Int(b)) => Value::Bool(a > b),
        (Greater, Value::Float(a), Value::Float(b)) => Value::Bool(a > b),
        (Greater, Value::Str(a), Value::Str(b)) => Value::Bool(a > b),
        (GreaterEq, Value::Int(a), Value::Int(b)) => Value::Bool(a >= b),
        (GreaterEq, Value::Float(a), Value::Float(b)) => Value::Bool(a >= b),
        (GreaterEq, Value::Str(a), Value::Str(b)) => Value::Bool(a >= b),
        (Less, Value::Int(a), Value::Int(b)) => Value::Bool(a < b),
        (Less, Value::Float(a), Value::Float(b)) => Value::Bool(a < b),
        (Less, Value::Str(a), Value::Str(b)) => Value::Bool(a < b),
        (LessEq, Value::Int(a), Value::Int(b)) => Value::Bool(a <= b),
        (LessEq, Value::Float(a), Value::Float(b)) => Value::Bool(a <= b),
        (LessEq, Value::Str(a), Value::Str(b)) => Value::Bool(a <= b),

        (Or, Value::Bool(a), Value::Bool(b)) => Value::Bool(a || b),
        (And, Value::Bool(a), Value::Bool(b)) => Value::Bool(a && b),
        (Xor, Value::Bool(a), Value::Bool(b)) => Value::Bool(a ^ b),

        (Concat, Value::Str(a), Value::Str(b)) => Value::Str(a + &b),

        (StrRepeat, Value::Str(s), Value::Int(n)) => {
            if n < 0 {
                return Err(bad_operand("String repeat count must not be negative"));
            }
            Value::Str(s.repeat(n as usize))
        }

        (op, l, r) => unreachable!("semantic analysis guarantees operand types match operator {op:?}, got {l:?} and {r:?}"),
    })
}

/// Word used in cast-failure messages, matching the exact wording produced
/// for a failed string parse (§4.5.8, §8 scenario 1).
fn type_word(ty: &Type) -> &'static str {
    match ty {
        Type::Int => "integer",
        Type::Float => "float",
        Type::Bool => "boolean",
        Type::Str => "string",
        Type::Named(_) => "value",
    }
}

/// Any primitive may be explicitly (or, where the target is wider,
/// implicitly) constructed from any other primitive (§4.5.8). Parsing a
/// string that doesn't hold the target's shape fails with `CastImpossible`
/// rather than silently defaulting.
fn cast_value(target: &Type, value: Value, position: Position, file: &str) -> WhyResult<Value> {
    use Type::*;

    let parse_failed = |s: &str, target: &Type| -> crate::error::WhyError {
        RuntimeError::new(RuntimeErrorKind::CastImpossible, format!("Conversion of string {s} to {} failed", type_word(target)), file.to_owned(), position).into()
    };

    Ok(match (target, &value) {
        (Int, Value::Int(_)) => value,
        (Int, Value::Bool(b)) => Value::Int(*b as i32),
        (Int, Value::Float(f)) => Value::Int(*f as i32),
        (Int, Value::Str(s)) => Value::Int(s.trim().parse().map_err(|_| parse_failed(s, target))?),

        (Float, Value::Float(_)) => value,
        (Float, Value::Int(i)) => Value::Float(*i as f64),
        (Float, Value::Bool(b)) => Value::Float(if *b { 1.0 } else { 0.0 }),
        (Float, Value::Str(s)) => Value::Float(s.trim().parse().map_err(|_| parse_failed(s, target))?),

        (Bool, Value::Bool(_)) => value,
        (Bool, Value::Int(i)) => Value::Bool(*i != 0),
        (Bool, Value::Float(f)) => Value::Bool(*f != 0.0),
        (Bool, Value::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(parse_failed(s, target)),
        },

        (Str, Value::Str(_)) => value,
        (Str, Value::Int(i)) => Value::Str(i.to_string()),
        (Str, Value::Float(f)) => Value::Str(f.to_string()),
        (Str, Value::Bool(b)) => Value::Str(b.to_string()),

        _ => {
            return Err(RuntimeError::new(RuntimeErrorKind::CastImpossible, format!("Cannot cast {} to {target}", value.ty()), file.to_owned(), position).into());
        }
    })
}

impl<'p> Interpreter<'p> {
    fn call_intrinsic(&mut self, name: &str, frame: &Frame, func: &FunctionDecl) -> WhyResult<Value> {
        let get = |n: &str| frame.get(n).expect("builtin parameter is always bound");

        match name {
            "no_arguments" => Ok(Value::Int(self.args.len() as i32)),
            "argument" => {
                let idx = get("index").borrow().as_int();
                match usize::try_from(idx).ok().and_then(|i| self.args.get(i)) {
                    Some(value) => Ok(Value::Str(value.clone())),
                    None => Err(RuntimeError::new(
                        RuntimeErrorKind::BuiltinFunctionArgument,
                        format!("No command-line argument at index {idx}"),
                        func.file.clone(),
                        func.position,
                    )
                    .into()),
                }
            }
            "print" => {
                let text = get("value").borrow().as_str().to_owned();
                print!("{text}");
                io::stdout()
                    .flush()
                    .map_err(|e| RuntimeError::new(RuntimeErrorKind::StandardOutput, e.to_string(), func.file.clone(), func.position))?;
                Ok(Value::Bool(true))
            }
            "println" => {
                let text = get("value").borrow().as_str().to_owned();
                println!("{text}");
                Ok(Value::Bool(true))
            }
            "input" => {
                if let Some(n) = frame.get("n") {
                    let n = n.borrow().as_int();
                    if n < 0 {
                        return Err(RuntimeError::new(
                            RuntimeErrorKind::BuiltinFunctionArgument,
                            format!("'input' character count must not be negative, got {n}"),
                            func.file.clone(),
                            func.position,
                        )
                        .into());
                    }
                    let mut stdin = io::stdin().lock();
                    let mut out = String::new();
                    let mut byte = [0u8; 1];
                    use std::io::Read;
                    for _ in 0..n {
                        match stdin.read(&mut byte) {
                            Ok(0) => break,
                            Ok(_) => out.push(byte[0] as char),
                            Err(e) => return Err(RuntimeError::new(RuntimeErrorKind::StandardInput, e.to_string(), func.file.clone(), func.position).into()),
                        }
                    }
                    return Ok(Value::Str(out));
                }
                let mut line = String::new();
                io::stdin()
                    .lock()
                    .read_line(&mut line)
                    .map_err(|e| RuntimeError::new(RuntimeErrorKind::StandardInput, e.to_string(), func.file.clone(), func.position))?;
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Ok(Value::Str(line))
            }
            "len" => {
                let text = get("value").borrow().as_str().to_owned();
                Ok(Value::Int(text.chars().count() as i32))
            }
            "abs" => Ok(match &*get("value").borrow() {
                Value::Int(i) => Value::Int(i.abs()),
                Value::Float(f) => Value::Float(f.abs()),
                _ => unreachable!(),
            }),
            "min" => {
                let a = get("a");
                let b = get("b");
                Ok(match (&*a.borrow(), &*b.borrow()) {
                    (Value::Int(x), Value::Int(y)) => Value::Int(*x.min(y)),
                    (Value::Float(x), Value::Float(y)) => Value::Float(x.min(*y)),
                    _ => unreachable!(),
                })
            }
            "max" => {
                let a = get("a");
                let b = get("b");
                Ok(match (&*a.borrow(), &*b.borrow()) {
                    (Value::Int(x), Value::Int(y)) => Value::Int(*x.max(y)),
                    (Value::Float(x), Value::Float(y)) => Value::Float(x.max(*y)),
                    _ => unreachable!(),
                })
            }
            other => unreachable!("unknown builtin '{other}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::start()
    }

    #[test]
    fn str_to_int_parses_trimmed() {
        let v = cast_value(&Type::Int, Value::Str(" 42 ".into()), pos(), "test").unwrap();
        assert_eq!(v, Value::Int(42));
    }

    #[test]
    fn str_to_int_failure_reports_exact_message() {
        let err = cast_value(&Type::Int, Value::Str("abc".into()), pos(), "test").unwrap_err();
        assert!(format!("{err}").contains("Conversion of string abc to integer failed"));
    }

    #[test]
    fn int_to_bool_is_nonzero() {
        assert_eq!(cast_value(&Type::Bool, Value::Int(0), pos(), "test").unwrap(), Value::Bool(false));
        assert_eq!(cast_value(&Type::Bool, Value::Int(-3), pos(), "test").unwrap(), Value::Bool(true));
    }

    #[test]
    fn int_to_str_uses_canonical_formatting() {
        assert_eq!(cast_value(&Type::Str, Value::Int(7), pos(), "test").unwrap(), Value::Str("7".into()));
    }
}
