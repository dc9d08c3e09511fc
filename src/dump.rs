//! `--dump-dt`: prints the merged, pre-analysis document tree in a fixed
//! textual format (§6), grounded on the original tree printer
//! (`printingVisitor.cpp`): one line per node (`Kind <position> key=value
//! ...`), with `|-`/`` `- `` lead-ins and indent continuing as single
//! spaces down the tree.
use crate::ast::{Assignable, BinaryOp, Condition, Expr, ExprKind, Field, FunctionDecl, Instr, InstrKind, Param, Program, StructDecl, UnaryOp, VariantDecl};

struct Dumper {
    out: String,
    indent: usize,
}

/// Renders `program` exactly as `--dump-dt` emits it to standard output.
pub fn dump_program(program: &Program) -> String {
    let mut d = Dumper { out: String::new(), indent: 0 };
    d.program(program);
    d.out
}

impl Dumper {
    fn line(&mut self, indent: bool) {
        if indent {
            self.out.push_str(&" ".repeat(self.indent));
        }
    }

    fn pos(&mut self, position: crate::error::Position) {
        self.out.push_str(&format!("<line: {}, col: {}>", position.line, position.col));
    }

    fn program(&mut self, program: &Program) {
        self.out.push_str("Program containing:\n");

        if !program.structs.is_empty() {
            self.line(true);
            self.out.push_str("Structs:\n");
            let mut names: Vec<&String> = program.structs.keys().collect();
            names.sort();
            let last = names.len() - 1;
            for (i, name) in names.iter().enumerate() {
                self.line(true);
                self.out.push_str(if i == last { "`-" } else { "|-" });
                self.out.push_str(&format!("{name}: "));
                self.struct_decl(&program.structs[*name]);
            }
        }

        if !program.variants.is_empty() {
            self.line(true);
            self.out.push_str("Variants:\n");
            let mut names: Vec<&String> = program.variants.keys().collect();
            names.sort();
            let last = names.len() - 1;
            for (i, name) in names.iter().enumerate() {
                self.line(true);
                self.out.push_str(if i == last { "`-" } else { "|-" });
                self.out.push_str(&format!("{name}: "));
                self.variant_decl(&program.variants[*name]);
            }
        }

        if !program.functions.is_empty() {
            self.line(true);
            self.out.push_str("Functions:\n");
            let mut ids: Vec<_> = program.functions.keys().collect();
            ids.sort_by_key(|id| id.to_string());
            let last = ids.len() - 1;
            for (i, id) in ids.iter().enumerate() {
                self.line(true);
                self.out.push_str(if i == last { "`-" } else { "|-" });
                self.out.push_str(&format!("{}: ", id.name));
                self.function_decl(&program.functions[*id]);
            }
        }
    }

    fn struct_decl(&mut self, decl: &StructDecl) {
        self.out.push_str("StructDeclaration ");
        self.pos(decl.position);
        self.out.push('\n');
        self.indent += 1;
        self.fields(&decl.fields);
        self.indent -= 1;
    }

    fn variant_decl(&mut self, decl: &VariantDecl) {
        self.out.push_str("VariantDeclaration ");
        self.pos(decl.position);
        self.out.push('\n');
        self.indent += 1;
        self.fields(&decl.fields);
        self.indent -= 1;
    }

    fn fields(&mut self, fields: &[Field]) {
        if fields.is_empty() {
            return;
        }
        let last = fields.len() - 1;
        for (i, field) in fields.iter().enumerate() {
            self.line(true);
            self.out.push_str(if i == last { "`-" } else { "|-" });
            self.out.push_str(&format!("Field "));
            self.pos(field.position);
            self.out.push_str(&format!(" type={} name={}\n", field.ty, field.name));
        }
    }

    fn function_decl(&mut self, decl: &FunctionDecl) {
        self.out.push_str("FunctionDeclaration ");
        self.pos(decl.position);
        if let Some(ty) = &decl.return_type {
            self.out.push_str(&format!(" returnType={ty}"));
        }
        self.out.push('\n');
        self.indent += 1;

        if !decl.params.is_empty() {
            self.line(true);
            self.out.push_str("Parameters:\n");
            let last = decl.params.len() - 1;
            for (i, param) in decl.params.iter().enumerate() {
                self.line(true);
                self.out.push_str(if i == last { "`-" } else { "|-" });
                self.param(param);
            }
        }

        if !decl.body.is_empty() {
            self.line(true);
            self.out.push_str("Body:\n");
            self.block(&decl.body);
        }

        self.indent -= 1;
    }

    fn param(&mut self, param: &Param) {
        self.out.push_str("VariableDeclaration ");
        self.pos(param.position);
        self.out.push_str(&format!(" type={} name={} mutable={}\n", param.ty, param.name, param.mutable));
    }

    fn block(&mut self, body: &[Instr]) {
        if body.is_empty() {
            return;
        }
        let last = body.len() - 1;
        for (i, instr) in body.iter().enumerate() {
            self.line(true);
            self.out.push_str(if i == last { "`-" } else { "|-" });
            self.instr(instr);
        }
    }

    fn instr(&mut self, instr: &Instr) {
        match &instr.kind {
            InstrKind::VarDecl { name, ty, mutable, value } => {
                self.out.push_str("VariableDeclStatement ");
                self.pos(instr.position);
                self.out.push('\n');
                self.indent += 1;
                self.line(true);
                self.out.push_str(&format!("|-VariableDeclaration type={ty} name={name} mutable={mutable}\n"));
                self.line(true);
                self.out.push_str("`-");
                self.expr(value);
                self.indent -= 1;
            }
            InstrKind::Assign { target, value } => {
                self.out.push_str("AssignmentStatement ");
                self.pos(instr.position);
                self.out.push('\n');
                self.indent += 1;
                self.line(true);
                self.out.push_str("|-");
                self.assignable(target);
                self.line(true);
                self.out.push_str("`-");
                self.expr(value);
                self.indent -= 1;
            }
            InstrKind::ExprStmt(expr) => self.expr(expr),
            InstrKind::Return(expr) => {
                self.out.push_str("ReturnStatement ");
                self.pos(instr.position);
                self.out.push('\n');
                if let Some(expr) = expr {
                    self.indent += 1;
                    self.line(true);
                    self.out.push_str("`-");
                    self.expr(expr);
                    self.indent -= 1;
                }
            }
            InstrKind::Break => {
                self.out.push_str("BreakStatement ");
                self.pos(instr.position);
                self.out.push('\n');
            }
            InstrKind::Continue => {
                self.out.push_str("ContinueStatement ");
                self.pos(instr.position);
                self.out.push('\n');
            }
            InstrKind::If { branches, else_body } => {
                self.out.push_str("IfStatement ");
                self.pos(instr.position);
                self.out.push('\n');
                self.indent += 1;
                for (cond, body) in branches {
                    self.line(true);
                    self.out.push_str(if body.is_empty() { "`-" } else { "|-" });
                    self.condition(cond);
                    self.block(body);
                }
                if let Some(body) = else_body {
                    self.block(body);
                }
                self.indent -= 1;
            }
            InstrKind::While { cond, body } => {
                self.out.push_str("WhileStatement ");
                self.pos(instr.position);
                self.out.push('\n');
                self.indent += 1;
                self.line(true);
                self.out.push_str(if body.is_empty() { "`-" } else { "|-" });
                self.expr(cond);
                self.block(body);
                self.indent -= 1;
            }
            InstrKind::DoWhile { body, cond } => {
                self.out.push_str("DoWhileStatement ");
                self.pos(instr.position);
                self.out.push('\n');
                self.indent += 1;
                self.line(true);
                self.out.push_str(if body.is_empty() { "`-" } else { "|-" });
                self.expr(cond);
                self.block(body);
                self.indent -= 1;
            }
            InstrKind::Intrinsic(name) => {
                self.out.push_str(&format!("Intrinsic {name}\n"));
            }
        }
    }

    fn condition(&mut self, cond: &Condition) {
        match cond {
            Condition::Expr(expr) => self.expr(expr),
            Condition::Declaration { ty, name, value, position } => {
                self.out.push_str("VariableDeclStatement ");
                self.pos(*position);
                self.out.push('\n');
                self.indent += 1;
                self.line(true);
                self.out.push_str(&format!("|-VariableDeclaration type={ty} name={name} mutable=false\n"));
                self.line(true);
                self.out.push_str("`-");
                self.expr(value);
                self.indent -= 1;
            }
        }
    }

    fn assignable(&mut self, target: &Assignable) {
        self.out.push_str("Assignable ");
        self.pos(target.position);
        self.out.push_str(&format!(" right={}\n", target.path.join(".")));
        self.indent += 1;
        self.line(true);
        self.out.push_str(&format!("`-Variable {}\n", target.base));
        self.indent -= 1;
    }

    fn expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::IntLiteral(v) => self.literal(expr.position, &v.to_string()),
            ExprKind::FloatLiteral(v) => self.literal(expr.position, &v.to_string()),
            ExprKind::BoolLiteral(v) => self.literal(expr.position, &v.to_string()),
            ExprKind::StrLiteral(v) => self.literal(expr.position, v),
            ExprKind::Variable(name) => {
                self.out.push_str("Variable ");
                self.pos(expr.position);
                self.out.push_str(&format!(" name={name}\n"));
            }
            ExprKind::Binary { op, left, right } => self.binary(binary_name(*op), expr.position, left, right),
            ExprKind::Unary { op, operand } => {
                let name = match op {
                    UnaryOp::Neg => "UnaryMinusExpression",
                    UnaryOp::Not => "NotExpression",
                };
                self.unary(name, expr.position, operand);
            }
            ExprKind::IsType { expr: inner, ty } => {
                self.out.push_str(&format!("IsExpression "));
                self.pos(expr.position);
                self.out.push_str(&format!(" type={ty}\n"));
                self.indent += 1;
                self.line(true);
                self.out.push_str("`-");
                self.expr(inner);
                self.indent -= 1;
            }
            ExprKind::Call { name, args } => {
                self.out.push_str("FunctionCall ");
                self.pos(expr.position);
                self.out.push_str(&format!(" functionName={name}\n"));
                self.indent += 1;
                if !args.is_empty() {
                    let last = args.len() - 1;
                    for (i, arg) in args.iter().enumerate() {
                        self.line(true);
                        self.out.push_str(if i == last { "`-" } else { "|-" });
                        self.expr(arg);
                    }
                }
                self.indent -= 1;
            }
            ExprKind::InitList(values) => {
                self.out.push_str("StructExpression ");
                self.pos(expr.position);
                self.out.push('\n');
                self.indent += 1;
                if !values.is_empty() {
                    let last = values.len() - 1;
                    for (i, value) in values.iter().enumerate() {
                        self.line(true);
                        self.out.push_str(if i == last { "`-" } else { "|-" });
                        self.expr(value);
                    }
                }
                self.indent -= 1;
            }
            ExprKind::FieldAccess { base, field } => {
                self.out.push_str("DotExpression ");
                self.pos(expr.position);
                self.out.push_str(&format!(" field={field}\n"));
                self.indent += 1;
                self.line(true);
                self.out.push_str("`-");
                self.expr(base);
                self.indent -= 1;
            }
            ExprKind::Subscript { base, index } => self.binary("SubscriptExpression", expr.position, base, index),
            ExprKind::Cast { target, operand } => {
                self.out.push_str(&format!("CastExpression "));
                self.pos(expr.position);
                self.out.push_str(&format!(" target={target}\n"));
                self.indent += 1;
                self.line(true);
                self.out.push_str("`-");
                self.expr(operand);
                self.indent -= 1;
            }
        }
    }

    fn literal(&mut self, position: crate::error::Position, value: &str) {
        self.out.push_str("Literal ");
        self.pos(position);
        self.out.push_str(&format!(" value={value}\n"));
    }

    fn binary(&mut self, name: &str, position: crate::error::Position, left: &Expr, right: &Expr) {
        self.out.push_str(name);
        self.out.push(' ');
        self.pos(position);
        self.out.push('\n');
        self.indent += 1;
        self.line(true);
        self.out.push_str("|-");
        self.expr(left);
        self.line(true);
        self.out.push_str("`-");
        self.expr(right);
        self.indent -= 1;
    }

    fn unary(&mut self, name: &str, position: crate::error::Position, operand: &Expr) {
        self.out.push_str(name);
        self.out.push(' ');
        self.pos(position);
        self.out.push('\n');
        self.indent += 1;
        self.line(true);
        self.out.push_str("`-");
        self.expr(operand);
        self.indent -= 1;
    }

}

fn binary_name(op: BinaryOp) -> &'static str {
    use BinaryOp::*;
    match op {
        Add => "PlusExpression",
        Sub => "MinusExpression",
        Mul => "MultiplyExpression",
        Div => "DivideExpression",
        FloorDiv => "FloorDivideExpression",
        Mod => "ModuloExpression",
        Pow => "ExponentExpression",
        Eq => "EqualExpression",
        NotEq => "NotEqualExpression",
        Identical => "IdenticalExpression",
        NotIdentical => "NotIdenticalExpression",
        Greater => "GreaterExpression",
        GreaterEq => "GreaterEqualExpression",
        Less => "LesserExpression",
        LessEq => "LesserEqualExpression",
        Or => "OrExpression",
        And => "AndExpression",
        Xor => "XorExpression",
        StrRepeat => "StringMultiplyExpression",
        Concat => "ConcatExpression",
    }
}
