use std::fmt::Write;

use jdec_ir::{Condition, Locals, Statement, TypeError, TypeSignature};

/// Emit a list of statements as Java source text.
pub fn emit_java(stmts: &[Statement]) -> String {
    let mut out = String::new();
    emit_stmts(&mut out, stmts, 0);
    out
}

/// Render a condition as a Java boolean expression.
pub fn emit_condition(condition: &Condition) -> String {
    condition.to_string()
}

/// Emit a static method declaration around `body`. Parameter names come
/// from `locals`, falling back to `local<N>` for undeclared slots.
pub fn emit_method(
    name: &str,
    descriptor: &str,
    locals: &Locals,
    body: &[Statement],
) -> Result<String, TypeError> {
    let (params, ret) = TypeSignature::parse_method(descriptor)?;
    let mut slot = 0u16;
    let mut args = Vec::with_capacity(params.len());
    for param in params {
        let local = locals.resolve(slot, param.clone());
        args.push(format!("{param} {}", local.name));
        slot += param.slot_size();
    }

    let mut out = String::new();
    let _ = writeln!(out, "static {ret} {name}({}) {{", args.join(", "));
    emit_stmts(&mut out, body, 1);
    let _ = writeln!(out, "}}");
    Ok(out)
}

fn emit_stmts(out: &mut String, stmts: &[Statement], indent: usize) {
    for stmt in stmts {
        emit_stmt(out, stmt, indent);
    }
}

fn indent_str(level: usize) -> String {
    "    ".repeat(level)
}

fn emit_stmt(out: &mut String, stmt: &Statement, indent: usize) {
    let pad = indent_str(indent);
    match stmt {
        Statement::LocalAssignment { local, value } => {
            let _ = writeln!(out, "{pad}{local} = {value};");
        }
        Statement::ArrayAssignment {
            array,
            index,
            value,
        } => {
            if array.precedence() < 16 {
                let _ = writeln!(out, "{pad}({array})[{index}] = {value};");
            } else {
                let _ = writeln!(out, "{pad}{array}[{index}] = {value};");
            }
        }
        Statement::Increment { local, amount } => match *amount {
            1 => {
                let _ = writeln!(out, "{pad}{local}++;");
            }
            -1 => {
                let _ = writeln!(out, "{pad}{local}--;");
            }
            n if n < 0 => {
                let _ = writeln!(out, "{pad}{local} -= {};", n.unsigned_abs());
            }
            n => {
                let _ = writeln!(out, "{pad}{local} += {n};");
            }
        },
        Statement::Return(None) => {
            let _ = writeln!(out, "{pad}return;");
        }
        Statement::Return(Some(value)) => {
            let _ = writeln!(out, "{pad}return {value};");
        }
        Statement::If {
            condition,
            body,
            else_body,
        } => {
            let _ = writeln!(out, "{pad}if ({}) {{", emit_condition(condition));
            emit_stmts(out, body, indent + 1);
            if else_body.is_empty() {
                let _ = writeln!(out, "{pad}}}");
            } else {
                let _ = writeln!(out, "{pad}}} else {{");
                emit_stmts(out, else_body, indent + 1);
                let _ = writeln!(out, "{pad}}}");
            }
        }
        Statement::Comment(text) => {
            for line in text.lines() {
                let _ = writeln!(out, "{pad}// {line}");
            }
        }
    }
}
