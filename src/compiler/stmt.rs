use std::collections::HashSet;

use crate::{
    ast::{
        ast::{Expr, Stmt},
        statements::{AssignmentStmt, BlockStmt, FnDeclStmt, IfStmt, WhileStmt},
    },
    errors::errors::Error,
};

use super::{compiler::Compiler, expr::gen_expression, targets::TargetLanguage};

pub fn gen_statement(compiler: &mut Compiler, statement: &Stmt) -> Result<(), Error> {
    match statement {
        Stmt::Expression(stmt) => {
            if compiler.target == TargetLanguage::Java && !matches!(stmt.expression, Expr::Call(_)) {
                return Err(compiler.unsupported(
                    String::from("an expression statement that is not a call"),
                    stmt.span.start,
                ));
            }
            let expression = gen_expression(compiler, &stmt.expression)?;
            let line = terminated(compiler, expression);
            compiler.line(&line);
        }
        Stmt::Assignment(stmt) => gen_assignment(compiler, stmt)?,
        Stmt::Block(block) => match compiler.target {
            // Python has no bare blocks; the statements join the enclosing suite.
            TargetLanguage::Python => {
                for stmt in block.iter() {
                    gen_statement(compiler, stmt)?;
                }
            }
            _ => {
                compiler.line("{");
                gen_block(compiler, block)?;
                compiler.line("}");
            }
        },
        Stmt::If(stmt) => gen_if(compiler, stmt, false)?,
        Stmt::While(stmt) => gen_while(compiler, stmt)?,
        Stmt::FnDecl(decl) => {
            if compiler.target.is_static() {
                return Err(compiler.unsupported(
                    format!("nested function declaration `{}`", decl.name),
                    decl.span.start,
                ));
            }
            gen_fn_decl(compiler, decl)?;
        }
        Stmt::Return(stmt) => {
            let line = match &stmt.value {
                Some(value) => {
                    let value = gen_expression(compiler, value)?;
                    format!("return {}", value)
                }
                None => String::from("return"),
            };
            let line = terminated(compiler, line);
            compiler.line(&line);
        }
    }

    Ok(())
}

/// Appends the statement terminator where the target needs one.
fn terminated(compiler: &Compiler, line: String) -> String {
    match compiler.target {
        TargetLanguage::Python => line,
        _ => format!("{};", line),
    }
}

fn gen_assignment(compiler: &mut Compiler, stmt: &AssignmentStmt) -> Result<(), Error> {
    let value = gen_expression(compiler, &stmt.value)?;
    let name = stmt.identifier.as_str();

    let line = if compiler.needs_declaration(name) {
        compiler.declare(name);
        match compiler.target {
            TargetLanguage::Python => format!("{} = {}", name, value),
            TargetLanguage::JavaScript => format!("let {} = {};", name, value),
            TargetLanguage::Java | TargetLanguage::Cpp => {
                let slot = compiler
                    .types
                    .declared_type(&stmt.span)
                    .flatten()
                    .or_else(|| compiler.types.expr_type(&stmt.value));
                format!("{} {} = {};", compiler.local_type(slot), name, value)
            }
        }
    } else {
        terminated(compiler, format!("{} = {}", name, value))
    };

    compiler.line(&line);
    Ok(())
}

/// Emits the statements of `block` one level deeper, in a scope of their own.
fn gen_block(compiler: &mut Compiler, block: &BlockStmt) -> Result<(), Error> {
    compiler.push_scope();
    let result = compiler.indented(|compiler| {
        let before = compiler.written_len();
        for stmt in block.iter() {
            gen_statement(compiler, stmt)?;
        }
        if compiler.target == TargetLanguage::Python && compiler.written_len() == before {
            compiler.line("pass");
        }
        Ok(())
    });
    compiler.pop_scope();
    result
}

fn gen_if(compiler: &mut Compiler, stmt: &IfStmt, chained: bool) -> Result<(), Error> {
    let condition = gen_expression(compiler, &stmt.condition)?;
    let python = compiler.target == TargetLanguage::Python;

    let opening = match (python, chained) {
        (true, false) => format!("if {}:", condition),
        (true, true) => format!("elif {}:", condition),
        (false, false) => format!("if ({}) {{", condition),
        (false, true) => format!("}} else if ({}) {{", condition),
    };
    compiler.line(&opening);
    gen_block(compiler, &stmt.then_body)?;

    match stmt.else_body.as_deref() {
        Some(Stmt::If(next)) => return gen_if(compiler, next, true),
        Some(Stmt::Block(block)) => {
            compiler.line(if python { "else:" } else { "} else {" });
            gen_block(compiler, block)?;
        }
        Some(other) => {
            compiler.line(if python { "else:" } else { "} else {" });
            let block = BlockStmt {
                body: vec![other.clone()],
                span: *other.get_span(),
            };
            gen_block(compiler, &block)?;
        }
        None => {}
    }

    if !python {
        compiler.line("}");
    }
    Ok(())
}

fn gen_while(compiler: &mut Compiler, stmt: &WhileStmt) -> Result<(), Error> {
    let condition = gen_expression(compiler, &stmt.condition)?;

    if compiler.target == TargetLanguage::Python {
        compiler.line(&format!("while {}:", condition));
        gen_block(compiler, &stmt.body)
    } else {
        compiler.line(&format!("while ({}) {{", condition));
        gen_block(compiler, &stmt.body)?;
        compiler.line("}");
        Ok(())
    }
}

/// Parameter list and return type as a typed target spells them.
fn typed_signature(compiler: &Compiler, decl: &FnDeclStmt) -> (String, String) {
    let signature = compiler.types.function(&decl.name);

    let parameters = decl
        .parameters
        .iter()
        .map(|parameter| {
            let slot = signature.and_then(|signature| signature.parameter(parameter)).flatten();
            format!("{} {}", compiler.signature_type(slot), parameter)
        })
        .collect::<Vec<String>>()
        .join(", ");
    let return_type = compiler.signature_type(signature.and_then(|signature| signature.return_type));

    (parameters, return_type.to_string())
}

/// A forward declaration, for C++ functions whose signature has no placeholder.
pub fn cpp_prototype(compiler: &Compiler, decl: &FnDeclStmt) -> Option<String> {
    let (parameters, return_type) = typed_signature(compiler, decl);
    let placeholder = compiler.target.signature_placeholder();

    let known = return_type != placeholder
        && !parameters
            .split(", ")
            .any(|parameter| parameter.starts_with(&format!("{} ", placeholder)));
    known.then(|| format!("{} {}({});", return_type, decl.name, parameters))
}

pub fn gen_fn_decl(compiler: &mut Compiler, decl: &FnDeclStmt) -> Result<(), Error> {
    let position = decl.span.start;
    let target = compiler.target;

    if target.is_static() {
        if let Some(captured) = compiler
            .types
            .function(&decl.name)
            .and_then(|signature| signature.captures.iter().next())
        {
            return Err(compiler.unsupported(
                format!("function `{}` using top-level variable `{}`", decl.name, captured),
                position,
            ));
        }
    }

    let opening = match target {
        TargetLanguage::Python => format!("def {}({}):", decl.name, decl.parameters.join(", ")),
        TargetLanguage::JavaScript => {
            format!("function {}({}) {{", decl.name, decl.parameters.join(", "))
        }
        TargetLanguage::Java => {
            let (parameters, return_type) = typed_signature(compiler, decl);
            format!("static {} {}({}) {{", return_type, decl.name, parameters)
        }
        TargetLanguage::Cpp => {
            let (parameters, return_type) = typed_signature(compiler, decl);
            format!("{} {}({}) {{", return_type, decl.name, parameters)
        }
    };
    compiler.line(&opening);

    let caller = compiler.current_function.replace(decl.name.clone());
    let parameters: HashSet<String> = decl.parameters.iter().cloned().collect();
    let outer_scopes = if target.is_static() {
        Some(compiler.replace_scopes(vec![parameters]))
    } else {
        compiler.push_scope();
        for parameter in &decl.parameters {
            compiler.declare(parameter);
        }
        None
    };

    let result = compiler.indented(|compiler| {
        if target == TargetLanguage::Python {
            if let Some(signature) = compiler.current_signature() {
                let globals: Vec<String> = signature.global_writes.iter().cloned().collect();
                let nonlocals: Vec<String> = signature.nonlocal_writes.iter().cloned().collect();
                if !globals.is_empty() {
                    compiler.line(&format!("global {}", globals.join(", ")));
                }
                if !nonlocals.is_empty() {
                    compiler.line(&format!("nonlocal {}", nonlocals.join(", ")));
                }
            }
        }
        Ok(())
    });

    let result = result.and_then(|_| gen_block_inline(compiler, &decl.body));

    match outer_scopes {
        Some(scopes) => {
            compiler.replace_scopes(scopes);
        }
        None => compiler.pop_scope(),
    }
    compiler.current_function = caller;
    result?;

    if target != TargetLanguage::Python {
        compiler.line("}");
    }
    Ok(())
}

/// A function body: one level deeper, sharing the parameter scope.
fn gen_block_inline(compiler: &mut Compiler, block: &BlockStmt) -> Result<(), Error> {
    compiler.indented(|compiler| {
        let before = compiler.written_len();
        for stmt in block.iter() {
            gen_statement(compiler, stmt)?;
        }
        if compiler.target == TargetLanguage::Python && compiler.written_len() == before {
            compiler.line("pass");
        }
        Ok(())
    })
}
