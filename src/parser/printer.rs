//! Indented text rendering of the AST, used by `--dump-ast`
//!
//! ```text
//! module
//!   fn main : int
//!     block {
//!       var int x =
//!         binary +
//!           int 1
//!           int 2
//!       return
//!         id x
//!     }
//! ```

use crate::parser::ast::*;
use std::fmt::{self, Display, Formatter};

impl Display for AstType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AstType::Int => f.write_str("int"),
            AstType::Char => f.write_str("char"),
            AstType::Array { element, size } => {
                write!(f, "{}[{size}]", AstType::from(*element))
            }
        }
    }
}

impl Display for AstModule<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "module")?;
        for function in self.functions {
            write_function(f, function, 1)?;
        }
        Ok(())
    }
}

fn indent(f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
    write!(f, "{:width$}", "", width = depth * 2)
}

fn write_function(f: &mut Formatter<'_>, function: &AstFunction<'_>, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    write!(f, "fn {} : {}", function.name, function.return_type)?;
    if !function.params.is_empty() {
        let params: Vec<String> = function
            .params
            .iter()
            .map(|p| format!("{} {}", p.param_type, p.name))
            .collect();
        write!(f, " ({})", params.join(", "))?;
    }
    writeln!(f)?;
    write_node(f, Some(function.body), depth + 1)
}

fn write_node(f: &mut Formatter<'_>, node: Option<&Node<'_>>, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    let Some(node) = node else {
        return writeln!(f, "<null>");
    };

    match node.kind {
        NodeKind::Block { statements } => {
            writeln!(f, "block {{")?;
            for &statement in statements {
                write_node(f, Some(statement), depth + 1)?;
            }
            indent(f, depth)?;
            writeln!(f, "}}")
        }
        NodeKind::Return { expr } => {
            writeln!(f, "return")?;
            write_node(f, expr, depth + 1)
        }
        NodeKind::ExprStmt { expr } => {
            writeln!(f, "expr")?;
            write_node(f, Some(expr), depth + 1)
        }
        NodeKind::VarDecl {
            var_type,
            name,
            initializer,
        } => {
            write!(f, "var {var_type} {name}")?;
            match initializer {
                Some(init) => {
                    writeln!(f, " =")?;
                    write_node(f, Some(init), depth + 1)
                }
                None => writeln!(f),
            }
        }
        NodeKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            writeln!(f, "if")?;
            write_node(f, Some(condition), depth + 1)?;
            indent(f, depth)?;
            writeln!(f, "then")?;
            write_node(f, Some(then_branch), depth + 1)?;
            if let Some(else_branch) = else_branch {
                indent(f, depth)?;
                writeln!(f, "else")?;
                write_node(f, Some(else_branch), depth + 1)?;
            }
            Ok(())
        }
        NodeKind::While { condition, body } => {
            writeln!(f, "while")?;
            write_node(f, Some(condition), depth + 1)?;
            write_node(f, Some(body), depth + 1)
        }
        NodeKind::Break => writeln!(f, "break"),
        NodeKind::Binary { op, left, right } => {
            writeln!(f, "binary {}", op.symbol())?;
            write_node(f, Some(left), depth + 1)?;
            write_node(f, Some(right), depth + 1)
        }
        NodeKind::Unary { op, operand } => {
            writeln!(f, "unary {}", op.symbol())?;
            write_node(f, Some(operand), depth + 1)
        }
        NodeKind::IntLiteral(value) => writeln!(f, "int {value}"),
        NodeKind::Identifier(name) => writeln!(f, "id {name}"),
        NodeKind::Subscript { base, index } => {
            writeln!(f, "subscript")?;
            write_node(f, Some(base), depth + 1)?;
            write_node(f, Some(index), depth + 1)
        }
        NodeKind::Call { callee, args } => {
            writeln!(f, "call")?;
            write_node(f, Some(callee), depth + 1)?;
            for &arg in args {
                write_node(f, Some(arg), depth + 1)?;
            }
            Ok(())
        }
        NodeKind::InitList { elements } => {
            writeln!(f, "init_list")?;
            for &element in elements {
                write_node(f, Some(element), depth + 1)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::arena::Arena;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_display() {
        assert_eq!(AstType::Char.to_string(), "char");
        let array = AstType::Array {
            element: ScalarType::Int,
            size: 10,
        };
        assert_eq!(array.to_string(), "int[10]");
    }

    #[test]
    fn test_print_hand_built_module() {
        let arena = Arena::new();
        let alloc = |kind| {
            arena
                .try_alloc(Node::new(kind, SourceLocation::default()))
                .expect("arena allocation")
        };

        let cond = alloc(NodeKind::Identifier("n"));
        let body = alloc(NodeKind::Break);
        let looped = alloc(NodeKind::While {
            condition: cond,
            body,
        });
        let missing = alloc(NodeKind::Return { expr: None });
        let statements = arena.try_alloc([looped, missing]).expect("arena allocation");
        let block = alloc(NodeKind::Block {
            statements: &statements[..],
        });
        let params = arena
            .try_alloc([Param {
                param_type: AstType::Char,
                name: "n",
                location: SourceLocation::default(),
            }])
            .expect("arena allocation");
        let function = arena
            .try_alloc(AstFunction {
                name: "spin",
                return_type: AstType::Int,
                params: &params[..],
                body: block,
                location: SourceLocation::default(),
            })
            .expect("arena allocation");
        let functions = arena.try_alloc([function]).expect("arena allocation");
        let module = AstModule {
            functions: &functions[..],
        };

        assert_eq!(
            module.to_string(),
            "module\n\
             \x20 fn spin : int (char n)\n\
             \x20   block {\n\
             \x20     while\n\
             \x20       id n\n\
             \x20       break\n\
             \x20     return\n\
             \x20       <null>\n\
             \x20   }\n"
        );
    }

    #[test]
    fn test_empty_module() {
        assert_eq!(AstModule::default().to_string(), "module\n");
    }
}
