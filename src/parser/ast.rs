// AST (Abstract Syntax Tree) definitions for the front end
//
// Every node lives in the parse session's [`Arena`](super::arena::Arena);
// children are plain `&'a` borrows into it, so the tree is strictly
// parent-to-child and is freed in one go when the arena is dropped.

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Scalar types that can appear on their own or as an array element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Int,
    Char,
}

/// Type annotation attached to functions, parameters and declarations.
///
/// Arrays are one level deep only: the element is always a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstType {
    Int,
    Char,
    Array { element: ScalarType, size: u32 },
}

impl From<ScalarType> for AstType {
    fn from(scalar: ScalarType) -> Self {
        match scalar {
            ScalarType::Int => AstType::Int,
            ScalarType::Char => AstType::Char,
        }
    }
}

/// Binary operators, including plain assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Assign,
    // Bitwise
    BitOr,
    BitAnd,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Source spelling of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Assign => "=",
            BinaryOp::BitOr => "|",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,    // -x
    Plus,   // +x
    Not,    // !x
    BitNot, // ~x
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

/// A statement or expression node together with the position of the token
/// that introduced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node<'a> {
    pub kind: NodeKind<'a>,
    pub location: SourceLocation,
}

impl<'a> Node<'a> {
    pub fn new(kind: NodeKind<'a>, location: SourceLocation) -> Self {
        Self { kind, location }
    }
}

/// Statement and expression variants.
///
/// Optional children are spelled out as `Option`; every other child is
/// always present once the node exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    // Statements
    Block {
        statements: &'a [&'a Node<'a>],
    },
    Return {
        expr: Option<&'a Node<'a>>,
    },
    ExprStmt {
        expr: &'a Node<'a>,
    },
    VarDecl {
        var_type: AstType,
        name: &'a str,
        initializer: Option<&'a Node<'a>>,
    },
    If {
        condition: &'a Node<'a>,
        then_branch: &'a Node<'a>,
        else_branch: Option<&'a Node<'a>>,
    },
    While {
        condition: &'a Node<'a>,
        body: &'a Node<'a>,
    },
    Break,

    // Expressions
    Binary {
        op: BinaryOp,
        left: &'a Node<'a>,
        right: &'a Node<'a>,
    },
    Unary {
        op: UnaryOp,
        operand: &'a Node<'a>,
    },
    IntLiteral(i32),
    Identifier(&'a str),
    Subscript {
        base: &'a Node<'a>,
        index: &'a Node<'a>,
    },
    Call {
        callee: &'a Node<'a>,
        args: &'a [&'a Node<'a>],
    },
    InitList {
        elements: &'a [&'a Node<'a>],
    },
}

/// Function parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param<'a> {
    pub param_type: AstType,
    pub name: &'a str,
    pub location: SourceLocation,
}

/// Function definition: `type name(params) { body }`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AstFunction<'a> {
    pub name: &'a str,
    pub return_type: AstType,
    pub params: &'a [Param<'a>],
    /// Always a [`NodeKind::Block`]
    pub body: &'a Node<'a>,
    pub location: SourceLocation,
}

impl<'a> AstFunction<'a> {
    /// Statements of the function body
    pub fn statements(&self) -> &'a [&'a Node<'a>] {
        match self.body.kind {
            NodeKind::Block { statements } => statements,
            _ => &[],
        }
    }
}

/// Top-level program structure: one per parse session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AstModule<'a> {
    /// Function definitions in declaration order
    pub functions: &'a [&'a AstFunction<'a>],
}

impl<'a> AstModule<'a> {
    /// Look up a function by name
    pub fn function(&self, name: &str) -> Option<&'a AstFunction<'a>> {
        self.functions.iter().copied().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_type_from_scalar() {
        assert_eq!(AstType::from(ScalarType::Char), AstType::Char);
        let array = AstType::Array {
            element: ScalarType::Int,
            size: 10,
        };
        assert_ne!(array, AstType::Int);
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(BinaryOp::Le.symbol(), "<=");
        assert_eq!(BinaryOp::Assign.symbol(), "=");
        assert_eq!(UnaryOp::BitNot.symbol(), "~");
    }
}
