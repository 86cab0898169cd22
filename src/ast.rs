/// Represents a literal value in the language.
///
/// `LiteralValue` covers the constants that can appear directly in source
/// code. Collection literals are expressions of their own because their
/// elements are arbitrary expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// The untyped `null`.
    Null,
    /// `true` or `false`.
    Boolean(bool),
    /// A 64-bit signed integer literal, including character literals.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Numeric(f64),
    /// An imaginary literal such as `2i`, holding the imaginary component.
    Imaginary(f64),
    /// A string literal with escapes already resolved.
    Literal(String),
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

/// The method part of a member call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// A method called by name, e.g. `s.insert(0, 'A')`.
    Named(String),
    /// The tuple field mutator `t.set@N(value)`.
    SetField(usize),
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::SetField(position) => write!(f, "set@{position}"),
        }
    }
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Each variant models a distinct syntactic construct and records the source
/// line it started on, so that both static and runtime errors can point back
/// to the script.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, boolean, null).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A unary operation (e.g. negation).
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation (addition, comparison, etc.).
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Builtin function call or native type constructor (e.g. `hex(255)`).
    FunctionCall {
        /// Name of the function being called.
        name:      String,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Member call on a receiver (e.g. `s.insert(3, 'A')`).
    MemberCall {
        /// The receiver expression.
        receiver:  Box<Self>,
        /// The method being invoked.
        method:    Member,
        /// Arguments to the method.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// Collection indexing expression (e.g. `arr[2]`).
    Index {
        /// The collection to index into.
        target: Box<Self>,
        /// The index to access.
        index:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// Tuple field access (e.g. `row@2`).
    Field {
        /// The tuple expression.
        target:   Box<Self>,
        /// Field position, counted from 1.
        position: usize,
        /// Line number in the source code.
        line:     usize,
    },
    /// Collection literal expression (e.g. `[1, 2, 3]`).
    CollectionLiteral {
        /// Elements of the collection.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use bloc::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::FunctionCall { line, .. }
            | Self::MemberCall { line, .. }
            | Self::Index { line, .. }
            | Self::Field { line, .. }
            | Self::CollectionLiteral { line, .. } => *line,
        }
    }
}

/// What a `for` loop iterates over.
#[derive(Debug, Clone, PartialEq)]
pub enum ForSource {
    /// Every element of a collection, in order.
    Collection(Expr),
    /// An integer range `start..end` or `start..=end`.
    Range {
        /// First value.
        start:     Expr,
        /// Bound of the range.
        end:       Expr,
        /// Whether `end` itself is visited.
        inclusive: bool,
    },
}

/// One `catch` clause of a `try` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Handler {
    /// Exception name matched by this clause, or `others`.
    pub name: String,
    /// Statements run when the clause matches.
    pub body: Vec<Statement>,
    /// Line number in the source code.
    pub line: usize,
}

/// Represents a statement.
///
/// Statements are the units a script is made of. Blocks are plain statement
/// lists and open a new variable scope when executed.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A standalone expression evaluated for its result.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// A variable declaration using `let`.
    VariableDeclaration {
        /// The name of the variable.
        name:  String,
        /// The initial value of the variable.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// A variable assignment binding a name to an expression.
    Assignment {
        /// The name of the variable.
        name:  String,
        /// The value which is being assigned.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// A compound assignment consisting of a variable and an operation.
    CompoundAssignment {
        /// The name of the variable.
        name:  String,
        /// The binary operation (e.g., `+=`, `-=`, etc.).
        op:    BinaryOperator,
        /// The value to be combined with the current variable value.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// `if` with optional `else if` chains and a final `else`.
    If {
        /// Condition and body of each `if` / `else if` arm, in order.
        branches:  Vec<(Expr, Vec<Statement>)>,
        /// Body of the trailing `else`, if any.
        otherwise: Option<Vec<Statement>>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `while cond do { ... }`.
    While {
        /// Loop condition, checked before every iteration.
        condition: Expr,
        /// Loop body.
        body:      Vec<Statement>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `for x in source do { ... }`.
    For {
        /// The loop variable name.
        var:    String,
        /// The values iterated over.
        source: ForSource,
        /// Loop body.
        body:   Vec<Statement>,
        /// Line number in the source code.
        line:   usize,
    },
    /// `raise name`.
    Raise {
        /// Exception name.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// `try do { ... } catch name do { ... }`.
    Try {
        /// Protected statements.
        body:     Vec<Statement>,
        /// Handlers tried in order.
        handlers: Vec<Handler>,
        /// Line number in the source code.
        line:     usize,
    },
    /// `import name` of a registered native type.
    Import {
        /// Native type name.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Exponentiation (`**`)
    Exp,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
    /// Logical exclusive or (`xor`)
    Xor,
    /// Bitwise and (`&`)
    BitAnd,
    /// Bitwise or (`|`)
    BitOr,
    /// Bitwise exclusive or (`^`)
    BitXor,
    /// Left shift (`<<`)
    ShiftLeft,
    /// Arithmetic right shift (`>>`)
    ShiftRight,
    /// Regular expression match (`~=`)
    Match,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Unary plus (`+x`).
    Plus,
    /// Logical NOT (`not x`).
    Not,
    /// Bitwise NOT (`~x`).
    BitNot,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, BitAnd, BitOr, BitXor, Div, Equal, Exp, Greater, GreaterEqual, Less,
            LessEqual, Match, Mod, Mul, NotEqual, Or, ShiftLeft, ShiftRight, Sub, Xor,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Exp => "**",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            And => "and",
            Or => "or",
            Xor => "xor",
            BitAnd => "&",
            BitOr => "|",
            BitXor => "^",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            Match => "~=",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Negate => "-",
            Self::Plus => "+",
            Self::Not => "not",
            Self::BitNot => "~",
        };
        write!(f, "{operator}")
    }
}
