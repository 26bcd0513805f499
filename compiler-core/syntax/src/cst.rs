use rowan::ast::AstNode;

use crate::{SyntaxKind, SyntaxToken};

#[macro_use]
mod macros;

create_cst_struct!(Source, FunctionBody, ClassBody, Parameters, Expression, Condition, ForHeader);

has_children!(
    Source
    | statements() -> Statement
);

has_children!(
    FunctionBody
    | statements() -> Statement
);

create_cst_enum!(
    Statement
        | Block
        | EmptyStatement
        | ExpressionStatement
        | VariableStatement
        | FunctionDeclaration
        | ClassDeclaration
        | IfStatement
        | ForStatement
        | ForInStatement
        | ForOfStatement
        | WhileStatement
        | DoWhileStatement
        | ReturnStatement
        | BreakStatement
        | ContinueStatement
        | ThrowStatement
        | TryStatement
        | SwitchStatement
        | LabeledStatement
        | WithStatement
        | DebuggerStatement
        | ImportDeclaration
        | ExportDeclaration
);

create_cst_struct!(ElseClause, CatchClause, FinallyClause, SwitchBody, SwitchCase);

has_token!(
    Block
    | left_curly() -> LEFT_CURLY
    | right_curly() -> RIGHT_CURLY
);

has_children!(
    Block
    | statements() -> Statement
);

has_child!(
    ExpressionStatement
    | expression() -> Expression
);

has_token!(
    ExpressionStatement
    | semicolon() -> SEMICOLON
);

has_token!(
    ForStatement
    | for_token() -> FOR
);

has_child!(
    ForStatement
    | header() -> ForHeader
    | body() -> Statement
);

has_token!(
    ForInStatement
    | for_token() -> FOR
);

has_child!(
    ForInStatement
    | header() -> ForHeader
    | body() -> Statement
);

has_token!(
    ForOfStatement
    | for_token() -> FOR
    | await_token() -> AWAIT
);

has_child!(
    ForOfStatement
    | header() -> ForHeader
    | body() -> Statement
);

has_token!(
    WhileStatement
    | while_token() -> WHILE
);

has_child!(
    WhileStatement
    | condition() -> Condition
    | body() -> Statement
);

has_token!(
    DoWhileStatement
    | do_token() -> DO
    | while_token() -> WHILE
);

has_child!(
    DoWhileStatement
    | body() -> Statement
    | condition() -> Condition
);

has_child!(
    LabeledStatement
    | body() -> Statement
);

has_token!(
    LabeledStatement
    | label() -> IDENTIFIER
);

create_cst_union!(Loop | ForStatement | ForInStatement | ForOfStatement | WhileStatement | DoWhileStatement);

impl Loop {
    /// The `for`, `while` or `do` token that opens the loop.
    pub fn keyword(&self) -> Option<SyntaxToken> {
        match self {
            Loop::ForStatement(l) => l.for_token(),
            Loop::ForInStatement(l) => l.for_token(),
            Loop::ForOfStatement(l) => l.for_token(),
            Loop::WhileStatement(l) => l.while_token(),
            Loop::DoWhileStatement(l) => l.do_token(),
        }
    }

    pub fn body(&self) -> Option<Statement> {
        match self {
            Loop::ForStatement(l) => l.body(),
            Loop::ForInStatement(l) => l.body(),
            Loop::ForOfStatement(l) => l.body(),
            Loop::WhileStatement(l) => l.body(),
            Loop::DoWhileStatement(l) => l.body(),
        }
    }
}

impl Expression {
    /// Tokens written directly in this expression, skipping trivia and
    /// anything nested inside function bodies.
    pub fn significant_tokens(&self) -> impl Iterator<Item = SyntaxToken> {
        self.syntax()
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| !token.kind().is_whitespace_or_comment())
    }
}

impl Statement {
    pub fn kind(&self) -> SyntaxKind {
        self.syntax().kind()
    }
}
