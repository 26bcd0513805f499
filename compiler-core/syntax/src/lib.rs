pub mod cst;

mod token_set;

pub use token_set::TokenSet;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
#[repr(u16)]
pub enum SyntaxKind {
    // region: trivia
    WHITESPACE,
    LINE_COMMENT,
    BLOCK_COMMENT,
    // endregion: trivia

    // region: keywords
    BREAK,
    CASE,
    CATCH,
    CLASS,
    CONST,
    CONTINUE,
    DEBUGGER,
    DEFAULT,
    DELETE,
    DO,
    ELSE,
    EXPORT,
    EXTENDS,
    FALSE,
    FINALLY,
    FOR,
    FUNCTION,
    IF,
    IMPORT,
    IN,
    INSTANCEOF,
    NEW,
    NULL,
    RETURN,
    SUPER,
    SWITCH,
    THIS,
    THROW,
    TRUE,
    TRY,
    TYPEOF,
    VAR,
    VOID,
    WHILE,
    WITH,
    YIELD,
    // endregion: keywords

    // region: contextual keywords
    /// Treated as names everywhere except where the grammar asks for them.
    ASYNC,
    AWAIT,
    LET,
    OF,
    STATIC,
    // endregion: contextual keywords

    // region: names
    IDENTIFIER,
    /// #name
    PRIVATE_NAME,
    // endregion: names

    // region: punctuation
    /// (
    LEFT_PARENTHESIS,
    /// )
    RIGHT_PARENTHESIS,
    /// [
    LEFT_SQUARE,
    /// ]
    RIGHT_SQUARE,
    /// {
    LEFT_CURLY,
    /// }
    RIGHT_CURLY,
    /// ;
    SEMICOLON,
    /// ,
    COMMA,
    /// :
    COLON,
    /// .
    DOT,
    /// ?.
    QUESTION_DOT,
    /// ?
    QUESTION,
    /// =>
    ARROW,
    /// ++
    PLUS_PLUS,
    /// --
    MINUS_MINUS,
    /// !
    BANG,
    /// ~
    TILDE,
    /// Every other punctuator: +, -, *, /, ===, ??=, ...
    OPERATOR,
    // endregion: punctuation

    // region: literals
    NUMBER,
    STRING,
    REGEX,
    /// `text`
    TEMPLATE,
    /// `text${
    TEMPLATE_HEAD,
    /// }text${
    TEMPLATE_MIDDLE,
    /// }text`
    TEMPLATE_TAIL,
    // endregion: literals

    // region: control
    ERROR,
    END_OF_FILE,
    // endregion: control

    // region: nodes
    /// Placeholder for markers that were started but never completed.
    Node,

    Source,
    Block,
    FunctionBody,
    ClassBody,
    Parameters,
    Expression,
    Condition,
    ForHeader,

    EmptyStatement,
    ExpressionStatement,
    VariableStatement,
    FunctionDeclaration,
    ClassDeclaration,
    IfStatement,
    ElseClause,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    WhileStatement,
    DoWhileStatement,
    ReturnStatement,
    BreakStatement,
    ContinueStatement,
    ThrowStatement,
    TryStatement,
    CatchClause,
    FinallyClause,
    SwitchStatement,
    SwitchBody,
    SwitchCase,
    LabeledStatement,
    WithStatement,
    DebuggerStatement,
    ImportDeclaration,
    ExportDeclaration,
    // endregion: nodes
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JavaScript {}

impl rowan::Language for JavaScript {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ExportDeclaration as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(value: SyntaxKind) -> Self {
        Self(value as u16)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<JavaScript>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<JavaScript>;
pub type SyntaxToken = rowan::SyntaxToken<JavaScript>;
pub type SyntaxElement = rowan::SyntaxElement<JavaScript>;

impl SyntaxKind {
    pub fn is_whitespace_or_comment(self) -> bool {
        matches!(
            self,
            SyntaxKind::WHITESPACE | SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT
        )
    }

    /// Tokens that may stand in for a name: plain identifiers and the
    /// contextual keywords.
    pub fn is_name(self) -> bool {
        matches!(
            self,
            SyntaxKind::IDENTIFIER
                | SyntaxKind::ASYNC
                | SyntaxKind::AWAIT
                | SyntaxKind::LET
                | SyntaxKind::OF
                | SyntaxKind::STATIC
                | SyntaxKind::YIELD
        )
    }

    pub fn is_loop(self) -> bool {
        matches!(
            self,
            SyntaxKind::ForStatement
                | SyntaxKind::ForInStatement
                | SyntaxKind::ForOfStatement
                | SyntaxKind::WhileStatement
                | SyntaxKind::DoWhileStatement
        )
    }
}
