use syntax::{SyntaxKind, TokenSet};

use super::expressions::{self, Stop};
use super::{CLOSING, Parser};

pub(crate) fn source(p: &mut Parser) {
    let mut marker = p.start();
    statement_list(p, SyntaxKind::END_OF_FILE);
    marker.end(p, SyntaxKind::Source);
}

fn statement_list(p: &mut Parser, terminator: SyntaxKind) {
    while !p.at(terminator) && !p.at_eof() {
        statement(p);
    }
}

const STATEMENT_END: TokenSet =
    TokenSet::new(&[SyntaxKind::SEMICOLON, SyntaxKind::RIGHT_CURLY, SyntaxKind::END_OF_FILE]);

fn statement(p: &mut Parser) {
    match p.nth(0) {
        SyntaxKind::LEFT_CURLY => block(p),
        SyntaxKind::SEMICOLON => empty_statement(p),
        SyntaxKind::VAR | SyntaxKind::CONST => variable_statement(p),
        SyntaxKind::LET if at_let_declaration(p) => variable_statement(p),
        SyntaxKind::FUNCTION => function_declaration(p),
        SyntaxKind::ASYNC if at_async_function(p) => function_declaration(p),
        SyntaxKind::CLASS => class_declaration(p),
        SyntaxKind::IF => if_statement(p),
        SyntaxKind::FOR => for_statement(p),
        SyntaxKind::WHILE => while_statement(p),
        SyntaxKind::DO => do_while_statement(p),
        SyntaxKind::RETURN => argument_statement(p, SyntaxKind::ReturnStatement),
        SyntaxKind::THROW => argument_statement(p, SyntaxKind::ThrowStatement),
        SyntaxKind::BREAK => jump_statement(p, SyntaxKind::BreakStatement),
        SyntaxKind::CONTINUE => jump_statement(p, SyntaxKind::ContinueStatement),
        SyntaxKind::TRY => try_statement(p),
        SyntaxKind::SWITCH => switch_statement(p),
        SyntaxKind::WITH => with_statement(p),
        SyntaxKind::DEBUGGER => debugger_statement(p),
        SyntaxKind::IMPORT
            if !matches!(p.nth(1), SyntaxKind::LEFT_PARENTHESIS | SyntaxKind::DOT) =>
        {
            import_declaration(p)
        }
        SyntaxKind::EXPORT => export_declaration(p),
        kind if kind.is_name() && p.nth(1) == SyntaxKind::COLON => labeled_statement(p),
        kind if CLOSING.contains(kind) => p.error_recover("unexpected closing delimiter"),
        _ => expression_statement(p),
    }
}

fn at_let_declaration(p: &Parser) -> bool {
    let next = p.nth(1);
    next.is_name() || matches!(next, SyntaxKind::LEFT_SQUARE | SyntaxKind::LEFT_CURLY)
}

fn at_async_function(p: &Parser) -> bool {
    p.nth(1) == SyntaxKind::FUNCTION && !p.nth_newline_before(1)
}

fn block(p: &mut Parser) {
    let mut marker = p.start();
    p.expect(SyntaxKind::LEFT_CURLY);
    statement_list(p, SyntaxKind::RIGHT_CURLY);
    p.expect(SyntaxKind::RIGHT_CURLY);
    marker.end(p, SyntaxKind::Block);
}

pub(super) fn function_body(p: &mut Parser) {
    let mut marker = p.start();
    p.expect(SyntaxKind::LEFT_CURLY);
    statement_list(p, SyntaxKind::RIGHT_CURLY);
    p.expect(SyntaxKind::RIGHT_CURLY);
    marker.end(p, SyntaxKind::FunctionBody);
}

fn expect_block(p: &mut Parser) {
    if p.at(SyntaxKind::LEFT_CURLY) {
        block(p);
    } else {
        p.error("expected a block");
    }
}

fn empty_statement(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    marker.end(p, SyntaxKind::EmptyStatement);
}

fn variable_statement(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    if !expressions::expression(p, Stop::Statement) {
        p.error("expected a binding");
    }
    p.eat(SyntaxKind::SEMICOLON);
    marker.end(p, SyntaxKind::VariableStatement);
}

fn function_declaration(p: &mut Parser) {
    let mut marker = p.start();
    p.eat(SyntaxKind::ASYNC);
    p.expect(SyntaxKind::FUNCTION);
    // generators
    p.eat(SyntaxKind::OPERATOR);
    if p.nth(0).is_name() {
        p.consume();
    }
    parameters(p);
    if p.at(SyntaxKind::LEFT_CURLY) {
        function_body(p);
    } else {
        p.error("expected a function body");
    }
    marker.end(p, SyntaxKind::FunctionDeclaration);
}

fn parameters(p: &mut Parser) {
    let mut marker = p.start();
    if p.at(SyntaxKind::LEFT_PARENTHESIS) {
        expressions::delimited(p, SyntaxKind::RIGHT_PARENTHESIS);
    } else {
        p.error("expected parameters");
    }
    marker.end(p, SyntaxKind::Parameters);
}

fn class_declaration(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    if p.nth(0).is_name() {
        p.consume();
    }
    if p.eat(SyntaxKind::EXTENDS) && !expressions::expression(p, Stop::ClassHeritage) {
        p.error("expected a superclass");
    }
    class_body(p);
    marker.end(p, SyntaxKind::ClassDeclaration);
}

fn class_body(p: &mut Parser) {
    let mut marker = p.start();
    if p.at(SyntaxKind::LEFT_CURLY) {
        expressions::delimited(p, SyntaxKind::RIGHT_CURLY);
    } else {
        p.error("expected a class body");
    }
    marker.end(p, SyntaxKind::ClassBody);
}

fn condition(p: &mut Parser) {
    let mut marker = p.start();
    if p.at(SyntaxKind::LEFT_PARENTHESIS) {
        expressions::delimited(p, SyntaxKind::RIGHT_PARENTHESIS);
    } else {
        p.error("expected a parenthesized condition");
    }
    marker.end(p, SyntaxKind::Condition);
}

fn if_statement(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    condition(p);
    statement(p);
    if p.at(SyntaxKind::ELSE) {
        let mut else_clause = p.start();
        p.consume();
        statement(p);
        else_clause.end(p, SyntaxKind::ElseClause);
    }
    marker.end(p, SyntaxKind::IfStatement);
}

fn for_statement(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    let kind = if p.eat(SyntaxKind::AWAIT) { SyntaxKind::ForOfStatement } else { for_kind(p) };

    let mut header = p.start();
    if p.at(SyntaxKind::LEFT_PARENTHESIS) {
        expressions::delimited(p, SyntaxKind::RIGHT_PARENTHESIS);
    } else {
        p.error("expected a loop header");
    }
    header.end(p, SyntaxKind::ForHeader);

    statement(p);
    marker.end(p, kind);
}

/// Decides between `for (;;)`, `for (in)` and `for (of)` by scanning the
/// header at parenthesis depth one.
fn for_kind(p: &Parser) -> SyntaxKind {
    let mut kind = SyntaxKind::ForStatement;
    let mut depth = 0usize;
    let mut previous = SyntaxKind::LEFT_PARENTHESIS;

    for n in 0.. {
        let current = p.nth(n);
        match current {
            SyntaxKind::LEFT_PARENTHESIS
            | SyntaxKind::LEFT_SQUARE
            | SyntaxKind::LEFT_CURLY
            | SyntaxKind::TEMPLATE_HEAD => depth += 1,
            SyntaxKind::RIGHT_PARENTHESIS
            | SyntaxKind::RIGHT_SQUARE
            | SyntaxKind::RIGHT_CURLY
            | SyntaxKind::TEMPLATE_TAIL => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
            SyntaxKind::END_OF_FILE => break,
            SyntaxKind::SEMICOLON if depth == 1 => return SyntaxKind::ForStatement,
            SyntaxKind::IN if depth == 1 && kind == SyntaxKind::ForStatement => {
                kind = SyntaxKind::ForInStatement;
            }
            SyntaxKind::OF
                if depth == 1
                    && kind == SyntaxKind::ForStatement
                    && !matches!(
                        previous,
                        SyntaxKind::LEFT_PARENTHESIS
                            | SyntaxKind::VAR
                            | SyntaxKind::LET
                            | SyntaxKind::CONST
                    ) =>
            {
                kind = SyntaxKind::ForOfStatement;
            }
            _ => (),
        }
        previous = current;
    }

    kind
}

fn while_statement(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    condition(p);
    statement(p);
    marker.end(p, SyntaxKind::WhileStatement);
}

fn do_while_statement(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    statement(p);
    p.expect(SyntaxKind::WHILE);
    condition(p);
    p.eat(SyntaxKind::SEMICOLON);
    marker.end(p, SyntaxKind::DoWhileStatement);
}

/// `return` and `throw`, whose argument must start on the same line.
fn argument_statement(p: &mut Parser, kind: SyntaxKind) {
    let mut marker = p.start();
    p.consume();
    if !p.at_in(STATEMENT_END) && !p.newline_before() {
        expressions::expression(p, Stop::Statement);
    }
    p.eat(SyntaxKind::SEMICOLON);
    marker.end(p, kind);
}

/// `break` and `continue`, with an optional label on the same line.
fn jump_statement(p: &mut Parser, kind: SyntaxKind) {
    let mut marker = p.start();
    p.consume();
    if p.nth(0).is_name() && !p.newline_before() {
        p.consume();
    }
    p.eat(SyntaxKind::SEMICOLON);
    marker.end(p, kind);
}

fn try_statement(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    expect_block(p);

    if p.at(SyntaxKind::CATCH) {
        let mut catch_clause = p.start();
        p.consume();
        if p.at(SyntaxKind::LEFT_PARENTHESIS) {
            parameters(p);
        }
        expect_block(p);
        catch_clause.end(p, SyntaxKind::CatchClause);
    }

    if p.at(SyntaxKind::FINALLY) {
        let mut finally_clause = p.start();
        p.consume();
        expect_block(p);
        finally_clause.end(p, SyntaxKind::FinallyClause);
    }

    marker.end(p, SyntaxKind::TryStatement);
}

fn switch_statement(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    condition(p);
    switch_body(p);
    marker.end(p, SyntaxKind::SwitchStatement);
}

fn switch_body(p: &mut Parser) {
    let mut marker = p.start();
    p.expect(SyntaxKind::LEFT_CURLY);

    while !p.at(SyntaxKind::RIGHT_CURLY) && !p.at_eof() {
        match p.nth(0) {
            SyntaxKind::CASE => {
                let mut case = p.start();
                p.consume();
                if !expressions::expression(p, Stop::CaseLabel) {
                    p.error("expected a case expression");
                }
                p.expect(SyntaxKind::COLON);
                case.end(p, SyntaxKind::SwitchCase);
            }
            SyntaxKind::DEFAULT => {
                let mut case = p.start();
                p.consume();
                p.expect(SyntaxKind::COLON);
                case.end(p, SyntaxKind::SwitchCase);
            }
            _ => statement(p),
        }
    }

    p.expect(SyntaxKind::RIGHT_CURLY);
    marker.end(p, SyntaxKind::SwitchBody);
}

fn with_statement(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    condition(p);
    statement(p);
    marker.end(p, SyntaxKind::WithStatement);
}

fn debugger_statement(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    p.eat(SyntaxKind::SEMICOLON);
    marker.end(p, SyntaxKind::DebuggerStatement);
}

fn labeled_statement(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    p.consume();
    statement(p);
    marker.end(p, SyntaxKind::LabeledStatement);
}

fn import_declaration(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    if !expressions::expression(p, Stop::Statement) {
        p.error("expected an import clause");
    }
    p.eat(SyntaxKind::SEMICOLON);
    marker.end(p, SyntaxKind::ImportDeclaration);
}

fn export_declaration(p: &mut Parser) {
    let mut marker = p.start();
    p.consume();
    p.eat(SyntaxKind::DEFAULT);

    match p.nth(0) {
        SyntaxKind::FUNCTION | SyntaxKind::CLASS | SyntaxKind::VAR | SyntaxKind::CONST => {
            statement(p)
        }
        SyntaxKind::LET if at_let_declaration(p) => statement(p),
        SyntaxKind::ASYNC if at_async_function(p) => statement(p),
        _ => {
            if !expressions::expression(p, Stop::Statement) {
                p.error("expected an export clause");
            }
            p.eat(SyntaxKind::SEMICOLON);
        }
    }

    marker.end(p, SyntaxKind::ExportDeclaration);
}

fn expression_statement(p: &mut Parser) {
    let mut marker = p.start();
    if expressions::expression(p, Stop::Statement) {
        p.eat(SyntaxKind::SEMICOLON);
        marker.end(p, SyntaxKind::ExpressionStatement);
    } else {
        marker.cancel(p);
        p.error_recover("expected a statement");
    }
}
