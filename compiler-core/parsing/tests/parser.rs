use std::fmt::Write;

use syntax::{SyntaxKind, SyntaxNode};
use test_each_file::test_each_file;

fn print_tree(source: &str) -> String {
    let (parsed, errors) = parsing::parse_source(source);
    assert!(errors.is_empty(), "{errors:?}");

    fn print(indent: usize, node: SyntaxNode, buffer: &mut String) {
        writeln!(buffer, "{}{:?}", " ".repeat(indent), node.kind()).unwrap();
        for child in node.children() {
            print(indent + 2, child, buffer);
        }
    }

    let mut buffer = String::new();
    print(0, parsed.syntax_node(), &mut buffer);
    buffer
}

test_each_file! { in "./compiler-core/parsing/tests/parser" as well_formed => |content: &str| {
    let (_, errors) = parsing::parse_source(content);
    assert!(errors.is_empty(), "{errors:?}");
}}

test_each_file! { in "./compiler-core/parsing/tests/parser" as lossless => |content: &str| {
    let (parsed, _) = parsing::parse_source(content);
    let node = parsed.syntax_node();
    assert_eq!(node.to_string(), content);
}}

test_each_file! { in "./compiler-core/parsing/tests/parser" as stability => |content: &str| {
    let lexed = lexing::lex(content);
    for index in 0..lexed.len() - 1 {
        let partial = lexed.text_in_range(0..index + 1);
        let (parsed, _) = parsing::parse_source(partial);
        let node = parsed.syntax_node();
        assert_eq!(node.to_string(), partial);
    }
}}

#[test]
fn for_header_kinds() {
    let source = "\
for (let i = 0; i < n; i++) {}
for (const k in o) ;
for (const v of xs) v;
for await (const v of xs) {}
for (x of y) {}
for (let of of ofs) {}
";
    insta::assert_snapshot!(print_tree(source), @r"
    Source
      ForStatement
        ForHeader
        Block
      ForInStatement
        ForHeader
        EmptyStatement
      ForOfStatement
        ForHeader
        ExpressionStatement
          Expression
      ForOfStatement
        ForHeader
        Block
      ForOfStatement
        ForHeader
        Block
      ForOfStatement
        ForHeader
        Block
    ");
}

#[test]
fn while_and_do_while() {
    let source = "\
while (a) b();
do x++; while (x < 10)
do {} while (y);
label: while (true) { continue label; }
";
    insta::assert_snapshot!(print_tree(source), @r"
    Source
      WhileStatement
        Condition
        ExpressionStatement
          Expression
      DoWhileStatement
        ExpressionStatement
          Expression
        Condition
      DoWhileStatement
        Block
        Condition
      LabeledStatement
        WhileStatement
          Condition
          Block
            ContinueStatement
    ");
}

#[test]
fn automatic_semicolons() {
    let source = "\
let a = 1
let b = a
++b
const f = () => {
  return 1
}
f()
";
    insta::assert_snapshot!(print_tree(source), @r"
    Source
      VariableStatement
        Expression
      VariableStatement
        Expression
      ExpressionStatement
        Expression
      VariableStatement
        Expression
          FunctionBody
            ReturnStatement
              Expression
      ExpressionStatement
        Expression
    ");
}

/// Texts of the statements that are not blocks or loops, in source order.
fn statement_texts(source: &str) -> Vec<String> {
    let (parsed, errors) = parsing::parse_source(source);
    assert!(errors.is_empty(), "{errors:?}");
    parsed
        .syntax_node()
        .descendants()
        .filter(|node| {
            matches!(node.kind(), SyntaxKind::ExpressionStatement | SyntaxKind::VariableStatement)
        })
        .map(|node| node.text().to_string().trim().to_string())
        .collect()
}

#[test]
fn update_operators_and_line_breaks() {
    let source = "\
n++
[1, 2].forEach(f)
x = ++
y
i--
(g)()
j++
  + 1
";
    insta::assert_snapshot!(print_tree(source), @r"
    Source
      ExpressionStatement
        Expression
      ExpressionStatement
        Expression
      ExpressionStatement
        Expression
      ExpressionStatement
        Expression
      ExpressionStatement
        Expression
      ExpressionStatement
        Expression
    ");
    assert_eq!(
        statement_texts(source),
        ["n++", "[1, 2].forEach(f)", "x = ++\ny", "i--", "(g)()", "j++\n  + 1"]
    );
}

#[test]
fn update_operators_in_loop_bodies() {
    let source = "for (;;) n++\n[1, 2].forEach(f)\ndo m = ++\nm; while (m)\n";
    assert_eq!(
        statement_texts(source),
        ["n++", "[1, 2].forEach(f)", "m = ++\nm;"]
    );
}

#[test]
fn functions_and_classes() {
    let source = "\
function* gen(a, b) { yield a; }
async function run() { for (;;) { await tick(); } }
class Counter extends Base {
  static { init(); }
  count() { while (this.n) this.n--; }
}
";
    insta::assert_snapshot!(print_tree(source), @r"
    Source
      FunctionDeclaration
        Parameters
        FunctionBody
          ExpressionStatement
            Expression
      FunctionDeclaration
        Parameters
        FunctionBody
          ForStatement
            ForHeader
            Block
              ExpressionStatement
                Expression
      ClassDeclaration
        Expression
        ClassBody
          FunctionBody
            ExpressionStatement
              Expression
          FunctionBody
            WhileStatement
              Condition
              ExpressionStatement
                Expression
    ");
}

#[test]
fn switch_and_try() {
    let source = "\
switch (x) {
  case a ? b : c:
    break;
  default:
    y();
}
try { risky(); } catch (e) { log(e); } finally { done(); }
";
    insta::assert_snapshot!(print_tree(source), @r"
    Source
      SwitchStatement
        Condition
        SwitchBody
          SwitchCase
            Expression
          BreakStatement
          SwitchCase
          ExpressionStatement
            Expression
      TryStatement
        Block
          ExpressionStatement
            Expression
        CatchClause
          Parameters
          Block
            ExpressionStatement
              Expression
        FinallyClause
          Block
            ExpressionStatement
              Expression
    ");
}

#[test]
fn function_in_template() {
    let source = "`${ items.map(x => { while (x) x--; return x }) }`;\n";
    insta::assert_snapshot!(print_tree(source), @r"
    Source
      ExpressionStatement
        Expression
          FunctionBody
            WhileStatement
              Condition
              ExpressionStatement
                Expression
            ReturnStatement
              Expression
    ");
}

mod errors {
    use syntax::SyntaxKind;

    #[test]
    fn keywords_as_properties() {
        let (_, errors) = parsing::parse_source("a.for = b.default + c?.while;");
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn unclosed_parenthesis() {
        let (parsed, errors) = parsing::parse_source("let x = (1;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].offset, 11);
        assert_eq!((errors[0].position.line, errors[0].position.column), (1, 11));
        assert_eq!(&*errors[0].message, "expected RIGHT_PARENTHESIS");
        assert_eq!(parsed.syntax_node().to_string(), "let x = (1;");
    }

    #[test]
    fn stray_closing_brace() {
        let (parsed, errors) = parsing::parse_source("a();\n}\nb();");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].position.line, 2);
        assert_eq!(parsed.syntax_node().to_string(), "a();\n}\nb();");

        let kinds: Vec<_> = parsed.syntax_node().children().map(|node| node.kind()).collect();
        assert_eq!(
            kinds,
            [SyntaxKind::ExpressionStatement, SyntaxKind::ERROR, SyntaxKind::ExpressionStatement]
        );
    }

    #[test]
    fn lexer_errors_are_reported() {
        let (_, errors) = parsing::parse_source("while (x) { s = 'open\n}");
        assert_eq!(errors.len(), 1);
        assert_eq!(&*errors[0].message, "unterminated string literal");
    }
}
