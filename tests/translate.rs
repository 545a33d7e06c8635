//! End-to-end translation tests through the public API

use moonlua::{compile, compile_with, parse, CompileOptions, MoonError, RenderOptions};
use pretty_assertions::assert_eq;

#[test]
fn test_class_like_table_and_loop() {
    let source = "\
-- counter class
Counter = {
  new: (start = 0) ->
    return {count: start}
  bump: (amount) =>
    @count += amount
    return @count
}

for i = 1, 3
  if i == 2
    continue
  print(i)
";

    let expected = "\
-- counter class
Counter = {new = function(start)
  if start == nil then
    start = 0
  end
  return {count = start}
end, bump = function(self, amount)
  self.count = self.count + amount
  return self.count
end}
for i = 1, 3 do
  if i == 2 then
    goto continue
  end
  print(i)
  ::continue::
end
";

    assert_eq!(compile(source, Some("counter.moon")).unwrap(), expected);
}

#[test]
fn test_chains_tables_and_operators() {
    let source = "\
x = a.b\\c(1)[2]
t = {1, 2, x: 3}
u = {[foo!]: 4}
s = \"str\"\\upper!
n = - -x
ok = a != b and not #t
@items\\insert(x)
";

    let expected = "\
x = a.b:c(1)[2]
t = {1, 2, x = 3}
u = {[foo()] = 4}
s = (\"str\"):upper()
n = - -x
ok = a ~= b and not #t
self.items:insert(x)
";

    assert_eq!(compile(source, None).unwrap(), expected);
}

#[test]
fn test_numbers_round_trip() {
    let lua = compile("x = 0x1A + 1e10 + 3.0 + 2.5e-3", None).unwrap();
    assert_eq!(lua, "x = 0x1A + 1e10 + 3.0 + 2.5e-3\n");
}

#[test]
fn test_output_indentation_ignores_source_widths() {
    let source = "\
while running
        if ready
                fire!
        else
                wait(1)
";

    let expected = "\
while running do
  if ready then
    fire()
  else
    wait(1)
  end
end
";

    assert_eq!(compile(source, None).unwrap(), expected);
}

#[test]
fn test_return_with_and_without_values() {
    let source = "f = ->\n  return\ng = -> 1\n";
    let expected = "f = function()\n  return\nend\ng = function()\n  return 1\nend\n";
    assert_eq!(compile(source, None).unwrap(), expected);
}

#[test]
fn test_comment_between_clauses() {
    let source = "if a\n  f!\n-- note\nelse\n  g!\n";
    let expected = "if a then\n  f()\n  -- note\nelse\n  g()\nend\n";
    assert_eq!(compile(source, None).unwrap(), expected);

    let source = "if a\n  f!\n-- note\nelseif b\n  g!\n";
    let expected = "if a then\n  f()\n  -- note\nelseif b then\n  g()\nend\n";
    assert_eq!(compile(source, None).unwrap(), expected);
}

#[test]
fn test_negative_table_entry_on_its_own_line() {
    assert_eq!(compile("t = {\n  1\n  -1\n}\n", None).unwrap(), "t = {1, -1}\n");
}

#[test]
fn test_return_in_loop_with_continue_stays_last() {
    let source = "for x in items\n  if x\n    continue\n  return x\n";
    let expected = "\
for x in items do
  if x then
    goto continue
  end
  do return x end
  ::continue::
end
";
    assert_eq!(compile(source, None).unwrap(), expected);
}

#[test]
fn test_foreach_and_elseif() {
    let source = "\
for k, v in pairs(t)
  if v > 10
    break
  elseif v < 0
    print(k)
";

    let expected = "\
for k, v in pairs(t) do
  if v > 10 then
    break
  elseif v < 0 then
    print(k)
  end
end
";

    assert_eq!(compile(source, None).unwrap(), expected);
}

#[test]
fn test_four_space_render_unit() {
    let options = CompileOptions::default().with_render(RenderOptions::spaces(4));
    let lua = compile_with("if a\n  if b\n    c!", &options).unwrap();
    assert_eq!(lua, "if a then\n    if b then\n        c()\n    end\nend\n");
}

#[test]
fn test_compile_is_deterministic() {
    let source = "items = {1, 2}\nfor _, v in ipairs(items)\n  total = (total or 0) + v\n";
    let first = compile(source, None).unwrap();
    let second = compile(source, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_interpolation_is_a_render_error() {
    let err = compile("print(\"hi #{name}\")", None).unwrap_err();
    assert_eq!(
        err,
        MoonError::render_error("StringLiteral", "string interpolation is not implemented")
    );
    assert!(!err.is_syntax_error());
}

#[test]
fn test_bad_dedent_is_a_syntax_error() {
    let err = compile("if a\n    f!\n  g!", Some("bad.moon")).unwrap_err();
    assert!(matches!(err, MoonError::ParseError { .. }));
    let location = err.location().unwrap();
    assert_eq!(location.line, 3);
    assert_eq!(location.filename.as_deref(), Some("bad.moon"));
}

#[test]
fn test_lexer_errors_surface() {
    let err = compile("x = $", None).unwrap_err();
    assert!(matches!(err, MoonError::LexerError { .. }));
}

#[test]
fn test_ast_serializes_with_node_tags() {
    let ast = parse("x = f(1)", None).unwrap();
    let json = serde_json::to_value(&ast).unwrap();
    let stmt = &json["block"]["statements"][0];
    assert_eq!(stmt["type"], "Assignment");
    assert_eq!(stmt["targets"][0]["type"], "Name");
    assert_eq!(stmt["values"][0]["type"], "Chain");
    assert_eq!(stmt["values"][0]["ops"][0]["type"], "Call");
}
