//! Lua code generator
//!
//! Walks the AST once and returns Lua source. Statements render to text
//! whose first line is unindented (the enclosing block adds the prefix)
//! while any further lines, including the closing `end`, carry their own
//! indentation. Rendering is all-or-nothing: the first node that cannot be
//! expressed aborts the translation with a `RenderError`.

use super::state::{RenderOptions, RenderState};
use crate::error::{MoonError, MoonResult};
use crate::parser::ast::*;

/// AST to Lua translator
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: RenderOptions,
}

impl Generator {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a whole program. Every call starts from depth zero, so the
    /// same tree always yields the same text.
    pub fn generate(&self, ast: &Ast) -> MoonResult<String> {
        let mut state = RenderState::new(&self.options.indent_unit);
        self.block(&ast.block, &mut state)
    }

    /// One line per statement at the current depth
    pub fn block(&self, block: &Block, state: &mut RenderState) -> MoonResult<String> {
        let mut out = String::new();
        for stmt in &block.statements {
            let text = self.statement(stmt, state)?;
            out.push_str(&state.with_indent(&text));
            out.push('\n');
        }
        Ok(out)
    }

    fn nested(&self, block: &Block, state: &mut RenderState) -> MoonResult<String> {
        state.indent();
        let body = self.block(block, state);
        state.dedent();
        body
    }

    /// Loop bodies get a trailing `::continue::` label when they use `continue`
    fn loop_body(&self, block: &Block, state: &mut RenderState) -> MoonResult<String> {
        if !contains_continue(block) {
            return self.nested(block, state);
        }

        state.indent();
        let body = self.labelled_block(block, state);
        state.dedent();
        body
    }

    /// A `return` may not precede the label, so it gets its own `do ... end`
    fn labelled_block(&self, block: &Block, state: &mut RenderState) -> MoonResult<String> {
        let mut out = String::new();
        for stmt in &block.statements {
            let mut text = self.statement(stmt, state)?;
            if let Stmt::Return { .. } = stmt {
                text = format!("do {} end", text);
            }
            out.push_str(&state.with_indent(&text));
            out.push('\n');
        }
        out.push_str(&state.with_indent("::continue::"));
        out.push('\n');
        Ok(out)
    }

    // ===== Statements =====

    pub fn statement(&self, stmt: &Stmt, state: &mut RenderState) -> MoonResult<String> {
        match stmt {
            Stmt::Comment { text } => Ok(format!("--{}", text)),

            Stmt::Assignment { targets, values } => {
                if targets.is_empty() {
                    return Err(MoonError::render_error(stmt.kind(), "no assignment targets"));
                }
                if values.is_empty() {
                    return Err(MoonError::render_error(stmt.kind(), "expression list is empty"));
                }

                let names = targets
                    .iter()
                    .map(|target| self.assign_target(target, state))
                    .collect::<MoonResult<Vec<_>>>()?;
                let values = self.expression_list(values, state)?;

                Ok(format!("{} = {}", names.join(", "), values))
            }

            Stmt::Expression { expr } => self.expression(expr, state),

            Stmt::If {
                condition,
                body,
                else_ifs,
                else_body,
            } => {
                let mut out = format!("if {} then\n", self.expression(condition, state)?);
                out.push_str(&self.nested(body, state)?);

                for clause in else_ifs {
                    let condition = self.expression(&clause.condition, state)?;
                    out.push_str(&state.with_indent(&format!("elseif {} then\n", condition)));
                    out.push_str(&self.nested(&clause.body, state)?);
                }

                if let Some(else_body) = else_body {
                    out.push_str(&state.with_indent("else\n"));
                    out.push_str(&self.nested(else_body, state)?);
                }

                out.push_str(&state.with_indent("end"));
                Ok(out)
            }

            Stmt::While { condition, body } => {
                let mut out = format!("while {} do\n", self.expression(condition, state)?);
                out.push_str(&self.loop_body(body, state)?);
                out.push_str(&state.with_indent("end"));
                Ok(out)
            }

            Stmt::NumericFor {
                index,
                start,
                end,
                step,
                body,
            } => {
                let mut header = format!(
                    "for {} = {}, {}",
                    index,
                    self.expression(start, state)?,
                    self.expression(end, state)?
                );
                if let Some(step) = step {
                    header.push_str(", ");
                    header.push_str(&self.expression(step, state)?);
                }

                let mut out = header;
                out.push_str(" do\n");
                out.push_str(&self.loop_body(body, state)?);
                out.push_str(&state.with_indent("end"));
                Ok(out)
            }

            Stmt::ForEach {
                names,
                source,
                body,
            } => {
                if names.is_empty() {
                    return Err(MoonError::render_error(stmt.kind(), "no loop variables"));
                }
                if source.is_empty() {
                    return Err(MoonError::render_error(stmt.kind(), "expression list is empty"));
                }

                let mut out = format!(
                    "for {} in {} do\n",
                    names.join(", "),
                    self.expression_list(source, state)?
                );
                out.push_str(&self.loop_body(body, state)?);
                out.push_str(&state.with_indent("end"));
                Ok(out)
            }

            Stmt::Return { values } => {
                if values.is_empty() {
                    Ok("return".to_string())
                } else {
                    Ok(format!("return {}", self.expression_list(values, state)?))
                }
            }

            Stmt::FlowControl { kind } => Ok(match kind {
                FlowControl::Break => "break".to_string(),
                FlowControl::Continue => "goto continue".to_string(),
            }),
        }
    }

    fn assign_target(&self, target: &AssignTarget, state: &mut RenderState) -> MoonResult<String> {
        match target {
            AssignTarget::Name { name } => Ok(name.clone()),
            AssignTarget::SelfField { name } => Ok(format!("self.{}", name)),
            AssignTarget::Chain(chain) => match chain.ops.last() {
                Some(ChainOp::Dot { .. }) | Some(ChainOp::Index { .. }) => self.chain(chain, state),
                _ => Err(MoonError::render_error(
                    "Assignment",
                    "chain target must end in a field or index access",
                )),
            },
        }
    }

    // ===== Expressions =====

    /// Comma-joined expressions; an empty list renders as an empty string
    pub fn expression_list(&self, list: &ExprList, state: &mut RenderState) -> MoonResult<String> {
        let rendered = list
            .iter()
            .map(|expr| self.expression(expr, state))
            .collect::<MoonResult<Vec<_>>>()?;
        Ok(rendered.join(", "))
    }

    pub fn expression(&self, expr: &Expr, state: &mut RenderState) -> MoonResult<String> {
        match expr {
            Expr::Primitive { value } => Ok(value.clone()),

            Expr::Number(number) => Ok(number.text.clone()),

            Expr::String(string) => self.string(string),

            Expr::Ref { name } => Ok(name.clone()),

            Expr::SelfRef { name } => {
                if name.is_empty() {
                    Ok("self".to_string())
                } else {
                    Ok(format!("self.{}", name))
                }
            }

            Expr::Parens { expr } => Ok(format!("({})", self.expression(expr, state)?)),

            Expr::Binary(chain) => {
                let mut out = self.expression(&chain.head, state)?;
                for (operator, value) in &chain.rest {
                    out.push(' ');
                    out.push_str(operator.as_lua());
                    out.push(' ');
                    out.push_str(&self.expression(value, state)?);
                }
                Ok(out)
            }

            Expr::Unary { operator, operand } => {
                let operand = self.expression(operand, state)?;
                Ok(match operator {
                    UnaryOp::Not => format!("not {}", operand),
                    // `--` would open a Lua comment
                    UnaryOp::Negate if operand.starts_with('-') => format!("- {}", operand),
                    UnaryOp::Negate => format!("-{}", operand),
                    UnaryOp::Length => format!("#{}", operand),
                })
            }

            Expr::Chain(chain) => self.chain(chain, state),

            Expr::Table(table) => self.table(table, state),

            Expr::Function(function) => self.function(function, state),
        }
    }

    fn string(&self, string: &StringLiteral) -> MoonResult<String> {
        let mut out = String::new();
        out.push(string.delimiter);
        for part in &string.parts {
            match part {
                StringPart::Text { text } => out.push_str(text),
                StringPart::Interpolation { .. } => {
                    return Err(MoonError::render_error(
                        "StringLiteral",
                        "string interpolation is not implemented",
                    ));
                }
            }
        }
        out.push(string.delimiter);
        Ok(out)
    }

    fn chain(&self, chain: &Chain, state: &mut RenderState) -> MoonResult<String> {
        let target = self.expression(&chain.target, state)?;
        let mut out = if is_prefix_expression(&chain.target) {
            target
        } else {
            format!("({})", target)
        };

        for op in &chain.ops {
            match op {
                ChainOp::Call { args } => {
                    out.push('(');
                    out.push_str(&self.expression_list(args, state)?);
                    out.push(')');
                }
                ChainOp::Dot { field } => {
                    out.push('.');
                    out.push_str(field);
                }
                ChainOp::Method { field } => {
                    out.push(':');
                    out.push_str(field);
                }
                ChainOp::Index { index } => {
                    out.push('[');
                    out.push_str(&self.expression(index, state)?);
                    out.push(']');
                }
            }
        }

        Ok(out)
    }

    fn table(&self, table: &Table, state: &mut RenderState) -> MoonResult<String> {
        let entries = table
            .entries
            .iter()
            .map(|entry| {
                let value = self.expression(&entry.value, state)?;
                Ok(match &entry.key {
                    None => value,
                    Some(TableKey::Name { name }) => format!("{} = {}", name, value),
                    Some(TableKey::Expr { expr }) => {
                        format!("[{}] = {}", self.expression(expr, state)?, value)
                    }
                })
            })
            .collect::<MoonResult<Vec<_>>>()?;

        Ok(format!("{{{}}}", entries.join(", ")))
    }

    fn function(&self, function: &FunctionExpr, state: &mut RenderState) -> MoonResult<String> {
        let mut names: Vec<&str> = Vec::with_capacity(function.params.len() + 1);
        if function.is_method {
            names.push("self");
        }
        names.extend(function.params.iter().map(|param| param.name.as_str()));

        let mut out = format!("function({})\n", names.join(", "));

        state.indent();
        let prologue = self.default_params(&function.params, state);
        state.dedent();
        out.push_str(&prologue?);

        out.push_str(&self.nested(&function.body, state)?);
        out.push_str(&state.with_indent("end"));
        Ok(out)
    }

    /// `if b == nil then b = <default> end` for every defaulted parameter
    fn default_params(&self, params: &[Param], state: &mut RenderState) -> MoonResult<String> {
        let mut out = String::new();
        for param in params {
            let Some(default) = &param.default else {
                continue;
            };

            out.push_str(&state.with_indent(&format!("if {} == nil then\n", param.name)));
            state.indent();
            let value = self.expression(default, state);
            let line =
                value.map(|value| state.with_indent(&format!("{} = {}\n", param.name, value)));
            state.dedent();
            out.push_str(&line?);
            out.push_str(&state.with_indent("end\n"));
        }
        Ok(out)
    }
}

/// Expressions Lua accepts directly before a call, field or index
fn is_prefix_expression(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Ref { .. } | Expr::SelfRef { .. } | Expr::Parens { .. } | Expr::Chain(_)
    )
}

/// Whether `block` holds a `continue` that binds to the enclosing loop
fn contains_continue(block: &Block) -> bool {
    block.statements.iter().any(|stmt| match stmt {
        Stmt::FlowControl {
            kind: FlowControl::Continue,
        } => true,
        Stmt::If {
            body,
            else_ifs,
            else_body,
            ..
        } => {
            contains_continue(body)
                || else_ifs.iter().any(|clause| contains_continue(&clause.body))
                || else_body.as_ref().map_or(false, contains_continue)
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn r(name: &str) -> Expr {
        Expr::reference(name)
    }

    fn int(text: &str) -> Expr {
        Expr::integer(text)
    }

    fn call(target: Expr, args: Vec<Expr>) -> Expr {
        Expr::Chain(Chain {
            target: Box::new(target),
            ops: vec![ChainOp::Call {
                args: ExprList::new(args),
            }],
        })
    }

    fn call_stmt(name: &str) -> Stmt {
        Stmt::Expression {
            expr: call(r(name), vec![]),
        }
    }

    fn render(stmts: Vec<Stmt>) -> MoonResult<String> {
        Generator::default().generate(&Ast {
            block: Block::new(stmts),
        })
    }

    fn render_expr(expr: &Expr) -> MoonResult<String> {
        let generator = Generator::default();
        let mut state = RenderState::new("  ");
        generator.expression(expr, &mut state)
    }

    #[test]
    fn test_numbers_render_verbatim() {
        for (kind, text) in [
            (NumberKind::Integer, "0x1A"),
            (NumberKind::Exponent, "1e10"),
            (NumberKind::Float, "3.0"),
            (NumberKind::Float, "3.14"),
        ] {
            assert_eq!(render_expr(&Expr::number(kind, text)).unwrap(), text);
        }
    }

    #[test]
    fn test_chain_applies_ops_in_order() {
        let chain = Expr::Chain(Chain {
            target: Box::new(r("a")),
            ops: vec![
                ChainOp::Dot {
                    field: "b".to_string(),
                },
                ChainOp::Method {
                    field: "c".to_string(),
                },
                ChainOp::Call {
                    args: ExprList::new(vec![int("1")]),
                },
                ChainOp::Index { index: int("2") },
            ],
        });
        assert_eq!(render_expr(&chain).unwrap(), "a.b:c(1)[2]");
    }

    #[test]
    fn test_empty_call_arguments() {
        assert_eq!(render_expr(&call(r("f"), vec![])).unwrap(), "f()");
    }

    #[test]
    fn test_non_prefix_chain_target_is_parenthesized() {
        let chain = Expr::Chain(Chain {
            target: Box::new(Expr::String(StringLiteral {
                delimiter: '"',
                parts: vec![StringPart::Text {
                    text: "x".to_string(),
                }],
            })),
            ops: vec![
                ChainOp::Method {
                    field: "upper".to_string(),
                },
                ChainOp::Call {
                    args: ExprList::empty(),
                },
            ],
        });
        assert_eq!(render_expr(&chain).unwrap(), "(\"x\"):upper()");
    }

    #[test]
    fn test_table_shapes() {
        let table = Expr::Table(Table {
            entries: vec![
                TableEntry {
                    key: None,
                    value: int("1"),
                },
                TableEntry {
                    key: None,
                    value: int("2"),
                },
                TableEntry {
                    key: Some(TableKey::Name {
                        name: "x".to_string(),
                    }),
                    value: int("3"),
                },
            ],
        });
        assert_eq!(render_expr(&table).unwrap(), "{1, 2, x = 3}");

        let keyed = Expr::Table(Table {
            entries: vec![TableEntry {
                key: Some(TableKey::Expr {
                    expr: call(r("foo"), vec![]),
                }),
                value: int("4"),
            }],
        });
        assert_eq!(render_expr(&keyed).unwrap(), "{[foo()] = 4}");
        assert_eq!(render_expr(&Expr::Table(Table::default())).unwrap(), "{}");
    }

    #[test]
    fn test_return_forms() {
        let empty = Stmt::Return {
            values: ExprList::empty(),
        };
        let single = Stmt::Return {
            values: ExprList::new(vec![r("x")]),
        };
        let multi = Stmt::Return {
            values: ExprList::new(vec![r("x"), int("2")]),
        };
        assert_eq!(render(vec![empty, single, multi]).unwrap(), "return\nreturn x\nreturn x, 2\n");
    }

    #[test]
    fn test_method_injects_receiver() {
        let function = |is_method| {
            Expr::Function(FunctionExpr {
                is_method,
                params: vec![Param::named("a"), Param::named("b")],
                body: Block::default(),
            })
        };
        assert_eq!(render_expr(&function(true)).unwrap(), "function(self, a, b)\nend");
        assert_eq!(render_expr(&function(false)).unwrap(), "function(a, b)\nend");
    }

    #[test]
    fn test_function_body_indentation() {
        let ast = vec![Stmt::Assignment {
            targets: vec![AssignTarget::Name {
                name: "f".to_string(),
            }],
            values: ExprList::new(vec![Expr::Function(FunctionExpr {
                is_method: false,
                params: vec![
                    Param::named("a"),
                    Param {
                        name: "b".to_string(),
                        default: Some(int("1")),
                    },
                ],
                body: Block::new(vec![Stmt::Return {
                    values: ExprList::new(vec![Expr::Binary(BinaryChain {
                        head: Box::new(r("a")),
                        rest: vec![(BinaryOp::Add, r("b"))],
                    })]),
                }]),
            })]),
        }];

        let expected = "\
f = function(a, b)
  if b == nil then
    b = 1
  end
  return a + b
end
";
        assert_eq!(render(ast).unwrap(), expected);
    }

    #[test]
    fn test_if_elseif_else() {
        let stmt = Stmt::If {
            condition: r("a"),
            body: Block::new(vec![call_stmt("one")]),
            else_ifs: vec![ElseIf {
                condition: r("b"),
                body: Block::new(vec![Stmt::If {
                    condition: r("c"),
                    body: Block::new(vec![call_stmt("two")]),
                    else_ifs: vec![],
                    else_body: None,
                }]),
            }],
            else_body: Some(Block::new(vec![call_stmt("three")])),
        };

        let expected = "\
if a then
  one()
elseif b then
  if c then
    two()
  end
else
  three()
end
";
        assert_eq!(render(vec![stmt]).unwrap(), expected);
    }

    #[test]
    fn test_empty_else_is_still_rendered() {
        let stmt = Stmt::If {
            condition: r("a"),
            body: Block::new(vec![call_stmt("one")]),
            else_ifs: vec![],
            else_body: Some(Block::default()),
        };
        assert_eq!(render(vec![stmt]).unwrap(), "if a then\n  one()\nelse\nend\n");
    }

    #[test]
    fn test_loops() {
        let stmts = vec![
            Stmt::While {
                condition: Expr::Primitive {
                    value: "true".to_string(),
                },
                body: Block::new(vec![Stmt::FlowControl {
                    kind: FlowControl::Break,
                }]),
            },
            Stmt::NumericFor {
                index: "i".to_string(),
                start: int("1"),
                end: int("10"),
                step: Some(int("2")),
                body: Block::new(vec![call_stmt("tick")]),
            },
            Stmt::NumericFor {
                index: "i".to_string(),
                start: int("1"),
                end: r("n"),
                step: None,
                body: Block::new(vec![call_stmt("tick")]),
            },
            Stmt::ForEach {
                names: vec!["k".to_string(), "v".to_string()],
                source: ExprList::new(vec![call(r("pairs"), vec![r("t")])]),
                body: Block::new(vec![call_stmt("tick")]),
            },
        ];

        let expected = "\
while true do
  break
end
for i = 1, 10, 2 do
  tick()
end
for i = 1, n do
  tick()
end
for k, v in pairs(t) do
  tick()
end
";
        assert_eq!(render(stmts).unwrap(), expected);
    }

    #[test]
    fn test_continue_adds_label_to_its_loop() {
        let inner = Stmt::If {
            condition: r("skip"),
            body: Block::new(vec![Stmt::FlowControl {
                kind: FlowControl::Continue,
            }]),
            else_ifs: vec![],
            else_body: None,
        };
        let stmt = Stmt::ForEach {
            names: vec!["x".to_string()],
            source: ExprList::new(vec![r("items")]),
            body: Block::new(vec![inner, call_stmt("use")]),
        };

        let expected = "\
for x in items do
  if skip then
    goto continue
  end
  use()
  ::continue::
end
";
        assert_eq!(render(vec![stmt]).unwrap(), expected);
    }

    #[test]
    fn test_return_before_continue_label_is_wrapped() {
        let skip = Stmt::If {
            condition: r("x"),
            body: Block::new(vec![Stmt::FlowControl {
                kind: FlowControl::Continue,
            }]),
            else_ifs: vec![],
            else_body: None,
        };
        let stmt = Stmt::While {
            condition: r("x"),
            body: Block::new(vec![
                skip,
                Stmt::Return {
                    values: ExprList::new(vec![r("x")]),
                },
            ]),
        };

        let expected = "\
while x do
  if x then
    goto continue
  end
  do return x end
  ::continue::
end
";
        assert_eq!(render(vec![stmt]).unwrap(), expected);
    }

    #[test]
    fn test_return_without_continue_is_not_wrapped() {
        let stmt = Stmt::While {
            condition: r("x"),
            body: Block::new(vec![Stmt::Return {
                values: ExprList::empty(),
            }]),
        };
        assert_eq!(render(vec![stmt]).unwrap(), "while x do\n  return\nend\n");
    }

    #[test]
    fn test_nested_indentation_uses_unit() {
        let stmt = Stmt::While {
            condition: r("a"),
            body: Block::new(vec![Stmt::While {
                condition: r("b"),
                body: Block::new(vec![call_stmt("c")]),
            }]),
        };
        let generator = Generator::new(RenderOptions::spaces(4));
        let ast = Ast {
            block: Block::new(vec![stmt]),
        };
        assert_eq!(
            generator.generate(&ast).unwrap(),
            "while a do\n    while b do\n        c()\n    end\nend\n"
        );
    }

    #[test]
    fn test_assignment_arity_is_not_checked() {
        let stmt = Stmt::Assignment {
            targets: vec![
                AssignTarget::Name {
                    name: "a".to_string(),
                },
                AssignTarget::SelfField {
                    name: "b".to_string(),
                },
            ],
            values: ExprList::new(vec![int("1"), int("2"), int("3")]),
        };
        assert_eq!(render(vec![stmt]).unwrap(), "a, self.b = 1, 2, 3\n");
    }

    #[test]
    fn test_empty_assignment_values_is_error() {
        let stmt = Stmt::Assignment {
            targets: vec![AssignTarget::Name {
                name: "a".to_string(),
            }],
            values: ExprList::empty(),
        };
        let err = render(vec![stmt]).unwrap_err();
        assert_eq!(
            err,
            MoonError::render_error("Assignment", "expression list is empty")
        );
    }

    #[test]
    fn test_empty_foreach_source_is_error() {
        let stmt = Stmt::ForEach {
            names: vec!["x".to_string()],
            source: ExprList::empty(),
            body: Block::default(),
        };
        assert!(matches!(
            render(vec![stmt]),
            Err(MoonError::RenderError { node: "ForEach", .. })
        ));
    }

    #[test]
    fn test_call_target_assignment_is_error() {
        let stmt = Stmt::Assignment {
            targets: vec![AssignTarget::Chain(Chain {
                target: Box::new(r("f")),
                ops: vec![ChainOp::Call {
                    args: ExprList::empty(),
                }],
            })],
            values: ExprList::new(vec![int("1")]),
        };
        assert!(matches!(
            render(vec![stmt]),
            Err(MoonError::RenderError { node: "Assignment", .. })
        ));
    }

    #[test]
    fn test_interpolation_is_unimplemented() {
        let string = Expr::String(StringLiteral {
            delimiter: '"',
            parts: vec![
                StringPart::Text {
                    text: "hi ".to_string(),
                },
                StringPart::Interpolation {
                    expr: Box::new(r("name")),
                },
            ],
        });
        let err = render_expr(&string).unwrap_err();
        assert_eq!(err.message(), "string interpolation is not implemented");
    }

    #[test]
    fn test_plain_strings_and_leaves() {
        let single = Expr::String(StringLiteral {
            delimiter: '\'',
            parts: vec![StringPart::Text {
                text: "a\\'b".to_string(),
            }],
        });
        assert_eq!(render_expr(&single).unwrap(), "'a\\'b'");
        assert_eq!(
            render_expr(&Expr::SelfRef {
                name: "x".to_string()
            })
            .unwrap(),
            "self.x"
        );
        assert_eq!(
            render_expr(&Expr::SelfRef {
                name: String::new()
            })
            .unwrap(),
            "self"
        );
    }

    #[test]
    fn test_operators_keep_source_order() {
        let expr = Expr::Binary(BinaryChain {
            head: Box::new(int("1")),
            rest: vec![
                (BinaryOp::Add, int("2")),
                (BinaryOp::Multiply, int("3")),
                (BinaryOp::NotEqual, int("4")),
            ],
        });
        assert_eq!(render_expr(&expr).unwrap(), "1 + 2 * 3 ~= 4");
    }

    #[test]
    fn test_unary_operators() {
        let negate_twice = Expr::Unary {
            operator: UnaryOp::Negate,
            operand: Box::new(Expr::Unary {
                operator: UnaryOp::Negate,
                operand: Box::new(r("x")),
            }),
        };
        assert_eq!(render_expr(&negate_twice).unwrap(), "- -x");
        let not_len = Expr::Unary {
            operator: UnaryOp::Not,
            operand: Box::new(Expr::Unary {
                operator: UnaryOp::Length,
                operand: Box::new(r("t")),
            }),
        };
        assert_eq!(render_expr(&not_len).unwrap(), "not #t");
    }

    #[test]
    fn test_generation_is_idempotent() {
        let ast = Ast {
            block: Block::new(vec![
                Stmt::Comment {
                    text: " setup".to_string(),
                },
                Stmt::While {
                    condition: r("running"),
                    body: Block::new(vec![call_stmt("step")]),
                },
            ]),
        };
        let generator = Generator::default();
        let first = generator.generate(&ast).unwrap();
        let second = generator.generate(&ast).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "-- setup\nwhile running do\n  step()\nend\n");
    }
}
