use crate::ast::{DeclKind, Expr, Program, Stmt, StmtKind};

/// Renders the AST as parenthesised prefix forms, one statement per line,
/// nested bodies indented by two spaces.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Disjunction(left, right) => {
                format!("(or {} {})", self.print(left), self.print(right))
            }

            Expr::Conjunction(left, right) => {
                format!("(and {} {})", self.print(left), self.print(right))
            }

            Expr::Comparison(left, op, right) => {
                format!("({} {} {})", op, self.print(left), self.print(right))
            }

            Expr::Sum(left, op, right) => {
                format!("({} {} {})", op, self.print(left), self.print(right))
            }

            Expr::Term(left, op, right) => {
                format!("({} {} {})", op, self.print(left), self.print(right))
            }

            Expr::Power(base, Some(exponent)) => {
                format!("(^ {} {})", self.print(base), self.print(exponent))
            }

            Expr::Power(base, None) => self.print(base),

            Expr::Unary(op, operand) => format!("({} {})", op, self.print(operand)),

            Expr::Group(inner) => format!("(group {})", self.print(inner)),

            Expr::Number(n) => {
                if n.fract() == 0.0 {
                    format!("{:.1}", n)
                } else {
                    n.to_string()
                }
            }

            Expr::Str(s) => format!("{:?}", s),

            Expr::Identifier(name) => name.clone(),
        }
    }

    pub fn print_program(&self, program: &Program) -> String {
        let mut out = String::new();

        for decl in &program.static_division {
            let line = match &decl.kind {
                DeclKind::ProgramId(name) => format!("(program {:?})", name),
                DeclKind::Author(name) => format!("(author {:?})", name),
                DeclKind::Date(date) => format!("(date {:?})", date),
                DeclKind::Const { name, value } => {
                    format!("(const {} {})", name, self.print(value))
                }
            };

            out.push_str(&line);
            out.push('\n');
        }

        for stmt in &program.dynamic_division {
            self.write_stmt(&mut out, stmt, 0);
        }

        out
    }

    fn write_stmt(&self, out: &mut String, stmt: &Stmt, depth: usize) {
        let indent = "  ".repeat(depth);

        let head = match &stmt.kind {
            StmtKind::Assign {
                name,
                value,
                type_tag,
            } => match type_tag {
                Some(tag) => format!("(= {} {} {})", name, self.print(value), tag.name()),
                None => format!("(= {} {})", name, self.print(value)),
            },

            StmtKind::Print(value) => format!("(print {})", self.print(value)),

            StmtKind::Input { name, prompt } => format!("(input {} {:?})", name, prompt),

            StmtKind::Rand { name, min, max } => {
                format!("(rand {} {} {})", name, self.print(min), self.print(max))
            }

            StmtKind::Call { name, args } => {
                let args: Vec<String> = args.iter().map(|arg| self.print(arg)).collect();
                format!("(call {} [{}])", name, args.join(" "))
            }

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                out.push_str(&format!("{}(if {}\n", indent, self.print(condition)));
                self.write_body(out, then_branch, depth + 1);

                if !else_branch.is_empty() {
                    out.push_str(&format!("{}else\n", indent));
                    self.write_body(out, else_branch, depth + 1);
                }

                out.push_str(&format!("{})\n", indent));
                return;
            }

            StmtKind::Loop {
                var,
                start,
                end,
                body,
            } => {
                out.push_str(&format!(
                    "{}(loop {} {} {}\n",
                    indent,
                    var,
                    self.print(start),
                    self.print(end)
                ));
                self.write_body(out, body, depth + 1);
                out.push_str(&format!("{})\n", indent));
                return;
            }

            StmtKind::FuncDef {
                name,
                params,
                body,
                returns,
            } => {
                out.push_str(&format!(
                    "{}(func {} [{}] -> {}\n",
                    indent,
                    name,
                    params.join(" "),
                    returns
                ));
                self.write_body(out, body, depth + 1);
                out.push_str(&format!("{})\n", indent));
                return;
            }
        };

        out.push_str(&indent);
        out.push_str(&head);
        out.push('\n');
    }

    fn write_body(&self, out: &mut String, body: &[Stmt], depth: usize) {
        for stmt in body {
            self.write_stmt(out, stmt, depth);
        }
    }
}
