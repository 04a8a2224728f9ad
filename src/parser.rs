/*!
Recursive‑descent parser for Skeptical.

Consumes the token slice produced by the [`Scanner`](crate::scanner::Scanner)
and builds an owned [`Program`].  Each token is consumed once, so parsing is
Θ(n) in the number of tokens; call‑stack depth grows with syntactic nesting.

### Logging Policy

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`       | `info` | Lifecycle milestones.                     |
| `declaration`, `statement`   | `debug`| Descent into grammar branches.            |

Grammar
-------

```text
program     → ("static" "division" staticDecl*)? "dynamic" "division" statement* EOF ;
staticDecl  → ("program" | "author" | "date") STRING ";"
            | "const" IDENT "=" expression ";" ;
statement   → assign | print | input | if | loop | rand | func | call ;
assign      → IDENT "=" expression ( "as" ( "number" | "string" ) )? ";" ;
print       → "print" expression ";" ;
input       → "input" IDENT STRING? ";" ;
if          → "if" expression block ( "else" ( block | if ) )? ;
loop        → "loop" IDENT "from" expression "to" expression block ;
rand        → "rand" IDENT "from" expression "to" expression ";" ;
func        → "func" IDENT "(" params? ")" "returns" IDENT block ;
call        → "call" IDENT "(" arguments? ")" ";" ;
block       → "{" statement* "}" ;
expression  → disjunction ;
disjunction → conjunction ( "or" conjunction )* ;
conjunction → comparison ( "and" comparison )* ;
comparison  → sum ( ( "==" | "!=" | "<" | ">" | "<=" | ">=" ) sum )? ;
sum         → term ( ( "+" | "-" ) term )* ;
term        → power ( ( "*" | "/" ) power )* ;
power       → unary ( "^" power )? ;
unary       → "-" unary | primary ;
primary     → NUMBER | STRING | IDENT | "(" expression ")" ;
```
*/

use crate::ast::{
    CompareOp, DeclKind, Expr, Program, StaticDecl, Stmt, StmtKind, SumOp, TermOp, TypeTag,
    UnaryOp,
};
use crate::error::{Result, SkepticalError};
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Upper bound on parameters and call arguments.
const MAX_ARITY: usize = 255;

/// Upper bound on nested statements, parentheses, unary minus and `^` chains.
const MAX_NESTING: usize = 1024;

/// Top‑level parser over an immutable slice of tokens.  The slice is expected
/// to end with the `EOF` token emitted by the scanner.
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    current: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program.
    pub fn parse(&mut self) -> Result<Program> {
        info!("Beginning parse phase");

        self.ensure_terminated()?;

        let mut program = Program::default();

        if self.matches(TokenType::STATIC) {
            self.consume(TokenType::DIVISION, "Expected 'division' after 'static'")?;

            while !self.check(TokenType::DYNAMIC) && !self.is_at_end() {
                program.static_division.push(self.declaration()?);
            }
        }

        self.consume(TokenType::DYNAMIC, "Expected 'dynamic division'")?;
        self.consume(TokenType::DIVISION, "Expected 'division' after 'dynamic'")?;

        while !self.is_at_end() {
            program.dynamic_division.push(self.statement()?);
        }

        info!(
            "Parsed {} declaration(s) and {} statement(s)",
            program.static_division.len(),
            program.dynamic_division.len()
        );

        Ok(program)
    }

    /// Parse a single expression that must span the whole token stream.
    pub fn parse_expression(&mut self) -> Result<Expr> {
        self.ensure_terminated()?;

        let expr = self.expression()?;

        if !self.is_at_end() {
            return Err(SkepticalError::parse(
                self.peek().line,
                format!("Unexpected '{}' after expression", self.peek().lexeme),
            ));
        }

        Ok(expr)
    }

    // ──────────────────────── static division ─────────────────────

    fn declaration(&mut self) -> Result<StaticDecl> {
        debug!("Entering declaration");

        let line = self.peek().line;

        let kind = if self.matches(TokenType::PROGRAM) {
            DeclKind::ProgramId(self.metadata("program")?)
        } else if self.matches(TokenType::AUTHOR) {
            DeclKind::Author(self.metadata("author")?)
        } else if self.matches(TokenType::DATE) {
            DeclKind::Date(self.metadata("date")?)
        } else if self.matches(TokenType::CONST) {
            let name = self.identifier("Expected constant name after 'const'")?;
            self.consume(TokenType::EQUAL, "Expected '=' after constant name")?;
            let value = self.expression()?;
            self.consume(TokenType::SEMICOLON, "Expected ';' after constant value")?;

            DeclKind::Const { name, value }
        } else {
            return Err(SkepticalError::parse(
                line,
                format!(
                    "Expected declaration in static division, found '{}'",
                    self.peek().lexeme
                ),
            ));
        };

        Ok(StaticDecl { kind, line })
    }

    fn metadata(&mut self, keyword: &str) -> Result<String> {
        let text = self.string_literal(&format!("Expected string after '{}'", keyword))?;
        self.consume(
            TokenType::SEMICOLON,
            &format!("Expected ';' after {} declaration", keyword),
        )?;

        Ok(text)
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt> {
        self.nested(Self::simple_statement)
    }

    fn simple_statement(&mut self) -> Result<Stmt> {
        debug!("Entering statement at line {}", self.peek().line);

        let line = self.peek().line;

        let kind = if self.matches(TokenType::PRINT) {
            let value = self.expression()?;
            self.consume(TokenType::SEMICOLON, "Expected ';' after value")?;
            StmtKind::Print(value)
        } else if self.matches(TokenType::INPUT) {
            self.input_statement()?
        } else if self.matches(TokenType::IF) {
            self.if_statement()?
        } else if self.matches(TokenType::LOOP) {
            self.loop_statement()?
        } else if self.matches(TokenType::RAND) {
            self.rand_statement()?
        } else if self.matches(TokenType::FUNC) {
            self.function()?
        } else if self.matches(TokenType::CALL) {
            self.call_statement()?
        } else if self.check(TokenType::IDENTIFIER) {
            self.assignment()?
        } else {
            return Err(SkepticalError::parse(
                line,
                format!("Expected statement, found '{}'", self.peek().lexeme),
            ));
        };

        Ok(Stmt::new(kind, line))
    }

    fn assignment(&mut self) -> Result<StmtKind> {
        let name = self.identifier("Expected variable name")?;
        self.consume(TokenType::EQUAL, "Expected '=' after variable name")?;
        let value = self.expression()?;

        let type_tag = if self.matches(TokenType::AS) {
            if self.matches(TokenType::NUMBER_TYPE) {
                Some(TypeTag::Number)
            } else if self.matches(TokenType::STRING_TYPE) {
                Some(TypeTag::String)
            } else {
                return Err(SkepticalError::parse(
                    self.peek().line,
                    "Expected 'number' or 'string' after 'as'",
                ));
            }
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after assignment")?;

        Ok(StmtKind::Assign {
            name,
            value,
            type_tag,
        })
    }

    fn input_statement(&mut self) -> Result<StmtKind> {
        let name = self.identifier("Expected variable name after 'input'")?;

        let prompt = if let TokenType::STRING(ref s) = self.peek().token_type {
            self.advance();
            s.clone()
        } else {
            String::new()
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after input statement")?;

        Ok(StmtKind::Input { name, prompt })
    }

    fn if_statement(&mut self) -> Result<StmtKind> {
        let condition = self.expression()?;
        let then_branch = self.block("if condition")?;

        let else_branch = if self.matches(TokenType::ELSE) {
            if self.check(TokenType::IF) {
                // `else if` chains nest as a one‑statement else branch.
                vec![self.statement()?]
            } else {
                self.block("'else'")?
            }
        } else {
            Vec::new()
        };

        Ok(StmtKind::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn loop_statement(&mut self) -> Result<StmtKind> {
        let var = self.identifier("Expected loop variable after 'loop'")?;
        self.consume(TokenType::FROM, "Expected 'from' after loop variable")?;
        let start = self.expression()?;
        self.consume(TokenType::TO, "Expected 'to' after loop start")?;
        let end = self.expression()?;
        let body = self.block("loop header")?;

        Ok(StmtKind::Loop {
            var,
            start,
            end,
            body,
        })
    }

    fn rand_statement(&mut self) -> Result<StmtKind> {
        let name = self.identifier("Expected variable name after 'rand'")?;
        self.consume(TokenType::FROM, "Expected 'from' after rand variable")?;
        let min = self.expression()?;
        self.consume(TokenType::TO, "Expected 'to' after rand minimum")?;
        let max = self.expression()?;
        self.consume(TokenType::SEMICOLON, "Expected ';' after rand statement")?;

        Ok(StmtKind::Rand { name, min, max })
    }

    fn function(&mut self) -> Result<StmtKind> {
        let name = self.identifier("Expected function name")?;
        let line = self.previous().line;

        self.consume(TokenType::LEFT_PAREN, "Expected '(' after function name")?;

        let mut params: Vec<String> = Vec::new();
        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARITY {
                    return Err(SkepticalError::parse(
                        line,
                        "Cannot have more than 255 parameters",
                    ));
                }

                params.push(self.identifier("Expected parameter name")?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after parameters")?;
        self.consume(TokenType::RETURNS, "Expected 'returns' after parameters")?;
        let returns = self.identifier("Expected return variable after 'returns'")?;
        let body = self.block("function header")?;

        Ok(StmtKind::FuncDef {
            name,
            params,
            body,
            returns,
        })
    }

    fn call_statement(&mut self) -> Result<StmtKind> {
        let name = self.identifier("Expected function name after 'call'")?;
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after function name")?;

        let mut args: Vec<Expr> = Vec::new();
        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if args.len() >= MAX_ARITY {
                    return Err(SkepticalError::parse(
                        self.peek().line,
                        "Cannot have more than 255 arguments",
                    ));
                }

                args.push(self.expression()?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after arguments")?;
        self.consume(TokenType::SEMICOLON, "Expected ';' after call")?;

        Ok(StmtKind::Call { name, args })
    }

    fn block(&mut self, after: &str) -> Result<Vec<Stmt>> {
        self.consume(
            TokenType::LEFT_BRACE,
            &format!("Expected '{{' after {}", after),
        )?;

        let mut statements: Vec<Stmt> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after block")?;
        Ok(statements)
    }

    // ───────────────────────── expression rules ───────────────────

    fn expression(&mut self) -> Result<Expr> {
        self.nested(Self::disjunction)
    }

    fn disjunction(&mut self) -> Result<Expr> {
        let mut expr = self.conjunction()?;

        while self.matches(TokenType::OR) {
            let right = self.conjunction()?;
            expr = Expr::Disjunction(Box::new(expr), Box::new(right));
        }

        Ok(expr)
    }

    fn conjunction(&mut self) -> Result<Expr> {
        let mut expr = self.comparison()?;

        while self.matches(TokenType::AND) {
            let right = self.comparison()?;
            expr = Expr::Conjunction(Box::new(expr), Box::new(right));
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr> {
        let expr = self.sum()?;

        let op = match self.peek().token_type {
            TokenType::EQUAL_EQUAL => CompareOp::Equal,
            TokenType::BANG_EQUAL => CompareOp::NotEqual,
            TokenType::LESS => CompareOp::Less,
            TokenType::GREATER => CompareOp::Greater,
            TokenType::LESS_EQUAL => CompareOp::LessEqual,
            TokenType::GREATER_EQUAL => CompareOp::GreaterEqual,
            _ => return Ok(expr),
        };

        self.advance();
        let right = self.sum()?;

        Ok(Expr::compare(expr, op, right))
    }

    fn sum(&mut self) -> Result<Expr> {
        let mut expr = self.term()?;

        loop {
            let op = if self.matches(TokenType::PLUS) {
                SumOp::Add
            } else if self.matches(TokenType::MINUS) {
                SumOp::Sub
            } else {
                break;
            };

            let right = self.term()?;
            expr = Expr::sum(expr, op, right);
        }

        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut expr = self.power()?;

        loop {
            let op = if self.matches(TokenType::STAR) {
                TermOp::Mul
            } else if self.matches(TokenType::SLASH) {
                TermOp::Div
            } else {
                break;
            };

            let right = self.power()?;
            expr = Expr::term(expr, op, right);
        }

        Ok(expr)
    }

    /// Right‑associative: the exponent is itself a `power`.
    fn power(&mut self) -> Result<Expr> {
        let base = self.unary()?;

        if self.matches(TokenType::CARET) {
            let exponent = self.nested(Self::power)?;
            return Ok(Expr::power(base, Some(exponent)));
        }

        Ok(base)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::MINUS) {
            let operand = self.nested(Self::unary)?;
            return Ok(Expr::Unary(UnaryOp::Negate, Box::new(operand)));
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        if let TokenType::NUMBER(n) = self.peek().token_type {
            self.advance();
            return Ok(Expr::Number(n));
        }

        if let TokenType::STRING(ref s) = self.peek().token_type {
            self.advance();
            return Ok(Expr::Str(s.clone()));
        }

        if self.matches(TokenType::IDENTIFIER) {
            return Ok(Expr::Identifier(self.previous().lexeme.to_string()));
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr = self.expression()?;

            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after expression")?;

            return Ok(Expr::Group(Box::new(expr)));
        }

        Err(SkepticalError::parse(self.peek().line, "Expected expression"))
    }

    // ────────────────────── utility helpers ───────────────────────

    /// Runs one recursive grammar rule, refusing input nested deeper than
    /// [`MAX_NESTING`].
    fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            return Err(SkepticalError::parse(
                self.peek().line,
                format!("Nesting exceeds {} levels", MAX_NESTING),
            ));
        }

        self.depth += 1;
        let result = ensure_sufficient_stack(|| rule(self));
        self.depth -= 1;

        result
    }

    fn ensure_terminated(&self) -> Result<()> {
        match self.tokens.last() {
            Some(token) if token.token_type == TokenType::EOF => Ok(()),
            Some(token) => Err(SkepticalError::parse(
                token.line,
                "Token stream does not end with EOF",
            )),
            None => Err(SkepticalError::parse(1, "Empty token stream")),
        }
    }

    fn identifier(&mut self, message: &str) -> Result<String> {
        Ok(self
            .consume(TokenType::IDENTIFIER, message)?
            .lexeme
            .to_string())
    }

    fn string_literal(&mut self, message: &str) -> Result<String> {
        if let TokenType::STRING(ref s) = self.peek().token_type {
            self.advance();
            return Ok(s.clone());
        }

        Err(SkepticalError::parse(self.peek().line, message))
    }

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<&'a Token<'a>> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        Err(SkepticalError::parse(self.peek().line, message))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &'a Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    #[inline(always)]
    fn peek(&self) -> &'a Token<'a> {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &'a Token<'a> {
        &self.tokens[self.current.saturating_sub(1)]
    }
}
