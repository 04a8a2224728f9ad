use std::collections::HashMap;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::rc::Rc;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ast::{DeclKind, Expr, Program, StaticDecl, Stmt, StmtKind};
use crate::config::Config;
use crate::environment::Environment;
use crate::error::{ErrorKind, RuntimeError};
use crate::evaluator::evaluate;
use crate::stack::ensure_sufficient_stack;
use crate::value::Value;

/// Convenient alias for interpreter results.
pub type IResult<T> = Result<T, RuntimeError>;

/// A registered `func` definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub returns: String,
}

/// Metadata collected from the static division.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramInfo {
    pub program_id: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

/// Executes Skeptical programs.
///
/// The interpreter owns the run's single [`Environment`]; statements mutate it
/// in place.  `Print` and `Input` go through the `output` / `input` streams so
/// a run can be driven by the console or by in‑memory buffers.
pub struct Interpreter<R, W> {
    environment: Environment,
    functions: HashMap<String, Rc<Function>>,
    info: ProgramInfo,
    config: Config,
    rng: StdRng,
    depth: usize,
    input: R,
    output: W,
}

impl Interpreter<StdinLock<'static>, Stdout> {
    /// Interpreter reading from stdin and printing to stdout.
    pub fn stdio(config: Config) -> Self {
        Self::new(config, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    pub fn new(config: Config, input: R, output: W) -> Self {
        info!("Initializing Interpreter with {:?}", config);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            environment: Environment::new(),
            functions: HashMap::new(),
            info: ProgramInfo::default(),
            config,
            rng,
            depth: 0,
            input,
            output,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name).map(|function| function.as_ref())
    }

    pub fn program_info(&self) -> &ProgramInfo {
        &self.info
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs a whole program: seeds the environment from the static division,
    /// then executes the dynamic division in order.
    pub fn run(&mut self, program: &Program) -> IResult<()> {
        info!(
            "Running program with {} declaration(s) and {} statement(s)",
            program.static_division.len(),
            program.dynamic_division.len()
        );

        for decl in &program.static_division {
            self.declare(decl)?;
        }

        self.interpret(&program.dynamic_division)?;

        info!(
            "Program finished with {} binding(s)",
            self.environment.len()
        );
        Ok(())
    }

    /// Interprets a list of statements.
    pub fn interpret(&mut self, statements: &[Stmt]) -> IResult<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            self.execute(stmt)?;
        }

        Ok(())
    }

    /// Evaluates one static‑division declaration.  Constants see only the
    /// constants declared before them.
    fn declare(&mut self, decl: &StaticDecl) -> IResult<()> {
        match &decl.kind {
            DeclKind::ProgramId(name) => {
                info!("Program id: {}", name);
                self.info.program_id = Some(name.clone());
            }

            DeclKind::Author(author) => {
                info!("Author: {}", author);
                self.info.author = Some(author.clone());
            }

            DeclKind::Date(date) => {
                info!("Date: {}", date);
                self.info.date = Some(date.clone());
            }

            DeclKind::Const { name, value } => {
                let value = evaluate(value, &self.environment).map_err(|e| e.at(decl.line))?;

                if self.config.enforce_constants && self.environment.is_constant(name) {
                    return Err(ErrorKind::ConstantReassignment(name.clone()).at(decl.line));
                }

                debug!("Constant '{}' = {}", name, value);
                self.environment.define_constant(name, value);
            }
        }

        Ok(())
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> IResult<()> {
        ensure_sufficient_stack(|| self.execute_stmt(stmt))
    }

    fn execute_stmt(&mut self, stmt: &Stmt) -> IResult<()> {
        let line = stmt.line;
        let at = |kind: ErrorKind| kind.at(line);

        debug!("Executing statement at line {}", line);

        match &stmt.kind {
            StmtKind::Assign {
                name,
                value,
                type_tag,
            } => {
                let value = evaluate(value, &self.environment).map_err(at)?;

                if let Some(tag) = type_tag {
                    if value.type_name() != tag.name() {
                        warn!(
                            "[line {}] '{}' is declared {} but assigned a {}",
                            line,
                            name,
                            tag.name(),
                            value.type_name()
                        );
                    }
                }

                debug!("Assigning {} to '{}'", value, name);
                self.bind(name, value).map_err(at)
            }

            StmtKind::Print(value) => {
                let value = evaluate(value, &self.environment).map_err(at)?;

                writeln!(self.output, "{}", value)
                    .and_then(|_| self.output.flush())
                    .map_err(|e| at(e.into()))?;

                debug!("Printed value: {}", value);
                Ok(())
            }

            StmtKind::Input { name, prompt } => {
                let value = self.read_number(prompt).map_err(at)?;
                self.bind(name, value).map_err(at)
            }

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let truthy = evaluate(condition, &self.environment)
                    .and_then(|value| value.is_truthy())
                    .map_err(at)?;

                if truthy {
                    debug!("Condition is truthy; executing then branch");
                    self.interpret(then_branch)
                } else {
                    debug!("Condition is falsy; executing else branch");
                    self.interpret(else_branch)
                }
            }

            StmtKind::Loop {
                var,
                start,
                end,
                body,
            } => {
                let start = self.integer(start).map_err(at)?;
                let end = self.integer(end).map_err(at)?;

                debug!("Loop '{}' from {} to {}", var, start, end);

                for i in start..=end {
                    self.bind(var, Value::Number(i as f64)).map_err(at)?;
                    self.interpret(body)?;
                }

                Ok(())
            }

            StmtKind::Rand { name, min, max } => {
                let min = self.integer(min).map_err(at)?;
                let max = self.integer(max).map_err(at)?;

                if min > max {
                    return Err(at(ErrorKind::InvalidRange { min, max }));
                }

                let n: i64 = self.rng.gen_range(min..=max);
                debug!("rand '{}' drew {} from [{}, {}]", name, n, min, max);

                self.bind(name, Value::Number(n as f64)).map_err(at)
            }

            StmtKind::FuncDef {
                name,
                params,
                body,
                returns,
            } => {
                let function = Function {
                    params: params.clone(),
                    body: body.clone(),
                    returns: returns.clone(),
                };

                if self
                    .functions
                    .insert(name.clone(), Rc::new(function))
                    .is_some()
                {
                    info!("Function '{}' redefined", name);
                } else {
                    info!("Function '{}' defined with {} parameters", name, params.len());
                }

                Ok(())
            }

            StmtKind::Call { name, args } => self.call(name, args, line),
        }
    }

    /// Calls a user function.
    ///
    /// Arguments are evaluated in the caller's environment.  The parameters
    /// are then bound into the same, live environment, the body runs, and
    /// the environment is rolled back to its state before the call.  The
    /// return variable's value (zero when never assigned) ends up bound to
    /// the function's own name.
    fn call(&mut self, name: &str, args: &[Expr], line: usize) -> IResult<()> {
        let at = |kind: ErrorKind| kind.at(line);

        let function = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| at(ErrorKind::UndefinedFunction(name.to_string())))?;

        if args.len() != function.params.len() {
            return Err(at(ErrorKind::ArityMismatch {
                name: name.to_string(),
                expected: function.params.len(),
                found: args.len(),
            }));
        }

        let values = args
            .iter()
            .map(|arg| evaluate(arg, &self.environment))
            .collect::<Result<Vec<Value>, ErrorKind>>()
            .map_err(at)?;

        if self.depth >= self.config.max_call_depth {
            return Err(at(ErrorKind::StackOverflow {
                limit: self.config.max_call_depth,
            }));
        }

        debug!("Calling '{}' at depth {}", name, self.depth);

        let snapshot = self.environment.snapshot();
        self.depth += 1;
        let result = self.run_body(&function, values, line);
        self.depth -= 1;
        self.environment.restore(snapshot);

        let returned = result?;
        info!("Function '{}' returned: {}", name, returned);

        self.bind(name, returned).map_err(at)
    }

    fn run_body(&mut self, function: &Function, values: Vec<Value>, line: usize) -> IResult<Value> {
        for (param, value) in function.params.iter().zip(values) {
            debug!("Binding parameter '{}' to {}", param, value);
            self.bind(param, value).map_err(|e| e.at(line))?;
        }

        self.interpret(&function.body)?;

        Ok(self
            .environment
            .get(&function.returns)
            .unwrap_or(Value::Number(0.0)))
    }

    /// Writes `name`, honouring constant protection when it is enabled.
    fn bind(&mut self, name: &str, value: Value) -> Result<(), ErrorKind> {
        if self.config.enforce_constants {
            self.environment.assign(name, value)
        } else {
            self.environment.set(name, value);
            Ok(())
        }
    }

    fn integer(&self, expr: &Expr) -> Result<i64, ErrorKind> {
        evaluate(expr, &self.environment)?.as_integer()
    }

    /// Shows `prompt`, then reads one line and parses it as a number.
    fn read_number(&mut self, prompt: &str) -> Result<Value, ErrorKind> {
        if !prompt.is_empty() {
            write!(self.output, "{}: ", prompt)?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ErrorKind::InputFormat("unexpected end of input".to_string()));
        }

        let text = line.trim();
        let n = text
            .parse::<f64>()
            .map_err(|_| ErrorKind::InputFormat(format!("'{}' is not a number", text)))?;

        debug!("Read input value {}", n);
        Ok(Value::Number(n))
    }
}
