#[cfg(test)]
mod interpreter_tests {
    use pretty_assertions::assert_eq;

    use skeptical::ast::*;
    use skeptical::config::{Config, DEFAULT_MAX_CALL_DEPTH};
    use skeptical::environment::Environment;
    use skeptical::error::{ErrorKind, RuntimeError};
    use skeptical::evaluator::evaluate;
    use skeptical::interpreter::Interpreter;
    use skeptical::parse_program;
    use skeptical::value::Value;

    type TestInterpreter = Interpreter<&'static [u8], Vec<u8>>;

    fn interpreter_with(config: Config, input: &'static str) -> TestInterpreter {
        Interpreter::new(config, input.as_bytes(), Vec::new())
    }

    fn interpreter(input: &'static str) -> TestInterpreter {
        interpreter_with(
            Config {
                seed: Some(7),
                ..Config::default()
            },
            input,
        )
    }

    fn run_source(interp: &mut TestInterpreter, source: &str) -> Result<(), RuntimeError> {
        let program = parse_program(source).expect("test program parses");
        interp.run(&program)
    }

    /// Runs `source` with no input and returns everything it printed.
    fn output_of(source: &str) -> String {
        let mut interp = interpreter("");
        run_source(&mut interp, source).expect("program runs");
        printed(&interp)
    }

    fn printed(interp: &TestInterpreter) -> String {
        String::from_utf8(interp.output().clone()).expect("output is UTF-8")
    }

    fn failure(source: &str) -> RuntimeError {
        let mut interp = interpreter("");
        run_source(&mut interp, source).expect_err("program fails")
    }

    fn number(interp: &TestInterpreter, name: &str) -> f64 {
        interp
            .environment()
            .get(name)
            .and_then(|value| value.as_number())
            .expect("bound to a number")
    }

    // ───────────────────────── expressions ─────────────────────────

    #[test]
    fn numeric_literals_evaluate_to_themselves() {
        let env = Environment::new();

        for n in [0.0, -0.5, 1.0, 42.0, 3.25, 1e300] {
            assert_eq!(evaluate(&Expr::number(n), &env).unwrap(), Value::Number(n));
        }
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(output_of("dynamic division print 2 ^ 3 ^ 2;"), "512\n");
    }

    #[test]
    fn power_without_exponent_is_identity() {
        let env = Environment::new();
        let expr = Expr::power(Expr::number(9.0), None);

        assert_eq!(evaluate(&expr, &env).unwrap(), Value::Number(9.0));
    }

    #[test]
    fn fractional_and_negative_exponents() {
        assert_eq!(
            output_of("dynamic division print 9 ^ 0.5; print 2 ^ -1;"),
            "3\n0.5\n"
        );
    }

    #[test]
    fn power_without_finite_result_is_an_arithmetic_error() {
        let err = failure("dynamic division x = (-8) ^ 0.5;");
        assert!(matches!(err.kind, ErrorKind::Arithmetic(_)), "got: {}", err);

        let err = failure("dynamic division x = 0 ^ -1;");
        assert!(matches!(err.kind, ErrorKind::Arithmetic(_)), "got: {}", err);
    }

    #[test]
    fn division_by_zero_fails() {
        let err = failure("dynamic division\nx = 1;\ny = x / (x - 1);");

        assert!(matches!(err.kind, ErrorKind::Arithmetic(_)));
        assert_eq!(err.line, 3);
        assert_eq!(
            err.to_string(),
            "[line 3] Runtime error: Arithmetic error: division by zero"
        );
    }

    #[test]
    fn comparisons_and_logic_yield_one_or_zero() {
        assert_eq!(
            output_of(
                "dynamic division
                print 1 < 2; print 2 <= 1; print 3 == 3; print 3 != 3;
                print 0 or 5; print 0 and 1; print 2 and -1; print 0 or 0;"
            ),
            "1\n0\n1\n0\n1\n0\n1\n0\n"
        );
    }

    #[test]
    fn logical_operators_evaluate_both_sides() {
        let err = failure("dynamic division x = 0 and missing;");
        assert!(matches!(err.kind, ErrorKind::UnboundIdentifier(ref name) if name == "missing"));

        let err = failure("dynamic division x = 1 or missing;");
        assert!(matches!(err.kind, ErrorKind::UnboundIdentifier(_)));
    }

    #[test]
    fn numeric_strings_coerce() {
        assert_eq!(output_of("dynamic division print \"3\" + 4;"), "7\n");

        let err = failure("dynamic division print \"abc\" * 2;");
        assert!(matches!(err.kind, ErrorKind::TypeMismatch(_)));
    }

    #[test]
    fn unbound_identifier_is_an_error() {
        let err = failure("dynamic division\n\nprint ghost;");

        assert!(matches!(err.kind, ErrorKind::UnboundIdentifier(ref name) if name == "ghost"));
        assert_eq!(err.line, 3);
    }

    #[test]
    fn negation_and_grouping() {
        assert_eq!(
            output_of("dynamic division print -(2 + 3) * 2; print --4;"),
            "-10\n4\n"
        );
    }

    // ───────────────────────── statements ─────────────────────────

    #[test]
    fn print_formats_numbers_and_strings() {
        assert_eq!(
            output_of("dynamic division print \"hello\"; print 2.5; print 10 / 4; print 6 / 3;"),
            "hello\n2.5\n2.5\n2\n"
        );
    }

    #[test]
    fn loop_counts_inclusively() {
        let mut interp = interpreter("");
        run_source(
            &mut interp,
            "dynamic division total = 0; loop i from 1 to 5 { print i; total = total + i; }",
        )
        .unwrap();

        assert_eq!(printed(&interp), "1\n2\n3\n4\n5\n");
        assert_eq!(number(&interp, "total"), 15.0);
        assert_eq!(number(&interp, "i"), 5.0);
    }

    #[test]
    fn reversed_loop_bounds_run_zero_times() {
        let mut interp = interpreter("");
        run_source(&mut interp, "dynamic division loop i from 5 to 1 { print i; }").unwrap();

        assert_eq!(printed(&interp), "");
        assert!(!interp.environment().contains("i"));
    }

    #[test]
    fn loop_bounds_must_be_integers() {
        let err = failure("dynamic division loop i from 1 to 2.5 { print i; }");
        assert!(matches!(err.kind, ErrorKind::TypeMismatch(_)));
    }

    #[test]
    fn if_picks_a_branch_by_truthiness() {
        assert_eq!(
            output_of(
                "dynamic division
                x = 4;
                if x > 3 { print \"big\"; } else { print \"small\"; }
                if x - 4 { print \"nonzero\"; } else { print \"zero\"; }
                if 0 { print \"never\"; }
                if x == 1 { print 1; } else if x == 4 { print 4; } else { print 0; }"
            ),
            "big\nzero\n4\n"
        );
    }

    #[test]
    fn type_tags_are_advisory() {
        let mut interp = interpreter("");
        run_source(&mut interp, "dynamic division s = 5 as string; n = \"x\" as number;").unwrap();

        assert_eq!(interp.environment().get("s").unwrap(), Value::Number(5.0));
        assert_eq!(interp.environment().get("n").unwrap(), Value::from("x"));
    }

    #[test]
    fn degenerate_rand_range_is_deterministic() {
        let mut interp = interpreter("");
        let program = Program {
            static_division: vec![],
            dynamic_division: vec![Stmt::new(
                StmtKind::Rand {
                    name: "x".into(),
                    min: Expr::number(1.0),
                    max: Expr::number(1.0),
                },
                1,
            )],
        };

        interp.run(&program).unwrap();
        assert_eq!(interp.environment().get("x").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn rand_stays_in_range() {
        let mut interp = interpreter("");
        run_source(
            &mut interp,
            "dynamic division ok = 1;
             loop k from 1 to 200 {
                 rand r from -3 to 3;
                 if r < -3 or r > 3 { ok = 0; }
             }",
        )
        .unwrap();

        assert_eq!(number(&interp, "ok"), 1.0);
    }

    #[test]
    fn seeded_rand_is_reproducible() {
        let source = "dynamic division loop k from 1 to 10 { rand r from 1 to 1000; print r; }";

        let first = output_of(source);
        let second = output_of(source);

        assert_eq!(first, second);
        assert_eq!(first.lines().count(), 10);
    }

    #[test]
    fn reversed_rand_bounds_fail() {
        let err = failure("dynamic division rand r from 6 to 1;");
        assert!(matches!(err.kind, ErrorKind::InvalidRange { min: 6, max: 1 }));
    }

    #[test]
    fn input_reads_a_number_after_the_prompt() {
        let mut interp = interpreter("  42.5 \n");
        run_source(&mut interp, "dynamic division input age \"Your age\"; print age;").unwrap();

        assert_eq!(printed(&interp), "Your age: 42.5\n");
        assert_eq!(number(&interp, "age"), 42.5);
    }

    #[test]
    fn unparsable_input_fails() {
        let mut interp = interpreter("forty\n");
        let err = run_source(&mut interp, "dynamic division input age;").unwrap_err();

        assert!(matches!(err.kind, ErrorKind::InputFormat(_)));
        assert!(!interp.environment().contains("age"));
    }

    #[test]
    fn exhausted_input_fails() {
        let mut interp = interpreter("");
        let err = run_source(&mut interp, "dynamic division input n;").unwrap_err();

        assert!(matches!(err.kind, ErrorKind::InputFormat(_)));
    }

    // ───────────────────────── functions ─────────────────────────

    #[test]
    fn call_restores_the_environment_and_binds_the_function_name() {
        let mut interp = interpreter("");
        run_source(
            &mut interp,
            "dynamic division
             x = 2;
             func square(n) returns result { scratch = 99; x = 100; result = n * n; }",
        )
        .unwrap();

        let before: Vec<(String, Value)> = bindings(interp.environment());

        let call = Stmt::new(
            StmtKind::Call {
                name: "square".into(),
                args: vec![Expr::ident("x")],
            },
            4,
        );
        interp.execute(&call).unwrap();

        let mut expected = before;
        expected.push(("square".to_string(), Value::Number(4.0)));
        expected.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(bindings(interp.environment()), expected);
        assert!(!interp.environment().contains("n"));
        assert!(!interp.environment().contains("result"));
        assert!(!interp.environment().contains("scratch"));
    }

    fn bindings(env: &Environment) -> Vec<(String, Value)> {
        let mut all: Vec<(String, Value)> = env
            .iter()
            .map(|(name, binding)| (name.to_string(), binding.value.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    #[test]
    fn function_name_yields_latest_return_value() {
        assert_eq!(
            output_of(
                "dynamic division
                 func seven() returns r { r = 7; }
                 func twice(v) returns r { r = v * 2; }
                 call seven();
                 print seven;
                 call twice(seven);
                 print twice;
                 call twice(twice);
                 print twice;"
            ),
            "7\n14\n28\n"
        );
    }

    #[test]
    fn unassigned_return_variable_defaults_to_zero() {
        assert_eq!(
            output_of("dynamic division func noop(a) returns r { b = a; } call noop(5); print noop;"),
            "0\n"
        );
    }

    #[test]
    fn body_sees_caller_bindings() {
        assert_eq!(
            output_of(
                "dynamic division
                 base = 10;
                 func offset(v) returns r { r = base + v; }
                 call offset(5);
                 print offset;"
            ),
            "15\n"
        );
    }

    #[test]
    fn recursion_through_the_return_alias() {
        assert_eq!(
            output_of(
                "dynamic division
                 func fact(n) returns r {
                     if n <= 1 { r = 1; } else { call fact(n - 1); r = n * fact; }
                 }
                 call fact(5);
                 print fact;"
            ),
            "120\n"
        );
    }

    #[test]
    fn unbounded_recursion_hits_the_depth_ceiling() {
        let mut interp = interpreter_with(
            Config {
                max_call_depth: 16,
                ..Config::default()
            },
            "",
        );
        let err = run_source(
            &mut interp,
            "dynamic division\nfunc down(n) returns r {\n call down(n - 1);\n}\ncall down(3);",
        )
        .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::StackOverflow { limit: 16 }));
        assert_eq!(err.line, 3);
        assert!(!interp.environment().contains("n"));
    }

    #[test]
    fn default_depth_ceiling_holds_through_nested_blocks() {
        let mut interp = interpreter_with(Config::default(), "");
        let err = run_source(
            &mut interp,
            "dynamic division
func f(n) returns r {
 if n > 0 {
  if 1 {
   loop k from 1 to 1 {
    call f(n - 1);
   }
  }
 }
 r = 1;
}
call f(100000);",
        )
        .unwrap_err();

        assert!(matches!(
            err.kind,
            ErrorKind::StackOverflow { limit: DEFAULT_MAX_CALL_DEPTH }
        ));
        assert_eq!(err.line, 6);
        assert!(!interp.environment().contains("n"));
    }

    #[test]
    fn deeply_parenthesized_expression_evaluates() {
        let depth = 1000;
        let source = format!(
            "dynamic division print {}2 + 3{};",
            "(".repeat(depth),
            ")".repeat(depth)
        );

        assert_eq!(output_of(&source), "5\n");
    }

    #[test]
    fn undefined_function_fails() {
        let err = failure("dynamic division call nothing(1);");
        assert!(matches!(err.kind, ErrorKind::UndefinedFunction(ref name) if name == "nothing"));
    }

    #[test]
    fn argument_count_must_match() {
        let err = failure("dynamic division func f(a, b) returns r { r = a; } call f(1);");
        assert!(matches!(
            err.kind,
            ErrorKind::ArityMismatch {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn redefinition_overwrites() {
        assert_eq!(
            output_of(
                "dynamic division
                 func f() returns r { r = 1; }
                 func f() returns r { r = 2; }
                 call f();
                 print f;"
            ),
            "2\n"
        );
    }

    #[test]
    fn errors_inside_a_body_report_the_body_line() {
        let err = failure("dynamic division\nfunc bad() returns r {\n r = 1 / 0;\n}\ncall bad();");
        assert_eq!(err.line, 3);
    }

    // ───────────────────────── static division ─────────────────────────

    #[test]
    fn constants_seed_the_environment() {
        let mut interp = interpreter("");
        run_source(&mut interp, "static division const LIMIT = 10; dynamic division").unwrap();

        let env = interp.environment();
        assert_eq!(
            evaluate(&Expr::ident("LIMIT"), env).unwrap(),
            Value::Number(10.0)
        );
        assert!(env.is_constant("LIMIT"));
    }

    #[test]
    fn constants_see_only_earlier_constants() {
        let mut interp = interpreter("");
        run_source(
            &mut interp,
            "static division const A = 2; const B = A * 3; dynamic division",
        )
        .unwrap();
        assert_eq!(number(&interp, "B"), 6.0);

        let err = failure("static division\nconst B = A * 3;\nconst A = 2;\ndynamic division");
        assert!(matches!(err.kind, ErrorKind::UnboundIdentifier(ref name) if name == "A"));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn loop_bound_resolved_from_constant() {
        let program = Program {
            static_division: vec![StaticDecl {
                kind: DeclKind::Const {
                    name: "MAX".into(),
                    value: Expr::number(3.0),
                },
                line: 1,
            }],
            dynamic_division: vec![Stmt::new(
                StmtKind::Loop {
                    var: "i".into(),
                    start: Expr::number(1.0),
                    end: Expr::ident("MAX"),
                    body: vec![Stmt::new(StmtKind::Print(Expr::ident("i")), 3)],
                },
                2,
            )],
        };

        let mut interp = interpreter("");
        interp.run(&program).unwrap();

        assert_eq!(printed(&interp), "1\n2\n3\n");
    }

    #[test]
    fn constants_are_protected_by_default() {
        let err = failure("static division const MAX = 3; dynamic division\nMAX = 4;");
        assert!(matches!(err.kind, ErrorKind::ConstantReassignment(ref name) if name == "MAX"));

        let err = failure("static division const i = 3; dynamic division loop i from 1 to 2 { }");
        assert!(matches!(err.kind, ErrorKind::ConstantReassignment(_)));
    }

    #[test]
    fn constant_protection_can_be_advisory() {
        let mut interp = interpreter_with(
            Config {
                enforce_constants: false,
                ..Config::default()
            },
            "",
        );
        run_source(
            &mut interp,
            "static division const MAX = 3; dynamic division MAX = 4; print MAX;",
        )
        .unwrap();

        assert_eq!(printed(&interp), "4\n");
        assert!(interp.environment().is_constant("MAX"));
    }

    #[test]
    fn metadata_is_recorded() {
        let mut interp = interpreter("");
        run_source(
            &mut interp,
            "static division program \"demo\"; author \"Ada\"; date \"2024\"; dynamic division",
        )
        .unwrap();

        let info = interp.program_info();
        assert_eq!(info.program_id.as_deref(), Some("demo"));
        assert_eq!(info.author.as_deref(), Some("Ada"));
        assert_eq!(info.date.as_deref(), Some("2024"));
        assert!(interp.environment().is_empty());
    }

    #[test]
    fn a_failed_run_stops_at_the_failing_statement() {
        let mut interp = interpreter("");
        let err = run_source(
            &mut interp,
            "dynamic division\nprint 1;\nprint 1 / 0;\nprint 3;",
        )
        .unwrap_err();

        assert_eq!(err.line, 3);
        assert_eq!(printed(&interp), "1\n");
    }
}
