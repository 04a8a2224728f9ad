#[cfg(test)]
mod environment_tests {
    use skeptical::config::Config;
    use skeptical::environment::Environment;
    use skeptical::error::ErrorKind;
    use skeptical::value::Value;

    #[test]
    fn get_set_contains() {
        let mut env = Environment::new();
        assert!(env.is_empty());
        assert!(matches!(env.get("x"), Err(ErrorKind::UnboundIdentifier(ref n)) if n == "x"));

        env.set("x", Value::Number(1.0));
        env.set("x", Value::from("two"));

        assert!(env.contains("x"));
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("x").unwrap(), Value::String("two".into()));
    }

    #[test]
    fn assign_refuses_constants_but_set_does_not() {
        let mut env = Environment::new();
        env.define_constant("PI", Value::Number(2.5));

        assert!(matches!(
            env.assign("PI", Value::Number(3.0)),
            Err(ErrorKind::ConstantReassignment(_))
        ));
        assert_eq!(env.get("PI").unwrap(), Value::Number(2.5));

        env.set("PI", Value::Number(3.0));
        assert_eq!(env.get("PI").unwrap(), Value::Number(3.0));
        assert!(env.is_constant("PI"));
    }

    #[test]
    fn snapshot_restore_round_trips() {
        let mut env = Environment::new();
        env.set("a", Value::Number(1.0));
        env.define_constant("K", Value::Number(5.0));

        let snapshot = env.snapshot();
        env.set("a", Value::Number(100.0));
        env.set("param", Value::Number(2.0));
        env.restore(snapshot);

        assert_eq!(env.get("a").unwrap(), Value::Number(1.0));
        assert!(!env.contains("param"));
        assert!(env.is_constant("K"));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(-12.0).to_string(), "-12");
        assert_eq!(Value::Number(0.25).to_string(), "0.25");
        assert_eq!(Value::from("text").to_string(), "text");
    }

    #[test]
    fn value_coercions() {
        assert_eq!(Value::from(" 12.5 ").as_number().unwrap(), 12.5);
        assert!(matches!(
            Value::from("twelve").as_number(),
            Err(ErrorKind::TypeMismatch(_))
        ));
        assert_eq!(Value::Number(4.0).as_integer().unwrap(), 4);
        assert!(Value::Number(4.5).as_integer().is_err());
        assert!(Value::Number(-1.0).is_truthy().unwrap());
        assert!(!Value::Number(0.0).is_truthy().unwrap());
        assert_eq!(Value::from_bool(true), Value::Number(1.0));
    }

    #[test]
    fn config_defaults_and_overrides() {
        let config = Config::from_json(r#"{ "max_call_depth": 8, "seed": 3 }"#).unwrap();

        assert_eq!(config.max_call_depth, 8);
        assert_eq!(config.seed, Some(3));
        assert!(config.enforce_constants);
        assert_eq!(config.program_dir, Config::default().program_dir);

        assert!(Config::from_json(r#"{ "max_depth": 8 }"#).is_err());
    }
}
