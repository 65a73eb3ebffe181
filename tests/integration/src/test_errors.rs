//! Error reporting integration tests.

#[cfg(test)]
mod tests {
    use filterexpr_core::{
        BuildError, CompileError, Compiler, CompilerConfig, Limit, ParseErrorKind, TokenizeError,
    };

    use crate::{Customer, compile};

    fn parse_kind(expression: &str) -> (ParseErrorKind, usize) {
        match compile(expression) {
            Err(CompileError::Parse(err)) => (err.kind, err.offset),
            Err(other) => panic!("expected parse error for {expression:?}, got {other}"),
            Ok(_) => panic!("expected parse error for {expression:?}"),
        }
    }

    #[test]
    fn test_should_report_unknown_characters() {
        let err = compile("Age > 18 # 1").err().unwrap();
        assert_eq!(
            err,
            CompileError::Tokenize(TokenizeError {
                character: '#',
                offset: 9,
            })
        );
    }

    #[test]
    fn test_should_report_parse_failures_with_offsets() {
        assert_eq!(parse_kind(""), (ParseErrorKind::EmptyInput, 0));
        assert_eq!(parse_kind("   "), (ParseErrorKind::EmptyInput, 3));
        assert_eq!(parse_kind("(Age > 18"), (ParseErrorKind::UnmatchedParenthesis, 0));
        assert_eq!(parse_kind("Age > 18)"), (ParseErrorKind::UnmatchedParenthesis, 8));
        assert_eq!(parse_kind("Age > 1 > 0"), (ParseErrorKind::TrailingTokens, 8));
        assert_eq!(parse_kind("Vip(1)"), (ParseErrorKind::InvalidMemberPath, 0));
        assert!(matches!(
            parse_kind("Age >"),
            (ParseErrorKind::UnexpectedToken { .. }, 5)
        ));
    }

    #[test]
    fn test_should_report_build_failures_with_offsets() {
        let err = compile("Vip && Adress.City == \"London\"").err().unwrap();
        assert_eq!(
            err,
            CompileError::Build(BuildError::UnknownMember {
                member: "Adress".to_owned(),
                type_name: "Customer".to_owned(),
                offset: 7,
            })
        );

        let err = compile("Address.Town == \"x\"").err().unwrap();
        assert!(matches!(
            err,
            CompileError::Build(BuildError::UnknownMember { ref type_name, offset: 8, .. }) if type_name == "Address"
        ));

        let err = compile("Age == \"old\"").err().unwrap();
        assert!(matches!(err, CompileError::Build(BuildError::TypeMismatch { offset: 7, .. })));

        let err = compile("Vip > false").err().unwrap();
        assert!(matches!(
            err,
            CompileError::Build(BuildError::UnsupportedOperator { ref operator, offset: 4, .. }) if operator == ">"
        ));

        let err = compile("Name").err().unwrap();
        assert!(matches!(err, CompileError::Build(BuildError::TypeMismatch { ref found, .. }) if found == "Str"));
    }

    #[test]
    fn test_should_render_diagnostics_under_source() {
        let source = "Score > 3 &&\n  Ledger.Balanse > 10";
        let err = compile(source).err().unwrap();
        assert_eq!(err.offset(), 22);
        let rendered = err.render(source);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "error at line 2, column 10:");
        assert_eq!(lines[1], "  Ledger.Balanse > 10");
        assert_eq!(lines[2], "         ^");
        assert!(lines[3].contains("unknown member 'Balanse' on type Ledger"));
    }

    #[test]
    fn test_should_enforce_length_limit() {
        let compiler = Compiler::new(CompilerConfig::builder().max_expression_length(10).build());
        assert!(compiler.compile::<Customer>("Age > 18").is_ok());

        let err = compiler.compile::<Customer>("Age > 18 && Vip").err().unwrap();
        assert!(matches!(
            err,
            CompileError::LimitExceeded {
                limit: Limit::ExpressionLength,
                actual: 15,
                max: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_should_enforce_nesting_limit() {
        let compiler = Compiler::new(CompilerConfig::builder().max_nesting_depth(2).build());
        assert!(compiler.compile::<Customer>("((Vip))").is_ok());

        let err = compiler.compile::<Customer>("(((Vip)))").err().unwrap();
        assert!(matches!(
            err,
            CompileError::LimitExceeded {
                limit: Limit::NestingDepth,
                actual: 3,
                max: 2,
                offset: 2,
            }
        ));

        let err = compiler.compile::<Customer>("!!!Vip").err().unwrap();
        assert!(matches!(err, CompileError::LimitExceeded { limit: Limit::NestingDepth, .. }));
    }
}
