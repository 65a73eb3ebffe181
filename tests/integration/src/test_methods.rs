//! Method call integration tests.

#[cfg(test)]
mod tests {
    use filterexpr_core::{BuildError, CompileError};

    use crate::{compile, matching};

    #[test]
    fn test_should_call_string_builtins() {
        assert_eq!(
            matching("Name.StartsWith(\"A\")"),
            vec!["Ada Lovelace", "Alan Turing"]
        );
        assert_eq!(matching("Name.IndexOf(\"Turing\") == 5"), vec!["Alan Turing"]);
        assert_eq!(
            matching("Email.EndsWith(\".test\")"),
            vec!["Ada Lovelace", "Alan Turing"]
        );
        assert_eq!(
            matching("Address.City.ToUpper() == \"LONDON\""),
            vec!["Ada Lovelace"]
        );
        assert_eq!(
            matching("Address.City.CompareTo(\"Helsinki\") == 0"),
            vec!["Linus Torvalds"]
        );
    }

    #[test]
    fn test_should_call_numeric_builtins() {
        assert_eq!(matching("Age.ToString() == \"85\""), vec!["Grace Hopper"]);
        assert_eq!(matching("Age.Equals(41)"), vec!["Alan Turing"]);
        assert_eq!(matching("Vip.Equals(false)").len(), 2);
    }

    #[test]
    fn test_should_prefer_exact_overload() {
        assert_eq!(
            matching("Ledger.Holds(7)"),
            vec!["Ada Lovelace", "Alan Turing"]
        );
        assert_eq!(matching("Ledger.Holds(\"twelve\")"), vec!["Grace Hopper"]);
        // Numeric text is typed as Int and picks the Int overload.
        assert_eq!(matching("Ledger.Holds(\"3\")"), vec!["Linus Torvalds"]);
    }

    #[test]
    fn test_should_convert_arguments_when_no_overload_matches_exactly() {
        assert_eq!(
            matching("Ledger.Covers(100)"),
            vec!["Ada Lovelace", "Linus Torvalds"]
        );
        // Bool does not convert to Int, so the Str overload receives "true".
        assert!(compile("Ledger.Holds(true)").is_ok());
        assert!(matching("Ledger.Holds(Vip)").is_empty());
    }

    #[test]
    fn test_should_report_unresolvable_calls() {
        let err = compile("Ledger.Holds(7, 8)").err().unwrap();
        assert_eq!(
            err,
            CompileError::Build(BuildError::UnknownMethod {
                method: "Holds".to_owned(),
                type_name: "Ledger".to_owned(),
                arity: 2,
                offset: 7,
            })
        );

        let err = compile("Ledger.holds(7)").err().unwrap();
        assert!(matches!(err, CompileError::Build(BuildError::UnknownMethod { .. })));

        let err = compile("Ledger.Holds(Address)").err().unwrap();
        assert_eq!(
            err,
            CompileError::Build(BuildError::TypeMismatch {
                expected: "Int".to_owned(),
                found: "Address".to_owned(),
                offset: 13,
            })
        );
    }

    #[test]
    fn test_should_use_call_results_as_operands() {
        assert_eq!(
            matching("Ledger.Covers(200) && Name.IndexOf(\" \") > 3"),
            vec!["Linus Torvalds"]
        );
    }
}
