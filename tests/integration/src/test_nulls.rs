//! Null handling integration tests.

#[cfg(test)]
mod tests {
    use filterexpr_core::{BuildError, CompileError};

    use crate::{compile, matching};

    #[test]
    fn test_should_compare_optional_members_with_null() {
        assert_eq!(matching("Email == null"), vec!["Grace Hopper"]);
        assert_eq!(
            matching("Email != null"),
            vec!["Ada Lovelace", "Alan Turing", "Linus Torvalds"]
        );
        assert_eq!(matching("null == Email"), matching("Email == null"));
    }

    #[test]
    fn test_should_compare_records_with_null() {
        assert_eq!(matching("Address == null"), vec!["Alan Turing"]);
        assert_eq!(matching("Address != null").len(), 3);
    }

    #[test]
    fn test_should_propagate_null_through_member_paths() {
        assert_eq!(matching("Address.City == \"London\""), vec!["Ada Lovelace"]);
        assert_eq!(
            matching("Address.City != \"London\""),
            vec!["Grace Hopper", "Alan Turing", "Linus Torvalds"]
        );
        assert_eq!(
            matching("Address.Zip == null"),
            vec!["Grace Hopper", "Alan Turing"]
        );
    }

    #[test]
    fn test_should_treat_ordering_against_null_as_false() {
        assert_eq!(
            matching("Address.Zip < \"zzz\""),
            vec!["Ada Lovelace", "Linus Torvalds"]
        );
        assert_eq!(
            matching("Address.Zip >= \"\""),
            vec!["Ada Lovelace", "Linus Torvalds"]
        );
    }

    #[test]
    fn test_should_read_null_as_false_under_negation() {
        assert_eq!(
            matching("!Email.StartsWith(\"a\")"),
            vec!["Grace Hopper", "Linus Torvalds"]
        );
        assert_eq!(
            matching("!Email.StartsWith(\"a\")"),
            matching("!(Email.StartsWith(\"a\") && true)")
        );
        assert_eq!(
            matching("Email.StartsWith(\"a\") || Email == null"),
            vec!["Ada Lovelace", "Grace Hopper", "Alan Turing"]
        );
    }

    #[test]
    fn test_should_reject_null_for_required_members() {
        let err = compile("Age == null").err().unwrap();
        assert!(matches!(
            err,
            CompileError::Build(BuildError::TypeMismatch { ref expected, offset: 7, .. }) if expected == "Optional<Int>"
        ));

        let err = compile("Email > null").err().unwrap();
        assert!(matches!(err, CompileError::Build(BuildError::UnsupportedOperator { .. })));
    }
}
