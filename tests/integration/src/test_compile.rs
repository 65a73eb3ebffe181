//! Compilation and evaluation integration tests.

#[cfg(test)]
mod tests {
    use std::thread;

    use filterexpr_core::{Compiler, Predicate};

    use crate::{Customer, compile, customers, matching};

    #[test]
    fn test_should_filter_by_simple_comparison() {
        assert_eq!(matching("Age > 40"), vec!["Grace Hopper", "Alan Turing"]);
        assert_eq!(matching("Age >= 41"), vec!["Grace Hopper", "Alan Turing"]);
        assert_eq!(matching("Age < 36"), vec!["Linus Torvalds"]);
        assert_eq!(matching("Age <= 36"), vec!["Ada Lovelace", "Linus Torvalds"]);
    }

    #[test]
    fn test_should_bind_and_tighter_than_or() {
        assert_eq!(
            matching("Vip || Age < 18 && Score > 4.5"),
            vec!["Ada Lovelace", "Grace Hopper"]
        );
        assert_eq!(
            matching("(Vip || Age < 18) && Score > 4.5"),
            vec!["Ada Lovelace"]
        );
    }

    #[test]
    fn test_should_negate_grouped_expressions() {
        assert_eq!(
            matching("!(Vip || Age > 40)"),
            vec!["Linus Torvalds"]
        );
        assert_eq!(matching("!!Vip"), matching("Vip"));
    }

    #[test]
    fn test_should_resolve_members_case_insensitively() {
        assert_eq!(matching("name == \"Ada Lovelace\""), vec!["Ada Lovelace"]);
        assert_eq!(matching("ADDRESS.city == \"London\""), vec!["Ada Lovelace"]);
    }

    #[test]
    fn test_should_read_fields_and_keep_literal_text() {
        // "00100" looks numeric but is compared as the text written.
        assert_eq!(matching("Address.zip == \"00100\""), vec!["Linus Torvalds"]);
        assert_eq!(matching("Address.Zip == 100"), Vec::<String>::new());
    }

    #[test]
    fn test_should_promote_between_int_and_float() {
        assert_eq!(matching("Score > 4"), vec!["Ada Lovelace", "Alan Turing"]);
        assert_eq!(matching("Age == 36.0"), vec!["Ada Lovelace"]);
        assert_eq!(matching("Ledger.Balance >= Age"), vec!["Ada Lovelace", "Grace Hopper", "Linus Torvalds"]);
    }

    #[test]
    fn test_should_convert_string_constants_to_member_types() {
        assert_eq!(matching("Age == \"17\""), vec!["Linus Torvalds"]);
        assert_eq!(matching("Vip == \"TRUE\""), vec!["Ada Lovelace", "Grace Hopper"]);
    }

    #[test]
    fn test_should_compare_enums_by_name_and_value() {
        assert_eq!(matching("Priority == \"high\""), vec!["Ada Lovelace"]);
        assert_eq!(matching("Priority == 9"), vec!["Grace Hopper"]);
        assert_eq!(matching("Priority != \"Low\"").len(), 3);
        // Not a declared value: compiles as a plain integer comparison.
        assert!(matching("Priority == 5").is_empty());
    }

    #[test]
    fn test_should_order_strings_ordinally() {
        assert_eq!(matching("Name < \"B\""), vec!["Ada Lovelace", "Alan Turing"]);
        assert_eq!(matching("Name < \"a\"").len(), 4);
    }

    #[test]
    fn test_should_be_deterministic_and_repeatable() {
        let expression = "Score > 3 && Address.City.StartsWith(\"L\")";
        let first = compile(expression).unwrap();
        let second = compile(expression).unwrap();
        let people = customers();
        for customer in &people {
            assert_eq!(first.evaluate(customer), second.evaluate(customer));
            assert_eq!(first.evaluate(customer), first.evaluate(customer));
        }
    }

    #[test]
    fn test_should_share_predicates_across_threads() {
        let predicate: Predicate<Customer> = compile("Ledger.Holds(7)").unwrap();
        let people = customers();

        let counts: Vec<usize> = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let predicate = predicate.clone();
                    let people = &people;
                    scope.spawn(move || predicate.filter(people).len())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(counts, vec![2; 4]);
    }

    #[test]
    fn test_should_compile_without_limits_by_default() {
        let nested = format!("{}Vip{}", "(".repeat(64), ")".repeat(64));
        let predicate = Compiler::default().compile::<Customer>(&nested).unwrap();
        assert_eq!(predicate.filter(&customers()).len(), 2);
    }

    #[test]
    fn test_should_span_multiple_lines() -> anyhow::Result<()> {
        let predicate = compile("Vip &&\n  Score > 4")?;
        assert_eq!(predicate.filter(&customers()).len(), 1);
        Ok(())
    }
}
