//! Filter criteria integration tests.

#[cfg(test)]
mod tests {
    use filterexpr_core::{ArgumentError, ComparisonKind, FilterCriteria, Scalar, TypeRef};
    use serde_json::json;

    use crate::{Address, Customer};

    #[test]
    fn test_should_serialize_criteria_for_downstream_builders() {
        let criteria =
            FilterCriteria::for_member::<Customer>("priority", "Critical", ComparisonKind::Equal)
                .unwrap();
        let value = serde_json::to_value(&criteria).unwrap();
        assert_eq!(
            value,
            json!({
                "propertyType": "Int",
                "name": "Priority",
                "value": 9,
                "comparison": "Equal",
            })
        );
    }

    #[test]
    fn test_should_describe_optional_and_record_members() {
        let criteria =
            FilterCriteria::for_member::<Customer>("EMAIL", Scalar::Null, ComparisonKind::NotEqual)
                .unwrap();
        assert_eq!(criteria.name(), "Email");
        assert_eq!(criteria.property_type(), TypeRef::Optional(&TypeRef::Str));

        let criteria =
            FilterCriteria::for_member::<Customer>("email", "ada@", ComparisonKind::StartsWith)
                .unwrap();
        assert_eq!(criteria.property_type(), TypeRef::Str);

        let criteria =
            FilterCriteria::for_member::<Customer>("address", Scalar::Null, ComparisonKind::Equal)
                .unwrap();
        assert_eq!(criteria.property_type(), TypeRef::record::<Address>());
    }

    #[test]
    fn test_should_resolve_fields() {
        let criteria =
            FilterCriteria::for_member::<Address>("zip", "00100", ComparisonKind::Equal).unwrap();
        assert_eq!(criteria.name(), "Zip");
        assert_eq!(criteria.value(), &Scalar::from("00100"));
    }

    #[test]
    fn test_should_validate_arguments() {
        assert_eq!(
            FilterCriteria::for_member::<Customer>(" ", 1, ComparisonKind::Equal).unwrap_err(),
            ArgumentError::BlankName
        );
        assert!(matches!(
            FilterCriteria::for_member::<Customer>("Vip", Scalar::Null, ComparisonKind::Equal)
                .unwrap_err(),
            ArgumentError::NullNotAllowed { .. }
        ));
        assert!(matches!(
            FilterCriteria::for_member::<Customer>("Score", "high", ComparisonKind::GreaterThan)
                .unwrap_err(),
            ArgumentError::ValueConversion { .. }
        ));
        assert!(matches!(
            FilterCriteria::for_member::<Customer>("Age", "3", ComparisonKind::EndsWith)
                .unwrap_err(),
            ArgumentError::UnsupportedComparison { .. }
        ));
        assert!(matches!(
            FilterCriteria::for_member::<Customer>("Phone", "1", ComparisonKind::Equal)
                .unwrap_err(),
            ArgumentError::UnknownProperty { .. }
        ));
    }

    #[test]
    fn test_should_accept_explicit_property_types() {
        let criteria = FilterCriteria::new(
            TypeRef::Float,
            "Score",
            4.5,
            ComparisonKind::GreaterThanOrEqual,
        )
        .unwrap();
        assert_eq!(criteria.value(), &Scalar::Float(4.5));
        assert_eq!(criteria.comparison(), ComparisonKind::GreaterThanOrEqual);
    }
}
