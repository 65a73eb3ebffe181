//! End-to-end tests for filter expressions.
//!
//! Every test compiles real expression strings against the customer fixtures
//! below and checks which fixtures the resulting predicate keeps.
//!
//! ```text
//! cargo test -p filterexpr-integration
//! ```

use std::sync::Once;

use filterexpr_core::{
    CompileError, EnumInfo, MemberInfo, MemberKind, MethodInfo, Predicate, Record, Reflect,
    TypeInfo, TypeRef, Value, record,
};

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Metadata for [`Priority`].
pub static PRIORITY: EnumInfo = EnumInfo {
    name: "Priority",
    variants: &[("Low", 0), ("Normal", 1), ("High", 2), ("Critical", 9)],
};

/// Support priority of a customer.
#[derive(Debug, Clone, Copy)]
pub enum Priority {
    /// Declared value 0.
    Low = 0,
    /// Declared value 1.
    Normal = 1,
    /// Declared value 2.
    High = 2,
    /// Declared value 9.
    Critical = 9,
}

/// Postal address; `Zip` is exposed as a field rather than a property.
#[derive(Debug)]
pub struct Address {
    /// City name.
    pub city: String,
    /// Postal code, kept as text.
    pub zip: Option<String>,
}

record! {
    Address {
        property City: TypeRef::Str => |a| &a.city,
        field Zip: TypeRef::Optional(&TypeRef::Str) => |a| a.zip.as_deref(),
    }
}

/// Account with hand-written reflection and an overloaded method.
#[derive(Debug)]
pub struct Ledger {
    /// Numeric account code.
    pub code: i64,
    /// Account label.
    pub label: String,
    /// Current balance.
    pub balance: f64,
}

impl Reflect for Ledger {
    fn member(&self, name: &str) -> Value<'_> {
        match name {
            "Code" => Value::from(self.code),
            "Label" => Value::from(&self.label),
            "Balance" => Value::from(self.balance),
            _ => Value::Null,
        }
    }

    fn invoke<'s>(&'s self, method: &str, args: &[Value<'_>]) -> Value<'s> {
        match (method, args.first()) {
            ("Holds", Some(Value::Int(code))) => Value::Bool(self.code == *code),
            ("Holds", Some(Value::Str(label))) => Value::Bool(self.label == **label),
            ("Covers", Some(amount)) => {
                Value::Bool(amount.as_float().is_some_and(|a| self.balance >= a))
            }
            _ => Value::Null,
        }
    }
}

impl Record for Ledger {
    fn type_info() -> &'static TypeInfo {
        static INFO: TypeInfo = TypeInfo {
            name: "Ledger",
            members: &[
                MemberInfo {
                    name: "Code",
                    kind: MemberKind::Property,
                    ty: TypeRef::Int,
                },
                MemberInfo {
                    name: "Label",
                    kind: MemberKind::Property,
                    ty: TypeRef::Str,
                },
                MemberInfo {
                    name: "Balance",
                    kind: MemberKind::Property,
                    ty: TypeRef::Float,
                },
            ],
            methods: &[
                MethodInfo {
                    name: "Holds",
                    params: &[TypeRef::Int],
                    returns: TypeRef::Bool,
                },
                MethodInfo {
                    name: "Holds",
                    params: &[TypeRef::Str],
                    returns: TypeRef::Bool,
                },
                MethodInfo {
                    name: "Covers",
                    params: &[TypeRef::Float],
                    returns: TypeRef::Bool,
                },
            ],
        };
        &INFO
    }
}

/// The record type most tests compile against.
#[derive(Debug)]
pub struct Customer {
    /// Full name.
    pub name: String,
    /// Contact address, if known.
    pub email: Option<String>,
    /// Age in years.
    pub age: i32,
    /// Satisfaction score.
    pub score: f64,
    /// Whether the customer is on the VIP plan.
    pub vip: bool,
    /// Support priority.
    pub priority: Priority,
    /// Postal address, if known.
    pub address: Option<Address>,
    /// Billing account.
    pub ledger: Ledger,
}

record! {
    Customer {
        property Name: TypeRef::Str => |c| &c.name,
        property Email: TypeRef::Optional(&TypeRef::Str) => |c| c.email.as_deref(),
        property Age: TypeRef::Int => |c| c.age,
        property Score: TypeRef::Float => |c| c.score,
        property Vip: TypeRef::Bool => |c| c.vip,
        property Priority: TypeRef::Enum(&PRIORITY) => |c| c.priority as i64,
        property Address: TypeRef::record::<Address>() => |c| c.address.as_ref().map(|a| Value::record(a)),
        property Ledger: TypeRef::record::<Ledger>() => |c| Value::record(&c.ledger),
    }
}

fn ledger(code: i64, label: &str, balance: f64) -> Ledger {
    Ledger {
        code,
        label: label.to_owned(),
        balance,
    }
}

fn address(city: &str, zip: Option<&str>) -> Option<Address> {
    Some(Address {
        city: city.to_owned(),
        zip: zip.map(str::to_owned),
    })
}

/// Four customers covering present and missing optional data.
#[must_use]
pub fn customers() -> Vec<Customer> {
    vec![
        Customer {
            name: "Ada Lovelace".to_owned(),
            email: Some("ada@analytical.test".to_owned()),
            age: 36,
            score: 4.8,
            vip: true,
            priority: Priority::High,
            address: address("London", Some("NW1")),
            ledger: ledger(7, "seven", 1500.0),
        },
        Customer {
            name: "Grace Hopper".to_owned(),
            email: None,
            age: 85,
            score: 3.9,
            vip: true,
            priority: Priority::Critical,
            address: address("Arlington", None),
            ledger: ledger(12, "twelve", 90.5),
        },
        Customer {
            name: "Alan Turing".to_owned(),
            email: Some("alan@bletchley.test".to_owned()),
            age: 41,
            score: 4.6,
            vip: false,
            priority: Priority::Normal,
            address: None,
            ledger: ledger(7, "seven", 0.0),
        },
        Customer {
            name: "Linus Torvalds".to_owned(),
            email: Some("linus@kernel.example".to_owned()),
            age: 17,
            score: 2.0,
            vip: false,
            priority: Priority::Low,
            address: address("Helsinki", Some("00100")),
            ledger: ledger(3, "three", 250.0),
        },
    ]
}

/// Compile `expression` against [`Customer`].
pub fn compile(expression: &str) -> Result<Predicate<Customer>, CompileError> {
    init_tracing();
    filterexpr_core::compile::<Customer>(expression)
}

/// Names of the fixture customers `expression` keeps, in fixture order.
///
/// Panics with the rendered diagnostic when the expression does not compile.
#[must_use]
pub fn matching(expression: &str) -> Vec<String> {
    let predicate = match compile(expression) {
        Ok(predicate) => predicate,
        Err(err) => panic!("{}", err.render(expression)),
    };
    let people = customers();
    predicate
        .filter(&people)
        .into_iter()
        .map(|c| c.name.clone())
        .collect()
}

mod test_compile;
mod test_criteria;
mod test_errors;
mod test_methods;
mod test_nulls;
