//! Bundled sample data the `check`, `eval` and `criteria` commands run against.

use filterexpr_core::{EnumInfo, TypeRef, Value, record};

/// Metadata for [`Role`].
pub static ROLE: EnumInfo = EnumInfo {
    name: "Role",
    variants: &[("Engineer", 0), ("Manager", 1), ("Director", 2)],
};

/// Job role, stored by its integer value.
#[derive(Debug, Clone, Copy)]
pub enum Role {
    Engineer = 0,
    Manager = 1,
    Director = 2,
}

/// Employer of a [`Person`].
#[derive(Debug)]
pub struct Company {
    pub name: String,
    pub employees: u32,
}

record! {
    Company {
        property Name: TypeRef::Str => |c| &c.name,
        property Employees: TypeRef::Int => |c| c.employees,
    }
}

/// The record type sample expressions are compiled against.
#[derive(Debug)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub email: Option<String>,
    pub salary: f64,
    pub active: bool,
    pub role: Role,
    pub company: Option<Company>,
}

record! {
    Person {
        property Name: TypeRef::Str => |p| &p.name,
        property Age: TypeRef::Int => |p| p.age,
        property Email: TypeRef::Optional(&TypeRef::Str) => |p| p.email.as_deref(),
        property Salary: TypeRef::Float => |p| p.salary,
        property Active: TypeRef::Bool => |p| p.active,
        property Role: TypeRef::Enum(&ROLE) => |p| p.role as i64,
        property Company: TypeRef::record::<Company>() => |p| p.company.as_ref().map(|c| Value::record(c)),
    }
}

fn company(name: &str, employees: u32) -> Option<Company> {
    Some(Company {
        name: name.to_owned(),
        employees,
    })
}

/// A small fixed catalogue of people.
pub fn people() -> Vec<Person> {
    vec![
        Person {
            name: "John Doe".to_owned(),
            age: 34,
            email: Some("john@acme.test".to_owned()),
            salary: 92_000.0,
            active: true,
            role: Role::Engineer,
            company: company("Acme Corp", 1200),
        },
        Person {
            name: "Jane Doe".to_owned(),
            age: 41,
            email: Some("jane@globex.test".to_owned()),
            salary: 135_500.0,
            active: true,
            role: Role::Director,
            company: company("Globex", 80),
        },
        Person {
            name: "Sam Smith".to_owned(),
            age: 17,
            email: None,
            salary: 0.0,
            active: false,
            role: Role::Engineer,
            company: None,
        },
        Person {
            name: "Ana Lima".to_owned(),
            age: 29,
            email: None,
            salary: 78_250.5,
            active: true,
            role: Role::Manager,
            company: company("Acme Corp", 1200),
        },
    ]
}
