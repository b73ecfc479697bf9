//! Demo domain shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use fixture_forge::{FieldType, Instance, ObjectValue, Schema, ValueError};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Install a test subscriber once; `RUST_LOG=fixture_forge=debug` shows output.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub key_word: Option<String>,
    pub age: Option<i32>,
    pub address: Option<Address>,
    pub statistic_logins_list: Option<Vec<StatisticLogins>>,
}

impl Instance for User {
    const NAME: &'static str = "User";

    fn schema() -> Schema {
        Schema::new(Self::NAME)
            .field("id", FieldType::Uuid)
            .field("name", FieldType::Text)
            .field("password", FieldType::Text)
            .field("email", FieldType::Text)
            .field("key_word", FieldType::Text)
            .field("age", FieldType::Int32)
            .field("address", FieldType::object::<Address>())
            .field(
                "statistic_logins_list",
                FieldType::list(FieldType::object::<StatisticLogins>()),
            )
    }

    fn from_object(object: &ObjectValue) -> Result<Self, ValueError> {
        Ok(Self {
            id: object.get("id")?,
            name: object.get("name")?,
            password: object.get("password")?,
            email: object.get("email")?,
            key_word: object.get("key_word")?,
            age: object.get("age")?,
            address: object.nested("address")?,
            statistic_logins_list: object.nested_list("statistic_logins_list")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<i32>,
}

impl Instance for Address {
    const NAME: &'static str = "Address";

    fn schema() -> Schema {
        Schema::new(Self::NAME)
            .field("city", FieldType::Text)
            .field("street", FieldType::Text)
            .field("house", FieldType::Int32)
    }

    fn from_object(object: &ObjectValue) -> Result<Self, ValueError> {
        Ok(Self {
            city: object.get("city")?,
            street: object.get("street")?,
            house: object.get("house")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticLogins {
    pub count: i64,
    pub last_login: DateTime<Utc>,
    pub successful: bool,
}

impl Instance for StatisticLogins {
    const NAME: &'static str = "StatisticLogins";

    fn schema() -> Schema {
        Schema::new(Self::NAME)
            .field("count", FieldType::Int64)
            .field("last_login", FieldType::DateTime)
            .field("successful", FieldType::Bool)
    }

    fn from_object(object: &ObjectValue) -> Result<Self, ValueError> {
        Ok(Self {
            count: object.get("count")?,
            last_login: object.get("last_login")?,
            successful: object.get("successful")?,
        })
    }
}
