use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(rename = "ID", alias = "Id", alias = "id")]
    pub id: i64,
    #[serde(
        rename = "FirstName",
        alias = "firstName",
        alias = "firstname",
        alias = "first_name"
    )]
    pub first_name: String,
    #[serde(
        rename = "LastName",
        alias = "lastName",
        alias = "lastname",
        alias = "last_name"
    )]
    pub last_name: String,
}

#[cfg(test)]
impl User {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}
