use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Customer {
    pub(crate) id: i32,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
}

/// What the `/login` route keeps in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct UserSession {
    pub(crate) id: String,
    pub(crate) count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Jedi {
    pub(crate) name: String,
    pub(crate) age: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_uses_camel_case() {
        let customer = Customer {
            id: 1,
            first_name: "Jet".to_string(),
            last_name: "Brains".to_string(),
        };

        let json = serde_json::to_string(&customer).unwrap();

        assert_eq!(json, r#"{"id":1,"firstName":"Jet","lastName":"Brains"}"#);
    }
}
