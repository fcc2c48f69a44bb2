use serde::{Deserialize, Serialize};

/// A person to be recorded as a graph node.
///
/// `id` is supplied by the caller and used as the node's `person_id`. Nothing is
/// validated here: empty strings and repeated ids are passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    firstname: String,
    surname: String,
    email: String,
    id: String,
}

impl Person {
    #[must_use]
    pub fn new(
        firstname: impl Into<String>,
        surname: impl Into<String>,
        email: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            firstname: firstname.into(),
            surname: surname.into(),
            email: email.into(),
            id: id.into(),
        }
    }

    #[inline]
    pub fn firstname(&self) -> &str {
        &self.firstname
    }

    #[inline]
    pub fn surname(&self) -> &str {
        &self.surname
    }

    #[inline]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }
}
