use std::collections::BTreeMap;
use std::fmt;

// Email/password pair entered for one login attempt.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Password,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Per-field messages. A key is present only while that field is known to be invalid;
// entries can go stale until the next validation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) -> bool {
        self.0.remove(&field).is_some()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    // Overwrite entries for every field present in `other`.
    pub fn merge(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }
}

// Read-only view of the form handed to hosts for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSnapshot {
    pub email: String,
    pub password: String,
    pub errors: FieldErrors,
}

impl FormSnapshot {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }
}

// Mutable state of the mounted form. Only input events and the submit path touch it.
#[derive(Debug, Default)]
pub struct CredentialsState {
    email: String,
    password: String,
    errors: FieldErrors,
}

impl CredentialsState {
    pub fn new() -> Self {
        Self::default()
    }

    // Optimistic clear: the email entry goes away without re-validating the new value.
    pub fn set_email(&mut self, value: impl Into<String>) {
        self.errors.remove(Field::Email);
        self.email = value.into();
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
    }

    pub fn record_errors(&mut self, errors: FieldErrors) {
        self.errors.merge(errors);
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.clone(), self.password.clone())
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            email: self.email.clone(),
            password: self.password.clone(),
            errors: self.errors.clone(),
        }
    }

    // Drop everything the user typed.
    pub fn clear(&mut self) {
        self.email.clear();
        self.password.clear();
        self.errors = FieldErrors::new();
    }
}
