use crate::error::StoreError;

/// Values that can be missing from a request body.
///
/// Payloads decode absent fields to their zero value, so "missing" means
/// empty for strings and zero for numbers.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl Blank for i32 {
    fn is_blank(&self) -> bool {
        *self == 0
    }
}

impl Blank for i64 {
    fn is_blank(&self) -> bool {
        *self == 0
    }
}

/// Fails on the first blank field, naming it by its JSON key.
pub fn required(fields: &[(&str, &dyn Blank)]) -> Result<(), StoreError> {
    match fields.iter().find(|(_, value)| value.is_blank()) {
        Some((name, _)) => Err(StoreError::required(name)),
        None => Ok(()),
    }
}
