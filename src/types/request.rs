use std::collections::HashMap;

/// A concrete lookup request mapping column names to literal values.
///
/// Missing columns read as the empty string, which only a wildcard input
/// matches. Numeric-range columns are supplied as a single decimal literal
/// tested against the stored interval.
#[derive(Debug, Clone, Default)]
pub struct Request {
    values: HashMap<String, String>,
}

impl Request {
    /// Create an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, builder style.
    #[must_use]
    pub fn set(mut self, column: &str, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column value through a mutable reference.
    pub fn insert(&mut self, column: &str, value: impl Into<String>) {
        self.values.insert(column.to_owned(), value.into());
    }

    /// The value supplied for a column; missing keys read as `""`.
    #[must_use]
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map_or("", String::as_str)
    }

    /// The number of columns with a supplied value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, String>> for Request {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let request = Request::new().set("brand", "Adidas");
        assert_eq!(request.get("brand"), "Adidas");
    }

    #[test]
    fn missing_key_reads_as_empty() {
        let request = Request::new();
        assert_eq!(request.get("brand"), "");
        assert!(request.is_empty());
    }

    #[test]
    fn overwrite_value() {
        let request = Request::new().set("brand", "Adidas").set("brand", "Nike");
        assert_eq!(request.get("brand"), "Nike");
        assert_eq!(request.len(), 1);
    }

    #[test]
    fn insert_mutable_ref() {
        let mut request = Request::new();
        request.insert("is_active", "1");
        assert_eq!(request.get("is_active"), "1");
    }

    #[test]
    fn from_map() {
        let request = Request::from(HashMap::from([("brand".to_owned(), "Puma".to_owned())]));
        assert_eq!(request.get("brand"), "Puma");
    }
}
