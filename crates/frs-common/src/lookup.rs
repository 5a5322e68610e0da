use std::collections::HashMap;

/// Case-insensitive view over a set of column names.
///
/// FRS extracts are inconsistent about header case (`SERNUM` in one release,
/// `sernum` in another), so every raw-column lookup goes through this.
#[derive(Debug, Clone)]
pub struct ColumnLookup {
    map: HashMap<String, String>,
}

impl ColumnLookup {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            let key = name.to_ascii_uppercase();
            map.entry(key).or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    /// Returns the column name as spelled in the table.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Returns the first of `candidates` present in the table.
    pub fn first_of(&self, candidates: &[&str]) -> Option<&str> {
        candidates.iter().find_map(|candidate| self.get(candidate))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_uppercase())
    }
}
