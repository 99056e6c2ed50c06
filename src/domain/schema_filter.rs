/// Allow-list of schema names, configured as a comma- or semicolon-separated
/// string. An empty list admits every schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaFilter {
    allowed: Vec<String>,
}

impl SchemaFilter {
    pub fn parse(list: &str) -> Self {
        let allowed = list
            .split([',', ';'])
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        Self { allowed }
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn allows(&self, schema: &str) -> bool {
        self.is_empty()
            || self
                .allowed
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(schema))
    }

    pub fn entries(&self) -> &[String] {
        &self.allowed
    }
}
