/// What is needed to reach a database: the driver to use, its connection URL
/// and optional credentials.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionSettings {
    pub driver: String,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ConnectionSettings {
    pub fn new(driver: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            url: url.into(),
            username: None,
            password: None,
        }
    }

    pub fn with_credentials(
        mut self,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        self.username = username.filter(|u| !u.is_empty());
        self.password = password.filter(|p| !p.is_empty());
        self
    }

    pub fn is_blank(&self) -> bool {
        self.driver.trim().is_empty() || self.url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "", true)]
    #[case("sqlite", "", true)]
    #[case("  ", "jdbc:sqlite:/tmp/x.db", true)]
    #[case("sqlite", "jdbc:sqlite:/tmp/x.db", false)]
    fn is_blank_when_driver_or_url_missing(
        #[case] driver: &str,
        #[case] url: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(ConnectionSettings::new(driver, url).is_blank(), expected);
    }

    #[test]
    fn empty_credentials_become_none() {
        let settings = ConnectionSettings::new("postgres", "postgres://localhost/foodmart")
            .with_credentials(Some(String::new()), Some("secret".to_string()));

        assert_eq!(settings.username, None);
        assert_eq!(settings.password.as_deref(), Some("secret"));
    }
}
