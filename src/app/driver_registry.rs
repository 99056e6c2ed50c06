use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::ports::MetadataDriver;

/// Drivers available to the workbench, looked up by name or alias.
///
/// Names are case-insensitive. Aliases such as `org.postgresql.Driver`
/// resolve to the same driver as `postgres`.
#[derive(Clone, Default)]
pub struct DriverRegistry {
    drivers: BTreeMap<String, Rc<dyn MetadataDriver>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, driver: Rc<dyn MetadataDriver>, aliases: &[&str]) {
        self.drivers
            .insert(normalize(driver.name()), Rc::clone(&driver));
        for alias in aliases {
            self.drivers.insert(normalize(alias), Rc::clone(&driver));
        }
    }

    pub fn with(mut self, driver: Rc<dyn MetadataDriver>, aliases: &[&str]) -> Self {
        self.register(driver, aliases);
        self
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn MetadataDriver>> {
        self.drivers.get(&normalize(name)).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.drivers.keys().map(String::as_str)
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.drivers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
