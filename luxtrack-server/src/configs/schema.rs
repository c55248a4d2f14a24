use crate::models::{DeviceTable, ReadingTable, Table};

/// Orders table definitions so every table is created after the tables it
/// references and disposed before them.
pub struct SchemaManager {
    tables: Vec<Box<dyn Table>>,
}

impl SchemaManager {
    pub fn new(tables: Vec<Box<dyn Table>>) -> Self {
        Self {
            tables: Self::in_dependency_order(tables),
        }
    }

    /// Stable topological order: among the tables whose dependencies are
    /// already placed, the one listed first goes next.
    fn in_dependency_order(mut pending: Vec<Box<dyn Table>>) -> Vec<Box<dyn Table>> {
        let mut ordered: Vec<Box<dyn Table>> = Vec::with_capacity(pending.len());

        while !pending.is_empty() {
            let ready = pending.iter().position(|table| {
                table
                    .dependencies()
                    .iter()
                    .all(|dep| ordered.iter().any(|placed| placed.name() == *dep))
            });

            match ready {
                Some(index) => ordered.push(pending.remove(index)),
                None => {
                    let stuck: Vec<_> = pending.iter().map(|table| table.name()).collect();
                    panic!("Unresolvable table dependencies: {stuck:?}");
                }
            }
        }

        ordered
    }

    pub fn create_schema(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.create()).collect()
    }

    pub fn dispose_schema(&self) -> Vec<String> {
        self.tables.iter().rev().map(|table| table.dispose()).collect()
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        SchemaManager::new(vec![Box::new(ReadingTable), Box::new(DeviceTable)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockTenantTable;
    impl Table for MockTenantTable {
        fn name(&self) -> &'static str {
            "tenants"
        }

        fn create(&self) -> String {
            "CREATE TABLE tenants;".to_string()
        }

        fn dispose(&self) -> String {
            "DROP TABLE tenants;".to_string()
        }

        fn dependencies(&self) -> Vec<&'static str> {
            vec![]
        }
    }

    struct MockDeviceTable;
    impl Table for MockDeviceTable {
        fn name(&self) -> &'static str {
            "devices"
        }

        fn create(&self) -> String {
            "CREATE TABLE devices;".to_string()
        }

        fn dispose(&self) -> String {
            "DROP TABLE devices;".to_string()
        }

        fn dependencies(&self) -> Vec<&'static str> {
            vec!["tenants"]
        }
    }

    struct MockReadingTable;
    impl Table for MockReadingTable {
        fn name(&self) -> &'static str {
            "readings"
        }

        fn create(&self) -> String {
            "CREATE TABLE readings;".to_string()
        }

        fn dispose(&self) -> String {
            "DROP TABLE readings;".to_string()
        }

        fn dependencies(&self) -> Vec<&'static str> {
            vec!["devices", "tenants"]
        }
    }

    #[test]
    fn test_correct_creation_order() {
        let tables: Vec<Box<dyn Table>> = vec![
            Box::new(MockReadingTable),
            Box::new(MockDeviceTable),
            Box::new(MockTenantTable),
        ];

        let manager = SchemaManager::new(tables);
        let statements = manager.create_schema();

        assert_eq!(statements[0], "CREATE TABLE tenants;");
        assert_eq!(statements[1], "CREATE TABLE devices;");
        assert_eq!(statements[2], "CREATE TABLE readings;");

        let statements = manager.dispose_schema();
        assert_eq!(statements[0], "DROP TABLE readings;");
        assert_eq!(statements[2], "DROP TABLE tenants;");
    }

    #[test]
    #[should_panic(expected = "Unresolvable table dependencies")]
    fn test_missing_dependency_panics() {
        SchemaManager::new(vec![Box::new(MockReadingTable), Box::new(MockDeviceTable)]);
    }

    #[test]
    fn test_default_schema_creates_devices_first() {
        let statements = SchemaManager::default().create_schema();

        assert!(statements[0].contains("CREATE TABLE IF NOT EXISTS devices"));
        assert!(statements[1].contains("CREATE TABLE IF NOT EXISTS light_readings"));
    }
}
