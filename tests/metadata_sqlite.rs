mod harness;

use harness::SqliteFixture;
use rstest::rstest;

use schema_workbench::app::{DbMetaData, MetadataOptions};
use schema_workbench::domain::ConnectionSettings;
use schema_workbench::domain::sql_type::types;
use schema_workbench::infra::default_registry;

#[test]
fn load_reports_server_and_unqualified_bucket() {
    let fixture = SqliteFixture::star_schema();

    let metadata = fixture.metadata();

    assert_eq!(metadata.err_msg(), None);
    assert!(metadata.is_loaded());
    assert_eq!(metadata.database_product_name(), "SQLite");
    assert_eq!(metadata.db_catalog_name(), "main");
    assert_eq!(metadata.jdbc_connection_url(), fixture.url());
    assert_eq!(metadata.get_all_schemas(), vec![""]);
}

#[test]
fn views_are_left_out_when_materialized_views_are_refused() {
    let fixture = SqliteFixture::star_schema();
    let metadata = fixture.metadata();

    assert_eq!(
        metadata.get_all_tables(None),
        vec!["product", "sales_fact", "store", "time_by_day"]
    );
    assert!(!metadata.is_table_exists(None, "big_sales"));
}

#[test]
fn schema_filter_is_ignored_without_schemas() {
    let fixture = SqliteFixture::star_schema();

    let metadata = DbMetaData::new(fixture.options().schema_filter("sales"), default_registry());

    assert_eq!(metadata.get_all_tables(None).len(), 4);
}

mod star_schema {
    use super::*;

    #[test]
    fn fact_tables_are_those_importing_keys() {
        let fixture = SqliteFixture::star_schema();
        let metadata = fixture.metadata();

        assert_eq!(metadata.get_fact_tables(None), vec!["sales_fact"]);
    }

    #[test]
    fn dimensions_and_foreign_keys_of_fact_table() {
        let fixture = SqliteFixture::star_schema();
        let metadata = fixture.metadata();

        assert_eq!(
            metadata.get_dimension_tables(None, "sales_fact"),
            vec!["product", "store", "time_by_day"]
        );
        assert_eq!(
            metadata.get_fact_table_fks(None, "sales_fact"),
            vec!["product_id", "store_id", "time_id"]
        );
        assert!(metadata.get_fact_table_fks(None, "product").is_empty());
    }

    #[rstest]
    #[case("product", Some("product_id"))]
    #[case("store", Some("store_id"))]
    #[case("sales_fact", None)]
    #[case("missing", None)]
    fn primary_keys(#[case] table: &str, #[case] expected: Option<&str>) {
        let fixture = SqliteFixture::star_schema();
        let metadata = fixture.metadata();

        assert_eq!(metadata.get_table_pk(None, table).as_deref(), expected);
    }

    #[test]
    fn excluding_drops_suffix_matches() {
        let fixture = SqliteFixture::star_schema();
        let metadata = fixture.metadata();

        assert_eq!(
            metadata.get_all_tables_excluding(None, "store"),
            vec!["product", "sales_fact", "time_by_day"]
        );
    }
}

mod columns {
    use super::*;

    #[test]
    fn column_names_load_on_first_use() {
        let fixture = SqliteFixture::star_schema();
        let mut metadata = fixture.metadata();
        assert!(
            !metadata
                .database()
                .tables_named("product")
                .first()
                .is_some_and(|t| t.columns_loaded())
        );

        assert_eq!(
            metadata.get_all_columns(None, Some("product")),
            vec!["brand", "price", "product_id"]
        );
        assert!(
            metadata
                .database()
                .tables_named("product")
                .first()
                .is_some_and(|t| t.columns_loaded())
        );
    }

    #[test]
    fn definitions_carry_type_details() {
        let fixture = SqliteFixture::star_schema();
        let mut metadata = fixture.metadata();

        let price = metadata
            .get_column_definition(None, "product", "price")
            .unwrap();

        assert_eq!(price.display_type(), "DECIMAL(10, 2)");
        assert_eq!(
            metadata.get_column_data_type(None, "product", "brand"),
            Some(types::VARCHAR)
        );
        assert_eq!(metadata.get_column_data_type(None, "product", "nope"), None);
    }

    #[rstest]
    #[case("store", "region", true)]
    #[case("store", "brand", false)]
    #[case("missing", "region", false)]
    fn column_existence(#[case] table: &str, #[case] column: &str, #[case] expected: bool) {
        let fixture = SqliteFixture::star_schema();
        let mut metadata = fixture.metadata();

        assert_eq!(metadata.is_col_exists(None, table, column), expected);
    }

    #[test]
    fn every_column_is_described_without_a_table() {
        let fixture = SqliteFixture::star_schema();
        let mut metadata = fixture.metadata();

        let described = metadata.get_all_columns(None, None);

        assert_eq!(described.len(), 11);
        assert!(described.contains(&"product->brand - VARCHAR(60)".to_string()));
        assert!(described.contains(&"store->region - CHAR".to_string()));
        assert!(described.contains(&"sales_fact->store_sales - NUMERIC(10, 4)".to_string()));
    }

    #[test]
    fn db_columns_survive_a_deleted_database_once_cached() {
        let fixture = SqliteFixture::star_schema();
        let mut metadata = fixture.metadata();
        assert_eq!(metadata.get_all_db_columns(None, "store").len(), 2);

        std::fs::remove_file(fixture.path()).unwrap();

        assert_eq!(metadata.get_all_db_columns(None, "store").len(), 2);
        assert!(metadata.get_all_db_columns(None, "product").is_empty());
    }
}

#[test]
fn reset_picks_up_new_tables() {
    let fixture = SqliteFixture::star_schema();
    let mut metadata = fixture.metadata();
    fixture.execute("CREATE TABLE promotion (promotion_id INTEGER PRIMARY KEY);");
    assert!(!metadata.is_table_exists(None, "promotion"));

    metadata.reset();

    assert!(metadata.is_table_exists(None, "promotion"));
    assert_eq!(metadata.get_table_pk(None, "promotion").as_deref(), Some("promotion_id"));
}

mod failures {
    use super::*;

    #[test]
    fn blank_settings_explain_what_is_missing() {
        let metadata = DbMetaData::new(
            MetadataOptions::new(ConnectionSettings::new("sqlite", " ")),
            default_registry(),
        );

        assert_eq!(
            metadata.err_msg(),
            Some("Driver=sqlite\nConnection URL= \nUse Preferences menu to set them")
        );
        assert!(!metadata.is_loaded());
        assert!(metadata.get_all_tables(None).is_empty());
    }

    #[test]
    fn unknown_driver_is_a_driver_load_error() {
        let metadata = DbMetaData::new(
            MetadataOptions::new(ConnectionSettings::new("com.ibm.db2.jcc.DB2Driver", "jdbc:db2:x")),
            default_registry(),
        );

        assert!(metadata.err_msg().unwrap().starts_with("DriverLoadError : "));
    }

    #[test]
    fn missing_database_file_is_a_connection_error() {
        let fixture = SqliteFixture::star_schema();
        std::fs::remove_file(fixture.path()).unwrap();

        let metadata = fixture.metadata();

        assert!(metadata.err_msg().unwrap().starts_with("ConnectionFailed : "));
        assert!(metadata.get_all_schemas().is_empty());
    }
}
