//! Integration tests for the product category repository
//!
//! These tests start a throwaway PostgreSQL container, point a settings file
//! at it, and run every repository operation against the real database.
//!
//! Docker is required: `cargo test -- --ignored`

use shop_dao::raw_sql::execute_unprepared;
use shop_dao::{
    DaoError, PgExecutor, Product, ProductCategory, ProductCategoryDao, ProductCategoryDaoDb,
    QueryExecutor, SqlValue, ValidationError,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use testcontainers::clients::Cli;
use testcontainers_modules::postgres::Postgres;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS product_categories (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        department TEXT NOT NULL
    )
"#;

fn write_settings(port: u16) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".properties")
        .tempfile()
        .expect("Failed to create settings file");
    writeln!(file, "db_name=postgres").unwrap();
    writeln!(file, "db_url=127.0.0.1:{}", port).unwrap();
    writeln!(file, "db_user=postgres").unwrap();
    writeln!(file, "db_password=postgres").unwrap();
    file
}

// Helper: fresh container + schema per test
fn with_dao(test: impl FnOnce(Arc<ProductCategoryDaoDb<PgExecutor>>)) {
    let docker = Cli::default();
    let node = docker.run(Postgres::default());
    let settings = write_settings(node.get_host_port_ipv4(5432));

    let dao = Arc::new(ProductCategoryDaoDb::connect(settings.path()));
    execute_unprepared(dao.executor(), SCHEMA).expect("Failed to setup schema");

    test(dao);
}

fn tablet() -> ProductCategory {
    ProductCategory::new("Tablet", "Hardware", "A tablet computer")
}

fn laptop() -> ProductCategory {
    ProductCategory::new("Laptop", "Hardware", "Portable computer")
}

#[test]
#[ignore = "requires docker"]
fn test_add_then_find_round_trip() {
    with_dao(|dao| {
        let id = dao.add(&tablet()).expect("Failed to add category");
        assert!(id > 0);

        let found = dao.find(id).expect("Failed to query").expect("category should exist");
        assert_eq!(found, tablet().with_id(id));
        assert_eq!(dao.find(id + 1000).expect("Failed to query"), None);
    });
}

#[test]
#[ignore = "requires docker"]
fn test_add_rejects_invalid_category() {
    with_dao(|dao| {
        let err = dao
            .add(&ProductCategory::new("Tablet", "Hardware", ""))
            .expect_err("empty description must be rejected");
        assert!(matches!(
            err,
            DaoError::Validation(ValidationError::EmptyDescription)
        ));
        assert!(dao.get_all().expect("Failed to query").is_empty());
    });
}

#[test]
#[ignore = "requires docker"]
fn test_remove() {
    with_dao(|dao| {
        let keep = dao.add(&laptop()).unwrap();
        let gone = dao.add(&tablet()).unwrap();

        dao.remove(gone).expect("Failed to remove category");
        assert_eq!(dao.find(gone).unwrap(), None);
        assert_eq!(dao.find(keep).unwrap(), Some(laptop().with_id(keep)));

        assert!(matches!(
            dao.remove(gone),
            Err(DaoError::NotFound { id, .. }) if id == gone
        ));
    });
}

#[test]
#[ignore = "requires docker"]
fn test_remove_all_then_get_all_is_empty() {
    with_dao(|dao| {
        dao.add(&laptop()).unwrap();
        dao.add(&tablet()).unwrap();
        assert_eq!(dao.get_all().unwrap().len(), 2);

        assert_eq!(dao.remove_all().expect("Failed to remove all"), 2);
        assert!(dao.get_all().unwrap().is_empty());
        assert_eq!(dao.remove_all().unwrap(), 0);
    });
}

#[test]
#[ignore = "requires docker"]
fn test_get_all_in_id_order() {
    with_dao(|dao| {
        let first = dao.add(&laptop()).unwrap();
        let second = dao.add(&tablet()).unwrap();

        assert_eq!(
            dao.get_all().unwrap(),
            vec![laptop().with_id(first), tablet().with_id(second)]
        );
    });
}

#[test]
#[ignore = "requires docker"]
fn test_find_id_by_name() {
    with_dao(|dao| {
        let id = dao.add(&tablet()).unwrap();
        dao.add(&tablet()).unwrap();

        assert_eq!(dao.find_id_by_name("Tablet").unwrap(), Some(id));
        assert_eq!(dao.find_id_by_name("Phone").unwrap(), None);
        // Bound, not interpolated
        assert_eq!(dao.find_id_by_name("' OR '1'='1").unwrap(), None);
    });
}

#[test]
#[ignore = "requires docker"]
fn test_filter_products_with_persisted_categories() {
    with_dao(|dao| {
        let laptop_id = dao.add(&laptop()).unwrap();
        let tablet_id = dao.add(&tablet()).unwrap();
        let laptops = dao.find(laptop_id).unwrap().unwrap();
        let tablets = dao.find(tablet_id).unwrap().unwrap();

        let price = rust_decimal::Decimal::new(4999, 2);
        let products = vec![
            Product::new("Lenovo IdeaPad", "", price, "USD", laptops.clone()),
            Product::new("Amazon Fire", "", price, "USD", tablets),
        ];

        let filtered = dao.filter_products(products.clone(), &laptops);
        assert_eq!(filtered, vec![products[0].clone()]);
        assert_eq!(dao.filter_products(products.clone(), &dao.default_category()), products);
    });
}

#[test]
#[ignore = "requires docker"]
fn test_statement_errors_are_wrapped() {
    with_dao(|dao| {
        let err = dao
            .executor()
            .query("SELECT * FROM no_such_table", &[])
            .expect_err("query on missing table must fail");
        assert!(matches!(err, DaoError::Postgres(_)));
        assert!(err.to_string().starts_with("Can't complete request"));

        let err = dao
            .executor()
            .execute("DELETE FROM product_categories WHERE id = $1", &[SqlValue::from("x")])
            .expect_err("text bound to an integer column must fail");
        assert!(err.is_database_error());
    });
}

#[test]
#[ignore = "requires docker"]
fn test_concurrent_callers_in_coroutines() {
    with_dao(|dao| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let dao = Arc::clone(&dao);
                may::go!(move || {
                    dao.add(&ProductCategory::new(
                        format!("Category {}", i),
                        "Hardware",
                        "Concurrent insert",
                    ))
                })
            })
            .collect();

        for handle in handles {
            handle
                .join()
                .expect("coroutine panicked")
                .expect("concurrent insert failed");
        }
        assert_eq!(dao.get_all().unwrap().len(), 8);
    });
}
