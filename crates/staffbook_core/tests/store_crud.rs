use staffbook_core::db::migrations::latest_version;
use staffbook_core::db::open_db_in_memory;
use staffbook_core::{
    Address, AddressRepository, Employee, EmployeeRepository, RepoError, SqliteAddressRepository,
    SqliteEmployeeRepository, ValidationError,
};
use rusqlite::Connection;

fn rio_branco() -> Address {
    Address {
        postal_code: "20040-020".to_string(),
        street: "Av. Rio Branco".to_string(),
        complement: None,
        neighborhood: "Centro".to_string(),
        city: "Rio de Janeiro".to_string(),
        state: "RJ".to_string(),
    }
}

fn praca_da_se() -> Address {
    Address {
        postal_code: "01001-000".to_string(),
        street: "Praça da Sé".to_string(),
        complement: Some("lado ímpar".to_string()),
        neighborhood: "Sé".to_string(),
        city: "São Paulo".to_string(),
        state: "SP".to_string(),
    }
}

#[test]
fn address_get_misses_until_put() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAddressRepository::try_new(&conn).unwrap();

    assert!(repo.get_address("20040-020").unwrap().is_none());

    let stored = repo.put_address(&rio_branco()).unwrap();
    assert_eq!(stored, rio_branco());
    assert_eq!(repo.get_address("20040-020").unwrap(), Some(rio_branco()));
}

#[test]
fn address_put_overwrites_same_postal_code() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAddressRepository::try_new(&conn).unwrap();
    repo.put_address(&rio_branco()).unwrap();

    let mut renamed = rio_branco();
    renamed.street = "Avenida Rio Branco".to_string();
    renamed.complement = Some("até 89".to_string());
    repo.put_address(&renamed).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM addresses;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(repo.get_address("20040-020").unwrap(), Some(renamed));
}

#[test]
fn address_put_rejects_blank_postal_code() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAddressRepository::try_new(&conn).unwrap();

    let err = repo.put_address(&Address::with_postal_code(" ")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::EmptyField("postal_code"))
    ));
}

#[test]
fn employee_insert_assigns_sequential_ids_and_hydrates_address() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let employees = SqliteEmployeeRepository::try_new(&conn).unwrap();
    addresses.put_address(&rio_branco()).unwrap();

    let ana = employees
        .put_employee(&Employee::new("Ana", "111", "20040-020"))
        .unwrap();
    let bruno = employees
        .put_employee(&Employee::new("Bruno", "222", "20040-020"))
        .unwrap();

    assert_eq!(ana.id, Some(1));
    assert_eq!(bruno.id, Some(2));
    assert_eq!(ana.address, rio_branco());
    assert_eq!(employees.get_employee(2).unwrap(), Some(bruno));
}

#[test]
fn employee_lookup_by_personal_code() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let employees = SqliteEmployeeRepository::try_new(&conn).unwrap();
    addresses.put_address(&praca_da_se()).unwrap();

    let saved = employees
        .put_employee(&Employee::new("Carla", "333", "01001-000"))
        .unwrap();

    assert_eq!(
        employees.get_employee_by_personal_code("333").unwrap(),
        Some(saved)
    );
    assert!(employees
        .get_employee_by_personal_code("999")
        .unwrap()
        .is_none());
}

#[test]
fn employee_put_with_id_overwrites_record() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let employees = SqliteEmployeeRepository::try_new(&conn).unwrap();
    addresses.put_address(&rio_branco()).unwrap();
    addresses.put_address(&praca_da_se()).unwrap();

    let mut ana = employees
        .put_employee(&Employee::new("Ana", "111", "20040-020"))
        .unwrap();
    ana.name = "Ana Maria".to_string();
    ana.address = Address::with_postal_code("01001-000");

    let updated = employees.put_employee(&ana).unwrap();
    assert_eq!(updated.id, ana.id);
    assert_eq!(updated.name, "Ana Maria");
    assert_eq!(updated.address, praca_da_se());
    assert_eq!(employees.list_employees().unwrap().len(), 1);
}

#[test]
fn duplicate_personal_code_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let employees = SqliteEmployeeRepository::try_new(&conn).unwrap();
    addresses.put_address(&rio_branco()).unwrap();

    employees
        .put_employee(&Employee::new("Ana", "111", "20040-020"))
        .unwrap();
    let err = employees
        .put_employee(&Employee::new("Another Ana", "111", "20040-020"))
        .unwrap_err();

    assert!(matches!(err, RepoError::DuplicatePersonalCode(code) if code == "111"));
    assert_eq!(employees.list_employees().unwrap().len(), 1);
}

#[test]
fn employee_without_stored_address_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let employees = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let err = employees
        .put_employee(&Employee::new("Ana", "111", "20040-020"))
        .unwrap_err();

    assert!(matches!(err, RepoError::MissingAddress(code) if code == "20040-020"));
    assert!(employees.list_employees().unwrap().is_empty());
}

#[test]
fn employee_delete_is_idempotent_and_keeps_address() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let employees = SqliteEmployeeRepository::try_new(&conn).unwrap();
    addresses.put_address(&rio_branco()).unwrap();

    let ana = employees
        .put_employee(&Employee::new("Ana", "111", "20040-020"))
        .unwrap();
    let id = ana.id.unwrap();

    employees.delete_employee(id).unwrap();
    employees.delete_employee(id).unwrap();
    employees.delete_employee(404).unwrap();

    assert!(employees.get_employee(id).unwrap().is_none());
    assert_eq!(addresses.get_address("20040-020").unwrap(), Some(rio_branco()));
}

#[test]
fn deleted_ids_are_not_reused() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let employees = SqliteEmployeeRepository::try_new(&conn).unwrap();
    addresses.put_address(&rio_branco()).unwrap();

    let first = employees
        .put_employee(&Employee::new("Ana", "111", "20040-020"))
        .unwrap();
    employees.delete_employee(first.id.unwrap()).unwrap();
    let second = employees
        .put_employee(&Employee::new("Bruno", "222", "20040-020"))
        .unwrap();

    assert_eq!(first.id, Some(1));
    assert_eq!(second.id, Some(2));
}

#[test]
fn list_returns_ascending_ids() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let employees = SqliteEmployeeRepository::try_new(&conn).unwrap();
    addresses.put_address(&rio_branco()).unwrap();
    addresses.put_address(&praca_da_se()).unwrap();

    for (name, code, postal) in [
        ("Ana", "111", "20040-020"),
        ("Bruno", "222", "01001-000"),
        ("Carla", "333", "20040-020"),
    ] {
        employees
            .put_employee(&Employee::new(name, code, postal))
            .unwrap();
    }

    let ids: Vec<_> = employees
        .list_employees()
        .unwrap()
        .into_iter()
        .map(|employee| employee.id.unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn repositories_reject_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteEmployeeRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
    assert!(matches!(
        SqliteAddressRepository::try_new(&conn),
        Err(RepoError::UninitializedConnection { .. })
    ));
}

#[test]
fn repository_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteAddressRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("addresses"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE addresses (
            postal_code TEXT PRIMARY KEY NOT NULL,
            street TEXT NOT NULL DEFAULT '',
            neighborhood TEXT NOT NULL DEFAULT '',
            city TEXT NOT NULL DEFAULT '',
            state TEXT NOT NULL DEFAULT ''
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteAddressRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "addresses",
            column: "complement"
        })
    ));
}

#[test]
fn invalid_persisted_rows_are_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO addresses (postal_code, street, neighborhood, city, state)
         VALUES ('   ', '', '', '', '');
         INSERT INTO employees (name, personal_code, postal_code)
         VALUES ('', '', '   ');",
    )
    .unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let employees = SqliteEmployeeRepository::try_new(&conn).unwrap();

    assert!(matches!(
        addresses.get_address("   "),
        Err(RepoError::InvalidData(_))
    ));
    assert!(matches!(
        employees.get_employee(1),
        Err(RepoError::InvalidData(_))
    ));
    assert!(matches!(
        employees.get_employee_by_personal_code(""),
        Err(RepoError::InvalidData(_))
    ));
    assert!(matches!(
        employees.list_employees(),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn employee_with_blank_name_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let addresses = SqliteAddressRepository::try_new(&conn).unwrap();
    let employees = SqliteEmployeeRepository::try_new(&conn).unwrap();
    addresses.put_address(&rio_branco()).unwrap();
    conn.execute(
        "INSERT INTO employees (name, personal_code, postal_code) VALUES ('  ', '111', ?1);",
        ["20040-020"],
    )
    .unwrap();

    match employees.get_employee(1) {
        Err(RepoError::InvalidData(message)) => assert!(message.contains("name")),
        other => panic!("expected invalid data, got {other:?}"),
    }
    assert_eq!(addresses.get_address("20040-020").unwrap(), Some(rio_branco()));
}
