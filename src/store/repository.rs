use rusqlite::Connection;

/// runs init.sql on the store. Safe to run on a store that already has its tables
pub fn create_tables(con: &Connection) -> Result<(), rusqlite::Error> {
    con.execute_batch(include_str!("../assets/init.sql"))
}

/// returns the schema version recorded in the store, or `None` if the store has never been migrated
pub fn get_schema_version(con: &Connection) -> Result<Option<String>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/metadata/get_schema_version.sql"
    ))?;
    match pst.query_row([], |row| row.get(0)) {
        Ok(version) => Ok(Some(version)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn set_schema_version(version: &str, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/metadata/set_schema_version.sql"
    ))?;
    pst.execute(rusqlite::params![version])?;
    Ok(())
}

/// retrieves the raw json stored under `key`.
///
/// if `None` is returned, nothing is stored under that key
pub fn get_value(key: &str, con: &Connection) -> Result<Option<String>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/store/get_value.sql"))?;
    match pst.query_row(rusqlite::params![key], |row| row.get(0)) {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// inserts or replaces the raw json stored under `key`. The caller is responsible for validating it first
pub fn set_value(key: &str, value: &str, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/store/set_value.sql"))?;
    pst.execute(rusqlite::params![key, value])?;
    Ok(())
}

/// removes whatever is stored under `key`. Does nothing if the key isn't stored
pub fn delete_value(key: &str, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/store/delete_value.sql"))?;
    pst.execute(rusqlite::params![key])?;
    Ok(())
}

/// every stored `(key, raw json)` pair, ordered by key
pub fn get_all_values(con: &Connection) -> Result<Vec<(String, String)>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/store/get_all_values.sql"
    ))?;
    let rows = pst.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect::<Result<Vec<(String, String)>, rusqlite::Error>>()
}
