//! The line-oriented REPL: three record commands (`insert`, `select`,
//! `delete`) and two meta-commands (`.exit`, `.btree`). EOF on stdin behaves
//! like `.exit`.

use crate::database::Database;
use crate::err;
use crate::errors::Error;
use crate::storage::row::Row;
use std::io::{self, BufRead, Write};
use tracing::error;

const PROMPT: &str = "mysqlite> ";

pub fn run(db: &mut Database) -> Result<(), Error> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(meta) = line.strip_prefix('.') {
            match meta {
                "exit" => break,
                "btree" => {
                    let tree = db.pretty_print()?;
                    print!("{}", tree);
                }
                other => println!("Unrecognized command '.{}'", other),
            }
            continue;
        }

        match dispatch(db, line) {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(Error::Syntax(_)) => println!("Syntax error"),
            Err(e) => println!("Error: {}", e),
        }
    }
    Ok(())
}

fn dispatch(db: &mut Database, line: &str) -> Result<(), Error> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let keyword = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    match keyword {
        "insert" => {
            let row = parse_insert(rest)?;
            db.insert(&row)?;
            println!("Executed.");
            Ok(())
        }
        "select" => {
            for row in db.select_all()? {
                println!("{}", row);
            }
            println!("Executed.");
            Ok(())
        }
        "delete" => {
            let id = parse_id(rest)?;
            db.delete(id)?;
            println!("Deleted.");
            Ok(())
        }
        other => {
            error!(keyword = other, "unrecognized statement");
            Err(err!(Syntax, "Unrecognized keyword at start of '{}'", line))
        }
    }
}

fn parse_id(rest: &str) -> Result<i32, Error> {
    rest.trim()
        .parse::<i32>()
        .map_err(|_| err!(Syntax, "expected an integer id, got '{}'", rest))
}

fn parse_insert(rest: &str) -> Result<Row, Error> {
    let mut fields = rest.split_whitespace();
    let id = fields
        .next()
        .ok_or_else(|| err!(Syntax, "insert requires <id> <username> <email>"))?
        .parse::<i32>()
        .map_err(|_| err!(Syntax, "id must be an integer"))?;
    let username = fields
        .next()
        .ok_or_else(|| err!(Syntax, "insert requires <id> <username> <email>"))?;
    let email = fields
        .next()
        .ok_or_else(|| err!(Syntax, "insert requires <id> <username> <email>"))?;
    if fields.next().is_some() {
        return Err(err!(Syntax, "too many arguments to insert"));
    }
    Row::new(id, username, email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_insert() {
        let row = parse_insert("1 alice alice@example.com").unwrap();
        assert_eq!(row.id, 1);
        assert_eq!(row.username(), "alice");
        assert_eq!(row.email(), "alice@example.com");
    }

    #[test]
    fn rejects_malformed_insert() {
        assert!(parse_insert("1 alice").is_err());
        assert!(parse_insert("notanumber alice alice@example.com").is_err());
        assert!(parse_insert("1 alice alice@example.com extra").is_err());
    }

    #[test]
    fn rejects_malformed_delete_id() {
        assert!(parse_id("notanumber").is_err());
    }
}
